//! Pseudo-legal move generation.
//!
//! Every piece type has a movement predicate over an (origin, destination)
//! pair. [`pseudo_legal_destinations`] evaluates the predicate of the piece
//! standing on the origin against every other intersection, dropping
//! squares held by the mover's own pieces. Whether the mover's king is left
//! in check is not considered here; see [`rules`](crate::rules).

use crate::square::Square;
use crate::{Bitboard, Color, Piece, PieceType, Pieces};

/// Returns every square the piece on `from` can reach, ignoring checks.
///
/// The result is empty when `from` holds no piece. Squares occupied by pieces
/// of the mover's color are never included, nor is `from` itself.
///
/// # Examples
///
/// ```
/// use xiangqi::fen;
/// use xiangqi::movegen::pseudo_legal_destinations;
/// use xiangqi::square::consts::*;
///
/// let pieces = fen::decode("start").unwrap();
/// let dests = pseudo_legal_destinations(&pieces, SQ_B0);
///
/// assert_eq!(2, dests.count());
/// assert!(dests.contains(SQ_A2));
/// assert!(dests.contains(SQ_C2));
/// ```
pub fn pseudo_legal_destinations(pieces: &Pieces, from: Square) -> Bitboard {
    match pieces.get(&from) {
        Some(&piece) => Square::iter()
            .filter(|&to| to != from)
            .filter(|to| pieces.get(to).map_or(true, |pc| pc.color != piece.color))
            .filter(|&to| can_reach(pieces, piece, from, to))
            .collect(),
        None => Bitboard::empty(),
    }
}

/// Returns the squares `piece` could reach from `from` on an otherwise empty board.
///
/// Used to stage premoves, whose legality is only known once the opponent
/// has replied.
pub fn premove_destinations(piece: Piece, from: Square) -> Bitboard {
    let mut pieces = Pieces::default();
    pieces.insert(from, piece);
    pseudo_legal_destinations(&pieces, from)
}

/// Returns the union of the pseudo-legal destinations of every piece of `color`.
pub fn attacked_squares(pieces: &Pieces, color: Color) -> Bitboard {
    let mut bb = Bitboard::empty();

    for (&sq, _) in pieces.iter().filter(|(_, pc)| pc.color == color) {
        bb |= &pseudo_legal_destinations(pieces, sq);
    }

    bb
}

/// Returns true if any piece of `color` attacks `target`.
pub fn is_attacked_by(pieces: &Pieces, target: Square, color: Color) -> bool {
    pieces
        .iter()
        .filter(|(_, pc)| pc.color == color)
        .any(|(&sq, _)| pseudo_legal_destinations(pieces, sq).contains(target))
}

/// Movement predicate of `piece` moving from `from` to `to`.
///
/// Destination ownership is not checked here.
pub fn can_reach(pieces: &Pieces, piece: Piece, from: Square, to: Square) -> bool {
    let df = to.file() as i8 - from.file() as i8;
    let dr = to.rank() as i8 - from.rank() as i8;

    match piece.piece_type {
        PieceType::King => king(piece.color, from, to, df, dr),
        PieceType::Advisor => advisor(piece.color, to, df, dr),
        PieceType::Bishop => bishop(pieces, piece.color, from, to, df, dr),
        PieceType::Knight => knight(pieces, from, df, dr),
        PieceType::Rook => rook(pieces, from, to),
        PieceType::Cannon => cannon(pieces, from, to),
        PieceType::Pawn => pawn(piece.color, from, df, dr),
    }
}

/// Counts the pieces strictly between two squares on a shared file or rank.
///
/// Returns `None` if the squares are not aligned.
pub fn pieces_between(pieces: &Pieces, from: Square, to: Square) -> Option<usize> {
    let (f1, r1) = from.coordinates();
    let (f2, r2) = to.coordinates();

    let between: Vec<Square> = if f1 == f2 {
        (r1.min(r2) + 1..r1.max(r2))
            .filter_map(|r| Square::new(f1, r))
            .collect()
    } else if r1 == r2 {
        (f1.min(f2) + 1..f1.max(f2))
            .filter_map(|f| Square::new(f, r1))
            .collect()
    } else {
        return None;
    };

    Some(between.iter().filter(|sq| pieces.contains_key(sq)).count())
}

fn king(color: Color, from: Square, to: Square, df: i8, dr: i8) -> bool {
    df.abs() + dr.abs() == 1 && from.in_palace(color) && to.in_palace(color)
}

fn advisor(color: Color, to: Square, df: i8, dr: i8) -> bool {
    df.abs() == 1 && dr.abs() == 1 && to.in_palace(color)
}

fn bishop(pieces: &Pieces, color: Color, from: Square, to: Square, df: i8, dr: i8) -> bool {
    if df.abs() != 2 || dr.abs() != 2 {
        return false;
    }

    if from.is_home_side(color) != to.is_home_side(color) {
        return false;
    }

    from.shift(df / 2, dr / 2)
        .map_or(false, |eye| !pieces.contains_key(&eye))
}

fn knight(pieces: &Pieces, from: Square, df: i8, dr: i8) -> bool {
    let leg = match (df.abs(), dr.abs()) {
        (1, 2) => from.shift(0, dr.signum()),
        (2, 1) => from.shift(df.signum(), 0),
        _ => return false,
    };

    leg.map_or(false, |leg| !pieces.contains_key(&leg))
}

fn rook(pieces: &Pieces, from: Square, to: Square) -> bool {
    pieces_between(pieces, from, to) == Some(0)
}

fn cannon(pieces: &Pieces, from: Square, to: Square) -> bool {
    let screens = if pieces.contains_key(&to) { 1 } else { 0 };
    pieces_between(pieces, from, to) == Some(screens)
}

fn pawn(color: Color, from: Square, df: i8, dr: i8) -> bool {
    let forward = color.forward();

    if df == 0 && dr == forward {
        return true;
    }

    !from.is_home_side(color) && df.abs() == 1 && dr == 0
}
