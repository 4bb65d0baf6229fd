//! Check, checkmate and legal move filtering.
//!
//! All functions take the placement map by reference and never mutate it.
//! Hypothetical moves are played on a clone.

use serde::{Deserialize, Serialize};

use crate::error::FenError;
use crate::movegen::{is_attacked_by, pieces_between, pseudo_legal_destinations};
use crate::square::Square;
use crate::{fen, Bitboard, Color, Move, PieceType, Pieces};

/// Outcome of a position from the point of view of the side to move.
///
/// The color carried by each variant is the side to move.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash, Serialize, Deserialize)]
#[serde(tag = "status", content = "color", rename_all = "lowercase")]
pub enum GameStatus {
    InProgress,
    Check(Color),
    Checkmate(Color),
    /// The side to move has no legal move without being in check. It loses.
    Stalemate(Color),
}

impl GameStatus {
    /// Returns the winning color once the game is over.
    ///
    /// ```
    /// use xiangqi::{Color, GameStatus};
    ///
    /// assert_eq!(Some(Color::Black), GameStatus::Checkmate(Color::Red).winner());
    /// assert_eq!(None, GameStatus::Check(Color::Red).winner());
    /// ```
    pub fn winner(self) -> Option<Color> {
        match self {
            GameStatus::Checkmate(c) | GameStatus::Stalemate(c) => Some(c.flip()),
            GameStatus::InProgress | GameStatus::Check(_) => None,
        }
    }

    pub fn is_over(self) -> bool {
        self.winner().is_some()
    }
}

/// Returns the square of `color`'s king, if present.
pub fn king_square(pieces: &Pieces, color: Color) -> Option<Square> {
    pieces
        .iter()
        .find(|(_, pc)| pc.piece_type == PieceType::King && pc.color == color)
        .map(|(&sq, _)| sq)
}

/// Returns true if both kings stand on the same file with nothing between them.
pub fn generals_are_facing(pieces: &Pieces) -> bool {
    match (
        king_square(pieces, Color::Red),
        king_square(pieces, Color::Black),
    ) {
        (Some(red), Some(black)) => {
            red.file() == black.file() && pieces_between(pieces, red, black) == Some(0)
        }
        _ => false,
    }
}

/// Returns true if `color`'s king is missing, attacked, or facing the other king.
pub fn in_check(pieces: &Pieces, color: Color) -> bool {
    match king_square(pieces, color) {
        Some(king) => is_attacked_by(pieces, king, color.flip()) || generals_are_facing(pieces),
        None => true,
    }
}

/// Returns true if moving the piece on `from` to `to` leaves `color` in check.
///
/// Returns false when `from` holds no piece. A null move (`from == to`) tests
/// the current position.
///
/// # Examples
///
/// ```
/// use xiangqi::{fen, rules, Color};
/// use xiangqi::square::consts::*;
///
/// let pieces = fen::decode("4k4/9/9/9/9/9/9/9/9/4K4 w - - 0 1").unwrap();
///
/// assert!(rules::would_be_in_check(&pieces, SQ_E0, SQ_E0, Color::Red));
/// assert!(!rules::would_be_in_check(&pieces, SQ_E0, SQ_D0, Color::Red));
/// ```
pub fn would_be_in_check(pieces: &Pieces, from: Square, to: Square, color: Color) -> bool {
    match simulate(pieces, from, to) {
        Some(next) => in_check(&next, color),
        None => false,
    }
}

/// Returns the destinations of the piece on `from` which keep its own king safe.
pub fn legal_destinations(pieces: &Pieces, from: Square) -> Bitboard {
    match pieces.get(&from) {
        Some(pc) => pseudo_legal_destinations(pieces, from)
            .filter(|&to| !would_be_in_check(pieces, from, to, pc.color))
            .collect(),
        None => Bitboard::empty(),
    }
}

/// Returns true if moving the piece on `from` to `to` is legal.
pub fn is_legal_move(pieces: &Pieces, from: Square, to: Square) -> bool {
    let pc = match pieces.get(&from) {
        Some(pc) => pc,
        None => return false,
    };

    if !pseudo_legal_destinations(pieces, from).contains(to) {
        return false;
    }

    match simulate(pieces, from, to) {
        Some(next) => !in_check(&next, pc.color) && !generals_are_facing(&next),
        None => false,
    }
}

/// Returns every legal move of `color`, ordered by origin and destination.
pub fn legal_moves_for(pieces: &Pieces, color: Color) -> Vec<Move> {
    own_squares(pieces, color)
        .flat_map(|from| legal_destinations(pieces, from).map(move |to| Move::Normal { from, to }))
        .collect()
}

/// Returns true if `color` has at least one legal move.
pub fn has_legal_moves(pieces: &Pieces, color: Color) -> bool {
    own_squares(pieces, color).any(|from| {
        pseudo_legal_destinations(pieces, from).any(|to| !would_be_in_check(pieces, from, to, color))
    })
}

/// Returns true if `color` is checkmated.
///
/// A side without a king counts as checkmated.
pub fn is_checkmate_for(pieces: &Pieces, color: Color) -> bool {
    if king_square(pieces, color).is_none() {
        return true;
    }

    in_check(pieces, color) && !has_legal_moves(pieces, color)
}

/// Returns true if `color` is not in check but has no legal move.
pub fn is_stalemate_for(pieces: &Pieces, color: Color) -> bool {
    !in_check(pieces, color) && !has_legal_moves(pieces, color)
}

/// Classifies the position for `color` to move.
pub fn game_status(pieces: &Pieces, color: Color) -> GameStatus {
    let checked = in_check(pieces, color);

    match (checked, has_legal_moves(pieces, color)) {
        (true, false) => GameStatus::Checkmate(color),
        (false, false) => GameStatus::Stalemate(color),
        (true, true) => GameStatus::Check(color),
        (false, true) => GameStatus::InProgress,
    }
}

/// Returns true if the side to move of `fen` is checkmated.
///
/// # Examples
///
/// ```
/// use xiangqi::rules::is_checkmate;
///
/// // Red is in check from the rook on e2 but escapes to f0.
/// assert_eq!(Ok(false), is_checkmate("4k4/9/9/9/9/9/9/3rr4/9/4K4 w - - 0 1"));
/// assert_eq!(Ok(true), is_checkmate("3k5/9/9/9/5r3/9/4r4/9/9/4K4 w - - 0 1"));
/// ```
pub fn is_checkmate(position: &str) -> Result<bool, FenError> {
    let pieces = fen::decode(position)?;
    Ok(is_checkmate_for(&pieces, fen::side_to_move(position)))
}

/// Returns true if the side to move of `fen` is in check.
pub fn is_in_check(position: &str) -> Result<bool, FenError> {
    let pieces = fen::decode(position)?;
    Ok(in_check(&pieces, fen::side_to_move(position)))
}

fn simulate(pieces: &Pieces, from: Square, to: Square) -> Option<Pieces> {
    let pc = *pieces.get(&from)?;
    let mut next = pieces.clone();
    next.remove(&from);
    next.insert(to, pc);
    Some(next)
}

fn own_squares(pieces: &Pieces, color: Color) -> impl Iterator<Item = Square> + '_ {
    Square::iter().filter(move |sq| pieces.get(sq).map_or(false, |pc| pc.color == color))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::square::consts::*;

    fn decode(s: &str) -> Pieces {
        fen::decode(s).unwrap()
    }

    #[test]
    fn cannon_check_through_screen() {
        let pieces = decode("rnbak1bnr/4c4/1c5c1/9/4P4/9/P1P3P1P/1C5C1/9/RNBAK1BNR w - - 0 1");
        assert!(would_be_in_check(&pieces, SQ_E0, SQ_E0, Color::Red));
        assert!(in_check(&pieces, Color::Red));
    }

    #[test]
    fn initial_position_is_quiet() {
        let pieces = decode("start");
        assert!(!would_be_in_check(&pieces, SQ_E0, SQ_E0, Color::Red));
        assert!(!in_check(&pieces, Color::Black));
        assert_eq!(44, legal_moves_for(&pieces, Color::Red).len());
        assert_eq!(GameStatus::InProgress, game_status(&pieces, Color::Red));
    }

    #[test]
    fn rook_check_and_escape() {
        let pieces = decode("rnbak1bnr/9/1c5c1/9/9/9/4r4/1C5C1/9/RNBAK1BNR w - - 0 1");
        assert!(would_be_in_check(&pieces, SQ_E0, SQ_E0, Color::Red));

        let escapes = legal_destinations(&pieces, SQ_E0);
        assert!(escapes.is_any());
        for to in escapes {
            assert!(!would_be_in_check(&pieces, SQ_E0, to, Color::Red));
        }
        assert_eq!(GameStatus::Check(Color::Red), game_status(&pieces, Color::Red));
    }

    #[test]
    fn flying_general() {
        let pieces = decode("4k4/9/9/9/9/9/9/9/9/4K4 w - - 0 1");
        assert!(generals_are_facing(&pieces));
        assert!(would_be_in_check(&pieces, SQ_E0, SQ_E0, Color::Red));
        assert!(would_be_in_check(&pieces, SQ_E9, SQ_E9, Color::Black));

        let moves = legal_destinations(&pieces, SQ_E0);
        assert!(moves.is_any());
        assert!(moves.into_iter().any(|sq| sq.file() != SQ_E0.file()));
        assert!(!moves.contains(SQ_E1));
    }

    #[test]
    fn screened_generals_do_not_face() {
        let pieces = decode("4k4/9/9/9/4p4/9/9/9/9/4K4 w - - 0 1");
        assert!(!generals_are_facing(&pieces));
        assert!(!in_check(&pieces, Color::Red));

        // Moving the blocking piece off the file exposes its own king.
        let pieces = decode("4k4/9/9/9/4R4/9/9/9/9/4K4 w - - 0 1");
        assert!(!is_legal_move(&pieces, SQ_E5, SQ_D5));
        assert!(is_legal_move(&pieces, SQ_E5, SQ_E6));
    }

    #[test]
    fn two_rooks_without_mate() {
        let position = "4k4/9/9/9/9/9/9/3rr4/9/4K4 w - - 0 1";
        assert_eq!(Ok(false), is_checkmate(position));
        assert_eq!(Ok(true), is_in_check(position));

        let pieces = decode(position);
        assert_eq!(vec![SQ_F0], legal_destinations(&pieces, SQ_E0).collect::<Vec<_>>());
    }

    #[test]
    fn missing_king_is_checkmate() {
        assert_eq!(Ok(true), is_checkmate("4k4/9/9/9/9/9/9/9/9/9 w - - 0 1"));
        assert_eq!(Ok(false), is_checkmate("4k4/9/9/9/9/9/9/9/9/3K5 b - - 0 1"));
    }

    #[test]
    fn rook_pair_mate() {
        let position = "3k5/9/9/9/5r3/9/4r4/9/9/4K4 w - - 0 1";
        let pieces = decode(position);
        assert_eq!(Ok(true), is_checkmate(position));
        assert_eq!(
            GameStatus::Checkmate(Color::Red),
            game_status(&pieces, Color::Red)
        );
        assert_eq!(Some(Color::Black), game_status(&pieces, Color::Red).winner());
    }

    #[test]
    fn stalemate_loses() {
        // Every step of the red king is covered, yet it is not attacked.
        let pieces = decode("3k5/5r3/9/9/9/9/9/9/r8/4K4 w - - 0 1");
        assert!(!in_check(&pieces, Color::Red));
        assert!(is_stalemate_for(&pieces, Color::Red));
        assert_eq!(
            GameStatus::Stalemate(Color::Red),
            game_status(&pieces, Color::Red)
        );
        assert_eq!(Some(Color::Black), GameStatus::Stalemate(Color::Red).winner());
    }

    #[test]
    fn illegal_inputs_are_total() {
        let pieces = decode("start");
        assert!(!would_be_in_check(&pieces, SQ_E4, SQ_E5, Color::Red));
        assert!(legal_destinations(&pieces, SQ_E4).is_empty());
        assert!(!is_legal_move(&pieces, SQ_E4, SQ_E5));
        assert!(!is_legal_move(&pieces, SQ_A0, SQ_A5));
        assert!(is_legal_move(&pieces, SQ_A0, SQ_A2));
        assert!(is_checkmate("9/9").is_err());
    }

    #[test]
    fn input_is_never_mutated() {
        let pieces = decode("rnbak1bnr/9/1c5c1/9/9/9/4r4/1C5C1/9/RNBAK1BNR w - - 0 1");
        let before = pieces.clone();
        let _ = legal_moves_for(&pieces, Color::Red);
        let _ = is_checkmate_for(&pieces, Color::Red);
        assert_eq!(before, pieces);
    }
}
