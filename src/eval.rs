//! Static evaluation of a position.
//!
//! Scores are in centipawns from red's point of view: positive favours red.
//! Black's piece-square bonuses mirror red's across the river.

use crate::error::FenError;
use crate::movegen::pseudo_legal_destinations;
use crate::rules::{self, GameStatus};
use crate::square::{Square, NUM_FILES};
use crate::{fen, Color, Piece, PieceType, Pieces};

/// Score of a side to move that has lost.
pub const CHECKMATE_SCORE: i32 = 20000;

/// Bonus for the side to move.
pub const TEMPO_BONUS: i32 = 10;

const DEFENDER_BONUS: i32 = 50;
const ATTACKER_PENALTY: i32 = 80;
const EXPOSED_PENALTY: i32 = 200;
const CHECK_PENALTY: i32 = 300;

const CENTRAL_SQUARE_BONUS: i32 = 30;
const PALACE_BONUS: i32 = 40;
const RIVER_BONUS: i32 = 25;

/// Distance (in files and ranks) within which pieces count towards king safety.
const KING_ZONE: u8 = 2;

#[rustfmt::skip]
const PAWN_TABLE: [[i32; 9]; 10] = [
    [ 0,  0,   0,   0,   0,   0,   0,  0,  0],
    [ 0,  0,   0,   0,   0,   0,   0,  0,  0],
    [ 0,  0,   0,   0,   0,   0,   0,  0,  0],
    [10, 10,  20,  20,  20,  20,  20, 10, 10],
    [20, 20,  40,  40,  40,  40,  40, 20, 20],
    [30, 30,  60,  60,  60,  60,  60, 30, 30],
    [40, 40,  80,  80,  80,  80,  80, 40, 40],
    [50, 50, 100, 100, 100, 100, 100, 50, 50],
    [60, 60, 120, 120, 120, 120, 120, 60, 60],
    [70, 70, 140, 140, 140, 140, 140, 70, 70],
];

#[rustfmt::skip]
const ROOK_TABLE: [[i32; 9]; 10] = [
    [0, 0, 0, 0, 0, 0, 0, 0, 0],
    [0, 0, 0, 0, 0, 0, 0, 0, 0],
    [0, 0, 0, 0, 0, 0, 0, 0, 0],
    [0, 0, 0, 0, 0, 0, 0, 0, 0],
    [5, 5, 5, 5, 5, 5, 5, 5, 5],
    [5, 5, 5, 5, 5, 5, 5, 5, 5],
    [0, 0, 0, 0, 0, 0, 0, 0, 0],
    [0, 0, 0, 0, 0, 0, 0, 0, 0],
    [0, 0, 0, 0, 0, 0, 0, 0, 0],
    [0, 0, 0, 0, 0, 0, 0, 0, 0],
];

#[rustfmt::skip]
const KNIGHT_TABLE: [[i32; 9]; 10] = [
    [0, 0,  0, 0,  0, 0,  0, 0, 0],
    [0, 0,  0, 0,  0, 0,  0, 0, 0],
    [0, 0,  0, 0,  0, 0,  0, 0, 0],
    [0, 0, 20, 0,  0, 0, 20, 0, 0],
    [0, 0,  0, 0, 25, 0,  0, 0, 0],
    [0, 0,  0, 0, 25, 0,  0, 0, 0],
    [0, 0, 20, 0,  0, 0, 20, 0, 0],
    [0, 0,  0, 0,  0, 0,  0, 0, 0],
    [0, 0,  0, 0,  0, 0,  0, 0, 0],
    [0, 0,  0, 0,  0, 0,  0, 0, 0],
];

/// Returns the material value of a piece type.
pub fn piece_value(pt: PieceType) -> i32 {
    match pt {
        PieceType::King => 10000,
        PieceType::Advisor => 250,
        PieceType::Bishop => 250,
        PieceType::Knight => 450,
        PieceType::Rook => 1000,
        PieceType::Cannon => 500,
        PieceType::Pawn => 100,
    }
}

fn mobility_bonus(pt: PieceType) -> i32 {
    match pt {
        PieceType::Rook => 10,
        PieceType::Knight | PieceType::Cannon => 8,
        PieceType::Pawn => 5,
        PieceType::King | PieceType::Advisor | PieceType::Bishop => 0,
    }
}

fn square_bonus(pc: Piece, sq: Square) -> i32 {
    let table = match pc.piece_type {
        PieceType::Pawn => &PAWN_TABLE,
        PieceType::Rook => &ROOK_TABLE,
        PieceType::Knight => &KNIGHT_TABLE,
        _ => return 0,
    };

    table[sq.relative_rank(pc.color) as usize][sq.file() as usize]
}

/// Evaluates a position string.
///
/// # Examples
///
/// ```
/// use xiangqi::eval::{evaluate, TEMPO_BONUS};
///
/// assert_eq!(Ok(TEMPO_BONUS), evaluate("start w"));
/// assert_eq!(Ok(-TEMPO_BONUS), evaluate("start b"));
/// ```
pub fn evaluate(position: &str) -> Result<i32, FenError> {
    let pieces = fen::decode(position)?;
    Ok(evaluate_pieces(&pieces, fen::side_to_move(position)))
}

/// Evaluates a placement map with `side_to_move` to play.
pub fn evaluate_pieces(pieces: &Pieces, side_to_move: Color) -> i32 {
    let sign = |c: Color| if c == Color::Red { 1 } else { -1 };

    let status = rules::game_status(pieces, side_to_move);
    if status.is_over() {
        return -sign(side_to_move) * CHECKMATE_SCORE;
    }
    let checked = matches!(status, GameStatus::Check(_));

    let mut score = 0;

    for (&sq, &pc) in pieces.iter() {
        let mut value = piece_value(pc.piece_type) + square_bonus(pc, sq);

        let bonus = mobility_bonus(pc.piece_type);
        if bonus > 0 {
            value += bonus * pseudo_legal_destinations(pieces, sq).count() as i32;
        }

        if (4..=5).contains(&sq.rank()) && (3..=5).contains(&sq.file()) {
            value += CENTRAL_SQUARE_BONUS;
        }

        if sq.in_palace(pc.color.flip()) {
            value += PALACE_BONUS;
        }

        if pc.piece_type == PieceType::Pawn && !sq.is_home_side(pc.color) {
            value += RIVER_BONUS;
        }

        if pc.piece_type == PieceType::King {
            value += king_safety(pieces, sq, pc.color, checked && pc.color == side_to_move);
        }

        score += sign(pc.color) * value;
    }

    score + sign(side_to_move) * TEMPO_BONUS
}

fn king_safety(pieces: &Pieces, king: Square, color: Color, checked: bool) -> i32 {
    let (mut defenders, mut attackers) = (0, 0);

    for (&sq, pc) in pieces.iter() {
        if sq == king
            || sq.file().abs_diff(king.file()) > KING_ZONE
            || sq.rank().abs_diff(king.rank()) > KING_ZONE
        {
            continue;
        }

        if pc.color == color {
            defenders += 1;
        } else {
            attackers += 1;
        }
    }

    let mut score = defenders * DEFENDER_BONUS - attackers * ATTACKER_PENALTY;

    if checked {
        score -= CHECK_PENALTY;
    }

    if defenders < 2 || attackers > defenders {
        score -= EXPOSED_PENALTY;
    }

    score
}
