//! Error types of the crate.

use thiserror::Error;

use crate::{Move, Square};

/// Represents an error occurred while parsing a FEN string.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FenError {
    #[error("the position string is empty")]
    Empty,

    #[error("the board has more than 10 ranks")]
    TooManyRanks,

    #[error("the board has fewer than 10 ranks")]
    TooFewRanks,

    /// A rank describes more than 9 files. `rank` is the board rank, 9 being black's back rank.
    #[error("rank {rank} describes more than 9 files")]
    RankOverflow { rank: u8 },

    #[error("rank {rank} describes fewer than 9 files")]
    RankUnderflow { rank: u8 },

    #[error("illegal piece letter: {0:?}")]
    IllegalPiece(char),
}

/// Represents an error occurred while applying a move to a [`Position`](crate::Position).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MoveError {
    #[error("no piece stands on {0}")]
    NoPieceAtOrigin(Square),

    #[error("the piece does not belong to the side to move")]
    NotYourTurn,

    #[error("illegal move: {0}")]
    IllegalMove(Move),

    #[error("drops are not part of xiangqi play")]
    DropsNotAllowed,

    #[error("the move history is inconsistent with the position")]
    Inconsistent,
}

/// The given string is not a square in `"e5"` notation.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("invalid square: {0:?}")]
pub struct ParseSquareError(pub String);

/// The given string is not a move in ICCS coordinate notation.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("invalid move notation: {0:?}")]
pub struct ParseMoveError(pub String);
