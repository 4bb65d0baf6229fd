//! A library for implementing Xiangqi (Chinese Chess) applications.
//!
//! `xiangqi` provides types and rules for representing a game of Xiangqi, a
//! codec for the FEN-like position strings stored by game servers, and the
//! interaction state machine behind an interactive board (selection, drag,
//! premoves, animation and redraw scheduling).
//!
//! # Module Organization
//!
//! - **Value types**: [`Color`], [`Square`], [`Bitboard`], [`PieceType`], [`Piece`], [`Move`]
//! - **[`fen`]**: position string codec
//! - **[`movegen`]**: per-piece movement predicates and pseudo-legal destinations
//! - **[`rules`]**: check, checkmate, the facing generals rule and legal move filtering
//! - **[`position`]**: a position with a move history, for authorising moves server side
//! - **[`eval`]**: static evaluation
//! - **[`board`]**: the board interaction state machine and its rendering adapter
//!
//! # Examples
//!
//! ```
//! use xiangqi::{fen, rules, Move, Position};
//! use xiangqi::square::consts::*;
//!
//! // Position can be created from a position string.
//! let mut pos = Position::from_fen("rnbakabnr/9/1c5c1/p1p1p1p1p/9/9/P1P1P1P1P/1C5C1/9/RNBAKABNR w - - 0 1").unwrap();
//!
//! // You can programatically create a Move instance.
//! pos.make_move(Move::Normal { from: SQ_H2, to: SQ_E2 }).unwrap();
//!
//! // Move can be parsed from ICCS coordinates as well.
//! pos.make_move("h9g7".parse().unwrap()).unwrap();
//!
//! // Position can be converted back to a position string.
//! assert_eq!("rnbakab1r/9/1c4nc1/p1p1p1p1p/9/9/P1P1P1P1P/1C2C4/9/RNBAKABNR w - - 0 1", pos.to_fen());
//!
//! // The rule functions work on the placement map directly.
//! let pieces = fen::decode(&pos.to_fen()).unwrap();
//! assert!(!rules::in_check(&pieces, pos.side_to_move()));
//! ```

use rustc_hash::FxHashMap;

pub mod bitboard;
pub mod board;
pub mod color;
pub mod error;
pub mod eval;
pub mod fen;
pub mod movegen;
pub mod moves;
pub mod piece;
pub mod piece_type;
pub mod position;
pub mod rules;
pub mod square;

pub use self::bitboard::Bitboard;
pub use self::board::Board;
pub use self::color::Color;
pub use self::error::{FenError, MoveError, ParseMoveError, ParseSquareError};
pub use self::moves::Move;
pub use self::piece::Piece;
pub use self::piece_type::PieceType;
pub use self::position::{MoveRecord, Position};
pub use self::rules::GameStatus;
pub use self::square::Square;

/// The piece-placement map: at most one piece per square.
pub type Pieces = FxHashMap<Square, Piece>;
