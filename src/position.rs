use std::fmt;

use log::debug;

use crate::error::{FenError, MoveError};
use crate::rules::{self, GameStatus};
use crate::square::{Square, NUM_FILES, NUM_RANKS};
use crate::{fen, Color, Move, Piece, Pieces};

/// MoveRecord stores information necessary to undo the move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveRecord {
    pub from: Square,
    pub to: Square,
    pub moved: Piece,
    pub captured: Option<Piece>,
}

impl MoveRecord {
    /// Returns the move in ICCS notation.
    pub fn to_iccs(&self) -> String {
        Move::Normal {
            from: self.from,
            to: self.to,
        }
        .to_string()
    }
}

impl PartialEq<Move> for MoveRecord {
    fn eq(&self, other: &Move) -> bool {
        match *other {
            Move::Normal { from, to } => self.from == from && self.to == to,
            Move::Drop { .. } => false,
        }
    }
}

/// Represents a state of the game.
///
/// This is the piece a server uses to authorise a claimed move before
/// persisting the resulting position string.
///
/// # Examples
///
/// ```
/// use xiangqi::{Move, Position};
/// use xiangqi::square::consts::*;
///
/// let mut pos = Position::from_fen("start w").unwrap();
///
/// pos.make_move(Move::Normal { from: SQ_H2, to: SQ_E2 }).unwrap();
///
/// assert_eq!(
///     "rnbakabnr/9/1c5c1/p1p1p1p1p/9/9/P1P1P1P1P/1C2C4/9/RNBAKABNR b - - 0 1",
///     pos.to_fen()
/// );
/// ```
#[derive(Debug, Clone, Default)]
pub struct Position {
    pieces: Pieces,
    side_to_move: Color,
    move_history: Vec<MoveRecord>,
}

/////////////////////////////////////////////////////////////////////////////
// Type implementation
/////////////////////////////////////////////////////////////////////////////

impl Position {
    /// Creates a position from a FEN string.
    pub fn from_fen(s: &str) -> Result<Position, FenError> {
        Ok(Position {
            pieces: fen::decode(s)?,
            side_to_move: fen::side_to_move(s),
            move_history: Vec::new(),
        })
    }

    /// Creates a position from a placement map and the side to move.
    pub fn from_pieces(pieces: Pieces, side_to_move: Color) -> Position {
        Position {
            pieces,
            side_to_move,
            move_history: Vec::new(),
        }
    }

    /// Serializes the position.
    pub fn to_fen(&self) -> String {
        fen::encode(&self.pieces, self.side_to_move)
    }

    /////////////////////////////////////////////////////////////////////////
    // Accessors
    /////////////////////////////////////////////////////////////////////////

    /// Returns a piece at the given square.
    pub fn piece_at(&self, sq: Square) -> Option<Piece> {
        self.pieces.get(&sq).copied()
    }

    /// Returns the placement map.
    pub fn pieces(&self) -> &Pieces {
        &self.pieces
    }

    /// Returns the side to make a move next.
    pub fn side_to_move(&self) -> Color {
        self.side_to_move
    }

    /// Returns the number of plies made since the position was loaded.
    pub fn ply(&self) -> usize {
        self.move_history.len()
    }

    /// Returns a history of all moves made since the position was loaded.
    pub fn move_history(&self) -> &[MoveRecord] {
        &self.move_history
    }

    /////////////////////////////////////////////////////////////////////////
    // Rules
    /////////////////////////////////////////////////////////////////////////

    /// Returns true if the side to move is in check.
    pub fn in_check(&self) -> bool {
        rules::in_check(&self.pieces, self.side_to_move)
    }

    /// Returns every legal move of the side to move.
    pub fn legal_moves(&self) -> Vec<Move> {
        rules::legal_moves_for(&self.pieces, self.side_to_move)
    }

    /// Returns true if the side to move may play the given move.
    pub fn is_legal_move(&self, m: &Move) -> bool {
        self.validate(m).is_ok()
    }

    /// Returns the status of the game for the side to move.
    pub fn game_status(&self) -> GameStatus {
        rules::game_status(&self.pieces, self.side_to_move)
    }

    /////////////////////////////////////////////////////////////////////////
    // Making a move
    /////////////////////////////////////////////////////////////////////////

    /// Makes the given move. Returns `Err` if the move is not legal for the side to move.
    pub fn make_move(&mut self, m: Move) -> Result<(), MoveError> {
        let (from, to, moved) = self.validate(&m).map_err(|e| {
            debug!("move {m} rejected: {e}");
            e
        })?;
        let captured = self.pieces.insert(to, moved);
        self.pieces.remove(&from);

        self.move_history.push(MoveRecord {
            from,
            to,
            moved,
            captured,
        });
        self.side_to_move = self.side_to_move.flip();

        Ok(())
    }

    /// Undoes the last move.
    pub fn unmake_move(&mut self) -> Result<(), MoveError> {
        let last = *self.move_history.last().ok_or(MoveError::Inconsistent)?;

        if self.pieces.contains_key(&last.from) || self.piece_at(last.to) != Some(last.moved) {
            return Err(MoveError::Inconsistent);
        }

        self.move_history.pop();
        self.pieces.insert(last.from, last.moved);
        match last.captured {
            Some(pc) => self.pieces.insert(last.to, pc),
            None => self.pieces.remove(&last.to),
        };
        self.side_to_move = self.side_to_move.flip();

        Ok(())
    }

    fn validate(&self, m: &Move) -> Result<(Square, Square, Piece), MoveError> {
        let (from, to) = match *m {
            Move::Normal { from, to } => (from, to),
            Move::Drop { .. } => return Err(MoveError::DropsNotAllowed),
        };

        let moved = self.piece_at(from).ok_or(MoveError::NoPieceAtOrigin(from))?;

        if moved.color != self.side_to_move {
            return Err(MoveError::NotYourTurn);
        }

        if !rules::is_legal_move(&self.pieces, from, to) {
            return Err(MoveError::IllegalMove(*m));
        }

        Ok((from, to, moved))
    }
}

/////////////////////////////////////////////////////////////////////////////
// Trait implementations
/////////////////////////////////////////////////////////////////////////////

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for rank in (0..NUM_RANKS).rev() {
            write!(f, "{rank} ")?;
            for file in 0..NUM_FILES {
                match Square::new(file, rank).and_then(|sq| self.piece_at(sq)) {
                    Some(pc) => write!(f, " {pc}")?,
                    None => write!(f, " .")?,
                }
            }
            writeln!(f)?;
        }

        writeln!(f, "   a b c d e f g h i")?;
        write!(f, "Side to move: {}", self.side_to_move)
    }
}
