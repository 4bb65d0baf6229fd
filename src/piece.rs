use serde::{Deserialize, Serialize};
use std::fmt;

use crate::{Color, PieceType};

/// Represents a piece on the board.
///
/// A piece carries no identity besides its kind and color; where it stands
/// is implied by the key it is stored under in [`Pieces`](crate::Pieces).
///
/// # Examples
///
/// ```
/// use xiangqi::{Color, Piece, PieceType};
///
/// let red_cannon = Piece::from_fen('C').unwrap();
/// assert_eq!(PieceType::Cannon, red_cannon.piece_type);
/// assert_eq!(Color::Red, red_cannon.color);
/// assert_eq!("C", red_cannon.to_string());
/// ```
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash, Serialize, Deserialize)]
pub struct Piece {
    #[serde(rename = "role")]
    pub piece_type: PieceType,
    pub color: Color,
}

impl Piece {
    pub fn new(piece_type: PieceType, color: Color) -> Piece {
        Piece { piece_type, color }
    }

    /// Creates a new instance of `Piece` from its FEN letter.
    ///
    /// Uppercase letters are red pieces, lowercase letters are black pieces.
    pub fn from_fen(c: char) -> Option<Piece> {
        let color = if c.is_ascii_uppercase() {
            Color::Red
        } else {
            Color::Black
        };

        PieceType::from_fen(c).map(|piece_type| Piece { piece_type, color })
    }

    /// Returns the FEN letter of this piece.
    pub fn to_fen(self) -> char {
        let c = self.piece_type.to_fen();
        match self.color {
            Color::Red => c.to_ascii_uppercase(),
            Color::Black => c,
        }
    }

    /// Returns an instance which has the same type and the opposite color.
    #[must_use]
    pub fn flip(self) -> Piece {
        Piece {
            piece_type: self.piece_type,
            color: self.color.flip(),
        }
    }

    /// Returns true if this piece is owned by the given color.
    pub fn is_color(self, c: Color) -> bool {
        self.color == c
    }
}

impl fmt::Display for Piece {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.to_fen())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_fen() {
        let ok_cases = [
            ('K', PieceType::King, Color::Red),
            ('a', PieceType::Advisor, Color::Black),
            ('B', PieceType::Bishop, Color::Red),
            ('n', PieceType::Knight, Color::Black),
            ('R', PieceType::Rook, Color::Red),
            ('c', PieceType::Cannon, Color::Black),
            ('P', PieceType::Pawn, Color::Red),
        ];

        for case in ok_cases.iter() {
            let pc = Piece::from_fen(case.0).unwrap();
            assert_eq!(case.1, pc.piece_type);
            assert_eq!(case.2, pc.color);
            assert_eq!(case.0, pc.to_fen());
        }

        assert!(Piece::from_fen('x').is_none());
        assert!(Piece::from_fen('3').is_none());
    }

    #[test]
    fn flip() {
        let pc = Piece::new(PieceType::Rook, Color::Red);
        assert_eq!(Piece::new(PieceType::Rook, Color::Black), pc.flip());
        assert_eq!(pc, pc.flip().flip());
    }

    #[test]
    fn serde_shape() {
        let pc = Piece::new(PieceType::Knight, Color::Black);
        let json = serde_json::to_string(&pc).unwrap();
        assert_eq!(r#"{"role":"knight","color":"black"}"#, json);
        assert_eq!(pc, serde_json::from_str::<Piece>(&json).unwrap());
    }
}
