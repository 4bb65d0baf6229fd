use std::fmt;
use std::str::FromStr;

use crate::error::ParseMoveError;
use crate::square::Square;
use crate::Piece;

/// Represents a move which either is a normal move or a drop move.
///
/// Drops never occur in a game of xiangqi; they exist for board-editor tooling
/// where a new piece is put onto the board.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum Move {
    Normal { from: Square, to: Square },
    Drop { to: Square, piece: Piece },
}

impl Move {
    /// Creates a new instance of `Move` from ICCS coordinate notation.
    ///
    /// Normal moves are written as origin and destination (`"h2e2"`), drops as
    /// the piece letter, an asterisk and the destination (`"C*e4"`, uppercase
    /// for red).
    pub fn from_iccs(s: &str) -> Option<Move> {
        if !s.is_ascii() || s.len() != 4 {
            return None;
        }

        let (head, tail) = s.split_at(2);

        if let Some(letter) = head.strip_suffix('*') {
            let piece = letter.chars().next().and_then(Piece::from_fen)?;
            let to = Square::from_notation(tail)?;
            return Some(Move::Drop { to, piece });
        }

        let from = Square::from_notation(head)?;
        let to = Square::from_notation(tail)?;
        Some(Move::Normal { from, to })
    }

    /// Returns the destination square.
    pub fn to(&self) -> Square {
        match *self {
            Move::Normal { to, .. } | Move::Drop { to, .. } => to,
        }
    }

    /// Returns the origin square, `None` for drops.
    pub fn from(&self) -> Option<Square> {
        match *self {
            Move::Normal { from, .. } => Some(from),
            Move::Drop { .. } => None,
        }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter) -> Result<(), fmt::Error> {
        match *self {
            Move::Normal { from, to } => write!(f, "{from}{to}"),
            Move::Drop { to, piece } => write!(f, "{piece}*{to}"),
        }
    }
}

impl FromStr for Move {
    type Err = ParseMoveError;

    /// Parses a move from ICCS notation.
    ///
    /// # Examples
    ///
    /// ```
    /// use xiangqi::Move;
    /// use xiangqi::square::consts::*;
    ///
    /// let mv: Move = "h2e2".parse().unwrap();
    /// assert_eq!(Move::Normal { from: SQ_H2, to: SQ_E2 }, mv);
    /// assert!("h2e".parse::<Move>().is_err());
    /// ```
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Move::from_iccs(s).ok_or_else(|| ParseMoveError(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::square::consts::*;
    use crate::{Color, PieceType};

    #[test]
    fn from_iccs() {
        let ok_cases = [
            ("h2e2", Move::Normal { from: SQ_H2, to: SQ_E2 }),
            ("a0i9", Move::Normal { from: SQ_A0, to: SQ_I9 }),
            (
                "C*e4",
                Move::Drop {
                    to: SQ_E4,
                    piece: Piece::new(PieceType::Cannon, Color::Red),
                },
            ),
            (
                "p*a6",
                Move::Drop {
                    to: SQ_A6,
                    piece: Piece::new(PieceType::Pawn, Color::Black),
                },
            ),
        ];
        let ng_cases = [
            "", "h2e", "h2e10", "j2e2", "h2e2+", "Z*e4", "C+e4", "C*j4", "h2 e2", "一二三四",
        ];

        for (i, case) in ok_cases.iter().enumerate() {
            let m = Move::from_iccs(case.0);
            assert_eq!(Some(case.1), m, "failed at #{i}");
        }

        for (i, case) in ng_cases.iter().enumerate() {
            assert!(Move::from_iccs(case).is_none(), "failed at #{i}");
        }
    }

    #[test]
    fn to_iccs() {
        let cases = [
            ("h2e2", Move::Normal { from: SQ_H2, to: SQ_E2 }),
            (
                "N*c7",
                Move::Drop {
                    to: SQ_C7,
                    piece: Piece::new(PieceType::Knight, Color::Red),
                },
            ),
        ];

        for (i, case) in cases.iter().enumerate() {
            assert_eq!(case.0, case.1.to_string(), "failed at #{i}");
        }
    }

    #[test]
    fn endpoints() {
        let mv = Move::Normal { from: SQ_B0, to: SQ_C2 };
        assert_eq!(Some(SQ_B0), mv.from());
        assert_eq!(SQ_C2, mv.to());

        let drop = Move::Drop {
            to: SQ_E4,
            piece: Piece::new(PieceType::Rook, Color::Black),
        };
        assert_eq!(None, drop.from());
        assert_eq!(SQ_E4, drop.to());
    }
}
