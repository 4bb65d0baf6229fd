use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter;

/// Represents a kind of pieces.
///
/// Serialized with the role names used by board front-ends (`"king"`, `"bishop"`, ...).
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PieceType {
    /// General.
    King,
    Advisor,
    /// Elephant.
    Bishop,
    /// Horse.
    Knight,
    /// Chariot.
    Rook,
    Cannon,
    /// Soldier.
    Pawn,
}

impl PieceType {
    /// Returns an iterator over all variants.
    pub fn iter() -> PieceTypeIter {
        PieceTypeIter {
            current: Some(PieceType::King),
        }
    }

    /// Creates a new instance of `PieceType` from its FEN letter.
    ///
    /// The letter is case-insensitive; the case only carries the color.
    ///
    /// # Examples
    ///
    /// ```
    /// use xiangqi::PieceType;
    ///
    /// assert_eq!(Some(PieceType::Cannon), PieceType::from_fen('c'));
    /// assert_eq!(Some(PieceType::Cannon), PieceType::from_fen('C'));
    /// assert_eq!(None, PieceType::from_fen('x'));
    /// ```
    pub fn from_fen(c: char) -> Option<PieceType> {
        Some(match c.to_ascii_lowercase() {
            'k' => PieceType::King,
            'a' => PieceType::Advisor,
            'b' => PieceType::Bishop,
            'n' => PieceType::Knight,
            'r' => PieceType::Rook,
            'c' => PieceType::Cannon,
            'p' => PieceType::Pawn,
            _ => return None,
        })
    }

    /// Returns the lowercase FEN letter of this piece type.
    pub fn to_fen(self) -> char {
        match self {
            PieceType::King => 'k',
            PieceType::Advisor => 'a',
            PieceType::Bishop => 'b',
            PieceType::Knight => 'n',
            PieceType::Rook => 'r',
            PieceType::Cannon => 'c',
            PieceType::Pawn => 'p',
        }
    }

    /// Returns the role name used by board front-ends.
    pub fn name(self) -> &'static str {
        match self {
            PieceType::King => "king",
            PieceType::Advisor => "advisor",
            PieceType::Bishop => "bishop",
            PieceType::Knight => "knight",
            PieceType::Rook => "rook",
            PieceType::Cannon => "cannon",
            PieceType::Pawn => "pawn",
        }
    }

    /// Converts the instance into the unique number for array indexing purpose.
    #[inline(always)]
    pub fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for PieceType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// This struct is created by the [`iter`] method on [`PieceType`].
///
/// [`iter`]: ./enum.PieceType.html#method.iter
/// [`PieceType`]: enum.PieceType.html
pub struct PieceTypeIter {
    current: Option<PieceType>,
}

impl iter::Iterator for PieceTypeIter {
    type Item = PieceType;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.current;

        if let Some(current) = self.current {
            self.current = match current {
                PieceType::King => Some(PieceType::Advisor),
                PieceType::Advisor => Some(PieceType::Bishop),
                PieceType::Bishop => Some(PieceType::Knight),
                PieceType::Knight => Some(PieceType::Rook),
                PieceType::Rook => Some(PieceType::Cannon),
                PieceType::Cannon => Some(PieceType::Pawn),
                PieceType::Pawn => None,
            };
        }

        current
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fen_letters() {
        for pt in PieceType::iter() {
            assert_eq!(Some(pt), PieceType::from_fen(pt.to_fen()));
            assert_eq!(
                Some(pt),
                PieceType::from_fen(pt.to_fen().to_ascii_uppercase())
            );
        }

        for c in ['e', 'h', 'g', 'l', '1', '/'] {
            assert!(PieceType::from_fen(c).is_none(), "{c} should be rejected");
        }
    }

    #[test]
    fn iter_and_index() {
        let all: Vec<_> = PieceType::iter().collect();
        assert_eq!(7, all.len());
        for (i, pt) in all.iter().enumerate() {
            assert_eq!(i, pt.index());
        }
    }

    #[test]
    fn display_uses_role_name() {
        assert_eq!("bishop", PieceType::Bishop.to_string());
        assert_eq!("cannon", PieceType::Cannon.to_string());
    }
}
