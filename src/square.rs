use crate::Color;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter;
use std::str::FromStr;

use crate::error::ParseSquareError;

const ASCII_0: u8 = b'0';
const ASCII_LOWER_A: u8 = b'a';

/// Number of files (columns) on the board.
pub const NUM_FILES: u8 = 9;

/// Number of ranks (rows) on the board.
pub const NUM_RANKS: u8 = 10;

/// Represents one of the 90 intersections of the board.
///
/// Files are lettered `a` to `i` from red's left, ranks are numbered `0` to `9`
/// starting at red's back rank.
///
/// # Examples
///
/// ```
/// use xiangqi::Square;
///
/// let sq = Square::new(4, 5).unwrap();
/// assert_eq!("e5", sq.to_string());
/// ```
///
/// `Square` can be created by parsing its notation as well.
///
/// ```
/// use xiangqi::Square;
///
/// let sq: Square = "e5".parse().unwrap();
/// assert_eq!(4, sq.file());
/// assert_eq!(5, sq.rank());
/// ```
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Clone, Copy, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Square {
    inner: u8,
}

impl Square {
    /// The total number of squares on the board.
    pub const NUM_SQUARES: usize = (NUM_FILES as usize) * (NUM_RANKS as usize);

    /// Creates a new instance of `Square`.
    ///
    /// `file` can take a value from 0 to 8, while `rank` is from 0 to 9.
    pub fn new(file: u8, rank: u8) -> Option<Square> {
        if file >= NUM_FILES || rank >= NUM_RANKS {
            return None;
        }

        Some(Square {
            inner: file * NUM_RANKS + rank,
        })
    }

    /// Creates a new instance of `Square` from its notation, e.g. `"e5"`.
    pub fn from_notation(s: &str) -> Option<Square> {
        let bytes: &[u8] = s.as_bytes();

        if bytes.len() != 2 {
            return None;
        }

        let file = bytes[0].checked_sub(ASCII_LOWER_A)?;
        let rank = bytes[1].checked_sub(ASCII_0)?;

        Square::new(file, rank)
    }

    /// Creates a new instance of `Square` with the given index value.
    pub fn from_index(index: u8) -> Option<Square> {
        if index as usize >= Square::NUM_SQUARES {
            return None;
        }

        Some(Square { inner: index })
    }

    /// Returns an iterator of all squares on the board.
    pub fn iter() -> SquareIter {
        SquareIter { current: 0 }
    }

    /// Returns the file (column) of the square, 0 for `a`.
    pub fn file(self) -> u8 {
        self.inner / NUM_RANKS
    }

    /// Returns the rank (row) of the square, 0 for red's back rank.
    pub fn rank(self) -> u8 {
        self.inner % NUM_RANKS
    }

    /// Returns both file and rank as a tuple.
    #[inline(always)]
    pub fn coordinates(self) -> (u8, u8) {
        (self.file(), self.rank())
    }

    /// Returns a new `Square` instance by moving the file and the rank values.
    ///
    /// # Examples
    ///
    /// ```
    /// use xiangqi::square::consts::*;
    ///
    /// let shifted = SQ_B2.shift(2, 3).unwrap();
    ///
    /// assert_eq!(3, shifted.file());
    /// assert_eq!(5, shifted.rank());
    /// assert!(SQ_A0.shift(-1, 0).is_none());
    /// ```
    #[must_use]
    pub fn shift(self, df: i8, dr: i8) -> Option<Square> {
        let f = self.file() as i8 + df;
        let r = self.rank() as i8 + dr;

        if !(0..NUM_FILES as i8).contains(&f) || !(0..NUM_RANKS as i8).contains(&r) {
            return None;
        }

        Square::new(f as u8, r as u8)
    }

    /// Returns a relative rank as if the specified color is red.
    ///
    /// # Examples
    ///
    /// ```
    /// use xiangqi::Color;
    /// use xiangqi::square::consts::*;
    ///
    /// assert_eq!(2, SQ_E2.relative_rank(Color::Red));
    /// assert_eq!(7, SQ_E2.relative_rank(Color::Black));
    /// ```
    pub fn relative_rank(self, c: Color) -> u8 {
        if c == Color::Red {
            self.rank()
        } else {
            NUM_RANKS - 1 - self.rank()
        }
    }

    /// Returns true if the square lies on the given color's half of the river.
    pub fn is_home_side(self, c: Color) -> bool {
        self.relative_rank(c) <= 4
    }

    /// Returns true if the square lies inside the given color's palace.
    pub fn in_palace(self, c: Color) -> bool {
        (3..=5).contains(&self.file()) && self.relative_rank(c) <= 2
    }

    /// Converts the instance into the unique number for array indexing purpose.
    #[inline(always)]
    pub fn index(self) -> usize {
        self.inner as usize
    }

    /// Returns the file as a letter, `a` to `i`.
    pub fn file_char(self) -> char {
        (self.file() + ASCII_LOWER_A) as char
    }

    /// Returns the rank as a digit, `0` to `9`.
    pub fn rank_char(self) -> char {
        (self.rank() + ASCII_0) as char
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter) -> Result<(), fmt::Error> {
        write!(f, "{}{}", self.file_char(), self.rank_char())
    }
}

impl FromStr for Square {
    type Err = ParseSquareError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Square::from_notation(s).ok_or_else(|| ParseSquareError(s.to_string()))
    }
}

impl TryFrom<String> for Square {
    type Error = ParseSquareError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<Square> for String {
    fn from(sq: Square) -> String {
        sq.to_string()
    }
}

/// Square constants, named after their notation.
pub mod consts {
    use super::Square;

    macro_rules! make_square {
        {0, $t:ident $($ts:ident)+} => {
            pub const $t: Square = Square { inner: 0 };
            make_square!{1, $($ts)*}
        };
        {$n:expr, $t:ident $($ts:ident)+} => {
            pub const $t: Square = Square { inner: $n };
            make_square!{($n + 1), $($ts)*}
        };
        {$n:expr, $t:ident} => {
            pub const $t: Square = Square { inner: $n };
        };
    }

    make_square! {0, SQ_A0 SQ_A1 SQ_A2 SQ_A3 SQ_A4 SQ_A5 SQ_A6 SQ_A7 SQ_A8 SQ_A9
    SQ_B0 SQ_B1 SQ_B2 SQ_B3 SQ_B4 SQ_B5 SQ_B6 SQ_B7 SQ_B8 SQ_B9
    SQ_C0 SQ_C1 SQ_C2 SQ_C3 SQ_C4 SQ_C5 SQ_C6 SQ_C7 SQ_C8 SQ_C9
    SQ_D0 SQ_D1 SQ_D2 SQ_D3 SQ_D4 SQ_D5 SQ_D6 SQ_D7 SQ_D8 SQ_D9
    SQ_E0 SQ_E1 SQ_E2 SQ_E3 SQ_E4 SQ_E5 SQ_E6 SQ_E7 SQ_E8 SQ_E9
    SQ_F0 SQ_F1 SQ_F2 SQ_F3 SQ_F4 SQ_F5 SQ_F6 SQ_F7 SQ_F8 SQ_F9
    SQ_G0 SQ_G1 SQ_G2 SQ_G3 SQ_G4 SQ_G5 SQ_G6 SQ_G7 SQ_G8 SQ_G9
    SQ_H0 SQ_H1 SQ_H2 SQ_H3 SQ_H4 SQ_H5 SQ_H6 SQ_H7 SQ_H8 SQ_H9
    SQ_I0 SQ_I1 SQ_I2 SQ_I3 SQ_I4 SQ_I5 SQ_I6 SQ_I7 SQ_I8 SQ_I9}
}

/// This struct is created by the [`iter`] method on [`Square`].
///
/// [`iter`]: ./struct.Square.html#method.iter
/// [`Square`]: struct.Square.html
pub struct SquareIter {
    current: u8,
}

impl iter::Iterator for SquareIter {
    type Item = Square;

    fn next(&mut self) -> Option<Self::Item> {
        let cur = self.current;

        if cur as usize >= Square::NUM_SQUARES {
            return None;
        }

        self.current += 1;

        Some(Square { inner: cur })
    }
}
