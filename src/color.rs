//! Color type representing each player side.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter;

/// Represents each side of player. Red moves first.
///
/// # Examples
///
/// ```
/// use xiangqi::Color;
///
/// let c = Color::Red;
/// match c {
///    Color::Red => assert!(true),
///    Color::Black => unreachable!(),
/// }
/// ```
#[derive(Debug, Default, PartialEq, Eq, Clone, Copy, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Color {
    #[default]
    Red,
    Black,
}

impl Color {
    /// Returns an iterator of all variants.
    pub fn iter() -> ColorIter {
        ColorIter { current: Some(Color::Red) }
    }

    /// Returns the color of the opposite side.
    ///
    /// # Examples
    ///
    /// ```
    /// use xiangqi::Color;
    ///
    /// assert_eq!(Color::Red, Color::Black.flip());
    /// assert_eq!(Color::Black, Color::Red.flip());
    /// ```
    #[must_use]
    pub fn flip(self) -> Color {
        match self {
            Color::Red => Color::Black,
            Color::Black => Color::Red,
        }
    }

    /// Converts the instance into the unique number for array indexing purpose.
    #[inline(always)]
    pub fn index(self) -> usize {
        self as usize
    }

    /// Returns the side-to-move letter used by the FEN format (`w` for red, `b` for black).
    pub fn to_fen(self) -> char {
        match self {
            Color::Red => 'w',
            Color::Black => 'b',
        }
    }

    /// Parses the side-to-move field of a FEN string.
    ///
    /// Only `"w"` denotes red; every other value is read as black.
    pub fn from_fen(s: &str) -> Color {
        if s == "w" {
            Color::Red
        } else {
            Color::Black
        }
    }

    /// The forward direction along the ranks for pieces of this color.
    pub(crate) fn forward(self) -> i8 {
        match self {
            Color::Red => 1,
            Color::Black => -1,
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Color::Red => write!(f, "red"),
            Color::Black => write!(f, "black"),
        }
    }
}

/// This struct is created by the [`iter`] method on [`Color`].
///
/// [`iter`]: ./enum.Color.html#method.iter
/// [`Color`]: enum.Color.html
pub struct ColorIter {
    current: Option<Color>,
}

impl iter::Iterator for ColorIter {
    type Item = Color;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.current;

        if let Some(current) = self.current {
            self.current = match current {
                Color::Red => Some(Color::Black),
                Color::Black => None,
            }
        }

        current
    }
}
