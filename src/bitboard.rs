use std::fmt;
use std::iter;
use std::ops;

use crate::square::{Square, NUM_FILES, NUM_RANKS};

/// Represents a board state in which each square takes two possible values, filled or empty.
///
/// The 90 intersections fit into a single `u128`, indexed by [`Square::index`].
///
/// # Examples
///
/// ```
/// use xiangqi::Bitboard;
/// use xiangqi::square::consts::*;
///
/// let mut bb = Bitboard::empty();
/// bb ^= SQ_A0;
/// bb |= SQ_I9;
///
/// assert_eq!(2, bb.count());
/// assert_eq!(1, bb.filter(|sq| sq.file() == 0).count());
/// ```
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Bitboard {
    p: u128,
}

/////////////////////////////////////////////////////////////////////////////
// Type implementation
/////////////////////////////////////////////////////////////////////////////

impl Bitboard {
    /// Returns an empty instance of `Bitboard`.
    #[inline(always)]
    pub fn empty() -> Bitboard {
        Bitboard { p: 0 }
    }

    /// Creates a bitboard with a single square set.
    #[inline(always)]
    pub fn from_square(sq: Square) -> Bitboard {
        Bitboard {
            p: 1u128 << sq.index(),
        }
    }

    /// Checks if any of its squares is filled.
    #[inline(always)]
    pub fn is_any(&self) -> bool {
        self.p != 0
    }

    /// Checks if all of its squares are empty.
    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.p == 0
    }

    /// Checks if the given square is set.
    #[inline(always)]
    pub fn contains(&self, sq: Square) -> bool {
        self.p & (1u128 << sq.index()) != 0
    }

    /// Sets the given square.
    #[inline(always)]
    pub fn set_at(&mut self, sq: Square) {
        self.p |= 1u128 << sq.index();
    }

    /// Sets the given square as empty.
    #[inline(always)]
    pub fn clear_at(&mut self, sq: Square) {
        self.p &= !(1u128 << sq.index());
    }

    /// Returns the number of squares filled.
    #[inline(always)]
    pub fn count(&self) -> u32 {
        self.p.count_ones()
    }

    /// Sets the lowest filled square as empty and returns that square.
    #[inline(always)]
    pub fn pop(&mut self) -> Option<Square> {
        if self.p == 0 {
            return None;
        }

        let sq = Square::from_index(self.p.trailing_zeros() as u8);
        self.p &= self.p - 1;
        sq
    }
}

/////////////////////////////////////////////////////////////////////////////
// Operator implementations
/////////////////////////////////////////////////////////////////////////////

impl<'a, 'b> ops::BitAnd<&'a Bitboard> for &'b Bitboard {
    type Output = Bitboard;

    #[inline(always)]
    fn bitand(self, rhs: &'a Bitboard) -> Bitboard {
        Bitboard { p: self.p & rhs.p }
    }
}

impl<'a> ops::BitAndAssign<&'a Bitboard> for Bitboard {
    #[inline(always)]
    fn bitand_assign(&mut self, rhs: &'a Bitboard) {
        self.p &= rhs.p;
    }
}

impl<'a, 'b> ops::BitOr<&'a Bitboard> for &'b Bitboard {
    type Output = Bitboard;

    #[inline(always)]
    fn bitor(self, rhs: &'a Bitboard) -> Bitboard {
        Bitboard { p: self.p | rhs.p }
    }
}

impl<'a> ops::BitOrAssign<&'a Bitboard> for Bitboard {
    #[inline(always)]
    fn bitor_assign(&mut self, rhs: &'a Bitboard) {
        self.p |= rhs.p;
    }
}

impl<'a> ops::BitXorAssign<&'a Bitboard> for Bitboard {
    #[inline(always)]
    fn bitxor_assign(&mut self, rhs: &'a Bitboard) {
        self.p ^= rhs.p;
    }
}

impl ops::BitOrAssign<Square> for Bitboard {
    #[inline(always)]
    fn bitor_assign(&mut self, rhs: Square) {
        self.set_at(rhs)
    }
}

impl ops::BitXorAssign<Square> for Bitboard {
    #[inline(always)]
    fn bitxor_assign(&mut self, rhs: Square) {
        *self ^= &Bitboard::from_square(rhs)
    }
}

/////////////////////////////////////////////////////////////////////////////
// Trait implementation
/////////////////////////////////////////////////////////////////////////////

impl iter::FromIterator<Square> for Bitboard {
    fn from_iter<I: IntoIterator<Item = Square>>(iter: I) -> Bitboard {
        let mut bb = Bitboard::empty();
        for sq in iter {
            bb.set_at(sq);
        }
        bb
    }
}

impl fmt::Display for Bitboard {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "  ")?;
        for file in 0..NUM_FILES {
            write!(f, " {} ", (b'a' + file) as char)?;
        }
        writeln!(f)?;

        for rank in (0..NUM_RANKS).rev() {
            write!(f, "{rank} ")?;
            for file in 0..NUM_FILES {
                let filled = Square::new(file, rank).map_or(false, |sq| self.contains(sq));
                write!(f, " {} ", if filled { "X" } else { "." })?;
            }
            writeln!(f)?;
        }

        Ok(())
    }
}

impl iter::Iterator for Bitboard {
    type Item = Square;

    #[inline(always)]
    fn next(&mut self) -> Option<Self::Item> {
        self.pop()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::square::consts::*;

    #[test]
    fn empty_bitboard() {
        let bb = Bitboard::empty();
        assert!(bb.is_empty());
        assert!(!bb.is_any());
        assert_eq!(0, bb.count());
    }

    #[test]
    fn set_and_clear() {
        let mut bb = Bitboard::empty();

        bb.set_at(SQ_I9);
        assert!(bb.contains(SQ_I9));
        assert!(!bb.contains(SQ_A0));
        assert_eq!(1, bb.count());

        bb.clear_at(SQ_I9);
        assert!(bb.is_empty());
    }

    #[test]
    fn bitwise_operations() {
        let bb1 = Bitboard::from_square(SQ_A0);
        let bb2: Bitboard = [SQ_A0, SQ_E5].into_iter().collect();

        assert_eq!(2, (&bb1 | &bb2).count());
        assert_eq!(1, (&bb1 & &bb2).count());

        let mut bb3 = bb2;
        bb3 ^= SQ_A0;
        assert_eq!(vec![SQ_E5], bb3.collect::<Vec<_>>());
    }

    #[test]
    fn iterator_is_ordered_by_index() {
        let bb: Bitboard = [SQ_I9, SQ_A0, SQ_E4].into_iter().collect();
        assert_eq!(vec![SQ_A0, SQ_E4, SQ_I9], bb.collect::<Vec<_>>());
    }
}
