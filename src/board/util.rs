//! Geometry helpers mapping pointer positions to squares and back.

use serde::{Deserialize, Serialize};

use crate::square::{Square, NUM_FILES, NUM_RANKS};

/// A position in the host's coordinate space, as `(x, y)`.
pub type Pos = (f64, f64);

/// The rectangle the board occupies, in the same coordinate space as pointer positions.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl Bounds {
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Bounds {
        Bounds {
            left,
            top,
            width,
            height,
        }
    }

    fn square_width(&self) -> f64 {
        self.width / f64::from(NUM_FILES)
    }

    fn square_height(&self) -> f64 {
        self.height / f64::from(NUM_RANKS)
    }
}

impl Default for Bounds {
    fn default() -> Bounds {
        Bounds::new(0.0, 0.0, 540.0, 600.0)
    }
}

/// Returns the square under `pos`, or `None` outside the board.
///
/// With `as_red` the red back rank is drawn at the bottom.
///
/// # Examples
///
/// ```
/// use xiangqi::board::util::{key_at_pos, Bounds};
/// use xiangqi::square::consts::*;
///
/// let bounds = Bounds::new(0.0, 0.0, 90.0, 100.0);
/// assert_eq!(Some(SQ_A0), key_at_pos((5.0, 95.0), true, &bounds));
/// assert_eq!(Some(SQ_I9), key_at_pos((5.0, 95.0), false, &bounds));
/// assert_eq!(None, key_at_pos((95.0, 5.0), true, &bounds));
/// ```
pub fn key_at_pos(pos: Pos, as_red: bool, bounds: &Bounds) -> Option<Square> {
    if bounds.width <= 0.0 || bounds.height <= 0.0 {
        return None;
    }

    let file = ((pos.0 - bounds.left) / bounds.square_width()).floor();
    let row = ((pos.1 - bounds.top) / bounds.square_height()).floor();

    if !(0.0..f64::from(NUM_FILES)).contains(&file) || !(0.0..f64::from(NUM_RANKS)).contains(&row)
    {
        return None;
    }

    let (file, row) = (file as u8, row as u8);
    let rank = NUM_RANKS - 1 - row;

    if as_red {
        Square::new(file, rank)
    } else {
        Square::new(NUM_FILES - 1 - file, NUM_RANKS - 1 - rank)
    }
}

/// Returns the offset of the top-left corner of `sq` relative to the board.
pub fn pos_to_translate(sq: Square, as_red: bool, bounds: &Bounds) -> Pos {
    let (file, rank) = if as_red {
        (sq.file(), NUM_RANKS - 1 - sq.rank())
    } else {
        (NUM_FILES - 1 - sq.file(), sq.rank())
    };

    (
        f64::from(file) * bounds.square_width(),
        f64::from(rank) * bounds.square_height(),
    )
}

/// Returns the centre of `sq` in the host's coordinate space.
pub fn square_center(sq: Square, as_red: bool, bounds: &Bounds) -> Pos {
    let (x, y) = pos_to_translate(sq, as_red, bounds);
    (
        bounds.left + x + bounds.square_width() / 2.0,
        bounds.top + y + bounds.square_height() / 2.0,
    )
}

pub fn distance_sq(a: Pos, b: Pos) -> f64 {
    let dx = a.0 - b.0;
    let dy = a.1 - b.1;
    dx * dx + dy * dy
}
