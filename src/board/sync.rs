//! Keyed reconciliation of rendered elements.
//!
//! A renderer keeps one [`Layer`] per group of derived visuals (move
//! indicators, auto-placed pieces). On every redraw the target shapes are
//! hashed and compared to the elements already rendered: matching elements
//! are kept, stale ones are removed and only the missing ones are created.

use itertools::Itertools;
use rustc_hash::FxHashSet;

use super::draw::{DrawShape, DrawShapePiece};
use super::state::State;
use crate::square::Square;

/// A shape paired with the hash identifying its rendered element.
#[derive(Debug, Clone, PartialEq)]
pub struct SyncableShape<S> {
    pub shape: S,
    pub current: bool,
    pub hash: String,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SyncStats {
    pub kept: usize,
    pub inserted: usize,
    pub removed: usize,
}

/// Rendered elements of type `E`, in insertion order, keyed by shape hash.
#[derive(Debug, Clone)]
pub struct Layer<E> {
    elements: Vec<(String, E)>,
}

impl<E> Default for Layer<E> {
    fn default() -> Layer<E> {
        Layer {
            elements: Vec::new(),
        }
    }
}

impl<E> Layer<E> {
    pub fn new() -> Layer<E> {
        Layer::default()
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn hashes(&self) -> impl Iterator<Item = &str> {
        self.elements.iter().map(|(h, _)| h.as_str())
    }

    pub fn elements(&self) -> impl Iterator<Item = &E> {
        self.elements.iter().map(|(_, e)| e)
    }

    /// Brings the layer in line with `shapes`, calling `render` only for shapes
    /// that have no element yet. Shapes sharing a hash are rendered once.
    pub fn sync<S, F>(&mut self, shapes: &[SyncableShape<S>], mut render: F) -> SyncStats
    where
        F: FnMut(&SyncableShape<S>) -> E,
    {
        let wanted: FxHashSet<&str> = shapes.iter().map(|s| s.hash.as_str()).collect();

        let before = self.elements.len();
        self.elements.retain(|(hash, _)| wanted.contains(hash.as_str()));

        let mut stats = SyncStats {
            kept: self.elements.len(),
            removed: before - self.elements.len(),
            inserted: 0,
        };

        let mut present: FxHashSet<String> =
            self.elements.iter().map(|(h, _)| h.clone()).collect();

        for shape in shapes {
            if present.insert(shape.hash.clone()) {
                self.elements.push((shape.hash.clone(), render(shape)));
                stats.inserted += 1;
            }
        }

        stats
    }

    pub fn clear(&mut self) {
        self.elements.clear();
    }
}

/// Hash of an auto-placed piece: square, role, color and scale joined by commas.
///
/// ```
/// use xiangqi::board::draw::DrawShapePiece;
/// use xiangqi::board::sync::auto_piece_hash;
/// use xiangqi::square::consts::*;
/// use xiangqi::{Color, PieceType};
///
/// let piece = DrawShapePiece { role: PieceType::Cannon, color: Color::Black, scale: Some(0.5) };
/// assert_eq!("e5,cannon,black,0.5", auto_piece_hash(SQ_E5, &piece));
/// ```
pub fn auto_piece_hash(orig: Square, piece: &DrawShapePiece) -> String {
    [
        orig.to_string(),
        piece.role.name().to_string(),
        piece.color.to_string(),
        piece.scale.map(|s| s.to_string()).unwrap_or_default(),
    ]
    .iter()
    .join(",")
}

/// Hash of a drawn shape: origin, destination, brush and line width joined by commas.
pub fn shape_hash(shape: &DrawShape) -> String {
    [
        shape.orig.to_string(),
        shape.dest.map(|d| d.to_string()).unwrap_or_default(),
        shape.brush.clone().unwrap_or_default(),
        shape
            .modifiers
            .map(|m| m.line_width.to_string())
            .unwrap_or_default(),
    ]
    .iter()
    .join(",")
}

/// Auto shapes carrying a piece, ready to sync into an auto-piece layer.
pub fn auto_pieces(state: &State) -> Vec<SyncableShape<DrawShape>> {
    state
        .drawable
        .auto_shapes
        .iter()
        .filter_map(|shape| {
            shape.piece.as_ref().map(|piece| SyncableShape {
                shape: shape.clone(),
                current: false,
                hash: auto_piece_hash(shape.orig, piece),
            })
        })
        .collect()
}

/// User and auto shapes without a piece, ready to sync into a shape layer.
///
/// Nothing is returned while the drawable layer is hidden.
pub fn drawn_shapes(state: &State) -> Vec<SyncableShape<DrawShape>> {
    if !state.drawable.visible {
        return Vec::new();
    }

    let user = state.drawable.shapes.iter().map(|s| (s, true));
    let auto = state.drawable.auto_shapes.iter().map(|s| (s, false));

    user.chain(auto)
        .filter(|(shape, _)| shape.piece.is_none())
        .map(|(shape, current)| SyncableShape {
            shape: shape.clone(),
            current,
            hash: shape_hash(shape),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::draw::DrawModifiers;
    use crate::square::consts::*;
    use crate::{Color, PieceType};

    fn syncable(hash: &str) -> SyncableShape<()> {
        SyncableShape {
            shape: (),
            current: false,
            hash: hash.to_string(),
        }
    }

    #[test]
    fn sync_reuses_matching_elements() {
        let mut layer = Layer::new();
        let mut created = 0;

        let stats = layer.sync(&[syncable("a"), syncable("b")], |s| {
            created += 1;
            s.hash.to_uppercase()
        });
        assert_eq!(SyncStats { kept: 0, inserted: 2, removed: 0 }, stats);

        let stats = layer.sync(&[syncable("b"), syncable("c"), syncable("c")], |s| {
            created += 1;
            s.hash.to_uppercase()
        });
        assert_eq!(SyncStats { kept: 1, inserted: 1, removed: 1 }, stats);
        assert_eq!(3, created);
        assert_eq!(vec!["b", "c"], layer.hashes().collect::<Vec<_>>());
        assert_eq!(vec!["B", "C"], layer.elements().cloned().collect::<Vec<_>>());

        let stats = layer.sync::<(), _>(&[], |_| unreachable!());
        assert_eq!(SyncStats { kept: 0, inserted: 0, removed: 2 }, stats);
        assert!(layer.is_empty());
    }

    #[test]
    fn hashes_distinguish_tuples() {
        let piece = |role, color, scale| DrawShapePiece { role, color, scale };

        let hashes: FxHashSet<String> = [
            auto_piece_hash(SQ_E5, &piece(PieceType::Rook, Color::Red, None)),
            auto_piece_hash(SQ_E5, &piece(PieceType::Rook, Color::Black, None)),
            auto_piece_hash(SQ_E5, &piece(PieceType::Rook, Color::Red, Some(0.5))),
            auto_piece_hash(SQ_E6, &piece(PieceType::Rook, Color::Red, None)),
            auto_piece_hash(SQ_E5, &piece(PieceType::Cannon, Color::Red, None)),
        ]
        .into_iter()
        .collect();
        assert_eq!(5, hashes.len());

        let shape = DrawShape {
            orig: SQ_E5,
            dest: Some(SQ_E6),
            brush: Some("green".to_string()),
            modifiers: Some(DrawModifiers { line_width: 2.0 }),
            piece: None,
        };
        assert_eq!("e5,e6,green,2", shape_hash(&shape));
        assert_eq!("e5,,,", shape_hash(&DrawShape::circle(SQ_E5, None)));
    }
}
