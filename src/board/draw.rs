//! Shapes drawn over the board and the move indicators derived from a selection.

use serde::{Deserialize, Serialize};

use super::state::State;
use crate::square::Square;
use crate::{Color, PieceType};

const INDICATOR_LINE_WIDTH: f64 = 2.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DrawModifiers {
    pub line_width: f64,
}

/// A piece drawn as a shape rather than held in the placement map.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DrawShapePiece {
    pub role: PieceType,
    pub color: Color,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scale: Option<f64>,
}

/// A circle (no `dest`), an arrow, or a piece placed on `orig`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DrawShape {
    pub orig: Square,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dest: Option<Square>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brush: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modifiers: Option<DrawModifiers>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub piece: Option<DrawShapePiece>,
}

impl DrawShape {
    pub fn circle(orig: Square, brush: Option<&str>) -> DrawShape {
        DrawShape {
            orig,
            dest: None,
            brush: brush.map(str::to_string),
            modifiers: None,
            piece: None,
        }
    }

    pub fn arrow(orig: Square, dest: Square, brush: Option<&str>) -> DrawShape {
        DrawShape {
            dest: Some(dest),
            ..DrawShape::circle(orig, brush)
        }
    }
}

/// Removes the user shapes, requesting a redraw if there were any.
pub fn clear(state: &mut State) {
    if !state.drawable.shapes.is_empty() {
        state.drawable.shapes.clear();
        state.redraw();
    }
}

/// Builds the indicators for a piece on `orig`: a blue circle on the piece,
/// red circles on destinations holding a piece and green circles on empty ones.
pub fn generate_move_indicators(state: &State, orig: Square) -> Vec<DrawShape> {
    if !state.pieces.contains_key(&orig) {
        return Vec::new();
    }

    let indicator = |sq: Square, brush: &str| DrawShape {
        modifiers: Some(DrawModifiers {
            line_width: INDICATOR_LINE_WIDTH,
        }),
        ..DrawShape::circle(sq, Some(brush))
    };

    let mut shapes = vec![indicator(orig, "blue")];
    shapes.extend(super::movable_dests(state, orig).map(|dest| {
        let brush = if state.pieces.contains_key(&dest) {
            "red"
        } else {
            "green"
        };
        indicator(dest, brush)
    }));

    shapes
}

/// Replaces the auto shapes with the indicators for `orig` when indicators are enabled.
pub fn show_move_indicators(state: &mut State, orig: Square) {
    if !state.drawable.move_indicator {
        return;
    }

    state.drawable.auto_shapes = generate_move_indicators(state, orig);
    state.redraw();
}

/// Removes indicators left by a previous selection.
pub fn hide_move_indicators(state: &mut State) {
    if state.drawable.move_indicator && !state.drawable.auto_shapes.is_empty() {
        state.drawable.auto_shapes.clear();
        state.redraw();
    }
}
