//! Partial board configuration, as sent by the host.
//!
//! Every field is optional: absent fields leave the state untouched. The
//! JSON form uses camelCase keys. Fields that can be explicitly cleared
//! (`movable.color`, `lastMove`) distinguish `null` from absence.
//!
//! ```
//! use xiangqi::board::Config;
//!
//! let config: Config = serde_json::from_str(r#"{
//!     "orientation": "black",
//!     "check": true,
//!     "movable": { "free": false, "color": null },
//!     "animation": { "enabled": true, "duration": 200 },
//!     "draggable": { "enabled": true, "deleteOnDropOff": false }
//! }"#).unwrap();
//!
//! assert_eq!(Some(None), config.movable.unwrap().color);
//! ```

use std::time::Duration;

use log::warn;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Deserializer, Serialize};

use super::draw::DrawShape;
use super::state::{Legality, MovableColor, State};
use crate::square::Square;
use crate::{fen, Color};

/// Animations shorter than this are disabled.
const MIN_ANIMATION_DURATION: Duration = Duration::from_millis(70);

/// Deserializes a field where `null` is a value of its own.
fn nullable<'de, D, T>(de: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(de).map(Some)
}

/// Which king to mark as checked: `true` for the side to move, or an explicit color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CheckConfig {
    Flag(bool),
    Color(Color),
}

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Config {
    /// Position string; replaces the placement map.
    pub fen: Option<String>,
    pub orientation: Option<Color>,
    pub turn_color: Option<Color>,
    pub check: Option<CheckConfig>,
    #[serde(deserialize_with = "nullable")]
    pub last_move: Option<Option<Vec<Square>>>,
    pub selected: Option<Square>,
    pub view_only: Option<bool>,
    pub highlight: Option<HighlightConfig>,
    pub animation: Option<AnimationConfig>,
    pub movable: Option<MovableConfig>,
    pub premovable: Option<PremovableConfig>,
    pub predroppable: Option<PredroppableConfig>,
    pub draggable: Option<DraggableConfig>,
    pub selectable: Option<SelectableConfig>,
    pub drawable: Option<DrawableConfig>,
}

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct HighlightConfig {
    pub last_move: Option<bool>,
    pub check: Option<bool>,
}

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AnimationConfig {
    pub enabled: Option<bool>,
    /// Milliseconds.
    pub duration: Option<u64>,
}

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MovableConfig {
    pub free: Option<bool>,
    /// `null` disables moving.
    #[serde(deserialize_with = "nullable")]
    pub color: Option<Option<MovableColor>>,
    /// Destinations per origin. Replaces computed destinations.
    pub dests: Option<FxHashMap<Square, Vec<Square>>>,
    pub show_dests: Option<bool>,
    pub legality: Option<Legality>,
}

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PremovableConfig {
    pub enabled: Option<bool>,
    pub show_dests: Option<bool>,
}

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PredroppableConfig {
    pub enabled: Option<bool>,
}

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DraggableConfig {
    pub enabled: Option<bool>,
    pub distance: Option<f64>,
    pub auto_distance: Option<bool>,
    pub delete_on_drop_off: Option<bool>,
}

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SelectableConfig {
    pub enabled: Option<bool>,
}

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DrawableConfig {
    pub enabled: Option<bool>,
    pub visible: Option<bool>,
    pub erase_on_click: Option<bool>,
    pub shapes: Option<Vec<DrawShape>>,
    pub auto_shapes: Option<Vec<DrawShape>>,
    pub move_indicator: Option<bool>,
}

fn merge<T>(target: &mut T, value: Option<T>) {
    if let Some(v) = value {
        *target = v;
    }
}

/// Merges the animation options, disabling animations that are too short to see.
pub fn apply_animation(state: &mut State, config: &Config) {
    if let Some(anim) = &config.animation {
        merge(&mut state.animation.enabled, anim.enabled);
        merge(
            &mut state.animation.duration,
            anim.duration.map(Duration::from_millis),
        );

        if state.animation.duration < MIN_ANIMATION_DURATION {
            state.animation.enabled = false;
        }
    }
}

/// Merges `config` into `state`.
///
/// Returns true if the placement map was replaced. An unreadable `fen` is
/// logged and leaves the placement map as it was.
pub fn configure(state: &mut State, config: &Config) -> bool {
    merge(&mut state.orientation, config.orientation);
    merge(&mut state.turn_color, config.turn_color);
    merge(&mut state.view_only, config.view_only);

    if let Some(highlight) = &config.highlight {
        merge(&mut state.highlight.last_move, highlight.last_move);
        merge(&mut state.highlight.check, highlight.check);
    }

    if let Some(movable) = &config.movable {
        merge(&mut state.movable.free, movable.free);
        merge(&mut state.movable.color, movable.color);
        merge(&mut state.movable.show_dests, movable.show_dests);
        merge(&mut state.movable.legality, movable.legality);
        if let Some(dests) = &movable.dests {
            state.movable.dests = Some(
                dests
                    .iter()
                    .map(|(&orig, dests)| (orig, dests.iter().copied().collect()))
                    .collect(),
            );
        }
    }

    if let Some(premovable) = &config.premovable {
        merge(&mut state.premovable.enabled, premovable.enabled);
        merge(&mut state.premovable.show_dests, premovable.show_dests);
    }

    if let Some(predroppable) = &config.predroppable {
        merge(&mut state.predroppable.enabled, predroppable.enabled);
    }

    if let Some(draggable) = &config.draggable {
        merge(&mut state.draggable.enabled, draggable.enabled);
        merge(&mut state.draggable.distance, draggable.distance);
        merge(&mut state.draggable.auto_distance, draggable.auto_distance);
        merge(
            &mut state.draggable.delete_on_drop_off,
            draggable.delete_on_drop_off,
        );
    }

    if let Some(selectable) = &config.selectable {
        merge(&mut state.selectable.enabled, selectable.enabled);
    }

    if let Some(drawable) = &config.drawable {
        merge(&mut state.drawable.enabled, drawable.enabled);
        merge(&mut state.drawable.visible, drawable.visible);
        merge(&mut state.drawable.erase_on_click, drawable.erase_on_click);
        merge(&mut state.drawable.move_indicator, drawable.move_indicator);
        merge(&mut state.drawable.shapes, drawable.shapes.clone());
        merge(&mut state.drawable.auto_shapes, drawable.auto_shapes.clone());
    }

    let mut replaced = false;
    if let Some(position) = &config.fen {
        match fen::decode(position) {
            Ok(pieces) => {
                state.pieces = pieces;
                state.drawable.shapes = config
                    .drawable
                    .as_ref()
                    .and_then(|d| d.shapes.clone())
                    .unwrap_or_default();
                replaced = true;
            }
            Err(e) => warn!("ignoring position {position:?}: {e}"),
        }
    }

    if let Some(check) = config.check {
        super::set_check(state, check);
    }

    merge(&mut state.last_move, config.last_move.clone());

    if let Some(selected) = config.selected {
        state.selected = Some(selected);
    }
    if let Some(selected) = state.selected {
        super::set_selected(state, selected);
    }

    apply_animation(state, config);

    replaced
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::square::consts::*;

    fn parse(json: &str) -> Config {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn deserialize_full_config() {
        let config = parse(
            r#"{
                "fen": "4k4/9/9/9/9/9/9/9/9/4K4 w - - 0 1",
                "orientation": "black",
                "turnColor": "black",
                "check": "red",
                "lastMove": ["e1", "e0"],
                "viewOnly": false,
                "highlight": { "lastMove": true, "check": true },
                "movable": {
                    "free": false,
                    "color": "both",
                    "dests": { "e0": ["d0", "f0"] },
                    "showDests": true,
                    "legality": "strict"
                },
                "premovable": { "enabled": true, "showDests": true },
                "predroppable": { "enabled": false },
                "draggable": { "enabled": true, "distance": 5, "autoDistance": false, "deleteOnDropOff": true },
                "selectable": { "enabled": true },
                "drawable": {
                    "enabled": true,
                    "visible": true,
                    "eraseOnClick": false,
                    "shapes": [{ "orig": "e5", "brush": "green" }],
                    "moveIndicator": true
                }
            }"#,
        );

        assert_eq!(Some(CheckConfig::Color(Color::Red)), config.check);
        assert_eq!(Some(Some(vec![SQ_E1, SQ_E0])), config.last_move);

        let mut state = State::default();
        assert!(configure(&mut state, &config));

        assert_eq!(2, state.pieces.len());
        assert_eq!(Color::Black, state.orientation);
        assert_eq!(Color::Black, state.turn_color);
        assert_eq!(Some(SQ_E0), state.check);
        assert_eq!(Some(MovableColor::Both), state.movable.color);
        assert_eq!(Legality::Strict, state.movable.legality);
        assert_eq!(2, state.movable.dests.as_ref().unwrap()[&SQ_E0].count());
        assert_eq!(5.0, state.draggable.distance);
        assert!(state.draggable.delete_on_drop_off);
        assert_eq!(1, state.drawable.shapes.len());
        assert!(state.drawable.move_indicator);
    }

    #[test]
    fn absent_and_null_fields() {
        let mut state = State::default();
        state.last_move = Some(vec![SQ_A0]);

        assert!(!configure(&mut state, &parse(r#"{ "movable": {} }"#)));
        assert_eq!(Some(MovableColor::Both), state.movable.color);
        assert_eq!(Some(vec![SQ_A0]), state.last_move);

        configure(&mut state, &parse(r#"{ "movable": { "color": null }, "lastMove": null }"#));
        assert_eq!(None, state.movable.color);
        assert_eq!(None, state.last_move);
    }

    #[test]
    fn bad_fen_is_ignored() {
        let mut state = State::default();
        assert!(!configure(&mut state, &parse(r#"{ "fen": "rnbakabnr/9", "turnColor": "black" }"#)));
        assert_eq!(32, state.pieces.len());
        assert_eq!(Color::Black, state.turn_color);
    }

    #[test]
    fn short_animation_disabled() {
        let mut state = State::default();
        configure(&mut state, &parse(r#"{ "animation": { "duration": 50 } }"#));
        assert!(!state.animation.enabled);

        configure(&mut state, &parse(r#"{ "animation": { "enabled": true, "duration": 300 } }"#));
        assert!(state.animation.enabled);
        assert_eq!(Duration::from_millis(300), state.animation.duration);
    }

    #[test]
    fn check_flag() {
        let mut state = State::default();
        configure(&mut state, &parse(r#"{ "check": true }"#));
        assert_eq!(Some(SQ_E0), state.check);
        configure(&mut state, &parse(r#"{ "check": false }"#));
        assert_eq!(None, state.check);
    }
}
