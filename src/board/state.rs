//! Interaction state of a board and the events it produces.

use std::time::Duration;

use log::trace;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use super::anim::AnimCurrent;
use super::draw::DrawShape;
use super::drag::DragCurrent;
use super::timer::{Task, TimerQueue};
use super::util::Bounds;
use crate::square::Square;
use crate::{fen, Bitboard, Color, Piece, PieceType, Pieces};

/// Which side the user may move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MovableColor {
    Red,
    Black,
    Both,
}

impl MovableColor {
    /// Returns true if exactly `c` may move.
    pub fn is(self, c: Color) -> bool {
        self.as_color() == Some(c)
    }

    pub fn as_color(self) -> Option<Color> {
        match self {
            MovableColor::Red => Some(Color::Red),
            MovableColor::Black => Some(Color::Black),
            MovableColor::Both => None,
        }
    }
}

impl From<Color> for MovableColor {
    fn from(c: Color) -> MovableColor {
        match c {
            Color::Red => MovableColor::Red,
            Color::Black => MovableColor::Black,
        }
    }
}

/// How destinations are computed when the host supplies none.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Legality {
    /// Piece movement rules only.
    #[default]
    Pseudo,
    /// Movement rules filtered for leaving the own king in check.
    Strict,
}

/// Extra information attached to an applied move or drop.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct MoveMetadata {
    /// The move was a staged premove replayed by the board.
    pub premove: bool,
    /// The drop was a staged predrop.
    pub predrop: bool,
    pub captured: Option<Piece>,
}

/// A staged drop of a piece of the movable color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Predrop {
    pub role: PieceType,
    pub key: Square,
}

/// Notifications queued during an operation and delivered once it returns.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    /// The placement map changed.
    Change,
    /// A piece moved, by the user or programmatically.
    Move {
        orig: Square,
        dest: Square,
        captured: Option<Piece>,
    },
    /// A new piece was placed, by the user or programmatically.
    DropNewPiece { piece: Piece, key: Square },
    /// A square was activated.
    Select(Square),
    /// The user moved a piece, or a premove was replayed.
    AfterMove {
        orig: Square,
        dest: Square,
        metadata: MoveMetadata,
    },
    /// The user dropped a new piece, or a predrop was played.
    AfterNewPiece {
        piece: Piece,
        key: Square,
        metadata: MoveMetadata,
    },
    PremoveSet { orig: Square, dest: Square },
    PremoveUnset,
    PredropSet { role: PieceType, key: Square },
    PredropUnset,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Highlight {
    pub last_move: bool,
    pub check: bool,
}

#[derive(Debug, Clone)]
pub struct Animation {
    pub enabled: bool,
    pub duration: Duration,
    pub current: Option<AnimCurrent>,
}

#[derive(Debug, Clone)]
pub struct Movable {
    /// Any piece of the movable color may go anywhere.
    pub free: bool,
    /// `None` disables moving altogether.
    pub color: Option<MovableColor>,
    /// Destinations supplied by the host. When `None` they are computed from the rules.
    pub dests: Option<FxHashMap<Square, Bitboard>>,
    pub show_dests: bool,
    pub legality: Legality,
}

#[derive(Debug, Clone)]
pub struct Premovable {
    pub enabled: bool,
    pub show_dests: bool,
    /// Premove destinations of the selected piece.
    pub dests: Option<Bitboard>,
    pub current: Option<(Square, Square)>,
}

#[derive(Debug, Clone)]
pub struct Predroppable {
    pub enabled: bool,
    pub current: Option<Predrop>,
}

#[derive(Debug, Clone)]
pub struct Draggable {
    pub enabled: bool,
    /// Minimum pointer travel, in pixels, before a drag starts.
    pub distance: f64,
    /// Start dragging immediately when the previous gesture was a drag.
    pub auto_distance: bool,
    /// Remove a piece dropped outside the board.
    pub delete_on_drop_off: bool,
    pub current: Option<DragCurrent>,
}

#[derive(Debug, Clone, Default)]
pub struct DropMode {
    pub active: bool,
    pub piece: Option<Piece>,
}

#[derive(Debug, Clone, Copy)]
pub struct Selectable {
    pub enabled: bool,
}

#[derive(Debug, Clone)]
pub struct Drawable {
    pub enabled: bool,
    pub visible: bool,
    pub erase_on_click: bool,
    pub shapes: Vec<DrawShape>,
    pub auto_shapes: Vec<DrawShape>,
    /// Generate auto shapes for the selected piece's destinations.
    pub move_indicator: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Exploding {
    pub stage: u8,
    pub keys: Vec<Square>,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Stats {
    /// The last completed gesture was a drag rather than a click.
    pub dragged: bool,
}

/// Everything the board knows. Renderers read it; only the board mutates it.
#[derive(Debug, Clone)]
pub struct State {
    pub orientation: Color,
    pub turn_color: Color,
    pub pieces: Pieces,
    /// Square of the king in check.
    pub check: Option<Square>,
    pub last_move: Option<Vec<Square>>,
    pub selected: Option<Square>,
    pub view_only: bool,
    pub highlight: Highlight,
    pub animation: Animation,
    pub movable: Movable,
    pub premovable: Premovable,
    pub predroppable: Predroppable,
    pub draggable: Draggable,
    pub dropmode: DropMode,
    pub selectable: Selectable,
    pub drawable: Drawable,
    pub exploding: Option<Exploding>,
    pub bounds: Bounds,
    pub stats: Stats,
    pub(crate) events: Vec<Event>,
    pub(crate) timers: TimerQueue<Task>,
    pub(crate) explosion_generation: u64,
    pub(crate) redraw_requested: bool,
}

impl Default for State {
    fn default() -> State {
        State {
            orientation: Color::Red,
            turn_color: Color::Red,
            pieces: fen::decode(fen::INITIAL_FEN).unwrap_or_default(),
            check: None,
            last_move: None,
            selected: None,
            view_only: false,
            highlight: Highlight {
                last_move: true,
                check: true,
            },
            animation: Animation {
                enabled: true,
                duration: Duration::from_millis(200),
                current: None,
            },
            movable: Movable {
                free: true,
                color: Some(MovableColor::Both),
                dests: None,
                show_dests: true,
                legality: Legality::Pseudo,
            },
            premovable: Premovable {
                enabled: true,
                show_dests: true,
                dests: None,
                current: None,
            },
            predroppable: Predroppable {
                enabled: false,
                current: None,
            },
            draggable: Draggable {
                enabled: true,
                distance: 3.0,
                auto_distance: true,
                delete_on_drop_off: false,
                current: None,
            },
            dropmode: DropMode::default(),
            selectable: Selectable { enabled: true },
            drawable: Drawable {
                enabled: true,
                visible: true,
                erase_on_click: true,
                shapes: Vec::new(),
                auto_shapes: Vec::new(),
                move_indicator: false,
            },
            exploding: None,
            bounds: Bounds::default(),
            stats: Stats::default(),
            events: Vec::new(),
            timers: TimerQueue::default(),
            explosion_generation: 0,
            redraw_requested: false,
        }
    }
}

impl State {
    /// Returns true if the board is viewed from red's side.
    pub fn red_pov(&self) -> bool {
        self.orientation == Color::Red
    }

    /// Returns the board clock, advanced by the host's frame ticks.
    pub fn now(&self) -> Duration {
        self.timers.now()
    }

    /// Returns true if a redraw is pending for the next tick.
    pub fn redraw_requested(&self) -> bool {
        self.redraw_requested
    }

    /// Requests a redraw on the next tick. Repeated requests coalesce.
    pub(crate) fn redraw(&mut self) {
        if !self.redraw_requested {
            trace!("redraw requested");
            self.redraw_requested = true;
        }
    }

    pub(crate) fn emit(&mut self, event: Event) {
        self.events.push(event);
    }

    pub(crate) fn take_events(&mut self) -> Vec<Event> {
        std::mem::take(&mut self.events)
    }
}
