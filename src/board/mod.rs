//! Board interaction state machine.
//!
//! [`Board`] owns a [`State`] and exposes the operations a UI layer wires to
//! pointer input and a network layer uses to push remote positions. The free
//! functions in this module are the transitions themselves: they mutate the
//! state, queue [`Event`]s and request redraws, and never fail. A gesture that
//! makes no sense in the current state is a no-op.
//!
//! ```
//! use std::cell::RefCell;
//! use std::rc::Rc;
//!
//! use xiangqi::board::{Board, Config, Event};
//! use xiangqi::square::consts::*;
//!
//! let config: Config = serde_json::from_str(r#"{
//!     "fen": "start",
//!     "turnColor": "red",
//!     "movable": { "free": false, "color": "red" }
//! }"#).unwrap();
//!
//! let frames = Rc::new(RefCell::new(0));
//! let counter = frames.clone();
//! let mut board = Board::new(config, move |_: &xiangqi::board::State| *counter.borrow_mut() += 1);
//!
//! let moves = Rc::new(RefCell::new(Vec::new()));
//! let sink = moves.clone();
//! board.on_after_move(move |orig, dest, _| sink.borrow_mut().push((orig, dest)));
//!
//! board.select_square(Some(SQ_H2), false);
//! board.select_square(Some(SQ_E2), false);
//! assert_eq!(vec![(SQ_H2, SQ_E2)], *moves.borrow());
//!
//! board.advance(std::time::Duration::from_millis(16));
//! assert_eq!(2, *frames.borrow());
//! ```

use log::debug;

use crate::movegen::{premove_destinations, pseudo_legal_destinations};
use crate::rules;
use crate::square::Square;
use crate::{Bitboard, Color, Piece, PieceType};

pub mod anim;
mod api;
pub mod config;
pub mod drag;
pub mod draw;
pub mod drop;
pub mod explosion;
pub mod state;
pub mod sync;
pub mod timer;
pub mod util;

pub use self::api::{Board, Renderer};
pub use self::config::{CheckConfig, Config};
pub use self::draw::DrawShape;
pub use self::state::{Event, Legality, MovableColor, MoveMetadata, Predrop, State};

/// Changes to apply to the placement map: `None` removes the piece.
pub type PiecesDiff = Vec<(Square, Option<Piece>)>;

/// The piece captured by a move, if any.
pub type Captured = Option<Piece>;

pub fn toggle_orientation(state: &mut State) {
    state.orientation = state.orientation.flip();
    state.animation.current = None;
    state.draggable.current = None;
    state.selected = None;
}

pub fn set_pieces(state: &mut State, pieces: PiecesDiff) {
    for (key, piece) in pieces {
        match piece {
            Some(piece) => state.pieces.insert(key, piece),
            None => state.pieces.remove(&key),
        };
    }
}

/// Marks the king of the checked side. `Flag(true)` means the side to move.
pub fn set_check(state: &mut State, check: CheckConfig) {
    let color = match check {
        CheckConfig::Flag(true) => Some(state.turn_color),
        CheckConfig::Flag(false) => None,
        CheckConfig::Color(c) => Some(c),
    };

    state.check = color.and_then(|c| rules::king_square(&state.pieces, c));
}

fn set_premove(state: &mut State, orig: Square, dest: Square) {
    unset_predrop(state);
    state.premovable.current = Some((orig, dest));
    state.emit(Event::PremoveSet { orig, dest });
}

pub fn unset_premove(state: &mut State) {
    if state.premovable.current.take().is_some() {
        state.emit(Event::PremoveUnset);
    }
}

fn set_predrop(state: &mut State, role: PieceType, key: Square) {
    unset_premove(state);
    state.predroppable.current = Some(Predrop { role, key });
    state.emit(Event::PredropSet { role, key });
}

pub fn unset_predrop(state: &mut State) {
    if state.predroppable.current.take().is_some() {
        state.emit(Event::PredropUnset);
    }
}

/// Moves the piece on `orig` to `dest` without checking the movement rules.
///
/// Returns `None` if nothing moved, otherwise the captured piece. A piece
/// never lands on a square held by its own side.
pub fn base_move(state: &mut State, orig: Square, dest: Square) -> Option<Captured> {
    let orig_piece = state.pieces.get(&orig).copied()?;
    if orig == dest {
        return None;
    }

    let captured = state.pieces.get(&dest).copied();
    if captured.map_or(false, |p| p.color == orig_piece.color) {
        debug!("{orig}{dest} would capture an own piece");
        return None;
    }

    if state.selected == Some(dest) {
        unselect(state);
    }
    state.emit(Event::Move {
        orig,
        dest,
        captured,
    });

    state.pieces.insert(dest, orig_piece);
    state.pieces.remove(&orig);
    state.last_move = Some(vec![orig, dest]);
    state.check = None;
    state.emit(Event::Change);

    Some(captured)
}

/// Places `piece` on `key` and passes the turn. An occupied square is only
/// overwritten with `force`.
pub fn base_new_piece(state: &mut State, piece: Piece, key: Square, force: bool) -> bool {
    if state.pieces.contains_key(&key) {
        if !force {
            return false;
        }
        state.pieces.remove(&key);
    }

    state.emit(Event::DropNewPiece { piece, key });
    state.pieces.insert(key, piece);
    state.last_move = Some(vec![key]);
    state.check = None;
    state.emit(Event::Change);
    state.movable.dests = None;
    state.turn_color = state.turn_color.flip();

    true
}

fn base_user_move(state: &mut State, orig: Square, dest: Square) -> Option<Captured> {
    let result = base_move(state, orig, dest);
    if result.is_some() {
        state.movable.dests = None;
        state.turn_color = state.turn_color.flip();
        state.animation.current = None;
    }
    result
}

/// Plays a move made by the user, staging it as a premove when it is not
/// their turn. Returns true if the move was played or staged.
pub fn user_move(state: &mut State, orig: Square, dest: Square) -> bool {
    if can_move(state, orig, dest) {
        if let Some(captured) = base_user_move(state, orig, dest) {
            unselect(state);
            state.emit(Event::AfterMove {
                orig,
                dest,
                metadata: MoveMetadata {
                    captured,
                    ..MoveMetadata::default()
                },
            });
            return true;
        }
    } else if can_premove(state, orig, dest) {
        set_premove(state, orig, dest);
        unselect(state);
        return true;
    }

    debug!("move {orig}{dest} rejected");
    unselect(state);
    false
}

/// Places a new piece dropped by the user, staging it as a predrop when it is not their turn.
pub fn drop_new_piece(state: &mut State, piece: Piece, dest: Square, force: bool) {
    if can_drop(state, piece, dest) || force {
        if base_new_piece(state, piece, dest, force) {
            state.emit(Event::AfterNewPiece {
                piece,
                key: dest,
                metadata: MoveMetadata::default(),
            });
        }
    } else if can_predrop(state, piece, dest) {
        set_predrop(state, piece.piece_type, dest);
    } else {
        unset_premove(state);
        unset_predrop(state);
    }
    unselect(state);
}

/// Activates `key`: moves the selected piece there if possible, otherwise selects it.
pub fn select_square(state: &mut State, key: Square, force: bool) {
    state.emit(Event::Select(key));

    if let Some(selected) = state.selected {
        if selected == key && !state.draggable.enabled {
            unselect(state);
            return;
        } else if (state.selectable.enabled || force)
            && selected != key
            && user_move(state, selected, key)
        {
            state.stats.dragged = false;
            return;
        }
    }

    if (state.selectable.enabled || state.draggable.enabled)
        && (is_movable(state, key) || is_premovable(state, key))
    {
        set_selected(state, key);
    }
}

pub fn set_selected(state: &mut State, key: Square) {
    state.selected = Some(key);
    state.premovable.dests = if is_premovable(state, key) {
        state
            .pieces
            .get(&key)
            .map(|&pc| premove_destinations(pc, key))
    } else {
        None
    };
    draw::show_move_indicators(state, key);
}

pub fn unselect(state: &mut State) {
    state.selected = None;
    state.premovable.dests = None;
    draw::hide_move_indicators(state);
}

/// Destinations of the piece on `orig` for the side to move.
///
/// Host supplied destinations take precedence. Otherwise they are computed
/// from the rules for pieces of the turn color.
pub fn movable_dests(state: &State, orig: Square) -> Bitboard {
    if let Some(dests) = &state.movable.dests {
        return dests.get(&orig).copied().unwrap_or_default();
    }

    match state.pieces.get(&orig) {
        Some(pc) if pc.color == state.turn_color => match state.movable.legality {
            Legality::Pseudo => pseudo_legal_destinations(&state.pieces, orig),
            Legality::Strict => rules::legal_destinations(&state.pieces, orig),
        },
        _ => Bitboard::empty(),
    }
}

pub fn is_movable(state: &State, orig: Square) -> bool {
    match (state.pieces.get(&orig), state.movable.color) {
        (Some(pc), Some(color)) => {
            color == MovableColor::Both || (color.is(pc.color) && state.turn_color == pc.color)
        }
        _ => false,
    }
}

pub fn can_move(state: &State, orig: Square, dest: Square) -> bool {
    orig != dest
        && is_movable(state, orig)
        && (state.movable.free || movable_dests(state, orig).contains(dest))
}

fn can_drop(state: &State, piece: Piece, dest: Square) -> bool {
    !state.pieces.contains_key(&dest)
        && state.movable.color.map_or(false, |color| {
            color == MovableColor::Both
                || (color.is(piece.color) && state.turn_color == piece.color)
        })
}

pub fn is_premovable(state: &State, orig: Square) -> bool {
    match (state.pieces.get(&orig), state.movable.color) {
        (Some(pc), Some(color)) => {
            state.premovable.enabled && color.is(pc.color) && state.turn_color != pc.color
        }
        _ => false,
    }
}

pub fn can_premove(state: &State, orig: Square, dest: Square) -> bool {
    orig != dest
        && is_premovable(state, orig)
        && state
            .pieces
            .get(&orig)
            .map_or(false, |&pc| premove_destinations(pc, orig).contains(dest))
}

fn can_predrop(state: &State, piece: Piece, dest: Square) -> bool {
    let Some(color) = state.movable.color else {
        return false;
    };

    state
        .pieces
        .get(&dest)
        .map_or(true, |p| !color.is(p.color))
        && state.predroppable.enabled
        && color.is(piece.color)
        && state.turn_color != piece.color
}

pub fn is_draggable(state: &State, orig: Square) -> bool {
    match (state.pieces.get(&orig), state.movable.color) {
        (Some(pc), Some(color)) => {
            state.draggable.enabled
                && (color == MovableColor::Both
                    || (color.is(pc.color)
                        && (state.turn_color == pc.color || state.premovable.enabled)))
        }
        _ => false,
    }
}

/// Plays the staged premove if it is now a legal move. The premove is unset either way.
///
/// The replay is checked against the rules even when moves are otherwise free.
pub fn play_premove(state: &mut State) -> bool {
    let Some((orig, dest)) = state.premovable.current else {
        return false;
    };

    let mut success = false;
    if can_move(state, orig, dest) && rules::is_legal_move(&state.pieces, orig, dest) {
        if let Some(captured) = base_user_move(state, orig, dest) {
            state.emit(Event::AfterMove {
                orig,
                dest,
                metadata: MoveMetadata {
                    premove: true,
                    captured,
                    ..MoveMetadata::default()
                },
            });
            success = true;
        }
    }

    if !success {
        debug!("stale premove {orig}{dest} discarded");
    }
    unset_premove(state);
    success
}

/// Plays the staged predrop if `validate` accepts it. The predrop is unset either way.
pub fn play_predrop(state: &mut State, validate: impl FnOnce(&Predrop) -> bool) -> bool {
    let Some(drop) = state.predroppable.current else {
        return false;
    };

    let mut success = false;
    if validate(&drop) {
        let color: Color = state
            .movable
            .color
            .and_then(MovableColor::as_color)
            .unwrap_or(state.turn_color);
        let piece = Piece::new(drop.role, color);

        if base_new_piece(state, piece, drop.key, false) {
            state.emit(Event::AfterNewPiece {
                piece,
                key: drop.key,
                metadata: MoveMetadata {
                    predrop: true,
                    ..MoveMetadata::default()
                },
            });
            success = true;
        }
    }

    if !success {
        debug!("predrop {:?} on {} discarded", drop.role, drop.key);
    }
    unset_predrop(state);
    success
}

/// Clears the selection and any staged premove or predrop. The placement map is untouched.
pub fn cancel_move(state: &mut State) {
    unset_premove(state);
    unset_predrop(state);
    unselect(state);
}

/// Cancels the current move and disables moving until reconfigured.
pub fn stop(state: &mut State) {
    state.movable.color = None;
    state.movable.dests = None;
    state.animation.current = None;
    cancel_move(state);
}

/// Returns the square under `pos` for the current orientation and bounds.
pub fn key_at_pos(state: &State, pos: util::Pos) -> Option<Square> {
    util::key_at_pos(pos, state.red_pov(), &state.bounds)
}
