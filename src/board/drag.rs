//! Drag gesture lifecycle: start, move, end and cancel.
//!
//! Nothing in the placement map changes while a piece is dragged. The move is
//! applied (or staged as a premove) only when the pointer is released.

use log::debug;

use super::anim;
use super::draw;
use super::state::State;
use super::util::{distance_sq, key_at_pos, Pos};
use crate::square::Square;
use crate::Piece;

/// Where the dragged piece comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragOrigin {
    Board(Square),
    /// A piece from outside the board, placed on release.
    NewPiece,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DragCurrent {
    pub origin: DragOrigin,
    pub piece: Piece,
    pub orig_pos: Pos,
    pub pos: Pos,
    /// The pointer travelled far enough for the piece to follow it.
    pub started: bool,
    pub previously_selected: Option<Square>,
    /// The pointer left the origin square at least once.
    pub key_has_changed: bool,
    /// Place a new piece even on an occupied square.
    pub force: bool,
}

/// Handles a pointer press at `pos`.
pub fn start(s: &mut State, pos: Pos) {
    let Some(orig) = key_at_pos(pos, s.red_pov(), &s.bounds) else {
        return;
    };
    let piece = s.pieces.get(&orig).copied();
    let previously_selected = s.selected;

    if previously_selected.is_none()
        && s.drawable.enabled
        && (s.drawable.erase_on_click || piece.map_or(true, |p| p.color != s.turn_color))
    {
        draw::clear(s);
    }

    let had_premove = s.premovable.current.is_some();
    let had_predrop = s.predroppable.current.is_some();

    if s.selected.map_or(false, |sel| super::can_move(s, sel, orig)) {
        anim::anim(s, |s| super::select_square(s, orig, false));
    } else {
        super::select_square(s, orig, false);
    }

    let still_selected = s.selected == Some(orig);

    match piece {
        Some(piece) if still_selected && super::is_draggable(s, orig) => {
            s.draggable.current = Some(DragCurrent {
                origin: DragOrigin::Board(orig),
                piece,
                orig_pos: pos,
                pos,
                started: s.draggable.auto_distance && s.stats.dragged,
                previously_selected,
                key_has_changed: false,
                force: false,
            });
            process(s);
        }
        _ => {
            if had_premove {
                super::unset_premove(s);
            }
            if had_predrop {
                super::unset_predrop(s);
            }
        }
    }

    s.redraw();
}

/// Starts dragging `piece` from outside the board.
pub fn drag_new_piece(s: &mut State, piece: Piece, pos: Pos, force: bool) {
    s.draggable.current = Some(DragCurrent {
        origin: DragOrigin::NewPiece,
        piece,
        orig_pos: pos,
        pos,
        started: true,
        previously_selected: None,
        key_has_changed: false,
        force,
    });
    s.redraw();
}

/// Updates the drag on a frame tick.
///
/// A drag whose piece is no longer on its origin square is cancelled.
pub fn process(s: &mut State) {
    let Some(cur) = s.draggable.current.as_ref() else {
        return;
    };
    let origin = cur.origin;

    if let DragOrigin::Board(orig) = origin {
        if s
            .animation
            .current
            .as_ref()
            .map_or(false, |a| a.plan.anims.contains_key(&orig))
        {
            s.animation.current = None;
        }

        if s.pieces.get(&orig) != Some(&cur.piece) {
            debug!("dragged piece left {orig}; cancelling drag");
            cancel(s);
            return;
        }
    }

    let threshold = s.draggable.distance * s.draggable.distance;
    let key = key_at_pos(cur.pos, s.red_pov(), &s.bounds);

    let Some(cur) = s.draggable.current.as_mut() else {
        return;
    };
    if !cur.started && distance_sq(cur.pos, cur.orig_pos) >= threshold {
        cur.started = true;
    }
    if cur.started {
        if let DragOrigin::Board(orig) = origin {
            cur.key_has_changed |= key != Some(orig);
        }
        s.redraw();
    }
}

/// Handles pointer movement while dragging.
pub fn move_to(s: &mut State, pos: Pos) {
    if let Some(cur) = s.draggable.current.as_mut() {
        cur.pos = pos;
    }
}

/// Handles the pointer release at `pos`, applying the dragged move if any.
pub fn end(s: &mut State, pos: Pos) {
    let Some(cur) = s.draggable.current.take() else {
        return;
    };

    super::unset_premove(s);
    super::unset_predrop(s);

    let dest = key_at_pos(pos, s.red_pov(), &s.bounds);

    match cur.origin {
        DragOrigin::NewPiece => {
            if let Some(dest) = dest.filter(|_| cur.started) {
                super::drop_new_piece(s, cur.piece, dest, cur.force);
            }
        }
        DragOrigin::Board(orig) => {
            match dest {
                Some(dest) if cur.started && dest != orig => {
                    if super::user_move(s, orig, dest) {
                        s.stats.dragged = true;
                    }
                }
                None if s.draggable.delete_on_drop_off => {
                    s.pieces.remove(&orig);
                    s.emit(super::Event::Change);
                }
                _ => {}
            }

            let released_in_place = dest.map_or(true, |d| d == orig);
            if (cur.previously_selected == Some(orig) || cur.key_has_changed) && released_in_place
            {
                super::unselect(s);
            } else if !s.selectable.enabled {
                super::unselect(s);
            }
        }
    }

    s.redraw();
}

/// Drops the current drag and the selection.
pub fn cancel(s: &mut State) {
    if discard(s) {
        super::unselect(s);
    }
}

/// Drops the current drag, keeping the selection. Returns true if there was one.
pub fn discard(s: &mut State) -> bool {
    if s.draggable.current.take().is_some() {
        s.redraw();
        true
    } else {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::util::square_center;
    use crate::square::consts::*;
    use crate::{fen, Color, PieceType};

    fn center(s: &State, sq: Square) -> Pos {
        square_center(sq, s.red_pov(), &s.bounds)
    }

    #[test]
    fn drag_applies_move_on_release() {
        let mut s = State::default();
        s.animation.enabled = false;

        let pos = center(&s, SQ_B2);
        start(&mut s, pos);
        assert_eq!(Some(SQ_B2), s.selected);
        assert!(s.draggable.current.is_some());

        let pos = center(&s, SQ_E2);
        move_to(&mut s, pos);
        process(&mut s);
        assert!(s.draggable.current.as_ref().unwrap().started);

        let pos = center(&s, SQ_E2);
        end(&mut s, pos);
        assert!(s.draggable.current.is_none());
        assert_eq!(Some(Piece::new(PieceType::Cannon, Color::Red)), s.pieces.get(&SQ_E2).copied());
        assert!(!s.pieces.contains_key(&SQ_B2));
        assert!(s.stats.dragged);
        assert_eq!(None, s.selected);
    }

    #[test]
    fn short_drag_keeps_selection() {
        let mut s = State::default();
        let pos = center(&s, SQ_B2);
        start(&mut s, pos);
        let pos = center(&s, SQ_B2);
        end(&mut s, pos);
        assert_eq!(Some(SQ_B2), s.selected);
        assert_eq!(32, s.pieces.len());

        // Pressing the selected piece again releases it.
        let pos = center(&s, SQ_B2);
        start(&mut s, pos);
        let pos = center(&s, SQ_B2);
        end(&mut s, pos);
        assert_eq!(None, s.selected);
    }

    #[test]
    fn drag_cancelled_when_piece_disappears() {
        let mut s = State::default();
        let pos = center(&s, SQ_B2);
        start(&mut s, pos);
        s.pieces = fen::decode("4k4/9/9/9/9/9/9/9/9/4K4").unwrap();
        process(&mut s);
        assert!(s.draggable.current.is_none());
        assert_eq!(None, s.selected);
    }

    #[test]
    fn new_piece_drag() {
        let mut s = State::default();
        s.pieces = fen::decode("4k4/9/9/9/9/9/9/9/9/4K4").unwrap();
        let pawn = Piece::new(PieceType::Pawn, Color::Red);

        drag_new_piece(&mut s, pawn, (-50.0, -50.0), false);
        let pos = center(&s, SQ_C3);
        end(&mut s, pos);
        assert_eq!(Some(&pawn), s.pieces.get(&SQ_C3));
        assert_eq!(Color::Black, s.turn_color);

        drag_new_piece(&mut s, pawn, (-50.0, -50.0), false);
        end(&mut s, (-10.0, -10.0));
        assert_eq!(3, s.pieces.len());
    }

    #[test]
    fn delete_on_drop_off() {
        let mut s = State::default();
        s.draggable.delete_on_drop_off = true;
        let pos = center(&s, SQ_A0);
        start(&mut s, pos);
        move_to(&mut s, (-100.0, -100.0));
        process(&mut s);
        end(&mut s, (-100.0, -100.0));
        assert!(!s.pieces.contains_key(&SQ_A0));
        assert!(s.take_events().contains(&super::super::Event::Change));
    }
}
