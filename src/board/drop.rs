//! Drop mode: every press places a designated piece, for board editors.

use log::debug;

use super::drag;
use super::state::{DropMode, State};
use super::util::{key_at_pos, Pos};
use crate::Piece;

/// Enters drop mode with `piece`, cancelling any drag in progress.
///
/// Without a piece, presses only clear staged premoves and predrops.
pub fn set_drop_mode(s: &mut State, piece: Option<Piece>) {
    s.dropmode = DropMode {
        active: true,
        piece,
    };
    drag::cancel(s);
}

pub fn cancel_drop_mode(s: &mut State) {
    s.dropmode = DropMode::default();
}

/// Places the drop mode piece on the square under `pos`, regardless of whose turn it is.
pub fn drop(s: &mut State, pos: Pos) {
    if !s.dropmode.active {
        return;
    }

    super::unset_premove(s);
    super::unset_predrop(s);

    if let Some(piece) = s.dropmode.piece {
        match key_at_pos(pos, s.red_pov(), &s.bounds) {
            Some(dest) => super::drop_new_piece(s, piece, dest, true),
            None => debug!("drop outside the board ignored"),
        }
    }

    s.redraw();
}
