use std::time::Duration;

use log::{debug, trace};

use super::config::{self, Config};
use super::draw::DrawShape;
use super::state::{Event, MoveMetadata, Predrop, State};
use super::timer::Task;
use super::util::{Bounds, Pos};
use super::{anim, drag, drop, explosion, PiecesDiff};
use crate::square::Square;
use crate::{fen, Piece};

/// Draws the board from its state.
pub trait Renderer {
    fn render(&mut self, state: &State);
}

impl<F> Renderer for F
where
    F: FnMut(&State),
{
    fn render(&mut self, state: &State) {
        self(state)
    }
}

type Listener = Box<dyn FnMut(&Event)>;

/// An interactive board.
///
/// Operations mutate the state synchronously and queue events, which are
/// delivered to listeners when the operation returns. Redraws requested by
/// an operation are coalesced and performed by the next [`Board::advance`].
/// After [`Board::destroy`] every operation is a no-op.
pub struct Board {
    state: State,
    renderer: Option<Box<dyn Renderer>>,
    listeners: Vec<Listener>,
    destroyed: bool,
}

/////////////////////////////////////////////////////////////////////////////
// Type implementation
/////////////////////////////////////////////////////////////////////////////

impl Board {
    /// Creates a board from `config` and draws it once.
    pub fn new<R>(config: Config, renderer: R) -> Board
    where
        R: Renderer + 'static,
    {
        let mut state = State::default();
        config::configure(&mut state, &config);
        // Initial configuration does not notify anyone.
        state.take_events();

        let mut board = Board {
            state,
            renderer: Some(Box::new(renderer)),
            listeners: Vec::new(),
            destroyed: false,
        };
        board.redraw_now();
        board
    }

    /// Returns the interaction state.
    pub fn state(&self) -> &State {
        &self.state
    }

    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    /////////////////////////////////////////////////////////////////////////
    // Listeners
    /////////////////////////////////////////////////////////////////////////

    /// Registers a listener for every event.
    pub fn on_event<F>(&mut self, listener: F)
    where
        F: FnMut(&Event) + 'static,
    {
        if !self.destroyed {
            self.listeners.push(Box::new(listener));
        }
    }

    /// Registers a listener for moves made by the user or replayed premoves.
    pub fn on_after_move<F>(&mut self, mut listener: F)
    where
        F: FnMut(Square, Square, &MoveMetadata) + 'static,
    {
        self.on_event(move |event| {
            if let Event::AfterMove {
                orig,
                dest,
                metadata,
            } = event
            {
                listener(*orig, *dest, metadata);
            }
        });
    }

    /// Runs `f` on the state unless destroyed, then delivers the queued events.
    fn run<T>(&mut self, f: impl FnOnce(&mut State) -> T) -> Option<T> {
        if self.destroyed {
            trace!("operation on destroyed board ignored");
            return None;
        }

        let result = f(&mut self.state);
        self.flush();
        Some(result)
    }

    fn flush(&mut self) {
        for event in self.state.take_events() {
            for listener in self.listeners.iter_mut() {
                listener(&event);
            }
        }
    }

    /////////////////////////////////////////////////////////////////////////
    // Configuration
    /////////////////////////////////////////////////////////////////////////

    /// Reconfigures the board. A new `fen` replaces the placement map, animated.
    ///
    /// Replacing the map cancels a drag in progress, replays a staged premove
    /// once it is the movable side's turn, and keeps the selection only if the
    /// selected piece can still move.
    pub fn set(&mut self, config: Config) {
        self.run(|state| {
            if config.orientation.map_or(false, |o| o != state.orientation) {
                super::toggle_orientation(state);
            }
            config::apply_animation(state, &config);

            let replaced = if config.fen.is_some() {
                anim::anim(state, |s| config::configure(s, &config))
            } else {
                anim::render(state, |s| config::configure(s, &config))
            };

            if replaced && drag::discard(state) {
                debug!("position replaced during drag; drag cancelled");
            }

            let turn = state.turn_color;
            if state.premovable.current.is_some()
                && state.movable.color.map_or(false, |c| c.is(turn))
            {
                anim::anim(state, super::play_premove);
            }

            if let Some(selected) = state.selected {
                if super::is_movable(state, selected) || super::is_premovable(state, selected) {
                    super::set_selected(state, selected);
                } else {
                    super::unselect(state);
                }
            }

            state.redraw();
        });
    }

    /// Returns the placement part of the current position.
    pub fn get_fen(&self) -> String {
        fen::board_fen(&self.state.pieces)
    }

    pub fn set_bounds(&mut self, bounds: Bounds) {
        self.run(|state| {
            state.bounds = bounds;
            state.redraw();
        });
    }

    pub fn toggle_orientation(&mut self) {
        self.run(|state| {
            super::toggle_orientation(state);
            state.redraw();
        });
    }

    /////////////////////////////////////////////////////////////////////////
    // Programmatic changes
    /////////////////////////////////////////////////////////////////////////

    /// Moves a piece regardless of the rules.
    pub fn move_piece(&mut self, orig: Square, dest: Square) {
        self.run(|state| anim::anim(state, |s| super::base_move(s, orig, dest)));
    }

    pub fn set_pieces(&mut self, pieces: PiecesDiff) {
        self.run(|state| anim::anim(state, |s| super::set_pieces(s, pieces)));
    }

    /// Activates a square as a click would, or clears the selection with `None`.
    ///
    /// Activating the selected square again releases it unless a drag is in progress.
    pub fn select_square(&mut self, key: Option<Square>, force: bool) {
        self.run(|state| match key {
            Some(key) if state.selected == Some(key) && state.draggable.current.is_none() => {
                state.emit(Event::Select(key));
                super::unselect(state);
                state.redraw();
            }
            Some(key) => anim::anim(state, |s| super::select_square(s, key, force)),
            None => {
                if state.selected.is_some() {
                    super::unselect(state);
                    state.redraw();
                }
            }
        });
    }

    pub fn new_piece(&mut self, piece: Piece, key: Square) {
        self.run(|state| anim::anim(state, |s| super::base_new_piece(s, piece, key, false)));
    }

    /// Plays the staged premove. Returns true if it was played.
    pub fn play_premove(&mut self) -> bool {
        self.run(|state| {
            if state.premovable.current.is_none() {
                return false;
            }
            let played = anim::anim(state, super::play_premove);
            if !played {
                state.redraw();
            }
            played
        })
        .unwrap_or(false)
    }

    pub fn cancel_premove(&mut self) {
        self.run(|state| anim::render(state, super::unset_premove));
    }

    /// Plays the staged predrop if `validate` accepts it. Returns true if it was played.
    pub fn play_predrop<F>(&mut self, validate: F) -> bool
    where
        F: FnOnce(&Predrop) -> bool,
    {
        self.run(|state| {
            if state.predroppable.current.is_none() {
                return false;
            }
            let played = super::play_predrop(state, validate);
            state.redraw();
            played
        })
        .unwrap_or(false)
    }

    pub fn cancel_predrop(&mut self) {
        self.run(|state| anim::render(state, super::unset_predrop));
    }

    /// Cancels the drag, selection and staged gestures. The placement map is untouched.
    pub fn cancel_move(&mut self) {
        self.run(|state| {
            anim::render(state, |s| {
                super::cancel_move(s);
                drag::cancel(s);
            })
        });
    }

    /// Cancels the current move and prevents further ones.
    pub fn stop(&mut self) {
        self.run(|state| {
            anim::render(state, |s| {
                super::stop(s);
                drag::cancel(s);
            })
        });
    }

    /// Runs the explosion effect on `keys`.
    pub fn explode(&mut self, keys: Vec<Square>) {
        self.run(|state| explosion::explosion(state, keys));
    }

    pub fn set_shapes(&mut self, shapes: Vec<DrawShape>) {
        self.run(|state| {
            anim::render(state, |s| s.drawable.shapes = shapes);
        });
    }

    pub fn set_auto_shapes(&mut self, shapes: Vec<DrawShape>) {
        self.run(|state| {
            anim::render(state, |s| s.drawable.auto_shapes = shapes);
        });
    }

    pub fn key_at_pos(&self, pos: Pos) -> Option<Square> {
        super::key_at_pos(&self.state, pos)
    }

    /////////////////////////////////////////////////////////////////////////
    // Drop mode
    /////////////////////////////////////////////////////////////////////////

    /// Makes every press place `piece` until [`Board::cancel_drop_mode`].
    pub fn set_drop_mode(&mut self, piece: Option<Piece>) {
        self.run(|state| drop::set_drop_mode(state, piece));
    }

    pub fn cancel_drop_mode(&mut self) {
        self.run(drop::cancel_drop_mode);
    }

    /////////////////////////////////////////////////////////////////////////
    // Pointer input
    /////////////////////////////////////////////////////////////////////////

    pub fn pointer_down(&mut self, pos: Pos) {
        self.run(|state| {
            if state.draggable.current.is_some() {
                drag::cancel(state);
            } else if state.view_only {
                trace!("press ignored on view only board");
            } else if state.dropmode.active {
                drop::drop(state, pos);
            } else {
                drag::start(state, pos);
            }
        });
    }

    pub fn pointer_move(&mut self, pos: Pos) {
        self.run(|state| drag::move_to(state, pos));
    }

    pub fn pointer_up(&mut self, pos: Pos) {
        self.run(|state| drag::end(state, pos));
    }

    /// The pointer left the board: cancels a drag in progress.
    pub fn pointer_leave(&mut self) {
        self.run(drag::cancel);
    }

    /// Starts dragging `piece` from outside the board, as from a piece bank.
    pub fn drag_new_piece(&mut self, piece: Piece, pos: Pos, force: bool) {
        self.run(|state| drag::drag_new_piece(state, piece, pos, force));
    }

    /////////////////////////////////////////////////////////////////////////
    // Frames
    /////////////////////////////////////////////////////////////////////////

    /// Advances the board clock by `elapsed`: runs due timers, steps the
    /// animation and the drag, then renders at most once if a redraw is pending.
    pub fn advance(&mut self, elapsed: Duration) {
        if self.destroyed {
            return;
        }

        let state = &mut self.state;
        let until = state.now() + elapsed;
        while let Some(task) = state.timers.pop_due(until) {
            trace!("timer {task:?} fired");
            match task {
                Task::Explosion { generation, step } => {
                    explosion::advance(state, generation, step)
                }
            }
        }
        state.timers.settle(until);

        anim::step(state);
        drag::process(state);

        if state.redraw_requested {
            self.redraw_now();
        }
        self.flush();
    }

    /// Renders immediately, clearing any pending redraw.
    pub fn redraw_now(&mut self) {
        if self.destroyed {
            return;
        }

        self.state.redraw_requested = false;
        if let Some(renderer) = self.renderer.as_mut() {
            trace!("rendering");
            renderer.render(&self.state);
        }
    }

    /// Releases listeners, timers and the renderer. Calling it again does nothing.
    pub fn destroy(&mut self) {
        if self.destroyed {
            trace!("board already destroyed");
            return;
        }

        debug!("destroying board");
        self.destroyed = true;
        self.state.timers.clear();
        self.state.draggable.current = None;
        self.state.animation.current = None;
        self.state.take_events();
        self.state.redraw_requested = false;
        self.listeners.clear();
        self.renderer = None;
    }
}
