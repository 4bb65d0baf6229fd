//! Two-stage explosion effect on a set of squares.
//!
//! Purely visual: the placement map is untouched. Each explosion gets a new
//! generation so the timers of an earlier one never advance it.

use std::time::Duration;

use log::trace;

use super::state::{Exploding, State};
use super::timer::{ExplosionStep, Task};
use crate::square::Square;

/// Duration of each explosion stage.
pub const STAGE_DURATION: Duration = Duration::from_millis(120);

/// Starts an explosion on `keys` at stage 1.
pub fn explosion(s: &mut State, keys: Vec<Square>) {
    s.explosion_generation += 1;
    let generation = s.explosion_generation;

    s.exploding = Some(Exploding { stage: 1, keys });
    s.timers.schedule(
        STAGE_DURATION,
        Task::Explosion {
            generation,
            step: ExplosionStep::SecondStage,
        },
    );
    s.redraw();
}

/// Runs an explosion timer.
pub(crate) fn advance(s: &mut State, generation: u64, step: ExplosionStep) {
    if generation != s.explosion_generation || s.exploding.is_none() {
        trace!("stale explosion timer {generation} ignored");
        return;
    }

    match step {
        ExplosionStep::SecondStage => {
            if let Some(exploding) = s.exploding.as_mut() {
                exploding.stage = 2;
            }
            s.timers.schedule(
                STAGE_DURATION,
                Task::Explosion {
                    generation,
                    step: ExplosionStep::Clear,
                },
            );
        }
        ExplosionStep::Clear => s.exploding = None,
    }
    s.redraw();
}
