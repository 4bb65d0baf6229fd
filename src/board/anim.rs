//! Piece animation between two placements.
//!
//! When a mutation changes the placement map, pieces that reappear on another
//! square slide there from the closest square they vanished from, and pieces
//! that vanished without a match fade out. Vectors are in squares, expressed
//! as `(files, ranks)` from the destination back to the origin, and shrink to
//! zero as the animation progresses.

use std::time::Duration;

use rustc_hash::FxHashMap;

use super::state::State;
use crate::square::Square;
use crate::{Piece, Pieces};

/// Offset of a sliding piece: the full vector and its current, eased value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnimVector {
    pub from: (f64, f64),
    pub current: (f64, f64),
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnimPlan {
    pub anims: FxHashMap<Square, AnimVector>,
    pub fadings: FxHashMap<Square, Piece>,
}

impl AnimPlan {
    pub fn is_empty(&self) -> bool {
        self.anims.is_empty() && self.fadings.is_empty()
    }
}

#[derive(Debug, Clone)]
pub struct AnimCurrent {
    pub start: Duration,
    pub duration: Duration,
    pub plan: AnimPlan,
}

impl AnimCurrent {
    /// Fraction of the animation still to run, in `[0, 1]`.
    pub fn rest(&self, now: Duration) -> f64 {
        if self.duration.is_zero() {
            return 0.0;
        }

        let elapsed = now.saturating_sub(self.start).as_secs_f64();
        (1.0 - elapsed / self.duration.as_secs_f64()).clamp(0.0, 1.0)
    }
}

fn vector(from: Square, to: Square) -> (f64, f64) {
    (
        f64::from(from.file()) - f64::from(to.file()),
        f64::from(from.rank()) - f64::from(to.rank()),
    )
}

fn distance_sq(a: Square, b: Square) -> i32 {
    let df = i32::from(a.file()) - i32::from(b.file());
    let dr = i32::from(a.rank()) - i32::from(b.rank());
    df * df + dr * dr
}

/// Computes how to animate from `prev` to `current`.
pub fn compute_plan(prev: &Pieces, current: &Pieces) -> AnimPlan {
    let mut missings: Vec<(Square, Piece)> = Vec::new();
    let mut news: Vec<(Square, Piece)> = Vec::new();

    for sq in Square::iter() {
        match (current.get(&sq), prev.get(&sq)) {
            (Some(cur), Some(pre)) if cur != pre => {
                missings.push((sq, *pre));
                news.push((sq, *cur));
            }
            (Some(cur), None) => news.push((sq, *cur)),
            (None, Some(pre)) => missings.push((sq, *pre)),
            _ => {}
        }
    }

    let mut plan = AnimPlan::default();
    let mut animed_origs: Vec<Square> = Vec::new();

    for &(sq, pc) in &news {
        let closest = missings
            .iter()
            .filter(|(_, p)| *p == pc)
            .min_by_key(|(from, _)| distance_sq(*from, sq));

        if let Some(&(from, _)) = closest {
            let v = vector(from, sq);
            plan.anims.insert(sq, AnimVector { from: v, current: v });
            animed_origs.push(from);
        }
    }

    for (sq, pc) in missings {
        if !animed_origs.contains(&sq) {
            plan.fadings.insert(sq, pc);
        }
    }

    plan
}

fn easing(t: f64) -> f64 {
    if t < 0.5 {
        4.0 * t * t * t
    } else {
        (t - 1.0) * (2.0 * t - 2.0) * (2.0 * t - 2.0) + 1.0
    }
}

/// Applies `mutation`, requesting a redraw.
pub fn render<R>(state: &mut State, mutation: impl FnOnce(&mut State) -> R) -> R {
    let result = mutation(state);
    state.redraw();
    result
}

/// Applies `mutation`, animating the resulting placement change when animation is enabled.
pub fn anim<R>(state: &mut State, mutation: impl FnOnce(&mut State) -> R) -> R {
    if !state.animation.enabled {
        return render(state, mutation);
    }

    let prev = state.pieces.clone();
    let result = mutation(state);
    let plan = compute_plan(&prev, &state.pieces);

    if !plan.is_empty() {
        state.animation.current = Some(AnimCurrent {
            start: state.now(),
            duration: state.animation.duration,
            plan,
        });
    }
    state.redraw();

    result
}

/// Advances the running animation to the board clock.
pub fn step(state: &mut State) {
    let now = state.now();
    let Some(cur) = state.animation.current.as_mut() else {
        return;
    };

    let rest = cur.rest(now);
    if rest <= 0.0 {
        state.animation.current = None;
    } else {
        let ease = easing(rest);
        for v in cur.plan.anims.values_mut() {
            v.current = (v.from.0 * ease, v.from.1 * ease);
        }
    }
    state.redraw();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fen;
    use crate::square::consts::*;
    use crate::{Color, PieceType};

    #[test]
    fn plan_for_a_move() {
        let prev = fen::decode(fen::INITIAL_FEN).unwrap();
        let mut cur = prev.clone();
        let cannon = cur.remove(&SQ_H2).unwrap();
        cur.insert(SQ_E2, cannon);

        let plan = compute_plan(&prev, &cur);
        assert_eq!(1, plan.anims.len());
        assert_eq!((3.0, 0.0), plan.anims[&SQ_E2].from);
        assert!(plan.fadings.is_empty());
    }

    #[test]
    fn plan_for_a_capture() {
        let prev = fen::decode("4k4/9/9/9/9/4p4/9/9/9/4R1K2").unwrap();
        let mut cur = prev.clone();
        let rook = cur.remove(&SQ_E0).unwrap();
        let pawn = cur.insert(SQ_E4, rook);

        let plan = compute_plan(&prev, &cur);
        assert_eq!((0.0, -4.0), plan.anims[&SQ_E4].from);
        assert_eq!(pawn, plan.fadings.get(&SQ_E4).copied());
    }

    #[test]
    fn closest_origin_wins() {
        let rook = Piece::new(PieceType::Rook, Color::Red);
        let prev: Pieces = [(SQ_A0, rook), (SQ_I0, rook)].into_iter().collect();
        let cur: Pieces = [(SQ_A0, rook), (SQ_H0, rook)].into_iter().collect();

        let plan = compute_plan(&prev, &cur);
        assert_eq!((1.0, 0.0), plan.anims[&SQ_H0].from);
    }

    #[test]
    fn anim_runs_to_completion() {
        let mut state = State::default();
        anim(&mut state, |s| {
            let cannon = s.pieces.remove(&SQ_B2).unwrap();
            s.pieces.insert(SQ_E2, cannon);
        });
        assert!(state.animation.current.is_some());
        assert!(state.redraw_requested());

        state.timers.settle(Duration::from_millis(100));
        step(&mut state);
        let v = state.animation.current.as_ref().unwrap().plan.anims[&SQ_E2];
        assert!(v.current.0 < 0.0 && v.current.0 > -3.0);

        state.timers.settle(Duration::from_millis(200));
        step(&mut state);
        assert!(state.animation.current.is_none());
    }

    #[test]
    fn disabled_animation_only_renders() {
        let mut state = State::default();
        state.animation.enabled = false;
        anim(&mut state, |s| s.pieces.clear());
        assert!(state.animation.current.is_none());
        assert!(state.redraw_requested());
    }

    #[test]
    fn easing_bounds() {
        assert_eq!(0.0, easing(0.0));
        assert_eq!(1.0, easing(1.0));
        assert!(easing(0.25) < 0.25);
    }
}
