//! A cooperative timer queue driven by the host's frame tick.
//!
//! Nothing runs in the background: the board advances the clock on every
//! tick and runs the tasks whose deadline has passed, in deadline order.

use std::time::Duration;

/// Work scheduled by the board for a later tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Task {
    /// Advances the explosion started as `generation` to its next stage.
    Explosion { generation: u64, step: ExplosionStep },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExplosionStep {
    SecondStage,
    Clear,
}

#[derive(Debug, Clone)]
struct Timer<T> {
    deadline: Duration,
    seq: u64,
    task: T,
}

/// Pending tasks ordered by deadline, then by scheduling order.
#[derive(Debug, Clone)]
pub struct TimerQueue<T> {
    clock: Duration,
    seq: u64,
    pending: Vec<Timer<T>>,
}

impl<T> Default for TimerQueue<T> {
    fn default() -> TimerQueue<T> {
        TimerQueue {
            clock: Duration::ZERO,
            seq: 0,
            pending: Vec::new(),
        }
    }
}

impl<T> TimerQueue<T> {
    /// Returns the time elapsed since the queue was created.
    pub fn now(&self) -> Duration {
        self.clock
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Schedules `task` to run `delay` after the current time.
    pub fn schedule(&mut self, delay: Duration, task: T) {
        self.seq += 1;
        self.pending.push(Timer {
            deadline: self.clock + delay,
            seq: self.seq,
            task,
        });
    }

    /// Removes the earliest task due at or before `until` and moves the clock to its deadline.
    ///
    /// Tasks scheduled while handling a popped task are relative to that
    /// task's deadline, so they may become due within the same tick.
    pub fn pop_due(&mut self, until: Duration) -> Option<T> {
        let (index, _) = self
            .pending
            .iter()
            .enumerate()
            .filter(|(_, t)| t.deadline <= until)
            .min_by_key(|(_, t)| (t.deadline, t.seq))?;

        let timer = self.pending.remove(index);
        self.clock = self.clock.max(timer.deadline);
        Some(timer.task)
    }

    /// Moves the clock forward to `until` once every due task has run.
    pub fn settle(&mut self, until: Duration) {
        self.clock = self.clock.max(until);
    }

    pub fn clear(&mut self) {
        self.pending.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn pops_in_deadline_order() {
        let mut q = TimerQueue::default();
        q.schedule(ms(50), "b");
        q.schedule(ms(10), "a");
        q.schedule(ms(50), "c");
        q.schedule(ms(90), "d");

        assert_eq!(Some("a"), q.pop_due(ms(60)));
        assert_eq!(ms(10), q.now());
        assert_eq!(Some("b"), q.pop_due(ms(60)));
        assert_eq!(Some("c"), q.pop_due(ms(60)));
        assert_eq!(None, q.pop_due(ms(60)));

        q.settle(ms(60));
        assert_eq!(ms(60), q.now());
        assert_eq!(1, q.len());
    }

    #[test]
    fn chained_tasks_fire_within_one_tick() {
        let mut q = TimerQueue::default();
        q.schedule(ms(120), 1);

        let mut fired = Vec::new();
        while let Some(n) = q.pop_due(ms(300)) {
            fired.push(n);
            if n == 1 {
                q.schedule(ms(120), 2);
            }
        }
        q.settle(ms(300));

        assert_eq!(vec![1, 2], fired);
        assert!(q.is_empty());
    }

    #[test]
    fn clear_drops_pending() {
        let mut q = TimerQueue::default();
        q.schedule(ms(1), ());
        q.clear();
        assert_eq!(None, q.pop_due(ms(10)));
    }
}
