//! Tick-counted timers.
//!
//! Two primitives: a [`Countdown`] owned by whoever is counting, and a
//! [`TimerQueue`] of deferred payloads fired when their tick comes due.
//! Timers cannot be cancelled. Whoever drains a payload must re-check that the
//! world still looks the way it did when the timer was scheduled.

use crate::types::Tick;
use std::collections::BTreeMap;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Countdown {
    remaining: u64,
}

impl Countdown {
    pub const fn new(ticks: u64) -> Self {
        Self { remaining: ticks }
    }

    pub fn start(&mut self, ticks: u64) {
        self.remaining = ticks;
    }

    /// Advance by one tick. Returns true only on the tick the countdown reaches zero.
    pub fn tick(&mut self) -> bool {
        if self.remaining == 0 {
            return false;
        }
        self.remaining -= 1;
        self.remaining == 0
    }

    pub fn remaining(&self) -> u64 {
        self.remaining
    }

    pub fn is_running(&self) -> bool {
        self.remaining > 0
    }
}

/// Handle returned when scheduling; only useful for logging and tests.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimerId(pub u64);

#[derive(Clone, Debug)]
pub struct TimerQueue<T> {
    pending: BTreeMap<Tick, Vec<(TimerId, T)>>,
    next_id: u64,
}

impl<T> Default for TimerQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> TimerQueue<T> {
    pub fn new() -> Self {
        Self {
            pending: BTreeMap::new(),
            next_id: 0,
        }
    }

    /// Schedule `payload` to fire `delay` ticks after `now`.
    pub fn schedule(&mut self, now: Tick, delay: u64, payload: T) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        self.pending
            .entry(now + delay)
            .or_default()
            .push((id, payload));
        id
    }

    /// Remove and return every payload due at or before `now`,
    /// ordered by fire tick and then by scheduling order.
    pub fn drain_due(&mut self, now: Tick) -> Vec<T> {
        let later = match now.checked_add(1) {
            Some(next) => self.pending.split_off(&next),
            None => BTreeMap::new(),
        };
        let due = std::mem::replace(&mut self.pending, later);
        due.into_values()
            .flat_map(|timers| timers.into_iter().map(|(_, payload)| payload))
            .collect()
    }

    /// Tick of the earliest pending timer.
    pub fn next_due(&self) -> Option<Tick> {
        self.pending.keys().next().copied()
    }

    pub fn len(&self) -> usize {
        self.pending.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn countdown_fires_once() {
        let mut c = Countdown::new(3);
        assert!(!c.tick());
        assert!(!c.tick());
        assert!(c.tick());
        assert!(!c.tick());
        assert!(!c.is_running());
    }

    #[test]
    fn countdown_restart() {
        let mut c = Countdown::default();
        assert!(!c.tick());
        c.start(1);
        assert!(c.is_running());
        assert!(c.tick());
    }

    #[test]
    fn drain_returns_only_due_payloads() {
        let mut q = TimerQueue::new();
        q.schedule(10, 5, "a");
        q.schedule(10, 2, "b");
        q.schedule(10, 20, "c");

        assert!(q.drain_due(11).is_empty());
        assert_eq!(q.drain_due(15), vec!["b", "a"]);
        assert_eq!(q.len(), 1);
        assert_eq!(q.next_due(), Some(30));
    }

    #[test]
    fn same_tick_keeps_schedule_order() {
        let mut q = TimerQueue::new();
        q.schedule(0, 4, 1);
        q.schedule(2, 2, 2);
        q.schedule(3, 1, 3);
        assert_eq!(q.drain_due(4), vec![1, 2, 3]);
        assert!(q.is_empty());
    }

    #[test]
    fn zero_delay_fires_on_current_tick() {
        let mut q = TimerQueue::new();
        q.schedule(7, 0, ());
        assert_eq!(q.drain_due(7).len(), 1);
    }

    #[test]
    fn late_drain_collects_everything_overdue() {
        let mut q = TimerQueue::new();
        q.schedule(0, 1, 'x');
        q.schedule(0, 2, 'y');
        assert_eq!(q.drain_due(100), vec!['x', 'y']);
    }
}
