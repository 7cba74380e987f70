use alloc::collections::VecDeque;

use crate::*;

#[derive(Clone, Debug, PartialEq)]
struct Scheduled<T> {
    due: Timestamp,
    task: T,
}

/// Delayed continuations on a single cooperative timeline.
///
/// Tasks come out ordered by due time, ties in the order they were scheduled. While a task is
/// being handed out the timeline's clock reads its due time, so follow-ups scheduled from it are
/// relative to when it was due rather than to the end of the tick that ran it.
#[derive(Clone, Debug, PartialEq)]
pub struct Timeline<T> {
    now: Timestamp,
    horizon: Timestamp,
    pending: VecDeque<Scheduled<T>>,
}

impl<T> Timeline<T> {
    pub fn new() -> Self {
        Self {
            now: 0.,
            horizon: 0.,
            pending: VecDeque::new(),
        }
    }

    pub fn now(&self) -> Timestamp {
        self.now
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn schedule(&mut self, delay: Seconds, task: T) {
        let due = self.now + Timestamp::from(delay.max(0.));
        let at = self.pending.partition_point(|entry| entry.due <= due);
        self.pending.insert(at, Scheduled { due, task });
    }

    /// Opens the next `dt` seconds for [`Timeline::pop_due`].
    pub fn advance(&mut self, dt: Seconds) {
        self.horizon = self.now.max(self.horizon) + Timestamp::from(dt.max(0.));
    }

    /// Next task due within the advanced window. Once none is left the clock moves to the end of
    /// the window.
    pub fn pop_due(&mut self) -> Option<T> {
        match self.pending.front() {
            Some(entry) if entry.due <= self.horizon => {
                self.now = self.now.max(entry.due);
                self.pending.pop_front().map(|entry| entry.task)
            }
            _ => {
                self.now = self.horizon;
                None
            }
        }
    }
}

impl<T> Default for Timeline<T> {
    fn default() -> Self {
        Self::new()
    }
}
