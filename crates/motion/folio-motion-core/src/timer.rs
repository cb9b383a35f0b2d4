//! Virtual-clock timer queue: schedule-once, schedule-repeating, cancel.
//!
//! Time is integer milliseconds so firing order is exact. Firings are pulled
//! one at a time with [`TimerQueue::pop_due`]; the clock stands at the firing
//! instant while the caller handles it, so a handler can cancel the timer or
//! schedule follow-ups relative to that instant before the next firing is
//! computed.

use serde::{Deserialize, Serialize};

use crate::error::{MotionError, Result};
use crate::ids::TimerId;

#[derive(Clone, Debug)]
struct Timer {
    id: TimerId,
    due_ms: u64,
    period_ms: Option<u64>,
}

/// One timer firing.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fired {
    pub timer: TimerId,
    pub at_ms: u64,
}

#[derive(Debug, Default)]
pub struct TimerQueue {
    now_ms: u64,
    next_id: u32,
    timers: Vec<Timer>,
}

impl TimerQueue {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn now_ms(&self) -> u64 {
        self.now_ms
    }

    fn alloc(&mut self) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id = self.next_id.wrapping_add(1);
        id
    }

    /// Fire once, `delay_ms` after the current instant.
    pub fn schedule_once(&mut self, delay_ms: u64) -> TimerId {
        let id = self.alloc();
        self.timers.push(Timer {
            id,
            due_ms: self.now_ms + delay_ms,
            period_ms: None,
        });
        id
    }

    /// Fire every `period_ms`, first firing one period from now.
    pub fn schedule_repeating(&mut self, period_ms: u64) -> Result<TimerId> {
        if period_ms == 0 {
            return Err(MotionError::ZeroPeriod);
        }
        let id = self.alloc();
        self.timers.push(Timer {
            id,
            due_ms: self.now_ms + period_ms,
            period_ms: Some(period_ms),
        });
        Ok(id)
    }

    /// Cancel a pending timer. Returns whether anything was cancelled;
    /// cancelling twice or cancelling a spent one-shot is a no-op.
    pub fn cancel(&mut self, id: TimerId) -> bool {
        let before = self.timers.len();
        self.timers.retain(|t| t.id != id);
        before != self.timers.len()
    }

    pub fn cancel_all(&mut self) {
        self.timers.clear();
    }

    #[inline]
    pub fn is_pending(&self, id: TimerId) -> bool {
        self.timers.iter().any(|t| t.id == id)
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.timers.is_empty()
    }

    /// Pop the earliest firing due at or before `until_ms`, ordered by
    /// (due time, id). Moves the clock to the firing instant. Repeating
    /// timers are rescheduled one period later.
    pub fn pop_due(&mut self, until_ms: u64) -> Option<Fired> {
        let idx = self
            .timers
            .iter()
            .enumerate()
            .filter(|(_, t)| t.due_ms <= until_ms)
            .min_by_key(|(_, t)| (t.due_ms, t.id))
            .map(|(i, _)| i)?;

        let at_ms = self.timers[idx].due_ms;
        let timer = self.timers[idx].id;
        self.now_ms = self.now_ms.max(at_ms);
        match self.timers[idx].period_ms {
            Some(period) => self.timers[idx].due_ms += period,
            None => {
                self.timers.swap_remove(idx);
            }
        }
        Some(Fired { timer, at_ms })
    }

    /// Move the clock to `until_ms` once all due firings have been popped.
    pub fn settle(&mut self, until_ms: u64) {
        self.now_ms = self.now_ms.max(until_ms);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drain(q: &mut TimerQueue, dt: u64) -> Vec<Fired> {
        let until = q.now_ms() + dt;
        let mut out = Vec::new();
        while let Some(f) = q.pop_due(until) {
            out.push(f);
        }
        q.settle(until);
        out
    }

    #[test]
    fn repeating_fires_each_period() {
        let mut q = TimerQueue::new();
        let id = q.schedule_repeating(150).unwrap();
        let fired = drain(&mut q, 450);
        assert_eq!(
            fired.iter().map(|f| f.at_ms).collect::<Vec<_>>(),
            vec![150, 300, 450]
        );
        assert!(fired.iter().all(|f| f.timer == id));
        assert_eq!(q.now_ms(), 450);
    }

    #[test]
    fn cancel_is_idempotent() {
        let mut q = TimerQueue::new();
        let id = q.schedule_once(10);
        assert!(q.cancel(id));
        assert!(!q.cancel(id));
        assert!(drain(&mut q, 100).is_empty());
    }

    #[test]
    fn handler_can_cancel_between_firings() {
        let mut q = TimerQueue::new();
        let id = q.schedule_repeating(100).unwrap();
        let until = 1_000;
        let mut count = 0;
        while let Some(f) = q.pop_due(until) {
            count += 1;
            if f.at_ms == 300 {
                q.cancel(id);
            }
        }
        assert_eq!(count, 3);
    }

    #[test]
    fn follow_up_is_relative_to_firing_instant() {
        let mut q = TimerQueue::new();
        q.schedule_once(100);
        let f = q.pop_due(1_000).unwrap();
        assert_eq!(f.at_ms, 100);
        let follow = q.schedule_once(50);
        let next = q.pop_due(1_000).unwrap();
        assert_eq!(next, Fired { timer: follow, at_ms: 150 });
    }

    #[test]
    fn zero_period_rejected() {
        let mut q = TimerQueue::new();
        assert_eq!(q.schedule_repeating(0), Err(MotionError::ZeroPeriod));
    }
}
