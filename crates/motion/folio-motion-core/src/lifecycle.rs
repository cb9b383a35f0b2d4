//! Teardown registry. Every resource a scope creates registers exactly one
//! [`Teardown`]; [`Lifecycle::run_all`] drains the registry in reverse
//! registration order, so each action runs at most once.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::ids::{ListenerId, ProgressId, TimelineId, TimerId, TriggerId};

/// Host-supplied cleanup (e.g. removing a real DOM listener).
pub struct HostTeardown(Box<dyn FnOnce()>);

impl HostTeardown {
    pub fn new(f: impl FnOnce() + 'static) -> Self {
        Self(Box::new(f))
    }

    pub fn run(self) {
        (self.0)()
    }
}

impl fmt::Debug for HostTeardown {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("HostTeardown(..)")
    }
}

#[derive(Debug)]
pub enum Teardown {
    CancelTimer(TimerId),
    KillTimeline(TimelineId),
    RemoveTrigger(TriggerId),
    CancelProgress(ProgressId),
    RemoveListener(ListenerId),
    Host(HostTeardown),
}

/// Counts of what a disposal released.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeardownReport {
    pub timers: usize,
    pub timelines: usize,
    pub triggers: usize,
    pub progress: usize,
    pub listeners: usize,
    pub host: usize,
}

impl TeardownReport {
    pub fn total(&self) -> usize {
        self.timers + self.timelines + self.triggers + self.progress + self.listeners + self.host
    }

    pub fn merge(&mut self, other: TeardownReport) {
        self.timers += other.timers;
        self.timelines += other.timelines;
        self.triggers += other.triggers;
        self.progress += other.progress;
        self.listeners += other.listeners;
        self.host += other.host;
    }

    pub fn record(&mut self, action: &Teardown) {
        match action {
            Teardown::CancelTimer(_) => self.timers += 1,
            Teardown::KillTimeline(_) => self.timelines += 1,
            Teardown::RemoveTrigger(_) => self.triggers += 1,
            Teardown::CancelProgress(_) => self.progress += 1,
            Teardown::RemoveListener(_) => self.listeners += 1,
            Teardown::Host(_) => self.host += 1,
        }
    }
}

#[derive(Debug, Default)]
pub struct Lifecycle {
    pending: Vec<Teardown>,
    released: bool,
}

impl Lifecycle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a teardown. Ignored once the lifecycle has been released;
    /// a host action registered that late runs immediately instead.
    pub fn register(&mut self, action: Teardown) {
        if self.released {
            if let Teardown::Host(h) = action {
                h.run();
            }
            return;
        }
        self.pending.push(action);
    }

    /// Forget a teardown whose resource was released early.
    pub fn forget(&mut self, pred: impl Fn(&Teardown) -> bool) {
        self.pending.retain(|t| !pred(t));
    }

    #[inline]
    pub fn is_released(&self) -> bool {
        self.released
    }

    #[inline]
    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    /// Drain every registered action, newest first, handing each to `run`.
    /// Host actions are executed here. Later calls find nothing to do.
    pub fn run_all(&mut self, mut run: impl FnMut(&Teardown)) -> TeardownReport {
        self.released = true;
        let mut report = TeardownReport::default();
        while let Some(action) = self.pending.pop() {
            report.record(&action);
            match action {
                Teardown::Host(h) => h.run(),
                other => run(&other),
            }
        }
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn runs_newest_first_exactly_once() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut lc = Lifecycle::new();
        lc.register(Teardown::CancelTimer(TimerId(0)));
        let l = log.clone();
        lc.register(Teardown::Host(HostTeardown::new(move || l.borrow_mut().push("host"))));
        lc.register(Teardown::KillTimeline(TimelineId(1)));

        let seen = log.clone();
        let report = lc.run_all(|t| {
            seen.borrow_mut().push(match t {
                Teardown::CancelTimer(_) => "timer",
                Teardown::KillTimeline(_) => "timeline",
                _ => "other",
            })
        });
        assert_eq!(*log.borrow(), vec!["timeline", "host", "timer"]);
        assert_eq!(report.total(), 3);

        let again = lc.run_all(|_| panic!("ran twice"));
        assert_eq!(again.total(), 0);
    }

    #[test]
    fn late_host_action_runs_immediately() {
        let hit = Rc::new(RefCell::new(false));
        let mut lc = Lifecycle::new();
        lc.run_all(|_| {});
        let h = hit.clone();
        lc.register(Teardown::Host(HostTeardown::new(move || *h.borrow_mut() = true)));
        assert!(*hit.borrow());
        assert_eq!(lc.pending(), 0);
    }
}
