//! Simulated loading progress with a one-shot completion callback.
//!
//! Phases: `Idle -> Running -> Completing -> Done`, or `Cancelled` from any
//! non-terminal phase. While Running a repeating timer adds a bounded random
//! increment to the value. Reaching 100 clamps the value to exactly 100,
//! cancels the interval for good and schedules the settle delay; when that
//! fires the completion callback runs once and the phase becomes Done.
//! Terminal phases ignore every further command, so the callback can never
//! run twice.

use std::fmt;

use log::{debug, trace};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::config::ProgressConfig;
use crate::error::{MotionError, Result};
use crate::ids::TimerId;
use crate::interp::Easing;
use crate::surface::TargetHandle;
use crate::timer::TimerQueue;

pub const PROGRESS_MAX: f32 = 100.0;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProgressPhase {
    Idle,
    Running,
    /// Value is 100; waiting out the settle delay.
    Completing,
    Done,
    Cancelled,
}

impl ProgressPhase {
    pub fn is_terminal(&self) -> bool {
        matches!(self, ProgressPhase::Done | ProgressPhase::Cancelled)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum StartOutcome {
    Started,
    /// A running instance was superseded; its callback was dropped unfired.
    Restarted,
    /// Already Done or Cancelled; nothing happened.
    Ignored,
}

/// What happened during one [`ProgressSimulator::advance`].
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ProgressUpdate {
    /// Value after each tick, in firing order.
    pub ticks: Vec<f32>,
    /// The completion callback ran during this advance.
    pub completed: bool,
    /// Displayed bar width (0..=100) at the end of the advance.
    pub bar: Option<f32>,
}

/// Smoothed follower for a progress bar: every retarget starts a fresh
/// tween from the currently displayed width.
#[derive(Clone, Debug)]
pub struct ProgressBar {
    displayed: f32,
    from: f32,
    target: f32,
    elapsed: f32,
    duration: f32,
    ease: Easing,
}

impl ProgressBar {
    pub fn new(duration: f32, ease: Easing) -> Self {
        Self {
            displayed: 0.0,
            from: 0.0,
            target: 0.0,
            elapsed: 0.0,
            duration: duration.max(0.0),
            ease,
        }
    }

    #[inline]
    pub fn displayed(&self) -> f32 {
        self.displayed
    }

    #[inline]
    pub fn target(&self) -> f32 {
        self.target
    }

    pub fn retarget(&mut self, value: f32) {
        self.from = self.displayed;
        self.target = value;
        self.elapsed = 0.0;
        if self.duration <= 0.0 {
            self.displayed = value;
        }
    }

    pub fn advance(&mut self, dt_secs: f32) -> f32 {
        if self.duration <= 0.0 || self.elapsed >= self.duration {
            self.displayed = self.target;
            return self.displayed;
        }
        self.elapsed += dt_secs.max(0.0);
        let t = self.elapsed / self.duration;
        self.displayed = if t >= 1.0 {
            self.target
        } else {
            self.from + (self.target - self.from) * self.ease.apply(t)
        };
        self.displayed
    }
}

type Callback = Box<dyn FnOnce()>;

pub struct ProgressSimulator {
    min_increment: f32,
    max_increment: f32,
    settle_ms: u64,
    timers: TimerQueue,
    rng: StdRng,
    phase: ProgressPhase,
    value: f32,
    tick_timer: Option<TimerId>,
    settle_timer: Option<TimerId>,
    on_complete: Option<Callback>,
    bar: ProgressBar,
    bar_target: Option<TargetHandle>,
}

impl fmt::Debug for ProgressSimulator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProgressSimulator")
            .field("phase", &self.phase)
            .field("value", &self.value)
            .field("tick_timer", &self.tick_timer)
            .field("settle_timer", &self.settle_timer)
            .field("has_callback", &self.on_complete.is_some())
            .finish()
    }
}

impl ProgressSimulator {
    pub fn new(config: &ProgressConfig) -> Result<Self> {
        let (min, max) = (config.min_increment, config.max_increment);
        if !(min.is_finite() && max.is_finite() && min > 0.0 && min <= max) {
            return Err(MotionError::InvalidIncrement { min, max });
        }
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Ok(Self {
            min_increment: min,
            max_increment: max,
            settle_ms: config.settle_ms,
            timers: TimerQueue::new(),
            rng,
            phase: ProgressPhase::Idle,
            value: 0.0,
            tick_timer: None,
            settle_timer: None,
            on_complete: None,
            bar: ProgressBar::new(config.bar_smoothing, config.bar_easing),
            bar_target: None,
        })
    }

    /// Report displayed bar widths for `target` in every update.
    pub fn with_bar(mut self, target: &str) -> Self {
        self.bar_target = Some(target.to_string());
        self
    }

    pub fn bar_target(&self) -> Option<&str> {
        self.bar_target.as_deref()
    }

    #[inline]
    pub fn phase(&self) -> ProgressPhase {
        self.phase
    }

    #[inline]
    pub fn value(&self) -> f32 {
        self.value
    }

    pub fn bar(&self) -> &ProgressBar {
        &self.bar
    }

    /// Begin ticking every `interval_ms`. A running instance is superseded:
    /// its pending timers are cancelled and its callback dropped unfired.
    pub fn start(
        &mut self,
        interval_ms: u64,
        on_complete: impl FnOnce() + 'static,
    ) -> Result<StartOutcome> {
        if self.phase.is_terminal() {
            debug!("progress start ignored in {:?}", self.phase);
            return Ok(StartOutcome::Ignored);
        }
        // Schedule first: a rejected period leaves the current run intact.
        let id = self.timers.schedule_repeating(interval_ms)?;
        let outcome = if self.phase == ProgressPhase::Idle {
            StartOutcome::Started
        } else {
            self.cancel_timers();
            StartOutcome::Restarted
        };
        self.tick_timer = Some(id);
        self.value = 0.0;
        self.bar.retarget(0.0);
        self.on_complete = Some(Box::new(on_complete));
        self.phase = ProgressPhase::Running;
        Ok(outcome)
    }

    fn cancel_timers(&mut self) {
        if let Some(id) = self.tick_timer.take() {
            self.timers.cancel(id);
        }
        if let Some(id) = self.settle_timer.take() {
            self.timers.cancel(id);
        }
    }

    /// Stop ticking; the completion callback will never run.
    /// Returns whether anything was stopped.
    pub fn cancel(&mut self) -> bool {
        if self.phase.is_terminal() {
            return false;
        }
        self.cancel_timers();
        self.on_complete = None;
        self.phase = ProgressPhase::Cancelled;
        true
    }

    fn tick(&mut self) {
        let inc = self.rng.gen_range(self.min_increment..=self.max_increment);
        self.value += inc;
        trace!("progress tick +{inc:.2} -> {:.2}", self.value);
        if self.value >= PROGRESS_MAX {
            self.value = PROGRESS_MAX;
            if let Some(id) = self.tick_timer.take() {
                self.timers.cancel(id);
            }
            self.settle_timer = Some(self.timers.schedule_once(self.settle_ms));
            self.phase = ProgressPhase::Completing;
        }
        self.bar.retarget(self.value);
    }

    fn complete(&mut self) {
        self.settle_timer = None;
        self.phase = ProgressPhase::Done;
        if let Some(cb) = self.on_complete.take() {
            debug!("progress complete");
            cb();
        }
    }

    /// Run the virtual clock forward by `dt_ms`.
    pub fn advance(&mut self, dt_ms: u64) -> ProgressUpdate {
        let mut update = ProgressUpdate::default();
        let start = self.timers.now_ms();
        let until = start + dt_ms;
        let mut last = start;
        while let Some(fired) = self.timers.pop_due(until) {
            self.bar.advance((fired.at_ms - last) as f32 / 1000.0);
            last = fired.at_ms;
            if Some(fired.timer) == self.tick_timer {
                self.tick();
                update.ticks.push(self.value);
            } else if Some(fired.timer) == self.settle_timer {
                self.complete();
                update.completed = true;
            }
        }
        self.timers.settle(until);
        let width = self.bar.advance((until - last) as f32 / 1000.0);
        if self.bar_target.is_some() && self.phase != ProgressPhase::Idle {
            update.bar = Some(width);
        }
        update
    }
}
