//! Section-scoped animation context.
//!
//! A [`Scope`] owns everything one UI section creates: timelines, viewport
//! triggers, timers, progress simulators and listeners. Each registration
//! records its teardown in the scope's [`Lifecycle`]; [`Scope::dispose`]
//! (also run on drop) releases them all. Once disposed the scope is inert:
//! every call is a no-op that yields no changes and no events.
//!
//! The host drives a scope with [`Scope::update`] (elapsed milliseconds) and
//! [`Scope::scroll`] (viewport moves), then drains [`Scope::take_outputs`].

use indexmap::IndexMap;
use log::{debug, trace, warn};

use crate::config::Config;
use crate::error::Result;
use crate::ids::{IdAllocator, ListenerId, ProgressId, TimelineId, TimerId, TriggerId};
use crate::lifecycle::{HostTeardown, Lifecycle, Teardown, TeardownReport};
use crate::outputs::{Change, MotionEvent, Outputs};
use crate::progress::ProgressSimulator;
use crate::surface::Surface;
use crate::timeline::{PlayState, Tick, Timeline};
use crate::timer::TimerQueue;
use crate::trigger::{Boundary, Trigger, TriggerAction, TriggerSpec};
use crate::value::{Property, Value};
use crate::viewport::{BoundaryKind, Crossing, Direction, ScrollObserver, Viewport};

fn push_capped(outputs: &mut Outputs, cap: usize, event: MotionEvent) {
    if cap == 0 {
        return;
    }
    if outputs.events.len() >= cap {
        warn!("pending event cap ({cap}) reached; dropping oldest");
        outputs.events.remove(0);
    }
    outputs.events.push(event);
}

#[derive(Debug)]
pub struct Scope {
    name: String,
    config: Config,
    ids: IdAllocator,
    timers: TimerQueue,
    timelines: IndexMap<TimelineId, Timeline>,
    triggers: IndexMap<TriggerId, Trigger>,
    observer: ScrollObserver,
    progress: IndexMap<ProgressId, ProgressSimulator>,
    listeners: IndexMap<ListenerId, String>,
    lifecycle: Lifecycle,
    outputs: Outputs,
    disposed: bool,
}

impl Scope {
    pub fn new(name: &str, config: Config) -> Self {
        debug!("scope '{name}' created");
        Self {
            name: name.to_string(),
            config,
            ids: IdAllocator::new(),
            timers: TimerQueue::new(),
            timelines: IndexMap::new(),
            triggers: IndexMap::new(),
            observer: ScrollObserver::new(),
            progress: IndexMap::new(),
            listeners: IndexMap::new(),
            lifecycle: Lifecycle::new(),
            outputs: Outputs::default(),
            disposed: false,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    #[inline]
    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    /// Scope clock in milliseconds.
    pub fn now_ms(&self) -> u64 {
        self.timers.now_ms()
    }

    fn emit(&mut self, event: MotionEvent) {
        push_capped(&mut self.outputs, self.config.max_pending_events, event);
    }

    // ---- timelines ----

    /// Register a compiled timeline. Its initial state is emitted right away
    /// so targets never show un-animated content before the first update.
    pub fn add_timeline(&mut self, timeline: Timeline, surface: &dyn Surface) -> TimelineId {
        let id = self.ids.alloc_timeline();
        if self.disposed {
            trace!("scope '{}': add_timeline after dispose ignored", self.name);
            return id;
        }
        for target in timeline.targets() {
            if !surface.contains(target) {
                let target = target.to_string();
                self.emit(MotionEvent::TargetMissing { target });
            }
        }
        let initial: Vec<Change> = timeline
            .initial_changes()
            .into_iter()
            .filter(|c| surface.contains(&c.target))
            .collect();
        self.outputs.changes.extend(initial);
        self.timelines.insert(id, timeline);
        self.lifecycle.register(Teardown::KillTimeline(id));
        id
    }

    pub fn timeline(&self, id: TimelineId) -> Option<&Timeline> {
        self.timelines.get(&id)
    }

    pub fn play(&mut self, id: TimelineId) -> bool {
        if self.disposed {
            return false;
        }
        let started = match self.timelines.get_mut(&id) {
            Some(tl) => tl.play(),
            None => false,
        };
        if started {
            self.emit(MotionEvent::TimelineStarted { timeline: id });
        }
        started
    }

    pub fn reverse(&mut self, id: TimelineId) -> bool {
        if self.disposed {
            return false;
        }
        self.timelines
            .get_mut(&id)
            .map(|tl| tl.reverse())
            .unwrap_or(false)
    }

    pub fn restart(&mut self, id: TimelineId) -> bool {
        if self.disposed {
            return false;
        }
        let restarted = self
            .timelines
            .get_mut(&id)
            .map(|tl| tl.restart())
            .unwrap_or(false);
        if restarted {
            self.emit(MotionEvent::TimelineStarted { timeline: id });
        }
        restarted
    }

    pub fn pause(&mut self, id: TimelineId) -> bool {
        !self.disposed && self.timelines.get_mut(&id).map(|tl| tl.pause()).unwrap_or(false)
    }

    pub fn resume(&mut self, id: TimelineId) -> bool {
        !self.disposed && self.timelines.get_mut(&id).map(|tl| tl.resume()).unwrap_or(false)
    }

    /// Jump a timeline to `time` seconds and emit the rendered state.
    pub fn seek(&mut self, id: TimelineId, time: f32, surface: &dyn Surface) {
        if self.disposed {
            return;
        }
        if let Some(tl) = self.timelines.get_mut(&id) {
            tl.seek(time, surface, &mut self.outputs.changes);
        }
    }

    /// Kill one timeline early and drop it from the scope together with its
    /// pending teardown. Unknown ids return false.
    pub fn kill_timeline(&mut self, id: TimelineId) -> bool {
        let Some(mut tl) = self.timelines.shift_remove(&id) else {
            return false;
        };
        self.lifecycle
            .forget(|t| matches!(t, Teardown::KillTimeline(k) if *k == id));
        tl.kill()
    }

    // ---- triggers ----

    /// Bind `timeline` to a viewport trigger. When the scope already knows
    /// the viewport the trigger is evaluated immediately.
    pub fn bind_trigger(
        &mut self,
        spec: TriggerSpec,
        timeline: TimelineId,
        surface: &dyn Surface,
    ) -> TriggerId {
        let id = self.ids.alloc_trigger();
        if self.disposed {
            return id;
        }
        if !surface.contains(&spec.target) {
            self.emit(MotionEvent::TargetMissing {
                target: spec.target.clone(),
            });
        }
        let start = spec
            .start
            .unwrap_or_else(|| Boundary::top(self.config.default_trigger_start));
        self.observer.observe(id, &spec.target, start, spec.end);
        self.triggers.insert(id, Trigger::new(id, timeline, spec));
        self.lifecycle.register(Teardown::RemoveTrigger(id));
        if let Some(viewport) = self.observer.viewport() {
            for crossing in self.observer.evaluate(id, viewport, surface) {
                self.handle_crossing(crossing, surface);
            }
        }
        id
    }

    pub fn trigger(&self, id: TriggerId) -> Option<&Trigger> {
        self.triggers.get(&id)
    }

    /// Feed a crossing from an external observer.
    pub fn on_crossing(
        &mut self,
        trigger: TriggerId,
        boundary: BoundaryKind,
        direction: Direction,
        surface: &dyn Surface,
    ) -> TriggerAction {
        if self.disposed {
            return TriggerAction::Ignore;
        }
        self.handle_crossing(
            Crossing {
                trigger,
                boundary,
                direction,
            },
            surface,
        )
    }

    fn handle_crossing(&mut self, crossing: Crossing, surface: &dyn Surface) -> TriggerAction {
        let Some(trigger) = self.triggers.get_mut(&crossing.trigger) else {
            return TriggerAction::Ignore;
        };
        let action = trigger.on_crossing(crossing.boundary, crossing.direction, surface);
        let timeline = trigger.timeline;
        let spent = trigger.is_spent();
        if spent {
            self.observer.unobserve(crossing.trigger);
        }
        if action == TriggerAction::Ignore {
            return action;
        }
        self.emit(MotionEvent::TriggerFired {
            trigger: crossing.trigger,
            direction: crossing.direction,
            action,
        });
        match action {
            TriggerAction::Play => {
                self.play(timeline);
            }
            TriggerAction::Reverse => {
                self.reverse(timeline);
            }
            TriggerAction::Ignore => {}
        }
        action
    }

    /// Report a viewport move; fires every trigger whose boundary it crosses.
    pub fn scroll(&mut self, viewport: Viewport, surface: &dyn Surface) {
        if self.disposed {
            return;
        }
        for crossing in self.observer.update(viewport, surface) {
            self.handle_crossing(crossing, surface);
        }
    }

    pub fn viewport(&self) -> Option<Viewport> {
        self.observer.viewport()
    }

    // ---- progress ----

    pub fn add_progress(&mut self, simulator: ProgressSimulator) -> ProgressId {
        let id = self.ids.alloc_progress();
        if self.disposed {
            return id;
        }
        self.progress.insert(id, simulator);
        self.lifecycle.register(Teardown::CancelProgress(id));
        id
    }

    pub fn progress(&self, id: ProgressId) -> Option<&ProgressSimulator> {
        self.progress.get(&id)
    }

    pub fn progress_mut(&mut self, id: ProgressId) -> Option<&mut ProgressSimulator> {
        if self.disposed {
            return None;
        }
        self.progress.get_mut(&id)
    }

    // ---- timers ----

    pub fn schedule_once(&mut self, delay_ms: u64) -> TimerId {
        let id = self.timers.schedule_once(delay_ms);
        if self.disposed {
            self.timers.cancel(id);
        } else {
            self.lifecycle.register(Teardown::CancelTimer(id));
        }
        id
    }

    pub fn schedule_repeating(&mut self, period_ms: u64) -> Result<TimerId> {
        let id = self.timers.schedule_repeating(period_ms)?;
        if self.disposed {
            self.timers.cancel(id);
        } else {
            self.lifecycle.register(Teardown::CancelTimer(id));
        }
        Ok(id)
    }

    pub fn cancel_timer(&mut self, id: TimerId) -> bool {
        if !self.timers.cancel(id) {
            return false;
        }
        self.forget_timer(id);
        true
    }

    fn forget_timer(&mut self, id: TimerId) {
        self.lifecycle
            .forget(|t| matches!(t, Teardown::CancelTimer(c) if *c == id));
    }

    pub fn is_timer_pending(&self, id: TimerId) -> bool {
        self.timers.is_pending(id)
    }

    // ---- listeners ----

    /// Register interest in a host event (e.g. `"scroll"`). The host checks
    /// [`is_listening`](Self::is_listening) before dispatching.
    pub fn listen(&mut self, event: &str) -> ListenerId {
        let id = self.ids.alloc_listener();
        if self.disposed {
            return id;
        }
        self.listeners.insert(id, event.to_string());
        self.lifecycle.register(Teardown::RemoveListener(id));
        id
    }

    pub fn is_listening(&self, id: ListenerId) -> bool {
        !self.disposed && self.listeners.contains_key(&id)
    }

    /// Listener ids registered for `event`.
    pub fn listeners_for<'a>(&'a self, event: &'a str) -> impl Iterator<Item = ListenerId> + 'a {
        self.listeners
            .iter()
            .filter(move |(_, e)| e.as_str() == event)
            .map(|(id, _)| *id)
    }

    pub fn unlisten(&mut self, id: ListenerId) -> bool {
        if self.listeners.shift_remove(&id).is_none() {
            return false;
        }
        self.lifecycle
            .forget(|t| matches!(t, Teardown::RemoveListener(l) if *l == id));
        self.emit(MotionEvent::ListenerRemoved { listener: id });
        true
    }

    /// Run `f` on dispose. Registered after dispose, it runs immediately.
    pub fn on_teardown(&mut self, f: impl FnOnce() + 'static) {
        self.lifecycle.register(Teardown::Host(HostTeardown::new(f)));
    }

    // ---- frame ----

    /// Advance the scope clock by `dt_ms`: timers first, then progress
    /// simulators, then timelines.
    pub fn update(&mut self, dt_ms: u64, surface: &dyn Surface) {
        if self.disposed {
            return;
        }
        let cap = self.config.max_pending_events;

        let until = self.timers.now_ms() + dt_ms;
        while let Some(fired) = self.timers.pop_due(until) {
            // A one-shot timer that fired has nothing left to cancel.
            if !self.timers.is_pending(fired.timer) {
                self.forget_timer(fired.timer);
            }
            push_capped(
                &mut self.outputs,
                cap,
                MotionEvent::TimerFired { timer: fired.timer },
            );
        }
        self.timers.settle(until);

        for (id, sim) in self.progress.iter_mut() {
            let update = sim.advance(dt_ms);
            for value in update.ticks {
                push_capped(
                    &mut self.outputs,
                    cap,
                    MotionEvent::ProgressTick { progress: *id, value },
                );
            }
            if let (Some(width), Some(target)) = (update.bar, sim.bar_target()) {
                if surface.contains(target) {
                    self.outputs.push_change(Change {
                        target: target.to_string(),
                        property: Property::Width,
                        value: Value::percent(width),
                    });
                }
            }
            if update.completed {
                push_capped(
                    &mut self.outputs,
                    cap,
                    MotionEvent::ProgressCompleted { progress: *id },
                );
            }
        }

        let dt = dt_ms as f32 / 1000.0;
        for (id, tl) in self.timelines.iter_mut() {
            match tl.advance(dt, surface, &mut self.outputs.changes) {
                Tick::Completed => {
                    push_capped(
                        &mut self.outputs,
                        cap,
                        MotionEvent::TimelineCompleted { timeline: *id },
                    );
                }
                Tick::Reversed => {
                    push_capped(
                        &mut self.outputs,
                        cap,
                        MotionEvent::TimelineReversed { timeline: *id },
                    );
                }
                Tick::Inactive | Tick::Waiting | Tick::Running => {}
            }
        }
    }

    /// Whether any timeline is still moving.
    pub fn is_animating(&self) -> bool {
        self.timelines.values().any(|tl| {
            matches!(tl.state(), PlayState::Forward | PlayState::Reverse)
        })
    }

    pub fn outputs(&self) -> &Outputs {
        &self.outputs
    }

    /// Hand pending changes and events to the host.
    pub fn take_outputs(&mut self) -> Outputs {
        std::mem::take(&mut self.outputs)
    }

    /// Release everything this scope registered. Idempotent; the second
    /// call returns an empty report.
    pub fn dispose(&mut self) -> TeardownReport {
        if self.disposed {
            return TeardownReport::default();
        }
        self.disposed = true;
        let timers = &mut self.timers;
        let timelines = &mut self.timelines;
        let triggers = &mut self.triggers;
        let observer = &mut self.observer;
        let progress = &mut self.progress;
        let listeners = &mut self.listeners;
        let report = self.lifecycle.run_all(|action| match action {
            Teardown::CancelTimer(id) => {
                timers.cancel(*id);
            }
            Teardown::KillTimeline(id) => {
                if let Some(tl) = timelines.get_mut(id) {
                    tl.kill();
                }
            }
            Teardown::RemoveTrigger(id) => {
                observer.unobserve(*id);
                triggers.shift_remove(id);
            }
            Teardown::CancelProgress(id) => {
                if let Some(sim) = progress.get_mut(id) {
                    sim.cancel();
                }
            }
            Teardown::RemoveListener(id) => {
                listeners.shift_remove(id);
            }
            Teardown::Host(_) => {}
        });
        self.timers.cancel_all();
        self.observer.clear();
        self.outputs.clear();
        debug!(
            "scope '{}' disposed: released {} resources",
            self.name,
            report.total()
        );
        report
    }
}

impl Drop for Scope {
    fn drop(&mut self) {
        self.dispose();
    }
}
