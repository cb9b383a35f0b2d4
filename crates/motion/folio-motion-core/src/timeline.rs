//! Timelines: compile a [`TimelineSpec`] into absolute channels and play it.
//!
//! Compilation resolves every step's relative position to an absolute start
//! (negative results are rejected), expands staggered steps into one
//! segment per child, fills missing `from` values from earlier steps or the
//! `set` state, and groups segments by (target, property).
//!
//! Playback is a pure function of the playhead: rendering at time t never
//! depends on which frames were rendered before, so reversing lands exactly
//! on the initial state.

use std::collections::HashMap;

use indexmap::IndexMap;
use log::{debug, trace};

use crate::data::{Position, Repeat, StepSpec, TargetRef, TimelineSpec};
use crate::error::{MotionError, Result};
use crate::interp::Easing;
use crate::outputs::Change;
use crate::sampling::{Channel, Segment};
use crate::stagger::StaggerGroup;
use crate::surface::{Surface, TargetHandle};
use crate::value::{Property, Value};

/// Playheads within this distance (seconds) of an end are snapped to it so
/// accumulated frame deltas cannot stop just short of completion.
const TIME_EPSILON: f32 = 1e-4;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum PlayState {
    /// Never started, or reversed back to the initial state.
    Idle,
    Forward,
    Reverse,
    Paused { reversed: bool },
    /// Forward playback reached the end.
    Finished,
    /// Killed; renders nothing ever again.
    Killed,
}

/// What one call to [`Timeline::advance`] did.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Tick {
    /// Not playing; nothing rendered.
    Inactive,
    /// Consuming the start delay; nothing rendered yet.
    Waiting,
    Running,
    Completed,
    Reversed,
}

/// Resolved timing of one authored step.
#[derive(Clone, Debug, PartialEq)]
pub struct ResolvedStep {
    pub start: f32,
    /// Includes the stagger span.
    pub end: f32,
    /// Absolute start per target, in collection order.
    pub child_starts: Vec<(TargetHandle, f32)>,
}

#[derive(Clone, Debug)]
pub struct Timeline {
    name: String,
    channels: Vec<Channel>,
    /// Set-state entries no step animates.
    static_initial: Vec<Change>,
    steps: Vec<ResolvedStep>,
    duration: f32,
    delay: f32,
    repeat: Repeat,
    yoyo: bool,

    playhead: f32,
    delay_left: f32,
    state: PlayState,
}

fn expand(targets: &TargetRef, surface: &dyn Surface) -> Vec<TargetHandle> {
    targets.resolve(surface)
}

impl Timeline {
    /// Resolve `spec` against `surface`.
    pub fn compile(spec: &TimelineSpec, surface: &dyn Surface) -> Result<Timeline> {
        spec.validate_basic()?;

        let mut known: HashMap<(TargetHandle, Property), Value> = HashMap::new();
        let mut set_order: Vec<(TargetHandle, Property)> = Vec::new();
        for set in &spec.set {
            for target in expand(&set.targets, surface) {
                for (property, value) in &set.state {
                    let key = (target.clone(), property.clone());
                    if known.insert(key.clone(), *value).is_none() {
                        set_order.push(key);
                    }
                }
            }
        }
        let set_state = known.clone();

        let mut grouped: IndexMap<(TargetHandle, Property), Vec<Segment>> = IndexMap::new();
        let mut steps = Vec::with_capacity(spec.steps.len());
        let (mut prev_start, mut prev_end) = (0.0f32, 0.0f32);

        for (idx, step) in spec.steps.iter().enumerate() {
            let start = step.position.resolve(prev_start, prev_end);
            if start < 0.0 {
                return Err(MotionError::NegativeStart { step: idx, start });
            }
            let targets = expand(&step.targets, surface);
            let offsets = match &step.stagger {
                Some(group) => group.offsets(targets.len()),
                None => vec![0.0; targets.len()],
            };
            let span = offsets.last().copied().unwrap_or(0.0);

            let mut child_starts = Vec::with_capacity(targets.len());
            for (target, offset) in targets.iter().zip(offsets) {
                let child_start = start + offset;
                child_starts.push((target.clone(), child_start));
                for (property, to) in &step.to {
                    let key = (target.clone(), property.clone());
                    let from = match step.from.get(property) {
                        Some(v) => *v,
                        None => *known.get(&key).ok_or_else(|| MotionError::MissingFromValue {
                            step: idx,
                            property: property.clone(),
                        })?,
                    };
                    if !from.is_compatible(to) {
                        return Err(MotionError::IncompatibleValues {
                            step: idx,
                            property: property.clone(),
                            from: from.kind(),
                            to: to.kind(),
                        });
                    }
                    grouped.entry(key.clone()).or_default().push(Segment {
                        start: child_start,
                        duration: step.duration,
                        from,
                        to: *to,
                        ease: step.ease,
                    });
                    known.insert(key, *to);
                }
                for property in step.from.keys().filter(|p| !step.to.contains_key(*p)) {
                    debug!("step {idx}: '{property}' has a from value but no target; ignored");
                }
            }

            let end = start + span + step.duration;
            steps.push(ResolvedStep {
                start,
                end,
                child_starts,
            });
            prev_start = start;
            prev_end = end;
        }

        let channels: Vec<Channel> = grouped
            .into_iter()
            .map(|((target, property), mut segments)| {
                segments.sort_by(|a, b| a.start.total_cmp(&b.start));
                Channel {
                    target,
                    property,
                    segments,
                }
            })
            .collect();

        let static_initial = set_order
            .into_iter()
            .filter(|(t, p)| !channels.iter().any(|c| &c.target == t && &c.property == p))
            .filter_map(|(target, property)| {
                let value = *set_state.get(&(target.clone(), property.clone()))?;
                Some(Change {
                    target,
                    property,
                    value,
                })
            })
            .collect();

        let duration = steps.iter().map(|s| s.end).fold(0.0f32, f32::max);
        debug!(
            "compiled timeline '{}': {} steps, {} channels, {:.3}s",
            spec.name,
            steps.len(),
            channels.len(),
            duration
        );

        Ok(Timeline {
            name: spec.name.clone(),
            channels,
            static_initial,
            steps,
            duration,
            delay: spec.delay,
            repeat: spec.repeat,
            yoyo: spec.yoyo,
            playhead: 0.0,
            delay_left: spec.delay,
            state: PlayState::Idle,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Length of one iteration: the latest step end.
    #[inline]
    pub fn duration(&self) -> f32 {
        self.duration
    }

    /// Length of all iterations; infinite when repeating forever.
    pub fn total_duration(&self) -> f32 {
        match self.repeat.iterations() {
            Some(n) => self.duration * n as f32,
            None => f32::INFINITY,
        }
    }

    #[inline]
    pub fn state(&self) -> PlayState {
        self.state
    }

    #[inline]
    pub fn playhead(&self) -> f32 {
        self.playhead
    }

    pub fn steps(&self) -> &[ResolvedStep] {
        &self.steps
    }

    pub fn channels(&self) -> &[Channel] {
        &self.channels
    }

    /// Distinct targets this timeline writes, in first-use order.
    pub fn targets(&self) -> Vec<&str> {
        let mut out: Vec<&str> = Vec::new();
        let all = self
            .channels
            .iter()
            .map(|c| c.target.as_str())
            .chain(self.static_initial.iter().map(|c| c.target.as_str()));
        for t in all {
            if !out.contains(&t) {
                out.push(t);
            }
        }
        out
    }

    #[inline]
    pub fn is_killed(&self) -> bool {
        self.state == PlayState::Killed
    }

    /// The from-state of every channel plus `set` entries no step animates.
    pub fn initial_changes(&self) -> Vec<Change> {
        let mut out = self.static_initial.clone();
        out.extend(self.channels.iter().filter_map(|c| {
            c.initial().map(|value| Change {
                target: c.target.clone(),
                property: c.property.clone(),
                value,
            })
        }));
        out
    }

    /// Value of `(target, property)` at the current playhead.
    pub fn current_value(&self, target: &str, property: &Property) -> Option<Value> {
        let t = self.local_time(self.playhead);
        self.channels
            .iter()
            .find(|c| c.target == target && &c.property == property)
            .and_then(|c| c.sample(t))
    }

    /// Start or resume forward playback. Returns whether anything changed.
    /// Starting from the very beginning waits out the timeline's delay first.
    pub fn play(&mut self) -> bool {
        match self.state {
            PlayState::Killed | PlayState::Finished | PlayState::Forward => false,
            PlayState::Idle => {
                self.delay_left = if self.playhead <= 0.0 { self.delay } else { 0.0 };
                self.state = PlayState::Forward;
                true
            }
            PlayState::Reverse | PlayState::Paused { .. } => {
                self.delay_left = 0.0;
                self.state = PlayState::Forward;
                true
            }
        }
    }

    /// Play backwards toward the initial state.
    pub fn reverse(&mut self) -> bool {
        match self.state {
            PlayState::Killed | PlayState::Reverse | PlayState::Idle => false,
            _ if self.playhead <= 0.0 => {
                self.state = PlayState::Idle;
                true
            }
            _ => {
                self.delay_left = 0.0;
                self.state = PlayState::Reverse;
                true
            }
        }
    }

    pub fn pause(&mut self) -> bool {
        match self.state {
            PlayState::Forward => {
                self.state = PlayState::Paused { reversed: false };
                true
            }
            PlayState::Reverse => {
                self.state = PlayState::Paused { reversed: true };
                true
            }
            _ => false,
        }
    }

    pub fn resume(&mut self) -> bool {
        match self.state {
            PlayState::Paused { reversed: false } => {
                self.state = PlayState::Forward;
                true
            }
            PlayState::Paused { reversed: true } => {
                self.state = PlayState::Reverse;
                true
            }
            _ => false,
        }
    }

    /// Rewind to the start (delay included) and play forward.
    pub fn restart(&mut self) -> bool {
        if self.is_killed() {
            return false;
        }
        self.playhead = 0.0;
        self.delay_left = self.delay;
        self.state = PlayState::Forward;
        true
    }

    /// Stop permanently. Idempotent.
    pub fn kill(&mut self) -> bool {
        if self.is_killed() {
            return false;
        }
        self.state = PlayState::Killed;
        true
    }

    /// Jump to `time` (clamped) and render it without changing play state.
    pub fn seek(&mut self, time: f32, surface: &dyn Surface, out: &mut Vec<Change>) {
        if self.is_killed() {
            return;
        }
        self.playhead = time.clamp(0.0, self.total_duration());
        self.render(surface, out);
    }

    /// Map the playhead into iteration-local time (loop / ping-pong).
    fn local_time(&self, playhead: f32) -> f32 {
        let d = self.duration;
        if d <= 0.0 {
            return 0.0;
        }
        let total = self.total_duration();
        let t = playhead.clamp(0.0, total);
        let (iteration, local) = if t >= total {
            // End of the final iteration.
            let last = self.repeat.iterations().unwrap_or(1).saturating_sub(1);
            (last, d)
        } else {
            let iteration = (t / d).floor();
            (iteration as u32, t - iteration * d)
        };
        if self.yoyo && iteration % 2 == 1 {
            d - local
        } else {
            local
        }
    }

    fn render(&self, surface: &dyn Surface, out: &mut Vec<Change>) {
        let t = self.local_time(self.playhead);
        for channel in &self.channels {
            if !surface.contains(&channel.target) {
                trace!("timeline '{}': target '{}' missing", self.name, channel.target);
                continue;
            }
            if let Some(value) = channel.sample(t) {
                out.push(Change {
                    target: channel.target.clone(),
                    property: channel.property.clone(),
                    value,
                });
            }
        }
    }

    fn render_initial(&self, surface: &dyn Surface, out: &mut Vec<Change>) {
        out.extend(
            self.initial_changes()
                .into_iter()
                .filter(|c| surface.contains(&c.target)),
        );
    }

    /// Advance by `dt` seconds in the current direction, appending the
    /// rendered changes to `out`.
    pub fn advance(&mut self, dt: f32, surface: &dyn Surface, out: &mut Vec<Change>) -> Tick {
        let dt = dt.max(0.0);
        match self.state {
            PlayState::Forward => {
                let mut dt = dt;
                if self.delay_left > 0.0 {
                    let used = dt.min(self.delay_left);
                    self.delay_left -= used;
                    dt -= used;
                    if self.delay_left > 0.0 {
                        return Tick::Waiting;
                    }
                }
                let total = self.total_duration();
                self.playhead += dt;
                if self.playhead >= total - TIME_EPSILON {
                    self.playhead = total;
                    self.render(surface, out);
                    self.state = PlayState::Finished;
                    Tick::Completed
                } else {
                    self.render(surface, out);
                    Tick::Running
                }
            }
            PlayState::Reverse => {
                self.playhead -= dt;
                if self.playhead <= TIME_EPSILON {
                    self.playhead = 0.0;
                    self.render_initial(surface, out);
                    self.state = PlayState::Idle;
                    Tick::Reversed
                } else {
                    self.render(surface, out);
                    Tick::Running
                }
            }
            _ => Tick::Inactive,
        }
    }
}

/// Fluent front-end over [`TimelineSpec`].
#[derive(Clone, Debug, Default)]
pub struct TimelineBuilder {
    spec: TimelineSpec,
}

impl TimelineBuilder {
    pub fn new(name: &str) -> Self {
        Self {
            spec: TimelineSpec {
                name: name.to_string(),
                ..TimelineSpec::default()
            },
        }
    }

    pub fn delay(mut self, seconds: f32) -> Self {
        self.spec.delay = seconds;
        self
    }

    pub fn repeat(mut self, times: u32) -> Self {
        self.spec.repeat = if times == 0 {
            Repeat::Never
        } else {
            Repeat::Times(times)
        };
        self
    }

    pub fn repeat_forever(mut self) -> Self {
        self.spec.repeat = Repeat::Forever;
        self
    }

    pub fn yoyo(mut self, yoyo: bool) -> Self {
        self.spec.yoyo = yoyo;
        self
    }

    /// Initial state applied before the timeline starts.
    pub fn set(
        mut self,
        targets: impl Into<TargetRef>,
        state: impl IntoIterator<Item = (Property, Value)>,
    ) -> Self {
        self.spec.set.push(crate::data::SetSpec {
            targets: targets.into(),
            state: state.into_iter().collect(),
        });
        self
    }

    pub fn step(mut self, step: StepSpec) -> Self {
        self.spec.steps.push(step);
        self
    }

    /// Animate `targets` between two explicit states.
    pub fn from_to(
        self,
        targets: impl Into<TargetRef>,
        from: impl IntoIterator<Item = (Property, Value)>,
        to: impl IntoIterator<Item = (Property, Value)>,
        duration: f32,
        ease: Easing,
        position: Position,
    ) -> Self {
        let mut step = StepSpec::new(targets).duration(duration).ease(ease).at(position);
        step.from = from.into_iter().collect();
        step.to = to.into_iter().collect();
        self.step(step)
    }

    /// Animate `targets` to `to`, starting from whatever an earlier step or
    /// `set` left them at.
    pub fn to(
        self,
        targets: impl Into<TargetRef>,
        to: impl IntoIterator<Item = (Property, Value)>,
        duration: f32,
        ease: Easing,
        position: Position,
    ) -> Self {
        self.from_to(targets, Vec::<(Property, Value)>::new(), to, duration, ease, position)
    }

    /// Append `step` applied to each target in turn.
    pub fn stagger(self, step: StepSpec, group: StaggerGroup) -> Self {
        self.step(step.stagger(group))
    }

    pub fn spec(&self) -> &TimelineSpec {
        &self.spec
    }

    pub fn into_spec(self) -> TimelineSpec {
        self.spec
    }

    pub fn build(&self, surface: &dyn Surface) -> Result<Timeline> {
        Timeline::compile(&self.spec, surface)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::Stage;

    fn stage(targets: &[&str]) -> Stage {
        let mut s = Stage::new();
        for t in targets {
            s.add(t);
        }
        s
    }

    #[test]
    fn local_time_ping_pongs() {
        let st = stage(&["a"]);
        let tl = TimelineBuilder::new("pulse")
            .repeat(1)
            .yoyo(true)
            .step(
                StepSpec::new("a")
                    .animate(Property::Scale, Value::num(1.0), Value::num(0.95))
                    .duration(0.2)
                    .ease(Easing::Linear),
            )
            .build(&st)
            .unwrap();
        assert!((tl.total_duration() - 0.4).abs() < 1e-6);
        assert!((tl.local_time(0.1) - 0.1).abs() < 1e-6);
        assert!((tl.local_time(0.3) - 0.1).abs() < 1e-6);
        assert_eq!(tl.local_time(0.4), 0.0);
    }

    #[test]
    fn negative_start_is_rejected() {
        let st = stage(&["a"]);
        let err = TimelineBuilder::new("bad")
            .step(
                StepSpec::new("a")
                    .animate(Property::Opacity, Value::num(0.0), Value::num(1.0))
                    .duration(0.5)
                    .at(Position::FromPreviousEnd(-1.0)),
            )
            .build(&st)
            .unwrap_err();
        assert!(matches!(err, MotionError::NegativeStart { step: 0, .. }));
    }

    #[test]
    fn missing_from_value_is_rejected() {
        let st = stage(&["a"]);
        let err = TimelineBuilder::new("bad")
            .step(StepSpec::new("a").to(Property::Opacity, Value::num(1.0)))
            .build(&st)
            .unwrap_err();
        assert!(matches!(err, MotionError::MissingFromValue { step: 0, .. }));
    }

    #[test]
    fn incompatible_units_are_rejected() {
        let st = stage(&["a"]);
        let err = TimelineBuilder::new("bad")
            .step(StepSpec::new("a").animate(Property::X, Value::px(0.0), Value::percent(100.0)))
            .build(&st)
            .unwrap_err();
        assert!(matches!(err, MotionError::IncompatibleValues { .. }));
    }

    #[test]
    fn set_state_feeds_later_steps() {
        let st = stage(&["a"]);
        let tl = TimelineBuilder::new("set")
            .set("a", [(Property::Opacity, Value::num(0.0)), (Property::Y, Value::px(30.0))])
            .step(
                StepSpec::new("a")
                    .to(Property::Opacity, Value::num(1.0))
                    .duration(1.0),
            )
            .build(&st)
            .unwrap();
        let init = tl.initial_changes();
        assert_eq!(init.len(), 2);
        assert!(init
            .iter()
            .any(|c| c.property == Property::Y && c.value == Value::px(30.0)));
        assert!(init
            .iter()
            .any(|c| c.property == Property::Opacity && c.value == Value::num(0.0)));
    }

    #[test]
    fn killed_timeline_renders_nothing() {
        let st = stage(&["a"]);
        let mut tl = TimelineBuilder::new("k")
            .step(StepSpec::new("a").animate(Property::Opacity, Value::num(0.0), Value::num(1.0)))
            .build(&st)
            .unwrap();
        tl.play();
        assert!(tl.kill());
        assert!(!tl.kill());
        let mut out = Vec::new();
        assert_eq!(tl.advance(0.1, &st, &mut out), Tick::Inactive);
        tl.seek(0.2, &st, &mut out);
        assert!(out.is_empty());
        assert!(!tl.play());
    }
}
