//! Declarative timeline model (`TimelineSpec`) and its JSON loader.
//!
//! A spec is what authors write: ordered steps with relative positions.
//! [`Timeline::compile`](crate::timeline::Timeline::compile) resolves it
//! against a surface into absolute, sampleable channels.

use std::fmt;
use std::str::FromStr;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::{MotionError, Result};
use crate::interp::Easing;
use crate::stagger::StaggerGroup;
use crate::surface::{Surface, TargetHandle};
use crate::value::{Property, Value};

/// Ordered property → value map.
pub type PropertyMap = IndexMap<Property, Value>;

/// What a step animates.
///
/// JSON: `"hero/title"`, `["a", "b"]` or `{ "childrenOf": "about/skills" }`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TargetRef {
    One(TargetHandle),
    Many(Vec<TargetHandle>),
    ChildrenOf {
        #[serde(rename = "childrenOf")]
        children_of: TargetHandle,
    },
}

impl TargetRef {
    pub fn children_of(container: &str) -> Self {
        TargetRef::ChildrenOf {
            children_of: container.to_string(),
        }
    }

    /// Concrete handles, in collection order. Children of a missing
    /// container resolve to nothing.
    pub fn resolve(&self, surface: &dyn Surface) -> Vec<TargetHandle> {
        match self {
            TargetRef::One(h) => vec![h.clone()],
            TargetRef::Many(hs) => hs.clone(),
            TargetRef::ChildrenOf { children_of } => surface.children(children_of),
        }
    }
}

impl From<&str> for TargetRef {
    fn from(s: &str) -> Self {
        TargetRef::One(s.to_string())
    }
}

impl From<String> for TargetRef {
    fn from(s: String) -> Self {
        TargetRef::One(s)
    }
}

impl From<Vec<TargetHandle>> for TargetRef {
    fn from(v: Vec<TargetHandle>) -> Self {
        TargetRef::Many(v)
    }
}

impl From<&[&str]> for TargetRef {
    fn from(v: &[&str]) -> Self {
        TargetRef::Many(v.iter().map(|s| s.to_string()).collect())
    }
}

/// Where a step starts, relative to the step authored before it.
///
/// String forms: `">"` (right after the previous step, the default),
/// `"1.5"` (absolute), `"-=0.4"` / `"+=0.2"` (from the previous end),
/// `"<"`, `"<0.1"`, `"<-0.1"` (from the previous start).
#[derive(Copy, Clone, Debug, PartialEq, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Position {
    #[default]
    AfterPrevious,
    At(f32),
    FromPreviousEnd(f32),
    FromPreviousStart(f32),
}

impl Position {
    /// Absolute start given the previous step's (start, end).
    pub fn resolve(&self, prev_start: f32, prev_end: f32) -> f32 {
        match *self {
            Position::AfterPrevious => prev_end,
            Position::At(t) => t,
            Position::FromPreviousEnd(d) => prev_end + d,
            Position::FromPreviousStart(d) => prev_start + d,
        }
    }
}

impl FromStr for Position {
    type Err = MotionError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let lit = s.trim();
        let invalid = || MotionError::InvalidPosition {
            literal: s.to_string(),
        };
        let num = |n: &str| -> Result<f32> {
            let n = n.trim();
            if n.is_empty() {
                return Ok(0.0);
            }
            n.strip_prefix('+')
                .unwrap_or(n)
                .parse::<f32>()
                .ok()
                .filter(|v| v.is_finite())
                .ok_or_else(invalid)
        };
        if lit.is_empty() || lit == ">" {
            return Ok(Position::AfterPrevious);
        }
        if let Some(rest) = lit.strip_prefix("-=") {
            return Ok(Position::FromPreviousEnd(-num(rest)?));
        }
        if let Some(rest) = lit.strip_prefix("+=") {
            return Ok(Position::FromPreviousEnd(num(rest)?));
        }
        if let Some(rest) = lit.strip_prefix('<') {
            return Ok(Position::FromPreviousStart(num(rest)?));
        }
        if let Some(rest) = lit.strip_prefix('>') {
            return Ok(Position::FromPreviousEnd(num(rest)?));
        }
        let at = lit.parse::<f32>().map_err(|_| invalid())?;
        if !at.is_finite() || at < 0.0 {
            return Err(invalid());
        }
        Ok(Position::At(at))
    }
}

impl TryFrom<String> for Position {
    type Error = MotionError;

    fn try_from(s: String) -> std::result::Result<Self, Self::Error> {
        s.parse()
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Position::AfterPrevious => f.write_str(">"),
            Position::At(t) => write!(f, "{t}"),
            Position::FromPreviousEnd(d) if d < 0.0 => write!(f, "-={}", -d),
            Position::FromPreviousEnd(d) => write!(f, "+={d}"),
            Position::FromPreviousStart(d) => write!(f, "<{d}"),
        }
    }
}

impl From<Position> for String {
    fn from(p: Position) -> Self {
        p.to_string()
    }
}

/// Repeat count. In JSON a plain integer, `-1` meaning forever.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "i32", into = "i32")]
pub enum Repeat {
    #[default]
    Never,
    Times(u32),
    Forever,
}

impl Repeat {
    /// Total number of iterations, `None` when unbounded.
    pub fn iterations(&self) -> Option<u32> {
        match *self {
            Repeat::Never => Some(1),
            Repeat::Times(n) => Some(n.saturating_add(1)),
            Repeat::Forever => None,
        }
    }
}

impl From<i32> for Repeat {
    fn from(n: i32) -> Self {
        match n {
            n if n < 0 => Repeat::Forever,
            0 => Repeat::Never,
            n => Repeat::Times(n as u32),
        }
    }
}

impl From<Repeat> for i32 {
    fn from(r: Repeat) -> Self {
        match r {
            Repeat::Never => 0,
            Repeat::Times(n) => n.min(i32::MAX as u32) as i32,
            Repeat::Forever => -1,
        }
    }
}

/// Initial state applied before a timeline starts.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SetSpec {
    pub targets: TargetRef,
    pub state: PropertyMap,
}

/// One authored step: animate `targets` from `from` to `to`.
/// Properties missing from `from` start at the value an earlier step or
/// `set` left them at.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StepSpec {
    pub targets: TargetRef,
    #[serde(default)]
    pub from: PropertyMap,
    #[serde(default)]
    pub to: PropertyMap,
    /// Seconds, per target.
    #[serde(default)]
    pub duration: f32,
    #[serde(default)]
    pub ease: Easing,
    #[serde(default)]
    pub position: Position,
    #[serde(default)]
    pub stagger: Option<StaggerGroup>,
}

impl StepSpec {
    pub fn new(targets: impl Into<TargetRef>) -> Self {
        Self {
            targets: targets.into(),
            from: PropertyMap::new(),
            to: PropertyMap::new(),
            duration: 0.5,
            ease: Easing::default(),
            position: Position::AfterPrevious,
            stagger: None,
        }
    }

    pub fn from(mut self, property: impl Into<Property>, value: Value) -> Self {
        self.from.insert(property.into(), value);
        self
    }

    pub fn to(mut self, property: impl Into<Property>, value: Value) -> Self {
        self.to.insert(property.into(), value);
        self
    }

    /// Shorthand for `.from(p, from).to(p, to)`.
    pub fn animate(self, property: impl Into<Property>, from: Value, to: Value) -> Self {
        let property = property.into();
        self.from(property.clone(), from).to(property, to)
    }

    pub fn duration(mut self, seconds: f32) -> Self {
        self.duration = seconds;
        self
    }

    pub fn ease(mut self, ease: Easing) -> Self {
        self.ease = ease;
        self
    }

    pub fn at(mut self, position: Position) -> Self {
        self.position = position;
        self
    }

    pub fn stagger(mut self, group: StaggerGroup) -> Self {
        self.stagger = Some(group);
        self
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TimelineSpec {
    #[serde(default)]
    pub name: String,
    /// Seconds before the first forward play starts.
    #[serde(default)]
    pub delay: f32,
    #[serde(default)]
    pub repeat: Repeat,
    /// Alternate direction on every repeat.
    #[serde(default)]
    pub yoyo: bool,
    #[serde(default)]
    pub set: Vec<SetSpec>,
    #[serde(default)]
    pub steps: Vec<StepSpec>,
}

impl TimelineSpec {
    /// Validate what can be checked without a surface: finite non-negative
    /// durations, delay and stagger intervals.
    pub fn validate_basic(&self) -> Result<()> {
        if !self.delay.is_finite() || self.delay < 0.0 {
            return Err(MotionError::InvalidDuration {
                step: 0,
                duration: self.delay,
            });
        }
        for (idx, step) in self.steps.iter().enumerate() {
            if !step.duration.is_finite() || step.duration < 0.0 {
                return Err(MotionError::InvalidDuration {
                    step: idx,
                    duration: step.duration,
                });
            }
            if let Some(group) = &step.stagger {
                if !group.each.is_finite() || group.each < 0.0 {
                    return Err(MotionError::InvalidDuration {
                        step: idx,
                        duration: group.each,
                    });
                }
            }
        }
        Ok(())
    }
}

/// Parse a timeline spec from JSON and run [`TimelineSpec::validate_basic`].
pub fn parse_timeline_json(s: &str) -> Result<TimelineSpec> {
    let spec: TimelineSpec = serde_json::from_str(s)?;
    spec.validate_basic()?;
    Ok(spec)
}
