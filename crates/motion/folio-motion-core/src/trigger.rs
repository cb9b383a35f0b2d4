//! Viewport triggers: bind a timeline to an element's scroll position.
//!
//! A trigger only stores the target key, never the element itself, so a
//! removed element turns the trigger into a no-op instead of an error.

use std::fmt;
use std::str::FromStr;

use log::trace;
use serde::{Deserialize, Serialize};

use crate::error::MotionError;
use crate::ids::{TimelineId, TriggerId};
use crate::surface::{Surface, TargetHandle};
use crate::viewport::{BoundaryKind, Direction};

/// What happens on later crossings after the first forward one.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum ReplayPolicy {
    /// Play on the first forward crossing, ignore everything afterwards.
    PlayOnce,
    /// Play on forward crossings, reverse back to the initial state on
    /// reverse crossings.
    #[default]
    PlayReverse,
}

impl FromStr for ReplayPolicy {
    type Err = MotionError;

    /// Accepts `once` / `reverse` or the toggle-action strings
    /// `"play none none none"` / `"play none none reverse"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let words: Vec<&str> = s.split_whitespace().collect();
        match words.as_slice() {
            ["once"] | ["play", "none", "none", "none"] => Ok(ReplayPolicy::PlayOnce),
            ["reverse"] | ["play", "none", "none", "reverse"] => Ok(ReplayPolicy::PlayReverse),
            _ => Err(MotionError::UnsupportedToggleActions {
                literal: s.to_string(),
            }),
        }
    }
}

impl TryFrom<String> for ReplayPolicy {
    type Error = MotionError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl fmt::Display for ReplayPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReplayPolicy::PlayOnce => f.write_str("play none none none"),
            ReplayPolicy::PlayReverse => f.write_str("play none none reverse"),
        }
    }
}

impl From<ReplayPolicy> for String {
    fn from(p: ReplayPolicy) -> Self {
        p.to_string()
    }
}

/// Instruction for the bound timeline.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TriggerAction {
    Play,
    Reverse,
    Ignore,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Edge {
    Top,
    Center,
    Bottom,
}

impl Edge {
    fn parse(word: &str) -> Option<Edge> {
        match word {
            "top" => Some(Edge::Top),
            "center" => Some(Edge::Center),
            "bottom" => Some(Edge::Bottom),
            _ => None,
        }
    }

    fn as_str(&self) -> &'static str {
        match self {
            Edge::Top => "top",
            Edge::Center => "center",
            Edge::Bottom => "bottom",
        }
    }
}

/// Element edge against a line in the viewport, e.g. `"top 80%"`.
/// `viewport` is a fraction of the viewport height from its top.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Boundary {
    pub edge: Edge,
    pub viewport: f32,
}

impl Boundary {
    pub fn new(edge: Edge, viewport: f32) -> Self {
        Self { edge, viewport }
    }

    /// Element top at `fraction` of the viewport height.
    pub fn top(fraction: f32) -> Self {
        Self::new(Edge::Top, fraction)
    }
}

impl FromStr for Boundary {
    type Err = MotionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || MotionError::InvalidBoundary {
            literal: s.to_string(),
        };
        let mut words = s.split_whitespace();
        let edge = words.next().and_then(Edge::parse).ok_or_else(invalid)?;
        let line = words.next().ok_or_else(invalid)?;
        if words.next().is_some() {
            return Err(invalid());
        }
        let viewport = match line {
            "top" => 0.0,
            "center" => 0.5,
            "bottom" => 1.0,
            pct => {
                let n = pct.strip_suffix('%').ok_or_else(invalid)?;
                n.parse::<f32>().map_err(|_| invalid())? / 100.0
            }
        };
        if !viewport.is_finite() {
            return Err(invalid());
        }
        Ok(Boundary { edge, viewport })
    }
}

impl TryFrom<String> for Boundary {
    type Error = MotionError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl fmt::Display for Boundary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}%", self.edge.as_str(), self.viewport * 100.0)
    }
}

impl From<Boundary> for String {
    fn from(b: Boundary) -> Self {
        b.to_string()
    }
}

/// Declarative trigger. JSON:
/// `{ "target": "about", "start": "top 80%", "end": "bottom 20%",
///    "toggleActions": "play none none reverse" }`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TriggerSpec {
    pub target: TargetHandle,
    /// Falls back to `Config::default_trigger_start` when absent.
    #[serde(default)]
    pub start: Option<Boundary>,
    #[serde(default)]
    pub end: Option<Boundary>,
    #[serde(default, alias = "toggleActions")]
    pub policy: ReplayPolicy,
}

impl TriggerSpec {
    pub fn new(target: &str) -> Self {
        Self {
            target: target.to_string(),
            start: None,
            end: None,
            policy: ReplayPolicy::default(),
        }
    }

    pub fn start(mut self, boundary: Boundary) -> Self {
        self.start = Some(boundary);
        self
    }

    pub fn end(mut self, boundary: Boundary) -> Self {
        self.end = Some(boundary);
        self
    }

    pub fn policy(mut self, policy: ReplayPolicy) -> Self {
        self.policy = policy;
        self
    }
}

/// A registered trigger bound to one timeline.
#[derive(Clone, Debug)]
pub struct Trigger {
    pub id: TriggerId,
    pub timeline: TimelineId,
    pub spec: TriggerSpec,
    fired: bool,
}

impl Trigger {
    pub fn new(id: TriggerId, timeline: TimelineId, spec: TriggerSpec) -> Self {
        Self {
            id,
            timeline,
            spec,
            fired: false,
        }
    }

    /// Whether a forward crossing has played the timeline yet.
    #[inline]
    pub fn has_fired(&self) -> bool {
        self.fired
    }

    /// PlayOnce triggers have nothing left to do after their first play.
    pub fn is_spent(&self) -> bool {
        self.fired && self.spec.policy == ReplayPolicy::PlayOnce
    }

    /// Decide what a crossing means for the bound timeline.
    /// End-boundary crossings carry no action under either policy.
    pub fn on_crossing(
        &mut self,
        boundary: BoundaryKind,
        direction: Direction,
        surface: &dyn Surface,
    ) -> TriggerAction {
        if !surface.contains(&self.spec.target) {
            trace!("trigger {:?}: target '{}' missing", self.id, self.spec.target);
            return TriggerAction::Ignore;
        }
        if boundary == BoundaryKind::End {
            return TriggerAction::Ignore;
        }
        match (self.spec.policy, direction) {
            (ReplayPolicy::PlayOnce, Direction::Forward) if !self.fired => {
                self.fired = true;
                TriggerAction::Play
            }
            (ReplayPolicy::PlayOnce, _) => TriggerAction::Ignore,
            (ReplayPolicy::PlayReverse, Direction::Forward) => {
                self.fired = true;
                TriggerAction::Play
            }
            (ReplayPolicy::PlayReverse, Direction::Reverse) if self.fired => {
                TriggerAction::Reverse
            }
            (ReplayPolicy::PlayReverse, Direction::Reverse) => TriggerAction::Ignore,
        }
    }
}
