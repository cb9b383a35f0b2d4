//! Output contracts from a scope.
//!
//! Outputs carry the property writes produced since the host last drained
//! them, keyed by target handle, plus a separate list of semantic events.
//! Adapters apply changes to the host surface and forward events.

use serde::{Deserialize, Serialize};

use crate::ids::{ListenerId, ProgressId, TimelineId, TimerId, TriggerId};
use crate::surface::TargetHandle;
use crate::trigger::TriggerAction;
use crate::value::{Property, Value};
use crate::viewport::Direction;

/// One property write.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Change {
    pub target: TargetHandle,
    pub property: Property,
    pub value: Value,
}

/// Discrete signals emitted while a scope runs.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[non_exhaustive]
pub enum MotionEvent {
    TimelineStarted {
        timeline: TimelineId,
    },
    /// Forward playback reached the end (after all repeats).
    TimelineCompleted {
        timeline: TimelineId,
    },
    /// Reverse playback returned to the initial state.
    TimelineReversed {
        timeline: TimelineId,
    },
    TriggerFired {
        trigger: TriggerId,
        direction: Direction,
        action: TriggerAction,
    },
    ProgressTick {
        progress: ProgressId,
        value: f32,
    },
    ProgressCompleted {
        progress: ProgressId,
    },
    /// A timer scheduled directly on the scope fired.
    TimerFired {
        timer: TimerId,
    },
    ListenerRemoved {
        listener: ListenerId,
    },
    /// A timeline or trigger referenced a target the surface does not have.
    TargetMissing {
        target: TargetHandle,
    },
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Outputs {
    #[serde(default)]
    pub changes: Vec<Change>,
    #[serde(default)]
    pub events: Vec<MotionEvent>,
}

impl Outputs {
    #[inline]
    pub fn clear(&mut self) {
        self.changes.clear();
        self.events.clear();
    }

    #[inline]
    pub fn push_change(&mut self, change: Change) {
        self.changes.push(change);
    }

    #[inline]
    pub fn push_event(&mut self, event: MotionEvent) {
        self.events.push(event);
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.changes.is_empty() && self.events.is_empty()
    }

    pub fn extend(&mut self, other: Outputs) {
        self.changes.extend(other.changes);
        self.events.extend(other.events);
    }

    /// Latest value written to `(target, property)` in this batch.
    pub fn last_value(&self, target: &str, property: &Property) -> Option<Value> {
        self.changes
            .iter()
            .rev()
            .find(|c| c.target == target && &c.property == property)
            .map(|c| c.value)
    }
}
