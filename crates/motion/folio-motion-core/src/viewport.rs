//! Scroll observation: turn viewport movement into boundary crossings.
//!
//! Model:
//! - A boundary such as `"top 80%"` is past when the element's top edge sits
//!   at or above 80% of the viewport height.
//! - Each observed trigger remembers, per boundary, whether it was past at
//!   the last evaluation. A change reports a [`Crossing`]: Forward when the
//!   boundary became past (scrolling down), Reverse when it stopped being
//!   past (scrolling back up).
//! - The first evaluation after registration reports Forward for boundaries
//!   that are already past, so content above the fold reveals immediately.
//! - Targets that are missing or have no bounds are skipped and keep their
//!   previous state.

use indexmap::IndexMap;
use log::trace;
use serde::{Deserialize, Serialize};

use crate::ids::TriggerId;
use crate::surface::{Bounds, Surface, TargetHandle};
use crate::trigger::{Boundary, Edge};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Scrolling down into the boundary.
    Forward,
    /// Scrolling back up out of it.
    Reverse,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BoundaryKind {
    Start,
    End,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Crossing {
    pub trigger: TriggerId,
    pub boundary: BoundaryKind,
    pub direction: Direction,
}

/// Visible window in document coordinates.
#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub scroll_y: f32,
    pub height: f32,
}

impl Viewport {
    pub fn new(scroll_y: f32, height: f32) -> Self {
        Self { scroll_y, height }
    }
}

impl Boundary {
    /// Whether the element edge is at or above the viewport line.
    pub fn is_past(&self, bounds: Bounds, viewport: Viewport) -> bool {
        let edge = match self.edge {
            Edge::Top => bounds.top,
            Edge::Center => bounds.top + bounds.height * 0.5,
            Edge::Bottom => bounds.bottom(),
        };
        edge - viewport.scroll_y <= self.viewport * viewport.height
    }
}

#[derive(Clone, Debug)]
struct Observed {
    target: TargetHandle,
    start: Boundary,
    end: Option<Boundary>,
    past_start: Option<bool>,
    past_end: Option<bool>,
}

fn step_state(
    trigger: TriggerId,
    kind: BoundaryKind,
    was: &mut Option<bool>,
    now: bool,
    out: &mut Vec<Crossing>,
) {
    let direction = match (*was, now) {
        (None, true) | (Some(false), true) => Some(Direction::Forward),
        (Some(true), false) => Some(Direction::Reverse),
        _ => None,
    };
    *was = Some(now);
    if let Some(direction) = direction {
        out.push(Crossing {
            trigger,
            boundary: kind,
            direction,
        });
    }
}

/// Tracks which boundaries each trigger's element has scrolled past.
#[derive(Clone, Debug, Default)]
pub struct ScrollObserver {
    observed: IndexMap<TriggerId, Observed>,
    last: Option<Viewport>,
}

impl ScrollObserver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn observe(
        &mut self,
        trigger: TriggerId,
        target: &str,
        start: Boundary,
        end: Option<Boundary>,
    ) {
        self.observed.insert(
            trigger,
            Observed {
                target: target.to_string(),
                start,
                end,
                past_start: None,
                past_end: None,
            },
        );
    }

    /// Stop observing. Returns whether the trigger was observed.
    pub fn unobserve(&mut self, trigger: TriggerId) -> bool {
        self.observed.shift_remove(&trigger).is_some()
    }

    pub fn is_observing(&self, trigger: TriggerId) -> bool {
        self.observed.contains_key(&trigger)
    }

    pub fn len(&self) -> usize {
        self.observed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observed.is_empty()
    }

    pub fn clear(&mut self) {
        self.observed.clear();
    }

    /// Most recent viewport passed to [`update`](Self::update).
    pub fn viewport(&self) -> Option<Viewport> {
        self.last
    }

    /// Evaluate one trigger against `viewport`.
    pub fn evaluate(
        &mut self,
        trigger: TriggerId,
        viewport: Viewport,
        surface: &dyn Surface,
    ) -> Vec<Crossing> {
        let mut out = Vec::new();
        if let Some(obs) = self.observed.get_mut(&trigger) {
            Self::evaluate_one(trigger, obs, viewport, surface, &mut out);
        }
        out
    }

    fn evaluate_one(
        trigger: TriggerId,
        obs: &mut Observed,
        viewport: Viewport,
        surface: &dyn Surface,
        out: &mut Vec<Crossing>,
    ) {
        let Some(bounds) = surface.bounds(&obs.target) else {
            trace!("trigger {:?}: '{}' has no bounds; skipped", trigger, obs.target);
            return;
        };
        let now = obs.start.is_past(bounds, viewport);
        step_state(trigger, BoundaryKind::Start, &mut obs.past_start, now, out);
        if let Some(end) = obs.end {
            let now = end.is_past(bounds, viewport);
            step_state(trigger, BoundaryKind::End, &mut obs.past_end, now, out);
        }
    }

    /// Evaluate every observed trigger in registration order.
    pub fn update(&mut self, viewport: Viewport, surface: &dyn Surface) -> Vec<Crossing> {
        self.last = Some(viewport);
        let mut out = Vec::new();
        for (id, obs) in self.observed.iter_mut() {
            Self::evaluate_one(*id, obs, viewport, surface, &mut out);
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::Stage;

    fn stage() -> Stage {
        let mut s = Stage::new();
        s.add("about").set_bounds("about", Bounds::new(1000.0, 600.0));
        s
    }

    #[test]
    fn forward_then_reverse() {
        let st = stage();
        let mut obs = ScrollObserver::new();
        let id = TriggerId(0);
        obs.observe(id, "about", "top 80%".parse().unwrap(), None);
        // 1000 - 0 > 640: not yet
        assert!(obs.update(Viewport::new(0.0, 800.0), &st).is_empty());
        let c = obs.update(Viewport::new(400.0, 800.0), &st);
        assert_eq!(c.len(), 1);
        assert_eq!(c[0].direction, Direction::Forward);
        assert!(obs.update(Viewport::new(500.0, 800.0), &st).is_empty());
        let c = obs.update(Viewport::new(100.0, 800.0), &st);
        assert_eq!(c[0].direction, Direction::Reverse);
    }

    #[test]
    fn already_past_fires_on_first_evaluation() {
        let st = stage();
        let mut obs = ScrollObserver::new();
        obs.observe(TriggerId(3), "about", "top 80%".parse().unwrap(), None);
        let c = obs.evaluate(TriggerId(3), Viewport::new(2000.0, 800.0), &st);
        assert_eq!(c.len(), 1);
        assert_eq!(c[0].direction, Direction::Forward);
    }

    #[test]
    fn missing_target_is_skipped() {
        let st = Stage::new();
        let mut obs = ScrollObserver::new();
        obs.observe(TriggerId(0), "gone", "top 80%".parse().unwrap(), None);
        assert!(obs.update(Viewport::new(5000.0, 800.0), &st).is_empty());
    }
}
