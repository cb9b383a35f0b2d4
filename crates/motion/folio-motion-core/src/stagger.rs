//! Staggered group reveals.
//!
//! A stagger applies one transition to every child of a container and
//! delays child `n` by `n × each`. Children keep document order; there is
//! no shuffling.

use serde::{Deserialize, Serialize};

use crate::data::{Position, StepSpec, TargetRef, TimelineSpec};
use crate::error::Result;
use crate::interp::Easing;
use crate::surface::Surface;
use crate::timeline::Timeline;
use crate::value::{Property, Value};

fn linear() -> Easing {
    Easing::Linear
}

/// Per-child delay distribution.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StaggerGroup {
    /// Seconds between consecutive children.
    pub each: f32,
    /// Curve that spreads the total delay across children. Linear keeps the
    /// delays evenly spaced.
    #[serde(default = "linear")]
    pub ease: Easing,
}

impl StaggerGroup {
    pub fn new(each: f32) -> Self {
        Self {
            each,
            ease: Easing::Linear,
        }
    }

    pub fn with_ease(mut self, ease: Easing) -> Self {
        self.ease = ease;
        self
    }

    /// Start offset of each of `count` children, relative to the group start.
    /// Offsets never decrease, so reveal order always follows child order.
    pub fn offsets(&self, count: usize) -> Vec<f32> {
        if count == 0 {
            return Vec::new();
        }
        if self.ease == Easing::Linear || count == 1 {
            return (0..count).map(|i| i as f32 * self.each).collect();
        }
        let total = (self.each * (count - 1) as f32).max(0.0);
        let mut last = 0.0f32;
        (0..count)
            .map(|i| {
                let u = i as f32 / (count - 1) as f32;
                let offset = (self.ease.apply(u) * total).clamp(last, total);
                last = offset;
                offset
            })
            .collect()
    }

    /// Delay of the last child.
    pub fn span(&self, count: usize) -> f32 {
        self.offsets(count).last().copied().unwrap_or(0.0)
    }
}

/// Convenience for the common "reveal every child" pattern: one from-state,
/// one to-state, applied to the children of `container`.
#[derive(Clone, Debug)]
pub struct StaggerAnimator {
    container: String,
    step: StepSpec,
    group: StaggerGroup,
}

impl StaggerAnimator {
    /// Defaults: 0.1 s between children, 0.6 s per child, `back.out(1.7)`.
    pub fn new(container: &str) -> Self {
        Self {
            container: container.to_string(),
            step: StepSpec::new(TargetRef::children_of(container))
                .duration(0.6)
                .ease(Easing::back_out()),
            group: StaggerGroup::new(0.1),
        }
    }

    pub fn animate(mut self, property: impl Into<Property>, from: Value, to: Value) -> Self {
        self.step = self.step.animate(property, from, to);
        self
    }

    pub fn each(mut self, seconds: f32) -> Self {
        self.group.each = seconds;
        self
    }

    pub fn duration(mut self, seconds: f32) -> Self {
        self.step = self.step.duration(seconds);
        self
    }

    pub fn ease(mut self, ease: Easing) -> Self {
        self.step = self.step.ease(ease);
        self
    }

    pub fn distribution(mut self, ease: Easing) -> Self {
        self.group.ease = ease;
        self
    }

    pub fn container(&self) -> &str {
        &self.container
    }

    /// The staggered step, for embedding in a larger timeline.
    pub fn into_step(self) -> StepSpec {
        self.step.at(Position::AfterPrevious).stagger(self.group)
    }

    /// A standalone timeline holding only the staggered step.
    pub fn into_timeline(self, surface: &dyn Surface) -> Result<Timeline> {
        let name = format!("stagger:{}", self.container);
        let spec = TimelineSpec {
            name,
            steps: vec![self.into_step()],
            ..TimelineSpec::default()
        };
        Timeline::compile(&spec, surface)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn linear_offsets_are_exact_multiples() {
        let g = StaggerGroup::new(0.15);
        let offs = g.offsets(5);
        for (n, o) in offs.iter().enumerate() {
            assert_eq!(*o, n as f32 * 0.15);
        }
        assert_eq!(g.span(5), 4.0 * 0.15);
        assert!(g.offsets(0).is_empty());
    }

    #[test]
    fn eased_offsets_stay_ordered() {
        let g = StaggerGroup::new(0.2).with_ease(Easing::back_out());
        let offs = g.offsets(6);
        assert_eq!(offs[0], 0.0);
        assert!(offs.windows(2).all(|w| w[0] <= w[1]));
        assert!((offs[5] - 1.0).abs() < 1e-5);
    }
}
