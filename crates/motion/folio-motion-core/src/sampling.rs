//! Channel sampling for compiled timelines.
//!
//! Model:
//! - A Channel is one (target, property) pair with segments sorted by
//!   absolute start time.
//! - At time t the last segment whose start is <= t decides the value;
//!   before the first segment the channel holds that segment's `from`.
//! - A segment eases linear progress, then blends from → to. Progress at or
//!   past 1 yields `to` exactly.
//!
//! API:
//! - Channel::sample(t) where t is local (iteration) time in seconds.

use crate::interp::Easing;
use crate::surface::TargetHandle;
use crate::value::{Property, Value};

#[derive(Clone, Debug, PartialEq)]
pub struct Segment {
    pub start: f32,
    pub duration: f32,
    pub from: Value,
    pub to: Value,
    pub ease: Easing,
}

impl Segment {
    #[inline]
    pub fn end(&self) -> f32 {
        self.start + self.duration
    }

    pub fn sample(&self, t: f32) -> Value {
        if t < self.start {
            return self.from;
        }
        if self.duration <= 0.0 {
            return self.to;
        }
        let progress = (t - self.start) / self.duration;
        if progress >= 1.0 {
            return self.to;
        }
        self.from.interpolate(&self.to, self.ease.apply(progress))
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Channel {
    pub target: TargetHandle,
    pub property: Property,
    pub segments: Vec<Segment>,
}

impl Channel {
    /// Value before anything on this channel has started.
    pub fn initial(&self) -> Option<Value> {
        self.segments.first().map(|s| s.from)
    }

    /// Index of the segment governing time t, if any has started.
    /// Linear scan from the back (channels hold a handful of segments).
    fn find_segment(&self, t: f32) -> Option<usize> {
        self.segments.iter().rposition(|s| s.start <= t)
    }

    pub fn sample(&self, t: f32) -> Option<Value> {
        match self.find_segment(t) {
            Some(i) => Some(self.segments[i].sample(t)),
            None => self.initial(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seg(start: f32, duration: f32, from: f32, to: f32) -> Segment {
        Segment {
            start,
            duration,
            from: Value::num(from),
            to: Value::num(to),
            ease: Easing::Linear,
        }
    }

    #[test]
    fn holds_initial_before_first_segment() {
        let ch = Channel {
            target: "a".into(),
            property: Property::Opacity,
            segments: vec![seg(1.0, 1.0, 0.0, 1.0)],
        };
        assert_eq!(ch.sample(0.5), Some(Value::num(0.0)));
        assert_eq!(ch.sample(1.5), Some(Value::num(0.5)));
        assert_eq!(ch.sample(9.0), Some(Value::num(1.0)));
    }

    #[test]
    fn later_segment_takes_over() {
        let ch = Channel {
            target: "a".into(),
            property: Property::Y,
            segments: vec![seg(0.0, 1.0, 0.0, 10.0), seg(2.0, 1.0, 10.0, 20.0)],
        };
        assert_eq!(ch.sample(1.5), Some(Value::num(10.0)));
        assert_eq!(ch.sample(2.5), Some(Value::num(15.0)));
    }

    #[test]
    fn zero_duration_snaps() {
        let s = seg(1.0, 0.0, 0.0, 1.0);
        assert_eq!(s.sample(0.99), Value::num(0.0));
        assert_eq!(s.sample(1.0), Value::num(1.0));
    }
}
