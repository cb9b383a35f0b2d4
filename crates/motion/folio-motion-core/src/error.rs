//! Error type for building timelines and parsing motion specs.
//!
//! Runtime conditions that are expected during fast mount/unmount cycles
//! (missing targets, repeated teardown) are not errors; they degrade to
//! "nothing animates" and are only logged.

use crate::value::{Property, ValueKind};

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum MotionError {
    #[error("invalid value literal '{literal}'")]
    InvalidValue { literal: String },

    #[error("unknown easing '{name}'")]
    UnknownEasing { name: String },

    #[error("invalid position '{literal}'")]
    InvalidPosition { literal: String },

    #[error("invalid viewport boundary '{literal}'")]
    InvalidBoundary { literal: String },

    #[error("unsupported toggle actions '{literal}'")]
    UnsupportedToggleActions { literal: String },

    #[error("step {step}: duration must be finite and >= 0, got {duration}")]
    InvalidDuration { step: usize, duration: f32 },

    #[error("step {step}: '{property}' cannot interpolate {from:?} -> {to:?}")]
    IncompatibleValues {
        step: usize,
        property: Property,
        from: ValueKind,
        to: ValueKind,
    },

    #[error("step {step}: '{property}' has no starting value")]
    MissingFromValue { step: usize, property: Property },

    #[error("step {step}: resolved start {start} is negative")]
    NegativeStart { step: usize, start: f32 },

    #[error("progress increment range [{min}, {max}] must satisfy 0 < min <= max")]
    InvalidIncrement { min: f32, max: f32 },

    #[error("timer period must be > 0 ms")]
    ZeroPeriod,

    #[error("spec parse error: {reason}")]
    Parse { reason: String },
}

pub type Result<T> = core::result::Result<T, MotionError>;

impl From<serde_json::Error> for MotionError {
    fn from(err: serde_json::Error) -> Self {
        MotionError::Parse {
            reason: err.to_string(),
        }
    }
}
