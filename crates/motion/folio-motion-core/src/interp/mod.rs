//! Easing curves.
//!
//! Curves are named the way motion designers write them (`power2.out`,
//! `back.out(1.7)`, `cubic-bezier(0.42,0,0.58,1)`) and serialize back to
//! the same strings.

pub mod functions;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::MotionError;
use functions::{back_out, bezier_ease_t, power_in, power_in_out, power_out};

const DEFAULT_OVERSHOOT: f32 = 1.70158;

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Easing {
    Linear,
    PowerIn(u8),
    PowerOut(u8),
    PowerInOut(u8),
    BackOut(f32),
    CubicBezier([f32; 4]),
}

impl Default for Easing {
    /// Tweens without an explicit ease decelerate like `power1.out`.
    fn default() -> Self {
        Easing::PowerOut(1)
    }
}

impl Easing {
    /// The overshoot-then-settle curve staggered groups default to.
    pub fn back_out() -> Self {
        Easing::BackOut(1.7)
    }

    /// Map linear progress `t` in [0, 1] to eased progress. Back-out may
    /// leave [0, 1] in between but always maps 0 to 0 and 1 to 1.
    pub fn apply(&self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match *self {
            Easing::Linear => t,
            Easing::PowerIn(p) => power_in(t, p as i32),
            Easing::PowerOut(p) => power_out(t, p as i32),
            Easing::PowerInOut(p) => power_in_out(t, p as i32),
            Easing::BackOut(s) => back_out(t, s),
            Easing::CubicBezier([x1, y1, x2, y2]) => bezier_ease_t(t, x1, y1, x2, y2),
        }
    }
}

fn parse_args(inner: &str) -> Option<Vec<f32>> {
    inner
        .split(',')
        .map(|s| s.trim().parse::<f32>().ok())
        .collect()
}

impl FromStr for Easing {
    type Err = MotionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim();
        let unknown = || MotionError::UnknownEasing {
            name: s.to_string(),
        };
        match name {
            "linear" | "none" => return Ok(Easing::Linear),
            "back.out" => return Ok(Easing::BackOut(DEFAULT_OVERSHOOT)),
            _ => {}
        }
        if let Some(inner) = name
            .strip_prefix("back.out(")
            .and_then(|rest| rest.strip_suffix(')'))
        {
            let args = parse_args(inner).ok_or_else(unknown)?;
            return match args.as_slice() {
                [s] => Ok(Easing::BackOut(*s)),
                _ => Err(unknown()),
            };
        }
        if let Some(inner) = name
            .strip_prefix("cubic-bezier(")
            .and_then(|rest| rest.strip_suffix(')'))
        {
            let args = parse_args(inner).ok_or_else(unknown)?;
            return match args.as_slice() {
                [x1, y1, x2, y2] => Ok(Easing::CubicBezier([*x1, *y1, *x2, *y2])),
                _ => Err(unknown()),
            };
        }
        if let Some(rest) = name.strip_prefix("power") {
            let (power, dir) = rest.split_once('.').unwrap_or((rest, "out"));
            let power: u8 = power.parse().map_err(|_| unknown())?;
            return match dir {
                "in" => Ok(Easing::PowerIn(power)),
                "out" => Ok(Easing::PowerOut(power)),
                "inOut" => Ok(Easing::PowerInOut(power)),
                _ => Err(unknown()),
            };
        }
        Err(unknown())
    }
}

impl TryFrom<String> for Easing {
    type Error = MotionError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl fmt::Display for Easing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Easing::Linear => f.write_str("linear"),
            Easing::PowerIn(p) => write!(f, "power{p}.in"),
            Easing::PowerOut(p) => write!(f, "power{p}.out"),
            Easing::PowerInOut(p) => write!(f, "power{p}.inOut"),
            Easing::BackOut(s) => write!(f, "back.out({s})"),
            Easing::CubicBezier([x1, y1, x2, y2]) => {
                write!(f, "cubic-bezier({x1},{y1},{x2},{y2})")
            }
        }
    }
}

impl From<Easing> for String {
    fn from(e: Easing) -> Self {
        e.to_string()
    }
}
