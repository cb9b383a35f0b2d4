//! Animatable properties and the values they interpolate between.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::MotionError;
use crate::interp::functions::{lerp_f32, lerp_vec4};

#[derive(Copy, Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Unit {
    Px,
    Percent,
    Deg,
}

impl Unit {
    pub fn suffix(self) -> &'static str {
        match self {
            Unit::Px => "px",
            Unit::Percent => "%",
            Unit::Deg => "deg",
        }
    }
}

#[derive(Copy, Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum ValueKind {
    Number,
    Length(Unit),
    Color,
}

/// A property value. Plain numbers, unit-suffixed numbers and RGBA colors.
///
/// In JSON a value is a bare number, a string literal (`"10px"`, `"50%"`,
/// `"-15deg"`, `"#ff8800"`) or a four-element RGBA array.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ValueRepr", into = "ValueRepr")]
pub enum Value {
    Number(f32),
    Length { value: f32, unit: Unit },
    /// RGBA, each channel in [0, 1].
    Color([f32; 4]),
}

impl Value {
    #[inline]
    pub fn num(v: f32) -> Self {
        Value::Number(v)
    }

    #[inline]
    pub fn px(v: f32) -> Self {
        Value::Length {
            value: v,
            unit: Unit::Px,
        }
    }

    #[inline]
    pub fn percent(v: f32) -> Self {
        Value::Length {
            value: v,
            unit: Unit::Percent,
        }
    }

    #[inline]
    pub fn deg(v: f32) -> Self {
        Value::Length {
            value: v,
            unit: Unit::Deg,
        }
    }

    #[inline]
    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Number(_) => ValueKind::Number,
            Value::Length { unit, .. } => ValueKind::Length(*unit),
            Value::Color(_) => ValueKind::Color,
        }
    }

    /// Scalar magnitude for numbers and lengths; `None` for colors.
    pub fn as_f32(&self) -> Option<f32> {
        match self {
            Value::Number(v) | Value::Length { value: v, .. } => Some(*v),
            Value::Color(_) => None,
        }
    }

    #[inline]
    pub fn is_compatible(&self, other: &Value) -> bool {
        self.kind() == other.kind()
    }

    /// Blend toward `to` by `t`. The endpoints are returned exactly so a
    /// finished tween lands on its declared value without float drift.
    /// Incompatible kinds hold the left value.
    pub fn interpolate(&self, to: &Value, t: f32) -> Value {
        if t == 0.0 {
            return *self;
        }
        if t == 1.0 {
            return *to;
        }
        match (self, to) {
            (Value::Number(a), Value::Number(b)) => Value::Number(lerp_f32(*a, *b, t)),
            (Value::Length { value: a, unit: ua }, Value::Length { value: b, unit: ub })
                if ua == ub =>
            {
                Value::Length {
                    value: lerp_f32(*a, *b, t),
                    unit: *ua,
                }
            }
            (Value::Color(a), Value::Color(b)) => Value::Color(lerp_vec4(*a, *b, t)),
            _ => *self,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Number(v) => write!(f, "{v}"),
            Value::Length { value, unit } => write!(f, "{value}{}", unit.suffix()),
            Value::Color(c) => write!(
                f,
                "rgba({}, {}, {}, {})",
                (c[0] * 255.0).round() as u8,
                (c[1] * 255.0).round() as u8,
                (c[2] * 255.0).round() as u8,
                c[3]
            ),
        }
    }
}

fn parse_hex_color(hex: &str) -> Option<[f32; 4]> {
    if !hex.is_ascii() {
        return None;
    }
    let channel = |s: &str| u8::from_str_radix(s, 16).ok().map(|v| v as f32 / 255.0);
    match hex.len() {
        6 => Some([
            channel(&hex[0..2])?,
            channel(&hex[2..4])?,
            channel(&hex[4..6])?,
            1.0,
        ]),
        8 => Some([
            channel(&hex[0..2])?,
            channel(&hex[2..4])?,
            channel(&hex[4..6])?,
            channel(&hex[6..8])?,
        ]),
        _ => None,
    }
}

impl FromStr for Value {
    type Err = MotionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lit = s.trim();
        let invalid = || MotionError::InvalidValue {
            literal: s.to_string(),
        };
        if let Some(hex) = lit.strip_prefix('#') {
            return parse_hex_color(hex).map(Value::Color).ok_or_else(invalid);
        }
        for unit in [Unit::Px, Unit::Percent, Unit::Deg] {
            if let Some(num) = lit.strip_suffix(unit.suffix()) {
                let value = num.trim().parse::<f32>().map_err(|_| invalid())?;
                return Ok(Value::Length { value, unit });
            }
        }
        lit.parse::<f32>().map(Value::Number).map_err(|_| invalid())
    }
}

#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum ValueRepr {
    Number(f32),
    Color([f32; 4]),
    Text(String),
}

impl TryFrom<ValueRepr> for Value {
    type Error = MotionError;

    fn try_from(repr: ValueRepr) -> Result<Self, Self::Error> {
        match repr {
            ValueRepr::Number(v) => Ok(Value::Number(v)),
            ValueRepr::Color(c) => Ok(Value::Color(c)),
            ValueRepr::Text(s) => s.parse(),
        }
    }
}

impl From<Value> for ValueRepr {
    fn from(v: Value) -> Self {
        match v {
            Value::Number(n) => ValueRepr::Number(n),
            Value::Color(c) => ValueRepr::Color(c),
            length @ Value::Length { .. } => ValueRepr::Text(length.to_string()),
        }
    }
}

/// Visual property a step transitions.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Property {
    Opacity,
    X,
    Y,
    Scale,
    /// Gaussian blur radius of the element's filter.
    Blur,
    RotateY,
    Width,
    Custom(String),
}

impl Property {
    pub fn as_str(&self) -> &str {
        match self {
            Property::Opacity => "opacity",
            Property::X => "x",
            Property::Y => "y",
            Property::Scale => "scale",
            Property::Blur => "blur",
            Property::RotateY => "rotateY",
            Property::Width => "width",
            Property::Custom(name) => name,
        }
    }
}

impl fmt::Display for Property {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&str> for Property {
    fn from(s: &str) -> Self {
        match s {
            "opacity" => Property::Opacity,
            "x" => Property::X,
            "y" => Property::Y,
            "scale" => Property::Scale,
            "blur" => Property::Blur,
            "rotateY" => Property::RotateY,
            "width" => Property::Width,
            other => Property::Custom(other.to_string()),
        }
    }
}

impl TryFrom<String> for Property {
    type Error = std::convert::Infallible;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Ok(Property::from(s.as_str()))
    }
}

impl From<Property> for String {
    fn from(p: Property) -> Self {
        p.as_str().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::parse_timeline_json;

    #[test]
    fn non_ascii_hex_is_invalid_not_a_panic() {
        for lit in ["#aébcd", "#ééé", "#aabbccé"] {
            assert!(
                matches!(lit.parse::<Value>(), Err(MotionError::InvalidValue { .. })),
                "{lit}"
            );
        }
        let json = r##"{"steps":[{"targets":"a","from":{"color":"#aébcd"},"to":{"color":"#000000"}}]}"##;
        assert!(parse_timeline_json(json).is_err());
    }

    #[test]
    fn parses_literals() {
        assert_eq!("10px".parse::<Value>().unwrap(), Value::px(10.0));
        assert_eq!("50%".parse::<Value>().unwrap(), Value::percent(50.0));
        assert_eq!("-15deg".parse::<Value>().unwrap(), Value::deg(-15.0));
        assert_eq!("0.5".parse::<Value>().unwrap(), Value::num(0.5));
        assert_eq!(
            "#ff0000".parse::<Value>().unwrap(),
            Value::Color([1.0, 0.0, 0.0, 1.0])
        );
        assert!("ten".parse::<Value>().is_err());
        assert!("#12".parse::<Value>().is_err());
    }

    #[test]
    fn endpoints_are_exact() {
        let a = Value::num(0.8);
        let b = Value::num(1.0);
        assert_eq!(a.interpolate(&b, 1.0), b);
        assert_eq!(a.interpolate(&b, 0.0), a);
    }

    #[test]
    fn mismatched_units_hold_left() {
        let a = Value::px(0.0);
        let b = Value::percent(100.0);
        assert!(!a.is_compatible(&b));
        assert_eq!(a.interpolate(&b, 0.5), a);
    }

    #[test]
    fn property_round_trips_through_strings() {
        assert_eq!(Property::from("rotateY"), Property::RotateY);
        assert_eq!(
            Property::from("letterSpacing"),
            Property::Custom("letterSpacing".into())
        );
        assert_eq!(String::from(Property::Blur), "blur");
    }
}
