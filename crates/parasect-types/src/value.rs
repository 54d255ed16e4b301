use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{TypeError, TypeResult};

/// Untyped numeric storage for a parameter value.
///
/// Storage keeps whatever numeric form the value arrived in. The declared
/// [`ParamType`](crate::ParamType) of the owning parameter decides how it is
/// read back and displayed.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Int(i64),
    Float(f64),
}

impl Value {
    /// Parse a textual value as an integer, falling back to floating point.
    pub fn parse(s: &str) -> TypeResult<Self> {
        let s = s.trim();
        if let Ok(i) = s.parse::<i64>() {
            return Ok(Self::Int(i));
        }
        s.parse::<f64>()
            .map(Self::Float)
            .map_err(|_| TypeError::InvalidValue(s.to_string()))
    }

    /// Parse a textual value that must be an integer.
    pub fn parse_int(s: &str) -> TypeResult<Self> {
        s.trim()
            .parse::<i64>()
            .map(Self::Int)
            .map_err(|_| TypeError::InvalidValue(s.to_string()))
    }

    /// Parse a textual value that must be a float. Integers are widened.
    pub fn parse_float(s: &str) -> TypeResult<Self> {
        s.trim()
            .parse::<f64>()
            .map(Self::Float)
            .map_err(|_| TypeError::InvalidValue(s.to_string()))
    }

    pub fn as_f64(&self) -> f64 {
        match *self {
            Self::Int(i) => i as f64,
            Self::Float(f) => f,
        }
    }

    /// Integer view of the value, truncating toward zero.
    pub fn as_i64(&self) -> i64 {
        match *self {
            Self::Int(i) => i,
            Self::Float(f) => f.trunc() as i64,
        }
    }

    /// Returns `true` if the value has no fractional part.
    pub fn is_whole(&self) -> bool {
        match *self {
            Self::Int(_) => true,
            Self::Float(f) => f.is_finite() && f.fract() == 0.0,
        }
    }

    pub fn is_zero(&self) -> bool {
        self.as_f64() == 0.0
    }

    /// Coerce to an integer value (truncation).
    pub fn truncated(self) -> Self {
        Self::Int(self.as_i64())
    }

    /// Coerce to a floating point value.
    pub fn widened(self) -> Self {
        Self::Float(self.as_f64())
    }
}

impl Default for Value {
    fn default() -> Self {
        Self::Int(0)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::Int(i) => write!(f, "{i}"),
            Self::Float(v) if v.is_finite() && v.fract() == 0.0 => write!(f, "{v:.1}"),
            Self::Float(v) => write!(f, "{v}"),
        }
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Self::Int(v.into())
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}
