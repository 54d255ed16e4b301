use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;

/// Declared parameter type, numbered after MAVLink `MAV_PARAM_TYPE`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ParamType {
    Uint8,
    Int8,
    Uint16,
    Int16,
    Uint32,
    Int32,
    Uint64,
    Int64,
    Float,
    Float64,
}

impl ParamType {
    /// All types in MAVLink code order.
    pub const ALL: [ParamType; 10] = [
        Self::Uint8,
        Self::Int8,
        Self::Uint16,
        Self::Int16,
        Self::Uint32,
        Self::Int32,
        Self::Uint64,
        Self::Int64,
        Self::Float,
        Self::Float64,
    ];

    /// Decode a MAVLink numeric type code (1..=10).
    pub fn from_mavlink_code(code: i64) -> Result<Self, TypeError> {
        usize::try_from(code)
            .ok()
            .and_then(|c| c.checked_sub(1))
            .and_then(|idx| Self::ALL.get(idx).copied())
            .ok_or(TypeError::UnknownTypeCode(code))
    }

    /// The MAVLink numeric type code.
    pub fn mavlink_code(&self) -> u8 {
        match self {
            Self::Uint8 => 1,
            Self::Int8 => 2,
            Self::Uint16 => 3,
            Self::Int16 => 4,
            Self::Uint32 => 5,
            Self::Int32 => 6,
            Self::Uint64 => 7,
            Self::Int64 => 8,
            Self::Float => 9,
            Self::Float64 => 10,
        }
    }

    pub fn is_integer(&self) -> bool {
        !self.is_float()
    }

    pub fn is_float(&self) -> bool {
        matches!(self, Self::Float | Self::Float64)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Uint8 => "UINT8",
            Self::Int8 => "INT8",
            Self::Uint16 => "UINT16",
            Self::Int16 => "INT16",
            Self::Uint32 => "UINT32",
            Self::Int32 => "INT32",
            Self::Uint64 => "UINT64",
            Self::Int64 => "INT64",
            Self::Float => "FLOAT",
            Self::Float64 => "FLOAT64",
        }
    }

    /// One-letter tag used in the textual form of a parameter.
    pub fn short_tag(&self) -> &'static str {
        if self.is_float() {
            "F"
        } else {
            "I"
        }
    }
}

impl fmt::Display for ParamType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ParamType {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.trim().to_ascii_uppercase();
        match upper.as_str() {
            "REAL32" => return Ok(Self::Float),
            "REAL64" | "DOUBLE" => return Ok(Self::Float64),
            _ => {}
        }
        Self::ALL
            .iter()
            .copied()
            .find(|t| t.as_str() == upper)
            .ok_or_else(|| TypeError::UnsupportedType(s.to_string()))
    }
}
