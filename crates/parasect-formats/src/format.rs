//! Output formats and their per-parameter line syntax.
//!
//! Every format-specific decision lives in a `match` on [`Format`], so adding
//! a format means adding a variant and filling in these tables.

use std::fmt;
use std::str::FromStr;

use parasect_types::{Parameter, READONLY_MARKER};

use crate::error::{FormatError, FormatResult};

/// Supported output formats.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Format {
    /// `NAME,value`
    Csv,
    /// QGroundControl parameter file: `vid\tcid\tNAME\tvalue\ttype`
    Px4,
    /// Legacy PX4 airframe script using `param set`
    Px4afv1,
    /// PX4 airframe script using `param set-default`
    Px4afv2,
    /// ArduPilot parameter file: `NAME\tvalue`
    Apm,
    /// ArduPilot parameter file with `@READONLY` annotations
    Apj,
}

impl Format {
    pub const ALL: [Format; 6] = [
        Self::Csv,
        Self::Px4,
        Self::Px4afv1,
        Self::Px4afv2,
        Self::Apm,
        Self::Apj,
    ];

    /// Name used on the command line and as the boilerplate section key.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Px4 => "px4",
            Self::Px4afv1 => "px4afv1",
            Self::Px4afv2 => "px4afv2",
            Self::Apm => "apm",
            Self::Apj => "apj",
        }
    }

    /// PX4 targets get a synthetic `SYS_AUTOSTART` parameter on export.
    pub fn is_px4(&self) -> bool {
        matches!(self, Self::Px4 | Self::Px4afv1 | Self::Px4afv2)
    }

    /// Output file name for a meal.
    pub fn filename(&self, meal_name: &str, frame_id: i64, hitl: bool) -> String {
        match self {
            Self::Csv => format!("{meal_name}.csv"),
            Self::Px4 => format!("{meal_name}.params"),
            Self::Px4afv1 | Self::Px4afv2 => {
                let mut name = format!("{frame_id}_{meal_name}");
                if hitl {
                    name.push_str(".hil");
                }
                name
            }
            Self::Apm | Self::Apj => format!("{meal_name}.param"),
        }
    }

    /// Render one parameter as a line of this format, without the newline.
    ///
    /// `sitl` drops the indentation of airframe script lines.
    pub fn param_line(&self, param: &Parameter, sitl: bool) -> FormatResult<String> {
        let name = param.name();
        let value = param.pretty_value();
        let line = match self {
            Self::Csv => format!("{name},{value}"),
            Self::Px4 => {
                let code = param
                    .param_type
                    .ok_or_else(|| FormatError::UntypedParameter(name.to_string()))?
                    .mavlink_code();
                format!("{}\t{}\t{name}\t{value}\t{code}", param.vid, param.cid)
            }
            Self::Px4afv1 | Self::Px4afv2 => {
                let indent = if sitl { "" } else { "\t" };
                let directive = if *self == Self::Px4afv1 {
                    "set"
                } else {
                    "set-default"
                };
                format!("{indent}param {directive} {name} {value}")
            }
            Self::Apm => format!("{name}\t{value}"),
            Self::Apj if param.readonly => format!("{name}\t{value}\t{READONLY_MARKER}"),
            Self::Apj => format!("{name}\t{value}"),
        };
        Ok(line)
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Format {
    type Err = FormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|f| f.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| FormatError::UnknownFormat(s.to_string()))
    }
}
