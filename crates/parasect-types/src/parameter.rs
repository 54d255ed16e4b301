use std::fmt;

use serde::{Deserialize, Serialize};

use crate::param_type::ParamType;
use crate::value::Value;

/// Vehicle id assigned to parameters that do not carry one.
pub const DEFAULT_VEHICLE_ID: u8 = 1;
/// Component id assigned to parameters that do not carry one.
pub const DEFAULT_COMPONENT_ID: u8 = 1;
/// Token that marks a parameter as read-only when found in its reasoning.
pub const READONLY_MARKER: &str = "@READONLY";

/// Significant figures targeted by [`format_float`].
const PRETTY_PRECISION: f64 = 3.0;

/// Identity of a parameter inside a [`ParameterList`](crate::ParameterList).
///
/// Two parameters with the same name but different component ids are
/// distinct entries. Ordering is by name first, so collections iterate in
/// name order.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ParamKey {
    pub name: String,
    pub cid: u8,
}

impl ParamKey {
    pub fn new(name: &str, cid: u8) -> Self {
        Self {
            name: name.to_uppercase(),
            cid,
        }
    }

    /// Key for `name` on the default component.
    pub fn named(name: &str) -> Self {
        Self::new(name, DEFAULT_COMPONENT_ID)
    }
}

impl fmt::Display for ParamKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.name, self.cid)
    }
}

/// A single named autopilot parameter.
///
/// The stored value is untyped; [`Parameter::value`] applies the declared
/// type on access, so an `INT32` parameter holding `2.2` reads back as `2`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Parameter {
    name: String,
    value: Value,
    pub param_type: Option<ParamType>,
    /// Vehicle id (MAVLink system id).
    pub vid: u8,
    /// Component id (MAVLink component id).
    pub cid: u8,
    pub group: Option<String>,
    pub short_desc: Option<String>,
    pub long_desc: Option<String>,
    pub default_value: Option<Value>,
    pub min_value: Option<f64>,
    pub max_value: Option<f64>,
    /// Increment hint for user interfaces.
    pub increment: Option<f64>,
    pub unit: Option<String>,
    pub reboot_required: bool,
    pub readonly: bool,
    pub reasoning: Option<String>,
}

impl Parameter {
    /// Create an untyped parameter. The name is upper-cased.
    pub fn new(name: &str, value: impl Into<Value>) -> Self {
        Self {
            name: name.to_uppercase(),
            value: value.into(),
            param_type: None,
            vid: DEFAULT_VEHICLE_ID,
            cid: DEFAULT_COMPONENT_ID,
            group: None,
            short_desc: None,
            long_desc: None,
            default_value: None,
            min_value: None,
            max_value: None,
            increment: None,
            unit: None,
            reboot_required: false,
            readonly: false,
            reasoning: None,
        }
    }

    pub fn with_type(mut self, param_type: ParamType) -> Self {
        self.param_type = Some(param_type);
        self
    }

    pub fn with_ids(mut self, vid: u8, cid: u8) -> Self {
        self.vid = vid;
        self.cid = cid;
        self
    }

    pub fn with_group(mut self, group: &str) -> Self {
        self.group = Some(group.to_uppercase());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn key(&self) -> ParamKey {
        ParamKey {
            name: self.name.clone(),
            cid: self.cid,
        }
    }

    /// The value as seen through the declared type.
    ///
    /// Integer types truncate, floating types widen, and an unset type
    /// returns the stored value unchanged.
    pub fn value(&self) -> Value {
        match self.param_type {
            Some(t) if t.is_integer() => self.value.truncated(),
            Some(_) => self.value.widened(),
            None => self.value,
        }
    }

    /// The stored value, before any type coercion.
    pub fn raw_value(&self) -> Value {
        self.value
    }

    pub fn set_value(&mut self, value: impl Into<Value>) {
        self.value = value.into();
    }

    /// Attach a reasoning string, flagging the parameter read-only if it
    /// carries [`READONLY_MARKER`].
    pub fn set_reasoning(&mut self, reasoning: Option<String>) {
        if reasoning.as_deref().is_some_and(|r| r.contains(READONLY_MARKER)) {
            self.readonly = true;
        }
        self.reasoning = reasoning;
    }

    /// Merge an incoming parameter with the same identity onto this one.
    ///
    /// The value follows the incoming declared type if it has one, otherwise
    /// it is coerced to this parameter's declared type. Descriptive
    /// attributes are copied only when the incoming one is meaningful:
    /// non-empty, non-zero, and for strings longer than one character.
    pub fn merge_from(&mut self, incoming: Parameter) {
        self.value = match (incoming.param_type, self.param_type) {
            (Some(_), _) | (None, None) => incoming.value,
            (None, Some(t)) if t.is_integer() => incoming.value.truncated(),
            (None, Some(_)) => incoming.value.widened(),
        };
        if self.param_type.is_none() {
            self.param_type = incoming.param_type;
        }

        copy_text(&mut self.reasoning, incoming.reasoning);
        copy_text(&mut self.short_desc, incoming.short_desc);
        copy_text(&mut self.long_desc, incoming.long_desc);
        copy_text(&mut self.unit, incoming.unit);
        copy_text(&mut self.group, incoming.group);
        copy_number(&mut self.min_value, incoming.min_value);
        copy_number(&mut self.max_value, incoming.max_value);
        copy_number(&mut self.increment, incoming.increment);
        if let Some(default) = incoming.default_value.filter(|v| !v.is_zero()) {
            self.default_value = Some(default);
        }
        if incoming.reboot_required {
            self.reboot_required = true;
        }
        if incoming.readonly {
            self.readonly = true;
        }
        if incoming.vid != 0 {
            self.vid = incoming.vid;
        }
    }

    /// Printable form of the value, as written to parameter files.
    ///
    /// Integers (declared, or whole numbers with no declared type) print
    /// without a decimal point; everything else goes through
    /// [`format_float`].
    pub fn pretty_value(&self) -> String {
        let value = self.value();
        let integral = match self.param_type {
            Some(t) => t.is_integer(),
            None => value.is_whole(),
        };
        let pretty = if integral {
            value.as_i64().to_string()
        } else {
            format_float(value.as_f64())
        };
        tracing::trace!(name = %self.name, value = %self.value, pretty = %pretty, "pretty-printed value");
        pretty
    }
}

/// Format a float with roughly three significant figures.
///
/// The number of decimals is `max(1, 3 - floor(log10(|value|)))`; trailing
/// zeros are then stripped while keeping at least one decimal digit. Zero
/// prints as `0.0`.
pub fn format_float(value: f64) -> String {
    if value == 0.0 {
        return "0.0".to_string();
    }
    let magnitude = value.abs().log10().floor();
    let digits = (PRETTY_PRECISION - magnitude).max(1.0) as usize;
    let mut s = format!("{value:.digits$}");
    if s.contains('.') {
        let trimmed = s.trim_end_matches('0').len();
        s.truncate(trimmed);
        if s.ends_with('.') {
            s.push('0');
        }
    }
    s
}

fn copy_text(target: &mut Option<String>, incoming: Option<String>) {
    if let Some(text) = incoming.filter(|t| t.len() > 1) {
        *target = Some(text);
    }
}

fn copy_number(target: &mut Option<f64>, incoming: Option<f64>) {
    if let Some(v) = incoming.filter(|v| *v != 0.0) {
        *target = Some(v);
    }
}

impl fmt::Display for Parameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (tag, value) = match self.param_type {
            Some(t) if t.is_float() => ("F", format!("{:.6}", self.value().as_f64())),
            Some(_) => ("I", self.value().as_i64().to_string()),
            None => ("", self.value.to_string()),
        };
        write!(f, "{:16} ({tag}):\t{value}", self.name)
    }
}
