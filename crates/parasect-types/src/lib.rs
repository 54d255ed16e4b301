//! Foundation types for Parasect.
//!
//! This crate provides the parameter model shared by every other Parasect
//! crate: a single named autopilot parameter, its declared type and value, and
//! the name-sorted collection used by readers, resolvers, writers and the
//! comparator.
//!
//! # Key Types
//!
//! - [`Value`] -- Untyped numeric storage (integer or floating point)
//! - [`ParamType`] -- Declared type following the MAVLink parameter type codes
//! - [`Parameter`] -- A named value with provenance and descriptive metadata
//! - [`ParamKey`] -- Identity of a parameter inside a collection: `(name, component id)`
//! - [`ParameterList`] -- Collection keyed by [`ParamKey`], always iterated in name order

pub mod error;
pub mod list;
pub mod param_type;
pub mod parameter;
pub mod value;

pub use error::{TypeError, TypeResult};
pub use list::ParameterList;
pub use param_type::ParamType;
pub use parameter::{
    format_float, ParamKey, Parameter, DEFAULT_COMPONENT_ID, DEFAULT_VEHICLE_ID, READONLY_MARKER,
};
pub use value::Value;
