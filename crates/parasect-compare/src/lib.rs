//! Parameter set comparison for Parasect.
//!
//! Two parameter lists are split into groups by `(vehicle id, component id)`
//! and compared name by name. Values within a relative tolerance of 0.6% are
//! treated as equal, which matches the three significant figures parameters
//! are displayed with.
//!
//! # Key Types
//!
//! - [`Comparison`] -- Both lists' labels plus one [`ComponentComparison`] per id pair
//! - [`ComponentComparison`] / [`ParamDiff`] -- The differing parameters of one component
//! - [`CompareOptions`] -- Calibration/operator stripping and component filtering

pub mod comparison;
pub mod error;
pub mod report;

pub use comparison::{
    collect_vid_cid, compare_files, compare_parameter_lists, get_vehicles_comparison,
    values_differ, CompareOptions, Comparison, ComponentComparison, ParamDiff, EPS,
    PARAM_EPS_PCT,
};
pub use error::{CompareError, CompareResult};
pub use report::{build_comparison_string, compare_helper};
