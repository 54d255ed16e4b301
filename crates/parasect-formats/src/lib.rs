//! Parameter file dialects for Parasect.
//!
//! Reading goes through [`read_params`], which runs every known dialect
//! reader against the input and requires exactly one to accept it. Writing is
//! described by the closed [`Format`] tag set: each tag knows its per-parameter
//! line syntax and its output filename.
//!
//! # Dialects read
//!
//! - PX4 parameter definition XML (grouped and loose `<parameter>` entries)
//! - QGroundControl tab-separated files (`vid cid NAME value type`)
//! - `ulog_params` style `NAME,value` pairs
//! - ArduPilot style whitespace-separated `NAME value [reasoning]`

pub mod error;
pub mod format;
pub mod reader;

pub use error::{FormatError, FormatResult};
pub use format::Format;
pub use reader::{dispatch, read_params, ReaderFn, READERS};
