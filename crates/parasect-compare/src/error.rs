//! Error types for the compare crate.

use parasect_build::BuildError;
use parasect_formats::FormatError;

/// Errors that can occur while comparing parameter files.
#[derive(Debug, thiserror::Error)]
pub enum CompareError {
    /// Loading the calibration or operator staple dish failed.
    #[error(transparent)]
    Build(#[from] BuildError),

    /// One of the compared files could not be read.
    #[error(transparent)]
    Format(#[from] FormatError),
}

/// Convenience alias for comparison results.
pub type CompareResult<T> = Result<T, CompareError>;
