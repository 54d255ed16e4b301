use std::path::PathBuf;

use parasect_types::TypeError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FormatError {
    /// The input is not written in the dialect a reader expects. The
    /// dispatcher swallows this and tries the next reader.
    #[error("input does not match dialect: {0}")]
    Mismatch(String),

    #[error("could not recognize the parameter file format of {source_name}")]
    Unrecognized { source_name: String },

    #[error("parameter file format of {source_name} is ambiguous, fits {dialects:?}")]
    Ambiguous {
        source_name: String,
        dialects: Vec<&'static str>,
    },

    #[error("output format {0:?} not supported")]
    UnknownFormat(String),

    #[error("parameter {0} has no declared type")]
    UntypedParameter(String),

    #[error("type error: {0}")]
    Type(#[from] TypeError),

    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl FormatError {
    pub(crate) fn mismatch(reason: impl Into<String>) -> Self {
        Self::Mismatch(reason.into())
    }

    pub fn is_mismatch(&self) -> bool {
        matches!(self, Self::Mismatch(_))
    }
}

pub type FormatResult<T> = Result<T, FormatError>;
