use thiserror::Error;

/// Errors produced by parameter and collection operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("unsupported parameter type: {0}")]
    UnsupportedType(String),

    #[error("unknown MAVLink parameter type code: {0}")]
    UnknownTypeCode(i64),

    #[error("invalid parameter value: {0:?}")]
    InvalidValue(String),

    #[error("{name} (component {cid}) is not an existing key")]
    MissingKey { name: String, cid: u8 },

    #[error("{name} (component {cid}) is already defined")]
    DuplicateKey { name: String, cid: u8 },
}

/// Convenience alias for type-level results.
pub type TypeResult<T> = Result<T, TypeError>;
