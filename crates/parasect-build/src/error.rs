use std::path::PathBuf;

use parasect_formats::FormatError;
use parasect_types::TypeError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BuildError {
    #[error("configuration path not specified; pass an input folder or set PARASECT_PATH")]
    ConfigPathNotSet,

    #[error("configuration path {0} is not a directory")]
    ConfigPathNotADirectory(PathBuf),

    #[error("meals menu does not contain: {0}")]
    MissingMeal(String),

    #[error("meal {meal} refers to missing parent {parent}")]
    MissingParent { meal: String, parent: String },

    #[error("parent cycle detected: {}", .0.join(" -> "))]
    ParentCycle(Vec<String>),

    #[error("meal {meal} contains invalid field/dish {key}")]
    InvalidDish { meal: String, key: String },

    #[error("option {option} of meal {meal} must be {expected}")]
    InvalidOption {
        meal: String,
        option: String,
        expected: &'static str,
    },

    #[error("variant {variant} not found in dish {dish}")]
    MissingVariant { dish: String, variant: String },

    #[error("submodel {model}/{submodel} not found in dish {dish}")]
    MissingSubmodel {
        dish: String,
        model: String,
        submodel: String,
    },

    #[error("no subvariants specified for {model} in dish {dish}")]
    NoSubvariants { dish: String, model: String },

    #[error("meal {meal} does not accept new parameters, {param} is not in its base set")]
    NewParameterRejected { meal: String, param: String },

    #[error("boilerplate {document} has no {format} variant {variant}")]
    MissingBoilerplateVariant {
        document: String,
        format: String,
        variant: String,
    },

    #[error("an output folder is required when building all meals")]
    OutputFolderRequired,

    #[error("invalid calibration/operator name pattern: {0}")]
    Regex(#[from] regex::Error),

    #[error("format error: {0}")]
    Format(#[from] FormatError),

    #[error("parameter error: {0}")]
    Type(#[from] TypeError),

    #[error("YAML error in {path}: {source}")]
    Yaml {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type BuildResult<T> = Result<T, BuildError>;
