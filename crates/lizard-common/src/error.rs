//! Error types shared by the lizard crates.

use thiserror::Error;

/// Result type alias using LizardError.
pub type LizardResult<T> = Result<T, LizardError>;

/// Primary error type for dataset and configuration handling.
#[derive(Debug, Error)]
pub enum LizardError {
    // === Dataset Errors ===
    #[error("Variable not found: {0}")]
    VariableNotFound(String),

    #[error("Dimension not found: {0}")]
    DimensionNotFound(String),

    #[error("Dimension '{dim}' has size {existing}, got {found}")]
    DimensionMismatch {
        dim: String,
        existing: usize,
        found: usize,
    },

    #[error("Shape error: {0}")]
    Shape(#[from] ndarray::ShapeError),

    #[error("Coordinate value {value} not found along '{dim}'")]
    CoordinateValueNotFound { dim: String, value: f64 },

    // === Parsing Errors ===
    #[error("Invalid region of interest: {0}")]
    InvalidRoi(String),

    #[error("Invalid CRS: {0}")]
    InvalidCrs(String),

    #[error("Invalid time specification: {0}")]
    InvalidTime(String),

    // === Configuration Errors ===
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Environment variable {0} not set")]
    MissingEnv(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}
