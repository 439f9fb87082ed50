//! Error types for flight metadata lookups.

use thiserror::Error;

pub type FlightResult<T> = Result<T, FlightError>;

#[derive(Debug, Error)]
pub enum FlightError {
    #[error("Invalid flight id '{0}', expected MISSION_PLATFORM_NAME")]
    InvalidFlightId(String),

    #[error("Flight not found: {0}")]
    FlightNotFound(String),

    #[error("Segment not found: {0}")]
    SegmentNotFound(String),

    #[error("Failed to read flight segments from {path}: {message}")]
    Load { path: String, message: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error(transparent)]
    Dataset(#[from] lizard_common::LizardError),
}
