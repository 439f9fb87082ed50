//! Error types for projection operations.

use thiserror::Error;

pub type ProjectionResult<T> = Result<T, ProjectionError>;

#[derive(Debug, Error)]
pub enum ProjectionError {
    #[error("Projection not supported: {0}")]
    Unsupported(String),

    #[error("Degenerate track: start and end point coincide")]
    DegenerateTrack,

    #[error("Specify either a UTM zone or an EPSG code, not both")]
    AmbiguousCrs,

    #[error("Coordinate arrays differ in length: {0} vs {1}")]
    LengthMismatch(usize, usize),

    #[error(transparent)]
    Crs(#[from] lizard_common::crs::CrsParseError),
}
