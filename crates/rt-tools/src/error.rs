//! Error types for radiative transfer helpers.

use thiserror::Error;

pub type RtResult<T> = Result<T, RtError>;

#[derive(Debug, Error)]
pub enum RtError {
    #[error("Polarization must be one of V, H, QV, QH, got '{0}'")]
    UnknownPolarization(String),

    #[error("Unknown surface model: {0}")]
    UnknownSurfaceModel(String),

    #[error("Unknown surface reflection type: {0}")]
    UnknownReflection(String),

    #[error("Missing profile variable: {0}")]
    MissingVariable(String),

    #[error("{dim} value {value} is outside of the simulated range")]
    OutOfRange { dim: String, value: f64 },

    #[error("Invalid PAMTRA output: {0}")]
    InvalidOutput(String),

    #[error("Shape error: {0}")]
    Shape(#[from] ndarray::ShapeError),

    #[error(transparent)]
    NetCdf(#[from] netcdf_io::NetCdfError),

    #[error(transparent)]
    Dataset(#[from] lizard_common::LizardError),
}
