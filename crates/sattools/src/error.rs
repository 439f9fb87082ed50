//! Error types for satellite tooling.

use thiserror::Error;

pub type SatResult<T> = Result<T, SatError>;

#[derive(Debug, Error)]
pub enum SatError {
    #[error("No {kind} table entry for {instrument} channel {channel}")]
    UnknownChannel {
        kind: &'static str,
        instrument: String,
        channel: u32,
    },

    #[error("Invalid TLE epoch: {0}")]
    InvalidEpoch(String),

    #[error("Propagation failed for {satellite}: {message}")]
    Propagation { satellite: String, message: String },

    #[error("TLE JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Dataset(#[from] lizard_common::LizardError),

    #[error(transparent)]
    NetCdf(#[from] netcdf_io::NetCdfError),
}
