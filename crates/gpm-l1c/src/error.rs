//! Error types for GPM L1C reading.

use thiserror::Error;

pub type GpmResult<T> = Result<T, GpmError>;

#[derive(Debug, Error)]
pub enum GpmError {
    #[error("Unknown instrument: {0}")]
    UnknownInstrument(String),

    #[error("No GPM L1C product for {instrument} on {satellite}")]
    UnknownSatellite {
        instrument: String,
        satellite: String,
    },

    #[error("{instrument} has no swath {swath}")]
    UnknownSwath { instrument: String, swath: String },

    #[error("No granule file matches {0}")]
    GranuleNotFound(String),

    #[error("Not a GPM L1C file name: {0}")]
    InvalidFilename(String),

    #[error("Unexpected shape of {name}: {shape:?}")]
    InvalidShape { name: String, shape: Vec<usize> },

    #[error("Malformed FileHeader attribute: {0}")]
    InvalidHeader(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    NetCdf(#[from] netcdf_io::NetCdfError),

    #[error(transparent)]
    Dataset(#[from] lizard_common::LizardError),
}
