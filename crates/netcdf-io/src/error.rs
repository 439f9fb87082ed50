//! Error types for NetCDF operations.

use thiserror::Error;

/// Result type for NetCDF operations.
pub type NetCdfResult<T> = Result<T, NetCdfError>;

/// Error types for NetCDF reading and writing.
#[derive(Error, Debug)]
pub enum NetCdfError {
    /// File I/O error
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Error raised by libnetcdf
    #[error("NetCDF error: {0}")]
    Netcdf(#[from] netcdf::Error),

    /// Missing required group, variable or attribute
    #[error("Missing required data: {0}")]
    MissingData(String),

    /// Invalid data format
    #[error("Invalid data format: {0}")]
    InvalidFormat(String),

    #[error(transparent)]
    Dataset(#[from] lizard_common::LizardError),
}
