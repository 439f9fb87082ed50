//! Error types for product readers.

use std::path::PathBuf;

use thiserror::Error;

pub type ReaderResult<T> = Result<T, ReaderError>;

#[derive(Debug, Error)]
pub enum ReaderError {
    #[error("File not found: {0}")]
    FileNotFound(PathBuf),

    #[error("No files matching {pattern} in {dir}")]
    NoFiles { dir: PathBuf, pattern: String },

    #[error("No band pass filter file for instrument {0}")]
    UnknownInstrument(String),

    #[error("{instrument} requires one of the satellites {expected}, got '{satellite}'")]
    UnknownSatellite {
        instrument: String,
        satellite: String,
        expected: String,
    },

    #[error("{path}:{line}: {message}")]
    Parse {
        path: String,
        line: usize,
        message: String,
    },

    #[error("Invalid launch time '{0}', expected HH:MM:SS")]
    InvalidLaunchTime(String),

    #[error("Local catalog root is not configured (PATH_CACHE_INTAKE)")]
    CatalogNotConfigured,

    #[error("No clear-sky column in PAMTRA simulation {0}")]
    NoClearSky(String),

    #[error("{0} has no time coordinate")]
    MissingTime(String),

    #[error("Shape error: {0}")]
    Shape(#[from] ndarray::ShapeError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Flight(#[from] flight_meta::FlightError),

    #[error(transparent)]
    NetCdf(#[from] netcdf_io::NetCdfError),

    #[error(transparent)]
    Dataset(#[from] lizard_common::LizardError),
}
