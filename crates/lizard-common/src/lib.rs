//! Common types and utilities shared across the lizard crates.

pub mod config;
pub mod crs;
pub mod dataset;
pub mod error;
pub mod roi;
pub mod time;

pub use config::DataPaths;
pub use crs::CrsCode;
pub use dataset::{AttrValue, Attrs, Dataset, TableRow, Variable};
pub use error::{LizardError, LizardResult};
pub use roi::RegionOfInterest;
pub use time::{TimeParseError, TimeWindow};
