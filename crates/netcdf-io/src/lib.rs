//! NetCDF-4 / HDF5 access for lizard datasets.
//!
//! Reads variables (including ones nested in HDF5 groups such as the
//! `S1/ScanTime/Year` layout of GPM granules) into [`lizard_common::Variable`]s,
//! whole files into [`lizard_common::Dataset`]s, and writes datasets back to
//! NetCDF.
//!
//! Reading applies the usual CF decoding: `_FillValue` and `missing_value`
//! become NaN, `scale_factor`/`add_offset` are applied, and time axes with
//! `"<unit> since <date>"` units are converted to unix seconds.

pub mod error;
pub mod native;
pub mod reader;
pub mod writer;

pub use error::{NetCdfError, NetCdfResult};
pub use native::silence_hdf5_errors;
pub use reader::{open_dataset, NcReader};
pub use writer::write_dataset;
