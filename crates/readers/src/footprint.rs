//! Products of the sea ice emissivity processing chain.
//!
//! ```text
//! $PATH_SEC/data/sea_ice_emissivity/footprint/footprint_<FLIGHT_ID>_<YYYYmmdd>.nc
//! $PATH_SEC/data/sea_ice_emissivity/brightness_temperature/tb_<FLIGHT_ID>_<YYYYmmdd>.nc
//! ```
//!
//! Footprints were computed from GPS/INS data and a digital terrain model.

use std::path::PathBuf;

use flight_meta::Flight;
use lizard_common::{DataPaths, Dataset};

use crate::archive::{self, date_str};
use crate::error::ReaderResult;

pub(crate) fn emissivity_dir(paths: &DataPaths) -> PathBuf {
    paths.path_sec.join("data/sea_ice_emissivity")
}

pub fn footprint_path(paths: &DataPaths, flight: &Flight) -> PathBuf {
    emissivity_dir(paths).join("footprint").join(format!(
        "footprint_{}_{}.nc",
        flight.flight_id,
        date_str(flight)
    ))
}

pub fn brightness_temperature_path(paths: &DataPaths, flight: &Flight) -> PathBuf {
    emissivity_dir(paths)
        .join("brightness_temperature")
        .join(format!("tb_{}_{}.nc", flight.flight_id, date_str(flight)))
}

pub fn read_footprint(paths: &DataPaths, flight: &Flight) -> ReaderResult<Dataset> {
    archive::open(&footprint_path(paths, flight))
}

/// Airborne brightness temperatures merged onto footprints.
pub fn read_brightness_temperature(paths: &DataPaths, flight: &Flight) -> ReaderResult<Dataset> {
    archive::open(&brightness_temperature_path(paths, flight))
}
