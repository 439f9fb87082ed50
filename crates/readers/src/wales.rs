//! WALES water vapour and aerosol lidar on HALO.
//!
//! ```text
//! $PATH_DAT/obs/campaigns/<mission>/<platform>/wales/<YYYYmmdd>/
//!     <MISSION>_<PLATFORM>_WALES_<product>_<YYYYmmdd>_<NAME>_V2.0.nc
//! ```

use std::path::PathBuf;

use flight_meta::Flight;
use lizard_common::{DataPaths, Dataset};
use tracing::debug;

use crate::archive::{self, date_str, flight_key};
use crate::error::ReaderResult;

/// Water vapour product.
pub const WATER_VAPOR: &str = "wv";

const VERSION: &str = "V2.0";

pub fn wales_path(paths: &DataPaths, flight: &Flight, product: &str) -> ReaderResult<PathBuf> {
    let key = flight_key(flight)?;
    let date = date_str(flight);
    Ok(paths
        .path_dat
        .join("obs/campaigns")
        .join(key.mission.to_lowercase())
        .join(key.platform.to_lowercase())
        .join("wales")
        .join(&date)
        .join(format!(
            "{}_{}_WALES_{}_{}_{}_{}.nc",
            key.mission, key.platform, product, date, key.name, VERSION
        )))
}

/// WALES product of a flight, e.g. [`WATER_VAPOR`].
pub fn read_wales(paths: &DataPaths, flight: &Flight, product: &str) -> ReaderResult<Dataset> {
    let ds = archive::open(&wales_path(paths, flight, product)?)?;
    debug!(flight_id = %flight.flight_id, product, "Read WALES");
    Ok(ds)
}
