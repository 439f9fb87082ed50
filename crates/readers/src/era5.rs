//! ERA-5 reanalysis north of 60°N.
//!
//! ```text
//! $PATH_SEC/data/era5/<YYYY>/<MM>/era5-single-levels_60n_<YYYYmmdd>.nc
//! $PATH_SEC/data/era5/<YYYY>/<MM>/era5-pressure-levels_60n_<YYYYmmdd>.nc
//! ```

use std::path::PathBuf;

use chrono::NaiveDate;
use lizard_common::{DataPaths, Dataset, RegionOfInterest};
use tracing::debug;

use crate::archive;
use crate::error::ReaderResult;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Era5Levels {
    Single,
    Pressure,
}

impl Era5Levels {
    fn tag(&self) -> &'static str {
        match self {
            Era5Levels::Single => "single",
            Era5Levels::Pressure => "pressure",
        }
    }
}

pub fn era5_path(paths: &DataPaths, day: NaiveDate, levels: Era5Levels) -> PathBuf {
    paths
        .path_sec
        .join("data/era5")
        .join(day.format("%Y/%m").to_string())
        .join(format!(
            "era5-{}-levels_60n_{}.nc",
            levels.tag(),
            day.format("%Y%m%d")
        ))
}

/// Cut to a region, edges included.
pub fn subset_roi(ds: &Dataset, roi: &RegionOfInterest) -> ReaderResult<Dataset> {
    let lon = ds.range_indices("longitude", roi.lon0, roi.lon1)?;
    let ds = ds.isel("longitude", &lon);
    let lat = ds.range_indices("latitude", roi.lat0, roi.lat1)?;
    Ok(ds.isel("latitude", &lat))
}

/// ERA-5 fields of one day, optionally cut to a region.
pub fn read_era5(
    paths: &DataPaths,
    day: NaiveDate,
    levels: Era5Levels,
    roi: Option<&RegionOfInterest>,
) -> ReaderResult<Dataset> {
    let ds = archive::open(&era5_path(paths, day, levels))?;
    let ds = match roi {
        Some(roi) => subset_roi(&ds, roi)?,
        None => ds,
    };
    debug!(day = %day, levels = levels.tag(), dims = ?ds.dims(), "Read ERA-5");
    Ok(ds)
}

pub fn read_era5_single_levels(
    paths: &DataPaths,
    day: NaiveDate,
    roi: Option<&RegionOfInterest>,
) -> ReaderResult<Dataset> {
    read_era5(paths, day, Era5Levels::Single, roi)
}

pub fn read_era5_pressure_levels(
    paths: &DataPaths,
    day: NaiveDate,
    roi: Option<&RegionOfInterest>,
) -> ReaderResult<Dataset> {
    read_era5(paths, day, Era5Levels::Pressure, roi)
}
