//! Ny-Ålesund radiosondes.
//!
//! ```text
//! $PATH_SEC/data/radiosondes/ny_alesund/radiosonde_ny_alesund_<YYYYmmddHHMM>.nc
//! ```

use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use flight_meta::Flight;
use lizard_common::{DataPaths, Dataset};
use regex::Regex;
use tracing::info;
use walkdir::WalkDir;

use crate::archive;
use crate::error::{ReaderError, ReaderResult};

const SONDE_DIR: &str = "data/radiosondes/ny_alesund";

static LAUNCH_STAMP: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d{12})\.nc$").expect("launch stamp pattern is a valid literal"));

pub fn sonde_dir(paths: &DataPaths) -> PathBuf {
    paths.path_sec.join(SONDE_DIR)
}

/// Launch time encoded in a sounding file name.
pub fn launch_time(path: &Path) -> Option<DateTime<Utc>> {
    let name = path.file_name()?.to_str()?;
    let caps = LAUNCH_STAMP.captures(name)?;
    NaiveDateTime::parse_from_str(&caps[1], "%Y%m%d%H%M")
        .ok()
        .map(|t| Utc.from_utc_datetime(&t))
}

/// Sounding file launched closest to `time`.
pub fn closest_sounding(dir: &Path, time: DateTime<Utc>) -> ReaderResult<PathBuf> {
    WalkDir::new(dir)
        .max_depth(1)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter_map(|e| launch_time(e.path()).map(|t| (t, e.into_path())))
        .min_by_key(|(t, _)| (*t - time).num_seconds().abs())
        .map(|(_, path)| path)
        .ok_or_else(|| ReaderError::NoFiles {
            dir: dir.to_path_buf(),
            pattern: "radiosonde_ny_alesund_*.nc".to_string(),
        })
}

/// Sounding launched closest to `time`.
pub fn read_radiosonde(paths: &DataPaths, time: DateTime<Utc>) -> ReaderResult<Dataset> {
    let path = closest_sounding(&sonde_dir(paths), time)?;
    info!(time = %time, file = %path.display(), "Selected radiosonde");
    archive::open(&path)
}

/// Sounding launched closest to the takeoff of a flight.
pub fn read_radiosonde_for_flight(paths: &DataPaths, flight: &Flight) -> ReaderResult<Dataset> {
    read_radiosonde(paths, flight.takeoff)
}

/// All soundings merged into one file.
pub fn read_merged_radiosonde(paths: &DataPaths) -> ReaderResult<Dataset> {
    archive::open(&sonde_dir(paths).join("merge/radiosonde_ny_alesund_merge.nc"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_closest_sounding() {
        let dir = tempfile::tempdir().unwrap();
        for stamp in ["201906010500", "201906011100", "201906011700"] {
            std::fs::write(
                dir.path().join(format!("radiosonde_ny_alesund_{}.nc", stamp)),
                b"",
            )
            .unwrap();
        }
        std::fs::write(dir.path().join("README"), b"").unwrap();

        let t = Utc.with_ymd_and_hms(2019, 6, 1, 13, 0, 0).unwrap();
        let path = closest_sounding(dir.path(), t).unwrap();
        assert_eq!(
            launch_time(&path),
            Some(Utc.with_ymd_and_hms(2019, 6, 1, 11, 0, 0).unwrap())
        );

        let empty = tempfile::tempdir().unwrap();
        assert!(matches!(
            closest_sounding(empty.path(), t),
            Err(ReaderError::NoFiles { .. })
        ));
    }
}
