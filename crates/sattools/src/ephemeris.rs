//! Sub-satellite tracks from two-line element sets.
//!
//! TLE records come as JSON exports (`tle_multisat_*.json`) holding all
//! satellites of a period. Each requested time is propagated with the most
//! recent TLE whose epoch lies strictly before it; positions propagated
//! from TLEs older than [`MAX_TLE_AGE_DAYS`] are masked. The orbit model
//! itself is supplied through the [`Propagator`] trait.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Duration, NaiveDate, Utc};
use lizard_common::time::{parse_iso8601, start_of_day, to_unix_seconds, UNIX_TIME_UNITS};
use lizard_common::{AttrValue, DataPaths, Dataset, Variable};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use walkdir::WalkDir;

use crate::error::{SatError, SatResult};

/// Satellites with microwave imagers or sounders and their NORAD catalog
/// numbers.
pub const SATELLITES: [(&str, u32); 14] = [
    ("Aqua", 27424),
    ("Metop-A", 29499),
    ("Metop-B", 38771),
    ("Metop-C", 43689),
    ("NOAA-15", 25338),
    ("NOAA-18", 28654),
    ("NOAA-19", 33591),
    ("NOAA-20", 43013),
    ("SNPP", 37849),
    ("GCOM-W", 38337),
    ("DMSP-F15", 25991),
    ("DMSP-F16", 28054),
    ("DMSP-F17", 29522),
    ("DMSP-F18", 35951),
];

/// Positions from older TLEs are considered unreliable.
pub const MAX_TLE_AGE_DAYS: f64 = 5.0;

/// Campaign periods covered by the track file, start and end day.
pub const MISSION_PERIODS: [((i32, u32, u32), (i32, u32, u32)); 5] = [
    ((2017, 5, 1), (2017, 6, 30)),
    ((2019, 3, 1), (2019, 4, 30)),
    ((2020, 8, 1), (2020, 9, 30)),
    ((2022, 3, 1), (2022, 4, 30)),
    ((2022, 7, 1), (2022, 8, 31)),
];

/// One record of a space-track.org TLE export.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub struct TleRecord {
    pub norad_cat_id: String,
    pub epoch: String,
    pub tle_line1: String,
    pub tle_line2: String,
}

impl TleRecord {
    pub fn epoch_time(&self) -> SatResult<DateTime<Utc>> {
        parse_iso8601(&self.epoch).map_err(|_| SatError::InvalidEpoch(self.epoch.clone()))
    }
}

/// Orbit model turning a TLE into a sub-satellite point.
pub trait Propagator: Sync {
    /// Sub-satellite (lon, lat) in degrees at `time`.
    fn subpoint(&self, tle: &TleRecord, time: DateTime<Utc>) -> SatResult<(f64, f64)>;
}

pub fn tle_dir(paths: &DataPaths) -> PathBuf {
    paths.path_sat.join("ephemeris")
}

pub fn tracks_path(paths: &DataPaths) -> PathBuf {
    paths.path_sat.join("tracks/sat_tracks.nc")
}

/// Read all `tle_multisat_*.json` files in a directory.
pub fn read_tle_files(dir: &Path) -> SatResult<Vec<TleRecord>> {
    let mut files: Vec<PathBuf> = WalkDir::new(dir)
        .max_depth(1)
        .into_iter()
        .filter_map(|e| e.ok())
        .map(|e| e.into_path())
        .filter(|p| {
            p.file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|n| n.starts_with("tle_multisat_") && n.ends_with(".json"))
        })
        .collect();
    files.sort();

    let mut records = Vec::new();
    for file in &files {
        let content = std::fs::read_to_string(file)?;
        let mut batch: Vec<TleRecord> = serde_json::from_str(&content)?;
        debug!(file = %file.display(), records = batch.len(), "Read TLE file");
        records.append(&mut batch);
    }
    Ok(records)
}

/// TLEs of one satellite sorted by epoch.
pub fn records_of(
    records: &[TleRecord],
    norad_id: u32,
) -> SatResult<Vec<(DateTime<Utc>, &TleRecord)>> {
    let id = norad_id.to_string();
    let mut out = records
        .iter()
        .filter(|r| r.norad_cat_id.trim() == id)
        .map(|r| Ok((r.epoch_time()?, r)))
        .collect::<SatResult<Vec<_>>>()?;
    out.sort_by_key(|(epoch, _)| *epoch);
    Ok(out)
}

/// Index of the latest epoch strictly before each time, `None` for times
/// before the first epoch. `epochs` must be sorted.
pub fn assign_tle(epochs: &[DateTime<Utc>], times: &[DateTime<Utc>]) -> Vec<Option<usize>> {
    times
        .iter()
        .map(|t| epochs.partition_point(|e| e < t).checked_sub(1))
        .collect()
}

/// Regular times from `start` to `end` inclusive.
pub fn time_range(start: DateTime<Utc>, end: DateTime<Utc>, step: Duration) -> Vec<DateTime<Utc>> {
    let mut times = Vec::new();
    let mut t = start;
    while t <= end {
        times.push(t);
        t += step;
    }
    times
}

/// 10 second steps through all [`MISSION_PERIODS`].
pub fn mission_times() -> Vec<DateTime<Utc>> {
    let day = |(y, m, d): (i32, u32, u32)| NaiveDate::from_ymd_opt(y, m, d).map(start_of_day);
    MISSION_PERIODS
        .iter()
        .filter_map(|(a, b)| Some((day(*a)?, day(*b)?)))
        .flat_map(|(start, end)| time_range(start, end, Duration::seconds(10)))
        .collect()
}

struct Column {
    lon: Vec<f64>,
    lat: Vec<f64>,
    dt: Vec<f64>,
}

fn propagate_satellite(
    name: &str,
    norad_id: u32,
    records: &[TleRecord],
    times: &[DateTime<Utc>],
    propagator: &impl Propagator,
) -> SatResult<Column> {
    let tles = records_of(records, norad_id)?;
    let epochs: Vec<DateTime<Utc>> = tles.iter().map(|(e, _)| *e).collect();

    let n = times.len();
    let mut column = Column {
        lon: vec![f64::NAN; n],
        lat: vec![f64::NAN; n],
        dt: vec![f64::NAN; n],
    };
    for (i, assigned) in assign_tle(&epochs, times).into_iter().enumerate() {
        let Some(k) = assigned else { continue };
        let (epoch, tle) = tles[k];
        let dt = (times[i] - epoch).num_milliseconds() as f64 / 86_400_000.0;
        if dt >= MAX_TLE_AGE_DAYS {
            continue;
        }
        let (lon, lat) = propagator.subpoint(tle, times[i])?;
        column.lon[i] = lon;
        column.lat[i] = lat;
        column.dt[i] = dt;
    }
    debug!(satellite = name, tles = tles.len(), "Propagated satellite");
    Ok(column)
}

/// Sub-satellite positions of all [`SATELLITES`] at `times`.
///
/// Output: `lon`, `lat` and `dt` (days since the TLE epoch) on
/// `(time, sat)`, with `sat` numbering the satellites in table order.
pub fn build_tracks(
    times: &[DateTime<Utc>],
    records: &[TleRecord],
    propagator: &impl Propagator,
) -> SatResult<Dataset> {
    let columns = SATELLITES
        .par_iter()
        .map(|(name, id)| propagate_satellite(name, *id, records, times, propagator))
        .collect::<SatResult<Vec<Column>>>()?;

    let n_time = times.len();
    let n_sat = SATELLITES.len();
    let interleave = |get: fn(&Column) -> &Vec<f64>| -> Vec<f64> {
        let mut out = Vec::with_capacity(n_time * n_sat);
        for i in 0..n_time {
            out.extend(columns.iter().map(|c| get(c)[i]));
        }
        out
    };
    let dims = ["time", "sat"];
    let shape = [n_time, n_sat];
    let names: Vec<&str> = SATELLITES.iter().map(|(name, _)| *name).collect();

    let mut ds = Dataset::new();
    ds.insert_coord(
        "time",
        Variable::from_vec("time", times.iter().map(|t| to_unix_seconds(*t)).collect())
            .with_attr("units", UNIX_TIME_UNITS),
    )?;
    ds.insert_coord(
        "sat",
        Variable::from_vec("sat", (0..n_sat).map(|s| s as f64).collect())
            .with_attr("description", "Satellite name")
            .with_attr("names", names.join(", ")),
    )?;
    ds.insert_var(
        "sat_id",
        Variable::from_vec("sat", SATELLITES.iter().map(|(_, id)| f64::from(*id)).collect())
            .with_attr("description", "Satellite catalog number"),
    )?;
    ds.insert_var(
        "lat",
        Variable::from_shape_vec(&dims, &shape, interleave(|c| &c.lat))?
            .with_attr("long_name", "latitude")
            .with_attr("description", "Sub-satellite latitude"),
    )?;
    ds.insert_var(
        "lon",
        Variable::from_shape_vec(&dims, &shape, interleave(|c| &c.lon))?
            .with_attr("long_name", "longitude")
            .with_attr("description", "Sub-satellite longitude"),
    )?;
    ds.insert_var(
        "dt",
        Variable::from_shape_vec(&dims, &shape, interleave(|c| &c.dt))?
            .with_attr("long_name", "time_difference")
            .with_attr("description", "Time difference to TLE")
            .with_attr("units", "days"),
    )?;

    ds.attrs.insert("title".into(), AttrValue::from("Sub-satellite position"));
    ds.attrs.insert(
        "description".into(),
        AttrValue::from("Sub-satellite positions of several satellites based on TLE files"),
    );
    ds.attrs.insert("satellites".into(), AttrValue::from(names.join(", ")));
    ds.attrs.insert(
        "history".into(),
        AttrValue::from(format!("Created with lizard sattools on {}", Utc::now().to_rfc3339())),
    );

    info!(times = n_time, satellites = n_sat, "Built satellite tracks");
    Ok(ds)
}

/// Write tracks to `$PATH_SAT/tracks/sat_tracks.nc`.
pub fn write_tracks(ds: &Dataset, paths: &DataPaths) -> SatResult<PathBuf> {
    let path = tracks_path(paths);
    netcdf_io::write_dataset(ds, &path)?;
    Ok(path)
}
