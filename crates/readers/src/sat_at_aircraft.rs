//! Satellite observations along flight tracks.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use flight_meta::Flight;
use lizard_common::{DataPaths, Dataset};

use crate::archive;
use crate::error::ReaderResult;
use crate::footprint::emissivity_dir;

fn track_dir(paths: &DataPaths) -> PathBuf {
    emissivity_dir(paths).join("sat_flight_track")
}

pub fn sat_at_aircraft_path(paths: &DataPaths, flight: &Flight) -> PathBuf {
    track_dir(paths).join(format!("{}_gpm_l1c.nc", flight.flight_id))
}

pub fn sat_at_aircraft_unique_path(paths: &DataPaths, flight: &Flight) -> PathBuf {
    track_dir(paths).join(format!("{}_gpm_l1c_unique_ancil.nc", flight.flight_id))
}

/// Satellite TB extracted along the flight track.
pub fn read_sat_at_aircraft(paths: &DataPaths, flight: &Flight) -> ReaderResult<Dataset> {
    archive::open(&sat_at_aircraft_path(paths, flight))
}

/// Satellite footprints aligned with the flight track, each once.
pub fn read_sat_at_aircraft_unique(paths: &DataPaths, flight: &Flight) -> ReaderResult<Dataset> {
    archive::open(&sat_at_aircraft_unique_path(paths, flight))
}

/// Sub-satellite tracks, optionally limited to `[t0, t1]`.
pub fn read_sat_tracks(
    paths: &DataPaths,
    window: Option<(DateTime<Utc>, DateTime<Utc>)>,
) -> ReaderResult<Dataset> {
    let ds = archive::open(&paths.path_sat.join("tracks/sat_tracks.nc"))?;
    match window {
        Some((t0, t1)) => archive::clip_time(&ds, t0, t1),
        None => Ok(ds),
    }
}
