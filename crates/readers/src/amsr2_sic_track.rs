//! AMSR2 sea ice concentration extracted along flight tracks.
//!
//! One `AMSR2_SIC` catalog entry per flight, on `time`.

use flight_meta::{Flight, FlightCatalog};
use lizard_common::Dataset;
use tracing::info;

use crate::archive::flight_key;
use crate::error::ReaderResult;
use crate::local_catalog::LocalCatalog;

pub const AMSR2_SIC: &str = "AMSR2_SIC";

pub fn read_amsr2_sic_track(catalog: &LocalCatalog, flight: &Flight) -> ReaderResult<Dataset> {
    let key = flight_key(flight)?;
    catalog.read(&key.mission, &key.platform, AMSR2_SIC, &flight.flight_id)
}

/// Longitudes above 180° shifted to [-180, 180].
pub fn wrap_longitude(ds: &mut Dataset) -> ReaderResult<()> {
    let lon = ds.var("lon")?.map(|x| if x > 180.0 { x - 360.0 } else { x });
    if ds.is_coord("lon") {
        ds.insert_coord("lon", lon)?;
    } else {
        ds.insert_var("lon", lon)?;
    }
    Ok(())
}

/// Sea ice along all HALO-AC3 HALO research flights, concatenated along
/// time with longitudes in [-180, 180].
pub fn read_amsr2_sic_track_all(catalog: &LocalCatalog, flights: &FlightCatalog) -> ReaderResult<Dataset> {
    let mut parts = Vec::new();
    for flight_id in flights.get_all_flights(&["HALO-AC3"], &["HALO"]) {
        parts.push(read_amsr2_sic_track(catalog, flights.meta(&flight_id)?)?);
    }
    let mut ds = Dataset::concat(&parts, "time")?;
    wrap_longitude(&mut ds)?;
    info!(flights = parts.len(), samples = ds.dim_len("time").unwrap_or(0), "Read AMSR2 sea ice along track");
    Ok(ds)
}
