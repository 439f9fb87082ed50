//! Aircraft position and attitude.
//!
//! All aircraft follow the Polar 5 conventions:
//! - heading: north 0°, east 90°, south ±180°, west -90°
//! - roll: positive in right turns (left wing up)
//! - pitch: positive when the nose is up

use flight_meta::Flight;
use lizard_common::Dataset;
use tracing::debug;

use crate::archive::flight_key;
use crate::error::ReaderResult;
use crate::local_catalog::LocalCatalog;

pub const GPS_INS: &str = "GPS_INS";

/// Convert a HALO yaw angle (deg) to a Polar 5 heading.
pub fn halo_yaw_to_heading(yaw: f64) -> f64 {
    let heading = 90.0 - yaw;
    if heading > 180.0 {
        heading - 360.0
    } else {
        heading
    }
}

/// GPS/INS data of a flight from the local catalog.
pub fn read_gps_ins(catalog: &LocalCatalog, flight: &Flight) -> ReaderResult<Dataset> {
    let key = flight_key(flight)?;
    let mut ds = catalog.read(&key.mission, &key.platform, GPS_INS, &flight.flight_id)?;

    if key.mission == "HALO-AC3" && key.platform == "HALO" {
        ds.rename("yaw", "heading")?;
        if let Some(heading) = ds.get_mut("heading") {
            heading.data.mapv_inplace(halo_yaw_to_heading);
        }
        debug!(flight_id = %flight.flight_id, "Converted HALO yaw to heading");
    }
    Ok(ds)
}

/// Drop repeated time stamps (keeping the first) and times where both
/// longitude and latitude are missing.
pub fn clean_positions(ds: &Dataset) -> ReaderResult<Dataset> {
    let time = ds.values("time")?;
    let lon = ds.values("lon")?;
    let lat = ds.values("lat")?;

    let mut seen = std::collections::HashSet::new();
    let keep: Vec<usize> = (0..time.len())
        .filter(|&i| seen.insert(time[i].to_bits()))
        .filter(|&i| !(lon[i].is_nan() && lat[i].is_nan()))
        .collect();
    Ok(ds.isel("time", &keep))
}

#[cfg(test)]
mod tests {
    use super::*;
    use lizard_common::Variable;

    #[test]
    fn test_halo_heading() {
        // HALO yaw counts counterclockwise from east
        assert_eq!(halo_yaw_to_heading(90.0), 0.0);
        assert_eq!(halo_yaw_to_heading(0.0), 90.0);
        assert_eq!(halo_yaw_to_heading(180.0), -90.0);
        assert_eq!(halo_yaw_to_heading(-90.0), 180.0);
        assert_eq!(halo_yaw_to_heading(-135.0), -135.0);
    }

    #[test]
    fn test_clean_positions() {
        let mut ds = Dataset::new();
        ds.insert_coord("time", Variable::from_vec("time", vec![0.0, 1.0, 1.0, 2.0, 3.0]))
            .unwrap();
        ds.insert_var("lon", Variable::from_vec("time", vec![10.0, 11.0, 11.5, f64::NAN, f64::NAN]))
            .unwrap();
        ds.insert_var("lat", Variable::from_vec("time", vec![80.0, 80.1, 80.2, 80.3, f64::NAN]))
            .unwrap();
        let clean = clean_positions(&ds).unwrap();
        assert_eq!(clean.values("time").unwrap(), vec![0.0, 1.0, 2.0]);
        assert_eq!(clean.values("lat").unwrap(), vec![80.0, 80.1, 80.3]);
    }
}
