//! Co-location statistics of sub-satellite tracks with a fixed target.

use chrono::Timelike;
use lizard_common::time::from_unix_seconds;
use lizard_common::{Dataset, Variable};
use projection::haversine_km;

use crate::error::SatResult;

/// Distance (km) of every track point on `(time, sat)` to a target.
pub fn distance_to(tracks: &Dataset, lon: f64, lat: f64) -> SatResult<Variable> {
    let lon_var = tracks.var("lon")?;
    let lat_var = tracks.var("lat")?;
    let mut dist = lon_var.clone();
    dist.attrs.clear();
    for (d, (lo, la)) in dist
        .data
        .iter_mut()
        .zip(lon_var.data.iter().zip(lat_var.data.iter()))
    {
        *d = haversine_km(*lo, *la, lon, lat);
    }
    Ok(dist.with_attr("units", "km"))
}

/// Minimum distance to the target per UTC hour of day and satellite.
///
/// Returns `dist` on `(hour, sat)` with hours 0 to 23. Hours without any
/// valid track point are NaN.
pub fn hourly_min_distance(tracks: &Dataset, lon: f64, lat: f64) -> SatResult<Dataset> {
    let dist = distance_to(tracks, lon, lat)?.transpose(&["time", "sat"]);
    let hours: Vec<Option<usize>> = tracks
        .values("time")?
        .into_iter()
        .map(|t| from_unix_seconds(t).map(|t| t.hour() as usize))
        .collect();
    let n_sat = dist.len_of("sat").unwrap_or(1);
    let dist = dist.to_vec();

    let mut min = vec![f64::NAN; 24 * n_sat];
    for (i, hour) in hours.iter().enumerate() {
        let Some(h) = hour else { continue };
        for s in 0..n_sat {
            let d = dist[i * n_sat + s];
            let m = &mut min[h * n_sat + s];
            if !d.is_nan() && (m.is_nan() || d < *m) {
                *m = d;
            }
        }
    }

    let mut out = Dataset::new();
    out.insert_coord("hour", Variable::from_vec("hour", (0..24).map(f64::from).collect()))?;
    if let Some(sat) = tracks.get("sat") {
        out.insert_coord("sat", sat.clone())?;
    }
    out.insert_var(
        "dist",
        Variable::from_shape_vec(&["hour", "sat"], &[24, n_sat], min)?.with_attr("units", "km"),
    )?;
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use lizard_common::time::to_unix_seconds;
    use test_utils::assert_approx_eq;

    fn tracks() -> Dataset {
        let t = |h, m| to_unix_seconds(Utc.with_ymd_and_hms(2019, 4, 11, h, m, 0).unwrap());
        let mut ds = Dataset::new();
        ds.insert_coord("time", Variable::from_vec("time", vec![t(12, 0), t(12, 30), t(13, 0)]))
            .unwrap();
        ds.insert_coord("sat", Variable::from_vec("sat", vec![0.0, 1.0])).unwrap();
        let dims = ["time", "sat"];
        ds.insert_var(
            "lon",
            Variable::from_shape_vec(&dims, &[3, 2], vec![0.0, 0.0, 0.0, 10.0, 0.0, f64::NAN])
                .unwrap(),
        )
        .unwrap();
        ds.insert_var(
            "lat",
            Variable::from_shape_vec(&dims, &[3, 2], vec![81.0, 70.0, 80.0, 80.0, 79.0, f64::NAN])
                .unwrap(),
        )
        .unwrap();
        ds
    }

    #[test]
    fn test_hourly_minimum() {
        let out = hourly_min_distance(&tracks(), 0.0, 80.0).unwrap();
        let dist = out.values("dist").unwrap();
        assert_eq!(dist.len(), 48);

        // one degree of latitude on a 6367 km sphere
        let one_degree = 6367.0 * 1f64.to_radians();
        assert_approx_eq!(dist[12 * 2], 0.0, 1e-9);
        assert_approx_eq!(dist[13 * 2], one_degree, 1e-6);
        assert!(dist[13 * 2 + 1].is_nan());
        assert!(dist[0].is_nan());

        let d10 = haversine_km(10.0, 80.0, 0.0, 80.0);
        assert_approx_eq!(dist[12 * 2 + 1], d10, 1e-9);
    }
}
