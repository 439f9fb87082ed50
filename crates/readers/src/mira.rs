//! HAMP MIRA cloud radar on HALO.

use std::collections::HashMap;

use flight_meta::Flight;
use lizard_common::{DataPaths, Dataset, Variable};
use tracing::debug;

use crate::archive::{self, flight_key, interp};
use crate::error::ReaderResult;
use crate::local_catalog::LocalCatalog;

pub const HAMP_RADAR: &str = "HAMP_RADAR";

/// Variables where -888 marks missing values.
pub const FILL_VARIABLES: [&str; 8] = ["dBZg", "Zg", "Ze", "dBZe", "LDRg", "RMSg", "VELg", "SNRg"];

const FILL_VALUE: f64 = -888.0;

/// Regular height grid in meters: -200 m to 14 km in 30 m steps.
pub fn height_levels() -> Vec<f64> {
    (0..=473).map(|i| -200.0 + 30.0 * i as f64).collect()
}

/// Radar data of a flight with fill values masked.
pub fn read_mira(catalog: &LocalCatalog, flight: &Flight) -> ReaderResult<Dataset> {
    let key = flight_key(flight)?;
    let mut ds = catalog.read(&key.mission, &key.platform, HAMP_RADAR, &flight.flight_id)?;
    mask_fill_values(&mut ds);
    Ok(ds)
}

pub fn mask_fill_values(ds: &mut Dataset) {
    for name in FILL_VARIABLES {
        if let Some(var) = ds.get_mut(name) {
            var.data
                .mapv_inplace(|v| if v == FILL_VALUE { f64::NAN } else { v });
        }
    }
}

/// Interpolate reflectivity (dBZ, dims time × range) onto
/// [`height_levels`]. Heights of the range gates follow from the aircraft
/// altitude `alt` in `gps`; only times present in both datasets are kept.
/// Interpolation happens in linear units.
pub fn height_grid(radar: &Dataset, variable: &str, gps: &Dataset) -> ReaderResult<Dataset> {
    let radar_time = radar.values("time")?;
    let gps_time = time_lookup(&gps.values("time")?);
    let alt = gps.values("alt")?;
    let range = radar.values("range")?;
    let ze = radar.var(variable)?.transpose(&["time", "range"]);
    let n_range = range.len();
    let ze = ze.to_vec();

    let height = height_levels();
    let mut times = Vec::new();
    let mut gridded = Vec::new();

    for (i, t) in radar_time.iter().enumerate() {
        let Some(&j) = gps_time.get(&t.to_bits()) else {
            continue;
        };
        let mut profile: Vec<(f64, f64)> = range
            .iter()
            .zip(&ze[i * n_range..(i + 1) * n_range])
            .map(|(r, dbz)| (alt[j] - r, 10f64.powf(0.1 * dbz)))
            .filter(|(h, _)| !h.is_nan())
            .collect();
        profile.sort_by(|a, b| a.0.total_cmp(&b.0));
        let (x, y): (Vec<f64>, Vec<f64>) = profile.into_iter().unzip();

        times.push(*t);
        gridded.extend(height.iter().map(|h| 10.0 * interp(&x, &y, *h).log10()));
    }
    debug!(times = times.len(), levels = height.len(), "Gridded radar reflectivity");

    let n_time = times.len();
    let mut out = Dataset::new();
    out.insert_coord("time", Variable::from_vec("time", times))?;
    out.insert_coord("height", Variable::from_vec("height", height.clone()).with_attr("units", "m"))?;
    out.insert_var(
        "ze",
        Variable::from_shape_vec(&["time", "height"], &[n_time, height.len()], gridded)?
            .with_attr("units", "dBZ"),
    )?;
    Ok(out)
}

fn time_lookup(times: &[f64]) -> HashMap<u64, usize> {
    let mut lookup = HashMap::with_capacity(times.len());
    for (i, t) in times.iter().enumerate() {
        lookup.entry(t.to_bits()).or_insert(i);
    }
    lookup
}

/// Campaign-wide HAMP cloud mask.
pub fn read_cloudmask(paths: &DataPaths) -> ReaderResult<Dataset> {
    archive::open(&paths.path_sec.join("hamp_cloud_mask.nc"))
}
