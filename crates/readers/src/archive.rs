//! Shared helpers for file based readers.

use std::path::Path;

use chrono::{DateTime, Utc};
use flight_meta::{Flight, FlightId};
use lizard_common::time::to_unix_seconds;
use lizard_common::{Dataset, Variable};
use tracing::debug;

use crate::error::{ReaderError, ReaderResult};

/// Open a NetCDF file into a dataset. Missing files are reported as
/// [`ReaderError::FileNotFound`].
pub fn open(path: &Path) -> ReaderResult<Dataset> {
    if !path.is_file() {
        return Err(ReaderError::FileNotFound(path.to_path_buf()));
    }
    let ds = netcdf_io::open_dataset(path)?;
    debug!(file = %path.display(), "Opened product file");
    Ok(ds)
}

/// Mission, platform and name of a flight.
pub fn flight_key(flight: &Flight) -> ReaderResult<FlightId> {
    Ok(flight.flight_id.parse()?)
}

/// Flight date as `YYYYMMDD`.
pub fn date_str(flight: &Flight) -> String {
    flight.date.format("%Y%m%d").to_string()
}

/// Keep times within `[start, end]`.
pub fn clip_time(ds: &Dataset, start: DateTime<Utc>, end: DateTime<Utc>) -> ReaderResult<Dataset> {
    let ix = ds.range_indices("time", to_unix_seconds(start), to_unix_seconds(end))?;
    Ok(ds.isel("time", &ix))
}

/// Keep times between takeoff and landing.
pub fn clip_to_flight(ds: &Dataset, flight: &Flight) -> ReaderResult<Dataset> {
    clip_time(ds, flight.takeoff, flight.landing)
}

/// Mean over regular time bins of `step` seconds, starting at the bin of
/// the earliest time. Empty bins are NaN and NaN values are skipped.
/// Variables without a time dimension are kept as they are.
pub fn resample_mean(ds: &Dataset, step: f64) -> ReaderResult<Dataset> {
    let time = ds.values("time")?;
    let (lo, hi) = time
        .iter()
        .filter(|t| t.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), t| (lo.min(*t), hi.max(*t)));
    if lo > hi {
        return Ok(ds.isel("time", &[]));
    }

    let start = (lo / step).floor() * step;
    let n_bins = ((hi - start) / step).floor() as usize + 1;
    let bins: Vec<Option<usize>> = time
        .iter()
        .map(|t| t.is_finite().then(|| ((t - start) / step).floor() as usize))
        .collect();

    let mut out = Dataset::new();
    out.attrs = ds.attrs.clone();
    for (name, var) in ds.coords().chain(ds.data_vars()) {
        if name == "time" {
            continue;
        }
        let resampled = if var.has_dim("time") {
            bin_means(var, &bins, n_bins)?
        } else {
            var.clone()
        };
        if ds.is_coord(name) {
            out.insert_coord(name, resampled)?;
        } else {
            out.insert_var(name, resampled)?;
        }
    }

    let mut time_var = Variable::from_vec("time", (0..n_bins).map(|i| start + i as f64 * step).collect());
    time_var.attrs = ds.var("time")?.attrs.clone();
    out.insert_coord("time", time_var)?;
    debug!(samples = time.len(), bins = n_bins, step, "Resampled to regular time bins");
    Ok(out)
}

fn bin_means(var: &Variable, bins: &[Option<usize>], n_bins: usize) -> ReaderResult<Variable> {
    let order: Vec<&str> = std::iter::once("time")
        .chain(var.dims.iter().map(String::as_str).filter(|d| *d != "time"))
        .collect();
    let var_t = var.transpose(&order);
    let row: usize = var_t.shape()[1..].iter().product();
    let values = var_t.to_vec();

    let mut sums = vec![0.0; n_bins * row];
    let mut counts = vec![0usize; n_bins * row];
    for (i, bin) in bins.iter().enumerate() {
        let Some(b) = bin else { continue };
        for k in 0..row {
            let v = values[i * row + k];
            if !v.is_nan() {
                sums[b * row + k] += v;
                counts[b * row + k] += 1;
            }
        }
    }
    let means = sums
        .iter()
        .zip(&counts)
        .map(|(s, c)| if *c > 0 { s / *c as f64 } else { f64::NAN })
        .collect();

    let mut shape = var_t.shape().to_vec();
    shape[0] = n_bins;
    let mut out = Variable::from_shape_vec(&order, &shape, means)?;
    out.attrs = var.attrs.clone();
    Ok(out)
}

/// Linear interpolation in ascending `x`; NaN outside of `x`.
pub(crate) fn interp(x: &[f64], y: &[f64], xi: f64) -> f64 {
    if x.is_empty() || xi.is_nan() || xi < x[0] || xi > x[x.len() - 1] {
        return f64::NAN;
    }
    let j = x.partition_point(|v| *v < xi);
    if j < x.len() && x[j] == xi {
        return y[j];
    }
    let (x0, x1, y0, y1) = (x[j - 1], x[j], y[j - 1], y[j]);
    y0 + (y1 - y0) * (xi - x0) / (x1 - x0)
}
