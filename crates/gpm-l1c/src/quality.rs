//! Quality flagging of L1C brightness temperatures.

use lizard_common::{Dataset, Variable};
use ndarray::{ArrayView1, Axis};
use tracing::{debug, info};

use crate::error::GpmResult;

/// Across-track standard deviation (K) below which a scan is unrealistic.
pub const MIN_SCAN_STD: f64 = 0.1;

/// Geolocation at or below this value is missing.
const MISSING_GEOLOCATION: f64 = -900.0;

/// What [`flag_gpml1c`] removed.
#[derive(Debug, Clone, PartialEq)]
pub struct FlagReport {
    /// Number of (scan, channel) pairs removed by the scan line filter
    pub n_removed: usize,
    /// Value range after removing missing values
    pub range_before: (f64, f64),
    /// Value range after the scan line filter
    pub range_after: (f64, f64),
    /// Distinct quality flags of the removed scans
    pub quality_values: Vec<f64>,
}

/// Set flagged brightness temperatures to NaN.
///
/// 1. latitude/longitude at or below -900 become NaN,
/// 2. brightness temperatures at or below 0 K become NaN (this covers every
///    error flagged by the quality field, whose values are -9999),
/// 3. scans whose across-track standard deviation is below 0.1 K become NaN
///    per channel.
///
/// The ranges and removed quality flags are logged at info level when
/// `verbose` is set.
pub fn flag_gpml1c(ds: &Dataset, verbose: bool) -> GpmResult<(Dataset, FlagReport)> {
    let mut out = ds.clone();

    for name in ["lat", "lon"] {
        if let Some(var) = out.get_mut(name) {
            var.data.mapv_inplace(|v| {
                if v > MISSING_GEOLOCATION {
                    v
                } else {
                    f64::NAN
                }
            });
        }
    }

    let mut tb = out.var("tb")?.map(|v| if v > 0.0 { v } else { f64::NAN });
    let range_before = nan_range(tb.data.iter().copied());

    let y_axis = tb
        .axis("y")
        .ok_or_else(|| lizard_common::LizardError::DimensionNotFound("y".to_string()))?;

    // one entry per lane along y, in the row-major order of the other dims
    let filter: Vec<bool> = tb
        .data
        .lanes(Axis(y_axis))
        .into_iter()
        .map(|lane| nan_std(lane) < MIN_SCAN_STD)
        .collect();
    let n_removed = filter.iter().filter(|f| **f).count();

    for (mut lane, remove) in tb.data.lanes_mut(Axis(y_axis)).into_iter().zip(&filter) {
        if *remove {
            lane.fill(f64::NAN);
        }
    }
    let range_after = nan_range(tb.data.iter().copied());

    let quality_values = if n_removed > 0 {
        removed_quality(&out, &tb, &filter)?
    } else {
        Vec::new()
    };
    out.insert_var("tb", tb)?;

    let report = FlagReport {
        n_removed,
        range_before,
        range_after,
        quality_values,
    };

    if verbose {
        info!(
            min = report.range_before.0,
            max = report.range_before.1,
            "Value range of instrument"
        );
        if n_removed > 0 {
            info!(
                min = report.range_after.0,
                max = report.range_after.1,
                "New value range of instrument"
            );
            info!(
                n_removed,
                flags = ?report.quality_values,
                "Scans removed by scan line filter"
            );
        }
    } else {
        debug!(n_removed, "Flagged GPM L1C brightness temperatures");
    }

    Ok((out, report))
}

/// Quality flags under the removed (scan, channel) pairs.
fn removed_quality(ds: &Dataset, tb: &Variable, filter: &[bool]) -> GpmResult<Vec<f64>> {
    let Some(quality) = ds.get("quality") else {
        return Ok(Vec::new());
    };

    // dims of tb without y, the layout of `filter`
    let lane_dims: Vec<String> = tb.dims.iter().filter(|d| *d != "y").cloned().collect();
    let lane_shape: Vec<usize> = lane_dims
        .iter()
        .filter_map(|d| tb.len_of(d))
        .collect();
    let removed = Variable::from_shape_vec(
        &lane_dims,
        &lane_shape,
        filter.iter().map(|f| if *f { 1.0 } else { 0.0 }).collect(),
    )?;

    let target: Vec<(String, usize)> = tb
        .dims
        .iter()
        .filter_map(|d| tb.len_of(d).map(|n| (d.clone(), n)))
        .collect();
    let removed = removed.broadcast_to(&target)?;
    let quality = quality.broadcast_to(&target)?;

    let mut values: Vec<f64> = quality
        .data
        .iter()
        .zip(removed.data.iter())
        .filter(|(q, r)| **r > 0.0 && !q.is_nan())
        .map(|(q, _)| *q)
        .collect();
    values.sort_by(|a, b| a.total_cmp(b));
    values.dedup();
    Ok(values)
}

/// Population standard deviation ignoring NaN; NaN when nothing is left.
fn nan_std(values: ArrayView1<'_, f64>) -> f64 {
    let valid: Vec<f64> = values.iter().copied().filter(|v| !v.is_nan()).collect();
    if valid.is_empty() {
        return f64::NAN;
    }
    let n = valid.len() as f64;
    let mean = valid.iter().sum::<f64>() / n;
    (valid.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n).sqrt()
}

fn nan_range(values: impl Iterator<Item = f64>) -> (f64, f64) {
    values
        .filter(|v| !v.is_nan())
        .fold(None, |acc: Option<(f64, f64)>, v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })
        .unwrap_or((f64::NAN, f64::NAN))
}
