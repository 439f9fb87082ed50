//! HAMP microwave radiometer on HALO.
//!
//! The unified files hold 25 channels on `uniRadiometer_freq`. Readers
//! return `tb` on `(time, channel)` with channels numbered like the band
//! pass filter file; times at which any channel was interpolated are
//! removed.

use std::path::PathBuf;

use flight_meta::{Flight, FlightCatalog};
use lizard_common::{DataPaths, Dataset, LizardError, Variable};
use ndarray::Axis;
use tracing::{debug, info};

use crate::archive::{self, date_str, flight_key};
use crate::error::ReaderResult;

const FREQ_DIM: &str = "uniRadiometer_freq";
const HAMP_DIR: &str = "halo-ac3/halo/hamp";
const UNIFIED_VERSION: &str = "v2.7";

/// Calibration applied to the uncorrected files.
pub const CALIBRATION_VERSION: &str = "v2024.01";

/// Calibration that was applied to the unified files of RF11.
pub const RF11_CALIBRATION_VERSION: &str = "v2023.04";

const RF11: &str = "HALO-AC3_HALO_RF11";

/// Channel numbers of the uncorrected files in file order.
pub const UNCORRECTED_CHANNEL_ORDER: [u32; 25] = [
    20, 21, 22, 23, 24, 25, 15, 16, 17, 18, 19, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14,
];

pub fn hamp_path(paths: &DataPaths, flight: &Flight) -> ReaderResult<PathBuf> {
    let key = flight_key(flight)?;
    Ok(paths
        .campaign_root
        .join(HAMP_DIR)
        .join(format!("unified_{}", UNIFIED_VERSION))
        .join(format!(
            "HALO_HALO_AC3_radiometer_unified_{}_{}_{}.nc",
            key.name,
            date_str(flight),
            UNIFIED_VERSION
        )))
}

pub fn hamp_uncorrected_path(paths: &DataPaths, flight: &Flight) -> ReaderResult<PathBuf> {
    let key = flight_key(flight)?;
    Ok(paths.campaign_root.join(HAMP_DIR).join("uncorrected").join(format!(
        "HALO-AC3_HALO_hamp_radiometer_{}_{}.nc",
        date_str(flight),
        key.name
    )))
}

pub fn calibration_path(paths: &DataPaths, flight: &Flight, version: &str) -> PathBuf {
    paths.campaign_root.join(HAMP_DIR).join("cssc").join(version).join(format!(
        "HALO-AC3_HALO_HAMP_TB_offset_correction_{}.nc",
        date_str(flight)
    ))
}

/// Per-channel calibration of one flight day: `tb_corrected = slope * tb + offset`.
#[derive(Debug, Clone, PartialEq)]
pub struct HampCalibration {
    pub slope: Vec<f64>,
    pub offset: Vec<f64>,
    /// Remaining bias after calibration, zero when the file has none
    pub bias: Vec<f64>,
}

impl HampCalibration {
    /// From a calibration file on `(date, freq)`; the first date is used.
    pub fn from_dataset(ds: &Dataset) -> ReaderResult<Self> {
        let first_date = |name: &str| -> ReaderResult<Vec<f64>> {
            Ok(ds.var(name)?.index("date", 0)?.to_vec())
        };
        let slope = first_date("slope")?;
        let offset = first_date("offset")?;
        let bias = if ds.contains("bias") {
            first_date("bias")?
        } else {
            vec![0.0; slope.len()]
        };
        Ok(Self { slope, offset, bias })
    }

    pub fn read(paths: &DataPaths, flight: &Flight, version: &str) -> ReaderResult<Self> {
        Self::from_dataset(&archive::open(&calibration_path(paths, flight, version))?)
    }

    pub fn apply(&self, ds: &mut Dataset) -> ReaderResult<()> {
        map_channels(ds, |j, tb| self.slope[j] * tb + self.offset[j], self.slope.len())
    }

    /// Undo slope and offset, then remove the bias.
    pub fn undo_and_remove_bias(&self, ds: &mut Dataset) -> ReaderResult<()> {
        map_channels(
            ds,
            |j, tb| (tb - self.offset[j]) / self.slope[j] - self.bias[j],
            self.slope.len(),
        )
    }
}

/// Apply `f(channel_position, tb)` to `tb` on `(time, channel)`.
fn map_channels(ds: &mut Dataset, f: impl Fn(usize, f64) -> f64, n: usize) -> ReaderResult<()> {
    let tb = ds.var("tb")?.transpose(&["time", "channel"]);
    let found = tb.shape().get(1).copied().unwrap_or(0);
    if found != n {
        return Err(LizardError::DimensionMismatch {
            dim: "channel".to_string(),
            existing: found,
            found: n,
        }
        .into());
    }
    let mut tb = tb;
    for (j, mut column) in tb.data.axis_iter_mut(Axis(1)).enumerate() {
        column.mapv_inplace(|v| f(j, v));
    }
    ds.insert_var("tb", tb)?;
    Ok(())
}

/// Drop times at which any channel is flagged as interpolated.
pub fn remove_interpolated(ds: &Dataset) -> ReaderResult<Dataset> {
    let flag = ds.var("interpolate_flag")?.transpose(&["time", FREQ_DIM]);
    let keep: Vec<usize> = flag
        .data
        .axis_iter(Axis(0))
        .enumerate()
        .filter(|(_, row)| !row.iter().any(|v| *v == 1.0))
        .map(|(i, _)| i)
        .collect();
    debug!(
        removed = flag.shape()[0] - keep.len(),
        "Removed interpolated HAMP times"
    );
    Ok(ds.isel("time", &keep))
}

/// Rename to `tb` on `channel`, numbering channels with `numbers`.
fn to_channels(ds: &mut Dataset, numbers: Vec<f64>) -> ReaderResult<()> {
    ds.rename("TB", "tb")?;
    if let Some(freq) = ds.remove(FREQ_DIM) {
        let mut freq = freq;
        freq.rename_dim(FREQ_DIM, "channel");
        ds.insert_var("frequency", freq.with_attr("units", "GHz"))?;
    }
    ds.rename_dim(FREQ_DIM, "channel");
    ds.insert_coord("channel", Variable::from_vec("channel", numbers))?;
    Ok(())
}

/// Unified HAMP TBs of a HALO-AC3 flight. RF11 is recalibrated with the
/// bias correction of [`RF11_CALIBRATION_VERSION`].
pub fn read_hamp(paths: &DataPaths, flight: &Flight) -> ReaderResult<Dataset> {
    let ds = archive::open(&hamp_path(paths, flight)?)?;
    let mut ds = remove_interpolated(&ds)?;

    let n = ds.dim_len(FREQ_DIM).unwrap_or(0);
    to_channels(&mut ds, (1..=n).map(|c| c as f64).collect())?;
    ds.drop_vars(&["freq", "frequency", "surface_mask", "interpolate_flag"]);

    if flight.flight_id == RF11 {
        let calibration = HampCalibration::read(paths, flight, RF11_CALIBRATION_VERSION)?;
        calibration.undo_and_remove_bias(&mut ds)?;
        info!(flight_id = %flight.flight_id, "Applied HAMP bias correction");
    }
    Ok(ds)
}

/// Uncorrected HAMP TBs with the [`CALIBRATION_VERSION`] calibration
/// applied and channels sorted.
pub fn read_hamp_uncorrected(paths: &DataPaths, flight: &Flight) -> ReaderResult<Dataset> {
    let ds = archive::open(&hamp_uncorrected_path(paths, flight)?)?;
    let mut ds = remove_interpolated(&ds)?;
    ds.drop_vars(&["freq", "surface_mask", "interpolate_flag"]);

    to_channels(
        &mut ds,
        UNCORRECTED_CHANNEL_ORDER.iter().map(|c| *c as f64).collect(),
    )?;
    HampCalibration::read(paths, flight, CALIBRATION_VERSION)?.apply(&mut ds)?;

    let mut order: Vec<usize> = (0..UNCORRECTED_CHANNEL_ORDER.len()).collect();
    order.sort_by_key(|&i| UNCORRECTED_CHANNEL_ORDER[i]);
    Ok(ds.isel("channel", &order))
}

/// All HALO-AC3 research flights concatenated along time.
pub fn read_hamp_all(paths: &DataPaths, catalog: &FlightCatalog) -> ReaderResult<Dataset> {
    let mut parts = Vec::new();
    for flight_id in catalog.get_all_flights(&["HALO-AC3"], &["HALO"]) {
        parts.push(read_hamp(paths, catalog.meta(&flight_id)?)?);
    }
    Ok(Dataset::concat(&parts, "time")?)
}
