//! Broadband irradiance and KT-19 on Polar 5.
//!
//! Some files keep the time on a `Time` dimension with a separate `time`
//! variable; readers return it as the `time` coordinate. The HALO-AC3
//! files store KT-19 in °C, all other campaigns in K.

use flight_meta::Flight;
use lizard_common::{Dataset, Variable};
use tracing::{debug, info};

use crate::archive::{clip_to_flight, flight_key, resample_mean};
use crate::error::ReaderResult;
use crate::local_catalog::LocalCatalog;

pub const BROADBAND_IRRADIANCE: &str = "BROADBAND_IRRADIANCE";

const CELSIUS_TO_KELVIN: f64 = 273.15;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BbrOptions {
    /// Keep takeoff to landing
    pub reduce_to_flight: bool,
    /// Average to 1 s
    pub resample: bool,
    /// Keep only times with `Attitude_Flag == 0`
    pub attitude_flag: bool,
}

impl Default for BbrOptions {
    fn default() -> Self {
        Self {
            reduce_to_flight: true,
            resample: true,
            attitude_flag: false,
        }
    }
}

/// Promote the `time` variable on the `Time` dimension to the `time`
/// coordinate.
fn time_on_time_dim(ds: &mut Dataset) -> ReaderResult<()> {
    if !ds.dims().contains_key("Time") {
        return Ok(());
    }
    let mut time = ds.remove("time").unwrap_or_else(|| Variable::from_vec("Time", Vec::new()));
    ds.remove("Time");
    ds.rename_dim("Time", "time");
    time.rename_dim("Time", "time");
    ds.insert_coord("time", time)?;
    Ok(())
}

pub fn read_bbr(catalog: &LocalCatalog, flight: &Flight, options: BbrOptions) -> ReaderResult<Dataset> {
    let key = flight_key(flight)?;
    let mut ds = catalog.read(&key.mission, &key.platform, BROADBAND_IRRADIANCE, &flight.flight_id)?;
    time_on_time_dim(&mut ds)?;

    if options.reduce_to_flight {
        ds = clip_to_flight(&ds, flight)?;
    }
    if options.attitude_flag {
        let keep: Vec<usize> = ds
            .values("Attitude_Flag")?
            .iter()
            .enumerate()
            .filter(|(_, flag)| **flag == 0.0)
            .map(|(i, _)| i)
            .collect();
        debug!(kept = keep.len(), "Applied BBR attitude flag");
        ds = ds.isel("time", &keep);
    }
    if options.resample {
        ds = resample_mean(&ds, 1.0)?;
    }

    if key.mission == "HALO-AC3" {
        let kt19 = ds.var("KT19")?.map(|t| t + CELSIUS_TO_KELVIN).with_attr("units", "K");
        ds.insert_var("KT19", kt19)?;
        info!(flight_id = %flight.flight_id, "Converted KT-19 from degC to K");
    }
    Ok(ds)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::flight;
    use lizard_common::time::{to_unix_seconds, UNIX_TIME_UNITS};
    use test_utils::assert_values_approx_eq;

    /// Half-second samples on a `Time` dimension, starting 1 s before
    /// takeoff.
    fn half_second_file(takeoff: f64) -> Dataset {
        let time: Vec<f64> = (0..8).map(|i| takeoff - 1.0 + 0.5 * i as f64).collect();
        let mut ds = Dataset::new();
        ds.insert_var(
            "time",
            Variable::from_vec("Time", time).with_attr("units", UNIX_TIME_UNITS),
        )
        .unwrap();
        ds.insert_var(
            "F_down_solar",
            Variable::from_vec("Time", vec![1.0, 3.0, 400.0, 402.0, 404.0, 406.0, 408.0, 410.0]),
        )
        .unwrap();
        ds.insert_var(
            "KT19",
            Variable::from_vec("Time", vec![-20.0, -20.0, -21.0, -23.0, -22.0, -22.0, -25.0, -25.0]),
        )
        .unwrap();
        ds.insert_var(
            "Attitude_Flag",
            Variable::from_vec("Time", vec![0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 1.0, 1.0]),
        )
        .unwrap();
        ds
    }

    #[test]
    fn test_read_halo_ac3_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let catalog = LocalCatalog::new(dir.path());
        let f = flight("HALO-AC3_P5_RF08");
        let takeoff = to_unix_seconds(f.takeoff);
        netcdf_io::write_dataset(
            &half_second_file(takeoff),
            catalog.entry_path("HALO-AC3", "P5", BROADBAND_IRRADIANCE, "HALO-AC3_P5_RF08"),
        )
        .unwrap();

        let ds = read_bbr(&catalog, &f, BbrOptions::default()).unwrap();
        assert!(ds.is_coord("time"));
        assert!(!ds.dims().contains_key("Time"));
        assert_eq!(ds.values("time").unwrap(), vec![takeoff, takeoff + 1.0, takeoff + 2.0]);
        assert_values_approx_eq!(ds.values("F_down_solar").unwrap(), vec![401.0, 405.0, 409.0], 1e-9);
        assert_values_approx_eq!(
            ds.values("KT19").unwrap(),
            vec![-22.0 + 273.15, -22.0 + 273.15, -25.0 + 273.15],
            1e-9
        );
        assert_eq!(ds.var("KT19").unwrap().attr_str("units"), Some("K"));
    }

    #[test]
    fn test_attitude_flag_without_resampling() {
        let dir = tempfile::tempdir().unwrap();
        let catalog = LocalCatalog::new(dir.path());
        let f = flight("AFLUX_P5_RF08");
        let takeoff = to_unix_seconds(f.takeoff);
        netcdf_io::write_dataset(
            &half_second_file(takeoff),
            catalog.entry_path("AFLUX", "P5", BROADBAND_IRRADIANCE, "AFLUX_P5_RF08"),
        )
        .unwrap();

        let options = BbrOptions {
            reduce_to_flight: false,
            resample: false,
            attitude_flag: true,
        };
        let ds = read_bbr(&catalog, &f, options).unwrap();
        assert_eq!(ds.dim_len("time"), Some(5));
        assert_eq!(ds.values("F_down_solar").unwrap(), vec![1.0, 3.0, 400.0, 404.0, 406.0]);
        // no unit conversion outside of HALO-AC3
        assert_eq!(ds.values("KT19").unwrap()[0], -20.0);
    }
}
