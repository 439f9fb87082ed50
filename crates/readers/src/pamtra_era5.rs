//! PAMTRA simulation of ERA-5 along flight tracks.
//!
//! ```text
//! $PATH_SEC/data/era5_pamtra/flights/ERA5_<FLIGHT_ID>_passive.nc
//! ```
//!
//! The simulation runs on the cleaned GPS/INS positions of the flight but
//! only stores the ERA-5 time of each profile. The aircraft time is taken
//! back from the GPS/INS data, which must give one position per profile.

use std::path::PathBuf;

use flight_meta::Flight;
use lizard_common::time::UNIX_TIME_UNITS;
use lizard_common::{DataPaths, Dataset, LizardError, Variable};
use tracing::debug;

use crate::archive::{self, clip_to_flight};
use crate::error::ReaderResult;
use crate::gps_ins::{clean_positions, read_gps_ins};
use crate::local_catalog::LocalCatalog;
use crate::pamtra::{downward_angles, number_polarizations};

const FREQUENCY_TOLERANCE: f64 = 1e-6;

pub fn pamtra_era5_path(paths: &DataPaths, flight: &Flight) -> PathBuf {
    paths
        .path_sec
        .join("data/era5_pamtra/flights")
        .join(format!("ERA5_{}_passive.nc", flight.flight_id))
}

/// `tb` with its dimension coordinates.
fn tb_only(file: &Dataset) -> ReaderResult<Dataset> {
    let tb = file.var("tb")?;
    let mut ds = Dataset::new();
    for dim in &tb.dims {
        if file.is_coord(dim) {
            ds.insert_coord(dim, file.var(dim)?.clone())?;
        }
    }
    ds.insert_var("tb", tb.clone())?;
    Ok(ds)
}

/// Aircraft times of the simulated profiles.
fn aircraft_times(catalog: &LocalCatalog, flight: &Flight) -> ReaderResult<Vec<f64>> {
    let gps = read_gps_ins(catalog, flight)?;
    let gps = clean_positions(&clip_to_flight(&gps, flight)?)?;
    Ok(gps.values("time")?)
}

/// Downward TB at one frequency (GHz) on `(time, obs_height, angle,
/// polarization)` plus the ERA-5 time of each profile as `time_era5`.
pub fn read_pamtra_era5(
    paths: &DataPaths,
    catalog: &LocalCatalog,
    flight: &Flight,
    frequency: f64,
) -> ReaderResult<Dataset> {
    let file = archive::open(&pamtra_era5_path(paths, flight))?;
    let ds = tb_only(&file)?;

    let i = ds
        .values("frequencies")?
        .iter()
        .position(|f| (f - frequency).abs() < FREQUENCY_TOLERANCE)
        .ok_or_else(|| LizardError::CoordinateValueNotFound {
            dim: "frequencies".to_string(),
            value: frequency,
        })?;
    let mut ds = ds.isel_drop("frequencies", i)?.isel_drop("grid_y", 0)?;
    ds.drop_vars(&["frequencies", "grid_y"]);

    let mut ds = downward_angles(&ds, "angles")?;
    number_polarizations(&mut ds, "polarizations")?;
    ds.rename("outlevels", "obs_height")?;
    ds.rename("time", "time_era5")?;

    let times = aircraft_times(catalog, flight)?;
    let profiles = ds.dim_len("time_era5").unwrap_or(0);
    if times.len() != profiles {
        return Err(LizardError::DimensionMismatch {
            dim: "time".to_string(),
            existing: profiles,
            found: times.len(),
        }
        .into());
    }

    let era5_time = ds.remove("time_era5");
    ds.rename_dim("time_era5", "time");
    if let Some(mut era5_time) = era5_time {
        era5_time.rename_dim("time_era5", "time");
        ds.insert_var("time_era5", era5_time)?;
    }
    ds.insert_coord("time", Variable::from_vec("time", times).with_attr("units", UNIX_TIME_UNITS))?;

    debug!(flight_id = %flight.flight_id, frequency, profiles, "Read PAMTRA ERA-5 simulation");
    Ok(ds)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gps_ins::GPS_INS;
    use crate::pamtra::POL_V;
    use crate::testing::flight;
    use lizard_common::time::to_unix_seconds;

    /// Three profiles, two outlevels, four angles, two frequencies. TB is
    /// `1000 t + 100 angle + 10 frequency + pol + 5000 outlevel`.
    fn simulation() -> Dataset {
        let mut ds = Dataset::new();
        ds.insert_coord("time", Variable::from_vec("time", vec![0.0, 3600.0, 7200.0]))
            .unwrap();
        ds.insert_coord("angles", Variable::from_vec("angles", vec![0.0, 60.0, 120.0, 180.0]))
            .unwrap();
        ds.insert_coord("frequencies", Variable::from_vec("frequencies", vec![89.0, 183.31]))
            .unwrap();
        ds.insert_var("lat", Variable::from_vec("time", vec![80.0, 80.1, 80.2])).unwrap();

        let mut tb = Vec::new();
        for t in 0..3 {
            for o in 0..2 {
                for a in 0..4 {
                    for f in 0..2 {
                        for p in 0..2 {
                            tb.push(
                                1000.0 * t as f64 + 100.0 * a as f64 + 10.0 * f as f64 + p as f64 + 5000.0 * o as f64,
                            );
                        }
                    }
                }
            }
        }
        ds.insert_var(
            "tb",
            Variable::from_shape_vec(
                &["time", "grid_y", "outlevels", "angles", "frequencies", "polarizations"],
                &[3, 1, 2, 4, 2, 2],
                tb,
            )
            .unwrap(),
        )
        .unwrap();
        ds
    }

    /// Positions with one sample before takeoff, a repeated time and a
    /// missing position, leaving three valid samples.
    fn gps(takeoff: f64) -> Dataset {
        let time = vec![takeoff - 1.0, takeoff, takeoff + 1.0, takeoff + 1.0, takeoff + 2.0, takeoff + 3.0];
        let mut ds = Dataset::new();
        ds.insert_coord("time", Variable::from_vec("time", time).with_attr("units", UNIX_TIME_UNITS))
            .unwrap();
        ds.insert_var("lon", Variable::from_vec("time", vec![10.0, 10.1, 10.2, 10.25, f64::NAN, 10.4]))
            .unwrap();
        ds.insert_var("lat", Variable::from_vec("time", vec![79.0, 79.1, 79.2, 79.25, f64::NAN, 79.4]))
            .unwrap();
        ds
    }

    #[test]
    fn test_read_with_aircraft_time() {
        let dir = tempfile::tempdir().unwrap();
        let paths = DataPaths::under(dir.path());
        let catalog = LocalCatalog::new(dir.path().join("intake"));
        let f = flight("HALO-AC3_P5_RF05");
        let takeoff = to_unix_seconds(f.takeoff);
        netcdf_io::write_dataset(&simulation(), pamtra_era5_path(&paths, &f)).unwrap();
        netcdf_io::write_dataset(&gps(takeoff), catalog.entry_path("HALO-AC3", "P5", GPS_INS, "HALO-AC3_P5_RF05"))
            .unwrap();

        let ds = read_pamtra_era5(&paths, &catalog, &f, 183.31).unwrap();
        assert_eq!(ds.values("time").unwrap(), vec![takeoff, takeoff + 1.0, takeoff + 3.0]);
        assert_eq!(ds.values("time_era5").unwrap(), vec![0.0, 3600.0, 7200.0]);
        assert_eq!(ds.values("angle").unwrap(), vec![0.0, 60.0]);
        assert!(!ds.contains("lat"));
        assert!(!ds.contains("frequencies"));

        let tb = ds.var("tb").unwrap();
        assert_eq!(tb.dims, vec!["time", "obs_height", "angle", "polarization"]);
        // second profile, lower outlevel, 60° incidence (120° in the file), V
        let value = tb
            .index("time", 1)
            .unwrap()
            .index("obs_height", 0)
            .unwrap()
            .index("angle", 1)
            .unwrap()
            .index("polarization", POL_V as usize)
            .unwrap();
        assert_eq!(value.to_vec(), vec![1210.0]);

        assert!(read_pamtra_era5(&paths, &catalog, &f, 150.0).is_err());
    }

    #[test]
    fn test_profile_count_must_match_positions() {
        let dir = tempfile::tempdir().unwrap();
        let paths = DataPaths::under(dir.path());
        let catalog = LocalCatalog::new(dir.path().join("intake"));
        let f = flight("HALO-AC3_P5_RF06");
        let takeoff = to_unix_seconds(f.takeoff);
        netcdf_io::write_dataset(&simulation(), pamtra_era5_path(&paths, &f)).unwrap();
        let short = gps(takeoff).isel("time", &[1, 2]);
        netcdf_io::write_dataset(&short, catalog.entry_path("HALO-AC3", "P5", GPS_INS, "HALO-AC3_P5_RF06"))
            .unwrap();

        assert!(matches!(
            read_pamtra_era5(&paths, &catalog, &f, 89.0),
            Err(crate::error::ReaderError::Dataset(LizardError::DimensionMismatch { .. }))
        ));
    }
}
