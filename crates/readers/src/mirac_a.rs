//! MiRAC-A radar and 89 GHz radiometer on Polar 5.

use std::path::PathBuf;

use flight_meta::Flight;
use lizard_common::{DataPaths, Dataset, Variable};
use tracing::{debug, warn};

use crate::archive::{self, date_str, flight_key};
use crate::error::{ReaderError, ReaderResult};

/// Flights without public MiRAC-A data or with a failed instrument.
pub const MISSING_FLIGHTS: [&str; 3] = ["HALO-AC3_P5_RF02", "ACLOUD_P5_RF13", "HALO-AC3_P5_RF06"];

/// Radar variables dropped by [`read_mirac_a_tb`].
const RADAR_VARIABLES: [&str; 7] = ["Ze", "Ze_flag", "Ze_unfiltered", "height", "lon", "lat", "alt"];

fn radar_dir(paths: &DataPaths, mission: &str) -> PathBuf {
    paths
        .campaign_root
        .join(mission.to_lowercase())
        .join("p5/mirac_radar")
}

pub fn mirac_a_path(paths: &DataPaths, flight: &Flight) -> ReaderResult<PathBuf> {
    let key = flight_key(flight)?;
    Ok(radar_dir(paths, &key.mission).join("compact").join(format!(
        "{}_P5_MiRAC-A_{}_{}.nc",
        key.mission,
        date_str(flight),
        key.name
    )))
}

/// Compact MiRAC-A file of a flight. Known missing flights give `None`.
pub fn read_mirac_a(paths: &DataPaths, flight: &Flight) -> ReaderResult<Option<Dataset>> {
    match archive::open(&mirac_a_path(paths, flight)?) {
        Ok(ds) => Ok(Some(ds)),
        Err(ReaderError::FileNotFound(path)) if MISSING_FLIGHTS.contains(&flight.flight_id.as_str()) => {
            warn!(flight_id = %flight.flight_id, file = %path.display(), "No MiRAC-A data for flight");
            Ok(None)
        }
        Err(e) => Err(e),
    }
}

/// Radiometer part of the compact file with a trailing `channel` axis of
/// length one.
pub fn read_mirac_a_tb(paths: &DataPaths, flight: &Flight) -> ReaderResult<Option<Dataset>> {
    match read_mirac_a(paths, flight)? {
        Some(mut ds) => {
            ds.drop_vars(&RADAR_VARIABLES);
            Ok(Some(add_channel_axis(&ds)?))
        }
        None => Ok(None),
    }
}

/// Append a length-one `channel` dimension (channel 1) to every data
/// variable.
pub fn add_channel_axis(ds: &Dataset) -> ReaderResult<Dataset> {
    let mut out = Dataset::new();
    out.attrs = ds.attrs.clone();
    for (name, var) in ds.coords() {
        out.insert_coord(name, var.clone())?;
    }
    for (name, var) in ds.data_vars() {
        out.insert_var(name, var.expand_dims("channel", 1, var.ndim())?)?;
    }
    out.insert_coord("channel", Variable::from_vec("channel", vec![1.0]))?;
    Ok(out)
}

/// Processing level of the MiRAC-A TB files.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TbLevel {
    L0,
    L1,
}

impl TbLevel {
    fn tag(&self) -> &'static str {
        match self {
            TbLevel::L0 => "l0",
            TbLevel::L1 => "l1",
        }
    }
}

pub fn tb_level_path(paths: &DataPaths, flight: &Flight, level: TbLevel) -> ReaderResult<PathBuf> {
    let key = flight_key(flight)?;
    Ok(radar_dir(paths, &key.mission)
        .join(format!("tb_{}", level.tag()))
        .join(format!(
            "{}_MiRAC-A_tb_{}_{}.nc",
            flight.flight_id,
            level.tag(),
            date_str(flight)
        )))
}

pub fn read_mirac_a_tb_level(paths: &DataPaths, flight: &Flight, level: TbLevel) -> ReaderResult<Dataset> {
    archive::open(&tb_level_path(paths, flight, level)?)
}

pub fn write_mirac_a_tb_level(
    ds: &Dataset,
    paths: &DataPaths,
    flight: &Flight,
    level: TbLevel,
) -> ReaderResult<PathBuf> {
    let path = tb_level_path(paths, flight, level)?;
    netcdf_io::write_dataset(ds, &path)?;
    debug!(file = %path.display(), level = level.tag(), "Wrote MiRAC-A TB");
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::flight;

    #[test]
    fn test_paths() {
        let paths = DataPaths::under("/data");
        let f = flight("HALO-AC3_P5_RF04");
        assert_eq!(
            mirac_a_path(&paths, &f).unwrap(),
            PathBuf::from("/data/campaigns/halo-ac3/p5/mirac_radar/compact/HALO-AC3_P5_MiRAC-A_20220320_RF04.nc")
        );
        assert_eq!(
            tb_level_path(&paths, &f, TbLevel::L1).unwrap(),
            PathBuf::from("/data/campaigns/halo-ac3/p5/mirac_radar/tb_l1/HALO-AC3_P5_RF04_MiRAC-A_tb_l1_20220320.nc")
        );
    }

    #[test]
    fn test_known_missing_flight() {
        let dir = tempfile::tempdir().unwrap();
        let paths = DataPaths::under(dir.path());
        assert!(read_mirac_a(&paths, &flight("HALO-AC3_P5_RF06")).unwrap().is_none());
        assert!(read_mirac_a_tb(&paths, &flight("HALO-AC3_P5_RF06")).unwrap().is_none());
        assert!(matches!(
            read_mirac_a(&paths, &flight("HALO-AC3_P5_RF04")),
            Err(ReaderError::FileNotFound(_))
        ));
    }

    #[test]
    fn test_channel_axis() {
        let mut ds = Dataset::new();
        ds.insert_coord("time", Variable::from_vec("time", vec![0.0, 1.0]))
            .unwrap();
        ds.insert_var("tb", Variable::from_vec("time", vec![180.0, 181.0]))
            .unwrap();
        let out = add_channel_axis(&ds).unwrap();
        let tb = out.var("tb").unwrap();
        assert_eq!(tb.dims, vec!["time", "channel"]);
        assert_eq!(tb.shape(), &[2, 1]);
        assert_eq!(out.values("channel").unwrap(), vec![1.0]);
    }

    #[test]
    fn test_write_and_read_level() {
        let dir = tempfile::tempdir().unwrap();
        let paths = DataPaths::under(dir.path());
        let f = flight("ACLOUD_P5_RF05");

        let mut ds = Dataset::new();
        ds.insert_coord("time", Variable::from_vec("time", vec![0.0, 1.0]))
            .unwrap();
        ds.insert_var("tb", Variable::from_vec("time", vec![180.0, 181.0]))
            .unwrap();
        let path = write_mirac_a_tb_level(&ds, &paths, &f, TbLevel::L0).unwrap();
        assert!(path.ends_with("acloud/p5/mirac_radar/tb_l0/ACLOUD_P5_RF05_MiRAC-A_tb_l0_20220320.nc"));

        let back = read_mirac_a_tb_level(&paths, &f, TbLevel::L0).unwrap();
        assert_eq!(back.values("tb").unwrap(), vec![180.0, 181.0]);
    }
}
