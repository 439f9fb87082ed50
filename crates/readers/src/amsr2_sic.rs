//! AMSR2 ASI sea ice concentration (University of Bremen, 6.25 km).
//!
//! Daily fields and the longitude/latitude grid come as HDF4 files, which
//! are read by external tools; this module knows their names and builds
//! the dataset from decoded arrays. Campaign means are NetCDF.

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use lizard_common::{DataPaths, Dataset, Variable};

use crate::archive;
use crate::error::ReaderResult;

pub const GRID_FILE: &str = "LongitudeLatitudeGrid-n6250-Arctic.hdf";

pub fn grid_path(dir: &Path) -> PathBuf {
    dir.join(GRID_FILE)
}

pub fn sic_path(dir: &Path, day: NaiveDate) -> PathBuf {
    dir.join(format!("asi-AMSR2-n6250-{}-v5.4.hdf", day.format("%Y%m%d")))
}

/// Sea ice concentration on the (x, y) grid with lon/lat coordinates.
/// All arrays are row-major with shape `shape`.
pub fn from_arrays(
    shape: [usize; 2],
    lon: Vec<f64>,
    lat: Vec<f64>,
    sic: Vec<f64>,
) -> ReaderResult<Dataset> {
    let dims = ["x", "y"];
    let mut ds = Dataset::new();
    ds.insert_coord("lon", Variable::from_shape_vec(&dims, &shape, lon)?)?;
    ds.insert_coord("lat", Variable::from_shape_vec(&dims, &shape, lat)?)?;
    ds.insert_var(
        "sic",
        Variable::from_shape_vec(&dims, &shape, sic)?.with_attr("units", "%"),
    )?;
    Ok(ds)
}

pub fn mean_sea_ice_path(paths: &DataPaths, mission: &str) -> PathBuf {
    paths
        .path_dat
        .join("obs/campaigns")
        .join(mission.to_lowercase())
        .join("auxiliary/sea_ice/avg")
        .join(format!("{}_mean_sic_asi-AMSR2-n6250-v5.4.nc", mission))
}

/// Mean sea ice concentration over a campaign.
pub fn read_mean_sea_ice(paths: &DataPaths, mission: &str) -> ReaderResult<Dataset> {
    archive::open(&mean_sea_ice_path(paths, mission))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paths() {
        let day = NaiveDate::from_ymd_opt(2019, 3, 23).unwrap();
        assert_eq!(
            sic_path(Path::new("/sic"), day),
            PathBuf::from("/sic/asi-AMSR2-n6250-20190323-v5.4.hdf")
        );
        assert_eq!(
            mean_sea_ice_path(&DataPaths::under("/data"), "AFLUX"),
            PathBuf::from("/data/dat/obs/campaigns/aflux/auxiliary/sea_ice/avg/AFLUX_mean_sic_asi-AMSR2-n6250-v5.4.nc")
        );
    }

    #[test]
    fn test_from_arrays() {
        let ds = from_arrays(
            [2, 2],
            vec![0.0, 1.0, 2.0, 3.0],
            vec![80.0, 80.0, 81.0, 81.0],
            vec![100.0, 95.0, 0.0, 12.5],
        )
        .unwrap();
        assert_eq!(ds.dims().get("x"), Some(&2));
        assert!(ds.is_coord("lat"));
        assert_eq!(ds.var("sic").unwrap().dims, vec!["x", "y"]);
        assert!(from_arrays([3, 2], vec![0.0; 4], vec![0.0; 4], vec![0.0; 4]).is_err());
    }
}
