//! Multi-year ice concentration (University of Bremen, 12.5 km).
//!
//! ```text
//! $PATH_SEC/data/sat/multiyearice/MultiYearIce-Arctic-<YYYYmmdd>v1.1.nc
//! $PATH_SEC/data/sat/multiyearice/north_lon_12km.hdf
//! $PATH_SEC/data/sat/multiyearice/north_lat_12km.hdf
//! ```
//!
//! The daily fields are NetCDF, the longitude/latitude grids are HDF4 and
//! decoded by external tools. The decoded grids are stored upside down
//! with respect to the daily fields, so [`MyiGrid::new`] flips their rows.

use std::path::PathBuf;

use chrono::NaiveDate;
use lizard_common::{DataPaths, Dataset, Variable};
use tracing::debug;

use crate::archive;
use crate::error::ReaderResult;

const MYI_DIR: &str = "data/sat/multiyearice";
const GRID_DIMS: [&str; 2] = ["X", "Y"];

fn myi_dir(paths: &DataPaths) -> PathBuf {
    paths.path_sec.join(MYI_DIR)
}

pub fn myi_path(paths: &DataPaths, day: NaiveDate) -> PathBuf {
    myi_dir(paths).join(format!("MultiYearIce-Arctic-{}v1.1.nc", day.format("%Y%m%d")))
}

pub fn lon_grid_path(paths: &DataPaths) -> PathBuf {
    myi_dir(paths).join("north_lon_12km.hdf")
}

pub fn lat_grid_path(paths: &DataPaths) -> PathBuf {
    myi_dir(paths).join("north_lat_12km.hdf")
}

/// Longitude and latitude of the 12.5 km grid on `(X, Y)`.
#[derive(Debug, Clone, PartialEq)]
pub struct MyiGrid {
    lon: Variable,
    lat: Variable,
}

impl MyiGrid {
    /// From decoded row-major HDF4 arrays of shape `shape`.
    pub fn new(shape: [usize; 2], lon: Vec<f64>, lat: Vec<f64>) -> ReaderResult<Self> {
        let flip = |values: Vec<f64>| -> ReaderResult<Variable> {
            let var = Variable::from_shape_vec(&GRID_DIMS, &shape, values)?;
            let rows: Vec<usize> = (0..shape[0]).rev().collect();
            Ok(var.select("X", &rows))
        };
        Ok(Self {
            lon: flip(lon)?.with_attr("units", "degrees_east"),
            lat: flip(lat)?.with_attr("units", "degrees_north"),
        })
    }
}

/// Multi-year ice of one day with the grid attached as `lon`/`lat`.
pub fn read_myi(paths: &DataPaths, day: NaiveDate, grid: &MyiGrid) -> ReaderResult<Dataset> {
    let mut ds = archive::open(&myi_path(paths, day))?;
    ds.insert_coord("lon", grid.lon.clone())?;
    ds.insert_coord("lat", grid.lat.clone())?;
    debug!(day = %day, dims = ?ds.dims(), "Read multi-year ice");
    Ok(ds)
}
