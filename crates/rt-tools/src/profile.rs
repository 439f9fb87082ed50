//! PAMTRA input profiles from arbitrary datasets.
//!
//! PAMTRA expects every variable on a `(grid_x, grid_y[, grid_z][, outlevel][, hyd])`
//! grid with fixed variable names ([`PAM_VARS`]). [`PamProfile`] maps any
//! dataset onto that layout; [`PamProfile::from_era5`] does the ERA-5
//! specific preparation first.

use std::collections::BTreeMap;
use std::path::Path;

use chrono::{DateTime, Utc};
use lizard_common::time::{to_unix_seconds, UNIX_TIME_UNITS};
use lizard_common::{Dataset, LizardError, RegionOfInterest, Variable};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{RtError, RtResult};
use crate::surface::PamtraSurface;

/// Variables passed to PAMTRA's profile creation.
pub const PAM_VARS: [&str; 17] = [
    "lon",
    "lat",
    "timestamp",
    "wind10u",
    "wind10v",
    "sfc_slf",
    "sfc_sif",
    "groundtemp",
    "press",
    "hgt",
    "relhum",
    "temp",
    "obs_height",
    "hydro_q",
    "sfc_type",
    "sfc_model",
    "sfc_refl",
];

/// ERA-5 hydrometeor mass mixing ratios, in the order of the `hyd` axis.
pub const ERA5_HYDROMETEORS: [&str; 4] = ["clwc", "ciwc", "crwc", "cswc"];

/// Standard gravity (m/s2).
pub const GRAVITY: f64 = 9.80665;

/// Lowest surface height (m) kept from the ERA-5 geopotential.
pub const MIN_HEIGHT: f64 = -200.0;

const GRID_ORDER: [&str; 5] = ["grid_x", "grid_y", "grid_z", "outlevel", "hyd"];

/// Dataset dimension behind each PAMTRA grid axis. Axes without a
/// dimension get length 1.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridDimensions {
    pub grid_x: Option<String>,
    pub grid_y: Option<String>,
    pub grid_z: Option<String>,
}

impl GridDimensions {
    pub fn era5() -> Self {
        Self {
            grid_x: Some("longitude".to_string()),
            grid_y: Some("latitude".to_string()),
            grid_z: Some("level".to_string()),
        }
    }

    fn axes(&self) -> [(&'static str, Option<&str>); 3] {
        [
            ("grid_x", self.grid_x.as_deref()),
            ("grid_y", self.grid_y.as_deref()),
            ("grid_z", self.grid_z.as_deref()),
        ]
    }
}

/// PAMTRA variable name to dataset variable name. PAMTRA variables that
/// already carry their final name are left out.
pub type VarNames = BTreeMap<String, String>;

/// Variable names of merged ERA-5 single and pressure levels.
pub fn era5_varnames() -> VarNames {
    [
        ("lon", "longitude"),
        ("lat", "latitude"),
        ("timestamp", "time"),
        ("wind10u", "u10"),
        ("wind10v", "v10"),
        ("sfc_slf", "lsm"),
        ("sfc_sif", "siconc"),
        ("groundtemp", "skt"),
        ("press", "level"),
        ("hgt", "hgt"),
        ("relhum", "r"),
        ("temp", "t"),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProfileOptions {
    /// Observation heights (m), the same for every grid cell
    pub obs_height: Option<Vec<f64>>,
    /// Set all hydrometeor contents to zero
    pub remove_hydrometeors: bool,
    pub surface: PamtraSurface,
}

impl Default for ProfileOptions {
    fn default() -> Self {
        Self {
            obs_height: None,
            remove_hydrometeors: true,
            surface: PamtraSurface::default(),
        }
    }
}

/// A dataset in PAMTRA profile layout.
#[derive(Debug, Clone, PartialEq)]
pub struct PamProfile {
    ds: Dataset,
}

impl PamProfile {
    /// Transform `ds` into PAMTRA layout.
    ///
    /// Units: pressure Pa, height m, temperature K, wind m/s, relative
    /// humidity %. Relative humidity is clipped to [0, 100] and `time`
    /// (unix seconds) truncated to whole seconds.
    pub fn new(
        ds: Dataset,
        grid: &GridDimensions,
        varnames: &VarNames,
        options: &ProfileOptions,
    ) -> RtResult<Self> {
        let mut ds = ds;

        for (pam_dim, dim) in grid.axes() {
            match dim {
                Some(dim) => swap_dim(&mut ds, dim, pam_dim)?,
                None => ds.insert_coord(pam_dim, Variable::from_vec(pam_dim, vec![0.0]))?,
            }
        }

        let rh_var = varnames
            .get("relhum")
            .ok_or_else(|| RtError::MissingVariable("relhum".to_string()))?;
        filter_relhum(&mut ds, rh_var)?;
        convert_time(&mut ds)?;

        if let Some(heights) = &options.obs_height {
            ds.insert_coord(
                "outlevel",
                Variable::from_vec("outlevel", (0..heights.len()).map(|i| i as f64).collect()),
            )?;
            ds.insert_var(
                "obs_height",
                Variable::from_vec("outlevel", heights.clone()).with_attr("units", "m"),
            )?;
        }

        for (pam_name, name) in varnames {
            ds.rename(name, pam_name)?;
        }

        expand_variables(&mut ds)?;
        let mut ds = ds.transpose(&GRID_ORDER);

        options.surface.apply(&mut ds)?;

        if options.remove_hydrometeors {
            if let Some(hydro) = ds.get_mut("hydro_q") {
                hydro.data.fill(0.0);
            }
        }

        debug!(dims = ?ds.dims(), "Created PAMTRA profile");
        Ok(Self { ds })
    }

    /// Profile from merged ERA-5 single and pressure levels.
    ///
    /// The time step nearest to `time` is used and the grid is cut to
    /// `extent` (edges included). Pressure levels are converted to Pa and
    /// ordered from the surface upward, latitudes ascending. Heights come
    /// from the geopotential and are at least -200 m. Cloud liquid, cloud
    /// ice, rain and snow are stacked on the `hyd` axis with negative
    /// values set to 0.
    pub fn from_era5(
        single_levels: &Dataset,
        pressure_levels: &Dataset,
        time: DateTime<Utc>,
        extent: Option<&RegionOfInterest>,
        grid: &GridDimensions,
        varnames: &VarNames,
        options: &ProfileOptions,
    ) -> RtResult<Self> {
        let mut ds = single_levels.clone();
        ds.rename("z", "z_sfc")?;
        ds.merge(pressure_levels)?;

        let step = ds.nearest_index("time", to_unix_seconds(time))?;
        let mut ds = ds.isel_drop("time", step)?;

        if let Some(roi) = extent {
            let lon = ds.range_indices("longitude", roi.lon0, roi.lon1)?;
            ds = ds.isel("longitude", &lon);
            let lat = ds.range_indices("latitude", roi.lat0, roi.lat1)?;
            ds = ds.isel("latitude", &lat);
        }

        let mut ds = ds.reverse("level").reverse("latitude");
        if let Some(level) = ds.get_mut("level") {
            level.data.mapv_inplace(|p| p * 100.0);
            level.attrs.insert("units".to_string(), "Pa".into());
        }

        let hgt = ds
            .var("z")?
            .map(|z| {
                let h = z / GRAVITY;
                if h > MIN_HEIGHT {
                    h
                } else {
                    MIN_HEIGHT
                }
            })
            .with_attr("units", "m");
        ds.insert_var("hgt", hgt)?;

        let mut parts = Vec::with_capacity(ERA5_HYDROMETEORS.len());
        for name in ERA5_HYDROMETEORS {
            parts.push(ds.var(name)?.expand_dims("hyd", 1, 0)?);
        }
        let hydro_q = Variable::concat(&parts.iter().collect::<Vec<_>>(), "hyd")?
            .map(|q| if q > 0.0 { q } else { 0.0 });
        ds.drop_vars(&ERA5_HYDROMETEORS);
        ds.insert_coord(
            "hyd",
            Variable::from_vec("hyd", vec![0.0, 1.0, 2.0, 3.0])
                .with_attr("flag_meanings", ERA5_HYDROMETEORS.join(" ")),
        )?;
        ds.insert_var("hydro_q", hydro_q.with_attr("units", "kg kg-1"))?;

        info!(
            time = %time,
            n_lon = ds.dim_len("longitude").unwrap_or(0),
            n_lat = ds.dim_len("latitude").unwrap_or(0),
            "Prepared ERA-5 profile"
        );
        Self::new(ds, grid, varnames, options)
    }

    pub fn dataset(&self) -> &Dataset {
        &self.ds
    }

    pub fn into_dataset(self) -> Dataset {
        self.ds
    }

    /// The variables handed to PAMTRA, keyed by PAMTRA name. `hydro_q` is
    /// optional.
    pub fn variables(&self) -> RtResult<BTreeMap<&'static str, &Variable>> {
        let mut out = BTreeMap::new();
        for name in PAM_VARS {
            match self.ds.get(name) {
                Some(var) => {
                    out.insert(name, var);
                }
                None if name == "hydro_q" => {}
                None => return Err(RtError::MissingVariable(name.to_string())),
            }
        }
        Ok(out)
    }

    /// Write the profile to NetCDF.
    pub fn write<P: AsRef<Path>>(&self, path: P) -> RtResult<()> {
        netcdf_io::write_dataset(&self.ds, path)?;
        Ok(())
    }
}

/// Replace dimension `dim` by the PAMTRA axis `pam_dim` counting from 0.
/// The former coordinate stays as a data variable on the new axis.
fn swap_dim(ds: &mut Dataset, dim: &str, pam_dim: &str) -> RtResult<()> {
    let n = ds
        .dim_len(dim)
        .ok_or_else(|| LizardError::DimensionNotFound(dim.to_string()))?;
    let coord = ds.remove(dim);
    ds.rename_dim(dim, pam_dim);
    if let Some(mut coord) = coord {
        coord.rename_dim(dim, pam_dim);
        ds.insert_var(dim, coord)?;
    }
    ds.insert_coord(
        pam_dim,
        Variable::from_vec(pam_dim, (0..n).map(|i| i as f64).collect()),
    )?;
    Ok(())
}

fn filter_relhum(ds: &mut Dataset, name: &str) -> RtResult<()> {
    let rh = ds
        .get_mut(name)
        .ok_or_else(|| RtError::MissingVariable(name.to_string()))?;
    rh.data.mapv_inplace(|v| v.clamp(0.0, 100.0));
    Ok(())
}

fn convert_time(ds: &mut Dataset) -> RtResult<()> {
    let time = ds
        .get_mut("time")
        .ok_or_else(|| RtError::MissingVariable("time".to_string()))?;
    time.data.mapv_inplace(f64::trunc);
    time.attrs.insert("units".to_string(), UNIX_TIME_UNITS.into());
    Ok(())
}

/// Broadcast every profile variable onto `grid_x` and `grid_y`.
fn expand_variables(ds: &mut Dataset) -> RtResult<()> {
    let grid: Vec<(String, usize)> = ["grid_x", "grid_y"]
        .iter()
        .map(|d| {
            ds.dim_len(d)
                .map(|n| (d.to_string(), n))
                .ok_or_else(|| LizardError::DimensionNotFound(d.to_string()))
        })
        .collect::<Result<_, _>>()?;

    for name in PAM_VARS {
        if name.starts_with("sfc_") && !matches!(name, "sfc_slf" | "sfc_sif") {
            continue;
        }
        if name == "hydro_q" && !ds.contains(name) {
            continue;
        }
        let var = ds
            .get(name)
            .ok_or_else(|| RtError::MissingVariable(name.to_string()))?;
        if var.has_dim("grid_x") && var.has_dim("grid_y") {
            continue;
        }

        let mut target = grid.clone();
        for (d, n) in var.dims.iter().zip(var.shape()) {
            if d != "grid_x" && d != "grid_y" {
                target.push((d.clone(), *n));
            }
        }
        let expanded = var.broadcast_to(&target)?;
        if ds.is_coord(name) {
            ds.insert_coord(name, expanded)?;
        } else {
            ds.insert_var(name, expanded)?;
        }
    }
    Ok(())
}
