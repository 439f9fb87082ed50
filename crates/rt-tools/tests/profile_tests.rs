//! PAMTRA profiles from synthetic ERA-5 fields.

use chrono::{Duration, TimeZone, Utc};
use lizard_common::time::to_unix_seconds;
use lizard_common::{Dataset, RegionOfInterest, Variable};
use ndarray::{Array3, Array4};
use rt_tools::profile::GRAVITY;
use rt_tools::{
    era5_varnames, GridDimensions, PamProfile, ProfileOptions, SurfaceKind, SurfaceModel,
};
use test_utils::assert_approx_eq;

const LONS: [f64; 3] = [0.0, 10.0, 20.0];
const LATS: [f64; 2] = [82.0, 81.0];
const LEVELS: [f64; 2] = [500.0, 1000.0];

fn t0() -> chrono::DateTime<Utc> {
    Utc.with_ymd_and_hms(2022, 4, 1, 12, 0, 0).unwrap()
}

fn coords(ds: &mut Dataset) {
    let t = to_unix_seconds(t0());
    ds.insert_coord("time", Variable::from_vec("time", vec![t, t + 3600.0]))
        .unwrap();
    ds.insert_coord("latitude", Variable::from_vec("latitude", LATS.to_vec()))
        .unwrap();
    ds.insert_coord("longitude", Variable::from_vec("longitude", LONS.to_vec()))
        .unwrap();
}

fn single_var(f: impl Fn(usize, usize, usize) -> f64) -> Variable {
    let data = Array3::from_shape_fn((2, 2, 3), |(t, la, lo)| f(t, la, lo)).into_dyn();
    Variable::new(&["time", "latitude", "longitude"], data).unwrap()
}

fn pressure_var(f: impl Fn(usize, usize, usize, usize) -> f64) -> Variable {
    let data = Array4::from_shape_fn((2, 2, 2, 3), |(t, l, la, lo)| f(t, l, la, lo)).into_dyn();
    Variable::new(&["time", "level", "latitude", "longitude"], data).unwrap()
}

/// Ocean at 0°E and 10°E, land at 20°E, no sea ice.
fn single_levels() -> Dataset {
    let mut ds = Dataset::new();
    coords(&mut ds);
    ds.insert_var("u10", single_var(|_, _, _| 3.0)).unwrap();
    ds.insert_var("v10", single_var(|_, _, _| -2.0)).unwrap();
    ds.insert_var("lsm", single_var(|_, _, lo| if lo == 2 { 1.0 } else { 0.0 }))
        .unwrap();
    ds.insert_var("siconc", single_var(|_, _, _| 0.0)).unwrap();
    ds.insert_var("skt", single_var(|t, _, _| 270.0 + t as f64)).unwrap();
    ds.insert_var("z", single_var(|_, _, _| 0.0)).unwrap();
    ds
}

fn pressure_levels() -> Dataset {
    let mut ds = Dataset::new();
    coords(&mut ds);
    ds.insert_coord("level", Variable::from_vec("level", LEVELS.to_vec()))
        .unwrap();
    ds.insert_var("r", pressure_var(|_, l, _, _| if l == 1 { 105.0 } else { 60.0 }))
        .unwrap();
    ds.insert_var("t", pressure_var(|t, l, _, _| 250.0 + t as f64 + 10.0 * l as f64))
        .unwrap();
    ds.insert_var(
        "z",
        pressure_var(|_, l, _, _| if l == 1 { -3000.0 } else { 5000.0 * GRAVITY }),
    )
    .unwrap();
    ds.insert_var("clwc", pressure_var(|_, _, _, _| -1e-6)).unwrap();
    ds.insert_var("ciwc", pressure_var(|_, _, _, _| 1e-5)).unwrap();
    ds.insert_var("crwc", pressure_var(|_, _, _, _| 0.0)).unwrap();
    ds.insert_var("cswc", pressure_var(|_, _, _, _| f64::NAN)).unwrap();
    ds
}

fn era5_profile(options: &ProfileOptions) -> PamProfile {
    let roi = RegionOfInterest::new(5.0, 20.0, 80.0, 90.0);
    PamProfile::from_era5(
        &single_levels(),
        &pressure_levels(),
        t0() + Duration::minutes(50),
        Some(&roi),
        &GridDimensions::era5(),
        &era5_varnames(),
        options,
    )
    .unwrap()
}

#[test]
fn test_era5_profile_layout() {
    let options = ProfileOptions {
        obs_height: Some(vec![0.0, 833_000.0]),
        ..ProfileOptions::default()
    };
    let profile = era5_profile(&options);
    let ds = profile.dataset();

    assert_eq!(ds.dim_len("grid_x"), Some(2));
    assert_eq!(ds.dim_len("grid_y"), Some(2));
    assert_eq!(ds.dim_len("grid_z"), Some(2));
    assert_eq!(ds.dim_len("outlevel"), Some(2));

    assert_eq!(ds.values("lon").unwrap(), vec![10.0, 10.0, 20.0, 20.0]);
    assert_eq!(ds.values("lat").unwrap(), vec![81.0, 82.0, 81.0, 82.0]);

    // surface first, in Pa
    let press = ds.var("press").unwrap();
    assert_eq!(press.dims, vec!["grid_x", "grid_y", "grid_z"]);
    assert_eq!(&press.to_vec()[..2], &[100_000.0, 50_000.0]);

    let hgt = ds.values("hgt").unwrap();
    assert_eq!(hgt[0], -200.0);
    assert_approx_eq!(hgt[1], 5000.0, 1e-9);

    assert!(ds.values("relhum").unwrap().iter().all(|rh| *rh <= 100.0));
    assert_eq!(&ds.values("temp").unwrap()[..2], &[261.0, 251.0]);
    assert!(ds
        .values("timestamp")
        .unwrap()
        .iter()
        .all(|t| *t == to_unix_seconds(t0()) + 3600.0));
    assert_eq!(ds.values("groundtemp").unwrap(), vec![271.0; 4]);

    assert_eq!(ds.values("sfc_type").unwrap(), vec![0.0, 0.0, 1.0, 1.0]);

    let hydro = ds.var("hydro_q").unwrap();
    assert_eq!(hydro.dims, vec!["grid_x", "grid_y", "grid_z", "hyd"]);
    assert!(hydro.to_vec().iter().all(|q| *q == 0.0));

    let obs = ds.var("obs_height").unwrap();
    assert_eq!(obs.shape(), &[2, 2, 2]);

    assert_eq!(profile.variables().unwrap().len(), rt_tools::PAM_VARS.len());
}

#[test]
fn test_era5_hydrometeors_kept() {
    let options = ProfileOptions {
        remove_hydrometeors: false,
        ..ProfileOptions::default()
    };
    let profile = era5_profile(&options);
    let hydro = profile.dataset().var("hydro_q").unwrap();
    // clwc, ciwc, crwc, cswc of the first cell and level
    let first: Vec<f64> = hydro.to_vec()[..4].to_vec();
    assert_eq!(first, vec![0.0, 1e-5, 0.0, 0.0]);
}

#[test]
fn test_options_from_yaml() {
    let yaml = r#"
obs_height: [0.0, 833000.0]
remove_hydrometeors: false
surface:
  kind: idealized
  ocean_model: FASTEM
  ocean_refl: F
"#;
    let options: ProfileOptions = serde_yaml::from_str(yaml).unwrap();
    assert_eq!(options.obs_height, Some(vec![0.0, 833_000.0]));
    assert!(!options.remove_hydrometeors);
    assert_eq!(options.surface.kind, SurfaceKind::Idealized);
    assert_eq!(options.surface.ocean_model, SurfaceModel::Fastem);
    assert_eq!(options.surface.land_model, SurfaceModel::Telsem2);

    let profile = era5_profile(&options);
    assert!(profile
        .dataset()
        .values("sfc_type")
        .unwrap()
        .iter()
        .all(|t| *t == rt_tools::surface::IDEALIZED_SURFACE_TYPE));
}

#[test]
fn test_profile_written_to_netcdf() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("profile.nc");
    era5_profile(&ProfileOptions::default()).write(&path).unwrap();

    let ds = netcdf_io::open_dataset(&path).unwrap();
    assert_eq!(ds.var("temp").unwrap().shape(), &[2, 2, 2]);
    assert_eq!(ds.values("grid_x").unwrap(), vec![0.0, 1.0]);
}
