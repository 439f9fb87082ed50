//! PAMTRA simulations of dropsonde profiles, with ERA-5 above the sonde.
//!
//! ```text
//! $PATH_SEC/data/lwp_project/pamtra_<FLIGHT_ID>_<NN>.nc
//! ```
//!
//! Each file simulates one sonde with several liquid water paths on
//! `grid_x`; readers keep the clear-sky column and the downward angles.

use std::collections::BTreeMap;
use std::path::PathBuf;

use lizard_common::{DataPaths, Dataset, LizardError};
use tracing::{debug, info};
use walkdir::WalkDir;

use crate::archive;
use crate::error::{ReaderError, ReaderResult};
use crate::pamtra::{downward_angles, number_polarizations};

const SIMULATION_DIR: &str = "data/lwp_project";

fn simulation_dir(paths: &DataPaths) -> PathBuf {
    paths.path_sec.join(SIMULATION_DIR)
}

/// File of a sonde id such as `HALO-AC3_P5_RF05_03`.
pub fn pamtra_dropsonde_path(paths: &DataPaths, sonde_id: &str) -> PathBuf {
    simulation_dir(paths).join(format!("pamtra_{}.nc", sonde_id))
}

/// Clear-sky simulation of one sonde on `(obs_height, angle, frequency,
/// polarization)`. The first column without cloud water is used.
pub fn read_pamtra_dropsonde(paths: &DataPaths, sonde_id: &str) -> ReaderResult<Dataset> {
    let ds = archive::open(&pamtra_dropsonde_path(paths, sonde_id))?;
    let ds = ds.isel_drop("grid_y", 0)?;

    let clear = ds
        .values("cwp")?
        .iter()
        .position(|cwp| *cwp == 0.0)
        .ok_or_else(|| ReaderError::NoClearSky(sonde_id.to_string()))?;
    let ds = ds.isel_drop("grid_x", clear)?;

    let mut ds = downward_angles(&ds, "angles")?;
    number_polarizations(&mut ds, "passive_polarisation")?;

    let mut heights = ds
        .remove("outlevels")
        .ok_or_else(|| LizardError::VariableNotFound("outlevels".to_string()))?;
    ds.remove("outlevel");
    heights.rename_dim("outlevel", "obs_height");
    ds.rename_dim("outlevel", "obs_height");
    ds.insert_coord("obs_height", heights)?;

    debug!(sonde_id, column = clear, "Read PAMTRA dropsonde simulation");
    Ok(ds)
}

/// All simulated sondes of a flight keyed by sonde id.
pub fn read_pamtra_dropsondes(paths: &DataPaths, flight_id: &str) -> ReaderResult<BTreeMap<String, Dataset>> {
    let prefix = format!("pamtra_{}_", flight_id);
    let mut sonde_ids: Vec<String> = WalkDir::new(simulation_dir(paths))
        .max_depth(1)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .filter_map(|e| {
            let name = e.file_name().to_str()?;
            if !name.starts_with(&prefix) {
                return None;
            }
            name.strip_prefix("pamtra_")?.strip_suffix(".nc").map(str::to_string)
        })
        .collect();
    sonde_ids.sort();

    let mut sondes = BTreeMap::new();
    for sonde_id in sonde_ids {
        let ds = read_pamtra_dropsonde(paths, &sonde_id)?;
        sondes.insert(sonde_id, ds);
    }
    info!(flight_id, sondes = sondes.len(), "Read PAMTRA dropsonde simulations");
    Ok(sondes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pamtra::POL_H;
    use lizard_common::Variable;

    /// Three columns (cloudy, clear, clear), two outlevels, four angles,
    /// one frequency. TB is `100 x + 10 angle + pol + 1000 outlevel`.
    fn simulation(cwp: Vec<f64>) -> Dataset {
        let mut ds = Dataset::new();
        ds.insert_coord("angles", Variable::from_vec("angles", vec![0.0, 60.0, 120.0, 180.0]))
            .unwrap();
        ds.insert_coord("frequency", Variable::from_vec("frequency", vec![89.0]))
            .unwrap();
        ds.insert_var(
            "cwp",
            Variable::from_shape_vec(&["grid_x", "grid_y"], &[3, 1], cwp).unwrap(),
        )
        .unwrap();
        let heights: Vec<f64> = (0..3).flat_map(|x| [10.0 * x as f64, 8000.0]).collect();
        ds.insert_var(
            "outlevels",
            Variable::from_shape_vec(&["grid_x", "grid_y", "outlevel"], &[3, 1, 2], heights).unwrap(),
        )
        .unwrap();

        let mut tb = Vec::new();
        for x in 0..3 {
            for o in 0..2 {
                for a in 0..4 {
                    for p in 0..2 {
                        tb.push(100.0 * x as f64 + 10.0 * a as f64 + p as f64 + 1000.0 * o as f64);
                    }
                }
            }
        }
        ds.insert_var(
            "tb",
            Variable::from_shape_vec(
                &["grid_x", "grid_y", "outlevel", "angles", "frequency", "passive_polarisation"],
                &[3, 1, 2, 4, 1, 2],
                tb,
            )
            .unwrap(),
        )
        .unwrap();
        ds
    }

    #[test]
    fn test_read_clear_sky_downward() {
        let dir = tempfile::tempdir().unwrap();
        let paths = DataPaths::under(dir.path());
        netcdf_io::write_dataset(
            &simulation(vec![0.05, 0.0, 0.0]),
            pamtra_dropsonde_path(&paths, "HALO-AC3_P5_RF05_03"),
        )
        .unwrap();

        let ds = read_pamtra_dropsonde(&paths, "HALO-AC3_P5_RF05_03").unwrap();
        assert_eq!(ds.values("angle").unwrap(), vec![0.0, 60.0]);
        assert_eq!(ds.values("obs_height").unwrap(), vec![10.0, 8000.0]);
        assert!(!ds.contains("outlevels"));

        let tb = ds.var("tb").unwrap();
        assert_eq!(tb.dims, vec!["obs_height", "angle", "frequency", "polarization"]);
        // column 1, upper outlevel, nadir (180° in the file), H
        let nadir_h = tb
            .index("obs_height", 1)
            .unwrap()
            .index("angle", 0)
            .unwrap()
            .index("frequency", 0)
            .unwrap()
            .index("polarization", POL_H as usize)
            .unwrap();
        assert_eq!(nadir_h.to_vec(), vec![1131.0]);
    }

    #[test]
    fn test_read_all_sondes_of_flight() {
        let dir = tempfile::tempdir().unwrap();
        let paths = DataPaths::under(dir.path());
        for sonde_id in ["AFLUX_P5_RF08_02", "AFLUX_P5_RF08_01", "AFLUX_P5_RF09_01"] {
            netcdf_io::write_dataset(&simulation(vec![0.0, 0.1, 0.2]), pamtra_dropsonde_path(&paths, sonde_id))
                .unwrap();
        }
        netcdf_io::write_dataset(&simulation(vec![0.3, 0.1, 0.2]), pamtra_dropsonde_path(&paths, "AFLUX_P5_RF10_01"))
            .unwrap();

        let sondes = read_pamtra_dropsondes(&paths, "AFLUX_P5_RF08").unwrap();
        assert_eq!(
            sondes.keys().collect::<Vec<_>>(),
            vec!["AFLUX_P5_RF08_01", "AFLUX_P5_RF08_02"]
        );
        assert!(read_pamtra_dropsondes(&paths, "AFLUX_P5_RF11").unwrap().is_empty());
        assert!(matches!(
            read_pamtra_dropsondes(&paths, "AFLUX_P5_RF10"),
            Err(ReaderError::NoClearSky(_))
        ));
    }
}
