//! Conversion of PAMTRA passive simulation results into a [`Dataset`].
//!
//! PAMTRA reports brightness temperatures on 2n viewing angles from 0° to
//! 180°. With `split_angle` the angle axis becomes `direction` (up, down)
//! times an incidence angle, which puts the specular reflection above the
//! surface on the same angle as the incidence.

use std::collections::BTreeMap;

use chrono::Utc;
use lizard_common::time::UNIX_TIME_UNITS;
use lizard_common::{Dataset, Variable};
use ndarray::{stack, Array2, Array3, Array5, Array6, ArrayD, Axis};
use tracing::debug;

use crate::error::{RtError, RtResult};

const DIRECTION_UP: f64 = 0.0;
const DIRECTION_DOWN: f64 = 1.0;

/// Long name and units of the per-column fields.
const GRID_FIELDS: [(&str, &str, &str); 15] = [
    ("model_i", "model grid i-direction", ""),
    ("model_j", "model grid j-direction", ""),
    ("nlyrs", "number of vertical layers", ""),
    ("time", "time", UNIX_TIME_UNITS),
    ("lon", "longitude", "deg"),
    ("lat", "latitude", "deg"),
    ("sfc_type", "surface type", ""),
    ("groundtemp", "ground temperature", "K"),
    ("sfc_salinity", "sea surface salinity", "psu"),
    ("sfc_sif", "surface sea ice fraction", ""),
    ("sfc_slf", "surface sea-land fraction", ""),
    ("sfc_model", "surface model", ""),
    ("sfc_refl", "surface reflection type", ""),
    ("wind10u", "u-wind at 10 m height", "m s^-1"),
    ("wind10v", "v-wind at 10 m height", "m s^-1"),
];

/// Raw arrays of a passive PAMTRA run.
#[derive(Debug, Clone, PartialEq)]
pub struct PamtraOutput {
    /// Frequencies (GHz)
    pub frequencies: Vec<f64>,
    /// Viewing angles (deg), ascending from 0 to 180
    pub angles: Vec<f64>,
    /// Per-column fields on `(grid_x, grid_y)`, e.g. `lon`, `time`, `iwv`
    pub grid_fields: BTreeMap<String, Array2<f64>>,
    /// Hydrometeor paths on `(grid_x, grid_y, hydro_class)`
    pub hydro_wp: Option<Array3<f64>>,
    /// `(grid_x, grid_y, outlevel)`
    pub obs_height: Array3<f64>,
    /// `(grid_x, grid_y, outlevel, angle, frequency, polarization)`
    pub tb: Array6<f64>,
    /// `(grid_x, grid_y, polarization, frequency, n)` for the n angles
    /// above 90°, in reverse angle order
    pub emissivity: Array5<f64>,
    pub version: String,
    pub git_hash: String,
    pub creator: String,
    /// Namelist settings recorded as a global attribute
    pub settings: BTreeMap<String, String>,
}

impl PamtraOutput {
    /// Convert to a dataset. Polarization is coded V=0, H=1 and direction
    /// up=0, down=1.
    pub fn to_dataset(&self, split_angle: bool) -> RtResult<Dataset> {
        let shape = self.tb.shape();
        let (nx, ny, nout) = (shape[0], shape[1], shape[2]);
        let nang = self.angles.len();
        if shape[3] != nang || shape[4] != self.frequencies.len() || shape[5] != 2 {
            return Err(RtError::InvalidOutput(format!(
                "tb shape {:?} does not match {} angles and {} frequencies",
                shape,
                nang,
                self.frequencies.len()
            )));
        }
        if nang % 2 != 0 {
            return Err(RtError::InvalidOutput(format!(
                "expected an even number of angles, got {}",
                nang
            )));
        }

        let mut ds = Dataset::new();
        ds.insert_coord("grid_x", arange("grid_x", nx).with_attr("long_name", "pamtra grid x-axis"))?;
        ds.insert_coord("grid_y", arange("grid_y", ny).with_attr("long_name", "pamtra grid y-axis"))?;
        ds.insert_coord("outlevel", arange("outlevel", nout).with_attr("long_name", "outlevel"))?;
        ds.insert_coord(
            "frequency",
            Variable::from_vec("frequency", self.frequencies.clone())
                .with_attr("long_name", "frequency")
                .with_attr("units", "GHz"),
        )?;
        ds.insert_coord(
            "polarization",
            Variable::from_vec("polarization", vec![0.0, 1.0]).with_attr("flag_meanings", "V H"),
        )?;

        for (name, values) in &self.grid_fields {
            let mut var = Variable::new(&["grid_x", "grid_y"], values.clone().into_dyn())?;
            if let Some((_, long_name, units)) = GRID_FIELDS.iter().find(|(n, _, _)| *n == name.as_str()) {
                var = var.with_attr("long_name", *long_name);
                if !units.is_empty() {
                    var = var.with_attr("units", *units);
                }
            }
            if name == "sfc_type" {
                var = var.with_attr("flag_meanings", "water land");
            }
            if name == "iwv" {
                var = var
                    .with_attr("long_name", "integrated water vapor")
                    .with_attr("units", "kg m^-2");
            }
            ds.insert_var(name, var)?;
        }

        if let Some(hydro_wp) = &self.hydro_wp {
            ds.insert_coord(
                "hydro_class",
                arange("hydro_class", hydro_wp.shape()[2]).with_attr("long_name", "hydrometeor class"),
            )?;
            ds.insert_var(
                "hydro_wp",
                Variable::new(&["grid_x", "grid_y", "hydro_class"], hydro_wp.clone().into_dyn())?
                    .with_attr("long_name", "integrated hydrometeor content")
                    .with_attr("units", "kg m^-2"),
            )?;
        }

        ds.insert_var(
            "obs_height",
            Variable::new(&["grid_x", "grid_y", "outlevel"], self.obs_height.clone().into_dyn())?
                .with_attr("long_name", "observation height")
                .with_attr("units", "m"),
        )?;

        let emissivity = self.extended_emissivity()?;
        let tb = self.tb.clone().into_dyn();

        if split_angle {
            let n = nang / 2;
            let up: Vec<usize> = (0..n).rev().collect();
            let down: Vec<usize> = (n..nang).collect();

            let tb = stack(
                Axis(3),
                &[tb.select(Axis(3), &up).view(), tb.select(Axis(3), &down).view()],
            )?;
            ds.insert_coord(
                "direction",
                Variable::from_vec("direction", vec![DIRECTION_UP, DIRECTION_DOWN])
                    .with_attr("long_name", "direction of radiance")
                    .with_attr("flag_meanings", "up down")
                    .with_attr(
                        "comment",
                        "up: upwelling radiance observed by down-looking instrument, \
                         down: downwelling radiance observed by up-looking instrument",
                    ),
            )?;
            ds.insert_coord(
                "angle",
                Variable::from_vec("angle", self.angles[n..].to_vec())
                    .with_attr("long_name", "incidence or zenith angle")
                    .with_attr("units", "deg"),
            )?;
            ds.insert_var(
                "tb",
                tb_variable(
                    &["grid_x", "grid_y", "outlevel", "direction", "angle", "frequency", "polarization"],
                    tb,
                )?,
            )?;
            ds.insert_var(
                "emissivity",
                emissivity_variable(emissivity.select(Axis(4), &down))?,
            )?;
        } else {
            ds.insert_coord(
                "angle",
                Variable::from_vec("angle", self.angles.clone())
                    .with_attr("long_name", "viewing angle")
                    .with_attr("units", "deg"),
            )?;
            ds.insert_var(
                "tb",
                tb_variable(
                    &["grid_x", "grid_y", "outlevel", "angle", "frequency", "polarization"],
                    tb,
                )?,
            )?;
            ds.insert_var("emissivity", emissivity_variable(emissivity)?)?;
        }

        ds.attrs.insert("title".to_string(), "PAMTRA model data".into());
        ds.attrs.insert(
            "model".to_string(),
            format!("pyPamtra (Version: {}, Git Hash: {})", self.version, self.git_hash).into(),
        );
        ds.attrs.insert("pamtraVersion".to_string(), self.version.clone().into());
        ds.attrs.insert("author".to_string(), self.creator.clone().into());
        ds.attrs.insert(
            "created".to_string(),
            Utc::now().format("%Y-%m-%d %H:%M:%S").to_string().into(),
        );
        if !self.settings.is_empty() {
            let settings: Vec<String> = self
                .settings
                .iter()
                .map(|(k, v)| format!("{}: {}", k, v))
                .collect();
            ds.attrs.insert("pyPamtra_settings".to_string(), settings.join(", ").into());
        }

        debug!(split_angle, dims = ?ds.dims(), "Converted PAMTRA output");
        Ok(ds)
    }

    /// Emissivity on the full angle axis: missing below 90°, the reported
    /// values flipped into ascending angle order above.
    fn extended_emissivity(&self) -> RtResult<ArrayD<f64>> {
        let upward: Vec<usize> = self
            .angles
            .iter()
            .enumerate()
            .filter(|(_, a)| **a > 90.0)
            .map(|(i, _)| i)
            .collect();
        let reported = self.emissivity.shape()[4];
        if upward.len() != reported {
            return Err(RtError::InvalidOutput(format!(
                "{} emissivity angles for {} angles above 90 deg",
                reported,
                upward.len()
            )));
        }

        let mut shape = self.emissivity.shape().to_vec();
        shape[4] = self.angles.len();
        let mut out = ArrayD::from_elem(shape, f64::NAN);
        for (j, &i) in upward.iter().enumerate() {
            out.index_axis_mut(Axis(4), i)
                .assign(&self.emissivity.index_axis(Axis(4), reported - 1 - j).into_dyn());
        }
        Ok(out)
    }
}

fn arange(dim: &str, n: usize) -> Variable {
    Variable::from_vec(dim, (0..n).map(|i| i as f64).collect())
}

fn tb_variable(dims: &[&str], data: ArrayD<f64>) -> RtResult<Variable> {
    Ok(Variable::new(dims, data)?
        .with_attr("long_name", "brightness temperature")
        .with_attr("units", "K"))
}

fn emissivity_variable(data: ArrayD<f64>) -> RtResult<Variable> {
    Ok(
        Variable::new(&["grid_x", "grid_y", "polarization", "frequency", "angle"], data)?
            .with_attr("long_name", "emissivity")
            .with_attr("comment", "defined for 180 > angle > 90"),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{Array, Array5, Array6};
    use test_utils::assert_approx_eq;

    /// One column pair, two outlevels, four angles, one frequency. TB
    /// encodes the angle index as 100 + index.
    fn output() -> PamtraOutput {
        let tb = Array6::from_shape_fn((1, 2, 2, 4, 1, 2), |(_, _, _, a, _, _)| 100.0 + a as f64);
        let emissivity = Array5::from_shape_fn((1, 2, 2, 1, 2), |(_, _, _, _, k)| 0.9 + 0.01 * k as f64);
        let mut grid_fields = BTreeMap::new();
        grid_fields.insert("lon".to_string(), Array::from_elem((1, 2), 10.0));
        grid_fields.insert("iwv".to_string(), Array::from_elem((1, 2), 2.5));

        PamtraOutput {
            frequencies: vec![89.0],
            angles: vec![0.0, 60.0, 120.0, 180.0],
            grid_fields,
            hydro_wp: None,
            obs_height: Array::from_elem((1, 2, 2), 833_000.0),
            tb,
            emissivity,
            version: "1.0.0".to_string(),
            git_hash: "abc123".to_string(),
            creator: "tester".to_string(),
            settings: BTreeMap::new(),
        }
    }

    #[test]
    fn test_emissivity_extended_to_upward_angles() {
        let ds = output().to_dataset(false).unwrap();
        let e = ds.var("emissivity").unwrap();
        assert_eq!(e.shape(), &[1, 2, 2, 1, 4]);
        let values: Vec<f64> = e.data.iter().take(4).copied().collect();
        assert!(values[0].is_nan());
        assert!(values[1].is_nan());
        assert_approx_eq!(values[2], 0.91, 1e-12);
        assert_approx_eq!(values[3], 0.90, 1e-12);

        assert_eq!(ds.var("tb").unwrap().shape(), &[1, 2, 2, 4, 1, 2]);
        assert_eq!(ds.var("lon").unwrap().attr_str("units"), Some("deg"));
        assert_eq!(
            ds.attrs["model"].as_str(),
            Some("pyPamtra (Version: 1.0.0, Git Hash: abc123)")
        );
    }

    #[test]
    fn test_split_angle() {
        let ds = output().to_dataset(true).unwrap();
        assert_eq!(ds.values("angle").unwrap(), vec![120.0, 180.0]);
        assert_eq!(ds.values("direction").unwrap(), vec![0.0, 1.0]);

        let tb = ds.var("tb").unwrap();
        assert_eq!(
            tb.dims,
            vec!["grid_x", "grid_y", "outlevel", "direction", "angle", "frequency", "polarization"]
        );
        let column = tb.index("grid_x", 0).unwrap().index("grid_y", 0).unwrap();
        let column = column.index("outlevel", 0).unwrap().index("frequency", 0).unwrap();
        let column = column.index("polarization", 0).unwrap();
        // up from the mirrored lower half, down from the upper half
        assert_eq!(column.to_vec(), vec![101.0, 100.0, 102.0, 103.0]);

        let e = ds.var("emissivity").unwrap();
        assert_eq!(e.shape(), &[1, 2, 2, 1, 2]);
        let values: Vec<f64> = e.data.iter().take(2).copied().collect();
        assert_approx_eq!(values[0], 0.91, 1e-12);
        assert_approx_eq!(values[1], 0.90, 1e-12);
    }

    #[test]
    fn test_mismatched_emissivity_is_rejected() {
        let mut out = output();
        out.angles = vec![0.0, 30.0, 60.0, 120.0];
        assert!(matches!(out.to_dataset(false), Err(RtError::InvalidOutput(_))));
    }
}
