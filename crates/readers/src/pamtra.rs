//! Axis conventions of PAMTRA simulation files.
//!
//! PAMTRA reports viewing angles from 0° (looking up) to 180° (looking
//! down) and labels the passive polarization axis with strings. Readers
//! keep the downward half as incidence angles from 0° and number the
//! polarizations.

use lizard_common::{Dataset, LizardError, Variable};

use crate::error::ReaderResult;

pub const POL_V: f64 = 0.0;
pub const POL_H: f64 = 1.0;

/// Keep viewing angles in [90°, 180°] on `dim` and convert them to
/// incidence angles `180 - angle` on an ascending `angle` axis.
pub fn downward_angles(ds: &Dataset, dim: &str) -> ReaderResult<Dataset> {
    let angles = ds.values(dim)?;
    let mut keep: Vec<usize> = (0..angles.len())
        .filter(|&i| (90.0..=180.0).contains(&angles[i]))
        .collect();
    keep.sort_by(|&a, &b| angles[b].total_cmp(&angles[a]));
    let incidence: Vec<f64> = keep.iter().map(|&i| 180.0 - angles[i]).collect();

    let mut out = ds.isel(dim, &keep);
    out.remove(dim);
    out.rename_dim(dim, "angle");
    out.insert_coord(
        "angle",
        Variable::from_vec("angle", incidence)
            .with_attr("long_name", "incidence angle")
            .with_attr("units", "degree"),
    )?;
    Ok(out)
}

/// Rename the V/H axis `dim` to `polarization` with [`POL_V`] and
/// [`POL_H`] as coordinate values.
pub fn number_polarizations(ds: &mut Dataset, dim: &str) -> ReaderResult<()> {
    let found = ds.dim_len(dim).unwrap_or(0);
    if found != 2 {
        return Err(LizardError::DimensionMismatch {
            dim: dim.to_string(),
            existing: 2,
            found,
        }
        .into());
    }
    ds.remove(dim);
    ds.rename_dim(dim, "polarization");
    ds.insert_coord(
        "polarization",
        Variable::from_vec("polarization", vec![POL_V, POL_H]).with_attr("flag_meanings", "V H"),
    )?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_downward_angles() {
        let mut ds = Dataset::new();
        ds.insert_coord("angles", Variable::from_vec("angles", vec![0.0, 45.0, 90.0, 135.0, 180.0]))
            .unwrap();
        ds.insert_var("tb", Variable::from_vec("angles", vec![3.0, 4.0, 100.0, 150.0, 180.0]))
            .unwrap();
        let down = downward_angles(&ds, "angles").unwrap();
        assert_eq!(down.values("angle").unwrap(), vec![0.0, 45.0, 90.0]);
        assert_eq!(down.values("tb").unwrap(), vec![180.0, 150.0, 100.0]);
        assert!(!down.contains("angles"));
    }

    #[test]
    fn test_number_polarizations() {
        let mut ds = Dataset::new();
        ds.insert_var("tb", Variable::from_vec("passive_polarisation", vec![250.0, 230.0]))
            .unwrap();
        number_polarizations(&mut ds, "passive_polarisation").unwrap();
        assert_eq!(ds.var("tb").unwrap().dims, vec!["polarization"]);
        assert_eq!(ds.values("polarization").unwrap(), vec![POL_V, POL_H]);

        let mut single = Dataset::new();
        single.insert_var("tb", Variable::from_vec("pol", vec![250.0])).unwrap();
        assert!(number_polarizations(&mut single, "pol").is_err());
    }
}
