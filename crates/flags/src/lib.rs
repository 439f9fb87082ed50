//! Bit flags.
//!
//! Up to eight boolean masks are packed into one `u8` per sample with
//! little bit order: feature `i` is bit `i`. A flag variable in a dataset
//! carries the CF attributes `flag_meanings` (space separated names) and
//! `flag_masks` (`1, 2, 4, ...`).

use lizard_common::{AttrValue, Dataset, LizardError, Variable};
use ndarray::{ArrayD, ArrayViewD, Axis, IxDyn};
use thiserror::Error;
use tracing::debug;

/// Maximum number of features in one flag.
pub const MAX_FEATURES: usize = 8;

pub type FlagResult<T> = Result<T, FlagError>;

#[derive(Debug, Error)]
pub enum FlagError {
    #[error("At most 8 masks fit into one flag, got {0}")]
    TooManyFeatures(usize),

    #[error("No masks given")]
    NoFeatures,

    #[error("Mask '{name}' has dimensions {found:?}, expected {expected:?}")]
    ShapeMismatch {
        name: String,
        expected: Vec<String>,
        found: Vec<String>,
    },

    #[error("{got} flag meanings for {expected} masks")]
    MeaningCount { expected: usize, got: usize },

    #[error("Variable '{var}' has no '{attr}' attribute")]
    MissingAttribute { var: String, attr: String },

    #[error("flag_masks must be unique sorted single bits 1, 2, 4, ..., got {0:?}")]
    InvalidMasks(Vec<f64>),

    #[error(transparent)]
    Dataset(#[from] LizardError),
}

/// Pack boolean masks into bits.
///
/// `masks` has the features along axis 0; the result has the remaining
/// shape.
pub fn pack_bit_mask(masks: ArrayViewD<'_, bool>) -> FlagResult<ArrayD<u8>> {
    if masks.ndim() == 0 || masks.len_of(Axis(0)) == 0 {
        return Err(FlagError::NoFeatures);
    }
    let n_features = masks.len_of(Axis(0));
    if n_features > MAX_FEATURES {
        return Err(FlagError::TooManyFeatures(n_features));
    }

    let mut bits = ArrayD::<u8>::zeros(IxDyn(&masks.shape()[1..]));
    for (i, feature) in masks.axis_iter(Axis(0)).enumerate() {
        let bit = 1u8 << i;
        bits.zip_mut_with(&feature, |b, &set| {
            if set {
                *b |= bit;
            }
        });
    }
    Ok(bits)
}

/// Unpack bits into eight boolean planes stacked along a new axis 0.
pub fn unpack_bit_mask(bits: ArrayViewD<'_, u8>) -> ArrayD<bool> {
    let mut shape = vec![MAX_FEATURES];
    shape.extend_from_slice(bits.shape());
    let mut out = ArrayD::<bool>::from_elem(IxDyn(&shape), false);
    for (i, mut plane) in out.axis_iter_mut(Axis(0)).enumerate() {
        plane.zip_mut_with(&bits, |o, &b| *o = b & (1u8 << i) != 0);
    }
    out
}

/// Replace boolean variables (non-zero is true, NaN is false) by one flag
/// variable named `flag_name`.
///
/// All masks must have the dimensions of the first one. With `drop` the
/// boolean variables are removed from the result.
pub fn write_flag<S: AsRef<str>, M: AsRef<str>>(
    ds: &Dataset,
    bool_vars: &[S],
    meanings: &[M],
    flag_name: &str,
    drop: bool,
) -> FlagResult<Dataset> {
    let first = bool_vars.first().ok_or(FlagError::NoFeatures)?;
    if meanings.len() != bool_vars.len() {
        return Err(FlagError::MeaningCount {
            expected: bool_vars.len(),
            got: meanings.len(),
        });
    }
    if bool_vars.len() > MAX_FEATURES {
        return Err(FlagError::TooManyFeatures(bool_vars.len()));
    }

    let template = ds.var(first.as_ref())?;
    let mut stacked: Vec<bool> = Vec::with_capacity(bool_vars.len() * template.data.len());
    for name in bool_vars {
        let var = ds.var(name.as_ref())?;
        if var.dims != template.dims || var.shape() != template.shape() {
            return Err(FlagError::ShapeMismatch {
                name: name.as_ref().to_string(),
                expected: template.dims.clone(),
                found: var.dims.clone(),
            });
        }
        stacked.extend(var.data.iter().map(|v| *v != 0.0 && !v.is_nan()));
    }

    let mut shape = vec![bool_vars.len()];
    shape.extend_from_slice(template.shape());
    let masks = ArrayD::from_shape_vec(IxDyn(&shape), stacked).map_err(LizardError::from)?;
    let bits = pack_bit_mask(masks.view())?;

    let meanings: Vec<&str> = meanings.iter().map(|m| m.as_ref()).collect();
    let masks_attr: Vec<f64> = (0..meanings.len()).map(|i| (1u32 << i) as f64).collect();
    let flag = Variable::new(&template.dims, bits.mapv(f64::from))?
        .with_attr("flag_meanings", meanings.join(" "))
        .with_attr("flag_masks", masks_attr);

    let mut out = ds.clone();
    if drop {
        out.drop_vars(bool_vars);
    }
    out.insert_var(flag_name, flag)?;
    debug!(flag = flag_name, features = meanings.len(), "Packed bit flag");
    Ok(out)
}

/// Split a flag variable into one 0/1 variable per `flag_meanings` entry.
///
/// When `flag_masks` is present it must list the single bits in order.
pub fn read_flag(ds: &Dataset, flag_name: &str, drop: bool) -> FlagResult<Dataset> {
    let flag = ds.var(flag_name)?;
    let meanings: Vec<String> = flag
        .attr_str("flag_meanings")
        .ok_or_else(|| FlagError::MissingAttribute {
            var: flag_name.to_string(),
            attr: "flag_meanings".to_string(),
        })?
        .split_whitespace()
        .map(str::to_string)
        .collect();
    if meanings.len() > MAX_FEATURES {
        return Err(FlagError::TooManyFeatures(meanings.len()));
    }

    if let Some(masks) = flag.attrs.get("flag_masks").and_then(AttrValue::as_f64_vec) {
        check_masks(&masks)?;
        if masks.len() != meanings.len() {
            return Err(FlagError::MeaningCount {
                expected: masks.len(),
                got: meanings.len(),
            });
        }
    }

    let bits = flag
        .data
        .mapv(|v| if v.is_finite() { v as u8 } else { 0 });
    let planes = unpack_bit_mask(bits.view());

    let mut out = ds.clone();
    for (i, meaning) in meanings.iter().enumerate() {
        let plane = planes
            .index_axis(Axis(0), i)
            .mapv(|b| if b { 1.0 } else { 0.0 });
        out.insert_var(meaning, Variable::new(&flag.dims, plane)?)?;
    }
    if drop {
        out.remove(flag_name);
    }
    Ok(out)
}

fn check_masks(masks: &[f64]) -> FlagResult<()> {
    let valid = masks
        .iter()
        .enumerate()
        .all(|(i, m)| *m == (1u32 << i) as f64);
    if valid {
        Ok(())
    } else {
        Err(FlagError::InvalidMasks(masks.to_vec()))
    }
}
