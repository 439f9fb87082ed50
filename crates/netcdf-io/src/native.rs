//! Low-level helpers around the `netcdf` crate.
//!
//! Everything that touches `netcdf::Variable`/`netcdf::AttributeValue`
//! directly lives here so the reader and writer can work on
//! [`lizard_common::Variable`]s.

use std::sync::Once;

use lizard_common::{AttrValue, Attrs, Variable};
use netcdf::AttributeValue;

use crate::error::{NetCdfError, NetCdfResult};

/// Silence HDF5's automatic error printing to stderr.
///
/// The HDF5 C library prints verbose diagnostics even when a failed lookup
/// (for example an optional attribute) is handled on the Rust side. Call
/// this early in `main()`, before any file is opened. Calling it more than
/// once is harmless.
pub fn silence_hdf5_errors() {
    static INIT: Once = Once::new();

    INIT.call_once(|| {
        // SAFETY: H5Eset_auto2 is thread-safe and we're passing null pointers
        // to disable error output, which is a documented valid use.
        unsafe {
            hdf5_metno_sys::h5e::H5Eset_auto2(
                hdf5_metno_sys::h5e::H5E_DEFAULT,
                None,
                std::ptr::null_mut(),
            );
        }
    });
}

/// Check if a variable has an attribute with the given name.
/// This avoids HDF5 error spam when checking for optional attributes.
pub(crate) fn has_attr(var: &netcdf::Variable, name: &str) -> bool {
    var.attributes().any(|attr| attr.name() == name)
}

/// Helper to get an f64 attribute.
pub(crate) fn get_f64_attr(var: &netcdf::Variable, name: &str) -> Option<f64> {
    if !has_attr(var, name) {
        return None;
    }
    let attr_value = var.attribute_value(name)?.ok()?;
    f64::try_from(attr_value).ok()
}

/// Convert a netCDF attribute value. Unsigned/signed integers of every width
/// become `f64`; character data becomes text.
pub(crate) fn convert_attr(value: AttributeValue) -> Option<AttrValue> {
    let number = |v: f64| Some(AttrValue::Number(v));
    let numbers = |v: Vec<f64>| Some(AttrValue::Numbers(v));

    match value {
        AttributeValue::Str(s) => Some(AttrValue::Text(s)),
        AttributeValue::Strs(s) => Some(AttrValue::Text(s.join(", "))),
        AttributeValue::Double(v) => number(v),
        AttributeValue::Float(v) => number(v as f64),
        AttributeValue::Longlong(v) => number(v as f64),
        AttributeValue::Ulonglong(v) => number(v as f64),
        AttributeValue::Int(v) => number(v as f64),
        AttributeValue::Uint(v) => number(v as f64),
        AttributeValue::Short(v) => number(v as f64),
        AttributeValue::Ushort(v) => number(v as f64),
        AttributeValue::Schar(v) => number(v as f64),
        AttributeValue::Uchar(v) => number(v as f64),
        AttributeValue::Doubles(v) => numbers(v),
        AttributeValue::Floats(v) => numbers(v.into_iter().map(f64::from).collect()),
        AttributeValue::Longlongs(v) => numbers(v.into_iter().map(|x| x as f64).collect()),
        AttributeValue::Ulonglongs(v) => numbers(v.into_iter().map(|x| x as f64).collect()),
        AttributeValue::Ints(v) => numbers(v.into_iter().map(f64::from).collect()),
        AttributeValue::Uints(v) => numbers(v.into_iter().map(f64::from).collect()),
        AttributeValue::Shorts(v) => numbers(v.into_iter().map(f64::from).collect()),
        AttributeValue::Ushorts(v) => numbers(v.into_iter().map(f64::from).collect()),
        AttributeValue::Schars(v) => numbers(v.into_iter().map(f64::from).collect()),
        AttributeValue::Uchars(v) => numbers(v.into_iter().map(f64::from).collect()),
        #[allow(unreachable_patterns)]
        _ => None,
    }
}

/// Read every attribute of a variable that has a representable value.
pub(crate) fn read_attrs<'a>(attrs: impl Iterator<Item = netcdf::Attribute<'a>>) -> Attrs {
    let mut out = Attrs::new();
    for attr in attrs {
        if let Some(value) = attr.value().ok().and_then(convert_attr) {
            out.insert(attr.name().to_string(), value);
        }
    }
    out
}

/// Read all values of a variable as `f64`, whatever its storage type.
///
/// libnetcdf refuses some conversions (e.g. to a narrower type), so the
/// widest types are tried first.
pub(crate) fn read_values(var: &netcdf::Variable) -> NetCdfResult<Vec<f64>> {
    if let Ok(v) = var.get_values::<f64, _>(..) {
        return Ok(v);
    }
    if let Ok(v) = var.get_values::<f32, _>(..) {
        return Ok(v.into_iter().map(f64::from).collect());
    }
    if let Ok(v) = var.get_values::<i64, _>(..) {
        return Ok(v.into_iter().map(|x| x as f64).collect());
    }
    if let Ok(v) = var.get_values::<i32, _>(..) {
        return Ok(v.into_iter().map(f64::from).collect());
    }
    if let Ok(v) = var.get_values::<i16, _>(..) {
        return Ok(v.into_iter().map(f64::from).collect());
    }
    if let Ok(v) = var.get_values::<u16, _>(..) {
        return Ok(v.into_iter().map(f64::from).collect());
    }
    if let Ok(v) = var.get_values::<i8, _>(..) {
        return Ok(v.into_iter().map(f64::from).collect());
    }
    var.get_values::<u8, _>(..)
        .map(|v| v.into_iter().map(f64::from).collect())
        .map_err(|e| {
            NetCdfError::InvalidFormat(format!("Failed to read {}: {}", var.name(), e))
        })
}

/// Convert a netCDF variable into a labeled array, applying CF packing.
///
/// Values equal to `_FillValue` or `missing_value` become NaN, then
/// `scale_factor` and `add_offset` are applied. The packing attributes are
/// removed from the result.
pub(crate) fn convert_variable(var: &netcdf::Variable) -> NetCdfResult<Variable> {
    let dims: Vec<String> = var.dimensions().iter().map(|d| d.name()).collect();
    let shape: Vec<usize> = var.dimensions().iter().map(|d| d.len()).collect();

    let fill_value = get_f64_attr(var, "_FillValue");
    let missing_value = get_f64_attr(var, "missing_value");
    let scale_factor = get_f64_attr(var, "scale_factor").unwrap_or(1.0);
    let add_offset = get_f64_attr(var, "add_offset").unwrap_or(0.0);

    let values: Vec<f64> = read_values(var)?
        .into_iter()
        .map(|v| {
            if Some(v) == fill_value || Some(v) == missing_value {
                f64::NAN
            } else {
                v * scale_factor + add_offset
            }
        })
        .collect();

    let mut out = Variable::from_shape_vec(&dims, &shape, values)?;
    out.attrs = read_attrs(var.attributes());
    for key in ["_FillValue", "missing_value", "scale_factor", "add_offset"] {
        out.attrs.remove(key);
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_convert_attr_numbers_and_text() {
        assert_eq!(
            convert_attr(AttributeValue::Str("K".into())),
            Some(AttrValue::Text("K".into()))
        );
        assert_eq!(
            convert_attr(AttributeValue::Short(-9999)),
            Some(AttrValue::Number(-9999.0))
        );
        assert_eq!(
            convert_attr(AttributeValue::Uchars(vec![1, 2, 4])),
            Some(AttrValue::Numbers(vec![1.0, 2.0, 4.0]))
        );
    }
}
