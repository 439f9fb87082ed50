//! Writing datasets to NetCDF-4.

use std::path::Path;

use lizard_common::{AttrValue, Attrs, Dataset, Variable};
use tracing::debug;

use crate::error::NetCdfResult;
use crate::native::silence_hdf5_errors;

/// Write a dataset to `path`, replacing any existing file.
///
/// Every variable is stored as `f64` except bit-flag variables (those with a
/// `flag_masks` attribute), which are stored as `u8`. NaN becomes 0 for them.
pub fn write_dataset<P: AsRef<Path>>(ds: &Dataset, path: P) -> NetCdfResult<()> {
    silence_hdf5_errors();
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let mut file = netcdf::create(path)?;

    for (name, len) in ds.dims() {
        file.add_dimension(&name, len)?;
    }

    for (name, var) in ds.coords().chain(ds.data_vars()) {
        write_variable(&mut file, name, var)?;
    }

    for (key, value) in &ds.attrs {
        match value {
            AttrValue::Text(s) => file.add_attribute(key, s.as_str())?,
            AttrValue::Number(v) => file.add_attribute(key, *v)?,
            AttrValue::Numbers(v) => file.add_attribute(key, v.clone())?,
        };
    }

    debug!(
        file = %path.display(),
        variables = ds.var_names().len(),
        "Wrote dataset"
    );
    Ok(())
}

fn write_variable(file: &mut netcdf::FileMut, name: &str, var: &Variable) -> NetCdfResult<()> {
    let dims: Vec<&str> = var.dims.iter().map(String::as_str).collect();
    let values = var.to_vec();

    if var.attrs.contains_key("flag_masks") {
        let packed: Vec<u8> = values
            .iter()
            .map(|v| if v.is_finite() { *v as u8 } else { 0 })
            .collect();
        let mut nc_var = file.add_variable::<u8>(name, &dims)?;
        put_attrs(&mut nc_var, &var.attrs)?;
        nc_var.put_values(&packed, ..)?;
    } else {
        let mut nc_var = file.add_variable::<f64>(name, &dims)?;
        // _FillValue has to be defined before any data is written
        if values.iter().any(|v| v.is_nan()) {
            nc_var.put_attribute("_FillValue", f64::NAN)?;
        }
        put_attrs(&mut nc_var, &var.attrs)?;
        nc_var.put_values(&values, ..)?;
    }
    Ok(())
}

fn put_attrs(nc_var: &mut netcdf::VariableMut<'_>, attrs: &Attrs) -> NetCdfResult<()> {
    for (key, value) in attrs {
        match value {
            AttrValue::Text(s) => nc_var.put_attribute(key, s.as_str())?,
            AttrValue::Number(v) => nc_var.put_attribute(key, *v)?,
            AttrValue::Numbers(v) => nc_var.put_attribute(key, v.clone())?,
        };
    }
    Ok(())
}
