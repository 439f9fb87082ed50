//! Reading NetCDF-4 / HDF5 files into datasets.

use std::path::{Path, PathBuf};

use lizard_common::time::{is_cf_time_units, CfTimeUnits, UNIX_TIME_UNITS};
use lizard_common::{AttrValue, Dataset, Variable};
use tracing::{debug, warn};

use crate::error::{NetCdfError, NetCdfResult};
use crate::native::{convert_attr, convert_variable, read_attrs, silence_hdf5_errors};

/// An open NetCDF/HDF5 file.
pub struct NcReader {
    file: netcdf::File,
    path: PathBuf,
}

impl NcReader {
    /// Open a file for reading.
    pub fn open<P: AsRef<Path>>(path: P) -> NetCdfResult<Self> {
        silence_hdf5_errors();
        let path = path.as_ref();
        if !path.exists() {
            return Err(NetCdfError::IoError(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("{} does not exist", path.display()),
            )));
        }
        let file = netcdf::open(path).map_err(|e| {
            NetCdfError::InvalidFormat(format!("Failed to open {}: {}", path.display(), e))
        })?;
        debug!(file = %path.display(), "Opened NetCDF file");
        Ok(Self {
            file,
            path: path.to_path_buf(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read a variable addressed by a slash separated group path such as
    /// `S1/ScanTime/Year`. A plain name reads from the root group.
    pub fn variable(&self, path: &str) -> NetCdfResult<Variable> {
        let parts: Vec<&str> = path.split('/').filter(|p| !p.is_empty()).collect();
        match parts.as_slice() {
            [] => Err(NetCdfError::MissingData("empty variable path".to_string())),
            [name] => {
                let var = self
                    .file
                    .variable(name)
                    .ok_or_else(|| NetCdfError::MissingData(format!("{} variable", path)))?;
                convert_variable(&var)
            }
            [first, rest @ ..] => {
                let group = self
                    .file
                    .group(first)?
                    .ok_or_else(|| NetCdfError::MissingData(format!("{} group", first)))?;
                variable_in_group(&group, rest, path)
            }
        }
    }

    /// Check whether a (possibly nested) variable exists.
    pub fn has_variable(&self, path: &str) -> bool {
        self.variable(path).is_ok()
    }

    /// Global attribute of the root group, if present.
    pub fn global_attr(&self, name: &str) -> Option<AttrValue> {
        if !self.file.attributes().any(|a| a.name() == name) {
            return None;
        }
        self.file
            .attribute(name)
            .and_then(|a| a.value().ok())
            .and_then(convert_attr)
    }

    /// Global text attribute of the root group.
    pub fn global_str_attr(&self, name: &str) -> NetCdfResult<String> {
        match self.global_attr(name) {
            Some(AttrValue::Text(s)) => Ok(s),
            Some(_) => Err(NetCdfError::InvalidFormat(format!(
                "attribute {} is not text",
                name
            ))),
            None => Err(NetCdfError::MissingData(format!("{} attribute", name))),
        }
    }

    /// Read every root-group variable into a dataset.
    ///
    /// One-dimensional variables named after their dimension become
    /// coordinates. Variables with CF time units are converted to unix
    /// seconds.
    pub fn read_dataset(&self) -> NetCdfResult<Dataset> {
        let mut ds = Dataset::new();
        ds.attrs = read_attrs(self.file.attributes());

        for nc_var in self.file.variables() {
            let name = nc_var.name();
            let mut var = match convert_variable(&nc_var) {
                Ok(v) => v,
                Err(e) => {
                    warn!(variable = %name, error = %e, "Skipping unreadable variable");
                    continue;
                }
            };
            decode_time(&name, &mut var);

            if var.dims.len() == 1 && var.dims[0] == name {
                ds.insert_coord(&name, var)?;
            } else {
                ds.insert_var(&name, var)?;
            }
        }

        debug!(
            file = %self.path.display(),
            variables = ds.var_names().len(),
            coords = ds.coord_names().len(),
            "Read dataset"
        );
        Ok(ds)
    }
}

fn variable_in_group(
    group: &netcdf::Group<'_>,
    parts: &[&str],
    full_path: &str,
) -> NetCdfResult<Variable> {
    match parts {
        [] => Err(NetCdfError::MissingData(format!("{} variable", full_path))),
        [name] => {
            let var = group
                .variable(name)
                .ok_or_else(|| NetCdfError::MissingData(format!("{} variable", full_path)))?;
            convert_variable(&var)
        }
        [first, rest @ ..] => {
            let child = group
                .group(first)
                .ok_or_else(|| NetCdfError::MissingData(format!("{} group", first)))?;
            variable_in_group(&child, rest, full_path)
        }
    }
}

/// Replace CF-encoded time values with unix seconds.
fn decode_time(name: &str, var: &mut Variable) {
    let Some(units) = var.attr_str("units").map(str::to_string) else {
        return;
    };
    if !is_cf_time_units(&units) {
        return;
    }
    match CfTimeUnits::parse(&units) {
        Ok(cf) => {
            var.data.mapv_inplace(|v| cf.to_unix_seconds(v));
            var.attrs
                .insert("units".to_string(), AttrValue::from(UNIX_TIME_UNITS));
        }
        Err(e) => warn!(variable = %name, error = %e, "Leaving time variable undecoded"),
    }
}

/// Open a file and read all root-group variables.
pub fn open_dataset<P: AsRef<Path>>(path: P) -> NetCdfResult<Dataset> {
    NcReader::open(path)?.read_dataset()
}
