//! Labeled multi-dimensional dataset container.
//!
//! A [`Dataset`] holds named [`Variable`]s. Each variable carries an ordered
//! list of dimension names, an `f64` array and an attribute map. Variables
//! are split into coordinates and data variables; the distinction only
//! matters for bookkeeping and table output. All variables sharing a
//! dimension name must agree on its length.

use std::collections::BTreeMap;
use std::fmt;

use ndarray::{concatenate, ArrayD, ArrayViewD, Axis, IxDyn};
use serde::{Deserialize, Serialize};

use crate::error::{LizardError, LizardResult};

/// Attribute map attached to variables and datasets.
pub type Attrs = BTreeMap<String, AttrValue>;

/// Attribute value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttrValue {
    Number(f64),
    Numbers(Vec<f64>),
    Text(String),
}

impl AttrValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            AttrValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            AttrValue::Number(v) => Some(*v),
            AttrValue::Numbers(v) if v.len() == 1 => Some(v[0]),
            _ => None,
        }
    }

    pub fn as_f64_vec(&self) -> Option<Vec<f64>> {
        match self {
            AttrValue::Number(v) => Some(vec![*v]),
            AttrValue::Numbers(v) => Some(v.clone()),
            AttrValue::Text(_) => None,
        }
    }
}

impl From<&str> for AttrValue {
    fn from(s: &str) -> Self {
        AttrValue::Text(s.to_string())
    }
}

impl From<String> for AttrValue {
    fn from(s: String) -> Self {
        AttrValue::Text(s)
    }
}

impl From<f64> for AttrValue {
    fn from(v: f64) -> Self {
        AttrValue::Number(v)
    }
}

impl From<Vec<f64>> for AttrValue {
    fn from(v: Vec<f64>) -> Self {
        AttrValue::Numbers(v)
    }
}

impl fmt::Display for AttrValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttrValue::Number(v) => write!(f, "{}", v),
            AttrValue::Numbers(v) => {
                let parts: Vec<String> = v.iter().map(|x| x.to_string()).collect();
                write!(f, "{}", parts.join(" "))
            }
            AttrValue::Text(s) => write!(f, "{}", s),
        }
    }
}

// ============================================================================
// Variable
// ============================================================================

/// A named-dimension array with attributes.
#[derive(Debug, Clone, PartialEq)]
pub struct Variable {
    pub dims: Vec<String>,
    pub data: ArrayD<f64>,
    pub attrs: Attrs,
}

impl Variable {
    /// Create a variable, checking that the array rank matches the dimensions.
    pub fn new<S: AsRef<str>>(dims: &[S], data: ArrayD<f64>) -> LizardResult<Self> {
        if dims.len() != data.ndim() {
            return Err(LizardError::Config(format!(
                "{} dimension names for an array of rank {}",
                dims.len(),
                data.ndim()
            )));
        }
        Ok(Self {
            dims: dims.iter().map(|d| d.as_ref().to_string()).collect(),
            data,
            attrs: Attrs::new(),
        })
    }

    /// One-dimensional variable.
    pub fn from_vec(dim: &str, values: Vec<f64>) -> Self {
        Self {
            dims: vec![dim.to_string()],
            data: ndarray::Array1::from(values).into_dyn(),
            attrs: Attrs::new(),
        }
    }

    /// Variable from a flat row-major vector and a shape.
    pub fn from_shape_vec<S: AsRef<str>>(
        dims: &[S],
        shape: &[usize],
        values: Vec<f64>,
    ) -> LizardResult<Self> {
        let data = ArrayD::from_shape_vec(IxDyn(shape), values)?;
        Self::new(dims, data)
    }

    /// Zero-dimensional variable.
    pub fn scalar(value: f64) -> Self {
        Self {
            dims: Vec::new(),
            data: ndarray::arr0(value).into_dyn(),
            attrs: Attrs::new(),
        }
    }

    /// Variable of the given shape filled with one value.
    pub fn full<S: AsRef<str>>(dims: &[S], shape: &[usize], value: f64) -> LizardResult<Self> {
        Self::new(dims, ArrayD::from_elem(IxDyn(shape), value))
    }

    pub fn with_attr(mut self, name: &str, value: impl Into<AttrValue>) -> Self {
        self.attrs.insert(name.to_string(), value.into());
        self
    }

    pub fn ndim(&self) -> usize {
        self.dims.len()
    }

    pub fn shape(&self) -> &[usize] {
        self.data.shape()
    }

    /// Axis position of a dimension.
    pub fn axis(&self, dim: &str) -> Option<usize> {
        self.dims.iter().position(|d| d == dim)
    }

    pub fn has_dim(&self, dim: &str) -> bool {
        self.axis(dim).is_some()
    }

    /// Length along a dimension.
    pub fn len_of(&self, dim: &str) -> Option<usize> {
        self.axis(dim).map(|a| self.data.len_of(Axis(a)))
    }

    /// Values in logical (row-major) order.
    pub fn to_vec(&self) -> Vec<f64> {
        self.data.iter().copied().collect()
    }

    pub fn attr_str(&self, name: &str) -> Option<&str> {
        self.attrs.get(name).and_then(AttrValue::as_str)
    }

    /// Apply a function to every element.
    pub fn map(&self, f: impl Fn(f64) -> f64) -> Self {
        Self {
            dims: self.dims.clone(),
            data: self.data.mapv(f),
            attrs: self.attrs.clone(),
        }
    }

    /// Select positions along a dimension. Variables without the dimension
    /// are returned unchanged.
    pub fn select(&self, dim: &str, indices: &[usize]) -> Self {
        match self.axis(dim) {
            Some(a) => Self {
                dims: self.dims.clone(),
                data: self.data.select(Axis(a), indices),
                attrs: self.attrs.clone(),
            },
            None => self.clone(),
        }
    }

    /// Take one position along a dimension and drop that dimension.
    pub fn index(&self, dim: &str, index: usize) -> LizardResult<Self> {
        let Some(a) = self.axis(dim) else {
            return Ok(self.clone());
        };
        let len = self.data.len_of(Axis(a));
        if index >= len {
            return Err(LizardError::DimensionMismatch {
                dim: dim.to_string(),
                existing: len,
                found: index,
            });
        }
        let mut dims = self.dims.clone();
        dims.remove(a);
        Ok(Self {
            dims,
            data: self.data.index_axis(Axis(a), index).to_owned(),
            attrs: self.attrs.clone(),
        })
    }

    /// Reorder dimensions. Names in `order` that the variable lacks are
    /// ignored; dimensions missing from `order` keep their relative order
    /// and move to the end.
    pub fn transpose<S: AsRef<str>>(&self, order: &[S]) -> Self {
        let mut perm: Vec<usize> = order
            .iter()
            .filter_map(|name| self.axis(name.as_ref()))
            .collect();
        for a in 0..self.ndim() {
            if !perm.contains(&a) {
                perm.push(a);
            }
        }
        let dims = perm.iter().map(|&a| self.dims[a].clone()).collect();
        let data = self
            .data
            .clone()
            .permuted_axes(IxDyn(&perm))
            .as_standard_layout()
            .into_owned();
        Self {
            dims,
            data,
            attrs: self.attrs.clone(),
        }
    }

    /// Insert a new dimension at `axis` by repeating the data `size` times.
    pub fn expand_dims(&self, dim: &str, size: usize, axis: usize) -> LizardResult<Self> {
        let axis = axis.min(self.ndim());
        let inserted = self.data.clone().insert_axis(Axis(axis));
        let mut shape = inserted.shape().to_vec();
        shape[axis] = size;
        let data = inserted
            .broadcast(IxDyn(&shape))
            .ok_or_else(|| LizardError::Config(format!("cannot broadcast to {:?}", shape)))?
            .to_owned();
        let mut dims = self.dims.clone();
        dims.insert(axis, dim.to_string());
        Ok(Self {
            dims,
            data,
            attrs: self.attrs.clone(),
        })
    }

    /// Broadcast to the given ordered dimensions. The variable's own
    /// dimensions must be a subset of `target`.
    pub fn broadcast_to(&self, target: &[(String, usize)]) -> LizardResult<Self> {
        for d in &self.dims {
            if !target.iter().any(|(name, _)| name == d) {
                return Err(LizardError::DimensionNotFound(d.clone()));
            }
        }

        let own_order: Vec<&str> = target
            .iter()
            .map(|(name, _)| name.as_str())
            .filter(|name| self.has_dim(name))
            .collect();
        let mut data = self.transpose(&own_order).data;

        for (pos, (name, _)) in target.iter().enumerate() {
            if !self.has_dim(name) {
                data = data.insert_axis(Axis(pos));
            }
        }

        let shape: Vec<usize> = target.iter().map(|(_, n)| *n).collect();
        let data = data
            .broadcast(IxDyn(&shape))
            .ok_or_else(|| LizardError::Config(format!("cannot broadcast to {:?}", shape)))?
            .to_owned();

        Ok(Self {
            dims: target.iter().map(|(name, _)| name.clone()).collect(),
            data,
            attrs: self.attrs.clone(),
        })
    }

    pub fn rename_dim(&mut self, from: &str, to: &str) {
        for d in self.dims.iter_mut() {
            if d == from {
                *d = to.to_string();
            }
        }
    }

    /// Concatenate variables along an existing dimension.
    pub fn concat(vars: &[&Variable], dim: &str) -> LizardResult<Self> {
        let first = vars
            .first()
            .ok_or_else(|| LizardError::VariableNotFound("nothing to concatenate".into()))?;
        let a = first
            .axis(dim)
            .ok_or_else(|| LizardError::DimensionNotFound(dim.to_string()))?;

        let mut views: Vec<ArrayViewD<'_, f64>> = Vec::with_capacity(vars.len());
        for v in vars {
            if v.dims != first.dims {
                return Err(LizardError::Config(format!(
                    "cannot concatenate {:?} with {:?}",
                    first.dims, v.dims
                )));
            }
            views.push(v.data.view());
        }

        Ok(Self {
            dims: first.dims.clone(),
            data: concatenate(Axis(a), &views)?,
            attrs: first.attrs.clone(),
        })
    }
}

// ============================================================================
// Dataset
// ============================================================================

/// A collection of named variables sharing dimensions.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    coords: BTreeMap<String, Variable>,
    data_vars: BTreeMap<String, Variable>,
    pub attrs: Attrs,
}

/// One row of [`Dataset::to_table`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableRow {
    pub kind: String,
    pub name: String,
    pub dims: String,
    pub shape: String,
}

impl Dataset {
    pub fn new() -> Self {
        Self::default()
    }

    fn check_dims(&self, var: &Variable, skip: &str) -> LizardResult<()> {
        let dims = self.dims_excluding(skip);
        for (d, n) in var.dims.iter().zip(var.shape()) {
            if let Some(existing) = dims.get(d) {
                if existing != n {
                    return Err(LizardError::DimensionMismatch {
                        dim: d.clone(),
                        existing: *existing,
                        found: *n,
                    });
                }
            }
        }
        Ok(())
    }

    /// Insert or replace a coordinate variable.
    pub fn insert_coord(&mut self, name: &str, var: Variable) -> LizardResult<()> {
        self.check_dims(&var, name)?;
        self.data_vars.remove(name);
        self.coords.insert(name.to_string(), var);
        Ok(())
    }

    /// Insert or replace a data variable.
    pub fn insert_var(&mut self, name: &str, var: Variable) -> LizardResult<()> {
        self.check_dims(&var, name)?;
        self.coords.remove(name);
        self.data_vars.insert(name.to_string(), var);
        Ok(())
    }

    /// Look up a data variable or coordinate.
    pub fn get(&self, name: &str) -> Option<&Variable> {
        self.data_vars.get(name).or_else(|| self.coords.get(name))
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut Variable> {
        match self.data_vars.get_mut(name) {
            Some(v) => Some(v),
            None => self.coords.get_mut(name),
        }
    }

    /// Like [`Dataset::get`] but missing names are an error.
    pub fn var(&self, name: &str) -> LizardResult<&Variable> {
        self.get(name)
            .ok_or_else(|| LizardError::VariableNotFound(name.to_string()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn is_coord(&self, name: &str) -> bool {
        self.coords.contains_key(name)
    }

    pub fn remove(&mut self, name: &str) -> Option<Variable> {
        self.data_vars
            .remove(name)
            .or_else(|| self.coords.remove(name))
    }

    /// Remove several variables, ignoring names that are absent.
    pub fn drop_vars<S: AsRef<str>>(&mut self, names: &[S]) {
        for name in names {
            self.remove(name.as_ref());
        }
    }

    /// Turn a data variable into a coordinate.
    pub fn set_coord(&mut self, name: &str) -> LizardResult<()> {
        let var = self
            .data_vars
            .remove(name)
            .ok_or_else(|| LizardError::VariableNotFound(name.to_string()))?;
        self.coords.insert(name.to_string(), var);
        Ok(())
    }

    pub fn coords(&self) -> impl Iterator<Item = (&String, &Variable)> {
        self.coords.iter()
    }

    pub fn data_vars(&self) -> impl Iterator<Item = (&String, &Variable)> {
        self.data_vars.iter()
    }

    pub fn coord_names(&self) -> Vec<String> {
        self.coords.keys().cloned().collect()
    }

    pub fn var_names(&self) -> Vec<String> {
        self.data_vars.keys().cloned().collect()
    }

    fn dims_excluding(&self, skip: &str) -> BTreeMap<String, usize> {
        let mut dims = BTreeMap::new();
        for (name, var) in self.coords.iter().chain(self.data_vars.iter()) {
            if name == skip {
                continue;
            }
            for (d, n) in var.dims.iter().zip(var.shape()) {
                dims.entry(d.clone()).or_insert(*n);
            }
        }
        dims
    }

    /// Dimension names and lengths.
    pub fn dims(&self) -> BTreeMap<String, usize> {
        self.dims_excluding("")
    }

    pub fn dim_len(&self, dim: &str) -> Option<usize> {
        self.dims().get(dim).copied()
    }

    /// Values of a one-dimensional coordinate or variable.
    pub fn values(&self, name: &str) -> LizardResult<Vec<f64>> {
        Ok(self.var(name)?.to_vec())
    }

    /// Rename a variable and, when `from` is also a dimension, that
    /// dimension on every variable.
    pub fn rename(&mut self, from: &str, to: &str) -> LizardResult<()> {
        let is_dim = self.dims().contains_key(from);
        if !is_dim && !self.contains(from) {
            return Err(LizardError::VariableNotFound(from.to_string()));
        }
        if let Some(var) = self.coords.remove(from) {
            self.coords.insert(to.to_string(), var);
        }
        if let Some(var) = self.data_vars.remove(from) {
            self.data_vars.insert(to.to_string(), var);
        }
        if is_dim {
            self.rename_dim(from, to);
        }
        Ok(())
    }

    /// Rename a dimension on every variable without touching variable names.
    pub fn rename_dim(&mut self, from: &str, to: &str) {
        for var in self.coords.values_mut().chain(self.data_vars.values_mut()) {
            var.rename_dim(from, to);
        }
    }

    /// Apply a list of `(old, new)` renames, skipping names that are absent.
    pub fn rename_all(&mut self, names: &[(&str, &str)]) {
        for (from, to) in names {
            let _ = self.rename(from, to);
        }
    }

    /// Positional selection along one dimension.
    pub fn isel(&self, dim: &str, indices: &[usize]) -> Self {
        Self {
            coords: self
                .coords
                .iter()
                .map(|(k, v)| (k.clone(), v.select(dim, indices)))
                .collect(),
            data_vars: self
                .data_vars
                .iter()
                .map(|(k, v)| (k.clone(), v.select(dim, indices)))
                .collect(),
            attrs: self.attrs.clone(),
        }
    }

    /// Take one position along a dimension, dropping the dimension.
    pub fn isel_drop(&self, dim: &str, index: usize) -> LizardResult<Self> {
        let mut out = Self {
            coords: BTreeMap::new(),
            data_vars: BTreeMap::new(),
            attrs: self.attrs.clone(),
        };
        for (k, v) in &self.coords {
            out.coords.insert(k.clone(), v.index(dim, index)?);
        }
        for (k, v) in &self.data_vars {
            out.data_vars.insert(k.clone(), v.index(dim, index)?);
        }
        Ok(out)
    }

    /// Label-based selection: exact match of coordinate values, in the order
    /// given.
    pub fn sel(&self, dim: &str, values: &[f64]) -> LizardResult<Self> {
        let coord = self.values(dim)?;
        let mut indices = Vec::with_capacity(values.len());
        for value in values {
            let i = coord.iter().position(|c| c == value).ok_or_else(|| {
                LizardError::CoordinateValueNotFound {
                    dim: dim.to_string(),
                    value: *value,
                }
            })?;
            indices.push(i);
        }
        Ok(self.isel(dim, &indices))
    }

    /// Index of the coordinate value closest to `value`.
    pub fn nearest_index(&self, dim: &str, value: f64) -> LizardResult<usize> {
        let coord = self.values(dim)?;
        coord
            .iter()
            .enumerate()
            .filter(|(_, c)| !c.is_nan())
            .min_by(|(_, a), (_, b)| {
                (*a - value)
                    .abs()
                    .partial_cmp(&(*b - value).abs())
                    .unwrap_or(std::cmp::Ordering::Equal)
            })
            .map(|(i, _)| i)
            .ok_or_else(|| LizardError::DimensionNotFound(dim.to_string()))
    }

    /// Indices where a one-dimensional coordinate lies in `[lo, hi]`.
    pub fn range_indices(&self, dim: &str, lo: f64, hi: f64) -> LizardResult<Vec<usize>> {
        Ok(self
            .values(dim)?
            .iter()
            .enumerate()
            .filter(|(_, v)| **v >= lo && **v <= hi)
            .map(|(i, _)| i)
            .collect())
    }

    /// Reverse the order along a dimension.
    pub fn reverse(&self, dim: &str) -> Self {
        match self.dim_len(dim) {
            Some(n) => {
                let indices: Vec<usize> = (0..n).rev().collect();
                self.isel(dim, &indices)
            }
            None => self.clone(),
        }
    }

    /// Transpose every variable to the given dimension order.
    pub fn transpose<S: AsRef<str>>(&self, order: &[S]) -> Self {
        Self {
            coords: self
                .coords
                .iter()
                .map(|(k, v)| (k.clone(), v.transpose(order)))
                .collect(),
            data_vars: self
                .data_vars
                .iter()
                .map(|(k, v)| (k.clone(), v.transpose(order)))
                .collect(),
            attrs: self.attrs.clone(),
        }
    }

    /// Concatenate datasets along a dimension. Variables carrying the
    /// dimension are joined; all others are taken from the first dataset.
    pub fn concat(datasets: &[Dataset], dim: &str) -> LizardResult<Self> {
        let first = datasets
            .first()
            .ok_or_else(|| LizardError::VariableNotFound("nothing to concatenate".into()))?;

        let join = |name: &str, var: &Variable| -> LizardResult<Variable> {
            if !var.has_dim(dim) {
                return Ok(var.clone());
            }
            let mut parts = Vec::with_capacity(datasets.len());
            for ds in datasets {
                parts.push(ds.var(name)?);
            }
            Variable::concat(&parts, dim)
        };

        let mut out = Self {
            coords: BTreeMap::new(),
            data_vars: BTreeMap::new(),
            attrs: first.attrs.clone(),
        };
        for (name, var) in &first.coords {
            out.coords.insert(name.clone(), join(name, var)?);
        }
        for (name, var) in &first.data_vars {
            out.data_vars.insert(name.clone(), join(name, var)?);
        }
        Ok(out)
    }

    /// Copy every variable and attribute of `other` into `self`, replacing
    /// variables of the same name.
    pub fn merge(&mut self, other: &Dataset) -> LizardResult<()> {
        for (name, var) in &other.coords {
            self.insert_coord(name, var.clone())?;
        }
        for (name, var) in &other.data_vars {
            self.insert_var(name, var.clone())?;
        }
        for (k, v) in &other.attrs {
            self.attrs.entry(k.clone()).or_insert_with(|| v.clone());
        }
        Ok(())
    }

    /// Describe every variable as `kind, name, dims, shape`.
    pub fn to_table(&self) -> Vec<TableRow> {
        let row = |kind: &str, name: &str, var: &Variable| TableRow {
            kind: kind.to_string(),
            name: name.to_string(),
            dims: var.dims.join(", "),
            shape: format!("{:?}", var.shape()),
        };
        self.coords
            .iter()
            .map(|(n, v)| row("coord", n, v))
            .chain(self.data_vars.iter().map(|(n, v)| row("data_var", n, v)))
            .collect()
    }
}

impl fmt::Display for Dataset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{:<10} {:<24} {:<32} shape", "kind", "name", "dims")?;
        for row in self.to_table() {
            writeln!(
                f,
                "{:<10} {:<24} {:<32} {}",
                row.kind, row.name, row.dims, row.shape
            )?;
        }
        Ok(())
    }
}
