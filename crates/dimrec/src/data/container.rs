//! Built-in labeled containers produced by the default construction factory.
//!
//! [`DataArray`] is a single-variable labeled array: one data variable plus
//! coordinates, attributes and an optional name. [`Dataset`] is a collection
//! of named data variables sharing a coordinate and attribute namespace.
//! Construction factories may post-process these, but the container shape
//! itself is fixed.

use indexmap::IndexMap;

use crate::{
    data::{buffer::ArrayBuffer, dtype::DType, input::{ArrayInput, AttrValue}},
    schema::Dims,
};

/// A named-dimension array: the unit both containers are built from.
#[derive(Debug, Clone, PartialEq)]
pub struct Variable {
    dims: Dims,
    data: ArrayBuffer,
}

impl Variable {
    pub fn new(dims: Dims, data: ArrayBuffer) -> Self {
        Variable { dims, data }
    }

    pub fn dims(&self) -> &[&'static str] {
        &self.dims
    }

    pub fn shape(&self) -> &[usize] {
        self.data.shape()
    }

    pub fn dtype(&self) -> DType {
        self.data.dtype()
    }

    pub fn data(&self) -> &ArrayBuffer {
        &self.data
    }

    pub fn into_data(self) -> ArrayBuffer {
        self.data
    }
}

/// Assembled parts handed to a factory's single-variable constructor.
#[derive(Debug, Clone)]
pub struct DataArrayParts {
    pub name: Option<String>,
    pub variable: Variable,
    pub coords: IndexMap<String, Variable>,
    pub attrs: IndexMap<String, AttrValue>,
}

/// Assembled parts handed to a factory's multi-variable constructor.
#[derive(Debug, Clone)]
pub struct DatasetParts {
    pub data_vars: IndexMap<String, Variable>,
    pub coords: IndexMap<String, Variable>,
    pub attrs: IndexMap<String, AttrValue>,
}

/// A single-variable labeled array.
#[derive(Debug, Clone, PartialEq)]
pub struct DataArray {
    name: Option<String>,
    variable: Variable,
    coords: IndexMap<String, Variable>,
    attrs: IndexMap<String, AttrValue>,
}

impl DataArray {
    pub fn from_parts(parts: DataArrayParts) -> Self {
        DataArray {
            name: parts.name,
            variable: parts.variable,
            coords: parts.coords,
            attrs: parts.attrs,
        }
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn dims(&self) -> &[&'static str] {
        self.variable.dims()
    }

    pub fn shape(&self) -> &[usize] {
        self.variable.shape()
    }

    pub fn dtype(&self) -> DType {
        self.variable.dtype()
    }

    pub fn data(&self) -> &ArrayBuffer {
        self.variable.data()
    }

    pub fn variable(&self) -> &Variable {
        &self.variable
    }

    pub fn into_variable(self) -> Variable {
        self.variable
    }

    pub fn coords(&self) -> &IndexMap<String, Variable> {
        &self.coords
    }

    pub fn coord(&self, name: &str) -> Option<&Variable> {
        self.coords.get(name)
    }

    pub fn attrs(&self) -> &IndexMap<String, AttrValue> {
        &self.attrs
    }

    pub fn attr(&self, name: &str) -> Option<&AttrValue> {
        self.attrs.get(name)
    }

    /// Renames the array, used by factories that post-process containers.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}

// A DataArray is itself array-like, so assembled containers can be bound to
// data fields of another record.
impl From<DataArray> for ArrayInput {
    fn from(array: DataArray) -> Self {
        ArrayInput::Array(array.into_variable().into_data())
    }
}

/// A multi-variable labeled array collection.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    data_vars: IndexMap<String, Variable>,
    coords: IndexMap<String, Variable>,
    attrs: IndexMap<String, AttrValue>,
}

impl Dataset {
    pub fn from_parts(parts: DatasetParts) -> Self {
        Dataset {
            data_vars: parts.data_vars,
            coords: parts.coords,
            attrs: parts.attrs,
        }
    }

    pub fn data_vars(&self) -> &IndexMap<String, Variable> {
        &self.data_vars
    }

    pub fn data_var(&self, name: &str) -> Option<&Variable> {
        self.data_vars.get(name)
    }

    pub fn coords(&self) -> &IndexMap<String, Variable> {
        &self.coords
    }

    pub fn coord(&self, name: &str) -> Option<&Variable> {
        self.coords.get(name)
    }

    pub fn attrs(&self) -> &IndexMap<String, AttrValue> {
        &self.attrs
    }

    pub fn attr(&self, name: &str) -> Option<&AttrValue> {
        self.attrs.get(name)
    }
}
