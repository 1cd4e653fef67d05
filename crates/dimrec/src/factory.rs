//! Pluggable construction factories.
//!
//! A factory names the concrete constructors used for the single-variable
//! and multi-variable containers. Records pick a factory with the
//! `#[dimrec(factory = …)]` attribute; without one the factory of a
//! flattened base record applies, and finally [`DefaultFactory`].

use crate::{
    data::container::{DataArray, DataArrayParts, Dataset, DatasetParts},
    error::Result,
};

/// Builds the final containers from assembled parts.
///
/// Implementations may post-process the parts, e.g. to attach conventions
/// or derive extra attributes, but must not start assembly of their own.
pub trait ContainerFactory: Send + Sync {
    /// Constructs a single-variable labeled array.
    fn data_array(&self, parts: DataArrayParts) -> Result<DataArray> {
        Ok(DataArray::from_parts(parts))
    }

    /// Constructs a multi-variable labeled array collection.
    fn dataset(&self, parts: DatasetParts) -> Result<Dataset> {
        Ok(Dataset::from_parts(parts))
    }
}

/// The built-in factory, constructing the containers verbatim.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultFactory;

impl ContainerFactory for DefaultFactory {}
