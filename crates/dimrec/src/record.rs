//! The [`Record`] trait, normally implemented with `#[derive(Record)]`.

use crate::{
    data::input::ArrayInput,
    error::Result,
    factory::{ContainerFactory, DefaultFactory},
    schema::field::{BoundValue, FieldSpec},
};

/// A field-annotated record type describing a labeled array.
///
/// Implemented by `#[derive(Record)]`, which classifies every field by the
/// outer wrapper of its declared type and generates the methods below.
/// Fields of a base record embedded with `#[dimrec(flatten)]` are spliced in
/// place; a field redeclared by the outer record replaces the base field in
/// its original position.
pub trait Record: Sized + 'static {
    /// Field specs in declaration order, before override merging.
    fn raw_specs() -> Result<Vec<FieldSpec>>;

    /// Bound field values, with the same names and order as [`raw_specs`].
    ///
    /// [`raw_specs`]: Record::raw_specs
    fn bound_values(&self) -> Result<Vec<(&'static str, BoundValue)>>;

    /// Binds an array-like value to the `Data` or `Coord` field with the
    /// given name. Returns `false` if no such field exists.
    fn set_array(&mut self, name: &str, value: ArrayInput) -> bool;

    /// The construction factory for this record type.
    ///
    /// The derive resolves this most-derived-first: an explicit
    /// `#[dimrec(factory = …)]` attribute wins, else the factory of the
    /// first flattened base record, else the built-in default.
    fn factory() -> &'static dyn ContainerFactory {
        &DefaultFactory
    }
}
