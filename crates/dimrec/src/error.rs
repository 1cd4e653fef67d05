//! Everything related to errors.
//!
//! All fallible operations in this crate return [`Result`], which boxes the
//! top-level [`Error`] enum. Errors are grouped by the phase that produces
//! them: [`SpecError`] for schema resolution, [`AssemblyError`] for array
//! assembly, and [`CastError`] for element-type conversions (always surfaced
//! wrapped in an `AssemblyError`).

use thiserror::Error;

use crate::data::dtype::DType;

/// Alias that is used for most `Result`s in this crate.
pub type Result<T> = std::result::Result<T, Box<Error>>;

/// Schema resolution errors.
///
/// These surface when a record type's field registry is computed for the
/// first time, never during assembly of a well-resolved type.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SpecError {
    #[error("unsupported element type descriptor: {descriptor}")]
    BadDescriptor { descriptor: String },
    #[error("cyclic nested record: {type_name} refers to itself")]
    Cycle { type_name: String },
    #[error("nested record {type_name} declares no data field")]
    NestedWithoutData { type_name: String },
}

/// Element-type conversion errors.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum CastError {
    #[error("cannot cast {from} to {to}")]
    Unsupported { from: DType, to: DType },
    #[error("cannot parse {value:?} as {to}")]
    Parse { value: String, to: DType },
}

/// Array assembly errors.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum AssemblyError {
    #[error("record {type_name} has no usable data field")]
    MissingDataField { type_name: String },
    #[error("field {field} cannot be bound by name")]
    UnbindableField { field: String },
    #[error("field {field} declares {expected} dimension(s), value has rank {found}")]
    DimensionRank {
        field: String,
        expected: usize,
        found: usize,
    },
    #[error("shape rank must be {expected}, got {found}")]
    ShapeRank { expected: usize, found: usize },
    #[error("field {field} is not castable to its declared element type")]
    ElementTypeCast {
        field: String,
        #[source]
        source: CastError,
    },
    #[error("expected {expected} data variable(s), got {found}")]
    DataVariableCount { expected: usize, found: usize },
}

/// All different errors.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum Error {
    #[error("spec error: {0}")]
    Spec(#[from] SpecError),
    #[error("assembly error: {0}")]
    Assembly(#[from] AssemblyError),
}

impl From<SpecError> for Box<Error> {
    fn from(err: SpecError) -> Self {
        Box::new(Error::Spec(err))
    }
}

impl From<AssemblyError> for Box<Error> {
    fn from(err: AssemblyError) -> Self {
        Box::new(Error::Assembly(err))
    }
}
