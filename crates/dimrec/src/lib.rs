//! dimrec
//! ======
//!
//! Declarative, strongly-typed labeled arrays. A record type annotated with
//! `#[derive(Record)]` declares the data variables, coordinates, attributes
//! and name of a multi-dimensional container at the type level; dimrec
//! resolves the declaration into a cached field registry and assembles
//! instances into ready-to-use containers, with NumPy-style `empty`/`zeros`/
//! `ones`/`full` constructors on the side.
//!
//! The role of each field is determined solely by its outer wrapper type:
//!
//! | Wrapper           | Role                                                |
//! |-------------------|-----------------------------------------------------|
//! | [`Data<D, T>`]    | data variable with dims `D` and element type `T`    |
//! | [`Coord<D, T>`]   | coordinate with dims `D` and element type `T`       |
//! | [`Dataof<R>`]     | data variable shaped like the record type `R`       |
//! | [`Coordof<R>`]    | coordinate shaped like the record type `R`          |
//! | [`Attr<T>`]       | free-form attribute                                 |
//! | [`Name<T>`]       | display name of a single-variable container         |
//!
//! Any other field type is a pass-through field, ignored by assembly.
//!
//! Dimension names are type-level markers declared with the [`dims!`] macro;
//! element types are ordinary Rust primitives, `String`, or the [`Any`]
//! wildcard. A `#[dimrec(dtype = "…")]` field attribute selects an element
//! type by its textual descriptor instead, which is the only way to declare
//! the temporal `datetime64`/`timedelta64` element types.
//!
//! # Example
//!
//! ```
//! use dimrec::prelude::*;
//! use ndarray::arr2;
//!
//! dims! {
//!     pub dim Y = "y";
//!     pub dim X = "x";
//! }
//!
//! #[derive(Record, Default)]
//! struct Image {
//!     data: Data<(Y, X), f64>,
//!     y: Coord<Y, i64>,
//!     x: Coord<X, i64>,
//!     units: Attr<String>,
//! }
//!
//! impl AsDataArray for Image {}
//!
//! # fn main() -> dimrec::error::Result<()> {
//! // Bind user data; the other fields take their `Default` values.
//! let image = Image::new(arr2(&[[0.0, 1.0], [2.0, 3.0]]))?;
//! assert_eq!(image.dims(), &["y", "x"]);
//! assert_eq!(image.shape(), &[2, 2]);
//!
//! // Or synthesize the data from a shape.
//! let ones = Image::ones(&[8, 8])?;
//! assert_eq!(ones.dtype(), DType::Float64);
//! # Ok(())
//! # }
//! ```
//!
//! Records with several `Data` fields assemble into a multi-variable
//! [`Dataset`] through [`AsDataset`] or [`to_dataset`]; `#[dimrec(flatten)]`
//! splices the fields of a base record in place, and
//! `#[dimrec(factory = …)]` plugs a custom [`ContainerFactory`] into
//! container construction.

pub mod assemble;
pub mod data;
pub mod error;
pub mod factory;
pub mod methods;
pub mod prelude;
pub mod record;
pub mod schema;

pub use dimrec_macros::Record;

pub use crate::{
    assemble::{to_dataarray, to_dataset},
    data::{
        buffer::{ArrayBuffer, Scalar},
        container::{DataArray, DataArrayParts, Dataset, DatasetParts, Variable},
        dtype::{DType, ElementType, TimeUnit},
        input::{ArrayInput, AttrValue, Element},
    },
    error::{AssemblyError, CastError, Error, Result, SpecError},
    factory::{ContainerFactory, DefaultFactory},
    methods::{AsDataArray, AsDataset, Fill},
    record::Record,
    schema::{
        dims::{Dim, DimsSpec},
        element::{Any, ElementSpec},
        field::{Attr, BoundValue, Coord, Coordof, Data, Dataof, FieldHint, FieldSpec, Name},
        registry::{clear_registry_cache, FieldRegistry},
        Dims, Role,
    },
};
