//! A prelude importing everything needed to declare and assemble records.
//!
//! ```
//! use dimrec::prelude::*;
//! ```

pub use dimrec_macros::Record;

pub use crate::{
    assemble::{to_dataarray, to_dataset},
    data::{
        buffer::{ArrayBuffer, Scalar},
        container::{DataArray, Dataset, Variable},
        dtype::{DType, ElementType, TimeUnit},
        input::{ArrayInput, AttrValue},
    },
    dims,
    error::{Error, Result},
    factory::{ContainerFactory, DefaultFactory},
    methods::{AsDataArray, AsDataset, Fill},
    record::Record,
    schema::{
        dims::{Dim, DimsSpec},
        element::Any,
        field::{Attr, Coord, Coordof, Data, Dataof, Name},
        Dims,
    },
};
