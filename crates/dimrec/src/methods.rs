//! Opt-in construction methods for record types.
//!
//! `AsDataArray` and `AsDataset` add NumPy-style constructors to a record:
//! `new` binds user data, `empty`/`zeros`/`ones`/`full` synthesize it from a
//! shape and a fill strategy. Every method has a default body, so opting in
//! is a one-line `impl`. Records that want finer control can bypass these
//! and call [`to_dataarray`]/[`to_dataset`] on a hand-built instance.
//!
//! [`to_dataarray`]: crate::assemble::to_dataarray
//! [`to_dataset`]: crate::assemble::to_dataset

use std::any::type_name;

use crate::{
    assemble,
    data::{
        buffer::{ArrayBuffer, Scalar},
        container::{DataArray, Dataset},
        dtype::DType,
        input::ArrayInput,
    },
    error::{AssemblyError, Result},
    record::Record,
    schema::{field::FieldSpec, registry},
};

/// Fill strategy for the shape-driven constructors.
#[derive(Debug, Clone, PartialEq)]
pub enum Fill {
    /// Allocate without a requested value. Contents are zero.
    Empty,
    Zeros,
    Ones,
    /// Broadcast one scalar over the whole array.
    Value(Scalar),
}

/// Synthesizes the buffer of one data field from a shape and fill strategy.
///
/// The declared element type applies unless overridden; an unconstrained
/// field defaults to `float64`.
fn fill_buffer(
    spec: &FieldSpec,
    shape: &[usize],
    fill: &Fill,
    dtype: Option<DType>,
) -> Result<ArrayBuffer> {
    if shape.len() != spec.dims.len() {
        return Err(AssemblyError::ShapeRank {
            expected: spec.dims.len(),
            found: shape.len(),
        }
        .into());
    }

    let dtype = dtype
        .or_else(|| spec.dtype.dtype())
        .unwrap_or(DType::Float64);
    let buffer = match fill {
        Fill::Empty | Fill::Zeros => ArrayBuffer::zeros(shape, &dtype),
        Fill::Ones => ArrayBuffer::ones(shape, &dtype),
        Fill::Value(value) => ArrayBuffer::full(shape, value, &dtype).map_err(|source| {
            AssemblyError::ElementTypeCast {
                field: spec.name.to_string(),
                source,
            }
        })?,
    };

    Ok(buffer)
}

fn missing_data<R: Record>() -> AssemblyError {
    AssemblyError::MissingDataField {
        type_name: type_name::<R>().to_string(),
    }
}

/// Binds a value to a data field by name, or fails. `set_array` cannot reach
/// `Dataof` fields, so records using those must be constructed directly.
fn bind_array<R: Record>(record: &mut R, spec: &FieldSpec, value: ArrayInput) -> Result<()> {
    if !record.set_array(spec.name, value) {
        return Err(AssemblyError::UnbindableField {
            field: spec.name.to_string(),
        }
        .into());
    }

    Ok(())
}

/// Single-variable constructors for a record with one primary data field.
pub trait AsDataArray: Record + Default {
    /// Assembles this instance into a labeled array.
    fn to_dataarray(&self) -> Result<DataArray> {
        assemble::to_dataarray(self)
    }

    /// Builds a labeled array from user data, with every other field taking
    /// its `Default` value.
    fn new(data: impl Into<ArrayInput>) -> Result<DataArray> {
        let registry = registry::of::<Self>()?;
        let spec = registry.first_data().ok_or_else(missing_data::<Self>)?;

        let mut record = Self::default();
        bind_array(&mut record, spec, data.into())?;
        assemble::to_dataarray(&record)
    }

    /// Builds a labeled array whose data is synthesized from `shape` and
    /// `fill`, optionally overriding the declared element type.
    fn filled(shape: &[usize], fill: Fill, dtype: Option<DType>) -> Result<DataArray> {
        let registry = registry::of::<Self>()?;
        let spec = registry.first_data().ok_or_else(missing_data::<Self>)?;
        let buffer = fill_buffer(spec, shape, &fill, dtype)?;

        let mut record = Self::default();
        bind_array(&mut record, spec, buffer.into())?;
        assemble::to_dataarray(&record)
    }

    /// Builds a labeled array without a requested fill value.
    fn empty(shape: &[usize]) -> Result<DataArray> {
        Self::filled(shape, Fill::Empty, None)
    }

    fn empty_dtype(shape: &[usize], dtype: DType) -> Result<DataArray> {
        Self::filled(shape, Fill::Empty, Some(dtype))
    }

    /// Builds a labeled array filled with zeros.
    fn zeros(shape: &[usize]) -> Result<DataArray> {
        Self::filled(shape, Fill::Zeros, None)
    }

    fn zeros_dtype(shape: &[usize], dtype: DType) -> Result<DataArray> {
        Self::filled(shape, Fill::Zeros, Some(dtype))
    }

    /// Builds a labeled array filled with ones.
    fn ones(shape: &[usize]) -> Result<DataArray> {
        Self::filled(shape, Fill::Ones, None)
    }

    fn ones_dtype(shape: &[usize], dtype: DType) -> Result<DataArray> {
        Self::filled(shape, Fill::Ones, Some(dtype))
    }

    /// Builds a labeled array filled with one broadcast value.
    fn full(shape: &[usize], fill: impl Into<Scalar>) -> Result<DataArray> {
        Self::filled(shape, Fill::Value(fill.into()), None)
    }

    fn full_dtype(shape: &[usize], fill: impl Into<Scalar>, dtype: DType) -> Result<DataArray> {
        Self::filled(shape, Fill::Value(fill.into()), Some(dtype))
    }
}

/// Multi-variable constructors for a record with one or more data fields.
pub trait AsDataset: Record + Default {
    /// Assembles this instance into a labeled array collection.
    fn to_dataset(&self) -> Result<Dataset> {
        assemble::to_dataset(self)
    }

    /// Builds a collection from user data, bound positionally to the data
    /// fields in declaration order.
    fn new<I>(vars: I) -> Result<Dataset>
    where
        I: IntoIterator,
        I::Item: Into<ArrayInput>,
    {
        let registry = registry::of::<Self>()?;
        let specs: Vec<&FieldSpec> = registry.data_entries().collect();
        let values: Vec<ArrayInput> = vars.into_iter().map(Into::into).collect();
        if values.len() != specs.len() {
            return Err(AssemblyError::DataVariableCount {
                expected: specs.len(),
                found: values.len(),
            }
            .into());
        }

        let mut record = Self::default();
        for (spec, value) in specs.iter().zip(values) {
            bind_array(&mut record, spec, value)?;
        }
        assemble::to_dataset(&record)
    }

    /// Builds a collection with every data variable synthesized from `shape`
    /// and `fill`, optionally overriding the declared element types.
    fn filled(shape: &[usize], fill: Fill, dtype: Option<DType>) -> Result<Dataset> {
        let registry = registry::of::<Self>()?;

        let mut record = Self::default();
        for spec in registry.data_entries() {
            let buffer = fill_buffer(spec, shape, &fill, dtype)?;
            bind_array(&mut record, spec, buffer.into())?;
        }
        assemble::to_dataset(&record)
    }

    /// Builds a collection without a requested fill value.
    fn empty(shape: &[usize]) -> Result<Dataset> {
        Self::filled(shape, Fill::Empty, None)
    }

    fn empty_dtype(shape: &[usize], dtype: DType) -> Result<Dataset> {
        Self::filled(shape, Fill::Empty, Some(dtype))
    }

    /// Builds a collection with every data variable filled with zeros.
    fn zeros(shape: &[usize]) -> Result<Dataset> {
        Self::filled(shape, Fill::Zeros, None)
    }

    fn zeros_dtype(shape: &[usize], dtype: DType) -> Result<Dataset> {
        Self::filled(shape, Fill::Zeros, Some(dtype))
    }

    /// Builds a collection with every data variable filled with ones.
    fn ones(shape: &[usize]) -> Result<Dataset> {
        Self::filled(shape, Fill::Ones, None)
    }

    fn ones_dtype(shape: &[usize], dtype: DType) -> Result<Dataset> {
        Self::filled(shape, Fill::Ones, Some(dtype))
    }

    /// Builds a collection with every data variable filled with one value.
    fn full(shape: &[usize], fill: impl Into<Scalar>) -> Result<Dataset> {
        Self::filled(shape, Fill::Value(fill.into()), None)
    }

    fn full_dtype(shape: &[usize], fill: impl Into<Scalar>, dtype: DType) -> Result<Dataset> {
        Self::filled(shape, Fill::Value(fill.into()), Some(dtype))
    }
}
