//! Field markers and per-field schema resolution.
//!
//! The role of a record field is determined solely by the outer wrapper type
//! of its declaration: [`Data`], [`Coord`], [`Coordof`], [`Dataof`],
//! [`Attr`] or [`Name`]. Fields of any other type are pass-through fields:
//! they stay ordinary fields of the record and are ignored by assembly.

use std::{any::type_name, fmt, marker::PhantomData};

use crate::{
    data::{
        buffer::Scalar,
        container::DataArray,
        dtype::{DType, ElementType},
        input::{ArrayInput, AttrValue},
    },
    error::{Result, SpecError},
    record::Record,
    schema::{dims::DimsSpec, element::ElementSpec, registry, Dims, Role},
};

/// A data variable with dimension tuple `D` and element type `T`.
pub struct Data<D, T> {
    pub value: ArrayInput,
    _spec: PhantomData<(D, T)>,
}

/// A coordinate with dimension tuple `D` and element type `T`.
///
/// A scalar value is broadcast at assembly time to the sizes realized by the
/// data fields along the coordinate's declared dimensions.
pub struct Coord<D, T> {
    pub value: ArrayInput,
    _spec: PhantomData<(D, T)>,
}

macro_rules! impl_array_wrapper {
    ($($name:ident),+) => {
        $(
            impl<D, T> $name<D, T> {
                pub fn new(value: impl Into<ArrayInput>) -> Self {
                    $name {
                        value: value.into(),
                        _spec: PhantomData,
                    }
                }
            }

            impl<D, T> Default for $name<D, T> {
                fn default() -> Self {
                    Self::new(Scalar::Int(0))
                }
            }

            impl<D, T> Clone for $name<D, T> {
                fn clone(&self) -> Self {
                    Self::new(self.value.clone())
                }
            }

            impl<D, T> fmt::Debug for $name<D, T> {
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    f.debug_tuple(stringify!($name)).field(&self.value).finish()
                }
            }
        )+
    };
}

impl_array_wrapper!(Data, Coord);

/// A coordinate whose dimensions and element type come from the data field
/// of the nested record type `R`.
#[derive(Debug, Clone, Default)]
pub struct Coordof<R>(pub R);

/// A data variable whose dimensions and element type come from the data
/// field of the nested record type `R`.
#[derive(Debug, Clone, Default)]
pub struct Dataof<R>(pub R);

/// A free-form attribute of the container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Attr<T>(pub T);

/// The display name of a single-variable container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Name<T>(pub T);

/// One entry of a record type's field registry.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldSpec {
    pub name: &'static str,
    /// `None` for pass-through fields.
    pub role: Option<Role>,
    pub dims: Dims,
    pub dtype: ElementType,
    /// Type name of the nested record for `Coordof`/`Dataof` fields.
    pub nested: Option<&'static str>,
}

impl FieldSpec {
    /// The spec of a field whose type is not a schema marker.
    pub fn pass_through(name: &'static str) -> Self {
        FieldSpec {
            name,
            role: None,
            dims: Dims::new(),
            dtype: ElementType::Any,
            nested: None,
        }
    }

    /// Replaces the element type, used by the `dtype = "…"` field attribute.
    pub fn with_dtype(mut self, dtype: DType) -> Self {
        self.dtype = ElementType::Typed(dtype);
        self
    }
}

/// The value a schema field contributes to assembly.
#[derive(Debug, Clone)]
pub enum BoundValue {
    /// An array-like value of a `Data` or `Coord` field.
    Array(ArrayInput),
    /// A `Coordof`/`Dataof` field, pre-assembled into its own container.
    /// Its attributes are discarded, only the data array is used.
    Nested(DataArray),
    /// An attribute value.
    Attr(AttrValue),
    /// A name value.
    Name(String),
    /// A pass-through field, ignored by assembly.
    Skip,
}

/// Resolution and binding of one field, implemented by the marker types.
pub trait FieldHint {
    /// Resolves the `(role, dims, element type)` triple of a field.
    fn spec(name: &'static str) -> Result<FieldSpec>;

    /// Extracts the bound value of a field.
    fn bind(&self) -> Result<BoundValue>;
}

impl<D: DimsSpec, T: ElementSpec> FieldHint for Data<D, T> {
    fn spec(name: &'static str) -> Result<FieldSpec> {
        Ok(FieldSpec {
            name,
            role: Some(Role::Data),
            dims: D::dims(),
            dtype: T::element_type(),
            nested: None,
        })
    }

    fn bind(&self) -> Result<BoundValue> {
        Ok(BoundValue::Array(self.value.clone()))
    }
}

impl<D: DimsSpec, T: ElementSpec> FieldHint for Coord<D, T> {
    fn spec(name: &'static str) -> Result<FieldSpec> {
        Ok(FieldSpec {
            name,
            role: Some(Role::Coord),
            dims: D::dims(),
            dtype: T::element_type(),
            nested: None,
        })
    }

    fn bind(&self) -> Result<BoundValue> {
        Ok(BoundValue::Array(self.value.clone()))
    }
}

/// Copies dims and element type from the first data entry of a nested
/// record's registry; later data entries are not authoritative.
fn nested_spec<R: Record>(name: &'static str, role: Role) -> Result<FieldSpec> {
    let registry = registry::of::<R>()?;
    let data = registry
        .first_data()
        .ok_or_else(|| SpecError::NestedWithoutData {
            type_name: type_name::<R>().to_string(),
        })?;

    Ok(FieldSpec {
        name,
        role: Some(role),
        dims: data.dims.clone(),
        dtype: data.dtype,
        nested: Some(type_name::<R>()),
    })
}

impl<R: Record> FieldHint for Coordof<R> {
    fn spec(name: &'static str) -> Result<FieldSpec> {
        nested_spec::<R>(name, Role::Coord)
    }

    fn bind(&self) -> Result<BoundValue> {
        Ok(BoundValue::Nested(crate::assemble::to_dataarray(&self.0)?))
    }
}

impl<R: Record> FieldHint for Dataof<R> {
    fn spec(name: &'static str) -> Result<FieldSpec> {
        nested_spec::<R>(name, Role::Data)
    }

    fn bind(&self) -> Result<BoundValue> {
        Ok(BoundValue::Nested(crate::assemble::to_dataarray(&self.0)?))
    }
}

impl<T: Clone + Into<AttrValue>> FieldHint for Attr<T> {
    fn spec(name: &'static str) -> Result<FieldSpec> {
        Ok(FieldSpec {
            name,
            role: Some(Role::Attr),
            dims: Dims::new(),
            dtype: ElementType::Any,
            nested: None,
        })
    }

    fn bind(&self) -> Result<BoundValue> {
        Ok(BoundValue::Attr(self.0.clone().into()))
    }
}

impl<T: Clone + Into<String>> FieldHint for Name<T> {
    fn spec(name: &'static str) -> Result<FieldSpec> {
        Ok(FieldSpec {
            name,
            role: Some(Role::Name),
            dims: Dims::new(),
            dtype: ElementType::Any,
            nested: None,
        })
    }

    fn bind(&self) -> Result<BoundValue> {
        Ok(BoundValue::Name(self.0.clone().into()))
    }
}
