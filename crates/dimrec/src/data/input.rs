//! Array-like input values and attribute values.
//!
//! [`ArrayInput`] is what `Data` and `Coord` fields hold: either a scalar
//! that is broadcast during assembly, or an actual array. Conversions exist
//! for primitive scalars, `Vec<T>` and `ndarray` arrays.

use ndarray::{Array, ArrayD, Dimension, IxDyn};

use crate::data::buffer::{ArrayBuffer, Scalar};

/// Element types that can be stored in an [`ArrayBuffer`].
pub trait Element: Clone {
    fn buffer(array: ArrayD<Self>) -> ArrayBuffer;
    fn scalar(self) -> Scalar;
}

macro_rules! impl_element {
    ($($ty:ty => $variant:ident, $scalar:expr;)+) => {
        $(
            impl Element for $ty {
                fn buffer(array: ArrayD<Self>) -> ArrayBuffer {
                    ArrayBuffer::$variant(array)
                }

                fn scalar(self) -> Scalar {
                    $scalar(self)
                }
            }
        )+
    };
}

impl_element! {
    bool => Bool, Scalar::Bool;
    i8 => Int8, |v| Scalar::Int(v as i64);
    i16 => Int16, |v| Scalar::Int(v as i64);
    i32 => Int32, |v| Scalar::Int(v as i64);
    i64 => Int64, Scalar::Int;
    u8 => UInt8, |v| Scalar::Int(v as i64);
    u16 => UInt16, |v| Scalar::Int(v as i64);
    u32 => UInt32, |v| Scalar::Int(v as i64);
    u64 => UInt64, |v| Scalar::Int(v as i64);
    f32 => Float32, |v| Scalar::Float(v as f64);
    f64 => Float64, Scalar::Float;
    String => Str, Scalar::Str;
}

/// An array-like value bound to a `Data` or `Coord` field.
#[derive(Debug, Clone, PartialEq)]
pub enum ArrayInput {
    /// A scalar, broadcast against realized dimension sizes at assembly.
    Scalar(Scalar),
    /// An array used as-is, up to an element-type cast.
    Array(ArrayBuffer),
}

impl ArrayInput {
    pub fn is_scalar(&self) -> bool {
        matches!(self, ArrayInput::Scalar(_))
    }
}

impl From<Scalar> for ArrayInput {
    fn from(value: Scalar) -> Self {
        ArrayInput::Scalar(value)
    }
}

impl From<ArrayBuffer> for ArrayInput {
    fn from(value: ArrayBuffer) -> Self {
        ArrayInput::Array(value)
    }
}

macro_rules! impl_input_from_scalar {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl From<$ty> for ArrayInput {
                fn from(value: $ty) -> Self {
                    ArrayInput::Scalar(value.into())
                }
            }
        )+
    };
}

impl_input_from_scalar!(bool, i8, i16, i32, i64, u8, u16, u32, u64, f32, f64, String, &str);

impl<T: Element> From<Vec<T>> for ArrayInput {
    fn from(values: Vec<T>) -> Self {
        let len = values.len();
        // Infallible, the shape matches the element count.
        let array = ArrayD::from_shape_vec(IxDyn(&[len]), values).unwrap();
        ArrayInput::Array(T::buffer(array))
    }
}

impl<T: Element, D: Dimension> From<Array<T, D>> for ArrayInput {
    fn from(array: Array<T, D>) -> Self {
        ArrayInput::Array(T::buffer(array.into_dyn()))
    }
}

/// A free-form attribute value.
#[derive(Debug, Clone, PartialEq)]
pub enum AttrValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
}

macro_rules! impl_attr_from_int {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl From<$ty> for AttrValue {
                fn from(value: $ty) -> Self {
                    AttrValue::Int(value as i64)
                }
            }
        )+
    };
}

impl_attr_from_int!(i8, i16, i32, i64, u8, u16, u32, u64, usize);

impl From<bool> for AttrValue {
    fn from(value: bool) -> Self {
        AttrValue::Bool(value)
    }
}

impl From<f32> for AttrValue {
    fn from(value: f32) -> Self {
        AttrValue::Float(value as f64)
    }
}

impl From<f64> for AttrValue {
    fn from(value: f64) -> Self {
        AttrValue::Float(value)
    }
}

impl From<String> for AttrValue {
    fn from(value: String) -> Self {
        AttrValue::Str(value)
    }
}

impl From<&str> for AttrValue {
    fn from(value: &str) -> Self {
        AttrValue::Str(value.to_string())
    }
}
