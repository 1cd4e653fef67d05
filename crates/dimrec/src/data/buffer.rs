//! Dynamically typed n-dimensional buffers backed by `ndarray`.
//!
//! [`ArrayBuffer`] is a closed enum over `ArrayD<T>` for every supported
//! element type, so values of record fields can be carried, cast and
//! broadcast without knowing their element type at compile time.

use ndarray::{ArrayD, IxDyn};

use crate::{
    data::dtype::{DType, ElementType, TimeUnit},
    error::CastError,
};

/// A dynamically typed array with dynamic rank.
#[derive(Debug, Clone, PartialEq)]
pub enum ArrayBuffer {
    Bool(ArrayD<bool>),
    Int8(ArrayD<i8>),
    Int16(ArrayD<i16>),
    Int32(ArrayD<i32>),
    Int64(ArrayD<i64>),
    UInt8(ArrayD<u8>),
    UInt16(ArrayD<u16>),
    UInt32(ArrayD<u32>),
    UInt64(ArrayD<u64>),
    Float32(ArrayD<f32>),
    Float64(ArrayD<f64>),
    Str(ArrayD<String>),
    Datetime64(ArrayD<i64>, TimeUnit),
    Timedelta64(ArrayD<i64>, TimeUnit),
}

/// Conversions of a single element to every numeric target.
///
/// Numeric conversions truncate like `as` casts do, matching NumPy's
/// same-kind casting behavior close enough for coordinate data.
trait Primitive: Clone {
    fn as_bool(&self) -> bool;
    fn as_i8(&self) -> i8;
    fn as_i16(&self) -> i16;
    fn as_i32(&self) -> i32;
    fn as_i64(&self) -> i64;
    fn as_u8(&self) -> u8;
    fn as_u16(&self) -> u16;
    fn as_u32(&self) -> u32;
    fn as_u64(&self) -> u64;
    fn as_f32(&self) -> f32;
    fn as_f64(&self) -> f64;
    fn format(&self) -> String;
}

macro_rules! impl_primitive {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl Primitive for $ty {
                fn as_bool(&self) -> bool { *self != 0 as $ty }
                fn as_i8(&self) -> i8 { *self as i8 }
                fn as_i16(&self) -> i16 { *self as i16 }
                fn as_i32(&self) -> i32 { *self as i32 }
                fn as_i64(&self) -> i64 { *self as i64 }
                fn as_u8(&self) -> u8 { *self as u8 }
                fn as_u16(&self) -> u16 { *self as u16 }
                fn as_u32(&self) -> u32 { *self as u32 }
                fn as_u64(&self) -> u64 { *self as u64 }
                fn as_f32(&self) -> f32 { *self as f32 }
                fn as_f64(&self) -> f64 { *self as f64 }
                fn format(&self) -> String { self.to_string() }
            }
        )+
    };
}

impl_primitive!(i8, i16, i32, i64, u8, u16, u32, u64, f32, f64);

impl Primitive for bool {
    fn as_bool(&self) -> bool {
        *self
    }
    fn as_i8(&self) -> i8 {
        *self as i8
    }
    fn as_i16(&self) -> i16 {
        *self as i16
    }
    fn as_i32(&self) -> i32 {
        *self as i32
    }
    fn as_i64(&self) -> i64 {
        *self as i64
    }
    fn as_u8(&self) -> u8 {
        *self as u8
    }
    fn as_u16(&self) -> u16 {
        *self as u16
    }
    fn as_u32(&self) -> u32 {
        *self as u32
    }
    fn as_u64(&self) -> u64 {
        *self as u64
    }
    fn as_f32(&self) -> f32 {
        (*self as u8) as f32
    }
    fn as_f64(&self) -> f64 {
        (*self as u8) as f64
    }
    fn format(&self) -> String {
        self.to_string()
    }
}

fn cast_primitive<T: Primitive>(array: ArrayD<T>, target: &DType) -> ArrayBuffer {
    match target {
        DType::Bool => ArrayBuffer::Bool(array.mapv(|v| v.as_bool())),
        DType::Int8 => ArrayBuffer::Int8(array.mapv(|v| v.as_i8())),
        DType::Int16 => ArrayBuffer::Int16(array.mapv(|v| v.as_i16())),
        DType::Int32 => ArrayBuffer::Int32(array.mapv(|v| v.as_i32())),
        DType::Int64 => ArrayBuffer::Int64(array.mapv(|v| v.as_i64())),
        DType::UInt8 => ArrayBuffer::UInt8(array.mapv(|v| v.as_u8())),
        DType::UInt16 => ArrayBuffer::UInt16(array.mapv(|v| v.as_u16())),
        DType::UInt32 => ArrayBuffer::UInt32(array.mapv(|v| v.as_u32())),
        DType::UInt64 => ArrayBuffer::UInt64(array.mapv(|v| v.as_u64())),
        DType::Float32 => ArrayBuffer::Float32(array.mapv(|v| v.as_f32())),
        DType::Float64 => ArrayBuffer::Float64(array.mapv(|v| v.as_f64())),
        DType::Str => ArrayBuffer::Str(array.mapv(|v| v.format())),
        DType::Datetime64(unit) => ArrayBuffer::Datetime64(array.mapv(|v| v.as_i64()), *unit),
        DType::Timedelta64(unit) => ArrayBuffer::Timedelta64(array.mapv(|v| v.as_i64()), *unit),
    }
}

fn parse_all<T: std::str::FromStr>(array: &ArrayD<String>, to: DType) -> Result<ArrayD<T>, CastError> {
    let mut parsed = Vec::with_capacity(array.len());
    for value in array.iter() {
        parsed.push(value.trim().parse::<T>().map_err(|_| CastError::Parse {
            value: value.clone(),
            to,
        })?);
    }

    // `iter` yields elements in logical order, which is the order
    // `from_shape_vec` expects.
    Ok(ArrayD::from_shape_vec(IxDyn(array.shape()), parsed).unwrap())
}

fn cast_str(array: ArrayD<String>, target: &DType) -> Result<ArrayBuffer, CastError> {
    let buffer = match target {
        DType::Str => ArrayBuffer::Str(array),
        DType::Bool => ArrayBuffer::Bool(parse_all::<bool>(&array, *target)?),
        DType::Int8 => ArrayBuffer::Int8(parse_all::<i8>(&array, *target)?),
        DType::Int16 => ArrayBuffer::Int16(parse_all::<i16>(&array, *target)?),
        DType::Int32 => ArrayBuffer::Int32(parse_all::<i32>(&array, *target)?),
        DType::Int64 => ArrayBuffer::Int64(parse_all::<i64>(&array, *target)?),
        DType::UInt8 => ArrayBuffer::UInt8(parse_all::<u8>(&array, *target)?),
        DType::UInt16 => ArrayBuffer::UInt16(parse_all::<u16>(&array, *target)?),
        DType::UInt32 => ArrayBuffer::UInt32(parse_all::<u32>(&array, *target)?),
        DType::UInt64 => ArrayBuffer::UInt64(parse_all::<u64>(&array, *target)?),
        DType::Float32 => ArrayBuffer::Float32(parse_all::<f32>(&array, *target)?),
        DType::Float64 => ArrayBuffer::Float64(parse_all::<f64>(&array, *target)?),
        DType::Datetime64(_) | DType::Timedelta64(_) => {
            return Err(CastError::Unsupported {
                from: DType::Str,
                to: *target,
            })
        }
    };

    Ok(buffer)
}

/// Rescaling to a finer unit saturates at the i64 range instead of
/// overflowing.
fn rescale(value: i64, from: TimeUnit, to: TimeUnit) -> i64 {
    let from_ticks = from.per_second();
    let to_ticks = to.per_second();
    if to_ticks >= from_ticks {
        value.saturating_mul(to_ticks / from_ticks)
    } else {
        value / (from_ticks / to_ticks)
    }
}

fn cast_datetime(array: ArrayD<i64>, unit: TimeUnit, target: &DType) -> Result<ArrayBuffer, CastError> {
    match target {
        DType::Int64 => Ok(ArrayBuffer::Int64(array)),
        DType::Datetime64(to) => Ok(ArrayBuffer::Datetime64(
            array.mapv(|v| rescale(v, unit, *to)),
            *to,
        )),
        _ => Err(CastError::Unsupported {
            from: DType::Datetime64(unit),
            to: *target,
        }),
    }
}

fn cast_timedelta(array: ArrayD<i64>, unit: TimeUnit, target: &DType) -> Result<ArrayBuffer, CastError> {
    match target {
        DType::Int64 => Ok(ArrayBuffer::Int64(array)),
        DType::Timedelta64(to) => Ok(ArrayBuffer::Timedelta64(
            array.mapv(|v| rescale(v, unit, *to)),
            *to,
        )),
        _ => Err(CastError::Unsupported {
            from: DType::Timedelta64(unit),
            to: *target,
        }),
    }
}

impl ArrayBuffer {
    /// The element type of this buffer.
    pub fn dtype(&self) -> DType {
        match self {
            ArrayBuffer::Bool(_) => DType::Bool,
            ArrayBuffer::Int8(_) => DType::Int8,
            ArrayBuffer::Int16(_) => DType::Int16,
            ArrayBuffer::Int32(_) => DType::Int32,
            ArrayBuffer::Int64(_) => DType::Int64,
            ArrayBuffer::UInt8(_) => DType::UInt8,
            ArrayBuffer::UInt16(_) => DType::UInt16,
            ArrayBuffer::UInt32(_) => DType::UInt32,
            ArrayBuffer::UInt64(_) => DType::UInt64,
            ArrayBuffer::Float32(_) => DType::Float32,
            ArrayBuffer::Float64(_) => DType::Float64,
            ArrayBuffer::Str(_) => DType::Str,
            ArrayBuffer::Datetime64(_, unit) => DType::Datetime64(*unit),
            ArrayBuffer::Timedelta64(_, unit) => DType::Timedelta64(*unit),
        }
    }

    pub fn shape(&self) -> &[usize] {
        match self {
            ArrayBuffer::Bool(a) => a.shape(),
            ArrayBuffer::Int8(a) => a.shape(),
            ArrayBuffer::Int16(a) => a.shape(),
            ArrayBuffer::Int32(a) => a.shape(),
            ArrayBuffer::Int64(a) => a.shape(),
            ArrayBuffer::UInt8(a) => a.shape(),
            ArrayBuffer::UInt16(a) => a.shape(),
            ArrayBuffer::UInt32(a) => a.shape(),
            ArrayBuffer::UInt64(a) => a.shape(),
            ArrayBuffer::Float32(a) => a.shape(),
            ArrayBuffer::Float64(a) => a.shape(),
            ArrayBuffer::Str(a) => a.shape(),
            ArrayBuffer::Datetime64(a, _) => a.shape(),
            ArrayBuffer::Timedelta64(a, _) => a.shape(),
        }
    }

    pub fn ndim(&self) -> usize {
        self.shape().len()
    }

    /// Casts this buffer to the given element type.
    pub fn cast(self, target: &DType) -> Result<ArrayBuffer, CastError> {
        if self.dtype() == *target {
            return Ok(self);
        }

        match self {
            ArrayBuffer::Bool(a) => Ok(cast_primitive(a, target)),
            ArrayBuffer::Int8(a) => Ok(cast_primitive(a, target)),
            ArrayBuffer::Int16(a) => Ok(cast_primitive(a, target)),
            ArrayBuffer::Int32(a) => Ok(cast_primitive(a, target)),
            ArrayBuffer::Int64(a) => Ok(cast_primitive(a, target)),
            ArrayBuffer::UInt8(a) => Ok(cast_primitive(a, target)),
            ArrayBuffer::UInt16(a) => Ok(cast_primitive(a, target)),
            ArrayBuffer::UInt32(a) => Ok(cast_primitive(a, target)),
            ArrayBuffer::UInt64(a) => Ok(cast_primitive(a, target)),
            ArrayBuffer::Float32(a) => Ok(cast_primitive(a, target)),
            ArrayBuffer::Float64(a) => Ok(cast_primitive(a, target)),
            ArrayBuffer::Str(a) => cast_str(a, target),
            ArrayBuffer::Datetime64(a, unit) => cast_datetime(a, unit, target),
            ArrayBuffer::Timedelta64(a, unit) => cast_timedelta(a, unit, target),
        }
    }

    fn uniform(shape: &[usize], dtype: &DType, one: bool) -> ArrayBuffer {
        let shape = IxDyn(shape);
        match dtype {
            DType::Bool => ArrayBuffer::Bool(ArrayD::from_elem(shape, one)),
            DType::Int8 => ArrayBuffer::Int8(ArrayD::from_elem(shape, one as i8)),
            DType::Int16 => ArrayBuffer::Int16(ArrayD::from_elem(shape, one as i16)),
            DType::Int32 => ArrayBuffer::Int32(ArrayD::from_elem(shape, one as i32)),
            DType::Int64 => ArrayBuffer::Int64(ArrayD::from_elem(shape, one as i64)),
            DType::UInt8 => ArrayBuffer::UInt8(ArrayD::from_elem(shape, one as u8)),
            DType::UInt16 => ArrayBuffer::UInt16(ArrayD::from_elem(shape, one as u16)),
            DType::UInt32 => ArrayBuffer::UInt32(ArrayD::from_elem(shape, one as u32)),
            DType::UInt64 => ArrayBuffer::UInt64(ArrayD::from_elem(shape, one as u64)),
            DType::Float32 => ArrayBuffer::Float32(ArrayD::from_elem(shape, (one as u8) as f32)),
            DType::Float64 => ArrayBuffer::Float64(ArrayD::from_elem(shape, (one as u8) as f64)),
            DType::Str => {
                let fill = if one { "1".to_string() } else { String::new() };
                ArrayBuffer::Str(ArrayD::from_elem(shape, fill))
            }
            DType::Datetime64(unit) => {
                ArrayBuffer::Datetime64(ArrayD::from_elem(shape, one as i64), *unit)
            }
            DType::Timedelta64(unit) => {
                ArrayBuffer::Timedelta64(ArrayD::from_elem(shape, one as i64), *unit)
            }
        }
    }

    /// A zero-filled buffer of the given shape and element type.
    pub fn zeros(shape: &[usize], dtype: &DType) -> ArrayBuffer {
        Self::uniform(shape, dtype, false)
    }

    /// A one-filled buffer of the given shape and element type.
    pub fn ones(shape: &[usize], dtype: &DType) -> ArrayBuffer {
        Self::uniform(shape, dtype, true)
    }

    /// A buffer filled with the given scalar, cast to the element type.
    pub fn full(shape: &[usize], fill: &Scalar, dtype: &DType) -> Result<ArrayBuffer, CastError> {
        fill.to_buffer(shape, &ElementType::Typed(*dtype))
    }

    pub fn as_bool(&self) -> Option<&ArrayD<bool>> {
        match self {
            ArrayBuffer::Bool(a) => Some(a),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<&ArrayD<i64>> {
        match self {
            ArrayBuffer::Int64(a) => Some(a),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<&ArrayD<f64>> {
        match self {
            ArrayBuffer::Float64(a) => Some(a),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&ArrayD<String>> {
        match self {
            ArrayBuffer::Str(a) => Some(a),
            _ => None,
        }
    }
}

/// A scalar value that can be broadcast to an [`ArrayBuffer`].
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
}

impl Scalar {
    /// The element type this scalar carries on its own.
    pub fn dtype(&self) -> DType {
        match self {
            Scalar::Bool(_) => DType::Bool,
            Scalar::Int(_) => DType::Int64,
            Scalar::Float(_) => DType::Float64,
            Scalar::Str(_) => DType::Str,
        }
    }

    /// Broadcasts this scalar to a buffer of the given shape, cast to the
    /// given element type.
    pub fn to_buffer(&self, shape: &[usize], element: &ElementType) -> Result<ArrayBuffer, CastError> {
        let shape = IxDyn(shape);
        let buffer = match self {
            Scalar::Bool(v) => ArrayBuffer::Bool(ArrayD::from_elem(shape, *v)),
            Scalar::Int(v) => ArrayBuffer::Int64(ArrayD::from_elem(shape, *v)),
            Scalar::Float(v) => ArrayBuffer::Float64(ArrayD::from_elem(shape, *v)),
            Scalar::Str(v) => ArrayBuffer::Str(ArrayD::from_elem(shape, v.clone())),
        };

        match element {
            ElementType::Any => Ok(buffer),
            ElementType::Typed(dtype) => buffer.cast(dtype),
        }
    }
}

macro_rules! impl_scalar_from_int {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl From<$ty> for Scalar {
                fn from(value: $ty) -> Self {
                    Scalar::Int(value as i64)
                }
            }
        )+
    };
}

impl_scalar_from_int!(i8, i16, i32, i64, u8, u16, u32, u64);

impl From<f32> for Scalar {
    fn from(value: f32) -> Self {
        Scalar::Float(value as f64)
    }
}

impl From<f64> for Scalar {
    fn from(value: f64) -> Self {
        Scalar::Float(value)
    }
}

impl From<bool> for Scalar {
    fn from(value: bool) -> Self {
        Scalar::Bool(value)
    }
}

impl From<String> for Scalar {
    fn from(value: String) -> Self {
        Scalar::Str(value)
    }
}

impl From<&str> for Scalar {
    fn from(value: &str) -> Self {
        Scalar::Str(value.to_string())
    }
}
