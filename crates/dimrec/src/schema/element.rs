//! Type-level element-type constraints.

use crate::data::dtype::{DType, ElementType};

/// Marker for an unconstrained element type.
///
/// Values bound to an `Any`-typed field keep their own element type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Any;

/// The element-type constraint of a `Data` or `Coord` field.
pub trait ElementSpec {
    fn element_type() -> ElementType;
}

impl ElementSpec for Any {
    fn element_type() -> ElementType {
        ElementType::Any
    }
}

macro_rules! impl_element_spec {
    ($($ty:ty => $dtype:expr;)+) => {
        $(
            impl ElementSpec for $ty {
                fn element_type() -> ElementType {
                    ElementType::Typed($dtype)
                }
            }
        )+
    };
}

impl_element_spec! {
    bool => DType::Bool;
    i8 => DType::Int8;
    i16 => DType::Int16;
    i32 => DType::Int32;
    i64 => DType::Int64;
    u8 => DType::UInt8;
    u16 => DType::UInt16;
    u32 => DType::UInt32;
    u64 => DType::UInt64;
    f32 => DType::Float32;
    f64 => DType::Float64;
    String => DType::Str;
}
