//! Element types and their NumPy-style descriptor strings.

use std::fmt;

use crate::error::SpecError;

/// Unit of a temporal element type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimeUnit {
    Second,
    Millisecond,
    Microsecond,
    Nanosecond,
}

impl TimeUnit {
    /// Number of ticks per second.
    pub(crate) fn per_second(self) -> i64 {
        match self {
            TimeUnit::Second => 1,
            TimeUnit::Millisecond => 1_000,
            TimeUnit::Microsecond => 1_000_000,
            TimeUnit::Nanosecond => 1_000_000_000,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TimeUnit::Second => "s",
            TimeUnit::Millisecond => "ms",
            TimeUnit::Microsecond => "us",
            TimeUnit::Nanosecond => "ns",
        }
    }

    fn parse(unit: &str) -> Option<Self> {
        match unit {
            "s" => Some(TimeUnit::Second),
            "ms" => Some(TimeUnit::Millisecond),
            "us" => Some(TimeUnit::Microsecond),
            "ns" => Some(TimeUnit::Nanosecond),
            _ => None,
        }
    }
}

/// Concrete element type of an array.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DType {
    Bool,
    Int8,
    Int16,
    Int32,
    Int64,
    UInt8,
    UInt16,
    UInt32,
    UInt64,
    Float32,
    Float64,
    Str,
    Datetime64(TimeUnit),
    Timedelta64(TimeUnit),
}

impl DType {
    /// Parses a NumPy-style descriptor string.
    ///
    /// Plain scalar names (`"bool"`, `"int32"`, `"float64"`, `"str"`, the
    /// width-less aliases `"int"`, `"uint"` and `"float"`) and structured
    /// temporal descriptors (`"datetime64[ns]"`, `"timedelta64[ms]"`) are
    /// supported. Anything else fails with [`SpecError::BadDescriptor`].
    pub fn parse(descriptor: &str) -> Result<Self, SpecError> {
        let parsed = match descriptor {
            "bool" => Some(DType::Bool),
            "int8" => Some(DType::Int8),
            "int16" => Some(DType::Int16),
            "int32" => Some(DType::Int32),
            "int64" | "int" => Some(DType::Int64),
            "uint8" => Some(DType::UInt8),
            "uint16" => Some(DType::UInt16),
            "uint32" => Some(DType::UInt32),
            "uint64" | "uint" => Some(DType::UInt64),
            "float32" => Some(DType::Float32),
            "float64" | "float" => Some(DType::Float64),
            "str" | "unicode" => Some(DType::Str),
            _ => Self::parse_temporal(descriptor),
        };

        parsed.ok_or_else(|| SpecError::BadDescriptor {
            descriptor: descriptor.to_string(),
        })
    }

    fn parse_temporal(descriptor: &str) -> Option<Self> {
        let body = descriptor.strip_suffix(']')?;
        if let Some(unit) = body.strip_prefix("datetime64[") {
            return TimeUnit::parse(unit).map(DType::Datetime64);
        }
        if let Some(unit) = body.strip_prefix("timedelta64[") {
            return TimeUnit::parse(unit).map(DType::Timedelta64);
        }
        None
    }
}

impl fmt::Display for DType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DType::Bool => write!(f, "bool"),
            DType::Int8 => write!(f, "int8"),
            DType::Int16 => write!(f, "int16"),
            DType::Int32 => write!(f, "int32"),
            DType::Int64 => write!(f, "int64"),
            DType::UInt8 => write!(f, "uint8"),
            DType::UInt16 => write!(f, "uint16"),
            DType::UInt32 => write!(f, "uint32"),
            DType::UInt64 => write!(f, "uint64"),
            DType::Float32 => write!(f, "float32"),
            DType::Float64 => write!(f, "float64"),
            DType::Str => write!(f, "str"),
            DType::Datetime64(unit) => write!(f, "datetime64[{}]", unit.as_str()),
            DType::Timedelta64(unit) => write!(f, "timedelta64[{}]", unit.as_str()),
        }
    }
}

/// Element-type constraint of a schema field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementType {
    /// No dtype enforcement, the value keeps its own element type.
    Any,
    /// Values are cast to the given dtype during assembly.
    Typed(DType),
}

impl ElementType {
    pub fn dtype(&self) -> Option<DType> {
        match self {
            ElementType::Any => None,
            ElementType::Typed(dtype) => Some(*dtype),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_scalar_names() {
        assert_eq!(DType::parse("bool").unwrap(), DType::Bool);
        assert_eq!(DType::parse("int32").unwrap(), DType::Int32);
        assert_eq!(DType::parse("int").unwrap(), DType::Int64);
        assert_eq!(DType::parse("uint16").unwrap(), DType::UInt16);
        assert_eq!(DType::parse("float").unwrap(), DType::Float64);
        assert_eq!(DType::parse("str").unwrap(), DType::Str);
    }

    #[test]
    fn parse_temporal_descriptors() {
        assert_eq!(
            DType::parse("datetime64[ns]").unwrap(),
            DType::Datetime64(TimeUnit::Nanosecond)
        );
        assert_eq!(
            DType::parse("timedelta64[ms]").unwrap(),
            DType::Timedelta64(TimeUnit::Millisecond)
        );
    }

    #[test]
    fn parse_rejects_unknown_descriptors() {
        for bad in ["int7", "datetime64", "datetime64[fortnight]", ""] {
            let err = DType::parse(bad).unwrap_err();
            assert_eq!(
                err,
                SpecError::BadDescriptor {
                    descriptor: bad.to_string()
                }
            );
        }
    }

    #[test]
    fn display_round_trips() {
        for dtype in [
            DType::Bool,
            DType::Int64,
            DType::UInt8,
            DType::Float32,
            DType::Str,
            DType::Datetime64(TimeUnit::Nanosecond),
            DType::Timedelta64(TimeUnit::Second),
        ] {
            assert_eq!(DType::parse(&dtype.to_string()).unwrap(), dtype);
        }
    }
}
