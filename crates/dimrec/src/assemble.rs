//! The array assembly engine.
//!
//! Turns a bound record instance into a labeled container by consuming its
//! field registry: data values are coerced and cast, scalar coordinates are
//! broadcast against the sizes realized by the data fields, attributes and
//! the name are collected, and the record's construction factory produces
//! the final container. Assembly never mutates the record.

use std::any::type_name;

use fxhash::FxHashMap;
use indexmap::IndexMap;

use crate::{
    data::{
        container::{DataArray, DataArrayParts, Dataset, DatasetParts, Variable},
        input::ArrayInput,
    },
    error::{AssemblyError, Result},
    record::Record,
    schema::{
        field::{BoundValue, FieldSpec},
        registry::{self, merge_in_place},
    },
};

/// Assembles a record instance into a single-variable labeled array.
///
/// Only the first-declared `Data` field is used; subsequent data fields are
/// silently ignored on this path.
pub fn to_dataarray<R: Record>(record: &R) -> Result<DataArray> {
    let registry = registry::of::<R>()?;
    let values = merge_in_place(record.bound_values()?, |(name, _)| *name);
    let mut sizes = FxHashMap::default();

    let data_spec = registry
        .first_data()
        .ok_or_else(|| missing_data::<R>())?;
    let value = lookup(&values, data_spec.name).ok_or_else(|| missing_data::<R>())?;
    let variable = realize_data(data_spec, value, &mut sizes).ok_or_else(|| missing_data::<R>())??;

    let coords = realize_coords(registry.coord_entries(), &values, &sizes)?;
    let attrs = collect_attrs(registry.attr_entries(), &values);
    let name = registry.name_entry().and_then(|spec| match lookup(&values, spec.name) {
        Some(BoundValue::Name(name)) => Some(name.clone()),
        _ => None,
    });

    R::factory().data_array(DataArrayParts {
        name,
        variable,
        coords,
        attrs,
    })
}

/// Assembles a record instance into a multi-variable labeled collection,
/// one data variable per `Data` field.
pub fn to_dataset<R: Record>(record: &R) -> Result<Dataset> {
    let registry = registry::of::<R>()?;
    let values = merge_in_place(record.bound_values()?, |(name, _)| *name);
    let mut sizes = FxHashMap::default();

    let mut data_vars = IndexMap::new();
    for spec in registry.data_entries() {
        let value = match lookup(&values, spec.name) {
            Some(value) => value,
            None => continue,
        };
        if let Some(variable) = realize_data(spec, value, &mut sizes) {
            data_vars.insert(spec.name.to_string(), variable?);
        }
    }

    if data_vars.is_empty() {
        return Err(missing_data::<R>().into());
    }

    let coords = realize_coords(registry.coord_entries(), &values, &sizes)?;
    let attrs = collect_attrs(registry.attr_entries(), &values);

    R::factory().dataset(DatasetParts {
        data_vars,
        coords,
        attrs,
    })
}

fn missing_data<R: Record>() -> AssemblyError {
    AssemblyError::MissingDataField {
        type_name: type_name::<R>().to_string(),
    }
}

fn lookup<'v>(values: &'v [(&'static str, BoundValue)], name: &str) -> Option<&'v BoundValue> {
    values
        .iter()
        .find(|(field, _)| *field == name)
        .map(|(_, value)| value)
}

fn cast_error(spec: &FieldSpec, source: crate::error::CastError) -> AssemblyError {
    AssemblyError::ElementTypeCast {
        field: spec.name.to_string(),
        source,
    }
}

fn rank_checked(spec: &FieldSpec, variable: Variable) -> Result<Variable> {
    let found = variable.data().ndim();
    if found != spec.dims.len() {
        return Err(AssemblyError::DimensionRank {
            field: spec.name.to_string(),
            expected: spec.dims.len(),
            found,
        }
        .into());
    }

    Ok(variable)
}

/// Realizes a data field: coerce, cast, rank-check, and record the realized
/// size of every dimension the value pins down. Returns `None` when the
/// bound value is not array-like.
fn realize_data(
    spec: &FieldSpec,
    value: &BoundValue,
    sizes: &mut FxHashMap<&'static str, usize>,
) -> Option<Result<Variable>> {
    let realized = match value {
        BoundValue::Array(ArrayInput::Scalar(scalar)) => match scalar.to_buffer(&[], &spec.dtype) {
            Ok(buffer) => rank_checked(spec, Variable::new(spec.dims.clone(), buffer)),
            Err(source) => return Some(Err(cast_error(spec, source).into())),
        },
        BoundValue::Array(ArrayInput::Array(buffer)) => {
            let cast = match spec.dtype.dtype() {
                Some(dtype) => match buffer.clone().cast(&dtype) {
                    Ok(cast) => cast,
                    Err(source) => return Some(Err(cast_error(spec, source).into())),
                },
                None => buffer.clone(),
            };
            rank_checked(spec, Variable::new(spec.dims.clone(), cast))
        }
        BoundValue::Nested(array) => rank_checked(
            spec,
            Variable::new(spec.dims.clone(), array.data().clone()),
        ),
        _ => return None,
    };

    if let Ok(variable) = &realized {
        for (dim, size) in variable.dims().iter().zip(variable.shape()) {
            sizes.entry(dim).or_insert(*size);
        }
    }

    Some(realized)
}

/// Realizes a coordinate field. Scalars are broadcast to the sizes realized
/// for the coordinate's declared dimensions; a dimension not pinned down by
/// any data field broadcasts to length 1.
fn realize_coord(
    spec: &FieldSpec,
    value: &BoundValue,
    sizes: &FxHashMap<&'static str, usize>,
) -> Option<Result<Variable>> {
    let realized = match value {
        BoundValue::Array(ArrayInput::Scalar(scalar)) => {
            let shape: Vec<usize> = spec
                .dims
                .iter()
                .map(|dim| sizes.get(dim).copied().unwrap_or(1))
                .collect();
            match scalar.to_buffer(&shape, &spec.dtype) {
                Ok(buffer) => Ok(Variable::new(spec.dims.clone(), buffer)),
                Err(source) => return Some(Err(cast_error(spec, source).into())),
            }
        }
        BoundValue::Array(ArrayInput::Array(buffer)) => {
            let cast = match spec.dtype.dtype() {
                Some(dtype) => match buffer.clone().cast(&dtype) {
                    Ok(cast) => cast,
                    Err(source) => return Some(Err(cast_error(spec, source).into())),
                },
                None => buffer.clone(),
            };
            rank_checked(spec, Variable::new(spec.dims.clone(), cast))
        }
        BoundValue::Nested(array) => Ok(Variable::new(
            spec.dims.clone(),
            array.data().clone(),
        )),
        _ => return None,
    };

    Some(realized)
}

fn realize_coords<'s>(
    specs: impl Iterator<Item = &'s FieldSpec>,
    values: &[(&'static str, BoundValue)],
    sizes: &FxHashMap<&'static str, usize>,
) -> Result<IndexMap<String, Variable>> {
    let mut coords = IndexMap::new();
    for spec in specs {
        let value = match lookup(values, spec.name) {
            Some(value) => value,
            None => continue,
        };
        if let Some(variable) = realize_coord(spec, value, sizes) {
            coords.insert(spec.name.to_string(), variable?);
        }
    }

    Ok(coords)
}

fn collect_attrs<'s>(
    specs: impl Iterator<Item = &'s FieldSpec>,
    values: &[(&'static str, BoundValue)],
) -> IndexMap<String, crate::data::input::AttrValue> {
    let mut attrs = IndexMap::new();
    for spec in specs {
        if let Some(BoundValue::Attr(value)) = lookup(values, spec.name) {
            attrs.insert(spec.name.to_string(), value.clone());
        }
    }

    attrs
}

#[cfg(test)]
mod tests {
    use ndarray::{arr1, arr2};

    use super::*;
    use crate::{
        data::dtype::{DType, ElementType},
        error::Error,
        schema::{Dims, Role},
    };

    struct Wave {
        data: ArrayInput,
        time: ArrayInput,
        units: &'static str,
    }

    impl Record for Wave {
        fn raw_specs() -> Result<Vec<FieldSpec>> {
            Ok(vec![
                FieldSpec {
                    name: "data",
                    role: Some(Role::Data),
                    dims: Dims::from_slice(&["time"]),
                    dtype: ElementType::Typed(DType::Float64),
                    nested: None,
                },
                FieldSpec {
                    name: "time",
                    role: Some(Role::Coord),
                    dims: Dims::from_slice(&["time"]),
                    dtype: ElementType::Typed(DType::Int64),
                    nested: None,
                },
                FieldSpec {
                    name: "units",
                    role: Some(Role::Attr),
                    dims: Dims::new(),
                    dtype: ElementType::Any,
                    nested: None,
                },
            ])
        }

        fn bound_values(&self) -> Result<Vec<(&'static str, BoundValue)>> {
            Ok(vec![
                ("data", BoundValue::Array(self.data.clone())),
                ("time", BoundValue::Array(self.time.clone())),
                ("units", BoundValue::Attr(self.units.into())),
            ])
        }

        fn set_array(&mut self, name: &str, value: ArrayInput) -> bool {
            match name {
                "data" => {
                    self.data = value;
                    true
                }
                "time" => {
                    self.time = value;
                    true
                }
                _ => false,
            }
        }
    }

    fn wave(data: ArrayInput, time: ArrayInput) -> Wave {
        Wave {
            data,
            time,
            units: "V",
        }
    }

    #[test]
    fn data_is_cast_to_declared_dtype() {
        let record = wave(arr1(&[1i64, 2, 3]).into(), arr1(&[0i64, 1, 2]).into());
        let array = to_dataarray(&record).unwrap();

        assert_eq!(array.dtype(), DType::Float64);
        assert_eq!(array.shape(), &[3]);
        assert_eq!(array.dims(), &["time"]);
    }

    #[test]
    fn scalar_coord_broadcasts_to_realized_size() {
        let record = wave(arr1(&[1.0, 2.0, 3.0]).into(), 7i64.into());
        let array = to_dataarray(&record).unwrap();

        let time = array.coord("time").unwrap();
        assert_eq!(time.shape(), &[3]);
        assert_eq!(time.dtype(), DType::Int64);
        assert_eq!(array.attr("units").cloned(), Some("V".into()));
    }

    #[test]
    fn rank_mismatch_is_rejected() {
        let record = wave(arr2(&[[1.0, 2.0], [3.0, 4.0]]).into(), 0i64.into());
        let err = to_dataarray(&record).unwrap_err();

        assert!(matches!(
            *err,
            Error::Assembly(AssemblyError::DimensionRank { ref field, expected: 1, found: 2 })
                if field == "data"
        ));
    }

    struct Bare {
        label: &'static str,
    }

    impl Record for Bare {
        fn raw_specs() -> Result<Vec<FieldSpec>> {
            Ok(vec![FieldSpec::pass_through("label")])
        }

        fn bound_values(&self) -> Result<Vec<(&'static str, BoundValue)>> {
            let _ = self.label;
            Ok(vec![("label", BoundValue::Skip)])
        }

        fn set_array(&mut self, _name: &str, _value: ArrayInput) -> bool {
            false
        }
    }

    #[test]
    fn record_without_data_field_is_rejected() {
        let err = to_dataarray(&Bare { label: "x" }).unwrap_err();
        assert!(matches!(
            *err,
            Error::Assembly(AssemblyError::MissingDataField { .. })
        ));

        let err = to_dataset(&Bare { label: "x" }).unwrap_err();
        assert!(matches!(
            *err,
            Error::Assembly(AssemblyError::MissingDataField { .. })
        ));
    }

    #[test]
    fn dataset_collects_every_data_field() {
        struct Pair {
            a: ArrayInput,
            b: ArrayInput,
        }

        impl Record for Pair {
            fn raw_specs() -> Result<Vec<FieldSpec>> {
                let spec = |name| FieldSpec {
                    name,
                    role: Some(Role::Data),
                    dims: Dims::from_slice(&["x"]),
                    dtype: ElementType::Typed(DType::Float32),
                    nested: None,
                };
                Ok(vec![spec("a"), spec("b")])
            }

            fn bound_values(&self) -> Result<Vec<(&'static str, BoundValue)>> {
                Ok(vec![
                    ("a", BoundValue::Array(self.a.clone())),
                    ("b", BoundValue::Array(self.b.clone())),
                ])
            }

            fn set_array(&mut self, name: &str, value: ArrayInput) -> bool {
                match name {
                    "a" => {
                        self.a = value;
                        true
                    }
                    "b" => {
                        self.b = value;
                        true
                    }
                    _ => false,
                }
            }
        }

        let record = Pair {
            a: arr1(&[1.0f32, 2.0]).into(),
            b: arr1(&[3i64, 4]).into(),
        };
        let dataset = to_dataset(&record).unwrap();

        assert_eq!(dataset.data_vars().len(), 2);
        assert_eq!(dataset.data_var("b").unwrap().dtype(), DType::Float32);
    }
}
