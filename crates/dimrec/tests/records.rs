use std::sync::Arc;

use dimrec::{
    prelude::*, schema::registry, AssemblyError, BoundValue, DataArrayParts, FieldHint, FieldSpec,
    Role, SpecError,
};
use ndarray::arr1;

dims! {
    pub dim X = "x";
}

#[derive(Record, Default)]
struct Base {
    data: Data<X, f64>,
    units: Attr<String>,
}

#[derive(Record, Default)]
struct Extended {
    #[dimrec(flatten)]
    base: Base,
    long_name: Attr<String>,
}

impl AsDataArray for Extended {}

#[test]
fn flatten_splices_base_fields_in_place() {
    let reg = registry::of::<Extended>().unwrap();
    let names: Vec<&str> = reg.entries().iter().map(|spec| spec.name).collect();
    assert_eq!(names, ["data", "units", "long_name"]);
}

#[test]
fn flattened_base_fields_take_part_in_assembly() {
    let record = Extended {
        base: Base {
            data: Data::new(vec![1.0, 2.0]),
            units: Attr("K".to_string()),
        },
        long_name: Attr("temperature".to_string()),
    };
    let array = to_dataarray(&record).unwrap();

    assert_eq!(array.dims(), &["x"]);
    assert_eq!(array.attr("units"), Some(&AttrValue::Str("K".to_string())));
    assert_eq!(
        array.attr("long_name"),
        Some(&AttrValue::Str("temperature".to_string()))
    );
}

#[derive(Record, Default)]
struct Overriding {
    #[dimrec(flatten)]
    base: Base,
    units: Attr<String>,
}

#[test]
fn redeclared_field_replaces_the_base_field_in_place() {
    let reg = registry::of::<Overriding>().unwrap();
    let names: Vec<&str> = reg.entries().iter().map(|spec| spec.name).collect();
    assert_eq!(names, ["data", "units"]);

    let record = Overriding {
        base: Base {
            data: Data::new(vec![0.0]),
            units: Attr("base".to_string()),
        },
        units: Attr("outer".to_string()),
    };
    let array = to_dataarray(&record).unwrap();
    assert_eq!(
        array.attr("units"),
        Some(&AttrValue::Str("outer".to_string()))
    );
}

#[derive(Record, Default)]
struct Renamed {
    #[dimrec(rename = "lon")]
    longitude: Coord<X, f64>,
    data: Data<X, f64>,
}

#[test]
fn rename_changes_the_registry_name() {
    let reg = registry::of::<Renamed>().unwrap();
    let lon = reg
        .entries()
        .iter()
        .find(|spec| spec.name == "lon")
        .unwrap();
    assert_eq!(lon.role, Some(Role::Coord));
}

#[derive(Record, Default)]
struct Commented {
    data: Data<X, f64>,
    comment: String,
}

#[test]
fn unwrapped_fields_pass_through() {
    let reg = registry::of::<Commented>().unwrap();
    let comment = reg
        .entries()
        .iter()
        .find(|spec| spec.name == "comment")
        .unwrap();
    assert_eq!(comment.role, None);

    let mut record = Commented {
        data: Data::new(vec![1.0, 2.0]),
        comment: "ignored".to_string(),
    };
    assert!(!record.set_array("comment", 1.0f64.into()));

    let array = to_dataarray(&record).unwrap();
    assert!(array.attrs().is_empty());
}

#[test]
fn set_array_reaches_through_flattened_bases() {
    let mut record = Extended::default();
    assert!(record.set_array("data", arr1(&[5.0, 6.0]).into_dyn().into()));
    assert!(!record.set_array("nope", 0.0f64.into()));

    let array = to_dataarray(&record).unwrap();
    assert_eq!(array.shape(), &[2]);
}

#[derive(Debug, Default)]
struct NamedFactory;

impl ContainerFactory for NamedFactory {
    fn data_array(&self, parts: DataArrayParts) -> dimrec::Result<DataArray> {
        Ok(DataArray::from_parts(parts).with_name("tagged"))
    }
}

#[derive(Record, Default)]
#[dimrec(factory = NamedFactory)]
struct Tagged {
    data: Data<X, f64>,
}

impl AsDataArray for Tagged {}

#[derive(Record, Default)]
struct TaggedChild {
    #[dimrec(flatten)]
    base: Tagged,
}

impl AsDataArray for TaggedChild {}

#[test]
fn factory_attribute_post_processes_the_container() {
    let array = Tagged::zeros(&[2]).unwrap();
    assert_eq!(array.name(), Some("tagged"));
}

#[test]
fn factory_is_inherited_through_the_first_flattened_base() {
    let array = TaggedChild::zeros(&[2]).unwrap();
    assert_eq!(array.name(), Some("tagged"));
}

#[derive(Record, Default)]
struct Axis {
    data: Data<X, i64>,
    units: Attr<String>,
}

#[derive(Record, Default)]
struct WithAxis {
    data: Data<X, f64>,
    x: Coordof<Axis>,
}

#[test]
fn coordof_takes_dims_and_dtype_from_the_nested_record() {
    let reg = registry::of::<WithAxis>().unwrap();
    let x = reg.entries().iter().find(|spec| spec.name == "x").unwrap();
    assert_eq!(x.role, Some(Role::Coord));
    assert_eq!(x.dims.as_slice(), &["x"]);
    assert!(x.nested.is_some());

    let record = WithAxis {
        data: Data::new(vec![1.0, 2.0]),
        x: Coordof(Axis {
            data: Data::new(vec![10i64, 20]),
            units: Attr("m".to_string()),
        }),
    };
    let array = to_dataarray(&record).unwrap();

    let x = array.coord("x").unwrap();
    assert_eq!(x.dtype(), DType::Int64);
    assert_eq!(
        x.data().as_i64().unwrap().clone().as_slice().unwrap(),
        &[10, 20]
    );
    // Attributes of the nested record stay with it, not the outer array.
    assert!(array.attrs().is_empty());
}

#[derive(Record, Default)]
struct Paired {
    a: Dataof<Axis>,
    b: Data<X, f64>,
}

impl AsDataset for Paired {}

#[test]
fn dataof_contributes_a_data_variable() {
    let record = Paired {
        a: Dataof(Axis {
            data: Data::new(vec![1i64, 2]),
            units: Attr::default(),
        }),
        b: Data::new(vec![0.5, 1.5]),
    };
    let dataset = record.to_dataset().unwrap();

    assert_eq!(dataset.data_vars().len(), 2);
    assert_eq!(dataset.data_var("a").unwrap().dtype(), DType::Int64);
    assert_eq!(dataset.data_var("b").unwrap().dtype(), DType::Float64);
}

#[derive(Record, Default)]
struct Wrapped {
    a: Dataof<Axis>,
}

impl AsDataArray for Wrapped {}

#[test]
fn binding_a_nested_data_field_by_name_is_rejected() {
    // A Dataof field cannot absorb a raw array, so the constructor must
    // fail instead of assembling the default nested record.
    let err = Wrapped::new(arr1(&[1i64, 2, 3]).into_dyn()).unwrap_err();
    assert!(matches!(
        *err,
        dimrec::Error::Assembly(AssemblyError::UnbindableField { ref field }) if field == "a"
    ));
}

#[derive(Record, Default)]
struct NoData {
    units: Attr<String>,
}

#[derive(Record, Default)]
struct WrapsNoData {
    data: Data<X, f64>,
    c: Coordof<NoData>,
}

#[test]
fn nesting_a_record_without_data_is_a_spec_error() {
    let err = registry::of::<WrapsNoData>().unwrap_err();
    assert!(matches!(
        *err,
        dimrec::Error::Spec(SpecError::NestedWithoutData { .. })
    ));
}

struct Loopy;

impl dimrec::Record for Loopy {
    fn raw_specs() -> dimrec::Result<Vec<FieldSpec>> {
        Ok(vec![<Coordof<Loopy> as FieldHint>::spec("inner")?])
    }

    fn bound_values(&self) -> dimrec::Result<Vec<(&'static str, BoundValue)>> {
        Ok(vec![])
    }

    fn set_array(&mut self, _name: &str, _value: ArrayInput) -> bool {
        false
    }
}

#[test]
fn self_referential_records_are_rejected() {
    let err = registry::of::<Loopy>().unwrap_err();
    assert!(matches!(*err, dimrec::Error::Spec(SpecError::Cycle { .. })));
}

#[derive(Record, Default)]
struct Cached {
    data: Data<X, f64>,
}

#[test]
fn registries_are_cached_per_type() {
    let first = registry::of::<Cached>().unwrap();
    let second = registry::of::<Cached>().unwrap();
    assert!(Arc::ptr_eq(&first, &second));

    dimrec::clear_registry_cache();
    let third = registry::of::<Cached>().unwrap();
    assert_eq!(third.entries(), first.entries());
}

#[test]
fn dimension_rank_error_includes_the_assembled_field() {
    let record = Extended::default();
    // Default data is a scalar; the declared rank is one.
    let err = to_dataarray(&record).unwrap_err();
    assert!(matches!(
        *err,
        dimrec::Error::Assembly(AssemblyError::DimensionRank {
            expected: 1,
            found: 0,
            ..
        })
    ));
}
