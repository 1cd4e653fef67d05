use dimrec::{prelude::*, AssemblyError};
use ndarray::arr2;

dims! {
    pub dim X = "x";
    pub dim Y = "y";
}

#[derive(Record, Default)]
struct RGBImage {
    red: Data<(Y, X), f64>,
    green: Data<(Y, X), f64>,
    blue: Data<(Y, X), f64>,
    y: Coord<Y, i64>,
    x: Coord<X, i64>,
    units: Attr<String>,
}

impl AsDataset for RGBImage {}

#[test]
fn new_binds_data_variables_positionally() {
    let dataset = RGBImage::new([
        arr2(&[[0.0, 1.0], [2.0, 3.0]]),
        arr2(&[[4.0, 5.0], [6.0, 7.0]]),
        arr2(&[[8.0, 9.0], [10.0, 11.0]]),
    ])
    .unwrap();

    let names: Vec<&str> = dataset.data_vars().keys().map(String::as_str).collect();
    assert_eq!(names, ["red", "green", "blue"]);
    assert_eq!(dataset.data_var("green").unwrap().shape(), &[2, 2]);
    assert_eq!(dataset.coord("y").unwrap().shape(), &[2]);
    assert_eq!(dataset.coord("x").unwrap().shape(), &[2]);
}

#[test]
fn arity_mismatch_is_rejected() {
    let err = RGBImage::new([arr2(&[[0.0]]), arr2(&[[1.0]])]).unwrap_err();
    assert!(matches!(
        *err,
        dimrec::Error::Assembly(AssemblyError::DataVariableCount {
            expected: 3,
            found: 2
        })
    ));
}

#[test]
fn shape_constructors_fill_every_data_variable() {
    let dataset = RGBImage::zeros(&[4, 4]).unwrap();

    assert_eq!(dataset.data_vars().len(), 3);
    for variable in dataset.data_vars().values() {
        assert_eq!(variable.shape(), &[4, 4]);
        assert_eq!(variable.dtype(), DType::Float64);
    }

    let full = RGBImage::full(&[1, 1], 255i64).unwrap();
    let red = full.data_var("red").unwrap().data().as_f64().unwrap().clone();
    assert_eq!(red.as_slice().unwrap(), &[255.0]);
}

#[test]
fn attributes_travel_with_the_dataset() {
    let record = RGBImage {
        red: Data::new(arr2(&[[1.0]])),
        green: Data::new(arr2(&[[1.0]])),
        blue: Data::new(arr2(&[[1.0]])),
        units: Attr("W/m^2".to_string()),
        ..Default::default()
    };
    let dataset = to_dataset(&record).unwrap();

    assert_eq!(
        dataset.attr("units"),
        Some(&AttrValue::Str("W/m^2".to_string()))
    );
}

#[derive(Record, Default)]
struct Metadata {
    units: Attr<String>,
}

impl AsDataset for Metadata {}

#[test]
fn dataset_without_data_fields_is_rejected() {
    let err = Metadata::default().to_dataset().unwrap_err();
    assert!(matches!(
        *err,
        dimrec::Error::Assembly(AssemblyError::MissingDataField { .. })
    ));
}

#[derive(Record, Default)]
struct Ragged {
    a: Data<X, f64>,
    b: Data<X, f64>,
    x: Coord<X, i64>,
}

impl AsDataset for Ragged {}

#[test]
fn first_data_variable_pins_the_dimension_size() {
    let dataset = Ragged::new([vec![1.0, 2.0, 3.0], vec![4.0]]).unwrap();

    // No cross-variable validation: the first realized size wins and the
    // scalar coord broadcasts against it.
    assert_eq!(dataset.data_var("a").unwrap().shape(), &[3]);
    assert_eq!(dataset.data_var("b").unwrap().shape(), &[1]);
    assert_eq!(dataset.coord("x").unwrap().shape(), &[3]);
}
