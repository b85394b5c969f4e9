use std::path::Path;

use gdat_tools::error::ExtractError;
use gdat_tools::extract::{Extracted, StatMode, extract, extract_scalar};
use gdat_tools::io::gdat::{GdatTable, parse_gdat};

fn table() -> GdatTable {
    let text = "# time A B\n0 1 10\n1 2 20\n2 3 30\n3 4 40\n";
    parse_gdat(text.as_bytes(), Path::new("mem.gdat")).unwrap()
}

#[test]
fn last_is_final_row_value() {
    let t = table();
    assert_eq!(extract(&t, "B", StatMode::Last).unwrap(), Extracted::Scalar(40.0));
    assert_eq!(extract(&t, "b", StatMode::First).unwrap(), Extracted::Scalar(10.0));
}

#[test]
fn range_is_half_open_and_clamped() {
    let t = table();
    assert_eq!(
        extract(&t, "A", StatMode::Range { start: 1, end: 3 }).unwrap(),
        Extracted::Slice(vec![2.0, 3.0])
    );
    assert_eq!(
        extract(&t, "A", StatMode::Range { start: 2, end: 100 }).unwrap(),
        Extracted::Slice(vec![3.0, 4.0])
    );
    assert_eq!(
        extract(&t, "A", StatMode::Range { start: 9, end: 100 }).unwrap(),
        Extracted::Slice(vec![])
    );
}

#[test]
fn scalar_of_range_is_its_mean() {
    let t = table();
    let v = extract_scalar(&t, "A", StatMode::Range { start: 0, end: 4 }).unwrap();
    assert!((v - 2.5).abs() < 1e-12);
    assert!(extract_scalar(&t, "A", StatMode::Range { start: 5, end: 6 }).unwrap().is_nan());
}

#[test]
fn missing_variable_is_reported() {
    let t = table();
    assert_eq!(
        extract(&t, "C", StatMode::Last).unwrap_err(),
        ExtractError::VariableNotFound("C".to_string())
    );
}

#[test]
fn stat_mode_parses() {
    assert_eq!("last".parse::<StatMode>().unwrap(), StatMode::Last);
    assert_eq!(" First ".parse::<StatMode>().unwrap(), StatMode::First);
    assert_eq!(
        "range[2:5]".parse::<StatMode>().unwrap(),
        StatMode::Range { start: 2, end: 5 }
    );
    assert_eq!(StatMode::Range { start: 2, end: 5 }.to_string(), "range[2:5]");
}

#[test]
fn range_without_bounds_is_rejected() {
    assert_eq!("range".parse::<StatMode>().unwrap_err(), ExtractError::RangeUnspecified);
    assert_eq!("range[3:]".parse::<StatMode>().unwrap_err(), ExtractError::RangeUnspecified);
    assert!(matches!(
        "median".parse::<StatMode>().unwrap_err(),
        ExtractError::UnknownMode(_)
    ));
}
