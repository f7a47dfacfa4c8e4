//! Loading, normalization and caching of the dataset file.

mod common;

use gdp_dashboard::data::{DataLoader, LoaderError, GDP, REGION, VALUE_ALIAS};
use std::fs;
use std::sync::Arc;

#[test]
fn value_column_is_loaded_as_gdp() {
    let (_dir, path) = common::gdp_fixture();
    let df = DataLoader::load_csv(&path).unwrap();

    let names: Vec<&str> = df.get_column_names().iter().map(|c| c.as_str()).collect();
    assert!(names.contains(&GDP));
    assert!(!names.contains(&VALUE_ALIAS));

    let gdp = df.column(GDP).unwrap().f64().unwrap();
    assert_eq!(gdp.get(0), Some(1341886602798.0));
    assert_eq!(df.height(), 14);
}

#[test]
fn regions_follow_the_code_table() {
    let (_dir, path) = common::gdp_fixture();
    let df = DataLoader::load_csv(&path).unwrap();

    let regions: Vec<Option<&str>> = df.column(REGION).unwrap().str().unwrap().into_iter().collect();
    assert_eq!(regions[0], Some("Asia"));
    assert_eq!(regions[8], Some("Asia"));
    assert_eq!(regions[11], Some("North America"));
    assert_eq!(regions[13], None);
}

#[test]
fn file_without_codes_has_no_region() {
    let (_dir, path) = common::write_fixture(
        "plain.csv",
        "Country Name,Year,GDP\nIndia,2010,100\nIndia,2011,110\n",
    );
    let df = DataLoader::load_csv(&path).unwrap();
    assert!(df.column(REGION).is_err());
}

#[test]
fn missing_country_name_fails_fast() {
    let (_dir, path) = common::write_fixture("bad.csv", "Country,Year,GDP\nIndia,2010,100\n");
    let err = DataLoader::load_csv(&path).unwrap_err();
    assert!(matches!(err, LoaderError::MissingColumn(ref c) if c == "Country Name"));
    assert_eq!(err.to_string(), "Required column 'Country Name' not found");
}

#[test]
fn missing_file_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let loader = DataLoader::new(dir.path().join("absent.csv"));
    assert!(matches!(loader.dataset(), Err(LoaderError::Io { .. })));
}

#[test]
fn dataset_is_read_only_once() {
    let (_dir, path) = common::gdp_fixture();
    let loader = DataLoader::new(&path);
    assert!(!loader.is_loaded());

    let first = loader.dataset().unwrap();
    assert!(loader.is_loaded());

    // Later calls must not touch the file again
    fs::remove_file(&path).unwrap();
    let second = loader.dataset().unwrap();
    assert!(Arc::ptr_eq(&first, &second));
}

#[test]
fn failed_load_is_retried() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("late.csv");
    let loader = DataLoader::new(&path);
    assert!(loader.dataset().is_err());

    fs::write(&path, common::GDP_CSV).unwrap();
    assert_eq!(loader.dataset().unwrap().height(), 14);
}

#[test]
fn late_fractional_values_still_load() {
    let mut csv = String::from("Country Name,Year,Value\n");
    for i in 0..10_050 {
        if i < 10_010 {
            csv.push_str(&format!("Country {},{},{}\n", i % 50, 1900 + i / 50, 1000 + i));
        } else {
            csv.push_str(&format!("Country {},{},{}.5\n", i % 50, 1900 + i / 50, 1000 + i));
        }
    }
    let (_dir, path) = common::write_fixture("long.csv", &csv);

    let df = DataLoader::load_csv(&path).unwrap();
    assert_eq!(df.height(), 10_050);
    let gdp = df.column(GDP).unwrap().f64().unwrap();
    assert_eq!(gdp.get(0), Some(1000.0));
    assert_eq!(gdp.get(10_049), Some(11_049.5));
    assert_eq!(gdp.null_count(), 0);
}

#[test]
fn ragged_row_is_a_csv_error() {
    let (_dir, path) = common::write_fixture(
        "ragged.csv",
        "Country Name,Year,GDP\nIndia,2010,100\nIndia,2010,100,7,8\n",
    );
    assert!(matches!(
        DataLoader::load_csv(&path),
        Err(LoaderError::CsvError(_))
    ));
}

#[test]
fn invalid_utf8_is_a_csv_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("binary.csv");
    let mut bytes = b"Country Name,Year,GDP\n".to_vec();
    bytes.extend_from_slice(b"\xff\xfe,2010,100\n");
    fs::write(&path, bytes).unwrap();

    assert!(matches!(
        DataLoader::load_csv(&path),
        Err(LoaderError::CsvError(_))
    ));
}
