//! Shared fixtures for the integration tests.
#![allow(dead_code)]

use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

/// Small dataset in the `Value` column layout of the World Bank export.
pub const GDP_CSV: &str = "\
Country Name,Country Code,Year,Value
India,IN,2009,1341886602798
India,IN,2010,1675615335600
India,IN,2011,1823049927772
India,IN,2012,1827637859136
India,IN,2013,1856722121394
India,IN,2014,2039127446299
India,IN,2015,2103587813812
India,IN,2016,2294797980509
China,CN,2010,6087164527421
China,CN,2011,7551500427050
China,CN,2012,8532230724142
United States,US,2010,14964372000000
United States,US,2011,15517926000000
Narnia,XX,2010,1000
";

/// Write `contents` to `name` inside a fresh temporary directory.
pub fn write_fixture(name: &str, contents: &str) -> (TempDir, PathBuf) {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join(name);
    fs::write(&path, contents).expect("write fixture");
    (dir, path)
}

pub fn gdp_fixture() -> (TempDir, PathBuf) {
    write_fixture("gdp.csv", GDP_CSV)
}
