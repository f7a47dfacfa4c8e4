//! CSV Data Loader Module
//! Loads the GDP dataset with Polars, normalizes its schema and caches it.

use super::region::Region;
use super::{COUNTRY_CODE, COUNTRY_NAME, GDP, REGION, VALUE_ALIAS, YEAR};
use polars::prelude::*;
use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock};
use thiserror::Error;
use tracing::{debug, info};

#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("Failed to open {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to load CSV: {0}")]
    CsvError(#[from] PolarsError),
    #[error("Required column '{0}' not found")]
    MissingColumn(String),
    #[error("Column '{0}' is present both directly and through an alias")]
    DuplicateColumn(String),
    #[error("Dataset is bound to {cached}, not {requested}")]
    PathMismatch { requested: PathBuf, cached: PathBuf },
}

/// Loads the dataset at most once and hands out shared, read-only handles.
pub struct DataLoader {
    file_path: PathBuf,
    df: OnceLock<Arc<DataFrame>>,
}

impl DataLoader {
    pub fn new(file_path: impl Into<PathBuf>) -> Self {
        Self {
            file_path: file_path.into(),
            df: OnceLock::new(),
        }
    }

    /// Get the cached dataset, reading the file on first use.
    ///
    /// A failed load leaves the cache empty so the next call retries.
    pub fn dataset(&self) -> Result<Arc<DataFrame>, LoaderError> {
        if let Some(df) = self.df.get() {
            return Ok(Arc::clone(df));
        }

        let df = Arc::new(Self::load_csv(&self.file_path)?);
        Ok(Arc::clone(self.df.get_or_init(|| df)))
    }

    /// Whether the dataset has already been read.
    pub fn is_loaded(&self) -> bool {
        self.df.get().is_some()
    }

    /// Get file path.
    pub fn get_file_path(&self) -> &Path {
        &self.file_path
    }

    /// Read and normalize a CSV file without caching.
    pub fn load_csv(file_path: &Path) -> Result<DataFrame, LoaderError> {
        std::fs::metadata(file_path).map_err(|source| LoaderError::Io {
            path: file_path.to_path_buf(),
            source,
        })?;

        let df = LazyCsvReader::new(file_path)
            .with_has_header(true)
            .with_infer_schema_length(None)
            .finish()?
            .collect()?;

        info!(
            path = %file_path.display(),
            rows = df.height(),
            columns = df.width(),
            "Loaded GDP dataset"
        );

        Self::normalize(df)
    }

    /// Apply the alias rename, schema checks and region enrichment.
    pub fn normalize(mut df: DataFrame) -> Result<DataFrame, LoaderError> {
        if Self::has_column(&df, VALUE_ALIAS) {
            if Self::has_column(&df, GDP) {
                return Err(LoaderError::DuplicateColumn(GDP.to_string()));
            }
            df.rename(VALUE_ALIAS, GDP.into())?;
            debug!("Renamed '{}' column to '{}'", VALUE_ALIAS, GDP);
        }

        for required in [COUNTRY_NAME, YEAR, GDP] {
            if !Self::has_column(&df, required) {
                return Err(LoaderError::MissingColumn(required.to_string()));
            }
        }

        let names = df.column(COUNTRY_NAME)?.cast(&DataType::String)?;
        let years = df.column(YEAR)?.cast(&DataType::Int64)?;
        let gdp = df.column(GDP)?.cast(&DataType::Float64)?;
        df.with_column(names)?;
        df.with_column(years)?;
        df.with_column(gdp)?;

        if Self::has_column(&df, COUNTRY_CODE) {
            let regions = Self::derive_regions(&df)?;
            df.with_column(regions)?;
        } else {
            debug!("No '{}' column, skipping region enrichment", COUNTRY_CODE);
        }

        Ok(df)
    }

    /// Build the `Region` column from the country codes.
    fn derive_regions(df: &DataFrame) -> Result<Column, LoaderError> {
        let codes = df.column(COUNTRY_CODE)?.cast(&DataType::String)?;
        let regions: Vec<Option<&'static str>> = codes
            .str()?
            .into_iter()
            .map(|code| code.and_then(Region::from_code).map(|r| r.label()))
            .collect();

        let unmapped = regions.iter().filter(|r| r.is_none()).count();
        if unmapped > 0 {
            debug!(unmapped, "Rows without a mapped region");
        }

        Ok(Column::new(REGION.into(), regions))
    }

    fn has_column(df: &DataFrame, name: &str) -> bool {
        df.get_column_names().iter().any(|c| c.as_str() == name)
    }
}

static SHARED: OnceLock<DataLoader> = OnceLock::new();

/// Process-wide dataset accessor.
///
/// The first caller fixes the path. Asking for another file afterwards is
/// an error.
pub fn shared_dataset(file_path: &Path) -> Result<Arc<DataFrame>, LoaderError> {
    let loader = SHARED.get_or_init(|| DataLoader::new(file_path));
    if loader.get_file_path() != file_path {
        return Err(LoaderError::PathMismatch {
            requested: file_path.to_path_buf(),
            cached: loader.get_file_path().to_path_buf(),
        });
    }
    loader.dataset()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn value_column_is_renamed_to_gdp() {
        let df = df!(
            "Country Name" => ["India", "India"],
            "Year" => [2000i64, 2001],
            "Value" => [1.5, 2.5],
        )
        .unwrap();

        let out = DataLoader::normalize(df).unwrap();
        let names: Vec<&str> = out.get_column_names().iter().map(|c| c.as_str()).collect();
        assert!(names.contains(&"GDP"));
        assert!(!names.contains(&"Value"));

        let gdp: Vec<Option<f64>> = out.column("GDP").unwrap().f64().unwrap().into_iter().collect();
        assert_eq!(gdp, vec![Some(1.5), Some(2.5)]);
    }

    #[test]
    fn both_value_and_gdp_is_rejected() {
        let df = df!(
            "Country Name" => ["India"],
            "Year" => [2000i64],
            "Value" => [1.0],
            "GDP" => [1.0],
        )
        .unwrap();

        assert!(matches!(
            DataLoader::normalize(df),
            Err(LoaderError::DuplicateColumn(c)) if c == "GDP"
        ));
    }

    #[test]
    fn missing_year_is_reported_by_name() {
        let df = df!(
            "Country Name" => ["India"],
            "GDP" => [1.0],
        )
        .unwrap();

        assert!(matches!(
            DataLoader::normalize(df),
            Err(LoaderError::MissingColumn(c)) if c == "Year"
        ));
    }

    #[test]
    fn region_is_derived_from_country_code() {
        let df = df!(
            "Country Name" => ["India", "Germany", "Narnia"],
            "Country Code" => [Some("IN"), Some("DE"), None],
            "Year" => [2000i64, 2000, 2000],
            "GDP" => [1.0, 2.0, 3.0],
        )
        .unwrap();

        let out = DataLoader::normalize(df).unwrap();
        let regions: Vec<Option<&str>> = out.column("Region").unwrap().str().unwrap().into_iter().collect();
        assert_eq!(regions, vec![Some("Asia"), Some("Europe"), None]);
    }

    #[test]
    fn no_region_column_without_codes() {
        let df = df!(
            "Country Name" => ["India"],
            "Year" => [2000i64],
            "GDP" => [1.0],
        )
        .unwrap();

        let out = DataLoader::normalize(df).unwrap();
        assert!(out.column("Region").is_err());
    }

    #[test]
    fn integer_columns_are_cast() {
        let df = df!(
            "Country Name" => ["India"],
            "Year" => [2000i32],
            "GDP" => [100i64],
        )
        .unwrap();

        let out = DataLoader::normalize(df).unwrap();
        assert_eq!(out.column("Year").unwrap().dtype(), &DataType::Int64);
        assert_eq!(out.column("GDP").unwrap().dtype(), &DataType::Float64);
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let loader = DataLoader::new("/definitely/not/here/gdp.csv");
        assert!(matches!(loader.dataset(), Err(LoaderError::Io { .. })));
        assert!(!loader.is_loaded());
    }

    #[test]
    fn shared_dataset_is_bound_to_one_file() {
        let dir = tempfile::tempdir().unwrap();
        let first = dir.path().join("first.csv");
        let second = dir.path().join("second.csv");
        std::fs::write(&first, "Country Name,Year,GDP\nIndia,2010,100\n").unwrap();
        std::fs::write(&second, "Country Name,Year,GDP\nChina,2010,200\n").unwrap();

        let df = shared_dataset(&first).unwrap();
        assert!(Arc::ptr_eq(&df, &shared_dataset(&first).unwrap()));
        assert!(matches!(
            shared_dataset(&second),
            Err(LoaderError::PathMismatch { ref cached, .. }) if cached == &first
        ));
    }
}
