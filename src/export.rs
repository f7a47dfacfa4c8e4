//! CSV Export Module
//! Serializes the filtered table for download.

use polars::prelude::*;
use std::fs;
use std::path::Path;
use thiserror::Error;
use tracing::info;

/// Default file name offered for the export.
pub const EXPORT_FILE_NAME: &str = "filtered_gdp.csv";

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("Failed to serialize CSV: {0}")]
    PolarsError(#[from] PolarsError),
    #[error("Failed to write export: {0}")]
    Io(#[from] std::io::Error),
}

/// CSV exporter for dataset tables.
pub struct CsvExporter;

impl CsvExporter {
    /// UTF-8, comma separated, header row, nulls as empty fields.
    pub fn export_csv(df: &DataFrame) -> Result<Vec<u8>, ExportError> {
        let mut df = df.clone();
        let mut buffer = Vec::new();
        CsvWriter::new(&mut buffer)
            .include_header(true)
            .with_separator(b',')
            .finish(&mut df)?;
        Ok(buffer)
    }

    /// Write the export to `path`, returning the number of bytes written.
    pub fn write_csv(df: &DataFrame, path: &Path) -> Result<usize, ExportError> {
        let bytes = Self::export_csv(df)?;
        fs::write(path, &bytes)?;
        info!(path = %path.display(), rows = df.height(), "Exported CSV");
        Ok(bytes.len())
    }
}
