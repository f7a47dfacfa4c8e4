//! Configuration Module
//! Dataset location and filter form defaults, read from an optional JSON file.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid config: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// CSV file with the GDP dataset
    pub data_path: PathBuf,
    /// First year of the default range, clamped to the data
    pub default_start_year: i64,
    /// Countries preselected in the filter form
    pub default_countries: Vec<String>,
    /// Number of entries in the "top" charts
    pub top_n: usize,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from("gdp.csv"),
            default_start_year: 2000,
            default_countries: vec![
                "India".to_string(),
                "United States".to_string(),
                "China".to_string(),
            ],
            top_n: 10,
        }
    }
}

impl DashboardConfig {
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_use_defaults() {
        let config = DashboardConfig::from_json(r#"{ "top_n": 5 }"#).unwrap();
        assert_eq!(config.top_n, 5);
        assert_eq!(config.data_path, PathBuf::from("gdp.csv"));
        assert_eq!(config.default_countries.len(), 3);
    }

    #[test]
    fn bad_json_is_an_error() {
        assert!(matches!(
            DashboardConfig::from_json("{ top_n: }"),
            Err(ConfigError::Json(_))
        ));
    }

    #[test]
    fn load_reads_a_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dashboard.json");
        fs::write(&path, r#"{ "data_path": "data/world.csv", "default_countries": ["Chile"] }"#)
            .unwrap();

        let config = DashboardConfig::load(&path).unwrap();
        assert_eq!(config.data_path, PathBuf::from("data/world.csv"));
        assert_eq!(config.default_countries, vec!["Chile".to_string()]);
        assert_eq!(config.default_start_year, 2000);
    }
}
