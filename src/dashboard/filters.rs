//! Filter Settings
//! Values collected by the filter form and their defaults.

use super::DashboardError;
use crate::charts::ViewMode;
use crate::config::DashboardConfig;
use crate::data::{DataProcessor, ProcessorError, YearRange};
use polars::prelude::DataFrame;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// User settings for the analytics page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterSettings {
    pub year_range: YearRange,
    pub countries: Vec<String>,
    pub show_kpi: bool,
    pub show_download: bool,
    pub view: ViewMode,
}

impl FilterSettings {
    pub fn new(year_range: YearRange, countries: Vec<String>) -> Self {
        Self {
            year_range,
            countries,
            show_kpi: true,
            show_download: true,
            view: ViewMode::Absolute,
        }
    }

    /// Form defaults for a dataset: the configured start year (clamped to
    /// the data) up to the latest year, and the configured countries that
    /// exist in the data.
    pub fn defaults_for(df: &DataFrame, config: &DashboardConfig) -> Result<Self, ProcessorError> {
        let year_range = match DataProcessor::year_bounds(df)? {
            Some((min, max)) => YearRange::new(config.default_start_year.clamp(min, max), max),
            None => YearRange::new(config.default_start_year, config.default_start_year),
        };

        let available = DataProcessor::countries(df)?;
        let countries = config
            .default_countries
            .iter()
            .filter(|name| {
                let present = available.binary_search(*name).is_ok();
                if !present {
                    warn!(country = %name, "Default country not in dataset");
                }
                present
            })
            .cloned()
            .collect();

        Ok(Self::new(year_range, countries))
    }

    pub fn validate(&self) -> Result<(), DashboardError> {
        if self.year_range.is_empty() {
            return Err(DashboardError::InvalidYearRange {
                start: self.year_range.start,
                end: self.year_range.end,
            });
        }
        Ok(())
    }

    /// Year used by the single-year views (ranking, share, treemap, summary).
    pub fn focus_year(&self) -> i64 {
        self.year_range.end
    }
}
