//! Statistics Calculator Module
//! KPI summaries and per-country descriptive statistics.

use crate::data::{DataProcessor, ProcessorError, GDP, GDP_GROWTH};
use polars::prelude::*;
use rayon::prelude::*;
use serde::Serialize;
use statrs::statistics::Statistics;
use std::collections::BTreeMap;

/// Headline numbers shown above the charts.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct KpiSummary {
    pub total: Option<f64>,
    pub average: Option<f64>,
    pub max: Option<f64>,
}

impl KpiSummary {
    /// Formatted values in card order: total, average, max.
    pub fn formatted(&self) -> [(&'static str, String); 3] {
        let fmt = |v: Option<f64>| v.map(format_currency).unwrap_or_else(|| "-".to_string());
        [
            ("Total GDP", fmt(self.total)),
            ("Average GDP", fmt(self.average)),
            ("Max GDP", fmt(self.max)),
        ]
    }
}

/// Statistics for a single country.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CountryStats {
    pub country: String,
    pub observations: usize,
    pub first_year: i64,
    pub last_year: i64,
    pub mean_gdp: Option<f64>,
    pub std_gdp: Option<f64>,
    pub min_gdp: Option<f64>,
    pub max_gdp: Option<f64>,
    pub mean_growth: Option<f64>,
}

/// One row of the country summary table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryRow {
    #[serde(rename = "Country")]
    pub country: String,
    #[serde(rename = "GDP")]
    pub gdp: Option<f64>,
}

/// Handles statistical calculations with multi-threading support.
pub struct StatsCalculator;

impl StatsCalculator {
    /// Total, mean and max of the non-null GDP values.
    pub fn kpi_summary(df: &DataFrame) -> Result<KpiSummary, ProcessorError> {
        let values: Vec<f64> = DataProcessor::f64_values(df, GDP)?
            .into_iter()
            .flatten()
            .filter(|v| !v.is_nan())
            .collect();

        if values.is_empty() {
            return Ok(KpiSummary::default());
        }

        Ok(KpiSummary {
            total: finite(values.iter().sum()),
            average: finite(values.iter().mean()),
            max: finite(Statistics::max(values.iter())),
        })
    }

    /// Country and GDP for one year, in dataset order.
    pub fn summary_table(
        df: &DataFrame,
        year: i64,
        countries: &[String],
    ) -> Result<Vec<SummaryRow>, ProcessorError> {
        let snapshot = DataProcessor::year_snapshot(df, year, Some(countries))?;
        let names = DataProcessor::country_values(&snapshot)?;
        let gdp = DataProcessor::f64_values(&snapshot, GDP)?;

        Ok(names
            .into_iter()
            .zip(gdp)
            .filter_map(|(name, gdp)| Some(SummaryRow { country: name?, gdp }))
            .collect())
    }

    /// Compute descriptive statistics from a country's rows.
    pub fn compute_country_stats(country: &str, rows: &[(i64, Option<f64>, Option<f64>)]) -> CountryStats {
        let gdp: Vec<f64> = rows.iter().filter_map(|(_, g, _)| *g).collect();
        let growth: Vec<f64> = rows.iter().filter_map(|(_, _, g)| *g).collect();

        let first_year = rows.iter().map(|(y, _, _)| *y).min().unwrap_or_default();
        let last_year = rows.iter().map(|(y, _, _)| *y).max().unwrap_or_default();

        let std_gdp = if gdp.len() > 1 {
            finite(gdp.iter().std_dev())
        } else if gdp.len() == 1 {
            Some(0.0)
        } else {
            None
        };

        CountryStats {
            country: country.to_string(),
            observations: rows.len(),
            first_year,
            last_year,
            mean_gdp: non_empty(&gdp).and_then(|v| finite(v.iter().mean())),
            std_gdp,
            min_gdp: non_empty(&gdp).and_then(|v| finite(Statistics::min(v.iter()))),
            max_gdp: non_empty(&gdp).and_then(|v| finite(Statistics::max(v.iter()))),
            mean_growth: non_empty(&growth).and_then(|v| finite(v.iter().mean())),
        }
    }

    /// Compute statistics for every country in parallel, ordered by name.
    pub fn compute_all_country_stats_parallel(
        df: &DataFrame,
    ) -> Result<Vec<CountryStats>, ProcessorError> {
        let grown = DataProcessor::calculate_gdp_growth(df)?;
        let names = DataProcessor::country_values(&grown)?;
        let years = DataProcessor::year_values(&grown)?;
        let gdp = DataProcessor::f64_values(&grown, GDP)?;
        let growth = DataProcessor::f64_values(&grown, GDP_GROWTH)?;

        let mut by_country: BTreeMap<String, Vec<(i64, Option<f64>, Option<f64>)>> =
            BTreeMap::new();
        for (((name, year), gdp), growth) in names.into_iter().zip(years).zip(gdp).zip(growth) {
            if let (Some(name), Some(year)) = (name, year) {
                by_country.entry(name).or_default().push((year, gdp, growth));
            }
        }

        let entries: Vec<(String, Vec<(i64, Option<f64>, Option<f64>)>)> =
            by_country.into_iter().collect();

        // Use rayon for parallel computation
        Ok(entries
            .par_iter()
            .map(|(country, rows)| Self::compute_country_stats(country, rows))
            .collect())
    }
}

/// Format a value like the KPI cards: `$1,234,567`.
pub fn format_currency(value: f64) -> String {
    let rounded = format!("{:.0}", value.abs());
    let mut grouped = String::with_capacity(rounded.len() + rounded.len() / 3);
    for (i, ch) in rounded.chars().enumerate() {
        if i > 0 && (rounded.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    if value < 0.0 && rounded != "0" {
        format!("-${grouped}")
    } else {
        format!("${grouped}")
    }
}

fn finite(value: f64) -> Option<f64> {
    value.is_finite().then_some(value)
}

fn non_empty(values: &[f64]) -> Option<&[f64]> {
    (!values.is_empty()).then_some(values)
}
