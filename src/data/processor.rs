//! Data Processor Module
//! Filters the dataset by year range and countries and computes GDP growth.

use super::{COUNTRY_NAME, GDP, GDP_GROWTH, YEAR};
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashSet};
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
pub enum ProcessorError {
    #[error("Polars error: {0}")]
    PolarsError(#[from] PolarsError),
    #[error("Required column '{0}' not found")]
    MissingColumn(String),
}

/// Inclusive range of years.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct YearRange {
    pub start: i64,
    pub end: i64,
}

impl YearRange {
    pub fn new(start: i64, end: i64) -> Self {
        Self { start, end }
    }

    pub fn contains(&self, year: i64) -> bool {
        self.start <= year && year <= self.end
    }

    pub fn is_empty(&self) -> bool {
        self.start > self.end
    }
}

/// Handles filtering and growth computation. Inputs are never mutated.
pub struct DataProcessor;

impl DataProcessor {
    /// Keep rows with a year inside `range` and a country in `countries`.
    pub fn filter(
        df: &DataFrame,
        range: YearRange,
        countries: &[String],
    ) -> Result<DataFrame, ProcessorError> {
        let selected: HashSet<&str> = countries.iter().map(String::as_str).collect();
        let names = Self::country_values(df)?;
        let years = Self::year_values(df)?;

        let mask: Vec<bool> = names
            .iter()
            .zip(years.iter())
            .map(|(name, year)| match (name, year) {
                (Some(name), Some(year)) => range.contains(*year) && selected.contains(name.as_str()),
                _ => false,
            })
            .collect();

        let filtered = df.filter(&BooleanChunked::from_slice("mask".into(), &mask))?;
        debug!(
            start = range.start,
            end = range.end,
            countries = selected.len(),
            rows = filtered.height(),
            "Filtered dataset"
        );
        Ok(filtered)
    }

    /// Rows for exactly one year, optionally restricted to some countries.
    pub fn year_snapshot(
        df: &DataFrame,
        year: i64,
        countries: Option<&[String]>,
    ) -> Result<DataFrame, ProcessorError> {
        match countries {
            Some(countries) => Self::filter(df, YearRange::new(year, year), countries),
            None => {
                let mask: Vec<bool> = Self::year_values(df)?
                    .into_iter()
                    .map(|y| y == Some(year))
                    .collect();
                Ok(df.filter(&BooleanChunked::from_slice("mask".into(), &mask))?)
            }
        }
    }

    /// Add a `GDP Growth %` column: percent change versus the previous year
    /// of the same country.
    ///
    /// Rows are sorted by (country, year) first, whatever the input order.
    /// The first row of a country, a null or zero previous GDP, and any
    /// non-finite result all give null.
    pub fn calculate_gdp_growth(df: &DataFrame) -> Result<DataFrame, ProcessorError> {
        Self::column(df, COUNTRY_NAME)?;
        Self::column(df, YEAR)?;
        Self::column(df, GDP)?;

        let mut sorted = df.sort(
            [COUNTRY_NAME, YEAR],
            SortMultipleOptions::default().with_maintain_order(true),
        )?;

        let names = Self::country_values(&sorted)?;
        let gdp = Self::f64_values(&sorted, GDP)?;

        let growth: Vec<Option<f64>> = (0..sorted.height())
            .map(|i| {
                if i == 0 || names[i].is_none() || names[i] != names[i - 1] {
                    return None;
                }
                Self::pct_change(gdp[i - 1], gdp[i])
            })
            .collect();

        sorted.with_column(Column::new(GDP_GROWTH.into(), growth))?;
        Ok(sorted)
    }

    /// Filter, then compute growth on the filtered rows.
    pub fn apply(
        df: &DataFrame,
        range: YearRange,
        countries: &[String],
    ) -> Result<DataFrame, ProcessorError> {
        let filtered = Self::filter(df, range, countries)?;
        Self::calculate_gdp_growth(&filtered)
    }

    fn pct_change(previous: Option<f64>, current: Option<f64>) -> Option<f64> {
        let (previous, current) = (previous?, current?);
        if previous == 0.0 {
            return None;
        }
        let pct = (current - previous) / previous * 100.0;
        pct.is_finite().then_some(pct)
    }

    /// Sorted distinct country names.
    pub fn countries(df: &DataFrame) -> Result<Vec<String>, ProcessorError> {
        let unique: BTreeSet<String> = Self::country_values(df)?.into_iter().flatten().collect();
        Ok(unique.into_iter().collect())
    }

    /// Sorted distinct years.
    pub fn years(df: &DataFrame) -> Result<Vec<i64>, ProcessorError> {
        let unique: BTreeSet<i64> = Self::year_values(df)?.into_iter().flatten().collect();
        Ok(unique.into_iter().collect())
    }

    /// Smallest and largest year, `None` for an empty table.
    pub fn year_bounds(df: &DataFrame) -> Result<Option<(i64, i64)>, ProcessorError> {
        let years = Self::years(df)?;
        Ok(years.first().copied().zip(years.last().copied()))
    }

    pub fn latest_year(df: &DataFrame) -> Result<Option<i64>, ProcessorError> {
        Ok(Self::year_bounds(df)?.map(|(_, max)| max))
    }

    pub(crate) fn column<'a>(df: &'a DataFrame, name: &str) -> Result<&'a Column, ProcessorError> {
        df.column(name)
            .map_err(|_| ProcessorError::MissingColumn(name.to_string()))
    }

    pub(crate) fn country_values(df: &DataFrame) -> Result<Vec<Option<String>>, ProcessorError> {
        let col = Self::column(df, COUNTRY_NAME)?.cast(&DataType::String)?;
        let values = col.str()?.into_iter().map(|v| v.map(str::to_string)).collect();
        Ok(values)
    }

    pub(crate) fn year_values(df: &DataFrame) -> Result<Vec<Option<i64>>, ProcessorError> {
        let col = Self::column(df, YEAR)?.cast(&DataType::Int64)?;
        let values = col.i64()?.into_iter().collect();
        Ok(values)
    }

    pub(crate) fn f64_values(df: &DataFrame, name: &str) -> Result<Vec<Option<f64>>, ProcessorError> {
        let col = Self::column(df, name)?.cast(&DataType::Float64)?;
        let values = col.f64()?.into_iter().collect();
        Ok(values)
    }
}
