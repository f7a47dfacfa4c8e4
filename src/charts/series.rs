//! Chart Series Module
//! Builds the data behind each dashboard chart. Nothing here draws.

use crate::data::{DataProcessor, ProcessorError, GDP, GDP_GROWTH};
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::cmp::Ordering;
use std::collections::BTreeMap;

/// Which value the trend chart plots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewMode {
    /// Absolute GDP values
    #[default]
    Absolute,
    /// Year-over-year growth percentage
    Growth,
}

impl ViewMode {
    pub fn column(&self) -> &'static str {
        match self {
            ViewMode::Absolute => GDP,
            ViewMode::Growth => GDP_GROWTH,
        }
    }
}

/// A country with one value: map cell, bar, frame entry.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CountryValue {
    pub country: String,
    pub value: f64,
}

/// A country with its value and its fraction of the total: pie slice or treemap tile.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShareSlice {
    pub country: String,
    pub value: f64,
    pub fraction: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendPoint {
    pub year: i64,
    pub value: Option<f64>,
}

/// One line of a per-country time series chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineSeries {
    pub country: String,
    pub points: Vec<TrendPoint>,
}

/// One year of the animated map.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnimationFrame {
    pub year: i64,
    pub points: Vec<CountryValue>,
}

/// Builds chart-ready data from dataset tables.
pub struct ChartBuilder;

impl ChartBuilder {
    /// Choropleth cells for one year.
    pub fn world_map(df: &DataFrame, year: i64) -> Result<Vec<CountryValue>, ProcessorError> {
        let snapshot = DataProcessor::year_snapshot(df, year, None)?;
        Self::country_values(&snapshot, GDP)
    }

    /// Largest economies in one year, descending.
    pub fn top_economies(
        df: &DataFrame,
        year: i64,
        n: usize,
    ) -> Result<Vec<CountryValue>, ProcessorError> {
        let mut values = Self::world_map(df, year)?;
        Self::sort_descending(&mut values);
        values.truncate(n);
        Ok(values)
    }

    /// Bars sorted by GDP, descending.
    pub fn ranking(df: &DataFrame) -> Result<Vec<CountryValue>, ProcessorError> {
        let mut values = Self::country_values(df, GDP)?;
        Self::sort_descending(&mut values);
        Ok(values)
    }

    /// Pie slices in table order.
    pub fn share(df: &DataFrame) -> Result<Vec<ShareSlice>, ProcessorError> {
        let values = Self::country_values(df, GDP)?;
        let total: f64 = values.iter().map(|v| v.value).sum();

        Ok(values
            .into_iter()
            .map(|v| ShareSlice {
                fraction: if total > 0.0 { v.value / total } else { 0.0 },
                country: v.country,
                value: v.value,
            })
            .collect())
    }

    /// Treemap tiles, largest first.
    pub fn treemap(df: &DataFrame) -> Result<Vec<ShareSlice>, ProcessorError> {
        let mut tiles = Self::share(df)?;
        tiles.sort_by(|a, b| b.value.partial_cmp(&a.value).unwrap_or(Ordering::Equal));
        Ok(tiles)
    }

    /// One line per country, x = year, y = GDP or growth.
    pub fn trend_lines(df: &DataFrame, view: ViewMode) -> Result<Vec<LineSeries>, ProcessorError> {
        let df = Self::with_growth(df, view)?;
        let names = DataProcessor::country_values(&df)?;
        let years = DataProcessor::year_values(&df)?;
        let values = DataProcessor::f64_values(&df, view.column())?;

        let mut lines: BTreeMap<String, Vec<TrendPoint>> = BTreeMap::new();
        for ((name, year), value) in names.into_iter().zip(years).zip(values) {
            if let (Some(name), Some(year)) = (name, year) {
                lines.entry(name).or_default().push(TrendPoint { year, value });
            }
        }

        Ok(lines
            .into_iter()
            .map(|(country, mut points)| {
                points.sort_by_key(|p| p.year);
                LineSeries { country, points }
            })
            .collect())
    }

    /// Growth lines without the undefined first-year points.
    pub fn growth_lines(df: &DataFrame) -> Result<Vec<LineSeries>, ProcessorError> {
        Ok(Self::trend_lines(df, ViewMode::Growth)?
            .into_iter()
            .map(|mut line| {
                line.points.retain(|p| p.value.is_some());
                line
            })
            .filter(|line| !line.points.is_empty())
            .collect())
    }

    /// One frame per year, ascending.
    pub fn animated_frames(df: &DataFrame) -> Result<Vec<AnimationFrame>, ProcessorError> {
        let names = DataProcessor::country_values(df)?;
        let years = DataProcessor::year_values(df)?;
        let gdp = DataProcessor::f64_values(df, GDP)?;

        let mut frames: BTreeMap<i64, Vec<CountryValue>> = BTreeMap::new();
        for ((name, year), value) in names.into_iter().zip(years).zip(gdp) {
            if let (Some(country), Some(year), Some(value)) = (name, year, value) {
                frames.entry(year).or_default().push(CountryValue { country, value });
            }
        }

        Ok(frames
            .into_iter()
            .map(|(year, points)| AnimationFrame { year, points })
            .collect())
    }

    /// Countries with the highest growth in `year`, computed over the full table.
    pub fn fastest_growing(
        df: &DataFrame,
        year: i64,
        n: usize,
    ) -> Result<Vec<CountryValue>, ProcessorError> {
        let grown = DataProcessor::calculate_gdp_growth(df)?;
        let snapshot = DataProcessor::year_snapshot(&grown, year, None)?;
        let mut values = Self::country_values(&snapshot, GDP_GROWTH)?;
        Self::sort_descending(&mut values);
        values.truncate(n);
        Ok(values)
    }

    fn with_growth(df: &DataFrame, view: ViewMode) -> Result<Cow<'_, DataFrame>, ProcessorError> {
        if view == ViewMode::Growth && df.column(GDP_GROWTH).is_err() {
            Ok(Cow::Owned(DataProcessor::calculate_gdp_growth(df)?))
        } else {
            Ok(Cow::Borrowed(df))
        }
    }

    /// Pairs of country and value, skipping nulls.
    fn country_values(df: &DataFrame, value_col: &str) -> Result<Vec<CountryValue>, ProcessorError> {
        let names = DataProcessor::country_values(df)?;
        let values = DataProcessor::f64_values(df, value_col)?;

        Ok(names
            .into_iter()
            .zip(values)
            .filter_map(|(name, value)| {
                Some(CountryValue {
                    country: name?,
                    value: value.filter(|v| !v.is_nan())?,
                })
            })
            .collect())
    }

    fn sort_descending(values: &mut [CountryValue]) {
        values.sort_by(|a, b| b.value.partial_cmp(&a.value).unwrap_or(Ordering::Equal));
    }
}
