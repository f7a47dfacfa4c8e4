//! Dashboard Application
//! Composes the overview and analytics pages from the cached dataset.

use super::{DashboardSession, FilterSettings};
use crate::charts::{AnimationFrame, ChartBuilder, CountryValue, LineSeries, ShareSlice};
use crate::config::DashboardConfig;
use crate::data::{DataLoader, DataProcessor, LoaderError, ProcessorError, YearRange};
use crate::export::{CsvExporter, ExportError};
use crate::stats::{CountryStats, KpiSummary, StatsCalculator, SummaryRow};
use polars::prelude::*;
use serde::Serialize;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info};

#[derive(Error, Debug)]
pub enum DashboardError {
    #[error(transparent)]
    Loader(#[from] LoaderError),
    #[error(transparent)]
    Processor(#[from] ProcessorError),
    #[error(transparent)]
    Export(#[from] ExportError),
    #[error("Invalid year range: {start} > {end}")]
    InvalidYearRange { start: i64, end: i64 },
}

/// Page shown before any filters are applied.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OverviewPage {
    /// Latest year in the dataset, `None` when it is empty
    pub year: Option<i64>,
    pub world_map: Vec<CountryValue>,
    pub top_economies: Vec<CountryValue>,
}

/// Page built from submitted filters.
#[derive(Debug, Clone, Serialize)]
pub struct AnalyticsPage {
    pub filters: FilterSettings,
    pub rows: usize,
    pub kpi: Option<KpiSummary>,
    pub trend: Vec<LineSeries>,
    pub ranking: Vec<CountryValue>,
    pub share: Vec<ShareSlice>,
    pub growth: Vec<LineSeries>,
    pub treemap: Vec<ShareSlice>,
    pub summary: Vec<SummaryRow>,
    pub country_stats: Vec<CountryStats>,
    pub animation: Vec<AnimationFrame>,
    pub fastest_growing: Vec<CountryValue>,
    /// Filtered, growth-annotated table
    #[serde(skip)]
    pub table: DataFrame,
    /// CSV bytes of `table`, present when export is enabled
    #[serde(skip)]
    pub export: Option<Vec<u8>>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "page", rename_all = "snake_case")]
pub enum Page {
    Overview(OverviewPage),
    Analytics(Box<AnalyticsPage>),
}

/// Main dashboard over one loaded dataset.
pub struct Dashboard {
    base: Arc<DataFrame>,
    config: DashboardConfig,
}

impl Dashboard {
    pub fn new(base: Arc<DataFrame>, config: DashboardConfig) -> Self {
        Self { base, config }
    }

    /// Build from a loader, reading the dataset if it is not cached yet.
    pub fn from_loader(loader: &DataLoader, config: DashboardConfig) -> Result<Self, DashboardError> {
        Ok(Self::new(loader.dataset()?, config))
    }

    pub fn dataset(&self) -> &DataFrame {
        &self.base
    }

    pub fn default_filters(&self) -> Result<FilterSettings, DashboardError> {
        Ok(FilterSettings::defaults_for(&self.base, &self.config)?)
    }

    /// Handle one interaction.
    ///
    /// Without a submission and before any filters were applied this is the
    /// overview; otherwise the analytics page for the submitted (or last
    /// applied, or default) filters, and the session is marked applied.
    pub fn render(
        &self,
        session: DashboardSession,
        submission: Option<FilterSettings>,
    ) -> Result<(Page, DashboardSession), DashboardError> {
        let filters = match (submission, session.filters_applied) {
            (None, false) => return Ok((Page::Overview(self.overview()?), session)),
            (Some(filters), _) => filters,
            (None, true) => match session.last_filters {
                Some(filters) => filters,
                None => self.default_filters()?,
            },
        };

        let page = self.analytics(&filters)?;
        Ok((Page::Analytics(Box::new(page)), DashboardSession::applied(filters)))
    }

    /// Latest-year world map and top economies.
    pub fn overview(&self) -> Result<OverviewPage, DashboardError> {
        let Some(year) = DataProcessor::latest_year(&self.base)? else {
            return Ok(OverviewPage {
                year: None,
                world_map: Vec::new(),
                top_economies: Vec::new(),
            });
        };

        debug!(year, "Building overview");
        Ok(OverviewPage {
            year: Some(year),
            world_map: ChartBuilder::world_map(&self.base, year)?,
            top_economies: ChartBuilder::top_economies(&self.base, year, self.config.top_n)?,
        })
    }

    /// Every analytics section for `filters`.
    pub fn analytics(&self, filters: &FilterSettings) -> Result<AnalyticsPage, DashboardError> {
        filters.validate()?;
        let base = self.base.as_ref();
        let countries = filters.countries.as_slice();
        let year = filters.focus_year();

        let table = DataProcessor::apply(base, filters.year_range, countries)?;
        let year_df = DataProcessor::year_snapshot(base, year, Some(countries))?;
        let selected_all_years =
            DataProcessor::filter(base, YearRange::new(i64::MIN, i64::MAX), countries)?;

        info!(
            start = filters.year_range.start,
            end = filters.year_range.end,
            countries = countries.len(),
            rows = table.height(),
            "Building analytics page"
        );

        let kpi = if filters.show_kpi {
            Some(StatsCalculator::kpi_summary(&table)?)
        } else {
            None
        };
        let export = if filters.show_download {
            Some(CsvExporter::export_csv(&table)?)
        } else {
            None
        };

        Ok(AnalyticsPage {
            filters: filters.clone(),
            rows: table.height(),
            kpi,
            trend: ChartBuilder::trend_lines(&table, filters.view)?,
            ranking: ChartBuilder::ranking(&year_df)?,
            share: ChartBuilder::share(&year_df)?,
            growth: ChartBuilder::growth_lines(&table)?,
            treemap: ChartBuilder::treemap(&year_df)?,
            summary: StatsCalculator::summary_table(base, year, countries)?,
            country_stats: StatsCalculator::compute_all_country_stats_parallel(&table)?,
            animation: ChartBuilder::animated_frames(&selected_all_years)?,
            fastest_growing: ChartBuilder::fastest_growing(base, year, self.config.top_n)?,
            table,
            export,
        })
    }
}
