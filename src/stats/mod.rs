//! Stats module - KPI and per-country statistics

mod calculator;

pub use calculator::{format_currency, CountryStats, KpiSummary, StatsCalculator, SummaryRow};
