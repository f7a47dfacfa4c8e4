//! GDP Dashboard - GDP by country analysis
//!
//! Loads a GDP-by-country-by-year CSV, filters it by year range and country,
//! computes year-over-year growth and prepares the data behind every
//! dashboard chart, KPI card and CSV export.

pub mod charts;
pub mod config;
pub mod dashboard;
pub mod data;
pub mod export;
pub mod stats;

pub use config::DashboardConfig;
pub use dashboard::{Dashboard, DashboardSession, FilterSettings, Page};
pub use data::{DataLoader, DataProcessor, YearRange};
