//! Dashboard module - Filter form, session state and page composition

mod app;
mod filters;
mod session;

pub use app::{AnalyticsPage, Dashboard, DashboardError, OverviewPage, Page};
pub use filters::FilterSettings;
pub use session::DashboardSession;
