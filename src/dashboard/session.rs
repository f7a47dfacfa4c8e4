//! Dashboard Session
//! Per-user state carried from one interaction to the next.

use super::FilterSettings;
use serde::{Deserialize, Serialize};

/// Whether filters were ever applied, and the last applied settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DashboardSession {
    pub filters_applied: bool,
    pub last_filters: Option<FilterSettings>,
}

impl DashboardSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Session after `filters` were applied.
    pub fn applied(filters: FilterSettings) -> Self {
        Self {
            filters_applied: true,
            last_filters: Some(filters),
        }
    }
}
