//! Region Mapping Module
//! Fixed country-code to region table used to enrich the loaded dataset.

use serde::Serialize;
use std::fmt;

/// One of the six continental regions a country code can map to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Region {
    Asia,
    Europe,
    NorthAmerica,
    SouthAmerica,
    Africa,
    Oceania,
}

/// Region table: each region with the codes assigned to it.
pub const REGION_CODES: [(Region, &[&str]); 6] = [
    (Region::Asia, &["CN", "IN", "JP", "ID", "KR", "SG", "SA"]),
    (Region::Europe, &["DE", "FR", "GB", "IT", "RU", "ES"]),
    (Region::NorthAmerica, &["US", "CA", "MX"]),
    (Region::SouthAmerica, &["BR", "AR", "CO"]),
    (Region::Africa, &["ZA", "NG", "EG", "KE"]),
    (Region::Oceania, &["AU", "NZ"]),
];

impl Region {
    /// Look up the region for a country code. Exact, case-sensitive match.
    pub fn from_code(code: &str) -> Option<Region> {
        REGION_CODES
            .iter()
            .find(|(_, codes)| codes.contains(&code))
            .map(|(region, _)| *region)
    }

    /// Display label as written in the `Region` column.
    pub fn label(&self) -> &'static str {
        match self {
            Region::Asia => "Asia",
            Region::Europe => "Europe",
            Region::NorthAmerica => "North America",
            Region::SouthAmerica => "South America",
            Region::Africa => "Africa",
            Region::Oceania => "Oceania",
        }
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
