//! Data module - CSV loading, region enrichment and the filter/growth pipeline

mod loader;
mod processor;
mod region;

pub use loader::{shared_dataset, DataLoader, LoaderError};
pub use processor::{DataProcessor, ProcessorError, YearRange};
pub use region::{Region, REGION_CODES};

/// Column names of the dataset.
pub const COUNTRY_NAME: &str = "Country Name";
pub const COUNTRY_CODE: &str = "Country Code";
pub const YEAR: &str = "Year";
pub const GDP: &str = "GDP";
/// Alternative name for the GDP column in some source files.
pub const VALUE_ALIAS: &str = "Value";
pub const REGION: &str = "Region";
pub const GDP_GROWTH: &str = "GDP Growth %";
