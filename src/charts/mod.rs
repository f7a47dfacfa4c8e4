//! Charts module - Data behind each chart

mod series;

pub use series::{
    AnimationFrame, ChartBuilder, CountryValue, LineSeries, ShareSlice, TrendPoint, ViewMode,
};
