//! Indicator fetching (statistics API boundary)

pub mod worldbank;

pub use worldbank::{IndicatorClient, YearSeries};
