pub mod trend_analyzer;

pub use trend_analyzer::{DecadeExtremes, RegionalAnomaly, TrendAnalyzer, TrendSummary, YearValue};
