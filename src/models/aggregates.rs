//! Row types of the derived result tables.
//!
//! Field order matches the persisted column order of each table.

use serde::{Deserialize, Serialize};

use crate::models::{Region, Season};

/// `annual_global_avg`: one row per year
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnnualGlobalAverage {
    pub year: i32,
    pub temperature_c: f64,
    pub temp_anomaly: f64,
}

/// `annual_regional_avg`: one row per (year, region).
///
/// `baseline_temp` and `temp_anomaly` are `None` when the region has no data in
/// the baseline period, which is distinct from a zero anomaly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnnualRegionalAverage {
    pub year: i32,
    pub region: Region,
    pub temperature_c: f64,
    pub baseline_temp: Option<f64>,
    pub temp_anomaly: Option<f64>,
}

impl AnnualRegionalAverage {
    pub fn has_baseline(&self) -> bool {
        self.baseline_temp.is_some()
    }
}

/// `seasonal_avg`: one row per (year, season)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeasonalAverage {
    pub year: i32,
    pub season: Season,
    pub temperature_c: f64,
}

/// `decadal_avg`: one row per (decade, region)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecadalRegionalAverage {
    pub decade: i32,
    pub region: Region,
    pub temperature_c: f64,
}

/// `extreme_counts`: one row per (decade, region)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtremeEventCount {
    pub decade: i32,
    pub region: Region,
    pub extreme_hot: u64,
    pub extreme_cold: u64,
}

impl ExtremeEventCount {
    pub fn total(&self) -> u64 {
        self.extreme_hot + self.extreme_cold
    }
}
