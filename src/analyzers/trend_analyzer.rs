use crate::error::{ProcessingError, Result};
use crate::models::{AnnualGlobalAverage, Region};
use crate::store::ResultStore;
use crate::utils::statistics::linear_fit;
use serde::Serialize;
use std::collections::BTreeMap;

/// Year and value of one point of the global series
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct YearValue {
    pub year: i32,
    pub temperature_c: f64,
}

/// Most recent regional anomaly; `None` when the region has no baseline
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegionalAnomaly {
    pub region: Region,
    pub year: i32,
    pub temp_anomaly: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DecadeExtremes {
    pub decade: i32,
    pub extreme_hot: u64,
    pub extreme_cold: u64,
    /// Hot over cold; `None` without cold events
    pub hot_cold_ratio: Option<f64>,
}

/// Headline figures drawn from a result store
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendSummary {
    pub first_year: i32,
    pub last_year: i32,
    /// Least-squares slope of the global annual mean, °C per year
    pub warming_rate_per_year: Option<f64>,
    pub warmest_year: YearValue,
    pub coldest_year: YearValue,
    /// Slope of the yearly spread between warmest and coldest season, °C per year
    pub seasonal_range_trend: Option<f64>,
    pub latest_regional_anomalies: Vec<RegionalAnomaly>,
    pub extreme_hot_total: u64,
    pub extreme_cold_total: u64,
    pub extremes_by_decade: Vec<DecadeExtremes>,
}

pub struct TrendAnalyzer;

impl TrendAnalyzer {
    pub fn new() -> Self {
        Self
    }

    /// Summarize the tables of a store.
    ///
    /// The global series is required. Regional, seasonal and extreme sections
    /// are left empty when their tables are not available.
    pub fn analyze(&self, store: &ResultStore) -> Result<TrendSummary> {
        let global = store.annual_global_avg()?;
        let (first, last) = match (global.first(), global.last()) {
            (Some(first), Some(last)) => (first, last),
            _ => {
                return Err(ProcessingError::EmptyDataset(
                    "annual_global_avg has no rows".to_string(),
                ))
            }
        };

        let (warmest_year, coldest_year) = extremes_of(global);

        let points: Vec<(f64, f64)> = global
            .iter()
            .map(|r| (f64::from(r.year), r.temperature_c))
            .collect();
        let warming_rate_per_year = linear_fit(&points).map(|(slope, _)| slope);

        let seasonal_range_trend = store
            .seasonal_avg()
            .ok()
            .and_then(|rows| {
                let mut ranges: BTreeMap<i32, (f64, f64)> = BTreeMap::new();
                for row in rows {
                    let range = ranges
                        .entry(row.year)
                        .or_insert((f64::INFINITY, f64::NEG_INFINITY));
                    range.0 = range.0.min(row.temperature_c);
                    range.1 = range.1.max(row.temperature_c);
                }
                let points: Vec<(f64, f64)> = ranges
                    .into_iter()
                    .map(|(year, (low, high))| (f64::from(year), high - low))
                    .collect();
                linear_fit(&points)
            })
            .map(|(slope, _)| slope);

        let mut latest: BTreeMap<Region, RegionalAnomaly> = BTreeMap::new();
        if let Ok(rows) = store.annual_regional_avg() {
            for row in rows {
                let entry = latest.entry(row.region).or_insert_with(|| RegionalAnomaly {
                    region: row.region,
                    year: row.year,
                    temp_anomaly: row.temp_anomaly,
                });
                if row.year >= entry.year {
                    entry.year = row.year;
                    entry.temp_anomaly = row.temp_anomaly;
                }
            }
        }

        let mut by_decade: BTreeMap<i32, (u64, u64)> = BTreeMap::new();
        if let Ok(rows) = store.extreme_counts() {
            for row in rows {
                let cell = by_decade.entry(row.decade).or_default();
                cell.0 += row.extreme_hot;
                cell.1 += row.extreme_cold;
            }
        }

        let extremes_by_decade: Vec<DecadeExtremes> = by_decade
            .into_iter()
            .map(|(decade, (extreme_hot, extreme_cold))| DecadeExtremes {
                decade,
                extreme_hot,
                extreme_cold,
                hot_cold_ratio: (extreme_cold > 0)
                    .then(|| extreme_hot as f64 / extreme_cold as f64),
            })
            .collect();

        Ok(TrendSummary {
            first_year: first.year,
            last_year: last.year,
            warming_rate_per_year,
            warmest_year,
            coldest_year,
            seasonal_range_trend,
            latest_regional_anomalies: latest.into_values().collect(),
            extreme_hot_total: extremes_by_decade.iter().map(|d| d.extreme_hot).sum(),
            extreme_cold_total: extremes_by_decade.iter().map(|d| d.extreme_cold).sum(),
            extremes_by_decade,
        })
    }
}

impl Default for TrendAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

fn extremes_of(global: &[AnnualGlobalAverage]) -> (YearValue, YearValue) {
    let point = |r: &AnnualGlobalAverage| YearValue {
        year: r.year,
        temperature_c: r.temperature_c,
    };

    let mut warmest = point(&global[0]);
    let mut coldest = warmest;
    for row in &global[1..] {
        if row.temperature_c > warmest.temperature_c {
            warmest = point(row);
        }
        if row.temperature_c < coldest.temperature_c {
            coldest = point(row);
        }
    }
    (warmest, coldest)
}

impl TrendSummary {
    pub fn warming_rate_per_century(&self) -> Option<f64> {
        self.warming_rate_per_year.map(|rate| rate * 100.0)
    }

    pub fn summary(&self) -> String {
        let rate = match self.warming_rate_per_year {
            Some(rate) => format!("{:+.4}°C/year ({:+.2}°C/century)", rate, rate * 100.0),
            None => "Not enough years for a trend".to_string(),
        };

        format!(
            "Years: {} to {} ({} years)\n\
            Warming Rate: {}\n\
            Warmest Year: {} ({:.2}°C)\n\
            Coldest Year: {} ({:.2}°C)\n\
            Extreme Events: {} hot, {} cold",
            self.first_year,
            self.last_year,
            self.last_year - self.first_year + 1,
            rate,
            self.warmest_year.year,
            self.warmest_year.temperature_c,
            self.coldest_year.year,
            self.coldest_year.temperature_c,
            self.extreme_hot_total,
            self.extreme_cold_total
        )
    }

    pub fn detailed_summary(&self) -> String {
        let mut summary = self.summary();

        if let Some(trend) = self.seasonal_range_trend {
            summary.push_str(&format!("\nSeasonal Range Trend: {:+.4}°C/year\n", trend));
        }

        if !self.latest_regional_anomalies.is_empty() {
            summary.push_str("\nLatest Regional Anomalies:\n");
            for anomaly in &self.latest_regional_anomalies {
                let value = match anomaly.temp_anomaly {
                    Some(a) => format!("{:+.2}°C", a),
                    None => "undefined (no baseline data)".to_string(),
                };
                summary.push_str(&format!(
                    "- {} ({}): {}\n",
                    anomaly.region, anomaly.year, value
                ));
            }
        }

        if !self.extremes_by_decade.is_empty() {
            summary.push_str("\nExtreme Events by Decade:\n");
            for decade in &self.extremes_by_decade {
                let ratio = decade
                    .hot_cold_ratio
                    .map(|r| format!("{:.2}", r))
                    .unwrap_or_else(|| "n/a".to_string());
                summary.push_str(&format!(
                    "- {}s: {} hot, {} cold, ratio {}\n",
                    decade.decade, decade.extreme_hot, decade.extreme_cold, ratio
                ));
            }
        }

        summary
    }
}
