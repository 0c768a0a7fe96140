use crate::models::{EnrichedRecord, ExtremeEventCount, Region};
use crate::utils::constants::DEFAULT_EXTREME_SIGMA;
use crate::utils::statistics::{mean, sample_std};
use std::collections::{BTreeMap, HashMap};
use tracing::debug;

/// Mean and spread of one station's full monthly history
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StationStatistics {
    pub observations: usize,
    pub mean: f64,
    /// Sample standard deviation, `None` for a single observation
    pub std: Option<f64>,
    pub min: f64,
    pub max: f64,
}

impl StationStatistics {
    pub fn from_values(values: &[f64]) -> Option<Self> {
        let mean = mean(values)?;
        let min = values.iter().copied().fold(f64::INFINITY, f64::min);
        let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);

        Some(Self {
            observations: values.len(),
            mean,
            std: sample_std(values),
            min,
            max,
        })
    }

    /// A station whose observations are all equal has nothing to flag
    pub fn has_variance(&self) -> bool {
        self.max > self.min && self.std.is_some_and(|s| s > 0.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtremeKind {
    Hot,
    Cold,
}

/// Flags monthly values more than `sigma` station standard deviations from
/// the station mean and counts them per (decade, region).
///
/// Thresholds are strict: a value exactly on `mean ± sigma·std` is not
/// extreme. The classifier ignores time order.
pub struct ExtremeEventDetector {
    sigma: f64,
}

impl ExtremeEventDetector {
    pub fn new() -> Self {
        Self {
            sigma: DEFAULT_EXTREME_SIGMA,
        }
    }

    pub fn with_sigma(sigma: f64) -> Self {
        Self { sigma }
    }

    /// Per-station statistics over every record of that station
    pub fn station_statistics(
        &self,
        records: &[EnrichedRecord],
    ) -> HashMap<String, StationStatistics> {
        let mut values: HashMap<&str, Vec<f64>> = HashMap::new();
        for record in records {
            values
                .entry(record.station_id.as_str())
                .or_default()
                .push(record.temperature_c);
        }

        values
            .into_iter()
            .filter_map(|(station_id, temps)| {
                StationStatistics::from_values(&temps).map(|s| (station_id.to_string(), s))
            })
            .collect()
    }

    pub fn classify(&self, temperature_c: f64, stats: &StationStatistics) -> Option<ExtremeKind> {
        if !stats.has_variance() {
            return None;
        }
        let std = stats.std?;

        if temperature_c > stats.mean + self.sigma * std {
            Some(ExtremeKind::Hot)
        } else if temperature_c < stats.mean - self.sigma * std {
            Some(ExtremeKind::Cold)
        } else {
            None
        }
    }

    /// Count extreme hot and cold months per (decade, region).
    ///
    /// Every (decade, region) cell present in the input gets a row, including
    /// cells with no extremes.
    pub fn detect(&self, records: &[EnrichedRecord]) -> Vec<ExtremeEventCount> {
        let stats = self.station_statistics(records);
        let mut cells: BTreeMap<(i32, Region), (u64, u64)> = BTreeMap::new();

        for record in records {
            let cell = cells.entry((record.decade, record.region)).or_default();
            let kind = stats
                .get(&record.station_id)
                .and_then(|s| self.classify(record.temperature_c, s));

            match kind {
                Some(ExtremeKind::Hot) => cell.0 += 1,
                Some(ExtremeKind::Cold) => cell.1 += 1,
                None => {}
            }
        }

        let counts: Vec<ExtremeEventCount> = cells
            .into_iter()
            .map(|((decade, region), (extreme_hot, extreme_cold))| ExtremeEventCount {
                decade,
                region,
                extreme_hot,
                extreme_cold,
            })
            .collect();

        debug!(
            stations = stats.len(),
            cells = counts.len(),
            hot = counts.iter().map(|c| c.extreme_hot).sum::<u64>(),
            cold = counts.iter().map(|c| c.extreme_cold).sum::<u64>(),
            "Extreme event detection complete"
        );

        counts
    }
}

impl Default for ExtremeEventDetector {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{StationMetadata, TemperatureRecord};

    fn station(id: &str, latitude: f64) -> StationMetadata {
        StationMetadata::new(id, latitude, 0.0, 0.0, id, "USA")
    }

    fn history(station: &StationMetadata, year: i32, tenths: &[i32]) -> Vec<EnrichedRecord> {
        tenths
            .iter()
            .enumerate()
            .map(|(i, &t)| {
                let record =
                    TemperatureRecord::new(station.station_id.clone(), year, i as u32 % 12 + 1, t);
                EnrichedRecord::from_parts(&record, station).unwrap()
            })
            .collect()
    }

    #[test]
    fn test_outlier_below_threshold_is_not_flagged() {
        // [10, 10, 10, 10, 100] °C: mean 28, sample std ~40.2, hot threshold ~108.5
        let records = history(&station("S", 45.0), 1990, &[100, 100, 100, 100, 1000]);
        let detector = ExtremeEventDetector::new();

        let stats = detector.station_statistics(&records);
        let s = &stats["S"];
        assert!((s.mean - 28.0).abs() < 1e-9);
        assert_eq!(detector.classify(100.0, s), None);

        let counts = detector.detect(&records);
        assert_eq!(counts.len(), 1);
        assert_eq!(counts[0].extreme_hot, 0);
        assert_eq!(counts[0].extreme_cold, 0);
    }

    #[test]
    fn test_threshold_is_strict() {
        let stats = StationStatistics {
            observations: 10,
            mean: 10.0,
            std: Some(5.0),
            min: 0.0,
            max: 30.0,
        };
        let detector = ExtremeEventDetector::new();

        assert_eq!(detector.classify(20.0, &stats), None);
        assert_eq!(detector.classify(20.000001, &stats), Some(ExtremeKind::Hot));
        assert_eq!(detector.classify(0.0, &stats), None);
        assert_eq!(detector.classify(-0.000001, &stats), Some(ExtremeKind::Cold));
        assert_eq!(detector.classify(10.0, &stats), None);
    }

    #[test]
    fn test_record_on_threshold_is_not_flagged() {
        // [0, 3, 6] °C: mean 3, sample std 3, so with sigma 1 both ends sit on a threshold
        let records = history(&station("EDGE", 45.0), 1990, &[0, 30, 60]);

        let on_edge = ExtremeEventDetector::with_sigma(1.0);
        let stats = on_edge.station_statistics(&records);
        assert_eq!(stats["EDGE"].mean, 3.0);
        assert_eq!(stats["EDGE"].std, Some(3.0));
        assert_eq!(on_edge.classify(6.0, &stats["EDGE"]), None);
        assert_eq!(on_edge.classify(0.0, &stats["EDGE"]), None);
        assert_eq!(on_edge.detect(&records)[0].total(), 0);

        let inside = ExtremeEventDetector::with_sigma(0.5).detect(&records);
        assert_eq!(inside[0].extreme_hot, 1);
        assert_eq!(inside[0].extreme_cold, 1);
    }

    #[test]
    fn test_clear_outliers_are_flagged() {
        // 19 zeros and one 100: mean 5, sample std sqrt(500) ~22.4, hot above ~49.7
        let mut tenths = vec![0; 19];
        tenths.push(1000);
        let records = history(&station("S", 45.0), 1990, &tenths);

        let counts = ExtremeEventDetector::new().detect(&records);
        assert_eq!(counts[0].extreme_hot, 1);
        assert_eq!(counts[0].extreme_cold, 0);

        let mut tenths = vec![0; 19];
        tenths.push(-1000);
        let records = history(&station("S", 45.0), 1990, &tenths);

        let counts = ExtremeEventDetector::new().detect(&records);
        assert_eq!(counts[0].extreme_hot, 0);
        assert_eq!(counts[0].extreme_cold, 1);
    }

    #[test]
    fn test_single_observation_station_never_flagged() {
        let records = history(&station("ONE", 45.0), 1990, &[999]);
        let detector = ExtremeEventDetector::new();

        let stats = detector.station_statistics(&records);
        assert_eq!(stats["ONE"].std, None);
        assert!(!stats["ONE"].has_variance());

        let counts = detector.detect(&records);
        assert_eq!(counts.len(), 1);
        assert_eq!(counts[0].total(), 0);
    }

    #[test]
    fn test_constant_station_never_flagged() {
        let records = history(&station("FLAT", 45.0), 1990, &[1, 1, 1, 1, 1, 1, 1]);
        let counts = ExtremeEventDetector::new().detect(&records);
        assert_eq!(counts[0].total(), 0);
    }

    #[test]
    fn test_statistics_are_per_station() {
        let mut tenths = vec![0; 19];
        tenths.push(1000);
        let mut records = history(&station("HOT", 45.0), 1990, &tenths);
        // A warm station whose normal values would be outliers for HOT
        records.extend(history(&station("WARM", 45.0), 1990, &[1000, 1010, 990, 1000]));

        let counts = ExtremeEventDetector::new().detect(&records);
        assert_eq!(counts.len(), 1);
        assert_eq!(counts[0].extreme_hot, 1);
    }

    #[test]
    fn test_counts_per_decade_and_region() {
        let mut tenths = vec![0; 19];
        tenths.push(1000);
        let mut records = history(&station("N", 45.0), 1969, &tenths[..10]);
        records.extend(history(&station("N", 45.0), 1970, &tenths[10..]));
        records.extend(history(&station("S", -45.0), 1975, &[10, 20, 30]));

        let counts = ExtremeEventDetector::new().detect(&records);
        let keys: Vec<(i32, Region)> = counts.iter().map(|c| (c.decade, c.region)).collect();

        assert_eq!(
            keys,
            vec![
                (1960, Region::Northern),
                (1970, Region::Southern),
                (1970, Region::Northern),
            ]
        );
        assert_eq!(counts[0].total(), 0);
        assert_eq!(counts[1].total(), 0);
        assert_eq!(counts[2].extreme_hot, 1);

        let flagged: u64 = counts.iter().map(|c| c.total()).sum();
        assert_eq!(flagged, 1);
    }

    #[test]
    fn test_larger_sigma_flags_less() {
        let mut tenths = vec![0; 19];
        tenths.push(1000);
        let records = history(&station("S", 45.0), 1990, &tenths);

        let counts = ExtremeEventDetector::with_sigma(5.0).detect(&records);
        assert_eq!(counts[0].total(), 0);
    }
}
