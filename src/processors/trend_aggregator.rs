use crate::config::BaselinePeriod;
use crate::models::{
    AnnualGlobalAverage, AnnualRegionalAverage, DecadalRegionalAverage, EnrichedRecord, Region,
    SeasonalAverage,
};
use crate::utils::statistics::MeanAccumulator;
use std::collections::BTreeMap;
use tracing::{debug, warn};

/// The four trend tables of one run, each sorted by its grouping key
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TrendTables {
    pub annual_global: Vec<AnnualGlobalAverage>,
    pub annual_regional: Vec<AnnualRegionalAverage>,
    pub seasonal: Vec<SeasonalAverage>,
    pub decadal: Vec<DecadalRegionalAverage>,
    /// Regions with no data in the baseline period; their anomalies are undefined
    pub undefined_baselines: Vec<Region>,
}

/// Unweighted arithmetic-mean reductions over enriched records.
///
/// Every station-month counts once regardless of station density or area.
pub struct TrendAggregator {
    baseline: BaselinePeriod,
}

impl TrendAggregator {
    pub fn new() -> Self {
        Self {
            baseline: BaselinePeriod::default(),
        }
    }

    pub fn with_baseline(baseline: BaselinePeriod) -> Self {
        Self { baseline }
    }

    /// Run the four reductions. They share no state, so they run in parallel.
    pub fn aggregate(&self, records: &[EnrichedRecord]) -> TrendTables {
        let ((annual_global, (annual_regional, undefined_baselines)), (seasonal, decadal)) =
            rayon::join(
                || {
                    rayon::join(
                        || self.annual_global(records),
                        || self.annual_regional(records),
                    )
                },
                || rayon::join(|| self.seasonal(records), || self.decadal(records)),
            );

        debug!(
            years = annual_global.len(),
            regional_rows = annual_regional.len(),
            seasonal_rows = seasonal.len(),
            decadal_rows = decadal.len(),
            "Trend aggregation complete"
        );

        TrendTables {
            annual_global,
            annual_regional,
            seasonal,
            decadal,
            undefined_baselines,
        }
    }

    /// Mean per year; anomaly against the mean of the per-year means
    pub fn annual_global(&self, records: &[EnrichedRecord]) -> Vec<AnnualGlobalAverage> {
        let yearly = group_means(records, |r| r.year);

        let mut overall = MeanAccumulator::new();
        for value in yearly.values() {
            overall.add(*value);
        }
        let Some(period_mean) = overall.mean() else {
            return Vec::new();
        };

        yearly
            .into_iter()
            .map(|(year, temperature_c)| AnnualGlobalAverage {
                year,
                temperature_c,
                temp_anomaly: temperature_c - period_mean,
            })
            .collect()
    }

    /// Mean per (year, region) with anomalies against each region's baseline.
    ///
    /// The baseline is the mean of the region's yearly means inside the
    /// baseline period. A region with no such years has no baseline, so every
    /// one of its rows carries `None` baseline and anomaly. Those regions are
    /// returned alongside the rows.
    pub fn annual_regional(
        &self,
        records: &[EnrichedRecord],
    ) -> (Vec<AnnualRegionalAverage>, Vec<Region>) {
        let yearly = group_means(records, |r| (r.year, r.region));

        let mut baseline_acc: BTreeMap<Region, MeanAccumulator> = BTreeMap::new();
        for (&(year, region), &value) in &yearly {
            if self.baseline.contains(year) {
                baseline_acc.entry(region).or_default().add(value);
            }
        }
        let baselines: BTreeMap<Region, f64> = baseline_acc
            .into_iter()
            .filter_map(|(region, acc)| acc.mean().map(|m| (region, m)))
            .collect();

        let mut undefined: Vec<Region> = yearly
            .keys()
            .map(|&(_, region)| region)
            .filter(|region| !baselines.contains_key(region))
            .collect();
        undefined.sort();
        undefined.dedup();

        for region in &undefined {
            warn!(
                region = %region,
                baseline_start = self.baseline.start,
                baseline_end = self.baseline.end,
                "Region has no data in the baseline period; anomalies are undefined"
            );
        }

        let rows = yearly
            .into_iter()
            .map(|((year, region), temperature_c)| {
                let baseline_temp = baselines.get(&region).copied();
                AnnualRegionalAverage {
                    year,
                    region,
                    temperature_c,
                    baseline_temp,
                    temp_anomaly: baseline_temp.map(|b| temperature_c - b),
                }
            })
            .collect();

        (rows, undefined)
    }

    pub fn seasonal(&self, records: &[EnrichedRecord]) -> Vec<SeasonalAverage> {
        group_means(records, |r| (r.year, r.season))
            .into_iter()
            .map(|((year, season), temperature_c)| SeasonalAverage {
                year,
                season,
                temperature_c,
            })
            .collect()
    }

    pub fn decadal(&self, records: &[EnrichedRecord]) -> Vec<DecadalRegionalAverage> {
        group_means(records, |r| (r.decade, r.region))
            .into_iter()
            .map(|((decade, region), temperature_c)| DecadalRegionalAverage {
                decade,
                region,
                temperature_c,
            })
            .collect()
    }
}

impl Default for TrendAggregator {
    fn default() -> Self {
        Self::new()
    }
}

/// Mean `temperature_c` per key, ordered by key
fn group_means<K, F>(records: &[EnrichedRecord], key: F) -> BTreeMap<K, f64>
where
    K: Ord,
    F: Fn(&EnrichedRecord) -> K,
{
    let mut groups: BTreeMap<K, MeanAccumulator> = BTreeMap::new();
    for record in records {
        groups.entry(key(record)).or_default().add(record.temperature_c);
    }

    groups
        .into_iter()
        .filter_map(|(k, acc)| acc.mean().map(|m| (k, m)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Season, StationMetadata, TemperatureRecord};
    use pretty_assertions::assert_eq;
    use std::collections::HashSet;

    fn enriched(station: &StationMetadata, year: i32, month: u32, tenths: i32) -> EnrichedRecord {
        let record = TemperatureRecord::new(station.station_id.clone(), year, month, tenths);
        EnrichedRecord::from_parts(&record, station).unwrap()
    }

    fn northern() -> StationMetadata {
        StationMetadata::new("N1", 45.0, 0.0, 0.0, "North", "FRA")
    }

    fn arctic() -> StationMetadata {
        StationMetadata::new("A1", 75.0, 0.0, 0.0, "Arctic", "RUS")
    }

    fn sample() -> Vec<EnrichedRecord> {
        let n = northern();
        let a = arctic();
        vec![
            enriched(&n, 1969, 1, 0),
            enriched(&n, 1969, 7, 200),
            enriched(&a, 1969, 1, -300),
            enriched(&n, 1970, 1, 20),
            enriched(&n, 1970, 12, 40),
            enriched(&a, 1970, 6, 50),
        ]
    }

    #[test]
    fn test_annual_global_mean_of_means() {
        let rows = TrendAggregator::new().annual_global(&sample());

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].year, 1969);
        assert_eq!(rows[1].year, 1970);

        // 1969: (0 + 20 - 30) / 3, 1970: (2 + 4 + 5) / 3
        let y1969 = -10.0 / 3.0;
        let y1970 = 11.0 / 3.0;
        assert!((rows[0].temperature_c - y1969).abs() < 1e-9);
        assert!((rows[1].temperature_c - y1970).abs() < 1e-9);

        let period_mean = (y1969 + y1970) / 2.0;
        assert!((rows[0].temp_anomaly - (y1969 - period_mean)).abs() < 1e-9);
    }

    #[test]
    fn test_global_anomalies_sum_to_zero() {
        let n = northern();
        let records: Vec<EnrichedRecord> = (1960..2000)
            .flat_map(|year| {
                let n = n.clone();
                (1..=12).map(move |month| enriched(&n, year, month, (year - 1900) * month as i32))
            })
            .collect();

        let rows = TrendAggregator::new().annual_global(&records);
        let anomaly_mean: f64 =
            rows.iter().map(|r| r.temp_anomaly).sum::<f64>() / rows.len() as f64;

        assert!(anomaly_mean.abs() < 1e-9);
    }

    #[test]
    fn test_regional_baseline_anomaly() {
        let n = northern();
        let records = vec![
            enriched(&n, 1961, 1, 100),
            enriched(&n, 1990, 1, 200),
            enriched(&n, 2000, 1, 300),
        ];

        let (rows, undefined) = TrendAggregator::new().annual_regional(&records);

        assert!(undefined.is_empty());
        assert_eq!(rows.len(), 3);
        assert!(rows.iter().all(|r| r.baseline_temp == Some(15.0)));
        assert_eq!(rows[0].temp_anomaly, Some(-5.0));
        assert_eq!(rows[1].temp_anomaly, Some(5.0));
        assert_eq!(rows[2].temp_anomaly, Some(15.0));
    }

    #[test]
    fn test_region_without_baseline_is_undefined_for_all_years() {
        let n = northern();
        let a = arctic();
        let records = vec![
            enriched(&n, 1975, 1, 100),
            enriched(&a, 1950, 1, -100),
            enriched(&a, 1995, 1, -50),
            enriched(&n, 1995, 1, 120),
        ];

        let (rows, undefined) = TrendAggregator::new().annual_regional(&records);

        assert_eq!(undefined, vec![Region::Arctic]);
        let arctic_rows: Vec<_> = rows.iter().filter(|r| r.region == Region::Arctic).collect();
        assert_eq!(arctic_rows.len(), 2);
        assert!(arctic_rows
            .iter()
            .all(|r| r.baseline_temp.is_none() && r.temp_anomaly.is_none()));

        let northern_rows: Vec<_> = rows
            .iter()
            .filter(|r| r.region == Region::Northern)
            .collect();
        assert_eq!(northern_rows[0].temp_anomaly, Some(0.0));
        assert!(northern_rows.iter().all(|r| r.has_baseline()));
    }

    #[test]
    fn test_custom_baseline_period() {
        let n = northern();
        let records = vec![enriched(&n, 1955, 1, 100), enriched(&n, 1975, 1, 200)];

        let aggregator = TrendAggregator::with_baseline(BaselinePeriod {
            start: 1951,
            end: 1960,
        });
        let (rows, _) = aggregator.annual_regional(&records);

        assert_eq!(rows[1].baseline_temp, Some(10.0));
        assert_eq!(rows[1].temp_anomaly, Some(10.0));
    }

    #[test]
    fn test_seasonal_groups_december_with_winter() {
        let rows = TrendAggregator::new().seasonal(&sample());
        let keys: Vec<(i32, Season)> = rows.iter().map(|r| (r.year, r.season)).collect();

        assert_eq!(
            keys,
            vec![
                (1969, Season::Winter),
                (1969, Season::Summer),
                (1970, Season::Winter),
                (1970, Season::Summer),
            ]
        );
        // 1970 winter: January 2.0 and December 4.0
        assert!((rows[2].temperature_c - 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_decadal_bucketing() {
        let rows = TrendAggregator::new().decadal(&sample());
        let keys: Vec<(i32, Region)> = rows.iter().map(|r| (r.decade, r.region)).collect();

        assert_eq!(
            keys,
            vec![
                (1960, Region::Northern),
                (1960, Region::Arctic),
                (1970, Region::Northern),
                (1970, Region::Arctic),
            ]
        );
        assert!((rows[0].temperature_c - 10.0).abs() < 1e-9);
        assert!((rows[2].temperature_c - 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_rows_are_uniquely_keyed() {
        let tables = TrendAggregator::new().aggregate(&sample());

        let global: HashSet<_> = tables.annual_global.iter().map(|r| r.year).collect();
        assert_eq!(global.len(), tables.annual_global.len());

        let regional: HashSet<_> = tables
            .annual_regional
            .iter()
            .map(|r| (r.year, r.region))
            .collect();
        assert_eq!(regional.len(), tables.annual_regional.len());

        let seasonal: HashSet<_> = tables.seasonal.iter().map(|r| (r.year, r.season)).collect();
        assert_eq!(seasonal.len(), tables.seasonal.len());

        let decadal: HashSet<_> = tables.decadal.iter().map(|r| (r.decade, r.region)).collect();
        assert_eq!(decadal.len(), tables.decadal.len());
    }

    #[test]
    fn test_input_order_does_not_change_output() {
        let records = sample();
        let mut reversed = records.clone();
        reversed.reverse();

        let aggregator = TrendAggregator::new();
        let forward = aggregator.aggregate(&records);
        let backward = aggregator.aggregate(&reversed);

        assert_eq!(forward.annual_global.len(), backward.annual_global.len());
        for (a, b) in forward.decadal.iter().zip(&backward.decadal) {
            assert_eq!((a.decade, a.region), (b.decade, b.region));
            assert!((a.temperature_c - b.temperature_c).abs() < 1e-9);
        }
    }

    #[test]
    fn test_empty_input() {
        let tables = TrendAggregator::new().aggregate(&[]);
        assert_eq!(tables, TrendTables::default());
    }
}
