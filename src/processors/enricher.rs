use crate::config::JoinPolicy;
use crate::error::{ProcessingError, Result};
use crate::models::{EnrichedRecord, EnrichmentFailure, StationMetadata, TemperatureRecord};
use std::collections::{BTreeMap, HashMap, HashSet};
use tracing::{debug, info, warn};
use validator::Validate;

/// Row accounting for one enrichment pass.
///
/// Records whose station has no metadata are dropped by the inner join; they
/// are counted here (and per station in `missing_stations`) rather than
/// reported as errors.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnrichmentReport {
    pub input_records: usize,
    pub enriched_records: usize,
    pub dropped_missing_metadata: usize,
    pub dropped_invalid_station: usize,
    pub dropped_invalid_month: usize,
    pub duplicate_stations: usize,
    pub missing_stations: BTreeMap<String, usize>,
}

impl EnrichmentReport {
    pub fn dropped_total(&self) -> usize {
        self.dropped_missing_metadata + self.dropped_invalid_station + self.dropped_invalid_month
    }

    pub fn summary(&self) -> String {
        let mut summary = String::new();

        summary.push_str("=== Enrichment Report ===\n");
        summary.push_str(&format!("Input Records: {}\n", self.input_records));
        summary.push_str(&format!("Enriched Records: {}\n", self.enriched_records));
        summary.push_str(&format!(
            "Dropped (no station metadata): {}\n",
            self.dropped_missing_metadata
        ));
        summary.push_str(&format!(
            "Dropped (invalid station): {}\n",
            self.dropped_invalid_station
        ));
        summary.push_str(&format!(
            "Dropped (invalid month): {}\n",
            self.dropped_invalid_month
        ));

        if self.duplicate_stations > 0 {
            summary.push_str(&format!(
                "Duplicate station metadata rows ignored: {}\n",
                self.duplicate_stations
            ));
        }

        if !self.missing_stations.is_empty() {
            summary.push_str("\nStations without metadata:\n");
            for (station_id, count) in self.missing_stations.iter().take(10) {
                summary.push_str(&format!("  {}: {} records\n", station_id, count));
            }
        }

        summary
    }
}

#[derive(Debug, Clone)]
pub struct Enrichment {
    pub records: Vec<EnrichedRecord>,
    pub report: EnrichmentReport,
}

/// Station lookup built from the metadata rows
struct StationIndex<'a> {
    stations: HashMap<&'a str, &'a StationMetadata>,
    invalid: HashSet<&'a str>,
}

pub struct Enricher {
    policy: JoinPolicy,
}

impl Enricher {
    pub fn new() -> Self {
        Self {
            policy: JoinPolicy::Lenient,
        }
    }

    pub fn with_policy(policy: JoinPolicy) -> Self {
        Self { policy }
    }

    /// Inner-join records with station metadata and derive season, region,
    /// decade and date. Output keeps input order, one row per surviving record.
    pub fn enrich(
        &self,
        records: &[TemperatureRecord],
        metadata: &[StationMetadata],
    ) -> Result<Enrichment> {
        let mut report = EnrichmentReport {
            input_records: records.len(),
            ..Default::default()
        };

        let index = self.index_stations(metadata, &mut report)?;
        let mut enriched = Vec::with_capacity(records.len());

        for record in records {
            let station_id = record.station_id.as_str();

            if index.invalid.contains(station_id) {
                report.dropped_invalid_station += 1;
                continue;
            }

            let Some(station) = index.stations.get(station_id) else {
                if self.policy == JoinPolicy::Strict {
                    return Err(ProcessingError::MissingMetadata {
                        station_id: record.station_id.clone(),
                        records: records
                            .iter()
                            .filter(|r| r.station_id == record.station_id)
                            .count(),
                    });
                }
                report.dropped_missing_metadata += 1;
                *report
                    .missing_stations
                    .entry(record.station_id.clone())
                    .or_default() += 1;
                continue;
            };

            match EnrichedRecord::from_parts(record, station) {
                Ok(row) => enriched.push(row),
                Err(failure) => {
                    if self.policy == JoinPolicy::Strict {
                        return Err(ProcessingError::InvalidRecord(format!(
                            "station {} {}-{:02}: {:?}",
                            record.station_id, record.year, record.month, failure
                        )));
                    }
                    match failure {
                        EnrichmentFailure::InvalidMonth => report.dropped_invalid_month += 1,
                        EnrichmentFailure::NoRegion => report.dropped_invalid_station += 1,
                    }
                }
            }
        }

        report.enriched_records = enriched.len();

        if report.dropped_missing_metadata > 0 {
            warn!(
                dropped = report.dropped_missing_metadata,
                stations = report.missing_stations.len(),
                "Dropped records whose station has no metadata"
            );
        }
        if report.dropped_invalid_station > 0 || report.dropped_invalid_month > 0 {
            warn!(
                invalid_station = report.dropped_invalid_station,
                invalid_month = report.dropped_invalid_month,
                "Dropped records that could not be enriched"
            );
        }
        info!(
            input = report.input_records,
            enriched = report.enriched_records,
            "Enrichment complete"
        );

        Ok(Enrichment {
            records: enriched,
            report,
        })
    }

    fn index_stations<'a>(
        &self,
        metadata: &'a [StationMetadata],
        report: &mut EnrichmentReport,
    ) -> Result<StationIndex<'a>> {
        let mut index = StationIndex {
            stations: HashMap::with_capacity(metadata.len()),
            invalid: HashSet::new(),
        };

        for station in metadata {
            let id = station.station_id.as_str();

            if index.stations.contains_key(id) || index.invalid.contains(id) {
                debug!(station_id = id, "Ignoring duplicate station metadata row");
                report.duplicate_stations += 1;
                continue;
            }

            if let Err(e) = station.validate() {
                if self.policy == JoinPolicy::Strict {
                    return Err(e.into());
                }
                warn!(station_id = id, error = %e, "Station metadata failed validation");
                index.invalid.insert(id);
                continue;
            }

            index.stations.insert(id, station);
        }

        Ok(index)
    }
}

impl Default for Enricher {
    fn default() -> Self {
        Self::new()
    }
}
