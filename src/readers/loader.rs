use crate::config::{PipelineConfig, SourceStrategy};
use crate::error::{ProcessingError, Result};
use crate::models::{StationMetadata, TemperatureRecord};
use crate::readers::{StationReader, SyntheticGenerator, TemperatureReader};
use crate::utils::constants::{STATION_METADATA_FILE, TEMPERATURE_DATA_FILE};
use std::collections::HashSet;
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Which source actually supplied the data
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataOrigin {
    Persisted(PathBuf),
    Synthetic,
}

impl fmt::Display for DataOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataOrigin::Persisted(dir) => write!(f, "persisted files in {}", dir.display()),
            DataOrigin::Synthetic => write!(f, "synthetic sample data"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadReport {
    pub origin: DataOrigin,
    pub station_rows: usize,
    pub record_rows: usize,
    pub malformed_station_rows: usize,
    pub malformed_record_rows: usize,
}

/// Raw row-sets as delivered by the source, unvalidated
#[derive(Debug, Clone)]
pub struct RawDataset {
    pub stations: Vec<StationMetadata>,
    pub records: Vec<TemperatureRecord>,
    pub report: LoadReport,
}

impl RawDataset {
    pub fn new(
        stations: Vec<StationMetadata>,
        records: Vec<TemperatureRecord>,
        origin: DataOrigin,
    ) -> Self {
        let report = LoadReport {
            origin,
            station_rows: stations.len(),
            record_rows: records.len(),
            malformed_station_rows: 0,
            malformed_record_rows: 0,
        };
        Self {
            stations,
            records,
            report,
        }
    }

    pub fn unique_station_count(&self) -> usize {
        self.records
            .iter()
            .map(|r| r.station_id.as_str())
            .collect::<HashSet<_>>()
            .len()
    }
}

pub struct Loader<'a> {
    config: &'a PipelineConfig,
}

impl<'a> Loader<'a> {
    pub fn new(config: &'a PipelineConfig) -> Self {
        Self { config }
    }

    /// Load station metadata and temperature records using the configured source strategy
    pub fn load(&self) -> Result<RawDataset> {
        let dataset = match self.config.source {
            SourceStrategy::Persisted => self.load_persisted(&self.config.data_dir)?,
            SourceStrategy::Synthetic => self.load_synthetic()?,
            SourceStrategy::PersistedOrSynthetic => {
                if persisted_files_exist(&self.config.data_dir) {
                    self.load_persisted(&self.config.data_dir)?
                } else {
                    warn!(
                        data_dir = %self.config.data_dir.display(),
                        "Persisted data not found, falling back to synthetic sample data"
                    );
                    self.load_synthetic()?
                }
            }
        };

        info!(
            origin = %dataset.report.origin,
            records = dataset.records.len(),
            stations = dataset.unique_station_count(),
            "Loaded temperature data"
        );

        Ok(dataset)
    }

    fn load_persisted(&self, data_dir: &Path) -> Result<RawDataset> {
        let stations_path = data_dir.join(STATION_METADATA_FILE);
        let records_path = data_dir.join(TEMPERATURE_DATA_FILE);

        for path in [&stations_path, &records_path] {
            if !path.exists() {
                return Err(ProcessingError::DataUnavailable(format!(
                    "{} not found and no fallback source configured",
                    path.display()
                )));
            }
        }

        let station_rows = StationReader::new().read_stations(&stations_path)?;
        let record_rows = TemperatureReader::new().read_temperatures(&records_path)?;

        let report = LoadReport {
            origin: DataOrigin::Persisted(data_dir.to_path_buf()),
            station_rows: station_rows.stations.len(),
            record_rows: record_rows.records.len(),
            malformed_station_rows: station_rows.malformed_rows,
            malformed_record_rows: record_rows.malformed_rows,
        };

        if report.malformed_station_rows > 0 || report.malformed_record_rows > 0 {
            warn!(
                malformed_station_rows = report.malformed_station_rows,
                malformed_record_rows = report.malformed_record_rows,
                "Skipped rows that could not be parsed"
            );
        }

        Ok(RawDataset {
            stations: station_rows.stations,
            records: record_rows.records,
            report,
        })
    }

    fn load_synthetic(&self) -> Result<RawDataset> {
        let (stations, records) =
            SyntheticGenerator::new(self.config.synthetic.clone()).generate()?;
        Ok(RawDataset::new(stations, records, DataOrigin::Synthetic))
    }
}

fn persisted_files_exist(data_dir: &Path) -> bool {
    data_dir.join(STATION_METADATA_FILE).exists() && data_dir.join(TEMPERATURE_DATA_FILE).exists()
}
