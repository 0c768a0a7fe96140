use crate::error::Result;
use crate::models::StationMetadata;
use std::path::Path;
use tracing::warn;

/// Station metadata rows read from CSV plus the number of rows that failed to parse
#[derive(Debug, Clone, Default)]
pub struct StationRows {
    pub stations: Vec<StationMetadata>,
    pub malformed_rows: usize,
}

pub struct StationReader {
    has_headers: bool,
}

impl StationReader {
    pub fn new() -> Self {
        Self { has_headers: true }
    }

    pub fn with_headers(has_headers: bool) -> Self {
        Self { has_headers }
    }

    /// Read station metadata from `station_metadata.csv`.
    ///
    /// Expected columns: station_id, latitude, longitude, elevation, name, country.
    /// Rows that do not parse are skipped and counted.
    pub fn read_stations(&self, path: &Path) -> Result<StationRows> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(self.has_headers)
            .trim(csv::Trim::All)
            .from_path(path)?;

        let mut rows = StationRows::default();

        for (index, row) in reader.deserialize::<StationMetadata>().enumerate() {
            match row {
                Ok(station) => rows.stations.push(station),
                Err(e) => {
                    warn!(
                        path = %path.display(),
                        row = index + 1,
                        error = %e,
                        "Skipping malformed station row"
                    );
                    rows.malformed_rows += 1;
                }
            }
        }

        Ok(rows)
    }

    /// Write station metadata to CSV with a header row
    pub fn write_stations(&self, stations: &[StationMetadata], path: &Path) -> Result<()> {
        let mut writer = csv::Writer::from_path(path)?;
        for station in stations {
            writer.serialize(station)?;
        }
        writer.flush()?;
        Ok(())
    }
}

impl Default for StationReader {
    fn default() -> Self {
        Self::new()
    }
}
