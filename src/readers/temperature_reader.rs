use crate::error::Result;
use crate::models::TemperatureRecord;
use std::path::Path;
use tracing::warn;

/// Temperature rows read from CSV plus the number of rows that failed to parse
#[derive(Debug, Clone, Default)]
pub struct TemperatureRows {
    pub records: Vec<TemperatureRecord>,
    pub malformed_rows: usize,
}

pub struct TemperatureReader {
    has_headers: bool,
}

impl TemperatureReader {
    pub fn new() -> Self {
        Self { has_headers: true }
    }

    pub fn with_headers(has_headers: bool) -> Self {
        Self { has_headers }
    }

    /// Read monthly records from `temperature_data.csv`.
    ///
    /// Expected columns: station_id, year, month, temperature (tenths of °C).
    /// Month range and station references are not checked here.
    pub fn read_temperatures(&self, path: &Path) -> Result<TemperatureRows> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(self.has_headers)
            .trim(csv::Trim::All)
            .from_path(path)?;

        let mut rows = TemperatureRows::default();

        for (index, row) in reader.deserialize::<TemperatureRecord>().enumerate() {
            match row {
                Ok(record) => rows.records.push(record),
                Err(e) => {
                    warn!(
                        path = %path.display(),
                        row = index + 1,
                        error = %e,
                        "Skipping malformed temperature row"
                    );
                    rows.malformed_rows += 1;
                }
            }
        }

        Ok(rows)
    }

    /// Write records to CSV with a header row
    pub fn write_temperatures(&self, records: &[TemperatureRecord], path: &Path) -> Result<()> {
        let mut writer = csv::Writer::from_path(path)?;
        for record in records {
            writer.serialize(record)?;
        }
        writer.flush()?;
        Ok(())
    }
}

impl Default for TemperatureReader {
    fn default() -> Self {
        Self::new()
    }
}
