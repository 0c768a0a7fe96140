use crate::config::SyntheticConfig;
use crate::error::{ProcessingError, Result};
use crate::models::{StationMetadata, TemperatureRecord};
use crate::readers::{StationReader, TemperatureReader};
use crate::utils::constants::{SAMPLE_COUNTRIES, STATION_METADATA_FILE, TEMPERATURE_DATA_FILE};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Normal};
use std::f64::consts::PI;
use std::path::Path;
use tracing::info;

/// Generates a reproducible sample dataset with a latitude gradient, a
/// hemisphere-aware seasonal cycle, a warming trend of 1°C per century and
/// Gaussian month-to-month noise.
pub struct SyntheticGenerator {
    config: SyntheticConfig,
}

impl SyntheticGenerator {
    pub fn new(config: SyntheticConfig) -> Self {
        Self { config }
    }

    /// Generate station metadata and one record per station and month
    pub fn generate(&self) -> Result<(Vec<StationMetadata>, Vec<TemperatureRecord>)> {
        let mut rng = StdRng::seed_from_u64(self.config.seed);
        let noise = Normal::new(0.0, 1.5)
            .map_err(|e| ProcessingError::Config(format!("Invalid noise distribution: {}", e)))?;

        let stations: Vec<StationMetadata> = (0..self.config.stations)
            .map(|i| {
                StationMetadata::new(
                    format!("STATION{:03}", i),
                    rng.gen_range(-60.0..80.0),
                    rng.gen_range(-180.0..180.0),
                    rng.gen_range(0.0..2000.0),
                    format!("Sample Station {}", i),
                    SAMPLE_COUNTRIES[rng.gen_range(0..SAMPLE_COUNTRIES.len())],
                )
            })
            .collect();

        let years = self.config.start_year..=self.config.end_year;
        let mut records = Vec::with_capacity(stations.len() * years.clone().count() * 12);

        for station in &stations {
            let base_temp = 25.0 - 0.3 * station.latitude.abs();
            let phase = if station.is_northern_hemisphere() { 1.0 } else { 7.0 };

            for year in years.clone() {
                for month in 1..=12u32 {
                    let seasonal = 15.0 * (2.0 * PI * (f64::from(month) - phase) / 12.0).sin();
                    let trend = 0.01 * f64::from(year - self.config.start_year);
                    let temperature = base_temp + seasonal + trend + noise.sample(&mut rng);

                    records.push(TemperatureRecord::new(
                        station.station_id.clone(),
                        year,
                        month,
                        (temperature * 10.0).round() as i32,
                    ));
                }
            }
        }

        info!(
            stations = stations.len(),
            records = records.len(),
            start_year = self.config.start_year,
            end_year = self.config.end_year,
            "Generated synthetic sample data"
        );

        Ok((stations, records))
    }

    /// Generate the sample dataset and write both input CSV files into `data_dir`
    pub fn write_to_dir(&self, data_dir: &Path) -> Result<(usize, usize)> {
        let (stations, records) = self.generate()?;

        std::fs::create_dir_all(data_dir)?;
        StationReader::new().write_stations(&stations, &data_dir.join(STATION_METADATA_FILE))?;
        TemperatureReader::new()
            .write_temperatures(&records, &data_dir.join(TEMPERATURE_DATA_FILE))?;

        Ok((stations.len(), records.len()))
    }
}

impl Default for SyntheticGenerator {
    fn default() -> Self {
        Self::new(SyntheticConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_config(seed: u64) -> SyntheticConfig {
        SyntheticConfig {
            stations: 5,
            start_year: 1960,
            end_year: 1962,
            seed,
        }
    }

    #[test]
    fn test_generate_shape() -> Result<()> {
        let (stations, records) = SyntheticGenerator::new(small_config(42)).generate()?;

        assert_eq!(stations.len(), 5);
        assert_eq!(records.len(), 5 * 3 * 12);
        assert_eq!(stations[0].station_id, "STATION000");
        assert_eq!(stations[4].name, "Sample Station 4");

        for station in &stations {
            assert!((-60.0..80.0).contains(&station.latitude));
            assert!((-180.0..180.0).contains(&station.longitude));
            assert!((0.0..2000.0).contains(&station.elevation));
            assert!(SAMPLE_COUNTRIES.contains(&station.country.as_str()));
        }

        assert!(records.iter().all(|r| (1..=12).contains(&r.month)));
        Ok(())
    }

    #[test]
    fn test_same_seed_same_data() -> Result<()> {
        let first = SyntheticGenerator::new(small_config(7)).generate()?;
        let second = SyntheticGenerator::new(small_config(7)).generate()?;

        assert_eq!(first.0, second.0);
        assert_eq!(first.1, second.1);
        Ok(())
    }

    #[test]
    fn test_different_seed_different_data() -> Result<()> {
        let first = SyntheticGenerator::new(small_config(1)).generate()?;
        let second = SyntheticGenerator::new(small_config(2)).generate()?;

        assert_ne!(first.1, second.1);
        Ok(())
    }

    #[test]
    fn test_write_to_dir() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let (stations, records) =
            SyntheticGenerator::new(small_config(42)).write_to_dir(dir.path())?;

        assert_eq!(stations, 5);
        assert_eq!(records, 180);
        assert!(dir.path().join(STATION_METADATA_FILE).exists());
        assert!(dir.path().join(TEMPERATURE_DATA_FILE).exists());
        Ok(())
    }
}
