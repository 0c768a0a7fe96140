use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::{Region, Season, StationMetadata, TemperatureRecord};

/// A temperature record joined with its station metadata and derived fields.
///
/// Field order is the column order of the `processed_data` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnrichedRecord {
    pub station_id: String,
    pub year: i32,
    pub month: u32,
    pub temperature: i32,
    pub temperature_c: f64,
    pub date: NaiveDate,
    pub season: Season,
    pub latitude: f64,
    pub longitude: f64,
    pub elevation: f64,
    pub name: String,
    pub country: String,
    pub region: Region,
    pub decade: i32,
}

/// Why a record could not be enriched
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnrichmentFailure {
    InvalidMonth,
    NoRegion,
}

impl EnrichedRecord {
    /// Join one record with its station, deriving date, season, region and decade
    pub fn from_parts(
        record: &TemperatureRecord,
        station: &StationMetadata,
    ) -> std::result::Result<Self, EnrichmentFailure> {
        let date = record.date().ok_or(EnrichmentFailure::InvalidMonth)?;
        let season = Season::from_month(record.month).ok_or(EnrichmentFailure::InvalidMonth)?;
        let region = station.region().ok_or(EnrichmentFailure::NoRegion)?;

        Ok(Self {
            station_id: record.station_id.clone(),
            year: record.year,
            month: record.month,
            temperature: record.temperature,
            temperature_c: record.temperature_c(),
            date,
            season,
            latitude: station.latitude,
            longitude: station.longitude,
            elevation: station.elevation,
            name: station.name.clone(),
            country: station.country.clone(),
            region,
            decade: record.decade(),
        })
    }
}
