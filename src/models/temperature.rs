use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One monthly mean temperature observation, as delivered by the source.
///
/// `temperature` is stored in tenths of a degree Celsius, the GHCN-M convention.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemperatureRecord {
    pub station_id: String,
    pub year: i32,
    pub month: u32,
    pub temperature: i32,
}

impl TemperatureRecord {
    pub fn new(station_id: impl Into<String>, year: i32, month: u32, temperature: i32) -> Self {
        Self {
            station_id: station_id.into(),
            year,
            month,
            temperature,
        }
    }

    /// Temperature converted from tenths to whole degrees Celsius
    pub fn temperature_c(&self) -> f64 {
        f64::from(self.temperature) / 10.0
    }

    /// First day of the observed month, `None` for a month outside 1..=12
    pub fn date(&self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month, 1)
    }

    pub fn decade(&self) -> i32 {
        decade_of(self.year)
    }
}

/// Decade bucket labelled by its first year: 1969 -> 1960, 1970 -> 1970
pub fn decade_of(year: i32) -> i32 {
    year.div_euclid(10) * 10
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_temperature_conversion() {
        let record = TemperatureRecord::new("STATION001", 1990, 7, 253);
        assert!((record.temperature_c() - 25.3).abs() < 1e-9);

        let record = TemperatureRecord::new("STATION001", 1990, 1, -125);
        assert!((record.temperature_c() + 12.5).abs() < 1e-9);
    }

    #[test]
    fn test_decade_bucketing() {
        assert_eq!(decade_of(1969), 1960);
        assert_eq!(decade_of(1970), 1970);
        assert_eq!(decade_of(2020), 2020);
        assert_eq!(decade_of(1961), 1960);
        assert_eq!(decade_of(-5), -10);
    }

    #[test]
    fn test_date_derivation() {
        let record = TemperatureRecord::new("STATION001", 1975, 12, 0);
        assert_eq!(record.date(), NaiveDate::from_ymd_opt(1975, 12, 1));

        let invalid = TemperatureRecord::new("STATION001", 1975, 13, 0);
        assert_eq!(invalid.date(), None);

        let zero = TemperatureRecord::new("STATION001", 1975, 0, 0);
        assert_eq!(zero.date(), None);
    }
}
