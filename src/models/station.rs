use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::Region;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct StationMetadata {
    #[validate(length(min = 1))]
    pub station_id: String,

    #[validate(range(min = -90.0, max = 90.0))]
    pub latitude: f64,

    #[validate(range(min = -180.0, max = 180.0))]
    pub longitude: f64,

    pub elevation: f64,

    pub name: String,

    pub country: String,
}

impl StationMetadata {
    pub fn new(
        station_id: impl Into<String>,
        latitude: f64,
        longitude: f64,
        elevation: f64,
        name: impl Into<String>,
        country: impl Into<String>,
    ) -> Self {
        Self {
            station_id: station_id.into(),
            latitude,
            longitude,
            elevation,
            name: name.into(),
            country: country.into(),
        }
    }

    /// Latitude band this station falls in, `None` when the latitude is unusable
    pub fn region(&self) -> Option<Region> {
        Region::from_latitude(self.latitude)
    }

    pub fn is_northern_hemisphere(&self) -> bool {
        self.latitude >= 0.0
    }
}
