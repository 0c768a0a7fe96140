pub mod aggregates;
pub mod classification;
pub mod enriched;
pub mod station;
pub mod temperature;

pub use aggregates::{
    AnnualGlobalAverage, AnnualRegionalAverage, DecadalRegionalAverage, ExtremeEventCount,
    SeasonalAverage,
};
pub use classification::{Region, Season};
pub use enriched::{EnrichedRecord, EnrichmentFailure};
pub use station::StationMetadata;
pub use temperature::{decade_of, TemperatureRecord};
