pub mod loader;
pub mod station_reader;
pub mod synthetic;
pub mod temperature_reader;

pub use loader::{DataOrigin, LoadReport, Loader, RawDataset};
pub use station_reader::{StationReader, StationRows};
pub use synthetic::SyntheticGenerator;
pub use temperature_reader::{TemperatureReader, TemperatureRows};
