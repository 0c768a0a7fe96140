/// Input file names
pub const STATION_METADATA_FILE: &str = "station_metadata.csv";
pub const TEMPERATURE_DATA_FILE: &str = "temperature_data.csv";

/// Directory names
pub const DEFAULT_DATA_DIR: &str = "data";
pub const DEFAULT_RESULTS_DIR: &str = "results";

/// Baseline period for regional anomalies (inclusive)
pub const BASELINE_START_YEAR: i32 = 1961;
pub const BASELINE_END_YEAR: i32 = 1990;

/// Standard deviations from the station mean beyond which a month is extreme
pub const DEFAULT_EXTREME_SIGMA: f64 = 2.0;

/// Synthetic sample defaults
pub const SAMPLE_STATION_COUNT: usize = 100;
pub const SAMPLE_START_YEAR: i32 = 1960;
pub const SAMPLE_END_YEAR: i32 = 2020;
pub const SAMPLE_SEED: u64 = 42;
pub const SAMPLE_COUNTRIES: [&str; 12] = [
    "USA", "CAN", "MEX", "BRA", "ARG", "GBR", "FRA", "DEU", "RUS", "CHN", "IND", "AUS",
];

/// Processing defaults
pub const DEFAULT_ROW_GROUP_SIZE: usize = 10000;

/// Environment variable prefix for configuration overrides
pub const ENV_PREFIX: &str = "CLIMATE_TRENDS";

/// Parquet compression options
pub const COMPRESSION_SNAPPY: &str = "snappy";
pub const COMPRESSION_GZIP: &str = "gzip";
pub const COMPRESSION_LZ4: &str = "lz4";
pub const COMPRESSION_ZSTD: &str = "zstd";
pub const COMPRESSION_NONE: &str = "none";
