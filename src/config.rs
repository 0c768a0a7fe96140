//! Pipeline configuration.
//!
//! Settings are layered with the `config` crate: built-in defaults, then an
//! optional TOML file, then `CLIMATE_TRENDS_*` environment variables (nested
//! keys separated by `__`, e.g. `CLIMATE_TRENDS_BASELINE__START`). Command-line
//! flags are applied on top by the CLI.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::utils::constants::{
    BASELINE_END_YEAR, BASELINE_START_YEAR, COMPRESSION_SNAPPY, DEFAULT_DATA_DIR,
    DEFAULT_EXTREME_SIGMA, DEFAULT_RESULTS_DIR, ENV_PREFIX, SAMPLE_END_YEAR, SAMPLE_SEED,
    SAMPLE_START_YEAR, SAMPLE_STATION_COUNT,
};

/// Where the loader gets its input from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum SourceStrategy {
    /// CSV files in the data directory; missing files fail the run
    Persisted,
    /// Generated sample data, no files needed
    Synthetic,
    /// CSV files when both exist, generated sample data otherwise
    PersistedOrSynthetic,
}

/// What the enricher does with records it cannot join or derive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum JoinPolicy {
    /// Drop and count
    Lenient,
    /// Fail the run
    Strict,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum OutputFormat {
    Csv,
    Parquet,
    Both,
}

impl OutputFormat {
    pub fn writes_csv(&self) -> bool {
        matches!(self, OutputFormat::Csv | OutputFormat::Both)
    }

    pub fn writes_parquet(&self) -> bool {
        matches!(self, OutputFormat::Parquet | OutputFormat::Both)
    }
}

/// Inclusive year range regional anomalies are measured against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BaselinePeriod {
    pub start: i32,
    pub end: i32,
}

impl BaselinePeriod {
    pub fn contains(&self, year: i32) -> bool {
        (self.start..=self.end).contains(&year)
    }
}

impl Default for BaselinePeriod {
    fn default() -> Self {
        Self {
            start: BASELINE_START_YEAR,
            end: BASELINE_END_YEAR,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SyntheticConfig {
    pub stations: usize,
    pub start_year: i32,
    pub end_year: i32,
    pub seed: u64,
}

impl Default for SyntheticConfig {
    fn default() -> Self {
        Self {
            stations: SAMPLE_STATION_COUNT,
            start_year: SAMPLE_START_YEAR,
            end_year: SAMPLE_END_YEAR,
            seed: SAMPLE_SEED,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub data_dir: PathBuf,
    pub results_dir: PathBuf,
    pub source: SourceStrategy,
    pub baseline: BaselinePeriod,
    pub extreme_sigma: f64,
    pub join_policy: JoinPolicy,
    pub synthetic: SyntheticConfig,
    pub max_workers: usize,
    pub output_format: OutputFormat,
    pub compression: String,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            results_dir: PathBuf::from(DEFAULT_RESULTS_DIR),
            source: SourceStrategy::Persisted,
            baseline: BaselinePeriod::default(),
            extreme_sigma: DEFAULT_EXTREME_SIGMA,
            join_policy: JoinPolicy::Lenient,
            synthetic: SyntheticConfig::default(),
            max_workers: num_cpus::get(),
            output_format: OutputFormat::Csv,
            compression: COMPRESSION_SNAPPY.to_string(),
        }
    }
}

impl PipelineConfig {
    /// Build configuration from defaults, an optional file and the environment
    pub fn load(file: Option<&Path>) -> Result<Self> {
        let mut builder = config::Config::builder();

        if let Some(path) = file {
            builder = builder.add_source(config::File::from(path).required(true));
        }

        let settings = builder
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let config: PipelineConfig = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    pub fn with_data_dir(mut self, data_dir: impl Into<PathBuf>) -> Self {
        self.data_dir = data_dir.into();
        self
    }

    pub fn with_results_dir(mut self, results_dir: impl Into<PathBuf>) -> Self {
        self.results_dir = results_dir.into();
        self
    }

    pub fn with_source(mut self, source: SourceStrategy) -> Self {
        self.source = source;
        self
    }

    pub fn with_join_policy(mut self, join_policy: JoinPolicy) -> Self {
        self.join_policy = join_policy;
        self
    }

    pub fn with_max_workers(mut self, max_workers: usize) -> Self {
        self.max_workers = max_workers;
        self
    }

    pub fn with_synthetic(mut self, synthetic: SyntheticConfig) -> Self {
        self.synthetic = synthetic;
        self
    }

    /// Reject settings no stage can work with
    pub fn validate(&self) -> Result<()> {
        use crate::error::ProcessingError;

        if self.baseline.start > self.baseline.end {
            return Err(ProcessingError::Config(format!(
                "Baseline start {} is after baseline end {}",
                self.baseline.start, self.baseline.end
            )));
        }

        if !(self.extreme_sigma.is_finite() && self.extreme_sigma > 0.0) {
            return Err(ProcessingError::Config(format!(
                "extreme_sigma must be a positive number, got {}",
                self.extreme_sigma
            )));
        }

        if self.max_workers == 0 {
            return Err(ProcessingError::Config(
                "max_workers must be at least 1".to_string(),
            ));
        }

        if self.synthetic.start_year > self.synthetic.end_year {
            return Err(ProcessingError::Config(format!(
                "Synthetic start year {} is after end year {}",
                self.synthetic.start_year, self.synthetic.end_year
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = PipelineConfig::default();
        assert_eq!(config.baseline, BaselinePeriod { start: 1961, end: 1990 });
        assert_eq!(config.extreme_sigma, 2.0);
        assert_eq!(config.join_policy, JoinPolicy::Lenient);
        assert_eq!(config.source, SourceStrategy::Persisted);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_baseline_is_inclusive() {
        let baseline = BaselinePeriod::default();
        assert!(!baseline.contains(1960));
        assert!(baseline.contains(1961));
        assert!(baseline.contains(1990));
        assert!(!baseline.contains(1991));
    }

    #[test]
    fn test_load_from_file() -> Result<()> {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile()?;
        writeln!(file, "results_dir = \"out\"")?;
        writeln!(file, "source = \"persisted-or-synthetic\"")?;
        writeln!(file, "join_policy = \"strict\"")?;
        writeln!(file, "extreme_sigma = 3.0")?;
        writeln!(file, "[baseline]")?;
        writeln!(file, "start = 1951")?;
        writeln!(file, "end = 1980")?;

        let config = PipelineConfig::load(Some(file.path()))?;

        assert_eq!(config.results_dir, PathBuf::from("out"));
        assert_eq!(config.source, SourceStrategy::PersistedOrSynthetic);
        assert_eq!(config.join_policy, JoinPolicy::Strict);
        assert_eq!(config.extreme_sigma, 3.0);
        assert_eq!(config.baseline, BaselinePeriod { start: 1951, end: 1980 });
        // Untouched keys keep their defaults
        assert_eq!(config.data_dir, PathBuf::from("data"));
        assert_eq!(config.synthetic.stations, 100);

        Ok(())
    }

    #[test]
    fn test_rejects_inverted_baseline() {
        let mut config = PipelineConfig::default();
        config.baseline = BaselinePeriod { start: 1990, end: 1961 };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_non_positive_sigma() {
        let mut config = PipelineConfig::default();
        config.extreme_sigma = 0.0;
        assert!(config.validate().is_err());
    }
}
