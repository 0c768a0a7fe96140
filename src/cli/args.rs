use crate::config::{OutputFormat, PipelineConfig, SourceStrategy, SyntheticConfig};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "climate-trends")]
#[command(about = "Global, regional, seasonal and decadal temperature trend analysis")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(short, long, global = true, help = "Enable verbose logging")]
    pub verbose: bool,

    #[arg(
        long,
        global = true,
        help = "TOML configuration file (overridden by CLIMATE_TRENDS_* variables and flags)"
    )]
    pub config: Option<PathBuf>,
}

impl Cli {
    pub fn get_log_level(&self) -> &'static str {
        if self.verbose {
            "debug"
        } else {
            "info"
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the full analysis and save every result table
    Analyze {
        #[arg(short, long, help = "Directory holding the input CSV files")]
        data_dir: Option<PathBuf>,

        #[arg(short, long, help = "Directory the result tables are written to")]
        results_dir: Option<PathBuf>,

        #[arg(short, long, value_enum, help = "Where input data comes from")]
        source: Option<SourceStrategy>,

        #[arg(short, long, value_enum, help = "Output file format")]
        format: Option<OutputFormat>,

        #[arg(short, long, help = "Parquet compression: snappy, gzip, lz4, zstd or none")]
        compression: Option<String>,

        #[arg(long)]
        max_workers: Option<usize>,

        #[arg(long, help = "Fail on records whose station has no metadata")]
        strict_join: bool,
    },

    /// Write a synthetic sample dataset as input CSV files
    Generate {
        #[arg(short, long)]
        data_dir: Option<PathBuf>,

        #[arg(long)]
        stations: Option<usize>,

        #[arg(long)]
        start_year: Option<i32>,

        #[arg(long)]
        end_year: Option<i32>,

        #[arg(long)]
        seed: Option<u64>,
    },

    /// Summarize the trends of a previous analysis
    Summary {
        #[arg(short, long)]
        results_dir: Option<PathBuf>,

        #[arg(long, help = "Print the summary as JSON")]
        json: bool,
    },

    /// Print rows of one saved result table
    Show {
        #[arg(short, long, help = "Table name, e.g. annual_global_avg")]
        table: String,

        #[arg(short, long)]
        results_dir: Option<PathBuf>,

        #[arg(short, long, default_value = "20")]
        limit: usize,
    },
}

/// Flags that override the layered configuration of an analysis run
pub struct AnalyzeOverrides {
    pub data_dir: Option<PathBuf>,
    pub results_dir: Option<PathBuf>,
    pub source: Option<SourceStrategy>,
    pub format: Option<OutputFormat>,
    pub compression: Option<String>,
    pub max_workers: Option<usize>,
    pub strict_join: bool,
}

impl AnalyzeOverrides {
    pub fn apply(self, mut config: PipelineConfig) -> PipelineConfig {
        if let Some(dir) = self.data_dir {
            config.data_dir = dir;
        }
        if let Some(dir) = self.results_dir {
            config.results_dir = dir;
        }
        if let Some(source) = self.source {
            config.source = source;
        }
        if let Some(format) = self.format {
            config.output_format = format;
        }
        if let Some(compression) = self.compression {
            config.compression = compression;
        }
        if let Some(workers) = self.max_workers {
            config.max_workers = workers;
        }
        if self.strict_join {
            config.join_policy = crate::config::JoinPolicy::Strict;
        }
        config
    }
}

/// Apply `generate` flags on top of the configured synthetic settings
pub fn synthetic_overrides(
    mut synthetic: SyntheticConfig,
    stations: Option<usize>,
    start_year: Option<i32>,
    end_year: Option<i32>,
    seed: Option<u64>,
) -> SyntheticConfig {
    if let Some(stations) = stations {
        synthetic.stations = stations;
    }
    if let Some(start_year) = start_year {
        synthetic.start_year = start_year;
    }
    if let Some(end_year) = end_year {
        synthetic.end_year = end_year;
    }
    if let Some(seed) = seed {
        synthetic.seed = seed;
    }
    synthetic
}
