use crate::analyzers::TrendAnalyzer;
use crate::cli::args::{synthetic_overrides, AnalyzeOverrides, Cli, Commands};
use crate::config::PipelineConfig;
use crate::error::{ProcessingError, Result};
use crate::processors::{AnalysisPipeline, PipelineRun, PIPELINE_STAGES};
use crate::readers::SyntheticGenerator;
use crate::store::{ResultStore, TableName};
use crate::utils::progress::ProgressReporter;
use crate::writers::{CsvTableWriter, ParquetWriter, ResultWriter};
use tracing::info;

pub async fn run(cli: Cli) -> Result<()> {
    setup_logging(&cli)?;

    let config = PipelineConfig::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Analyze {
            data_dir,
            results_dir,
            source,
            format,
            compression,
            max_workers,
            strict_join,
        } => {
            let overrides = AnalyzeOverrides {
                data_dir,
                results_dir,
                source,
                format,
                compression,
                max_workers,
                strict_join,
            };
            let config = overrides.apply(config);
            config.validate()?;

            analyze(config).await?;
        }

        Commands::Generate {
            data_dir,
            stations,
            start_year,
            end_year,
            seed,
        } => {
            let data_dir = data_dir.unwrap_or_else(|| config.data_dir.clone());
            let synthetic = synthetic_overrides(
                config.synthetic.clone(),
                stations,
                start_year,
                end_year,
                seed,
            );
            config.clone().with_synthetic(synthetic.clone()).validate()?;

            println!("Generating synthetic sample data...");
            println!(
                "Stations: {}, Years: {}-{}, Seed: {}",
                synthetic.stations, synthetic.start_year, synthetic.end_year, synthetic.seed
            );

            let (stations, records) = SyntheticGenerator::new(synthetic).write_to_dir(&data_dir)?;

            println!(
                "Wrote {} stations and {} records to {}",
                stations,
                records,
                data_dir.display()
            );
        }

        Commands::Summary { results_dir, json } => {
            let results_dir = results_dir.unwrap_or(config.results_dir);
            let store = ResultStore::load_dir(&results_dir)?;
            let summary = TrendAnalyzer::new().analyze(&store)?;

            if json {
                println!("{}", serde_json::to_string_pretty(&summary)?);
            } else {
                println!("Climate Trend Summary ({})", results_dir.display());
                println!("\n{}", summary.detailed_summary());
            }
        }

        Commands::Show {
            table,
            results_dir,
            limit,
        } => {
            let name: TableName = table.parse()?;
            let results_dir = results_dir.unwrap_or(config.results_dir);
            let store = ResultStore::load_dir(&results_dir)?;
            let table = store.get(name)?;

            println!("{} ({} rows, showing {})", name, table.len(), limit.min(table.len()));
            CsvTableWriter::new().write_to(&table, std::io::stdout().lock(), limit)?;
        }
    }

    Ok(())
}

async fn analyze(config: PipelineConfig) -> Result<()> {
    println!("Analyzing temperature data...");
    println!("Source: {:?}, Data directory: {}", config.source, config.data_dir.display());
    println!(
        "Results directory: {}, Workers: {}",
        config.results_dir.display(),
        config.max_workers
    );

    let writer = ResultWriter::new(config.output_format).with_compression(&config.compression)?;
    let results_dir = config.results_dir.clone();
    let parquet = config
        .output_format
        .writes_parquet()
        .then(|| ParquetWriter::new().with_compression(&config.compression))
        .transpose()?;

    let progress = ProgressReporter::new(PIPELINE_STAGES, "Running analysis...", false);
    let pipeline = AnalysisPipeline::new(config);
    let run = tokio::task::spawn_blocking(move || -> Result<PipelineRun> {
        let run = pipeline.run(Some(&progress))?;
        progress.finish_with_message(&format!(
            "Analyzed {} records from {}",
            run.enrichment_report.enriched_records, run.load_report.origin
        ));
        Ok(run)
    })
    .await??;

    println!("\n{}", run.enrichment_report.summary());

    if !run.undefined_baselines.is_empty() {
        let regions: Vec<&str> = run.undefined_baselines.iter().map(|r| r.as_str()).collect();
        println!(
            "Regions without baseline data (anomalies undefined): {}",
            regions.join(", ")
        );
    }

    let paths = writer.write_all(&run.store, &results_dir).await?;

    println!("\nSaved {} files to {}", paths.len(), results_dir.display());
    for path in &paths {
        println!("- {}", path.display());
    }

    if let Some(parquet) = parquet {
        let processed = results_dir.join(TableName::ProcessedData.file_name("parquet"));
        let file_info = parquet.get_file_info(&processed)?;
        println!("\n{}", file_info.summary());
    }

    info!("Analysis complete");
    Ok(())
}

fn setup_logging(cli: &Cli) -> Result<()> {
    use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let log_level = cli.get_log_level();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("climate_trends={}", log_level)));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(false)
                .with_level(true)
                .with_writer(std::io::stderr)
                .compact(),
        )
        .try_init()
        .map_err(|e| ProcessingError::Config(format!("Failed to initialize logging: {}", e)))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{SourceStrategy, SyntheticConfig};
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_analyze_runs_pipeline_off_the_runtime() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let results_dir = temp_dir.path().join("results");
        let config = PipelineConfig::default()
            .with_source(SourceStrategy::Synthetic)
            .with_results_dir(&results_dir)
            .with_max_workers(2)
            .with_synthetic(SyntheticConfig {
                stations: 4,
                start_year: 1960,
                end_year: 1970,
                seed: 3,
            });

        analyze(config).await?;

        for name in TableName::ALL {
            assert!(results_dir.join(name.file_name("csv")).exists(), "{}", name);
        }
        let store = ResultStore::load_dir(&results_dir)?;
        assert_eq!(store.processed_data()?.len(), 4 * 11 * 12);
        Ok(())
    }
}
