use crate::config::PipelineConfig;
use crate::error::{ProcessingError, Result};
use crate::models::Region;
use crate::processors::{Enricher, EnrichmentReport, ExtremeEventDetector, TrendAggregator};
use crate::readers::{LoadReport, Loader, RawDataset};
use crate::store::ResultStore;
use crate::utils::progress::ProgressReporter;
use tracing::{info, warn};

/// Number of progress stages a run reports
pub const PIPELINE_STAGES: u64 = 4;

/// Outcome of one analysis run
#[derive(Debug, Clone)]
pub struct PipelineRun {
    pub store: ResultStore,
    pub load_report: LoadReport,
    pub enrichment_report: EnrichmentReport,
    /// Regions whose regional anomalies are undefined for lack of baseline data
    pub undefined_baselines: Vec<Region>,
}

/// Load, enrich, reduce and detect, in that order.
///
/// Trend reductions and extreme detection only read the enriched records, so
/// they run side by side on a pool of `max_workers` threads.
pub struct AnalysisPipeline {
    config: PipelineConfig,
}

impl AnalysisPipeline {
    pub fn new(config: PipelineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Run the whole analysis from the configured source
    pub fn run(&self, progress: Option<&ProgressReporter>) -> Result<PipelineRun> {
        if let Some(p) = progress {
            p.set_message("Loading source data...");
        }

        let dataset = Loader::new(&self.config).load()?;

        if let Some(p) = progress {
            p.update(1);
        }

        self.run_dataset(dataset, progress)
    }

    /// Run the analysis over an already loaded dataset
    pub fn run_dataset(
        &self,
        dataset: RawDataset,
        progress: Option<&ProgressReporter>,
    ) -> Result<PipelineRun> {
        let RawDataset {
            stations,
            records,
            report: load_report,
        } = dataset;

        if let Some(p) = progress {
            p.set_message("Joining records with station metadata...");
        }

        let enrichment =
            Enricher::with_policy(self.config.join_policy).enrich(&records, &stations)?;
        drop(records);

        if enrichment.report.dropped_total() > 0 {
            warn!(
                dropped = enrichment.report.dropped_total(),
                missing_metadata = enrichment.report.dropped_missing_metadata,
                "Some records were dropped during enrichment"
            );
        }

        if enrichment.records.is_empty() {
            return Err(ProcessingError::EmptyDataset(format!(
                "none of {} input records could be enriched",
                enrichment.report.input_records
            )));
        }

        if let Some(p) = progress {
            p.update(2);
            p.set_message("Computing trends and extreme events...");
        }

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.config.max_workers)
            .build()
            .map_err(|e| ProcessingError::Config(e.to_string()))?;

        let aggregator = TrendAggregator::with_baseline(self.config.baseline);
        let detector = ExtremeEventDetector::with_sigma(self.config.extreme_sigma);
        let enriched = &enrichment.records;

        let (trends, extreme_counts) = pool.install(|| {
            rayon::join(
                || aggregator.aggregate(enriched),
                || detector.detect(enriched),
            )
        });

        if let Some(p) = progress {
            p.update(3);
        }

        let undefined_baselines = trends.undefined_baselines.clone();
        let enrichment_report = enrichment.report;
        let store = ResultStore::from_run(trends, extreme_counts, enrichment.records);

        if let Some(p) = progress {
            p.update(PIPELINE_STAGES);
        }

        info!(
            enriched = enrichment_report.enriched_records,
            dropped = enrichment_report.dropped_total(),
            tables = store.available().len(),
            "Analysis complete"
        );

        Ok(PipelineRun {
            store,
            load_report,
            enrichment_report,
            undefined_baselines,
        })
    }
}
