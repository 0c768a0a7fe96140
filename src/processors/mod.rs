pub mod enricher;
pub mod extreme_detector;
pub mod pipeline;
pub mod trend_aggregator;

pub use enricher::{Enricher, Enrichment, EnrichmentReport};
pub use extreme_detector::{ExtremeEventDetector, ExtremeKind, StationStatistics};
pub use pipeline::{AnalysisPipeline, PipelineRun, PIPELINE_STAGES};
pub use trend_aggregator::{TrendAggregator, TrendTables};
