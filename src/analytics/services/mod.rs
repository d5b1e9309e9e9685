//! Analytics services over reconstructed batches.

mod aggregator;
mod analysis;
mod cancellation;
mod cycle;
mod drilldown;
mod flow_miner;

pub use aggregator::{AggregationConfig, TemporalAggregator, TemporalAnalysis};
pub use analysis::{AnalysisError, AnalysisResult, AnalysisService, FlowReport, TemporalReport};
pub use cancellation::CancellationFlag;
pub use cycle::CycleAnalyzer;
pub use drilldown::{DrilldownEntry, DrilldownIndex};
pub use flow_miner::{DEFAULT_LOOP_LIMIT, FlowPatternMiner};
