//! Orchestration of fetch, reconstruction and analytics.

use super::{
    AggregationConfig, CancellationFlag, CycleAnalyzer, FlowPatternMiner, TemporalAggregator,
    TemporalAnalysis,
};
use crate::analytics::domain::{
    AnalyticsError, CycleMetrics, DateRange, FlowPatternSet, Granularity, MetricSpec,
    ReworkSummary, StatusDwell, TransitionCount,
};
use crate::history::{
    ports::{ItemQuery, ItemSource, ItemSourceError},
    services::{Diagnostics, HistoryReconstructor, ReconstructedBatch, StatusCategorizer},
};
use mockable::Clock;
use serde::Serialize;
use std::marker::PhantomData;
use std::sync::Arc;
use thiserror::Error;

/// Service-level errors for analysis requests.
#[derive(Debug, Error)]
pub enum AnalysisError {
    /// The item source failed.
    #[error(transparent)]
    Source(#[from] ItemSourceError),
    /// Aggregation was refused or cancelled.
    #[error(transparent)]
    Analytics(#[from] AnalyticsError),
}

/// Result type for analysis service operations.
pub type AnalysisResult<T> = Result<T, AnalysisError>;

/// Flow patterns, rework and cycle figures for one selection.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FlowReport {
    /// Items grouped by status sequence.
    pub patterns: FlowPatternSet,
    /// Ranked status-to-status edges.
    pub transitions: Vec<TransitionCount>,
    /// Returns to previously visited statuses.
    pub rework: ReworkSummary,
    /// Dwell statistics per status.
    pub dwell: Vec<StatusDwell>,
    /// Lead time, cycle time and throughput.
    pub cycle: CycleMetrics,
    /// Skipped items and unknown statuses.
    pub diagnostics: Diagnostics,
}

/// Bucket series and drilldown for one selection and range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TemporalReport {
    /// Series and drilldown.
    pub analysis: TemporalAnalysis,
    /// Skipped items and unknown statuses.
    pub diagnostics: Diagnostics,
}

/// Fetches items through an [`ItemSource`] and runs the analytics engine
/// over them, reading "now" from the injected clock.
#[derive(Clone)]
pub struct AnalysisService<S, C, M = ()>
where
    S: ItemSource<M>,
    C: Clock + Send + Sync,
    M: Send + Sync + 'static,
{
    source: Arc<S>,
    clock: Arc<C>,
    reconstructor: HistoryReconstructor,
    aggregator: TemporalAggregator,
    cycles: CycleAnalyzer,
    miner: FlowPatternMiner,
    metadata: PhantomData<fn() -> M>,
}

impl<S, C, M> AnalysisService<S, C, M>
where
    S: ItemSource<M>,
    C: Clock + Send + Sync,
    M: Send + Sync + 'static,
{
    /// Creates a service sharing `categorizer` across every component.
    #[must_use]
    pub fn new(
        source: Arc<S>,
        clock: Arc<C>,
        categorizer: StatusCategorizer,
        config: AggregationConfig,
    ) -> Self {
        Self {
            source,
            clock,
            reconstructor: HistoryReconstructor::new(categorizer.clone()),
            aggregator: TemporalAggregator::new(categorizer.clone(), config),
            cycles: CycleAnalyzer::new(categorizer),
            miner: FlowPatternMiner::new(),
            metadata: PhantomData,
        }
    }

    /// Replaces the flow pattern miner settings.
    #[must_use]
    pub const fn with_miner(mut self, miner: FlowPatternMiner) -> Self {
        self.miner = miner;
        self
    }

    /// Fetches the items selected by `query`, reconstructs them at the
    /// clock's current instant and hands the batch to `analyse`.
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisError::Source`] when the fetch fails.
    pub async fn fetch_and_reconstruct<T, F>(
        &self,
        query: &ItemQuery,
        analyse: F,
    ) -> AnalysisResult<T>
    where
        F: FnOnce(&ReconstructedBatch<'_, M>) -> T,
    {
        let items = self.source.fetch_items(query).await?;
        let now = self.clock.utc();
        tracing::debug!(%query, items = items.len(), %now, "fetched items");
        let batch = self.reconstructor.build_all(&items, now);
        Ok(analyse(&batch))
    }

    /// Mines flow patterns and cycle figures for `query`.
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisError::Source`] when the fetch fails.
    pub async fn flow_report(&self, query: &ItemQuery) -> AnalysisResult<FlowReport> {
        self.fetch_and_reconstruct(query, |batch| FlowReport {
            patterns: FlowPatternMiner::mine(batch),
            transitions: FlowPatternMiner::transition_counts(batch),
            rework: self.miner.rework_loops(batch),
            dwell: CycleAnalyzer::time_in_status(batch),
            cycle: self.cycles.cycle_metrics(batch),
            diagnostics: batch.diagnostics().clone(),
        })
        .await
    }

    /// Aggregates `query` into a bucket series over `range`.
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisError::Source`] when the fetch fails and
    /// [`AnalysisError::Analytics`] when `cancellation` is raised.
    pub async fn temporal_report(
        &self,
        query: &ItemQuery,
        range: DateRange,
        granularity: Granularity,
        spec: &MetricSpec,
        cancellation: &CancellationFlag,
    ) -> AnalysisResult<TemporalReport> {
        let report = self
            .fetch_and_reconstruct(query, |batch| {
                self.aggregator
                    .analyze(batch, range, granularity, spec, cancellation)
                    .map(|analysis| TemporalReport {
                        analysis,
                        diagnostics: batch.diagnostics().clone(),
                    })
            })
            .await?;
        report.map_err(AnalysisError::from)
    }
}
