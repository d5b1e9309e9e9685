//! Shared world state for flow analysis BDD scenarios.

use std::sync::Arc;

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use eyre::WrapErr;
use lifeline::{
    analytics::services::{
        AggregationConfig, AnalysisError, AnalysisService, FlowReport, TemporalReport,
    },
    history::{
        adapters::memory::InMemoryItemSource,
        domain::{ItemKey, Timeline, TrackedItem, Transition},
        ports::ItemQuery,
        services::StatusCategorizer,
    },
};
use mockable::DefaultClock;
use rstest::fixture;

/// Service type used by the BDD world.
pub type TestAnalysisService = AnalysisService<InMemoryItemSource, DefaultClock>;

/// An item described by Given steps, built once a When step runs.
pub struct PendingItem {
    pub key: String,
    pub created_at: DateTime<Utc>,
    pub status: String,
    pub transitions: Vec<Transition>,
}

impl PendingItem {
    /// Builds the tracked item, ending in the last status moved to.
    pub fn build(&self) -> Result<TrackedItem, eyre::Report> {
        Ok(TrackedItem::new(ItemKey::new(self.key.as_str())?, self.status.as_str())
            .with_created_at(&self.created_at)
            .with_transitions(self.transitions.clone()))
    }
}

/// Scenario world for flow analysis behaviour tests.
pub struct FlowAnalysisWorld {
    pub source: Arc<InMemoryItemSource>,
    pub service: TestAnalysisService,
    pub pending: Vec<PendingItem>,
    pub timelines: Vec<Timeline>,
    pub flow_result: Option<Result<FlowReport, AnalysisError>>,
    pub temporal_report: Option<TemporalReport>,
}

impl FlowAnalysisWorld {
    /// Creates a world with an empty source and no pending items.
    #[must_use]
    pub fn new() -> Self {
        let source = Arc::new(InMemoryItemSource::new());
        let service = AnalysisService::new(
            Arc::clone(&source),
            Arc::new(DefaultClock),
            StatusCategorizer::new(),
            AggregationConfig::utc(),
        );

        Self {
            source,
            service,
            pending: Vec::new(),
            timelines: Vec::new(),
            flow_result: None,
            temporal_report: None,
        }
    }

    /// Stores pending items under `project` so the service can fetch them.
    pub fn publish(&self, project: &str) -> Result<ItemQuery, eyre::Report> {
        let query = ItemQuery::new(project);
        if self.pending.is_empty() {
            return Ok(query);
        }
        let items = self
            .pending
            .iter()
            .map(PendingItem::build)
            .collect::<Result<Vec<_>, _>>()?;
        self.source
            .insert(&query, items)
            .wrap_err("store scenario items in the in-memory source")?;
        Ok(query)
    }
}

impl Default for FlowAnalysisWorld {
    fn default() -> Self {
        Self::new()
    }
}

/// Fixture that creates a new scenario world.
#[fixture]
pub fn world() -> FlowAnalysisWorld {
    FlowAnalysisWorld::default()
}

/// Runs an async operation within sync step definitions.
pub fn run_async<T>(future: impl std::future::Future<Output = T>) -> T {
    tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(future))
}

/// Parses a scenario date.
pub fn parse_date(text: &str) -> Result<NaiveDate, eyre::Report> {
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .wrap_err_with(|| format!("invalid scenario date {text}"))
}

/// Parses a scenario date as UTC midnight.
pub fn midnight(text: &str) -> Result<DateTime<Utc>, eyre::Report> {
    Ok(parse_date(text)?.and_time(NaiveTime::MIN).and_utc())
}
