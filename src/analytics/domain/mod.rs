//! Domain model for flow and trend analytics.

mod bucket;
mod cycle;
mod error;
mod pattern;
mod trend;

pub use bucket::{BucketSeries, Counter, DailyBucket, DateRange, Granularity, MetricSpec};
pub use cycle::{CycleMetrics, StatusDwell};
pub use error::{AnalyticsError, AnalyticsResult, RangeError};
pub use pattern::{
    FlowPattern, FlowPatternSet, LOOP_SEPARATOR, LoopCount, PATTERN_SEPARATOR, ReworkSummary,
    TransitionCount,
};
pub use trend::{SeriesSummary, TrendLine};

pub(crate) use pattern::rank;
