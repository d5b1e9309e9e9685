//! Calendar-bucketed counters over reconstructed timelines.
//!
//! Every bucket is computed from the timelines alone: flow counters look at
//! creation and Done-entry instants inside the bucket window, snapshot
//! counters look up each item's status one nanosecond before the window's
//! closing local midnight.

use super::{CancellationFlag, DrilldownEntry, DrilldownIndex};
use crate::analytics::domain::{
    AnalyticsError, AnalyticsResult, BucketSeries, Counter, DailyBucket, DateRange, Granularity,
    MetricSpec,
};
use crate::history::domain::{CategoryBucket, StatusSegment, Timeline};
use crate::history::services::{ReconstructedBatch, ReconstructedItem, StatusCategorizer};
use chrono::{DateTime, FixedOffset, NaiveDate, NaiveTime, Offset, TimeDelta, Utc};
use rayon::prelude::*;
use serde::Serialize;
use std::collections::BTreeMap;

/// Calendar settings for aggregation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AggregationConfig {
    reference_offset: FixedOffset,
}

impl Default for AggregationConfig {
    fn default() -> Self {
        Self::utc()
    }
}

impl AggregationConfig {
    /// Calendar days in UTC.
    #[must_use]
    pub fn utc() -> Self {
        Self::with_offset(Utc.fix())
    }

    /// Calendar days in a fixed offset from UTC.
    #[must_use]
    pub const fn with_offset(reference_offset: FixedOffset) -> Self {
        Self { reference_offset }
    }

    /// Returns the offset defining calendar days.
    #[must_use]
    pub const fn reference_offset(&self) -> FixedOffset {
        self.reference_offset
    }

    /// Returns the UTC instant of local midnight opening `day`.
    #[must_use]
    pub fn start_of_day(&self, day: NaiveDate) -> DateTime<Utc> {
        day.and_time(NaiveTime::MIN)
            .and_local_timezone(self.reference_offset)
            .single()
            .map_or(DateTime::<Utc>::MAX_UTC, |local| local.with_timezone(&Utc))
    }

    /// Returns the last representable instant of `day`: one nanosecond
    /// before the next local midnight.
    #[must_use]
    pub fn end_of_day(&self, day: NaiveDate) -> DateTime<Utc> {
        let closing = self.closing_midnight(day);
        closing
            .checked_sub_signed(TimeDelta::nanoseconds(1))
            .unwrap_or(closing)
    }

    fn closing_midnight(&self, day: NaiveDate) -> DateTime<Utc> {
        day.succ_opt()
            .map_or(DateTime::<Utc>::MAX_UTC, |next| self.start_of_day(next))
    }
}

/// A bucket series together with the entries behind every counter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TemporalAnalysis {
    /// Dense counter series.
    pub series: BucketSeries,
    /// Contributing entries per bucket and counter.
    pub drilldown: DrilldownIndex,
}

/// Builds bucket series from a reconstructed batch.
#[derive(Debug, Clone, Default)]
pub struct TemporalAggregator {
    categorizer: StatusCategorizer,
    config: AggregationConfig,
}

impl TemporalAggregator {
    /// Creates an aggregator classifying statuses with `categorizer`.
    #[must_use]
    pub const fn new(categorizer: StatusCategorizer, config: AggregationConfig) -> Self {
        Self { categorizer, config }
    }

    /// Returns the calendar settings.
    #[must_use]
    pub const fn config(&self) -> &AggregationConfig {
        &self.config
    }

    /// Returns one bucket per day of `range`, zero-filled.
    ///
    /// # Errors
    ///
    /// Returns [`AnalyticsError::Cancelled`] when `cancellation` is raised
    /// before the last bucket is computed.
    pub fn daily_series<M>(
        &self,
        batch: &ReconstructedBatch<'_, M>,
        range: DateRange,
        spec: &MetricSpec,
        cancellation: &CancellationFlag,
    ) -> AnalyticsResult<BucketSeries> {
        self.series(batch, range, Granularity::Daily, spec, cancellation)
    }

    /// Returns one bucket per `granularity` window of `range`.
    ///
    /// Only counts are kept; use [`Self::analyze`] for the entries behind
    /// them.
    ///
    /// # Errors
    ///
    /// Returns [`AnalyticsError::Cancelled`] when `cancellation` is raised
    /// before the last bucket is computed.
    pub fn series<M>(
        &self,
        batch: &ReconstructedBatch<'_, M>,
        range: DateRange,
        granularity: Granularity,
        spec: &MetricSpec,
        cancellation: &CancellationFlag,
    ) -> AnalyticsResult<BucketSeries> {
        self.aggregate(batch, range, granularity, spec, cancellation, false)
            .map(|analysis| analysis.series)
    }

    /// Returns the bucket series and its drilldown index.
    ///
    /// # Errors
    ///
    /// Returns [`AnalyticsError::Cancelled`] when `cancellation` is raised
    /// before the last bucket is computed.
    pub fn analyze<M>(
        &self,
        batch: &ReconstructedBatch<'_, M>,
        range: DateRange,
        granularity: Granularity,
        spec: &MetricSpec,
        cancellation: &CancellationFlag,
    ) -> AnalyticsResult<TemporalAnalysis> {
        self.aggregate(batch, range, granularity, spec, cancellation, true)
    }

    fn aggregate<M>(
        &self,
        batch: &ReconstructedBatch<'_, M>,
        range: DateRange,
        granularity: Granularity,
        spec: &MetricSpec,
        cancellation: &CancellationFlag,
        record: bool,
    ) -> AnalyticsResult<TemporalAnalysis> {
        let facts: Vec<ItemFacts<'_>> = batch
            .reconstructed()
            .par_iter()
            .map(|entry| self.facts(entry))
            .collect();
        let windows = bucket_windows(range, granularity);

        let mut buckets = Vec::with_capacity(windows.len());
        let mut drilldown = DrilldownIndex::default();
        for (first, last) in windows {
            if cancellation.is_cancelled() {
                tracing::debug!(completed = buckets.len(), "aggregation cancelled");
                return Err(AnalyticsError::Cancelled {
                    completed_buckets: buckets.len(),
                });
            }
            let tally = self.collect_window(&facts, first, last, spec, record);
            buckets.push(DailyBucket::new(first, last, tally.counts()));
            if let Tally::Entries(entries) = tally {
                drilldown.record(first, entries);
            }
        }

        tracing::debug!(
            items = facts.len(),
            buckets = buckets.len(),
            ?granularity,
            "aggregated bucket series"
        );
        Ok(TemporalAnalysis {
            series: BucketSeries::new(range, granularity, buckets),
            drilldown,
        })
    }

    fn collect_window(
        &self,
        facts: &[ItemFacts<'_>],
        first: NaiveDate,
        last: NaiveDate,
        spec: &MetricSpec,
        record: bool,
    ) -> Tally {
        let opens = self.config.start_of_day(first);
        let closes = self.config.closing_midnight(last);
        let snapshot_at = self.config.end_of_day(last);
        let wants_snapshot = spec.counters().any(Counter::is_snapshot);

        let mut tally = Tally::new(spec, record);
        for fact in facts {
            let created = fact.timeline.created_at();
            if created < closes {
                tally.add(Counter::CumulativeRaised, || fact.raised.clone());
                if created >= opens {
                    tally.add(Counter::Raised, || fact.raised.clone());
                }
            }
            tally_closures(&mut tally, &fact.closures, opens, closes);
            let held = wants_snapshot
                .then(|| self.snapshot(fact, snapshot_at))
                .flatten();
            if let Some((status, category)) = held {
                if !category.is_done() {
                    tally.add(Counter::NotDone, || {
                        self.entry(fact.index, fact.timeline, status)
                    });
                }
                tally.add(category_counter(category), || {
                    self.entry(fact.index, fact.timeline, status)
                });
            }
        }
        tally
    }

    fn facts<'t>(&self, reconstructed: &'t ReconstructedItem) -> ItemFacts<'t> {
        let timeline = &reconstructed.timeline;
        let index = reconstructed.index;
        let initial = timeline
            .segments()
            .first()
            .map_or_else(|| timeline.current_status(), StatusSegment::status);
        let closures = timeline
            .changes()
            .filter(|(previous, next)| {
                self.bucket(timeline, next.status()).is_done()
                    && !self.bucket(timeline, previous.status()).is_done()
            })
            .map(|(_, next)| (next.start(), self.entry(index, timeline, next.status())))
            .collect();
        ItemFacts {
            index,
            timeline,
            raised: self.entry(index, timeline, initial),
            closures,
        }
    }

    fn snapshot<'t>(
        &self,
        fact: &ItemFacts<'t>,
        at: DateTime<Utc>,
    ) -> Option<(&'t str, CategoryBucket)> {
        fact.timeline
            .status_at(at)
            .status()
            .map(|status| (status, self.bucket(fact.timeline, status)))
    }

    fn entry(&self, index: usize, timeline: &Timeline, status: &str) -> DrilldownEntry {
        DrilldownEntry {
            key: timeline.key().clone(),
            index,
            status: status.to_owned(),
            category: self.bucket(timeline, status),
        }
    }

    fn bucket(&self, timeline: &Timeline, status: &str) -> CategoryBucket {
        self.categorizer.classify_on(timeline, status).bucket
    }
}

/// Per-item values that do not depend on the bucket.
struct ItemFacts<'t> {
    index: usize,
    timeline: &'t Timeline,
    raised: DrilldownEntry,
    closures: Vec<(DateTime<Utc>, DrilldownEntry)>,
}

/// Splits `range` into `(first day, last day)` windows; the last window is
/// clamped to the range end.
fn bucket_windows(range: DateRange, granularity: Granularity) -> Vec<(NaiveDate, NaiveDate)> {
    let days: Vec<NaiveDate> = range.iter_days().collect();
    days.chunks(granularity.days_per_bucket())
        .filter_map(|chunk| Some((*chunk.first()?, *chunk.last()?)))
        .collect()
}

/// Contributions to one bucket: bare counts, or the entries behind them.
enum Tally {
    Counts(BTreeMap<Counter, usize>),
    Entries(BTreeMap<Counter, Vec<DrilldownEntry>>),
}

impl Tally {
    /// Starts an empty tally holding exactly the requested counters.
    fn new(spec: &MetricSpec, record: bool) -> Self {
        if record {
            Self::Entries(spec.counters().map(|counter| (counter, Vec::new())).collect())
        } else {
            Self::Counts(spec.counters().map(|counter| (counter, 0)).collect())
        }
    }

    /// Adds one contribution to `counter`; `entry` is only built when
    /// entries are recorded and the counter was requested.
    fn add(&mut self, counter: Counter, entry: impl FnOnce() -> DrilldownEntry) {
        match self {
            Self::Counts(counts) => {
                if let Some(count) = counts.get_mut(&counter) {
                    *count += 1;
                }
            }
            Self::Entries(entries) => {
                if let Some(members) = entries.get_mut(&counter) {
                    members.push(entry());
                }
            }
        }
    }

    fn counts(&self) -> BTreeMap<Counter, usize> {
        match self {
            Self::Counts(counts) => counts.clone(),
            Self::Entries(entries) => entries
                .iter()
                .map(|(counter, members)| (*counter, members.len()))
                .collect(),
        }
    }
}

/// Every Done entry before `closes` adds to the running total. An item
/// closes at most once per bucket; its latest entry in the window stands
/// for it.
fn tally_closures(
    tally: &mut Tally,
    closures: &[(DateTime<Utc>, DrilldownEntry)],
    opens: DateTime<Utc>,
    closes: DateTime<Utc>,
) {
    let mut latest = None;
    for (at, closing) in closures.iter().take_while(|(entered, _)| *entered < closes) {
        tally.add(Counter::CumulativeClosed, || closing.clone());
        if *at >= opens {
            latest = Some(closing);
        }
    }
    if let Some(closing) = latest {
        tally.add(Counter::Closed, || closing.clone());
    }
}

const fn category_counter(bucket: CategoryBucket) -> Counter {
    match bucket {
        CategoryBucket::ToDo => Counter::ToDo,
        CategoryBucket::InProgress => Counter::InProgress,
        CategoryBucket::Done => Counter::Done,
    }
}
