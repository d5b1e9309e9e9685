//! Date ranges, counters and dense bucket series.

use super::{RangeError, SeriesSummary, TrendLine};
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// Inclusive calendar date range with at least two days.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateRange {
    /// Creates a range covering `start..=end`.
    ///
    /// # Errors
    ///
    /// Returns [`RangeError::Inverted`] when `end` precedes `start` and
    /// [`RangeError::Empty`] when they coincide.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, RangeError> {
        if end < start {
            return Err(RangeError::Inverted { start, end });
        }
        if end == start {
            return Err(RangeError::Empty { date: start });
        }
        Ok(Self { start, end })
    }

    /// Returns the first day.
    #[must_use]
    pub const fn start(&self) -> NaiveDate {
        self.start
    }

    /// Returns the last day.
    #[must_use]
    pub const fn end(&self) -> NaiveDate {
        self.end
    }

    /// Returns the number of days, `(end - start) + 1`.
    #[must_use]
    pub fn days(&self) -> usize {
        let span = self.end.signed_duration_since(self.start).num_days();
        usize::try_from(span).map_or(0, |days| days + 1)
    }

    /// Iterates over every day in the range.
    pub fn iter_days(&self) -> impl Iterator<Item = NaiveDate> {
        self.start.iter_days().take(self.days())
    }

    /// Returns `true` when `day` lies inside the range.
    #[must_use]
    pub fn contains(&self, day: NaiveDate) -> bool {
        self.start <= day && day <= self.end
    }
}

/// Bucket width.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Granularity {
    /// One bucket per calendar day.
    #[default]
    Daily,
    /// One bucket per seven days, counted from the range start.
    Weekly,
}

impl Granularity {
    /// Returns the number of days per bucket.
    #[must_use]
    pub const fn days_per_bucket(self) -> usize {
        match self {
            Self::Daily => 1,
            Self::Weekly => 7,
        }
    }
}

/// Named per-bucket counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Counter {
    /// Items created during the bucket.
    Raised,
    /// Entries into the Done category during the bucket.
    Closed,
    /// Items not in Done at the end of the bucket.
    NotDone,
    /// Items in To Do at the end of the bucket.
    ToDo,
    /// Items in In Progress at the end of the bucket.
    InProgress,
    /// Items in Done at the end of the bucket.
    Done,
    /// Items created up to the end of the bucket.
    CumulativeRaised,
    /// Entries into Done up to the end of the bucket.
    CumulativeClosed,
}

impl Counter {
    /// Every counter.
    pub const ALL: [Self; 8] = [
        Self::Raised,
        Self::Closed,
        Self::NotDone,
        Self::ToDo,
        Self::InProgress,
        Self::Done,
        Self::CumulativeRaised,
        Self::CumulativeClosed,
    ];

    /// Returns the counter name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Raised => "raised",
            Self::Closed => "closed",
            Self::NotDone => "not_done",
            Self::ToDo => "to_do",
            Self::InProgress => "in_progress",
            Self::Done => "done",
            Self::CumulativeRaised => "cumulative_raised",
            Self::CumulativeClosed => "cumulative_closed",
        }
    }

    /// Returns `true` for counters measured at the end of a bucket rather
    /// than summed over it.
    #[must_use]
    pub const fn is_snapshot(self) -> bool {
        !matches!(self, Self::Raised | Self::Closed)
    }
}

impl fmt::Display for Counter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Selects which counters a series carries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MetricSpec {
    counters: BTreeSet<Counter>,
}

impl Default for MetricSpec {
    fn default() -> Self {
        Self::minimal()
    }
}

impl MetricSpec {
    /// Creates a spec carrying exactly `counters`.
    #[must_use]
    pub fn new(counters: impl IntoIterator<Item = Counter>) -> Self {
        Self {
            counters: counters.into_iter().collect(),
        }
    }

    /// Raised, closed, not-done and the three category counts.
    #[must_use]
    pub fn minimal() -> Self {
        Self::new([
            Counter::Raised,
            Counter::Closed,
            Counter::NotDone,
            Counter::ToDo,
            Counter::InProgress,
            Counter::Done,
        ])
    }

    /// Every counter.
    #[must_use]
    pub fn all() -> Self {
        Self::new(Counter::ALL)
    }

    /// Returns `true` when `counter` is selected.
    #[must_use]
    pub fn includes(&self, counter: Counter) -> bool {
        self.counters.contains(&counter)
    }

    /// Iterates over selected counters in declaration order.
    pub fn counters(&self) -> impl Iterator<Item = Counter> + '_ {
        self.counters.iter().copied()
    }
}

/// Counters for one calendar day, or one week for weekly series.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DailyBucket {
    start: NaiveDate,
    end: NaiveDate,
    counters: BTreeMap<Counter, usize>,
}

impl DailyBucket {
    pub(crate) const fn new(
        start: NaiveDate,
        end: NaiveDate,
        counters: BTreeMap<Counter, usize>,
    ) -> Self {
        Self {
            start,
            end,
            counters,
        }
    }

    /// Returns the bucket key: its first day.
    #[must_use]
    pub const fn date(&self) -> NaiveDate {
        self.start
    }

    /// Returns the last day covered; equal to [`Self::date`] for daily
    /// buckets.
    #[must_use]
    pub const fn end_date(&self) -> NaiveDate {
        self.end
    }

    /// Returns a counter value, or `None` when the counter was not
    /// requested.
    #[must_use]
    pub fn get(&self, counter: Counter) -> Option<usize> {
        self.counters.get(&counter).copied()
    }

    /// Returns every requested counter.
    #[must_use]
    pub const fn counters(&self) -> &BTreeMap<Counter, usize> {
        &self.counters
    }
}

/// Dense, ordered bucket series over a date range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BucketSeries {
    range: DateRange,
    granularity: Granularity,
    buckets: Vec<DailyBucket>,
}

impl BucketSeries {
    pub(crate) const fn new(
        range: DateRange,
        granularity: Granularity,
        buckets: Vec<DailyBucket>,
    ) -> Self {
        Self {
            range,
            granularity,
            buckets,
        }
    }

    /// Returns the covered range.
    #[must_use]
    pub const fn range(&self) -> DateRange {
        self.range
    }

    /// Returns the bucket width.
    #[must_use]
    pub const fn granularity(&self) -> Granularity {
        self.granularity
    }

    /// Returns the buckets in date order.
    #[must_use]
    pub fn buckets(&self) -> &[DailyBucket] {
        &self.buckets
    }

    /// Returns the number of buckets.
    #[must_use]
    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    /// Returns `true` when the series has no buckets.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    /// Returns the bucket keyed by `date`.
    #[must_use]
    pub fn bucket(&self, date: NaiveDate) -> Option<&DailyBucket> {
        self.buckets.iter().find(|bucket| bucket.date() == date)
    }

    /// Returns one value per bucket for `counter`, zero where absent.
    #[must_use]
    pub fn values(&self, counter: Counter) -> Vec<usize> {
        self.buckets
            .iter()
            .map(|bucket| bucket.get(counter).unwrap_or_default())
            .collect()
    }

    /// Fits a display trend line through `counter`.
    #[must_use]
    pub fn trend(&self, counter: Counter) -> TrendLine {
        TrendLine::fit(&self.values(counter))
    }

    /// Summarises `counter` over the series.
    #[must_use]
    pub fn summary(&self, counter: Counter) -> SeriesSummary {
        SeriesSummary::of(&self.values(counter))
    }
}
