//! Dwell time per status and lead/cycle time per item.

use crate::analytics::domain::{CycleMetrics, StatusDwell};
use crate::history::domain::{CategoryBucket, StatusSegment, Timeline};
use crate::history::services::{ReconstructedBatch, StatusCategorizer};
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;

const MILLIS_PER_HOUR: f64 = 3_600_000.0;
const HOURS_PER_DAY: f64 = 24.0;

/// Measures how long items spend in statuses and categories.
#[derive(Debug, Clone, Default)]
pub struct CycleAnalyzer {
    categorizer: StatusCategorizer,
}

impl CycleAnalyzer {
    /// Creates an analyzer classifying statuses with `categorizer`.
    #[must_use]
    pub const fn new(categorizer: StatusCategorizer) -> Self {
        Self { categorizer }
    }

    /// Returns dwell statistics per status over every completed visit.
    ///
    /// The final segment of each timeline is still open and is not
    /// measured; neither are zero-length segments. Results are ordered by
    /// mean dwell descending, then by status.
    #[must_use]
    pub fn time_in_status<M>(batch: &ReconstructedBatch<'_, M>) -> Vec<StatusDwell> {
        let mut visits: BTreeMap<&str, Vec<f64>> = BTreeMap::new();
        for timeline in batch.timelines() {
            let completed = timeline
                .segments()
                .split_last()
                .map(|(_, rest)| rest)
                .unwrap_or_default();
            for segment in completed.iter().filter(|segment| !segment.is_empty()) {
                visits
                    .entry(segment.status())
                    .or_default()
                    .push(hours(segment));
            }
        }

        let mut dwell: Vec<StatusDwell> = visits
            .into_iter()
            .map(|(status, mut durations)| {
                durations.sort_by(f64::total_cmp);
                StatusDwell {
                    status: status.to_owned(),
                    count: durations.len(),
                    mean_hours: mean(&durations),
                    median_hours: median(&durations),
                    min_hours: durations.first().copied().unwrap_or_default(),
                    max_hours: durations.last().copied().unwrap_or_default(),
                }
            })
            .collect();
        dwell.sort_by(|left, right| {
            right
                .mean_hours
                .total_cmp(&left.mean_hours)
                .then_with(|| left.status.cmp(&right.status))
        });
        dwell
    }

    /// Returns lead time, cycle time and throughput over `batch`.
    ///
    /// Lead time runs from creation to the first entry into Done. Cycle
    /// time runs from the first instant in In Progress to the first entry
    /// into Done after it.
    #[must_use]
    pub fn cycle_metrics<M>(&self, batch: &ReconstructedBatch<'_, M>) -> CycleMetrics {
        let mut lead_times_days = Vec::new();
        let mut cycle_times_days = Vec::new();
        for timeline in batch.timelines() {
            let Some(done_at) = self.first_done_entry(timeline, timeline.created_at()) else {
                continue;
            };
            lead_times_days.push(days_between(timeline.created_at(), done_at));
            let cycle = self
                .first_in_progress(timeline)
                .and_then(|started| {
                    self.first_done_entry(timeline, started)
                        .map(|finished| days_between(started, finished))
                });
            if let Some(days) = cycle {
                cycle_times_days.push(days);
            }
        }

        let throughput = lead_times_days.len();
        let mut sorted_lead = lead_times_days.clone();
        sorted_lead.sort_by(f64::total_cmp);
        let mut sorted_cycle = cycle_times_days.clone();
        sorted_cycle.sort_by(f64::total_cmp);

        CycleMetrics {
            average_lead_time_days: mean(&sorted_lead),
            median_lead_time_days: upper_median(&sorted_lead),
            average_cycle_time_days: mean(&sorted_cycle),
            median_cycle_time_days: upper_median(&sorted_cycle),
            lead_times_days,
            cycle_times_days,
            throughput,
        }
    }

    fn first_done_entry(
        &self,
        timeline: &Timeline,
        after: DateTime<Utc>,
    ) -> Option<DateTime<Utc>> {
        timeline
            .changes()
            .find(|(previous, next)| {
                next.start() >= after
                    && self.bucket(timeline, next).is_done()
                    && !self.bucket(timeline, previous).is_done()
            })
            .map(|(_, next)| next.start())
    }

    fn first_in_progress(&self, timeline: &Timeline) -> Option<DateTime<Utc>> {
        timeline
            .segments()
            .iter()
            .find(|segment| self.bucket(timeline, segment) == CategoryBucket::InProgress)
            .map(StatusSegment::start)
    }

    fn bucket(&self, timeline: &Timeline, segment: &StatusSegment) -> CategoryBucket {
        self.categorizer
            .classify_on(timeline, segment.status())
            .bucket
    }
}

#[expect(
    clippy::float_arithmetic,
    clippy::cast_precision_loss,
    reason = "durations are reported as fractional hours"
)]
fn hours(segment: &StatusSegment) -> f64 {
    let span = segment.end().signed_duration_since(segment.start());
    span.num_milliseconds() as f64 / MILLIS_PER_HOUR
}

#[expect(
    clippy::float_arithmetic,
    clippy::cast_precision_loss,
    reason = "durations are reported as fractional days"
)]
fn days_between(from: DateTime<Utc>, to: DateTime<Utc>) -> f64 {
    to.signed_duration_since(from).num_milliseconds() as f64 / MILLIS_PER_HOUR / HOURS_PER_DAY
}

#[expect(
    clippy::float_arithmetic,
    clippy::cast_precision_loss,
    reason = "arithmetic mean of durations"
)]
fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Middle value of a sorted slice, averaging the two middle values for even
/// lengths.
#[expect(clippy::float_arithmetic, reason = "averaging the two middle values")]
fn median(sorted: &[f64]) -> f64 {
    let middle = sorted.len().div_euclid(2);
    let upper = sorted.get(middle).copied().unwrap_or_default();
    if sorted.len().rem_euclid(2) == 1 {
        return upper;
    }
    middle
        .checked_sub(1)
        .and_then(|lower| sorted.get(lower))
        .map_or(upper, |lower| (lower + upper) / 2.0)
}

/// Element at `len / 2` of a sorted slice.
fn upper_median(sorted: &[f64]) -> f64 {
    sorted
        .get(sorted.len().div_euclid(2))
        .copied()
        .unwrap_or_default()
}
