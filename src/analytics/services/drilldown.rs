//! Mapping from aggregate keys back to contributing items.

use crate::analytics::domain::{Counter, FlowPattern, FlowPatternSet};
use crate::history::domain::{CategoryBucket, ItemKey};
use crate::history::services::ReconstructedBatch;
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeMap;

/// One item counted towards a bucket counter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DrilldownEntry {
    /// Contributing item.
    pub key: ItemKey,
    /// Position of the item in the caller's input.
    pub index: usize,
    /// Status held at the end of the bucket, or the status entered for
    /// [`Counter::Raised`] and [`Counter::Closed`].
    pub status: String,
    /// Category of `status`.
    pub category: CategoryBucket,
}

/// Contributing entries per `(bucket date, counter)`.
///
/// Built in the same pass as the bucket counts: for every recorded key the
/// number of entries equals the counter value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DrilldownIndex {
    buckets: BTreeMap<NaiveDate, BTreeMap<Counter, Vec<DrilldownEntry>>>,
}

impl DrilldownIndex {
    pub(crate) fn record(
        &mut self,
        date: NaiveDate,
        entries: BTreeMap<Counter, Vec<DrilldownEntry>>,
    ) {
        self.buckets.insert(date, entries);
    }

    /// Returns the entries behind `counter` on the bucket keyed by `date`.
    ///
    /// Unknown dates and unrequested counters yield an empty slice.
    #[must_use]
    pub fn entries(&self, date: NaiveDate, counter: Counter) -> &[DrilldownEntry] {
        self.buckets
            .get(&date)
            .and_then(|counters| counters.get(&counter))
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Returns the item keys behind `counter` on `date`.
    #[must_use]
    pub fn keys(&self, date: NaiveDate, counter: Counter) -> Vec<&ItemKey> {
        self.entries(date, counter)
            .iter()
            .map(|entry| &entry.key)
            .collect()
    }

    /// Returns every counter recorded for the bucket keyed by `date`.
    #[must_use]
    pub fn for_bucket(&self, date: NaiveDate) -> Option<&BTreeMap<Counter, Vec<DrilldownEntry>>> {
        self.buckets.get(&date)
    }

    /// Iterates over bucket dates in order.
    pub fn dates(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.buckets.keys().copied()
    }

    /// Returns the items that followed the pattern with `key`.
    #[must_use]
    pub fn for_pattern<'p>(patterns: &'p FlowPatternSet, key: &str) -> &'p [ItemKey] {
        patterns
            .get(key)
            .map(FlowPattern::items)
            .unwrap_or_default()
    }

    /// Pairs `entries` with the display metadata the caller attached to
    /// each item.
    ///
    /// Entries whose position is outside the batch are dropped.
    #[must_use]
    pub fn resolve<'a, 'e, M>(
        batch: &ReconstructedBatch<'a, M>,
        entries: &'e [DrilldownEntry],
    ) -> Vec<(&'e DrilldownEntry, &'a M)> {
        entries
            .iter()
            .filter_map(|entry| batch.item(entry.index).map(|item| (entry, item.metadata())))
            .collect()
    }
}
