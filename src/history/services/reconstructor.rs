//! Batch reconstruction of item timelines.

use super::StatusCategorizer;
use crate::history::domain::{
    ItemInputError, ItemKey, SkippedItem, StatusAt, Timeline, TrackedItem,
};
use chrono::{DateTime, Utc};
use rayon::prelude::*;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

/// A successfully reconstructed item and its position in the input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReconstructedItem {
    /// Position of the item in the caller's input.
    pub index: usize,
    /// Reconstructed timeline.
    pub timeline: Timeline,
}

/// Side-channel observations gathered while reconstructing a batch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Diagnostics {
    /// Items excluded from every aggregate.
    pub skipped: Vec<SkippedItem>,
    /// Statuses that fell to the default bucket, with the number of items
    /// whose history mentions them.
    pub unknown_statuses: BTreeMap<String, usize>,
}

/// Timelines for every well-formed item of one input batch.
///
/// The batch borrows the caller's items so drilldown can hand back their
/// display metadata.
#[derive(Debug, Clone)]
pub struct ReconstructedBatch<'a, M> {
    items: &'a [TrackedItem<M>],
    now: DateTime<Utc>,
    reconstructed: Vec<ReconstructedItem>,
    diagnostics: Diagnostics,
}

impl<'a, M> ReconstructedBatch<'a, M> {
    /// Returns the caller's items, including skipped ones.
    #[must_use]
    pub const fn items(&self) -> &'a [TrackedItem<M>] {
        self.items
    }

    /// Returns the reference instant the batch was reconstructed at.
    #[must_use]
    pub const fn now(&self) -> DateTime<Utc> {
        self.now
    }

    /// Returns reconstructed items in input order.
    #[must_use]
    pub fn reconstructed(&self) -> &[ReconstructedItem] {
        &self.reconstructed
    }

    /// Iterates over timelines in input order.
    pub fn timelines(&self) -> impl Iterator<Item = &Timeline> {
        self.reconstructed.iter().map(|entry| &entry.timeline)
    }

    /// Returns the number of reconstructed items.
    #[must_use]
    pub fn len(&self) -> usize {
        self.reconstructed.len()
    }

    /// Returns `true` when no item could be reconstructed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.reconstructed.is_empty()
    }

    /// Returns skipped items and unknown-status counts.
    #[must_use]
    pub const fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    /// Returns the caller's item at `index`.
    #[must_use]
    pub fn item(&self, index: usize) -> Option<&'a TrackedItem<M>> {
        self.items.get(index)
    }

    /// Returns the timeline of the first item with `key`.
    #[must_use]
    pub fn timeline_for(&self, key: &ItemKey) -> Option<&Timeline> {
        self.timelines().find(|timeline| timeline.key() == key)
    }

    /// Returns the status of item `key` at `at`, or `None` when the item is
    /// not part of the batch.
    #[must_use]
    pub fn status_at(&self, key: &ItemKey, at: DateTime<Utc>) -> Option<StatusAt<'_>> {
        self.timeline_for(key).map(|timeline| timeline.status_at(at))
    }
}

/// Builds timelines for item batches.
#[derive(Debug, Clone, Default)]
pub struct HistoryReconstructor {
    categorizer: StatusCategorizer,
}

impl HistoryReconstructor {
    /// Creates a reconstructor reporting unknown statuses against
    /// `categorizer`.
    #[must_use]
    pub const fn new(categorizer: StatusCategorizer) -> Self {
        Self { categorizer }
    }

    /// Returns the categorizer used for diagnostics.
    #[must_use]
    pub const fn categorizer(&self) -> &StatusCategorizer {
        &self.categorizer
    }

    /// Builds timelines for every item, in parallel.
    ///
    /// Malformed items are reported in [`Diagnostics::skipped`] and left out
    /// of the batch; the rest proceed.
    #[must_use]
    pub fn build_all<'a, M: Sync>(
        &self,
        items: &'a [TrackedItem<M>],
        now: DateTime<Utc>,
    ) -> ReconstructedBatch<'a, M> {
        let results: Vec<Result<Timeline, ItemInputError>> = items
            .par_iter()
            .map(|item| Timeline::build(item, now))
            .collect();

        let mut reconstructed = Vec::with_capacity(results.len());
        let mut skipped = Vec::new();
        for (index, result) in results.into_iter().enumerate() {
            match result {
                Ok(timeline) => reconstructed.push(ReconstructedItem { index, timeline }),
                Err(reason) => {
                    tracing::warn!(index, error = %reason, "skipping malformed item");
                    skipped.push(SkippedItem { index, reason });
                }
            }
        }

        let unknown_statuses = self.unknown_statuses(&reconstructed);
        if !unknown_statuses.is_empty() {
            tracing::debug!(
                statuses = ?unknown_statuses.keys().collect::<Vec<_>>(),
                "statuses defaulted to to-do; consider extending the vocabulary"
            );
        }
        tracing::debug!(
            items = items.len(),
            reconstructed = reconstructed.len(),
            skipped = skipped.len(),
            "reconstructed item histories"
        );

        ReconstructedBatch {
            items,
            now,
            reconstructed,
            diagnostics: Diagnostics {
                skipped,
                unknown_statuses,
            },
        }
    }

    fn unknown_statuses(&self, reconstructed: &[ReconstructedItem]) -> BTreeMap<String, usize> {
        let mut counts = BTreeMap::new();
        for entry in reconstructed {
            let timeline = &entry.timeline;
            let unknown: BTreeSet<&str> = timeline
                .segments()
                .iter()
                .map(|segment| segment.status())
                .filter(|status| self.categorizer.classify_on(timeline, status).is_unknown())
                .collect();
            for status in unknown {
                *counts.entry(status.to_owned()).or_insert(0) += 1;
            }
        }
        counts
    }
}
