//! Flow pattern mining over reconstructed timelines.

use crate::analytics::domain::{
    FlowPattern, FlowPatternSet, LOOP_SEPARATOR, LoopCount, ReworkSummary, TransitionCount, rank,
};
use crate::history::domain::{ItemKey, Timeline};
use crate::history::services::ReconstructedBatch;
use rayon::prelude::*;
use std::collections::{BTreeMap, BTreeSet};

/// Number of loop keys kept in [`ReworkSummary::common_loops`] by default.
pub const DEFAULT_LOOP_LIMIT: usize = 10;

/// Derives status sequences, transition edges and rework loops.
#[derive(Debug, Clone, Copy)]
pub struct FlowPatternMiner {
    loop_limit: usize,
}

impl Default for FlowPatternMiner {
    fn default() -> Self {
        Self::new()
    }
}

impl FlowPatternMiner {
    /// Creates a miner keeping the ten most common loops.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            loop_limit: DEFAULT_LOOP_LIMIT,
        }
    }

    /// Sets how many loop keys [`Self::rework_loops`] reports.
    #[must_use]
    pub const fn with_loop_limit(mut self, loop_limit: usize) -> Self {
        self.loop_limit = loop_limit;
        self
    }

    /// Returns the ordered statuses `timeline` passed through, with
    /// consecutive repeats collapsed.
    ///
    /// Items that never changed status yield an empty sequence. When the
    /// first transition carries no from-status the initial segment only
    /// repeats the current status, so the sequence starts at the first
    /// status actually entered.
    #[must_use]
    pub fn extract_pattern(timeline: &Timeline) -> Vec<String> {
        if !timeline.has_transitions() {
            return Vec::new();
        }
        let skipped = usize::from(timeline.is_approximate());
        let mut statuses: Vec<String> = Vec::with_capacity(timeline.segments().len());
        for segment in timeline.segments().iter().skip(skipped) {
            if statuses.last().map(String::as_str) != Some(segment.status()) {
                statuses.push(segment.status().to_owned());
            }
        }
        statuses
    }

    /// Groups every item of `batch` by its pattern.
    ///
    /// Each reconstructed item contributes to exactly one pattern.
    #[must_use]
    pub fn mine<M>(batch: &ReconstructedBatch<'_, M>) -> FlowPatternSet {
        let extracted = extract_all(batch);
        let mut patterns: BTreeMap<String, FlowPattern> = BTreeMap::new();
        for (key, position, statuses) in extracted {
            let pattern = FlowPattern::new(statuses);
            patterns
                .entry(pattern.key().to_owned())
                .or_insert(pattern)
                .record(key, position);
        }
        tracing::debug!(
            items = batch.len(),
            patterns = patterns.len(),
            "mined flow patterns"
        );
        FlowPatternSet::new(patterns)
    }

    /// Counts `from → to` steps across all collapsed patterns.
    #[must_use]
    pub fn transition_counts<M>(batch: &ReconstructedBatch<'_, M>) -> Vec<TransitionCount> {
        let mut counts: BTreeMap<(String, String), usize> = BTreeMap::new();
        for (_, _, statuses) in extract_all(batch) {
            for step in statuses.windows(2) {
                if let [from, to] = step {
                    *counts.entry((from.clone(), to.clone())).or_insert(0) += 1;
                }
            }
        }
        let mut ranked: Vec<TransitionCount> = counts
            .into_iter()
            .map(|((from, to), count)| TransitionCount { from, to, count })
            .collect();
        ranked.sort_by(|left, right| {
            rank(left.count, right.count, &left.from, &right.from)
                .then_with(|| left.to.cmp(&right.to))
        });
        ranked
    }

    /// Finds every return to a status an item had already visited.
    #[must_use]
    pub fn rework_loops<M>(&self, batch: &ReconstructedBatch<'_, M>) -> ReworkSummary {
        let mut total_loops = 0;
        let mut affected: BTreeSet<ItemKey> = BTreeSet::new();
        let mut loop_counts: BTreeMap<String, usize> = BTreeMap::new();

        for (key, _, statuses) in extract_all(batch) {
            let mut visited: BTreeSet<&str> = BTreeSet::new();
            let mut previous: Option<&str> = None;
            for status in &statuses {
                if let Some(left) = previous.filter(|_| visited.contains(status.as_str())) {
                    total_loops += 1;
                    affected.insert(key.clone());
                    *loop_counts
                        .entry(format!("{status}{LOOP_SEPARATOR}{left}"))
                        .or_insert(0) += 1;
                }
                visited.insert(status);
                previous = Some(status);
            }
        }

        let mut common_loops: Vec<LoopCount> = loop_counts
            .into_iter()
            .map(|(key, count)| LoopCount { key, count })
            .collect();
        common_loops.sort_by(|left, right| rank(left.count, right.count, &left.key, &right.key));
        common_loops.truncate(self.loop_limit);

        ReworkSummary {
            total_loops,
            items_with_loops: affected.into_iter().collect(),
            common_loops,
        }
    }
}

/// Extracts every pattern in parallel, keeping input order.
fn extract_all<M>(batch: &ReconstructedBatch<'_, M>) -> Vec<(ItemKey, usize, Vec<String>)> {
    batch
        .reconstructed()
        .par_iter()
        .map(|entry| {
            (
                entry.timeline.key().clone(),
                entry.index,
                FlowPatternMiner::extract_pattern(&entry.timeline),
            )
        })
        .collect()
}
