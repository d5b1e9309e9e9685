//! Flow patterns: the ordered statuses items passed through.

use crate::history::domain::ItemKey;
use serde::Serialize;
use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};

/// Separator between statuses in a pattern key.
pub const PATTERN_SEPARATOR: &str = "→";

/// Separator between the statuses of a rework loop key, read "entered ←
/// left".
pub const LOOP_SEPARATOR: &str = " ← ";

/// Items sharing one status sequence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FlowPattern {
    key: String,
    statuses: Vec<String>,
    items: Vec<ItemKey>,
    positions: Vec<usize>,
    bounce: bool,
}

impl FlowPattern {
    pub(crate) fn new(statuses: Vec<String>) -> Self {
        let bounce = recurs(&statuses);
        Self {
            key: statuses.join(PATTERN_SEPARATOR),
            statuses,
            items: Vec::new(),
            positions: Vec::new(),
            bounce,
        }
    }

    pub(crate) fn record(&mut self, key: ItemKey, position: usize) {
        self.items.push(key);
        self.positions.push(position);
    }

    /// Returns the pattern key, statuses joined by [`PATTERN_SEPARATOR`].
    /// Items without transitions share the empty key.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Returns the status sequence.
    #[must_use]
    pub fn statuses(&self) -> &[String] {
        &self.statuses
    }

    /// Returns the number of items following the pattern.
    #[must_use]
    pub fn count(&self) -> usize {
        self.items.len()
    }

    /// Returns the contributing item keys, in input order.
    #[must_use]
    pub fn items(&self) -> &[ItemKey] {
        &self.items
    }

    /// Returns the input positions of the contributing items.
    #[must_use]
    pub fn positions(&self) -> &[usize] {
        &self.positions
    }

    /// Returns `true` when a status recurs after the item left it.
    #[must_use]
    pub const fn bounce(&self) -> bool {
        self.bounce
    }
}

/// All patterns mined from one batch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FlowPatternSet {
    patterns: BTreeMap<String, FlowPattern>,
}

impl FlowPatternSet {
    pub(crate) const fn new(patterns: BTreeMap<String, FlowPattern>) -> Self {
        Self { patterns }
    }

    /// Returns the pattern with `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&FlowPattern> {
        self.patterns.get(key)
    }

    /// Returns patterns by descending count, ties broken by key.
    #[must_use]
    pub fn ranked(&self) -> Vec<&FlowPattern> {
        let mut ranked: Vec<&FlowPattern> = self.patterns.values().collect();
        ranked.sort_by(|left, right| rank(left.count(), right.count(), left.key(), right.key()));
        ranked
    }

    /// Returns the number of distinct patterns.
    #[must_use]
    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    /// Returns `true` when no pattern was mined.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    /// Returns the number of items across all patterns.
    #[must_use]
    pub fn total_items(&self) -> usize {
        self.patterns.values().map(FlowPattern::count).sum()
    }

    /// Returns the number of items whose pattern bounces.
    #[must_use]
    pub fn bounced_items(&self) -> usize {
        self.patterns
            .values()
            .filter(|pattern| pattern.bounce())
            .map(FlowPattern::count)
            .sum()
    }
}

/// Number of times one status followed another.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TransitionCount {
    /// Status left.
    pub from: String,
    /// Status entered.
    pub to: String,
    /// Occurrences across the batch.
    pub count: usize,
}

/// Occurrences of one rework loop.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoopCount {
    /// Loop key, `entered ← left`.
    pub key: String,
    /// Occurrences across the batch.
    pub count: usize,
}

/// Returns to previously visited statuses across a batch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReworkSummary {
    /// Loop instances across all items.
    pub total_loops: usize,
    /// Items with at least one loop, sorted.
    pub items_with_loops: Vec<ItemKey>,
    /// Most frequent loops, ranked like patterns.
    pub common_loops: Vec<LoopCount>,
}

/// Returns `true` when any status appears twice. Patterns are already
/// collapsed, so a repeat is always non-consecutive.
fn recurs(statuses: &[String]) -> bool {
    let mut seen = BTreeSet::new();
    !statuses.iter().all(|status| seen.insert(status.as_str()))
}

/// Descending count, ascending key.
pub(crate) fn rank(left_count: usize, right_count: usize, left_key: &str, right_key: &str) -> Ordering {
    right_count
        .cmp(&left_count)
        .then_with(|| left_key.cmp(right_key))
}
