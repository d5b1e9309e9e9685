//! Point-in-time status reconstruction over a sorted segment list.
//!
//! A [`Timeline`] partitions `[creation, horizon)` into contiguous
//! `[start, end)` segments. Lookups binary-search segment starts, so a
//! point-in-time query costs `O(log n)` regardless of history length.

use super::{ItemInputError, ItemKey, TrackedItem, Transition};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeSet;

/// A half-open interval during which an item held one status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusSegment {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    status: String,
}

impl StatusSegment {
    /// Returns the inclusive start of the segment.
    #[must_use]
    pub const fn start(&self) -> DateTime<Utc> {
        self.start
    }

    /// Returns the exclusive end of the segment.
    #[must_use]
    pub const fn end(&self) -> DateTime<Utc> {
        self.end
    }

    /// Returns the status held during the segment.
    #[must_use]
    pub fn status(&self) -> &str {
        &self.status
    }

    /// Returns `true` when the segment covers no instant.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }
}

/// How the status before the first recorded transition was determined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum InitialStatusSource {
    /// The item never changed status; its current status held throughout.
    NoTransitions,
    /// Taken from the first transition's from-status.
    FromTransition,
    /// The first transition has no from-status, so the current status is
    /// used instead. This is an approximation.
    CurrentStatusFallback,
}

/// Result of a point-in-time status query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusAt<'a> {
    /// The query instant precedes the item's creation.
    NotCreated,
    /// The status in effect at the query instant.
    InStatus(&'a str),
}

impl<'a> StatusAt<'a> {
    /// Returns the status, or `None` when the item did not exist yet.
    #[must_use]
    pub const fn status(self) -> Option<&'a str> {
        match self {
            Self::NotCreated => None,
            Self::InStatus(status) => Some(status),
        }
    }
}

/// Reconstructed status history of one item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Timeline {
    key: ItemKey,
    created_at: DateTime<Utc>,
    horizon: DateTime<Utc>,
    current_status: String,
    explicit_category: Option<String>,
    initial_source: InitialStatusSource,
    segments: Vec<StatusSegment>,
}

impl Timeline {
    /// Builds the timeline of `item` as observed at `now`.
    ///
    /// Transitions are sorted by timestamp and repeated
    /// `(timestamp, to-status)` pairs are dropped. The timeline ends at the
    /// latest of `now`, the last transition and the creation time.
    ///
    /// # Errors
    ///
    /// Returns [`ItemInputError::MissingCreation`] when the item has no
    /// creation timestamp and [`ItemInputError::TransitionBeforeCreation`]
    /// when any transition predates creation.
    pub fn build<M>(item: &TrackedItem<M>, now: DateTime<Utc>) -> Result<Self, ItemInputError> {
        let created_at = item
            .created_at()
            .ok_or_else(|| ItemInputError::MissingCreation {
                key: item.key().clone(),
            })?;
        let ordered = ordered_transitions(item.transitions());

        if let Some(early) = ordered.first().filter(|first| first.at() < created_at) {
            return Err(ItemInputError::TransitionBeforeCreation {
                key: item.key().clone(),
                created_at,
                at: early.at(),
            });
        }

        let last_change = ordered.last().map_or(created_at, |last| last.at());
        let horizon = now.max(last_change).max(created_at);

        let (initial_source, initial_status) = match ordered.first() {
            None => (InitialStatusSource::NoTransitions, item.status()),
            Some(first) => first.from_status().map_or_else(
                || (InitialStatusSource::CurrentStatusFallback, item.status()),
                |from| (InitialStatusSource::FromTransition, from),
            ),
        };

        let mut segments = Vec::with_capacity(ordered.len() + 1);
        let mut start = created_at;
        let mut status = initial_status.to_owned();
        for transition in &ordered {
            segments.push(StatusSegment {
                start,
                end: transition.at(),
                status,
            });
            start = transition.at();
            status = transition.to_status().to_owned();
        }
        segments.push(StatusSegment {
            start,
            end: horizon,
            status,
        });

        Ok(Self {
            key: item.key().clone(),
            created_at,
            horizon,
            current_status: item.status().to_owned(),
            explicit_category: item.explicit_category().map(str::to_owned),
            initial_source,
            segments,
        })
    }

    /// Returns the status in effect at `at`.
    ///
    /// Instants at or after the horizon resolve to the final status.
    #[must_use]
    pub fn status_at(&self, at: DateTime<Utc>) -> StatusAt<'_> {
        self.segment_at(at)
            .map_or(StatusAt::NotCreated, |segment| StatusAt::InStatus(&segment.status))
    }

    /// Returns the segment covering `at`, or `None` before creation.
    ///
    /// When several transitions share a timestamp the last one wins, since
    /// the earlier segments at that instant are empty.
    #[must_use]
    pub fn segment_at(&self, at: DateTime<Utc>) -> Option<&StatusSegment> {
        if at < self.created_at {
            return None;
        }
        let after = self.segments.partition_point(|segment| segment.start <= at);
        after
            .checked_sub(1)
            .and_then(|index| self.segments.get(index))
    }

    /// Returns consecutive segment pairs, one per applied transition.
    pub fn changes(&self) -> impl Iterator<Item = (&StatusSegment, &StatusSegment)> {
        self.segments.windows(2).filter_map(|pair| match pair {
            [previous, next] => Some((previous, next)),
            _ => None,
        })
    }

    /// Returns the item key.
    #[must_use]
    pub const fn key(&self) -> &ItemKey {
        &self.key
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the exclusive end of the reconstructed range.
    #[must_use]
    pub const fn horizon(&self) -> DateTime<Utc> {
        self.horizon
    }

    /// Returns the ordered segments.
    #[must_use]
    pub fn segments(&self) -> &[StatusSegment] {
        &self.segments
    }

    /// Returns how the initial status was derived.
    #[must_use]
    pub const fn initial_status_source(&self) -> InitialStatusSource {
        self.initial_source
    }

    /// Returns `true` when the initial status is an approximation.
    #[must_use]
    pub const fn is_approximate(&self) -> bool {
        matches!(self.initial_source, InitialStatusSource::CurrentStatusFallback)
    }

    /// Returns `true` when at least one transition was applied.
    #[must_use]
    pub const fn has_transitions(&self) -> bool {
        !matches!(self.initial_source, InitialStatusSource::NoTransitions)
    }

    /// Returns the status held at the end of the timeline.
    #[must_use]
    pub fn final_status(&self) -> &str {
        self.segments
            .last()
            .map_or_else(|| self.current_status.as_str(), |segment| segment.status.as_str())
    }

    /// Returns the item's current status as reported by the source.
    #[must_use]
    pub fn current_status(&self) -> &str {
        &self.current_status
    }

    /// Returns the explicit category reported for the current status.
    #[must_use]
    pub fn explicit_category(&self) -> Option<&str> {
        self.explicit_category.as_deref()
    }

    /// Returns the explicit category if it applies to `status`.
    ///
    /// The source only reports a category for the current status, so
    /// historical statuses with a different name are classified by name.
    #[must_use]
    pub fn explicit_category_for(&self, status: &str) -> Option<&str> {
        if status.eq_ignore_ascii_case(&self.current_status) {
            self.explicit_category()
        } else {
            None
        }
    }
}

/// Sorts transitions by timestamp and drops repeated
/// `(timestamp, to-status)` pairs, keeping the first occurrence.
fn ordered_transitions(transitions: &[Transition]) -> Vec<&Transition> {
    let mut ordered: Vec<&Transition> = transitions.iter().collect();
    ordered.sort_by_key(|transition| transition.at());
    let mut seen = BTreeSet::new();
    ordered.retain(|&transition| seen.insert((transition.at(), transition.to_status())));
    ordered
}
