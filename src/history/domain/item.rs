//! Tracked items and their recorded status transitions.

use super::ItemKey;
use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

/// A recorded status change.
///
/// Timestamps are normalised to UTC on construction so every comparison in
/// the engine happens in one clock domain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transition {
    from_status: Option<String>,
    to_status: String,
    at: DateTime<Utc>,
    actor: Option<String>,
}

impl Transition {
    /// Creates a transition into `to_status` at `at`.
    #[must_use]
    pub fn new<Tz: TimeZone>(to_status: impl Into<String>, at: &DateTime<Tz>) -> Self {
        Self {
            from_status: None,
            to_status: to_status.into(),
            at: at.with_timezone(&Utc),
            actor: None,
        }
    }

    /// Sets the status the item left.
    #[must_use]
    pub fn with_from_status(mut self, from_status: impl Into<String>) -> Self {
        self.from_status = Some(from_status.into());
        self
    }

    /// Sets the actor who performed the change.
    #[must_use]
    pub fn with_actor(mut self, actor: impl Into<String>) -> Self {
        self.actor = Some(actor.into());
        self
    }

    /// Returns the status the item left, when recorded.
    #[must_use]
    pub fn from_status(&self) -> Option<&str> {
        self.from_status.as_deref()
    }

    /// Returns the status the item entered.
    #[must_use]
    pub fn to_status(&self) -> &str {
        &self.to_status
    }

    /// Returns the UTC timestamp of the change.
    #[must_use]
    pub const fn at(&self) -> DateTime<Utc> {
        self.at
    }

    /// Returns the actor, when recorded.
    #[must_use]
    pub fn actor(&self) -> Option<&str> {
        self.actor.as_deref()
    }
}

/// A unit of tracked work with its full transition history.
///
/// `M` is display metadata supplied by the caller (assignee, summary,
/// priority and so on). The engine never inspects it; drilldown hands it
/// back untouched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackedItem<M = ()> {
    key: ItemKey,
    created_at: Option<DateTime<Utc>>,
    status: String,
    explicit_category: Option<String>,
    transitions: Vec<Transition>,
    metadata: M,
}

impl TrackedItem {
    /// Creates an item with no creation timestamp, transitions or metadata.
    #[must_use]
    pub fn new(key: ItemKey, status: impl Into<String>) -> Self {
        Self {
            key,
            created_at: None,
            status: status.into(),
            explicit_category: None,
            transitions: Vec::new(),
            metadata: (),
        }
    }
}

impl<M> TrackedItem<M> {
    /// Sets the creation timestamp, normalised to UTC.
    #[must_use]
    pub fn with_created_at<Tz: TimeZone>(mut self, created_at: &DateTime<Tz>) -> Self {
        self.created_at = Some(created_at.with_timezone(&Utc));
        self
    }

    /// Sets the explicit lifecycle category reported by the source system.
    #[must_use]
    pub fn with_explicit_category(mut self, category: impl Into<String>) -> Self {
        self.explicit_category = Some(category.into());
        self
    }

    /// Replaces the transition list.
    #[must_use]
    pub fn with_transitions(mut self, transitions: impl IntoIterator<Item = Transition>) -> Self {
        self.transitions = transitions.into_iter().collect();
        self
    }

    /// Appends one transition.
    #[must_use]
    pub fn with_transition(mut self, transition: Transition) -> Self {
        self.transitions.push(transition);
        self
    }

    /// Attaches display metadata, replacing any existing payload.
    #[must_use]
    pub fn with_metadata<N>(self, metadata: N) -> TrackedItem<N> {
        TrackedItem {
            key: self.key,
            created_at: self.created_at,
            status: self.status,
            explicit_category: self.explicit_category,
            transitions: self.transitions,
            metadata,
        }
    }

    /// Returns the item key.
    #[must_use]
    pub const fn key(&self) -> &ItemKey {
        &self.key
    }

    /// Returns the creation timestamp, when known.
    #[must_use]
    pub const fn created_at(&self) -> Option<DateTime<Utc>> {
        self.created_at
    }

    /// Returns the current status name.
    #[must_use]
    pub fn status(&self) -> &str {
        &self.status
    }

    /// Returns the explicit lifecycle category, when reported.
    #[must_use]
    pub fn explicit_category(&self) -> Option<&str> {
        self.explicit_category.as_deref()
    }

    /// Returns transitions in the order they were supplied.
    #[must_use]
    pub fn transitions(&self) -> &[Transition] {
        &self.transitions
    }

    /// Returns the display metadata.
    #[must_use]
    pub const fn metadata(&self) -> &M {
        &self.metadata
    }
}
