//! Port for the upstream data acquisition collaborator.

use crate::history::domain::TrackedItem;
use async_trait::async_trait;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

/// Result type for item source operations.
pub type ItemSourceResult<T> = Result<T, ItemSourceError>;

/// Selects the items to fetch.
///
/// The selection is keyed by project and optional label only. Date
/// windowing belongs to the analytics layer, so a cached fetch serves every
/// date range.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ItemQuery {
    project_key: String,
    label: Option<String>,
    force_refresh: bool,
}

impl ItemQuery {
    /// Creates a query for every item of `project_key`.
    #[must_use]
    pub fn new(project_key: impl Into<String>) -> Self {
        Self {
            project_key: project_key.into(),
            label: None,
            force_refresh: false,
        }
    }

    /// Restricts the query to items carrying `label`.
    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Asks the source to bypass any local cache.
    #[must_use]
    pub const fn force_refresh(mut self) -> Self {
        self.force_refresh = true;
        self
    }

    /// Returns the project key.
    #[must_use]
    pub fn project_key(&self) -> &str {
        &self.project_key
    }

    /// Returns the label filter, if any.
    #[must_use]
    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    /// Returns `true` when the cache must be bypassed.
    #[must_use]
    pub const fn is_force_refresh(&self) -> bool {
        self.force_refresh
    }
}

impl fmt::Display for ItemQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.label {
            Some(label) => write!(f, "{}[{label}]", self.project_key),
            None => write!(f, "{}", self.project_key),
        }
    }
}

/// Supplier of items with complete transition histories.
///
/// Implementations own retries, pagination, rate limiting and caching.
/// Every returned item must carry its full transition list.
#[async_trait]
pub trait ItemSource<M = ()>: Send + Sync
where
    M: Send + 'static,
{
    /// Fetches every item matching `query`.
    ///
    /// # Errors
    ///
    /// Returns [`ItemSourceError::NotFound`] when the project is unknown and
    /// [`ItemSourceError::Unavailable`] when the source cannot be reached.
    async fn fetch_items(&self, query: &ItemQuery) -> ItemSourceResult<Vec<TrackedItem<M>>>;
}

/// Errors returned by item source implementations.
#[derive(Debug, Clone, Error)]
pub enum ItemSourceError {
    /// No items are known for the query.
    #[error("no items found for {0}")]
    NotFound(String),

    /// The source failed.
    #[error("item source unavailable: {0}")]
    Unavailable(Arc<dyn std::error::Error + Send + Sync>),
}

impl ItemSourceError {
    /// Wraps an upstream failure.
    #[must_use]
    pub fn unavailable(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Unavailable(Arc::new(err))
    }
}
