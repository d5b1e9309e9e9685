//! In-memory item source for tests and embedded use.

use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::{Arc, RwLock};

use crate::history::{
    domain::TrackedItem,
    ports::{ItemQuery, ItemSource, ItemSourceError, ItemSourceResult},
};

type SelectionKey = (String, Option<String>);

/// Thread-safe in-memory item source.
///
/// Items are stored per `(project, label)` selection, mirroring how a
/// fetch cache is keyed.
#[derive(Debug, Clone)]
pub struct InMemoryItemSource<M = ()> {
    state: Arc<RwLock<BTreeMap<SelectionKey, Vec<TrackedItem<M>>>>>,
}

impl<M> Default for InMemoryItemSource<M> {
    fn default() -> Self {
        Self {
            state: Arc::new(RwLock::new(BTreeMap::new())),
        }
    }
}

impl<M> InMemoryItemSource<M> {
    /// Creates an empty source.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the items served for `query`.
    ///
    /// # Errors
    ///
    /// Returns [`ItemSourceError::Unavailable`] when the internal lock is
    /// poisoned.
    pub fn insert(&self, query: &ItemQuery, items: Vec<TrackedItem<M>>) -> ItemSourceResult<()> {
        let mut state = self.state.write().map_err(|err| {
            ItemSourceError::unavailable(std::io::Error::other(err.to_string()))
        })?;
        state.insert(selection_key(query), items);
        Ok(())
    }
}

#[async_trait]
impl<M> ItemSource<M> for InMemoryItemSource<M>
where
    M: Clone + Send + Sync + 'static,
{
    async fn fetch_items(&self, query: &ItemQuery) -> ItemSourceResult<Vec<TrackedItem<M>>> {
        let state = self.state.read().map_err(|err| {
            ItemSourceError::unavailable(std::io::Error::other(err.to_string()))
        })?;
        state
            .get(&selection_key(query))
            .cloned()
            .ok_or_else(|| ItemSourceError::NotFound(query.to_string()))
    }
}

fn selection_key(query: &ItemQuery) -> SelectionKey {
    (
        query.project_key().to_owned(),
        query.label().map(str::to_owned),
    )
}
