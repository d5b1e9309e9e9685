//! Error types for item validation, category parsing and vocabulary
//! loading.

use super::ItemKey;
use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;

/// Reasons a tracked item cannot be reconstructed.
#[derive(Debug, Clone, Error, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ItemInputError {
    /// The item key is empty after trimming.
    #[error("item key must not be empty")]
    EmptyItemKey,

    /// The item carries no creation timestamp.
    #[error("item {key} has no creation timestamp")]
    MissingCreation {
        /// Offending item.
        key: ItemKey,
    },

    /// A transition is recorded before the item was created.
    #[error("item {key} has a transition at {at} before its creation at {created_at}")]
    TransitionBeforeCreation {
        /// Offending item.
        key: ItemKey,
        /// Creation timestamp of the item.
        created_at: DateTime<Utc>,
        /// Timestamp of the earliest offending transition.
        at: DateTime<Utc>,
    },
}

/// An item excluded from a batch, with the reason it was excluded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedItem {
    /// Position of the item in the caller's input.
    pub index: usize,
    /// Why the item was skipped.
    pub reason: ItemInputError,
}

/// Error returned while parsing a category label.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown category bucket: {0}")]
pub struct ParseCategoryError(pub String);

/// Errors returned while loading a status vocabulary.
#[derive(Debug, Error)]
pub enum VocabularyError {
    /// The document is not valid JSON or has an unexpected shape.
    #[error("invalid vocabulary document: {0}")]
    Parse(#[from] serde_json::Error),

    /// A bucket label in the document is not recognised.
    #[error(transparent)]
    UnknownCategory(ParseCategoryError),
}
