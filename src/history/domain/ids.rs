//! Identifier types for the history domain.

use super::ItemInputError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// External identifier of a tracked item, such as `PROJ-123`.
///
/// Keys are trimmed on construction and never empty.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ItemKey(String);

impl ItemKey {
    /// Creates a validated item key.
    ///
    /// # Errors
    ///
    /// Returns [`ItemInputError::EmptyItemKey`] when the value is empty after
    /// trimming.
    pub fn new(value: impl Into<String>) -> Result<Self, ItemInputError> {
        let raw = value.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(ItemInputError::EmptyItemKey);
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Returns the key as `str`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for ItemKey {
    type Error = ItemInputError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ItemKey> for String {
    fn from(value: ItemKey) -> Self {
        value.0
    }
}

impl AsRef<str> for ItemKey {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for ItemKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
