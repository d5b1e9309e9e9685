//! Coarse lifecycle categories.

use super::ParseCategoryError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Coarse lifecycle bucket a status name resolves to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CategoryBucket {
    /// Work not yet started.
    ToDo,
    /// Work under way, including review, test and deployment stages.
    InProgress,
    /// Work finished, including rejected and cancelled outcomes.
    Done,
}

impl CategoryBucket {
    /// Every bucket, in workflow order.
    pub const ALL: [Self; 3] = [Self::ToDo, Self::InProgress, Self::Done];

    /// Returns the canonical label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ToDo => "to_do",
            Self::InProgress => "in_progress",
            Self::Done => "done",
        }
    }

    /// Returns `true` for [`CategoryBucket::Done`].
    #[must_use]
    pub const fn is_done(self) -> bool {
        matches!(self, Self::Done)
    }
}

impl TryFrom<&str> for CategoryBucket {
    type Error = ParseCategoryError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "to_do" | "todo" => Ok(Self::ToDo),
            "in_progress" | "inprogress" => Ok(Self::InProgress),
            "done" => Ok(Self::Done),
            _ => Err(ParseCategoryError(value.to_owned())),
        }
    }
}

impl fmt::Display for CategoryBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
