//! Status categorisation against a shared [`StatusVocabulary`].

use crate::history::domain::{CategoryBucket, StatusVocabulary, Timeline};
use serde::Serialize;
use std::sync::Arc;

/// Which resolution step produced a category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchedRule {
    /// The explicit category label matched an alias.
    ExplicitCategory,
    /// The status name matched an exact entry.
    ExactName,
    /// The status name contained a keyword.
    Keyword,
    /// The status name was empty.
    EmptyStatus,
    /// Nothing matched; the default bucket was used.
    Default,
}

/// Outcome of categorising one status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Classification {
    /// Resolved bucket.
    pub bucket: CategoryBucket,
    /// Rule that produced the bucket.
    pub rule: MatchedRule,
}

impl Classification {
    const fn new(bucket: CategoryBucket, rule: MatchedRule) -> Self {
        Self { bucket, rule }
    }

    /// Returns `true` when no vocabulary rule matched.
    #[must_use]
    pub const fn is_unknown(&self) -> bool {
        matches!(self.rule, MatchedRule::Default)
    }
}

/// Classifies status names into [`CategoryBucket`]s.
///
/// Resolution order, first match wins:
///
/// 1. explicit category via the alias table;
/// 2. case-insensitive exact status name;
/// 3. keyword substring, Done before In Progress before To Do;
/// 4. To Do, so unknown statuses count towards the backlog.
///
/// Cloning is cheap; clones share one vocabulary.
///
/// # Examples
///
/// ```
/// use lifeline::history::domain::CategoryBucket;
/// use lifeline::history::services::StatusCategorizer;
///
/// let categorizer = StatusCategorizer::new();
/// assert_eq!(categorizer.classify("Ready for QA", None), CategoryBucket::InProgress);
/// assert_eq!(categorizer.classify("Whatever", Some("Indeterminate")), CategoryBucket::InProgress);
/// assert_eq!(categorizer.classify("", None), CategoryBucket::ToDo);
/// ```
#[derive(Debug, Clone, Default)]
pub struct StatusCategorizer {
    vocabulary: Arc<StatusVocabulary>,
}

impl StatusCategorizer {
    /// Creates a categorizer over the curated default vocabulary.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a categorizer over a custom vocabulary.
    #[must_use]
    pub fn with_vocabulary(vocabulary: StatusVocabulary) -> Self {
        Self {
            vocabulary: Arc::new(vocabulary),
        }
    }

    /// Returns the vocabulary in use.
    #[must_use]
    pub fn vocabulary(&self) -> &StatusVocabulary {
        &self.vocabulary
    }

    /// Returns the bucket for `status`.
    #[must_use]
    pub fn classify(&self, status: &str, explicit_category: Option<&str>) -> CategoryBucket {
        self.classify_detailed(status, explicit_category).bucket
    }

    /// Returns the bucket for `status` together with the rule that matched.
    #[must_use]
    pub fn classify_detailed(
        &self,
        status: &str,
        explicit_category: Option<&str>,
    ) -> Classification {
        if let Some(bucket) = explicit_category.and_then(|label| self.vocabulary.alias(label)) {
            return Classification::new(bucket, MatchedRule::ExplicitCategory);
        }
        if status.trim().is_empty() {
            return Classification::new(CategoryBucket::ToDo, MatchedRule::EmptyStatus);
        }
        if let Some(bucket) = self.vocabulary.exact(status) {
            return Classification::new(bucket, MatchedRule::ExactName);
        }
        if let Some((bucket, _)) = self.vocabulary.keyword_match(status) {
            return Classification::new(bucket, MatchedRule::Keyword);
        }
        tracing::debug!(status, "status matched no vocabulary rule");
        Classification::new(CategoryBucket::ToDo, MatchedRule::Default)
    }

    /// Classifies a status held somewhere on `timeline`.
    ///
    /// The timeline's explicit category is only applied when `status` is
    /// the item's current status.
    #[must_use]
    pub fn classify_on(&self, timeline: &Timeline, status: &str) -> Classification {
        self.classify_detailed(status, timeline.explicit_category_for(status))
    }
}
