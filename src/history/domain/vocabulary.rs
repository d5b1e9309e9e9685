//! Status vocabulary used to map status names onto lifecycle categories.
//!
//! One [`StatusVocabulary`] value holds every alias, exact name and keyword
//! table. It is built once, wrapped in a categorizer and shared by every
//! component, so a given status string always lands in the same bucket.

use super::{CategoryBucket, VocabularyError};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Keyword precedence for the substring heuristic.
///
/// Done is checked first so that, for example, "Ready for Deployment" or
/// "Reopened" are not captured by an incidental to-do keyword.
pub const KEYWORD_PRECEDENCE: [CategoryBucket; 3] = [
    CategoryBucket::Done,
    CategoryBucket::InProgress,
    CategoryBucket::ToDo,
];

const DEFAULT_ALIASES: [(&str, CategoryBucket); 9] = [
    ("todo", CategoryBucket::ToDo),
    ("to do", CategoryBucket::ToDo),
    ("new", CategoryBucket::ToDo),
    ("indeterminate", CategoryBucket::InProgress),
    ("in progress", CategoryBucket::InProgress),
    ("inprogress", CategoryBucket::InProgress),
    ("done", CategoryBucket::Done),
    ("complete", CategoryBucket::Done),
    ("completed", CategoryBucket::Done),
];

const DEFAULT_TO_DO_STATUSES: [&str; 14] = [
    "To Do",
    "TODO",
    "Open",
    "New",
    "Backlog",
    "Reopened",
    "Ready",
    "Ready for Development",
    "Ready for Dev",
    "Planned",
    "Pending",
    "Waiting",
    "On Hold",
    "Blocked",
];

const DEFAULT_IN_PROGRESS_STATUSES: [&str; 25] = [
    "In Progress",
    "In Development",
    "In Dev",
    "Developing",
    "Development",
    "In Review",
    "In Code Review",
    "Code Review",
    "Reviewing",
    "Review",
    "Testing",
    "In Testing",
    "In QA",
    "QA",
    "Quality Assurance",
    "To Test",
    "Ready for Testing",
    "Ready for QA",
    "Verification",
    "In Verification",
    "Deployment",
    "In Deployment",
    "Ready for Deployment",
    "UAT",
    "User Acceptance Testing",
];

const DEFAULT_DONE_STATUSES: [&str; 18] = [
    "Done",
    "Closed",
    "Resolved",
    "Complete",
    "Completed",
    "Finished",
    "Released",
    "Deployed",
    "Live",
    "Production",
    "Cancelled",
    "Canceled",
    "Rejected",
    "Duplicate",
    "Won't Do",
    "Won't Fix",
    "Invalid",
    "Cannot Reproduce",
];

const DEFAULT_TO_DO_KEYWORDS: [&str; 11] = [
    "todo", "open", "new", "backlog", "reopen", "ready", "planned", "pending", "waiting", "hold",
    "blocked",
];

const DEFAULT_IN_PROGRESS_KEYWORDS: [&str; 9] = [
    "progress",
    "development",
    "developing",
    "review",
    "testing",
    "verification",
    "deployment",
    "uat",
    "qa",
];

const DEFAULT_DONE_KEYWORDS: [&str; 15] = [
    "done", "closed", "resolved", "complete", "finish", "released", "deployed", "live",
    "production", "cancel", "reject", "duplicate", "wont", "won't", "invalid",
];

/// Immutable alias, exact-name and keyword tables.
///
/// All lookups are case-insensitive; entries are stored lowercased.
///
/// # Examples
///
/// ```
/// use lifeline::history::domain::{CategoryBucket, StatusVocabulary};
///
/// let vocabulary = StatusVocabulary::empty()
///     .with_exact_status("Parked", CategoryBucket::ToDo)
///     .with_keyword("ship", CategoryBucket::Done);
///
/// assert_eq!(vocabulary.exact("parked"), Some(CategoryBucket::ToDo));
/// assert_eq!(
///     vocabulary.keyword_match("shipped to prod"),
///     Some((CategoryBucket::Done, "ship"))
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusVocabulary {
    aliases: BTreeMap<String, CategoryBucket>,
    exact: BTreeMap<String, CategoryBucket>,
    keywords: BTreeMap<CategoryBucket, Vec<String>>,
}

impl Default for StatusVocabulary {
    fn default() -> Self {
        let mut vocabulary = Self::empty();
        for (alias, bucket) in DEFAULT_ALIASES {
            vocabulary = vocabulary.with_alias(alias, bucket);
        }
        let statuses = [
            (CategoryBucket::ToDo, DEFAULT_TO_DO_STATUSES.as_slice()),
            (CategoryBucket::InProgress, DEFAULT_IN_PROGRESS_STATUSES.as_slice()),
            (CategoryBucket::Done, DEFAULT_DONE_STATUSES.as_slice()),
        ];
        for (bucket, names) in statuses {
            for name in names {
                vocabulary = vocabulary.with_exact_status(*name, bucket);
            }
        }
        let keywords = [
            (CategoryBucket::ToDo, DEFAULT_TO_DO_KEYWORDS.as_slice()),
            (CategoryBucket::InProgress, DEFAULT_IN_PROGRESS_KEYWORDS.as_slice()),
            (CategoryBucket::Done, DEFAULT_DONE_KEYWORDS.as_slice()),
        ];
        for (bucket, words) in keywords {
            for word in words {
                vocabulary = vocabulary.with_keyword(*word, bucket);
            }
        }
        vocabulary
    }
}

impl StatusVocabulary {
    /// Creates a vocabulary with no entries; every status falls to the
    /// default category.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            aliases: BTreeMap::new(),
            exact: BTreeMap::new(),
            keywords: BTreeMap::new(),
        }
    }

    /// Loads a vocabulary from a JSON document.
    ///
    /// The document has the shape
    /// `{"aliases": {label: bucket}, "statuses": {bucket: [name]},
    /// "keywords": {bucket: [word]}}`; every section is optional.
    ///
    /// # Errors
    ///
    /// Returns [`VocabularyError::Parse`] when the document is malformed and
    /// [`VocabularyError::UnknownCategory`] when a bucket label is not one of
    /// `to_do`, `in_progress` or `done`.
    pub fn from_json_str(document: &str) -> Result<Self, VocabularyError> {
        let parsed: VocabularyDocument = serde_json::from_str(document)?;
        let mut vocabulary = Self::empty();
        for (alias, label) in parsed.aliases {
            vocabulary = vocabulary.with_alias(alias, parse_bucket(&label)?);
        }
        for (label, names) in parsed.statuses {
            let bucket = parse_bucket(&label)?;
            for name in names {
                vocabulary = vocabulary.with_exact_status(name, bucket);
            }
        }
        for (label, words) in parsed.keywords {
            let bucket = parse_bucket(&label)?;
            for word in words {
                vocabulary = vocabulary.with_keyword(word, bucket);
            }
        }
        Ok(vocabulary)
    }

    /// Maps an explicit category label onto a bucket.
    #[must_use]
    pub fn with_alias(mut self, label: impl AsRef<str>, bucket: CategoryBucket) -> Self {
        self.aliases.insert(normalize(label.as_ref()), bucket);
        self
    }

    /// Maps an exact status name onto a bucket, replacing any earlier entry.
    #[must_use]
    pub fn with_exact_status(mut self, name: impl AsRef<str>, bucket: CategoryBucket) -> Self {
        self.exact.insert(normalize(name.as_ref()), bucket);
        self
    }

    /// Adds a substring keyword for a bucket.
    #[must_use]
    pub fn with_keyword(mut self, keyword: impl AsRef<str>, bucket: CategoryBucket) -> Self {
        let word = normalize(keyword.as_ref());
        if word.is_empty() {
            return self;
        }
        let words = self.keywords.entry(bucket).or_default();
        if !words.contains(&word) {
            words.push(word);
        }
        self
    }

    /// Looks up an explicit category label.
    #[must_use]
    pub fn alias(&self, label: &str) -> Option<CategoryBucket> {
        self.aliases.get(&normalize(label)).copied()
    }

    /// Looks up an exact status name.
    #[must_use]
    pub fn exact(&self, status: &str) -> Option<CategoryBucket> {
        self.exact.get(&normalize(status)).copied()
    }

    /// Finds the first keyword contained in `status`, honouring
    /// [`KEYWORD_PRECEDENCE`].
    #[must_use]
    pub fn keyword_match(&self, status: &str) -> Option<(CategoryBucket, &str)> {
        let lowered = normalize(status);
        KEYWORD_PRECEDENCE.into_iter().find_map(|bucket| {
            self.keywords_for(bucket)
                .iter()
                .find(|word| lowered.contains(word.as_str()))
                .map(|word| (bucket, word.as_str()))
        })
    }

    /// Returns the keywords registered for `bucket`.
    #[must_use]
    pub fn keywords_for(&self, bucket: CategoryBucket) -> &[String] {
        self.keywords
            .get(&bucket)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct VocabularyDocument {
    aliases: BTreeMap<String, String>,
    statuses: BTreeMap<String, Vec<String>>,
    keywords: BTreeMap<String, Vec<String>>,
}

fn parse_bucket(label: &str) -> Result<CategoryBucket, VocabularyError> {
    CategoryBucket::try_from(label).map_err(VocabularyError::UnknownCategory)
}

fn normalize(value: &str) -> String {
    value.trim().to_lowercase()
}
