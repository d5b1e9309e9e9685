//! Unit tests for the history module.
//!
//! Tests are organised by component: vocabulary and categorisation first,
//! then single-item timelines, batch reconstruction and the in-memory
//! source adapter.

mod timeline_tests;

use chrono::{DateTime, Utc};

/// Parses an RFC 3339 timestamp.
pub(super) fn instant(text: &str) -> eyre::Result<DateTime<Utc>> {
    Ok(DateTime::parse_from_rfc3339(text)?.with_timezone(&Utc))
}
