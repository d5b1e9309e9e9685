//! Unit tests for the analytics module.


use crate::history::domain::{ItemKey, TrackedItem, Transition};
use chrono::{DateTime, NaiveDate, Utc};
use eyre::OptionExt;

/// Parses an RFC 3339 timestamp.
pub(super) fn instant(text: &str) -> eyre::Result<DateTime<Utc>> {
    Ok(DateTime::parse_from_rfc3339(text)?.with_timezone(&Utc))
}

/// Builds a calendar date.
pub(super) fn date(year: i32, month: u32, day: u32) -> eyre::Result<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month, day).ok_or_eyre("valid calendar date")
}

/// Builds an item that walks through `path`, one status per listed instant.
///
/// The first status is held from creation; each following `(status, at)`
/// pair is a transition from the preceding status.
pub(super) fn walked(
    key: &str,
    created: &str,
    first: &str,
    steps: &[(&str, &str)],
) -> eyre::Result<TrackedItem> {
    let mut previous = first;
    let mut transitions = Vec::with_capacity(steps.len());
    for (status, at) in steps {
        transitions.push(Transition::new(*status, &instant(at)?).with_from_status(previous));
        previous = *status;
    }
    Ok(TrackedItem::new(ItemKey::new(key)?, previous)
        .with_created_at(&instant(created)?)
        .with_transitions(transitions))
}
