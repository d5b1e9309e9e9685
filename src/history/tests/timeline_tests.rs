//! Unit tests for single-item timeline reconstruction.

use super::instant;
use crate::history::domain::{
    InitialStatusSource, ItemInputError, ItemKey, StatusAt, StatusSegment, Timeline, TrackedItem,
    Transition,
};
use chrono::{DateTime, Utc};
use eyre::{bail, ensure};
use rstest::{fixture, rstest};

/// Created 2024-01-01; To Do → In Progress on 01-05; In Progress → Done on
/// 01-10.
#[fixture]
fn delivered() -> eyre::Result<TrackedItem> {
    Ok(TrackedItem::new(ItemKey::new("FLOW-1")?, "Done")
        .with_created_at(&instant("2024-01-01T00:00:00Z")?)
        .with_transitions([
            Transition::new("In Progress", &instant("2024-01-05T00:00:00Z")?)
                .with_from_status("To Do"),
            Transition::new("Done", &instant("2024-01-10T00:00:00Z")?)
                .with_from_status("In Progress"),
        ]))
}

fn now() -> eyre::Result<DateTime<Utc>> {
    instant("2024-02-01T00:00:00Z")
}

#[rstest]
#[case("2024-01-03T00:00:00Z", "To Do")]
#[case("2024-01-07T00:00:00Z", "In Progress")]
#[case("2024-01-12T00:00:00Z", "Done")]
fn status_at_follows_the_transition_log(
    delivered: eyre::Result<TrackedItem>,
    #[case] at: &str,
    #[case] expected: &str,
) -> eyre::Result<()> {
    let timeline = Timeline::build(&delivered?, now()?)?;

    ensure!(timeline.status_at(instant(at)?) == StatusAt::InStatus(expected));
    Ok(())
}

#[rstest]
fn status_at_before_creation_reports_not_created(
    delivered: eyre::Result<TrackedItem>,
) -> eyre::Result<()> {
    let timeline = Timeline::build(&delivered?, now()?)?;

    let before = timeline.status_at(instant("2023-12-31T23:59:59Z")?);

    ensure!(before == StatusAt::NotCreated);
    ensure!(before.status().is_none());
    Ok(())
}

#[rstest]
#[case("2024-01-01T00:00:00Z", "To Do")]
#[case("2024-01-05T00:00:00Z", "In Progress")]
#[case("2024-01-10T00:00:00Z", "Done")]
fn status_at_a_transition_instant_is_its_to_status(
    delivered: eyre::Result<TrackedItem>,
    #[case] at: &str,
    #[case] expected: &str,
) -> eyre::Result<()> {
    let timeline = Timeline::build(&delivered?, now()?)?;

    ensure!(timeline.status_at(instant(at)?).status() == Some(expected));
    Ok(())
}

#[rstest]
fn status_at_or_after_horizon_is_final_status(
    delivered: eyre::Result<TrackedItem>,
) -> eyre::Result<()> {
    let timeline = Timeline::build(&delivered?, now()?)?;

    ensure!(timeline.horizon() == now()?);
    ensure!(timeline.status_at(timeline.horizon()).status() == Some("Done"));
    ensure!(timeline.status_at(instant("2030-01-01T00:00:00Z")?).status() == Some("Done"));
    ensure!(timeline.final_status() == "Done");
    Ok(())
}

#[rstest]
fn segments_partition_creation_to_horizon(
    delivered: eyre::Result<TrackedItem>,
) -> eyre::Result<()> {
    let timeline = Timeline::build(&delivered?, now()?)?;
    let segments = timeline.segments();

    ensure!(segments.len() == 3);
    ensure!(segments.first().map(StatusSegment::start) == Some(timeline.created_at()));
    ensure!(segments.last().map(StatusSegment::end) == Some(timeline.horizon()));
    for (previous, next) in timeline.changes() {
        ensure!(previous.end() == next.start(), "gap between {previous:?} and {next:?}");
    }
    ensure!(timeline.initial_status_source() == InitialStatusSource::FromTransition);
    ensure!(!timeline.is_approximate());
    Ok(())
}

#[rstest]
fn item_without_transitions_holds_current_status_throughout() -> eyre::Result<()> {
    let item = TrackedItem::new(ItemKey::new("FLOW-2")?, "Backlog")
        .with_created_at(&instant("2024-01-01T00:00:00Z")?);

    let timeline = Timeline::build(&item, now()?)?;

    ensure!(timeline.segments().len() == 1);
    ensure!(!timeline.has_transitions());
    ensure!(timeline.initial_status_source() == InitialStatusSource::NoTransitions);
    ensure!(timeline.status_at(instant("2024-01-15T00:00:00Z")?).status() == Some("Backlog"));
    Ok(())
}

#[rstest]
fn missing_from_status_falls_back_to_current_status() -> eyre::Result<()> {
    let item = TrackedItem::new(ItemKey::new("FLOW-3")?, "Done")
        .with_created_at(&instant("2024-01-01T00:00:00Z")?)
        .with_transition(Transition::new("Done", &instant("2024-01-04T00:00:00Z")?));

    let timeline = Timeline::build(&item, now()?)?;

    ensure!(timeline.initial_status_source() == InitialStatusSource::CurrentStatusFallback);
    ensure!(timeline.is_approximate());
    ensure!(timeline.status_at(instant("2024-01-02T00:00:00Z")?).status() == Some("Done"));
    Ok(())
}

#[rstest]
fn transitions_are_sorted_and_duplicates_dropped() -> eyre::Result<()> {
    let review = instant("2024-01-06T00:00:00Z")?;
    let item = TrackedItem::new(ItemKey::new("FLOW-4")?, "Review")
        .with_created_at(&instant("2024-01-01T00:00:00Z")?)
        .with_transitions([
            Transition::new("Review", &review).with_from_status("In Progress"),
            Transition::new("In Progress", &instant("2024-01-03T00:00:00Z")?)
                .with_from_status("To Do"),
            Transition::new("Review", &review).with_from_status("In Progress"),
        ]);

    let timeline = Timeline::build(&item, now()?)?;
    let statuses: Vec<&str> = timeline.segments().iter().map(StatusSegment::status).collect();

    ensure!(statuses == ["To Do", "In Progress", "Review"]);
    Ok(())
}

#[rstest]
fn simultaneous_transitions_resolve_to_the_last_one() -> eyre::Result<()> {
    let moment = instant("2024-01-05T12:00:00Z")?;
    let item = TrackedItem::new(ItemKey::new("FLOW-5")?, "Done")
        .with_created_at(&instant("2024-01-01T00:00:00Z")?)
        .with_transitions([
            Transition::new("In Progress", &moment).with_from_status("To Do"),
            Transition::new("Done", &moment).with_from_status("In Progress"),
        ]);

    let timeline = Timeline::build(&item, now()?)?;

    ensure!(timeline.segments().len() == 3);
    ensure!(timeline.segments().iter().filter(|segment| segment.is_empty()).count() == 1);
    ensure!(timeline.status_at(moment).status() == Some("Done"));
    Ok(())
}

#[rstest]
fn horizon_extends_to_a_transition_after_now() -> eyre::Result<()> {
    let late = instant("2024-03-01T00:00:00Z")?;
    let item = TrackedItem::new(ItemKey::new("FLOW-6")?, "Done")
        .with_created_at(&instant("2024-01-01T00:00:00Z")?)
        .with_transition(Transition::new("Done", &late).with_from_status("To Do"));

    let timeline = Timeline::build(&item, now()?)?;

    ensure!(timeline.horizon() == late);
    Ok(())
}

#[rstest]
fn transitions_in_other_offsets_are_normalised_to_utc() -> eyre::Result<()> {
    let local = DateTime::parse_from_rfc3339("2024-01-05T02:00:00+05:00")?;
    let transition = Transition::new("Done", &local);

    ensure!(transition.at() == instant("2024-01-04T21:00:00Z")?);
    Ok(())
}

#[rstest]
fn missing_creation_is_rejected() -> eyre::Result<()> {
    let key = ItemKey::new("FLOW-7")?;
    let item = TrackedItem::new(key.clone(), "Open");

    match Timeline::build(&item, now()?) {
        Err(ItemInputError::MissingCreation { key: rejected }) if rejected == key => Ok(()),
        other => bail!("expected missing creation, got {other:?}"),
    }
}

#[rstest]
fn transition_before_creation_is_rejected() -> eyre::Result<()> {
    let created_at = instant("2024-01-10T00:00:00Z")?;
    let early = instant("2024-01-09T00:00:00Z")?;
    let item = TrackedItem::new(ItemKey::new("FLOW-8")?, "Done")
        .with_created_at(&created_at)
        .with_transition(Transition::new("Done", &early).with_from_status("Open"));

    let expected = ItemInputError::TransitionBeforeCreation {
        key: ItemKey::new("FLOW-8")?,
        created_at,
        at: early,
    };

    match Timeline::build(&item, now()?) {
        Err(err) if err == expected => Ok(()),
        other => bail!("expected {expected:?}, got {other:?}"),
    }
}

#[rstest]
#[case("")]
#[case("   ")]
fn blank_item_keys_are_rejected(#[case] raw: &str) {
    assert_eq!(ItemKey::new(raw), Err(ItemInputError::EmptyItemKey));
}
