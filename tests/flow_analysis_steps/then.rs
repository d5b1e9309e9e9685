//! Then steps for flow analysis BDD scenarios.

use super::world::{FlowAnalysisWorld, midnight, parse_date};
use lifeline::{
    analytics::{
        domain::{Counter, FlowPattern},
        services::{AnalysisError, FlowReport},
    },
    history::{domain::StatusAt, ports::ItemSourceError},
};
use rstest_bdd_macros::then;

fn flow_report(world: &FlowAnalysisWorld) -> Result<&FlowReport, eyre::Report> {
    match world.flow_result.as_ref() {
        Some(Ok(report)) => Ok(report),
        Some(Err(err)) => Err(eyre::eyre!("flow report failed: {err}")),
        None => Err(eyre::eyre!("missing flow report")),
    }
}

fn pattern<'w>(world: &'w FlowAnalysisWorld, key: &str) -> Result<&'w FlowPattern, eyre::Report> {
    flow_report(world)?
        .patterns
        .get(key)
        .ok_or_else(|| eyre::eyre!("pattern {key} was not mined"))
}

fn counter(name: &str) -> Result<Counter, eyre::Report> {
    Counter::ALL
        .into_iter()
        .find(|counter| counter.as_str() == name)
        .ok_or_else(|| eyre::eyre!("unknown counter {name}"))
}

#[then(r#"the status of "{key}" on "{day}" is "{status}""#)]
fn status_on_day(
    world: &FlowAnalysisWorld,
    key: String,
    day: String,
    status: String,
) -> Result<(), eyre::Report> {
    let timeline = world
        .timelines
        .iter()
        .find(|timeline| timeline.key().as_str() == key)
        .ok_or_else(|| eyre::eyre!("missing timeline for {key}"))?;
    let observed = timeline.status_at(midnight(&day)?);

    if observed != StatusAt::InStatus(status.as_str()) {
        return Err(eyre::eyre!("expected {status} on {day}, found {observed:?}"));
    }
    Ok(())
}

#[then(r#""{key}" did not exist on "{day}""#)]
fn did_not_exist(world: &FlowAnalysisWorld, key: String, day: String) -> Result<(), eyre::Report> {
    let timeline = world
        .timelines
        .iter()
        .find(|timeline| timeline.key().as_str() == key)
        .ok_or_else(|| eyre::eyre!("missing timeline for {key}"))?;
    let observed = timeline.status_at(midnight(&day)?);

    if observed != StatusAt::NotCreated {
        return Err(eyre::eyre!("expected {key} to be absent on {day}, found {observed:?}"));
    }
    Ok(())
}

#[then(r#"the pattern "{key}" has {count:usize} items"#)]
fn pattern_has_items(world: &FlowAnalysisWorld, key: String, count: usize) -> Result<(), eyre::Report> {
    let found = pattern(world, &key)?.count();
    if found != count {
        return Err(eyre::eyre!("expected {count} items on {key}, found {found}"));
    }
    Ok(())
}

#[then(r#"the pattern "{key}" does not bounce"#)]
fn pattern_does_not_bounce(world: &FlowAnalysisWorld, key: String) -> Result<(), eyre::Report> {
    if pattern(world, &key)?.bounce() {
        return Err(eyre::eyre!("pattern {key} unexpectedly bounces"));
    }
    Ok(())
}

#[then(r#"the pattern "{key}" bounces"#)]
fn pattern_bounces(world: &FlowAnalysisWorld, key: String) -> Result<(), eyre::Report> {
    if !pattern(world, &key)?.bounce() {
        return Err(eyre::eyre!("pattern {key} was expected to bounce"));
    }
    Ok(())
}

#[then("the flow report lists {count:usize} rework loop")]
fn rework_loops_listed(world: &FlowAnalysisWorld, count: usize) -> Result<(), eyre::Report> {
    let found = flow_report(world)?.rework.total_loops;
    if found != count {
        return Err(eyre::eyre!("expected {count} rework loops, found {found}"));
    }
    Ok(())
}

#[then(r#"the "{name}" counts are "{expected}""#)]
fn counts_are(world: &FlowAnalysisWorld, name: String, expected: String) -> Result<(), eyre::Report> {
    let report = world
        .temporal_report
        .as_ref()
        .ok_or_else(|| eyre::eyre!("missing temporal report"))?;
    let found = report
        .analysis
        .series
        .values(counter(&name)?)
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(",");

    if found != expected {
        return Err(eyre::eyre!("expected {name} counts {expected}, found {found}"));
    }
    Ok(())
}

#[then(r#"the items raised on "{day}" are "{keys}""#)]
fn items_raised_on(world: &FlowAnalysisWorld, day: String, keys: String) -> Result<(), eyre::Report> {
    let report = world
        .temporal_report
        .as_ref()
        .ok_or_else(|| eyre::eyre!("missing temporal report"))?;
    let found = report
        .analysis
        .drilldown
        .keys(parse_date(&day)?, Counter::Raised)
        .iter()
        .map(|key| key.as_str())
        .collect::<Vec<_>>()
        .join(",");

    if found != keys {
        return Err(eyre::eyre!("expected items {keys} raised on {day}, found {found}"));
    }
    Ok(())
}

#[then("the request fails because no items were found")]
fn request_fails_not_found(world: &FlowAnalysisWorld) -> Result<(), eyre::Report> {
    let result = world
        .flow_result
        .as_ref()
        .ok_or_else(|| eyre::eyre!("missing flow report result"))?;

    if !matches!(result, Err(AnalysisError::Source(ItemSourceError::NotFound(_)))) {
        return Err(eyre::eyre!("expected a not-found source error, got {result:?}"));
    }
    Ok(())
}
