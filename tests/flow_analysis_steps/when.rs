//! When steps for flow analysis BDD scenarios.

use super::world::{FlowAnalysisWorld, parse_date, run_async};
use eyre::WrapErr;
use lifeline::analytics::{
    domain::{DateRange, Granularity, MetricSpec},
    services::CancellationFlag,
};
use rstest_bdd_macros::when;

#[when(r#"the timelines are reconstructed for project "{project}""#)]
fn timelines_reconstructed(
    world: &mut FlowAnalysisWorld,
    project: String,
) -> Result<(), eyre::Report> {
    let query = world.publish(&project)?;
    let timelines = run_async(
        world
            .service
            .fetch_and_reconstruct(&query, |batch| batch.timelines().cloned().collect()),
    )
    .wrap_err("reconstruct scenario timelines")?;
    world.timelines = timelines;
    Ok(())
}

#[when(r#"the flow report is requested for project "{project}""#)]
fn flow_report_requested(
    world: &mut FlowAnalysisWorld,
    project: String,
) -> Result<(), eyre::Report> {
    let query = world.publish(&project)?;
    let result = run_async(world.service.flow_report(&query));
    world.flow_result = Some(result);
    Ok(())
}

#[when(r#"the daily series from "{start}" to "{end}" is requested for project "{project}""#)]
fn daily_series_requested(
    world: &mut FlowAnalysisWorld,
    start: String,
    end: String,
    project: String,
) -> Result<(), eyre::Report> {
    let query = world.publish(&project)?;
    let range = DateRange::new(parse_date(&start)?, parse_date(&end)?)?;
    let report = run_async(world.service.temporal_report(
        &query,
        range,
        Granularity::Daily,
        &MetricSpec::minimal(),
        &CancellationFlag::new(),
    ))
    .wrap_err("aggregate scenario items")?;
    world.temporal_report = Some(report);
    Ok(())
}
