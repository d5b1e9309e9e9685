//! Given steps for flow analysis BDD scenarios.

use super::world::{FlowAnalysisWorld, PendingItem, midnight};
use lifeline::history::domain::Transition;
use rstest_bdd_macros::given;

#[given(r#"an item "{key}" created on "{created}" in status "{status}""#)]
fn item_created(
    world: &mut FlowAnalysisWorld,
    key: String,
    created: String,
    status: String,
) -> Result<(), eyre::Report> {
    world.pending.push(PendingItem {
        key,
        created_at: midnight(&created)?,
        status,
        transitions: Vec::new(),
    });
    Ok(())
}

#[given(r#"the item moved to "{status}" on "{day}""#)]
fn item_moved(world: &mut FlowAnalysisWorld, status: String, day: String) -> Result<(), eyre::Report> {
    let at = midnight(&day)?;
    let item = world
        .pending
        .last_mut()
        .ok_or_else(|| eyre::eyre!("missing pending item in scenario world"))?;
    item.transitions
        .push(Transition::new(status.as_str(), &at).with_from_status(item.status.as_str()));
    item.status = status;
    Ok(())
}
