//! `resolve-milestone` command.

use crate::controller::SeasonCycleController;
use crate::error::{DynastyError, Result};
use crate::ids::{DynastyId, EventId};
use crate::milestones::ResolveOutcome;
use crate::store::schema::Store;

pub fn handle_resolve_milestone(
    store: Store,
    dynasty_id: DynastyId,
    event_id: i64,
    mutations_json: &str,
) -> Result<()> {
    let mutations: serde_json::Value = serde_json::from_str(mutations_json)
        .map_err(|e| DynastyError::invariant(format!("invalid --mutations JSON: {e}")))?;

    let mut controller = SeasonCycleController::load(store, dynasty_id)?;
    let outcome = controller.resolve_milestone(EventId::new(event_id), mutations)?;
    match outcome {
        ResolveOutcome::Applied => println!("event #{event_id} resolved"),
        ResolveOutcome::AlreadyResolved => println!("event #{event_id} was already resolved"),
    }
    Ok(())
}
