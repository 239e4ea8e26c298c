//! `advance-day` / `advance-week` / `advance-to-phase-end` commands.

use crate::controller::SeasonCycleController;
use crate::error::Result;
use crate::ids::DynastyId;
use crate::simulation::DayTickOutcome;
use crate::store::schema::Store;

fn report(outcomes: &[DayTickOutcome]) {
    for outcome in outcomes {
        println!(
            "{}: simulated {} game(s)",
            outcome.date,
            outcome.simulated_games.len()
        );
        if let Some((from, to)) = outcome.phase_transition {
            println!("  phase transition: {from:?} -> {to:?}");
        }
        if let Some(event) = &outcome.needs_interaction {
            println!(
                "  paused for milestone: event #{} ({:?}) needs a decision before the day can close",
                event.event_id, event.event_type
            );
        }
    }
}

pub fn handle_advance_day(store: Store, dynasty_id: DynastyId) -> Result<()> {
    let mut controller = SeasonCycleController::load(store, dynasty_id)?;
    let outcome = controller.advance_day()?;
    report(std::slice::from_ref(&outcome));
    Ok(())
}

pub fn handle_advance_week(store: Store, dynasty_id: DynastyId) -> Result<()> {
    let mut controller = SeasonCycleController::load(store, dynasty_id)?;
    let outcomes = controller.advance_week()?;
    report(&outcomes);
    Ok(())
}

pub fn handle_advance_to_phase_end(store: Store, dynasty_id: DynastyId) -> Result<()> {
    let mut controller = SeasonCycleController::load(store, dynasty_id)?;
    let outcomes = controller.advance_to_phase_end()?;
    report(&outcomes);
    Ok(())
}
