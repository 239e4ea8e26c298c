//! `status` command: print the dynasty's current position in the calendar.

use crate::controller::SeasonCycleController;
use crate::error::Result;
use crate::ids::DynastyId;
use crate::store::schema::Store;

pub fn handle_status(store: Store, dynasty_id: DynastyId) -> Result<()> {
    let mut controller = SeasonCycleController::load(store, dynasty_id)?;
    let state = controller.current_state()?;
    println!(
        "dynasty {}: {} ({:?}), season {}",
        controller.dynasty_id(),
        state.current_date,
        state.current_phase,
        state.season
    );
    if state.draft_in_progress {
        println!("draft in progress, on the clock: pick #{}", state.current_draft_pick);
    }
    Ok(())
}
