//! `skip-to-new-season` command.

use crate::controller::SeasonCycleController;
use crate::error::Result;
use crate::ids::DynastyId;
use crate::store::schema::Store;

pub fn handle_skip_to_new_season(store: Store, dynasty_id: DynastyId) -> Result<()> {
    let mut controller = SeasonCycleController::load(store, dynasty_id)?;
    let report = controller.skip_to_new_season()?;

    println!(
        "entered season {}: {} contract(s) expired, draft class #{} generated with {} prospects",
        report.new_season,
        report.expired_contracts.len(),
        report.draft_class_id.0,
        report.prospects_generated
    );
    for failure in &report.synchronizer_failures {
        println!("  warning: synchronizer subscriber failed: {failure}");
    }
    Ok(())
}
