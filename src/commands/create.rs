//! `create` command: start a brand-new dynasty.

use crate::controller::SeasonCycleController;
use crate::error::Result;
use crate::ids::{DynastyId, TeamId};
use crate::store::schema::Store;

pub fn handle_create(
    store: Store,
    dynasty_id: DynastyId,
    name: &str,
    owner: &str,
    team: Option<TeamId>,
    season: u16,
) -> Result<()> {
    let created_at = unix_time_now();
    let (mut controller, dynasty) =
        SeasonCycleController::create(store, dynasty_id, name, owner, team, season, created_at)?;

    let state = controller.current_state()?;
    println!(
        "created dynasty '{}' ({}), owner {}, season {} starting {}",
        dynasty.display_name, dynasty.dynasty_id, dynasty.owner_name, state.season, state.current_date
    );
    Ok(())
}

fn unix_time_now() -> i64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or(0)
}
