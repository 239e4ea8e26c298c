//! `draft-pick` / `draft-ai-pick` commands.

use crate::draft::evaluation::TeamNeed;
use crate::draft::execution;
use crate::error::{DynastyError, Result};
use crate::ids::{DynastyId, ProspectId, TeamId};
use crate::store::schema::Store;
use crate::store::txn::Txn;

/// Fixed roster targets used to turn a team's current depth chart into
/// [`TeamNeed`] urgency scores for [`execution::execute_ai_pick`]. A real
/// front office weighs contract situations and age curves too; this keeps
/// the AI's drafting grounded in what's actually on the roster without
/// requiring a full scouting department.
const ROSTER_TARGETS: &[(&str, u8)] = &[
    ("QB", 3),
    ("RB", 4),
    ("WR", 6),
    ("TE", 3),
    ("OL", 8),
    ("DL", 7),
    ("LB", 6),
    ("CB", 5),
    ("S", 4),
    ("K", 1),
    ("P", 1),
];

fn derive_team_needs(txn: &Txn<'_>, dynasty_id: &DynastyId, team_id: TeamId) -> Result<Vec<TeamNeed>> {
    let roster = txn.roster_for_team(dynasty_id, team_id)?;
    let needs = ROSTER_TARGETS
        .iter()
        .map(|&(position, target)| {
            let have = roster.iter().filter(|p| p.position == position).count() as u8;
            let urgency = target.saturating_sub(have).min(4) + 1;
            TeamNeed { position, urgency }
        })
        .collect();
    Ok(needs)
}

pub fn handle_draft_ai_pick(mut store: Store, dynasty_id: DynastyId, season: u16) -> Result<()> {
    let txn = store.begin(dynasty_id.clone())?;
    let class_id = txn
        .get_draft_class_id(&dynasty_id, season)?
        .ok_or_else(|| DynastyError::invariant(format!("no draft class for season {season}")))?;
    let pick = txn
        .next_unexecuted_pick(&dynasty_id, season)?
        .ok_or_else(|| DynastyError::invariant(format!("no picks remain for season {season}")))?;

    let needs = derive_team_needs(&txn, &dynasty_id, pick.current_owner_team)?;
    let drafted = execution::execute_ai_pick(&txn, &dynasty_id, season, class_id, &needs)?;
    txn.commit()?;

    match drafted {
        Some(player_id) => println!(
            "team {} drafted player #{} (round {} pick {})",
            pick.current_owner_team, player_id, pick.round, pick.overall_pick
        ),
        None => println!("no undrafted prospects remain in class #{}", class_id.0),
    }
    Ok(())
}

pub fn handle_draft_pick(
    mut store: Store,
    dynasty_id: DynastyId,
    season: u16,
    prospect_id: i64,
) -> Result<()> {
    let txn = store.begin(dynasty_id.clone())?;
    let class_id = txn
        .get_draft_class_id(&dynasty_id, season)?
        .ok_or_else(|| DynastyError::invariant(format!("no draft class for season {season}")))?;

    let player_id =
        execution::execute_pick(&txn, &dynasty_id, season, ProspectId::new(prospect_id), class_id)?;
    txn.commit()?;

    println!("drafted prospect #{prospect_id} as roster player #{player_id}");
    Ok(())
}
