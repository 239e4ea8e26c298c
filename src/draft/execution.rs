//! Executes one pick: evaluates the available pool for an AI-controlled
//! team, mints the drafted player onto a roster, and advances the cursor.
//! A user-controlled team's selection arrives from outside (the CLI/host)
//! instead of [`evaluation::best_available`], but both paths converge on
//! [`execute_pick`] so the ledger update is identical either way.

use crate::draft::evaluation::{self, EvaluationWeights, TeamNeed};
use crate::error::{DynastyError, Result};
use crate::ids::{DynastyId, PlayerId, ProspectId};
use crate::store::draft::DraftClassId;
use crate::store::roster::NewRosterPlayer;
use crate::store::txn::Txn;

/// Draft one prospect onto the team that currently owns the pick at
/// `season`'s front of the order. Returns the minted roster player id.
///
/// This is idempotent against a crash between minting the roster row and
/// marking the pick executed only insofar as the whole operation runs in
/// one [`Txn`] — a caller that commits after this returns never observes a
/// half-applied pick.
pub fn execute_pick(
    txn: &Txn<'_>,
    dynasty_id: &DynastyId,
    season: u16,
    prospect_id: ProspectId,
    draft_class_id: DraftClassId,
) -> Result<PlayerId> {
    let pick = txn
        .next_unexecuted_pick(dynasty_id, season)?
        .ok_or_else(|| DynastyError::invariant(format!("no picks remain for season {season}")))?;

    let prospect = txn.get_prospect(dynasty_id, prospect_id)?;
    if prospect.is_drafted {
        return Err(DynastyError::invariant(format!(
            "prospect {prospect_id} already drafted"
        )));
    }
    if prospect.draft_class_id.0 != draft_class_id.0 {
        return Err(DynastyError::invariant(format!(
            "prospect {prospect_id} does not belong to draft class {}",
            draft_class_id.0
        )));
    }

    let roster_player_id = txn.insert_roster_player(
        dynasty_id,
        &NewRosterPlayer {
            team_id: pick.current_owner_team,
            name: format!("{} {}", prospect.first_name, prospect.last_name),
            position: prospect.position.clone(),
            jersey_number: 0,
            overall: prospect.true_overall,
            depth_order: u16::MAX,
        },
    )?;

    txn.mark_prospect_drafted(
        dynasty_id,
        prospect_id,
        pick.current_owner_team,
        pick.round,
        pick.overall_pick,
        roster_player_id,
    )?;
    txn.execute_pick(dynasty_id, pick.pick_id, prospect_id)?;

    Ok(roster_player_id)
}

/// Runs the AI evaluation for whichever team is on the clock and drafts
/// their top choice. Used by [`crate::controller::SeasonCycleController`]
/// to auto-advance picks that don't belong to the user's team.
pub fn execute_ai_pick(
    txn: &Txn<'_>,
    dynasty_id: &DynastyId,
    season: u16,
    draft_class_id: DraftClassId,
    needs: &[TeamNeed],
) -> Result<Option<PlayerId>> {
    let pool = txn.undrafted_prospects(dynasty_id, draft_class_id)?;
    let weights = EvaluationWeights::default();
    let Some(choice) = evaluation::best_available(&pool, needs, &weights) else {
        return Ok(None);
    };
    let prospect_id = choice.player_id;
    execute_pick(txn, dynasty_id, season, prospect_id, draft_class_id).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draft::generation::generate_and_store_class;
    use crate::ids::TeamId;
    use crate::store::draft::NewDraftPick;
    use crate::store::schema::Store;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn execute_pick_mints_roster_player_and_advances_cursor() {
        let mut store = Store::open_in_memory().unwrap();
        let dynasty_id = crate::ids::DynastyId::new("d1");
        let txn = store.begin(dynasty_id.clone()).unwrap();
        txn.create_dynasty("D", "Owner", None, 0).unwrap();

        let mut rng = StdRng::seed_from_u64(3);
        let class_id = generate_and_store_class(&txn, &dynasty_id, 2026, 5, &mut rng).unwrap();
        txn.create_draft_pick(
            &dynasty_id,
            2026,
            &NewDraftPick {
                round: 1,
                pick_in_round: 1,
                overall_pick: 1,
                original_owner_team: TeamId::new(9),
                is_compensatory: false,
            },
        )
        .unwrap();

        let prospects = txn.undrafted_prospects(&dynasty_id, class_id).unwrap();
        let chosen = prospects[0].player_id;

        let player_id = execute_pick(&txn, &dynasty_id, 2026, chosen, class_id).unwrap();
        let roster_player = txn.get_roster_player(&dynasty_id, player_id).unwrap();
        assert_eq!(roster_player.team_id, TeamId::new(9));

        let next = txn.next_unexecuted_pick(&dynasty_id, 2026).unwrap();
        assert!(next.is_none());
    }

    #[test]
    fn execute_ai_pick_respects_team_needs() {
        let mut store = Store::open_in_memory().unwrap();
        let dynasty_id = crate::ids::DynastyId::new("d1");
        let txn = store.begin(dynasty_id.clone()).unwrap();
        txn.create_dynasty("D", "Owner", None, 0).unwrap();

        let mut rng = StdRng::seed_from_u64(11);
        let class_id = generate_and_store_class(&txn, &dynasty_id, 2026, 40, &mut rng).unwrap();
        txn.create_draft_pick(
            &dynasty_id,
            2026,
            &NewDraftPick {
                round: 1,
                pick_in_round: 1,
                overall_pick: 1,
                original_owner_team: TeamId::new(3),
                is_compensatory: false,
            },
        )
        .unwrap();

        let needs = [TeamNeed { position: "QB", urgency: 5 }];
        let result = execute_ai_pick(&txn, &dynasty_id, 2026, class_id, &needs).unwrap();
        assert!(result.is_some());
    }

    #[test]
    fn drafting_already_drafted_prospect_is_an_error() {
        let mut store = Store::open_in_memory().unwrap();
        let dynasty_id = crate::ids::DynastyId::new("d1");
        let txn = store.begin(dynasty_id.clone()).unwrap();
        txn.create_dynasty("D", "Owner", None, 0).unwrap();

        let mut rng = StdRng::seed_from_u64(5);
        let class_id = generate_and_store_class(&txn, &dynasty_id, 2026, 3, &mut rng).unwrap();
        txn.create_draft_pick(
            &dynasty_id,
            2026,
            &NewDraftPick {
                round: 1,
                pick_in_round: 1,
                overall_pick: 1,
                original_owner_team: TeamId::new(1),
                is_compensatory: false,
            },
        )
        .unwrap();
        txn.create_draft_pick(
            &dynasty_id,
            2026,
            &NewDraftPick {
                round: 1,
                pick_in_round: 2,
                overall_pick: 2,
                original_owner_team: TeamId::new(2),
                is_compensatory: false,
            },
        )
        .unwrap();

        let prospects = txn.undrafted_prospects(&dynasty_id, class_id).unwrap();
        let chosen = prospects[0].player_id;
        execute_pick(&txn, &dynasty_id, 2026, chosen, class_id).unwrap();

        let err = execute_pick(&txn, &dynasty_id, 2026, chosen, class_id);
        assert!(err.is_err());
    }
}
