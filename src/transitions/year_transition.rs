//! Offseason → preseason: the full year transition, with contract handling
//! and draft prep split into their own focused steps.
//!
//! 1. Advance the season-year synchronizer, propagating to every subscriber.
//! 2. Expire contracts whose `end_year` has passed.
//! 3. Generate next season's draft class.
//! 4. Generate the pick-order ledger, inverse to the prior season's standings.
//! 5. Schedule the new league year's deadline, window, milestone, and draft
//!    day events so the interactive-milestone router has something to meet.
//! 6. Reset the new season's standings slate.

use log::info;
use rand::Rng;

use crate::calendar::CalendarDate;
use crate::error::Result;
use crate::ids::{DynastyId, SeasonYear, TeamId};
use crate::store::contracts::Contract;
use crate::store::draft::DraftClassId;
use crate::store::events::{DeadlineKind, EventType, MilestoneKind, NewEvent, WindowKind};
use crate::store::standings::SeasonType;
use crate::store::txn::Txn;
use crate::synchronizer::{SeasonYearSynchronizer, SyncReason};

/// What happened during one year transition, useful for a CLI summary.
#[derive(Debug, Clone)]
pub struct YearTransitionReport {
    pub new_season: u16,
    pub expired_contracts: Vec<Contract>,
    pub draft_class_id: DraftClassId,
    pub prospects_generated: u16,
    pub synchronizer_failures: Vec<String>,
}

pub fn run_year_transition(
    txn: &Txn<'_>,
    dynasty_id: &DynastyId,
    synchronizer: &mut SeasonYearSynchronizer,
    prospect_count: u16,
    rng: &mut impl Rng,
) -> Result<YearTransitionReport> {
    let new_year = synchronizer.current_year().next();
    info!("dynasty {dynasty_id} beginning year transition to {new_year}");

    let synchronizer_failures = synchronizer.synchronize(new_year, SyncReason::OffseasonTransition);

    let expired_contracts = txn.expire_contracts(dynasty_id, new_year.as_u16())?;
    info!(
        "dynasty {dynasty_id}: {} contracts expired entering {new_year}",
        expired_contracts.len()
    );

    let draft_class_id = crate::draft::generate_and_store_class(
        txn,
        dynasty_id,
        new_year.as_u16(),
        prospect_count,
        rng,
    )?;

    let draft_position = inverse_standings_order(txn, dynasty_id, new_year.as_u16() - 1)?;
    crate::draft::generate_standard_pick_order(
        txn,
        dynasty_id,
        new_year.as_u16(),
        &draft_position,
    )?;

    schedule_offseason_calendar(txn, new_year.as_u16())?;

    txn.init_standings(dynasty_id, new_year.as_u16(), SeasonType::Regular)?;

    Ok(YearTransitionReport {
        new_season: new_year.as_u16(),
        expired_contracts,
        draft_class_id,
        prospects_generated: prospect_count,
        synchronizer_failures,
    })
}

/// Worst-record-first team order for the new season's draft, derived from
/// the prior season's final regular-season standings.
fn inverse_standings_order(
    txn: &Txn<'_>,
    dynasty_id: &DynastyId,
    prior_season: u16,
) -> Result<Vec<TeamId>> {
    let mut standings = txn.list_standings(dynasty_id, prior_season, SeasonType::Regular)?;
    standings.sort_by(|a, b| {
        let pct = |s: &crate::store::standings::Standing| {
            s.wins as f64 / (s.wins + s.losses + s.ties).max(1) as f64
        };
        pct(a).partial_cmp(&pct(b)).unwrap()
    });
    Ok(standings.into_iter().map(|s| s.team_id).collect())
}

/// Schedules the new league year's non-game calendar: franchise tag and RFA
/// tender deadlines, the free agency window, the draft class announcement,
/// draft day itself, and the midyear cap-compliance and roster-cut
/// deadlines. This is what gives the interactive-milestone router in
/// [`crate::milestones`] something to intercept.
fn schedule_offseason_calendar(txn: &Txn<'_>, new_season: u16) -> Result<()> {
    let year = new_season as i32;
    let events = [
        NewEvent {
            event_type: EventType::Deadline(DeadlineKind::FranchiseTag),
            timestamp: CalendarDate::new(year, 3, 4)?,
            synthetic_game_id: None,
            parameters: serde_json::json!({}),
        },
        NewEvent {
            event_type: EventType::Window(WindowKind::FreeAgencyStart),
            timestamp: CalendarDate::new(year, 3, 12)?,
            synthetic_game_id: None,
            parameters: serde_json::json!({}),
        },
        NewEvent {
            event_type: EventType::Deadline(DeadlineKind::RfaTender),
            timestamp: CalendarDate::new(year, 4, 18)?,
            synthetic_game_id: None,
            parameters: serde_json::json!({}),
        },
        NewEvent {
            event_type: EventType::Milestone(MilestoneKind::DraftClassPublished),
            timestamp: CalendarDate::new(year, 4, 20)?,
            synthetic_game_id: None,
            parameters: serde_json::json!({}),
        },
        NewEvent {
            event_type: EventType::DraftDay,
            timestamp: CalendarDate::new(year, 4, 24)?,
            synthetic_game_id: None,
            parameters: serde_json::json!({}),
        },
        NewEvent {
            event_type: EventType::Deadline(DeadlineKind::SalaryCapCompliance),
            timestamp: CalendarDate::new(year, 6, 1)?,
            synthetic_game_id: None,
            parameters: serde_json::json!({}),
        },
        NewEvent {
            event_type: EventType::Deadline(DeadlineKind::FinalRosterCuts),
            timestamp: CalendarDate::new(year, 8, 26)?,
            synthetic_game_id: None,
            parameters: serde_json::json!({}),
        },
    ];
    txn.bulk_insert_events(&events)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::DynastyId;
    use crate::store::contracts::NewContract;
    use crate::ids::{PlayerId, TeamId};
    use crate::store::schema::Store;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn year_transition_expires_contracts_and_generates_class() {
        let mut store = Store::open_in_memory().unwrap();
        let dynasty_id = DynastyId::new("d1");
        let txn = store.begin(dynasty_id.clone()).unwrap();
        txn.create_dynasty("D", "Owner", None, 0).unwrap();
        txn.create_contract(
            &dynasty_id,
            &NewContract {
                player_id: PlayerId::new(1),
                team_id: TeamId::new(1),
                start_year: 2024,
                contract_years: 1,
                total_value: 1_000_000,
            },
        )
        .unwrap();

        let mut synchronizer = SeasonYearSynchronizer::new(SeasonYear::new(2025));
        let mut rng = StdRng::seed_from_u64(4);
        let report =
            run_year_transition(&txn, &dynasty_id, &mut synchronizer, 50, &mut rng).unwrap();

        assert_eq!(report.new_season, 2026);
        assert_eq!(report.expired_contracts.len(), 1);
        assert_eq!(synchronizer.current_year(), SeasonYear::new(2026));

        let prospects = txn
            .undrafted_prospects(&dynasty_id, report.draft_class_id)
            .unwrap();
        assert_eq!(prospects.len(), 50);

        let standings = txn
            .list_standings(&dynasty_id, 2026, SeasonType::Regular)
            .unwrap();
        assert_eq!(standings.len(), 32);
    }
}
