//! Per-day dispatch: advances the calendar by one day, executes every due
//! event, and reports whether the host must pause for an interactive
//! milestone before the day can be considered closed.

use log::info;
use serde_json::json;

use crate::calendar::CalendarDate;
use crate::error::Result;
use crate::ids::{DynastyId, TeamId};
use crate::milestones;
use crate::phase::{self, Phase, PhaseBoundaries};
use crate::simulation::game_result::{GameResult, GameResultProvider};
use crate::store::dynasties::DynastyState;
use crate::store::events::{Event, EventType};
use crate::store::standings::{GameOutcome, SeasonType, StandingsUpdate};
use crate::store::txn::Txn;

/// What happened during one [`advance_one_day`] call.
#[derive(Debug, Clone)]
pub struct DayTickOutcome {
    pub date: CalendarDate,
    pub simulated_games: Vec<GameResult>,
    pub phase_transition: Option<(Phase, Phase)>,
    /// Set when an event concerning the user's team needs a decision before
    /// the day can close; the caller must resolve it and re-call
    /// [`advance_one_day`] with the same `state` to retry (idempotent
    /// re-entry).
    pub needs_interaction: Option<Event>,
}

fn season_type_for_phase(phase: Phase) -> SeasonType {
    match phase {
        Phase::Playoffs => SeasonType::Playoffs,
        _ => SeasonType::Regular,
    }
}

/// Advance `state.current_date` by one day and execute everything due.
///
/// The caller owns persisting `state` back to the store — this function
/// only mutates the in-memory copy passed to it, so a crash between
/// `advance_one_day` returning and the caller's `update_dynasty_state` call
/// leaves the persisted state at the previous day, which is safe to retry
/// (Testable Property 2: monotonic calendar, never double-applied).
pub fn advance_one_day(
    txn: &Txn<'_>,
    dynasty_id: &DynastyId,
    state: &mut DynastyState,
    boundaries: &PhaseBoundaries,
    provider: &dyn GameResultProvider,
    user_team_id: Option<TeamId>,
) -> Result<DayTickOutcome> {
    let next_date = state.current_date.plus_days(1);
    let events = txn.events_for_date(dynasty_id, next_date)?;

    let mut simulated_games = Vec::new();

    for event in &events {
        if event.is_executed() {
            continue;
        }
        if let EventType::Game(_) = &event.event_type {
            let result = simulate_and_record_game(txn, dynasty_id, state, event, provider)?;
            simulated_games.push(result);
        }
    }

    if let Some(user_team_id) = user_team_id {
        if let Some(event) = milestones::pending_milestone(&events, user_team_id) {
            info!(
                "day {next_date} paused for interactive event {}",
                event.event_id
            );
            return Ok(DayTickOutcome {
                date: next_date,
                simulated_games,
                phase_transition: None,
                needs_interaction: Some(event.clone()),
            });
        }
    }

    let before_phase = state.current_phase;
    let after_phase = phase::classify(next_date, boundaries);
    state.current_date = next_date;
    state.current_phase = after_phase;

    let transition = phase::detect_transition(before_phase, after_phase);
    if let Some((from, to)) = transition {
        info!("dynasty {dynasty_id} phase transition: {from} -> {to} on {next_date}");
    }

    Ok(DayTickOutcome {
        date: next_date,
        simulated_games,
        phase_transition: transition,
        needs_interaction: None,
    })
}

fn simulate_and_record_game(
    txn: &Txn<'_>,
    dynasty_id: &DynastyId,
    state: &DynastyState,
    event: &Event,
    provider: &dyn GameResultProvider,
) -> Result<GameResult> {
    let home_team = TeamId::new(event.parameters["home_team"].as_u64().unwrap_or(1) as u8);
    let away_team = TeamId::new(event.parameters["away_team"].as_u64().unwrap_or(2) as u8);
    let is_division_game = event
        .parameters
        .get("is_division_game")
        .and_then(|v| v.as_bool())
        .unwrap_or(false);
    let is_conference_game = event
        .parameters
        .get("is_conference_game")
        .and_then(|v| v.as_bool())
        .unwrap_or(false);

    let result = provider.simulate(home_team, away_team, event.event_id.as_i64());

    txn.mark_event_executed(
        dynasty_id,
        event.event_id,
        &json!({
            "home_score": result.home_score,
            "away_score": result.away_score,
        }),
    )?;

    let season_type = season_type_for_phase(state.current_phase);

    apply_result_to_standings(
        txn,
        dynasty_id,
        state.season,
        season_type,
        home_team,
        away_team,
        &result,
        is_division_game,
        is_conference_game,
    )?;

    Ok(result)
}

#[allow(clippy::too_many_arguments)]
fn apply_result_to_standings(
    txn: &Txn<'_>,
    dynasty_id: &DynastyId,
    season: u16,
    season_type: SeasonType,
    home_team: TeamId,
    away_team: TeamId,
    result: &GameResult,
    is_division_game: bool,
    is_conference_game: bool,
) -> Result<()> {
    let (home_outcome, away_outcome) = if result.is_tie() {
        (GameOutcome::Tie, GameOutcome::Tie)
    } else if result.winner() == Some(home_team) {
        (GameOutcome::Win, GameOutcome::Loss)
    } else {
        (GameOutcome::Loss, GameOutcome::Win)
    };

    txn.apply_game_result(
        dynasty_id,
        season,
        season_type,
        home_team,
        StandingsUpdate {
            outcome: home_outcome,
            is_division_game,
            is_conference_game,
            is_home_game: true,
            points_for: result.home_score,
            points_against: result.away_score,
        },
    )?;
    txn.apply_game_result(
        dynasty_id,
        season,
        season_type,
        away_team,
        StandingsUpdate {
            outcome: away_outcome,
            is_division_game,
            is_conference_game,
            is_home_game: false,
            points_for: result.away_score,
            points_against: result.home_score,
        },
    )?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::DynastyId;
    use crate::simulation::game_result::StubGameResultProvider;
    use crate::store::events::{GameKind, NewEvent};
    use crate::store::schema::Store;

    fn setup(store: &mut Store, dynasty_id: &DynastyId) -> DynastyState {
        let txn = store.begin(dynasty_id.clone()).unwrap();
        txn.create_dynasty("D", "Owner", None, 0).unwrap();
        txn.init_standings(dynasty_id, 2025, SeasonType::Regular)
            .unwrap();
        let state = DynastyState {
            dynasty_id: dynasty_id.clone(),
            season: 2025,
            current_date: CalendarDate::new(2025, 9, 3).unwrap(),
            current_phase: Phase::Preseason,
            current_week: Some(1),
            last_simulated_game_id: None,
            current_draft_pick: 0,
            draft_in_progress: false,
        };
        txn.init_dynasty_state(&state).unwrap();
        txn.commit().unwrap();
        state
    }

    fn boundaries() -> PhaseBoundaries {
        PhaseBoundaries {
            week1_thursday: CalendarDate::new(2025, 9, 4).unwrap(),
            last_regular_season_game: Some(CalendarDate::new(2026, 1, 3).unwrap()),
            super_bowl: Some(CalendarDate::new(2026, 2, 8).unwrap()),
        }
    }

    #[test]
    fn advancing_into_game_day_simulates_and_updates_standings() {
        let mut store = Store::open_in_memory().unwrap();
        let dynasty_id = DynastyId::new("d1");
        let mut state = setup(&mut store, &dynasty_id);

        let txn = store.begin(dynasty_id.clone()).unwrap();
        txn.insert_event(&NewEvent {
            event_type: EventType::Game(GameKind::Regular),
            timestamp: CalendarDate::new(2025, 9, 4).unwrap(),
            synthetic_game_id: Some("2025_reg_w1_g0".into()),
            parameters: json!({
                "home_team": 1, "away_team": 2,
                "is_division_game": true, "is_conference_game": true,
            }),
        })
        .unwrap();

        let outcome = advance_one_day(
            &txn,
            &dynasty_id,
            &mut state,
            &boundaries(),
            &StubGameResultProvider,
            None,
        )
        .unwrap();
        txn.commit().unwrap();

        assert_eq!(outcome.simulated_games.len(), 1);
        assert_eq!(state.current_date, CalendarDate::new(2025, 9, 4).unwrap());
        assert_eq!(state.current_phase, Phase::RegularSeason);

        let txn = store.begin(dynasty_id.clone()).unwrap();
        let winner = outcome.simulated_games[0].winner();
        if let Some(winner) = winner {
            let standing = txn
                .get_standing(&dynasty_id, 2025, SeasonType::Regular, winner)
                .unwrap();
            assert_eq!(standing.wins, 1);
        }
    }

    #[test]
    fn interactive_event_for_user_team_pauses_the_day() {
        let mut store = Store::open_in_memory().unwrap();
        let dynasty_id = DynastyId::new("d1");
        let mut state = setup(&mut store, &dynasty_id);
        state.current_date = CalendarDate::new(2026, 4, 23).unwrap();

        let txn = store.begin(dynasty_id.clone()).unwrap();
        txn.insert_event(&NewEvent {
            event_type: EventType::DraftDay,
            timestamp: CalendarDate::new(2026, 4, 24).unwrap(),
            synthetic_game_id: None,
            parameters: json!({ "team_id": 7 }),
        })
        .unwrap();

        let outcome = advance_one_day(
            &txn,
            &dynasty_id,
            &mut state,
            &boundaries(),
            &StubGameResultProvider,
            Some(TeamId::new(7)),
        )
        .unwrap();

        assert!(outcome.needs_interaction.is_some());
        // current_date must not have advanced past the paused day.
        assert_eq!(state.current_date, CalendarDate::new(2026, 4, 23).unwrap());
    }

    #[test]
    fn interactive_event_for_another_team_does_not_pause() {
        let mut store = Store::open_in_memory().unwrap();
        let dynasty_id = DynastyId::new("d1");
        let mut state = setup(&mut store, &dynasty_id);
        state.current_date = CalendarDate::new(2026, 4, 23).unwrap();

        let txn = store.begin(dynasty_id.clone()).unwrap();
        txn.insert_event(&NewEvent {
            event_type: EventType::DraftDay,
            timestamp: CalendarDate::new(2026, 4, 24).unwrap(),
            synthetic_game_id: None,
            parameters: json!({ "team_id": 7 }),
        })
        .unwrap();

        let outcome = advance_one_day(
            &txn,
            &dynasty_id,
            &mut state,
            &boundaries(),
            &StubGameResultProvider,
            Some(TeamId::new(11)),
        )
        .unwrap();

        assert!(outcome.needs_interaction.is_none());
        assert_eq!(state.current_date, CalendarDate::new(2026, 4, 24).unwrap());
    }
}
