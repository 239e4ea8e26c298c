//! The top-level entry point a host (CLI or otherwise) drives a dynasty
//! through. Owns the one [`Store`] connection and the season-year
//! synchronizer; composes the calendar, executor, and transition handlers
//! behind a small imperative API — composition flows one way, parent to
//! child, with no cyclic controller references.

use chrono::Weekday;
use log::info;
use rand::rngs::ThreadRng;
use serde_json::Value;

use crate::calendar::CalendarDate;
use crate::error::{DynastyError, Result};
use crate::ids::{DynastyId, EventId, SeasonYear, TeamId};
use crate::milestones::{self, ResolveOutcome};
use crate::phase::{self, Phase, PhaseBoundaries};
use crate::simulation::executor::{self, DayTickOutcome};
use crate::simulation::game_result::{GameResultProvider, StubGameResultProvider};
use crate::simulation::schedule;
use crate::store::dynasties::{Dynasty, DynastyState};
use crate::store::events::{EventType, GameKind};
use crate::store::schema::Store;
use crate::synchronizer::SeasonYearSynchronizer;
use crate::transitions;

/// Prospects generated for a single draft class. A full 32-team, 7-round
/// league typically drafts well under this many players; the remainder
/// stay in the undrafted pool as UDFA signings, which this crate does not
/// model.
pub const DEFAULT_DRAFT_CLASS_SIZE: u16 = 300;

/// Weeks of regular-season games to generate per schedule. The real NFL
/// runs 18 weeks with bye weeks baked in; [`schedule::generate_regular_season_schedule`]
/// pairs all 32 teams every week with no byes, so this is sized to land
/// the season's last game near the same point on the calendar.
const REGULAR_SEASON_WEEKS: u8 = 17;

pub struct SeasonCycleController {
    store: Store,
    dynasty_id: DynastyId,
    user_team_id: Option<TeamId>,
    provider: Box<dyn GameResultProvider>,
    synchronizer: SeasonYearSynchronizer,
}

impl SeasonCycleController {
    /// Load an existing dynasty's latest state and resume from there.
    pub fn load(mut store: Store, dynasty_id: DynastyId) -> Result<Self> {
        let (season, user_team_id) = {
            let txn = store.begin(dynasty_id.clone())?;
            let dynasty = txn.get_dynasty(&dynasty_id)?.ok_or_else(|| {
                DynastyError::DynastyNotFound {
                    dynasty_id: dynasty_id.to_string(),
                }
            })?;
            let state = txn.get_latest_dynasty_state(&dynasty_id)?.ok_or_else(|| {
                DynastyError::invariant(format!("dynasty {dynasty_id} has no state row"))
            })?;
            txn.commit()?;
            (state.season, dynasty.user_team_id)
        };

        Ok(Self {
            store,
            dynasty_id,
            user_team_id,
            provider: Box::new(StubGameResultProvider),
            synchronizer: SeasonYearSynchronizer::new(SeasonYear::new(season)),
        })
    }

    /// Create a brand-new dynasty, starting on August 1 of `season`.
    pub fn create(
        mut store: Store,
        dynasty_id: DynastyId,
        display_name: &str,
        owner_name: &str,
        user_team_id: Option<TeamId>,
        season: u16,
        created_at: i64,
    ) -> Result<(Self, Dynasty)> {
        let dynasty = {
            let txn = store.begin(dynasty_id.clone())?;
            let dynasty = txn.create_dynasty(display_name, owner_name, user_team_id, created_at)?;
            let start_date = CalendarDate::new(season as i32, 8, 1)?;
            txn.init_dynasty_state(&DynastyState {
                dynasty_id: dynasty_id.clone(),
                season,
                current_date: start_date,
                current_phase: Phase::Preseason,
                current_week: None,
                last_simulated_game_id: None,
                current_draft_pick: 0,
                draft_in_progress: false,
            })?;
            txn.init_standings(&dynasty_id, season, crate::store::standings::SeasonType::Regular)?;

            let week1_thursday = CalendarDate::new(season as i32, 9, 1)?.next_weekday(Weekday::Thu);
            let mut rng: ThreadRng = rand::thread_rng();
            schedule::generate_regular_season_schedule(
                &txn,
                &dynasty_id,
                season,
                week1_thursday,
                REGULAR_SEASON_WEEKS,
                &mut rng,
            )?;

            txn.commit()?;
            dynasty
        };

        let controller = Self {
            store,
            dynasty_id,
            user_team_id,
            provider: Box::new(StubGameResultProvider),
            synchronizer: SeasonYearSynchronizer::new(SeasonYear::new(season)),
        };
        Ok((controller, dynasty))
    }

    pub fn dynasty_id(&self) -> &DynastyId {
        &self.dynasty_id
    }

    pub fn current_state(&mut self) -> Result<DynastyState> {
        let txn = self.store.begin(self.dynasty_id.clone())?;
        let state = txn.get_latest_dynasty_state(&self.dynasty_id)?.ok_or_else(|| {
            DynastyError::invariant(format!("dynasty {} has no state row", self.dynasty_id))
        })?;
        txn.commit()?;
        Ok(state)
    }

    fn compute_boundaries(&mut self, season: u16) -> Result<PhaseBoundaries> {
        let txn = self.store.begin(self.dynasty_id.clone())?;
        let week1_thursday = CalendarDate::new(season as i32, 9, 1)?.next_weekday(Weekday::Thu);
        let last_regular_season_game = txn.max_regular_season_game_date(&self.dynasty_id)?;
        let super_bowl =
            txn.min_date_for_event_type(&self.dynasty_id, &EventType::Game(GameKind::SuperBowl))?;
        txn.commit()?;
        Ok(PhaseBoundaries {
            week1_thursday,
            last_regular_season_game,
            super_bowl,
        })
    }

    /// Advance exactly one day, running any phase-transition handler that
    /// fires and persisting the new state. Returns before the state is
    /// advanced if an interactive milestone needs a decision first.
    pub fn advance_day(&mut self) -> Result<DayTickOutcome> {
        let mut state = self.current_state()?;
        let boundaries = self.compute_boundaries(state.season)?;

        let txn = self.store.begin(self.dynasty_id.clone())?;
        let outcome = executor::advance_one_day(
            &txn,
            &self.dynasty_id,
            &mut state,
            &boundaries,
            self.provider.as_ref(),
            self.user_team_id,
        )?;

        if outcome.needs_interaction.is_none() {
            txn.update_dynasty_state(&state)?;
        }
        txn.commit()?;

        if let Some((from, to)) = outcome.phase_transition {
            self.run_transition_handler(from, to, state.season, outcome.date)?;
        }

        if state.current_phase == Phase::Playoffs && !outcome.simulated_games.is_empty() {
            let txn = self.store.begin(self.dynasty_id.clone())?;
            transitions::advance_playoffs(&txn, &self.dynasty_id, state.season)?;
            txn.commit()?;
        }

        Ok(outcome)
    }

    fn run_transition_handler(
        &mut self,
        from: Phase,
        to: Phase,
        season: u16,
        date: CalendarDate,
    ) -> Result<()> {
        info!(
            "dynasty {} running transition handler {from} -> {to}",
            self.dynasty_id
        );
        match (from, to) {
            (Phase::RegularSeason, Phase::Playoffs) => {
                let txn = self.store.begin(self.dynasty_id.clone())?;
                let (afc_teams, nfc_teams) = transitions::conference_division_pairs();
                let (afc_seeds, nfc_seeds) = transitions::seed_both_conferences(
                    &txn,
                    &self.dynasty_id,
                    season,
                    &afc_teams,
                    &nfc_teams,
                )?;
                let wild_card_saturday = date.next_weekday(Weekday::Sat);
                transitions::schedule_wild_card_round(
                    &txn,
                    &self.dynasty_id,
                    season,
                    &afc_seeds,
                    wild_card_saturday,
                )?;
                transitions::schedule_wild_card_round(
                    &txn,
                    &self.dynasty_id,
                    season,
                    &nfc_seeds,
                    wild_card_saturday,
                )?;
                txn.commit()?;
            }
            (Phase::Playoffs, Phase::Offseason) => {
                let txn = self.store.begin(self.dynasty_id.clone())?;
                transitions::crown_champion(&txn, &self.dynasty_id, season)?;
                txn.commit()?;
            }
            _ => {}
        }
        Ok(())
    }

    /// Advance up to 7 days, stopping early if a milestone needs attention.
    pub fn advance_week(&mut self) -> Result<Vec<DayTickOutcome>> {
        let mut outcomes = Vec::new();
        for _ in 0..7 {
            let outcome = self.advance_day()?;
            let paused = outcome.needs_interaction.is_some();
            outcomes.push(outcome);
            if paused {
                break;
            }
        }
        Ok(outcomes)
    }

    /// Advance a day at a time until the phase changes or a milestone
    /// interrupts. Caps at 400 iterations as a guard against an
    /// unreachable boundary rather than looping forever.
    pub fn advance_to_phase_end(&mut self) -> Result<Vec<DayTickOutcome>> {
        let starting_phase = self.current_state()?.current_phase;
        let mut outcomes = Vec::new();
        for _ in 0..400 {
            let outcome = self.advance_day()?;
            let paused = outcome.needs_interaction.is_some();
            let changed = outcome.phase_transition.is_some();
            outcomes.push(outcome);
            if paused || changed {
                break;
            }
        }
        if outcomes.last().map(|o| o.phase_transition.is_none()).unwrap_or(true)
            && self.current_state()?.current_phase == starting_phase
        {
            return Err(DynastyError::invariant(
                "advance_to_phase_end did not reach a phase boundary within 400 days",
            ));
        }
        Ok(outcomes)
    }

    /// Apply a decision to a paused interactive event, then let the caller
    /// call [`Self::advance_day`] again to retry closing that day.
    pub fn resolve_milestone(&mut self, event_id: EventId, mutations: Value) -> Result<ResolveOutcome> {
        let txn = self.store.begin(self.dynasty_id.clone())?;
        let outcome = milestones::resolve(&txn, &self.dynasty_id, event_id, mutations)?;
        txn.commit()?;
        Ok(outcome)
    }

    /// Force the full offseason year transition and enter the new league
    /// year's preseason, regardless of the calendar's current date. Used by
    /// the CLI's explicit "skip to new season" command.
    pub fn skip_to_new_season(&mut self) -> Result<transitions::YearTransitionReport> {
        let state = self.current_state()?;
        let mut rng: ThreadRng = rand::thread_rng();
        let txn = self.store.begin(self.dynasty_id.clone())?;
        let report = transitions::run_year_transition(
            &txn,
            &self.dynasty_id,
            &mut self.synchronizer,
            DEFAULT_DRAFT_CLASS_SIZE,
            &mut rng,
        )?;

        let next_start = CalendarDate::new(report.new_season as i32, 8, 1)?;
        let next_state = DynastyState {
            dynasty_id: self.dynasty_id.clone(),
            season: report.new_season,
            current_date: next_start,
            current_phase: phase::classify(
                next_start,
                &PhaseBoundaries {
                    week1_thursday: CalendarDate::new(report.new_season as i32, 9, 1)?
                        .next_weekday(Weekday::Thu),
                    last_regular_season_game: None,
                    super_bowl: None,
                },
            ),
            current_week: None,
            last_simulated_game_id: None,
            current_draft_pick: 0,
            draft_in_progress: false,
        };
        if txn.get_dynasty_state(&self.dynasty_id, report.new_season)?.is_none() {
            txn.init_dynasty_state(&next_state)?;
        } else {
            txn.update_dynasty_state(&next_state)?;
        }

        let week1_thursday =
            CalendarDate::new(report.new_season as i32, 9, 1)?.next_weekday(Weekday::Thu);
        schedule::generate_regular_season_schedule(
            &txn,
            &self.dynasty_id,
            report.new_season,
            week1_thursday,
            REGULAR_SEASON_WEEKS,
            &mut rng,
        )?;

        txn.commit()?;

        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_initializes_preseason_state() {
        let store = Store::open_in_memory().unwrap();
        let (mut controller, dynasty) = SeasonCycleController::create(
            store,
            DynastyId::new("d1"),
            "Test Dynasty",
            "Alice",
            Some(TeamId::new(5)),
            2025,
            0,
        )
        .unwrap();
        assert_eq!(dynasty.user_team_id, Some(TeamId::new(5)));

        let state = controller.current_state().unwrap();
        assert_eq!(state.season, 2025);
        assert_eq!(state.current_phase, Phase::Preseason);
        assert_eq!(state.current_date, CalendarDate::new(2025, 8, 1).unwrap());
    }

    #[test]
    fn advance_day_moves_calendar_forward_by_one() {
        let store = Store::open_in_memory().unwrap();
        let (mut controller, _) = SeasonCycleController::create(
            store,
            DynastyId::new("d1"),
            "Test Dynasty",
            "Alice",
            None,
            2025,
            0,
        )
        .unwrap();

        controller.advance_day().unwrap();
        let state = controller.current_state().unwrap();
        assert_eq!(state.current_date, CalendarDate::new(2025, 8, 2).unwrap());
    }
}
