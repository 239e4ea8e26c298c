//! Dynasty identity and per-season dynasty-state rows.

use rusqlite::{params, OptionalExtension};
use serde::{Deserialize, Serialize};

use crate::calendar::CalendarDate;
use crate::error::{DynastyError, Result};
use crate::ids::{DynastyId, TeamId};
use crate::phase::Phase;
use crate::store::txn::Txn;

/// Identity of an isolated simulation timeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dynasty {
    pub dynasty_id: DynastyId,
    pub display_name: String,
    pub owner_name: String,
    pub user_team_id: Option<TeamId>,
    pub is_active: bool,
    pub created_at: i64,
}

/// The persisted truth for "where is this dynasty now". One row per
/// (dynasty, season); mutated only by the synchronizer and the simulation
/// executor, both under transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DynastyState {
    pub dynasty_id: DynastyId,
    pub season: u16,
    pub current_date: CalendarDate,
    pub current_phase: Phase,
    pub current_week: Option<u16>,
    pub last_simulated_game_id: Option<i64>,
    pub current_draft_pick: u16,
    pub draft_in_progress: bool,
}

fn phase_to_str(phase: Phase) -> &'static str {
    match phase {
        Phase::Preseason => "PRESEASON",
        Phase::RegularSeason => "REGULAR_SEASON",
        Phase::Playoffs => "PLAYOFFS",
        Phase::Offseason => "OFFSEASON",
    }
}

fn phase_from_str(s: &str) -> Result<Phase> {
    match s {
        "PRESEASON" => Ok(Phase::Preseason),
        "REGULAR_SEASON" => Ok(Phase::RegularSeason),
        "PLAYOFFS" => Ok(Phase::Playoffs),
        "OFFSEASON" => Ok(Phase::Offseason),
        other => Err(DynastyError::invariant(format!(
            "unknown persisted phase value: {other}"
        ))),
    }
}

impl Txn<'_> {
    /// Create a new dynasty. `dynasty_id` must be globally unique.
    pub fn create_dynasty(
        &self,
        display_name: &str,
        owner_name: &str,
        user_team_id: Option<TeamId>,
        created_at: i64,
    ) -> Result<Dynasty> {
        let dynasty_id = self.dynasty_id().clone();
        self.inner.execute(
            "INSERT INTO dynasties (dynasty_id, display_name, owner_name, user_team_id, is_active, created_at)
             VALUES (?1, ?2, ?3, ?4, 1, ?5)",
            params![
                dynasty_id.as_str(),
                display_name,
                owner_name,
                user_team_id.map(|t| t.as_u8()),
                created_at
            ],
        )?;
        Ok(Dynasty {
            dynasty_id,
            display_name: display_name.to_string(),
            owner_name: owner_name.to_string(),
            user_team_id,
            is_active: true,
            created_at,
        })
    }

    pub fn get_dynasty(&self, dynasty_id: &DynastyId) -> Result<Option<Dynasty>> {
        self.inner
            .query_row(
                "SELECT dynasty_id, display_name, owner_name, user_team_id, is_active, created_at
                 FROM dynasties WHERE dynasty_id = ?1",
                [dynasty_id.as_str()],
                |row| {
                    let user_team_id: Option<u8> = row.get(3)?;
                    Ok(Dynasty {
                        dynasty_id: DynastyId::new(row.get::<_, String>(0)?),
                        display_name: row.get(1)?,
                        owner_name: row.get(2)?,
                        user_team_id: user_team_id.map(TeamId::new),
                        is_active: row.get::<_, i64>(4)? != 0,
                        created_at: row.get(5)?,
                    })
                },
            )
            .optional()
            .map_err(DynastyError::from)
    }

    /// Insert the initial dynasty-state row for a freshly created dynasty.
    pub fn init_dynasty_state(&self, state: &DynastyState) -> Result<()> {
        self.inner.execute(
            "INSERT INTO dynasty_state
                (dynasty_id, season, current_date, current_phase, current_week,
                 last_simulated_game_id, current_draft_pick, draft_in_progress)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                state.dynasty_id.as_str(),
                state.season,
                state.current_date.to_iso_string(),
                phase_to_str(state.current_phase),
                state.current_week,
                state.last_simulated_game_id,
                state.current_draft_pick,
                state.draft_in_progress as i64,
            ],
        )?;
        Ok(())
    }

    pub fn get_dynasty_state(
        &self,
        dynasty_id: &DynastyId,
        season: u16,
    ) -> Result<Option<DynastyState>> {
        self.inner
            .query_row(
                "SELECT dynasty_id, season, current_date, current_phase, current_week,
                        last_simulated_game_id, current_draft_pick, draft_in_progress
                 FROM dynasty_state WHERE dynasty_id = ?1 AND season = ?2",
                params![dynasty_id.as_str(), season],
                |row| row_to_state(row),
            )
            .optional()
            .map_err(DynastyError::from)
    }

    /// Row for the highest `season` value recorded for this dynasty — what
    /// the controller reads on startup/resume.
    pub fn get_latest_dynasty_state(&self, dynasty_id: &DynastyId) -> Result<Option<DynastyState>> {
        self.inner
            .query_row(
                "SELECT dynasty_id, season, current_date, current_phase, current_week,
                        last_simulated_game_id, current_draft_pick, draft_in_progress
                 FROM dynasty_state WHERE dynasty_id = ?1
                 ORDER BY season DESC LIMIT 1",
                [dynasty_id.as_str()],
                |row| row_to_state(row),
            )
            .optional()
            .map_err(DynastyError::from)
    }

    pub fn update_dynasty_state(&self, state: &DynastyState) -> Result<()> {
        let rows = self.inner.execute(
            "UPDATE dynasty_state SET
                current_date = ?1,
                current_phase = ?2,
                current_week = ?3,
                last_simulated_game_id = ?4,
                current_draft_pick = ?5,
                draft_in_progress = ?6
             WHERE dynasty_id = ?7 AND season = ?8",
            params![
                state.current_date.to_iso_string(),
                phase_to_str(state.current_phase),
                state.current_week,
                state.last_simulated_game_id,
                state.current_draft_pick,
                state.draft_in_progress as i64,
                state.dynasty_id.as_str(),
                state.season,
            ],
        )?;
        if rows == 0 {
            return Err(DynastyError::invariant(format!(
                "no dynasty_state row for {} season {}",
                state.dynasty_id, state.season
            )));
        }
        Ok(())
    }
}

fn row_to_state(row: &rusqlite::Row) -> rusqlite::Result<DynastyState> {
    let date_str: String = row.get(2)?;
    let phase_str: String = row.get(3)?;
    Ok(DynastyState {
        dynasty_id: DynastyId::new(row.get::<_, String>(0)?),
        season: row.get(1)?,
        current_date: CalendarDate::parse_iso(&date_str)
            .unwrap_or_else(|_| CalendarDate::new(2025, 1, 1).unwrap()),
        current_phase: phase_from_str(&phase_str).unwrap_or(Phase::Preseason),
        current_week: row.get(4)?,
        last_simulated_game_id: row.get(5)?,
        current_draft_pick: row.get(6)?,
        draft_in_progress: row.get::<_, i64>(7)? != 0,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::schema::Store;

    #[test]
    fn create_and_fetch_dynasty_round_trips() {
        let mut store = Store::open_in_memory().unwrap();
        let dynasty_id = DynastyId::new("d1");
        let txn = store.begin(dynasty_id.clone()).unwrap();

        let created = txn
            .create_dynasty("Lions Dynasty", "Alice", Some(TeamId::new(22)), 1000)
            .unwrap();
        assert_eq!(created.dynasty_id, dynasty_id);

        let fetched = txn.get_dynasty(&dynasty_id).unwrap().unwrap();
        assert_eq!(fetched.display_name, "Lions Dynasty");
        assert_eq!(fetched.user_team_id, Some(TeamId::new(22)));
        txn.commit().unwrap();
    }

    #[test]
    fn dynasty_state_round_trips_and_updates() {
        let mut store = Store::open_in_memory().unwrap();
        let dynasty_id = DynastyId::new("d1");
        let txn = store.begin(dynasty_id.clone()).unwrap();
        txn.create_dynasty("Lions Dynasty", "Alice", None, 1000)
            .unwrap();

        let state = DynastyState {
            dynasty_id: dynasty_id.clone(),
            season: 2025,
            current_date: CalendarDate::new(2025, 9, 4).unwrap(),
            current_phase: Phase::RegularSeason,
            current_week: Some(1),
            last_simulated_game_id: None,
            current_draft_pick: 0,
            draft_in_progress: false,
        };
        txn.init_dynasty_state(&state).unwrap();

        let mut fetched = txn.get_dynasty_state(&dynasty_id, 2025).unwrap().unwrap();
        assert_eq!(fetched, state);

        fetched.current_date = fetched.current_date.plus_days(1);
        fetched.current_week = Some(2);
        txn.update_dynasty_state(&fetched).unwrap();

        let refetched = txn.get_dynasty_state(&dynasty_id, 2025).unwrap().unwrap();
        assert_eq!(refetched.current_week, Some(2));
        txn.commit().unwrap();
    }

    #[test]
    fn update_missing_state_row_is_invariant_violation() {
        let mut store = Store::open_in_memory().unwrap();
        let dynasty_id = DynastyId::new("ghost");
        let txn = store.begin(dynasty_id.clone()).unwrap();
        let state = DynastyState {
            dynasty_id,
            season: 2099,
            current_date: CalendarDate::new(2099, 1, 1).unwrap(),
            current_phase: Phase::Offseason,
            current_week: None,
            last_simulated_game_id: None,
            current_draft_pick: 0,
            draft_in_progress: false,
        };
        assert!(txn.update_dynasty_state(&state).is_err());
    }
}
