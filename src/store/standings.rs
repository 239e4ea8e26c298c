//! Win/loss records, one row per (dynasty, season, season_type, team).

use rusqlite::params;
use serde::{Deserialize, Serialize};

use crate::error::{DynastyError, Result};
use crate::ids::{DynastyId, TeamId};
use crate::store::txn::Txn;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SeasonType {
    Regular,
    Playoffs,
}

impl SeasonType {
    fn as_str(self) -> &'static str {
        match self {
            SeasonType::Regular => "REGULAR",
            SeasonType::Playoffs => "PLAYOFFS",
        }
    }

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "REGULAR" => Ok(SeasonType::Regular),
            "PLAYOFFS" => Ok(SeasonType::Playoffs),
            other => Err(DynastyError::invariant(format!(
                "unknown persisted season_type value: {other}"
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Standing {
    pub team_id: TeamId,
    pub wins: u16,
    pub losses: u16,
    pub ties: u16,
    pub division_wins: u16,
    pub division_losses: u16,
    pub conference_wins: u16,
    pub conference_losses: u16,
    pub home_wins: u16,
    pub home_losses: u16,
    pub away_wins: u16,
    pub away_losses: u16,
    pub points_for: u32,
    pub points_against: u32,
    /// Positive for a win streak, negative for a losing streak, zero after a tie.
    pub streak: i16,
}

impl Standing {
    fn zeroed(team_id: TeamId) -> Self {
        Standing {
            team_id,
            wins: 0,
            losses: 0,
            ties: 0,
            division_wins: 0,
            division_losses: 0,
            conference_wins: 0,
            conference_losses: 0,
            home_wins: 0,
            home_losses: 0,
            away_wins: 0,
            away_losses: 0,
            points_for: 0,
            points_against: 0,
            streak: 0,
        }
    }
}

/// Outcome of one game from a single team's point of view, applied with
/// [`Txn::apply_game_result`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameOutcome {
    Win,
    Loss,
    Tie,
}

#[derive(Debug, Clone, Copy)]
pub struct StandingsUpdate {
    pub outcome: GameOutcome,
    pub is_division_game: bool,
    pub is_conference_game: bool,
    pub is_home_game: bool,
    pub points_for: u32,
    pub points_against: u32,
}

impl Txn<'_> {
    /// Zero out standings for every team at the start of a season
    /// (regular or playoffs) — ungenerated schedules never imply a
    /// team already has a record.
    pub fn init_standings(
        &self,
        dynasty_id: &DynastyId,
        season: u16,
        season_type: SeasonType,
    ) -> Result<()> {
        let mut stmt = self.inner.prepare(
            "INSERT INTO standings
                (dynasty_id, season, season_type, team_id, wins, losses, ties,
                 division_wins, division_losses, conference_wins, conference_losses,
                 home_wins, home_losses, away_wins, away_losses,
                 points_for, points_against, streak)
             VALUES (?1, ?2, ?3, ?4, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0)",
        )?;
        for team_id in TeamId::all_32() {
            stmt.execute(params![
                dynasty_id.as_str(),
                season,
                season_type.as_str(),
                team_id.as_u8(),
            ])?;
        }
        Ok(())
    }

    pub fn get_standing(
        &self,
        dynasty_id: &DynastyId,
        season: u16,
        season_type: SeasonType,
        team_id: TeamId,
    ) -> Result<Standing> {
        self.inner
            .query_row(
                "SELECT team_id, wins, losses, ties, division_wins, division_losses,
                        conference_wins, conference_losses, home_wins, home_losses,
                        away_wins, away_losses, points_for, points_against, streak
                 FROM standings
                 WHERE dynasty_id = ?1 AND season = ?2 AND season_type = ?3 AND team_id = ?4",
                params![
                    dynasty_id.as_str(),
                    season,
                    season_type.as_str(),
                    team_id.as_u8()
                ],
                row_to_standing,
            )
            .map_err(DynastyError::from)
    }

    pub fn list_standings(
        &self,
        dynasty_id: &DynastyId,
        season: u16,
        season_type: SeasonType,
    ) -> Result<Vec<Standing>> {
        let mut stmt = self.inner.prepare(
            "SELECT team_id, wins, losses, ties, division_wins, division_losses,
                    conference_wins, conference_losses, home_wins, home_losses,
                    away_wins, away_losses, points_for, points_against, streak
             FROM standings
             WHERE dynasty_id = ?1 AND season = ?2 AND season_type = ?3
             ORDER BY team_id ASC",
        )?;
        let rows = stmt.query_map(
            params![dynasty_id.as_str(), season, season_type.as_str()],
            row_to_standing,
        )?;
        let mut out = Vec::new();
        for r in rows {
            out.push(r?);
        }
        Ok(out)
    }

    /// Apply one game's outcome to a team's standing row.
    pub fn apply_game_result(
        &self,
        dynasty_id: &DynastyId,
        season: u16,
        season_type: SeasonType,
        team_id: TeamId,
        update: StandingsUpdate,
    ) -> Result<()> {
        let mut standing = self.get_standing(dynasty_id, season, season_type, team_id)?;

        match update.outcome {
            GameOutcome::Win => {
                standing.wins += 1;
                standing.streak = if standing.streak > 0 {
                    standing.streak + 1
                } else {
                    1
                };
            }
            GameOutcome::Loss => {
                standing.losses += 1;
                standing.streak = if standing.streak < 0 {
                    standing.streak - 1
                } else {
                    -1
                };
            }
            GameOutcome::Tie => {
                standing.ties += 1;
                standing.streak = 0;
            }
        }

        if update.is_division_game {
            match update.outcome {
                GameOutcome::Win => standing.division_wins += 1,
                GameOutcome::Loss => standing.division_losses += 1,
                GameOutcome::Tie => {}
            }
        }
        if update.is_conference_game {
            match update.outcome {
                GameOutcome::Win => standing.conference_wins += 1,
                GameOutcome::Loss => standing.conference_losses += 1,
                GameOutcome::Tie => {}
            }
        }
        if update.is_home_game {
            match update.outcome {
                GameOutcome::Win => standing.home_wins += 1,
                GameOutcome::Loss => standing.home_losses += 1,
                GameOutcome::Tie => {}
            }
        } else {
            match update.outcome {
                GameOutcome::Win => standing.away_wins += 1,
                GameOutcome::Loss => standing.away_losses += 1,
                GameOutcome::Tie => {}
            }
        }
        standing.points_for += update.points_for;
        standing.points_against += update.points_against;

        let rows = self.inner.execute(
            "UPDATE standings SET
                wins = ?1, losses = ?2, ties = ?3,
                division_wins = ?4, division_losses = ?5,
                conference_wins = ?6, conference_losses = ?7,
                home_wins = ?8, home_losses = ?9,
                away_wins = ?10, away_losses = ?11,
                points_for = ?12, points_against = ?13, streak = ?14
             WHERE dynasty_id = ?15 AND season = ?16 AND season_type = ?17 AND team_id = ?18",
            params![
                standing.wins,
                standing.losses,
                standing.ties,
                standing.division_wins,
                standing.division_losses,
                standing.conference_wins,
                standing.conference_losses,
                standing.home_wins,
                standing.home_losses,
                standing.away_wins,
                standing.away_losses,
                standing.points_for,
                standing.points_against,
                standing.streak,
                dynasty_id.as_str(),
                season,
                season_type.as_str(),
                team_id.as_u8(),
            ],
        )?;
        if rows == 0 {
            return Err(DynastyError::invariant(format!(
                "no standings row for team {team_id} in {season} {:?}; call init_standings first",
                season_type
            )));
        }
        Ok(())
    }
}

fn row_to_standing(row: &rusqlite::Row) -> rusqlite::Result<Standing> {
    Ok(Standing {
        team_id: TeamId::new(row.get(0)?),
        wins: row.get(1)?,
        losses: row.get(2)?,
        ties: row.get(3)?,
        division_wins: row.get(4)?,
        division_losses: row.get(5)?,
        conference_wins: row.get(6)?,
        conference_losses: row.get(7)?,
        home_wins: row.get(8)?,
        home_losses: row.get(9)?,
        away_wins: row.get(10)?,
        away_losses: row.get(11)?,
        points_for: row.get(12)?,
        points_against: row.get(13)?,
        streak: row.get(14)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::schema::Store;

    fn txn_with_dynasty(store: &mut Store, id: &str) -> Txn<'_> {
        let dynasty_id = DynastyId::new(id);
        let txn = store.begin(dynasty_id.clone()).unwrap();
        txn.create_dynasty("D", "Owner", None, 0).unwrap();
        txn
    }

    #[test]
    fn init_standings_creates_all_32_teams_at_zero() {
        let mut store = Store::open_in_memory().unwrap();
        let txn = txn_with_dynasty(&mut store, "d1");
        txn.init_standings(txn.dynasty_id(), 2025, SeasonType::Regular)
            .unwrap();

        let all = txn
            .list_standings(txn.dynasty_id(), 2025, SeasonType::Regular)
            .unwrap();
        assert_eq!(all.len(), 32);
        assert!(all.iter().all(|s| s.wins == 0 && s.losses == 0));
    }

    #[test]
    fn apply_game_result_updates_record_and_streak() {
        let mut store = Store::open_in_memory().unwrap();
        let txn = txn_with_dynasty(&mut store, "d1");
        txn.init_standings(txn.dynasty_id(), 2025, SeasonType::Regular)
            .unwrap();

        let team = TeamId::new(1);
        txn.apply_game_result(
            txn.dynasty_id(),
            2025,
            SeasonType::Regular,
            team,
            StandingsUpdate {
                outcome: GameOutcome::Win,
                is_division_game: true,
                is_conference_game: true,
                is_home_game: true,
                points_for: 27,
                points_against: 13,
            },
        )
        .unwrap();
        txn.apply_game_result(
            txn.dynasty_id(),
            2025,
            SeasonType::Regular,
            team,
            StandingsUpdate {
                outcome: GameOutcome::Win,
                is_division_game: false,
                is_conference_game: false,
                is_home_game: false,
                points_for: 17,
                points_against: 10,
            },
        )
        .unwrap();

        let standing = txn
            .get_standing(txn.dynasty_id(), 2025, SeasonType::Regular, team)
            .unwrap();
        assert_eq!(standing.wins, 2);
        assert_eq!(standing.division_wins, 1);
        assert_eq!(standing.home_wins, 1);
        assert_eq!(standing.away_wins, 1);
        assert_eq!(standing.streak, 2);
        assert_eq!(standing.points_for, 44);
    }

    #[test]
    fn loss_after_win_resets_streak_to_negative_one() {
        let mut store = Store::open_in_memory().unwrap();
        let txn = txn_with_dynasty(&mut store, "d1");
        txn.init_standings(txn.dynasty_id(), 2025, SeasonType::Regular)
            .unwrap();
        let team = TeamId::new(1);
        let base = StandingsUpdate {
            outcome: GameOutcome::Win,
            is_division_game: false,
            is_conference_game: false,
            is_home_game: true,
            points_for: 20,
            points_against: 10,
        };
        txn.apply_game_result(txn.dynasty_id(), 2025, SeasonType::Regular, team, base)
            .unwrap();
        txn.apply_game_result(
            txn.dynasty_id(),
            2025,
            SeasonType::Regular,
            team,
            StandingsUpdate {
                outcome: GameOutcome::Loss,
                ..base
            },
        )
        .unwrap();

        let standing = txn
            .get_standing(txn.dynasty_id(), 2025, SeasonType::Regular, team)
            .unwrap();
        assert_eq!(standing.streak, -1);
    }

    #[test]
    fn apply_without_init_is_invariant_violation() {
        let mut store = Store::open_in_memory().unwrap();
        let txn = txn_with_dynasty(&mut store, "d1");
        let result = txn.apply_game_result(
            txn.dynasty_id(),
            2025,
            SeasonType::Regular,
            TeamId::new(1),
            StandingsUpdate {
                outcome: GameOutcome::Win,
                is_division_game: false,
                is_conference_game: false,
                is_home_game: true,
                points_for: 10,
                points_against: 3,
            },
        );
        assert!(result.is_err());
    }
}
