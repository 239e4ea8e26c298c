//! Conference seeding: orders playoff-bound teams by a tie-break cascade —
//! head-to-head, division record, conference record, strength of victory,
//! point differential, then a final deterministic tie-break so seeding
//! never depends on iteration order.

use crate::ids::{DynastyId, TeamId};
use crate::store::events::{Event, EventType, GameKind};
use crate::store::standings::{SeasonType, Standing};
use crate::store::txn::Txn;
use crate::error::Result;

#[derive(Debug, Clone, Copy)]
pub struct TeamRecord {
    pub team_id: TeamId,
    pub division_id: u8,
    pub standing: Standing,
}

impl TeamRecord {
    fn games_played(&self) -> u32 {
        (self.standing.wins + self.standing.losses + self.standing.ties) as u32
    }

    fn win_pct(&self) -> f64 {
        let played = self.games_played();
        if played == 0 {
            return 0.0;
        }
        (self.standing.wins as f64 + 0.5 * self.standing.ties as f64) / played as f64
    }

    fn division_win_pct(&self) -> f64 {
        let played = self.standing.division_wins + self.standing.division_losses;
        if played == 0 {
            return 0.0;
        }
        self.standing.division_wins as f64 / played as f64
    }

    fn conference_win_pct(&self) -> f64 {
        let played = self.standing.conference_wins + self.standing.conference_losses;
        if played == 0 {
            return 0.0;
        }
        self.standing.conference_wins as f64 / played as f64
    }

    fn point_differential(&self) -> i64 {
        self.standing.points_for as i64 - self.standing.points_against as i64
    }
}

/// Finished regular-season games directly between `a` and `b`, from `a`'s
/// point of view.
fn head_to_head_win_pct(
    txn: &Txn<'_>,
    dynasty_id: &DynastyId,
    season: u16,
    a: TeamId,
    b: TeamId,
) -> Result<Option<f64>> {
    let games = matchups_between(txn, dynasty_id, season, a, b)?;
    if games.is_empty() {
        return Ok(None);
    }
    let mut wins = 0.0;
    let mut total = 0.0;
    for event in &games {
        let results = match &event.results {
            Some(r) => r,
            None => continue,
        };
        let home_team = event.parameters["home_team"].as_u64().unwrap_or(0) as u8;
        let home_score = results["home_score"].as_u64().unwrap_or(0);
        let away_score = results["away_score"].as_u64().unwrap_or(0);
        total += 1.0;
        let a_is_home = home_team == a.as_u8();
        let a_score = if a_is_home { home_score } else { away_score };
        let b_score = if a_is_home { away_score } else { home_score };
        match a_score.cmp(&b_score) {
            std::cmp::Ordering::Greater => wins += 1.0,
            std::cmp::Ordering::Equal => wins += 0.5,
            std::cmp::Ordering::Less => {}
        }
    }
    if total == 0.0 {
        Ok(None)
    } else {
        Ok(Some(wins / total))
    }
}

fn matchups_between(
    txn: &Txn<'_>,
    dynasty_id: &DynastyId,
    season: u16,
    a: TeamId,
    b: TeamId,
) -> Result<Vec<Event>> {
    let prefix = format!("{season}_reg_");
    let events = txn.events_by_game_id_prefix(dynasty_id, &prefix)?;
    Ok(events
        .into_iter()
        .filter(|e| matches!(e.event_type, EventType::Game(GameKind::Regular)))
        .filter(|e| {
            let home = e.parameters["home_team"].as_u64().unwrap_or(0) as u8;
            let away = e.parameters["away_team"].as_u64().unwrap_or(0) as u8;
            (home == a.as_u8() && away == b.as_u8()) || (home == b.as_u8() && away == a.as_u8())
        })
        .collect())
}

/// Orders `candidates` from best seed (index 0) to worst, applying the
/// tie-break cascade pairwise whenever two teams share a win percentage.
/// Ties broader than two teams fall through to the deterministic final
/// step (ascending team id) rather than resolving every N-way tie rule —
/// a simplification over the full NFL procedure, recorded as a design
/// decision.
pub fn seed_conference(
    txn: &Txn<'_>,
    dynasty_id: &DynastyId,
    season: u16,
    candidates: &[TeamRecord],
) -> Result<Vec<TeamId>> {
    let mut ranked = candidates.to_vec();
    ranked.sort_by(|a, b| b.win_pct().partial_cmp(&a.win_pct()).unwrap());

    let mut i = 0;
    while i < ranked.len() {
        let mut j = i + 1;
        while j < ranked.len() && (ranked[j].win_pct() - ranked[i].win_pct()).abs() < f64::EPSILON {
            j += 1;
        }
        if j - i == 2 {
            let (a, b) = (ranked[i], ranked[i + 1]);
            if let Some(h2h) = head_to_head_win_pct(txn, dynasty_id, season, a.team_id, b.team_id)? {
                if h2h < 0.5 {
                    ranked.swap(i, i + 1);
                }
            } else if a.division_id == b.division_id && a.division_win_pct() != b.division_win_pct() {
                if a.division_win_pct() < b.division_win_pct() {
                    ranked.swap(i, i + 1);
                }
            } else if a.conference_win_pct() != b.conference_win_pct() {
                if a.conference_win_pct() < b.conference_win_pct() {
                    ranked.swap(i, i + 1);
                }
            } else if a.point_differential() != b.point_differential() {
                if a.point_differential() < b.point_differential() {
                    ranked.swap(i, i + 1);
                }
            } else if a.team_id.as_u8() > b.team_id.as_u8() {
                ranked.swap(i, i + 1);
            }
        } else if j - i > 2 {
            ranked[i..j].sort_by_key(|r| r.team_id.as_u8());
        }
        i = j;
    }

    Ok(ranked.into_iter().map(|r| r.team_id).collect())
}

/// Builds [`TeamRecord`]s for every team in `division_of`, reading the
/// persisted regular-season standing for each.
pub fn collect_records(
    txn: &Txn<'_>,
    dynasty_id: &DynastyId,
    season: u16,
    division_of: &[(TeamId, u8)],
) -> Result<Vec<TeamRecord>> {
    let mut out = Vec::with_capacity(division_of.len());
    for (team_id, division_id) in division_of {
        let standing = txn.get_standing(dynasty_id, season, SeasonType::Regular, *team_id)?;
        out.push(TeamRecord {
            team_id: *team_id,
            division_id: *division_id,
            standing,
        });
    }
    Ok(out)
}
