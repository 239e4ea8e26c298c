//! Game-result generation. This crate's concern is the season-cycle
//! orchestration engine, not play-by-play simulation, so it ships a
//! deterministic stub scorer behind a trait so a real engine can be swapped
//! in later without touching the executor.

use serde::{Deserialize, Serialize};

use crate::ids::TeamId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameResult {
    pub home_team: TeamId,
    pub away_team: TeamId,
    pub home_score: u32,
    pub away_score: u32,
}

impl GameResult {
    pub fn winner(&self) -> Option<TeamId> {
        use std::cmp::Ordering;
        match self.home_score.cmp(&self.away_score) {
            Ordering::Greater => Some(self.home_team),
            Ordering::Less => Some(self.away_team),
            Ordering::Equal => None,
        }
    }

    pub fn is_tie(&self) -> bool {
        self.home_score == self.away_score
    }
}

/// Produces the outcome of a single matchup. Implementations must be pure
/// functions of their inputs so that re-simulating an already-executed event
/// is never attempted by the executor (results are persisted once) but
/// would be reproducible if it were.
pub trait GameResultProvider {
    fn simulate(&self, home_team: TeamId, away_team: TeamId, seed: i64) -> GameResult;
}

/// Deterministic placeholder: scores are a function of `seed` alone, so the
/// same event id always produces the same result, which end-to-end tests
/// rely on.
#[derive(Debug, Default, Clone, Copy)]
pub struct StubGameResultProvider;

impl GameResultProvider for StubGameResultProvider {
    fn simulate(&self, home_team: TeamId, away_team: TeamId, seed: i64) -> GameResult {
        let mut state = seed as u64 ^ 0x9E3779B97F4A7C15;
        let mut next = || {
            state ^= state << 13;
            state ^= state >> 7;
            state ^= state << 17;
            state
        };
        let home_score = 10 + (next() % 28) as u32;
        let away_score = 10 + (next() % 28) as u32;
        GameResult {
            home_team,
            away_team,
            home_score,
            away_score,
        }
    }
}
