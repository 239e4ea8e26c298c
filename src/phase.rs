//! Classifies a calendar date into a season phase.
//!
//! The classifier itself is a pure function of `(date, boundaries)` — see
//! [`classify`]. The boundaries (Week 1 Thursday, the last scheduled
//! regular-season game, the Super Bowl date) are derived from the event log
//! by [`crate::store::events`] so that the same code supports schedules of
//! varying length without modification — classification is date-based, not
//! count-based.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::calendar::CalendarDate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Phase {
    Preseason,
    RegularSeason,
    Playoffs,
    Offseason,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Phase::Preseason => "PRESEASON",
            Phase::RegularSeason => "REGULAR_SEASON",
            Phase::Playoffs => "PLAYOFFS",
            Phase::Offseason => "OFFSEASON",
        };
        write!(f, "{s}")
    }
}

/// Schedule landmarks for one season, used to classify a date into a [`Phase`].
///
/// All fields are `Option` except `week1_thursday` because a dynasty always
/// knows its regular-season kickoff date (fixed by the August 1 preseason
/// start plus the NFL's "first Thursday in September" convention) before any
/// games have been scheduled, but the remaining landmarks only exist once
/// the relevant schedule has been generated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhaseBoundaries {
    pub week1_thursday: CalendarDate,
    pub last_regular_season_game: Option<CalendarDate>,
    pub super_bowl: Option<CalendarDate>,
}

/// Pure classification:
///
/// - Preseason: Aug 1 – day before Week 1 Thursday
/// - Regular season: Week 1 Thursday – last scheduled regular-season game
/// - Playoffs: day after the last regular-season game – Super Bowl + 1 day
/// - Offseason: Super Bowl + 1 day – July 31
///
/// "Day after" is resolved as the literal calendar date one day later: the
/// transition lands *on* that following day, not at midnight of the game
/// day itself.
pub fn classify(date: CalendarDate, boundaries: &PhaseBoundaries) -> Phase {
    if date < boundaries.week1_thursday {
        return Phase::Preseason;
    }

    if let Some(super_bowl) = boundaries.super_bowl {
        let offseason_start = super_bowl.plus_days(1);
        if date >= offseason_start {
            return Phase::Offseason;
        }
    }

    if let Some(last_game) = boundaries.last_regular_season_game {
        let playoffs_start = last_game.plus_days(1);
        if date >= playoffs_start {
            return Phase::Playoffs;
        }
    }

    Phase::RegularSeason
}

/// Returns `Some((from, to))` if `before` and `after` classify to different
/// phases, else `None`. Used by the simulation executor to decide whether a
/// phase-transition handler must run after advancing the calendar.
pub fn detect_transition(before: Phase, after: Phase) -> Option<(Phase, Phase)> {
    if before == after {
        None
    } else {
        Some((before, after))
    }
}
