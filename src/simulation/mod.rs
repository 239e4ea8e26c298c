//! The day-tick simulation executor and its pluggable game-result source.

pub mod executor;
pub mod game_result;
pub mod schedule;

pub use executor::{advance_one_day, DayTickOutcome};
pub use game_result::{GameResult, GameResultProvider, StubGameResultProvider};
pub use schedule::generate_regular_season_schedule;
