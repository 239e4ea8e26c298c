//! Handlers invoked when [`crate::phase::detect_transition`] fires: seeding
//! the playoff bracket, advancing it round by round, crowning a champion,
//! and the full offseason year transition.

pub mod champion;
pub mod playoff_round;
pub mod seeding_transition;
pub mod year_transition;

pub use champion::crown_champion;
pub use playoff_round::{advance_playoffs, advance_round, PlayoffRoundKind};
pub use seeding_transition::{
    conference_division_pairs, schedule_wild_card_round, seed_both_conferences, ConferenceSeeds,
};
pub use year_transition::{run_year_transition, YearTransitionReport};
