//! Dynasty simulation core: a day-driven NFL franchise-management engine.
//!
//! A [`store`] layer persists everything in sqlite behind one [`Txn`][store::txn::Txn]
//! per logical operation; [`calendar`]/[`phase`] turn a date into a league
//! phase; [`simulation`] ticks the calendar forward one day at a time,
//! dispatching scheduled [`store::events::Event`]s; [`transitions`] fire
//! when the phase changes; [`draft`] runs the annual draft; [`milestones`]
//! gives a host an explicit pause/resolve protocol for decisions a human
//! GM needs to make; [`controller`] composes all of it behind one
//! imperative API for a CLI or any other host to drive.

pub mod calendar;
pub mod cli;
pub mod commands;
pub mod controller;
pub mod draft;
pub mod error;
pub mod ids;
pub mod milestones;
pub mod phase;
pub mod seeding;
pub mod simulation;
pub mod store;
pub mod synchronizer;
pub mod transitions;

pub use controller::SeasonCycleController;
pub use error::{DynastyError, Result};
pub use ids::{ContractId, DynastyId, EventId, PickId, PlayerId, ProspectId, SeasonYear, TeamId};

/// Environment variable that overrides the default store location.
pub const DB_PATH_ENV_VAR: &str = store::schema::DB_PATH_ENV_VAR;
