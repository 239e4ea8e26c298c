//! Persistence layer: one SQLite database holding every dynasty, isolated
//! by an explicit `dynasty_id` column on every table and enforced at the
//! API boundary by [`txn::Txn`].

pub mod champions;
pub mod contracts;
pub mod draft;
pub mod dynasties;
pub mod events;
pub mod roster;
pub mod schema;
pub mod standings;
pub mod txn;

pub use contracts::{Contract, NewContract};
pub use draft::{
    DraftClassId, DraftClassStatus, DraftPick, DraftProspect, NewDraftPick, NewDraftProspect,
    ScoutingConfidence,
};
pub use dynasties::{Dynasty, DynastyState};
pub use events::{DeadlineKind, Event, EventType, GameKind, MilestoneKind, NewEvent, WindowKind};
pub use roster::{NewRosterPlayer, RosterPlayer};
pub use schema::{Store, DB_PATH_ENV_VAR};
pub use standings::{GameOutcome, SeasonType, Standing, StandingsUpdate};
pub use txn::Txn;
