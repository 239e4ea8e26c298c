//! CLI argument definitions (using clap).

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::ids::{DynastyId, TeamId};

#[derive(Debug, Parser)]
#[clap(name = "dynasty-sim", about = "NFL franchise-management dynasty simulator")]
pub struct Cli {
    /// Override the sqlite store path (or set DYNASTY_SIM_DB_PATH).
    #[clap(long, global = true)]
    pub db: Option<PathBuf>,

    #[clap(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Start a new dynasty at the beginning of a league year's preseason.
    Create {
        /// Display name for the dynasty.
        #[clap(long)]
        name: String,

        /// Dynasty identifier used by every other command.
        #[clap(long)]
        dynasty_id: DynastyId,

        /// Owner/GM name.
        #[clap(long)]
        owner: String,

        /// Team the user controls (1-32). Omit for commissioner mode.
        #[clap(long)]
        team: Option<TeamId>,

        /// Starting league year (e.g. 2025).
        #[clap(long, default_value_t = 2025)]
        season: u16,
    },

    /// Print the dynasty's current date, phase, and season.
    Status {
        #[clap(long)]
        dynasty_id: DynastyId,
    },

    /// Advance the simulation by a single day.
    AdvanceDay {
        #[clap(long)]
        dynasty_id: DynastyId,
    },

    /// Advance up to seven days, stopping early for a pending milestone.
    AdvanceWeek {
        #[clap(long)]
        dynasty_id: DynastyId,
    },

    /// Advance day by day until the current phase ends or a milestone pauses.
    AdvanceToPhaseEnd {
        #[clap(long)]
        dynasty_id: DynastyId,
    },

    /// Apply a decision to a paused interactive event.
    ResolveMilestone {
        #[clap(long)]
        dynasty_id: DynastyId,

        /// Event id returned by the paused `advance-day`/`advance-week` call.
        #[clap(long)]
        event_id: i64,

        /// Decision payload as a JSON object, e.g. '{"cut_player_id": 42}'.
        #[clap(long)]
        mutations: String,
    },

    /// Force the offseason year transition regardless of the current date.
    SkipToNewSeason {
        #[clap(long)]
        dynasty_id: DynastyId,
    },

    /// List standings for a season.
    Standings {
        #[clap(long)]
        dynasty_id: DynastyId,

        #[clap(long)]
        season: u16,

        /// Show playoff standings instead of the regular season.
        #[clap(long)]
        playoffs: bool,
    },

    /// Let the AI evaluate and draft the best available prospect for
    /// whichever team is currently on the clock.
    DraftAiPick {
        #[clap(long)]
        dynasty_id: DynastyId,

        #[clap(long)]
        season: u16,
    },

    /// Draft a specific prospect for the team on the clock (user picks).
    DraftPick {
        #[clap(long)]
        dynasty_id: DynastyId,

        #[clap(long)]
        season: u16,

        #[clap(long)]
        prospect_id: i64,
    },
}
