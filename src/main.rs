//! Entry point: parse CLI and dispatch to command handlers.

use clap::Parser;
use dynasty_sim::cli::{Cli, Commands};
use dynasty_sim::commands::{
    handle_advance_day, handle_advance_to_phase_end, handle_advance_week, handle_create,
    handle_draft_ai_pick, handle_draft_pick, handle_resolve_milestone, handle_skip_to_new_season,
    handle_standings, handle_status, open_store,
};
use dynasty_sim::Result;

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    let store = open_store(cli.db.as_deref())?;

    match cli.command {
        Commands::Create {
            name,
            dynasty_id,
            owner,
            team,
            season,
        } => handle_create(store, dynasty_id, &name, &owner, team, season)?,

        Commands::Status { dynasty_id } => handle_status(store, dynasty_id)?,

        Commands::AdvanceDay { dynasty_id } => handle_advance_day(store, dynasty_id)?,

        Commands::AdvanceWeek { dynasty_id } => handle_advance_week(store, dynasty_id)?,

        Commands::AdvanceToPhaseEnd { dynasty_id } => {
            handle_advance_to_phase_end(store, dynasty_id)?
        }

        Commands::ResolveMilestone {
            dynasty_id,
            event_id,
            mutations,
        } => handle_resolve_milestone(store, dynasty_id, event_id, &mutations)?,

        Commands::SkipToNewSeason { dynasty_id } => handle_skip_to_new_season(store, dynasty_id)?,

        Commands::Standings {
            dynasty_id,
            season,
            playoffs,
        } => handle_standings(store, dynasty_id, season, playoffs)?,

        Commands::DraftAiPick { dynasty_id, season } => {
            handle_draft_ai_pick(store, dynasty_id, season)?
        }

        Commands::DraftPick {
            dynasty_id,
            season,
            prospect_id,
        } => handle_draft_pick(store, dynasty_id, season, prospect_id)?,
    }

    Ok(())
}
