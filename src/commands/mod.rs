//! Command handlers, one module per CLI subcommand, dispatched from `main.rs`.

pub mod advance;
pub mod common;
pub mod create;
pub mod draft;
pub mod milestone;
pub mod season;
pub mod standings;
pub mod status;

pub use advance::{handle_advance_day, handle_advance_to_phase_end, handle_advance_week};
pub use common::open_store;
pub use create::handle_create;
pub use draft::{handle_draft_ai_pick, handle_draft_pick};
pub use milestone::handle_resolve_milestone;
pub use season::handle_skip_to_new_season;
pub use standings::handle_standings;
pub use status::handle_status;
