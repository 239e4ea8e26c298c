//! Database schema and connection management.
//!
//! One struct owning a single `rusqlite::Connection`, a `new()` that
//! resolves the on-disk path and ensures the schema exists, and
//! `initialize_schema` issuing a series of `CREATE TABLE IF NOT EXISTS`
//! statements.

use std::path::{Path, PathBuf};

use rusqlite::Connection;

use crate::error::Result;

/// Environment variable that overrides the default store location.
pub const DB_PATH_ENV_VAR: &str = "DYNASTY_SIM_DB_PATH";

/// Owns the persistent connection for every dynasty in this process.
/// All multi-table invariants are enforced by wrapping related writes in one
/// [`crate::store::txn::Txn`].
pub struct Store {
    pub(crate) conn: Connection,
}

impl Store {
    /// Open (and if necessary create) the store at the default location,
    /// honoring [`DB_PATH_ENV_VAR`].
    pub fn open_default() -> Result<Self> {
        Self::open(Self::default_path()?)
    }

    /// Open an in-memory store, used by unit tests that don't need to
    /// exercise on-disk persistence.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let mut store = Self { conn };
        store.initialize_schema()?;
        Ok(store)
    }

    /// Open (and if necessary create) the store at an explicit path.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let conn = Connection::open(path)?;
        let mut store = Self { conn };
        store.initialize_schema()?;
        Ok(store)
    }

    fn default_path() -> Result<PathBuf> {
        if let Ok(p) = std::env::var(DB_PATH_ENV_VAR) {
            return Ok(PathBuf::from(p));
        }
        let data_dir = dirs::data_dir().unwrap_or_else(|| PathBuf::from("."));
        Ok(data_dir.join("dynasty-sim").join("dynasties.db"))
    }

    fn initialize_schema(&mut self) -> Result<()> {
        self.conn.execute_batch(
            "
            PRAGMA foreign_keys = ON;

            CREATE TABLE IF NOT EXISTS dynasties (
                dynasty_id TEXT PRIMARY KEY,
                display_name TEXT NOT NULL,
                owner_name TEXT NOT NULL,
                user_team_id INTEGER,
                is_active INTEGER NOT NULL DEFAULT 1,
                created_at INTEGER NOT NULL
            );

            CREATE TABLE IF NOT EXISTS dynasty_state (
                dynasty_id TEXT NOT NULL,
                season INTEGER NOT NULL,
                current_date TEXT NOT NULL,
                current_phase TEXT NOT NULL,
                current_week INTEGER,
                last_simulated_game_id INTEGER,
                current_draft_pick INTEGER NOT NULL DEFAULT 0,
                draft_in_progress INTEGER NOT NULL DEFAULT 0,
                PRIMARY KEY (dynasty_id, season),
                FOREIGN KEY (dynasty_id) REFERENCES dynasties(dynasty_id)
            );

            CREATE TABLE IF NOT EXISTS events (
                event_id INTEGER PRIMARY KEY AUTOINCREMENT,
                dynasty_id TEXT NOT NULL,
                event_type TEXT NOT NULL,
                timestamp TEXT NOT NULL,
                game_id TEXT,
                parameters_blob TEXT NOT NULL,
                results_blob TEXT,
                insertion_order INTEGER NOT NULL,
                FOREIGN KEY (dynasty_id) REFERENCES dynasties(dynasty_id)
            );

            CREATE INDEX IF NOT EXISTS idx_events_dynasty_date
                ON events(dynasty_id, timestamp);

            CREATE INDEX IF NOT EXISTS idx_events_game_id
                ON events(dynasty_id, game_id);

            CREATE TABLE IF NOT EXISTS standings (
                dynasty_id TEXT NOT NULL,
                season INTEGER NOT NULL,
                season_type TEXT NOT NULL,
                team_id INTEGER NOT NULL,
                wins INTEGER NOT NULL DEFAULT 0,
                losses INTEGER NOT NULL DEFAULT 0,
                ties INTEGER NOT NULL DEFAULT 0,
                division_wins INTEGER NOT NULL DEFAULT 0,
                division_losses INTEGER NOT NULL DEFAULT 0,
                conference_wins INTEGER NOT NULL DEFAULT 0,
                conference_losses INTEGER NOT NULL DEFAULT 0,
                home_wins INTEGER NOT NULL DEFAULT 0,
                home_losses INTEGER NOT NULL DEFAULT 0,
                away_wins INTEGER NOT NULL DEFAULT 0,
                away_losses INTEGER NOT NULL DEFAULT 0,
                points_for INTEGER NOT NULL DEFAULT 0,
                points_against INTEGER NOT NULL DEFAULT 0,
                streak INTEGER NOT NULL DEFAULT 0,
                PRIMARY KEY (dynasty_id, season, season_type, team_id),
                FOREIGN KEY (dynasty_id) REFERENCES dynasties(dynasty_id)
            );

            CREATE TABLE IF NOT EXISTS contracts (
                contract_id INTEGER PRIMARY KEY AUTOINCREMENT,
                dynasty_id TEXT NOT NULL,
                player_id INTEGER NOT NULL,
                team_id INTEGER NOT NULL,
                start_year INTEGER NOT NULL,
                end_year INTEGER NOT NULL,
                contract_years INTEGER NOT NULL,
                total_value INTEGER NOT NULL,
                is_active INTEGER NOT NULL DEFAULT 1,
                FOREIGN KEY (dynasty_id) REFERENCES dynasties(dynasty_id)
            );

            CREATE INDEX IF NOT EXISTS idx_contracts_dynasty_active
                ON contracts(dynasty_id, is_active, end_year);

            CREATE TABLE IF NOT EXISTS draft_classes (
                draft_class_id INTEGER PRIMARY KEY AUTOINCREMENT,
                dynasty_id TEXT NOT NULL,
                season INTEGER NOT NULL,
                total_prospects INTEGER NOT NULL,
                status TEXT NOT NULL,
                UNIQUE (dynasty_id, season),
                FOREIGN KEY (dynasty_id) REFERENCES dynasties(dynasty_id)
            );

            CREATE TABLE IF NOT EXISTS draft_prospects (
                player_id INTEGER PRIMARY KEY AUTOINCREMENT,
                draft_class_id INTEGER NOT NULL,
                dynasty_id TEXT NOT NULL,
                first_name TEXT NOT NULL,
                last_name TEXT NOT NULL,
                position TEXT NOT NULL,
                age INTEGER NOT NULL,
                true_overall INTEGER NOT NULL,
                scouted_overall INTEGER NOT NULL,
                scouting_confidence TEXT NOT NULL,
                projected_pick_min INTEGER NOT NULL,
                projected_pick_max INTEGER NOT NULL,
                college TEXT NOT NULL,
                archetype TEXT NOT NULL,
                development_curve TEXT NOT NULL,
                attributes_blob TEXT NOT NULL,
                is_drafted INTEGER NOT NULL DEFAULT 0,
                drafted_by_team INTEGER,
                drafted_round INTEGER,
                drafted_pick INTEGER,
                roster_player_id INTEGER,
                FOREIGN KEY (draft_class_id) REFERENCES draft_classes(draft_class_id)
            );

            CREATE INDEX IF NOT EXISTS idx_prospects_class
                ON draft_prospects(draft_class_id, is_drafted);

            CREATE TABLE IF NOT EXISTS draft_order (
                pick_id INTEGER PRIMARY KEY AUTOINCREMENT,
                dynasty_id TEXT NOT NULL,
                season INTEGER NOT NULL,
                round INTEGER NOT NULL,
                pick_in_round INTEGER NOT NULL,
                overall_pick INTEGER NOT NULL,
                original_owner_team INTEGER NOT NULL,
                current_owner_team INTEGER NOT NULL,
                selected_player_id INTEGER,
                is_executed INTEGER NOT NULL DEFAULT 0,
                is_compensatory INTEGER NOT NULL DEFAULT 0,
                acquired_via_trade INTEGER NOT NULL DEFAULT 0,
                trade_id TEXT,
                trade_date TEXT,
                UNIQUE (dynasty_id, season, overall_pick),
                FOREIGN KEY (dynasty_id) REFERENCES dynasties(dynasty_id)
            );

            CREATE TABLE IF NOT EXISTS champions (
                dynasty_id TEXT NOT NULL,
                season INTEGER NOT NULL,
                team_id INTEGER NOT NULL,
                PRIMARY KEY (dynasty_id, season),
                FOREIGN KEY (dynasty_id) REFERENCES dynasties(dynasty_id)
            );

            CREATE TABLE IF NOT EXISTS roster_players (
                player_id INTEGER PRIMARY KEY AUTOINCREMENT,
                dynasty_id TEXT NOT NULL,
                team_id INTEGER NOT NULL,
                name TEXT NOT NULL,
                position TEXT NOT NULL,
                jersey_number INTEGER NOT NULL,
                overall INTEGER NOT NULL,
                depth_order INTEGER NOT NULL,
                FOREIGN KEY (dynasty_id) REFERENCES dynasties(dynasty_id)
            );
            ",
        )?;
        Ok(())
    }
}
