//! Shared helpers for command handlers.

use crate::error::Result;
use crate::store::schema::Store;

/// Open the store at an explicit path if given, otherwise the default
/// location (honoring `DYNASTY_SIM_DB_PATH`).
pub fn open_store(db_path: Option<&std::path::Path>) -> Result<Store> {
    match db_path {
        Some(path) => Store::open(path),
        None => Store::open_default(),
    }
}
