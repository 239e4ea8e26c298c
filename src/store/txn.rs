//! Transaction handle passed explicitly to every mutating store call.
//!
//! Per the design notes' re-architecture of "shared DB connections smuggled
//! through optional parameters" (source: `shared_conn` kwargs): there is no
//! hidden connection. Every entity method in [`crate::store`] takes `&Txn`
//! or `&mut Txn` explicitly. A caller that only needs one call still opens,
//! commits, and drops its own transaction — there is no ambient connection
//! to forget to pass.

use rusqlite::Transaction;

use crate::error::Result;
use crate::ids::DynastyId;
use crate::store::schema::Store;

/// A connection with an open transaction, logically scoped to one dynasty.
///
/// The scoping is advisory — nothing stops a caller from passing a
/// different `dynasty_id` to an individual query on this `Txn` — but every
/// entity method in this crate takes `dynasty_id` as an explicit, required
/// argument (never optional) so that a reviewer can see dynasty isolation
/// enforced at each call site.
pub struct Txn<'conn> {
    pub(crate) inner: Transaction<'conn>,
    pub(crate) dynasty_id: DynastyId,
}

impl<'conn> Txn<'conn> {
    pub fn dynasty_id(&self) -> &DynastyId {
        &self.dynasty_id
    }

    pub fn commit(self) -> Result<()> {
        self.inner.commit()?;
        Ok(())
    }

    pub fn rollback(self) -> Result<()> {
        self.inner.rollback()?;
        Ok(())
    }
}

impl Store {
    /// Begin a transaction logically locked to `dynasty_id`. A transaction
    /// that fails at commit leaves the store in its pre-begin state — the
    /// caller re-raises and the controller does not advance the calendar.
    pub fn begin(&mut self, dynasty_id: DynastyId) -> Result<Txn<'_>> {
        let inner = self.conn.transaction()?;
        Ok(Txn { inner, dynasty_id })
    }
}
