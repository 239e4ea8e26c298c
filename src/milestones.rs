//! The interactive milestone router: decides whether a day's events need a
//! human decision before the executor can close the day, and applies that
//! decision back to the event log.
//!
//! The protocol is `NeedsInteraction(event)` / `resolve(event_id, mutations)`:
//! the executor never blocks on a callback, it just returns the event that
//! needs a decision and lets the host call back in on its own schedule,
//! possibly after a process restart.

use serde_json::{json, Value};

use crate::error::{DynastyError, Result};
use crate::ids::{DynastyId, EventId, TeamId};
use crate::store::events::Event;
use crate::store::txn::Txn;

/// Outcome of [`resolve`]: whether this call actually applied a mutation,
/// or found the event already resolved (idempotent re-entry).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolveOutcome {
    Applied,
    AlreadyResolved,
}

fn concerns_team(event: &Event, team_id: TeamId) -> bool {
    match event.parameters.get("team_id").and_then(|v| v.as_u64()) {
        Some(v) => v as u8 == team_id.as_u8(),
        None => true,
    }
}

/// Among `events`, the highest-priority unresolved interactive event that
/// concerns `user_team_id`, or `None` if the day needs no decision.
/// Priority order when several share a date: deadlines, then windows, then
/// the draft day.
pub fn pending_milestone(events: &[Event], user_team_id: TeamId) -> Option<&Event> {
    events
        .iter()
        .filter(|e| !e.is_executed())
        .filter(|e| e.event_type.is_interactive_candidate())
        .filter(|e| concerns_team(e, user_team_id))
        .min_by_key(|e| e.event_type.interactive_priority())
}

/// Apply the host's decision to a pending interactive event. Calling this
/// twice for the same `event_id` is safe: the second call observes the
/// event already has `results` and returns `AlreadyResolved` without
/// reapplying `mutations`.
pub fn resolve(
    txn: &Txn<'_>,
    dynasty_id: &DynastyId,
    event_id: EventId,
    mutations: Value,
) -> Result<ResolveOutcome> {
    let event = txn.get_event(dynasty_id, event_id)?;
    if event.is_executed() {
        return Ok(ResolveOutcome::AlreadyResolved);
    }
    txn.mark_event_executed(dynasty_id, event_id, &mutations)?;
    Ok(ResolveOutcome::Applied)
}

/// Cancel a pending interactive event rather than acting on it — e.g. the
/// user declines to make a roster cut before a deadline passes. Recorded
/// as a normal (idempotent) resolution tagged `cancelled`, not an error, so
/// the day can still close; callers that must *know* a milestone was
/// cancelled rather than resolved should inspect the returned event's
/// results after the fact.
pub fn cancel(txn: &Txn<'_>, dynasty_id: &DynastyId, event_id: EventId) -> Result<ResolveOutcome> {
    resolve(txn, dynasty_id, event_id, json!({ "cancelled": true }))
}

/// Returns [`DynastyError::Cancelled`] if `event_id` was resolved via
/// [`cancel`] — useful for callers that want cancellation to propagate as
/// an error rather than silently continuing.
pub fn require_not_cancelled(txn: &Txn<'_>, dynasty_id: &DynastyId, event_id: EventId) -> Result<()> {
    let event = txn.get_event(dynasty_id, event_id)?;
    if let Some(results) = &event.results {
        if results.get("cancelled").and_then(|v| v.as_bool()) == Some(true) {
            return Err(DynastyError::Cancelled);
        }
    }
    Ok(())
}
