//! Propagates a season-year change to every subsystem that caches it.
//!
//! A registry of named callbacks, invoked in registration order whenever the
//! year advances, with each callback's failure logged but not allowed to
//! abort the others. The registry is an owned field on
//! [`SeasonYearSynchronizer`] rather than a module-level singleton, so a
//! process can hold more than one dynasty's synchronizer at once.

use std::collections::BTreeMap;

use log::{info, warn};

use crate::ids::SeasonYear;

/// A subscriber's reaction to a year change. Boxed so the controller can
/// register closures that close over their own subsystem handle.
pub type SyncCallback = Box<dyn FnMut(SeasonYear) -> Result<(), String> + Send>;

/// Why the year advanced, carried through to the log line so an operator can
/// tell a scripted offseason transition from a manual `skip_to_new_season`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncReason {
    OffseasonTransition,
    ManualOverride,
}

impl SyncReason {
    fn as_str(self) -> &'static str {
        match self {
            SyncReason::OffseasonTransition => "offseason_transition",
            SyncReason::ManualOverride => "manual_override",
        }
    }
}

/// Owns the callback registry. Subscribers are keyed by name so a second
/// `subscribe` call for the same name replaces the first rather than
/// double-firing it.
pub struct SeasonYearSynchronizer {
    current_year: SeasonYear,
    subscribers: BTreeMap<String, SyncCallback>,
}

impl SeasonYearSynchronizer {
    pub fn new(current_year: SeasonYear) -> Self {
        Self {
            current_year,
            subscribers: BTreeMap::new(),
        }
    }

    pub fn current_year(&self) -> SeasonYear {
        self.current_year
    }

    /// Register (or replace) a named subscriber.
    pub fn subscribe(&mut self, name: impl Into<String>, callback: SyncCallback) {
        self.subscribers.insert(name.into(), callback);
    }

    pub fn unsubscribe(&mut self, name: &str) {
        self.subscribers.remove(name);
    }

    /// Advance to `new_year`, invoking every subscriber in registration
    /// order. A subscriber error is logged and collected, but does not stop
    /// the remaining subscribers from running, so one bad listener can't
    /// corrupt every other subsystem's view of the year.
    pub fn synchronize(&mut self, new_year: SeasonYear, reason: SyncReason) -> Vec<String> {
        info!(
            "synchronizing season year {} -> {} ({})",
            self.current_year,
            new_year,
            reason.as_str()
        );
        self.current_year = new_year;

        let mut failures = Vec::new();
        for (name, callback) in self.subscribers.iter_mut() {
            if let Err(message) = callback(new_year) {
                warn!("subscriber '{name}' failed to synchronize to {new_year}: {message}");
                failures.push(format!("{name}: {message}"));
            }
        }
        failures
    }

    /// Convenience for the common case of incrementing by one year.
    pub fn increment(&mut self, reason: SyncReason) -> Vec<String> {
        let next = self.current_year.next();
        self.synchronize(next, reason)
    }
}
