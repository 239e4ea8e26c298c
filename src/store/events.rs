//! The append-only event log.
//!
//! Every scheduled occurrence is an [`EventType`] variant, dispatched by
//! pattern match at the simulation executor rather than by a raw string key.

use rusqlite::params;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::calendar::CalendarDate;
use crate::error::{DynastyError, Result};
use crate::ids::{DynastyId, EventId};
use crate::store::txn::Txn;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameKind {
    Preseason,
    Regular,
    WildCard,
    Divisional,
    Conference,
    SuperBowl,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeadlineKind {
    FranchiseTag,
    FinalRosterCuts,
    SalaryCapCompliance,
    RfaTender,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WindowKind {
    FreeAgencyStart,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MilestoneKind {
    DraftClassPublished,
}

/// One scheduled occurrence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum EventType {
    Game(GameKind),
    Deadline(DeadlineKind),
    Window(WindowKind),
    Milestone(MilestoneKind),
    DraftDay,
}

impl EventType {
    /// Events that hand control to the host through the interactive-milestone
    /// router. Priority order when several share a date: deadlines
    /// before windows before the draft day.
    pub fn interactive_priority(&self) -> Option<u8> {
        match self {
            EventType::Deadline(_) => Some(0),
            EventType::Window(_) => Some(1),
            EventType::DraftDay => Some(2),
            EventType::Game(_) | EventType::Milestone(_) => None,
        }
    }

    pub fn is_interactive_candidate(&self) -> bool {
        self.interactive_priority().is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    pub event_id: EventId,
    pub dynasty_id: DynastyId,
    pub event_type: EventType,
    pub timestamp: CalendarDate,
    pub synthetic_game_id: Option<String>,
    pub parameters: Value,
    pub results: Option<Value>,
    pub insertion_order: i64,
}

impl Event {
    pub fn is_executed(&self) -> bool {
        self.results.is_some()
    }
}

/// A not-yet-persisted event, used by schedule generators and the bulk
/// insert path.
#[derive(Debug, Clone)]
pub struct NewEvent {
    pub event_type: EventType,
    pub timestamp: CalendarDate,
    pub synthetic_game_id: Option<String>,
    pub parameters: Value,
}

impl Txn<'_> {
    /// Insert a single event and return its assigned id.
    pub fn insert_event(&self, new_event: &NewEvent) -> Result<EventId> {
        let ids = self.bulk_insert_events(std::slice::from_ref(new_event))?;
        Ok(ids[0])
    }

    /// Insert many events in one transaction — used by schedule generation
    /// so a partially-generated schedule is never visible.
    pub fn bulk_insert_events(&self, new_events: &[NewEvent]) -> Result<Vec<EventId>> {
        let dynasty_id = self.dynasty_id().clone();
        let mut next_order: i64 = self.inner.query_row(
            "SELECT COALESCE(MAX(insertion_order), -1) + 1 FROM events WHERE dynasty_id = ?1",
            [dynasty_id.as_str()],
            |r| r.get(0),
        )?;

        let mut ids = Vec::with_capacity(new_events.len());
        let mut stmt = self.inner.prepare(
            "INSERT INTO events
                (dynasty_id, event_type, timestamp, game_id, parameters_blob, results_blob, insertion_order)
             VALUES (?1, ?2, ?3, ?4, ?5, NULL, ?6)",
        )?;
        for e in new_events {
            let event_type_json = serde_json::to_string(&e.event_type)?;
            stmt.execute(params![
                dynasty_id.as_str(),
                event_type_json,
                e.timestamp.to_iso_string(),
                e.synthetic_game_id,
                e.parameters.to_string(),
                next_order,
            ])?;
            ids.push(EventId::new(self.inner.last_insert_rowid()));
            next_order += 1;
        }
        Ok(ids)
    }

    /// Events due on `date`, in (timestamp, insertion order) — the stable
    /// order the executor relies on for deterministic simulation.
    pub fn events_for_date(&self, dynasty_id: &DynastyId, date: CalendarDate) -> Result<Vec<Event>> {
        self.events_in_range(dynasty_id, date, date)
    }

    pub fn events_in_range(
        &self,
        dynasty_id: &DynastyId,
        start: CalendarDate,
        end: CalendarDate,
    ) -> Result<Vec<Event>> {
        let mut stmt = self.inner.prepare(
            "SELECT event_id, dynasty_id, event_type, timestamp, game_id,
                    parameters_blob, results_blob, insertion_order
             FROM events
             WHERE dynasty_id = ?1 AND timestamp >= ?2 AND timestamp <= ?3
             ORDER BY timestamp ASC, insertion_order ASC",
        )?;
        let rows = stmt.query_map(
            params![
                dynasty_id.as_str(),
                start.to_iso_string(),
                end.to_iso_string()
            ],
            row_to_event,
        )?;
        let mut out = Vec::new();
        for r in rows {
            out.push(r??);
        }
        Ok(out)
    }

    /// Events whose synthetic game id starts with `prefix`, enumerating a
    /// dynasty-season's worth of games without scanning other dynasties.
    pub fn events_by_game_id_prefix(
        &self,
        dynasty_id: &DynastyId,
        prefix: &str,
    ) -> Result<Vec<Event>> {
        let like_pattern = format!("{prefix}%");
        let mut stmt = self.inner.prepare(
            "SELECT event_id, dynasty_id, event_type, timestamp, game_id,
                    parameters_blob, results_blob, insertion_order
             FROM events
             WHERE dynasty_id = ?1 AND game_id LIKE ?2
             ORDER BY timestamp ASC, insertion_order ASC",
        )?;
        let rows = stmt.query_map(params![dynasty_id.as_str(), like_pattern], row_to_event)?;
        let mut out = Vec::new();
        for r in rows {
            out.push(r??);
        }
        Ok(out)
    }

    pub fn get_event(&self, dynasty_id: &DynastyId, event_id: EventId) -> Result<Event> {
        self.inner
            .query_row(
                "SELECT event_id, dynasty_id, event_type, timestamp, game_id,
                        parameters_blob, results_blob, insertion_order
                 FROM events WHERE dynasty_id = ?1 AND event_id = ?2",
                params![dynasty_id.as_str(), event_id.as_i64()],
                row_to_event,
            )?
            .map_err(DynastyError::from)
    }

    /// The maximum timestamp among regular-season GAME events, used by the
    /// phase tracker to find the end of the regular season without knowing
    /// the schedule length in advance.
    pub fn max_regular_season_game_date(
        &self,
        dynasty_id: &DynastyId,
    ) -> Result<Option<CalendarDate>> {
        let regular = serde_json::to_string(&EventType::Game(GameKind::Regular))?;
        let max: Option<String> = self.inner.query_row(
            "SELECT MAX(timestamp) FROM events WHERE dynasty_id = ?1 AND event_type = ?2",
            params![dynasty_id.as_str(), regular],
            |r| r.get(0),
        )?;
        max.map(|s| CalendarDate::parse_iso(&s)).transpose()
    }

    /// The earliest date any event of `event_type` is scheduled on, used by
    /// the phase tracker to find the Wild Card and Super Bowl dates once
    /// the playoff bracket has been generated.
    pub fn min_date_for_event_type(
        &self,
        dynasty_id: &DynastyId,
        event_type: &EventType,
    ) -> Result<Option<CalendarDate>> {
        let type_json = serde_json::to_string(event_type)?;
        let min: Option<String> = self.inner.query_row(
            "SELECT MIN(timestamp) FROM events WHERE dynasty_id = ?1 AND event_type = ?2",
            params![dynasty_id.as_str(), type_json],
            |r| r.get(0),
        )?;
        min.map(|s| CalendarDate::parse_iso(&s)).transpose()
    }

    /// Fill `results` on an already-executed event. Executed events are
    /// immutable otherwise: this never rewrites `parameters`.
    pub fn mark_event_executed(
        &self,
        dynasty_id: &DynastyId,
        event_id: EventId,
        results: &Value,
    ) -> Result<()> {
        let rows = self.inner.execute(
            "UPDATE events SET results_blob = ?1 WHERE dynasty_id = ?2 AND event_id = ?3",
            params![results.to_string(), dynasty_id.as_str(), event_id.as_i64()],
        )?;
        if rows == 0 {
            return Err(DynastyError::EventNotFound {
                event_id: event_id.to_string(),
            });
        }
        Ok(())
    }
}

fn row_to_event(row: &rusqlite::Row) -> rusqlite::Result<Result<Event>> {
    let event_type_json: String = row.get(2)?;
    let timestamp_str: String = row.get(3)?;
    let params_str: String = row.get(5)?;
    let results_str: Option<String> = row.get(6)?;

    let parsed = (|| -> Result<Event> {
        let event_type: EventType = serde_json::from_str(&event_type_json)?;
        let timestamp = CalendarDate::parse_iso(&timestamp_str)?;
        let parameters: Value = serde_json::from_str(&params_str)?;
        let results = results_str
            .map(|s| serde_json::from_str(&s))
            .transpose()?;
        Ok(Event {
            event_id: EventId::new(row.get(0)?),
            dynasty_id: DynastyId::new(row.get::<_, String>(1)?),
            event_type,
            timestamp,
            synthetic_game_id: row.get(4)?,
            parameters,
            results,
            insertion_order: row.get(7)?,
        })
    })();
    Ok(parsed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::schema::Store;
    use serde_json::json;

    fn txn_with_dynasty(store: &mut Store, id: &str) -> Txn<'_> {
        let dynasty_id = DynastyId::new(id);
        let txn = store.begin(dynasty_id.clone()).unwrap();
        txn.create_dynasty("D", "Owner", None, 0).unwrap();
        txn
    }

    #[test]
    fn bulk_insert_preserves_stable_order() {
        let mut store = Store::open_in_memory().unwrap();
        let txn = txn_with_dynasty(&mut store, "d1");
        let date = CalendarDate::new(2025, 9, 4).unwrap();
        let events: Vec<NewEvent> = (0..3)
            .map(|i| NewEvent {
                event_type: EventType::Game(GameKind::Regular),
                timestamp: date,
                synthetic_game_id: Some(format!("2025_reg_w1_g{i}")),
                parameters: json!({ "home": i, "away": i + 1 }),
            })
            .collect();
        txn.bulk_insert_events(&events).unwrap();

        let fetched = txn.events_for_date(txn.dynasty_id(), date).unwrap();
        assert_eq!(fetched.len(), 3);
        for (i, e) in fetched.iter().enumerate() {
            assert_eq!(
                e.synthetic_game_id,
                Some(format!("2025_reg_w1_g{i}"))
            );
            assert_eq!(e.insertion_order, i as i64);
        }
    }

    #[test]
    fn mark_executed_then_immutable_parameters() {
        let mut store = Store::open_in_memory().unwrap();
        let txn = txn_with_dynasty(&mut store, "d1");
        let date = CalendarDate::new(2025, 9, 4).unwrap();
        let id = txn
            .insert_event(&NewEvent {
                event_type: EventType::Game(GameKind::Regular),
                timestamp: date,
                synthetic_game_id: Some("g1".into()),
                parameters: json!({ "home": 1, "away": 2 }),
            })
            .unwrap();

        let before = txn.get_event(txn.dynasty_id(), id).unwrap();
        assert!(!before.is_executed());

        txn.mark_event_executed(txn.dynasty_id(), id, &json!({ "home_score": 24 }))
            .unwrap();

        let after = txn.get_event(txn.dynasty_id(), id).unwrap();
        assert!(after.is_executed());
        assert_eq!(after.parameters, before.parameters);
    }

    #[test]
    fn game_id_prefix_query_scopes_by_dynasty() {
        let mut store = Store::open_in_memory().unwrap();
        let txn1 = txn_with_dynasty(&mut store, "d1");
        let date = CalendarDate::new(2025, 9, 4).unwrap();
        txn1.insert_event(&NewEvent {
            event_type: EventType::Game(GameKind::Regular),
            timestamp: date,
            synthetic_game_id: Some("2025_reg_w1_g0".into()),
            parameters: json!({}),
        })
        .unwrap();
        txn1.commit().unwrap();

        let txn2 = txn_with_dynasty(&mut store, "d2");
        txn2.insert_event(&NewEvent {
            event_type: EventType::Game(GameKind::Regular),
            timestamp: date,
            synthetic_game_id: Some("2025_reg_w1_g0".into()),
            parameters: json!({}),
        })
        .unwrap();

        let d1_events = txn2
            .events_by_game_id_prefix(&DynastyId::new("d1"), "2025_reg")
            .unwrap();
        assert_eq!(d1_events.len(), 0, "must not see dynasty d1's events");

        let d2_events = txn2
            .events_by_game_id_prefix(&DynastyId::new("d2"), "2025_reg")
            .unwrap();
        assert_eq!(d2_events.len(), 1);
    }

    #[test]
    fn max_regular_season_game_date_ignores_other_types() {
        let mut store = Store::open_in_memory().unwrap();
        let txn = txn_with_dynasty(&mut store, "d1");
        txn.insert_event(&NewEvent {
            event_type: EventType::Game(GameKind::Regular),
            timestamp: CalendarDate::new(2026, 1, 3).unwrap(),
            synthetic_game_id: Some("g1".into()),
            parameters: json!({}),
        })
        .unwrap();
        txn.insert_event(&NewEvent {
            event_type: EventType::DraftDay,
            timestamp: CalendarDate::new(2026, 4, 24).unwrap(),
            synthetic_game_id: None,
            parameters: json!({}),
        })
        .unwrap();

        let max = txn
            .max_regular_season_game_date(txn.dynasty_id())
            .unwrap();
        assert_eq!(max, Some(CalendarDate::new(2026, 1, 3).unwrap()));
    }

    #[test]
    fn interactive_priority_orders_deadline_before_window_before_draft() {
        assert!(
            EventType::Deadline(DeadlineKind::FranchiseTag)
                .interactive_priority()
                < EventType::Window(WindowKind::FreeAgencyStart).interactive_priority()
        );
        assert!(
            EventType::Window(WindowKind::FreeAgencyStart).interactive_priority()
                < EventType::DraftDay.interactive_priority()
        );
        assert_eq!(
            EventType::Game(GameKind::Regular).interactive_priority(),
            None
        );
    }
}
