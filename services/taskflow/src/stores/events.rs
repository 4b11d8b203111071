//! services/taskflow/src/stores/events.rs
//!
//! The per-user calendar.

use crate::adapters::records::EventRecord;
use crate::error::RecordError;
use crate::stores::{json, keys};
use chrono::Utc;
use std::sync::Arc;
use taskflow_core::domain::{new_id, Event, NewEvent};
use taskflow_core::ports::{KeyValueStore, PortResult};
use tracing::warn;

#[derive(Clone)]
pub struct EventStore {
    store: Arc<dyn KeyValueStore>,
}

impl EventStore {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Never fails; an unreadable calendar is logged and read as empty.
    pub fn load_events(&self, user_id: &str) -> Vec<Event> {
        self.read_events(user_id).unwrap_or_else(|e| {
            warn!(user_id, error = %e, "could not load events");
            Vec::new()
        })
    }

    pub fn save_events(&self, user_id: &str, events: &[Event]) -> PortResult<()> {
        let records: Vec<EventRecord> = events.iter().map(EventRecord::from_domain).collect();
        json::write(self.store.as_ref(), &keys::events(user_id), &records)
    }

    pub fn add_event(&self, user_id: &str, input: NewEvent) -> Result<Event, RecordError> {
        if input.title.trim().is_empty() {
            return Err(RecordError::Validation("event title is required".to_string()));
        }
        let mut events = self.read_events(user_id)?;
        let event = Event {
            id: new_id(),
            title: input.title.trim().to_string(),
            description: input.description.trim().to_string(),
            date: input.date,
            time: input.time,
            linked_task_id: input.linked_task_id.filter(|id| !id.trim().is_empty()),
            created_at: Utc::now(),
        };
        events.insert(0, event.clone());
        self.save_events(user_id, &events)?;
        Ok(event)
    }

    pub fn delete_event(&self, user_id: &str, event_id: &str) -> Result<Event, RecordError> {
        let mut events = self.read_events(user_id)?;
        let index = events
            .iter()
            .position(|e| e.id == event_id)
            .ok_or_else(|| RecordError::NotFound(event_id.to_string()))?;
        let removed = events.remove(index);
        self.save_events(user_id, &events)?;
        Ok(removed)
    }

    fn read_events(&self, user_id: &str) -> PortResult<Vec<Event>> {
        let records: Option<Vec<EventRecord>> =
            json::read(self.store.as_ref(), &keys::events(user_id))?;
        Ok(records
            .unwrap_or_default()
            .into_iter()
            .map(EventRecord::to_domain)
            .collect())
    }
}
