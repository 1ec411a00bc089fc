//! Event store access.
//!
//! Stores are the only place events come from. They return raw records for a
//! single owner; validation into `Event`s happens afterwards so that one bad
//! record can be skipped without failing the whole read.

use std::path::PathBuf;

use crate::error::{CoreError, CoreResult};
use crate::event::EventRecord;

/// Source of persisted events, already scoped to one owner.
pub trait EventStore {
    fn events_for_owner(&self, owner_id: &str) -> CoreResult<Vec<EventRecord>>;
}

/// Events kept in a JSON file holding an array of records.
#[derive(Debug, Clone)]
pub struct JsonEventStore {
    path: PathBuf,
}

impl JsonEventStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        JsonEventStore { path: path.into() }
    }

    fn read_all(&self) -> CoreResult<Vec<EventRecord>> {
        let content = std::fs::read_to_string(&self.path)?;
        serde_json::from_str(&content).map_err(|e| {
            CoreError::Serialization(format!(
                "Failed to parse events from {}: {}",
                self.path.display(),
                e
            ))
        })
    }
}

impl EventStore for JsonEventStore {
    fn events_for_owner(&self, owner_id: &str) -> CoreResult<Vec<EventRecord>> {
        let records: Vec<EventRecord> = self
            .read_all()?
            .into_iter()
            .filter(|record| record.owner_id == owner_id)
            .collect();

        tracing::debug!(
            path = %self.path.display(),
            owner = owner_id,
            count = records.len(),
            "loaded event records"
        );

        Ok(records)
    }
}

/// Events held in memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryEventStore {
    records: Vec<EventRecord>,
}

impl MemoryEventStore {
    pub fn new(records: Vec<EventRecord>) -> Self {
        MemoryEventStore { records }
    }

    pub fn insert(&mut self, record: EventRecord) {
        self.records.push(record);
    }
}

impl EventStore for MemoryEventStore {
    fn events_for_owner(&self, owner_id: &str) -> CoreResult<Vec<EventRecord>> {
        Ok(self
            .records
            .iter()
            .filter(|record| record.owner_id == owner_id)
            .cloned()
            .collect())
    }
}
