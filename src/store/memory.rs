//! In-process room store.
//!
//! Same observable semantics as the REST backend — newest-first find,
//! partial-merge update, store-assigned object ids — without the network.
//! Drives the integration tests; clones share the same records.

use super::error::StoreError;
use super::record::{NewRoom, RoomPatch, RoomRecord};
use super::RoomStore;
use async_trait::async_trait;
use chrono::Utc;
use std::sync::{Arc, Mutex};
use tracing::{debug, instrument};

#[derive(Debug, Default)]
struct Inner {
    /// Records in insertion order; recency queries scan from the back,
    /// standing in for `createdAt` ordering.
    records: Vec<RoomRecord>,
    next_id: u64,
}

/// Shared in-memory room store.
#[derive(Debug, Clone, Default)]
pub struct MemoryRoomStore {
    inner: Arc<Mutex<Inner>>,
}

impl MemoryRoomStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of records currently held, across all rooms.
    pub fn record_count(&self) -> usize {
        self.inner.lock().unwrap().records.len()
    }
}

#[async_trait]
impl RoomStore for MemoryRoomStore {
    #[instrument(skip(self))]
    async fn find(&self, room_id: &str) -> Result<Option<RoomRecord>, StoreError> {
        let inner = self.inner.lock().unwrap();
        Ok(inner
            .records
            .iter()
            .rev()
            .find(|r| r.room_id == room_id)
            .cloned())
    }

    #[instrument(skip(self))]
    async fn find_all(&self, room_id: &str) -> Result<Vec<RoomRecord>, StoreError> {
        let inner = self.inner.lock().unwrap();
        Ok(inner
            .records
            .iter()
            .filter(|r| r.room_id == room_id)
            .cloned()
            .collect())
    }

    #[instrument(skip(self, room), fields(room_id = %room.room_id))]
    async fn create(&self, room: NewRoom) -> Result<RoomRecord, StoreError> {
        let mut inner = self.inner.lock().unwrap();
        inner.next_id += 1;
        let object_id = format!("mem{:06}", inner.next_id);
        let record = room.into_record(object_id, Utc::now());
        debug!(object_id = %record.object_id, "Created in-memory record");
        inner.records.push(record.clone());
        Ok(record)
    }

    #[instrument(skip(self, patch))]
    async fn update(&self, object_id: &str, patch: &RoomPatch) -> Result<(), StoreError> {
        let mut inner = self.inner.lock().unwrap();
        let record = inner
            .records
            .iter_mut()
            .find(|r| r.object_id == object_id)
            .ok_or_else(|| StoreError::new(format!("No record with id {object_id}")))?;
        patch.apply_to(record);
        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete(&self, object_id: &str) -> Result<(), StoreError> {
        let mut inner = self.inner.lock().unwrap();
        let before = inner.records.len();
        inner.records.retain(|r| r.object_id != object_id);
        if inner.records.len() == before {
            return Err(StoreError::new(format!("No record with id {object_id}")));
        }
        Ok(())
    }
}
