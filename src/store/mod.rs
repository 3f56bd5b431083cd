//! Room store: a narrow abstraction over one remote record per room.

mod error;
mod memory;
mod record;
mod rest;

pub use error::StoreError;
pub use memory::MemoryRoomStore;
pub use record::{NewRoom, PlayerMap, RoomPatch, RoomRecord};
pub use rest::RestRoomStore;

use async_trait::async_trait;

/// Create/read/update/delete over room records.
///
/// The interface is deliberately narrow so the concrete backing store is
/// swappable. No create-if-absent primitive is assumed: callers re-query
/// before creating, and a concurrent create can still race and leave
/// duplicate records (recovered by newest-first `find` and by
/// `find_all` + `delete` cleanup).
#[async_trait]
pub trait RoomStore: Send + Sync {
    /// Returns the newest record for the room, or `None`.
    async fn find(&self, room_id: &str) -> Result<Option<RoomRecord>, StoreError>;

    /// Returns every record for the room, duplicates included.
    async fn find_all(&self, room_id: &str) -> Result<Vec<RoomRecord>, StoreError>;

    /// Inserts a record and returns it completed with store-assigned ids.
    async fn create(&self, room: NewRoom) -> Result<RoomRecord, StoreError>;

    /// Merges the given fields into an existing record; fields absent
    /// from the patch are left unchanged.
    async fn update(&self, object_id: &str, patch: &RoomPatch) -> Result<(), StoreError>;

    /// Removes a record by its store-assigned identifier.
    async fn delete(&self, object_id: &str) -> Result<(), StoreError>;
}
