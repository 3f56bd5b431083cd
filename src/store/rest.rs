//! REST backend for the room store.
//!
//! Talks to a hosted class/record API (LeanCloud-style): records of one
//! class live under a single base URL, queries are GET with a `where`
//! filter, and updates are partial-merge PUTs by object id.

use super::error::StoreError;
use super::record::{NewRoom, RoomPatch, RoomRecord};
use super::RoomStore;
use crate::config::StoreConfig;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

/// Response shape of a filtered query.
#[derive(Debug, Deserialize)]
struct QueryResponse {
    #[serde(default)]
    results: Vec<RoomRecord>,
}

/// Response shape of a create call.
#[derive(Debug, Deserialize)]
struct CreateResponse {
    #[serde(rename = "objectId")]
    object_id: String,
    #[serde(rename = "createdAt")]
    created_at: DateTime<Utc>,
}

/// Room store backed by the hosted REST API.
#[derive(Debug, Clone)]
pub struct RestRoomStore {
    client: reqwest::Client,
    base_url: String,
    app_id: String,
    app_key: String,
}

impl RestRoomStore {
    /// Creates a store from configuration. Every request carries the
    /// configured timeout; an elapsed timeout surfaces as a recoverable
    /// [`StoreError`].
    #[instrument(skip(config), fields(base_url = %config.base_url()))]
    pub fn new(config: &StoreConfig) -> Result<Self, StoreError> {
        info!(timeout_secs = *config.timeout_secs(), "Creating REST room store");
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(*config.timeout_secs()))
            .build()?;
        Ok(Self {
            client,
            base_url: config.base_url().clone(),
            app_id: config.app_id().clone(),
            app_key: config.app_key().clone(),
        })
    }

    fn record_url(&self, object_id: &str) -> String {
        format!("{}/{}", self.base_url, object_id)
    }

    /// Runs a filtered query for `room_id`, newest first.
    async fn query(&self, room_id: &str, limit: Option<u32>) -> Result<Vec<RoomRecord>, StoreError> {
        let where_clause = serde_json::json!({ "room_id": room_id }).to_string();
        let mut request = self
            .client
            .get(&self.base_url)
            .header("X-LC-Id", &self.app_id)
            .header("X-LC-Key", &self.app_key)
            .query(&[("where", where_clause.as_str()), ("order", "-createdAt")]);
        if let Some(limit) = limit {
            request = request.query(&[("limit", limit.to_string().as_str())]);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(%status, body = %body, "Query failed");
            return Err(StoreError::new(format!("Query failed: {status} - {body}")));
        }

        let parsed: QueryResponse = response.json().await?;
        debug!(room_id, count = parsed.results.len(), "Query results");
        Ok(parsed.results)
    }
}

#[async_trait]
impl RoomStore for RestRoomStore {
    #[instrument(skip(self))]
    async fn find(&self, room_id: &str) -> Result<Option<RoomRecord>, StoreError> {
        let mut results = self.query(room_id, Some(1)).await?;
        Ok(if results.is_empty() {
            None
        } else {
            Some(results.remove(0))
        })
    }

    #[instrument(skip(self))]
    async fn find_all(&self, room_id: &str) -> Result<Vec<RoomRecord>, StoreError> {
        self.query(room_id, None).await
    }

    #[instrument(skip(self, room), fields(room_id = %room.room_id))]
    async fn create(&self, room: NewRoom) -> Result<RoomRecord, StoreError> {
        info!("Creating room record");
        let response = self
            .client
            .post(&self.base_url)
            .header("X-LC-Id", &self.app_id)
            .header("X-LC-Key", &self.app_key)
            .json(&room)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(%status, body = %body, "Create failed");
            return Err(StoreError::new(format!("Create failed: {status} - {body}")));
        }

        let created: CreateResponse = response.json().await?;
        info!(object_id = %created.object_id, "Room record created");
        Ok(room.into_record(created.object_id, created.created_at))
    }

    #[instrument(skip(self, patch))]
    async fn update(&self, object_id: &str, patch: &RoomPatch) -> Result<(), StoreError> {
        debug!("Updating room record");
        let response = self
            .client
            .put(self.record_url(object_id))
            .header("X-LC-Id", &self.app_id)
            .header("X-LC-Key", &self.app_key)
            .json(patch)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(%status, body = %body, "Update failed");
            return Err(StoreError::new(format!("Update failed: {status} - {body}")));
        }
        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete(&self, object_id: &str) -> Result<(), StoreError> {
        info!("Deleting room record");
        let response = self
            .client
            .delete(self.record_url(object_id))
            .header("X-LC-Id", &self.app_id)
            .header("X-LC-Key", &self.app_key)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(%status, body = %body, "Delete failed");
            return Err(StoreError::new(format!("Delete failed: {status} - {body}")));
        }
        Ok(())
    }
}
