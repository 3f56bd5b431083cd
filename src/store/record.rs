//! Wire model for the remote room record.

use crate::game::{Board, Mark, RoomState, Verdict};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Device-id to mark assignments for a room. At most 2 entries, marks
/// unique; stored in the record rather than derived.
pub type PlayerMap = HashMap<String, Mark>;

/// A room record as the remote store returns it.
///
/// The remote copy is the single source of truth; clients cache one of
/// these and refresh explicitly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoomRecord {
    /// Room code this record belongs to (e.g. `"8888"`).
    pub room_id: String,
    /// Board, turn and outcome.
    #[serde(flatten)]
    pub state: RoomState,
    /// Player assignments.
    #[serde(default)]
    pub players: PlayerMap,
    /// Store-assigned record identifier, used for update/delete.
    #[serde(rename = "objectId")]
    pub object_id: String,
    /// Store-assigned creation time; `find` prefers the newest record.
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
}

/// Payload for creating a room record. The store assigns `objectId` and
/// `createdAt` and returns them from `create`.
#[derive(Debug, Clone, Serialize)]
pub struct NewRoom {
    /// Room code.
    pub room_id: String,
    /// Initial game state.
    #[serde(flatten)]
    pub state: RoomState,
    /// Initial player assignments.
    pub players: PlayerMap,
}

impl NewRoom {
    /// Initial record for a first join: fresh game, creator assigned X.
    pub fn first_join(room_id: &str, device_id: &str) -> Self {
        Self {
            room_id: room_id.to_string(),
            state: RoomState::new(),
            players: PlayerMap::from([(device_id.to_string(), Mark::X)]),
        }
    }

    /// Completes this payload into a record using the store-assigned ids.
    pub fn into_record(self, object_id: String, created_at: DateTime<Utc>) -> RoomRecord {
        RoomRecord {
            room_id: self.room_id,
            state: self.state,
            players: self.players,
            object_id,
            created_at,
        }
    }
}

/// Partial update of a room record.
///
/// Fields left as outer `None` are not sent and the store leaves them
/// unchanged. The nullable fields use a double `Option`: `Some(None)`
/// writes an explicit `null` (a terminal move clears `current_player`).
#[derive(Debug, Clone, Default, Serialize)]
pub struct RoomPatch {
    /// Replacement board.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub board: Option<Board>,
    /// Replacement turn holder, `Some(None)` to clear.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_player: Option<Option<Mark>>,
    /// Replacement game-over flag.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub game_over: Option<bool>,
    /// Replacement outcome, `Some(None)` to clear.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub winner: Option<Option<Verdict>>,
    /// Replacement player assignments.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub players: Option<PlayerMap>,
}

impl RoomPatch {
    /// Patch writing the full game state (board, turn, over-flag,
    /// outcome), as a move or restart persists it.
    pub fn for_state(state: &RoomState) -> Self {
        Self {
            board: Some(state.board.clone()),
            current_player: Some(state.current_player),
            game_over: Some(state.game_over),
            winner: Some(state.winner),
            players: None,
        }
    }

    /// Patch writing only the player assignments, as join and leave do.
    pub fn for_players(players: PlayerMap) -> Self {
        Self {
            players: Some(players),
            ..Self::default()
        }
    }

    /// Merges this patch into a record, mirroring the remote store's
    /// partial-update semantics. Used by the in-memory backend.
    pub(crate) fn apply_to(&self, record: &mut RoomRecord) {
        if let Some(board) = &self.board {
            record.state.board = board.clone();
        }
        if let Some(current_player) = self.current_player {
            record.state.current_player = current_player;
        }
        if let Some(game_over) = self.game_over {
            record.state.game_over = game_over;
        }
        if let Some(winner) = self.winner {
            record.state.winner = winner;
        }
        if let Some(players) = &self.players {
            record.players = players.clone();
        }
    }
}
