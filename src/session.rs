//! Per-client room session: reconciles a local view with the shared
//! remote record.
//!
//! A session is either outside any room or attached to one. Attachment
//! caches a copy of the remote record; the remote copy stays
//! authoritative, and the cache is only refreshed on an explicit
//! [`RoomSession::restore`]. There is no push channel and no locking
//! around the shared record: two clients can read the same turn and race
//! their writes, in which case the last writer wins and the earlier move
//! is silently overwritten. That lost-update race is an accepted
//! limitation of the record protocol, not something this module detects.

use crate::game::{self, Mark, MoveError, MoveOutcome, RoomState};
use crate::identity::DeviceId;
use crate::store::{NewRoom, PlayerMap, RoomPatch, RoomRecord, RoomStore, StoreError};
use derive_more::{Display, Error, From};
use tracing::{debug, info, instrument, warn};

/// Session failure taxonomy.
#[derive(Debug, Display, Error, From)]
pub enum SessionError {
    /// Operation requires being in a room.
    #[display("not in a room")]
    NotEntered,
    /// Room already has two players and this device is neither.
    #[display("room is full (2 players)")]
    RoomFull,
    /// The remote room record no longer exists.
    #[display("room no longer exists")]
    RoomMissing,
    /// This device is no longer listed among the room's players.
    #[display("this device is not a member of the room")]
    NotAMember,
    /// The join write did not land: the verifying re-read came back
    /// without this device.
    #[display("join was not confirmed by the store")]
    JoinNotConfirmed,
    /// A game-rule violation.
    #[display("invalid move: {_0}")]
    #[from]
    Move(MoveError),
    /// A remote store call failed.
    #[display("store failure: {_0}")]
    #[from]
    Store(StoreError),
}

/// Cached view of the room a session is attached to.
#[derive(Debug, Clone)]
pub struct EnteredRoom {
    /// Room code.
    pub room_id: String,
    /// Store-assigned record id, used for writes.
    pub object_id: String,
    /// Mark assigned to this device.
    pub mark: Mark,
    /// Cached game state; stale until the next restore.
    pub state: RoomState,
    /// Cached player assignments.
    pub players: PlayerMap,
}

enum SessionState {
    NotEntered,
    Entered(EnteredRoom),
}

/// Result of an accepted move or restart.
///
/// Persistence is optimistic: the local state keeps the move even when
/// the remote write fails, and the failure is carried here instead of
/// rolling back.
#[derive(Debug)]
pub struct MoveReport {
    /// What the move produced locally.
    pub outcome: MoveOutcome,
    /// Store failure while persisting, if any.
    pub sync_error: Option<StoreError>,
}

impl MoveReport {
    /// Whether the remote write landed.
    pub fn synced(&self) -> bool {
        self.sync_error.is_none()
    }
}

/// Per-client session over a [`RoomStore`].
pub struct RoomSession<S: RoomStore> {
    store: S,
    device: DeviceId,
    state: SessionState,
}

impl<S: RoomStore> RoomSession<S> {
    /// Creates a session with a freshly generated device identity.
    pub fn new(store: S) -> Self {
        Self::with_device(store, DeviceId::generate())
    }

    /// Creates a session with an explicit device identity.
    pub fn with_device(store: S, device: DeviceId) -> Self {
        info!(device_id = %device, "Creating room session");
        Self {
            store,
            device,
            state: SessionState::NotEntered,
        }
    }

    /// This client's device identity.
    pub fn device(&self) -> &DeviceId {
        &self.device
    }

    /// The attached room, if any.
    pub fn room(&self) -> Option<&EnteredRoom> {
        match &self.state {
            SessionState::Entered(room) => Some(room),
            SessionState::NotEntered => None,
        }
    }

    /// Whether the session is attached to a room.
    pub fn is_entered(&self) -> bool {
        self.room().is_some()
    }

    /// Enters a room, creating it if absent.
    ///
    /// First device in becomes X; a second device is assigned O, with the
    /// membership write verified by a re-read before the join counts
    /// (the store offers no conditional write, so commit-then-verify is
    /// the compensation). A device already listed re-attaches without
    /// mutating the record. A third device is rejected and the session
    /// stays outside the room.
    ///
    /// Marks are assigned by join order, not by vacancy: a later joiner
    /// always gets O, so if X left earlier the room can hold two O's.
    #[instrument(skip(self), fields(device_id = %self.device))]
    pub async fn enter(&mut self, room_id: &str) -> Result<Mark, SessionError> {
        match self.store.find(room_id).await? {
            None => {
                info!(room_id, "No room record, creating as X");
                let record = self
                    .store
                    .create(NewRoom::first_join(room_id, self.device.as_str()))
                    .await?;
                self.attach(record, Mark::X);
                Ok(Mark::X)
            }
            Some(record) => {
                if let Some(mark) = record.players.get(self.device.as_str()).copied() {
                    info!(room_id, %mark, "Already a member, re-attaching");
                    self.attach(record, mark);
                    Ok(mark)
                } else if record.players.len() < 2 {
                    info!(room_id, "Joining as O");
                    let mut players = record.players.clone();
                    players.insert(self.device.to_string(), Mark::O);
                    self.store
                        .update(&record.object_id, &RoomPatch::for_players(players))
                        .await?;

                    // Commit-then-verify: re-read and require our entry
                    // before declaring the join successful.
                    let verified = self
                        .store
                        .find(room_id)
                        .await?
                        .filter(|r| r.players.contains_key(self.device.as_str()))
                        .ok_or(SessionError::JoinNotConfirmed)?;

                    info!(room_id, object_id = %verified.object_id, "Join confirmed");
                    self.attach(verified, Mark::O);
                    Ok(Mark::O)
                } else {
                    warn!(room_id, "Room is full");
                    Err(SessionError::RoomFull)
                }
            }
        }
    }

    /// Refreshes the cached room from the remote copy.
    ///
    /// Membership is remote-authoritative: if the record is gone or this
    /// device is no longer listed, the session is forced back outside the
    /// room and the reason is returned.
    #[instrument(skip(self), fields(device_id = %self.device))]
    pub async fn restore(&mut self) -> Result<(), SessionError> {
        let room_id = match &self.state {
            SessionState::Entered(room) => room.room_id.clone(),
            SessionState::NotEntered => return Err(SessionError::NotEntered),
        };

        match self.store.find(&room_id).await? {
            None => {
                warn!(room_id, "Room record gone, leaving session");
                self.state = SessionState::NotEntered;
                Err(SessionError::RoomMissing)
            }
            Some(record) => match record.players.get(self.device.as_str()).copied() {
                Some(mark) => {
                    debug!(room_id, "Refreshed from remote record");
                    self.attach(record, mark);
                    Ok(())
                }
                None => {
                    warn!(room_id, "Device no longer a member, leaving session");
                    self.state = SessionState::NotEntered;
                    Err(SessionError::NotAMember)
                }
            },
        }
    }

    /// Leaves the room: removes this device from the players mapping
    /// (best effort — a failed remote write is logged, not raised) and
    /// detaches locally. The room record itself is never deleted here,
    /// even when it becomes empty.
    #[instrument(skip(self), fields(device_id = %self.device))]
    pub async fn leave(&mut self) -> Result<(), SessionError> {
        let room_id = match &self.state {
            SessionState::Entered(room) => room.room_id.clone(),
            SessionState::NotEntered => return Err(SessionError::NotEntered),
        };

        match self.store.find(&room_id).await {
            Ok(Some(record)) => {
                let mut players = record.players.clone();
                if players.remove(self.device.as_str()).is_some() {
                    if let Err(e) = self
                        .store
                        .update(&record.object_id, &RoomPatch::for_players(players))
                        .await
                    {
                        warn!(error = %e, "Leave not persisted, detaching anyway");
                    } else {
                        info!(room_id, "Left room");
                    }
                }
            }
            Ok(None) => debug!(room_id, "Room already gone"),
            Err(e) => warn!(error = %e, "Could not load room while leaving"),
        }

        self.state = SessionState::NotEntered;
        Ok(())
    }

    /// Administrative cleanup: deletes every record for the room,
    /// regardless of state or membership. Returns how many were removed.
    /// Detaches if the session was inside that room.
    #[instrument(skip(self))]
    pub async fn force_clean(&mut self, room_id: &str) -> Result<usize, SessionError> {
        let records = self.store.find_all(room_id).await?;
        let count = records.len();
        for record in records {
            self.store.delete(&record.object_id).await?;
        }
        info!(room_id, count, "Force-cleaned room records");

        if let SessionState::Entered(room) = &self.state
            && room.room_id == room_id
        {
            self.state = SessionState::NotEntered;
        }
        Ok(count)
    }

    /// Plays this device's mark at `cell` and persists the result.
    ///
    /// Rule violations reject the move with no effect. An accepted move
    /// is applied locally first and kept even if the remote write then
    /// fails; the failure is reported in the [`MoveReport`].
    #[instrument(skip(self), fields(device_id = %self.device))]
    pub async fn play(&mut self, cell: usize) -> Result<MoveReport, SessionError> {
        let SessionState::Entered(room) = &mut self.state else {
            return Err(SessionError::NotEntered);
        };

        let outcome = game::apply_move(&mut room.state, cell, room.mark)?;
        let patch = RoomPatch::for_state(&room.state);
        let object_id = room.object_id.clone();

        let sync_error = match self.store.update(&object_id, &patch).await {
            Ok(()) => None,
            Err(e) => {
                warn!(error = %e, "Move kept locally, remote sync failed");
                Some(e)
            }
        };

        Ok(MoveReport { outcome, sync_error })
    }

    /// Restarts a finished game and persists the reset, with the same
    /// optimistic policy as [`RoomSession::play`]. Returns the sync
    /// failure, if any.
    #[instrument(skip(self), fields(device_id = %self.device))]
    pub async fn restart(&mut self) -> Result<Option<StoreError>, SessionError> {
        let SessionState::Entered(room) = &mut self.state else {
            return Err(SessionError::NotEntered);
        };

        game::restart(&mut room.state)?;
        let patch = RoomPatch::for_state(&room.state);
        let object_id = room.object_id.clone();

        match self.store.update(&object_id, &patch).await {
            Ok(()) => {
                info!("Restart persisted");
                Ok(None)
            }
            Err(e) => {
                warn!(error = %e, "Restart kept locally, remote sync failed");
                Ok(Some(e))
            }
        }
    }

    fn attach(&mut self, record: RoomRecord, mark: Mark) {
        self.state = SessionState::Entered(EnteredRoom {
            room_id: record.room_id,
            object_id: record.object_id,
            mark,
            state: record.state,
            players: record.players,
        });
    }
}
