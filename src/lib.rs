//! Tic-Tac-Toe Rooms - two-player tic-tac-toe over a shared cloud record
//!
//! Two independent clients play through one remote key-value record per
//! room. There is no push synchronization: each client caches the record
//! and reconciles against the remote copy on explicit refresh.
//!
//! # Architecture
//!
//! - **Game**: pure board types, win evaluation and move application
//! - **Store**: narrow create/read/update/delete seam over the remote
//!   record, with REST and in-memory backends
//! - **Session**: per-client state machine binding a device identity to
//!   a room (enter, restore, leave, force-clean, play, restart)
//!
//! # Example
//!
//! ```no_run
//! use tictactoe_rooms::{RestRoomStore, RoomSession, StoreConfig};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let config = StoreConfig::from_env()?;
//! let store = RestRoomStore::new(&config)?;
//!
//! let mut session = RoomSession::new(store);
//! let mark = session.enter("8888").await?;
//! println!("Playing as {mark}");
//!
//! let report = session.play(4).await?;
//! assert!(report.synced());
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// Private module declarations
mod config;
mod game;
mod identity;
mod session;
mod store;

// Crate-level exports - Configuration
pub use config::{ConfigError, StoreConfig};

// Crate-level exports - Game core
pub use game::{
    Board, Cell, LINES, Mark, MoveError, MoveOutcome, RoomState, Verdict, apply_move, evaluate,
    restart,
};

// Crate-level exports - Device identity
pub use identity::DeviceId;

// Crate-level exports - Session
pub use session::{EnteredRoom, MoveReport, RoomSession, SessionError};

// Crate-level exports - Store
pub use store::{
    MemoryRoomStore, NewRoom, PlayerMap, RestRoomStore, RoomPatch, RoomRecord, RoomStore,
    StoreError,
};
