//! Pure game core: board types, win evaluation, move application.

mod controller;
mod rules;
mod types;

pub use controller::{MoveError, MoveOutcome, apply_move, restart};
pub use rules::{LINES, evaluate};
pub use types::{Board, Cell, Mark, RoomState, Verdict};
