//! Core domain types for the shared tic-tac-toe room.

use serde::{Deserialize, Serialize};

/// A player's mark.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
pub enum Mark {
    /// Player X (goes first).
    X,
    /// Player O (goes second).
    O,
}

impl Mark {
    /// Returns the opposing mark.
    pub fn opponent(self) -> Self {
        match self {
            Mark::X => Mark::O,
            Mark::O => Mark::X,
        }
    }
}

/// A single cell on the board.
///
/// Serializes to the remote record's string form: `""`, `"X"` or `"O"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum Cell {
    /// Empty cell.
    Empty,
    /// Cell taken by a mark.
    Taken(Mark),
}

impl From<Cell> for String {
    fn from(cell: Cell) -> Self {
        match cell {
            Cell::Empty => String::new(),
            Cell::Taken(mark) => mark.to_string(),
        }
    }
}

impl TryFrom<String> for Cell {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.as_str() {
            "" => Ok(Cell::Empty),
            "X" => Ok(Cell::Taken(Mark::X)),
            "O" => Ok(Cell::Taken(Mark::O)),
            other => Err(format!("invalid cell value: {other:?}")),
        }
    }
}

/// 3x3 board, cells in row-major order.
///
/// Serializes to a JSON array of 9 strings, matching the remote record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Board {
    cells: [Cell; 9],
}

impl Board {
    /// Creates a new empty board.
    pub fn new() -> Self {
        Self {
            cells: [Cell::Empty; 9],
        }
    }

    /// Gets the cell at the given index (0-8).
    pub fn get(&self, pos: usize) -> Option<Cell> {
        self.cells.get(pos).copied()
    }

    /// Sets the cell at the given index.
    pub fn set(&mut self, pos: usize, cell: Cell) -> Result<(), &'static str> {
        if pos >= 9 {
            return Err("Cell index out of bounds");
        }
        self.cells[pos] = cell;
        Ok(())
    }

    /// Checks whether the cell at the given index is empty.
    pub fn is_empty(&self, pos: usize) -> bool {
        matches!(self.get(pos), Some(Cell::Empty))
    }

    /// Checks whether every cell is taken.
    pub fn is_full(&self) -> bool {
        self.cells.iter().all(|c| *c != Cell::Empty)
    }

    /// Returns all cells as a slice.
    pub fn cells(&self) -> &[Cell; 9] {
        &self.cells
    }

    /// Formats the board as a human-readable grid.
    ///
    /// Empty cells show their index so a player knows what to type.
    pub fn display(&self) -> String {
        let mut result = String::new();
        for row in 0..3 {
            for col in 0..3 {
                let pos = row * 3 + col;
                let symbol = match self.cells[pos] {
                    Cell::Empty => pos.to_string(),
                    Cell::Taken(mark) => mark.to_string(),
                };
                result.push_str(&symbol);
                if col < 2 {
                    result.push('|');
                }
            }
            if row < 2 {
                result.push_str("\n-+-+-\n");
            }
        }
        result
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

/// Final outcome of a finished game.
///
/// Serializes to the remote record's string form: `"X"`, `"O"` or `"Draw"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum Verdict {
    /// The given mark completed a line.
    Winner(Mark),
    /// Full board, no winner.
    Draw,
}

impl From<Verdict> for String {
    fn from(verdict: Verdict) -> Self {
        match verdict {
            Verdict::Winner(mark) => mark.to_string(),
            Verdict::Draw => "Draw".to_string(),
        }
    }
}

impl TryFrom<String> for Verdict {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.as_str() {
            "X" => Ok(Verdict::Winner(Mark::X)),
            "O" => Ok(Verdict::Winner(Mark::O)),
            "Draw" => Ok(Verdict::Draw),
            other => Err(format!("invalid verdict value: {other:?}")),
        }
    }
}

impl std::fmt::Display for Verdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Verdict::Winner(mark) => write!(f, "{mark} wins"),
            Verdict::Draw => write!(f, "Draw"),
        }
    }
}

/// The game portion of a room record: board, turn and outcome.
///
/// `current_player` is `None` only in a terminal state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomState {
    /// The board.
    pub board: Board,
    /// Mark whose turn it is; `None` once the game is over.
    pub current_player: Option<Mark>,
    /// Whether the game has finished.
    pub game_over: bool,
    /// Outcome, present once the game is over.
    pub winner: Option<Verdict>,
}

impl RoomState {
    /// Creates a fresh game: empty board, X to move.
    pub fn new() -> Self {
        Self {
            board: Board::new(),
            current_player: Some(Mark::X),
            game_over: false,
            winner: None,
        }
    }
}

impl Default for RoomState {
    fn default() -> Self {
        Self::new()
    }
}
