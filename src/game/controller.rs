//! Move application and restart over a [`RoomState`].

use super::rules;
use super::types::{Cell, Mark, RoomState, Verdict};
use derive_more::{Display, Error};
use tracing::{info, instrument, warn};

/// Reasons a move or restart is rejected. Rejection leaves the state
/// untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Error)]
pub enum MoveError {
    /// The game has already finished.
    #[display("game is already over")]
    GameOver,
    /// Cell index outside 0-8.
    #[display("cell index out of bounds (must be 0-8)")]
    OutOfBounds,
    /// Target cell already holds a mark.
    #[display("cell is already taken")]
    CellOccupied,
    /// The acting mark is not the current player.
    #[display("not your turn")]
    OutOfTurn,
    /// Restart requested while the game is still running.
    #[display("game is not over yet")]
    GameNotOver,
}

/// What an accepted move produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveOutcome {
    /// Game continues; the given mark moves next.
    NextTurn(Mark),
    /// Game finished with the given verdict.
    Finished(Verdict),
}

/// Applies a move for `mark` at `cell`.
///
/// All preconditions must hold or the move is rejected with no effect:
/// the game is not over, the cell is in range and empty, and `mark` is
/// the current player. On success exactly one cell changes; a terminal
/// move sets `game_over`, records the winner and clears the turn,
/// otherwise the turn alternates.
#[instrument(skip(state))]
pub fn apply_move(
    state: &mut RoomState,
    cell: usize,
    mark: Mark,
) -> Result<MoveOutcome, MoveError> {
    if state.game_over {
        return Err(MoveError::GameOver);
    }
    if cell >= 9 {
        return Err(MoveError::OutOfBounds);
    }
    if !state.board.is_empty(cell) {
        return Err(MoveError::CellOccupied);
    }
    if state.current_player != Some(mark) {
        warn!(?mark, current = ?state.current_player, "Move out of turn");
        return Err(MoveError::OutOfTurn);
    }

    state
        .board
        .set(cell, Cell::Taken(mark))
        .map_err(|_| MoveError::OutOfBounds)?;

    match rules::evaluate(&state.board) {
        Some(verdict) => {
            state.game_over = true;
            state.winner = Some(verdict);
            state.current_player = None;
            info!(%verdict, "Game finished");
            Ok(MoveOutcome::Finished(verdict))
        }
        None => {
            let next = mark.opponent();
            state.current_player = Some(next);
            Ok(MoveOutcome::NextTurn(next))
        }
    }
}

/// Resets a finished game: empty board, X to move, no winner.
///
/// Only permitted once `game_over` is set.
#[instrument(skip(state))]
pub fn restart(state: &mut RoomState) -> Result<(), MoveError> {
    if !state.game_over {
        return Err(MoveError::GameNotOver);
    }
    *state = RoomState::new();
    info!("Game restarted");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_move_alternates_to_o() {
        let mut state = RoomState::new();
        let outcome = apply_move(&mut state, 4, Mark::X).unwrap();
        assert_eq!(outcome, MoveOutcome::NextTurn(Mark::O));
        assert_eq!(state.current_player, Some(Mark::O));
        assert!(!state.game_over);
    }

    #[test]
    fn test_occupied_cell_rejected_without_change() {
        let mut state = RoomState::new();
        apply_move(&mut state, 4, Mark::X).unwrap();
        let before = state.clone();
        assert_eq!(
            apply_move(&mut state, 4, Mark::O),
            Err(MoveError::CellOccupied)
        );
        assert_eq!(state, before);
    }

    #[test]
    fn test_out_of_turn_rejected_without_change() {
        let mut state = RoomState::new();
        let before = state.clone();
        assert_eq!(apply_move(&mut state, 0, Mark::O), Err(MoveError::OutOfTurn));
        assert_eq!(state, before);
    }

    #[test]
    fn test_out_of_bounds_rejected() {
        let mut state = RoomState::new();
        assert_eq!(
            apply_move(&mut state, 9, Mark::X),
            Err(MoveError::OutOfBounds)
        );
    }

    #[test]
    fn test_winning_move_is_terminal() {
        let mut state = RoomState::new();
        // X: 0, 1, 2 wins; O: 3, 4 in between.
        apply_move(&mut state, 0, Mark::X).unwrap();
        apply_move(&mut state, 3, Mark::O).unwrap();
        apply_move(&mut state, 1, Mark::X).unwrap();
        apply_move(&mut state, 4, Mark::O).unwrap();
        let outcome = apply_move(&mut state, 2, Mark::X).unwrap();

        assert_eq!(outcome, MoveOutcome::Finished(Verdict::Winner(Mark::X)));
        assert!(state.game_over);
        assert_eq!(state.winner, Some(Verdict::Winner(Mark::X)));
        assert_eq!(state.current_player, None);
    }

    #[test]
    fn test_no_moves_after_game_over() {
        let mut state = RoomState::new();
        for (cell, mark) in [(0, Mark::X), (3, Mark::O), (1, Mark::X), (4, Mark::O)] {
            apply_move(&mut state, cell, mark).unwrap();
        }
        apply_move(&mut state, 2, Mark::X).unwrap();
        let before = state.clone();
        assert_eq!(apply_move(&mut state, 5, Mark::O), Err(MoveError::GameOver));
        assert_eq!(state, before);
    }

    #[test]
    fn test_draw_game() {
        let mut state = RoomState::new();
        // X O X / O X X / O X O, played in a legal order ending full.
        let moves = [
            (0, Mark::X),
            (1, Mark::O),
            (2, Mark::X),
            (3, Mark::O),
            (4, Mark::X),
            (6, Mark::O),
            (5, Mark::X),
            (8, Mark::O),
            (7, Mark::X),
        ];
        let mut last = None;
        for (cell, mark) in moves {
            last = Some(apply_move(&mut state, cell, mark).unwrap());
        }
        assert_eq!(last, Some(MoveOutcome::Finished(Verdict::Draw)));
        assert_eq!(state.winner, Some(Verdict::Draw));
        assert_eq!(state.current_player, None);
    }

    #[test]
    fn test_restart_requires_game_over() {
        let mut state = RoomState::new();
        assert_eq!(restart(&mut state), Err(MoveError::GameNotOver));

        apply_move(&mut state, 0, Mark::X).unwrap();
        assert_eq!(restart(&mut state), Err(MoveError::GameNotOver));
    }

    #[test]
    fn test_restart_resets_finished_game() {
        let mut state = RoomState::new();
        for (cell, mark) in [
            (0, Mark::X),
            (3, Mark::O),
            (1, Mark::X),
            (4, Mark::O),
            (2, Mark::X),
        ] {
            apply_move(&mut state, cell, mark).unwrap();
        }
        assert!(state.game_over);

        restart(&mut state).unwrap();
        assert_eq!(state, RoomState::new());
        assert_eq!(state.current_player, Some(Mark::X));
    }
}
