//! Outcome evaluation over a board snapshot.

mod draw;
mod win;

pub use draw::is_full;
pub use win::{LINES, Line, check_winner};

use crate::types::{Board, Mark};
use serde::{Deserialize, Serialize};

/// Result of evaluating a board snapshot.
///
/// Outcomes are always derived from the board, never stored independently
/// of it; the session re-evaluates after every placement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    /// No line is complete and empty squares remain.
    InProgress,
    /// A line is fully occupied by one mark.
    Won {
        /// The mark owning the completed line.
        winner: Mark,
        /// The completed line.
        line: Line,
    },
    /// The board is full with no winner.
    Draw,
}

impl Outcome {
    /// Returns true if no further moves are possible.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Outcome::InProgress)
    }
}

/// Evaluates a board snapshot.
///
/// Checks the 8 lines in fixed order and reports the first completed one
/// (only one line can be complete in a reachable state); a full board with
/// no completed line is a draw. Pure and deterministic.
pub fn evaluate(board: &Board) -> Outcome {
    if let Some((winner, line)) = check_winner(board) {
        return Outcome::Won { winner, line };
    }
    if is_full(board) {
        return Outcome::Draw;
    }
    Outcome::InProgress
}
