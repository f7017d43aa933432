//! First-class move types for tic-tac-toe.

use crate::position::Position;
use crate::types::Mark;
use serde::{Deserialize, Serialize};

/// A move: a mark placed at a position.
///
/// Moves are domain events. The session validates them before execution
/// and the driver republishes accepted ones to subscribers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Move {
    /// The mark being placed.
    pub mark: Mark,
    /// The position where the mark lands.
    pub position: Position,
}

impl Move {
    /// Creates a new move.
    pub fn new(mark: Mark, position: Position) -> Self {
        Self { mark, position }
    }
}

impl std::fmt::Display for Move {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} -> {}", self.mark, self.position.label())
    }
}

/// Error raised when a placement request cannot be accepted.
///
/// All variants are recoverable: the session state is left untouched and
/// the driver rejects them silently rather than surfacing a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display)]
pub enum MoveError {
    /// The square at the position is already occupied.
    #[display("Square {:?} is already occupied", _0)]
    SquareOccupied(Position),

    /// The game is already over.
    #[display("Game is already over")]
    GameOver,

    /// Human input arrived while the computer's move is pending.
    #[display("It's the computer's turn")]
    ComputersTurn,
}

impl std::error::Error for MoveError {}
