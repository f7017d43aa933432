//! Optimal move selection via exhaustive minimax search.

use crate::position::Position;
use crate::rules::{Outcome, evaluate};
use crate::types::{Board, Mark, Square};
use tracing::{debug, instrument};

/// Error raised when the engine is invoked outside its contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display)]
pub enum EngineError {
    /// The board is already decided or full; there is no move to select.
    ///
    /// Correct session discipline never invokes the engine in this state,
    /// so callers should treat this as a programming error rather than
    /// attempt recovery.
    #[display("Move engine invoked on a terminal board")]
    TerminalBoard,
}

impl std::error::Error for EngineError {}

/// Selects the game-theoretically optimal move for `engine_mark`.
///
/// Every empty position is scored by exhaustive minimax over the remaining
/// game tree; the first position (in board index order) achieving the
/// maximum score is returned, so repeated calls on the same board always
/// pick the same move. The returned move is never losing when a non-losing
/// move exists, and converts a forced win whenever one exists.
///
/// # Errors
///
/// Returns [`EngineError::TerminalBoard`] if the board is already won,
/// lost or full.
#[instrument(skip(board))]
pub fn select_move(board: &Board, engine_mark: Mark) -> Result<Position, EngineError> {
    if evaluate(board).is_terminal() {
        return Err(EngineError::TerminalBoard);
    }

    // The search mutates a scratch copy in place and undoes each placement
    // after scoring it, keeping the caller's board untouched.
    let mut scratch = board.clone();
    let mut best: Option<(Position, i32)> = None;

    for pos in Position::valid_moves(board) {
        scratch.set(pos, Square::Occupied(engine_mark));
        let score = minimax(&mut scratch, engine_mark, 0, false);
        scratch.clear(pos);

        if best.is_none_or(|(_, best_score)| score > best_score) {
            best = Some((pos, score));
        }
    }

    let (pos, score) = best.ok_or(EngineError::TerminalBoard)?;
    debug!(position = ?pos, score, "Selected engine move");
    Ok(pos)
}

/// Scores a board position from the engine's perspective.
///
/// Terminal scores are depth-adjusted: an engine win is worth `10 - depth`
/// and a loss `depth - 10`, so the search prefers the fastest win and the
/// most delayed loss. Draws score zero.
fn minimax(board: &mut Board, engine_mark: Mark, depth: i32, maximizing: bool) -> i32 {
    match evaluate(board) {
        Outcome::Won { winner, .. } => {
            return if winner == engine_mark {
                10 - depth
            } else {
                depth - 10
            };
        }
        Outcome::Draw => return 0,
        Outcome::InProgress => {}
    }

    let to_place = if maximizing {
        engine_mark
    } else {
        engine_mark.opponent()
    };
    let mut best = if maximizing { i32::MIN } else { i32::MAX };

    for pos in Position::ALL {
        if !board.is_empty(pos) {
            continue;
        }
        board.set(pos, Square::Occupied(to_place));
        let score = minimax(board, engine_mark, depth + 1, !maximizing);
        board.clear(pos);
        best = if maximizing {
            best.max(score)
        } else {
            best.min(score)
        };
    }

    best
}
