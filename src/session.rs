//! Game session state machine.
//!
//! A [`Session`] sequences turns for one board, applies the outcome
//! evaluator after every accepted placement, credits the scoreboard on
//! terminal transitions, and handles mode toggling and resets. It is a
//! synchronous state machine; the async orchestration (deferred computer
//! moves, event push) lives in [`crate::driver`].

use crate::action::MoveError;
use crate::position::Position;
use crate::rules::{Line, Outcome, evaluate};
use crate::scores::ScoreBoard;
use crate::types::{Board, Mark, Square};
use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

/// Game mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Mode {
    /// Single-player: X is human, O is the automated engine.
    VsComputer,
    /// Two-player: both marks are placed by humans.
    TwoPlayer,
}

impl Mode {
    /// Returns the other mode.
    pub fn toggled(self) -> Self {
        match self {
            Mode::VsComputer => Mode::TwoPlayer,
            Mode::TwoPlayer => Mode::VsComputer,
        }
    }
}

/// Externally visible phase of the session state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    /// A move is awaited from the given mark.
    AwaitingMove(Mark),
    /// The game has ended. Absorbing until an explicit reset.
    Terminal(Outcome),
}

/// Snapshot of session state for the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
pub struct SessionStatus {
    /// The board at snapshot time.
    board: Board,
    /// Current phase: turn owner or terminal outcome.
    phase: Phase,
    /// Active game mode.
    mode: Mode,
    /// The completed line, if the game was won.
    winning_line: Option<Line>,
    /// Cumulative scores for both modes.
    scores: ScoreBoard,
}

/// A single game session: board, turn state, mode and scores.
///
/// Created with an empty board and X to move. Placements, mode toggles and
/// resets are the only mutation points; every accepted placement re-derives
/// the outcome from the board.
#[derive(Debug, Clone)]
pub struct Session {
    board: Board,
    to_move: Mark,
    mode: Mode,
    outcome: Outcome,
    scores: ScoreBoard,
    generation: u64,
}

impl Session {
    /// Creates a new single-player session with an empty board, X to move.
    #[instrument]
    pub fn new() -> Self {
        Self::with_mode(Mode::VsComputer)
    }

    /// Creates a new session in the given mode.
    #[instrument]
    pub fn with_mode(mode: Mode) -> Self {
        info!(?mode, "Creating new game session");
        Self {
            board: Board::new(),
            to_move: Mark::X,
            mode,
            outcome: Outcome::InProgress,
            scores: ScoreBoard::new(),
            generation: 0,
        }
    }

    /// Returns the board.
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Returns the mark whose move is awaited.
    ///
    /// After a terminal transition this stays at the mark that ended the
    /// game; check [`Session::phase`] before treating it as a turn owner.
    pub fn to_move(&self) -> Mark {
        self.to_move
    }

    /// Returns the active game mode.
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Returns the last evaluated outcome.
    pub fn outcome(&self) -> Outcome {
        self.outcome
    }

    /// Returns the cumulative scores.
    pub fn scores(&self) -> &ScoreBoard {
        &self.scores
    }

    /// Returns the completed line if the game was won.
    pub fn winning_line(&self) -> Option<Line> {
        match self.outcome {
            Outcome::Won { line, .. } => Some(line),
            _ => None,
        }
    }

    /// Returns the current phase of the state machine.
    pub fn phase(&self) -> Phase {
        match self.outcome {
            Outcome::InProgress => Phase::AwaitingMove(self.to_move),
            terminal => Phase::Terminal(terminal),
        }
    }

    /// Bumped on every reset or mode toggle; a deferred action armed under
    /// an older generation must not be applied.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Returns true when the computer's move is awaited: single-player
    /// mode, game in progress, O to move.
    pub fn engine_move_pending(&self) -> bool {
        self.mode == Mode::VsComputer
            && self.outcome == Outcome::InProgress
            && self.to_move == Mark::O
    }

    /// Returns a snapshot of the full session state.
    pub fn status(&self) -> SessionStatus {
        SessionStatus {
            board: self.board.clone(),
            phase: self.phase(),
            mode: self.mode,
            winning_line: self.winning_line(),
            scores: self.scores,
        }
    }

    /// Places the current mark at `position` on behalf of a human.
    ///
    /// Rejected while the computer's move is pending in single-player
    /// mode, on occupied squares, and after the game has ended. Rejections
    /// leave the session untouched.
    ///
    /// # Errors
    ///
    /// Returns a [`MoveError`] describing why the placement was refused.
    #[instrument(skip(self), fields(mode = ?self.mode, to_move = ?self.to_move))]
    pub fn place_mark(&mut self, position: Position) -> Result<Outcome, MoveError> {
        if self.engine_move_pending() {
            debug!(?position, "Rejecting human input during the computer's turn");
            return Err(MoveError::ComputersTurn);
        }
        self.apply(position)
    }

    /// Places the computer's mark at `position`.
    ///
    /// Invoked by the session driver once the move delay has elapsed; the
    /// placement flows through the same evaluate-and-transition path as a
    /// human move.
    ///
    /// # Errors
    ///
    /// Returns a [`MoveError`] if the placement is illegal, which indicates
    /// a scheduling bug rather than a user mistake.
    #[instrument(skip(self))]
    pub fn place_engine_mark(&mut self, position: Position) -> Result<Outcome, MoveError> {
        self.apply(position)
    }

    /// Shared evaluate-and-transition logic for all placements.
    fn apply(&mut self, position: Position) -> Result<Outcome, MoveError> {
        if self.outcome.is_terminal() {
            debug!(?position, "Rejecting placement on a finished game");
            return Err(MoveError::GameOver);
        }
        if !self.board.is_empty(position) {
            debug!(?position, "Rejecting placement on an occupied square");
            return Err(MoveError::SquareOccupied(position));
        }

        let mark = self.to_move;
        self.board.set(position, Square::Occupied(mark));
        self.outcome = evaluate(&self.board);

        match self.outcome {
            Outcome::Won { winner, line } => {
                info!(?winner, ?line, "Game won");
                self.scores.record_win(winner, self.mode);
            }
            Outcome::Draw => {
                info!("Game drawn");
                self.scores.record_draw(self.mode);
            }
            Outcome::InProgress => {
                self.to_move = mark.opponent();
            }
        }

        Ok(self.outcome)
    }

    /// Flips the game mode.
    ///
    /// Resets the board and turn state but preserves both modes' score
    /// tallies. Valid in any phase.
    #[instrument(skip(self), fields(mode = ?self.mode))]
    pub fn toggle_mode(&mut self) {
        self.mode = self.mode.toggled();
        info!(mode = ?self.mode, "Toggled game mode");
        self.clear_board();
    }

    /// Returns to the initial phase: empty board, X to move.
    ///
    /// Clears the recorded outcome and winning line; scores are untouched.
    /// Valid in any phase.
    #[instrument(skip(self))]
    pub fn reset(&mut self) {
        info!("Resetting game session");
        self.clear_board();
    }

    fn clear_board(&mut self) {
        if self.outcome == Outcome::InProgress && self.board != Board::new() {
            warn!("Discarding a game in progress");
        }
        self.board = Board::new();
        self.to_move = Mark::X;
        self.outcome = Outcome::InProgress;
        self.generation += 1;
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}
