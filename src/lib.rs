//! Stellar tic-tac-toe - game core with an unbeatable computer opponent
//!
//! This library is the core of a browser tic-tac-toe game: the outcome
//! evaluator, the exhaustive minimax move engine, the session state
//! machine and the async driver that paces the computer's replies.
//! Rendering is a separate concern; a frontend drives the core through
//! [`SessionHandle`] and re-renders on pushed [`SessionEvent`]s.
//!
//! # Architecture
//!
//! - **Rules**: pure outcome evaluation over a board snapshot
//! - **Engine**: game-theoretically optimal move selection
//! - **Session**: turn sequencing, mode toggling and score tracking
//! - **Driver**: command/event channels and the delayed computer move
//!
//! # Example
//!
//! Synchronous embedding, two-player mode:
//!
//! ```
//! use stellar_tictactoe::{Mode, Outcome, Position, Session};
//!
//! let mut session = Session::with_mode(Mode::TwoPlayer);
//! let outcome = session.place_mark(Position::Center).expect("square is empty");
//! assert_eq!(outcome, Outcome::InProgress);
//! ```
//!
//! Async embedding with the driver pacing the computer:
//!
//! ```no_run
//! use stellar_tictactoe::{Position, SessionDriver, SessionEvent};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let (driver, handle) = SessionDriver::new();
//! tokio::spawn(driver.run());
//!
//! let mut events = handle.subscribe()?;
//! handle.place_mark(Position::Center)?;
//! while let Some(event) = events.recv().await {
//!     if let SessionEvent::GameOver(outcome) = event {
//!         println!("finished: {outcome:?}");
//!         break;
//!     }
//! }
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// Private module declarations
mod action;
mod driver;
mod engine;
mod position;
mod rules;
mod scores;
mod session;
mod types;

// Crate-level exports - moves and move validation
pub use action::{Move, MoveError};

// Crate-level exports - async orchestration
pub use driver::{Command, SessionDriver, SessionEvent, SessionHandle};

// Crate-level exports - move engine
pub use engine::{EngineError, select_move};

// Crate-level exports - board positions
pub use position::Position;

// Crate-level exports - outcome evaluation
pub use rules::{LINES, Line, Outcome, evaluate};

// Crate-level exports - score tracking
pub use scores::ScoreBoard;

// Crate-level exports - session state machine
pub use session::{Mode, Phase, Session, SessionStatus};

// Crate-level exports - core types
pub use types::{Board, Mark, Square};
