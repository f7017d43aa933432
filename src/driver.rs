//! Async session orchestration.
//!
//! [`SessionDriver`] owns a [`Session`] and is the single point of mutation
//! for it: commands arrive over a channel, state-change events are pushed
//! to every subscriber, and the computer's reply in single-player mode is
//! applied after an observable delay.
//!
//! The delay is modeled as an optional timer inside the driver's select
//! loop. The timer exists only while the session reports a pending engine
//! move, so any reset or mode toggle that lands first simply drops it.
//! A cancelled timer can never apply a stale move, and the move itself is
//! computed from the session's current board only after the delay elapses.

use crate::action::{Move, MoveError};
use crate::engine;
use crate::position::Position;
use crate::rules::Outcome;
use crate::session::{Session, SessionStatus};
use crate::types::Mark;
use anyhow::{Context, Result, anyhow};
use std::time::Duration;
use tokio::sync::{mpsc, oneshot};
use tokio::time::Instant;
use tracing::{debug, info, instrument, warn};

/// Delay between the triggering human move and the computer's reply.
const DEFAULT_ENGINE_DELAY: Duration = Duration::from_secs(1);

/// Commands accepted by the session driver.
#[derive(Debug)]
pub enum Command {
    /// Place the current mark at a position (human input).
    PlaceMark(Position),
    /// Flip single-player/two-player mode; resets the board, keeps scores.
    ToggleMode,
    /// Start a new game; keeps scores.
    Reset,
    /// Request a snapshot of the session state.
    Query(oneshot::Sender<SessionStatus>),
    /// Register an event subscriber.
    Subscribe(mpsc::UnboundedSender<SessionEvent>),
    /// Stop the driver loop.
    Shutdown,
}

/// Events pushed to subscribers after every state change.
#[derive(Debug, Clone)]
pub enum SessionEvent {
    /// The computer's move is pending; input is ignored until it lands.
    EngineThinking,
    /// A move was accepted and applied.
    MoveMade(Move),
    /// Session state changed; carries a fresh snapshot for re-rendering.
    StateChanged(SessionStatus),
    /// The game reached a terminal outcome.
    GameOver(Outcome),
}

/// Handle for driving a running [`SessionDriver`].
///
/// Clonable; all methods enqueue a command and return immediately except
/// [`SessionHandle::status`], which awaits the driver's reply.
#[derive(Debug, Clone)]
pub struct SessionHandle {
    commands: mpsc::UnboundedSender<Command>,
}

impl SessionHandle {
    /// Places the current mark at `position`.
    ///
    /// Illegal placements are rejected silently by the driver.
    pub fn place_mark(&self, position: Position) -> Result<()> {
        self.send(Command::PlaceMark(position))
    }

    /// Places the current mark at a board index (0-8).
    ///
    /// # Errors
    ///
    /// Fails if the index is out of range or the driver has stopped.
    pub fn place_mark_at(&self, index: usize) -> Result<()> {
        let position = Position::from_index(index)
            .ok_or_else(|| anyhow!("Board index out of range: {index}"))?;
        self.place_mark(position)
    }

    /// Flips the game mode, resetting the board and preserving scores.
    pub fn toggle_mode(&self) -> Result<()> {
        self.send(Command::ToggleMode)
    }

    /// Starts a new game, preserving scores.
    pub fn reset(&self) -> Result<()> {
        self.send(Command::Reset)
    }

    /// Stops the driver loop.
    pub fn shutdown(&self) -> Result<()> {
        self.send(Command::Shutdown)
    }

    /// Returns a snapshot of the session state: board, phase, winning line
    /// and cumulative scores.
    pub async fn status(&self) -> Result<SessionStatus> {
        let (tx, rx) = oneshot::channel();
        self.send(Command::Query(tx))?;
        rx.await.context("Session driver dropped the query")
    }

    /// Subscribes to session events.
    ///
    /// The driver immediately pushes a [`SessionEvent::StateChanged`] with
    /// the current snapshot, then every subsequent state change.
    pub fn subscribe(&self) -> Result<mpsc::UnboundedReceiver<SessionEvent>> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.send(Command::Subscribe(tx))?;
        Ok(rx)
    }

    fn send(&self, command: Command) -> Result<()> {
        self.commands
            .send(command)
            .map_err(|_| anyhow!("Session driver has stopped"))
    }
}

/// Owns a [`Session`] and serializes all access to it.
pub struct SessionDriver {
    session: Session,
    commands: mpsc::UnboundedReceiver<Command>,
    subscribers: Vec<mpsc::UnboundedSender<SessionEvent>>,
    engine_delay: Duration,
}

impl SessionDriver {
    /// Creates a driver with the default one-second engine delay.
    pub fn new() -> (Self, SessionHandle) {
        Self::with_delay(DEFAULT_ENGINE_DELAY)
    }

    /// Creates a driver with a custom engine delay.
    pub fn with_delay(engine_delay: Duration) -> (Self, SessionHandle) {
        let (tx, rx) = mpsc::unbounded_channel();
        let driver = Self {
            session: Session::new(),
            commands: rx,
            subscribers: Vec::new(),
            engine_delay,
        };
        (driver, SessionHandle { commands: tx })
    }

    /// Runs the driver loop until shutdown or until every handle is dropped.
    #[instrument(skip(self))]
    pub async fn run(mut self) -> Result<()> {
        info!("Starting session driver");
        // Deadline and session generation for the pending computer move.
        // Armed exactly while the session awaits the engine, dropped the
        // moment it no longer does, so a reset or mode toggle cancels the
        // timer outright.
        let mut armed: Option<(Instant, u64)> = None;

        loop {
            if self.session.engine_move_pending() {
                if armed.is_none() {
                    let deadline = Instant::now() + self.engine_delay;
                    armed = Some((deadline, self.session.generation()));
                    self.broadcast(SessionEvent::EngineThinking);
                }
            } else {
                armed = None;
            }

            tokio::select! {
                maybe_command = self.commands.recv() => {
                    let Some(command) = maybe_command else {
                        debug!("All session handles dropped");
                        break;
                    };
                    if self.handle_command(command) {
                        break;
                    }
                }
                _ = wait_until(armed.map(|(deadline, _)| deadline)), if armed.is_some() => {
                    if let Some((_, generation)) = armed.take()
                        && generation == self.session.generation()
                    {
                        self.apply_engine_move()?;
                    } else {
                        debug!("Discarding engine move armed for a stale board");
                    }
                }
            }
        }

        info!("Session driver stopped");
        Ok(())
    }

    /// Applies one command. Returns true on shutdown.
    fn handle_command(&mut self, command: Command) -> bool {
        match command {
            Command::PlaceMark(position) => {
                let mark = self.session.to_move();
                match self.session.place_mark(position) {
                    Ok(outcome) => self.publish_placement(mark, position, outcome),
                    // Illegal placements are dropped quietly; nothing is
                    // surfaced to the frontend.
                    Err(error) => debug!(%error, ?position, "Placement rejected"),
                }
            }
            Command::ToggleMode => {
                self.session.toggle_mode();
                self.broadcast(SessionEvent::StateChanged(self.session.status()));
            }
            Command::Reset => {
                self.session.reset();
                self.broadcast(SessionEvent::StateChanged(self.session.status()));
            }
            Command::Query(reply) => {
                let _ = reply.send(self.session.status());
            }
            Command::Subscribe(subscriber) => {
                let _ = subscriber.send(SessionEvent::StateChanged(self.session.status()));
                self.subscribers.push(subscriber);
            }
            Command::Shutdown => return true,
        }
        false
    }

    /// Computes and applies the computer's move from the current board.
    fn apply_engine_move(&mut self) -> Result<()> {
        // A command processed after arming may have ended or reset the
        // game; re-check before touching the board.
        if !self.session.engine_move_pending() {
            debug!("Pending engine move no longer applies");
            return Ok(());
        }

        let position = engine::select_move(self.session.board(), Mark::O)
            .context("Session discipline violated: engine turn on a terminal board")?;
        let outcome = match self.session.place_engine_mark(position) {
            Ok(outcome) => outcome,
            Err(error @ MoveError::SquareOccupied(_)) => {
                // The engine only proposes empty squares; reaching this
                // means the board changed underneath the scheduler.
                return Err(error).context("Engine move raced a board mutation");
            }
            Err(error) => return Err(error).context("Engine move rejected"),
        };

        info!(?position, "Computer played");
        self.publish_placement(Mark::O, position, outcome);
        Ok(())
    }

    fn publish_placement(&mut self, mark: Mark, position: Position, outcome: Outcome) {
        self.broadcast(SessionEvent::MoveMade(Move::new(mark, position)));
        self.broadcast(SessionEvent::StateChanged(self.session.status()));
        if outcome.is_terminal() {
            self.broadcast(SessionEvent::GameOver(outcome));
        }
    }

    /// Pushes an event to every subscriber, pruning closed ones.
    fn broadcast(&mut self, event: SessionEvent) {
        self.subscribers.retain(|subscriber| {
            if subscriber.send(event.clone()).is_ok() {
                true
            } else {
                warn!("Dropping closed event subscriber");
                false
            }
        });
    }
}

/// Sleeps until the deadline, or forever when none is armed.
///
/// The select arm guarding this future checks `is_some`, so the pending
/// branch is never reached in practice.
async fn wait_until(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => tokio::time::sleep_until(deadline).await,
        None => std::future::pending().await,
    }
}
