//! Cumulative score tracking across games.

use crate::session::Mode;
use crate::types::Mark;
use derive_getters::Getters;
use serde::{Deserialize, Serialize};

/// Win and draw tallies for both game modes.
///
/// Player one (X) accumulates into a single counter regardless of mode,
/// while the O side and draws are tracked per mode, so toggling between
/// modes never corrupts either tally.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Getters)]
pub struct ScoreBoard {
    /// Games won by X, in either mode.
    player_one: u32,
    /// Games won by O in two-player mode.
    player_two: u32,
    /// Games won by the computer (O) in single-player mode.
    computer: u32,
    /// Drawn games in single-player mode.
    draws_vs_computer: u32,
    /// Drawn games in two-player mode.
    draws_two_player: u32,
}

impl ScoreBoard {
    /// Creates a zeroed scoreboard.
    pub fn new() -> Self {
        Self::default()
    }

    /// Credits a win to the side owning `winner` under the given mode.
    pub(crate) fn record_win(&mut self, winner: Mark, mode: Mode) {
        match (winner, mode) {
            (Mark::X, _) => self.player_one += 1,
            (Mark::O, Mode::TwoPlayer) => self.player_two += 1,
            (Mark::O, Mode::VsComputer) => self.computer += 1,
        }
    }

    /// Credits a draw to the counter for the given mode.
    pub(crate) fn record_draw(&mut self, mode: Mode) {
        match mode {
            Mode::VsComputer => self.draws_vs_computer += 1,
            Mode::TwoPlayer => self.draws_two_player += 1,
        }
    }
}
