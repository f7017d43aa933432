//! Win detection logic for tic-tac-toe.

use crate::position::Position;
use crate::types::{Board, Mark, Square};

/// A win line: three positions forming a row, column or diagonal.
pub type Line = [Position; 3];

/// The 8 win lines, in fixed row/column/diagonal enumeration order.
pub const LINES: [Line; 8] = [
    // Rows
    [Position::TopLeft, Position::TopCenter, Position::TopRight],
    [Position::MiddleLeft, Position::Center, Position::MiddleRight],
    [Position::BottomLeft, Position::BottomCenter, Position::BottomRight],
    // Columns
    [Position::TopLeft, Position::MiddleLeft, Position::BottomLeft],
    [Position::TopCenter, Position::Center, Position::BottomCenter],
    [Position::TopRight, Position::MiddleRight, Position::BottomRight],
    // Diagonals
    [Position::TopLeft, Position::Center, Position::BottomRight],
    [Position::TopRight, Position::Center, Position::BottomLeft],
];

/// Checks if there is a completed line on the board.
///
/// Returns the owning mark and the line, or `None`. The first matching
/// line in `LINES` order is reported.
pub fn check_winner(board: &Board) -> Option<(Mark, Line)> {
    for line in LINES {
        let [a, b, c] = line;
        let sq = board.get(a);

        if sq != Square::Empty && sq == board.get(b) && sq == board.get(c) {
            if let Square::Occupied(mark) = sq {
                return Some((mark, line));
            }
        }
    }

    None
}
