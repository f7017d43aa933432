//! Integration tests for the session state machine and score accounting.

use stellar_tictactoe::{
    Mark, Mode, MoveError, Outcome, Phase, Position, Session, SessionStatus, Square,
};

/// Plays alternating marks through the human entry point (two-player mode).
fn play(session: &mut Session, moves: &[Position]) {
    for pos in moves {
        session.place_mark(*pos).expect("scripted move is legal");
    }
}

/// Plays a scripted single-player game: X through the human entry point,
/// O through the engine entry point.
fn play_vs_computer(session: &mut Session, moves: &[Position]) {
    for (turn, pos) in moves.iter().enumerate() {
        if turn % 2 == 0 {
            session.place_mark(*pos).expect("scripted human move is legal");
        } else {
            session
                .place_engine_mark(*pos)
                .expect("scripted engine move is legal");
        }
    }
}

const X_WINS_TOP_ROW: [Position; 5] = [
    Position::TopLeft,
    Position::MiddleLeft,
    Position::TopCenter,
    Position::Center,
    Position::TopRight,
];

const O_WINS_MIDDLE_ROW: [Position; 6] = [
    Position::TopLeft,
    Position::MiddleLeft,
    Position::TopCenter,
    Position::Center,
    Position::BottomRight,
    Position::MiddleRight,
];

const DRAWN_GAME: [Position; 9] = [
    Position::TopLeft,
    Position::Center,
    Position::TopRight,
    Position::TopCenter,
    Position::MiddleLeft,
    Position::MiddleRight,
    Position::BottomCenter,
    Position::BottomLeft,
    Position::BottomRight,
];

#[test]
fn test_win_reaches_terminal_with_line() {
    let mut session = Session::with_mode(Mode::TwoPlayer);
    play(&mut session, &X_WINS_TOP_ROW);

    let outcome = session.outcome();
    assert_eq!(
        outcome,
        Outcome::Won {
            winner: Mark::X,
            line: [Position::TopLeft, Position::TopCenter, Position::TopRight],
        }
    );
    assert_eq!(session.phase(), Phase::Terminal(outcome));
    assert_eq!(
        session.winning_line(),
        Some([Position::TopLeft, Position::TopCenter, Position::TopRight])
    );
}

#[test]
fn test_occupied_square_rejection_is_a_no_op() {
    let mut session = Session::with_mode(Mode::TwoPlayer);
    session.place_mark(Position::Center).expect("square is empty");

    let board_before = session.board().clone();
    let result = session.place_mark(Position::Center);
    assert_eq!(result, Err(MoveError::SquareOccupied(Position::Center)));
    assert_eq!(session.board(), &board_before);
    assert_eq!(session.phase(), Phase::AwaitingMove(Mark::O));
}

#[test]
fn test_placement_after_game_over_is_rejected() {
    let mut session = Session::with_mode(Mode::TwoPlayer);
    play(&mut session, &X_WINS_TOP_ROW);

    let board_before = session.board().clone();
    assert_eq!(
        session.place_mark(Position::BottomRight),
        Err(MoveError::GameOver)
    );
    assert_eq!(session.board(), &board_before);
    assert_eq!(*session.scores().player_one(), 1);
}

#[test]
fn test_win_credits_player_one_in_two_player_mode() {
    let mut session = Session::with_mode(Mode::TwoPlayer);
    play(&mut session, &X_WINS_TOP_ROW);

    assert_eq!(*session.scores().player_one(), 1);
    assert_eq!(*session.scores().player_two(), 0);
    assert_eq!(*session.scores().computer(), 0);
}

#[test]
fn test_o_win_credits_player_two_in_two_player_mode() {
    let mut session = Session::with_mode(Mode::TwoPlayer);
    play(&mut session, &O_WINS_MIDDLE_ROW);

    assert_eq!(*session.scores().player_two(), 1);
    assert_eq!(*session.scores().computer(), 0);
}

#[test]
fn test_o_win_credits_computer_in_single_player_mode() {
    let mut session = Session::new();
    play_vs_computer(&mut session, &O_WINS_MIDDLE_ROW);

    assert_eq!(*session.scores().computer(), 1);
    assert_eq!(*session.scores().player_two(), 0);
}

#[test]
fn test_draw_increments_only_active_mode_counter() {
    let mut session = Session::with_mode(Mode::TwoPlayer);
    play(&mut session, &DRAWN_GAME);
    assert_eq!(*session.scores().draws_two_player(), 1);
    assert_eq!(*session.scores().draws_vs_computer(), 0);

    let mut session = Session::new();
    play_vs_computer(&mut session, &DRAWN_GAME);
    assert_eq!(*session.scores().draws_vs_computer(), 1);
    assert_eq!(*session.scores().draws_two_player(), 0);
}

#[test]
fn test_score_sum_equals_completed_games() {
    let mut session = Session::with_mode(Mode::TwoPlayer);
    play(&mut session, &X_WINS_TOP_ROW);
    session.reset();
    play(&mut session, &O_WINS_MIDDLE_ROW);
    session.reset();
    play(&mut session, &DRAWN_GAME);

    let scores = session.scores();
    let total = scores.player_one() + scores.player_two() + scores.draws_two_player();
    assert_eq!(total, 3);
}

#[test]
fn test_toggle_mid_game_resets_board_but_keeps_scores() {
    let mut session = Session::with_mode(Mode::TwoPlayer);
    play(&mut session, &X_WINS_TOP_ROW);
    session.reset();
    play(&mut session, &[Position::Center, Position::TopLeft]);

    session.toggle_mode();

    assert_eq!(session.mode(), Mode::VsComputer);
    assert_eq!(session.phase(), Phase::AwaitingMove(Mark::X));
    assert!(
        session
            .board()
            .squares()
            .iter()
            .all(|s| *s == Square::Empty)
    );
    assert_eq!(*session.scores().player_one(), 1);
}

#[test]
fn test_reset_clears_outcome_and_line_but_keeps_scores() {
    let mut session = Session::with_mode(Mode::TwoPlayer);
    play(&mut session, &X_WINS_TOP_ROW);

    session.reset();

    assert_eq!(session.outcome(), Outcome::InProgress);
    assert_eq!(session.winning_line(), None);
    assert_eq!(session.phase(), Phase::AwaitingMove(Mark::X));
    assert_eq!(*session.scores().player_one(), 1);
}

#[test]
fn test_status_snapshot_round_trips_through_json() {
    let mut session = Session::with_mode(Mode::TwoPlayer);
    play(&mut session, &X_WINS_TOP_ROW);

    let status = session.status();
    let json = serde_json::to_string(&status).expect("status serializes");
    let restored: SessionStatus = serde_json::from_str(&json).expect("status deserializes");
    assert_eq!(restored, status);
}
