use std::path::PathBuf;
use std::sync::Once;

use pretty_assertions::assert_eq;
use rowpost_core::{update, AppState, Effect, Msg, SessionState};

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(rowpost_logging::initialize_for_tests);
}

fn select(state: AppState, name: &str) -> (AppState, Vec<Effect>) {
    update(state, Msg::FileSelected(PathBuf::from(name)))
}

#[test]
fn selecting_a_file_starts_a_run() {
    init_logging();
    let (mut state, effects) = select(AppState::new(), "rows.csv");

    assert_eq!(
        effects,
        vec![Effect::StartRun {
            path: PathBuf::from("rows.csv")
        }]
    );
    let view = state.view();
    assert_eq!(view.session, SessionState::Running);
    assert_eq!(view.current_file, Some(PathBuf::from("rows.csv")));
    assert_eq!(view.runs_started, 1);
    assert!(state.consume_dirty());
    assert!(!state.consume_dirty());
}

#[test]
fn selection_while_running_is_rejected_with_notice() {
    init_logging();
    let (mut state, _effects) = select(AppState::new(), "first.csv");
    assert!(state.consume_dirty());

    let (mut state, effects) = select(state, "second.csv");

    assert_eq!(effects.len(), 1);
    match &effects[0] {
        Effect::Notify(text) => assert!(text.contains("already in progress")),
        other => panic!("unexpected effect {other:?}"),
    }
    assert_eq!(state.session(), SessionState::Running);
    assert_eq!(state.current_file(), Some(PathBuf::from("first.csv").as_path()));
    assert_eq!(state.view().runs_started, 1);
    assert!(!state.consume_dirty());
}

#[test]
fn cancel_moves_running_to_stale() {
    init_logging();
    let (state, _effects) = select(AppState::new(), "rows.csv");
    let (state, effects) = update(state, Msg::CancelRequested);

    assert_eq!(effects, vec![Effect::CancelRun]);
    assert_eq!(state.session(), SessionState::Stale);

    // Cancelling twice does nothing further.
    let (state, effects) = update(state, Msg::CancelRequested);
    assert!(effects.is_empty());
    assert_eq!(state.session(), SessionState::Stale);
}

#[test]
fn cancel_while_idle_is_ignored() {
    init_logging();
    let (mut state, effects) = update(AppState::new(), Msg::CancelRequested);
    assert!(effects.is_empty());
    assert_eq!(state.session(), SessionState::Idle);
    assert!(!state.consume_dirty());
}

#[test]
fn natural_completion_then_new_selection_restarts() {
    init_logging();
    let (state, _effects) = select(AppState::new(), "a.csv");
    let (state, effects) = update(state, Msg::RunFinished);
    assert!(effects.is_empty());
    assert_eq!(state.session(), SessionState::Stale);

    let (state, effects) = select(state, "b.csv");
    assert_eq!(
        effects,
        vec![Effect::StartRun {
            path: PathBuf::from("b.csv")
        }]
    );
    assert_eq!(state.session(), SessionState::Running);
    assert_eq!(state.view().runs_started, 2);
}

#[test]
fn run_finished_after_user_cancel_keeps_stale() {
    init_logging();
    let (state, _effects) = select(AppState::new(), "a.csv");
    let (state, _effects) = update(state, Msg::CancelRequested);
    let (state, effects) = update(state, Msg::RunFinished);
    assert!(effects.is_empty());
    assert_eq!(state.session(), SessionState::Stale);
}

#[test]
fn quit_cancels_an_active_run() {
    init_logging();
    let (state, _effects) = select(AppState::new(), "a.csv");
    let (state, effects) = update(state, Msg::QuitRequested);

    assert_eq!(effects, vec![Effect::CancelRun, Effect::Quit]);
    assert!(state.is_quitting());

    let (state, effects) = update(AppState::new(), Msg::QuitRequested);
    assert_eq!(effects, vec![Effect::Quit]);
    assert!(state.is_quitting());
}

#[test]
fn interrupt_cancels_a_run_then_quits_when_idle() {
    init_logging();
    let (state, _effects) = select(AppState::new(), "a.csv");
    let (state, effects) = update(state, Msg::Interrupted);
    assert_eq!(effects, vec![Effect::CancelRun]);
    assert_eq!(state.session(), SessionState::Stale);
    assert!(!state.is_quitting());

    let (state, effects) = update(state, Msg::Interrupted);
    assert_eq!(effects, vec![Effect::Quit]);
    assert!(state.is_quitting());

    let (state, effects) = update(AppState::new(), Msg::Interrupted);
    assert_eq!(effects, vec![Effect::Quit]);
    assert!(state.is_quitting());
}

#[test]
fn status_line_follows_session() {
    init_logging();
    let state = AppState::new();
    assert!(state.view().status_line().starts_with("idle"));

    let (state, _effects) = select(state, "rows.csv");
    let line = state.view().status_line();
    assert!(line.starts_with("running"));
    assert!(line.contains("rows.csv"));

    let (state, _effects) = update(state, Msg::RunFinished);
    assert!(state.view().status_line().starts_with("done"));
}
