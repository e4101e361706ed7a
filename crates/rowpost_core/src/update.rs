use crate::{AppState, Effect, Msg, SessionState};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::FileSelected(path) => match state.session() {
            SessionState::Running => {
                let current = state
                    .current_file()
                    .map(|p| p.display().to_string())
                    .unwrap_or_default();
                vec![Effect::Notify(format!(
                    "A run is already in progress for {current}; cancel it first"
                ))]
            }
            SessionState::Idle | SessionState::Stale => {
                // Selecting a file is how the user acknowledges a stale run.
                state.acknowledge_stale();
                state.start_run(path.clone());
                vec![Effect::StartRun { path }]
            }
        },
        Msg::CancelRequested => {
            if state.session() == SessionState::Running {
                state.mark_stale();
                vec![Effect::CancelRun]
            } else {
                Vec::new()
            }
        }
        Msg::Interrupted => {
            if state.session() == SessionState::Running {
                state.mark_stale();
                vec![Effect::CancelRun]
            } else {
                state.mark_quitting();
                vec![Effect::Quit]
            }
        }
        Msg::RunFinished => {
            state.mark_stale();
            Vec::new()
        }
        Msg::QuitRequested => {
            let mut effects = Vec::with_capacity(2);
            if state.session() == SessionState::Running {
                state.mark_stale();
                effects.push(Effect::CancelRun);
            }
            state.mark_quitting();
            effects.push(Effect::Quit);
            effects
        }
        Msg::Tick | Msg::NoOp => Vec::new(),
    };

    (state, effects)
}
