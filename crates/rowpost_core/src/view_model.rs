use std::path::PathBuf;

use crate::SessionState;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppViewModel {
    pub session: SessionState,
    pub current_file: Option<PathBuf>,
    pub runs_started: u64,
    pub dirty: bool,
}

impl AppViewModel {
    /// One-line status shown above the prompt.
    pub fn status_line(&self) -> String {
        let file = self
            .current_file
            .as_ref()
            .map(|path| path.display().to_string())
            .unwrap_or_else(|| "-".to_string());
        match self.session {
            SessionState::Idle => "idle: select a file".to_string(),
            SessionState::Running => format!("running: {file} (press c or Ctrl-C to cancel)"),
            SessionState::Stale => format!("done: {file} (select a file to start again)"),
        }
    }
}
