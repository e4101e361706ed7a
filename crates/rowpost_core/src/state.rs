use std::path::{Path, PathBuf};

use crate::view_model::AppViewModel;

/// Lifecycle of a run as seen by the shell.
///
/// `Stale` means the last run's cancel handle has fired but the user has not
/// yet started another one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionState {
    #[default]
    Idle,
    Running,
    Stale,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppState {
    session: SessionState,
    current_file: Option<PathBuf>,
    runs_started: u64,
    quitting: bool,
    dirty: bool,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn session(&self) -> SessionState {
        self.session
    }

    pub fn current_file(&self) -> Option<&Path> {
        self.current_file.as_deref()
    }

    pub fn is_quitting(&self) -> bool {
        self.quitting
    }

    pub fn view(&self) -> AppViewModel {
        AppViewModel {
            session: self.session,
            current_file: self.current_file.clone(),
            runs_started: self.runs_started,
            dirty: self.dirty,
        }
    }

    /// Returns whether anything changed since the last call and clears the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub(crate) fn start_run(&mut self, path: PathBuf) {
        self.session = SessionState::Running;
        self.current_file = Some(path);
        self.runs_started += 1;
        self.dirty = true;
    }

    pub(crate) fn acknowledge_stale(&mut self) {
        if self.session == SessionState::Stale {
            self.session = SessionState::Idle;
            self.dirty = true;
        }
    }

    pub(crate) fn mark_stale(&mut self) {
        if self.session == SessionState::Running {
            self.session = SessionState::Stale;
            self.dirty = true;
        }
    }

    pub(crate) fn mark_quitting(&mut self) {
        self.quitting = true;
        self.dirty = true;
    }
}
