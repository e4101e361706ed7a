use std::path::PathBuf;

/// Side effects requested by [`crate::update`], executed by the shell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Mint a cancel handle and start a run over `path`.
    StartRun { path: PathBuf },
    /// Fire the cancel handle of the current run.
    CancelRun,
    /// Append an informational line to the user-facing log.
    Notify(String),
    /// Leave the shell.
    Quit,
}
