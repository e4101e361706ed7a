use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// User picked an input file from the list.
    FileSelected(PathBuf),
    /// User pressed the cancel key.
    CancelRequested,
    /// Ctrl-C: cancels an active run, otherwise leaves.
    Interrupted,
    /// The run's cancel handle was observed as fired.
    RunFinished,
    /// User asked to leave.
    QuitRequested,
    /// UI tick to coalesce rendering.
    Tick,
    /// Fallback for placeholder wiring.
    NoOp,
}
