use std::sync::Arc;
use std::time::Duration;

use rowpost_core::{Effect, Msg};
use rowpost_engine::{
    CancellationToken, LogMessage, MemoryLog, MessageKind, Processor, RunError, RunHandle,
};
use rowpost_logging::{rowpost_info, rowpost_warn};
use tokio::runtime::Runtime;

fn start_failure_message(err: &RunError) -> LogMessage {
    match err {
        RunError::Config(_) => LogMessage::new(MessageKind::Config, err.to_string()),
        RunError::AlreadyRunning => LogMessage::info(err.to_string()),
    }
}

/// Executes core effects against the engine and reports run completion.
pub(crate) struct EffectRunner {
    runtime: Runtime,
    processor: Processor,
    log: Arc<MemoryLog>,
    current: Option<RunHandle>,
}

impl EffectRunner {
    pub(crate) fn new(runtime: Runtime, processor: Processor) -> Self {
        let log = processor.log().clone();
        Self {
            runtime,
            processor,
            log,
            current: None,
        }
    }

    /// Applies effects and returns follow-up messages for the core.
    pub(crate) fn apply(&mut self, effects: Vec<Effect>) -> Vec<Msg> {
        let mut follow_up = Vec::new();
        for effect in effects {
            match effect {
                Effect::StartRun { path } => {
                    let cancel = CancellationToken::new();
                    match self.processor.run(cancel, &path) {
                        Ok(handle) => {
                            rowpost_info!("Run started for {:?}", path);
                            self.current = Some(handle);
                        }
                        Err(err) => {
                            rowpost_warn!("Run for {:?} not started: {}", path, err);
                            self.log.add(start_failure_message(&err));
                            follow_up.push(Msg::RunFinished);
                        }
                    }
                }
                Effect::CancelRun => {
                    if let Some(handle) = &self.current {
                        rowpost_info!("Cancelling current run");
                        handle.cancel();
                    }
                }
                Effect::Notify(text) => self.log.add(LogMessage::info(text)),
                Effect::Quit => {}
            }
        }
        follow_up
    }

    /// Returns `RunFinished` once the current run's cancel token has fired.
    pub(crate) fn poll(&mut self) -> Option<Msg> {
        let fired = self
            .current
            .as_ref()
            .is_some_and(|handle| handle.cancel_token().is_cancelled());
        if fired {
            // The handle stays around so `shutdown` can still wait for draining.
            if self.current.as_ref().is_some_and(RunHandle::is_finished) {
                self.current = None;
            }
            return Some(Msg::RunFinished);
        }
        None
    }

    /// Cancels any active run and waits a bounded time for it to drain.
    pub(crate) fn shutdown(mut self, grace: Duration) {
        if let Some(handle) = self.current.take() {
            handle.cancel();
            let drained = self
                .runtime
                .block_on(async { tokio::time::timeout(grace, handle.wait()).await });
            if drained.is_err() {
                rowpost_warn!("Run did not drain within {:?}", grace);
            }
        }
        self.runtime.shutdown_timeout(grace);
    }
}

#[cfg(test)]
mod tests {
    use rowpost_engine::ConfigError;

    use super::*;

    #[test]
    fn refused_start_is_informational() {
        let busy = start_failure_message(&RunError::AlreadyRunning);
        assert_eq!(busy.kind(), MessageKind::Info);

        let bad = start_failure_message(&RunError::Config(ConfigError::InvalidSeparator(
            ";;".to_string(),
        )));
        assert_eq!(bad.kind(), MessageKind::Config);
    }
}
