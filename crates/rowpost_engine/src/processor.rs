//! Row-driven request pipeline.
//!
//! A run is one blocking reader feeding a capacity-1 channel, a pool of
//! workers draining it through the [`Gateway`], and a completion task that
//! writes the summary, resets the counters and fires the run's cancel token.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use rowpost_logging::{rowpost_debug, rowpost_info, rowpost_warn};
use thiserror::Error;
use tokio::runtime::Handle;
use tokio::sync::{mpsc, Mutex};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::gateway::Gateway;
use crate::http::HttpClient;
use crate::rows::{parse_separator, ConfigError, RowSource};
use crate::{
    CounterSnapshot, FileSink, LogMessage, MemoryLog, MessageKind, Row, RunCounters, RunSettings,
    SinkLine,
};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RunError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("a run is already in progress")]
    AlreadyRunning,
}

/// Handle to a scheduled run.
///
/// The run is over once its cancel token has fired and the completion task
/// has returned the final counters.
pub struct RunHandle {
    cancel: CancellationToken,
    completion: JoinHandle<CounterSnapshot>,
    active: Arc<AtomicBool>,
}

impl RunHandle {
    pub fn cancel_token(&self) -> &CancellationToken {
        &self.cancel
    }

    /// Fires the run's cancel token. Idempotent.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub fn is_finished(&self) -> bool {
        self.completion.is_finished()
    }

    /// Waits for the completion task and returns the counters it observed
    /// just before resetting them.
    ///
    /// If the completion task itself failed, the run is released so a new
    /// one can start and empty counters are returned.
    pub async fn wait(self) -> CounterSnapshot {
        match self.completion.await {
            Ok(report) => report,
            Err(err) => {
                rowpost_warn!("Completion task ended abnormally: {}", err);
                self.active.store(false, Ordering::SeqCst);
                self.cancel.cancel();
                CounterSnapshot::default()
            }
        }
    }
}

pub struct Processor {
    settings: RunSettings,
    gateway: Arc<Gateway>,
    log: Arc<MemoryLog>,
    sink: Arc<FileSink>,
    counters: Arc<RunCounters>,
    active: Arc<AtomicBool>,
    runtime: Handle,
}

impl Processor {
    /// Compiles the templates and opens the structured output, if configured.
    pub fn new(
        settings: RunSettings,
        client: Arc<dyn HttpClient>,
        log: Arc<MemoryLog>,
        runtime: Handle,
    ) -> Self {
        let sink = FileSink::open(settings.output_path.as_deref(), log.clone());
        Self {
            gateway: Arc::new(Gateway::new(&settings, client)),
            sink: Arc::new(sink),
            settings,
            log,
            counters: Arc::new(RunCounters::new()),
            active: Arc::new(AtomicBool::new(false)),
            runtime,
        }
    }

    pub fn settings(&self) -> &RunSettings {
        &self.settings
    }

    pub fn counters(&self) -> &RunCounters {
        &self.counters
    }

    pub fn log(&self) -> &Arc<MemoryLog> {
        &self.log
    }

    pub fn sink(&self) -> &FileSink {
        &self.sink
    }

    pub fn is_running(&self) -> bool {
        self.active.load(Ordering::SeqCst)
    }

    /// Schedules a run over `path` and returns without waiting for it.
    ///
    /// Configuration problems are reported before any task is spawned or any
    /// file is opened.
    pub fn run(&self, cancel: CancellationToken, path: &Path) -> Result<RunHandle, RunError> {
        let delimiter = parse_separator(&self.settings.separator)?;
        if self
            .active
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return Err(RunError::AlreadyRunning);
        }

        self.counters.reset();
        let workers = self.settings.effective_workers();
        rowpost_info!("Starting run over {:?} with {} workers", path, workers);
        self.log.add(LogMessage::info(format!(
            "Processing {} with {workers} workers",
            path.display()
        )));

        let (tx, rx) = mpsc::channel::<Row>(1);
        let reader = ReaderTask {
            path: path.to_path_buf(),
            delimiter,
            fields: self.settings.fields.clone(),
            tx,
            cancel: cancel.clone(),
            counters: self.counters.clone(),
            log: self.log.clone(),
        };
        let reader_handle = self.runtime.spawn_blocking(move || reader.run());

        let rx = Arc::new(Mutex::new(rx));
        let worker_handles: Vec<JoinHandle<()>> = (0..workers)
            .map(|id| {
                let worker = Worker {
                    id,
                    rx: rx.clone(),
                    gateway: self.gateway.clone(),
                    sink: self.sink.clone(),
                    log: self.log.clone(),
                    counters: self.counters.clone(),
                    cancel: cancel.clone(),
                };
                self.runtime.spawn(worker.run())
            })
            .collect();
        // Workers hold the only receivers; once they exit a blocked reader wakes up.
        drop(rx);

        let counters = self.counters.clone();
        let log = self.log.clone();
        let active = self.active.clone();
        let done = cancel.clone();
        let completion = self.runtime.spawn(async move {
            for handle in worker_handles {
                if let Err(err) = handle.await {
                    rowpost_warn!("Worker task ended abnormally: {}", err);
                }
            }
            if let Err(err) = reader_handle.await {
                rowpost_warn!("Reader task ended abnormally: {}", err);
            }

            let report = counters.snapshot();
            log.add(summary_message(&report));
            rowpost_info!(
                "Run finished: lines={} requests={} errors={}",
                report.lines_read,
                report.requests_issued,
                report.errors
            );
            counters.reset();
            active.store(false, Ordering::SeqCst);
            done.cancel();
            report
        });

        Ok(RunHandle {
            cancel,
            completion,
            active: self.active.clone(),
        })
    }
}

fn summary_message(report: &CounterSnapshot) -> LogMessage {
    let errors = if report.errors == 0 {
        "no errors".to_string()
    } else {
        format!("{} errors", report.errors)
    };
    LogMessage::new(
        MessageKind::Summary,
        format!(
            "Finished with {errors}: {} requests from {} lines",
            report.requests_issued, report.lines_read
        ),
    )
}

fn cancel_message(counters: &RunCounters) -> LogMessage {
    LogMessage::new(
        MessageKind::Cancel,
        format!(
            "Cancelled after {} lines / {} requests",
            counters.lines_read(),
            counters.requests_issued()
        ),
    )
}

struct ReaderTask {
    path: PathBuf,
    delimiter: u8,
    fields: Vec<String>,
    tx: mpsc::Sender<Row>,
    cancel: CancellationToken,
    counters: Arc<RunCounters>,
    log: Arc<MemoryLog>,
}

impl ReaderTask {
    /// Runs on a blocking thread; dropping `tx` on return closes the channel.
    fn run(self) {
        let source = match RowSource::open(&self.path, self.delimiter, &self.fields) {
            Ok(source) => source,
            Err(err) => {
                rowpost_warn!("Cannot start reading {:?}: {}", self.path, err);
                self.log.add(LogMessage::csv(err.to_string()));
                self.cancel.cancel();
                return;
            }
        };

        for record in source {
            if self.cancel.is_cancelled() {
                rowpost_debug!("Reader stopping on cancellation");
                return;
            }
            self.counters.line_read();
            match record {
                Ok(row) => {
                    if self.tx.blocking_send(row).is_err() {
                        rowpost_debug!("Reader stopping: no worker left to receive");
                        return;
                    }
                }
                Err(err) => {
                    self.log
                        .add(LogMessage::csv(format!("Skipping malformed record at {err}")));
                }
            }
        }
        rowpost_debug!("Reader reached end of {:?}", self.path);
    }
}

enum Next {
    Row(Row),
    Closed,
    Cancelled,
}

struct Worker {
    id: usize,
    rx: Arc<Mutex<mpsc::Receiver<Row>>>,
    gateway: Arc<Gateway>,
    sink: Arc<FileSink>,
    log: Arc<MemoryLog>,
    counters: Arc<RunCounters>,
    cancel: CancellationToken,
}

impl Worker {
    async fn run(self) {
        loop {
            match self.next().await {
                Next::Row(row) if !self.cancel.is_cancelled() => self.process(row).await,
                Next::Row(_) | Next::Cancelled => {
                    self.log.add(cancel_message(&self.counters));
                    break;
                }
                Next::Closed => break,
            }
        }
        rowpost_debug!("Worker {} exiting", self.id);
    }

    async fn next(&self) -> Next {
        if self.cancel.is_cancelled() {
            return Next::Cancelled;
        }
        let mut rx = self.rx.lock().await;
        tokio::select! {
            biased;
            _ = self.cancel.cancelled() => Next::Cancelled,
            row = rx.recv() => row.map_or(Next::Closed, Next::Row),
        }
    }

    async fn process(&self, row: Row) {
        self.counters.request_issued();
        let line = match self.gateway.execute(&row, &self.cancel).await {
            Ok(outcome) => {
                if outcome.is_ok() {
                    rowpost_debug!("Line {}: {} -> {}", row.line(), outcome.url, outcome.status);
                } else {
                    self.counters.error();
                    self.log.add(LogMessage::warning(format!(
                        "Line {} ({row}) returned status {}",
                        row.line(),
                        outcome.status
                    )));
                }
                SinkLine::from_outcome(&outcome)
            }
            Err(failure) => {
                self.counters.error();
                self.log.add(LogMessage::request(format!(
                    "Line {} ({row}) request to {} failed: {}",
                    row.line(),
                    failure.url,
                    failure.error
                )));
                SinkLine::from_failure(&failure)
            }
        };
        self.sink.write(&line);
    }
}
