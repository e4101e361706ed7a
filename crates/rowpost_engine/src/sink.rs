use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use rowpost_logging::{rowpost_debug, rowpost_warn};
use thiserror::Error;

use crate::{MemoryLog, MessageKind, SinkLine};

#[derive(Debug, Error)]
pub enum SinkError {
    #[error("cannot encode output line: {0}")]
    Encode(#[from] serde_json::Error),
    #[error("cannot write output line: {0}")]
    Io(#[from] io::Error),
}

/// Append-only JSON-lines file recording every issued request.
///
/// Without a path, or when the file cannot be opened, writes are accepted
/// and dropped.
pub struct FileSink {
    path: Option<PathBuf>,
    file: Mutex<Option<File>>,
    log: Arc<MemoryLog>,
}

impl FileSink {
    pub fn disabled(log: Arc<MemoryLog>) -> Self {
        Self {
            path: None,
            file: Mutex::new(None),
            log,
        }
    }

    pub fn open(path: Option<&Path>, log: Arc<MemoryLog>) -> Self {
        let Some(path) = path.filter(|p| !p.as_os_str().is_empty()) else {
            return Self::disabled(log);
        };

        let file = match OpenOptions::new().create(true).append(true).open(path) {
            Ok(file) => {
                rowpost_debug!("Structured output opened at {:?}", path);
                Some(file)
            }
            Err(err) => {
                rowpost_warn!("Cannot open structured output {:?}: {}", path, err);
                log.push(
                    MessageKind::Sink,
                    format!("Cannot open output file {}: {err}", path.display()),
                );
                None
            }
        };

        Self {
            path: Some(path.to_path_buf()),
            file: Mutex::new(file),
            log,
        }
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn is_enabled(&self) -> bool {
        self.lock().is_some()
    }

    /// Writes one line. Failures are reported to the in-memory log and the
    /// sink stays usable.
    pub fn write(&self, line: &SinkLine) {
        if let Err(err) = self.try_write(line) {
            rowpost_warn!("Structured output write failed: {}", err);
            self.log
                .push(MessageKind::Sink, format!("Lost output line for {}: {err}", line.url));
        }
    }

    pub fn try_write(&self, line: &SinkLine) -> Result<(), SinkError> {
        let mut encoded = serde_json::to_vec(line)?;
        encoded.push(b'\n');
        // One write_all per line under the lock keeps concurrent lines whole.
        let mut guard = self.lock();
        let Some(file) = guard.as_mut() else {
            return Ok(());
        };
        file.write_all(&encoded)?;
        Ok(())
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Option<File>> {
        match self.file.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

impl std::fmt::Debug for FileSink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileSink")
            .field("path", &self.path)
            .field("enabled", &self.is_enabled())
            .finish()
    }
}
