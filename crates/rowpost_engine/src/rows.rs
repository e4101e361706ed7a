use std::collections::{BTreeMap, HashSet};
use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::Row;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("csv separator must be a single character, got {0:?}")]
    InvalidSeparator(String),
}

#[derive(Debug, Error)]
pub enum InputError {
    #[error("cannot open {path:?}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("{path:?} is empty: no header line")]
    Empty { path: PathBuf },
    #[error("cannot read header of {path:?}: {source}")]
    Header {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
}

/// A record that could not be parsed; the run skips it.
#[derive(Debug, Error)]
#[error("line {line}: {source}")]
pub struct RecordError {
    pub line: u64,
    #[source]
    pub source: csv::Error,
}

/// Turns the configured separator string into a delimiter byte.
///
/// An empty string means comma.
pub fn parse_separator(separator: &str) -> Result<u8, ConfigError> {
    match separator.as_bytes() {
        [] => Ok(b','),
        [byte] => Ok(*byte),
        _ => Err(ConfigError::InvalidSeparator(separator.to_string())),
    }
}

/// Lazy reader of header-keyed rows from a delimited file.
pub struct RowSource {
    reader: csv::Reader<File>,
    headers: Vec<String>,
    keep: Vec<bool>,
    record: csv::StringRecord,
    exhausted: bool,
}

impl std::fmt::Debug for RowSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RowSource")
            .field("headers", &self.headers)
            .finish_non_exhaustive()
    }
}

impl RowSource {
    /// Opens `path` and reads its header line.
    ///
    /// Only headers listed in `fields` are kept; an empty list keeps all of them.
    pub fn open(path: &Path, delimiter: u8, fields: &[String]) -> Result<Self, InputError> {
        let file = File::open(path).map_err(|source| InputError::Open {
            path: path.to_path_buf(),
            source,
        })?;

        let mut reader = csv::ReaderBuilder::new()
            .delimiter(delimiter)
            .has_headers(true)
            .flexible(false)
            .from_reader(file);

        let header_record = reader.headers().map_err(|source| InputError::Header {
            path: path.to_path_buf(),
            source,
        })?;
        if header_record.is_empty() {
            return Err(InputError::Empty {
                path: path.to_path_buf(),
            });
        }
        let headers: Vec<String> = header_record.iter().map(str::to_string).collect();

        let wanted: HashSet<&str> = fields.iter().map(String::as_str).collect();
        let keep = headers
            .iter()
            .map(|name| wanted.is_empty() || wanted.contains(name.as_str()))
            .collect();

        Ok(Self {
            reader,
            headers,
            keep,
            record: csv::StringRecord::new(),
            exhausted: false,
        })
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    /// Reads the next row. `None` means end of file.
    /// An I/O error is reported once and then ends the stream.
    pub fn next_row(&mut self) -> Option<Result<Row, RecordError>> {
        if self.exhausted {
            return None;
        }
        match self.reader.read_record(&mut self.record) {
            Ok(false) => {
                self.exhausted = true;
                None
            }
            Ok(true) => {
                let line = self.record.position().map(|p| p.line()).unwrap_or(0);
                let fields: BTreeMap<String, String> = self
                    .headers
                    .iter()
                    .zip(self.keep.iter())
                    .zip(self.record.iter())
                    .filter(|((_, keep), _)| **keep)
                    .map(|((name, _), value)| (name.clone(), value.to_string()))
                    .collect();
                Some(Ok(Row::new(line, fields)))
            }
            Err(source) => {
                let line = source
                    .position()
                    .map(|p| p.line())
                    .unwrap_or_else(|| self.reader.position().line());
                if source.is_io_error() {
                    self.exhausted = true;
                }
                Some(Err(RecordError { line, source }))
            }
        }
    }
}

impl Iterator for RowSource {
    type Item = Result<Row, RecordError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_row()
    }
}
