use std::collections::BTreeMap;
use std::fmt;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use bytes::Bytes;
use serde::{Serialize, Serializer};

/// One parsed record of the input file, projected onto the configured fields.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Row {
    line: u64,
    fields: BTreeMap<String, String>,
}

impl Row {
    pub fn new(line: u64, fields: BTreeMap<String, String>) -> Self {
        Self { line, fields }
    }

    /// Convenience constructor used by callers that already hold string pairs.
    pub fn from_pairs<K, V>(line: u64, pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        let fields = pairs
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        Self { line, fields }
    }

    /// Physical line number of the record in the input file (header is line 1).
    pub fn line(&self) -> u64 {
        self.line
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.fields.get(field).map(String::as_str)
    }

    pub fn fields(&self) -> &BTreeMap<String, String> {
        &self.fields
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl fmt::Display for Row {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (key, value) in &self.fields {
            if !first {
                f.write_str(", ")?;
            }
            write!(f, "{key}={value}")?;
            first = false;
        }
        Ok(())
    }
}

/// Multi-valued response headers, keyed by lower-case header name.
pub type HeaderMap = BTreeMap<String, Vec<String>>;

/// What came back from one issued request.
///
/// Non-2xx statuses are outcomes too; only transport failures are errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestOutcome {
    /// Final URL as seen by the transport, after redirects.
    pub url: String,
    pub status: u16,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl RequestOutcome {
    pub fn is_ok(&self) -> bool {
        self.status == 200
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind}: {message}")]
pub struct RequestError {
    pub kind: FailureKind,
    pub message: String,
}

impl RequestError {
    pub fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn is_cancelled(&self) -> bool {
        self.kind == FailureKind::Cancelled
    }
}

/// A request that produced no response, together with the URL it targeted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestFailure {
    pub url: String,
    pub error: RequestError,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    UnsupportedMethod(String),
    InvalidUrl,
    InvalidRequest,
    Timeout,
    RedirectLimitExceeded,
    Cancelled,
    Network,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::UnsupportedMethod(method) => write!(f, "unsupported method {method}"),
            FailureKind::InvalidUrl => write!(f, "invalid url"),
            FailureKind::InvalidRequest => write!(f, "invalid request"),
            FailureKind::Timeout => write!(f, "timeout"),
            FailureKind::RedirectLimitExceeded => write!(f, "redirect limit exceeded"),
            FailureKind::Cancelled => write!(f, "cancelled"),
            FailureKind::Network => write!(f, "network error"),
        }
    }
}

/// One line of the structured output file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SinkLine {
    pub url: String,
    pub status: u16,
    pub error: Option<String>,
    #[serde(serialize_with = "serialize_base64")]
    pub body: Bytes,
}

impl SinkLine {
    pub fn from_outcome(outcome: &RequestOutcome) -> Self {
        Self {
            url: outcome.url.clone(),
            status: outcome.status,
            error: None,
            body: outcome.body.clone(),
        }
    }

    /// Failed requests are recorded with a zero status and an empty body.
    pub fn from_failure(failure: &RequestFailure) -> Self {
        Self {
            url: failure.url.clone(),
            status: 0,
            error: Some(failure.error.to_string()),
            body: Bytes::new(),
        }
    }
}

fn serialize_base64<S: Serializer>(body: &Bytes, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&BASE64.encode(body))
}
