//! Rowpost engine: row source, request gateway, sinks and the pipeline coordinator.
mod counters;
mod gateway;
mod http;
mod memlog;
mod message;
mod processor;
mod rows;
mod settings;
mod sink;
mod template;
mod types;

pub use counters::{CounterSnapshot, RunCounters};
pub use gateway::{Gateway, DEFAULT_CONTENT_TYPE};
pub use http::{ClientSettings, HttpClient, HttpMethod, HttpRequest, HttpResponse, ReqwestClient};
pub use memlog::MemoryLog;
pub use message::{LogMessage, MessageKind};
pub use processor::{Processor, RunError, RunHandle};
pub use rows::{parse_separator, ConfigError, InputError, RecordError, RowSource};
pub use settings::{RunSettings, MAX_WORKERS};
pub use sink::{FileSink, SinkError};
pub use template::{Template, NO_VALUE};
pub use tokio_util::sync::CancellationToken;
pub use types::{
    FailureKind, HeaderMap, RequestError, RequestFailure, RequestOutcome, Row, SinkLine,
};
