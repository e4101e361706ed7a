#![allow(dead_code)]

use std::collections::HashMap;
use std::io::Write;
use std::path::PathBuf;
use std::sync::{Arc, Mutex, Once};
use std::time::Duration;

use rowpost_engine::{
    CancellationToken, FailureKind, HeaderMap, HttpClient, HttpRequest, HttpResponse,
    RequestError, RunSettings,
};
use tempfile::TempDir;

pub fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(rowpost_logging::initialize_for_tests);
}

/// In-process client that answers from a status script and records requests.
#[derive(Default)]
pub struct ScriptedClient {
    statuses: HashMap<String, u16>,
    delay: Duration,
    requests: Mutex<Vec<HttpRequest>>,
}

impl ScriptedClient {
    pub fn ok() -> Self {
        Self::default()
    }

    pub fn with_status(mut self, url: &str, status: u16) -> Self {
        self.statuses.insert(url.to_string(), status);
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait::async_trait]
impl HttpClient for ScriptedClient {
    async fn send(
        &self,
        request: HttpRequest,
        cancel: &CancellationToken,
    ) -> Result<HttpResponse, RequestError> {
        self.requests.lock().unwrap().push(request.clone());
        if !self.delay.is_zero() {
            tokio::select! {
                _ = cancel.cancelled() => {
                    return Err(RequestError::new(FailureKind::Cancelled, "cancelled"));
                }
                _ = tokio::time::sleep(self.delay) => {}
            }
        }
        let status = self.statuses.get(&request.url).copied().unwrap_or(200);
        let mut headers = HeaderMap::new();
        headers.insert(
            "content-type".to_string(),
            vec!["application/json".to_string()],
        );
        Ok(HttpResponse {
            final_url: request.url.clone(),
            status,
            headers,
            body: bytes::Bytes::from(format!("{{\"echo\":{:?}}}", request.body)),
        })
    }
}

pub fn write_input(dir: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    let mut file = std::fs::File::create(&path).unwrap();
    file.write_all(content.as_bytes()).unwrap();
    path
}

pub fn scenario_settings(method: &str, workers: usize) -> RunSettings {
    RunSettings {
        token: "secret".to_string(),
        method: method.to_string(),
        url_template: "https://h/api/{{.id}}".to_string(),
        body_template: "{\"v\":\"{{.v}}\"}".to_string(),
        fields: vec!["id".to_string(), "v".to_string()],
        workers,
        ..RunSettings::default()
    }
}

pub fn read_sink_lines(path: &std::path::Path) -> Vec<serde_json::Value> {
    std::fs::read_to_string(path)
        .unwrap_or_default()
        .lines()
        .map(|line| serde_json::from_str(line).expect("each line is one JSON object"))
        .collect()
}

pub fn shared(client: ScriptedClient) -> Arc<ScriptedClient> {
    Arc::new(client)
}
