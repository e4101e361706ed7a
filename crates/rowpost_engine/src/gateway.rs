use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::http::{HttpClient, HttpMethod, HttpRequest};
use crate::template::Template;
use crate::{FailureKind, RequestError, RequestFailure, RequestOutcome, Row, RunSettings};

pub const DEFAULT_CONTENT_TYPE: &str = "application/json; charset=UTF-8";

/// Renders a row into a request and sends it through the injected client.
///
/// Holds no mutable state, so one gateway serves every worker of a run.
pub struct Gateway {
    client: Arc<dyn HttpClient>,
    method: String,
    url: Template,
    body: Template,
    headers: Vec<(String, String)>,
}

impl Gateway {
    pub fn new(settings: &RunSettings, client: Arc<dyn HttpClient>) -> Self {
        Self {
            client,
            method: settings.method.clone(),
            url: Template::compile(&settings.url_template),
            body: Template::compile(&settings.body_template),
            headers: build_headers(&settings.token, &settings.headers),
        }
    }

    pub fn render_url(&self, row: &Row) -> String {
        self.url.render(row)
    }

    pub fn render_body(&self, row: &Row) -> String {
        self.body.render(row)
    }

    pub fn headers(&self) -> &[(String, String)] {
        &self.headers
    }

    pub async fn execute(
        &self,
        row: &Row,
        cancel: &CancellationToken,
    ) -> Result<RequestOutcome, RequestFailure> {
        let url = self.render_url(row);
        let Some(method) = HttpMethod::parse(&self.method) else {
            return Err(RequestFailure {
                url,
                error: RequestError::new(
                    FailureKind::UnsupportedMethod(self.method.clone()),
                    "only POST and PUT are supported",
                ),
            });
        };

        let request = HttpRequest {
            method,
            url: url.clone(),
            headers: self.headers.clone(),
            body: self.render_body(row),
        };

        match self.client.send(request, cancel).await {
            Ok(response) => Ok(RequestOutcome {
                url: response.final_url,
                status: response.status,
                headers: response.headers,
                body: response.body,
            }),
            Err(error) => Err(RequestFailure { url, error }),
        }
    }
}

fn build_headers(token: &str, extra: &[(String, String)]) -> Vec<(String, String)> {
    let mut headers = vec![
        ("Authorization".to_string(), format!("Bearer {token}")),
        ("Content-Type".to_string(), DEFAULT_CONTENT_TYPE.to_string()),
    ];
    for (name, value) in extra {
        headers.retain(|(existing, _)| !existing.eq_ignore_ascii_case(name));
        headers.push((name.clone(), value.clone()));
    }
    headers
}
