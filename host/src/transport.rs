//! Executes core-built requests with ureq.
//!
//! ureq is blocking; `Session` runs each call on tokio's blocking pool so
//! any number of requests can be in flight at once.

use std::fmt;
use std::time::Duration;

use todo_core::{ApiError, HttpMethod, HttpRequest, HttpResponse};
use tracing::debug;
use ureq::typestate::WithBody;
use ureq::RequestBuilder;

#[derive(Clone)]
pub struct Transport {
    agent: ureq::Agent,
}

impl fmt::Debug for Transport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Transport").finish_non_exhaustive()
    }
}

impl Transport {
    /// Status codes are returned as data (`http_status_as_error(false)`) so
    /// the core client decides what counts as failure.
    pub fn new(timeout: Duration) -> Self {
        let agent = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .timeout_global(Some(timeout))
            .build()
            .new_agent();
        Self { agent }
    }

    pub fn execute(&self, req: HttpRequest) -> Result<HttpResponse, ApiError> {
        debug!(method = %req.method, path = %req.path, "sending request");
        let result = match req.method {
            HttpMethod::Get => with_headers(self.agent.get(&req.path), &req.headers).call(),
            HttpMethod::Delete => with_headers(self.agent.delete(&req.path), &req.headers).call(),
            HttpMethod::Post => send(
                with_headers(self.agent.post(&req.path), &req.headers),
                req.body.as_deref(),
            ),
            HttpMethod::Patch => send(
                with_headers(self.agent.patch(&req.path), &req.headers),
                req.body.as_deref(),
            ),
        };
        let mut response = result.map_err(|e| ApiError::Transport(e.to_string()))?;

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|value| (name.as_str().to_string(), value.to_string()))
            })
            .collect();
        let body = response
            .body_mut()
            .read_to_string()
            .map_err(|e| ApiError::Transport(e.to_string()))?;
        debug!(status, path = %req.path, "response received");

        Ok(HttpResponse { status, headers, body })
    }
}

impl Default for Transport {
    fn default() -> Self {
        Self::new(Duration::from_secs(10))
    }
}

fn with_headers<B>(mut builder: RequestBuilder<B>, headers: &[(String, String)]) -> RequestBuilder<B> {
    for (name, value) in headers {
        builder = builder.header(name.as_str(), value.as_str());
    }
    builder
}

fn send(
    builder: RequestBuilder<WithBody>,
    body: Option<&str>,
) -> Result<ureq::http::Response<ureq::Body>, ureq::Error> {
    match body {
        Some(body) => builder.send(body.as_bytes()),
        None => builder.send_empty(),
    }
}
