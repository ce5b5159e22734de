use async_trait::async_trait;
use reqwest::StatusCode;
use thiserror::Error;
use tracing::{debug, warn};

use crate::api::{RunRequest, RunResponse};

pub const RUN_PATH: &str = "/api/run";

/// A failed `/api/run` call.
///
/// Network errors, non-2xx statuses and undecodable bodies all land here
/// without further distinction. The message may be empty.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct RequestError {
    message: String,
}

impl RequestError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    fn from_status(status: StatusCode, body: String) -> Self {
        if body.is_empty() {
            Self::new(status.canonical_reason().unwrap_or_default())
        } else {
            Self::new(body)
        }
    }
}

impl From<reqwest::Error> for RequestError {
    fn from(err: reqwest::Error) -> Self {
        Self::new(err.to_string())
    }
}

#[async_trait]
pub trait AgentRunner: Send + Sync {
    async fn run(&self, query: &str) -> Result<RunResponse, RequestError>;
}

#[derive(Debug, Clone)]
pub struct AgentClient {
    http: reqwest::Client,
    run_url: String,
}

impl AgentClient {
    pub fn new(base_url: &str) -> Self {
        Self::with_http(reqwest::Client::new(), base_url)
    }

    pub fn with_http(http: reqwest::Client, base_url: &str) -> Self {
        Self {
            http,
            run_url: format!("{}{RUN_PATH}", base_url.trim_end_matches('/')),
        }
    }

    pub fn run_url(&self) -> &str {
        &self.run_url
    }
}

#[async_trait]
impl AgentRunner for AgentClient {
    async fn run(&self, query: &str) -> Result<RunResponse, RequestError> {
        // `.json` sets `Content-Type: application/json`.
        debug!(url = %self.run_url, "posting query");

        let response = self
            .http
            .post(&self.run_url)
            .json(&RunRequest {
                query: query.to_string(),
            })
            .send()
            .await
            .map_err(|e| {
                warn!(error = %e, "agent request failed to send");
                RequestError::from(e)
            })?;

        let status = response.status();
        if !status.is_success() {
            warn!(%status, "agent request returned an error status");
            let body = response.text().await.map_err(|e| {
                warn!(error = %e, "agent error body could not be read");
                RequestError::from(e)
            })?;
            return Err(RequestError::from_status(status, body));
        }

        response.json::<RunResponse>().await.map_err(|e| {
            warn!(error = %e, "agent response could not be decoded");
            RequestError::from(e)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn run_url_joins_base_and_path() {
        assert_eq!(
            AgentClient::new("http://localhost:3000/").run_url(),
            "http://localhost:3000/api/run"
        );
        assert_eq!(
            AgentClient::new("http://localhost:3000").run_url(),
            "http://localhost:3000/api/run"
        );
    }

    #[test]
    fn status_error_prefers_body_text() {
        let err = RequestError::from_status(
            StatusCode::INTERNAL_SERVER_ERROR,
            "Internal error".to_string(),
        );
        assert_eq!(err.message(), "Internal error");

        let err = RequestError::from_status(StatusCode::SERVICE_UNAVAILABLE, String::new());
        assert_eq!(err.message(), "Service Unavailable");
    }

    #[test]
    fn unregistered_status_without_body_has_no_message() {
        let status = StatusCode::from_u16(599).unwrap();
        let err = RequestError::from_status(status, String::new());
        assert_eq!(err.message(), "");
    }
}
