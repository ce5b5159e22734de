pub mod api;
pub mod cli;
pub mod client;
pub mod config;
pub mod form;
pub mod render;

use std::sync::Arc;

use axum::Router;
use tracing::info;

use crate::config::AppConfig;

pub use client::{AgentClient, AgentRunner, RequestError};
pub use form::{FormController, FormState, FALLBACK_ERROR};

#[derive(Clone)]
pub struct AppState {
    pub backend_url: String,
    pub timeout_ms: u64,
    pub http: reqwest::Client,
}

impl AppState {
    pub fn new(backend_url: impl Into<String>, timeout_ms: u64) -> Self {
        Self {
            backend_url: backend_url.into(),
            timeout_ms,
            http: reqwest::Client::new(),
        }
    }

    pub fn from_config(config: &AppConfig) -> Arc<Self> {
        Arc::new(Self::new(config.backend_url.clone(), config.timeout_ms))
    }

    pub fn upstream_run_url(&self) -> String {
        format!("{}/run", self.backend_url.trim_end_matches('/'))
    }
}

pub fn build_app(state: Arc<AppState>) -> Router {
    api::router(state)
}

pub async fn run_server(app: Router, port: u16) -> std::io::Result<()> {
    let listener = tokio::net::TcpListener::bind(("0.0.0.0", port)).await?;
    info!("gateway listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await
}
