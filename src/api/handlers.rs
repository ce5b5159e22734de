use std::sync::Arc;

use axum::{
    extract::State,
    http::{header::CONTENT_TYPE, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tokio::time::{timeout, Duration};
use tracing::{info, warn};

use crate::AppState;

use super::models::{ErrorResponse, RunRequest};

// Upstream status, body and content type pass through untouched.
pub async fn run(State(state): State<Arc<AppState>>, Json(payload): Json<RunRequest>) -> Response {
    let query = payload.query.trim();
    if query.is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: "Field \"query\" must be a non-empty string".to_string(),
            }),
        )
            .into_response();
    }

    let upstream_url = state.upstream_run_url();
    info!(url = %upstream_url, "forwarding query to agent backend");

    // One deadline covers both the response head and the body.
    let exchange = async {
        let upstream = state
            .http
            .post(&upstream_url)
            .json(&RunRequest {
                query: query.to_string(),
            })
            .send()
            .await
            .map_err(|e| ("Failed to reach agent backend", e))?;

        let status = upstream.status();
        let content_type = upstream.headers().get(CONTENT_TYPE).cloned();
        let body = upstream
            .bytes()
            .await
            .map_err(|e| ("Failed to read agent backend response", e))?;
        Ok::<_, (&'static str, reqwest::Error)>((status, content_type, body))
    };

    let (status, content_type, body) =
        match timeout(Duration::from_millis(state.timeout_ms), exchange).await {
            Err(_) => {
                warn!(timeout_ms = state.timeout_ms, "agent backend timed out");
                return (StatusCode::GATEWAY_TIMEOUT, "Agent backend timeout").into_response();
            }
            Ok(Err((context, e))) => {
                warn!(error = %e, "{context}");
                return (StatusCode::BAD_GATEWAY, format!("{context}: {e}")).into_response();
            }
            Ok(Ok(parts)) => parts,
        };

    if !status.is_success() {
        warn!(%status, "agent backend returned an error status");
    }

    let mut response = (status, body).into_response();
    if let Some(content_type) = content_type {
        response.headers_mut().insert(CONTENT_TYPE, content_type);
    }
    response
}

pub async fn health() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}

pub async fn not_found() -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorResponse {
            error: "Not found".to_string(),
        }),
    )
        .into_response()
}
