mod handlers;
mod models;

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

use crate::AppState;

pub use handlers::{health, not_found, run};
pub use models::{ErrorResponse, RunRequest, RunResponse};

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/run", post(run))
        .route("/api/health", get(health))
        .fallback(not_found)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
