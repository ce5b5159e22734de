#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use axum::{
    extract::State,
    http::{header::CONTENT_TYPE, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use serde_json::{json, Value};

/// Requests seen by the mock agent: content type and JSON body.
#[derive(Clone, Default)]
pub struct Recorded(Arc<Mutex<Vec<(Option<String>, Value)>>>);

impl Recorded {
    pub fn bodies(&self) -> Vec<Value> {
        self.0.lock().unwrap().iter().map(|(_, b)| b.clone()).collect()
    }

    pub fn content_types(&self) -> Vec<Option<String>> {
        self.0.lock().unwrap().iter().map(|(c, _)| c.clone()).collect()
    }
}

/// Mock agent whose reply depends on the query text.
async fn scripted_agent(
    State(recorded): State<Recorded>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    let content_type = headers
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    recorded.0.lock().unwrap().push((content_type, body.clone()));

    match body["query"].as_str().unwrap_or_default() {
        "missing answer" => Json(json!({ "success": true })).into_response(),
        "null answer" => Json(json!({ "final_answer": null, "success": true })).into_response(),
        "not successful" => {
            Json(json!({ "final_answer": "no rooms", "success": false })).into_response()
        }
        "internal error" => (StatusCode::INTERNAL_SERVER_ERROR, "Internal error").into_response(),
        "unavailable" => StatusCode::SERVICE_UNAVAILABLE.into_response(),
        "unregistered" => StatusCode::from_u16(599).unwrap().into_response(),
        "garbage" => (StatusCode::OK, "this is not json").into_response(),
        _ => Json(json!({ "final_answer": "Room is free", "success": true })).into_response(),
    }
}

/// Serves the mock agent at `path` and returns its base URL.
pub async fn spawn_mock_agent(path: &str) -> (String, Recorded) {
    let recorded = Recorded::default();
    let app = Router::new()
        .route(path, post(scripted_agent))
        .with_state(recorded.clone());
    let listener = tokio::net::TcpListener::bind(("127.0.0.1", 0)).await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (format!("http://{addr}"), recorded)
}

/// A base URL nothing listens on.
pub async fn dead_base_url() -> String {
    let listener = tokio::net::TcpListener::bind(("127.0.0.1", 0)).await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}")
}

/// Upstream that accepts a request, writes `partial` and then stalls.
pub async fn spawn_stalling_upstream(partial: &'static [u8]) -> String {
    spawn_raw_upstream(partial, std::time::Duration::from_secs(30)).await
}

/// Upstream that writes `partial` and hangs up at once.
pub async fn spawn_truncating_upstream(partial: &'static [u8]) -> String {
    spawn_raw_upstream(partial, std::time::Duration::ZERO).await
}

async fn spawn_raw_upstream(partial: &'static [u8], hold: std::time::Duration) -> String {
    use tokio::io::{AsyncReadExt, AsyncWriteExt};

    let listener = tokio::net::TcpListener::bind(("127.0.0.1", 0)).await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        while let Ok((mut socket, _)) = listener.accept().await {
            tokio::spawn(async move {
                let mut buf = [0u8; 4096];
                let _ = socket.read(&mut buf).await;
                let _ = socket.write_all(partial).await;
                tokio::time::sleep(hold).await;
                drop(socket);
            });
        }
    });

    format!("http://{addr}")
}
