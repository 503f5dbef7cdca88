//! In-process mock of the prediction service for integration tests
//!
//! Serves `/predict`, `/predict-from-link` and `/` on an ephemeral local
//! port, records every prediction request body, and answers with whatever
//! [`MockReply`] is currently scripted.

#![allow(dead_code)]

use axum::extract::State;
use axum::http::{StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use repp_common::config::ClientConfig;
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Scripted response of the mock service
#[derive(Debug, Clone)]
pub enum MockReply {
    /// 200 with a prediction body
    Prediction { per_meter: f64, total: f64 },
    /// Given status with a JSON body
    Json { status: u16, body: Value },
    /// Given status with a raw text body
    Text { status: u16, body: String },
    /// Sleep before answering with a prediction
    Slow(Duration),
}

/// One request seen by the mock
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub path: String,
    pub body: Value,
}

#[derive(Debug)]
struct MockState {
    reply: Mutex<MockReply>,
    requests: Mutex<Vec<RecordedRequest>>,
}

/// Running mock service
pub struct MockService {
    pub base_url: String,
    state: Arc<MockState>,
}

impl MockService {
    /// Bind to 127.0.0.1 on a free port and start serving
    pub async fn start(reply: MockReply) -> Self {
        let state = Arc::new(MockState {
            reply: Mutex::new(reply),
            requests: Mutex::new(Vec::new()),
        });

        let app = Router::new()
            .route("/", get(health))
            .route("/predict", post(predict))
            .route("/predict-from-link", post(predict))
            .with_state(Arc::clone(&state));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Should bind mock service");
        let addr = listener.local_addr().expect("Should have local address");

        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("Mock service failed");
        });

        Self {
            base_url: format!("http://{}", addr),
            state,
        }
    }

    /// Client configuration pointing at this mock
    pub fn config(&self) -> ClientConfig {
        ClientConfig {
            api_base_url: self.base_url.clone(),
            request_timeout: Duration::from_secs(5),
            ..ClientConfig::default()
        }
    }

    pub fn set_reply(&self, reply: MockReply) {
        *self.state.reply.lock().unwrap() = reply;
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.state.requests.lock().unwrap().clone()
    }

    pub fn request_count(&self) -> usize {
        self.state.requests.lock().unwrap().len()
    }
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "API is running successfully" }))
}

async fn predict(
    State(state): State<Arc<MockState>>,
    uri: Uri,
    Json(body): Json<Value>,
) -> Response {
    state.requests.lock().unwrap().push(RecordedRequest {
        path: uri.path().to_string(),
        body,
    });

    let reply = state.reply.lock().unwrap().clone();
    match reply {
        MockReply::Prediction { per_meter, total } => Json(json!({
            "predicted_price_per_meter": per_meter,
            "estimated_total_price": total,
        }))
        .into_response(),
        MockReply::Json { status, body } => (status_code(status), Json(body)).into_response(),
        MockReply::Text { status, body } => (status_code(status), body).into_response(),
        MockReply::Slow(delay) => {
            tokio::time::sleep(delay).await;
            Json(json!({
                "predicted_price_per_meter": 1.0,
                "estimated_total_price": 1.0,
            }))
            .into_response()
        }
    }
}

fn status_code(status: u16) -> StatusCode {
    StatusCode::from_u16(status).expect("Test status code should be valid")
}

/// An address nothing listens on
pub async fn unreachable_base_url() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Should bind throwaway listener");
    let addr = listener.local_addr().expect("Should have local address");
    drop(listener);
    format!("http://{}", addr)
}
