#![allow(dead_code)]

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use serde_json::{json, Value};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use flashcard_api::OllamaConfig;

/// One scripted reply from the mock Ollama server
#[derive(Debug, Clone)]
pub struct MockReply {
    pub status: u16,
    pub body: String,
    pub delay: Duration,
}

impl MockReply {
    /// A successful `/api/generate` reply whose `response` field is `text`
    pub fn generated(text: &str) -> Self {
        Self {
            status: 200,
            body: json!({
                "model": "llama3.2:3b",
                "created_at": "2024-06-01T12:00:00Z",
                "response": text,
                "done": true
            })
            .to_string(),
            delay: Duration::ZERO,
        }
    }

    pub fn status(status: u16, body: &str) -> Self {
        Self {
            status,
            body: body.to_string(),
            delay: Duration::ZERO,
        }
    }

    pub fn ok() -> Self {
        Self::status(200, r#"{"models":[]}"#)
    }

    pub fn delayed(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    async fn respond(self) -> Response {
        tokio::time::sleep(self.delay).await;
        let status = StatusCode::from_u16(self.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, [(header::CONTENT_TYPE, "application/json")], self.body).into_response()
    }
}

struct MockState {
    tags_reply: MockReply,
    generate_script: Mutex<VecDeque<MockReply>>,
    generate_fallback: MockReply,
    generate_calls: Mutex<Vec<Instant>>,
    received: Mutex<Vec<Value>>,
}

/// An in-process stand-in for Ollama's `/api/tags` and `/api/generate`
pub struct MockOllama {
    pub base_url: String,
    state: Arc<MockState>,
}

impl MockOllama {
    /// Serve `script` in order for generate calls, then `fallback` forever
    pub async fn start(tags_reply: MockReply, script: Vec<MockReply>, fallback: MockReply) -> Self {
        let state = Arc::new(MockState {
            tags_reply,
            generate_script: Mutex::new(script.into()),
            generate_fallback: fallback,
            generate_calls: Mutex::new(Vec::new()),
            received: Mutex::new(Vec::new()),
        });

        let app = Router::new()
            .route("/api/tags", get(tags))
            .route("/api/generate", post(generate))
            .with_state(state.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            base_url: format!("http://{}", addr),
            state,
        }
    }

    /// A healthy backend that always generates `text`
    pub async fn generating(text: &str) -> Self {
        Self::start(MockReply::ok(), Vec::new(), MockReply::generated(text)).await
    }

    pub fn generate_calls(&self) -> usize {
        self.state.generate_calls.lock().unwrap().len()
    }

    pub fn call_instants(&self) -> Vec<Instant> {
        self.state.generate_calls.lock().unwrap().clone()
    }

    pub fn received_requests(&self) -> Vec<Value> {
        self.state.received.lock().unwrap().clone()
    }

    /// Client configuration pointing at this mock with short retry delays
    pub fn config(&self) -> OllamaConfig {
        OllamaConfig {
            base_url: self.base_url.clone(),
            retry_delay_ms: 10,
            request_timeout_ms: 5_000,
            probe_timeout_ms: 1_000,
            ..OllamaConfig::default()
        }
    }
}

async fn tags(State(state): State<Arc<MockState>>) -> Response {
    state.tags_reply.clone().respond().await
}

async fn generate(State(state): State<Arc<MockState>>, Json(body): Json<Value>) -> Response {
    state.generate_calls.lock().unwrap().push(Instant::now());
    state.received.lock().unwrap().push(body);
    let reply = state
        .generate_script
        .lock()
        .unwrap()
        .pop_front()
        .unwrap_or_else(|| state.generate_fallback.clone());
    reply.respond().await
}

/// Configuration for a backend nobody listens on
pub fn unreachable_config() -> OllamaConfig {
    OllamaConfig {
        base_url: "http://127.0.0.1:1".to_string(),
        retry_delay_ms: 10,
        request_timeout_ms: 1_000,
        probe_timeout_ms: 500,
        ..OllamaConfig::default()
    }
}
