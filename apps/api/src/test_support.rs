//! In-memory collaborators and a local completion server for tests.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use axum::{
    extract::State,
    http::{header, HeaderMap, StatusCode},
    routing::post,
    Router,
};
use bytes::Bytes;
use serde_json::{json, Value};

use crate::models::resume::NewResumeRecord;
use crate::resumes::repository::ResumeStore;
use crate::storage::ObjectStore;

// ────────────────────────────────────────────────────────────────────────────
// Object store
// ────────────────────────────────────────────────────────────────────────────

#[derive(Default)]
pub struct MemoryObjectStore {
    objects: HashMap<(String, String), Bytes>,
}

impl MemoryObjectStore {
    pub fn with_object(mut self, bucket: &str, key: &str, data: impl AsRef<[u8]>) -> Self {
        self.objects.insert(
            (bucket.to_string(), key.to_string()),
            Bytes::copy_from_slice(data.as_ref()),
        );
        self
    }
}

#[async_trait]
impl ObjectStore for MemoryObjectStore {
    async fn get_object(&self, bucket: &str, key: &str) -> Result<Bytes> {
        self.objects
            .get(&(bucket.to_string(), key.to_string()))
            .cloned()
            .ok_or_else(|| anyhow!("Failed to fetch s3://{bucket}/{key}: NoSuchKey"))
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Resume stores
// ────────────────────────────────────────────────────────────────────────────

#[derive(Default)]
pub struct RecordingResumeStore {
    records: Mutex<Vec<NewResumeRecord>>,
}

impl RecordingResumeStore {
    pub fn records(&self) -> Vec<NewResumeRecord> {
        self.records.lock().unwrap().clone()
    }
}

#[async_trait]
impl ResumeStore for RecordingResumeStore {
    async fn insert(&self, record: &NewResumeRecord) -> Result<()> {
        self.records.lock().unwrap().push(record.clone());
        Ok(())
    }
}

/// Fails every insert the way an exhausted pool does.
pub struct FailingResumeStore;

#[async_trait]
impl ResumeStore for FailingResumeStore {
    async fn insert(&self, _record: &NewResumeRecord) -> Result<()> {
        Err(anyhow!("pool timed out while waiting for an open connection"))
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Completion server
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct CannedReply {
    status: StatusCode,
    body: String,
    delay: Option<Duration>,
}

impl CannedReply {
    pub fn new(status: StatusCode, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
            delay: None,
        }
    }

    pub fn ok(body: impl Into<String>) -> Self {
        Self::new(StatusCode::OK, body)
    }

    pub fn delayed(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }
}

#[derive(Debug, Clone)]
pub struct CapturedRequest {
    pub authorization: Option<String>,
    pub body: Value,
}

pub struct CompletionServer {
    pub url: String,
    captured: Arc<Mutex<Vec<CapturedRequest>>>,
}

impl CompletionServer {
    pub fn last_request(&self) -> Option<CapturedRequest> {
        self.captured.lock().unwrap().last().cloned()
    }
}

#[derive(Clone)]
struct ServerState {
    reply: CannedReply,
    captured: Arc<Mutex<Vec<CapturedRequest>>>,
}

async fn complete(
    State(state): State<ServerState>,
    headers: HeaderMap,
    body: String,
) -> (StatusCode, String) {
    let authorization = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .map(String::from);
    let body = serde_json::from_str(&body).unwrap_or(Value::Null);
    state.captured.lock().unwrap().push(CapturedRequest {
        authorization,
        body,
    });

    if let Some(delay) = state.reply.delay {
        tokio::time::sleep(delay).await;
    }
    (state.reply.status, state.reply.body.clone())
}

/// Serves `reply` for every POST on an ephemeral local port.
pub async fn spawn_completion_server(reply: CannedReply) -> CompletionServer {
    let captured = Arc::new(Mutex::new(Vec::new()));
    let app = Router::new()
        .route("/openai/v1/chat/completions", post(complete))
        .with_state(ServerState {
            reply,
            captured: captured.clone(),
        });

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    CompletionServer {
        url: format!("http://{addr}/openai/v1/chat/completions"),
        captured,
    }
}

/// Wraps `content` the way an OpenAI-compatible endpoint returns it: as a
/// JSON string inside the first choice.
pub fn completion_envelope(content: &Value) -> String {
    json!({
        "id": "chatcmpl-test",
        "object": "chat.completion",
        "model": "openai/gpt-oss-120b",
        "choices": [{
            "index": 0,
            "message": { "role": "assistant", "content": content.to_string() },
            "finish_reason": "stop"
        }],
        "usage": { "prompt_tokens": 42, "completion_tokens": 17, "total_tokens": 59 }
    })
    .to_string()
}
