//! Mock transport for testing
//!
//! Replays queued responses in order and records every request so tests
//! can assert on exactly what went over the wire.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::Value;

use super::{FileReply, JsonReply, Transport};
use crate::error::RequestError;

/// A request as seen by the mock
#[derive(Debug, Clone, PartialEq)]
pub struct SentRequest {
    pub method: &'static str,
    pub path: String,
    pub body: Option<Value>,
}

enum Queued {
    Json(JsonReply),
    File(FileReply),
    Fail(String),
}

#[derive(Default)]
pub struct MockTransport {
    responses: Mutex<VecDeque<Queued>>,
    sent: Mutex<Vec<SentRequest>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a 200 JSON answer
    pub fn queue_json(&self, body: Value) {
        self.queue_json_status(200, body);
    }

    pub fn queue_json_status(&self, status: u16, body: Value) {
        self.push(Queued::Json(JsonReply { status, body }));
    }

    pub fn queue_file(&self, reply: FileReply) {
        self.push(Queued::File(reply));
    }

    /// Queue a network-level failure
    pub fn queue_failure(&self, message: &str) {
        self.push(Queued::Fail(message.to_string()));
    }

    pub fn sent(&self) -> Vec<SentRequest> {
        self.sent.lock().unwrap().clone()
    }

    fn push(&self, queued: Queued) {
        self.responses.lock().unwrap().push_back(queued);
    }

    fn record(&self, method: &'static str, path: &str, body: Option<Value>) {
        self.sent.lock().unwrap().push(SentRequest {
            method,
            path: path.to_string(),
            body,
        });
    }

    fn next(&self) -> Result<Queued, RequestError> {
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| RequestError::Transport("no response queued".into()))
    }

    fn next_json(&self) -> Result<JsonReply, RequestError> {
        match self.next()? {
            Queued::Json(reply) => Ok(reply),
            Queued::Fail(msg) => Err(RequestError::Transport(msg)),
            Queued::File(_) => Err(RequestError::Transport("queued a file, expected JSON".into())),
        }
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn post_json(&self, path: &str, body: &Value) -> Result<JsonReply, RequestError> {
        self.record("POST", path, Some(body.clone()));
        self.next_json()
    }

    async fn get_json(&self, path: &str) -> Result<JsonReply, RequestError> {
        self.record("GET", path, None);
        self.next_json()
    }

    async fn get_file(&self, path: &str) -> Result<FileReply, RequestError> {
        self.record("GET", path, None);
        match self.next()? {
            Queued::File(reply) => Ok(reply),
            Queued::Fail(msg) => Err(RequestError::Transport(msg)),
            Queued::Json(_) => Err(RequestError::Transport("queued JSON, expected a file".into())),
        }
    }

    fn resolve(&self, path: &str) -> String {
        format!("http://mock{}", path)
    }
}
