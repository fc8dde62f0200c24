//! In-memory transport for pipeline tests

use std::collections::VecDeque;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::transport::{Transport, TransportError, TransportRequest, TransportResponse};

/// Replays queued outcomes in order and records every request it receives.
///
/// Running out of outcomes yields a connection error.
#[derive(Default)]
pub(crate) struct ScriptedTransport {
    outcomes: Mutex<VecDeque<Result<TransportResponse, TransportError>>>,
    requests: Mutex<Vec<TransportRequest>>,
}

impl ScriptedTransport {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) async fn push_response(&self, response: TransportResponse) {
        self.outcomes.lock().await.push_back(Ok(response));
    }

    pub(crate) async fn push_json(&self, body: serde_json::Value) {
        self.push_response(TransportResponse::new(200, body.to_string()))
            .await;
    }

    pub(crate) async fn push_error(&self, error: TransportError) {
        self.outcomes.lock().await.push_back(Err(error));
    }

    pub(crate) async fn calls(&self) -> usize {
        self.requests.lock().await.len()
    }

    pub(crate) async fn requests(&self) -> Vec<TransportRequest> {
        self.requests.lock().await.clone()
    }

    /// Last request's parameter value for `key`.
    pub(crate) async fn last_param(&self, key: &str) -> Option<String> {
        self.requests.lock().await.last().and_then(|r| {
            r.params
                .iter()
                .find(|(k, _)| k == key)
                .map(|(_, v)| v.clone())
        })
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn send(&self, request: &TransportRequest) -> Result<TransportResponse, TransportError> {
        self.requests.lock().await.push(request.clone());
        self.outcomes
            .lock()
            .await
            .pop_front()
            .unwrap_or_else(|| Err(TransportError::Connection("no scripted response".into())))
    }
}
