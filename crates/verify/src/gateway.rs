use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("HTTP transport failure: {0}")]
    Transport(String),
    #[error("Failed to build HTTP client: {0}")]
    Build(String),
}

/// Raw result of one lookup probe. Non-200 statuses are data, not errors —
/// only transport-level failures surface as `GatewayError`.
#[derive(Debug, Clone)]
pub struct ProbeResponse {
    pub status: u16,
    pub body: String,
}

/// Abstraction over the receipt-lookup HTTP boundary: GET a URL, get back
/// status and body text. Implementations must not retry — each probe is a
/// single bounded attempt.
#[async_trait]
pub trait ReceiptGateway: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<ProbeResponse, GatewayError>;
}

// ── reqwest-backed gateway ────────────────────────────────────────────────────

pub struct HttpGateway {
    client: reqwest::Client,
}

impl HttpGateway {
    /// Build a gateway whose every request is bounded by `timeout`.
    pub fn new(timeout: Duration) -> Result<Self, GatewayError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| GatewayError::Build(e.to_string()))?;
        Ok(Self { client })
    }
}

#[async_trait]
impl ReceiptGateway for HttpGateway {
    async fn fetch(&self, url: &str) -> Result<ProbeResponse, GatewayError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| GatewayError::Transport(e.to_string()))?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| GatewayError::Transport(e.to_string()))?;

        Ok(ProbeResponse { status, body })
    }
}

// ── Mock gateway (always available, used for tests) ───────────────────────────

/// Replays a scripted FIFO of responses and records every requested URL, so
/// tests can assert the exact probe sequence without touching the network.
#[derive(Default)]
pub struct MockGateway {
    script: Mutex<VecDeque<Result<ProbeResponse, GatewayError>>>,
    requests: Mutex<Vec<String>>,
}

impl MockGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a response with the given status and body.
    pub fn respond(self, status: u16, body: impl Into<String>) -> Self {
        self.script
            .lock()
            .unwrap()
            .push_back(Ok(ProbeResponse { status, body: body.into() }));
        self
    }

    /// Queue a transport failure.
    pub fn fail(self, reason: impl Into<String>) -> Self {
        self.script
            .lock()
            .unwrap()
            .push_back(Err(GatewayError::Transport(reason.into())));
        self
    }

    /// URLs fetched so far, in order.
    pub fn requested_urls(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl ReceiptGateway for MockGateway {
    async fn fetch(&self, url: &str) -> Result<ProbeResponse, GatewayError> {
        self.requests.lock().unwrap().push(url.to_string());
        self.script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(GatewayError::Transport("mock script exhausted".into())))
    }
}
