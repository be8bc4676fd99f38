use async_trait::async_trait;
use std::time::Duration;
use tracing::debug;

use super::wire::{ErrorBody, TestRequest, TestRunResponse, decode_response};
use crate::error::SubmissionError;

/// Path of the test submission endpoint, relative to the backend base URL
pub const TEST_ENDPOINT: &str = "/api/test-connectivity";

/// Anything that can run a connectivity test for a request.
///
/// Single-flight is the caller's responsibility; implementations may be
/// invoked concurrently.
#[async_trait]
pub trait TestRunner: Send + Sync {
    async fn submit(&self, request: &TestRequest) -> Result<TestRunResponse, SubmissionError>;
}

/// HTTP client for the backend test runner
#[derive(Debug, Clone)]
pub struct TestRunClient {
    client: reqwest::Client,
    endpoint: String,
}

impl TestRunClient {
    /// Build a client for `base_url` (e.g. `http://localhost:5000`)
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, SubmissionError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(format!("conncheck/{}", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| SubmissionError::Transport(e.to_string()))?;

        Ok(Self::with_client(client, base_url))
    }

    /// Use an existing reqwest client (shared connection pool)
    pub fn with_client(client: reqwest::Client, base_url: &str) -> Self {
        Self {
            client,
            endpoint: format!("{}{}", base_url.trim_end_matches('/'), TEST_ENDPOINT),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl TestRunner for TestRunClient {
    async fn submit(&self, request: &TestRequest) -> Result<TestRunResponse, SubmissionError> {
        debug!(
            endpoint = %self.endpoint,
            source = %request.source,
            destinations = request.destinations.len(),
            "submitting connectivity test"
        );

        // .json() sets Content-Type: application/json
        let resp = self.client.post(&self.endpoint).json(request).send().await?;
        let status = resp.status();
        let body = resp.bytes().await?;

        if !status.is_success() {
            return Err(error_from_body(status.as_u16(), &body));
        }

        decode_response(&body).map_err(|e| SubmissionError::Decode(e.to_string()))
    }
}

/// Map a non-2xx response to a submission error, preferring the backend's message
fn error_from_body(status: u16, body: &[u8]) -> SubmissionError {
    match serde_json::from_slice::<ErrorBody>(body) {
        Ok(ErrorBody {
            error: Some(message),
        }) => SubmissionError::Backend { status, message },
        _ => SubmissionError::Status { status },
    }
}
