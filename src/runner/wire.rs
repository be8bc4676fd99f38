//! Wire types for the test-connectivity endpoint.
//!
//! The backend has answered with two shapes over time: a bare JSON array of
//! results, and an object wrapping `results` with optional run `metadata`.
//! Both decode into [`WireResponse`] and are normalized into the single
//! canonical [`TestRunResponse`] before anything else sees them.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Request body for `POST /api/test-connectivity`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestRequest {
    pub source: String,
    pub destinations: Vec<String>,
}

impl TestRequest {
    pub fn new(source: impl Into<String>, destinations: Vec<String>) -> Self {
        Self {
            source: source.into(),
            destinations,
        }
    }
}

/// Outcome of a single destination check.
///
/// Anything other than `SUCCESS` or `FAILED` is kept verbatim in `Other`,
/// rendered as-is and counted as a failure.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TestStatus {
    Success,
    Failed,
    Other(String),
}

impl TestStatus {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Success => "SUCCESS",
            Self::Failed => "FAILED",
            Self::Other(s) => s,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success)
    }
}

impl From<String> for TestStatus {
    fn from(s: String) -> Self {
        match s.as_str() {
            "SUCCESS" => Self::Success,
            "FAILED" => Self::Failed,
            _ => Self::Other(s),
        }
    }
}

impl From<&str> for TestStatus {
    fn from(s: &str) -> Self {
        Self::from(s.to_string())
    }
}

impl From<TestStatus> for String {
    fn from(status: TestStatus) -> Self {
        match status {
            TestStatus::Other(s) => s,
            other => other.as_str().to_string(),
        }
    }
}

impl fmt::Display for TestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// Result for one destination
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestResult {
    pub destination: String,
    pub status: TestStatus,
    #[serde(default)]
    pub details: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<String>,
}

impl TestResult {
    pub fn new(
        destination: impl Into<String>,
        status: impl Into<TestStatus>,
        details: impl Into<String>,
    ) -> Self {
        Self {
            destination: destination.into(),
            status: status.into(),
            details: details.into(),
            duration: None,
        }
    }

    pub fn with_duration(mut self, duration: impl Into<String>) -> Self {
        self.duration = Some(duration.into());
        self
    }
}

/// Run metadata attached by the Kubernetes-backed runner
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kubernetes_job_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kubernetes_pod_names: Option<Vec<String>>,
}

impl RunMetadata {
    pub fn job_name(&self) -> Option<&str> {
        self.kubernetes_job_name.as_deref()
    }

    pub fn pod_names(&self) -> &[String] {
        self.kubernetes_pod_names.as_deref().unwrap_or_default()
    }
}

/// Canonical response shape, independent of what the backend sent
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestRunResponse {
    pub results: Vec<TestResult>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<RunMetadata>,
}

impl TestRunResponse {
    pub fn new(results: Vec<TestResult>) -> Self {
        Self {
            results,
            metadata: None,
        }
    }

    pub fn with_metadata(mut self, metadata: RunMetadata) -> Self {
        self.metadata = Some(metadata);
        self
    }
}

/// Object form: `results` plus optional run metadata
#[derive(Debug, Clone, Deserialize)]
pub struct WrappedResponse {
    #[serde(default)]
    pub results: Option<Vec<TestResult>>,
    #[serde(default)]
    pub metadata: Option<RunMetadata>,
}

/// Either response shape as it appears on the wire
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum WireResponse {
    Legacy(Vec<TestResult>),
    Wrapped(WrappedResponse),
}

impl From<WireResponse> for TestRunResponse {
    fn from(wire: WireResponse) -> Self {
        match wire {
            WireResponse::Legacy(results) => Self {
                results,
                metadata: None,
            },
            WireResponse::Wrapped(WrappedResponse { results, metadata }) => Self {
                results: results.unwrap_or_default(),
                metadata,
            },
        }
    }
}

/// Decode a 2xx body in either shape
pub fn decode_response(body: &[u8]) -> Result<TestRunResponse, serde_json::Error> {
    serde_json::from_slice::<WireResponse>(body)
        .map(TestRunResponse::from)
        .map_err(|untagged| explain_decode_error(body, untagged))
}

/// The untagged error names no field. Decode again against the shape the
/// body looks like so the message points at the bad entry.
fn explain_decode_error(body: &[u8], untagged: serde_json::Error) -> serde_json::Error {
    match serde_json::from_slice::<serde_json::Value>(body) {
        Err(syntax) => syntax,
        Ok(serde_json::Value::Array(_)) => serde_json::from_slice::<Vec<TestResult>>(body)
            .err()
            .unwrap_or(untagged),
        Ok(serde_json::Value::Object(_)) => serde_json::from_slice::<WrappedResponse>(body)
            .err()
            .unwrap_or(untagged),
        Ok(_) => serde::de::Error::custom("expected a result array or an object with `results`"),
    }
}

/// Error body sent with non-2xx responses
#[derive(Debug, Deserialize)]
pub(crate) struct ErrorBody {
    pub error: Option<String>,
}
