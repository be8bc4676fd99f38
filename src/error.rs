//! Error taxonomy for the test session controller.
//!
//! Each error is recovered at the boundary where it occurs: validation
//! errors never reach the network, catalog errors degrade to an empty
//! catalog, and submission errors leave the session without results.

use thiserror::Error;

/// Pre-flight rejection of a submit. No network call is issued.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Source (Kubernetes Cluster Name) cannot be empty.")]
    EmptySource,
    #[error("Please provide at least one destination.")]
    NoDestinations,
}

/// Catalog fetch or parse failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    #[error("catalog unavailable: {0}")]
    Unavailable(String),
}

/// Failure of a test submission. The display string is what the user sees.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmissionError {
    /// Non-2xx response carrying a JSON `{"error": "..."}` body
    #[error("{message}")]
    Backend { status: u16, message: String },
    /// Non-2xx response without a usable error body
    #[error("HTTP error, status {status}")]
    Status { status: u16 },
    /// Connection refused, timeout, DNS failure, ...
    #[error("request failed: {0}")]
    Transport(String),
    /// 2xx response whose body is not a recognized result payload
    #[error("malformed response body: {0}")]
    Decode(String),
}

impl SubmissionError {
    /// HTTP status code, when the failure came from a response
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Backend { status, .. } | Self::Status { status } => Some(*status),
            Self::Transport(_) | Self::Decode(_) => None,
        }
    }
}

impl From<reqwest::Error> for SubmissionError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::Decode(err.to_string())
        } else {
            Self::Transport(err.to_string())
        }
    }
}

/// CSV export failure.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("no results to export")]
    Empty,
    #[error("failed to write export: {0}")]
    Io(#[from] std::io::Error),
}
