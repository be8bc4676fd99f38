use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::error::ValidationError;
use crate::reconcile::Reconciliation;
use crate::runner::{TestResult, TestRunResponse};

/// Lifecycle phase of the session.
///
/// `Idle -> Submitting -> (Displayed | Error)`, and back to `Submitting` on
/// the next submit. There is no terminal phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    #[default]
    Idle,
    Submitting,
    Displayed,
    Error,
}

impl Phase {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Submitting => "testing",
            Self::Displayed => "done",
            Self::Error => "error",
        }
    }
}

/// Identifies one submit. Only the most recently issued token may
/// change the session once its response arrives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RequestToken(u64);

impl RequestToken {
    pub fn value(&self) -> u64 {
        self.0
    }
}

/// The single "latest results" slot of a session
#[derive(Debug, Clone, Default)]
pub struct SessionState {
    /// Source of the latest submit
    pub source: String,
    pub phase: Phase,
    /// Exactly the sequence from the last successful submit
    pub latest_results: Vec<TestResult>,
    pub reconciliation: Option<Reconciliation>,
    /// Runtime failure of the latest submit, verbatim
    pub error: Option<String>,
    /// Pre-flight rejection of the latest submit
    pub validation: Option<ValidationError>,
    pub submitted_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    /// Last issued token; 0 means none yet
    current_token: u64,
}

/// Session slot shared between the controller and the presentation layer
pub type SharedSession = Arc<RwLock<SessionState>>;

pub fn new_shared_session() -> SharedSession {
    Arc::new(RwLock::new(SessionState::default()))
}

impl SessionState {
    /// Start a submit: clear the previous run and issue a fresh token
    pub fn begin_submit(&mut self, source: impl Into<String>) -> RequestToken {
        self.clear_run();
        self.source = source.into();
        self.phase = Phase::Submitting;
        self.submitted_at = Some(Utc::now());
        self.next_token()
    }

    /// Record a pre-flight rejection.
    ///
    /// Also retires any in-flight token, so a pending response from an
    /// earlier submit can no longer surface.
    pub fn reject(&mut self, err: ValidationError) {
        self.clear_run();
        self.submitted_at = None;
        self.phase = Phase::Idle;
        self.validation = Some(err);
        self.next_token();
    }

    /// Store a successful run. Returns false (and changes nothing) when
    /// the token has been superseded.
    pub fn complete(
        &mut self,
        token: RequestToken,
        response: TestRunResponse,
        reconciliation: Reconciliation,
    ) -> bool {
        if !self.is_current(token) {
            return false;
        }
        self.latest_results = response.results;
        self.reconciliation = Some(reconciliation);
        self.error = None;
        self.phase = Phase::Displayed;
        self.completed_at = Some(Utc::now());
        true
    }

    /// Store a failed run. Returns false (and changes nothing) when the
    /// token has been superseded.
    pub fn fail(&mut self, token: RequestToken, message: String) -> bool {
        if !self.is_current(token) {
            return false;
        }
        self.latest_results = Vec::new();
        self.reconciliation = None;
        self.error = Some(message);
        self.phase = Phase::Error;
        self.completed_at = Some(Utc::now());
        true
    }

    pub fn is_current(&self, token: RequestToken) -> bool {
        token.0 == self.current_token
    }

    /// CSV export needs a non-empty result set
    pub fn is_exportable(&self) -> bool {
        !self.latest_results.is_empty()
    }

    pub fn is_submitting(&self) -> bool {
        self.phase == Phase::Submitting
    }

    /// Message for the status area: validation, runtime error or progress
    pub fn status_message(&self) -> Option<String> {
        if let Some(ref err) = self.validation {
            return Some(format!("Error: {}", err));
        }
        if let Some(ref err) = self.error {
            return Some(format!("Error: {}", err));
        }
        match self.phase {
            Phase::Submitting => Some(format!("Testing connectivity from {}...", self.source)),
            _ => None,
        }
    }

    fn clear_run(&mut self) {
        self.latest_results = Vec::new();
        self.reconciliation = None;
        self.error = None;
        self.validation = None;
        self.completed_at = None;
    }

    fn next_token(&mut self) -> RequestToken {
        self.current_token += 1;
        RequestToken(self.current_token)
    }
}
