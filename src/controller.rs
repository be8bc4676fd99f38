//! Test session controller.
//!
//! Explicit commands (`merge`, `submit`, `export`) over the shared session
//! slot. The controller knows nothing about how results are drawn; the TUI
//! and batch mode both drive it through these methods.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::destinations;
use crate::error::{ExportError, SubmissionError, ValidationError};
use crate::export::{export_csv_file, to_csv};
use crate::reconcile::reconcile;
use crate::runner::{TestRequest, TestRunner};
use crate::state::{RequestToken, SharedSession, new_shared_session};

/// How a submit ended, from the caller's point of view
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Results stored in the session
    Displayed,
    /// Runner failed; the message is stored in the session
    Failed(SubmissionError),
    /// Rejected before reaching the network
    Rejected(ValidationError),
    /// A later submit started before this one resolved; result discarded
    Superseded,
}

/// A validated request together with the token that owns its result
#[derive(Debug, Clone)]
pub struct PendingSubmit {
    pub request: TestRequest,
    pub token: RequestToken,
}

#[derive(Clone)]
pub struct SessionController {
    runner: Arc<dyn TestRunner>,
    state: SharedSession,
    export_dir: PathBuf,
}

impl SessionController {
    pub fn new(runner: Arc<dyn TestRunner>) -> Self {
        Self {
            runner,
            state: new_shared_session(),
            export_dir: PathBuf::from("."),
        }
    }

    /// Directory CSV exports are written to
    pub fn with_export_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.export_dir = dir.into();
        self
    }

    pub fn state(&self) -> &SharedSession {
        &self.state
    }

    pub fn export_dir(&self) -> &Path {
        &self.export_dir
    }

    /// Merge free text and catalog selections into one destination list
    pub fn merge(&self, manual_text: &str, catalog_selections: &[String]) -> Vec<String> {
        destinations::merge(manual_text, catalog_selections)
    }

    /// Validate the input and move the session to `Submitting`.
    ///
    /// This is the synchronous half of a submit: it must run in the order
    /// the user issued submits, so the token order matches action order.
    pub fn prepare(
        &self,
        source: &str,
        manual_text: &str,
        catalog_selections: &[String],
    ) -> Result<PendingSubmit, ValidationError> {
        let source = source.trim();
        let destinations = self.merge(manual_text, catalog_selections);

        let rejection = if source.is_empty() {
            Some(ValidationError::EmptySource)
        } else if destinations.is_empty() {
            Some(ValidationError::NoDestinations)
        } else {
            None
        };

        let mut state = self.state.write();
        if let Some(err) = rejection {
            info!(reason = %err, "submit rejected before reaching the runner");
            state.reject(err.clone());
            return Err(err);
        }

        let token = state.begin_submit(source);
        debug!(token = token.value(), source, count = destinations.len(), "submit started");
        Ok(PendingSubmit {
            request: TestRequest::new(source, destinations),
            token,
        })
    }

    /// Send a prepared request and store its outcome if still current
    pub async fn run(&self, pending: PendingSubmit) -> SubmitOutcome {
        let PendingSubmit { request, token } = pending;
        let result = self.runner.submit(&request).await;

        let mut state = self.state.write();
        match result {
            Ok(response) => {
                let reconciliation = reconcile(&response).audit(&request);
                if !reconciliation.missing.is_empty() {
                    warn!(missing = ?reconciliation.missing, "runner returned no result for some destinations");
                }
                let counts = (reconciliation.success_count(), reconciliation.failure_count());
                if state.complete(token, response, reconciliation) {
                    info!(successes = counts.0, failures = counts.1, "test run displayed");
                    SubmitOutcome::Displayed
                } else {
                    debug!(token = token.value(), "discarding superseded response");
                    SubmitOutcome::Superseded
                }
            }
            Err(err) => {
                if state.fail(token, err.to_string()) {
                    warn!(error = %err, "test run failed");
                    SubmitOutcome::Failed(err)
                } else {
                    debug!(token = token.value(), error = %err, "discarding superseded failure");
                    SubmitOutcome::Superseded
                }
            }
        }
    }

    /// Validate, submit and store: `prepare` followed by `run`
    pub async fn submit(
        &self,
        source: &str,
        manual_text: &str,
        catalog_selections: &[String],
    ) -> SubmitOutcome {
        match self.prepare(source, manual_text, catalog_selections) {
            Ok(pending) => self.run(pending).await,
            Err(err) => SubmitOutcome::Rejected(err),
        }
    }

    /// CSV of the latest results, or `None` when there is nothing to export
    pub fn export_csv(&self) -> Option<String> {
        let state = self.state.read();
        if !state.is_exportable() {
            return None;
        }
        Some(to_csv(&state.latest_results))
    }

    /// Write the latest results to the export directory
    pub fn export_to_file(&self) -> Result<PathBuf, ExportError> {
        let state = self.state.read();
        export_csv_file(&state.latest_results, &self.export_dir)
    }
}
