//! Partitioning of a result set into success/failure buckets.
//!
//! The backend's sequence is trusted as-is: nothing is fabricated for a
//! destination without a result and nothing is dropped. An optional audit
//! against the originating request flags the difference instead.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::runner::{RunMetadata, TestRequest, TestResult, TestRunResponse};

/// Reconciled view of one test run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reconciliation {
    pub successes: Vec<TestResult>,
    /// Everything that is not exactly `SUCCESS`, in original order
    pub failures: Vec<TestResult>,
    /// Non-empty and no failures
    pub all_succeeded: bool,
    pub metadata: Option<RunMetadata>,
    /// Requested destinations the backend returned no result for
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub missing: Vec<String>,
    /// Results for destinations that were never requested
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub unrequested: Vec<String>,
}

/// Partition a response into the reconciled view
pub fn reconcile(response: &TestRunResponse) -> Reconciliation {
    let (successes, failures): (Vec<TestResult>, Vec<TestResult>) = response
        .results
        .iter()
        .cloned()
        .partition(|r| r.status.is_success());

    let all_succeeded = !response.results.is_empty() && failures.is_empty();

    Reconciliation {
        successes,
        failures,
        all_succeeded,
        metadata: response.metadata.clone(),
        missing: Vec::new(),
        unrequested: Vec::new(),
    }
}

impl Reconciliation {
    /// The "no results" condition: a successful run with zero entries
    pub fn is_empty(&self) -> bool {
        self.successes.is_empty() && self.failures.is_empty()
    }

    pub fn success_count(&self) -> usize {
        self.successes.len()
    }

    pub fn failure_count(&self) -> usize {
        self.failures.len()
    }

    pub fn total(&self) -> usize {
        self.successes.len() + self.failures.len()
    }

    /// Compare the results against the request that produced them
    pub fn audit(mut self, request: &TestRequest) -> Self {
        let returned: HashSet<&str> = self
            .successes
            .iter()
            .chain(&self.failures)
            .map(|r| r.destination.as_str())
            .collect();
        let requested: HashSet<&str> = request.destinations.iter().map(String::as_str).collect();

        self.missing = request
            .destinations
            .iter()
            .filter(|d| !returned.contains(d.as_str()))
            .cloned()
            .collect();

        let mut seen = HashSet::new();
        self.unrequested = self
            .successes
            .iter()
            .chain(&self.failures)
            .map(|r| r.destination.as_str())
            .filter(|d| !requested.contains(d) && seen.insert(*d))
            .map(str::to_string)
            .collect();

        self
    }

    /// Whether the all-pass banner should be shown.
    ///
    /// Stricter than `all_succeeded`: a requested destination with no
    /// result suppresses the celebration.
    pub fn celebrates(&self) -> bool {
        self.all_succeeded && self.missing.is_empty()
    }

    pub fn job_name(&self) -> Option<&str> {
        self.metadata.as_ref().and_then(|m| m.job_name())
    }

    pub fn pod_names(&self) -> &[String] {
        self.metadata.as_ref().map(|m| m.pod_names()).unwrap_or_default()
    }

    /// Headline for the run, or `None` when a mixed result needs no banner
    pub fn headline(&self, source: &str) -> Option<String> {
        if self.is_empty() {
            Some(format!("No test results to display for {}.", source))
        } else if self.celebrates() {
            Some(format!(
                "Hooray! All {} connection(s) from {} were successful!",
                self.success_count(),
                source
            ))
        } else {
            None
        }
    }

    /// Placeholder for an empty success bucket
    pub fn successes_placeholder(&self) -> Option<&'static str> {
        if self.is_empty() {
            Some("None")
        } else if self.successes.is_empty() {
            Some("No successful connections.")
        } else {
            None
        }
    }

    /// Placeholder for an empty failure bucket
    pub fn failures_placeholder(&self) -> Option<&'static str> {
        if self.is_empty() {
            Some("None")
        } else if self.failures.is_empty() {
            Some("No failed connections.")
        } else {
            None
        }
    }
}
