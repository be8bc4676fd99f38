use anyhow::Result;
use serde::Serialize;
use std::io::Write;

use crate::reconcile::Reconciliation;
use crate::state::{Phase, SessionState};

/// Serialized form of a finished run
#[derive(Serialize)]
struct RunExport<'a> {
    source: &'a str,
    phase: Phase,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    submitted_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    completed_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    reconciliation: Option<&'a Reconciliation>,
}

/// Export the session's latest run as pretty JSON
pub fn export_json<W: Write>(state: &SessionState, mut writer: W) -> Result<()> {
    let export = RunExport {
        source: &state.source,
        phase: state.phase,
        error: state.error.as_deref(),
        submitted_at: state.submitted_at.map(|t| t.to_rfc3339()),
        completed_at: state.completed_at.map(|t| t.to_rfc3339()),
        reconciliation: state.reconciliation.as_ref(),
    };
    serde_json::to_writer_pretty(&mut writer, &export)?;
    writeln!(writer)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reconcile::reconcile;
    use crate::runner::{TestResult, TestRunResponse};

    #[test]
    fn test_export_json_shape() {
        let mut state = SessionState::default();
        let token = state.begin_submit("cluster-a");
        let response = TestRunResponse::new(vec![TestResult::new("a", "SUCCESS", "ok")]);
        let rec = reconcile(&response);
        state.complete(token, response, rec);

        let mut buf = Vec::new();
        export_json(&state, &mut buf).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&buf).unwrap();
        assert_eq!(value["source"], "cluster-a");
        assert_eq!(value["phase"], "displayed");
        assert_eq!(value["reconciliation"]["all_succeeded"], true);
        assert_eq!(value["reconciliation"]["successes"][0]["status"], "SUCCESS");
        assert!(value.get("error").is_none());
    }
}
