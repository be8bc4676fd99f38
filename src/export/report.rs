use std::io::Write;

use crate::state::SessionState;

/// Generate a text report of the latest run
pub fn generate_report<W: Write>(state: &SessionState, mut writer: W) -> std::io::Result<()> {
    writeln!(writer, "conncheck report for {}", state.source)?;
    if let Some(started) = state.submitted_at {
        writeln!(writer, "Submitted: {}", started.format("%Y-%m-%d %H:%M:%S UTC"))?;
    }
    if let Some(done) = state.completed_at {
        writeln!(writer, "Completed: {}", done.format("%Y-%m-%d %H:%M:%S UTC"))?;
    }

    let failure = state
        .validation
        .as_ref()
        .map(|v| v.to_string())
        .or_else(|| state.error.clone());
    if let Some(err) = failure {
        writeln!(writer)?;
        writeln!(writer, "Error: {}", err)?;
        return Ok(());
    }

    let Some(ref rec) = state.reconciliation else {
        writeln!(writer)?;
        writeln!(writer, "No test has been run.")?;
        return Ok(());
    };

    if let Some(job) = rec.job_name() {
        writeln!(writer, "Kubernetes job: {}", job)?;
    }
    if !rec.pod_names().is_empty() {
        writeln!(writer, "Pods: {}", rec.pod_names().join(", "))?;
    }
    writeln!(writer)?;

    if let Some(headline) = rec.headline(&state.source) {
        writeln!(writer, "{}", headline)?;
        writeln!(writer)?;
    }
    if rec.is_empty() {
        return Ok(());
    }

    writeln!(
        writer,
        "{:<40} {:<8} {:>8}  {}",
        "Destination", "Status", "Duration", "Details"
    )?;
    writeln!(writer, "{}", "-".repeat(90))?;

    // failures first, so they are not scrolled away
    for result in rec.failures.iter().chain(&rec.successes) {
        writeln!(
            writer,
            "{:<40} {:<8} {:>8}  {}",
            result.destination,
            result.status,
            result.duration.as_deref().unwrap_or("-"),
            result.details
        )?;
    }

    writeln!(writer)?;
    writeln!(
        writer,
        "{} succeeded, {} failed, {} total",
        rec.success_count(),
        rec.failure_count(),
        rec.total()
    )?;

    if !rec.missing.is_empty() {
        writeln!(writer, "Warning: no result returned for: {}", rec.missing.join(", "))?;
    }
    if !rec.unrequested.is_empty() {
        writeln!(
            writer,
            "Warning: results for destinations not requested: {}",
            rec.unrequested.join(", ")
        )?;
    }

    Ok(())
}

/// Generate report to string
pub fn generate_report_string(state: &SessionState) -> String {
    let mut buf = Vec::new();
    // writing to a Vec cannot fail
    let _ = generate_report(state, &mut buf);
    String::from_utf8_lossy(&buf).into_owned()
}
