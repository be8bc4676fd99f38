use std::fs;
use std::path::{Path, PathBuf};

use crate::error::ExportError;
use crate::runner::TestResult;

/// Fixed name of the exported file
pub const CSV_FILENAME: &str = "connectivity_test_results.csv";

const HEADER: [&str; 4] = ["Destination", "Status", "Duration", "Details"];

/// Serialize results to CSV text with `\r\n` line endings.
///
/// Returns an empty string for an empty slice: there is nothing to export,
/// which is not the same as a header-only document.
pub fn to_csv(results: &[TestResult]) -> String {
    if results.is_empty() {
        return String::new();
    }

    let mut out = String::new();
    push_row(&mut out, HEADER);
    for result in results {
        push_row(
            &mut out,
            [
                result.destination.as_str(),
                result.status.as_str(),
                result.duration.as_deref().unwrap_or(""),
                result.details.as_str(),
            ],
        );
    }
    out
}

/// Write results to `dir/connectivity_test_results.csv`
pub fn export_csv_file(results: &[TestResult], dir: &Path) -> Result<PathBuf, ExportError> {
    let csv = to_csv(results);
    if csv.is_empty() {
        return Err(ExportError::Empty);
    }

    let path = dir.join(CSV_FILENAME);
    fs::write(&path, csv)?;
    Ok(path)
}

fn push_row(out: &mut String, fields: [&str; 4]) {
    for (i, field) in fields.iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        out.push_str(&escape_csv(field));
    }
    out.push_str("\r\n");
}

/// Escape a string for CSV (quote if contains comma, quote, or newline)
fn escape_csv(s: &str) -> String {
    if s.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Minimal RFC 4180 field splitter for one record
    fn unescape_record(line: &str) -> Vec<String> {
        let mut fields = Vec::new();
        let mut field = String::new();
        let mut quoted = false;
        let mut chars = line.chars().peekable();
        while let Some(c) = chars.next() {
            match (c, quoted) {
                ('"', true) if chars.peek() == Some(&'"') => {
                    field.push('"');
                    chars.next();
                }
                ('"', true) => quoted = false,
                ('"', false) if field.is_empty() => quoted = true,
                (',', false) => fields.push(std::mem::take(&mut field)),
                (c, _) => field.push(c),
            }
        }
        fields.push(field);
        fields
    }

    #[test]
    fn test_escape_csv() {
        assert_eq!(escape_csv("simple"), "simple");
        assert_eq!(escape_csv("with,comma"), "\"with,comma\"");
        assert_eq!(escape_csv("with\"quote"), "\"with\"\"quote\"");
        assert_eq!(escape_csv("two\nlines"), "\"two\nlines\"");
    }

    #[test]
    fn test_to_csv_empty() {
        assert_eq!(to_csv(&[]), "");
    }

    #[test]
    fn test_to_csv_layout() {
        let results = vec![
            TestResult::new("google.com:443", "SUCCESS", "TCP connection successful.")
                .with_duration("12ms"),
            TestResult::new("10.0.0.1:22", "FAILED", "timed out"),
        ];
        assert_eq!(
            to_csv(&results),
            "Destination,Status,Duration,Details\r\n\
             google.com:443,SUCCESS,12ms,TCP connection successful.\r\n\
             10.0.0.1:22,FAILED,,timed out\r\n"
        );
    }

    #[test]
    fn test_absent_duration_is_empty_field() {
        let csv = to_csv(&[TestResult::new("a", "FAILED", "x")]);
        assert!(!csv.contains("undefined"));
        assert!(!csv.contains("null"));
        assert!(csv.ends_with("a,FAILED,,x\r\n"));
    }

    #[test]
    fn test_escaped_fields_round_trip() {
        let tricky = [
            "a,b",
            "\"a,b\"",
            "say \"hi\"",
            "plain",
            "",
            "dial tcp: lookup x, no such host",
        ];
        for details in tricky {
            let csv = to_csv(&[TestResult::new("dest,1", "TIMEOUT", details)]);
            let row = csv.split("\r\n").nth(1).unwrap();
            let fields = unescape_record(row);
            assert_eq!(fields, vec!["dest,1", "TIMEOUT", "", details], "field {:?}", details);
        }
    }

    #[test]
    fn test_export_file_requires_results() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(export_csv_file(&[], dir.path()), Err(ExportError::Empty)));
        assert!(!dir.path().join(CSV_FILENAME).exists());

        let path = export_csv_file(&[TestResult::new("a", "SUCCESS", "ok")], dir.path()).unwrap();
        assert_eq!(path.file_name().unwrap(), CSV_FILENAME);
        let written = fs::read_to_string(path).unwrap();
        assert!(written.starts_with("Destination,Status,Duration,Details\r\n"));
    }
}
