//! Parsers for the two catalog shapes.
//!
//! Malformed records are dropped with a warning; only an unparsable body as
//! a whole is an error.

use serde_json::Value;
use tracing::warn;

use super::CatalogEntry;
use crate::error::CatalogError;

/// Parse a JSON array of `{name, address}` objects
pub fn parse_structured(body: &[u8]) -> Result<Vec<CatalogEntry>, CatalogError> {
    let value: Value = serde_json::from_slice(body)
        .map_err(|e| CatalogError::Unavailable(format!("invalid catalog JSON: {}", e)))?;

    let items = match value {
        Value::Array(items) => items,
        Value::Null => {
            warn!("catalog source returned null, treating as empty");
            return Ok(Vec::new());
        }
        other => {
            return Err(CatalogError::Unavailable(format!(
                "expected a JSON array of destinations, got {}",
                json_kind(&other)
            )));
        }
    };

    let mut entries = Vec::with_capacity(items.len());
    for item in items {
        let name = non_empty_str(&item, "name");
        let address = non_empty_str(&item, "address");
        match (name, address) {
            (Some(name), Some(address)) => entries.push(CatalogEntry::new(name, address)),
            _ => warn!(entry = %item, "skipping catalog entry with missing name or address"),
        }
    }

    Ok(entries)
}

/// Parse `name,address` lines.
///
/// The name ends at the first comma; the address is the rest of the line.
/// Blank lines and `#` comments are ignored.
pub fn parse_delimited(text: &str) -> Vec<CatalogEntry> {
    let mut entries = Vec::new();

    for (idx, raw) in text.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let Some((name, address)) = line.split_once(',') else {
            warn!(line = idx + 1, content = line, "skipping malformed catalog line (not enough fields)");
            continue;
        };

        let (name, address) = (name.trim(), address.trim());
        if name.is_empty() || address.is_empty() {
            warn!(line = idx + 1, content = line, "skipping malformed catalog line (empty name or address)");
            continue;
        }

        entries.push(CatalogEntry::new(name, address));
    }

    entries
}

fn non_empty_str<'a>(item: &'a Value, key: &str) -> Option<&'a str> {
    item.get(key)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_structured_skips_partial_entries() {
        let body = br#"[
            {"name": "Google DNS", "address": "8.8.8.8:53"},
            {"name": "No address"},
            {"address": "1.1.1.1:53"},
            {"name": "", "address": "9.9.9.9:53"},
            {"name": "Numeric", "address": 443},
            "not an object",
            {"name": "Example", "address": "https://example.com"}
        ]"#;
        let entries = parse_structured(body).unwrap();
        assert_eq!(
            entries,
            vec![
                CatalogEntry::new("Google DNS", "8.8.8.8:53"),
                CatalogEntry::new("Example", "https://example.com"),
            ]
        );
    }

    #[test]
    fn test_structured_empty_and_null() {
        assert!(parse_structured(b"[]").unwrap().is_empty());
        assert!(parse_structured(b"null").unwrap().is_empty());
    }

    #[test]
    fn test_structured_rejects_non_array() {
        let err = parse_structured(br#"{"error": "file not found"}"#).unwrap_err();
        assert!(err.to_string().contains("an object"));
        assert!(parse_structured(b"not json").is_err());
    }

    #[test]
    fn test_delimited_splits_on_first_comma() {
        let entries = parse_delimited("Web,https://example.com/a,b\nDNS , 8.8.8.8:53 \n");
        assert_eq!(
            entries,
            vec![
                CatalogEntry::new("Web", "https://example.com/a,b"),
                CatalogEntry::new("DNS", "8.8.8.8:53"),
            ]
        );
    }

    #[test]
    fn test_delimited_skips_comments_and_malformed() {
        let text = "# pre-selected destinations\n\nonly-a-name\n,10.0.0.1:22\nname-only,\nDB,db.internal:5432\r\n";
        let entries = parse_delimited(text);
        assert_eq!(entries, vec![CatalogEntry::new("DB", "db.internal:5432")]);
    }

    #[test]
    fn test_delimited_empty_input() {
        assert!(parse_delimited("").is_empty());
        assert!(parse_delimited("# nothing here\n").is_empty());
    }
}
