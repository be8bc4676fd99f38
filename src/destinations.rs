//! Destination set normalization.
//!
//! Destinations are opaque strings: no case folding, no scheme handling.
//! Identity is exact string equality after trimming.

use std::collections::HashSet;

/// Split free text on runs of whitespace and/or commas, dropping empty tokens
pub fn parse_manual(text: &str) -> Vec<String> {
    text.split(|c: char| c.is_whitespace() || c == ',')
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(str::to_string)
        .collect()
}

/// Merge manual text and catalog selections into one deduplicated list.
///
/// Order is manual-then-catalog, first occurrence wins.
pub fn merge(manual_text: &str, catalog_selections: &[String]) -> Vec<String> {
    let manual = parse_manual(manual_text);
    let selected = catalog_selections
        .iter()
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(str::to_string);

    let mut seen = HashSet::new();
    manual
        .into_iter()
        .chain(selected)
        .filter(|dest| seen.insert(dest.clone()))
        .collect()
}

/// Serialize a destination list for an editable text field, one per line
pub fn to_editable_text(destinations: &[String]) -> String {
    destinations.join("\n")
}

/// Fold catalog selections into the editable text, one destination per line.
///
/// With nothing selected the text is returned untouched.
pub fn add_to_editable(current_text: &str, catalog_selections: &[String]) -> String {
    if catalog_selections.iter().all(|s| s.trim().is_empty()) {
        return current_text.to_string();
    }
    to_editable_text(&merge(current_text, catalog_selections))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_merge_scenario_collapses_duplicates() {
        let merged = merge("8.8.8.8, 1.1.1.1\n8.8.8.8", &strings(&["1.1.1.1"]));
        assert_eq!(merged, strings(&["8.8.8.8", "1.1.1.1"]));
    }

    #[test]
    fn test_parse_manual_mixed_separators() {
        let parsed = parse_manual("  a.com:443,,b.com:80 \t c.com:22\r\n\n,d");
        assert_eq!(parsed, strings(&["a.com:443", "b.com:80", "c.com:22", "d"]));
    }

    #[test]
    fn test_add_to_editable() {
        let text = add_to_editable("a.com, b.com", &strings(&["b.com", "c.com"]));
        assert_eq!(text, "a.com\nb.com\nc.com");
        assert_eq!(add_to_editable("  keep ,me", &[]), "  keep ,me");
    }

    #[test]
    fn test_parse_manual_empty() {
        assert!(parse_manual("").is_empty());
        assert!(parse_manual(" , \n\t,").is_empty());
    }

    #[test]
    fn test_merge_manual_before_catalog() {
        let merged = merge("z", &strings(&["a", "z", "b"]));
        assert_eq!(merged, strings(&["z", "a", "b"]));
    }

    #[test]
    fn test_merge_is_case_sensitive() {
        let merged = merge("Host.example", &strings(&["host.example"]));
        assert_eq!(merged, strings(&["Host.example", "host.example"]));
    }

    #[test]
    fn test_merge_trims_selections() {
        let merged = merge("", &strings(&["  10.0.0.1:80 ", "", "10.0.0.1:80"]));
        assert_eq!(merged, strings(&["10.0.0.1:80"]));
    }

    #[test]
    fn test_merge_never_contains_duplicates() {
        let inputs = [
            ("a b a c", vec!["c", "d", "a"]),
            ("", vec!["x", "x", "x"]),
            ("1,1,1\n2", vec![]),
            ("http://a,http://a https://a", vec!["https://a"]),
        ];
        for (text, selections) in inputs {
            let merged = merge(text, &strings(&selections));
            let unique: HashSet<_> = merged.iter().collect();
            assert_eq!(unique.len(), merged.len(), "duplicates for {:?}", text);
        }
    }

    #[test]
    fn test_editable_text_round_trip() {
        let merged = merge("a, b", &strings(&["c"]));
        let text = to_editable_text(&merged);
        assert_eq!(text, "a\nb\nc");
        assert_eq!(merge(&text, &[]), merged);
    }
}
