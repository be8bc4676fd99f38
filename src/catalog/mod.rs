//! Catalog of named, pre-approved destinations.

pub mod loader;
pub mod parse;

pub use loader::*;
pub use parse::*;

use serde::{Deserialize, Serialize};

use crate::error::CatalogError;

/// A named destination from the catalog
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub name: String,
    pub address: String,
}

impl CatalogEntry {
    pub fn new(name: impl Into<String>, address: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            address: address.into(),
        }
    }

    /// Label shown in selection lists
    pub fn label(&self) -> String {
        format!("{} ({})", self.name, self.address)
    }
}

/// Catalog as seen by the presentation layer
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum CatalogState {
    #[default]
    Loading,
    Loaded(Vec<CatalogEntry>),
    Empty,
    Unavailable(String),
}

impl CatalogState {
    pub const EMPTY_LABEL: &'static str = "No prepopulated destinations found";
    pub const UNAVAILABLE_LABEL: &'static str = "Error loading destinations";
    pub const UNAVAILABLE_HINT: &'static str = "Could not load prepopulated destinations from the backend. \
         Please ensure the backend server is running and check the log for details.";

    pub fn from_load(result: Result<Vec<CatalogEntry>, CatalogError>) -> Self {
        match result {
            Ok(entries) if entries.is_empty() => Self::Empty,
            Ok(entries) => Self::Loaded(entries),
            Err(CatalogError::Unavailable(msg)) => Self::Unavailable(msg),
        }
    }

    /// Selectable entries (empty unless loaded)
    pub fn entries(&self) -> &[CatalogEntry] {
        match self {
            Self::Loaded(entries) => entries,
            _ => &[],
        }
    }

    /// Index of the entry whose name or address equals `wanted`
    pub fn position(&self, wanted: &str) -> Option<usize> {
        let wanted = wanted.trim();
        self.entries()
            .iter()
            .position(|e| e.name == wanted || e.address == wanted)
    }

    /// Placeholder shown instead of entries, if any
    pub fn placeholder(&self) -> Option<&'static str> {
        match self {
            Self::Loading => Some("Loading destinations..."),
            Self::Loaded(_) => None,
            Self::Empty => Some(Self::EMPTY_LABEL),
            Self::Unavailable(_) => Some(Self::UNAVAILABLE_LABEL),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_label() {
        let entry = CatalogEntry::new("Google DNS", "8.8.8.8:53");
        assert_eq!(entry.label(), "Google DNS (8.8.8.8:53)");
    }

    #[test]
    fn test_state_distinguishes_empty_from_unavailable() {
        let empty = CatalogState::from_load(Ok(vec![]));
        let failed = CatalogState::from_load(Err(CatalogError::Unavailable("boom".into())));
        assert_eq!(empty, CatalogState::Empty);
        assert_eq!(empty.placeholder(), Some(CatalogState::EMPTY_LABEL));
        assert_eq!(failed.placeholder(), Some(CatalogState::UNAVAILABLE_LABEL));
        assert!(failed.entries().is_empty());
    }

    #[test]
    fn test_position_matches_name_or_address() {
        let state = CatalogState::from_load(Ok(vec![
            CatalogEntry::new("Google DNS", "8.8.8.8:53"),
            CatalogEntry::new("Cloudflare", "1.1.1.1:53"),
        ]));
        assert_eq!(state.position("Cloudflare"), Some(1));
        assert_eq!(state.position(" 8.8.8.8:53 "), Some(0));
        assert_eq!(state.position("google dns"), None);
        assert_eq!(CatalogState::Loading.position("Cloudflare"), None);
    }

    #[test]
    fn test_loaded_state_exposes_entries() {
        let state = CatalogState::from_load(Ok(vec![CatalogEntry::new("a", "b")]));
        assert_eq!(state.entries().len(), 1);
        assert!(state.placeholder().is_none());
    }
}
