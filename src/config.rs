use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use crate::catalog::CatalogSource;
use crate::cli::Args;
use crate::prefs::Prefs;

/// Backend used when neither the command line nor prefs name one
pub const DEFAULT_BACKEND_URL: &str = "http://localhost:5000";

/// Where the catalog should be read from
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "location")]
pub enum CatalogSetting {
    /// `GET /api/destinations` on the backend
    #[default]
    Backend,
    /// Delimited text over HTTP
    Url(String),
    /// Delimited text on disk
    File(PathBuf),
    /// No catalog; manual destinations only
    Disabled,
}

/// Runtime configuration derived from CLI args
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Base URL of the backend runner
    pub backend_url: String,
    pub catalog: CatalogSetting,
    /// Per-request timeout for catalog and test calls
    #[serde(with = "duration_serde")]
    pub timeout: Duration,
    /// Directory CSV exports are written to
    pub export_dir: PathBuf,
    /// Theme name for the TUI
    pub theme: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            backend_url: DEFAULT_BACKEND_URL.to_string(),
            catalog: CatalogSetting::Backend,
            timeout: Duration::from_secs(60),
            export_dir: PathBuf::from("."),
            theme: "default".to_string(),
        }
    }
}

impl From<&Args> for Config {
    fn from(args: &Args) -> Self {
        let catalog = if args.no_catalog {
            CatalogSetting::Disabled
        } else if let Some(ref path) = args.catalog_file {
            CatalogSetting::File(path.clone())
        } else if let Some(ref url) = args.catalog_url {
            CatalogSetting::Url(url.clone())
        } else {
            CatalogSetting::Backend
        };

        let defaults = Self::default();
        Self {
            backend_url: args.backend.clone().unwrap_or(defaults.backend_url),
            catalog,
            timeout: args.timeout_duration(),
            export_dir: args.export_dir.clone().unwrap_or(defaults.export_dir),
            theme: args.theme.clone().unwrap_or(defaults.theme),
        }
    }
}

impl Config {
    /// Fill settings the command line left unset from saved prefs
    pub fn with_prefs(mut self, args: &Args, prefs: &Prefs) -> Self {
        if args.backend.is_none()
            && let Some(ref url) = prefs.backend_url
        {
            self.backend_url = url.clone();
        }
        if args.theme.is_none()
            && let Some(ref theme) = prefs.theme
        {
            self.theme = theme.clone();
        }
        self
    }

    /// Resolved catalog source, or `None` when the catalog is disabled
    pub fn catalog_source(&self) -> Option<CatalogSource> {
        match &self.catalog {
            CatalogSetting::Backend => Some(CatalogSource::api_for(&self.backend_url)),
            CatalogSetting::Url(url) => Some(CatalogSource::TextUrl(url.clone())),
            CatalogSetting::File(path) => Some(CatalogSource::TextFile(path.clone())),
            CatalogSetting::Disabled => None,
        }
    }
}

/// Serde helper for Duration
mod duration_serde {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        duration.as_secs_f64().serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let secs = f64::deserialize(deserializer)?;
        Ok(Duration::from_secs_f64(secs))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    fn args(argv: &[&str]) -> Args {
        let mut full = vec!["conncheck"];
        full.extend_from_slice(argv);
        Args::parse_from(full)
    }

    #[test]
    fn test_defaults() {
        let config = Config::from(&args(&[]));
        assert_eq!(config.backend_url, DEFAULT_BACKEND_URL);
        assert_eq!(config.timeout, Duration::from_secs(60));
        assert_eq!(
            config.catalog_source(),
            Some(CatalogSource::Api("http://localhost:5000/api/destinations".into()))
        );
    }

    #[test]
    fn test_catalog_flags() {
        let config = Config::from(&args(&["--catalog-file", "dests.txt"]));
        assert_eq!(
            config.catalog_source(),
            Some(CatalogSource::TextFile(PathBuf::from("dests.txt")))
        );

        let config = Config::from(&args(&["--no-catalog", "--catalog-url", "http://x/d.txt"]));
        assert_eq!(config.catalog, CatalogSetting::Disabled);
        assert!(config.catalog_source().is_none());
    }

    #[test]
    fn test_cli_beats_prefs() {
        let prefs = Prefs {
            theme: Some("nord".into()),
            backend_url: Some("http://saved:5000".into()),
            last_source: None,
        };

        let a = args(&[]);
        let config = Config::from(&a).with_prefs(&a, &prefs);
        assert_eq!(config.backend_url, "http://saved:5000");
        assert_eq!(config.theme, "nord");

        let a = args(&["--backend", "http://cli:8080", "--theme", "dracula"]);
        let config = Config::from(&a).with_prefs(&a, &prefs);
        assert_eq!(config.backend_url, "http://cli:8080");
        assert_eq!(config.theme, "dracula");
    }

    #[test]
    fn test_config_serializes_timeout_as_seconds() {
        let config = Config::default();
        let json = serde_json::to_value(&config).unwrap();
        assert_eq!(json["timeout"], serde_json::json!(60.0));
        assert_eq!(json["catalog"]["kind"], "backend");
    }
}
