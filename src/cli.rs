use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

/// Upper bound for `--timeout`, in seconds (one day)
pub const MAX_TIMEOUT_SECS: f64 = 86_400.0;

/// Terminal controller for backend-run connectivity tests
#[derive(Parser, Debug, Clone)]
#[command(name = "conncheck")]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Destinations to test (IP, hostname, host:port or URL)
    pub destinations: Vec<String>,

    /// Source to test from (Kubernetes cluster name)
    #[arg(short = 's', long = "source")]
    pub source: Option<String>,

    /// Backend base URL [default: http://localhost:5000]
    #[arg(short = 'b', long = "backend", env = "CONNCHECK_BACKEND")]
    pub backend: Option<String>,

    /// Pre-select a catalog destination by name or address (repeatable)
    #[arg(long = "select")]
    pub select: Vec<String>,

    /// Read the catalog from a local `name,address` file
    #[arg(long = "catalog-file", conflicts_with = "catalog_url")]
    pub catalog_file: Option<PathBuf>,

    /// Read the catalog from a `name,address` text URL
    #[arg(long = "catalog-url")]
    pub catalog_url: Option<String>,

    /// Don't load a catalog
    #[arg(long = "no-catalog")]
    pub no_catalog: bool,

    /// Request timeout in seconds
    #[arg(long = "timeout", default_value = "60")]
    pub timeout: f64,

    /// Run once and print a text report (batch)
    #[arg(long = "report")]
    pub report: bool,

    /// Run once and print CSV (batch)
    #[arg(long = "csv")]
    pub csv: bool,

    /// Run once and print JSON (batch)
    #[arg(long = "json")]
    pub json: bool,

    /// Directory for exported CSV files
    #[arg(long = "export-dir")]
    pub export_dir: Option<PathBuf>,

    /// Color theme (default, dracula, nord, gruvbox, monochrome, solarized)
    #[arg(long = "theme")]
    pub theme: Option<String>,

    /// Write logs to this file (the TUI never logs to the terminal)
    #[arg(long = "log-file")]
    pub log_file: Option<PathBuf>,
}

impl Args {
    /// Get timeout as Duration
    pub fn timeout_duration(&self) -> Duration {
        Duration::try_from_secs_f64(self.timeout)
            .unwrap_or(Duration::from_secs_f64(MAX_TIMEOUT_SECS))
    }

    /// Check if running in batch mode (non-interactive)
    pub fn is_batch_mode(&self) -> bool {
        self.json || self.csv || self.report
    }

    /// Validate arguments
    pub fn validate(&self) -> Result<(), String> {
        let outputs = [self.json, self.csv, self.report].iter().filter(|&&b| b).count();
        if outputs > 1 {
            return Err("Only one of --json, --csv, --report may be given".into());
        }

        if self.is_batch_mode() && self.source.as_deref().is_none_or(|s| s.trim().is_empty()) {
            return Err("Batch output modes (--json, --csv, --report) require -s/--source".into());
        }

        if !self.timeout.is_finite() || self.timeout <= 0.0 {
            return Err("Timeout must be positive".into());
        }

        if self.timeout > MAX_TIMEOUT_SECS {
            return Err(format!("Timeout must be at most {} seconds", MAX_TIMEOUT_SECS));
        }

        if let Some(ref url) = self.backend
            && !(url.starts_with("http://") || url.starts_with("https://"))
        {
            return Err(format!("Backend URL must start with http:// or https://: {}", url));
        }

        if let Some(ref url) = self.catalog_url
            && !(url.starts_with("http://") || url.starts_with("https://"))
        {
            return Err(format!("Catalog URL must start with http:// or https://: {}", url));
        }

        if self.no_catalog && !self.select.is_empty() {
            return Err("--select needs a catalog; drop --no-catalog".into());
        }

        Ok(())
    }
}
