use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, warn};

use super::CatalogEntry;
use super::parse::{parse_delimited, parse_structured};
use crate::error::CatalogError;

/// Path of the catalog API, relative to the backend base URL
pub const CATALOG_ENDPOINT: &str = "/api/destinations";

/// Where the catalog comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogSource {
    /// JSON array of `{name, address}` objects over HTTP
    Api(String),
    /// `name,address` lines over HTTP
    TextUrl(String),
    /// `name,address` lines on disk
    TextFile(PathBuf),
}

impl CatalogSource {
    /// Default API source for a backend base URL
    pub fn api_for(base_url: &str) -> Self {
        Self::Api(format!("{}{}", base_url.trim_end_matches('/'), CATALOG_ENDPOINT))
    }

    /// Human-readable location, for logs and the UI
    pub fn location(&self) -> String {
        match self {
            Self::Api(url) | Self::TextUrl(url) => url.clone(),
            Self::TextFile(path) => path.display().to_string(),
        }
    }
}

/// Fetches the catalog once per session
#[derive(Debug, Clone)]
pub struct CatalogLoader {
    source: CatalogSource,
    client: reqwest::Client,
}

impl CatalogLoader {
    pub fn new(source: CatalogSource, timeout: Duration) -> Result<Self, CatalogError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(format!("conncheck/{}", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| CatalogError::Unavailable(e.to_string()))?;
        Ok(Self { source, client })
    }

    /// Load the catalog. An empty list is a successful load.
    pub async fn load(&self) -> Result<Vec<CatalogEntry>, CatalogError> {
        let result = match &self.source {
            CatalogSource::Api(url) => {
                let body = self.fetch(url).await?;
                parse_structured(&body)
            }
            CatalogSource::TextUrl(url) => {
                let body = self.fetch(url).await?;
                let text = String::from_utf8(body)
                    .map_err(|e| CatalogError::Unavailable(format!("catalog is not UTF-8: {}", e)))?;
                Ok(parse_delimited(&text))
            }
            CatalogSource::TextFile(path) => {
                let text = tokio::fs::read_to_string(path).await.map_err(|e| {
                    CatalogError::Unavailable(format!("failed to read {}: {}", path.display(), e))
                })?;
                Ok(parse_delimited(&text))
            }
        };

        match &result {
            Ok(entries) if entries.is_empty() => {
                warn!(source = %self.source.location(), "no prepopulated destinations received")
            }
            Ok(entries) => {
                debug!(source = %self.source.location(), count = entries.len(), "catalog loaded")
            }
            Err(e) => warn!(source = %self.source.location(), error = %e, "catalog load failed"),
        }

        result
    }

    async fn fetch(&self, url: &str) -> Result<Vec<u8>, CatalogError> {
        let resp = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| CatalogError::Unavailable(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(CatalogError::Unavailable(format!(
                "HTTP error! status: {} while fetching {}",
                status.as_u16(),
                url
            )));
        }

        resp.bytes()
            .await
            .map(|b| b.to_vec())
            .map_err(|e| CatalogError::Unavailable(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_api_source_for_base_url() {
        assert_eq!(
            CatalogSource::api_for("http://localhost:5000/"),
            CatalogSource::Api("http://localhost:5000/api/destinations".to_string())
        );
    }

    #[tokio::test]
    async fn test_load_from_text_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "# comment").unwrap();
        writeln!(file, "Google,google.com:443").unwrap();
        writeln!(file, "broken line").unwrap();

        let loader = CatalogLoader::new(
            CatalogSource::TextFile(file.path().to_path_buf()),
            Duration::from_secs(1),
        )
        .unwrap();
        let entries = loader.load().await.unwrap();
        assert_eq!(entries, vec![CatalogEntry::new("Google", "google.com:443")]);
    }

    #[tokio::test]
    async fn test_missing_file_is_unavailable() {
        let loader = CatalogLoader::new(
            CatalogSource::TextFile(PathBuf::from("/nonexistent/conncheck/destinations.txt")),
            Duration::from_secs(1),
        )
        .unwrap();
        let err = loader.load().await.unwrap_err();
        assert!(matches!(err, CatalogError::Unavailable(_)));
    }
}
