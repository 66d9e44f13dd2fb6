//! Transport Loaders
//!
//! One transport call per `load`: read `{base}/{key}.json` from disk or over HTTP.

use std::io::ErrorKind;
use std::path::PathBuf;

use async_trait::async_trait;
use serde_json::Value;
use tracing::debug;

use super::RESOURCE_EXTENSION;
use crate::error::{DataError, Result};

// == Resource Loader Trait ==
/// Performs a single transport call for a logical key.
#[async_trait]
pub trait ResourceLoader: Send + Sync {
    /// Short transport name used in logs.
    fn name(&self) -> &'static str;

    /// Where the document for `key` lives (path or URL).
    fn locate(&self, key: &str) -> String;

    /// Loads and parses the document for `key`.
    async fn load(&self, key: &str) -> Result<Value>;
}

// == File Loader ==
/// Reads documents from a directory on disk.
#[derive(Debug, Clone)]
pub struct FileLoader {
    base_dir: PathBuf,
}

impl FileLoader {
    /// Creates a loader rooted at `base_dir`.
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.base_dir.join(format!("{}.{}", key, RESOURCE_EXTENSION))
    }
}

#[async_trait]
impl ResourceLoader for FileLoader {
    fn name(&self) -> &'static str {
        "file"
    }

    fn locate(&self, key: &str) -> String {
        self.path_for(key).display().to_string()
    }

    async fn load(&self, key: &str) -> Result<Value> {
        let path = self.path_for(key);
        debug!("Reading {}", path.display());

        let bytes = tokio::fs::read(&path).await.map_err(|e| match e.kind() {
            ErrorKind::NotFound => DataError::not_found(key, 404),
            ErrorKind::PermissionDenied => DataError::not_found(key, 403),
            _ => DataError::transport(key, format!("failed to read {}: {}", path.display(), e)),
        })?;

        serde_json::from_slice(&bytes).map_err(|e| {
            DataError::transport(key, format!("invalid JSON in {}: {}", path.display(), e))
        })
    }
}

// == HTTP Loader ==
/// Fetches documents with GET requests under a base URL.
#[derive(Debug, Clone)]
pub struct HttpLoader {
    client: reqwest::Client,
    base_url: String,
}

impl HttpLoader {
    /// Creates a loader for `base_url` (trailing slashes are ignored).
    pub fn new(base_url: &str) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("fanhub/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| DataError::BackendUnavailable(format!("HTTP client setup failed: {}", e)))?;

        Ok(Self::with_client(client, base_url))
    }

    /// Creates a loader that reuses an existing client.
    pub fn with_client(client: reqwest::Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl ResourceLoader for HttpLoader {
    fn name(&self) -> &'static str {
        "http"
    }

    fn locate(&self, key: &str) -> String {
        format!("{}/{}.{}", self.base_url, key, RESOURCE_EXTENSION)
    }

    async fn load(&self, key: &str) -> Result<Value> {
        let url = self.locate(key);
        debug!("GET {}", url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| DataError::transport(key, format!("request to {} failed: {}", url, e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(DataError::not_found(key, status.as_u16()));
        }

        response
            .json::<Value>()
            .await
            .map_err(|e| DataError::transport(key, format!("invalid JSON from {}: {}", url, e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_file_loader_locate() {
        let loader = FileLoader::new("/srv/data");
        assert_eq!(loader.locate("status"), "/srv/data/status.json");
    }

    #[test]
    fn test_http_loader_locate_trims_slash() {
        let loader = HttpLoader::new("https://example.com/data/").unwrap();
        assert_eq!(
            loader.locate("chat_rooms"),
            "https://example.com/data/chat_rooms.json"
        );
    }

    #[tokio::test]
    async fn test_file_loader_reads_json() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("status.json"), r#"[{"name":"Hina"}]"#).unwrap();

        let loader = FileLoader::new(dir.path());
        let value = loader.load("status").await.unwrap();

        assert_eq!(value, json!([{"name": "Hina"}]));
    }

    #[tokio::test]
    async fn test_file_loader_missing_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let loader = FileLoader::new(dir.path());

        let err = loader.load("missing").await.unwrap_err();
        assert_eq!(err, DataError::not_found("missing", 404));
    }

    #[tokio::test]
    async fn test_file_loader_bad_json_is_transport() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("broken.json"), "{not json").unwrap();

        let loader = FileLoader::new(dir.path());
        let err = loader.load("broken").await.unwrap_err();

        assert!(err.is_transient(), "unexpected error: {:?}", err);
    }
}
