//! Object storage abstraction.
//!
//! Provides a unified interface for listing, reading and writing lakehouse
//! table files on S3-compatible object storage or the local filesystem.

mod local;
mod s3;

use bytes::Bytes;
use futures::StreamExt;
use object_store::path::Path;
use object_store::{ObjectStore, PutPayload};
use regex::Regex;
use snafu::prelude::*;
use std::borrow::Cow;
use std::sync::{Arc, LazyLock};
use tracing::debug;

use crate::config::StorageConfig;
use crate::error::{InvalidUrlSnafu, ObjectStoreSnafu, StorageError};

// Re-export config types
pub use local::LocalConfig;
pub use s3::S3Config;

// URL patterns for the supported storage backends
const S3_URL: &str = r"^[sS]3[aA]?://(?P<bucket>[a-z0-9\-\.]+)(/(?P<key>.+))?$";
const S3_ENDPOINT_URL: &str = r"^[sS]3[aA]?::(?<protocol>https?)://(?P<endpoint>[^:/]+):(?<port>\d+)/(?P<bucket>[a-z0-9\-\.]+)(/(?P<key>.+))?$";

const FILE_URI: &str = r"^file://(?P<path>.*)$";
const FILE_PATH: &str = r"^/(?P<path>.*)$";

static S3_MATCHERS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    vec![
        Regex::new(S3_ENDPOINT_URL).unwrap(),
        Regex::new(S3_URL).unwrap(),
    ]
});

static LOCAL_MATCHERS: LazyLock<Vec<Regex>> =
    LazyLock::new(|| vec![Regex::new(FILE_URI).unwrap(), Regex::new(FILE_PATH).unwrap()]);

/// Backend configuration enum.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendConfig {
    S3(S3Config),
    Local(LocalConfig),
}

impl BackendConfig {
    /// Parse a URL into a backend configuration.
    pub fn parse_url(url: &str) -> Result<Self, StorageError> {
        if let Some(matches) = S3_MATCHERS.iter().find_map(|r| r.captures(url)) {
            return Self::parse_s3(matches);
        }
        if let Some(matches) = LOCAL_MATCHERS.iter().find_map(|r| r.captures(url)) {
            return Self::parse_local(matches);
        }

        InvalidUrlSnafu {
            url: url.to_string(),
        }
        .fail()
    }

    fn parse_s3(matches: regex::Captures) -> Result<Self, StorageError> {
        let bucket = matches
            .name("bucket")
            .expect("bucket should always be available")
            .as_str()
            .to_string();

        let endpoint = matches.name("endpoint").map(|endpoint| {
            let port = matches
                .name("port")
                .and_then(|p| p.as_str().parse::<u16>().ok())
                .unwrap_or(443);
            let protocol = matches
                .name("protocol")
                .map(|p| p.as_str())
                .unwrap_or("https");
            format!("{}://{}:{}", protocol, endpoint.as_str(), port)
        });

        let key = matches.name("key").map(|m| m.as_str().into());

        Ok(BackendConfig::S3(S3Config {
            endpoint,
            bucket,
            key,
        }))
    }

    fn parse_local(matches: regex::Captures) -> Result<Self, StorageError> {
        let path = matches
            .name("path")
            .expect("path regex must contain a path group")
            .as_str();

        let path = if path.starts_with('/') {
            path.to_string()
        } else {
            format!("/{path}")
        };

        Ok(BackendConfig::Local(LocalConfig { path }))
    }

    pub(crate) fn key(&self) -> Option<&Path> {
        match self {
            BackendConfig::S3(s3) => s3.key.as_ref(),
            // The local root is the filesystem prefix itself, never a key
            BackendConfig::Local(_) => None,
        }
    }
}

/// An object listed from storage: key relative to the provider root, plus
/// size in bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectEntry {
    pub path: String,
    pub size_bytes: u64,
}

/// Storage provider that abstracts over the supported backends.
#[derive(Clone)]
pub struct StorageProvider {
    pub(crate) config: BackendConfig,
    pub(crate) object_store: Arc<dyn ObjectStore>,
    pub(crate) canonical_url: String,
}

impl std::fmt::Debug for StorageProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "StorageProvider<{}>", self.canonical_url)
    }
}

impl StorageProvider {
    /// Create a storage provider from the configured URL and credentials.
    pub async fn connect(storage: &StorageConfig) -> Result<Self, StorageError> {
        let config = BackendConfig::parse_url(&storage.url)?;

        match config {
            BackendConfig::S3(config) => Self::construct_s3(config, storage),
            BackendConfig::Local(config) => Self::construct_local(config),
        }
    }

    /// List all objects under a prefix (relative to the configured key
    /// prefix, if any).
    ///
    /// The listing may be paginated by the object store internally, but the
    /// result is fully materialized, sorted by path and deduplicated so that
    /// callers can diff and truncate deterministically. A missing prefix
    /// yields an empty listing, not an error.
    pub async fn list_with_prefix(&self, prefix: &str) -> Result<Vec<ObjectEntry>, StorageError> {
        let full_prefix: Path = match self.config.key() {
            Some(key) => key.parts().chain(Path::from(prefix).parts()).collect(),
            None => Path::from(prefix),
        };

        let key_part_count = self
            .config
            .key()
            .map(|key| key.parts().count())
            .unwrap_or_default();

        let mut entries = Vec::new();
        let mut stream = self.object_store.list(Some(&full_prefix));

        while let Some(meta) = stream.next().await {
            match meta {
                Ok(meta) => {
                    // Strip the base prefix so callers get relative paths,
                    // matching the contract expected by get/put/exists
                    let relative: Path = meta.location.parts().skip(key_part_count).collect();
                    entries.push(ObjectEntry {
                        path: relative.to_string(),
                        size_bytes: meta.size,
                    });
                }
                Err(object_store::Error::NotFound { .. }) => {}
                Err(err) => return Err(StorageError::ObjectStore { source: err }),
            }
        }

        entries.sort_by(|a, b| a.path.cmp(&b.path));
        entries.dedup_by(|a, b| a.path == b.path);

        debug!("Listed {} objects under {}", entries.len(), prefix);

        Ok(entries)
    }

    /// Get the contents of a file.
    pub async fn get(&self, path: &str) -> Result<Bytes, StorageError> {
        let path = Path::from(path);
        let bytes = self
            .object_store
            .get(&self.qualify_path(&path))
            .await
            .context(ObjectStoreSnafu)?
            .bytes()
            .await
            .context(ObjectStoreSnafu)?;
        Ok(bytes)
    }

    /// Put bytes to a path, returning the number of bytes written.
    pub async fn put(&self, path: &str, bytes: Bytes) -> Result<u64, StorageError> {
        let len = bytes.len() as u64;
        let path = Path::from(path);
        self.object_store
            .put(&self.qualify_path(&path), PutPayload::from(bytes))
            .await
            .context(ObjectStoreSnafu)?;
        Ok(len)
    }

    /// Check whether a file exists at the given path.
    pub async fn exists(&self, path: &str) -> Result<bool, StorageError> {
        let path = Path::from(path);
        match self.object_store.head(&self.qualify_path(&path)).await {
            Ok(_) => Ok(true),
            Err(object_store::Error::NotFound { .. }) => Ok(false),
            Err(err) => Err(StorageError::ObjectStore { source: err }),
        }
    }

    /// Qualify a path with the configured key prefix.
    fn qualify_path<'a>(&self, path: &'a Path) -> Cow<'a, Path> {
        match self.config.key() {
            Some(prefix) => Cow::Owned(prefix.parts().chain(path.parts()).collect()),
            None => Cow::Borrowed(path),
        }
    }

    /// Get the backend configuration.
    pub fn config(&self) -> &BackendConfig {
        &self.config
    }

    /// Canonical URL of the storage location.
    pub fn canonical_url(&self) -> &str {
        &self.canonical_url
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn local_config(root: &std::path::Path) -> StorageConfig {
        StorageConfig {
            url: root.to_str().unwrap().to_string(),
            access_key: None,
            secret_key: None,
            region: None,
        }
    }

    #[test]
    fn test_s3_url_parsing() {
        let config = BackendConfig::parse_url("s3://mybucket/tables/data").unwrap();
        match config {
            BackendConfig::S3(s3) => {
                assert_eq!(s3.bucket, "mybucket");
                assert_eq!(s3.key, Some(Path::from("tables/data")));
                assert_eq!(s3.endpoint, None);
            }
            _ => panic!("Expected S3 config"),
        }
    }

    #[test]
    fn test_s3_endpoint_url_parsing() {
        let config = BackendConfig::parse_url("s3::http://localhost:9000/lh-test").unwrap();
        match config {
            BackendConfig::S3(s3) => {
                assert_eq!(s3.bucket, "lh-test");
                assert_eq!(s3.endpoint, Some("http://localhost:9000".to_string()));
                assert_eq!(s3.key, None);
            }
            _ => panic!("Expected S3 config"),
        }
    }

    #[test]
    fn test_local_url_parsing() {
        let config = BackendConfig::parse_url("/local/lakehouse").unwrap();
        match config {
            BackendConfig::Local(local) => {
                assert_eq!(local.path, "/local/lakehouse");
            }
            _ => panic!("Expected Local config"),
        }
    }

    #[test]
    fn test_invalid_url_rejected() {
        let err = BackendConfig::parse_url("ftp://nope").unwrap_err();
        assert!(matches!(err, StorageError::InvalidUrl { .. }));
    }

    #[tokio::test]
    async fn test_put_get_exists_roundtrip() {
        let temp_dir = TempDir::new().unwrap();
        let storage = StorageProvider::connect(&local_config(temp_dir.path()))
            .await
            .unwrap();

        let path = "tables/t/data/version=0.0.1/part-0.parquet";
        assert!(!storage.exists(path).await.unwrap());

        let written = storage.put(path, Bytes::from_static(b"payload")).await.unwrap();
        assert_eq!(written, 7);
        assert!(storage.exists(path).await.unwrap());

        let content = storage.get(path).await.unwrap();
        assert_eq!(content.as_ref(), b"payload");
    }

    #[tokio::test]
    async fn test_list_is_sorted_and_sized() {
        let temp_dir = TempDir::new().unwrap();
        let storage = StorageProvider::connect(&local_config(temp_dir.path()))
            .await
            .unwrap();

        storage
            .put("t/data/b.parquet", Bytes::from(vec![0u8; 20]))
            .await
            .unwrap();
        storage
            .put("t/data/a.parquet", Bytes::from(vec![0u8; 10]))
            .await
            .unwrap();
        storage
            .put("other/c.parquet", Bytes::from(vec![0u8; 5]))
            .await
            .unwrap();

        let entries = storage.list_with_prefix("t/data").await.unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].path, "t/data/a.parquet");
        assert_eq!(entries[0].size_bytes, 10);
        assert_eq!(entries[1].path, "t/data/b.parquet");
        assert_eq!(entries[1].size_bytes, 20);
    }

    #[tokio::test]
    async fn test_list_missing_prefix_is_empty() {
        let temp_dir = TempDir::new().unwrap();
        let storage = StorageProvider::connect(&local_config(temp_dir.path()))
            .await
            .unwrap();

        let entries = storage.list_with_prefix("does/not/exist").await.unwrap();
        assert!(entries.is_empty());
    }
}
