//! Configuration parsing and validation.
//!
//! Handles loading the lakehouse access configuration from YAML files with
//! environment variable interpolation, and validating it before any storage
//! connection is attempted.

mod vars;

use serde::{Deserialize, Serialize};
use snafu::prelude::*;
use std::path::Path;

use crate::error::{
    ConfigError, EmptyTableNameSnafu, EmptyTablePathSnafu, EnvInterpolationSnafu,
    IdenticalTablePathsSnafu, MissingCredentialsSnafu, ReadFileSnafu, YamlParseSnafu,
};

/// Byte size constants (binary/IEC units).
pub const KB: usize = 1024;
pub const MB: usize = 1024 * KB;

/// Main configuration for lakehouse data access.
///
/// Immutable after construction: the façade owns it for its lifetime, and a
/// new façade must be created to change any of it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Storage connection (URL plus credentials).
    pub storage: StorageConfig,

    /// Input table identifier.
    pub input: TableConfig,

    /// Output table identifier.
    pub output: TableConfig,

    /// Skip input files whose mapped output already exists (default: false).
    #[serde(default)]
    pub checkpoint: bool,

    /// Restrict enumeration to these named dataset subsets (default: none).
    #[serde(default)]
    pub data_sets: Option<Vec<String>>,

    /// Maximum number of files to select; -1 means unbounded (default: -1).
    #[serde(default = "default_max_files")]
    pub max_files: i64,
}

fn default_max_files() -> i64 {
    -1
}

/// Storage connection configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Storage URL.
    /// Examples: "s3://bucket", "s3::http://localhost:9000/bucket", "/local/path"
    pub url: String,

    /// S3 access key. Required for S3 URLs.
    #[serde(default)]
    pub access_key: Option<String>,

    /// S3 secret key. Required for S3 URLs.
    #[serde(default)]
    pub secret_key: Option<String>,

    /// S3 region override.
    #[serde(default)]
    pub region: Option<String>,
}

/// Identifies one logical table and its physical root.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableConfig {
    /// Logical table name, e.g. "academic.ieee".
    pub name: String,

    /// Physical table root: the storage prefix under which all of the
    /// table's data files live.
    pub path: String,

    /// Table version (default: "main").
    #[serde(default = "default_version")]
    pub version: String,
}

fn default_version() -> String {
    "main".to_string()
}

impl TableConfig {
    /// The table root with any trailing slash removed, so that prefix
    /// substitution always happens on a path-segment boundary.
    pub fn root(&self) -> &str {
        self.path.trim_end_matches('/')
    }
}

impl Config {
    /// Load configuration from a YAML file, interpolating environment
    /// variables first.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).context(ReadFileSnafu)?;
        Self::from_yaml(&raw)
    }

    /// Parse configuration from a YAML string.
    pub fn from_yaml(raw: &str) -> Result<Self, ConfigError> {
        let interpolated = vars::interpolate(raw);
        ensure!(
            interpolated.is_ok(),
            EnvInterpolationSnafu {
                message: interpolated.errors.join("\n"),
            }
        );

        let config: Config = serde_yaml::from_str(&interpolated.text).context(YamlParseSnafu)?;
        Ok(config)
    }

    /// Validate the configuration.
    ///
    /// Fails fast on missing credentials or unusable table identifiers so
    /// misconfiguration is reported at construction, not on first use.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.storage.url.starts_with("s3")
            && (self.storage.access_key.is_none() || self.storage.secret_key.is_none())
        {
            return MissingCredentialsSnafu.fail();
        }

        for (side, table) in [("input", &self.input), ("output", &self.output)] {
            ensure!(!table.name.is_empty(), EmptyTableNameSnafu { side });
            ensure!(!table.root().is_empty(), EmptyTablePathSnafu { side });
        }

        ensure!(
            self.input.root() != self.output.root(),
            IdenticalTablePathsSnafu
        );

        Ok(())
    }
}
