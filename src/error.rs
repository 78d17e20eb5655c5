//! Error types for lakehouse-access using snafu.
//!
//! This module defines structured error types with context selectors for
//! all error conditions in the codebase.

use snafu::prelude::*;

// ============ Storage Errors ============

/// Errors that can occur during storage operations.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum StorageError {
    /// Invalid storage URL format.
    #[snafu(display("Invalid storage URL: {url}"))]
    InvalidUrl { url: String },

    /// Object store operation failed.
    #[snafu(display("Storage operation failed"))]
    ObjectStore { source: object_store::Error },

    /// S3 configuration error.
    #[snafu(display("S3 configuration error"))]
    S3Config { source: object_store::Error },

    /// Local filesystem configuration error.
    #[snafu(display("Local storage configuration error"))]
    LocalConfig { source: object_store::Error },
}

impl StorageError {
    /// Check if this error represents a "not found" condition (404, NoSuchKey, etc.)
    pub fn is_not_found(&self) -> bool {
        match self {
            StorageError::ObjectStore { source } => {
                matches!(source, object_store::Error::NotFound { .. })
            }
            _ => false,
        }
    }
}

// ============ Config Errors ============

/// Errors that can occur during configuration parsing and validation.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum ConfigError {
    /// S3 storage configured without credentials.
    #[snafu(display("S3 storage requires access_key and secret_key"))]
    MissingCredentials,

    /// A table identifier is missing its logical name.
    #[snafu(display("{side} table name cannot be empty"))]
    EmptyTableName { side: &'static str },

    /// A table identifier is missing its physical root path.
    #[snafu(display("{side} table path cannot be empty"))]
    EmptyTablePath { side: &'static str },

    /// Input and output roots must differ, otherwise mapping is a no-op
    /// and checkpointing would skip everything.
    #[snafu(display("Input and output table paths must differ"))]
    IdenticalTablePaths,

    /// Environment variable interpolation failed.
    #[snafu(display("Environment variable interpolation failed:\n{message}"))]
    EnvInterpolation { message: String },

    /// Failed to parse YAML configuration.
    #[snafu(display("Failed to parse YAML configuration"))]
    YamlParse { source: serde_yaml::Error },

    /// Failed to read configuration file.
    #[snafu(display("Failed to read configuration file"))]
    ReadFile { source: std::io::Error },
}

// ============ Table Codec Errors ============

/// Errors that can occur while encoding or decoding parquet table files.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum TableError {
    /// Parquet metadata or page data is malformed.
    #[snafu(display("Failed to decode parquet table at {path}"))]
    Decode {
        source: parquet::errors::ParquetError,
        path: String,
    },

    /// Record batch materialization failed mid-read.
    #[snafu(display("Failed to read record batches from {path}"))]
    BatchRead {
        source: arrow::error::ArrowError,
        path: String,
    },

    /// Parquet serialization failed.
    #[snafu(display("Failed to encode parquet table"))]
    Encode {
        source: parquet::errors::ParquetError,
    },
}

// ============ Lakehouse Error (top-level) ============

/// Top-level errors surfaced by the lakehouse façade.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum LakehouseError {
    /// Configuration error.
    #[snafu(display("Configuration error"))]
    Config { source: ConfigError },

    /// Storage error.
    #[snafu(display("Storage error"))]
    Storage { source: StorageError },

    /// Table codec error.
    #[snafu(display("Table error"))]
    Table { source: TableError },

    /// Path is not located under the configured table root.
    #[snafu(display("Path {path} is outside table root {root}"))]
    InvalidPath { path: String, root: String },

    /// No table file exists at the requested path.
    #[snafu(display("No table found at {path}"))]
    TableNotFound { path: String },

    /// Write to storage failed.
    #[snafu(display("Failed to write table to {path}"))]
    TableWrite { source: StorageError, path: String },
}

impl LakehouseError {
    /// Check if this error represents a "not found" condition (404, NoSuchKey, etc.)
    pub fn is_not_found(&self) -> bool {
        match self {
            LakehouseError::TableNotFound { .. } => true,
            LakehouseError::Storage { source } => source.is_not_found(),
            _ => false,
        }
    }
}
