//! lakehouse-access: checkpointed file selection for lakehouse tables.
//!
//! This library resolves input-table file paths to their output-table
//! counterparts, enumerates the files that still need processing by diffing
//! against already-materialized outputs, and reads/writes the parquet table
//! files themselves.
//!
//! # Example
//!
//! ```ignore
//! use lakehouse_access::{Config, DataAccessLakeHouse};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), lakehouse_access::error::LakehouseError> {
//!     let config = Config::from_file("lakehouse.yaml")?;
//!     let access = DataAccessLakeHouse::new(config).await?;
//!     let (files, profile) = access.get_files_to_process().await?;
//!     println!("{} files to process ({} MB)", files.len(), profile.total_file_size);
//!     Ok(())
//! }
//! ```

pub mod catalog;
pub mod checkpoint;
pub mod config;
pub mod error;
pub mod lakehouse;
pub mod mapper;
pub mod storage;
pub mod table;

// Re-export main types
pub use catalog::{DatasetMatcher, PhysicalFile, Profile};
pub use config::Config;
pub use lakehouse::DataAccessLakeHouse;
pub use storage::StorageProvider;
pub use table::Table;
