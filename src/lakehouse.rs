//! The lakehouse data access façade.
//!
//! Composes the file catalog, checkpoint filter, profiler, path mapper and
//! table codec behind the four public operations used by orchestrators and
//! transforms. Holds no mutable state beyond the immutable configuration, so
//! a single instance is safe to share across concurrent callers.

use snafu::prelude::*;
use std::sync::Arc;
use tracing::info;

use crate::catalog::{DatasetMatcher, FileCatalog, PathSegmentMatcher, PhysicalFile, Profile};
use crate::checkpoint::CheckpointFilter;
use crate::config::Config;
use crate::error::{ConfigSnafu, LakehouseError, StorageSnafu, TableSnafu, TableWriteSnafu};
use crate::mapper::map_output_location;
use crate::storage::StorageProvider;
use crate::table::{Table, TableCodec};

/// Data access for one input/output table pair on a lakehouse.
pub struct DataAccessLakeHouse {
    config: Config,
    storage: StorageProvider,
    datasets: Arc<dyn DatasetMatcher>,
}

impl std::fmt::Debug for DataAccessLakeHouse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DataAccessLakeHouse")
            .field("config", &self.config)
            .field("storage", &self.storage)
            .finish_non_exhaustive()
    }
}

impl DataAccessLakeHouse {
    /// Validate the configuration and connect to storage.
    ///
    /// Misconfiguration (missing credentials, unusable table identifiers)
    /// fails here rather than on first use.
    pub async fn new(config: Config) -> Result<Self, LakehouseError> {
        config.validate().context(ConfigSnafu)?;
        let storage = StorageProvider::connect(&config.storage)
            .await
            .context(StorageSnafu)?;

        Ok(Self {
            config,
            storage,
            datasets: Arc::new(PathSegmentMatcher),
        })
    }

    /// Replace the dataset membership strategy.
    pub fn with_dataset_matcher(mut self, datasets: Arc<dyn DatasetMatcher>) -> Self {
        self.datasets = datasets;
        self
    }

    /// The resolved configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Map an input-table file path to its output-table location.
    pub fn get_output_location(&self, input_path: &str) -> Result<String, LakehouseError> {
        map_output_location(input_path, self.config.input.root(), self.config.output.root())
    }

    /// Read and decode the table file at `path`.
    pub async fn get_table(&self, path: &str) -> Result<Table, LakehouseError> {
        let bytes = self.storage.get(path).await.map_err(|source| {
            if source.is_not_found() {
                LakehouseError::TableNotFound {
                    path: path.to_string(),
                }
            } else {
                LakehouseError::Storage { source }
            }
        })?;

        TableCodec::decode(bytes, path).context(TableSnafu)
    }

    /// Encode `table` and write it to `path`, returning the serialized size
    /// in bytes.
    pub async fn save_table(&self, path: &str, table: &Table) -> Result<u64, LakehouseError> {
        let bytes = TableCodec::encode(table).context(TableSnafu)?;
        let written = self
            .storage
            .put(path, bytes)
            .await
            .context(TableWriteSnafu { path })?;

        info!("Saved table to {} ({} bytes)", path, written);
        Ok(written)
    }

    /// Select the input files that still need processing, with their size
    /// profile.
    ///
    /// Enumeration, checkpoint filtering, truncation and profiling form a
    /// strict causal chain: each stage consumes the prior stage's complete
    /// output. Nothing is cached across calls, so a failure leaves the
    /// façade reusable as-is.
    pub async fn get_files_to_process(
        &self,
    ) -> Result<(Vec<PhysicalFile>, Profile), LakehouseError> {
        let catalog = FileCatalog::new(&self.storage, self.datasets.as_ref());
        let mut files = catalog
            .list(self.config.input.root(), self.config.data_sets.as_deref())
            .await
            .context(StorageSnafu)?;

        if self.config.checkpoint {
            files = CheckpointFilter::new(&self.storage)
                .todo(files, self.config.input.root(), self.config.output.root())
                .await?;
        }

        if self.config.max_files >= 0 {
            files.truncate(self.config.max_files as usize);
        }

        let profile = crate::catalog::summarize(&files);

        info!(
            "Selected {} files to process from table {} ({:.3} MB total)",
            files.len(),
            self.config.input.name,
            profile.total_file_size
        );

        Ok((files, profile))
    }
}
