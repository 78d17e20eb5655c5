//! Local filesystem storage backend implementation.

use object_store::ObjectStore;
use object_store::local::LocalFileSystem;
use snafu::prelude::*;
use std::sync::Arc;

use crate::error::{LocalConfigSnafu, StorageError};

use super::{BackendConfig, StorageProvider};

/// Local filesystem configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalConfig {
    pub path: String,
}

impl StorageProvider {
    pub(super) fn construct_local(config: LocalConfig) -> Result<Self, StorageError> {
        let store = LocalFileSystem::new_with_prefix(&config.path).context(LocalConfigSnafu)?;

        let canonical_url = format!("file://{}", config.path);
        let object_store: Arc<dyn ObjectStore> = Arc::new(store);

        Ok(Self {
            config: BackendConfig::Local(config),
            object_store,
            canonical_url,
        })
    }
}
