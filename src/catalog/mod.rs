//! Table file enumeration.
//!
//! Lists the physical data files belonging to one table, optionally
//! restricted to named dataset subsets, as a deterministically ordered
//! catalog with per-file sizes in megabytes.

mod profile;

pub use profile::{Profile, summarize};

use tracing::debug;

use crate::config::MB;
use crate::error::StorageError;
use crate::storage::StorageProvider;

/// A single physical table file.
#[derive(Debug, Clone, PartialEq)]
pub struct PhysicalFile {
    /// Fully-qualified object storage key.
    pub path: String,
    /// File size in MiB-scaled megabytes.
    pub size_mb: f64,
}

/// Decides whether a physical path belongs to a named dataset.
///
/// Dataset membership is a storage-layout convention, so it is injected as a
/// strategy; alternate table layouts can supply their own test.
pub trait DatasetMatcher: Send + Sync {
    fn belongs_to(&self, path: &str, dataset: &str) -> bool;
}

/// Default matcher: a file belongs to dataset `d` when one of its path
/// segments is `d` or `dataset=d`.
#[derive(Debug, Default, Clone, Copy)]
pub struct PathSegmentMatcher;

impl DatasetMatcher for PathSegmentMatcher {
    fn belongs_to(&self, path: &str, dataset: &str) -> bool {
        path.split('/')
            .any(|segment| segment == dataset || segment.strip_prefix("dataset=") == Some(dataset))
    }
}

/// Enumerates the data files of one table.
pub struct FileCatalog<'a> {
    storage: &'a StorageProvider,
    datasets: &'a dyn DatasetMatcher,
}

impl<'a> FileCatalog<'a> {
    pub fn new(storage: &'a StorageProvider, datasets: &'a dyn DatasetMatcher) -> Self {
        Self { storage, datasets }
    }

    /// List every data file under the table root.
    ///
    /// When `subsets` is non-empty, only files belonging to one of the named
    /// datasets are included. An empty table root yields an empty catalog,
    /// not an error. The result is sorted by path within a single call so
    /// that truncation and diffing downstream are deterministic.
    pub async fn list(
        &self,
        table_root: &str,
        subsets: Option<&[String]>,
    ) -> Result<Vec<PhysicalFile>, StorageError> {
        let entries = self.storage.list_with_prefix(table_root).await?;
        let total_listed = entries.len();

        let mut files: Vec<PhysicalFile> = entries
            .into_iter()
            .filter(|entry| entry.path.ends_with(".parquet"))
            .map(|entry| PhysicalFile {
                path: entry.path,
                size_mb: entry.size_bytes as f64 / MB as f64,
            })
            .collect();

        if let Some(subsets) = subsets.filter(|subsets| !subsets.is_empty()) {
            files.retain(|file| {
                subsets
                    .iter()
                    .any(|dataset| self.datasets.belongs_to(&file.path, dataset))
            });
        }

        debug!(
            "Cataloged {} data files under {} ({} objects listed)",
            files.len(),
            table_root,
            total_listed
        );

        Ok(files)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matcher_plain_segment() {
        let m = PathSegmentMatcher;
        assert!(m.belongs_to("tables/bluepile/doabooks/part-0.parquet", "doabooks"));
        assert!(!m.belongs_to("tables/bluepile/ieee/part-0.parquet", "doabooks"));
    }

    #[test]
    fn test_matcher_key_value_segment() {
        let m = PathSegmentMatcher;
        assert!(m.belongs_to("tables/t/dataset=doabooks/part-0.parquet", "doabooks"));
        assert!(!m.belongs_to("tables/t/dataset=doabooks2/part-0.parquet", "doabooks"));
    }

    #[test]
    fn test_matcher_rejects_substring_matches() {
        let m = PathSegmentMatcher;
        assert!(!m.belongs_to("tables/doabooks-extra/part-0.parquet", "doabooks"));
        assert!(!m.belongs_to("tables/mydoabooks/part-0.parquet", "doabooks"));
    }
}
