//! Aggregate size statistics over a selected file set.

use serde::Serialize;

use super::PhysicalFile;

/// Size statistics for a selected file set, in the same megabyte unit as
/// [`PhysicalFile::size_mb`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Profile {
    pub max_file_size: f64,
    pub min_file_size: f64,
    pub total_file_size: f64,
}

/// Compute max/min/total size over a catalog.
///
/// An empty catalog yields a zero-valued profile rather than an error: an
/// exhausted checkpoint run legitimately selects nothing, and downstream
/// capacity planning needs a defined answer.
pub fn summarize(files: &[PhysicalFile]) -> Profile {
    let mut iter = files.iter();

    let Some(first) = iter.next() else {
        return Profile::default();
    };

    let mut profile = Profile {
        max_file_size: first.size_mb,
        min_file_size: first.size_mb,
        total_file_size: first.size_mb,
    };

    for file in iter {
        profile.max_file_size = profile.max_file_size.max(file.size_mb);
        profile.min_file_size = profile.min_file_size.min(file.size_mb);
        profile.total_file_size += file.size_mb;
    }

    profile
}
