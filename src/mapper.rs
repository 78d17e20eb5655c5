//! Input-to-output table path mapping.
//!
//! An output table root is always derivable from the input root by exact
//! prefix substitution; every path segment after the table root (partition
//! keys, file name) is byte-identical between input and output.

use crate::error::{InvalidPathSnafu, LakehouseError};
use snafu::prelude::*;

/// Map an input-table file path to its output-table location.
///
/// The substitution is exact-prefix, never substring-anywhere: the input
/// root must match whole path segments, so `tables/foo` does not match
/// `tables/foobar/part-0.parquet`. Pure; no I/O.
pub fn map_output_location(
    input_path: &str,
    input_root: &str,
    output_root: &str,
) -> Result<String, LakehouseError> {
    let input_root = input_root.trim_end_matches('/');
    let output_root = output_root.trim_end_matches('/');

    let suffix = input_path
        .strip_prefix(input_root)
        .filter(|suffix| suffix.is_empty() || suffix.starts_with('/'))
        .context(InvalidPathSnafu {
            path: input_path,
            root: input_root,
        })?;

    Ok(format!("{output_root}{suffix}"))
}
