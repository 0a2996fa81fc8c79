// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Scoped temporary files for rewrites.
//!
//! The file is created inside the target directory so that a later rename
//! onto a sibling path never crosses filesystems.

use std::future::Future;
use std::path::{Path, PathBuf};

use tracing::warn;

use crate::error::Result;

const TEMP_PREFIX: &str = ".jot-";

/// Runs `task` with the path of a fresh, empty temporary file in `dir`.
///
/// The file name is hidden (leading dot) and ends in `.{extension}`. The file
/// is removed once `task` finishes, whether it succeeded or failed. If `task`
/// renamed the file away, there is nothing left to remove. Dropping the
/// returned future early also removes the file.
pub async fn with_temporary_file<F, Fut, T>(dir: &Path, extension: &str, task: F) -> Result<T>
where
    F: FnOnce(PathBuf) -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let dir = dir.to_path_buf();
    let suffix = format!(".{extension}");
    let temp = tokio::task::spawn_blocking(move || {
        tempfile::Builder::new()
            .prefix(TEMP_PREFIX)
            .suffix(&suffix)
            .tempfile_in(&dir)
    })
    .await
    .map_err(std::io::Error::other)??
    .into_temp_path();

    let result = task(temp.to_path_buf()).await;

    let path = temp.to_path_buf();
    match tokio::fs::remove_file(&path).await {
        Ok(()) => {}
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => warn!(path = %path.display(), error = %e, "failed to remove temporary file"),
    }
    // Already removed above; disarm the drop guard.
    let _ = temp.keep();

    result
}

/// Returns true if `name` looks like a file created by [`with_temporary_file`].
pub fn is_temporary_name(name: &str) -> bool {
    name.starts_with(TEMP_PREFIX)
}

#[cfg(test)]
#[path = "temp_tests.rs"]
mod tests;
