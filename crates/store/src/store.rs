// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Store handle: maps entity names onto files in a base directory.
//!
//! Each entity `name` lives at `<dir>/<name>.<extension>` (`.jsonl` unless
//! configured otherwise).

use std::path::{Path, PathBuf};

use jot_core::temp::is_temporary_name;
use jot_core::{Error, JsonlFile, Result, StoreConfig};
use tracing::debug;

use crate::entity::Entity;

/// A record store rooted at one directory.
///
/// Construct one per base directory and hand out [`Entity`] handles from it.
#[derive(Debug, Clone)]
pub struct Store {
    dir: PathBuf,
    config: StoreConfig,
}

impl Store {
    /// Opens a store at `dir`, creating the directory if needed.
    pub async fn open(dir: impl Into<PathBuf>, config: StoreConfig) -> Result<Self> {
        config.validate()?;
        let dir = dir.into();
        tokio::fs::create_dir_all(&dir).await?;

        debug!(
            dir = %dir.display(),
            batch_size = config.batch_size,
            sync = config.sync,
            "store opened"
        );
        Ok(Store { dir, config })
    }

    /// Returns the base directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Returns the store configuration.
    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Returns a handle to the entity called `name`.
    ///
    /// The backing file is not created until the first durable write.
    pub fn entity(&self, name: &str) -> Result<Entity> {
        validate_entity_name(name)?;
        let path = self.dir.join(format!("{name}.{}", self.config.extension));
        let file = JsonlFile::new(path, &self.config);
        Ok(Entity::new(name, &self.dir, &self.config.extension, file))
    }

    /// Lists entities that have a backing file, sorted by name.
    pub async fn entities(&self) -> Result<Vec<String>> {
        let suffix = format!(".{}", self.config.extension);
        let mut names = Vec::new();

        let mut entries = tokio::fs::read_dir(&self.dir).await?;
        while let Some(entry) = entries.next_entry().await? {
            if !entry.file_type().await?.is_file() {
                continue;
            }
            let file_name = entry.file_name();
            let Some(file_name) = file_name.to_str() else {
                continue;
            };
            if is_temporary_name(file_name) {
                continue;
            }
            if let Some(name) = file_name.strip_suffix(&suffix) {
                if validate_entity_name(name).is_ok() {
                    names.push(name.to_string());
                }
            }
        }

        names.sort();
        Ok(names)
    }
}

/// Checks that `name` maps to a plain file name inside the store directory.
///
/// Names must be non-empty, must not start with a dot, and must not contain
/// path separators or NUL bytes.
pub fn validate_entity_name(name: &str) -> Result<()> {
    let valid = !name.is_empty()
        && !name.starts_with('.')
        && !name.contains(['/', '\\', '\0']);

    if valid {
        Ok(())
    } else {
        Err(Error::InvalidEntityName(name.to_string()))
    }
}

#[cfg(test)]
#[path = "store_tests.rs"]
mod tests;
