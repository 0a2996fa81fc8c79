// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Store configuration.
//!
//! Configuration is usually kept in a `jot.toml` next to the data and includes:
//! - `batch_size`: Number of records decoded per scan step (default 1000)
//! - `sync`: Whether appends and rewrites are fsynced (default true)
//! - `extension`: Backing file extension (default "jsonl")

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

const DEFAULT_BATCH_SIZE: usize = 1000;
const DEFAULT_EXTENSION: &str = "jsonl";

/// Tunables shared by every entity of a store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Maximum number of records handed to a scan visitor at once.
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,
    /// Fsync after every append and before a rewrite is renamed into place.
    #[serde(default = "default_sync")]
    pub sync: bool,
    /// File extension of backing files, without the leading dot.
    #[serde(default = "default_extension")]
    pub extension: String,
}

fn default_batch_size() -> usize {
    DEFAULT_BATCH_SIZE
}

fn default_sync() -> bool {
    true
}

fn default_extension() -> String {
    DEFAULT_EXTENSION.to_string()
}

impl Default for StoreConfig {
    fn default() -> Self {
        StoreConfig {
            batch_size: default_batch_size(),
            sync: default_sync(),
            extension: default_extension(),
        }
    }
}

impl StoreConfig {
    /// Loads configuration from a TOML file.
    ///
    /// A missing file is not an error: the defaults are returned.
    pub fn load(path: &Path) -> Result<Self> {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(e) => return Err(e.into()),
        };
        Self::parse(&content)
    }

    /// Parses and validates configuration from TOML text.
    pub fn parse(content: &str) -> Result<Self> {
        let config: StoreConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Returns a copy with a different batch size.
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size;
        self
    }

    /// Returns a copy with fsync turned on or off.
    pub fn with_sync(mut self, sync: bool) -> Self {
        self.sync = sync;
        self
    }

    /// Checks that every field holds a usable value.
    pub fn validate(&self) -> Result<()> {
        if self.batch_size == 0 {
            return Err(Error::Config("batch_size must be at least 1".to_string()));
        }
        if self.extension.is_empty()
            || self.extension.starts_with('.')
            || self.extension.contains(['/', '\\'])
        {
            return Err(Error::Config(format!(
                "extension '{}' must be a bare suffix like \"jsonl\"",
                self.extension
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
