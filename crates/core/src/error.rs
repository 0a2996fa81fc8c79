// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Error types for jot-core operations.

use std::path::PathBuf;

use thiserror::Error;

/// All possible errors that can occur while reading or rewriting a store.
#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid input: {0}\n  hint: pass a JSON object or an array of JSON objects")]
    InvalidInput(String),

    #[error("invalid entity name: '{0}'\n  hint: names must be non-empty, must not start with '.', and must not contain path separators or NUL bytes")]
    InvalidEntityName(String),

    #[error("invalid JSONL line: {0}\n  hint: each appended line must hold exactly one serialized record")]
    InvalidLine(String),

    #[error("corrupted data in {}:{line}: {reason}", path.display())]
    Corrupted {
        path: PathBuf,
        line: usize,
        reason: String,
    },

    #[error("failed to replace {} with {}: {source}", to.display(), from.display())]
    Rename {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config: {0}")]
    Config(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("toml error: {0}")]
    Toml(#[from] toml::de::Error),
}

/// A specialized Result type for jot-core operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
