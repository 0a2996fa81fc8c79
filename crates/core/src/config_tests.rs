// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]

use super::*;
use tempfile::TempDir;
use yare::parameterized;

#[test]
fn defaults() {
    let config = StoreConfig::default();
    assert_eq!(config.batch_size, 1000);
    assert!(config.sync);
    assert_eq!(config.extension, "jsonl");
}

#[test]
fn load_missing_file_returns_defaults() {
    let dir = TempDir::new().unwrap();
    let config = StoreConfig::load(&dir.path().join("jot.toml")).unwrap();
    assert_eq!(config, StoreConfig::default());
}

#[test]
fn load_partial_file_fills_defaults() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("jot.toml");
    std::fs::write(&path, "batch_size = 16\n").unwrap();

    let config = StoreConfig::load(&path).unwrap();
    assert_eq!(config.batch_size, 16);
    assert!(config.sync);
    assert_eq!(config.extension, "jsonl");
}

#[test]
fn parse_full_file() {
    let config = StoreConfig::parse("batch_size = 2\nsync = false\nextension = \"ndjson\"\n").unwrap();
    assert_eq!(config.batch_size, 2);
    assert!(!config.sync);
    assert_eq!(config.extension, "ndjson");
}

#[test]
fn parse_rejects_malformed_toml() {
    let err = StoreConfig::parse("batch_size = [").unwrap_err();
    assert!(matches!(err, Error::Toml(_)));
}

#[parameterized(
    zero_batch = { "batch_size = 0" },
    empty_extension = { "extension = \"\"" },
    dotted_extension = { "extension = \".jsonl\"" },
    separator_extension = { "extension = \"a/b\"" },
)]
fn parse_rejects_invalid_values(content: &str) {
    let err = StoreConfig::parse(content).unwrap_err();
    assert!(matches!(err, Error::Config(_)));
}

#[test]
fn builders_override_fields() {
    let config = StoreConfig::default().with_batch_size(3).with_sync(false);
    assert_eq!(config.batch_size, 3);
    assert!(!config.sync);
    assert!(config.validate().is_ok());
}
