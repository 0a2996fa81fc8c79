// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! jot-core: Storage primitives for the jotdb record store
//!
//! This crate provides the JSONL file accessor (batched scans, counting and
//! appends), scoped temporary files for rewrites, configuration, and the
//! shared error type.

pub mod config;
pub mod error;
pub mod jsonl;
pub mod temp;

pub use config::StoreConfig;
pub use error::{Error, Result};
pub use jsonl::{BatchReader, JsonlFile, Record};
pub use temp::with_temporary_file;
