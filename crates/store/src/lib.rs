// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! jotdb: A minimal record store over JSONL files
//!
//! Every entity is one JSONL file holding one JSON object per line. Records
//! can be added, looked up, updated and deleted with caller-supplied
//! predicates. Mutating operations take a [`Mode`]: `Durable` writes the
//! change to disk, `Transient` only computes it.
//!
//! ```no_run
//! # async fn demo() -> jotdb::Result<()> {
//! use jotdb::{Mode, Store, StoreConfig};
//! use serde_json::json;
//!
//! let store = Store::open("data", StoreConfig::default()).await?;
//! let users = store.entity("users")?;
//! users.add(json!([{ "id": 1, "name": "a" }]), Mode::Durable).await?;
//! let found = users.find_one(|u| u.get("id") == Some(&json!(1))).await?;
//! # let _ = found;
//! # Ok(())
//! # }
//! ```

pub mod entity;
pub mod mode;
pub mod store;

pub use entity::Entity;
pub use jot_core::{Error, Record, Result, StoreConfig};
pub use mode::Mode;
pub use store::{validate_entity_name, Store};
