// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Record operations over a single entity file.
//!
//! Reads stream the backing file in batches. Durable updates and deletes never
//! edit the file in place: the new content is streamed into a temporary file
//! in the same directory, which is then renamed over the original. A reader
//! therefore sees either the old file or the new one, never a mix.
//!
//! Only one durable mutation may be in flight per entity. A durable `add`
//! racing with a rewrite can be lost when the rename lands.

use std::ops::ControlFlow;
use std::path::{Path, PathBuf};

use jot_core::jsonl::kind_of;
use jot_core::{with_temporary_file, Error, JsonlFile, Record, Result};
use serde_json::Value;
use tracing::debug;

use crate::mode::Mode;

/// Handle to a named, file-backed sequence of records.
#[derive(Debug, Clone)]
pub struct Entity {
    name: String,
    dir: PathBuf,
    extension: String,
    file: JsonlFile,
}

impl Entity {
    pub(crate) fn new(name: &str, dir: &Path, extension: &str, file: JsonlFile) -> Self {
        Entity {
            name: name.to_string(),
            dir: dir.to_path_buf(),
            extension: extension.to_string(),
            file,
        }
    }

    /// Returns the entity name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the path to the backing file.
    pub fn path(&self) -> &Path {
        self.file.path()
    }

    /// Returns true if the backing file exists.
    pub async fn exists(&self) -> Result<bool> {
        self.file.exists().await
    }

    /// Returns the number of stored records.
    pub async fn count(&self) -> Result<usize> {
        self.file.count().await
    }

    /// Inserts a record or an array of records.
    ///
    /// `data` must be a JSON object or an array of JSON objects; anything else
    /// fails with [`Error::InvalidInput`] before any write. An empty array is
    /// accepted and does nothing. The accepted records are returned in both
    /// modes.
    pub async fn add(&self, data: Value, mode: Mode) -> Result<Vec<Record>> {
        let records = into_records(data)?;
        self.add_records(records, mode).await
    }

    /// Inserts already-typed records in order.
    pub async fn add_records(&self, records: Vec<Record>, mode: Mode) -> Result<Vec<Record>> {
        if mode.is_durable() {
            self.file.append(&records).await?;
        }
        Ok(records)
    }

    /// Returns the first record, in file order, matching `predicate`.
    ///
    /// The scan stops after the batch holding the first match, but every
    /// record of that batch is still passed to `predicate`.
    pub async fn find_one<P>(&self, mut predicate: P) -> Result<Option<Record>>
    where
        P: FnMut(&Record) -> bool,
    {
        let mut found = None;
        self.file
            .read(|batch| {
                for record in batch {
                    if predicate(&record) && found.is_none() {
                        found = Some(record);
                    }
                }
                if found.is_some() {
                    ControlFlow::Break(())
                } else {
                    ControlFlow::Continue(())
                }
            })
            .await?;
        Ok(found)
    }

    /// Returns every record matching `predicate`, in file order.
    pub async fn find<P>(&self, mut predicate: P) -> Result<Vec<Record>>
    where
        P: FnMut(&Record) -> bool,
    {
        let mut matches = Vec::new();
        self.file
            .read(|batch| {
                matches.extend(batch.into_iter().filter(|r| predicate(r)));
                ControlFlow::Continue(())
            })
            .await?;
        Ok(matches)
    }

    /// Replaces every record matching `predicate` with `transform(record)`.
    ///
    /// Returns the transformed records in file order. In durable mode the
    /// file keeps its record count and order; only matching records change.
    pub async fn update<P, T>(
        &self,
        mut predicate: P,
        mut transform: T,
        mode: Mode,
    ) -> Result<Vec<Record>>
    where
        P: FnMut(&Record) -> bool,
        T: FnMut(Record) -> Record,
    {
        let mut updated = Vec::new();

        match mode {
            Mode::Transient => {
                self.file
                    .read(|batch| {
                        for record in batch {
                            if predicate(&record) {
                                updated.push(transform(record));
                            }
                        }
                        ControlFlow::Continue(())
                    })
                    .await?;
            }
            Mode::Durable => {
                self.rewrite(|batch| {
                    batch
                        .into_iter()
                        .map(|record| {
                            if predicate(&record) {
                                let replaced = transform(record);
                                updated.push(replaced.clone());
                                replaced
                            } else {
                                record
                            }
                        })
                        .collect()
                })
                .await?;
            }
        }

        Ok(updated)
    }

    /// Removes every record matching `predicate`.
    ///
    /// Returns the records that were kept, in file order, in both modes.
    pub async fn delete<P>(&self, mut predicate: P, mode: Mode) -> Result<Vec<Record>>
    where
        P: FnMut(&Record) -> bool,
    {
        let mut kept = Vec::new();

        match mode {
            Mode::Transient => {
                self.file
                    .read(|batch| {
                        kept.extend(batch.into_iter().filter(|r| !predicate(r)));
                        ControlFlow::Continue(())
                    })
                    .await?;
            }
            Mode::Durable => {
                self.rewrite(|batch| {
                    let survivors: Vec<Record> =
                        batch.into_iter().filter(|r| !predicate(r)).collect();
                    kept.extend(survivors.iter().cloned());
                    survivors
                })
                .await?;
            }
        }

        Ok(kept)
    }

    /// Removes all records.
    ///
    /// Returns how many records the entity held. In durable mode the backing
    /// file is deleted; a missing file is not an error.
    pub async fn clear(&self, mode: Mode) -> Result<usize> {
        let removed = self.file.count().await?;
        if mode.is_durable() {
            match tokio::fs::remove_file(self.file.path()).await {
                Ok(()) => debug!(entity = %self.name, removed, "cleared"),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => return Err(e.into()),
            }
        }
        Ok(removed)
    }

    /// Streams the file through `process` into a temporary file, then renames
    /// the temporary file over the original.
    ///
    /// `process` maps each batch to the records that replace it; an empty
    /// result writes nothing for that batch. A missing backing file is left
    /// missing.
    async fn rewrite<F>(&self, process: F) -> Result<()>
    where
        F: FnMut(Vec<Record>) -> Vec<Record>,
    {
        if !self.file.exists().await? {
            return Ok(());
        }

        with_temporary_file(&self.dir, &self.extension, move |temp_path| {
            self.rewrite_into(temp_path, process)
        })
        .await
    }

    async fn rewrite_into<F>(&self, temp_path: PathBuf, mut process: F) -> Result<()>
    where
        F: FnMut(Vec<Record>) -> Vec<Record>,
    {
        let temp = self.file.sibling_unsynced(&temp_path);
        let mut reader = self.file.batches().await?;
        let mut read = 0usize;
        let mut written = 0usize;

        while let Some(batch) = reader.next_batch().await? {
            read += batch.len();
            let replacement = process(batch);
            if replacement.is_empty() {
                continue;
            }
            written += replacement.len();
            temp.append(&replacement).await?;
        }

        if self.file.syncs() {
            temp.sync_all().await?;
        }

        // Temporary files are created owner-only; keep the original's mode.
        let permissions = tokio::fs::metadata(self.file.path()).await?.permissions();
        tokio::fs::set_permissions(&temp_path, permissions).await?;

        tokio::fs::rename(&temp_path, self.file.path())
            .await
            .map_err(|source| Error::Rename {
                from: temp_path.clone(),
                to: self.file.path().to_path_buf(),
                source,
            })?;

        debug!(entity = %self.name, read, written, "rewrote backing file");
        Ok(())
    }
}

/// Validates insert input: one object, or an array of objects.
fn into_records(data: Value) -> Result<Vec<Record>> {
    match data {
        Value::Object(record) => Ok(vec![record]),
        Value::Array(items) => items
            .into_iter()
            .enumerate()
            .map(|(i, item)| match item {
                Value::Object(record) => Ok(record),
                other => Err(Error::InvalidInput(format!(
                    "array element {i} is {}, expected an object",
                    kind_of(&other)
                ))),
            })
            .collect(),
        other => Err(Error::InvalidInput(format!(
            "expected an object or an array of objects, found {}",
            kind_of(&other)
        ))),
    }
}

#[cfg(test)]
#[path = "entity_tests.rs"]
mod tests;
