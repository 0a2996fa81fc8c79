// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! JSONL (JSON Lines) file access.
//!
//! A [`JsonlFile`] is the batched scan engine the store is built on. Records
//! are streamed from disk in batches so that large files are never loaded
//! whole, and callers decide after every batch whether to keep reading.
//! Appends always leave the file ending at a line boundary.

use std::ops::ControlFlow;
use std::path::{Path, PathBuf};

use serde_json::Value;
use tokio::fs::{File, OpenOptions};
use tokio::io::{
    AsyncBufReadExt, AsyncReadExt, AsyncSeekExt, AsyncWriteExt, BufReader, Lines, SeekFrom,
};
use tracing::debug;

use crate::config::StoreConfig;
use crate::error::{Error, Result};

/// A single stored record: one JSON object per line.
pub type Record = serde_json::Map<String, Value>;

/// Handle to a JSONL backing file.
///
/// The handle holds no open file descriptor; every operation opens the file
/// for its own duration.
#[derive(Debug, Clone)]
pub struct JsonlFile {
    path: PathBuf,
    batch_size: usize,
    sync: bool,
}

impl JsonlFile {
    /// Creates a handle using the batch size and sync policy of `config`.
    pub fn new(path: impl Into<PathBuf>, config: &StoreConfig) -> Self {
        JsonlFile {
            path: path.into(),
            batch_size: config.batch_size.max(1),
            sync: config.sync,
        }
    }

    /// Returns the path to the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the number of records handed out per batch.
    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    /// Returns true if appends are fsynced.
    pub fn syncs(&self) -> bool {
        self.sync
    }

    /// Returns a handle to another file with the same batch size, without
    /// per-append fsync. Used for rewrite targets, which are synced once
    /// before they are renamed into place.
    pub fn sibling_unsynced(&self, path: impl Into<PathBuf>) -> Self {
        JsonlFile {
            path: path.into(),
            batch_size: self.batch_size,
            sync: false,
        }
    }

    /// Returns true if the backing file exists.
    pub async fn exists(&self) -> Result<bool> {
        Ok(tokio::fs::try_exists(&self.path).await?)
    }

    /// Opens a pull-based batch reader over the file.
    ///
    /// A missing file produces a reader that yields no batches.
    pub async fn batches(&self) -> Result<BatchReader> {
        let lines = match File::open(&self.path).await {
            Ok(file) => Some(BufReader::new(file).lines()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => None,
            Err(e) => return Err(e.into()),
        };

        Ok(BatchReader {
            path: self.path.clone(),
            lines,
            batch_size: self.batch_size,
            line_no: 0,
        })
    }

    /// Streams the file batch by batch into `visitor`.
    ///
    /// Returning [`ControlFlow::Break`] from the visitor stops the scan; no
    /// further lines are read.
    pub async fn read<F>(&self, mut visitor: F) -> Result<()>
    where
        F: FnMut(Vec<Record>) -> ControlFlow<()>,
    {
        let mut reader = self.batches().await?;
        while let Some(batch) = reader.next_batch().await? {
            if visitor(batch).is_break() {
                debug!(path = %self.path.display(), line = reader.line_no(), "scan stopped early");
                break;
            }
        }
        Ok(())
    }

    /// Returns the number of records in the file.
    ///
    /// Counts non-blank lines without decoding them.
    pub async fn count(&self) -> Result<usize> {
        let file = match File::open(&self.path).await {
            Ok(f) => f,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(0),
            Err(e) => return Err(e.into()),
        };

        let mut lines = BufReader::new(file).lines();
        let mut count = 0;
        while let Some(line) = lines.next_line().await? {
            if !line.trim().is_empty() {
                count += 1;
            }
        }

        Ok(count)
    }

    /// Appends already-serialized lines to the file, creating it if missing.
    ///
    /// All lines go out in a single write. If the file's last line is missing
    /// its line break, one is written first. An empty input does nothing and
    /// does not create the file.
    pub async fn append_text<I, S>(&self, lines: I) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut buf = String::new();
        let mut written = 0usize;
        for line in lines {
            let line = line.as_ref();
            if line.contains('\n') {
                return Err(Error::InvalidLine(
                    "a JSONL line cannot contain a line break".to_string(),
                ));
            }
            buf.push_str(line);
            buf.push('\n');
            written += 1;
        }

        if written == 0 {
            return Ok(());
        }

        let mut file = OpenOptions::new()
            .create(true)
            .read(true)
            .append(true)
            .open(&self.path)
            .await?;

        if !ends_at_line_boundary(&mut file).await? {
            buf.insert(0, '\n');
        }

        file.write_all(buf.as_bytes()).await?;
        file.flush().await?;
        if self.sync {
            file.sync_all().await?;
        }

        debug!(path = %self.path.display(), lines = written, "appended");
        Ok(())
    }

    /// Serializes records and appends them, one per line, in order.
    pub async fn append(&self, records: &[Record]) -> Result<()> {
        let lines = records
            .iter()
            .map(serde_json::to_string)
            .collect::<std::result::Result<Vec<_>, _>>()?;
        self.append_text(lines).await
    }

    /// Flushes the file's contents to stable storage.
    ///
    /// Does nothing if the file does not exist.
    pub async fn sync_all(&self) -> Result<()> {
        match OpenOptions::new().append(true).open(&self.path).await {
            Ok(file) => Ok(file.sync_all().await?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// Pull-based reader handing out consecutive batches of records.
///
/// Dropping the reader ends the scan.
pub struct BatchReader {
    path: PathBuf,
    lines: Option<Lines<BufReader<File>>>,
    batch_size: usize,
    line_no: usize,
}

impl BatchReader {
    /// Reads the next batch.
    ///
    /// Returned batches are never empty; `None` marks the end of the file.
    pub async fn next_batch(&mut self) -> Result<Option<Vec<Record>>> {
        let Some(lines) = self.lines.as_mut() else {
            return Ok(None);
        };

        let mut batch = Vec::new();
        let mut exhausted = false;
        while batch.len() < self.batch_size {
            let Some(line) = lines.next_line().await? else {
                exhausted = true;
                break;
            };
            self.line_no += 1;
            if line.trim().is_empty() {
                continue;
            }
            batch.push(parse_record(&self.path, self.line_no, &line)?);
        }
        if exhausted {
            self.lines = None;
        }

        if batch.is_empty() {
            Ok(None)
        } else {
            Ok(Some(batch))
        }
    }

    /// Returns the number of lines consumed so far, blank lines included.
    pub fn line_no(&self) -> usize {
        self.line_no
    }
}

/// Returns true if the file is empty or its last byte is `\n`.
async fn ends_at_line_boundary(file: &mut File) -> Result<bool> {
    if file.metadata().await?.len() == 0 {
        return Ok(true);
    }

    file.seek(SeekFrom::End(-1)).await?;
    let mut last = [0u8; 1];
    file.read_exact(&mut last).await?;
    Ok(last[0] == b'\n')
}

fn parse_record(path: &Path, line_no: usize, line: &str) -> Result<Record> {
    let corrupted = |reason: String| Error::Corrupted {
        path: path.to_path_buf(),
        line: line_no,
        reason,
    };

    match serde_json::from_str::<Value>(line) {
        Ok(Value::Object(record)) => Ok(record),
        Ok(other) => Err(corrupted(format!(
            "expected a JSON object, found {}",
            kind_of(&other)
        ))),
        Err(e) => Err(corrupted(e.to_string())),
    }
}

/// Names the JSON type of a value for error messages.
pub fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
#[path = "jsonl_tests.rs"]
mod tests;
