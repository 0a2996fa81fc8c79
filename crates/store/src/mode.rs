// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Durable vs. transient execution of mutating operations.

/// Whether a mutating operation writes its effect to the backing file.
///
/// Both modes compute and return the same records; only `Durable` touches
/// storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mode {
    /// Apply the change to the backing file and return the affected records.
    Durable,
    /// Compute and return the affected records without touching storage.
    Transient,
}

impl Mode {
    /// The customary mode for inserts.
    pub fn for_add() -> Self {
        Mode::Durable
    }

    /// The customary mode for updates and deletes.
    pub fn for_rewrite() -> Self {
        Mode::Transient
    }

    /// Returns true for [`Mode::Durable`].
    pub fn is_durable(self) -> bool {
        matches!(self, Mode::Durable)
    }
}

impl From<bool> for Mode {
    /// Maps a "mutate the database" flag onto a mode.
    fn from(mutate: bool) -> Self {
        if mutate {
            Mode::Durable
        } else {
            Mode::Transient
        }
    }
}

#[cfg(test)]
#[path = "mode_tests.rs"]
mod tests;
