//! The attempt store: failed-PIN counters that drive lockout.
//!
//! On disk each record is `<username>:<decimal 0-255>\n`. A user with
//! no record has zero failed attempts. The store tracks whether it was
//! modified since loading, and `save` skips the write entirely when it
//! was not, so read-only paths never touch the file.

use std::path::Path;

use tracing::debug;

use crate::errors::Result;

use super::file::{self, invalid_format, split_record, SEPARATOR};

/// Failed attempts recorded for one user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttemptRecord {
    pub username: String,
    pub attempts: u8,
}

/// In-memory attempt table with a dirty flag gating writes.
#[derive(Debug, Clone, Default)]
pub struct AttemptStore {
    records: Vec<AttemptRecord>,
    dirty: bool,
}

impl AttemptStore {
    /// Create an empty, clean store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store populated from `path`.
    pub fn open(path: &Path) -> Result<Self> {
        let mut store = Self::new();
        store.load(path)?;
        Ok(store)
    }

    /// Replace the table with the contents of `path` and clear the dirty flag.
    ///
    /// A missing file yields an empty store. A malformed line aborts the
    /// load and leaves the current table untouched.
    pub fn load(&mut self, path: &Path) -> Result<()> {
        let Some(lines) = file::read_lines(path)? else {
            debug!(path = %path.display(), "attempt file not found, starting empty");
            self.records.clear();
            self.dirty = false;
            return Ok(());
        };

        let mut loaded: Vec<AttemptRecord> = Vec::with_capacity(lines.len());
        for (idx, line) in lines.iter().enumerate() {
            let line_no = idx + 1;
            let (username, count) = split_record(path, line_no, line)?;

            if count.is_empty() || !count.bytes().all(|b| b.is_ascii_digit()) {
                return Err(invalid_format(path, line_no, "attempt count is not a number"));
            }
            let attempts: u8 = count
                .parse()
                .map_err(|_| invalid_format(path, line_no, "attempt count exceeds 255"))?;

            match loaded.iter_mut().find(|r| r.username == username) {
                Some(existing) => existing.attempts = attempts,
                None => loaded.push(AttemptRecord {
                    username: username.to_string(),
                    attempts,
                }),
            }
        }

        debug!(path = %path.display(), count = loaded.len(), "loaded attempt records");
        self.records = loaded;
        self.dirty = false;
        Ok(())
    }

    /// Write the table to `path` if it changed since loading.
    ///
    /// When nothing changed this returns immediately without touching
    /// the file (not even its modification time).
    pub fn save(&mut self, path: &Path) -> Result<()> {
        if !self.dirty {
            return Ok(());
        }

        let mut buf = String::with_capacity(self.records.len() * 24);
        for r in &self.records {
            buf.push_str(&r.username);
            buf.push(SEPARATOR);
            buf.push_str(&r.attempts.to_string());
            buf.push('\n');
        }

        file::write_atomic(path, buf.as_bytes())?;
        self.dirty = false;
        debug!(path = %path.display(), count = self.records.len(), "saved attempt records");
        Ok(())
    }

    /// Failed attempts for `username`, zero when unknown.
    pub fn get(&self, username: &str) -> u8 {
        self.records
            .iter()
            .find(|r| r.username == username)
            .map_or(0, |r| r.attempts)
    }

    /// Record the attempt count for `username` and mark the store dirty.
    pub fn set(&mut self, username: &str, attempts: u8) {
        self.dirty = true;

        match self.records.iter_mut().find(|r| r.username == username) {
            Some(existing) => existing.attempts = attempts,
            None => self.records.push(AttemptRecord {
                username: username.to_string(),
                attempts,
            }),
        }
    }

    /// Returns `true` if there are unsaved changes.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Read-only view of all records in insertion order.
    pub fn records(&self) -> &[AttemptRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
