//! The credential store: usernames mapped to PIN digests.
//!
//! On disk each credential is one line, `<username>:<64 hex chars>\n`.
//! In memory the table keeps insertion order, and every lookup hands
//! out an owned copy so no caller can alias the stored digest.

use std::path::Path;

use tracing::debug;

use crate::crypto::PinDigest;
use crate::errors::{PinAuthError, Result};

use super::file::{self, invalid_format, split_record, SEPARATOR};

/// A username and the digest of their PIN.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credential {
    pub username: String,
    pub digest: PinDigest,
}

impl Credential {
    /// Compare a candidate digest against the stored one in constant time.
    pub fn verify(&self, candidate: &PinDigest) -> bool {
        self.digest == *candidate
    }
}

/// In-memory credential table, loaded from and dumped to a file.
#[derive(Debug, Clone, Default)]
pub struct CredentialStore {
    credentials: Vec<Credential>,
}

impl CredentialStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store populated from `path`.
    pub fn open(path: &Path) -> Result<Self> {
        let mut store = Self::new();
        store.load(path)?;
        Ok(store)
    }

    // ------------------------------------------------------------------
    // Persistence
    // ------------------------------------------------------------------

    /// Replace the table with the contents of `path`.
    ///
    /// A missing file yields an empty store. Any malformed line aborts
    /// the load and leaves the current table untouched. Repeated
    /// usernames are kept as-is; lookups see the first one.
    pub fn load(&mut self, path: &Path) -> Result<()> {
        let Some(lines) = file::read_lines(path)? else {
            debug!(path = %path.display(), "credential file not found, starting empty");
            self.credentials.clear();
            return Ok(());
        };

        let mut loaded: Vec<Credential> = Vec::with_capacity(lines.len());
        for (idx, line) in lines.iter().enumerate() {
            let line_no = idx + 1;
            let (username, hex) = split_record(path, line_no, line)?;

            let digest = PinDigest::from_hex(hex)
                .ok_or_else(|| invalid_format(path, line_no, "malformed PIN digest"))?;

            loaded.push(Credential {
                username: username.to_string(),
                digest,
            });
        }

        debug!(path = %path.display(), count = loaded.len(), "loaded credentials");
        self.credentials = loaded;
        Ok(())
    }

    /// Write the whole table to `path`, replacing whatever was there.
    pub fn dump(&self, path: &Path) -> Result<()> {
        let mut buf = String::with_capacity(self.credentials.len() * 80);
        for c in &self.credentials {
            buf.push_str(&c.username);
            buf.push(SEPARATOR);
            buf.push_str(&c.digest.to_hex());
            buf.push('\n');
        }

        file::write_atomic(path, buf.as_bytes())?;
        debug!(path = %path.display(), count = self.credentials.len(), "dumped credentials");
        Ok(())
    }

    // ------------------------------------------------------------------
    // Credential operations
    // ------------------------------------------------------------------

    /// Look up a user by exact name. The first matching line wins.
    pub fn find(&self, username: &str) -> Option<Credential> {
        self.credentials
            .iter()
            .find(|c| c.username == username)
            .cloned()
    }

    /// Returns `true` if the store has a credential for `username`.
    pub fn contains(&self, username: &str) -> bool {
        self.credentials.iter().any(|c| c.username == username)
    }

    /// Overwrite the digest of an existing user, or append a new one.
    pub fn update(&mut self, username: &str, digest: PinDigest) -> Result<()> {
        file::validate_username(username)?;

        match self.credentials.iter_mut().find(|c| c.username == username) {
            Some(existing) => existing.digest = digest,
            None => self.credentials.push(Credential {
                username: username.to_string(),
                digest,
            }),
        }
        Ok(())
    }

    /// Remove a user, keeping the order of the rest.
    pub fn remove(&mut self, username: &str) -> Result<()> {
        let pos = self
            .credentials
            .iter()
            .position(|c| c.username == username)
            .ok_or_else(|| PinAuthError::UserNotFound(username.to_string()))?;

        self.credentials.remove(pos);
        Ok(())
    }

    /// Iterate over a snapshot of the table taken now.
    ///
    /// Each call returns a fresh iterator of owned values, so mutating
    /// the store afterwards does not affect an iteration in progress.
    pub fn iter(&self) -> std::vec::IntoIter<Credential> {
        self.credentials.clone().into_iter()
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    /// Returns the number of credentials.
    pub fn len(&self) -> usize {
        self.credentials.len()
    }

    /// Returns `true` if the store holds no credentials.
    pub fn is_empty(&self) -> bool {
        self.credentials.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn digest(byte: u8) -> PinDigest {
        PinDigest::from_bytes([byte; 32])
    }

    #[test]
    fn update_then_find() {
        let mut store = CredentialStore::new();
        store.update("John", digest(1)).unwrap();
        store.update("Jane", digest(2)).unwrap();

        assert_eq!(store.find("John").unwrap().digest, digest(1));
        assert_eq!(store.find("Jane").unwrap().digest, digest(2));
        assert!(store.find("Alice").is_none());
    }

    #[test]
    fn update_overwrites_in_place() {
        let mut store = CredentialStore::new();
        store.update("John", digest(1)).unwrap();
        store.update("Jane", digest(2)).unwrap();
        store.update("John", digest(3)).unwrap();

        assert_eq!(store.len(), 2);
        let names: Vec<String> = store.iter().map(|c| c.username).collect();
        assert_eq!(names, vec!["John", "Jane"]);
        assert_eq!(store.find("John").unwrap().digest, digest(3));
    }

    #[test]
    fn update_rejects_invalid_username() {
        let mut store = CredentialStore::new();
        assert!(matches!(
            store.update("bad:name", digest(1)),
            Err(PinAuthError::InvalidUsername { .. })
        ));
        assert!(store.is_empty());
    }

    #[test]
    fn remove_preserves_order() {
        let mut store = CredentialStore::new();
        for (i, name) in ["a", "b", "c", "d"].iter().enumerate() {
            store.update(name, digest(i as u8)).unwrap();
        }

        store.remove("b").unwrap();

        let names: Vec<String> = store.iter().map(|c| c.username).collect();
        assert_eq!(names, vec!["a", "c", "d"]);
    }

    #[test]
    fn remove_missing_user_is_not_found() {
        let mut store = CredentialStore::new();
        store.update("John", digest(1)).unwrap();

        let err = store.remove("Alice").unwrap_err();
        assert!(matches!(err, PinAuthError::UserNotFound(ref u) if u == "Alice"));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn find_returns_a_copy() {
        let mut store = CredentialStore::new();
        store.update("John", digest(1)).unwrap();

        let mut copy = store.find("John").unwrap();
        copy.digest = digest(9);

        assert_eq!(store.find("John").unwrap().digest, digest(1));
    }

    #[test]
    fn iterator_is_a_snapshot() {
        let mut store = CredentialStore::new();
        store.update("John", digest(1)).unwrap();
        store.update("Jane", digest(2)).unwrap();

        let iter = store.iter();
        store.remove("John").unwrap();

        assert_eq!(iter.count(), 2);
        assert_eq!(store.iter().count(), 1);
    }

    #[test]
    fn load_missing_file_gives_empty_store() {
        let dir = TempDir::new().unwrap();
        let mut store = CredentialStore::new();
        store.update("stale", digest(1)).unwrap();

        store.load(&dir.path().join("users")).unwrap();
        assert!(store.is_empty());
    }

    #[test]
    fn load_rejects_missing_separator() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("users");
        fs::write(&path, format!("john{}\n", "a".repeat(64))).unwrap();

        let err = CredentialStore::open(&path).unwrap_err();
        assert!(matches!(err, PinAuthError::InvalidFormat { line: 1, .. }));
    }

    #[test]
    fn load_rejects_short_digest_and_keeps_previous_state() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("users");
        let good = "a".repeat(64);
        fs::write(&path, format!("john:{good}\njane:abc\n")).unwrap();

        let mut store = CredentialStore::new();
        store.update("kept", digest(7)).unwrap();

        let err = store.load(&path).unwrap_err();
        assert!(matches!(err, PinAuthError::InvalidFormat { line: 2, .. }));
        assert_eq!(store.len(), 1);
        assert!(store.contains("kept"));
    }

    #[test]
    fn load_keeps_duplicate_users_and_finds_first() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("users");
        let first = "b".repeat(64);
        let second = "c".repeat(64);
        let third = "d".repeat(64);
        fs::write(
            &path,
            format!("john:{first}\njohn:{second}\njane:{third}\n"),
        )
        .unwrap();

        let store = CredentialStore::open(&path).unwrap();
        assert_eq!(store.len(), 3);
        assert_eq!(store.find("john").unwrap().digest, digest(0xBB));
        assert_eq!(store.find("jane").unwrap().digest, digest(0xDD));

        // Every line survives a rewrite.
        store.dump(&path).unwrap();
        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            format!("john:{first}\njohn:{second}\njane:{third}\n")
        );
    }

    #[test]
    fn load_accepts_long_username() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("users");
        let long = "u".repeat(300);
        let hex = "a".repeat(64);
        fs::write(&path, format!("john:{hex}\n{long}:{hex}\n")).unwrap();

        let store = CredentialStore::open(&path).unwrap();
        assert!(store.contains("john"));
        assert!(store.contains(&long));
    }

    #[test]
    fn dump_writes_line_format() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("users");

        let mut store = CredentialStore::new();
        store.update("john", digest(0xAB)).unwrap();
        store.dump(&path).unwrap();

        let contents = fs::read_to_string(&path).unwrap();
        assert_eq!(contents, format!("john:{}\n", "ab".repeat(32)));
    }

    #[test]
    fn dump_empty_store_truncates_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("users");
        fs::write(&path, "john:whatever\n").unwrap();

        CredentialStore::new().dump(&path).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "");
    }
}
