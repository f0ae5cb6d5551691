//! Line-oriented record files shared by both stores.
//!
//! Each store file is a sequence of `<username>:<value>\n` lines. This
//! module handles the parts common to both: opening with
//! missing-file-means-empty semantics, mapping I/O failures onto the
//! error taxonomy, splitting records, and atomic rewrites.

use std::fs::{self, File};
use std::io::{BufRead, BufReader, ErrorKind, Write};
use std::path::{Path, PathBuf};

use crate::errors::{PinAuthError, Result};

/// Separator between the username and the value on each line.
pub const SEPARATOR: char = ':';

/// Read every line of `path`.
///
/// Returns `Ok(None)` when the file does not exist, which callers treat
/// as an empty store.
pub fn read_lines(path: &Path) -> Result<Option<Vec<String>>> {
    let file = match File::open(path) {
        Ok(f) => f,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
        Err(e) if e.kind() == ErrorKind::PermissionDenied => {
            return Err(PinAuthError::Access(path.to_path_buf()));
        }
        Err(e) => {
            return Err(PinAuthError::Open {
                path: path.to_path_buf(),
                source: e,
            })
        }
    };

    let mut lines = Vec::new();
    for line in BufReader::new(file).lines() {
        let mut line = line.map_err(|e| PinAuthError::Read {
            path: path.to_path_buf(),
            source: e,
        })?;
        if line.ends_with('\r') {
            line.pop();
        }
        lines.push(line);
    }

    Ok(Some(lines))
}

/// Split a record line at the first separator.
pub fn split_record<'a>(path: &Path, line_no: usize, line: &'a str) -> Result<(&'a str, &'a str)> {
    let (username, value) = line
        .split_once(SEPARATOR)
        .ok_or_else(|| invalid_format(path, line_no, "missing ':' separator"))?;

    if let Err(reason) = check_username(username) {
        return Err(invalid_format(path, line_no, &reason));
    }

    Ok((username, value))
}

/// Build an `InvalidFormat` error for a 1-based line number.
pub fn invalid_format(path: &Path, line_no: usize, reason: &str) -> PinAuthError {
    PinAuthError::InvalidFormat {
        path: path.to_path_buf(),
        line: line_no,
        reason: reason.to_string(),
    }
}

/// Validate a username for storage.
///
/// Must be non-empty and contain no `:` or line breaks (they would
/// corrupt the line format). There is no length limit.
pub fn validate_username(name: &str) -> Result<()> {
    check_username(name).map_err(|reason| PinAuthError::InvalidUsername {
        name: name.to_string(),
        reason,
    })
}

fn check_username(name: &str) -> std::result::Result<(), String> {
    if name.is_empty() {
        return Err("username cannot be empty".into());
    }
    if name.contains([SEPARATOR, '\n', '\r']) {
        return Err("username cannot contain ':' or line breaks".into());
    }
    Ok(())
}

/// Replace `path` with `contents` **atomically**.
///
/// Writes a temp file in the same directory, flushes it to disk, then
/// renames it over the target so readers never see a half-written file.
/// The file is restricted to owner read/write on Unix.
pub fn write_atomic(path: &Path, contents: &[u8]) -> Result<()> {
    let tmp_path = temp_path(path);

    let result = write_temp(path, &tmp_path, contents).and_then(|()| {
        fs::rename(&tmp_path, path).map_err(|e| write_error(path, e))
    });

    if result.is_err() {
        let _ = fs::remove_file(&tmp_path);
    }
    result
}

fn write_temp(path: &Path, tmp_path: &Path, contents: &[u8]) -> Result<()> {
    let mut file = File::create(tmp_path).map_err(|e| write_error(path, e))?;

    file.write_all(contents).map_err(|e| write_error(path, e))?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let perms = fs::Permissions::from_mode(0o600);
        fs::set_permissions(tmp_path, perms).map_err(|e| write_error(path, e))?;
    }

    file.sync_all().map_err(|e| PinAuthError::Close {
        path: path.to_path_buf(),
        source: e,
    })
}

fn write_error(path: &Path, e: std::io::Error) -> PinAuthError {
    if e.kind() == ErrorKind::PermissionDenied {
        PinAuthError::Access(path.to_path_buf())
    } else {
        PinAuthError::Write {
            path: path.to_path_buf(),
            source: e,
        }
    }
}

fn temp_path(path: &Path) -> PathBuf {
    let parent = path.parent().unwrap_or(Path::new("."));
    parent.join(format!(
        ".{}.tmp",
        path.file_name().unwrap_or_default().to_string_lossy()
    ))
}
