//! Content-hash-gated atomic writer.
//!
//! ## `write_if_changed` protocol
//!
//! 1. Normalise line endings to LF.
//! 2. SHA-256 hash the candidate content.
//! 3. Read the existing file (missing → no content).
//! 4. Compare hashes → skip if identical.
//! 5. Write to `<path>.crew.tmp`.
//! 6. Rename to final path (atomic on POSIX).
//!
//! No hash store is kept: the file on disk is the only state, so the
//! comparison survives clock skew and repeated runs.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};

use crate::error::{io_err, SyncError};

// ---------------------------------------------------------------------------
// Write result
// ---------------------------------------------------------------------------

/// Outcome of an individual file write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriteResult {
    /// File was written (content changed or did not previously exist).
    Written { path: PathBuf },
    /// File was skipped: content matches what is on disk, or a create-once
    /// file already exists.
    Unchanged { path: PathBuf },
    /// `--dry-run` mode: the file *would* have been written.
    WouldWrite { path: PathBuf },
}

impl WriteResult {
    pub fn path(&self) -> &Path {
        match self {
            WriteResult::Written { path }
            | WriteResult::Unchanged { path }
            | WriteResult::WouldWrite { path } => path,
        }
    }

    /// `true` for `Written` and `WouldWrite`.
    pub fn is_change(&self) -> bool {
        !matches!(self, WriteResult::Unchanged { .. })
    }
}

// ---------------------------------------------------------------------------
// Hashing
// ---------------------------------------------------------------------------

/// Hex SHA-256 fingerprint of `content`.
pub fn content_hash(content: &[u8]) -> String {
    let mut h = Sha256::new();
    h.update(content);
    hex::encode(h.finalize())
}

pub(crate) fn normalize_line_endings(content: &str) -> String {
    content.replace("\r\n", "\n")
}

/// Existing bytes at `path` for change detection.
///
/// A missing file is `None`. Any other read failure is logged and also
/// treated as `None`, so the artifact still gets written.
pub(crate) fn read_existing(path: &Path) -> Option<Vec<u8>> {
    match std::fs::read(path) {
        Ok(bytes) => Some(bytes),
        Err(err) if err.kind() == ErrorKind::NotFound => None,
        Err(err) => {
            tracing::warn!(
                "cannot read {} for change detection ({err}); rewriting",
                path.display()
            );
            None
        }
    }
}

// ---------------------------------------------------------------------------
// Writes
// ---------------------------------------------------------------------------

/// Write `content` to `path` only when its fingerprint differs from the
/// file currently on disk.
pub fn write_if_changed(
    path: &Path,
    content: &str,
    dry_run: bool,
) -> Result<WriteResult, SyncError> {
    let tmp = PathBuf::from(format!("{}.crew.tmp", path.display()));
    write_if_changed_with_tmp(path, content, dry_run, &tmp)
}

fn write_if_changed_with_tmp(
    path: &Path,
    content: &str,
    dry_run: bool,
    tmp: &Path,
) -> Result<WriteResult, SyncError> {
    let normalized = normalize_line_endings(content);
    let digest = content_hash(normalized.as_bytes());

    if let Some(existing) = read_existing(path) {
        if content_hash(&existing) == digest {
            tracing::debug!("unchanged: {}", path.display());
            return Ok(WriteResult::Unchanged {
                path: path.to_path_buf(),
            });
        }
    }

    if dry_run {
        tracing::info!("[dry-run] would write: {}", path.display());
        return Ok(WriteResult::WouldWrite {
            path: path.to_path_buf(),
        });
    }

    atomic_write(path, &normalized, tmp)?;
    tracing::info!("wrote: {}", path.display());
    Ok(WriteResult::Written {
        path: path.to_path_buf(),
    })
}

/// Create `path` with `content` unless something already exists there.
///
/// Existing files are never touched, whatever their content.
pub fn write_if_missing(
    path: &Path,
    content: &str,
    dry_run: bool,
) -> Result<WriteResult, SyncError> {
    if path.try_exists().map_err(|e| io_err(path, e))? {
        tracing::debug!("exists, keeping: {}", path.display());
        return Ok(WriteResult::Unchanged {
            path: path.to_path_buf(),
        });
    }

    if dry_run {
        tracing::info!("[dry-run] would create: {}", path.display());
        return Ok(WriteResult::WouldWrite {
            path: path.to_path_buf(),
        });
    }

    let tmp = PathBuf::from(format!("{}.crew.tmp", path.display()));
    atomic_write(path, &normalize_line_endings(content), &tmp)?;
    tracing::info!("created: {}", path.display());
    Ok(WriteResult::Written {
        path: path.to_path_buf(),
    })
}

/// Create `dir` and its parents. No-op in dry-run mode.
pub fn ensure_dir(dir: &Path, dry_run: bool) -> Result<(), SyncError> {
    if dry_run {
        return Ok(());
    }
    std::fs::create_dir_all(dir).map_err(|e| io_err(dir, e))
}

fn atomic_write(path: &Path, content: &str, tmp: &Path) -> Result<(), SyncError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| io_err(parent, e))?;
    }
    if let Some(tmp_parent) = tmp.parent() {
        std::fs::create_dir_all(tmp_parent).map_err(|e| io_err(tmp_parent, e))?;
    }
    std::fs::write(tmp, content).map_err(|e| io_err(tmp, e))?;

    if let Err(e) = std::fs::rename(tmp, path) {
        let _ = std::fs::remove_file(tmp);
        return Err(io_err(path, e));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
