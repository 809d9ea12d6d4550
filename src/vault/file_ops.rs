//! Filesystem helpers shared by the note store.
//!
//! Directory creation is lazy and idempotent; writes go through a temp file
//! in the target directory so a note is never left half-written.

use std::io::{self, ErrorKind, Write};
use std::path::Path;
use tempfile::NamedTempFile;
use tokio::fs;

/// Ensures the parent directory of `path` exists, creating any missing
/// ancestors.
///
/// Concurrent callers racing to create the same directory all succeed.
pub async fn ensure_parent(path: &Path) -> io::Result<()> {
    let parent = path.parent().ok_or_else(|| {
        io::Error::new(
            ErrorKind::InvalidInput,
            format!("path has no parent: {}", path.display()),
        )
    })?;
    ensure_dir(parent).await
}

/// Ensures `dir` itself exists. No-op if it already does.
pub async fn ensure_dir(dir: &Path) -> io::Result<()> {
    if let Ok(meta) = fs::metadata(dir).await {
        if meta.is_dir() {
            return Ok(());
        }
    }
    fs::create_dir_all(dir).await
}

/// Creates an empty file at `path` unless one already exists.
///
/// Returns `true` if this call created the file.
pub async fn touch(path: &Path) -> io::Result<bool> {
    match fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(path)
        .await
    {
        Ok(_) => Ok(true),
        Err(e) if e.kind() == ErrorKind::AlreadyExists => Ok(false),
        Err(e) => Err(e),
    }
}

/// Atomically replaces the contents of `path` with `data`.
///
/// Writes to a hidden temp file next to the target and renames it in place.
/// The blocking work runs on tokio's blocking pool.
pub async fn write_atomic(path: &Path, data: String) -> io::Result<()> {
    let path = path.to_path_buf();
    tokio::task::spawn_blocking(move || write_atomic_blocking(&path, data.as_bytes()))
        .await
        .map_err(io::Error::other)?
}

fn write_atomic_blocking(path: &Path, data: &[u8]) -> io::Result<()> {
    let dir = path.parent().ok_or_else(|| {
        io::Error::new(
            ErrorKind::InvalidInput,
            format!("path has no parent: {}", path.display()),
        )
    })?;
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(data)?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}
