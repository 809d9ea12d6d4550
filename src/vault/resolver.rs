use crate::domain::{NoteError, has_note_extension, normalize_extension};
use std::ffi::OsString;
use std::fs;
use std::io::{self, ErrorKind};
use std::path::{Component, Path, PathBuf};

/// Resolves a note key to an absolute path under `root`.
///
/// Keys that already end in a recognized note extension are used as-is,
/// otherwise `default_extension` is appended. The key is normalized
/// lexically, so this never touches the filesystem.
///
/// Keys are taken as given: surrounding whitespace is not trimmed, and a key
/// that has any is rejected.
///
/// # Errors
/// Returns [`NoteError::InvalidKey`] if the key is blank, padded with
/// whitespace, absolute, contains a NUL byte, or climbs out of `root`
/// through `..` segments.
pub fn resolve(root: &Path, key: &str, default_extension: &str) -> Result<PathBuf, NoteError> {
    let relative = normalize(key)?;
    if relative.as_os_str().is_empty() {
        return Err(NoteError::InvalidKey(key.to_string()));
    }

    let file_name = relative
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or_default();

    if has_note_extension(file_name) {
        return Ok(root.join(relative));
    }

    let extension = normalize_extension(default_extension);
    let mut with_extension: OsString = relative.into_os_string();
    if !extension.is_empty() {
        with_extension.push(".");
        with_extension.push(extension);
    }

    Ok(root.join(with_extension))
}

/// Resolves a directory key to an absolute path under `root`.
///
/// Same containment rules as [`resolve`], without extension handling. An
/// empty key resolves to `root` itself.
pub fn resolve_dir(root: &Path, directory: &str) -> Result<PathBuf, NoteError> {
    if directory.is_empty() {
        return Ok(root.to_path_buf());
    }
    Ok(root.join(normalize(directory)?))
}

/// Checks that `path` stays under `root` once symlinks are followed.
///
/// The deepest ancestor of `path` that exists (the path itself if it does)
/// is canonicalized and must start with `root`, which is expected to be
/// canonical already. Blocking; the note store has an async twin.
///
/// # Errors
/// - [`NoteError::InvalidKey`] if the real location is outside `root`
/// - [`NoteError::Read`] if an ancestor cannot be inspected
pub fn verify_contained(root: &Path, path: &Path, key: &str) -> Result<(), NoteError> {
    for ancestor in path.ancestors() {
        match fs::canonicalize(ancestor) {
            Ok(real) => return check_canonical(root, &real, key),
            Err(e) if is_missing(&e) => continue,
            Err(e) => return Err(NoteError::read(ancestor, e)),
        }
    }
    Err(NoteError::InvalidKey(key.to_string()))
}

/// `real` is the canonical form of an existing ancestor of a resolved key.
pub(crate) fn check_canonical(root: &Path, real: &Path, key: &str) -> Result<(), NoteError> {
    if real.starts_with(root) {
        Ok(())
    } else {
        log::warn!("Rejected key {:?}: resolves to {}", key, real.display());
        Err(NoteError::InvalidKey(key.to_string()))
    }
}

/// Errors meaning "this ancestor does not exist (as a directory) yet".
pub(crate) fn is_missing(err: &io::Error) -> bool {
    matches!(err.kind(), ErrorKind::NotFound | ErrorKind::NotADirectory)
}

/// Lexically normalizes `key` into a relative path with no `.` or `..`
/// components.
fn normalize(key: &str) -> Result<PathBuf, NoteError> {
    let invalid = || NoteError::InvalidKey(key.to_string());

    if key.trim().is_empty() || key.trim() != key || key.contains('\0') {
        return Err(invalid());
    }

    let mut normalized = PathBuf::new();
    let mut depth = 0usize;

    for component in Path::new(key).components() {
        match component {
            Component::Normal(part) => {
                normalized.push(part);
                depth += 1;
            }
            Component::CurDir => {}
            Component::ParentDir => {
                if depth == 0 {
                    return Err(invalid());
                }
                normalized.pop();
                depth -= 1;
            }
            Component::RootDir | Component::Prefix(_) => return Err(invalid()),
        }
    }

    Ok(normalized)
}
