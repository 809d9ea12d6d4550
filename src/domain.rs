use serde::{Deserialize, Serialize};
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// File extensions recognized as notes. A key already carrying one of these
/// is resolved as-is; anything else gets the store's default appended.
pub const NOTE_EXTENSIONS: &[&str] = &["md", "mdx"];

#[derive(Debug, Error)]
pub enum NoteError {
    #[error("invalid note key: {0}")]
    InvalidKey(String),

    #[error("note not found: {0}")]
    NotFound(String),

    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl NoteError {
    pub(crate) fn read(path: &Path, source: io::Error) -> Self {
        NoteError::Read {
            path: path.to_path_buf(),
            source,
        }
    }

    pub(crate) fn write(path: &Path, source: io::Error) -> Self {
        NoteError::Write {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// One item of a directory listing: the file name with its extension stripped.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NoteEntry {
    pub key: String,
}

impl NoteEntry {
    pub fn new(key: impl Into<String>) -> Self {
        NoteEntry { key: key.into() }
    }
}

/// Returns `true` when `name` ends in one of [`NOTE_EXTENSIONS`].
pub fn has_note_extension(name: &str) -> bool {
    NOTE_EXTENSIONS.iter().any(|ext| {
        name.len() > ext.len() + 1
            && name.ends_with(ext)
            && name.as_bytes()[name.len() - ext.len() - 1] == b'.'
    })
}

/// Strips `.{extension}` from `name`, or returns `None` if it does not end
/// with that extension (or would be empty afterwards).
pub fn strip_extension<'a>(name: &'a str, extension: &str) -> Option<&'a str> {
    let stem = name.strip_suffix(extension)?.strip_suffix('.')?;
    if stem.is_empty() { None } else { Some(stem) }
}

/// Normalizes an extension given either as `"md"` or `".md"`.
pub fn normalize_extension(extension: &str) -> &str {
    extension.trim().trim_start_matches('.')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recognizes_note_extensions() {
        assert!(has_note_extension("2025-03-18.md"));
        assert!(has_note_extension("ideas/garden.mdx"));
        assert!(!has_note_extension("notes.txt"));
        assert!(!has_note_extension("readme"));
        assert!(!has_note_extension(".md"));
        assert!(!has_note_extension("commonmd"));
    }

    #[test]
    fn strips_only_the_requested_extension() {
        assert_eq!(strip_extension("2025-03-18.md", "md"), Some("2025-03-18"));
        assert_eq!(strip_extension("garden.mdx", "mdx"), Some("garden"));
        assert_eq!(strip_extension("garden.mdx", "md"), None);
        assert_eq!(strip_extension(".md", "md"), None);
    }

    #[test]
    fn extension_accepts_leading_dot() {
        assert_eq!(normalize_extension(".mdx"), "mdx");
        assert_eq!(normalize_extension("md"), "md");
    }
}
