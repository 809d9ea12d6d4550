//! Title search across every note in the vault, used for wiki-style links.
//!
//! The editor asks for pages whose title contains what the user has typed
//! after `[[`. Results are ranked so the most likely target comes first, and
//! when nothing matches exactly a "create this page" suggestion is appended.
//!
//! # Ranking
//!
//! Matching is a case-insensitive substring match on the note title (the file
//! stem). Matches are ordered:
//!
//! 1. Exact title matches
//! 2. Titles starting with the query
//! 3. Everything else
//!
//! and alphabetically by title within each group.
//!
//! # Usage
//!
//! ```rust,no_run
//! use quire::search::{LinkSearch, SearchOptions};
//! use quire::vault::Vault;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let vault = Vault::open("/path/to/vault-root")?;
//! let search = LinkSearch::new(&vault, "vault")?;
//!
//! // Default options: up to 10 results plus a suggestion
//! let results = search.search("garden")?;
//!
//! let options = SearchOptions {
//!     limit: 5,
//!     ..Default::default()
//! };
//! let results = search.search_with_options("garden", &options)?;
//! # Ok(())
//! # }
//! ```

use crate::domain::{NOTE_EXTENSIONS, NoteError, strip_extension};
use crate::vault::Vault;
use crate::vault::resolver;
use serde::Serialize;
use std::cmp::Ordering;
use std::path::{Component, Path, PathBuf};
use walkdir::WalkDir;

/// Link search over one directory of the vault.
pub struct LinkSearch {
    /// Absolute directory that is walked.
    dir: PathBuf,

    /// The same directory as given, relative to the vault root. Used to build
    /// each match's `path`.
    base: String,
}

/// A single link target.
///
/// Serialized as-is by the HTTP layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LinkMatch {
    /// Path of the note relative to the searched directory, without
    /// extension, using `/` separators.
    pub id: String,

    /// The note's file stem.
    pub title: String,

    /// Link path, `/{base}/{id}`.
    pub path: String,

    /// `false` only for the "create new page" suggestion.
    pub exists: bool,
}

/// Configuration options for link search.
#[derive(Debug, Clone)]
pub struct SearchOptions {
    /// Maximum number of results to return, suggestion included.
    ///
    /// Defaults to `10`.
    pub limit: usize,

    /// Whether to append a non-existing page suggestion when no title
    /// matches the query exactly.
    ///
    /// Defaults to `true`.
    pub suggest_new: bool,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            limit: 10,
            suggest_new: true,
        }
    }
}

impl LinkSearch {
    /// Creates a search over `directory`, relative to the vault root.
    ///
    /// # Errors
    /// Returns [`NoteError::InvalidKey`] if `directory` escapes the vault,
    /// directly or through a symlink.
    pub fn new(vault: &Vault, directory: &str) -> Result<Self, NoteError> {
        let dir = resolver::resolve_dir(vault.root(), directory)?;
        resolver::verify_contained(vault.root(), &dir, directory)?;
        Ok(Self {
            dir,
            base: directory.trim_matches('/').to_string(),
        })
    }

    /// Searches with default options. See [`LinkSearch::search_with_options`].
    pub fn search(&self, query: &str) -> Result<Vec<LinkMatch>, NoteError> {
        self.search_with_options(query, &SearchOptions::default())
    }

    /// Searches note titles for `query`.
    ///
    /// An empty (or blank) query returns no results. A missing directory is
    /// treated as empty. Unreadable entries are skipped.
    ///
    /// This walks the directory synchronously; call it from a blocking
    /// context when running inside an async executor.
    pub fn search_with_options(
        &self,
        query: &str,
        options: &SearchOptions,
    ) -> Result<Vec<LinkMatch>, NoteError> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return Ok(Vec::new());
        }

        let mut matches: Vec<LinkMatch> = self
            .all_pages()
            .into_iter()
            .filter(|page| page.title.to_lowercase().contains(&needle))
            .collect();

        matches.sort_by(|a, b| compare_relevance(a, b, &needle));

        let has_exact = matches.iter().any(|m| m.title.to_lowercase() == needle);
        if options.suggest_new && !has_exact {
            matches.push(LinkMatch {
                id: needle.clone(),
                title: needle.clone(),
                path: self.link_path(&needle),
                exists: false,
            });
        }

        matches.truncate(options.limit);
        Ok(matches)
    }

    /// Every visible note file under the directory, as an existing link target.
    fn all_pages(&self) -> Vec<LinkMatch> {
        let mut pages = Vec::new();

        for entry in WalkDir::new(&self.dir)
            .follow_links(false)
            .into_iter()
            .filter_entry(|e| e.depth() == 0 || !is_hidden(e))
        {
            let entry = match entry {
                Ok(e) => e,
                Err(e) => {
                    log::debug!("Skipping unreadable entry during link search: {}", e);
                    continue;
                }
            };

            if !entry.file_type().is_file() {
                continue;
            }

            let Ok(relative) = entry.path().strip_prefix(&self.dir) else {
                continue;
            };
            let Some(id) = page_id(relative) else {
                continue;
            };

            let title = id.rsplit('/').next().unwrap_or(&id).to_string();
            pages.push(LinkMatch {
                path: self.link_path(&id),
                id,
                title,
                exists: true,
            });
        }

        pages
    }

    fn link_path(&self, id: &str) -> String {
        if self.base.is_empty() {
            format!("/{id}")
        } else {
            format!("/{}/{id}", self.base)
        }
    }
}

fn is_hidden(entry: &walkdir::DirEntry) -> bool {
    entry
        .file_name()
        .to_str()
        .map(|s| s.starts_with('.'))
        .unwrap_or(false)
}

/// Builds the `/`-joined id for a note file, extension stripped. Returns
/// `None` for files that are not notes or have non-UTF-8 names.
fn page_id(relative: &Path) -> Option<String> {
    let mut parts = Vec::new();
    for component in relative.components() {
        match component {
            Component::Normal(part) => parts.push(part.to_str()?),
            _ => return None,
        }
    }

    let file_name = parts.pop()?;
    let stem = NOTE_EXTENSIONS
        .iter()
        .find_map(|ext| strip_extension(file_name, ext))?;
    parts.push(stem);
    Some(parts.join("/"))
}

/// Exact matches, then prefix matches, then the rest; alphabetical by title
/// within each group.
fn compare_relevance(a: &LinkMatch, b: &LinkMatch, needle: &str) -> Ordering {
    let group = |m: &LinkMatch| {
        let title = m.title.to_lowercase();
        if title == needle {
            0
        } else if title.starts_with(needle) {
            1
        } else {
            2
        }
    };

    group(a)
        .cmp(&group(b))
        .then_with(|| a.title.to_lowercase().cmp(&b.title.to_lowercase()))
        .then_with(|| a.id.cmp(&b.id))
}
