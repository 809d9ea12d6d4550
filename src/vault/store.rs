use crate::domain::{NoteEntry, NoteError, normalize_extension, strip_extension};
use crate::vault::cache::{self, NoteCache};
use crate::vault::file_ops;
use crate::vault::resolver;
use crate::vault::storage::Vault;
use std::io::{self, ErrorKind};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio::fs;

/// Parameters for one note collection.
#[derive(Debug, Clone)]
pub struct StoreOptions {
    /// Collection directory relative to the vault root, used by [`NoteStore::list`]
    /// and [`NoteStore::key_for`].
    pub directory: String,

    /// Extension appended to keys that carry no recognized note extension.
    pub extension: String,

    /// How long a cached read stays valid.
    pub ttl: Duration,

    /// Maximum number of cached note bodies.
    pub capacity: u64,

    /// When `true`, loading a missing note creates it empty instead of
    /// failing with [`NoteError::NotFound`].
    pub touch_on_read: bool,
}

impl Default for StoreOptions {
    fn default() -> Self {
        Self {
            directory: String::new(),
            extension: "md".to_string(),
            ttl: cache::DEFAULT_TTL,
            capacity: cache::DEFAULT_CAPACITY,
            touch_on_read: true,
        }
    }
}

/// Cached read/write/delete/list access to markdown notes inside a [`Vault`].
///
/// Keys are relative to the vault root, so every store over a vault can
/// address every note in it. Stores over the same vault should share one
/// [`NoteCache`] (see [`NoteStore::with_cache`]) so a write through one is
/// seen by the others. Cloning a store shares its cache.
#[derive(Clone)]
pub struct NoteStore {
    root: PathBuf,
    options: StoreOptions,
    cache: NoteCache,
}

impl NoteStore {
    /// Creates a store with a cache of its own, sized from `options`.
    pub fn new(vault: &Vault, options: StoreOptions) -> Self {
        let cache = NoteCache::new(options.ttl, options.capacity);
        Self::with_cache(vault, options, cache)
    }

    /// Creates a store on an existing cache. `options.ttl` and
    /// `options.capacity` are ignored in favour of the cache's own.
    pub fn with_cache(vault: &Vault, options: StoreOptions, cache: NoteCache) -> Self {
        NoteStore {
            root: vault.root().to_path_buf(),
            options,
            cache,
        }
    }

    pub fn options(&self) -> &StoreOptions {
        &self.options
    }

    pub fn cache(&self) -> &NoteCache {
        &self.cache
    }

    /// Returns the vault-relative key for `name` inside this collection,
    /// e.g. `"2025-03-18"` → `"vault/journal/daily/2025-03-18"`.
    pub fn key_for(&self, name: &str) -> String {
        let directory = self.options.directory.trim_end_matches('/');
        if directory.is_empty() {
            name.to_string()
        } else {
            format!("{directory}/{name}")
        }
    }

    /// Loads a note's content.
    ///
    /// Served from the cache while the cached copy is younger than the TTL.
    /// A missing note is created empty and `""` is returned (touch-on-read)
    /// unless the store was built with `touch_on_read: false`.
    ///
    /// # Errors
    /// - [`NoteError::InvalidKey`] if the key is malformed or leads outside the
    ///   vault, symlinks included; nothing is created or changed
    /// - [`NoteError::NotFound`] for a missing note when touch-on-read is off
    /// - [`NoteError::Read`] / [`NoteError::Write`] for other I/O failures
    pub async fn load_note(&self, key: &str) -> Result<String, NoteError> {
        let path = self.resolve(key).await?;

        if let Some(content) = self.cache.get_note(&path) {
            log::trace!("cache hit for {}", path.display());
            return Ok(content);
        }

        let content = match fs::read_to_string(&path).await {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                if !self.options.touch_on_read {
                    return Err(NoteError::NotFound(key.to_string()));
                }
                self.touch(&path).await?
            }
            Err(e) => return Err(NoteError::read(&path, e)),
        };

        self.cache.set_note(path, content.clone());
        Ok(content)
    }

    /// Overwrites a note with `content`, creating it and its directories if
    /// needed, then drops the cached copy and every cached listing.
    ///
    /// # Errors
    /// - [`NoteError::InvalidKey`] if the key is malformed or leads outside the
    ///   vault, symlinks included; nothing is created or changed
    /// - [`NoteError::Write`] if the directory or file cannot be written
    pub async fn save_note(&self, key: &str, content: &str) -> Result<(), NoteError> {
        let path = self.resolve(key).await?;

        file_ops::ensure_parent(&path)
            .await
            .map_err(|e| NoteError::write(&path, e))?;
        file_ops::write_atomic(&path, content.to_string())
            .await
            .map_err(|e| NoteError::write(&path, e))?;

        self.cache.invalidate_note(&path);
        self.cache.invalidate_listing();

        log::debug!("saved {} ({} bytes)", path.display(), content.len());
        Ok(())
    }

    /// Deletes a note and drops the cached copy and every cached listing.
    ///
    /// # Errors
    /// - [`NoteError::InvalidKey`] if the key is malformed or leads outside the
    ///   vault, symlinks included; nothing is created or changed
    /// - [`NoteError::NotFound`] if the note does not exist; nothing is changed
    /// - [`NoteError::Write`] for other I/O failures
    pub async fn delete_note(&self, key: &str) -> Result<(), NoteError> {
        let path = self.resolve(key).await?;

        match fs::remove_file(&path).await {
            Ok(()) => {}
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(NoteError::NotFound(key.to_string()));
            }
            Err(e) => return Err(NoteError::write(&path, e)),
        }

        self.cache.invalidate_note(&path);
        self.cache.invalidate_listing();

        log::debug!("deleted {}", path.display());
        Ok(())
    }

    /// Lists the notes in `directory` (vault-relative) whose file name ends
    /// with `.{extension}`, sorted ascending by key.
    ///
    /// A missing directory is created and yields an empty listing. Other
    /// I/O failures are logged and also yield an empty listing, which is not
    /// cached.
    ///
    /// # Errors
    /// [`NoteError::InvalidKey`] if `directory` escapes the vault root, directly
    /// or through a symlink.
    pub async fn list_notes(
        &self,
        directory: &str,
        extension: &str,
    ) -> Result<Arc<Vec<NoteEntry>>, NoteError> {
        let dir = resolver::resolve_dir(&self.root, directory)?;
        self.verify_contained(&dir, directory).await?;
        let extension = normalize_extension(extension).to_string();
        let cache_key = (dir.clone(), extension.clone());

        if let Some(listing) = self.cache.get_listing(&cache_key) {
            log::trace!("cache hit for listing of {}", dir.display());
            return Ok(listing);
        }

        if let Err(e) = file_ops::ensure_dir(&dir).await {
            log::warn!("Could not create {}: {}", dir.display(), e);
            return Ok(Arc::new(Vec::new()));
        }

        match scan_dir(&dir, &extension).await {
            Ok(entries) => {
                let listing = Arc::new(entries);
                self.cache.set_listing(cache_key, Arc::clone(&listing));
                Ok(listing)
            }
            Err(e) => {
                log::warn!("Failed to list {}: {}", dir.display(), e);
                Ok(Arc::new(Vec::new()))
            }
        }
    }

    /// Lists this store's own collection directory.
    pub async fn list(&self) -> Result<Arc<Vec<NoteEntry>>, NoteError> {
        self.list_notes(&self.options.directory, &self.options.extension)
            .await
    }

    /// Lexical resolution first, so `..` is rejected before any I/O, then
    /// the symlink-aware containment check.
    async fn resolve(&self, key: &str) -> Result<PathBuf, NoteError> {
        let path = resolver::resolve(&self.root, key, &self.options.extension)?;
        self.verify_contained(&path, key).await?;
        Ok(path)
    }

    /// Async form of [`resolver::verify_contained`].
    async fn verify_contained(&self, path: &Path, key: &str) -> Result<(), NoteError> {
        for ancestor in path.ancestors() {
            match fs::canonicalize(ancestor).await {
                Ok(real) => return resolver::check_canonical(&self.root, &real, key),
                Err(e) if resolver::is_missing(&e) => continue,
                Err(e) => return Err(NoteError::read(ancestor, e)),
            }
        }
        Err(NoteError::InvalidKey(key.to_string()))
    }

    /// Creates an empty note at `path` and returns its content. If another
    /// writer got there first, returns what they wrote.
    async fn touch(&self, path: &Path) -> Result<String, NoteError> {
        file_ops::ensure_parent(path)
            .await
            .map_err(|e| NoteError::write(path, e))?;

        let created = file_ops::touch(path)
            .await
            .map_err(|e| NoteError::write(path, e))?;

        if created {
            log::debug!("created empty note {}", path.display());
            self.cache.invalidate_listing();
            Ok(String::new())
        } else {
            fs::read_to_string(path)
                .await
                .map_err(|e| NoteError::read(path, e))
        }
    }
}

/// Reads `dir` and returns its visible regular files ending in
/// `.{extension}`, extension stripped, sorted by key.
async fn scan_dir(dir: &Path, extension: &str) -> io::Result<Vec<NoteEntry>> {
    let mut entries = Vec::new();
    let mut read_dir = fs::read_dir(dir).await?;

    while let Some(entry) = read_dir.next_entry().await? {
        let name = match entry.file_name().to_str() {
            Some(n) => n.to_string(),
            None => continue,
        };

        // hidden files, including in-flight temp files from atomic writes
        if name.starts_with('.') {
            continue;
        }

        if !entry.file_type().await?.is_file() {
            continue;
        }

        if let Some(key) = strip_extension(&name, extension) {
            entries.push(NoteEntry::new(key));
        }
    }

    entries.sort();
    Ok(entries)
}
