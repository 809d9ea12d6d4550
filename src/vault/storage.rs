use crate::config::ConfigError;
use crate::domain::NoteError;
use crate::vault::resolver;
use std::fs;
use std::path::{Path, PathBuf};

/// Name of the default vault directory under the user's documents folder.
const DEFAULT_VAULT_NAME: &str = "quire";

/// The root directory every note key resolves under.
///
/// Established once at startup and never changed; stores and handlers hold
/// it behind an `Arc` or borrow its root.
#[derive(Debug, Clone)]
pub struct Vault {
    root: PathBuf,
}

impl Vault {
    /// Opens an existing vault root.
    ///
    /// The path is canonicalized so later containment checks compare
    /// like with like.
    ///
    /// # Errors
    /// - [`ConfigError::RootNotFound`] if the directory does not exist
    /// - [`ConfigError::NotADirectory`] if the path exists but is a file
    /// - [`ConfigError::Inaccessible`] if it cannot be canonicalized
    pub fn open(root: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let root = root.as_ref();

        if !root.exists() {
            return Err(ConfigError::RootNotFound(root.to_path_buf()));
        }

        if !root.is_dir() {
            return Err(ConfigError::NotADirectory(root.to_path_buf()));
        }

        let root = root
            .canonicalize()
            .map_err(|source| ConfigError::Inaccessible {
                path: root.to_path_buf(),
                source,
            })?;

        Ok(Self { root })
    }

    /// Ensures the vault root exists, creating it if missing, then opens it.
    ///
    /// Useful at startup where creation vs. opening does not matter.
    pub fn ensure_exists(root: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let root = root.as_ref();
        if !root.exists() {
            fs::create_dir_all(root).map_err(|source| ConfigError::Inaccessible {
                path: root.to_path_buf(),
                source,
            })?;
            log::info!("Created vault root at {}", root.display());
        }

        Vault::open(root)
    }

    /// The default vault location, `~/Documents/quire`.
    ///
    /// Falls back to the home directory when no documents directory is
    /// known for the platform.
    ///
    /// # Errors
    /// [`ConfigError::RootUnset`] if neither directory can be determined.
    pub fn default_root() -> Result<PathBuf, ConfigError> {
        let base = dirs::document_dir()
            .or_else(dirs::home_dir)
            .ok_or(ConfigError::RootUnset)?;
        Ok(base.join(DEFAULT_VAULT_NAME))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolves a note key inside this vault. See [`resolver::resolve`].
    pub fn resolve(&self, key: &str, default_extension: &str) -> Result<PathBuf, NoteError> {
        resolver::resolve(&self.root, key, default_extension)
    }
}
