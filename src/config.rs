//! Process configuration, read once from the environment at startup.
//!
//! A `.env` file is honoured by the server binary (via `dotenv`) before
//! [`Config::from_env`] runs.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::vault::{StoreOptions, Vault};

/// Environment variable names
pub mod env_vars {
    /// Vault root directory. Defaults to `~/Documents/quire`.
    pub const VAULT_ROOT: &str = "QUIRE_VAULT_ROOT";
    pub const HOST: &str = "QUIRE_HOST";
    pub const PORT: &str = "QUIRE_PORT";
    pub const CACHE_TTL_MS: &str = "QUIRE_CACHE_TTL_MS";
    pub const CACHE_CAPACITY: &str = "QUIRE_CACHE_CAPACITY";
    /// Set to "false" or "0" to make reads of missing notes fail instead of
    /// creating an empty file.
    pub const TOUCH_ON_READ: &str = "QUIRE_TOUCH_ON_READ";
}

/// Default values
pub mod defaults {
    pub const HOST: &str = "127.0.0.1";
    pub const PORT: u16 = 3000;
    pub const CACHE_TTL_MS: u64 = 5000;
    pub const CACHE_CAPACITY: u64 = 1024;
    pub const TOUCH_ON_READ: bool = true;

    /// Directory searched by link search, relative to the vault root.
    pub const VAULT_DIR: &str = "vault";
    pub const JOURNAL_DIR: &str = "vault/journal/daily";
    pub const JOURNAL_EXTENSION: &str = "md";
    pub const MEMORY_DIR: &str = "vault/memories";
    pub const MEMORY_EXTENSION: &str = "mdx";
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("vault root is not set and no default location could be determined")]
    RootUnset,
    #[error("vault root does not exist: {0}")]
    RootNotFound(PathBuf),
    #[error("vault root is not a directory: {0}")]
    NotADirectory(PathBuf),
    #[error("vault root not accessible: {path}: {source}")]
    Inaccessible {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid value for {var}: {value:?}")]
    InvalidValue { var: &'static str, value: String },
}

#[derive(Debug, Clone)]
pub struct Config {
    pub vault_root: PathBuf,
    pub host: String,
    pub port: u16,
    pub cache_ttl: Duration,
    pub cache_capacity: u64,
    pub touch_on_read: bool,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| env::var(var).ok())
    }

    /// Builds a config from an arbitrary variable lookup. Unset or blank
    /// variables fall back to [`defaults`].
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |var: &str| lookup(var).filter(|v| !v.trim().is_empty());

        let vault_root = match get(env_vars::VAULT_ROOT) {
            Some(root) => PathBuf::from(root),
            None => Vault::default_root()?,
        };

        let port = match get(env_vars::PORT) {
            Some(v) => parse(env_vars::PORT, &v)?,
            None => defaults::PORT,
        };

        let cache_ttl_ms = match get(env_vars::CACHE_TTL_MS) {
            Some(v) => parse(env_vars::CACHE_TTL_MS, &v)?,
            None => defaults::CACHE_TTL_MS,
        };

        let cache_capacity = match get(env_vars::CACHE_CAPACITY) {
            Some(v) => parse(env_vars::CACHE_CAPACITY, &v)?,
            None => defaults::CACHE_CAPACITY,
        };

        let touch_on_read = match get(env_vars::TOUCH_ON_READ) {
            Some(v) => parse_flag(env_vars::TOUCH_ON_READ, &v)?,
            None => defaults::TOUCH_ON_READ,
        };

        Ok(Self {
            vault_root,
            host: get(env_vars::HOST).unwrap_or_else(|| defaults::HOST.to_string()),
            port,
            cache_ttl: Duration::from_millis(cache_ttl_ms),
            cache_capacity,
            touch_on_read,
        })
    }

    /// Store options for a collection, carrying this config's cache and
    /// touch-on-read settings.
    pub fn store_options(&self, directory: &str, extension: &str) -> StoreOptions {
        StoreOptions {
            directory: directory.to_string(),
            extension: extension.to_string(),
            ttl: self.cache_ttl,
            capacity: self.cache_capacity,
            touch_on_read: self.touch_on_read,
        }
    }

    pub fn journal_options(&self) -> StoreOptions {
        self.store_options(defaults::JOURNAL_DIR, defaults::JOURNAL_EXTENSION)
    }

    pub fn memory_options(&self) -> StoreOptions {
        self.store_options(defaults::MEMORY_DIR, defaults::MEMORY_EXTENSION)
    }
}

fn parse<T: std::str::FromStr>(var: &'static str, value: &str) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::InvalidValue {
        var,
        value: value.to_string(),
    })
}

fn parse_flag(var: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidValue {
            var,
            value: value.to_string(),
        }),
    }
}
