//! # quire
//!
//! The storage backend of a personal journaling app: markdown notes kept as
//! flat files in a local vault directory, served through a small REST API
//! with a short-lived read cache in front of the filesystem.
//!
//! ## Features
//!
//! - **Note Store**: Load, save, delete and list markdown notes by key, with lazy directory creation
//! - **Sandboxed Keys**: Every key is resolved inside the vault root; `..` traversal is rejected
//! - **Read Cache**: Per-store TTL cache with a size cap, invalidated precisely on writes and deletes
//! - **Link Search**: Ranked title search across the vault for wiki-style links
//! - **REST API**: actix-web handlers for the journal and memory collections
//! - **Robust Error Handling**: Typed errors per module with automatic conversions
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use quire::vault::{NoteStore, StoreOptions, Vault};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let vault = Vault::ensure_exists("/path/to/vault-root")?;
//! let journal = NoteStore::new(
//!     &vault,
//!     StoreOptions {
//!         directory: "vault/journal/daily".into(),
//!         extension: "md".into(),
//!         ..Default::default()
//!     },
//! );
//!
//! journal.save_note("vault/journal/daily/2025-03-18", "Hello").await?;
//! let content = journal.load_note("vault/journal/daily/2025-03-18").await?;
//! assert_eq!(content, "Hello");
//!
//! for entry in journal.list().await?.iter() {
//!     println!("{}", entry.key);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! - **[`domain`]**: Note errors, listing entries and extension rules
//! - **[`vault`]**: Vault root, key resolution, file operations, cache and the note store
//! - **[`search`]**: Link search over note titles
//! - **[`journal`]**: Date keys and ordering for the daily journal
//! - **[`config`]**: Environment-driven configuration
//! - **[`controllers`]**: HTTP routes
//! - **[`error`]**: Unified error handling throughout the library
//!
//! ## Touch-on-read
//!
//! Loading a note that does not exist creates it empty and returns `""`.
//! A mistyped key therefore leaves an empty file behind. Build the store
//! with `touch_on_read: false` to get [`domain::NoteError::NotFound`]
//! instead.
//!
//! ## Error Handling
//!
//! Store operations return [`domain::NoteError`]. Application code can use
//! [`QuireResult<T>`], which wraps the unified [`QuireError`] type and
//! converts from every sub-module error, allowing `?` throughout.
//!
//! ```rust,no_run
//! use quire::{QuireError, QuireResult};
//! use quire::vault::{NoteStore, StoreOptions, Vault};
//!
//! async fn read_scratch() -> QuireResult<String> {
//!     // ConfigError and NoteError both convert into QuireError
//!     let vault = Vault::open("/notes")?;
//!     let store = NoteStore::new(&vault, StoreOptions::default());
//!     Ok(store.load_note("scratch").await?)
//! }
//! ```

pub mod config;
pub mod controllers;
pub mod domain;
pub mod error;
pub mod journal;
pub mod search;
pub mod vault;

/// Re-exports the most commonly used types for convenience.
pub use error::{QuireError, QuireResult};
