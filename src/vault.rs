//! The vault: a sandboxed root directory of markdown notes and the cached
//! store that reads and writes them.

pub mod cache;
pub mod file_ops;
pub mod resolver;
pub mod storage;
pub mod store;

pub use cache::NoteCache;
pub use storage::Vault;
pub use store::{NoteStore, StoreOptions};
