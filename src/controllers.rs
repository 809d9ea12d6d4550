//! HTTP surface. Each submodule exposes a `config` function that registers
//! its routes on an actix-web [`ServiceConfig`](actix_web::web::ServiceConfig).

pub mod health;
pub mod link_search;
pub mod notes;

use actix_web::web;
use std::sync::Arc;

use crate::config::{Config, defaults};
use crate::vault::{NoteCache, NoteStore, Vault};

/// Shared state handed to every handler.
///
/// Both stores sit on one [`NoteCache`], so a note written through either
/// collection's routes is never served stale by the other.
pub struct AppState {
    pub vault: Arc<Vault>,
    pub journal: NoteStore,
    pub memories: NoteStore,
    /// Directory (vault-relative) searched by link search.
    pub search_dir: String,
}

impl AppState {
    pub fn new(vault: Vault, config: &Config) -> Self {
        let cache = NoteCache::new(config.cache_ttl, config.cache_capacity);
        let journal = NoteStore::with_cache(&vault, config.journal_options(), cache.clone());
        let memories = NoteStore::with_cache(&vault, config.memory_options(), cache);
        Self {
            vault: Arc::new(vault),
            journal,
            memories,
            search_dir: defaults::VAULT_DIR.to_string(),
        }
    }

    pub fn store(&self, collection: Collection) -> &NoteStore {
        match collection {
            Collection::Journal => &self.journal,
            Collection::Memories => &self.memories,
        }
    }
}

/// Which note collection a route scope serves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Collection {
    Journal,
    Memories,
}

/// Registers every route.
pub fn configure(cfg: &mut web::ServiceConfig) {
    health::config_routes(cfg);
    notes::config(cfg);
    link_search::config(cfg);
}
