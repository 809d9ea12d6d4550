use quire::domain::{NoteEntry, NoteError};
use quire::error::QuireError;
use quire::vault::{NoteCache, NoteStore, StoreOptions, Vault};
use std::fs;
use std::time::Duration;
use tempfile::TempDir;

const DAILY: &str = "vault/journal/daily";

fn journal_store(tmpdir: &TempDir) -> Result<NoteStore, QuireError> {
    let vault = Vault::open(tmpdir.path())?;
    Ok(NoteStore::new(
        &vault,
        StoreOptions {
            directory: DAILY.to_string(),
            extension: "md".to_string(),
            ..Default::default()
        },
    ))
}

fn keys(entries: &[NoteEntry]) -> Vec<&str> {
    entries.iter().map(|e| e.key.as_str()).collect()
}

#[tokio::test]
async fn save_then_load_round_trips() -> Result<(), QuireError> {
    let tmpdir = TempDir::new()?;
    let store = journal_store(&tmpdir)?;

    let content = "# Tuesday\n\n- walked the dog\n- ünïcödé ✓\n";
    store.save_note("vault/journal/daily/2025-03-18", content).await?;

    assert_eq!(store.load_note("vault/journal/daily/2025-03-18").await?, content);
    assert_eq!(
        fs::read_to_string(tmpdir.path().join("vault/journal/daily/2025-03-18.md"))?,
        content
    );

    Ok(())
}

#[tokio::test]
async fn key_with_extension_addresses_same_note() -> Result<(), QuireError> {
    let tmpdir = TempDir::new()?;
    let store = journal_store(&tmpdir)?;

    store.save_note("vault/journal/daily/2025-03-18.md", "with ext").await?;
    assert_eq!(store.load_note("vault/journal/daily/2025-03-18").await?, "with ext");

    store.save_note("vault/journal/daily/2025-03-18", "without ext").await?;
    assert_eq!(store.load_note("vault/journal/daily/2025-03-18.md").await?, "without ext");

    Ok(())
}

#[tokio::test]
async fn loading_missing_note_creates_empty_file() -> Result<(), QuireError> {
    let tmpdir = TempDir::new()?;
    let store = journal_store(&tmpdir)?;

    // prime the listing cache before the note exists
    assert!(store.list().await?.is_empty());

    let content = store.load_note("vault/journal/daily/2025-03-19").await?;
    assert_eq!(content, "");

    let path = tmpdir.path().join("vault/journal/daily/2025-03-19.md");
    assert!(path.is_file());
    assert_eq!(fs::read_to_string(&path)?, "");

    let listing = store.list().await?;
    assert_eq!(keys(&listing), ["2025-03-19"]);

    Ok(())
}

#[tokio::test]
async fn touch_on_read_can_be_disabled() -> Result<(), QuireError> {
    let tmpdir = TempDir::new()?;
    let vault = Vault::open(tmpdir.path())?;
    let store = NoteStore::new(
        &vault,
        StoreOptions {
            directory: DAILY.to_string(),
            touch_on_read: false,
            ..Default::default()
        },
    );

    let result = store.load_note("vault/journal/daily/typo").await;
    assert!(matches!(result, Err(NoteError::NotFound(_))));
    assert!(!tmpdir.path().join("vault/journal/daily/typo.md").exists());

    Ok(())
}

#[tokio::test]
async fn second_save_is_visible_within_ttl() -> Result<(), QuireError> {
    let tmpdir = TempDir::new()?;
    let store = journal_store(&tmpdir)?;
    let key = "vault/journal/daily/2025-03-18";

    store.save_note(key, "first").await?;
    assert_eq!(store.load_note(key).await?, "first");

    store.save_note(key, "second").await?;
    assert_eq!(store.load_note(key).await?, "second");

    Ok(())
}

#[tokio::test]
async fn reads_are_served_from_cache_within_ttl() -> Result<(), QuireError> {
    let tmpdir = TempDir::new()?;
    let store = journal_store(&tmpdir)?;
    let key = "vault/journal/daily/2025-03-18";

    store.save_note(key, "cached").await?;
    assert_eq!(store.load_note(key).await?, "cached");

    // edit behind the store's back; the cached copy is still fresh
    fs::write(tmpdir.path().join("vault/journal/daily/2025-03-18.md"), "edited")?;
    assert_eq!(store.load_note(key).await?, "cached");

    Ok(())
}

#[tokio::test]
async fn expired_entries_are_read_again() -> Result<(), QuireError> {
    let tmpdir = TempDir::new()?;
    let vault = Vault::open(tmpdir.path())?;
    let store = NoteStore::new(
        &vault,
        StoreOptions {
            directory: DAILY.to_string(),
            ttl: Duration::from_millis(50),
            ..Default::default()
        },
    );
    let key = "vault/journal/daily/2025-03-18";

    store.save_note(key, "before").await?;
    assert_eq!(store.load_note(key).await?, "before");

    fs::write(tmpdir.path().join("vault/journal/daily/2025-03-18.md"), "after")?;
    tokio::time::sleep(Duration::from_millis(150)).await;

    assert_eq!(store.load_note(key).await?, "after");

    Ok(())
}

#[tokio::test]
async fn save_invalidates_cached_listing() -> Result<(), QuireError> {
    let tmpdir = TempDir::new()?;
    let store = journal_store(&tmpdir)?;

    store.save_note("vault/journal/daily/2025-03-17", "a").await?;
    assert_eq!(keys(&store.list().await?), ["2025-03-17"]);

    store.save_note("vault/journal/daily/2025-03-18", "b").await?;
    assert_eq!(keys(&store.list().await?), ["2025-03-17", "2025-03-18"]);

    Ok(())
}

#[tokio::test]
async fn deleting_missing_note_changes_nothing() -> Result<(), QuireError> {
    let tmpdir = TempDir::new()?;
    let store = journal_store(&tmpdir)?;

    store.save_note("vault/journal/daily/2025-03-17", "keep").await?;
    let before = store.list().await?;

    let result = store.delete_note("vault/journal/daily/1999-01-01").await;
    assert!(matches!(result, Err(NoteError::NotFound(_))));

    assert!(!tmpdir.path().join("vault/journal/daily/1999-01-01.md").exists());
    assert_eq!(store.list().await?, before);
    assert_eq!(store.load_note("vault/journal/daily/2025-03-17").await?, "keep");

    Ok(())
}

#[tokio::test]
async fn traversal_is_rejected_without_touching_disk() -> Result<(), QuireError> {
    let tmpdir = TempDir::new()?;
    let root = tmpdir.path().join("root");
    fs::create_dir(&root)?;
    let vault = Vault::open(&root)?;
    let store = NoteStore::new(&vault, StoreOptions::default());

    let result = store.load_note("../../etc/passwd").await;
    assert!(matches!(result, Err(NoteError::InvalidKey(_))));

    let result = store.load_note("../escaped").await;
    assert!(matches!(result, Err(NoteError::InvalidKey(_))));
    assert!(!tmpdir.path().join("escaped.md").exists());

    let result = store.save_note("../escaped", "nope").await;
    assert!(matches!(result, Err(NoteError::InvalidKey(_))));
    assert!(!tmpdir.path().join("escaped.md").exists());

    let result = store.delete_note("/etc/hosts").await;
    assert!(matches!(result, Err(NoteError::InvalidKey(_))));

    let result = store.list_notes("../", "md").await;
    assert!(matches!(result, Err(NoteError::InvalidKey(_))));

    // nothing was created inside the root either
    assert_eq!(fs::read_dir(&root)?.count(), 0);

    Ok(())
}

#[tokio::test]
async fn listing_missing_directory_creates_it() -> Result<(), QuireError> {
    let tmpdir = TempDir::new()?;
    let store = journal_store(&tmpdir)?;

    assert!(store.list().await?.is_empty());
    assert!(tmpdir.path().join(DAILY).is_dir());

    Ok(())
}

#[tokio::test]
async fn listing_filters_by_extension_and_skips_hidden_files() -> Result<(), QuireError> {
    let tmpdir = TempDir::new()?;
    let store = journal_store(&tmpdir)?;
    let dir = tmpdir.path().join("vault/memories");
    fs::create_dir_all(dir.join("nested.mdx"))?;

    fs::write(dir.join("garden.mdx"), "")?;
    fs::write(dir.join("books.mdx"), "")?;
    fs::write(dir.join("draft.md"), "")?;
    fs::write(dir.join(".hidden.mdx"), "")?;
    fs::write(dir.join("notes.txt"), "")?;

    let listing = store.list_notes("vault/memories", ".mdx").await?;
    assert_eq!(keys(&listing), ["books", "garden"]);

    let listing = store.list_notes("vault/memories", "md").await?;
    assert_eq!(keys(&listing), ["draft"]);

    Ok(())
}

#[tokio::test]
async fn journal_day_lifecycle() -> Result<(), QuireError> {
    let tmpdir = TempDir::new()?;
    let store = journal_store(&tmpdir)?;
    let key = "vault/journal/daily/2025-03-18";

    store.save_note(key, "Hello").await?;
    assert_eq!(store.load_note(key).await?, "Hello");

    let listing = store.list_notes(DAILY, "md").await?;
    assert!(listing.contains(&NoteEntry::new("2025-03-18")));

    store.delete_note(key).await?;
    let listing = store.list_notes(DAILY, "md").await?;
    assert!(!listing.contains(&NoteEntry::new("2025-03-18")));

    Ok(())
}

#[tokio::test]
async fn memory_collection_uses_mdx() -> Result<(), QuireError> {
    let tmpdir = TempDir::new()?;
    let vault = Vault::open(tmpdir.path())?;
    let store = NoteStore::new(
        &vault,
        StoreOptions {
            directory: "vault/memories".to_string(),
            extension: "mdx".to_string(),
            ..Default::default()
        },
    );

    let key = store.key_for("garden");
    assert_eq!(key, "vault/memories/garden");

    store.save_note(&key, "tomatoes").await?;
    assert!(tmpdir.path().join("vault/memories/garden.mdx").is_file());
    assert_eq!(keys(&store.list().await?), ["garden"]);

    store.delete_note(&key).await?;
    assert!(!tmpdir.path().join("vault/memories/garden.mdx").exists());
    assert!(store.list().await?.is_empty());

    Ok(())
}

#[tokio::test]
async fn concurrent_saves_leave_one_complete_version() -> Result<(), QuireError> {
    let tmpdir = TempDir::new()?;
    let store = journal_store(&tmpdir)?;
    let key = "vault/journal/daily/2025-03-18";

    let versions: Vec<String> = (0..8).map(|i| format!("version {i} ").repeat(200)).collect();
    let tasks: Vec<_> = versions
        .iter()
        .cloned()
        .map(|content| {
            let store = store.clone();
            tokio::spawn(async move { store.save_note(key, &content).await })
        })
        .collect();

    for task in tasks {
        task.await.map_err(|e| QuireError::Other(e.to_string()))??;
    }

    let content = store.load_note(key).await?;
    assert!(versions.contains(&content));

    Ok(())
}

fn shared_stores(tmpdir: &TempDir) -> Result<(NoteStore, NoteStore), QuireError> {
    let vault = Vault::open(tmpdir.path())?;
    let cache = NoteCache::default();
    let journal = NoteStore::with_cache(
        &vault,
        StoreOptions {
            directory: DAILY.to_string(),
            ..Default::default()
        },
        cache.clone(),
    );
    let memories = NoteStore::with_cache(
        &vault,
        StoreOptions {
            directory: "vault/memories".to_string(),
            extension: "mdx".to_string(),
            ..Default::default()
        },
        cache,
    );
    Ok((journal, memories))
}

#[tokio::test]
async fn write_through_one_store_is_seen_by_another() -> Result<(), QuireError> {
    let tmpdir = TempDir::new()?;
    let (journal, memories) = shared_stores(&tmpdir)?;
    let key = "vault/memories/garden.mdx";

    memories.save_note(key, "c1").await?;
    assert_eq!(memories.load_note(key).await?, "c1");

    journal.save_note(key, "c2").await?;
    assert_eq!(memories.load_note(key).await?, "c2");

    journal.delete_note(key).await?;
    assert!(matches!(
        memories.delete_note(key).await,
        Err(NoteError::NotFound(_))
    ));

    Ok(())
}

#[tokio::test]
async fn listing_is_refreshed_after_write_through_another_store() -> Result<(), QuireError> {
    let tmpdir = TempDir::new()?;
    let (journal, memories) = shared_stores(&tmpdir)?;

    memories.save_note("vault/memories/garden", "").await?;
    assert_eq!(keys(&memories.list().await?), ["garden"]);

    journal.save_note("vault/memories/new.mdx", "").await?;
    assert_eq!(keys(&memories.list().await?), ["garden", "new"]);

    Ok(())
}

#[tokio::test]
async fn padded_keys_are_rejected() -> Result<(), QuireError> {
    let tmpdir = TempDir::new()?;
    let store = journal_store(&tmpdir)?;

    let result = store.save_note(" vault/journal/daily/2025-03-18", "x").await;
    assert!(matches!(result, Err(NoteError::InvalidKey(_))));

    let result = store.load_note("vault/journal/daily/2025-03-18 ").await;
    assert!(matches!(result, Err(NoteError::InvalidKey(_))));
    assert!(!tmpdir.path().join("vault").exists());

    Ok(())
}

#[cfg(unix)]
mod symlinks {
    use super::*;
    use std::os::unix::fs::symlink;

    /// A vault root holding `link -> <outside>` and `leak.md -> <outside>/secret.md`.
    fn linked_vault(tmpdir: &TempDir) -> Result<NoteStore, QuireError> {
        let root = tmpdir.path().join("root");
        let outside = tmpdir.path().join("outside");
        fs::create_dir_all(&root)?;
        fs::create_dir_all(&outside)?;
        fs::write(outside.join("secret.md"), "TOP SECRET")?;

        symlink(&outside, root.join("link"))?;
        symlink(outside.join("secret.md"), root.join("leak.md"))?;

        let vault = Vault::open(&root)?;
        Ok(NoteStore::new(&vault, StoreOptions::default()))
    }

    #[tokio::test]
    async fn symlinked_directory_cannot_be_read() -> Result<(), QuireError> {
        let tmpdir = TempDir::new()?;
        let store = linked_vault(&tmpdir)?;

        let result = store.load_note("link/secret").await;
        assert!(matches!(result, Err(NoteError::InvalidKey(_))));

        let result = store.load_note("leak").await;
        assert!(matches!(result, Err(NoteError::InvalidKey(_))));

        Ok(())
    }

    #[tokio::test]
    async fn nothing_is_created_outside_the_vault() -> Result<(), QuireError> {
        let tmpdir = TempDir::new()?;
        let store = linked_vault(&tmpdir)?;
        let outside = tmpdir.path().join("outside");

        let result = store.load_note("link/created").await;
        assert!(matches!(result, Err(NoteError::InvalidKey(_))));
        assert!(!outside.join("created.md").exists());

        let result = store.save_note("link/nested/written", "x").await;
        assert!(matches!(result, Err(NoteError::InvalidKey(_))));
        assert!(!outside.join("nested").exists());

        let result = store.list_notes("link", "md").await;
        assert!(matches!(result, Err(NoteError::InvalidKey(_))));

        Ok(())
    }

    #[tokio::test]
    async fn symlinked_file_cannot_be_deleted() -> Result<(), QuireError> {
        let tmpdir = TempDir::new()?;
        let store = linked_vault(&tmpdir)?;

        let result = store.delete_note("link/secret").await;
        assert!(matches!(result, Err(NoteError::InvalidKey(_))));
        assert_eq!(
            fs::read_to_string(tmpdir.path().join("outside/secret.md"))?,
            "TOP SECRET"
        );

        Ok(())
    }
}
