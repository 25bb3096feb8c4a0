//! Snapshot store
//!
//! A thread-safe single-slot cache holding the most recent [`GameState`]
//! plus its update timestamp. The slot is only ever replaced whole, never
//! partially updated. When a cache file is configured the slot is mirrored
//! to disk on every update via tempfile + atomic rename, and reloaded at
//! construction; the in-memory slot stays authoritative if disk I/O fails.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::AdvisorResult;
use crate::models::GameState;

/// On-disk mirror: `{"state": <snapshot-or-null>, "last_update": <RFC3339-or-null>}`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct CacheFile {
    state: Option<GameState>,
    last_update: Option<DateTime<Utc>>,
}

/// Defensive copy of the current cache entry returned by [`SnapshotStore::get_latest`]
#[derive(Debug, Clone, PartialEq)]
pub struct CachedState {
    pub state: GameState,
    pub cached_at: DateTime<Utc>,
}

#[derive(Debug, Default)]
struct Slot {
    state: Option<GameState>,
    last_update: Option<DateTime<Utc>>,
}

/// Thread-safe single-slot cache for the latest game state
#[derive(Debug)]
pub struct SnapshotStore {
    slot: Mutex<Slot>,
    cache_file: Option<PathBuf>,
}

impl SnapshotStore {
    /// Create a store, reloading any persisted entry from `cache_file`.
    ///
    /// A corrupt or unreadable cache file is treated as "no prior state";
    /// construction never fails on it.
    pub fn new(cache_file: Option<PathBuf>) -> Self {
        let mut slot = Slot::default();

        if let Some(path) = cache_file.as_deref() {
            if path.exists() {
                match load_cache_file(path) {
                    Ok(loaded) => {
                        info!(cache_file = %path.display(), "loaded persisted game state");
                        slot.state = loaded.state;
                        slot.last_update = loaded.last_update;
                    }
                    Err(e) => {
                        warn!(cache_file = %path.display(), error = %e, "ignoring unreadable cache file");
                    }
                }
            }
        }

        Self {
            slot: Mutex::new(slot),
            cache_file,
        }
    }

    /// Replace the cached entry and timestamp atomically.
    ///
    /// Persistence is best effort: a failed disk write is logged and the
    /// in-memory entry stays current.
    pub fn update(&self, state: GameState) {
        let mut slot = self.lock();
        slot.state = Some(state);
        slot.last_update = Some(Utc::now());

        if let Some(path) = self.cache_file.as_deref() {
            let mirror = CacheFile {
                state: slot.state.clone(),
                last_update: slot.last_update,
            };
            if let Err(e) = save_cache_file(path, &mirror) {
                warn!(cache_file = %path.display(), error = %e, "failed to persist game state");
            }
        }

        debug!(turn = slot.state.as_ref().map(|s| s.turn), "cache updated");
    }

    /// Return a copy of the current entry, or `None` before the first update
    pub fn get_latest(&self) -> Option<CachedState> {
        let slot = self.lock();
        match (&slot.state, slot.last_update) {
            (Some(state), Some(cached_at)) => Some(CachedState {
                state: state.clone(),
                cached_at,
            }),
            _ => None,
        }
    }

    /// Remove the entry, the timestamp, and the persisted file if present
    pub fn clear(&self) {
        let mut slot = self.lock();
        slot.state = None;
        slot.last_update = None;

        if let Some(path) = self.cache_file.as_deref() {
            if path.exists() {
                if let Err(e) = fs::remove_file(path) {
                    warn!(cache_file = %path.display(), error = %e, "failed to remove cache file");
                }
            }
        }
    }

    fn lock(&self) -> MutexGuard<'_, Slot> {
        // A panic while holding the lock leaves the slot intact; recover it.
        self.slot.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

fn load_cache_file(path: &Path) -> AdvisorResult<CacheFile> {
    let content = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

/// Write-to-temp-then-rename so readers never observe a partial file
fn save_cache_file(path: &Path, mirror: &CacheFile) -> AdvisorResult<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    fs::create_dir_all(&dir)?;

    // Temp file in the destination directory so the rename stays on one filesystem
    let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
    serde_json::to_writer_pretty(&mut tmp, mirror)?;
    tmp.flush()?;
    tmp.persist(path)
        .map_err(|e| std::io::Error::other(e.to_string()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{GameState, Tile};
    use proptest::prelude::*;
    use tempfile::tempdir;

    fn state_for_turn(turn: u32) -> GameState {
        GameState {
            turn,
            current_player: 0,
            visible_tiles: vec![Tile {
                x: 1,
                y: 2,
                obj: "Town".to_string(),
                owner: Some(0),
            }],
            heroes: vec![],
            towns: vec![],
            resources: None,
        }
    }

    #[test]
    fn test_fresh_store_is_empty() {
        let store = SnapshotStore::new(None);
        assert!(store.get_latest().is_none());
    }

    #[test]
    fn test_update_then_get_latest() {
        let store = SnapshotStore::new(None);
        store.update(state_for_turn(3));

        let cached = store.get_latest().unwrap();
        assert_eq!(cached.state.turn, 3);
    }

    #[test]
    fn test_get_latest_returns_a_copy() {
        let store = SnapshotStore::new(None);
        store.update(state_for_turn(3));

        let mut first = store.get_latest().unwrap();
        first.state.turn = 99;

        assert_eq!(store.get_latest().unwrap().state.turn, 3);
    }

    #[test]
    fn test_clear_empties_store_and_removes_file() {
        let dir = tempdir().unwrap();
        let cache = dir.path().join("cache.json");
        let store = SnapshotStore::new(Some(cache.clone()));

        store.update(state_for_turn(5));
        assert!(cache.exists());

        store.clear();
        assert!(store.get_latest().is_none());
        assert!(!cache.exists());
    }

    #[test]
    fn test_persistence_round_trip() {
        let dir = tempdir().unwrap();
        let cache = dir.path().join("cache.json");

        let store = SnapshotStore::new(Some(cache.clone()));
        store.update(state_for_turn(7));
        let before = store.get_latest().unwrap();

        let reloaded = SnapshotStore::new(Some(cache));
        let after = reloaded.get_latest().unwrap();
        assert_eq!(after.state, before.state);
        assert_eq!(after.cached_at, before.cached_at);
    }

    #[test]
    fn test_corrupt_cache_file_yields_empty_store() {
        let dir = tempdir().unwrap();
        let cache = dir.path().join("cache.json");
        std::fs::write(&cache, "{not valid json").unwrap();

        let store = SnapshotStore::new(Some(cache));
        assert!(store.get_latest().is_none());
    }

    #[test]
    fn test_persistence_failure_keeps_memory_authoritative() {
        let dir = tempdir().unwrap();
        // cache path is a directory: every persist attempt fails
        let store = SnapshotStore::new(Some(dir.path().to_path_buf()));

        store.update(state_for_turn(9));
        assert_eq!(store.get_latest().unwrap().state.turn, 9);
    }

    #[test]
    fn test_persisted_document_shape() {
        let dir = tempdir().unwrap();
        let cache = dir.path().join("cache.json");
        let store = SnapshotStore::new(Some(cache.clone()));
        store.update(state_for_turn(4));

        let doc: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&cache).unwrap()).unwrap();
        assert_eq!(doc["state"]["turn"], 4);
        assert!(doc["last_update"].is_string());
    }

    proptest! {
        /// Read-after-write: after any sequence of updates, get_latest
        /// observes exactly the last one.
        #[test]
        fn prop_get_latest_sees_last_update(turns in proptest::collection::vec(1u32..5000, 1..20)) {
            let store = SnapshotStore::new(None);
            for &turn in &turns {
                store.update(state_for_turn(turn));
            }
            let last = *turns.last().unwrap();
            prop_assert_eq!(store.get_latest().unwrap().state.turn, last);
        }
    }
}
