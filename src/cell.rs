// Copyright 2025 Fernando Borretti
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! A typed value bound to a key in the durable store.
//!
//! The cell is read once when it is opened and written back after every
//! change. Reads never fail: a missing or undecodable entry yields the
//! default. Writes never fail either: if the store rejects a write, the
//! in-memory value stays authoritative and the stored copy goes stale.
//! A stale cell is not refreshed from the store until a write succeeds.

use std::sync::Arc;

use serde::Serialize;
use serde::de::DeserializeOwned;
use tokio::sync::broadcast::Receiver;
use tokio::sync::broadcast::error::TryRecvError;

use crate::store::Store;
use crate::types::storage_key::StorageKey;

pub struct PersistentCell<T> {
    key: StorageKey,
    value: T,
    default: T,
    store: Arc<dyn Store>,
    changes: Receiver<StorageKey>,
    /// The last write failed.
    dirty: bool,
}

impl<T: Clone + Serialize + DeserializeOwned> PersistentCell<T> {
    pub fn open(store: Arc<dyn Store>, key: StorageKey, default: T) -> Self {
        let changes = store.subscribe();
        let value = read(store.as_ref(), key, &default);
        Self {
            key,
            value,
            default,
            store,
            changes,
            dirty: false,
        }
    }

    pub fn key(&self) -> StorageKey {
        self.key
    }

    pub fn get(&self) -> &T {
        &self.value
    }

    /// Replace the value.
    pub fn set(&mut self, next: T) {
        self.value = next;
        self.persist();
    }

    /// Replace the value with one computed from the current value.
    pub fn update(&mut self, f: impl FnOnce(&T) -> T) {
        let next = f(&self.value);
        self.set(next);
    }

    /// Discard the in-memory value and read it again from the store.
    pub fn reload(&mut self) {
        self.value = read(self.store.as_ref(), self.key, &self.default);
        self.dirty = false;
    }

    /// Reload if anyone has written this cell's key since the last refresh.
    /// Returns whether a reload happened.
    pub fn refresh(&mut self) -> bool {
        let mut changed = false;
        loop {
            match self.changes.try_recv() {
                Ok(key) => changed |= key == self.key,
                Err(TryRecvError::Lagged(_)) => changed = true,
                Err(TryRecvError::Empty) | Err(TryRecvError::Closed) => break,
            }
        }
        if changed && self.dirty {
            log::debug!("Not reloading {}: its last write failed", self.key);
            return false;
        }
        if changed {
            self.reload();
        }
        changed
    }

    fn persist(&mut self) {
        let encoded = match serde_json::to_string(&self.value) {
            Ok(encoded) => encoded,
            Err(e) => {
                log::warn!("Failed to encode {}: {e}", self.key);
                self.dirty = true;
                return;
            }
        };
        match self.store.set(self.key, &encoded) {
            Ok(()) => self.dirty = false,
            Err(e) => {
                log::warn!("Failed to persist {}, keeping it in memory: {e}", self.key);
                self.dirty = true;
            }
        }
    }
}

fn read<T: Clone + DeserializeOwned>(store: &dyn Store, key: StorageKey, default: &T) -> T {
    match store.get(key) {
        Ok(Some(stored)) => match serde_json::from_str(&stored) {
            Ok(value) => value,
            Err(e) => {
                log::debug!("Stored value for {key} is unreadable, using default: {e}");
                default.clone()
            }
        },
        Ok(None) => default.clone(),
        Err(e) => {
            log::debug!("Failed to read {key}, using default: {e}");
            default.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Fallible;
    use crate::helper::create_tmp_directory;
    use crate::store::CHANGE_CAPACITY;
    use crate::store::memory::MemoryStore;
    use crate::store::sqlite::SqliteStore;
    use crate::types::progress_set::ProgressSet;

    fn open_progress(store: &Arc<dyn Store>) -> PersistentCell<ProgressSet> {
        PersistentCell::open(store.clone(), StorageKey::CompletedLessons, ProgressSet::new())
    }

    #[test]
    fn test_missing_key_yields_default() -> Fallible<()> {
        let store: Arc<dyn Store> = Arc::new(MemoryStore::new());
        let cell = open_progress(&store);
        assert!(cell.get().is_empty());
        // Opening does not write the default.
        assert_eq!(store.get(StorageKey::CompletedLessons)?, None);
        Ok(())
    }

    #[test]
    fn test_corrupt_entry_yields_default() {
        let store: Arc<dyn Store> = Arc::new(MemoryStore::with_entry(
            StorageKey::CompletedLessons,
            "{not json",
        ));
        let cell = open_progress(&store);
        assert!(cell.get().is_empty());
    }

    #[test]
    fn test_mistyped_entry_yields_default() {
        let store: Arc<dyn Store> = Arc::new(MemoryStore::with_entry(
            StorageKey::CompletedLessons,
            r#"{"lessons": 3}"#,
        ));
        let cell = open_progress(&store);
        assert!(cell.get().is_empty());
    }

    #[test]
    fn test_stored_value_is_read() {
        let store: Arc<dyn Store> = Arc::new(MemoryStore::with_entry(
            StorageKey::CompletedLessons,
            r#"["2","1"]"#,
        ));
        let cell = open_progress(&store);
        assert_eq!(cell.get().iter().collect::<Vec<_>>(), vec!["2", "1"]);
    }

    #[test]
    fn test_set_writes_through() -> Fallible<()> {
        let store: Arc<dyn Store> = Arc::new(MemoryStore::new());
        let mut cell = open_progress(&store);
        cell.set(["1", "3"].into_iter().collect());
        assert!(cell.get().contains("3"));
        assert_eq!(
            store.get(StorageKey::CompletedLessons)?,
            Some(r#"["1","3"]"#.to_string())
        );
        let reopened = open_progress(&store);
        assert_eq!(reopened.get(), cell.get());
        Ok(())
    }

    #[test]
    fn test_consecutive_updates_are_not_lost() {
        let store: Arc<dyn Store> = Arc::new(MemoryStore::new());
        let mut cell = open_progress(&store);
        cell.update(|set| set.with("1"));
        cell.update(|set| set.with("2"));
        assert_eq!(cell.get().iter().collect::<Vec<_>>(), vec!["1", "2"]);
    }

    #[test]
    fn test_rejected_write_keeps_memory_value() -> Fallible<()> {
        let store: Arc<dyn Store> = Arc::new(MemoryStore::rejecting());
        let mut cell = open_progress(&store);
        cell.update(|set| set.with("1"));
        assert!(cell.get().contains("1"));
        assert_eq!(store.get(StorageKey::CompletedLessons)?, None);
        Ok(())
    }

    #[test]
    fn test_independent_bindings() {
        let store: Arc<dyn Store> = Arc::new(MemoryStore::new());
        let mut a = open_progress(&store);
        let mut b = open_progress(&store);
        a.update(|set| set.with("1"));
        // b does not see a's write until it re-reads.
        assert!(b.get().is_empty());
        assert!(b.refresh());
        assert!(b.get().contains("1"));
        // Nothing else was written since.
        assert!(!b.refresh());
        a.reload();
        assert!(a.get().contains("1"));
    }

    #[test]
    fn test_refresh_ignores_other_keys() {
        let store: Arc<dyn Store> = Arc::new(MemoryStore::new());
        let mut lessons = open_progress(&store);
        let mut topics: PersistentCell<ProgressSet> =
            PersistentCell::open(store.clone(), StorageKey::ExploredTopics, ProgressSet::new());
        topics.update(|set| set.with("3"));
        assert!(!lessons.refresh());
        assert_eq!(topics.key(), StorageKey::ExploredTopics);
    }

    #[test]
    fn test_lagging_refresh_keeps_unsaved_value() -> Fallible<()> {
        let memory = Arc::new(MemoryStore::new());
        let store: Arc<dyn Store> = memory.clone();
        let mut cell = open_progress(&store);
        memory.set_rejecting(true);
        cell.update(|set| set.with("1"));
        memory.set_rejecting(false);
        // Overflow the cell's change channel with writes to another key.
        for _ in 0..=CHANGE_CAPACITY {
            store.set(StorageKey::ExploredTopics, "[]")?;
        }
        assert!(!cell.refresh());
        assert!(cell.get().contains("1"));
        // Once a write succeeds the cell follows the store again.
        cell.update(|set| set.with("2"));
        store.set(StorageKey::CompletedLessons, r#"["9"]"#)?;
        assert!(cell.refresh());
        assert_eq!(cell.get().iter().collect::<Vec<_>>(), vec!["9"]);
        Ok(())
    }

    #[test]
    fn test_round_trip_through_database() -> Fallible<()> {
        let directory = create_tmp_directory()?;
        let path = directory.join("progress.db");
        let path = path.to_str().unwrap();
        let values: Vec<ProgressSet> = vec![
            ProgressSet::new(),
            ["1", "2"].into_iter().collect(),
            ["say \"allillanchu\"", "back\\slash", "ñawi", "Inti Raymi ☀", "tab\tnew\nline"]
                .into_iter()
                .collect(),
        ];
        for value in values {
            {
                let store: Arc<dyn Store> = Arc::new(SqliteStore::new(path)?);
                let mut cell = open_progress(&store);
                cell.set(value.clone());
            }
            let store: Arc<dyn Store> = Arc::new(SqliteStore::new(path)?);
            let reopened = open_progress(&store);
            assert_eq!(reopened.get(), &value);
        }
        Ok(())
    }
}
