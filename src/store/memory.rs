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

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::PoisonError;
use std::sync::atomic::AtomicBool;
use std::sync::atomic::Ordering;

use tokio::sync::broadcast;
use tokio::sync::broadcast::Receiver;
use tokio::sync::broadcast::Sender;

use crate::error::Fallible;
use crate::error::fail;
use crate::store::CHANGE_CAPACITY;
use crate::store::Store;
use crate::types::storage_key::StorageKey;

/// A store that lives only as long as the process. Used for `--ephemeral`
/// sessions.
pub struct MemoryStore {
    entries: Mutex<HashMap<StorageKey, String>>,
    reject_writes: AtomicBool,
    changes: Sender<StorageKey>,
}

impl MemoryStore {
    pub fn new() -> Self {
        let (changes, _) = broadcast::channel(CHANGE_CAPACITY);
        Self {
            entries: Mutex::new(HashMap::new()),
            reject_writes: AtomicBool::new(false),
            changes,
        }
    }

    /// A store whose every write fails, like a full or disabled disk.
    #[cfg(test)]
    pub fn rejecting() -> Self {
        let store = Self::new();
        store.set_rejecting(true);
        store
    }

    /// Start or stop rejecting writes.
    #[cfg(test)]
    pub fn set_rejecting(&self, reject: bool) {
        self.reject_writes.store(reject, Ordering::Relaxed);
    }

    /// A store with a value already written under `key`.
    #[cfg(test)]
    pub fn with_entry(key: StorageKey, value: &str) -> Self {
        let store = Self::new();
        store
            .entries
            .lock()
            .unwrap()
            .insert(key, value.to_string());
        store
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl Store for MemoryStore {
    fn get(&self, key: StorageKey) -> Fallible<Option<String>> {
        let entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(entries.get(&key).cloned())
    }

    fn set(&self, key: StorageKey, value: &str) -> Fallible<()> {
        if self.reject_writes.load(Ordering::Relaxed) {
            return fail("storage quota exceeded.");
        }
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key, value.to_string());
        let _ = self.changes.send(key);
        Ok(())
    }

    fn subscribe(&self) -> Receiver<StorageKey> {
        self.changes.subscribe()
    }
}
