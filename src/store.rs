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

pub mod memory;
pub mod sqlite;

use tokio::sync::broadcast::Receiver;

use crate::error::Fallible;
use crate::types::storage_key::StorageKey;

/// Capacity of the change-notification channel. Subscribers that fall
/// further behind than this treat every key as changed.
pub const CHANGE_CAPACITY: usize = 64;

/// A durable map from storage keys to serialized values.
///
/// Every successful `set` is announced to subscribers with the key that
/// was written.
pub trait Store: Send + Sync {
    /// Read the serialized value for `key`, or `None` if there is none.
    fn get(&self, key: StorageKey) -> Fallible<Option<String>>;

    /// Write the serialized value for `key`, replacing any previous value.
    fn set(&self, key: StorageKey, value: &str) -> Fallible<()>;

    /// Receive the keys of all subsequent successful writes.
    fn subscribe(&self) -> Receiver<StorageKey>;
}
