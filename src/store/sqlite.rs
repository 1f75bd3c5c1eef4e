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

use std::sync::Arc;
use std::sync::Mutex;
use std::sync::MutexGuard;
use std::sync::PoisonError;

use rusqlite::Connection;
use rusqlite::OptionalExtension;
use rusqlite::Transaction;
use tokio::sync::broadcast;
use tokio::sync::broadcast::Receiver;
use tokio::sync::broadcast::Sender;

use crate::error::Fallible;
use crate::store::CHANGE_CAPACITY;
use crate::store::Store;
use crate::types::storage_key::StorageKey;
use crate::types::timestamp::Timestamp;

/// A store backed by a single SQLite table.
#[derive(Clone)]
pub struct SqliteStore {
    conn: Arc<Mutex<Connection>>,
    changes: Sender<StorageKey>,
}

impl SqliteStore {
    pub fn new(database_path: &str) -> Fallible<Self> {
        let mut conn = Connection::open(database_path)?;
        {
            let tx = conn.transaction()?;
            if !probe_schema_exists(&tx)? {
                log::debug!("Creating schema in {database_path}");
                tx.execute_batch(include_str!("schema.sql"))?;
                tx.commit()?;
            }
        }
        let conn = Arc::new(Mutex::new(conn));
        let (changes, _) = broadcast::channel(CHANGE_CAPACITY);
        Ok(Self { conn, changes })
    }

    /// When the value for `key` was last written, if ever.
    pub fn last_updated(&self, key: StorageKey) -> Fallible<Option<Timestamp>> {
        let conn = self.acquire();
        let sql = "select updated_at from entries where key = ?;";
        let ts: Option<Timestamp> = conn
            .query_row(sql, [key], |row| row.get(0))
            .optional()?;
        Ok(ts)
    }

    fn acquire(&self) -> MutexGuard<'_, Connection> {
        self.conn.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Store for SqliteStore {
    fn get(&self, key: StorageKey) -> Fallible<Option<String>> {
        let conn = self.acquire();
        let sql = "select value from entries where key = ?;";
        let value: Option<String> = conn
            .query_row(sql, [key], |row| row.get(0))
            .optional()?;
        Ok(value)
    }

    fn set(&self, key: StorageKey, value: &str) -> Fallible<()> {
        {
            let mut conn = self.acquire();
            let tx = conn.transaction()?;
            let sql = "insert into entries (key, value, updated_at) values (?, ?, ?) on conflict (key) do update set value = excluded.value, updated_at = excluded.updated_at;";
            tx.execute(sql, (key, value, Timestamp::now()))?;
            tx.commit()?;
        }
        // No subscribers is not an error.
        let _ = self.changes.send(key);
        Ok(())
    }

    fn subscribe(&self) -> Receiver<StorageKey> {
        self.changes.subscribe()
    }
}

fn probe_schema_exists(tx: &Transaction) -> Fallible<bool> {
    let sql = "select count(*) from sqlite_master where type='table' AND name=?;";
    let count: i64 = tx.query_row(sql, ["entries"], |row| row.get(0))?;
    Ok(count > 0)
}
