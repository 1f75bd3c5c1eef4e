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

use std::fmt::Display;
use std::fmt::Formatter;

use rusqlite::ToSql;
use rusqlite::types::FromSql;
use rusqlite::types::FromSqlError;
use rusqlite::types::FromSqlResult;
use rusqlite::types::ToSqlOutput;
use rusqlite::types::ValueRef;

use crate::error::ErrorReport;
use crate::error::fail;

/// The keys under which progress is persisted in the durable store.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum StorageKey {
    CompletedLessons,
    ExploredTopics,
}

impl StorageKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            StorageKey::CompletedLessons => "completed-lessons",
            StorageKey::ExploredTopics => "explored-topics",
        }
    }
}

impl Display for StorageKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl TryFrom<String> for StorageKey {
    type Error = ErrorReport;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.as_str() {
            "completed-lessons" => Ok(StorageKey::CompletedLessons),
            "explored-topics" => Ok(StorageKey::ExploredTopics),
            _ => fail(format!("Invalid storage key: {value}")),
        }
    }
}

impl ToSql for StorageKey {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for StorageKey {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        let string: String = FromSql::column_result(value)?;
        StorageKey::try_from(string).map_err(|e| FromSqlError::Other(Box::new(e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse() {
        for key in [StorageKey::CompletedLessons, StorageKey::ExploredTopics] {
            assert_eq!(StorageKey::try_from(key.to_string()), Ok(key));
        }
    }

    #[test]
    fn test_invalid_key() {
        let result = StorageKey::try_from("high-scores".to_string());
        assert!(result.is_err());
    }
}
