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

use std::env::current_dir;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use crate::catalog::Catalog;
use crate::error::ErrorReport;
use crate::error::Fallible;
use crate::error::fail;
use crate::store::sqlite::SqliteStore;

/// Name of the progress database inside the workspace directory.
pub const DATABASE_FILE: &str = "yachay.db";

/// A directory holding a learner's progress database and, optionally, a
/// custom catalog.
pub struct Workspace {
    pub directory: PathBuf,
    pub catalog: Arc<Catalog>,
}

impl Workspace {
    pub fn new(directory: Option<String>) -> Fallible<Self> {
        let directory: PathBuf = match directory {
            Some(dir) => PathBuf::from(dir),
            None => current_dir()?,
        };
        let directory = if directory.exists() {
            directory.canonicalize()?
        } else {
            return fail("directory does not exist.");
        };

        let catalog = {
            log::debug!("Loading catalog...");
            let start = Instant::now();
            let catalog = Catalog::load(&directory)?;
            let duration = start.elapsed().as_millis();
            log::debug!(
                "Catalog loaded in {duration}ms: {} lessons, {} topics.",
                catalog.lessons.len(),
                catalog.topics.len()
            );
            catalog
        };

        Ok(Self {
            directory,
            catalog: Arc::new(catalog),
        })
    }

    /// Open (creating if needed) the progress database.
    pub fn open_store(&self) -> Fallible<SqliteStore> {
        let db_path: PathBuf = self.directory.join(DATABASE_FILE);
        let db_path: &str = db_path
            .to_str()
            .ok_or_else(|| ErrorReport::new("invalid path"))?;
        SqliteStore::new(db_path)
    }
}
