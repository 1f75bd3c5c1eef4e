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

use serde::Deserialize;
use serde::Serialize;

/// An insertion-ordered set of content identifiers: the lessons a learner
/// has completed, or the topics they have explored.
///
/// Persisted as a JSON array of strings. Decoding does not reject
/// duplicates written by older writers, but `insert` never adds one.
#[derive(Clone, Default, PartialEq, Eq, Debug, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProgressSet(Vec<String>);

impl ProgressSet {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    pub fn contains(&self, id: &str) -> bool {
        self.0.iter().any(|member| member == id)
    }

    /// Add an identifier. Returns `false` if it was already present.
    pub fn insert(&mut self, id: &str) -> bool {
        if self.contains(id) {
            false
        } else {
            self.0.push(id.to_string());
            true
        }
    }

    /// Return a copy of this set with `id` added.
    pub fn with(&self, id: &str) -> Self {
        let mut next = self.clone();
        next.insert(id);
        next
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    /// Count the distinct members that are also in `ids`.
    pub fn count_in<'a>(&self, ids: impl IntoIterator<Item = &'a str>) -> usize {
        ids.into_iter().filter(|id| self.contains(id)).count()
    }
}

impl<S: Into<String>> FromIterator<S> for ProgressSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut set = ProgressSet::new();
        for id in iter {
            set.insert(&id.into());
        }
        set
    }
}
