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

use std::collections::HashSet;
use std::fs::read_to_string;
use std::path::Path;

use serde::Deserialize;

use crate::error::Fallible;
use crate::error::fail;
use crate::types::article::Article;
use crate::types::lesson::Lesson;
use crate::types::topic::Topic;
use crate::types::topic::TopicCategory;

const BUILTIN_CATALOG: &str = include_str!("catalog.toml");

/// Name of the file that overrides the built-in catalog.
pub const CATALOG_FILE: &str = "catalog.toml";

/// The static course content: lessons, cultural topics, and the articles
/// of the educational hub.
#[derive(Clone, Debug, Deserialize)]
pub struct Catalog {
    #[serde(default)]
    pub lessons: Vec<Lesson>,
    #[serde(default)]
    pub topics: Vec<Topic>,
    #[serde(default)]
    pub articles: Vec<Article>,
}

impl Catalog {
    pub fn builtin() -> Fallible<Self> {
        Self::parse(BUILTIN_CATALOG)
    }

    /// Load `catalog.toml` from the directory, or the built-in catalog if
    /// there is none.
    pub fn load(directory: &Path) -> Fallible<Self> {
        let path = directory.join(CATALOG_FILE);
        if path.exists() {
            log::debug!("Loading catalog from {}", path.display());
            Self::parse(&read_to_string(path)?)
        } else {
            log::debug!("Using built-in catalog.");
            Self::builtin()
        }
    }

    pub fn parse(text: &str) -> Fallible<Self> {
        let catalog: Catalog = toml::from_str(text)?;
        catalog.validate()?;
        Ok(catalog)
    }

    pub fn lesson(&self, id: &str) -> Option<&Lesson> {
        self.lessons.iter().find(|lesson| lesson.id == id)
    }

    pub fn topic(&self, id: &str) -> Option<&Topic> {
        self.topics.iter().find(|topic| topic.id == id)
    }

    pub fn lesson_ids(&self) -> impl Iterator<Item = &str> {
        self.lessons.iter().map(|lesson| lesson.id.as_str())
    }

    pub fn topic_ids(&self) -> impl Iterator<Item = &str> {
        self.topics.iter().map(|topic| topic.id.as_str())
    }

    pub fn topics_in(&self, category: TopicCategory) -> impl Iterator<Item = &Topic> {
        self.topics
            .iter()
            .filter(move |topic| topic.category == category)
    }

    fn validate(&self) -> Fallible<()> {
        unique_ids("lesson", self.lesson_ids())?;
        unique_ids("topic", self.topic_ids())?;
        unique_ids(
            "article",
            self.articles.iter().map(|article| article.id.as_str()),
        )?;
        for lesson in &self.lessons {
            if lesson.kind.is_performance() {
                if lesson.sections.is_empty() {
                    return fail(format!("lesson {} has no sections.", lesson.id));
                }
            } else if lesson.exercises.is_empty() {
                return fail(format!("lesson {} has no exercises.", lesson.id));
            }
            for exercise in &lesson.exercises {
                if exercise.options.len() < 2 {
                    return fail(format!(
                        "exercise \"{}\" in lesson {} needs at least two options.",
                        exercise.question, lesson.id
                    ));
                }
                if !exercise.has_option(&exercise.answer) {
                    return fail(format!(
                        "the answer to \"{}\" in lesson {} is not one of its options.",
                        exercise.question, lesson.id
                    ));
                }
            }
        }
        Ok(())
    }
}

fn unique_ids<'a>(what: &str, ids: impl Iterator<Item = &'a str>) -> Fallible<()> {
    let mut seen = HashSet::new();
    for id in ids {
        if id.is_empty() {
            return fail(format!("{what} with an empty id."));
        }
        if !seen.insert(id) {
            return fail(format!("duplicate {what} id: {id}."));
        }
    }
    Ok(())
}
