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

use crate::types::lesson::VocabularyEntry;

#[derive(Clone, Copy, PartialEq, Eq, Debug, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TopicCategory {
    Traditions,
    Ceremonies,
    Agriculture,
    Cosmovision,
}

impl TopicCategory {
    pub const ALL: [TopicCategory; 4] = [
        TopicCategory::Traditions,
        TopicCategory::Ceremonies,
        TopicCategory::Agriculture,
        TopicCategory::Cosmovision,
    ];

    pub fn label(self) -> &'static str {
        match self {
            TopicCategory::Traditions => "Tradiciones",
            TopicCategory::Ceremonies => "Ceremonias",
            TopicCategory::Agriculture => "Agricultura",
            TopicCategory::Cosmovision => "Cosmovisión",
        }
    }

    pub fn css_class(self) -> &'static str {
        match self {
            TopicCategory::Traditions => "traditions",
            TopicCategory::Ceremonies => "ceremonies",
            TopicCategory::Agriculture => "agriculture",
            TopicCategory::Cosmovision => "cosmovision",
        }
    }
}

/// A cultural topic. `content` is Markdown.
#[derive(Clone, PartialEq, Debug, Deserialize)]
pub struct Topic {
    pub id: String,
    pub title: String,
    pub title_kichua: String,
    pub category: TopicCategory,
    pub description: String,
    pub content: String,
    pub vocabulary: Vec<VocabularyEntry>,
}
