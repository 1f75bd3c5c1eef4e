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

/// How a lesson is played: the standard vocabulary-and-quiz player, or the
/// music/dance player.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LessonKind {
    Standard,
    Music,
    Dance,
}

impl LessonKind {
    pub fn is_performance(self) -> bool {
        matches!(self, LessonKind::Music | LessonKind::Dance)
    }

    pub fn label(self) -> &'static str {
        match self {
            LessonKind::Standard => "Lección",
            LessonKind::Music => "Música",
            LessonKind::Dance => "Danza",
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Basic,
    Intermediate,
    Advanced,
}

impl Difficulty {
    pub fn label(self) -> &'static str {
        match self {
            Difficulty::Basic => "Básico",
            Difficulty::Intermediate => "Intermedio",
            Difficulty::Advanced => "Avanzado",
        }
    }

    pub fn css_class(self) -> &'static str {
        match self {
            Difficulty::Basic => "basic",
            Difficulty::Intermediate => "intermediate",
            Difficulty::Advanced => "advanced",
        }
    }
}

/// A vocabulary card: a Kichua term, its Spanish translation, and a note on
/// how it is used.
#[derive(Clone, PartialEq, Debug, Deserialize)]
pub struct VocabularyEntry {
    pub term: String,
    pub translation: String,
    pub note: String,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExerciseKind {
    Translation,
    Matching,
    Context,
}

/// A multiple-choice question.
#[derive(Clone, PartialEq, Debug, Deserialize)]
pub struct Exercise {
    pub kind: ExerciseKind,
    pub question: String,
    pub options: Vec<String>,
    pub answer: String,
    pub explanation: String,
}

impl Exercise {
    pub fn is_correct(&self, answer: &str) -> bool {
        self.answer == answer
    }

    pub fn has_option(&self, answer: &str) -> bool {
        self.options.iter().any(|option| option == answer)
    }
}

/// One section of a music or dance lesson. `detail` is the duration of a
/// music section, or the movement of a dance step.
#[derive(Clone, PartialEq, Debug, Deserialize)]
pub struct PracticeSection {
    pub title: String,
    pub description: String,
    pub detail: String,
}

#[derive(Clone, PartialEq, Debug, Deserialize)]
pub struct Lesson {
    pub id: String,
    pub title: String,
    pub title_kichua: String,
    pub kind: LessonKind,
    pub difficulty: Difficulty,
    pub description: String,
    pub cultural_context: String,
    pub vocabulary: Vec<VocabularyEntry>,
    #[serde(default)]
    pub exercises: Vec<Exercise>,
    #[serde(default)]
    pub sections: Vec<PracticeSection>,
}

impl Lesson {
    /// Number of steps shown in the lesson player's progress indicator: the
    /// introduction, one per word, one per exercise, and the summary.
    pub fn total_steps(&self) -> usize {
        2 + self.vocabulary.len() + self.exercises.len()
    }
}
