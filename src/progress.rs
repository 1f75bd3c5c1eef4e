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

use serde::Serialize;

use crate::catalog::Catalog;
use crate::types::progress_set::ProgressSet;

/// Which progress set an achievement counts.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Track {
    Lessons,
    Topics,
}

pub struct Achievement {
    pub id: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub icon: &'static str,
    pub track: Track,
    pub threshold: usize,
}

impl Achievement {
    pub fn is_unlocked(&self, completed: &ProgressSet, explored: &ProgressSet) -> bool {
        let count = match self.track {
            Track::Lessons => completed.len(),
            Track::Topics => explored.len(),
        };
        count >= self.threshold
    }
}

pub const ACHIEVEMENTS: [Achievement; 4] = [
    Achievement {
        id: "first-lesson",
        title: "Primer Paso",
        description: "Completaste tu primera lección",
        icon: "🌱",
        track: Track::Lessons,
        threshold: 1,
    },
    Achievement {
        id: "cultural-explorer",
        title: "Explorador Cultural",
        description: "Exploraste 2 temas culturales",
        icon: "🗺️",
        track: Track::Topics,
        threshold: 2,
    },
    Achievement {
        id: "dedicated-learner",
        title: "Estudiante Dedicado",
        description: "Completaste todas las lecciones básicas",
        icon: "📚",
        track: Track::Lessons,
        threshold: 2,
    },
    Achievement {
        id: "wisdom-keeper",
        title: "Guardián de la Sabiduría",
        description: "Exploraste todos los temas culturales",
        icon: "🏔️",
        track: Track::Topics,
        threshold: 4,
    },
];

/// Figures derived from the progress sets and the catalog. Recomputed on
/// every render, never stored.
#[derive(Clone, PartialEq, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Progress {
    pub lessons_total: usize,
    pub lessons_completed: usize,
    pub completion_percent: usize,
    pub topics_total: usize,
    pub topics_explored: usize,
    pub exploration_percent: usize,
    pub achievements_unlocked: Vec<&'static str>,
}

impl Progress {
    pub fn compute(catalog: &Catalog, completed: &ProgressSet, explored: &ProgressSet) -> Self {
        let lessons_total = catalog.lessons.len();
        let lessons_completed = completed.count_in(catalog.lesson_ids());
        let topics_total = catalog.topics.len();
        let topics_explored = explored.count_in(catalog.topic_ids());
        let achievements_unlocked = ACHIEVEMENTS
            .iter()
            .filter(|a| a.is_unlocked(completed, explored))
            .map(|a| a.id)
            .collect();
        Self {
            lessons_total,
            lessons_completed,
            completion_percent: percent(lessons_completed, lessons_total),
            topics_total,
            topics_explored,
            exploration_percent: percent(topics_explored, topics_total),
            achievements_unlocked,
        }
    }

    pub fn lessons_remaining(&self) -> usize {
        self.lessons_total - self.lessons_completed
    }

    pub fn topics_remaining(&self) -> usize {
        self.topics_total - self.topics_explored
    }

    pub fn is_everything_done(&self) -> bool {
        self.lessons_remaining() == 0 && self.topics_remaining() == 0
    }

    pub fn is_unlocked(&self, achievement: &Achievement) -> bool {
        self.achievements_unlocked.contains(&achievement.id)
    }
}

/// `round(100 * part / whole)`, rounding halves up. An empty whole is 0%.
pub fn percent(part: usize, whole: usize) -> usize {
    if whole == 0 {
        0
    } else {
        (200 * part + whole) / (2 * whole)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Fallible;

    #[test]
    fn test_percent() {
        assert_eq!(percent(0, 3), 0);
        assert_eq!(percent(1, 3), 33);
        assert_eq!(percent(2, 3), 67);
        assert_eq!(percent(3, 3), 100);
        assert_eq!(percent(1, 8), 13);
        assert_eq!(percent(1, 2), 50);
        assert_eq!(percent(0, 0), 0);
    }

    #[test]
    fn test_percent_matches_rounding() {
        for whole in 1..=20usize {
            for part in 0..=whole {
                let expected = (100.0 * part as f64 / whole as f64).round() as usize;
                assert_eq!(percent(part, whole), expected, "{part}/{whole}");
            }
        }
    }

    #[test]
    fn test_compute() -> Fallible<()> {
        let catalog = Catalog::builtin()?;
        // Identifiers missing from the catalog do not count towards progress.
        let completed: ProgressSet = ["1", "2", "old"].into_iter().collect();
        let explored: ProgressSet = ["3"].into_iter().collect();
        let progress = Progress::compute(&catalog, &completed, &explored);
        assert_eq!(progress.lessons_completed, 2);
        assert_eq!(progress.completion_percent, 40);
        assert_eq!(progress.lessons_remaining(), 3);
        assert_eq!(progress.topics_explored, 1);
        assert_eq!(progress.exploration_percent, 25);
        assert_eq!(
            progress.achievements_unlocked,
            vec!["first-lesson", "dedicated-learner"]
        );
        assert!(!progress.is_everything_done());
        Ok(())
    }

    #[test]
    fn test_achievement_thresholds() {
        let none = ProgressSet::new();
        let two: ProgressSet = ["1", "2"].into_iter().collect();
        let explorer = &ACHIEVEMENTS[1];
        assert!(!explorer.is_unlocked(&none, &none));
        assert!(!explorer.is_unlocked(&two, &none));
        assert!(explorer.is_unlocked(&none, &two));
    }
}
