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

//! The application shell: which screen is showing, what it carries, and
//! the learner's progress.

use std::sync::Arc;

use serde::Deserialize;

use crate::catalog::Catalog;
use crate::cell::PersistentCell;
use crate::error::Fallible;
use crate::error::fail;
use crate::player::lesson::LessonSession;
use crate::player::performance::PerformanceSession;
use crate::progress::Progress;
use crate::store::Store;
use crate::types::progress_set::ProgressSet;
use crate::types::storage_key::StorageKey;
use crate::types::topic::Topic;

/// The screens reachable from the navigation bar.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Section {
    Dashboard,
    Lessons,
    Cultural,
    Educational,
}

impl Section {
    pub const ALL: [Section; 4] = [
        Section::Dashboard,
        Section::Lessons,
        Section::Cultural,
        Section::Educational,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Section::Dashboard => "dashboard",
            Section::Lessons => "lessons",
            Section::Cultural => "cultural",
            Section::Educational => "educational",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Section::Dashboard => "Dashboard",
            Section::Lessons => "Lecciones",
            Section::Cultural => "Cultura",
            Section::Educational => "Academia",
        }
    }
}

#[derive(Clone, PartialEq, Debug)]
pub enum View {
    Dashboard,
    Lessons,
    Cultural,
    Educational,
    LessonPlayer(LessonSession),
    MusicDancePlayer(PerformanceSession),
    TopicDetail(Topic),
}

impl View {
    /// The navigation section this view belongs to, if it is one of the
    /// top-level screens.
    pub fn section(&self) -> Option<Section> {
        match self {
            View::Dashboard => Some(Section::Dashboard),
            View::Lessons => Some(Section::Lessons),
            View::Cultural => Some(Section::Cultural),
            View::Educational => Some(Section::Educational),
            _ => None,
        }
    }

    fn name(&self) -> &'static str {
        match self {
            View::Dashboard => "dashboard",
            View::Lessons => "lessons",
            View::Cultural => "cultural",
            View::Educational => "educational",
            View::LessonPlayer(_) => "lesson-player",
            View::MusicDancePlayer(_) => "music-dance-player",
            View::TopicDetail(_) => "topic-detail",
        }
    }
}

impl From<Section> for View {
    fn from(section: Section) -> Self {
        match section {
            Section::Dashboard => View::Dashboard,
            Section::Lessons => View::Lessons,
            Section::Cultural => View::Cultural,
            Section::Educational => View::Educational,
        }
    }
}

pub struct App {
    catalog: Arc<Catalog>,
    view: View,
    completed_lessons: PersistentCell<ProgressSet>,
    explored_topics: PersistentCell<ProgressSet>,
    last_playback: u64,
}

impl App {
    pub fn new(catalog: Arc<Catalog>, store: Arc<dyn Store>) -> Self {
        let completed_lessons =
            PersistentCell::open(store.clone(), StorageKey::CompletedLessons, ProgressSet::new());
        let explored_topics =
            PersistentCell::open(store, StorageKey::ExploredTopics, ProgressSet::new());
        Self {
            catalog,
            view: View::Dashboard,
            completed_lessons,
            explored_topics,
            last_playback: 0,
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn view(&self) -> &View {
        &self.view
    }

    pub fn completed_lessons(&self) -> &ProgressSet {
        self.completed_lessons.get()
    }

    pub fn explored_topics(&self) -> &ProgressSet {
        self.explored_topics.get()
    }

    pub fn progress(&self) -> Progress {
        Progress::compute(
            &self.catalog,
            self.completed_lessons.get(),
            self.explored_topics.get(),
        )
    }

    /// Pick up progress written to the store by anyone else.
    pub fn refresh(&mut self) {
        if self.completed_lessons.refresh() {
            log::debug!("Reloaded {}", self.completed_lessons.key());
        }
        if self.explored_topics.refresh() {
            log::debug!("Reloaded {}", self.explored_topics.key());
        }
    }

    pub fn navigate(&mut self, section: Section) -> Fallible<()> {
        if self.view.section().is_none() {
            return fail(format!(
                "cannot navigate away from the {} view.",
                self.view.name()
            ));
        }
        self.view = View::from(section);
        Ok(())
    }

    pub fn start_lesson(&mut self, id: &str) -> Fallible<()> {
        if self.view != View::Lessons {
            return fail("lessons can only be started from the lessons view.");
        }
        let Some(lesson) = self.catalog.lesson(id) else {
            return fail(format!("no lesson with id {id}."));
        };
        log::debug!("Starting lesson {id}");
        self.view = if lesson.kind.is_performance() {
            View::MusicDancePlayer(PerformanceSession::new(lesson.clone()))
        } else {
            View::LessonPlayer(LessonSession::new(lesson.clone()))
        };
        Ok(())
    }

    pub fn explore_topic(&mut self, id: &str) -> Fallible<()> {
        if self.view != View::Cultural {
            return fail("topics can only be explored from the cultural view.");
        }
        let Some(topic) = self.catalog.topic(id) else {
            return fail(format!("no topic with id {id}."));
        };
        self.view = View::TopicDetail(topic.clone());
        Ok(())
    }

    /// Record the current lesson as completed and return to the lessons
    /// view.
    pub fn complete_lesson(&mut self) -> Fallible<()> {
        let id = match &self.view {
            View::LessonPlayer(session) => session.lesson().id.clone(),
            View::MusicDancePlayer(session) => session.lesson().id.clone(),
            view => return fail(format!("no lesson to complete in the {} view.", view.name())),
        };
        if !self.completed_lessons.get().contains(&id) {
            log::debug!("Lesson {id} completed");
            self.completed_lessons.update(|set| set.with(&id));
        }
        self.view = View::Lessons;
        Ok(())
    }

    /// Leave a player that has reached its summary. The lesson was already
    /// recorded when the summary was reached.
    pub fn finish(&mut self) -> Fallible<()> {
        if self.finished_lesson().is_none() {
            return fail("the lesson is not finished.");
        }
        self.complete_lesson()
    }

    /// Apply a step of the lesson player, recording the lesson as soon as
    /// it reaches its summary.
    pub fn with_lesson(
        &mut self,
        f: impl FnOnce(&mut LessonSession) -> Fallible<()>,
    ) -> Fallible<()> {
        f(self.lesson_session()?)?;
        self.record_finished_lesson();
        Ok(())
    }

    /// Like `with_lesson`, for the music/dance player.
    pub fn with_performance(
        &mut self,
        f: impl FnOnce(&mut PerformanceSession) -> Fallible<()>,
    ) -> Fallible<()> {
        f(self.performance_session()?)?;
        self.record_finished_lesson();
        Ok(())
    }

    /// The id of the lesson whose player is showing its summary.
    fn finished_lesson(&self) -> Option<&str> {
        match &self.view {
            View::LessonPlayer(session) if session.is_completed() => Some(session.lesson().id.as_str()),
            View::MusicDancePlayer(session) if session.is_completed() => {
                Some(session.lesson().id.as_str())
            }
            _ => None,
        }
    }

    fn record_finished_lesson(&mut self) {
        let Some(id) = self.finished_lesson().map(str::to_string) else {
            return;
        };
        if !self.completed_lessons.get().contains(&id) {
            log::debug!("Lesson {id} completed");
            self.completed_lessons.update(|set| set.with(&id));
        }
    }

    pub fn back(&mut self) -> Fallible<()> {
        self.view = match &self.view {
            View::LessonPlayer(_) | View::MusicDancePlayer(_) => View::Lessons,
            View::TopicDetail(_) => View::Cultural,
            view => return fail(format!("cannot go back from the {} view.", view.name())),
        };
        Ok(())
    }

    pub fn mark_explored(&mut self) -> Fallible<()> {
        let View::TopicDetail(topic) = &self.view else {
            return fail("no topic to mark as explored.");
        };
        let id = topic.id.clone();
        log::debug!("Topic {id} explored");
        self.explored_topics.update(|set| set.with(&id));
        Ok(())
    }

    fn lesson_session(&mut self) -> Fallible<&mut LessonSession> {
        match &mut self.view {
            View::LessonPlayer(session) => Ok(session),
            _ => fail("no lesson in progress."),
        }
    }

    fn performance_session(&mut self) -> Fallible<&mut PerformanceSession> {
        match &mut self.view {
            View::MusicDancePlayer(session) => Ok(session),
            _ => fail("no music or dance lesson in progress."),
        }
    }

    /// Toggle playback in the music/dance player. Returns the token of the
    /// playback that was started, if one was.
    pub fn toggle_playback(&mut self) -> Fallible<Option<u64>> {
        let token = self.last_playback + 1;
        let session = self.performance_session()?;
        if session.is_playing() {
            session.stop_playback();
            Ok(None)
        } else {
            session.start_playback(token);
            self.last_playback = token;
            Ok(Some(token))
        }
    }

    /// Called when the playback timer fires. Does nothing unless the
    /// playback it belongs to is still running.
    pub fn playback_elapsed(&mut self, token: u64) {
        if let View::MusicDancePlayer(session) = &mut self.view {
            session.expire_playback(token);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::player::lesson::LessonStep;
    use crate::store::memory::MemoryStore;

    fn make_app(store: Arc<dyn Store>) -> Fallible<App> {
        Ok(App::new(Arc::new(Catalog::builtin()?), store))
    }

    fn ids(set: &ProgressSet) -> Vec<&str> {
        set.iter().collect()
    }

    #[test]
    fn test_initial_state() -> Fallible<()> {
        let app = make_app(Arc::new(MemoryStore::new()))?;
        assert_eq!(app.view(), &View::Dashboard);
        assert!(app.completed_lessons().is_empty());
        assert_eq!(app.progress().completion_percent, 0);
        Ok(())
    }

    #[test]
    fn test_navigation() -> Fallible<()> {
        let mut app = make_app(Arc::new(MemoryStore::new()))?;
        for section in Section::ALL {
            app.navigate(section)?;
            assert_eq!(app.view().section(), Some(section));
        }
        Ok(())
    }

    #[test]
    fn test_first_lesson_completion() -> Fallible<()> {
        let store: Arc<dyn Store> = Arc::new(MemoryStore::new());
        let mut app = make_app(store.clone())?;
        app.navigate(Section::Lessons)?;
        app.start_lesson("1")?;
        assert!(matches!(app.view(), View::LessonPlayer(_)));
        app.complete_lesson()?;
        assert_eq!(app.view(), &View::Lessons);
        assert_eq!(ids(app.completed_lessons()), vec!["1"]);
        assert_eq!(
            store.get(StorageKey::CompletedLessons)?,
            Some(r#"["1"]"#.to_string())
        );
        Ok(())
    }

    #[test]
    fn test_recompletion_is_a_no_op() -> Fallible<()> {
        let store: Arc<dyn Store> = Arc::new(MemoryStore::with_entry(
            StorageKey::CompletedLessons,
            r#"["1"]"#,
        ));
        let mut app = make_app(store)?;
        app.navigate(Section::Lessons)?;
        app.start_lesson("1")?;
        app.complete_lesson()?;
        assert_eq!(ids(app.completed_lessons()), vec!["1"]);
        Ok(())
    }

    #[test]
    fn test_lesson_routing() -> Fallible<()> {
        let mut app = make_app(Arc::new(MemoryStore::new()))?;
        app.navigate(Section::Lessons)?;
        app.start_lesson("4")?;
        assert!(matches!(app.view(), View::MusicDancePlayer(_)));
        app.back()?;
        app.start_lesson("5")?;
        assert!(matches!(app.view(), View::MusicDancePlayer(_)));
        app.complete_lesson()?;
        assert_eq!(ids(app.completed_lessons()), vec!["5"]);
        Ok(())
    }

    #[test]
    fn test_back_does_not_record_progress() -> Fallible<()> {
        let mut app = make_app(Arc::new(MemoryStore::new()))?;
        app.navigate(Section::Lessons)?;
        app.start_lesson("2")?;
        app.back()?;
        assert_eq!(app.view(), &View::Lessons);
        assert!(app.completed_lessons().is_empty());
        Ok(())
    }

    #[test]
    fn test_rejected_transitions() -> Fallible<()> {
        let mut app = make_app(Arc::new(MemoryStore::new()))?;
        assert!(app.start_lesson("1").is_err());
        assert!(app.complete_lesson().is_err());
        assert!(app.back().is_err());
        assert!(app.mark_explored().is_err());
        app.navigate(Section::Lessons)?;
        assert!(app.start_lesson("99").is_err());
        app.start_lesson("1")?;
        assert!(app.navigate(Section::Dashboard).is_err());
        assert!(app.explore_topic("1").is_err());
        assert!(app.toggle_playback().is_err());
        // The failed requests left the player where it was.
        assert!(matches!(app.view(), View::LessonPlayer(_)));
        Ok(())
    }

    /// Answer every exercise of the current standard lesson correctly.
    fn run_lesson(app: &mut App) -> Fallible<()> {
        app.with_lesson(|session| session.begin())?;
        while matches!(app.lesson_session()?.step(), LessonStep::Vocabulary { .. }) {
            app.with_lesson(|session| session.next_word())?;
        }
        while !app.lesson_session()?.is_completed() {
            app.with_lesson(|session| {
                let answer = session.current_exercise().unwrap().answer.clone();
                session.select_answer(&answer)?;
                session.check_answer()?;
                session.next_question()
            })?;
        }
        Ok(())
    }

    #[test]
    fn test_finish_requires_completed_player() -> Fallible<()> {
        let mut app = make_app(Arc::new(MemoryStore::new()))?;
        app.navigate(Section::Lessons)?;
        app.start_lesson("3")?;
        assert!(app.finish().is_err());
        run_lesson(&mut app)?;
        app.finish()?;
        assert_eq!(app.view(), &View::Lessons);
        assert_eq!(ids(app.completed_lessons()), vec!["3"]);
        Ok(())
    }

    #[test]
    fn test_summary_records_completion() -> Fallible<()> {
        let store: Arc<dyn Store> = Arc::new(MemoryStore::new());
        let mut app = make_app(store.clone())?;
        app.navigate(Section::Lessons)?;
        app.start_lesson("1")?;
        run_lesson(&mut app)?;
        // Reaching the summary is enough; restarting keeps the record.
        assert_eq!(ids(app.completed_lessons()), vec!["1"]);
        app.with_lesson(|session| {
            session.restart();
            Ok(())
        })?;
        app.back()?;
        assert_eq!(ids(app.completed_lessons()), vec!["1"]);
        assert_eq!(
            store.get(StorageKey::CompletedLessons)?,
            Some(r#"["1"]"#.to_string())
        );
        Ok(())
    }

    #[test]
    fn test_performance_summary_then_back() -> Fallible<()> {
        let mut app = make_app(Arc::new(MemoryStore::new()))?;
        app.navigate(Section::Lessons)?;
        app.start_lesson("4")?;
        app.with_performance(|session| session.next_step())?;
        app.with_performance(|session| session.next_step())?;
        assert!(app.completed_lessons().is_empty());
        app.with_performance(|session| session.next_step())?;
        assert!(app.performance_session()?.is_completed());
        app.back()?;
        assert_eq!(app.view(), &View::Lessons);
        assert!(app.completed_lessons().contains("4"));
        // A rejected step records nothing.
        app.start_lesson("5")?;
        assert!(app.with_lesson(|session| session.begin()).is_err());
        assert_eq!(ids(app.completed_lessons()), vec!["4"]);
        Ok(())
    }

    #[test]
    fn test_topic_exploration() -> Fallible<()> {
        let mut app = make_app(Arc::new(MemoryStore::new()))?;
        app.navigate(Section::Cultural)?;
        app.explore_topic("3")?;
        assert!(matches!(app.view(), View::TopicDetail(topic) if topic.id == "3"));
        app.mark_explored()?;
        app.mark_explored()?;
        assert_eq!(ids(app.explored_topics()), vec!["3"]);
        assert!(app.explored_topics().contains("3"));
        app.back()?;
        assert_eq!(app.view(), &View::Cultural);
        assert_eq!(app.progress().exploration_percent, 25);
        Ok(())
    }

    #[test]
    fn test_storage_unavailable() -> Fallible<()> {
        let store: Arc<dyn Store> = Arc::new(MemoryStore::rejecting());
        let mut app = make_app(store.clone())?;
        app.navigate(Section::Lessons)?;
        app.start_lesson("1")?;
        app.complete_lesson()?;
        assert_eq!(ids(app.completed_lessons()), vec!["1"]);
        assert_eq!(app.progress().completion_percent, 20);
        // A fresh session over the same store starts from scratch.
        let fresh = make_app(store)?;
        assert!(fresh.completed_lessons().is_empty());
        Ok(())
    }

    #[test]
    fn test_progress_survives_sessions() -> Fallible<()> {
        let store: Arc<dyn Store> = Arc::new(MemoryStore::new());
        let mut app = make_app(store.clone())?;
        app.navigate(Section::Cultural)?;
        app.explore_topic("1")?;
        app.mark_explored()?;
        let fresh = make_app(store)?;
        assert_eq!(ids(fresh.explored_topics()), vec!["1"]);
        Ok(())
    }

    #[test]
    fn test_refresh_sees_other_writers() -> Fallible<()> {
        let store: Arc<dyn Store> = Arc::new(MemoryStore::new());
        let mut app = make_app(store.clone())?;
        store.set(StorageKey::ExploredTopics, r#"["2"]"#)?;
        assert!(app.explored_topics().is_empty());
        app.refresh();
        assert_eq!(ids(app.explored_topics()), vec!["2"]);
        Ok(())
    }

    #[test]
    fn test_playback() -> Fallible<()> {
        let mut app = make_app(Arc::new(MemoryStore::new()))?;
        app.navigate(Section::Lessons)?;
        app.start_lesson("4")?;
        let first = app.toggle_playback()?.unwrap();
        assert_eq!(app.toggle_playback()?, None);
        let second = app.toggle_playback()?.unwrap();
        assert_ne!(first, second);
        app.playback_elapsed(first);
        assert!(app.performance_session()?.is_playing());
        app.playback_elapsed(second);
        assert!(!app.performance_session()?.is_playing());
        // A timer that fires after leaving the player does nothing.
        app.toggle_playback()?;
        app.back()?;
        app.playback_elapsed(second + 1);
        assert_eq!(app.view(), &View::Lessons);
        Ok(())
    }
}
