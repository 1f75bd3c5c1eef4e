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

use crate::error::Fallible;
use crate::error::fail;
use crate::types::lesson::Lesson;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum PerformanceStep {
    Intro,
    Theory,
    Practice,
    Completed,
}

/// A run through a music or dance lesson.
///
/// Playback is cosmetic: `playing` holds the token of the playback that is
/// currently "running", and is cleared either by the learner or by the
/// timer that started with it.
#[derive(Clone, PartialEq, Debug)]
pub struct PerformanceSession {
    lesson: Lesson,
    step: PerformanceStep,
    playing: Option<u64>,
}

impl PerformanceSession {
    pub fn new(lesson: Lesson) -> Self {
        Self {
            lesson,
            step: PerformanceStep::Intro,
            playing: None,
        }
    }

    pub fn lesson(&self) -> &Lesson {
        &self.lesson
    }

    pub fn step(&self) -> PerformanceStep {
        self.step
    }

    pub fn is_completed(&self) -> bool {
        self.step == PerformanceStep::Completed
    }

    pub fn is_playing(&self) -> bool {
        self.playing.is_some()
    }

    pub fn next_step(&mut self) -> Fallible<()> {
        self.step = match self.step {
            PerformanceStep::Intro => PerformanceStep::Theory,
            PerformanceStep::Theory => PerformanceStep::Practice,
            PerformanceStep::Practice => PerformanceStep::Completed,
            PerformanceStep::Completed => return fail("the lesson is already complete."),
        };
        self.playing = None;
        Ok(())
    }

    pub fn start_playback(&mut self, token: u64) {
        self.playing = Some(token);
    }

    pub fn stop_playback(&mut self) {
        self.playing = None;
    }

    /// Stop playback only if it is still the one identified by `token`.
    pub fn expire_playback(&mut self, token: u64) -> bool {
        if self.playing == Some(token) {
            self.playing = None;
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;

    fn music() -> Fallible<PerformanceSession> {
        let catalog = Catalog::builtin()?;
        let lesson = catalog.lesson("4").cloned().unwrap();
        Ok(PerformanceSession::new(lesson))
    }

    #[test]
    fn test_steps() -> Fallible<()> {
        let mut session = music()?;
        assert_eq!(session.step(), PerformanceStep::Intro);
        session.next_step()?;
        session.next_step()?;
        assert_eq!(session.step(), PerformanceStep::Practice);
        session.next_step()?;
        assert!(session.is_completed());
        assert!(session.next_step().is_err());
        Ok(())
    }

    #[test]
    fn test_stale_timer_is_ignored() -> Fallible<()> {
        let mut session = music()?;
        session.start_playback(1);
        session.stop_playback();
        session.start_playback(2);
        // The first playback's timer fires late.
        assert!(!session.expire_playback(1));
        assert!(session.is_playing());
        assert!(session.expire_playback(2));
        assert!(!session.is_playing());
        // Firing twice is harmless.
        assert!(!session.expire_playback(2));
        Ok(())
    }
}
