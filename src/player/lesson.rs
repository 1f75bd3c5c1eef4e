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
use crate::types::lesson::Exercise;
use crate::types::lesson::Lesson;

#[derive(Clone, PartialEq, Debug)]
pub enum LessonStep {
    Intro,
    Vocabulary {
        index: usize,
    },
    Exercise {
        index: usize,
        selected: Option<String>,
        checked: bool,
    },
    Completed,
}

/// A run through a standard lesson: introduction, vocabulary cards one at
/// a time, then the exercises, then a summary.
#[derive(Clone, PartialEq, Debug)]
pub struct LessonSession {
    lesson: Lesson,
    step: LessonStep,
    correct_answers: usize,
}

impl LessonSession {
    pub fn new(lesson: Lesson) -> Self {
        Self {
            lesson,
            step: LessonStep::Intro,
            correct_answers: 0,
        }
    }

    pub fn lesson(&self) -> &Lesson {
        &self.lesson
    }

    pub fn step(&self) -> &LessonStep {
        &self.step
    }

    pub fn correct_answers(&self) -> usize {
        self.correct_answers
    }

    pub fn is_completed(&self) -> bool {
        self.step == LessonStep::Completed
    }

    /// The exercise being answered, if any.
    pub fn current_exercise(&self) -> Option<&Exercise> {
        match &self.step {
            LessonStep::Exercise { index, .. } => self.lesson.exercises.get(*index),
            _ => None,
        }
    }

    /// One-based position in the progress indicator, out of
    /// `Lesson::total_steps`.
    pub fn step_number(&self) -> usize {
        let words = self.lesson.vocabulary.len();
        match &self.step {
            LessonStep::Intro => 1,
            LessonStep::Vocabulary { index } => 2 + index,
            LessonStep::Exercise { index, .. } => 2 + words + index,
            LessonStep::Completed => self.lesson.total_steps(),
        }
    }

    pub fn begin(&mut self) -> Fallible<()> {
        if self.step != LessonStep::Intro {
            return fail("the lesson has already begun.");
        }
        self.step = if self.lesson.vocabulary.is_empty() {
            self.first_exercise()
        } else {
            LessonStep::Vocabulary { index: 0 }
        };
        Ok(())
    }

    pub fn next_word(&mut self) -> Fallible<()> {
        let LessonStep::Vocabulary { index } = self.step else {
            return fail("not reviewing vocabulary.");
        };
        self.step = if index + 1 < self.lesson.vocabulary.len() {
            LessonStep::Vocabulary { index: index + 1 }
        } else {
            self.first_exercise()
        };
        Ok(())
    }

    pub fn select_answer(&mut self, answer: &str) -> Fallible<()> {
        let Some(exercise) = self.current_exercise() else {
            return fail("not answering an exercise.");
        };
        if !exercise.has_option(answer) {
            return fail(format!("\"{answer}\" is not one of the options."));
        }
        match &mut self.step {
            LessonStep::Exercise {
                selected,
                checked: false,
                ..
            } => {
                *selected = Some(answer.to_string());
                Ok(())
            }
            _ => fail("the answer has already been checked."),
        }
    }

    pub fn check_answer(&mut self) -> Fallible<()> {
        let correct = match (&self.step, self.current_exercise()) {
            (
                LessonStep::Exercise {
                    selected: Some(answer),
                    checked: false,
                    ..
                },
                Some(exercise),
            ) => exercise.is_correct(answer),
            _ => return fail("there is no selected answer to check."),
        };
        if correct {
            self.correct_answers += 1;
        }
        if let LessonStep::Exercise { checked, .. } = &mut self.step {
            *checked = true;
        }
        Ok(())
    }

    pub fn next_question(&mut self) -> Fallible<()> {
        let LessonStep::Exercise {
            index,
            checked: true,
            ..
        } = self.step
        else {
            return fail("the answer has not been checked.");
        };
        self.step = if index + 1 < self.lesson.exercises.len() {
            LessonStep::Exercise {
                index: index + 1,
                selected: None,
                checked: false,
            }
        } else {
            LessonStep::Completed
        };
        Ok(())
    }

    pub fn restart(&mut self) {
        self.step = LessonStep::Intro;
        self.correct_answers = 0;
    }

    fn first_exercise(&self) -> LessonStep {
        if self.lesson.exercises.is_empty() {
            LessonStep::Completed
        } else {
            LessonStep::Exercise {
                index: 0,
                selected: None,
                checked: false,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;

    fn greetings() -> Fallible<LessonSession> {
        let catalog = Catalog::builtin()?;
        let lesson = catalog.lesson("1").cloned().unwrap();
        Ok(LessonSession::new(lesson))
    }

    #[test]
    fn test_full_run() -> Fallible<()> {
        let mut session = greetings()?;
        assert_eq!(session.step_number(), 1);
        session.begin()?;
        assert_eq!(session.step(), &LessonStep::Vocabulary { index: 0 });
        assert_eq!(session.step_number(), 2);
        for _ in 0..4 {
            session.next_word()?;
        }
        assert_eq!(session.step_number(), 6);
        session.select_answer("Napaykullay")?;
        session.check_answer()?;
        session.next_question()?;
        session.select_answer("Napaykullay")?;
        session.check_answer()?;
        session.next_question()?;
        assert!(session.is_completed());
        assert_eq!(session.correct_answers(), 1);
        assert_eq!(session.step_number(), session.lesson().total_steps());
        Ok(())
    }

    #[test]
    fn test_out_of_order_actions() -> Fallible<()> {
        let mut session = greetings()?;
        assert!(session.next_word().is_err());
        assert!(session.check_answer().is_err());
        session.begin()?;
        assert!(session.begin().is_err());
        assert!(session.select_answer("Napaykullay").is_err());
        Ok(())
    }

    #[test]
    fn test_answer_rules() -> Fallible<()> {
        let mut session = greetings()?;
        session.begin()?;
        for _ in 0..4 {
            session.next_word()?;
        }
        // Must select before checking, and check before moving on.
        assert!(session.check_answer().is_err());
        assert!(session.next_question().is_err());
        assert!(session.select_answer("Bonjour").is_err());
        session.select_answer("Allinmi")?;
        session.select_answer("Napaykullay")?;
        session.check_answer()?;
        assert!(session.check_answer().is_err());
        assert!(session.select_answer("Allinmi").is_err());
        assert_eq!(session.correct_answers(), 1);
        Ok(())
    }

    #[test]
    fn test_restart() -> Fallible<()> {
        let mut session = greetings()?;
        session.begin()?;
        session.restart();
        assert_eq!(session.step(), &LessonStep::Intro);
        assert_eq!(session.correct_answers(), 0);
        Ok(())
    }

    #[test]
    fn test_lesson_without_vocabulary() -> Fallible<()> {
        let mut lesson = greetings()?.lesson().clone();
        lesson.vocabulary.clear();
        let mut session = LessonSession::new(lesson);
        session.begin()?;
        assert!(session.current_exercise().is_some());
        Ok(())
    }
}
