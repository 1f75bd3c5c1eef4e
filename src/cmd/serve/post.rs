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

use std::time::Duration;

use axum::Form;
use axum::extract::State;
use axum::response::Redirect;
use serde::Deserialize;
use tokio::time::sleep;

use crate::app::App;
use crate::app::Section;
use crate::cmd::serve::state::ServerState;
use crate::error::ErrorReport;
use crate::error::Fallible;

/// How long simulated music or dance playback lasts.
pub const PLAYBACK_DURATION: Duration = Duration::from_secs(3);

#[derive(Debug, Deserialize)]
enum Action {
    Navigate,
    StartLesson,
    ExploreTopic,
    Back,
    Begin,
    NextWord,
    SelectAnswer,
    CheckAnswer,
    NextQuestion,
    Restart,
    Finish,
    NextStep,
    TogglePlayback,
    MarkExplored,
}

#[derive(Deserialize)]
pub struct FormData {
    action: Action,
    section: Option<Section>,
    id: Option<String>,
    answer: Option<String>,
}

pub async fn post_handler(
    State(state): State<ServerState>,
    Form(form): Form<FormData>,
) -> Redirect {
    let result = {
        let mut app = state.lock();
        action_handler(&mut app, form)
    };
    match result {
        Ok(Some(token)) => {
            let state = state.clone();
            tokio::spawn(async move {
                sleep(PLAYBACK_DURATION).await;
                state.lock().playback_elapsed(token);
            });
        }
        Ok(None) => {}
        Err(e) => {
            log::error!("{e}");
        }
    }
    Redirect::to("/")
}

/// Apply an action. Returns the token of a playback that was started.
fn action_handler(app: &mut App, form: FormData) -> Fallible<Option<u64>> {
    log::debug!("Action: {:?}", form.action);
    match form.action {
        Action::Navigate => app.navigate(required(form.section, "section")?)?,
        Action::StartLesson => app.start_lesson(&required(form.id, "id")?)?,
        Action::ExploreTopic => app.explore_topic(&required(form.id, "id")?)?,
        Action::Back => app.back()?,
        Action::Begin => app.with_lesson(|session| session.begin())?,
        Action::NextWord => app.with_lesson(|session| session.next_word())?,
        Action::SelectAnswer => {
            let answer = required(form.answer, "answer")?;
            app.with_lesson(|session| session.select_answer(&answer))?
        }
        Action::CheckAnswer => app.with_lesson(|session| session.check_answer())?,
        Action::NextQuestion => app.with_lesson(|session| session.next_question())?,
        Action::Restart => app.with_lesson(|session| {
            session.restart();
            Ok(())
        })?,
        Action::Finish => app.finish()?,
        Action::NextStep => app.with_performance(|session| session.next_step())?,
        Action::TogglePlayback => return app.toggle_playback(),
        Action::MarkExplored => app.mark_explored()?,
    }
    Ok(None)
}

fn required<T>(field: Option<T>, name: &str) -> Fallible<T> {
    field.ok_or_else(|| ErrorReport::new(format!("missing form field: {name}.")))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::app::View;
    use crate::catalog::Catalog;
    use crate::store::memory::MemoryStore;

    fn form(action: Action) -> FormData {
        FormData {
            action,
            section: None,
            id: None,
            answer: None,
        }
    }

    #[test]
    fn test_missing_field() -> Fallible<()> {
        let mut app = App::new(Arc::new(Catalog::builtin()?), Arc::new(MemoryStore::new()));
        let err = action_handler(&mut app, form(Action::Navigate)).err().unwrap();
        assert_eq!(err.to_string(), "error: missing form field: section.");
        Ok(())
    }

    #[test]
    fn test_actions() -> Fallible<()> {
        let mut app = App::new(Arc::new(Catalog::builtin()?), Arc::new(MemoryStore::new()));
        let navigate = FormData {
            section: Some(Section::Lessons),
            ..form(Action::Navigate)
        };
        action_handler(&mut app, navigate)?;
        let start = FormData {
            id: Some("4".to_string()),
            ..form(Action::StartLesson)
        };
        action_handler(&mut app, start)?;
        assert!(matches!(app.view(), View::MusicDancePlayer(_)));
        assert!(action_handler(&mut app, form(Action::TogglePlayback))?.is_some());
        assert_eq!(action_handler(&mut app, form(Action::TogglePlayback))?, None);
        assert!(action_handler(&mut app, form(Action::Begin)).is_err());
        Ok(())
    }
}
