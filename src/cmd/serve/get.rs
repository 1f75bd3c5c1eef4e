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

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Html;

use crate::app::View;
use crate::cmd::serve::render::render_view;
use crate::cmd::serve::state::ServerState;
use crate::cmd::serve::template::page_template;

/// How often the page reloads while a music or dance lesson is playing, so
/// that the end of playback shows up.
const PLAYING_REFRESH_SECONDS: u64 = 3;

pub async fn get_handler(State(state): State<ServerState>) -> (StatusCode, Html<String>) {
    let mut app = state.lock();
    app.refresh();
    let refresh_after = match app.view() {
        View::MusicDancePlayer(session) if session.is_playing() => Some(PLAYING_REFRESH_SECONDS),
        _ => None,
    };
    let body = render_view(&app);
    let html = page_template(app.view().section(), refresh_after, body);
    (StatusCode::OK, Html(html.into_string()))
}
