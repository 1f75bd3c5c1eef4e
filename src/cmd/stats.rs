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

use std::fmt::Display;
use std::fmt::Formatter;
use std::sync::Arc;

use clap::ValueEnum;
use maud::html;
use serde::Serialize;

use crate::app::App;
use crate::error::Fallible;
use crate::progress::ACHIEVEMENTS;
use crate::progress::Progress;
use crate::types::storage_key::StorageKey;
use crate::workspace::Workspace;

#[derive(ValueEnum, Clone)]
pub enum StatsFormat {
    /// HTML output.
    Html,
    /// JSON output.
    Json,
}

impl Display for StatsFormat {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            StatsFormat::Html => write!(f, "html"),
            StatsFormat::Json => write!(f, "json"),
        }
    }
}

pub fn print_stats(directory: Option<String>, format: StatsFormat) -> Fallible<()> {
    let stats = collect_stats(directory)?;
    let output = match format {
        StatsFormat::Html => render_html(&stats),
        StatsFormat::Json => serde_json::to_string_pretty(&stats)?,
    };
    println!("{output}");
    Ok(())
}

fn collect_stats(directory: Option<String>) -> Fallible<Stats> {
    let workspace = Workspace::new(directory)?;
    let store = Arc::new(workspace.open_store()?);
    let last_updated = [StorageKey::CompletedLessons, StorageKey::ExploredTopics]
        .into_iter()
        .filter_map(|key| store.last_updated(key).transpose())
        .collect::<Fallible<Vec<_>>>()?
        .into_iter()
        .max()
        .map(|ts| ts.to_rfc3339());
    let app = App::new(workspace.catalog.clone(), store);
    Ok(Stats {
        progress: app.progress(),
        last_updated,
    })
}

fn render_html(stats: &Stats) -> String {
    let progress = &stats.progress;
    let markup = html! {
        table.stats {
            tr {
                th { "Lecciones Completadas" }
                td { (progress.lessons_completed) " / " (progress.lessons_total) }
                td { (progress.completion_percent) "%" }
            }
            tr {
                th { "Temas Explorados" }
                td { (progress.topics_explored) " / " (progress.topics_total) }
                td { (progress.exploration_percent) "%" }
            }
        }
        ul.achievements {
            @for achievement in &ACHIEVEMENTS {
                @if progress.is_unlocked(achievement) {
                    li { (achievement.icon) " " (achievement.title) }
                }
            }
        }
    };
    markup.into_string()
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Stats {
    #[serde(flatten)]
    progress: Progress,
    last_updated: Option<String>,
}
