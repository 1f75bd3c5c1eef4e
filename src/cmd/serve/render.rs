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

use maud::Markup;
use maud::PreEscaped;
use maud::html;

use crate::app::App;
use crate::app::View;
use crate::markdown::markdown_to_html;
use crate::markdown::markdown_to_html_inline;
use crate::player::lesson::LessonSession;
use crate::player::lesson::LessonStep;
use crate::player::performance::PerformanceSession;
use crate::player::performance::PerformanceStep;
use crate::progress::ACHIEVEMENTS;
use crate::progress::percent;
use crate::types::lesson::Lesson;
use crate::types::lesson::LessonKind;
use crate::types::lesson::VocabularyEntry;
use crate::types::topic::Topic;
use crate::types::topic::TopicCategory;

/// Render the body of the current view.
pub fn render_view(app: &App) -> Markup {
    match app.view() {
        View::Dashboard => dashboard(app),
        View::Lessons => lessons(app),
        View::Cultural => cultural(app),
        View::Educational => educational(app),
        View::LessonPlayer(session) => lesson_player(session),
        View::MusicDancePlayer(session) => performance_player(session),
        View::TopicDetail(topic) => topic_detail(app, topic),
    }
}

/// A one-button form posting `action` along with the given fields.
fn action_button(action: &str, label: &str, fields: &[(&str, &str)]) -> Markup {
    html! {
        form action="/" method="post" {
            @for (name, value) in fields {
                input type="hidden" name=(name) value=(value);
            }
            button type="submit" name="action" value=(action) {
                (label)
            }
        }
    }
}

fn progress_bar(percent: usize) -> Markup {
    html! {
        div.bar {
            div.fill style=(format!("width: {percent}%;")) {}
        }
    }
}

fn dashboard(app: &App) -> Markup {
    let progress = app.progress();
    html! {
        div.dashboard {
            h1 { "Tu Progreso" }
            div.stats {
                div.stat {
                    h2 { "Lecciones Completadas" }
                    p.count { (progress.lessons_completed) " / " (progress.lessons_total) }
                    (progress_bar(progress.completion_percent))
                    p.percent { (progress.completion_percent) "%" }
                }
                div.stat {
                    h2 { "Temas Explorados" }
                    p.count { (progress.topics_explored) " / " (progress.topics_total) }
                    (progress_bar(progress.exploration_percent))
                    p.percent { (progress.exploration_percent) "%" }
                }
            }
            h2 { "Logros" }
            ul.achievements {
                @for achievement in &ACHIEVEMENTS {
                    @let unlocked = progress.is_unlocked(achievement);
                    li.achievement.unlocked[unlocked] id=(achievement.id) {
                        span.icon { (achievement.icon) }
                        div {
                            h3 { (achievement.title) }
                            p { (achievement.description) }
                            @if unlocked {
                                span.badge { "Desbloqueado" }
                            }
                        }
                    }
                }
            }
            div.recommendations {
                @if progress.lessons_remaining() > 0 {
                    p { "Te quedan " (progress.lessons_remaining()) " lecciones por completar" }
                }
                @if progress.topics_remaining() > 0 {
                    p { "Descubre " (progress.topics_remaining()) " temas culturales más" }
                }
                @if progress.is_everything_done() {
                    p.done { "¡Felicidades! Has completado todo el contenido disponible." }
                }
            }
        }
    }
}

fn lessons(app: &App) -> Markup {
    let progress = app.progress();
    html! {
        div.lessons {
            h1 { "Lecciones de Kichua" }
            div.overall {
                span { "Progreso General" }
                span.percent { (progress.completion_percent) "%" }
                (progress_bar(progress.completion_percent))
            }
            div.grid {
                @for lesson in &app.catalog().lessons {
                    (lesson_card(lesson, app.completed_lessons().contains(&lesson.id)))
                }
            }
        }
    }
}

fn lesson_card(lesson: &Lesson, completed: bool) -> Markup {
    let label = if completed { "Revisar" } else { "Comenzar" };
    html! {
        div.card.lesson.completed[completed] id=(format!("lesson-{}", lesson.id)) {
            div.header {
                h2 { (lesson.title) }
                p.kichua { (lesson.title_kichua) }
                span class=(format!("badge {}", lesson.difficulty.css_class())) {
                    (lesson.difficulty.label())
                }
                @if lesson.kind.is_performance() {
                    span.badge.kind { (lesson.kind.label()) }
                }
            }
            p.description { (lesson.description) }
            div.context {
                p.label { "Contexto Cultural" }
                p { (lesson.cultural_context) }
            }
            div.footer {
                span { (lesson.vocabulary.len()) " palabras" }
                (action_button("StartLesson", label, &[("id", lesson.id.as_str())]))
            }
            @if completed {
                p.status { "★ Completado" }
            }
        }
    }
}

fn cultural(app: &App) -> Markup {
    let explored = app.explored_topics();
    html! {
        div.cultural {
            h1 { "Explorador Cultural" }
            p.lead {
                "Descubre la riqueza de las tradiciones andinas y su profunda conexión con la naturaleza y la comunidad."
            }
            @for category in TopicCategory::ALL {
                @let topics: Vec<&Topic> = app.catalog().topics_in(category).collect();
                @if !topics.is_empty() {
                    section class=(category.css_class()) {
                        h2 { (category.label()) }
                        div.grid {
                            @for topic in topics {
                                (topic_card(topic, explored.contains(&topic.id)))
                            }
                        }
                    }
                }
            }
        }
    }
}

fn topic_card(topic: &Topic, explored: bool) -> Markup {
    html! {
        div.card.topic.explored[explored] id=(format!("topic-{}", topic.id)) {
            div.header {
                h3 { (topic.title) }
                p.kichua { (topic.title_kichua) }
                @if explored {
                    span.badge { "Explorado" }
                }
            }
            p.description { (topic.description) }
            div.footer {
                span { (topic.vocabulary.len()) " conceptos" }
                (action_button("ExploreTopic", "Explorar", &[("id", topic.id.as_str())]))
            }
        }
    }
}

fn educational(app: &App) -> Markup {
    html! {
        div.educational {
            h1 { "Academia Intercultural" }
            @for article in &app.catalog().articles {
                article id=(article.id) {
                    h2 { (article.title) }
                    p.subtitle { (article.subtitle) }
                    div.rich-text {
                        (PreEscaped(markdown_to_html(&article.body)))
                    }
                }
            }
        }
    }
}

fn vocabulary_list(vocabulary: &[VocabularyEntry]) -> Markup {
    html! {
        ul.vocabulary {
            @for entry in vocabulary {
                li {
                    span.term { (entry.term) }
                    span.translation { (entry.translation) }
                    span.note { (entry.note) }
                }
            }
        }
    }
}

fn lesson_player(session: &LessonSession) -> Markup {
    let lesson = session.lesson();
    let total = lesson.total_steps();
    let current = session.step_number();
    let step_percent = percent(current, total);
    let content = match session.step() {
        LessonStep::Intro => html! {
            div.card.intro {
                h2 { (lesson.title) }
                p.kichua { (lesson.title_kichua) }
                p { (lesson.description) }
                div.context {
                    p.label { "Contexto Cultural" }
                    p { (lesson.cultural_context) }
                }
                (action_button("Begin", "Comenzar Lección", &[]))
            }
        },
        LessonStep::Vocabulary { index } => {
            let entry = &lesson.vocabulary[*index];
            let last = *index + 1 == lesson.vocabulary.len();
            let label = if last { "Ir a Ejercicios" } else { "Siguiente Palabra" };
            html! {
                div.card.word {
                    p.counter { "Palabra " (index + 1) " de " (lesson.vocabulary.len()) }
                    h2.term { (entry.term) }
                    p.translation { (entry.translation) }
                    p.note { (entry.note) }
                    (action_button("NextWord", label, &[]))
                }
            }
        }
        LessonStep::Exercise {
            index,
            selected,
            checked,
        } => {
            let exercise = &lesson.exercises[*index];
            let last = *index + 1 == lesson.exercises.len();
            let next_label = if last { "Completar Lección" } else { "Siguiente Pregunta" };
            html! {
                div.card.exercise {
                    p.counter { "Pregunta " (index + 1) " de " (lesson.exercises.len()) }
                    h3 { (exercise.question) }
                    div.options {
                        @for option in &exercise.options {
                            @let is_selected = selected.as_deref() == Some(option.as_str());
                            form action="/" method="post" {
                                input type="hidden" name="answer" value=(option);
                                button.option.selected[is_selected] type="submit" name="action" value="SelectAnswer" disabled[*checked] {
                                    (option)
                                }
                            }
                        }
                    }
                    @if *checked {
                        @let correct = selected.as_deref().is_some_and(|a| exercise.is_correct(a));
                        div.feedback.correct[correct] {
                            p.verdict { @if correct { "¡Correcto!" } @else { "Incorrecto" } }
                            p { (exercise.explanation) }
                        }
                        (action_button("NextQuestion", next_label, &[]))
                    } @else {
                        form action="/" method="post" {
                            button type="submit" name="action" value="CheckAnswer" disabled[selected.is_none()] {
                                "Verificar Respuesta"
                            }
                        }
                    }
                }
            }
        }
        LessonStep::Completed => html! {
            div.card.completed {
                h2 { "¡Lección Completada!" }
                p { "Has terminado \"" (lesson.title) "\"" }
                p.score {
                    "Respuestas correctas: " (session.correct_answers()) " de " (lesson.exercises.len())
                }
                div.actions {
                    (action_button("Restart", "Repetir Lección", &[]))
                    (action_button("Finish", "Continuar", &[]))
                }
            }
        },
    };
    html! {
        div.player {
            div.player-header {
                (action_button("Back", "← Volver", &[]))
                div.step-progress {
                    span { "Progreso de la lección" }
                    span { (current) " de " (total) }
                    (progress_bar(step_percent))
                }
            }
            (content)
        }
    }
}

fn performance_player(session: &PerformanceSession) -> Markup {
    let lesson = session.lesson();
    let music = lesson.kind == LessonKind::Music;
    let play_label = if music { "Reproducir Música" } else { "Iniciar Danza" };
    let content = match session.step() {
        PerformanceStep::Intro => html! {
            div.card.intro {
                h2 { (lesson.title) }
                p.kichua { (lesson.title_kichua) }
                p { (lesson.description) }
                div.context {
                    p.label { "Contexto Cultural" }
                    p { (lesson.cultural_context) }
                }
                (action_button("NextStep", "Comenzar", &[]))
            }
        },
        PerformanceStep::Theory => html! {
            div.card.theory {
                h2 { @if music { "Fundamentos Musicales" } @else { "Elementos de la Danza" } }
                ol.sections {
                    @for section in &lesson.sections {
                        li {
                            h3 { (section.title) }
                            p { (section.description) }
                            p.detail { (section.detail) }
                        }
                    }
                }
                (action_button("NextStep", "Practicar", &[]))
            }
        },
        PerformanceStep::Practice => html! {
            div.card.practice {
                h2 { "Práctica" }
                @if session.is_playing() {
                    p.playing {
                        @if music { "🎵 Reproduciendo..." } @else { "💃 Siguiendo el ritmo..." }
                    }
                    (action_button("TogglePlayback", "Detener", &[]))
                } @else {
                    (action_button("TogglePlayback", play_label, &[]))
                }
                (vocabulary_list(&lesson.vocabulary))
                (action_button("NextStep", "Completar Práctica", &[]))
            }
        },
        PerformanceStep::Completed => html! {
            div.card.completed {
                h2 { "¡Lección Completada!" }
                p {
                    "Has completado exitosamente la lección de "
                    @if music { "música" } @else { "danza" }
                    " andina"
                }
                p { (lesson.vocabulary.len()) " palabras" }
                (action_button("Finish", "Continuar", &[]))
            }
        },
    };
    html! {
        div.player {
            div.player-header {
                (action_button("Back", "← Volver", &[]))
                span.badge.kind { (lesson.kind.label()) }
            }
            (content)
        }
    }
}

fn topic_detail(app: &App, topic: &Topic) -> Markup {
    let explored = app.explored_topics().contains(&topic.id);
    html! {
        div.topic-detail {
            div.player-header {
                (action_button("Back", "← Volver al Explorador", &[]))
                span class=(format!("badge {}", topic.category.css_class())) {
                    (topic.category.label())
                }
            }
            div.card {
                h1 { (topic.title) }
                p.kichua { (topic.title_kichua) }
                p.description { (PreEscaped(markdown_to_html_inline(&topic.description))) }
                div.rich-text {
                    (PreEscaped(markdown_to_html(&topic.content)))
                }
                h2 { "Vocabulario" }
                (vocabulary_list(&topic.vocabulary))
                @if explored {
                    p.status { "✓ Tema explorado" }
                } @else {
                    (action_button("MarkExplored", "Marcar como Explorado", &[]))
                }
            }
        }
    }
}
