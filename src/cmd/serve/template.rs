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

use maud::DOCTYPE;
use maud::Markup;
use maud::html;

use crate::app::Section;

/// Wrap a page body. The navigation bar is shown only on the top-level
/// screens, with `active` highlighted. `refresh_after` reloads the page
/// after that many seconds.
pub fn page_template(active: Option<Section>, refresh_after: Option<u64>, body: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="es" {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1";
                @if let Some(seconds) = refresh_after {
                    meta http-equiv="refresh" content=(seconds);
                }
                title { "yachay" }
                link rel="stylesheet" href="/style.css";
            }
            body {
                header {
                    div.brand {
                        h1 { "Aprendizaje Intercultural" }
                        span.badge { "Universidad Digital" }
                    }
                    @if let Some(active) = active {
                        nav {
                            @for section in Section::ALL {
                                form action="/" method="post" {
                                    input type="hidden" name="section" value=(section.as_str());
                                    button.active[section == active] type="submit" name="action" value="Navigate" {
                                        (section.label())
                                    }
                                }
                            }
                        }
                    }
                }
                main {
                    (body)
                }
                footer {
                    p { "Aprendizaje Intercultural - Preservando la sabiduría ancestral" }
                }
            }
        }
    }
}
