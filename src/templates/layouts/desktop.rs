use maud::{html, Markup, PreEscaped, DOCTYPE};

const STYLESHEET: &str = include_str!("../../../static/main.css");

pub fn desktop_layout(title: &str, content: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (title) " · Property Comps" }
                style { (PreEscaped(STYLESHEET)) }
            }
            body {
                header class="flex items-center justify-between px-6 py-3 shadow" {
                    h3 { "Property Assessment Explorer" }
                    nav {
                        ul {
                            li { a href="/" { "Lookup" } }
                        }
                    }
                }
                main class="container" {
                    (content)
                }
            }
        }
    }
}
