// templates/pages/home.rs

use crate::templates::{card, desktop_layout, lookup_form};
use maud::{html, Markup};

pub fn home_page(default_top_n: usize) -> Markup {
    desktop_layout(
        "Lookup",
        html! {
            h1 { "Philly Property Assessment Explorer" }

            (card("Property Lookup", lookup_form("", default_top_n)))

            p class="hint" {
                "Enter a street address exactly as assessed. If only part of an address "
                "matches, you'll be offered the full addresses to choose from."
            }
        },
    )
}
