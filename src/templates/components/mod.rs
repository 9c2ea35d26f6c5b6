use maud::{html, Markup};
use std::collections::BTreeSet;

pub mod format;

pub use format::{fmt_money, fmt_number, fmt_plain, fmt_score};

pub fn card(title: &str, body: Markup) -> Markup {
    html! {
        section class="card" {
            h2 { (title) }
            div class="card-body" {
                (body)
            }
        }
    }
}

/// A highlighted message for lookups that ended without matches.
pub fn notice(message: &str) -> Markup {
    html! {
        p class="notice" role="status" { (message) }
    }
}

/// Query string for a lookup link, with each value form-encoded.
/// Extra tracts repeat as `tract=` pairs so the linked lookup sees the same universe.
pub fn lookup_href(path: &str, address: &str, top_n: usize, tracts: &BTreeSet<String>) -> String {
    let mut query = url::form_urlencoded::Serializer::new(String::new());
    query
        .append_pair("address", address)
        .append_pair("top_n", &top_n.to_string());
    for tract in tracts {
        query.append_pair("tract", tract);
    }
    format!("{path}?{}", query.finish())
}

pub fn lookup_form(address: &str, top_n: usize) -> Markup {
    html! {
        form action="/matches" method="get" class="lookup-form" {
            label for="address" { "Enter Address" }
            input type="text" id="address" name="address" value=(address)
                placeholder="ex: 123 Market St" required;
            label for="top_n" { "Matches" }
            input type="number" id="top_n" name="top_n" min="1" value=(top_n);
            button type="submit" { "Find Matches" }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_href_repeats_each_tract() {
        let tracts: BTreeSet<String> = ["052".to_string(), "051".to_string()].into();
        assert_eq!(
            lookup_href("/matches.xlsx", "1 LONE RD", 10, &tracts),
            "/matches.xlsx?address=1+LONE+RD&top_n=10&tract=051&tract=052"
        );
    }

    #[test]
    fn lookup_href_without_tracts_has_no_tract_pair() {
        let href = lookup_href("/matches", "12 CAFÉ ST", 25, &BTreeSet::new());
        assert_eq!(href, "/matches?address=12+CAF%C3%89+ST&top_n=25");
    }
}
