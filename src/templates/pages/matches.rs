use crate::domain::matches::{MatchResult, MatchSet};
use crate::lookup::{LookupOutcome, LookupRequest};
use crate::templates::components::{fmt_money, fmt_number, fmt_plain, fmt_score, lookup_href};
use crate::templates::{card, desktop_layout, lookup_form, notice};
use maud::{html, Markup};

pub fn matches_page(request: &LookupRequest, outcome: &LookupOutcome) -> Markup {
    desktop_layout(
        "Matches",
        html! {
            (card("Property Lookup", lookup_form(&request.address, request.top_n)))

            @match outcome {
                LookupOutcome::Matches(set) => (results_section(request, set)),
                LookupOutcome::AmbiguousAddress { suggestions } => {
                    @if let Some(msg) = outcome.message() { (notice(&msg)) }
                    ul class="suggestions" {
                        @for s in suggestions {
                            @let href =
                                lookup_href("/matches", s, request.top_n, &request.extra_tracts);
                            li { a href=(href) { (s) } }
                        }
                    }
                }
                _ => {
                    @if let Some(msg) = outcome.message() { (notice(&msg)) }
                }
            }
        },
    )
}

fn results_section(request: &LookupRequest, set: &MatchSet) -> Markup {
    html! {
        p class="success" { "Address found: " strong { (set.index.location) } }

        h2 { "Matched Properties" }
        p {
            a href=(lookup_href(
                "/matches.xlsx",
                &request.address,
                request.top_n,
                &request.extra_tracts,
            )) {
                "Download as spreadsheet"
            }
            @if let Some((lat, lon)) = set.map_center() {
                " · centered at " (format!("{lat:.5}, {lon:.5}"))
            }
        }

        table class="matches" {
            thead {
                tr {
                    th { "#" }
                    th { "Type" }
                    th { "Similarity" }
                    th { "Location" }
                    th { "Parcel" }
                    th { "Tract" }
                    th { "Market Value" }
                    th { "Beds" }
                    th { "Stories" }
                    th { "Livable Area" }
                    th { "Year Built" }
                }
            }
            tbody {
                @for m in &set.results {
                    (match_row(m))
                }
            }
        }
    }
}

fn history_href(parcel: &str) -> String {
    let parcel: String = url::form_urlencoded::byte_serialize(parcel.as_bytes()).collect();
    format!("/assessments?parcel={parcel}")
}

fn match_row(m: &MatchResult) -> Markup {
    let p = &m.property;
    let f = &p.features;
    html! {
        tr class=[m.is_input().then_some("input-row")] {
            td { (m.match_num) }
            td { (m.match_type.as_str()) }
            td { (fmt_score(m.distance)) }
            td { (p.location) }
            td {
                a href=(history_href(&p.parcel_number)) { (p.parcel_number) }
            }
            td { (p.census_tract.as_deref().unwrap_or("-")) }
            td { (fmt_money(p.market_value)) }
            td { (fmt_plain(f.number_of_bedrooms)) }
            td { (fmt_plain(f.number_stories)) }
            td { (fmt_number(f.total_livable_area)) }
            td { (fmt_plain(f.year_built)) }
        }
    }
}
