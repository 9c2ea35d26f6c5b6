use crate::domain::property::{AssessmentRecord, PropertyRecord};
use crate::templates::components::{fmt_money, fmt_plain};
use crate::templates::{card, desktop_layout};
use maud::{html, Markup};

pub fn assessments_page(property: &PropertyRecord, history: &[AssessmentRecord]) -> Markup {
    desktop_layout(
        "Assessment History",
        html! {
            h1 { "Assessment History" }
            p {
                strong { (property.location) }
                " · parcel " (property.parcel_number)
                " · current value " (fmt_money(property.market_value))
            }

            (card("By Year", html! {
                @if history.is_empty() {
                    p { "No assessments on record for this parcel." }
                } @else {
                    table class="assessments" {
                        thead { tr { th { "Year" } th { "Market Value" } } }
                        tbody {
                            @for a in history {
                                tr {
                                    td { (fmt_plain(Some(a.year as f64))) }
                                    td { (fmt_money(a.market_value)) }
                                }
                            }
                        }
                    }
                }
            }))
        },
    )
}
