use crate::db::store::PropertyStore;
use crate::errors::ServerError;
use crate::lookup::resolver::resolve_candidate_names;
use crate::lookup::{find_matches, LookupOutcome, LookupRequest};
use crate::ranking::Ranker;
use crate::responses::{html_error_response, html_response, json_response, ResultResp};
use crate::spreadsheets::export_matches_xlsx;
use crate::templates::pages::{assessments_page, home_page, matches_page};
use astra::Request;
use std::collections::BTreeSet;
use tracing::debug;

/// Everything a request handler needs. Built once at startup.
pub struct AppContext<S> {
    pub store: S,
    pub ranker: Ranker,
    pub default_top_n: usize,
}

pub fn handle<S: PropertyStore>(req: Request, ctx: &AppContext<S>) -> ResultResp {
    let method = req.method().as_str();
    let path = req.uri().path();
    let params = parse_query(&req);
    debug!(method, path, "request");

    match (method, path) {
        ("GET", "/") => html_response(home_page(ctx.default_top_n)),

        ("GET", "/matches") => {
            let request = lookup_request(&params, ctx.default_top_n)?;
            let outcome = find_matches(&ctx.store, &request, &ctx.ranker)?;
            html_response(matches_page(&request, &outcome))
        }

        ("GET", "/matches.xlsx") => {
            let request = lookup_request(&params, ctx.default_top_n)?;
            match find_matches(&ctx.store, &request, &ctx.ranker)? {
                LookupOutcome::Matches(set) => export_matches_xlsx(&set),
                other => {
                    let msg = other.message().unwrap_or_default();
                    Ok(html_error_response(404, &msg))
                }
            }
        }

        ("GET", "/api/matches") => {
            let request = lookup_request(&params, ctx.default_top_n)?;
            let outcome = find_matches(&ctx.store, &request, &ctx.ranker)?;
            json_response(&outcome)
        }

        ("GET", "/api/suggest") => {
            let fragment = first_param(&params, "q").unwrap_or("");
            let names = resolve_candidate_names(&ctx.store, fragment)?;
            json_response(&names)
        }

        ("GET", "/assessments") => {
            let parcel = first_param(&params, "parcel")
                .filter(|p| !p.trim().is_empty())
                .ok_or_else(|| ServerError::BadRequest("missing 'parcel' parameter".into()))?;
            let property = ctx
                .store
                .property_by_parcel(parcel.trim())?
                .ok_or(ServerError::NotFound)?;
            let history = ctx.store.assessments_for_parcel(&property.parcel_number)?;
            html_response(assessments_page(&property, &history))
        }

        _ => Err(ServerError::NotFound),
    }
}

/// Decoded query pairs, in order. Keys may repeat.
fn parse_query(req: &Request) -> Vec<(String, String)> {
    req.uri()
        .query()
        .map(|q| url::form_urlencoded::parse(q.as_bytes()).into_owned().collect())
        .unwrap_or_default()
}

fn first_param<'a>(params: &'a [(String, String)], key: &str) -> Option<&'a str> {
    params
        .iter()
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.as_str())
}

/// `address`, optional `top_n` (≥ 1) and any number of `tract` values.
fn lookup_request(
    params: &[(String, String)],
    default_top_n: usize,
) -> Result<LookupRequest, ServerError> {
    let address = first_param(params, "address").unwrap_or("");

    let top_n = match first_param(params, "top_n").map(str::trim) {
        None | Some("") => default_top_n,
        Some(raw) => match raw.parse::<usize>() {
            Ok(n) if n > 0 => n,
            _ => {
                return Err(ServerError::BadRequest(format!(
                    "'top_n' must be a positive integer, got '{raw}'"
                )))
            }
        },
    };

    let extra_tracts: BTreeSet<String> = params
        .iter()
        .filter(|(k, v)| k == "tract" && !v.trim().is_empty())
        .map(|(_, v)| v.trim().to_string())
        .collect();

    Ok(LookupRequest {
        address: address.to_string(),
        top_n,
        extra_tracts,
    })
}
