// src/commands.rs
use crate::config::ModelArgs;
use crate::db::connection::Database;
use crate::db::import::import_dataset;
use crate::db::store::PropertyStore;
use crate::domain::matches::MatchSet;
use crate::errors::ServerError;
use crate::lookup::resolver::resolve_candidate_names;
use crate::lookup::{find_matches, LookupOutcome, LookupRequest};
use crate::responses::error_to_response;
use crate::router::{handle, AppContext};
use crate::spreadsheets::build_matches_workbook;
use crate::templates::components::{fmt_money, fmt_plain, fmt_score};
use astra::Server;
use std::fmt::Write as _;
use std::fs;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use tracing::{error, info};

pub fn serve(
    db: Database,
    model: &ModelArgs,
    bind: SocketAddr,
    workers: usize,
) -> Result<(), ServerError> {
    db.check()?;

    let ctx = AppContext {
        store: db,
        ranker: model.ranker(),
        default_top_n: model.top_n(),
    };

    info!(%bind, workers, db = ctx.store.path(), "starting server");
    let server = Server::bind(&bind).max_workers(workers);

    server
        .serve(move |req, _info| match handle(req, &ctx) {
            Ok(resp) => resp,
            Err(err) => error_to_response(err),
        })
        .map_err(|e| {
            error!(error = %e, "server ended with error");
            ServerError::InternalError
        })?;

    info!("server shut down cleanly");
    Ok(())
}

pub fn match_address(
    db: Database,
    model: &ModelArgs,
    address: String,
    tracts: Vec<String>,
    json: bool,
    xlsx: Option<PathBuf>,
) -> Result<(), ServerError> {
    db.check()?;

    let mut request = LookupRequest::new(address);
    request.top_n = model.top_n();
    request.extra_tracts = tracts.into_iter().collect();

    let outcome = find_matches(&db, &request, &model.ranker())?;

    if json {
        println!("{}", serde_json::to_string_pretty(&outcome)?);
        return Ok(());
    }

    match &outcome {
        LookupOutcome::Matches(set) => match xlsx {
            Some(path) => write_workbook(set, &path)?,
            None => print!("{}", render_table(set)),
        },
        LookupOutcome::AmbiguousAddress { suggestions } => {
            println!("{}", outcome.message().unwrap_or_default());
            for s in suggestions {
                println!("  {s}");
            }
        }
        other => println!("{}", other.message().unwrap_or_default()),
    }
    Ok(())
}

pub fn suggest(db: Database, fragment: &str) -> Result<(), ServerError> {
    db.check()?;
    for name in resolve_candidate_names(&db, fragment)? {
        println!("{name}");
    }
    Ok(())
}

pub fn history(db: Database, parcel: &str) -> Result<(), ServerError> {
    db.check()?;
    let property = db.property_by_parcel(parcel)?.ok_or(ServerError::NotFound)?;

    println!("{} (parcel {})", property.location, property.parcel_number);
    for a in db.assessments_for_parcel(parcel)? {
        println!("  {}  {:>14}", a.year, fmt_money(a.market_value));
    }
    Ok(())
}

pub fn load(
    db_path: &str,
    schema: &str,
    properties: &Path,
    assessments: Option<&Path>,
) -> Result<(), ServerError> {
    let summary = import_dataset(&Database::writable(db_path), schema, properties, assessments)?;
    println!(
        "Loaded {} properties and {} assessments into {db_path}",
        summary.properties, summary.assessments
    );
    Ok(())
}

fn write_workbook(set: &MatchSet, path: &Path) -> Result<(), ServerError> {
    let buffer = build_matches_workbook(set)?;
    fs::write(path, buffer).map_err(|e| {
        ServerError::XlsxError(format!("Failed to write '{}': {e}", path.display()))
    })?;
    info!(path = %path.display(), rows = set.results.len(), "spreadsheet written");
    Ok(())
}

/// Plain-text table for terminals.
fn render_table(set: &MatchSet) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:>3}  {:<5}  {:>6}  {:<32}  {:<10}  {:>12}  {:>4}  {:>5}",
        "#", "Type", "Score", "Location", "Parcel", "Value", "Beds", "Built"
    );
    for m in &set.results {
        let p = &m.property;
        let _ = writeln!(
            out,
            "{:>3}  {:<5}  {:>6}  {:<32}  {:<10}  {:>12}  {:>4}  {:>5}",
            m.match_num,
            m.match_type.as_str(),
            fmt_score(m.distance),
            p.location,
            p.parcel_number,
            fmt_money(p.market_value),
            fmt_plain(p.features.number_of_bedrooms),
            fmt_plain(p.features.year_built),
        );
    }
    out
}
