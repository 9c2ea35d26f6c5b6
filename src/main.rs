use crate::config::{Cli, Command};
use crate::db::connection::Database;
use clap::Parser;
use tracing::error;
use tracing_subscriber::{filter::EnvFilter, fmt, prelude::*};

mod commands;
mod config;
mod db;
mod domain;
mod errors;
mod lookup;
mod ranking;
mod responses;
mod router;
mod spreadsheets;
mod templates;

#[cfg(test)]
mod tests;

fn main() {
    let cli = Cli::parse();

    // Logs go to stderr so CLI output stays pipeable.
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level));
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    let db = Database::new(cli.db.clone());
    let result = match cli.command {
        Command::Serve { bind, workers } => commands::serve(db, &cli.model, bind, workers),
        Command::Match {
            address,
            tracts,
            json,
            xlsx,
        } => commands::match_address(db, &cli.model, address, tracts, json, xlsx),
        Command::Suggest { fragment } => commands::suggest(db, &fragment),
        Command::History { parcel } => commands::history(db, &parcel),
        Command::Load {
            properties,
            assessments,
            schema,
        } => commands::load(&cli.db, &schema, &properties, assessments.as_deref()),
    };

    if let Err(e) = result {
        error!(error = %e, "❌ command failed");
        eprintln!("❌ {e}");
        std::process::exit(1);
    }
}
