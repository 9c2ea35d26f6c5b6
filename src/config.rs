// src/config.rs
use crate::ranking::forest::{DEFAULT_SEED, DEFAULT_TREES};
use crate::ranking::{ForestConfig, Ranker, DEFAULT_TOP_N};
use clap::{Args, Parser, Subcommand};
use std::net::SocketAddr;
use std::path::PathBuf;

/// Comparable-property lookup over a local assessment database.
#[derive(Parser, Debug)]
#[command(name = "comps", version)]
pub struct Cli {
    /// SQLite database holding `properties` and `assessments`
    #[arg(long, env = "COMPS_DB", default_value = "comps.sqlite3", global = true)]
    pub db: String,

    /// Log filter, e.g. "info" or "comps=debug". RUST_LOG wins when set.
    #[arg(long, default_value = "info", global = true)]
    pub log_level: String,

    #[command(flatten)]
    pub model: ModelArgs,

    #[command(subcommand)]
    pub command: Command,
}

/// Similarity model settings shared by every lookup.
#[derive(Args, Debug, Clone)]
pub struct ModelArgs {
    /// Trees in the similarity forest
    #[arg(long, env = "COMPS_TREES", default_value_t = DEFAULT_TREES, global = true)]
    pub trees: usize,

    /// Seed for bootstrap and feature sampling
    #[arg(long, env = "COMPS_SEED", default_value_t = DEFAULT_SEED, global = true)]
    pub seed: u64,

    /// Rows returned per lookup unless a request says otherwise
    #[arg(
        long,
        env = "COMPS_TOP_N",
        default_value_t = DEFAULT_TOP_N as u64,
        value_parser = clap::value_parser!(u64).range(1..),
        global = true
    )]
    pub top_n: u64,
}

impl ModelArgs {
    pub fn ranker(&self) -> Ranker {
        Ranker::new(ForestConfig {
            n_trees: self.trees,
            seed: self.seed,
            ..ForestConfig::default()
        })
    }

    pub fn top_n(&self) -> usize {
        self.top_n as usize
    }
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Serve the lookup pages and JSON/XLSX endpoints
    Serve {
        #[arg(long, env = "COMPS_BIND", default_value = "127.0.0.1:3000")]
        bind: SocketAddr,

        #[arg(long, env = "COMPS_WORKERS", default_value_t = 8)]
        workers: usize,
    },

    /// Find comparable properties for an exact address
    Match {
        address: String,

        /// Also search these census tracts (repeatable)
        #[arg(long = "tract")]
        tracts: Vec<String>,

        /// Print the outcome as JSON instead of a table
        #[arg(long, conflicts_with = "xlsx")]
        json: bool,

        /// Write the matches to a spreadsheet
        #[arg(long)]
        xlsx: Option<PathBuf>,
    },

    /// List addresses containing a fragment
    Suggest { fragment: String },

    /// Show the assessment history of a parcel
    History { parcel: String },

    /// Create the schema and import JSON records
    Load {
        /// JSON array of property records
        #[arg(long)]
        properties: PathBuf,

        /// JSON array of assessment records
        #[arg(long)]
        assessments: Option<PathBuf>,

        #[arg(long, default_value = "sql/schema.sql")]
        schema: String,
    },
}
