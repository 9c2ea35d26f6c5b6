pub mod pipeline;
pub mod resolver;
pub mod universe;

pub use pipeline::{find_matches, EmptyUniverseReason, LookupOutcome, LookupRequest};
