// src/lookup/pipeline.rs

use crate::db::store::PropertyStore;
use crate::domain::matches::MatchSet;
use crate::errors::ServerError;
use crate::lookup::resolver::{resolve_candidate_names, resolve_index_property};
use crate::lookup::universe::build_universe;
use crate::ranking::{RankError, Ranker, DEFAULT_TOP_N};
use serde::Serialize;
use std::collections::BTreeSet;
use tracing::{info, warn};

/// One "find matches for address X" request.
#[derive(Debug, Clone)]
pub struct LookupRequest {
    pub address: String,
    pub top_n: usize,
    /// Tracts to search in addition to the index property's own.
    pub extra_tracts: BTreeSet<String>,
}

impl LookupRequest {
    pub fn new(address: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            top_n: DEFAULT_TOP_N,
            extra_tracts: BTreeSet::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EmptyUniverseReason {
    /// The index property has no census tract.
    MissingTract,
    /// No other property shares its tract(s).
    NoCandidates,
}

/// How a lookup ended. Only `Matches` carries rows; every other variant is a
/// normal, user-visible result to be rendered as-is.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum LookupOutcome {
    Matches(MatchSet),
    BlankQuery,
    AddressNotFound,
    /// The address matched locations by substring but none exactly.
    /// The caller should pick one of `suggestions` and look it up again.
    AmbiguousAddress { suggestions: Vec<String> },
    EmptyUniverse { reason: EmptyUniverseReason },
    InsufficientData { detail: String },
}

impl LookupOutcome {
    /// Short message for users, `None` for `Matches`.
    pub fn message(&self) -> Option<String> {
        match self {
            LookupOutcome::Matches(_) => None,
            LookupOutcome::BlankQuery => {
                Some("Please enter an address to search for matches.".into())
            }
            LookupOutcome::AddressNotFound => {
                Some("Address not found. Please enter a valid address.".into())
            }
            LookupOutcome::AmbiguousAddress { suggestions } => Some(format!(
                "No property is at exactly that address. {} similar address(es) found; pick one.",
                suggestions.len()
            )),
            LookupOutcome::EmptyUniverse {
                reason: EmptyUniverseReason::MissingTract,
            } => Some("No census tract is recorded for this address.".into()),
            LookupOutcome::EmptyUniverse {
                reason: EmptyUniverseReason::NoCandidates,
            } => Some("No matching properties found in the specified tracts.".into()),
            LookupOutcome::InsufficientData { detail } => {
                Some(format!("Not enough comparable data to rank matches: {detail}"))
            }
        }
    }
}

/// Runs resolve → universe → rank, stopping at the first empty step.
///
/// `Err` is reserved for storage faults.
pub fn find_matches<S: PropertyStore + ?Sized>(
    store: &S,
    request: &LookupRequest,
    ranker: &Ranker,
) -> Result<LookupOutcome, ServerError> {
    let address = request.address.trim();
    if address.is_empty() {
        return Ok(LookupOutcome::BlankQuery);
    }

    let suggestions = resolve_candidate_names(store, address)?;
    if suggestions.is_empty() {
        info!(address, "address not found");
        return Ok(LookupOutcome::AddressNotFound);
    }

    let Some(index) = resolve_index_property(store, address)? else {
        info!(address, suggestions = suggestions.len(), "no exact location match");
        return Ok(LookupOutcome::AmbiguousAddress { suggestions });
    };

    let Some(tract) = index.census_tract.clone().filter(|t| !t.trim().is_empty()) else {
        warn!(parcel = %index.parcel_number, "index property has no census tract");
        return Ok(LookupOutcome::EmptyUniverse {
            reason: EmptyUniverseReason::MissingTract,
        });
    };

    let mut tracts = request.extra_tracts.clone();
    tracts.insert(tract);

    let universe = build_universe(store, &index, &tracts)?;
    if universe.is_empty() {
        info!(parcel = %index.parcel_number, ?tracts, "empty candidate universe");
        return Ok(LookupOutcome::EmptyUniverse {
            reason: EmptyUniverseReason::NoCandidates,
        });
    }

    let results = match ranker.rank(&universe, &index, request.top_n) {
        Ok(results) => results,
        Err(e @ (RankError::IndexIncomplete | RankError::NoCompleteCandidates { .. })) => {
            warn!(parcel = %index.parcel_number, error = %e, "ranking skipped");
            return Ok(LookupOutcome::InsufficientData {
                detail: e.to_string(),
            });
        }
    };

    info!(
        parcel = %index.parcel_number,
        universe = universe.len(),
        returned = results.len(),
        "lookup complete"
    );
    Ok(LookupOutcome::Matches(MatchSet { index, results }))
}
