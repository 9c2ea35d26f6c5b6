// src/domain/matches.rs

use crate::domain::property::PropertyRecord;
use serde::Serialize;
use std::fmt;

/// Role of a row in a ranked result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum MatchType {
    Input,
    Match,
}

impl MatchType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MatchType::Input => "Input",
            MatchType::Match => "Match",
        }
    }
}

impl fmt::Display for MatchType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A property row as handed to the presentation layer after ranking.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchResult {
    #[serde(flatten)]
    pub property: PropertyRecord,
    /// 1 for the index property, 0 for candidates.
    pub match_ind: u8,
    /// Similarity to the index property in [0, 1]. Higher is closer.
    pub distance: f64,
    #[serde(rename = "type")]
    pub match_type: MatchType,
    /// 0-based position in the ranked output.
    pub match_num: usize,
}

impl MatchResult {
    pub fn is_input(&self) -> bool {
        self.match_ind == 1
    }
}

/// The ranked rows for one lookup, along with the index property they were
/// ranked against. The index may be absent from `results` if it fell outside
/// the requested top N.
#[derive(Debug, Clone, Serialize)]
pub struct MatchSet {
    pub index: PropertyRecord,
    pub results: Vec<MatchResult>,
}

impl MatchSet {
    /// Mean latitude/longitude of the rows that carry coordinates.
    /// Used to center a map over the results.
    pub fn map_center(&self) -> Option<(f64, f64)> {
        let coords: Vec<(f64, f64)> = self
            .results
            .iter()
            .filter_map(|r| Some((r.property.latitude?, r.property.longitude?)))
            .collect();

        if coords.is_empty() {
            return None;
        }

        let n = coords.len() as f64;
        let (lat, lon) = coords
            .iter()
            .fold((0.0, 0.0), |(a, b), (la, lo)| (a + la, b + lo));
        Some((lat / n, lon / n))
    }
}
