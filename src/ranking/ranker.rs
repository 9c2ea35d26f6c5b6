// src/ranking/ranker.rs

use crate::domain::matches::{MatchResult, MatchType};
use crate::domain::property::PropertyRecord;
use crate::ranking::forest::{ForestConfig, RandomForest};
use thiserror::Error;
use tracing::debug;

pub const DEFAULT_TOP_N: usize = 25;

/// The working set cannot train a two-class model.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RankError {
    #[error("insufficient data: the index property is missing one or more comparison features")]
    IndexIncomplete,

    #[error("insufficient data: no candidate has complete comparison features ({dropped} dropped)")]
    NoCompleteCandidates { dropped: usize },
}

/// A record in the working set, labeled 1 for the index property.
#[derive(Debug, Clone)]
struct Labeled<'a> {
    property: &'a PropertyRecord,
    match_ind: u8,
}

/// Index first, then every candidate that is not the index parcel.
///
/// The universe normally excludes the index already; dropping it again here
/// keeps exactly one positive row no matter what the caller passed.
fn working_set<'a>(universe: &'a [PropertyRecord], index: &'a PropertyRecord) -> Vec<Labeled<'a>> {
    std::iter::once(Labeled {
        property: index,
        match_ind: 1,
    })
    .chain(
        universe
            .iter()
            .filter(|p| p.parcel_number != index.parcel_number)
            .map(|property| Labeled {
                property,
                match_ind: 0,
            }),
    )
    .collect()
}

/// Scores candidates by how hard they are to tell apart from the index property.
///
/// A forest is trained per call to separate the index from everything else,
/// on the same rows it then scores. Candidates the model confuses with the
/// index get a high `distance`. Nothing is cached between calls.
#[derive(Debug, Clone, Default)]
pub struct Ranker {
    pub forest: ForestConfig,
}

impl Ranker {
    pub fn new(forest: ForestConfig) -> Self {
        Self { forest }
    }

    pub fn rank(
        &self,
        universe: &[PropertyRecord],
        index: &PropertyRecord,
        top_n: usize,
    ) -> Result<Vec<MatchResult>, RankError> {
        let labeled = working_set(universe, index);
        let total = labeled.len();

        let mut rows = Vec::with_capacity(total);
        let mut x = Vec::with_capacity(total);
        let mut y = Vec::with_capacity(total);
        for rec in labeled {
            if let Some(v) = rec.property.features.to_vector() {
                x.push(v.to_vec());
                y.push(rec.match_ind);
                rows.push(rec);
            }
        }

        let dropped = total - rows.len();
        if y.first() != Some(&1) {
            return Err(RankError::IndexIncomplete);
        }
        if rows.len() < 2 {
            return Err(RankError::NoCompleteCandidates { dropped });
        }
        debug!(
            scored = rows.len(),
            dropped,
            trees = self.forest.n_trees,
            "training similarity model"
        );

        let model = RandomForest::fit(&x, &y, &self.forest);

        let mut scored: Vec<(Labeled<'_>, f64)> = rows
            .into_iter()
            .zip(x.iter())
            .map(|(rec, v)| {
                let distance = model.predict_proba(v);
                (rec, distance)
            })
            .collect();

        // Stable: ties keep working-set order, so the index wins them.
        scored.sort_by(|a, b| b.1.total_cmp(&a.1));
        scored.truncate(top_n);

        Ok(scored
            .into_iter()
            .enumerate()
            .map(|(match_num, (rec, distance))| MatchResult {
                property: rec.property.clone(),
                match_ind: rec.match_ind,
                distance,
                match_type: if rec.match_ind == 1 {
                    MatchType::Input
                } else {
                    MatchType::Match
                },
                match_num,
            })
            .collect())
    }
}
