// src/ranking/forest.rs

use crate::ranking::tree::{DecisionTree, TreeParams};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

pub const DEFAULT_TREES: usize = 100;
pub const DEFAULT_SEED: u64 = 354;

#[derive(Debug, Clone, PartialEq)]
pub struct ForestConfig {
    pub n_trees: usize,
    /// Seeds bootstrap draws and feature sampling. Same seed, same scores.
    pub seed: u64,
    pub max_depth: Option<usize>,
}

impl Default for ForestConfig {
    fn default() -> Self {
        Self {
            n_trees: DEFAULT_TREES,
            seed: DEFAULT_SEED,
            max_depth: None,
        }
    }
}

/// Bagged ensemble of Gini trees, each split considering
/// `max(1, floor(sqrt(n_features)))` features.
#[derive(Debug, Clone)]
pub struct RandomForest {
    trees: Vec<DecisionTree>,
}

impl RandomForest {
    pub fn fit(x: &[Vec<f64>], y: &[u8], config: &ForestConfig) -> Self {
        let n = x.len();
        if n == 0 {
            return Self { trees: Vec::new() };
        }

        let n_features = x[0].len();
        let params = TreeParams {
            max_features: ((n_features as f64).sqrt() as usize).max(1),
            max_depth: config.max_depth,
            min_samples_split: 2,
        };

        let mut rng = StdRng::seed_from_u64(config.seed);
        let trees = (0..config.n_trees)
            .map(|_| {
                let mut tree_rng = StdRng::seed_from_u64(rng.gen());
                let sample: Vec<usize> = (0..n).map(|_| tree_rng.gen_range(0..n)).collect();
                DecisionTree::fit(x, y, sample, &params, &mut tree_rng)
            })
            .collect();

        Self { trees }
    }

    /// Mean class-1 probability across trees. 0 for an empty forest.
    pub fn predict_proba(&self, row: &[f64]) -> f64 {
        if self.trees.is_empty() {
            return 0.0;
        }
        let sum: f64 = self.trees.iter().map(|t| t.predict_proba(row)).sum();
        sum / self.trees.len() as f64
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.trees.len()
    }

    #[cfg(test)]
    fn is_empty(&self) -> bool {
        self.trees.is_empty()
    }
}
