// src/ranking/tree.rs

use rand::seq::SliceRandom;
use rand::Rng;

#[derive(Debug, Clone)]
enum Node {
    Leaf {
        /// Share of class-1 samples that reached this leaf.
        proba: f64,
    },
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
}

#[derive(Debug, Clone)]
pub struct TreeParams {
    /// Non-constant features examined per split.
    pub max_features: usize,
    pub max_depth: Option<usize>,
    pub min_samples_split: usize,
}

impl Default for TreeParams {
    fn default() -> Self {
        Self {
            max_features: usize::MAX,
            max_depth: None,
            min_samples_split: 2,
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct BestSplit {
    feature: usize,
    threshold: f64,
    impurity: f64,
}

/// Binary classification tree split on Gini impurity.
#[derive(Debug, Clone)]
pub struct DecisionTree {
    nodes: Vec<Node>,
}

fn gini(pos: usize, n: usize) -> f64 {
    if n == 0 {
        return 0.0;
    }
    let p = pos as f64 / n as f64;
    2.0 * p * (1.0 - p)
}

impl DecisionTree {
    /// Grows a tree on the rows of `x` listed in `sample`.
    /// `sample` may repeat rows (bootstrap draws); repeats count as weight.
    pub fn fit<R: Rng + ?Sized>(
        x: &[Vec<f64>],
        y: &[u8],
        sample: Vec<usize>,
        params: &TreeParams,
        rng: &mut R,
    ) -> Self {
        let n_features = x.first().map(Vec::len).unwrap_or(0);
        let mut nodes = vec![Node::Leaf { proba: 0.0 }];
        let mut stack = vec![(0usize, sample, 0usize)];

        while let Some((idx, samples, depth)) = stack.pop() {
            let n = samples.len();
            let pos = samples.iter().filter(|&&i| y[i] == 1).count();
            let proba = if n == 0 { 0.0 } else { pos as f64 / n as f64 };

            let stop = pos == 0
                || pos == n
                || n < params.min_samples_split
                || params.max_depth.is_some_and(|d| depth >= d);
            if stop {
                nodes[idx] = Node::Leaf { proba };
                continue;
            }

            let Some(split) = find_split(x, y, &samples, n_features, params.max_features, rng)
            else {
                // Every feature is constant over these samples.
                nodes[idx] = Node::Leaf { proba };
                continue;
            };

            let (left_samples, right_samples): (Vec<usize>, Vec<usize>) = samples
                .into_iter()
                .partition(|&i| x[i][split.feature] <= split.threshold);

            let left = nodes.len();
            nodes.push(Node::Leaf { proba: 0.0 });
            let right = nodes.len();
            nodes.push(Node::Leaf { proba: 0.0 });

            nodes[idx] = Node::Split {
                feature: split.feature,
                threshold: split.threshold,
                left,
                right,
            };
            stack.push((left, left_samples, depth + 1));
            stack.push((right, right_samples, depth + 1));
        }

        Self { nodes }
    }

    /// Class-1 probability of the leaf `row` lands in.
    pub fn predict_proba(&self, row: &[f64]) -> f64 {
        let mut idx = 0;
        loop {
            match &self.nodes[idx] {
                Node::Leaf { proba } => return *proba,
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    idx = if row[*feature] <= *threshold {
                        *left
                    } else {
                        *right
                    };
                }
            }
        }
    }

    #[cfg(test)]
    fn node_count(&self) -> usize {
        self.nodes.len()
    }
}

/// Lowest weighted-Gini split over a random subset of features.
///
/// Features are visited in random order. Constant features are skipped and do
/// not count toward `max_features`, so a split is always found while any
/// feature still varies.
fn find_split<R: Rng + ?Sized>(
    x: &[Vec<f64>],
    y: &[u8],
    samples: &[usize],
    n_features: usize,
    max_features: usize,
    rng: &mut R,
) -> Option<BestSplit> {
    let n = samples.len();
    let total_pos = samples.iter().filter(|&&i| y[i] == 1).count();

    let mut features: Vec<usize> = (0..n_features).collect();
    features.shuffle(rng);

    let mut best: Option<BestSplit> = None;
    let mut visited = 0;
    let mut column: Vec<(f64, u8)> = Vec::with_capacity(n);

    for feature in features {
        if visited >= max_features {
            break;
        }

        column.clear();
        column.extend(samples.iter().map(|&i| (x[i][feature], y[i])));
        column.sort_by(|a, b| a.0.total_cmp(&b.0));

        if column[0].0 == column[n - 1].0 {
            continue;
        }
        visited += 1;

        let mut left_n = 0;
        let mut left_pos = 0;
        for k in 0..n - 1 {
            left_n += 1;
            left_pos += column[k].1 as usize;

            let (lo, hi) = (column[k].0, column[k + 1].0);
            if lo == hi {
                continue;
            }

            let right_n = n - left_n;
            let right_pos = total_pos - left_pos;
            let impurity = (left_n as f64 * gini(left_pos, left_n)
                + right_n as f64 * gini(right_pos, right_n))
                / n as f64;

            if best.map_or(true, |b| impurity < b.impurity) {
                let mut threshold = lo + (hi - lo) / 2.0;
                if threshold >= hi {
                    threshold = lo;
                }
                best = Some(BestSplit {
                    feature,
                    threshold,
                    impurity,
                });
            }
        }
    }

    best
}
