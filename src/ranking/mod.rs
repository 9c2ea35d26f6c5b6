pub mod forest;
pub mod ranker;
pub mod tree;

pub use forest::{ForestConfig, RandomForest};
pub use ranker::{RankError, Ranker, DEFAULT_TOP_N};
