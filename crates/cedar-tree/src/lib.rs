//! ID3 decision trees over nominal attributes: induce, prune, evaluate.
//!
//! Trees are grown top-down by information gain, optionally limited by
//! pre-pruning stopping rules and then reduced by reduced-error post-pruning
//! against a held-out validation set. Evaluation uses stratified sampling and
//! stratified k-fold cross-validation, with all randomness drawn from a single
//! caller-supplied source so runs are reproducible for a fixed seed.

mod config;
mod dataset;
mod error;
mod eval;
mod node;
mod predict;
mod prune;
mod sampler;
mod split;
mod tree;

#[cfg(test)]
mod test_support;

pub use config::{PreRules, PruningConfig, PruningMode, RunConfig, StoppingRules};
pub use dataset::{Dataset, Example, MISSING};
pub use error::TreeError;
pub use eval::{EvaluationReport, cross_validate, evaluate, mean_std, train_model};
pub use node::Node;
pub use predict::accuracy;
pub use prune::prune;
pub use sampler::{Fold, stratified_k_fold, stratified_split};
pub use split::{
    BestAttribute, UNKNOWN_LABEL, ValueCounts, best_attribute, conditional_entropy, entropy,
    information_gain, majority_class,
};
pub use tree::{build_id3, grow};
