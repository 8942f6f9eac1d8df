//! Training procedure, stratified k-fold cross-validation, and the full
//! evaluation run.

use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

use crate::config::RunConfig;
use crate::dataset::Dataset;
use crate::error::TreeError;
use crate::node::Node;
use crate::predict::accuracy;
use crate::prune::prune;
use crate::sampler::{stratified_k_fold, stratified_split};
use crate::tree::build_id3;

/// Train one model on `train`.
///
/// With post-pruning in effect, a validation portion of
/// `config.validation_ratio()` is first carved out of `train` by a
/// stratified split drawn from `rng`; the tree is grown on the remainder and
/// then pruned against the carved portion. Otherwise the tree is grown on
/// all of `train` and `rng` is left untouched.
#[instrument(skip_all, fields(n_examples = train.len(), post_pruning = config.post_pruning()))]
pub fn train_model<R: Rng + ?Sized>(train: &Dataset, config: &RunConfig, rng: &mut R) -> Node {
    if !config.post_pruning() {
        return build_id3(train, config, 0);
    }

    let (subtrain, validation) = stratified_split(train, 1.0 - config.validation_ratio(), rng);
    let grown = build_id3(&subtrain, config, 0);
    let n_before = grown.n_nodes();
    let pruned = prune(grown, &validation);
    debug!(
        n_validation = validation.len(),
        n_before,
        n_after = pruned.n_nodes(),
        "reduced-error pruning applied"
    );
    pruned
}

/// Run stratified `k`-fold cross-validation on `train`.
///
/// Each fold trains an independent model through [`train_model`] on its
/// training portion and scores it on its held-out portion. Accuracies are
/// returned in fold order; a fold with an empty held-out portion scores 0.0.
///
/// # Errors
///
/// Returns [`TreeError::InvalidFoldCount`] if `k` < 2.
#[instrument(skip_all, fields(n_folds = k, n_examples = train.len()))]
pub fn cross_validate<R: Rng + ?Sized>(
    train: &Dataset,
    k: usize,
    config: &RunConfig,
    rng: &mut R,
) -> Result<Vec<f64>, TreeError> {
    let folds = stratified_k_fold(train, k, rng)?;
    let mut fold_accuracies = Vec::with_capacity(k);
    for (fold, split) in folds.iter().enumerate() {
        let model = train_model(&split.train, config, rng);
        let fold_accuracy = accuracy(&model, &split.test);
        info!(fold, accuracy = fold_accuracy, "fold completed");
        fold_accuracies.push(fold_accuracy);
    }
    Ok(fold_accuracies)
}

/// Arithmetic mean and sample standard deviation (n - 1 denominator).
///
/// Returns `(0.0, 0.0)` for no values and `(value, 0.0)` for a single value.
/// The single-value mean is kept as the value rather than zeroed, so a
/// one-fold summary still reports that fold's accuracy.
#[must_use]
pub fn mean_std(values: &[f64]) -> (f64, f64) {
    match values {
        [] => (0.0, 0.0),
        [only] => (*only, 0.0),
        _ => {
            let n = values.len() as f64;
            let mean = values.iter().sum::<f64>() / n;
            let variance = values.iter().map(|&v| (v - mean).powi(2)).sum::<f64>() / (n - 1.0);
            (mean, variance.sqrt())
        }
    }
}

/// Results of a full evaluation run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluationReport {
    /// Accuracy of the first model on the training portion.
    pub train_accuracy: f64,
    /// Per-fold cross-validation accuracies, in fold order.
    pub fold_accuracies: Vec<f64>,
    /// Mean of `fold_accuracies`.
    pub mean_accuracy: f64,
    /// Sample standard deviation of `fold_accuracies`.
    pub std_accuracy: f64,
    /// Accuracy of the second model on the test portion.
    pub test_accuracy: f64,
    /// Number of examples in the training portion.
    pub n_train: usize,
    /// Number of examples in the test portion.
    pub n_test: usize,
    /// The second model, the one scored on the test portion.
    pub tree: Node,
}

/// Run the complete evaluation protocol on `dataset`.
///
/// A single [`ChaCha8Rng`] seeded from `config.seed()` drives every random
/// draw, in this order:
///
/// 1. stratified train/test split at `config.train_ratio()`;
/// 2. model 1 via [`train_model`] on the training portion, scored on it;
/// 3. [`cross_validate`] on the training portion with `config.n_folds()`;
/// 4. model 2 via [`train_model`] on the training portion, scored on the
///    test portion.
///
/// Changing this order changes every result after the change.
///
/// # Errors
///
/// | Variant | Condition |
/// |---|---|
/// | [`TreeError::EmptyDataset`] | `dataset` has zero examples |
/// | [`TreeError::InvalidFoldCount`] | `config.n_folds()` < 2 |
/// | [`TreeError::InvalidRatio`] | a ratio outside (0.0, 1.0) |
#[instrument(skip_all, fields(n_examples = dataset.len(), seed = config.seed()))]
pub fn evaluate(dataset: &Dataset, config: &RunConfig) -> Result<EvaluationReport, TreeError> {
    config.validate()?;
    if dataset.is_empty() {
        return Err(TreeError::EmptyDataset);
    }

    let mut rng = ChaCha8Rng::seed_from_u64(config.seed());
    let (train, test) = stratified_split(dataset, config.train_ratio(), &mut rng);

    let model = train_model(&train, config, &mut rng);
    let train_accuracy = accuracy(&model, &train);

    let fold_accuracies = cross_validate(&train, config.n_folds(), config, &mut rng)?;
    let (mean_accuracy, std_accuracy) = mean_std(&fold_accuracies);

    let tree = train_model(&train, config, &mut rng);
    let test_accuracy = accuracy(&tree, &test);

    info!(
        train_accuracy,
        mean_accuracy,
        std_accuracy,
        test_accuracy,
        "evaluation complete"
    );

    Ok(EvaluationReport {
        train_accuracy,
        fold_accuracies,
        mean_accuracy,
        std_accuracy,
        test_accuracy,
        n_train: train.len(),
        n_test: test.len(),
        tree,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PruningMode;
    use crate::test_support::{balanced, weather};

    #[test]
    fn mean_std_edge_cases() {
        assert_eq!(mean_std(&[]), (0.0, 0.0));
        assert_eq!(mean_std(&[0.75]), (0.75, 0.0));
    }

    #[test]
    fn mean_std_uses_sample_deviation() {
        let (mean, std) = mean_std(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]);
        assert!((mean - 5.0).abs() < 1e-12);
        // Population std is 2.0; sample std is sqrt(32 / 7).
        assert!((std - (32.0_f64 / 7.0).sqrt()).abs() < 1e-12);
    }

    #[test]
    fn train_model_without_post_pruning_leaves_rng_alone() {
        let ds = weather();
        let config = RunConfig::new().with_mode(PruningMode::PreOnly);
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let _ = train_model(&ds, &config, &mut rng);
        let mut fresh = ChaCha8Rng::seed_from_u64(42);
        assert_eq!(rng.r#gen::<u64>(), fresh.r#gen::<u64>());
    }

    #[test]
    fn train_model_with_post_pruning_consumes_rng() {
        let ds = weather();
        let config = RunConfig::new().with_mode(PruningMode::PostOnly);
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let _ = train_model(&ds, &config, &mut rng);
        let mut fresh = ChaCha8Rng::seed_from_u64(42);
        assert_ne!(rng.r#gen::<u64>(), fresh.r#gen::<u64>());
    }

    #[test]
    fn disabled_post_toggle_trains_unpruned_tree() {
        let ds = weather();
        let config = RunConfig::new()
            .with_mode(PruningMode::PostOnly)
            .with_post_pruning(false);
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let tree = train_model(&ds, &config, &mut rng);
        assert_eq!(tree, build_id3(&ds, &config, 0));
        let mut fresh = ChaCha8Rng::seed_from_u64(42);
        assert_eq!(rng.r#gen::<u64>(), fresh.r#gen::<u64>());
    }

    #[test]
    fn cross_validate_returns_one_accuracy_per_fold() {
        let ds = balanced(20);
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let accs = cross_validate(&ds, 5, &RunConfig::new(), &mut rng).unwrap();
        assert_eq!(accs.len(), 5);
        assert!(accs.iter().all(|a| (0.0..=1.0).contains(a)));
        // Attribute `a` decides the class, so every fold is perfect.
        assert!(accs.iter().all(|&a| a == 1.0), "accs = {accs:?}");
    }

    #[test]
    fn cross_validate_rejects_single_fold() {
        let ds = balanced(4);
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let err = cross_validate(&ds, 1, &RunConfig::new(), &mut rng).unwrap_err();
        assert!(matches!(err, TreeError::InvalidFoldCount { n_folds: 1 }));
    }

    #[test]
    fn evaluate_reports_consistent_sizes() {
        let ds = balanced(20);
        let report = evaluate(&ds, &RunConfig::new().with_folds(4)).unwrap();
        assert_eq!(report.n_train + report.n_test, 40);
        assert_eq!(report.n_train, 32);
        assert_eq!(report.fold_accuracies.len(), 4);
        assert_eq!(report.test_accuracy, 1.0);
        assert_eq!(report.train_accuracy, 1.0);
    }

    #[test]
    fn evaluate_is_reproducible() {
        let ds = weather();
        let config = RunConfig::new().with_folds(3).with_seed(7);
        let a = evaluate(&ds, &config).unwrap();
        let b = evaluate(&ds, &config).unwrap();
        assert_eq!(a.fold_accuracies, b.fold_accuracies);
        assert_eq!(a.train_accuracy.to_bits(), b.train_accuracy.to_bits());
        assert_eq!(a.test_accuracy.to_bits(), b.test_accuracy.to_bits());
        assert_eq!(a.tree, b.tree);
    }

    #[test]
    fn evaluate_rejects_empty_dataset() {
        let ds = crate::test_support::nominal(&["a"], &[]);
        assert!(matches!(
            evaluate(&ds, &RunConfig::new()),
            Err(TreeError::EmptyDataset)
        ));
    }

    #[test]
    fn evaluate_rejects_bad_ratio() {
        let ds = weather();
        let err = evaluate(&ds, &RunConfig::new().with_train_ratio(1.5)).unwrap_err();
        assert!(matches!(err, TreeError::InvalidRatio { .. }));
    }
}
