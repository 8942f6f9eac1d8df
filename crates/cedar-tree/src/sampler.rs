//! Stratified train/test splitting and k-fold assignment.
//!
//! Every function draws from a caller-supplied random source. Shuffles are
//! performed class by class in first-seen class order, so the sequence of
//! draws is fixed for a given dataset.

use std::sync::Arc;

use rand::Rng;
use rand::seq::SliceRandom;

use crate::dataset::{Dataset, Example};
use crate::error::TreeError;

/// One cross-validation fold: a training portion and its held-out portion.
#[derive(Debug, Clone)]
pub struct Fold {
    /// Every example not assigned to this fold.
    pub train: Dataset,
    /// The examples assigned to this fold.
    pub test: Dataset,
}

/// Split `dataset` into `(train, test)` with per-class proportion `ratio`.
///
/// Each class is shuffled and cut at `round(class_size * ratio)` (ties to
/// even), clamped into `[1, class_size - 1]` so both sides receive at least
/// one example of every class with two or more members. A class with a
/// single example goes entirely to `train`; such a class is then absent
/// from `test`.
///
/// Classes appear in the outputs in first-seen order.
pub fn stratified_split<R: Rng + ?Sized>(dataset: &Dataset, ratio: f64, rng: &mut R) -> (Dataset, Dataset) {
    let mut train = Vec::with_capacity(dataset.len());
    let mut test = Vec::with_capacity(dataset.len());

    for mut group in dataset.group_by_class() {
        group.shuffle(rng);
        let cut = split_index(group.len(), ratio);
        let held_out = group.split_off(cut);
        train.extend(group);
        test.extend(held_out);
    }

    (dataset.with_examples(train), dataset.with_examples(test))
}

fn split_index(class_size: usize, ratio: f64) -> usize {
    if class_size < 2 {
        return class_size;
    }
    let raw = (class_size as f64 * ratio).round_ties_even();
    // Saturating float-to-int cast: negative ratios land on 0 before clamping.
    (raw as usize).clamp(1, class_size - 1)
}

/// Assign `dataset` to `k` stratified folds.
///
/// Each class is shuffled, then its examples are dealt to folds round-robin.
/// The dealing position carries over from one class to the next, so fold
/// sizes differ by at most one while every fold keeps close to the global
/// class proportions. Fold `i` holds out its own examples and trains on the
/// concatenation of all other folds, in fold order.
///
/// When `k` exceeds the number of examples some folds have an empty test
/// portion.
///
/// # Errors
///
/// Returns [`TreeError::InvalidFoldCount`] if `k` < 2.
pub fn stratified_k_fold<R: Rng + ?Sized>(
    dataset: &Dataset,
    k: usize,
    rng: &mut R,
) -> Result<Vec<Fold>, TreeError> {
    if k < 2 {
        return Err(TreeError::InvalidFoldCount { n_folds: k });
    }

    let mut buckets: Vec<Vec<Arc<Example>>> = vec![Vec::new(); k];
    let mut position = 0usize;
    for mut group in dataset.group_by_class() {
        group.shuffle(rng);
        for example in group {
            buckets[position % k].push(example);
            position += 1;
        }
    }

    let folds = (0..k)
        .map(|i| {
            let train: Vec<Arc<Example>> = buckets
                .iter()
                .enumerate()
                .filter(|&(j, _)| j != i)
                .flat_map(|(_, bucket)| bucket.iter().cloned())
                .collect();
            Fold {
                train: dataset.with_examples(train),
                test: dataset.with_examples(buckets[i].clone()),
            }
        })
        .collect();
    Ok(folds)
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    use super::*;
    use crate::test_support::{balanced, nominal, weather};

    fn class_count(ds: &Dataset, label: &str) -> usize {
        ds.examples().iter().filter(|e| ds.label_of(e) == label).count()
    }

    fn identity(examples: &[Arc<Example>]) -> Vec<usize> {
        let mut ids: Vec<usize> = examples.iter().map(|e| Arc::as_ptr(e) as usize).collect();
        ids.sort_unstable();
        ids
    }

    #[test]
    fn split_preserves_class_proportions() {
        let ds = weather(); // 9 yes, 5 no
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let (train, test) = stratified_split(&ds, 0.8, &mut rng);

        for (label, size) in [("yes", 9usize), ("no", 5usize)] {
            let n_train = class_count(&train, label);
            let n_test = class_count(&test, label);
            assert_eq!(n_train + n_test, size);
            let expected = (size as f64 * 0.8).round() as i64;
            assert!((n_train as i64 - expected).abs() <= 1, "{label}: {n_train}");
        }
    }

    #[test]
    fn split_rounds_half_to_even() {
        // 5 * 0.5 = 2.5 rounds to 2.
        let ds = balanced(5);
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let (train, test) = stratified_split(&ds, 0.5, &mut rng);
        assert_eq!(class_count(&train, "yes"), 2);
        assert_eq!(class_count(&test, "yes"), 3);
    }

    #[test]
    fn split_keeps_both_sides_non_empty() {
        let ds = balanced(3);
        let mut rng = ChaCha8Rng::seed_from_u64(7);

        let (train, test) = stratified_split(&ds, 0.99, &mut rng);
        assert_eq!(class_count(&test, "yes"), 1);
        assert_eq!(class_count(&train, "yes"), 2);

        let (train, test) = stratified_split(&ds, 0.01, &mut rng);
        assert_eq!(class_count(&train, "no"), 1);
        assert_eq!(class_count(&test, "no"), 2);
    }

    #[test]
    fn singleton_class_goes_to_train() {
        let ds = nominal(
            &["a"],
            &[&["x", "yes"], &["y", "yes"], &["z", "yes"], &["x", "rare"]],
        );
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let (train, test) = stratified_split(&ds, 0.5, &mut rng);
        assert_eq!(class_count(&train, "rare"), 1);
        assert_eq!(class_count(&test, "rare"), 0);
    }

    #[test]
    fn split_partitions_without_overlap() {
        let ds = weather();
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let (train, test) = stratified_split(&ds, 0.7, &mut rng);
        let mut combined: Vec<Arc<Example>> = train.examples().to_vec();
        combined.extend(test.examples().iter().cloned());
        assert_eq!(identity(&combined), identity(ds.examples()));
    }

    #[test]
    fn split_does_not_touch_parent() {
        let ds = weather();
        let before = identity(ds.examples());
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let _ = stratified_split(&ds, 0.5, &mut rng);
        assert_eq!(ds.len(), 14);
        assert_eq!(identity(ds.examples()), before);
    }

    #[test]
    fn fold_sizes_differ_by_at_most_one() {
        // 7 + 4 examples over 5 folds: a per-class restart would give 3,3,2,2,1.
        let ds = nominal(
            &["a"],
            &[
                &["x", "yes"], &["x", "yes"], &["x", "yes"], &["x", "yes"],
                &["x", "yes"], &["x", "yes"], &["x", "yes"],
                &["y", "no"], &["y", "no"], &["y", "no"], &["y", "no"],
            ],
        );
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let folds = stratified_k_fold(&ds, 5, &mut rng).unwrap();
        let sizes: Vec<usize> = folds.iter().map(|f| f.test.len()).collect();
        let min = sizes.iter().min().copied().unwrap();
        let max = sizes.iter().max().copied().unwrap();
        assert!(max - min <= 1, "sizes = {sizes:?}");
    }

    #[test]
    fn folds_reconstruct_dataset() {
        let ds = weather();
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        let folds = stratified_k_fold(&ds, 4, &mut rng).unwrap();
        assert_eq!(folds.len(), 4);

        let held_out: Vec<Arc<Example>> = folds
            .iter()
            .flat_map(|f| f.test.examples().iter().cloned())
            .collect();
        assert_eq!(identity(&held_out), identity(ds.examples()));

        for fold in &folds {
            assert_eq!(fold.train.len() + fold.test.len(), ds.len());
            let mut all = fold.train.examples().to_vec();
            all.extend(fold.test.examples().iter().cloned());
            assert_eq!(identity(&all), identity(ds.examples()));
        }
    }

    #[test]
    fn folds_are_stratified() {
        let ds = balanced(10);
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let folds = stratified_k_fold(&ds, 5, &mut rng).unwrap();
        let mut per_fold: Vec<HashMap<&str, usize>> = Vec::new();
        for fold in &folds {
            let mut counts = HashMap::new();
            for e in fold.test.examples() {
                *counts.entry(fold.test.label_of(e)).or_insert(0) += 1;
            }
            per_fold.push(counts);
        }
        for counts in per_fold {
            assert_eq!(counts.get("yes"), Some(&2));
            assert_eq!(counts.get("no"), Some(&2));
        }
    }

    #[test]
    fn more_folds_than_examples_leaves_empty_folds() {
        let ds = balanced(1);
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let folds = stratified_k_fold(&ds, 3, &mut rng).unwrap();
        assert_eq!(folds.len(), 3);
        assert!(folds[2].test.is_empty());
        assert_eq!(folds[2].train.len(), 2);
    }

    #[test]
    fn invalid_fold_count() {
        let ds = weather();
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        assert!(matches!(
            stratified_k_fold(&ds, 1, &mut rng),
            Err(TreeError::InvalidFoldCount { n_folds: 1 })
        ));
        assert!(stratified_k_fold(&ds, 0, &mut rng).is_err());
    }

    #[test]
    fn same_seed_same_partition() {
        let ds = weather();
        let order = |seed: u64| {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let (train, _) = stratified_split(&ds, 0.8, &mut rng);
            train
                .examples()
                .iter()
                .map(|e| Arc::as_ptr(e) as usize)
                .collect::<Vec<_>>()
        };
        assert_eq!(order(9), order(9));
    }
}
