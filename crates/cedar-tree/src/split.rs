use std::sync::Arc;

use crate::dataset::{Example, group_by};

/// Label returned as the majority of an empty example set.
pub const UNKNOWN_LABEL: &str = "<unknown>";

/// Occurrence counts of nominal values, kept in first-seen order.
///
/// The order matters: [`ValueCounts::majority`] breaks ties in favour of
/// the value that was encountered first.
#[derive(Debug, Clone, Default)]
pub struct ValueCounts<'a> {
    counts: Vec<(&'a str, usize)>,
    total: usize,
}

impl<'a> ValueCounts<'a> {
    /// Create an empty counter.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one occurrence of `value`.
    pub fn add(&mut self, value: &'a str) {
        self.total += 1;
        match self.counts.iter_mut().find(|(v, _)| *v == value) {
            Some((_, n)) => *n += 1,
            None => self.counts.push((value, 1)),
        }
    }

    /// Return the total number of occurrences counted.
    #[must_use]
    pub fn total(&self) -> usize {
        self.total
    }

    /// Return the number of distinct values.
    #[must_use]
    pub fn n_distinct(&self) -> usize {
        self.counts.len()
    }

    /// Return the most frequent value, or `None` if nothing was counted.
    ///
    /// Single linear scan with a strict `>` against the running best, so
    /// the first-seen value wins ties.
    #[must_use]
    pub fn majority(&self) -> Option<&'a str> {
        let mut best: Option<(&'a str, usize)> = None;
        for &(value, n) in &self.counts {
            if best.is_none_or(|(_, best_n)| n > best_n) {
                best = Some((value, n));
            }
        }
        best.map(|(value, _)| value)
    }

    /// Shannon entropy of the counted distribution, in bits.
    ///
    /// Returns 0.0 when nothing was counted.
    #[must_use]
    pub fn entropy(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        let n = self.total as f64;
        -self
            .counts
            .iter()
            .filter(|&&(_, c)| c > 0)
            .map(|&(_, c)| {
                let p = c as f64 / n;
                p * p.log2()
            })
            .sum::<f64>()
    }
}

/// Count the class labels of `examples`.
pub(crate) fn class_counts<'a>(examples: &'a [Arc<Example>], class_attribute: &str) -> ValueCounts<'a> {
    let mut counts = ValueCounts::new();
    for example in examples {
        counts.add(example.value(class_attribute));
    }
    counts
}

/// Return `true` if `attribute` takes more than one value across `examples`.
pub(crate) fn separates(examples: &[Arc<Example>], attribute: &str) -> bool {
    let mut values = examples.iter().map(|example| example.value(attribute));
    match values.next() {
        Some(first) => values.any(|value| value != first),
        None => false,
    }
}

/// Majority class label of `examples`, or [`UNKNOWN_LABEL`] when empty.
#[must_use]
pub fn majority_class(examples: &[Arc<Example>], class_attribute: &str) -> String {
    class_counts(examples, class_attribute)
        .majority()
        .unwrap_or(UNKNOWN_LABEL)
        .to_string()
}

/// Entropy of the class-label distribution of `examples`, in bits.
#[must_use]
pub fn entropy(examples: &[Arc<Example>], class_attribute: &str) -> f64 {
    class_counts(examples, class_attribute).entropy()
}

/// Entropy remaining after partitioning `examples` by `attribute`.
///
/// Each partition's entropy is weighted by its share of `examples`.
#[must_use]
pub fn conditional_entropy(examples: &[Arc<Example>], attribute: &str, class_attribute: &str) -> f64 {
    if examples.is_empty() {
        return 0.0;
    }
    let n = examples.len() as f64;
    group_by(examples, attribute)
        .iter()
        .filter(|(_, subset)| !subset.is_empty())
        .map(|(_, subset)| subset.len() as f64 / n * entropy(subset, class_attribute))
        .sum()
}

/// Reduction in class entropy achieved by partitioning on `attribute`.
#[must_use]
pub fn information_gain(examples: &[Arc<Example>], attribute: &str, class_attribute: &str) -> f64 {
    entropy(examples, class_attribute) - conditional_entropy(examples, attribute, class_attribute)
}

/// The attribute chosen for a split and its information gain.
#[derive(Debug, Clone, PartialEq)]
pub struct BestAttribute<'a> {
    /// Name of the chosen attribute.
    pub attribute: &'a str,
    /// Its information gain in bits.
    pub gain: f64,
}

/// Pick the attribute with the greatest information gain.
///
/// Candidates are scanned in `attributes` order against a running best with
/// a strict `>`, so the earliest attribute wins ties. Returns `None` only
/// when `attributes` is empty.
#[must_use]
pub fn best_attribute<'a>(
    examples: &[Arc<Example>],
    attributes: &'a [String],
    class_attribute: &str,
) -> Option<BestAttribute<'a>> {
    let base = entropy(examples, class_attribute);
    let mut best: Option<BestAttribute<'a>> = None;
    for attribute in attributes {
        let gain = base - conditional_entropy(examples, attribute, class_attribute);
        if best.as_ref().is_none_or(|b| gain > b.gain) {
            best = Some(BestAttribute {
                attribute: attribute.as_str(),
                gain,
            });
        }
    }
    best
}
