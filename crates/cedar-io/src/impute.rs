//! Missing-value imputation.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use cedar_tree::{Dataset, Example, ValueCounts};
use tracing::{debug, info, instrument};

use crate::IoError;

/// How missing attribute values are treated before training.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MissingPolicy {
    /// Replace each missing value by the most frequent value of that
    /// attribute among examples of the same class, falling back to the
    /// attribute's most frequent value overall.
    #[default]
    ModeByClass,
    /// Leave the missing marker in place as an ordinary nominal value.
    Keep,
}

impl MissingPolicy {
    /// Return the policy identifier used on the command line.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            MissingPolicy::ModeByClass => "mode_by_class",
            MissingPolicy::Keep => "keep",
        }
    }
}

impl fmt::Display for MissingPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MissingPolicy {
    type Err = IoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "mode_by_class" => Ok(MissingPolicy::ModeByClass),
            "keep" => Ok(MissingPolicy::Keep),
            other => Err(IoError::UnknownMissingPolicy {
                name: other.to_string(),
            }),
        }
    }
}

/// Return a copy of `dataset` with missing values treated per `policy`.
///
/// Under [`MissingPolicy::ModeByClass`], counts are taken over non-missing
/// values only and ties go to the value encountered first. An attribute
/// with no observed value anywhere stays missing. Class labels are never
/// imputed. `dataset` itself is left untouched.
///
/// # Errors
///
/// Returns [`IoError::Dataset`] if the rebuilt dataset fails validation,
/// which cannot happen for a dataset that was valid on input.
#[instrument(skip_all, fields(policy = %policy, n_examples = dataset.len()))]
pub fn impute(dataset: &Dataset, policy: MissingPolicy) -> Result<Dataset, IoError> {
    if policy == MissingPolicy::Keep {
        return Ok(dataset.clone());
    }

    let attributes = dataset.attributes();
    let modes = AttributeModes::collect(dataset);

    let mut n_imputed = 0usize;
    let examples: Vec<Example> = dataset
        .examples()
        .iter()
        .map(|example| {
            let label = dataset.label_of(example);
            let mut filled = Example::clone(example);
            for (index, attribute) in attributes.iter().enumerate() {
                if !example.is_missing(attribute) {
                    continue;
                }
                if let Some(value) = modes.lookup(label, index) {
                    filled.set(attribute.as_str(), value);
                    n_imputed += 1;
                }
            }
            filled
        })
        .collect();

    let imputed = Dataset::new(
        attributes.to_vec(),
        dataset.class_attribute(),
        examples,
        dataset.domains().clone(),
    )?;
    info!(n_imputed, "missing values imputed");
    Ok(imputed)
}

/// Per-class and global value counts for every attribute.
struct AttributeModes<'a> {
    by_class: HashMap<&'a str, Vec<ValueCounts<'a>>>,
    global: Vec<ValueCounts<'a>>,
}

impl<'a> AttributeModes<'a> {
    fn collect(dataset: &'a Dataset) -> Self {
        let attributes = dataset.attributes();
        let mut by_class: HashMap<&'a str, Vec<ValueCounts<'a>>> = HashMap::new();
        let mut global = vec![ValueCounts::new(); attributes.len()];

        for example in dataset.examples() {
            let per_class = by_class
                .entry(dataset.label_of(example))
                .or_insert_with(|| vec![ValueCounts::new(); attributes.len()]);
            for (index, attribute) in attributes.iter().enumerate() {
                let Some(value) = example.get(attribute) else {
                    continue;
                };
                if example.is_missing(attribute) {
                    continue;
                }
                per_class[index].add(value);
                global[index].add(value);
            }
        }
        debug!(n_classes = by_class.len(), "value counts collected");
        Self { by_class, global }
    }

    fn lookup(&self, label: &str, index: usize) -> Option<&'a str> {
        self.by_class
            .get(label)
            .and_then(|counts| counts[index].majority())
            .or_else(|| self.global[index].majority())
    }
}
