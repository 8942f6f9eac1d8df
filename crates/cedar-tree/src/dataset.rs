//! Nominal example and dataset types.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::Arc;

use crate::error::TreeError;

/// Marker stored in place of an unknown attribute value.
pub const MISSING: &str = "?";

/// One labeled example: attribute name to nominal value.
///
/// The class label is stored under the dataset's class attribute like any
/// other value.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Example {
    values: HashMap<String, String>,
}

impl Example {
    /// Create an empty example.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set `attribute` to `value`, replacing any previous value.
    #[must_use]
    pub fn with(mut self, attribute: impl Into<String>, value: impl Into<String>) -> Self {
        self.values.insert(attribute.into(), value.into());
        self
    }

    /// Insert or replace the value of `attribute`.
    pub fn set(&mut self, attribute: impl Into<String>, value: impl Into<String>) {
        self.values.insert(attribute.into(), value.into());
    }

    /// Return the value of `attribute`, if present.
    #[must_use]
    pub fn get(&self, attribute: &str) -> Option<&str> {
        self.values.get(attribute).map(String::as_str)
    }

    /// Return `true` if `attribute` is present and holds the [`MISSING`] marker.
    #[must_use]
    pub fn is_missing(&self, attribute: &str) -> bool {
        self.get(attribute) == Some(MISSING)
    }

    /// Value lookup for attributes whose presence was checked by [`Dataset::new`].
    pub(crate) fn value(&self, attribute: &str) -> &str {
        self.get(attribute).unwrap_or(MISSING)
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Example {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            values: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// An immutable collection of nominal examples.
///
/// Examples are shared behind [`Arc`], so the filtered views produced by
/// splitting, folding, and tree recursion never copy example payloads and
/// never mutate their parent.
#[derive(Debug, Clone)]
pub struct Dataset {
    attributes: Arc<[String]>,
    class_attribute: Arc<str>,
    examples: Vec<Arc<Example>>,
    domains: Arc<BTreeMap<String, Vec<String>>>,
}

impl Dataset {
    /// Create a dataset, checking that every example carries every attribute
    /// and the class attribute.
    ///
    /// `domains` maps attribute names to their declared values. It is
    /// informational only; splitting uses observed values.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`TreeError::DuplicateAttribute`] | an attribute is repeated or equals the class attribute |
    /// | [`TreeError::MissingAttribute`] | an example lacks an attribute or its class label |
    pub fn new(
        attributes: Vec<String>,
        class_attribute: impl Into<String>,
        examples: Vec<Example>,
        domains: BTreeMap<String, Vec<String>>,
    ) -> Result<Self, TreeError> {
        let class_attribute: String = class_attribute.into();

        let mut seen = HashSet::with_capacity(attributes.len());
        for attribute in &attributes {
            if attribute == &class_attribute || !seen.insert(attribute.as_str()) {
                return Err(TreeError::DuplicateAttribute {
                    attribute: attribute.clone(),
                });
            }
        }

        for (example_index, example) in examples.iter().enumerate() {
            let required = attributes.iter().chain(std::iter::once(&class_attribute));
            for attribute in required {
                if example.get(attribute).is_none() {
                    return Err(TreeError::MissingAttribute {
                        example_index,
                        attribute: attribute.clone(),
                    });
                }
            }
        }

        Ok(Self {
            attributes: attributes.into(),
            class_attribute: class_attribute.into(),
            examples: examples.into_iter().map(Arc::new).collect(),
            domains: Arc::new(domains),
        })
    }

    /// A dataset sharing this one's schema with a different example sequence.
    pub(crate) fn with_examples(&self, examples: Vec<Arc<Example>>) -> Self {
        Self {
            attributes: Arc::clone(&self.attributes),
            class_attribute: Arc::clone(&self.class_attribute),
            examples,
            domains: Arc::clone(&self.domains),
        }
    }

    /// A dataset over `examples` whose attribute list omits `attribute`.
    pub(crate) fn without_attribute(&self, attribute: &str, examples: Vec<Arc<Example>>) -> Self {
        let attributes: Vec<String> = self
            .attributes
            .iter()
            .filter(|a| a.as_str() != attribute)
            .cloned()
            .collect();
        Self {
            attributes: attributes.into(),
            class_attribute: Arc::clone(&self.class_attribute),
            examples,
            domains: Arc::clone(&self.domains),
        }
    }

    /// Return the candidate attributes, in dataset order.
    #[must_use]
    pub fn attributes(&self) -> &[String] {
        &self.attributes
    }

    /// Return the name of the class attribute.
    #[must_use]
    pub fn class_attribute(&self) -> &str {
        &self.class_attribute
    }

    /// Return the examples.
    #[must_use]
    pub fn examples(&self) -> &[Arc<Example>] {
        &self.examples
    }

    /// Return the declared value domains.
    #[must_use]
    pub fn domains(&self) -> &BTreeMap<String, Vec<String>> {
        &self.domains
    }

    /// Return the number of examples.
    #[must_use]
    pub fn len(&self) -> usize {
        self.examples.len()
    }

    /// Return `true` if the dataset holds no examples.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.examples.is_empty()
    }

    /// Return the class label of `example`.
    #[must_use]
    pub fn label_of<'a>(&self, example: &'a Example) -> &'a str {
        example.value(&self.class_attribute)
    }

    /// Group example handles by class label, classes in first-seen order.
    pub(crate) fn group_by_class(&self) -> Vec<Vec<Arc<Example>>> {
        group_by(&self.examples, &self.class_attribute)
            .into_iter()
            .map(|(_, group)| group)
            .collect()
    }
}

/// Partition `examples` by the value of `attribute`, groups in first-seen order.
pub(crate) fn group_by(examples: &[Arc<Example>], attribute: &str) -> Vec<(String, Vec<Arc<Example>>)> {
    let mut positions: HashMap<&str, usize> = HashMap::new();
    let mut groups: Vec<(String, Vec<Arc<Example>>)> = Vec::new();
    for example in examples {
        let value = example.value(attribute);
        match positions.get(value) {
            Some(&pos) => groups[pos].1.push(Arc::clone(example)),
            None => {
                positions.insert(value, groups.len());
                groups.push((value.to_string(), vec![Arc::clone(example)]));
            }
        }
    }
    groups
}

#[cfg(test)]
mod tests {
    use super::*;

    fn attrs(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn new_accepts_complete_examples() {
        let ds = Dataset::new(
            attrs(&["a", "b"]),
            "class",
            vec![
                Example::new().with("a", "x").with("b", "p").with("class", "yes"),
                Example::new().with("a", "y").with("b", "q").with("class", "no"),
            ],
            BTreeMap::new(),
        )
        .unwrap();
        assert_eq!(ds.len(), 2);
        assert_eq!(ds.attributes(), &["a".to_string(), "b".to_string()]);
        assert_eq!(ds.label_of(&ds.examples()[1]), "no");
    }

    #[test]
    fn missing_attribute_is_rejected() {
        let err = Dataset::new(
            attrs(&["a", "b"]),
            "class",
            vec![
                Example::new().with("a", "x").with("b", "p").with("class", "yes"),
                Example::new().with("a", "y").with("class", "no"),
            ],
            BTreeMap::new(),
        )
        .unwrap_err();
        assert!(matches!(
            err,
            TreeError::MissingAttribute { example_index: 1, ref attribute } if attribute == "b"
        ));
    }

    #[test]
    fn missing_class_label_is_rejected() {
        let err = Dataset::new(
            attrs(&["a"]),
            "class",
            vec![Example::new().with("a", "x")],
            BTreeMap::new(),
        )
        .unwrap_err();
        assert!(matches!(err, TreeError::MissingAttribute { example_index: 0, .. }));
    }

    #[test]
    fn class_attribute_in_attribute_list_is_rejected() {
        let err = Dataset::new(attrs(&["a", "class"]), "class", vec![], BTreeMap::new())
            .unwrap_err();
        assert!(matches!(err, TreeError::DuplicateAttribute { .. }));
    }

    #[test]
    fn missing_marker_counts_as_present() {
        let example = Example::new().with("a", MISSING).with("class", "yes");
        assert!(example.is_missing("a"));
        assert!(!example.is_missing("class"));
        let ds = Dataset::new(attrs(&["a"]), "class", vec![example], BTreeMap::new());
        assert!(ds.is_ok());
    }

    #[test]
    fn group_by_keeps_first_seen_order() {
        let examples: Vec<Arc<Example>> = ["q", "p", "q", "r"]
            .iter()
            .map(|v| Arc::new(Example::new().with("a", *v)))
            .collect();
        let groups = group_by(&examples, "a");
        let keys: Vec<&str> = groups.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, vec!["q", "p", "r"]);
        assert_eq!(groups[0].1.len(), 2);
    }

    #[test]
    fn without_attribute_leaves_parent_untouched() {
        let ds = Dataset::new(attrs(&["a", "b"]), "class", vec![], BTreeMap::new()).unwrap();
        let reduced = ds.without_attribute("a", Vec::new());
        assert_eq!(reduced.attributes(), &["b".to_string()]);
        assert_eq!(ds.attributes().len(), 2);
    }
}
