//! Small nominal datasets shared by unit tests.

use std::collections::BTreeMap;

use crate::dataset::{Dataset, Example};

/// Build a dataset whose rows list attribute values followed by the class label.
pub(crate) fn nominal(attributes: &[&str], rows: &[&[&str]]) -> Dataset {
    let examples = rows
        .iter()
        .map(|row| {
            let mut example: Example = attributes
                .iter()
                .zip(row.iter())
                .map(|(a, v)| (*a, *v))
                .collect();
            example.set("class", row[attributes.len()]);
            example
        })
        .collect();
    Dataset::new(
        attributes.iter().map(|a| a.to_string()).collect(),
        "class",
        examples,
        BTreeMap::new(),
    )
    .unwrap()
}

/// Quinlan's 14-day weather data.
pub(crate) fn weather() -> Dataset {
    nominal(
        &["outlook", "temperature", "humidity", "windy"],
        &[
            &["sunny", "hot", "high", "false", "no"],
            &["sunny", "hot", "high", "true", "no"],
            &["overcast", "hot", "high", "false", "yes"],
            &["rainy", "mild", "high", "false", "yes"],
            &["rainy", "cool", "normal", "false", "yes"],
            &["rainy", "cool", "normal", "true", "no"],
            &["overcast", "cool", "normal", "true", "yes"],
            &["sunny", "mild", "high", "false", "no"],
            &["sunny", "cool", "normal", "false", "yes"],
            &["rainy", "mild", "normal", "false", "yes"],
            &["sunny", "mild", "normal", "true", "yes"],
            &["overcast", "mild", "high", "true", "yes"],
            &["overcast", "hot", "normal", "false", "yes"],
            &["rainy", "mild", "high", "true", "no"],
        ],
    )
}

/// `n` examples per class over two classes, labelled by attribute `a`
/// with a noise attribute `b` cycling through three values.
pub(crate) fn balanced(n: usize) -> Dataset {
    let rows: Vec<Vec<String>> = (0..2 * n)
        .map(|i| {
            let class = if i < n { "yes" } else { "no" };
            let a = if i < n { "x" } else { "y" };
            let b = ["p", "q", "r"][i % 3];
            vec![a.to_string(), b.to_string(), class.to_string()]
        })
        .collect();
    let borrowed: Vec<Vec<&str>> = rows
        .iter()
        .map(|r| r.iter().map(String::as_str).collect())
        .collect();
    let slices: Vec<&[&str]> = borrowed.iter().map(Vec::as_slice).collect();
    nominal(&["a", "b"], &slices)
}
