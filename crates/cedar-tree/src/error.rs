/// Errors from dataset construction, configuration, and evaluation.
#[derive(Debug, thiserror::Error)]
pub enum TreeError {
    /// Returned when an example lacks a required attribute or the class attribute.
    #[error("example {example_index} has no value for attribute \"{attribute}\"")]
    MissingAttribute {
        /// The zero-based index of the offending example.
        example_index: usize,
        /// The attribute that was not present.
        attribute: String,
    },

    /// Returned when the attribute list repeats a name or contains the class attribute.
    #[error("attribute \"{attribute}\" is listed more than once")]
    DuplicateAttribute {
        /// The repeated attribute name.
        attribute: String,
    },

    /// Returned when the fold count is less than 2.
    #[error("n_folds must be at least 2, got {n_folds}")]
    InvalidFoldCount {
        /// The invalid fold count provided.
        n_folds: usize,
    },

    /// Returned when a split ratio is not in the open interval (0.0, 1.0).
    #[error("{name} must be in (0.0, 1.0), got {value}")]
    InvalidRatio {
        /// Which ratio was rejected.
        name: &'static str,
        /// The invalid value provided.
        value: f64,
    },

    /// Returned when an evaluation run receives a dataset with zero examples.
    #[error("dataset has zero examples")]
    EmptyDataset,
}
