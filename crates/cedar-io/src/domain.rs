//! Domain types for cedar-io.

use crate::IoError;

/// A validated experiment name for output file naming.
///
/// Must match `[a-zA-Z0-9_-]+`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExperimentName(String);

impl ExperimentName {
    /// Parse and validate an experiment name.
    ///
    /// # Errors
    ///
    /// Returns [`IoError::InvalidExperimentName`] if the name is empty or
    /// contains characters outside `[a-zA-Z0-9_-]`.
    pub fn new(name: impl Into<String>) -> Result<Self, IoError> {
        let name = name.into();
        let valid = !name.is_empty()
            && name
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if !valid {
            return Err(IoError::InvalidExperimentName { name });
        }
        Ok(Self(name))
    }

    /// Return the experiment name as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Build the artifact file name `{experiment}_{suffix}`.
    pub(crate) fn file_name(&self, suffix: &str) -> String {
        format!("{}_{suffix}", self.0)
    }
}

impl std::fmt::Display for ExperimentName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for ExperimentName {
    type Err = IoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn experiment_name_valid() {
        let name = ExperimentName::new("breast-cancer_01").unwrap();
        assert_eq!(name.as_str(), "breast-cancer_01");
        assert_eq!(name.file_name("tree.txt"), "breast-cancer_01_tree.txt");
    }

    #[test]
    fn experiment_name_rejects_empty() {
        let name = ExperimentName::new("");
        assert!(matches!(name, Err(IoError::InvalidExperimentName { .. })));
    }

    #[test]
    fn experiment_name_rejects_special_chars() {
        let parsed: Result<ExperimentName, _> = "run #2".parse();
        assert!(matches!(parsed, Err(IoError::InvalidExperimentName { ref name }) if name == "run #2"));
    }
}
