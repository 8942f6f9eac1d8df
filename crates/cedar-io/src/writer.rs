//! JSON and text writers for evaluation outputs.

use std::fs;
use std::path::{Path, PathBuf};

use cedar_tree::{EvaluationReport, Node, RunConfig};
use serde::Serialize;
use tracing::{debug, info, instrument};

use crate::IoError;
use crate::domain::ExperimentName;

/// Writes evaluation results and tree renderings.
///
/// Creates the output directory on construction if it does not exist.
/// Output files are named `{experiment}_evaluate.json` and
/// `{experiment}_tree.txt`.
pub struct ReportWriter {
    output_dir: PathBuf,
    experiment: ExperimentName,
}

impl ReportWriter {
    /// Create a new writer targeting the given directory and experiment name.
    ///
    /// # Errors
    ///
    /// Returns [`IoError::OutputDirCreate`] if the directory cannot be created.
    #[instrument(skip_all, fields(dir = %output_dir.display(), experiment = %experiment))]
    pub fn new(output_dir: &Path, experiment: ExperimentName) -> Result<Self, IoError> {
        fs::create_dir_all(output_dir).map_err(|e| IoError::OutputDirCreate {
            path: output_dir.to_path_buf(),
            source: e,
        })?;
        debug!("output directory ready");
        Ok(Self {
            output_dir: output_dir.to_path_buf(),
            experiment,
        })
    }

    /// Write an evaluation run to `{experiment}_evaluate.json`.
    ///
    /// The artifact records the configuration, every accuracy, the split
    /// sizes, and summary statistics of the reported tree.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`IoError::Serialize`] | The artifact cannot be encoded |
    /// | [`IoError::WriteFile`] | The file cannot be written |
    #[instrument(skip_all)]
    pub fn write_evaluation(&self, config: &RunConfig, report: &EvaluationReport) -> Result<PathBuf, IoError> {
        let path = self.output_dir.join(self.experiment.file_name("evaluate.json"));

        let artifact = EvaluateArtifact {
            experiment: self.experiment.as_str(),
            config,
            train_accuracy: report.train_accuracy,
            fold_accuracies: &report.fold_accuracies,
            cv_accuracy_mean: report.mean_accuracy,
            cv_accuracy_std: report.std_accuracy,
            test_accuracy: report.test_accuracy,
            n_train: report.n_train,
            n_test: report.n_test,
            tree: TreeStats::of(&report.tree),
        };

        let json = serde_json::to_string_pretty(&artifact).map_err(|e| IoError::Serialize {
            what: "evaluation artifact",
            source: e,
        })?;
        self.write(&path, &json)?;

        info!(path = %path.display(), "evaluation result written");
        Ok(path)
    }

    /// Write the indented rendering of `tree` to `{experiment}_tree.txt`.
    ///
    /// # Errors
    ///
    /// Returns [`IoError::WriteFile`] if the file cannot be written.
    #[instrument(skip_all)]
    pub fn write_tree(&self, tree: &Node) -> Result<PathBuf, IoError> {
        let path = self.output_dir.join(self.experiment.file_name("tree.txt"));
        self.write(&path, &tree.render())?;
        info!(path = %path.display(), n_nodes = tree.n_nodes(), "tree rendering written");
        Ok(path)
    }

    fn write(&self, path: &Path, contents: &str) -> Result<(), IoError> {
        fs::write(path, contents).map_err(|e| IoError::WriteFile {
            path: path.to_path_buf(),
            source: e,
        })
    }
}

// --- Shadow structs for JSON serialization ---

#[derive(Serialize)]
struct EvaluateArtifact<'a> {
    experiment: &'a str,
    config: &'a RunConfig,
    train_accuracy: f64,
    fold_accuracies: &'a [f64],
    cv_accuracy_mean: f64,
    cv_accuracy_std: f64,
    test_accuracy: f64,
    n_train: usize,
    n_test: usize,
    tree: TreeStats,
}

#[derive(Serialize)]
struct TreeStats {
    n_nodes: usize,
    n_leaves: usize,
    height: usize,
    root_attribute: Option<String>,
}

impl TreeStats {
    fn of(tree: &Node) -> Self {
        let root_attribute = match tree {
            Node::Internal { attribute, .. } => Some(attribute.clone()),
            Node::Leaf { .. } => None,
        };
        Self {
            n_nodes: tree.n_nodes(),
            n_leaves: tree.n_leaves(),
            height: tree.height(),
            root_attribute,
        }
    }
}
