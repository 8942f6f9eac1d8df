use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::Serialize;
use tracing::info;

use cedar_io::{ArffReader, CsvReader, ExperimentName, MissingPolicy, ReportWriter, impute};
use cedar_tree::{Dataset, EvaluationReport, RunConfig, evaluate, train_model};

#[derive(Parser)]
#[command(name = "cedar")]
#[command(about = "ID3 decision trees with pre/post-pruning and stratified evaluation")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// RNG seed for reproducibility
    #[arg(long, default_value_t = 42, global = true)]
    seed: u64,

    /// Enable verbose (debug-level) logging
    #[arg(long, global = true)]
    verbose: bool,

    /// Suppress all log output except errors
    #[arg(long, global = true)]
    quiet: bool,
}

/// Input dataset selection.
#[derive(Args, Debug, Clone)]
struct DataArgs {
    /// Path to the input dataset (.arff, otherwise read as CSV)
    #[arg(long)]
    data: PathBuf,

    /// CSV column holding the class label (defaults to the last column)
    #[arg(long)]
    class_column: Option<String>,

    /// Missing-value treatment: "mode_by_class" or "keep"
    #[arg(long, default_value = "mode_by_class")]
    missing_policy: String,
}

/// Tree growing and pruning parameters.
#[derive(Args, Debug, Clone)]
struct TrainingArgs {
    /// Pruning selection: mode 0 (pre), 1 (post) or 2 (both), optionally
    /// followed by rule letters N, K, G, E, e.g. "2 NKG E"
    #[arg(long, default_value = "2")]
    pruning: String,

    /// Maximum tree depth for the N rule
    #[arg(long, default_value_t = 10)]
    max_depth: usize,

    /// Minimum examples needed to split a node for the K rule
    #[arg(long, default_value_t = 5)]
    min_examples: usize,

    /// Minimum information gain needed to split a node for the G rule
    #[arg(long, default_value_t = 0.1)]
    min_gain: f64,

    /// Fraction of the training data held out for reduced-error pruning
    #[arg(long, default_value_t = 0.2)]
    validation_ratio: f64,
}

#[derive(Subcommand)]
enum Command {
    /// Split, train, cross-validate, and test a tree on a dataset
    Evaluate {
        #[command(flatten)]
        data: DataArgs,

        #[command(flatten)]
        training: TrainingArgs,

        /// Fraction of the dataset used for training
        #[arg(long, default_value_t = 0.8)]
        train_ratio: f64,

        /// Number of cross-validation folds
        #[arg(long, default_value_t = 10)]
        folds: usize,

        /// Experiment name for output files (must match [a-zA-Z0-9_-]+);
        /// artifacts are written only when set
        #[arg(long)]
        experiment: Option<String>,

        /// Output directory for result files
        #[arg(long, default_value = ".")]
        output_dir: PathBuf,

        /// Print the summary as JSON instead of the text report
        #[arg(long, default_value_t = false)]
        json: bool,
    },

    /// Train one tree on the whole dataset and print it
    Tree {
        #[command(flatten)]
        data: DataArgs,

        #[command(flatten)]
        training: TrainingArgs,

        /// Experiment name; when set the rendering is also written to a file
        #[arg(long)]
        experiment: Option<String>,

        /// Output directory for result files
        #[arg(long, default_value = ".")]
        output_dir: PathBuf,
    },
}

// --- JSON stdout output structs ---

#[derive(Serialize)]
struct EvaluateOutput<'a> {
    data: String,
    n_examples: usize,
    n_train: usize,
    n_test: usize,
    train_accuracy: f64,
    fold_accuracies: &'a [f64],
    cv_mean_accuracy: f64,
    cv_std_accuracy: f64,
    test_accuracy: f64,
    n_nodes: usize,
    n_leaves: usize,
}

fn load_dataset(args: &DataArgs) -> Result<Dataset> {
    let is_arff = args
        .data
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("arff"));

    let dataset = if is_arff {
        ArffReader::new(&args.data)
            .read()
            .with_context(|| format!("failed to read ARFF file {}", args.data.display()))?
    } else {
        let mut reader = CsvReader::new(&args.data);
        if let Some(column) = &args.class_column {
            reader = reader.with_class_column(column.as_str());
        }
        reader
            .read()
            .with_context(|| format!("failed to read CSV file {}", args.data.display()))?
    };

    let policy: MissingPolicy = args.missing_policy.parse()?;
    let dataset = impute(&dataset, policy).context("missing-value imputation failed")?;
    info!(
        n_examples = dataset.len(),
        n_attributes = dataset.attributes().len(),
        %policy,
        "dataset ready"
    );
    Ok(dataset)
}

fn build_config(seed: u64, training: &TrainingArgs, missing_policy: &str) -> RunConfig {
    RunConfig::new()
        .with_seed(seed)
        .with_max_depth(training.max_depth)
        .with_min_examples_to_split(training.min_examples)
        .with_min_info_gain(training.min_gain)
        .with_validation_ratio(training.validation_ratio)
        .with_missing_policy(missing_policy)
        .with_pruning_spec(&training.pruning)
}

fn writer_for(experiment: Option<String>, output_dir: &Path) -> Result<Option<ReportWriter>> {
    experiment
        .map(|name| {
            let name = ExperimentName::new(name)?;
            ReportWriter::new(output_dir, name).context("failed to prepare output directory")
        })
        .transpose()
}

fn percent(value: f64) -> String {
    format!("{:.2}%", value * 100.0)
}

fn print_report(report: &EvaluationReport, n_folds: usize) {
    println!("Train set accuracy: {}", percent(report.train_accuracy));
    println!("------ Performing {n_folds}-Fold Cross-Validation ------");
    for (fold, accuracy) in report.fold_accuracies.iter().enumerate() {
        println!("[FOLD {fold}] Accuracy: {}", percent(*accuracy));
    }
    println!("Average accuracy: {}", percent(report.mean_accuracy));
    println!("Standard deviation: {}", percent(report.std_accuracy));
    println!("------ Validation completed ------");
    println!("Test set accuracy: {}", percent(report.test_accuracy));
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = match (cli.verbose, cli.quiet) {
        (true, _) => "debug",
        (_, true) => "error",
        _ => "info",
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Command::Evaluate {
            data,
            training,
            train_ratio,
            folds,
            experiment,
            output_dir,
            json,
        } => {
            let writer = writer_for(experiment, &output_dir)?;
            let dataset = load_dataset(&data)?;

            let config = build_config(cli.seed, &training, &data.missing_policy)
                .with_train_ratio(train_ratio)
                .with_folds(folds);
            info!(mode = ?config.mode(), post_pruning = config.post_pruning(), "pruning configured");

            let report = evaluate(&dataset, &config).context("evaluation failed")?;

            if let Some(writer) = &writer {
                writer.write_evaluation(&config, &report)?;
                writer.write_tree(&report.tree)?;
            }

            if json {
                let output = EvaluateOutput {
                    data: data.data.display().to_string(),
                    n_examples: dataset.len(),
                    n_train: report.n_train,
                    n_test: report.n_test,
                    train_accuracy: report.train_accuracy,
                    fold_accuracies: &report.fold_accuracies,
                    cv_mean_accuracy: report.mean_accuracy,
                    cv_std_accuracy: report.std_accuracy,
                    test_accuracy: report.test_accuracy,
                    n_nodes: report.tree.n_nodes(),
                    n_leaves: report.tree.n_leaves(),
                };
                println!("{}", serde_json::to_string_pretty(&output)?);
            } else {
                print_report(&report, config.n_folds());
            }
        }

        Command::Tree {
            data,
            training,
            experiment,
            output_dir,
        } => {
            let writer = writer_for(experiment, &output_dir)?;
            let dataset = load_dataset(&data)?;

            let config = build_config(cli.seed, &training, &data.missing_policy);
            config.validate().context("invalid configuration")?;

            let mut rng = ChaCha8Rng::seed_from_u64(config.seed());
            let tree = train_model(&dataset, &config, &mut rng);
            info!(
                n_nodes = tree.n_nodes(),
                n_leaves = tree.n_leaves(),
                height = tree.height(),
                "tree trained"
            );

            if let Some(writer) = &writer {
                writer.write_tree(&tree)?;
            }
            print!("{tree}");
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percent_matches_report_format() {
        assert_eq!(percent(0.9375), "93.75%");
        assert_eq!(percent(1.0), "100.00%");
        assert_eq!(percent(0.0), "0.00%");
    }

    #[test]
    fn cli_defaults_match_run_config() {
        let cli = Cli::try_parse_from(["cedar", "evaluate", "--data", "x.arff"]).unwrap();
        let Command::Evaluate { data, training, train_ratio, folds, .. } = cli.command else {
            panic!("expected evaluate");
        };
        let config = build_config(cli.seed, &training, &data.missing_policy)
            .with_train_ratio(train_ratio)
            .with_folds(folds);
        assert_eq!(config, RunConfig::new());
    }

    #[test]
    fn pruning_flag_is_applied() {
        let cli = Cli::try_parse_from(["cedar", "tree", "--data", "x.csv", "--pruning", "0 N"]).unwrap();
        let Command::Tree { data, training, .. } = cli.command else {
            panic!("expected tree");
        };
        let config = build_config(cli.seed, &training, &data.missing_policy);
        let rules = config.stopping_rules();
        assert_eq!(rules.max_depth, Some(10));
        assert_eq!(rules.min_examples_to_split, None);
        assert!(!config.post_pruning());
    }
}
