//! Run configuration: pruning policy, sampling ratios, seed.

use tracing::warn;

use crate::error::TreeError;

/// Which pruning families a run uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PruningMode {
    /// Pre-pruning stopping rules only.
    PreOnly,
    /// Reduced-error post-pruning only.
    PostOnly,
    /// Both families.
    Both,
}

impl PruningMode {
    /// Return `true` if stopping rules apply during induction.
    #[must_use]
    pub fn includes_pre(self) -> bool {
        matches!(self, PruningMode::PreOnly | PruningMode::Both)
    }

    /// Return `true` if reduced-error pruning runs after induction.
    #[must_use]
    pub fn includes_post(self) -> bool {
        matches!(self, PruningMode::PostOnly | PruningMode::Both)
    }

    fn from_token(token: &str) -> Option<Self> {
        match token {
            "0" => Some(PruningMode::PreOnly),
            "1" => Some(PruningMode::PostOnly),
            "2" => Some(PruningMode::Both),
            _ => None,
        }
    }
}

/// Independent on/off switches for the three pre-pruning rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct PreRules {
    /// Stop at `max_depth` (`N`).
    pub max_depth: bool,
    /// Stop below `min_examples_to_split` examples (`K`).
    pub min_examples: bool,
    /// Stop when the best gain is below `min_info_gain` (`G`).
    pub min_gain: bool,
}

impl PreRules {
    /// Every rule enabled.
    #[must_use]
    pub const fn all() -> Self {
        Self {
            max_depth: true,
            min_examples: true,
            min_gain: true,
        }
    }

    /// Every rule disabled.
    #[must_use]
    pub const fn none() -> Self {
        Self {
            max_depth: false,
            min_examples: false,
            min_gain: false,
        }
    }

    /// Return `true` if at least one rule is enabled.
    #[must_use]
    pub fn any(self) -> bool {
        self.max_depth || self.min_examples || self.min_gain
    }
}

/// Pruning parameters and toggles.
///
/// Thresholds are kept even while their rule is disabled, so re-enabling a
/// rule restores the configured value.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct PruningConfig {
    /// Depth at which growth stops (`N`).
    pub max_depth: usize,
    /// Nodes with fewer examples are not split (`K`).
    pub min_examples_to_split: usize,
    /// Splits whose best gain is below this are not made (`G`).
    pub min_info_gain: f64,
    /// Which pre-pruning rules are switched on.
    pub rules: PreRules,
    /// Whether reduced-error post-pruning is switched on (`E`).
    pub use_post_pruning: bool,
}

impl Default for PruningConfig {
    fn default() -> Self {
        Self {
            max_depth: 10,
            min_examples_to_split: 5,
            min_info_gain: 0.1,
            rules: PreRules::all(),
            use_post_pruning: true,
        }
    }
}

/// Pre-pruning thresholds in effect for one induction; `None` means off.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct StoppingRules {
    /// Nodes at this depth or deeper become leaves.
    pub max_depth: Option<usize>,
    /// Nodes with fewer examples become leaves.
    pub min_examples_to_split: Option<usize>,
    /// Splits with a best gain strictly below this are not made.
    pub min_info_gain: Option<f64>,
}

impl StoppingRules {
    /// No stopping rules: grow until pure or out of attributes.
    #[must_use]
    pub fn unpruned() -> Self {
        Self::default()
    }
}

/// Configuration for one evaluation run.
///
/// Construct via [`RunConfig::new`], then chain `with_*` methods.
///
/// # Defaults
///
/// | Parameter               | Default          |
/// |-------------------------|------------------|
/// | `mode`                  | `Both`           |
/// | `max_depth`             | 10 (on)          |
/// | `min_examples_to_split` | 5 (on)           |
/// | `min_info_gain`         | 0.1 (on)         |
/// | `use_post_pruning`      | `true`           |
/// | `seed`                  | 42               |
/// | `train_ratio`           | 0.8              |
/// | `validation_ratio`      | 0.2              |
/// | `n_folds`               | 10               |
/// | `missing_policy`        | `mode_by_class`  |
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct RunConfig {
    pub(crate) mode: PruningMode,
    pub(crate) pruning: PruningConfig,
    pub(crate) seed: u64,
    pub(crate) train_ratio: f64,
    pub(crate) validation_ratio: f64,
    pub(crate) n_folds: usize,
    pub(crate) missing_policy: String,
}

impl RunConfig {
    /// Create a config with default values.
    #[must_use]
    pub fn new() -> Self {
        Self {
            mode: PruningMode::Both,
            pruning: PruningConfig::default(),
            seed: 42,
            train_ratio: 0.8,
            validation_ratio: 0.2,
            n_folds: 10,
            missing_policy: "mode_by_class".to_string(),
        }
    }

    /// Set the pruning mode.
    ///
    /// Reduced-error pruning (`E`) is switched on exactly when the mode
    /// includes post-pruning; [`RunConfig::with_post_pruning`] can turn it
    /// off again afterwards.
    #[must_use]
    pub fn with_mode(mut self, mode: PruningMode) -> Self {
        self.mode = mode;
        self.pruning.use_post_pruning = mode.includes_post();
        self
    }

    /// Replace the pruning parameters and toggles.
    #[must_use]
    pub fn with_pruning(mut self, pruning: PruningConfig) -> Self {
        self.pruning = pruning;
        self
    }

    /// Set the max-depth threshold (`N`) without changing its toggle.
    #[must_use]
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.pruning.max_depth = max_depth;
        self
    }

    /// Set the minimum examples needed to split (`K`) without changing its toggle.
    #[must_use]
    pub fn with_min_examples_to_split(mut self, min_examples: usize) -> Self {
        self.pruning.min_examples_to_split = min_examples;
        self
    }

    /// Set the minimum information gain (`G`) without changing its toggle.
    #[must_use]
    pub fn with_min_info_gain(mut self, min_info_gain: f64) -> Self {
        self.pruning.min_info_gain = min_info_gain;
        self
    }

    /// Choose which pre-pruning rules are switched on.
    #[must_use]
    pub fn with_pre_rules(mut self, rules: PreRules) -> Self {
        self.pruning.rules = rules;
        self
    }

    /// Switch reduced-error pruning (`E`) on or off.
    ///
    /// Has no effect unless the mode includes post-pruning.
    #[must_use]
    pub fn with_post_pruning(mut self, enabled: bool) -> Self {
        self.pruning.use_post_pruning = enabled;
        self
    }

    /// Set the random seed.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Set the fraction of examples placed in the training split.
    #[must_use]
    pub fn with_train_ratio(mut self, train_ratio: f64) -> Self {
        self.train_ratio = train_ratio;
        self
    }

    /// Set the fraction of the training split held out for post-pruning.
    #[must_use]
    pub fn with_validation_ratio(mut self, validation_ratio: f64) -> Self {
        self.validation_ratio = validation_ratio;
        self
    }

    /// Set the number of cross-validation folds.
    #[must_use]
    pub fn with_folds(mut self, n_folds: usize) -> Self {
        self.n_folds = n_folds;
        self
    }

    /// Set the missing-value policy identifier (interpreted by the loader).
    #[must_use]
    pub fn with_missing_policy(mut self, policy: impl Into<String>) -> Self {
        self.missing_policy = policy.into();
        self
    }

    /// Apply a textual pruning selection such as `"0"`, `"0 K"`, `"1 E"` or `"2 NKG E"`.
    ///
    /// The first token picks the mode: `0` pre-pruning, `1` post-pruning,
    /// `2` both. Alone, it enables every rule of that mode. Further tokens
    /// restrict the mode to the rules whose letters they contain: `N` max
    /// depth, `K` min examples, `G` min gain, `E` reduced-error pruning.
    /// Letters outside the selected mode are ignored.
    ///
    /// An unrecognised mode token resets pruning to the default (both
    /// families, every rule on) and logs a warning.
    #[must_use]
    pub fn with_pruning_spec(mut self, spec: &str) -> Self {
        let mut tokens = spec.split_whitespace();
        let Some(first) = tokens.next() else {
            return self;
        };
        let Some(mode) = PruningMode::from_token(first) else {
            warn!(token = first, "unrecognised pruning mode, enabling all pruning rules");
            self.mode = PruningMode::Both;
            self.pruning.rules = PreRules::all();
            self.pruning.use_post_pruning = true;
            return self;
        };

        self.mode = mode;
        self.pruning.rules = if mode.includes_pre() { PreRules::all() } else { PreRules::none() };
        self.pruning.use_post_pruning = mode.includes_post();

        let selectors: Vec<String> = tokens.map(str::to_uppercase).collect();
        if selectors.is_empty() {
            return self;
        }

        if mode.includes_pre() {
            self.pruning.rules = PreRules::none();
        }
        if mode.includes_post() {
            self.pruning.use_post_pruning = false;
        }
        for token in &selectors {
            if mode.includes_pre() {
                self.pruning.rules.max_depth |= token.contains('N');
                self.pruning.rules.min_examples |= token.contains('K');
                self.pruning.rules.min_gain |= token.contains('G');
            }
            if mode.includes_post() && token.contains('E') {
                self.pruning.use_post_pruning = true;
            }
        }

        if mode.includes_pre() && !self.pruning.rules.any() {
            warn!(spec, "no pre-pruning rule selected, enabling all of them");
            self.pruning.rules = PreRules::all();
        }
        if mode.includes_post() && !self.pruning.use_post_pruning {
            self.pruning.use_post_pruning = true;
        }
        self
    }

    // --- Getters ---

    /// Return the pruning mode.
    #[must_use]
    pub fn mode(&self) -> PruningMode {
        self.mode
    }

    /// Return the raw pruning parameters and toggles.
    #[must_use]
    pub fn pruning(&self) -> &PruningConfig {
        &self.pruning
    }

    /// Return the random seed.
    #[must_use]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Return the training-split fraction.
    #[must_use]
    pub fn train_ratio(&self) -> f64 {
        self.train_ratio
    }

    /// Return the post-pruning validation fraction.
    #[must_use]
    pub fn validation_ratio(&self) -> f64 {
        self.validation_ratio
    }

    /// Return the fold count.
    #[must_use]
    pub fn n_folds(&self) -> usize {
        self.n_folds
    }

    /// Return the missing-value policy identifier.
    #[must_use]
    pub fn missing_policy(&self) -> &str {
        &self.missing_policy
    }

    /// Stopping rules in effect during induction.
    ///
    /// Empty unless the mode includes pre-pruning. A pre-pruning mode with
    /// every rule switched off runs with all three rules instead.
    #[must_use]
    pub fn stopping_rules(&self) -> StoppingRules {
        if !self.mode.includes_pre() {
            return StoppingRules::unpruned();
        }
        let rules = if self.pruning.rules.any() {
            self.pruning.rules
        } else {
            PreRules::all()
        };
        StoppingRules {
            max_depth: rules.max_depth.then_some(self.pruning.max_depth),
            min_examples_to_split: rules.min_examples.then_some(self.pruning.min_examples_to_split),
            min_info_gain: rules.min_gain.then_some(self.pruning.min_info_gain),
        }
    }

    /// Whether reduced-error pruning runs after induction.
    ///
    /// Requires both a mode that includes post-pruning and the `E` toggle.
    #[must_use]
    pub fn post_pruning(&self) -> bool {
        self.mode.includes_post() && self.pruning.use_post_pruning
    }

    /// Check ratios and fold count.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`TreeError::InvalidRatio`] | `train_ratio` or `validation_ratio` outside (0.0, 1.0) |
    /// | [`TreeError::InvalidFoldCount`] | `n_folds` < 2 |
    pub fn validate(&self) -> Result<(), TreeError> {
        check_ratio("train_ratio", self.train_ratio)?;
        check_ratio("validation_ratio", self.validation_ratio)?;
        if self.n_folds < 2 {
            return Err(TreeError::InvalidFoldCount {
                n_folds: self.n_folds,
            });
        }
        Ok(())
    }
}

impl Default for RunConfig {
    fn default() -> Self {
        Self::new()
    }
}

fn check_ratio(name: &'static str, value: f64) -> Result<(), TreeError> {
    if value > 0.0 && value < 1.0 {
        Ok(())
    } else {
        Err(TreeError::InvalidRatio { name, value })
    }
}
