use std::path::PathBuf;

use crate::constants::dataset::{DEFAULT_DATASET_DIR, MOVIES_FILE, RATINGS_FILE};
use crate::constants::output::{
    DEFAULT_FOLDS, DEFAULT_OUTPUT_DIR, DEFAULT_TEST_PREFIX, DEFAULT_TRAIN_PREFIX,
    FOLD_FILE_EXTENSION,
};
use crate::errors::FoldError;

/// Optional feature blocks and output format switches.
///
/// The user and movie blocks are always emitted and have no toggle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FeatureToggles {
    /// Emit the hours-since-first-event timestamp block.
    pub timestamp: bool,
    /// Emit the multi-hot genre block.
    pub genre: bool,
    /// Emit the per-user rating history block.
    pub history: bool,
    /// Prefix every token with its field index (libFFM format).
    pub field_aware: bool,
}

/// File naming for per-fold output files.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OutputNaming {
    /// Prefix for training files (`train_` yields `train_00.txt`).
    pub train_prefix: String,
    /// Prefix for test files (`test_` yields `test_00.txt`).
    pub test_prefix: String,
}

impl Default for OutputNaming {
    fn default() -> Self {
        Self {
            train_prefix: DEFAULT_TRAIN_PREFIX.to_string(),
            test_prefix: DEFAULT_TEST_PREFIX.to_string(),
        }
    }
}

impl OutputNaming {
    /// Training file name for `fold`.
    pub fn train_file(&self, fold: usize) -> String {
        fold_file_name(&self.train_prefix, fold)
    }

    /// Test file name for `fold`.
    pub fn test_file(&self, fold: usize) -> String {
        fold_file_name(&self.test_prefix, fold)
    }
}

fn fold_file_name(prefix: &str, fold: usize) -> String {
    format!("{prefix}{fold:02}.{FOLD_FILE_EXTENSION}")
}

/// Top-level run configuration.
#[derive(Clone, Debug)]
pub struct RunConfig {
    /// Directory holding `movies.csv` and `ratings.csv`.
    pub dataset_dir: PathBuf,
    /// Directory receiving fold files; created when missing.
    pub output_dir: PathBuf,
    /// Number of cross-validation folds (`k`).
    pub folds: usize,
    /// Enabled optional blocks and output format.
    pub toggles: FeatureToggles,
    /// Fold file naming.
    pub naming: OutputNaming,
    /// Shuffle seed; `None` draws a fresh seed from the OS.
    pub seed: Option<u64>,
    /// Write folds concurrently.
    pub parallel: bool,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            dataset_dir: PathBuf::from(DEFAULT_DATASET_DIR),
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            folds: DEFAULT_FOLDS,
            toggles: FeatureToggles::default(),
            naming: OutputNaming::default(),
            seed: None,
            parallel: false,
        }
    }
}

impl RunConfig {
    /// Reject configurations that cannot produce output.
    pub fn validate(&self) -> Result<(), FoldError> {
        if self.folds == 0 {
            return Err(FoldError::Configuration(
                "fold count must be at least 1".to_string(),
            ));
        }
        if self.naming.train_prefix.is_empty() || self.naming.test_prefix.is_empty() {
            return Err(FoldError::Configuration(
                "train and test prefixes must be non-empty".to_string(),
            ));
        }
        if self.naming.train_prefix == self.naming.test_prefix {
            return Err(FoldError::Configuration(format!(
                "train and test prefixes must differ, both are '{}'",
                self.naming.train_prefix
            )));
        }
        Ok(())
    }

    /// Path of the movie file.
    pub fn movies_path(&self) -> PathBuf {
        self.dataset_dir.join(MOVIES_FILE)
    }

    /// Path of the rating file.
    pub fn ratings_path(&self) -> PathBuf {
        self.dataset_dir.join(RATINGS_FILE)
    }
}
