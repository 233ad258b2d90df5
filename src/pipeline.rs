//! End-to-end generation: load, resolve, plan, partition, encode, write.
//!
//! All input is read and validated before the output directory is created,
//! so configuration and data errors leave the filesystem untouched.

use chrono::{DateTime, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::fs;
use std::path::PathBuf;
use tracing::info;

use crate::config::RunConfig;
use crate::dataset::Dataset;
use crate::encoder::LineEncoder;
use crate::errors::FoldError;
use crate::folds::FoldPlan;
use crate::history::HistoryIndex;
use crate::layout::{FeatureLayout, LayoutSizes};
use crate::loader::{load_movies, load_ratings};
use crate::output::{FoldFiles, FoldWriter, write_layout_manifest};

/// Outcome of one generation run.
#[derive(Clone, Debug)]
pub struct RunSummary {
    pub users: usize,
    pub movies: usize,
    pub genres: usize,
    /// Resolved examples before fold truncation.
    pub examples: usize,
    pub bag_size: usize,
    /// Examples left out of every fold.
    pub discarded: usize,
    /// Total width of the sparse feature space.
    pub dimension: usize,
    pub earliest_event: Option<DateTime<Utc>>,
    pub manifest: PathBuf,
    pub folds: Vec<FoldFiles>,
}

/// Run generation for `config`, reading the dataset from disk.
///
/// Shuffles with `config.seed` when set, otherwise with an OS-seeded RNG.
pub fn run(config: &RunConfig) -> Result<RunSummary, FoldError> {
    config.validate()?;
    let catalog = load_movies(&config.movies_path())?;
    let rows = load_ratings(&config.ratings_path())?;
    let dataset = Dataset::resolve(&catalog, rows)?;
    let mut rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };
    generate(config, dataset, &mut rng)
}

/// Encode an already resolved `dataset` into fold files, shuffling with `rng`.
pub fn generate<R>(config: &RunConfig, dataset: Dataset, rng: &mut R) -> Result<RunSummary, FoldError>
where
    R: Rng + ?Sized,
{
    config.validate()?;
    let earliest_event = dataset.earliest_event();
    if let Some(earliest) = earliest_event {
        info!(earliest = %earliest.to_rfc3339(), "timestamps measured from earliest rating");
    }

    let sizes = LayoutSizes {
        users: dataset.users().len(),
        movies: dataset.movies().len(),
        genres: dataset.genres().len(),
    };
    let layout = FeatureLayout::plan(&config.toggles, sizes);
    info!(
        dimension = layout.dimension(),
        fields = layout.field_count(),
        "planned feature layout"
    );
    let history = if config.toggles.history {
        Some(HistoryIndex::build(sizes.users, dataset.examples())?)
    } else {
        None
    };

    let examples = dataset.into_examples();
    let example_count = examples.len();
    let plan = FoldPlan::partition(examples, config.folds, rng)?;

    fs::create_dir_all(&config.output_dir)?;
    let manifest = write_layout_manifest(&config.output_dir, &layout, &config.toggles)?;

    let mut encoder = LineEncoder::new(&layout, config.toggles.field_aware);
    if let Some(history) = &history {
        encoder = encoder.with_history(history);
    }
    let writer = FoldWriter::new(&config.output_dir, &config.naming, encoder);
    let folds = writer.write_all(&plan, config.parallel)?;

    Ok(RunSummary {
        users: sizes.users,
        movies: sizes.movies,
        genres: sizes.genres,
        examples: example_count,
        bag_size: plan.bag_size(),
        discarded: plan.discarded(),
        dimension: layout.dimension(),
        earliest_event,
        manifest,
        folds,
    })
}
