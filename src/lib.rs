#![doc = include_str!("../README.md")]
#![warn(missing_docs)]

/// Command line runner.
pub mod cli;
/// Run configuration types.
pub mod config;
/// Centralized constants for dataset layout, encoding, and output.
pub mod constants;
/// Movie catalog, rating row, and resolved example types.
pub mod data;
/// ID resolution of a fully loaded dataset.
pub mod dataset;
/// Sparse line encoding.
pub mod encoder;
/// K-fold partitioning.
pub mod folds;
/// Per-user rating history.
pub mod history;
/// Feature block layout planning.
pub mod layout;
/// CSV readers for the movie and rating files.
pub mod loader;
/// Fold file and layout manifest writers.
pub mod output;
/// End-to-end generation.
pub mod pipeline;
/// Dense identity maps per category.
pub mod registry;
/// Shared type aliases.
pub mod types;

mod errors;

pub use config::{FeatureToggles, OutputNaming, RunConfig};
pub use data::{Example, MovieCatalog, RatingRow};
pub use dataset::Dataset;
pub use encoder::{FeatureToken, LineEncoder, TokenValue};
pub use errors::{ErrorClass, FoldError};
pub use folds::{Fold, FoldPlan};
pub use history::{HistoryEntry, HistoryIndex};
pub use layout::{BlockKind, FeatureBlock, FeatureLayout, LayoutSizes};
pub use output::{FoldFiles, FoldWriter, write_layout_manifest};
pub use pipeline::{RunSummary, generate, run};
pub use registry::{Category, IdentityMap};
pub use types::{
    EntityKey, FeatureIndex, FieldIndex, GenreId, MovieId, RawRating, SourceName, Timestamp,
    UserId,
};
