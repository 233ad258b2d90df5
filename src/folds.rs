//! K-fold partitioning of resolved examples.
//!
//! Examples are shuffled with a caller-supplied RNG and cut into `k` bags of
//! `N / k` examples. The trailing `N % k` examples after the shuffle belong to
//! no bag and appear in no fold.

use rand::Rng;
use rand::seq::SliceRandom;
use tracing::{info, warn};

use crate::data::Example;
use crate::errors::FoldError;

/// Shuffled examples cut into `k` equal bags.
#[derive(Clone, Debug)]
pub struct FoldPlan {
    examples: Vec<Example>,
    folds: usize,
    bag_size: usize,
}

/// One cross-validation fold: a held-out bag and the remaining bags.
#[derive(Clone, Debug)]
pub struct Fold<'a> {
    /// Zero-based fold index, also the held-out bag index.
    pub index: usize,
    /// Concatenation of every other bag in increasing bag order.
    pub train: Vec<&'a Example>,
    /// The held-out bag.
    pub test: &'a [Example],
}

impl FoldPlan {
    /// Shuffle `examples` with `rng` and cut them into `folds` bags.
    pub fn partition<R>(mut examples: Vec<Example>, folds: usize, rng: &mut R) -> Result<Self, FoldError>
    where
        R: Rng + ?Sized,
    {
        if folds == 0 {
            return Err(FoldError::Configuration(
                "fold count must be at least 1".to_string(),
            ));
        }
        examples.shuffle(rng);
        let bag_size = examples.len() / folds;
        let plan = Self {
            examples,
            folds,
            bag_size,
        };
        if bag_size == 0 {
            warn!(
                examples = plan.examples.len(),
                folds, "fewer examples than folds, every bag is empty"
            );
        }
        info!(
            bag_size,
            discarded = plan.discarded(),
            folds,
            "partitioned examples"
        );
        Ok(plan)
    }

    /// Number of folds (`k`).
    pub fn fold_count(&self) -> usize {
        self.folds
    }

    /// Examples per bag.
    pub fn bag_size(&self) -> usize {
        self.bag_size
    }

    /// Number of shuffled examples left out of every bag.
    pub fn discarded(&self) -> usize {
        self.examples.len() - self.bag_size * self.folds
    }

    /// Bag `index`, or `None` past the last bag.
    pub fn bag(&self, index: usize) -> Option<&[Example]> {
        if index >= self.folds {
            return None;
        }
        let start = index * self.bag_size;
        Some(&self.examples[start..start + self.bag_size])
    }

    /// Fold `index`: bag `index` as test, every other bag as train.
    pub fn fold(&self, index: usize) -> Option<Fold<'_>> {
        let test = self.bag(index)?;
        let train = (0..self.folds)
            .filter(|&bag| bag != index)
            .filter_map(|bag| self.bag(bag))
            .flatten()
            .collect();
        Some(Fold { index, train, test })
    }

    /// Every fold in index order.
    pub fn folds(&self) -> impl Iterator<Item = Fold<'_>> + '_ {
        (0..self.folds).filter_map(move |index| self.fold(index))
    }
}
