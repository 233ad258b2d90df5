use rayon::prelude::*;
use serde::Serialize;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::info;

use crate::config::{FeatureToggles, OutputNaming};
use crate::constants::output::LAYOUT_MANIFEST_FILE;
use crate::data::Example;
use crate::encoder::LineEncoder;
use crate::errors::FoldError;
use crate::folds::{Fold, FoldPlan};
use crate::layout::{FeatureBlock, FeatureLayout};

/// Files written for one fold.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FoldFiles {
    pub fold: usize,
    pub train: PathBuf,
    pub test: PathBuf,
    pub train_lines: usize,
    pub test_lines: usize,
}

/// Writes encoded train/test files for each fold into one directory.
pub struct FoldWriter<'a> {
    dir: &'a Path,
    naming: &'a OutputNaming,
    encoder: LineEncoder<'a>,
}

impl<'a> FoldWriter<'a> {
    /// Writer targeting the existing directory `dir`.
    pub fn new(dir: &'a Path, naming: &'a OutputNaming, encoder: LineEncoder<'a>) -> Self {
        Self {
            dir,
            naming,
            encoder,
        }
    }

    /// Write the train and test files of `fold`.
    pub fn write_fold(&self, fold: &Fold<'_>) -> Result<FoldFiles, FoldError> {
        let train = self.dir.join(self.naming.train_file(fold.index));
        let test = self.dir.join(self.naming.test_file(fold.index));
        let train_lines = self.write_examples(&train, fold.train.iter().copied())?;
        let test_lines = self.write_examples(&test, fold.test)?;
        info!(
            fold = fold.index,
            train = %train.display(),
            train_lines,
            test = %test.display(),
            test_lines,
            "wrote fold"
        );
        Ok(FoldFiles {
            fold: fold.index,
            train,
            test,
            train_lines,
            test_lines,
        })
    }

    /// Write every fold of `plan`, concurrently when `parallel` is set.
    ///
    /// Results are returned in fold order either way.
    pub fn write_all(&self, plan: &FoldPlan, parallel: bool) -> Result<Vec<FoldFiles>, FoldError> {
        let write = |index: usize| -> Result<FoldFiles, FoldError> {
            let fold = plan.fold(index).ok_or_else(|| {
                FoldError::Configuration(format!("fold {index} is outside the plan"))
            })?;
            self.write_fold(&fold)
        };
        if parallel {
            (0..plan.fold_count()).into_par_iter().map(write).collect()
        } else {
            (0..plan.fold_count()).map(write).collect()
        }
    }

    fn write_examples<'e, I>(&self, path: &Path, examples: I) -> Result<usize, FoldError>
    where
        I: IntoIterator<Item = &'e Example>,
    {
        let mut out = BufWriter::new(File::create(path)?);
        let mut lines = 0;
        for example in examples {
            self.encoder.write_line(&mut out, example)?;
            lines += 1;
        }
        out.flush()?;
        Ok(lines)
    }
}

#[derive(Serialize)]
struct LayoutManifest<'a> {
    field_aware: bool,
    dimension: usize,
    field_count: usize,
    blocks: &'a [FeatureBlock],
}

/// Write a JSON description of `layout` into `dir`.
pub fn write_layout_manifest(
    dir: &Path,
    layout: &FeatureLayout,
    toggles: &FeatureToggles,
) -> Result<PathBuf, FoldError> {
    let path = dir.join(LAYOUT_MANIFEST_FILE);
    let manifest = LayoutManifest {
        field_aware: toggles.field_aware,
        dimension: layout.dimension(),
        field_count: layout.field_count(),
        blocks: layout.blocks(),
    };
    let mut out = BufWriter::new(File::create(&path)?);
    serde_json::to_writer_pretty(&mut out, &manifest)?;
    out.write_all(b"\n")?;
    out.flush()?;
    Ok(path)
}
