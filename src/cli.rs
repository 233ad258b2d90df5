use std::error::Error;
use std::path::PathBuf;

use clap::{Parser, error::ErrorKind};

use crate::config::{FeatureToggles, OutputNaming, RunConfig};
use crate::constants::dataset::DEFAULT_DATASET_DIR;
use crate::constants::output::{
    DEFAULT_FOLDS, DEFAULT_OUTPUT_DIR, DEFAULT_TEST_PREFIX, DEFAULT_TRAIN_PREFIX,
};
use crate::pipeline::{RunSummary, run};

#[derive(Debug, Parser)]
#[command(
    name = "fmfolds",
    disable_help_subcommand = true,
    about = "Generate k-fold libFM / libFFM datasets from MovieLens ratings",
    long_about = "Encode MovieLens ratings.csv and movies.csv into sparse train/test files for libFM, or libffm-regression with --field-aware, one pair per cross-validation fold.",
    after_help = "User and movie features are always emitted. Set RUST_LOG=info for progress output."
)]
/// CLI for `fmfolds`.
///
/// Common usage:
/// - Five folds with every feature block: `fmfolds -t -g --other`
/// - Field-aware output for libFFM: `fmfolds -f -k 10 -o output_ffm`
/// - Reproducible shuffle: `fmfolds --seed 7`
struct FmFoldsCli {
    #[arg(
        long = "prefix-train",
        default_value = DEFAULT_TRAIN_PREFIX,
        help = "File name prefix for training files"
    )]
    prefix_train: String,
    #[arg(
        long = "prefix-test",
        default_value = DEFAULT_TEST_PREFIX,
        help = "File name prefix for test files"
    )]
    prefix_test: String,
    #[arg(
        long,
        value_name = "DATA",
        default_value = DEFAULT_DATASET_DIR,
        help = "Directory containing movies.csv and ratings.csv"
    )]
    dataset: PathBuf,
    #[arg(
        short = 'o',
        long,
        value_name = "DIR",
        default_value = DEFAULT_OUTPUT_DIR,
        help = "Directory receiving the fold files"
    )]
    output: PathBuf,
    #[arg(
        short = 'k',
        default_value_t = DEFAULT_FOLDS,
        value_parser = parse_fold_count,
        help = "Number of cross-validation folds"
    )]
    folds: usize,
    #[arg(short = 't', long, help = "Emit hours since the earliest rating")]
    timestamp: bool,
    #[arg(short = 'g', long, help = "Emit the rated movie's genres")]
    genre: bool,
    #[arg(long = "other", help = "Emit every movie the user rated")]
    history: bool,
    #[arg(
        short = 'f',
        long = "field-aware",
        help = "Write field:index:value tokens (libFFM)"
    )]
    field_aware: bool,
    #[arg(long, help = "Optional deterministic shuffle seed")]
    seed: Option<u64>,
    #[arg(long, help = "Write folds concurrently")]
    parallel: bool,
}

impl From<FmFoldsCli> for RunConfig {
    fn from(cli: FmFoldsCli) -> Self {
        RunConfig {
            dataset_dir: cli.dataset,
            output_dir: cli.output,
            folds: cli.folds,
            toggles: FeatureToggles {
                timestamp: cli.timestamp,
                genre: cli.genre,
                history: cli.history,
                field_aware: cli.field_aware,
            },
            naming: OutputNaming {
                train_prefix: cli.prefix_train,
                test_prefix: cli.prefix_test,
            },
            seed: cli.seed,
            parallel: cli.parallel,
        }
    }
}

/// Parse `args_iter` (without the program name) and run a generation.
pub fn run_cli<I>(args_iter: I) -> Result<(), Box<dyn Error>>
where
    I: Iterator<Item = String>,
{
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();

    let Some(cli) =
        parse_cli::<FmFoldsCli, _>(std::iter::once("fmfolds".to_string()).chain(args_iter))?
    else {
        return Ok(());
    };

    let config = RunConfig::from(cli);
    let summary = run(&config)?;
    print_summary(&config, &summary);
    Ok(())
}

fn parse_fold_count(raw: &str) -> Result<usize, String> {
    let parsed = raw
        .parse::<usize>()
        .map_err(|_| format!("Could not parse -k value '{}' as a positive integer", raw))?;
    if parsed == 0 {
        return Err("-k must be at least 1".to_string());
    }
    Ok(parsed)
}

fn parse_cli<T, I>(args: I) -> Result<Option<T>, Box<dyn Error>>
where
    T: Parser,
    I: IntoIterator,
    I::Item: Into<std::ffi::OsString> + Clone,
{
    match T::try_parse_from(args) {
        Ok(cli) => Ok(Some(cli)),
        Err(err) => match err.kind() {
            ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => {
                err.print()?;
                Ok(None)
            }
            _ => Err(err.into()),
        },
    }
}

fn print_summary(config: &RunConfig, summary: &RunSummary) {
    println!("=== fold generation ===");
    println!("dataset      : {}", config.dataset_dir.display());
    println!("output       : {}", config.output_dir.display());
    println!("users        : {}", summary.users);
    println!("movies       : {}", summary.movies);
    println!("genres       : {}", summary.genres);
    println!("examples     : {}", summary.examples);
    if let Some(earliest) = summary.earliest_event {
        println!("earliest     : {}", earliest.to_rfc3339());
    }
    println!(
        "bag size     : {} ({} discarded)",
        summary.bag_size, summary.discarded
    );
    println!("dimension    : {}", summary.dimension);
    println!("manifest     : {}", summary.manifest.display());
    for fold in &summary.folds {
        println!(
            "[fold {:02}] {} ({} lines), {} ({} lines)",
            fold.fold,
            fold.train.display(),
            fold.train_lines,
            fold.test.display(),
            fold.test_lines
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> FmFoldsCli {
        FmFoldsCli::try_parse_from(std::iter::once("fmfolds").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn defaults_leave_optional_blocks_off() {
        let config = RunConfig::from(parse(&[]));
        assert_eq!(config.folds, 5);
        assert_eq!(config.toggles, FeatureToggles::default());
        assert_eq!(config.dataset_dir, PathBuf::from("ml-latest-small/"));
        assert_eq!(config.output_dir, PathBuf::from("output"));
        assert_eq!(config.naming, OutputNaming::default());
        assert_eq!(config.seed, None);
    }

    #[test]
    fn short_flags_map_to_toggles() {
        let config = RunConfig::from(parse(&["-t", "-g", "--other", "-f", "-k", "10", "-o", "out"]));
        assert_eq!(
            config.toggles,
            FeatureToggles {
                timestamp: true,
                genre: true,
                history: true,
                field_aware: true,
            }
        );
        assert_eq!(config.folds, 10);
        assert_eq!(config.output_dir, PathBuf::from("out"));
    }

    #[test]
    fn zero_folds_is_rejected_at_parse_time() {
        let result = FmFoldsCli::try_parse_from(["fmfolds", "-k", "0"]);
        assert!(result.is_err());
    }

    #[test]
    fn prefixes_and_seed_are_forwarded() {
        let config = RunConfig::from(parse(&[
            "--prefix-train",
            "tr",
            "--prefix-test",
            "te",
            "--seed",
            "9",
        ]));
        assert_eq!(config.naming.train_file(1), "tr01.txt");
        assert_eq!(config.naming.test_file(1), "te01.txt");
        assert_eq!(config.seed, Some(9));
    }

    #[test]
    fn help_is_not_an_error() {
        let parsed = parse_cli::<FmFoldsCli, _>(["fmfolds", "--help"]).unwrap();
        assert!(parsed.is_none());
    }
}
