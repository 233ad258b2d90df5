use std::{fmt, io};

use thiserror::Error;

use crate::registry::Category;
use crate::types::{EntityKey, SourceName};

/// Error type for dataset, configuration, and IO failures.
#[derive(Debug, Error)]
pub enum FoldError {
    #[error("{source_name} line {line}: expected {expected} columns, found {found}")]
    MalformedRow {
        source_name: SourceName,
        line: u64,
        expected: usize,
        found: usize,
    },
    #[error("{source_name} line {line}: invalid {column} value '{value}'")]
    InvalidValue {
        source_name: SourceName,
        line: u64,
        column: &'static str,
        value: String,
    },
    #[error("movie '{movie}' has no genres")]
    MissingGenres { movie: EntityKey },
    #[error("unknown {category} key '{key}'")]
    UnknownKey { category: Category, key: EntityKey },
    #[error("unknown {category} id {id}")]
    UnknownId { category: Category, id: usize },
    #[error("no {category} keys to register")]
    EmptyRegistry { category: Category },
    #[error("rating source contains no rows")]
    EmptyDataset,
    #[error("configuration error: {0}")]
    Configuration(String),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Csv(#[from] csv::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Format(#[from] fmt::Error),
}

/// Coarse classification of a [`FoldError`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorClass {
    /// Malformed or inconsistent input data.
    Data,
    /// Invalid run configuration, detected before any file is touched.
    Config,
    /// Filesystem or serialization failure.
    Io,
}

impl FoldError {
    /// Classify this error as a data, configuration, or IO failure.
    pub fn class(&self) -> ErrorClass {
        match self {
            FoldError::MalformedRow { .. }
            | FoldError::InvalidValue { .. }
            | FoldError::MissingGenres { .. }
            | FoldError::UnknownKey { .. }
            | FoldError::UnknownId { .. }
            | FoldError::EmptyRegistry { .. }
            | FoldError::EmptyDataset => ErrorClass::Data,
            FoldError::Configuration(_) => ErrorClass::Config,
            // Readers are flexible, so non-IO csv errors are decoding failures.
            FoldError::Csv(err) if !err.is_io_error() => ErrorClass::Data,
            FoldError::Io(_) | FoldError::Csv(_) | FoldError::Json(_) | FoldError::Format(_) => {
                ErrorClass::Io
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn data_variants_classify_as_data() {
        let err = FoldError::MissingGenres {
            movie: "7".to_string(),
        };
        assert_eq!(err.class(), ErrorClass::Data);
        assert_eq!(err.to_string(), "movie '7' has no genres");

        let err = FoldError::UnknownId {
            category: Category::Genre,
            id: 9,
        };
        assert_eq!(err.class(), ErrorClass::Data);
        assert_eq!(err.to_string(), "unknown genre id 9");
    }

    #[test]
    fn configuration_and_io_are_distinct() {
        let err = FoldError::Configuration("fold count must be at least 1".to_string());
        assert_eq!(err.class(), ErrorClass::Config);

        let err: FoldError = io::Error::new(io::ErrorKind::NotFound, "missing").into();
        assert_eq!(err.class(), ErrorClass::Io);

        let err: FoldError = fmt::Error.into();
        assert_eq!(err.class(), ErrorClass::Io);
    }
}
