//! CSV readers for the MovieLens movie and rating files.
//!
//! Readers return their results as values; nothing is accumulated in shared
//! state. Both files start with a header row that is logged and skipped.

use csv::{ReaderBuilder, StringRecord};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::{debug, info};

use crate::constants::dataset::{GENRE_DELIMITER, MOVIE_COLUMNS, RATING_COLUMNS};
use crate::data::{MovieCatalog, RatingRow};
use crate::errors::FoldError;

/// Read `movieId,title,genres` rows into a catalog.
pub fn read_movies<R: Read>(source_name: &str, reader: R) -> Result<MovieCatalog, FoldError> {
    let mut csv = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);
    let header = csv.headers()?.clone();
    info!(source = source_name, ?header, "reading movies");

    let mut catalog = MovieCatalog::new();
    for record in csv.records() {
        let record = record?;
        check_width(source_name, &record, MOVIE_COLUMNS)?;
        let movie = &record[0];
        catalog.insert(movie, record[2].split(GENRE_DELIMITER))?;
    }
    debug!(source = source_name, movies = catalog.len(), "movies loaded");
    Ok(catalog)
}

/// Read `userId,movieId,rating,timestamp` rows.
pub fn read_ratings<R: Read>(source_name: &str, reader: R) -> Result<Vec<RatingRow>, FoldError> {
    let mut csv = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);
    let header = csv.headers()?.clone();
    info!(source = source_name, ?header, "reading ratings");

    let mut rows = Vec::new();
    for record in csv.records() {
        let record = record?;
        check_width(source_name, &record, RATING_COLUMNS)?;
        let timestamp = record[3]
            .trim()
            .parse::<i64>()
            .map_err(|_| FoldError::InvalidValue {
                source_name: source_name.to_string(),
                line: line_of(&record),
                column: "timestamp",
                value: record[3].to_string(),
            })?;
        rows.push(RatingRow {
            user: record[0].to_string(),
            movie: record[1].to_string(),
            rating: record[2].to_string(),
            timestamp,
        });
    }
    debug!(source = source_name, ratings = rows.len(), "ratings loaded");
    Ok(rows)
}

/// Open and read a movie file.
pub fn load_movies(path: &Path) -> Result<MovieCatalog, FoldError> {
    read_movies(&display_name(path), File::open(path)?)
}

/// Open and read a rating file.
pub fn load_ratings(path: &Path) -> Result<Vec<RatingRow>, FoldError> {
    read_ratings(&display_name(path), File::open(path)?)
}

fn check_width(source_name: &str, record: &StringRecord, expected: usize) -> Result<(), FoldError> {
    if record.len() == expected {
        return Ok(());
    }
    Err(FoldError::MalformedRow {
        source_name: source_name.to_string(),
        line: line_of(record),
        expected,
        found: record.len(),
    })
}

fn line_of(record: &StringRecord) -> u64 {
    record.position().map(|pos| pos.line()).unwrap_or(0)
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
