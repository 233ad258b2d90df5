use std::collections::{BTreeMap, BTreeSet};

use crate::errors::FoldError;

pub use crate::types::{EntityKey, GenreId, MovieId, RawRating, Timestamp, UserId};

/// Movie key to genre-key set, as read from the movie source.
///
/// Every movie maps to at least one genre.
#[derive(Clone, Debug, Default)]
pub struct MovieCatalog {
    genres_by_movie: BTreeMap<EntityKey, BTreeSet<EntityKey>>,
    // Every genre seen on any row, including rows later replaced.
    all_genres: BTreeSet<EntityKey>,
}

impl MovieCatalog {
    /// Empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `movie` with `genres`, replacing any earlier row for the same movie.
    ///
    /// Genres of a replaced row stay in [`MovieCatalog::genre_keys`].
    pub fn insert<I, G>(&mut self, movie: impl Into<EntityKey>, genres: I) -> Result<(), FoldError>
    where
        I: IntoIterator<Item = G>,
        G: Into<EntityKey>,
    {
        let movie = movie.into();
        let genres: BTreeSet<EntityKey> = genres
            .into_iter()
            .map(Into::into)
            .filter(|genre: &EntityKey| !genre.is_empty())
            .collect();
        if genres.is_empty() {
            return Err(FoldError::MissingGenres { movie });
        }
        self.all_genres.extend(genres.iter().cloned());
        self.genres_by_movie.insert(movie, genres);
        Ok(())
    }

    /// Genre set of `movie`.
    pub fn genres_of(&self, movie: &str) -> Option<&BTreeSet<EntityKey>> {
        self.genres_by_movie.get(movie)
    }

    /// Every distinct genre key seen on any inserted row.
    pub fn genre_keys(&self) -> BTreeSet<&str> {
        self.all_genres.iter().map(String::as_str).collect()
    }

    /// Number of catalogued movies.
    pub fn len(&self) -> usize {
        self.genres_by_movie.len()
    }

    /// True when no movie has been registered.
    pub fn is_empty(&self) -> bool {
        self.genres_by_movie.is_empty()
    }
}

/// One rating row in raw key form.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RatingRow {
    /// Raw user key.
    pub user: EntityKey,
    /// Raw movie key.
    pub movie: EntityKey,
    /// Rating value, kept verbatim for output.
    pub rating: RawRating,
    /// Raw event time in seconds.
    pub timestamp: i64,
}

/// A rating resolved against the identity registries.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Example {
    /// Dense user ID.
    pub user: UserId,
    /// Dense movie ID.
    pub movie: MovieId,
    /// Dense IDs of the movie's genres, ascending.
    pub genres: Vec<GenreId>,
    /// Rating value, kept verbatim for output.
    pub rating: RawRating,
    /// Seconds since the dataset's earliest event.
    pub timestamp: Timestamp,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_drops_blank_genre_tokens() {
        let mut catalog = MovieCatalog::new();
        catalog.insert("1", ["Action", "", "Action"]).unwrap();
        let genres = catalog.genres_of("1").unwrap();
        assert_eq!(genres.len(), 1);
        assert!(genres.contains("Action"));
    }

    #[test]
    fn catalog_rejects_movies_without_genres() {
        let mut catalog = MovieCatalog::new();
        let err = catalog.insert("9", [""]).unwrap_err();
        assert!(matches!(err, FoldError::MissingGenres { movie } if movie == "9"));
        assert!(catalog.is_empty());
    }

    #[test]
    fn genre_keys_are_distinct_across_movies() {
        let mut catalog = MovieCatalog::new();
        catalog.insert("1", ["Action", "Comedy"]).unwrap();
        catalog.insert("2", ["Comedy", "Drama"]).unwrap();
        let keys: Vec<&str> = catalog.genre_keys().into_iter().collect();
        assert_eq!(keys, ["Action", "Comedy", "Drama"]);
        assert_eq!(catalog.len(), 2);
    }

    #[test]
    fn repeated_movie_keeps_last_row_but_every_genre() {
        let mut catalog = MovieCatalog::new();
        catalog.insert("1", ["Action", "Western"]).unwrap();
        catalog.insert("1", ["Action"]).unwrap();
        catalog.insert("2", ["Comedy"]).unwrap();

        let genres: Vec<&str> = catalog.genres_of("1").unwrap().iter().map(String::as_str).collect();
        assert_eq!(genres, ["Action"]);
        let keys: Vec<&str> = catalog.genre_keys().into_iter().collect();
        assert_eq!(keys, ["Action", "Comedy", "Western"]);
        assert_eq!(catalog.len(), 2);
    }
}
