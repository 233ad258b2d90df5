use chrono::{DateTime, Utc};
use tracing::info;

use crate::data::{Example, MovieCatalog, RatingRow};
use crate::errors::FoldError;
use crate::registry::{Category, IdentityMap};

/// Fully materialized dataset with every rating rewritten into ID form.
///
/// Built once from the complete input; immutable afterwards.
#[derive(Clone, Debug)]
pub struct Dataset {
    users: IdentityMap,
    movies: IdentityMap,
    genres: IdentityMap,
    examples: Vec<Example>,
    earliest: i64,
}

impl Dataset {
    /// Register users, rated movies, and catalogued genres, then resolve every
    /// rating against them. Timestamps become offsets from the earliest rating.
    pub fn resolve(catalog: &MovieCatalog, rows: Vec<RatingRow>) -> Result<Self, FoldError> {
        let earliest = rows
            .iter()
            .map(|row| row.timestamp)
            .min()
            .ok_or(FoldError::EmptyDataset)?;

        let users = IdentityMap::from_keys(Category::User, rows.iter().map(|row| row.user.as_str()))?;
        let movies =
            IdentityMap::from_keys(Category::Movie, rows.iter().map(|row| row.movie.as_str()))?;
        let genres = IdentityMap::from_keys(Category::Genre, catalog.genre_keys())?;
        info!(
            users = users.len(),
            movies = movies.len(),
            genres = genres.len(),
            "registered identities"
        );

        let mut examples = Vec::with_capacity(rows.len());
        for row in rows {
            let genre_keys = catalog
                .genres_of(&row.movie)
                .ok_or_else(|| FoldError::UnknownKey {
                    category: Category::Movie,
                    key: row.movie.clone(),
                })?;
            let mut genre_ids = genre_keys
                .iter()
                .map(|genre| genres.id_of(genre))
                .collect::<Result<Vec<_>, _>>()?;
            genre_ids.sort_unstable();
            examples.push(Example {
                user: users.id_of(&row.user)?,
                movie: movies.id_of(&row.movie)?,
                genres: genre_ids,
                rating: row.rating,
                // `earliest` is the minimum, so the difference is non-negative.
                timestamp: row.timestamp.abs_diff(earliest),
            });
        }

        Ok(Self {
            users,
            movies,
            genres,
            examples,
            earliest,
        })
    }

    /// User registry.
    pub fn users(&self) -> &IdentityMap {
        &self.users
    }

    /// Movie registry; covers rated movies only.
    pub fn movies(&self) -> &IdentityMap {
        &self.movies
    }

    /// Genre registry; covers every catalogued genre.
    pub fn genres(&self) -> &IdentityMap {
        &self.genres
    }

    /// Resolved examples in input order.
    pub fn examples(&self) -> &[Example] {
        &self.examples
    }

    /// Take ownership of the resolved examples.
    pub fn into_examples(self) -> Vec<Example> {
        self.examples
    }

    /// Raw timestamp of the earliest rating, in seconds.
    pub fn earliest_timestamp(&self) -> i64 {
        self.earliest
    }

    /// Earliest rating as a UTC time, when representable.
    pub fn earliest_event(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.earliest, 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(user: &str, movie: &str, rating: &str, timestamp: i64) -> RatingRow {
        RatingRow {
            user: user.into(),
            movie: movie.into(),
            rating: rating.into(),
            timestamp,
        }
    }

    fn catalog() -> MovieCatalog {
        let mut catalog = MovieCatalog::new();
        catalog.insert("10", ["Drama", "Action"]).unwrap();
        catalog.insert("20", ["Comedy"]).unwrap();
        catalog.insert("30", ["Horror"]).unwrap();
        catalog
    }

    #[test]
    fn resolves_ids_and_normalizes_timestamps() {
        let rows = vec![
            row("b", "20", "4.0", 1_000_500),
            row("a", "10", "3.5", 1_000_000),
        ];
        let dataset = Dataset::resolve(&catalog(), rows).unwrap();

        assert_eq!(dataset.users().len(), 2);
        // Unrated movie 30 is not registered; its genre is.
        assert_eq!(dataset.movies().len(), 2);
        assert_eq!(dataset.genres().len(), 4);
        assert_eq!(dataset.earliest_timestamp(), 1_000_000);

        let examples = dataset.examples();
        assert_eq!(examples[0].user, 1);
        assert_eq!(examples[0].movie, 1);
        assert_eq!(examples[0].timestamp, 500);
        assert_eq!(examples[0].rating, "4.0");
        assert_eq!(examples[1].user, 0);
        assert_eq!(examples[1].timestamp, 0);

        let action = dataset.genres().id_of("Action").unwrap();
        let drama = dataset.genres().id_of("Drama").unwrap();
        assert_eq!(examples[1].genres, vec![action, drama]);
    }

    #[test]
    fn rating_for_uncatalogued_movie_is_rejected() {
        let rows = vec![row("a", "99", "1.0", 5)];
        let err = Dataset::resolve(&catalog(), rows).unwrap_err();
        assert!(matches!(
            err,
            FoldError::UnknownKey {
                category: Category::Movie,
                ..
            }
        ));
    }

    #[test]
    fn empty_rating_source_is_rejected() {
        let err = Dataset::resolve(&catalog(), Vec::new()).unwrap_err();
        assert!(matches!(err, FoldError::EmptyDataset));
    }

    #[test]
    fn earliest_event_renders_as_utc() {
        let rows = vec![row("a", "10", "3.0", 0)];
        let dataset = Dataset::resolve(&catalog(), rows).unwrap();
        assert_eq!(
            dataset.earliest_event().map(|ts| ts.to_rfc3339()),
            Some("1970-01-01T00:00:00+00:00".to_string())
        );
    }
}
