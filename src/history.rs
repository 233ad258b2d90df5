use crate::data::{Example, MovieId, Timestamp, UserId};
use crate::errors::FoldError;
use crate::registry::Category;

/// One past interaction of a user.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HistoryEntry {
    /// Seconds since the dataset's earliest event.
    pub timestamp: Timestamp,
    /// Rated movie.
    pub movie: MovieId,
}

/// Per-user rating history ordered by time.
///
/// Entries with equal timestamps keep their input order. Repeated ratings of
/// the same movie stay as separate entries.
#[derive(Clone, Debug)]
pub struct HistoryIndex {
    by_user: Vec<Vec<HistoryEntry>>,
}

impl HistoryIndex {
    /// Build the index for a user ID space of `user_count`.
    pub fn build(user_count: usize, examples: &[Example]) -> Result<Self, FoldError> {
        let mut by_user = vec![Vec::new(); user_count];
        for example in examples {
            let entries = by_user
                .get_mut(example.user)
                .ok_or(FoldError::UnknownId {
                    category: Category::User,
                    id: example.user,
                })?;
            entries.push(HistoryEntry {
                timestamp: example.timestamp,
                movie: example.movie,
            });
        }
        for entries in &mut by_user {
            entries.sort_by_key(|entry| entry.timestamp);
        }
        Ok(Self { by_user })
    }

    /// History of `user`, oldest first. Empty for IDs outside the index.
    pub fn entries(&self, user: UserId) -> &[HistoryEntry] {
        self.by_user.get(user).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Number of users covered.
    pub fn user_count(&self) -> usize {
        self.by_user.len()
    }
}
