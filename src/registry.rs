//! Dense integer identities for categorical keys.
//!
//! Each category (users, movies, genres) gets its own [`IdentityMap`]. IDs are
//! assigned in lexicographic key order so that the same key set always yields
//! the same IDs, independent of the order keys were observed in.

use indexmap::IndexSet;
use std::collections::BTreeSet;
use std::fmt;

use crate::errors::FoldError;
use crate::types::EntityKey;

/// Categorical key space.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Category {
    /// Raters.
    User,
    /// Rated items.
    Movie,
    /// Movie genres.
    Genre,
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Category::User => "user",
            Category::Movie => "movie",
            Category::Genre => "genre",
        };
        f.write_str(name)
    }
}

/// Bijection between the keys of one category and `0..len`.
#[derive(Clone, Debug)]
pub struct IdentityMap {
    category: Category,
    // Position in the set is the ID.
    ids: IndexSet<EntityKey>,
}

impl IdentityMap {
    /// Assign IDs to `keys` in sorted order. Duplicates collapse to one ID.
    pub fn from_keys<I>(category: Category, keys: I) -> Result<Self, FoldError>
    where
        I: IntoIterator,
        I::Item: Into<EntityKey>,
    {
        let sorted: BTreeSet<EntityKey> = keys.into_iter().map(Into::into).collect();
        if sorted.is_empty() {
            return Err(FoldError::EmptyRegistry { category });
        }
        let ids = sorted.into_iter().collect();
        Ok(Self { category, ids })
    }

    /// Category this map covers.
    pub fn category(&self) -> Category {
        self.category
    }

    /// Number of registered keys (the size of the ID space).
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// True when no keys are registered. Never true for a constructed map.
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// ID for `key`, if registered.
    pub fn get(&self, key: &str) -> Option<usize> {
        self.ids.get_index_of(key)
    }

    /// ID for `key`, failing with [`FoldError::UnknownKey`] when absent.
    pub fn id_of(&self, key: &str) -> Result<usize, FoldError> {
        self.get(key).ok_or_else(|| FoldError::UnknownKey {
            category: self.category,
            key: key.to_string(),
        })
    }

    /// Key registered under `id`.
    pub fn key_of(&self, id: usize) -> Result<&str, FoldError> {
        self.ids
            .get_index(id)
            .map(String::as_str)
            .ok_or(FoldError::UnknownId {
                category: self.category,
                id,
            })
    }

    /// Fail with [`FoldError::UnknownId`] unless `id` is inside the ID space.
    pub fn check(&self, id: usize) -> Result<usize, FoldError> {
        if id < self.len() {
            Ok(id)
        } else {
            Err(FoldError::UnknownId {
                category: self.category,
                id,
            })
        }
    }

    /// Keys in ID order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.ids.iter().map(String::as_str)
    }
}
