//! Feature block layout for one output file generation.
//!
//! Enabled blocks are laid out in the canonical order user, movie, timestamp,
//! genre, history. Field indices count enabled blocks only; offsets are the
//! running sum of the widths of the enabled blocks before each one.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::config::FeatureToggles;
use crate::types::{FeatureIndex, FieldIndex};

/// Semantic feature group.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlockKind {
    /// One-hot user.
    User,
    /// One-hot movie.
    Movie,
    /// Single real-valued hours-since-first-event feature.
    Timestamp,
    /// Multi-hot genres of the rated movie.
    Genre,
    /// Multi-hot movies from the user's rating history.
    History,
}

impl BlockKind {
    /// Every block in canonical layout order.
    pub const CANONICAL_ORDER: [BlockKind; 5] = [
        BlockKind::User,
        BlockKind::Movie,
        BlockKind::Timestamp,
        BlockKind::Genre,
        BlockKind::History,
    ];

    /// Whether `toggles` enable this block. User and movie are always on.
    pub fn enabled_by(self, toggles: &FeatureToggles) -> bool {
        match self {
            BlockKind::User | BlockKind::Movie => true,
            BlockKind::Timestamp => toggles.timestamp,
            BlockKind::Genre => toggles.genre,
            BlockKind::History => toggles.history,
        }
    }

    fn width(self, sizes: &LayoutSizes) -> usize {
        match self {
            BlockKind::User => sizes.users,
            BlockKind::Movie | BlockKind::History => sizes.movies,
            BlockKind::Timestamp => 1,
            BlockKind::Genre => sizes.genres,
        }
    }
}

impl fmt::Display for BlockKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            BlockKind::User => "user",
            BlockKind::Movie => "movie",
            BlockKind::Timestamp => "timestamp",
            BlockKind::Genre => "genre",
            BlockKind::History => "history",
        };
        f.write_str(name)
    }
}

/// Sizes of the ID spaces that determine block widths.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayoutSizes {
    pub users: usize,
    pub movies: usize,
    pub genres: usize,
}

/// A contiguous range of global feature indices owned by one block.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureBlock {
    pub kind: BlockKind,
    pub field: FieldIndex,
    pub offset: FeatureIndex,
    pub width: usize,
}

impl FeatureBlock {
    /// Global index of local position `local` inside the block.
    pub fn index(&self, local: usize) -> FeatureIndex {
        self.offset + local
    }

    /// One past the last global index of the block.
    pub fn end(&self) -> FeatureIndex {
        self.offset + self.width
    }
}

/// Ordered enabled blocks with their fields and offsets.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureLayout {
    blocks: Vec<FeatureBlock>,
}

impl FeatureLayout {
    /// Plan the layout for `toggles` over ID spaces of `sizes`.
    pub fn plan(toggles: &FeatureToggles, sizes: LayoutSizes) -> Self {
        let mut blocks = Vec::with_capacity(BlockKind::CANONICAL_ORDER.len());
        let mut offset = 0;
        for kind in BlockKind::CANONICAL_ORDER {
            if !kind.enabled_by(toggles) {
                continue;
            }
            let width = kind.width(&sizes);
            blocks.push(FeatureBlock {
                kind,
                field: blocks.len(),
                offset,
                width,
            });
            offset += width;
        }
        Self { blocks }
    }

    /// Enabled blocks in layout order.
    pub fn blocks(&self) -> &[FeatureBlock] {
        &self.blocks
    }

    /// Block of `kind`, if enabled.
    pub fn block(&self, kind: BlockKind) -> Option<&FeatureBlock> {
        self.blocks.iter().find(|block| block.kind == kind)
    }

    /// Total number of global feature indices.
    pub fn dimension(&self) -> usize {
        self.blocks.last().map(FeatureBlock::end).unwrap_or(0)
    }

    /// Number of fields (enabled blocks).
    pub fn field_count(&self) -> usize {
        self.blocks.len()
    }
}
