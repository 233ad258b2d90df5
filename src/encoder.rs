//! Sparse line encoding in libFM (`index:value`) or libFFM
//! (`field:index:value`) token format.

use std::fmt::{self, Write as _};
use std::io::Write;

use crate::constants::encoding::{SECONDS_PER_HOUR, TOKEN_SEPARATOR, VALUE_PRECISION};
use crate::data::Example;
use crate::errors::FoldError;
use crate::history::HistoryIndex;
use crate::layout::{BlockKind, FeatureBlock, FeatureLayout};
use crate::registry::Category;
use crate::types::{FeatureIndex, FieldIndex};

/// Value part of a feature token.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum TokenValue {
    /// Indicator feature, written as `1`.
    One,
    /// Fractional feature, written with fixed precision.
    Weight(f64),
}

impl TokenValue {
    /// Numeric value.
    pub fn as_f64(self) -> f64 {
        match self {
            TokenValue::One => 1.0,
            TokenValue::Weight(value) => value,
        }
    }
}

impl fmt::Display for TokenValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenValue::One => f.write_str("1"),
            TokenValue::Weight(value) => write!(f, "{value:.VALUE_PRECISION$}"),
        }
    }
}

/// One sparse feature.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FeatureToken {
    pub kind: BlockKind,
    pub field: FieldIndex,
    pub index: FeatureIndex,
    pub value: TokenValue,
}

impl FeatureToken {
    fn in_block(block: &FeatureBlock, local: usize, value: TokenValue) -> Self {
        Self {
            kind: block.kind,
            field: block.field,
            index: block.index(local),
            value,
        }
    }

    fn write_to<W: fmt::Write>(&self, out: &mut W, field_aware: bool) -> fmt::Result {
        if field_aware {
            write!(
                out,
                "{}{TOKEN_SEPARATOR}{}{TOKEN_SEPARATOR}{}",
                self.field, self.index, self.value
            )
        } else {
            write!(out, "{}{TOKEN_SEPARATOR}{}", self.index, self.value)
        }
    }
}

/// Encodes examples against a fixed layout.
#[derive(Clone, Copy, Debug)]
pub struct LineEncoder<'a> {
    layout: &'a FeatureLayout,
    history: Option<&'a HistoryIndex>,
    field_aware: bool,
}

impl<'a> LineEncoder<'a> {
    /// Encoder for `layout`; `field_aware` selects the libFFM token format.
    pub fn new(layout: &'a FeatureLayout, field_aware: bool) -> Self {
        Self {
            layout,
            history: None,
            field_aware,
        }
    }

    /// Attach the history index used by the history block.
    pub fn with_history(mut self, history: &'a HistoryIndex) -> Self {
        self.history = Some(history);
        self
    }

    /// Feature tokens of `example` in layout order.
    pub fn tokens(&self, example: &Example) -> Result<Vec<FeatureToken>, FoldError> {
        let mut tokens = Vec::new();
        for block in self.layout.blocks() {
            match block.kind {
                BlockKind::User => {
                    let local = within(block, example.user, Category::User)?;
                    tokens.push(FeatureToken::in_block(block, local, TokenValue::One));
                }
                BlockKind::Movie => {
                    let local = within(block, example.movie, Category::Movie)?;
                    tokens.push(FeatureToken::in_block(block, local, TokenValue::One));
                }
                BlockKind::Timestamp => {
                    let hours = example.timestamp as f64 / SECONDS_PER_HOUR;
                    tokens.push(FeatureToken::in_block(block, 0, TokenValue::Weight(hours)));
                }
                BlockKind::Genre => {
                    let weight = TokenValue::Weight(1.0 / example.genres.len() as f64);
                    for &genre in &example.genres {
                        let local = within(block, genre, Category::Genre)?;
                        tokens.push(FeatureToken::in_block(block, local, weight));
                    }
                }
                BlockKind::History => {
                    let history = self.history.ok_or_else(|| {
                        FoldError::Configuration(
                            "history block enabled without a history index".to_string(),
                        )
                    })?;
                    let entries = history.entries(example.user);
                    let weight = TokenValue::Weight(1.0 / entries.len() as f64);
                    // One token per entry, repeated movies included.
                    for entry in entries {
                        let local = within(block, entry.movie, Category::Movie)?;
                        tokens.push(FeatureToken::in_block(block, local, weight));
                    }
                }
            }
        }
        Ok(tokens)
    }

    /// Render `example` as one newline-terminated line.
    pub fn encode(&self, example: &Example) -> Result<String, FoldError> {
        let tokens = self.tokens(example)?;
        let mut line = String::with_capacity(example.rating.len() + tokens.len() * 12 + 1);
        line.push_str(&example.rating);
        for token in &tokens {
            line.push(' ');
            token.write_to(&mut line, self.field_aware)?;
        }
        line.push('\n');
        Ok(line)
    }

    /// Encode `example` and write it to `out`.
    pub fn write_line<W: Write + ?Sized>(&self, out: &mut W, example: &Example) -> Result<(), FoldError> {
        out.write_all(self.encode(example)?.as_bytes())?;
        Ok(())
    }
}

fn within(block: &FeatureBlock, id: usize, category: Category) -> Result<usize, FoldError> {
    if id < block.width {
        Ok(id)
    } else {
        Err(FoldError::UnknownId { category, id })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FeatureToggles;
    use crate::layout::LayoutSizes;

    const SIZES: LayoutSizes = LayoutSizes {
        users: 2,
        movies: 3,
        genres: 4,
    };

    fn example() -> Example {
        Example {
            user: 1,
            movie: 2,
            genres: vec![0, 3],
            rating: "4.5".into(),
            timestamp: 5400,
        }
    }

    fn history() -> HistoryIndex {
        let rows = vec![
            Example {
                movie: 0,
                timestamp: 10,
                ..example()
            },
            example(),
            Example {
                movie: 0,
                timestamp: 20,
                ..example()
            },
        ];
        HistoryIndex::build(SIZES.users, &rows).unwrap()
    }

    #[test]
    fn mandatory_blocks_render_plain_tokens() {
        let layout = FeatureLayout::plan(&FeatureToggles::default(), SIZES);
        let line = LineEncoder::new(&layout, false).encode(&example()).unwrap();
        assert_eq!(line, "4.5 1:1 4:1\n");
    }

    #[test]
    fn every_block_in_field_aware_format() {
        let toggles = FeatureToggles {
            timestamp: true,
            genre: true,
            history: true,
            field_aware: true,
        };
        let layout = FeatureLayout::plan(&toggles, SIZES);
        let history = history();
        let line = LineEncoder::new(&layout, true)
            .with_history(&history)
            .encode(&example())
            .unwrap();
        // user 0..2, movie 2..5, timestamp 5, genre 6..10, history 10..13
        assert_eq!(
            line,
            "4.5 0:1:1 1:4:1 2:5:1.5000 3:6:0.5000 3:9:0.5000 \
             4:10:0.3333 4:10:0.3333 4:12:0.3333\n"
        );
    }

    #[test]
    fn field_aware_only_adds_field_prefix() {
        let toggles = FeatureToggles {
            timestamp: true,
            genre: true,
            history: true,
            field_aware: false,
        };
        let layout = FeatureLayout::plan(&toggles, SIZES);
        let history = history();
        let plain = LineEncoder::new(&layout, false)
            .with_history(&history)
            .encode(&example())
            .unwrap();
        let aware = LineEncoder::new(&layout, true)
            .with_history(&history)
            .encode(&example())
            .unwrap();
        let plain_tokens: Vec<&str> = plain.split_whitespace().collect();
        let aware_tokens: Vec<&str> = aware.split_whitespace().collect();
        assert_eq!(plain_tokens.len(), aware_tokens.len());
        assert_eq!(plain_tokens[0], aware_tokens[0]);
        for (plain, aware) in plain_tokens.iter().zip(&aware_tokens).skip(1) {
            let (_, rest) = aware.split_once(':').unwrap();
            assert_eq!(rest, *plain);
        }
    }

    #[test]
    fn genre_and_history_weights_sum_to_one() {
        let toggles = FeatureToggles {
            genre: true,
            history: true,
            ..FeatureToggles::default()
        };
        let layout = FeatureLayout::plan(&toggles, SIZES);
        let history = history();
        let tokens = LineEncoder::new(&layout, false)
            .with_history(&history)
            .tokens(&example())
            .unwrap();
        for kind in [BlockKind::Genre, BlockKind::History] {
            let sum: f64 = tokens
                .iter()
                .filter(|token| token.kind == kind)
                .map(|token| token.value.as_f64())
                .sum();
            assert!((sum - 1.0).abs() < 1e-9, "{kind} weights sum to {sum}");
        }
    }

    #[test]
    fn out_of_range_genre_is_a_data_error() {
        let toggles = FeatureToggles {
            genre: true,
            ..FeatureToggles::default()
        };
        let layout = FeatureLayout::plan(&toggles, SIZES);
        let bad = Example {
            genres: vec![4],
            ..example()
        };
        let err = LineEncoder::new(&layout, false).encode(&bad).unwrap_err();
        assert!(matches!(
            err,
            FoldError::UnknownId {
                category: Category::Genre,
                id: 4
            }
        ));
    }

    #[test]
    fn history_block_requires_index() {
        let toggles = FeatureToggles {
            history: true,
            ..FeatureToggles::default()
        };
        let layout = FeatureLayout::plan(&toggles, SIZES);
        assert!(LineEncoder::new(&layout, false).encode(&example()).is_err());
    }

    #[test]
    fn token_rendering_matches_format() {
        let token = FeatureToken {
            kind: BlockKind::Genre,
            field: 3,
            index: 9,
            value: TokenValue::Weight(0.5),
        };
        let mut plain = String::new();
        token.write_to(&mut plain, false).unwrap();
        assert_eq!(plain, "9:0.5000");
        let mut aware = String::new();
        token.write_to(&mut aware, true).unwrap();
        assert_eq!(aware, "3:9:0.5000");
    }

    #[test]
    fn write_line_appends_to_writer() {
        let layout = FeatureLayout::plan(&FeatureToggles::default(), SIZES);
        let encoder = LineEncoder::new(&layout, false);
        let mut out = Vec::new();
        encoder.write_line(&mut out, &example()).unwrap();
        encoder.write_line(&mut out, &example()).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "4.5 1:1 4:1\n4.5 1:1 4:1\n");
    }
}
