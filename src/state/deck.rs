//! Card deck generation: layout parsing, candidate selection and shuffling.

use rand::{Rng, seq::SliceRandom};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Immutable card template shared by every instance of a pair (or group).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardDefinition {
    /// Identifier shared by all instances that match together.
    pub content_id: u32,
    /// Icon class rendered on the card face.
    pub icon: String,
    /// Fire-safety tip revealed with the card.
    pub tip: String,
    /// Optional illustration path for image-based layouts.
    pub image: Option<String>,
}

/// One placed card on the board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CardInstance {
    /// Unique per-deck identifier, assigned sequentially starting at 1.
    pub instance_id: u32,
    /// Template this instance was materialized from.
    pub definition: CardDefinition,
}

impl CardInstance {
    /// Content identifier used for match detection.
    pub fn content_id(&self) -> u32 {
        self.definition.content_id
    }
}

/// How many instances of each selected definition a layout materializes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LayoutKind {
    /// Two instances per definition, drawn from the full pool.
    Pairs,
    /// Two instances per definition, drawn from illustrated cards only.
    IllustratedPairs,
    /// Three instances per definition (the 3x3 grid variant).
    Triplets,
}

/// Grid layout parsed from a difficulty tag such as `"3x2"` or `"5x4"`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    columns: u32,
    rows: u32,
    kind: LayoutKind,
}

impl Layout {
    /// Parse a layout tag.
    ///
    /// The `3x2` and `3x4` grids draw from illustrated cards only and the
    /// `3x3` grid plays groups of three; every other tag (including ones that
    /// do not parse as `<cols>x<rows>`) behaves as a plain pair layout.
    pub fn from_tag(tag: &str) -> Self {
        let (columns, rows) = parse_dimensions(tag).unwrap_or((0, 0));
        let kind = match tag {
            "3x2" | "3x4" => LayoutKind::IllustratedPairs,
            "3x3" => LayoutKind::Triplets,
            _ => LayoutKind::Pairs,
        };

        Self {
            columns,
            rows,
            kind,
        }
    }

    /// Number of columns in the grid, zero when the tag did not parse.
    pub fn columns(&self) -> u32 {
        self.columns
    }

    /// Number of rows in the grid, zero when the tag did not parse.
    pub fn rows(&self) -> u32 {
        self.rows
    }

    /// Instances materialized per selected definition.
    pub fn group_size(&self) -> usize {
        match self.kind {
            LayoutKind::Pairs | LayoutKind::IllustratedPairs => 2,
            LayoutKind::Triplets => 3,
        }
    }

    /// Number of groups that fit on this grid, derived from its dimensions.
    pub fn group_count(&self) -> usize {
        (self.columns as usize * self.rows as usize) / self.group_size()
    }

    fn illustrated_only(&self) -> bool {
        matches!(self.kind, LayoutKind::IllustratedPairs)
    }
}

fn parse_dimensions(tag: &str) -> Option<(u32, u32)> {
    let (columns, rows) = tag.split_once('x')?;
    Some((columns.parse().ok()?, rows.parse().ok()?))
}

/// Generate a shuffled deck for `pair_count` groups using the thread RNG.
pub fn generate(pool: &[CardDefinition], pair_count: usize, layout: &Layout) -> Deck {
    generate_with_rng(pool, pair_count, layout, &mut rand::rng())
}

/// Generate a shuffled deck with a caller-supplied RNG.
///
/// Selection shuffles the candidate pool and truncates it to `pair_count`,
/// then materializes `layout.group_size()` instances per selected definition
/// and shuffles the placements (Fisher-Yates via [`SliceRandom::shuffle`]).
/// Passing a seeded RNG makes both shuffles reproducible.
pub fn generate_with_rng<R: Rng + ?Sized>(
    pool: &[CardDefinition],
    pair_count: usize,
    layout: &Layout,
    rng: &mut R,
) -> Deck {
    let mut candidates: Vec<CardDefinition> = if layout.illustrated_only() {
        pool.iter()
            .filter(|definition| definition.image.is_some())
            .cloned()
            .collect()
    } else {
        pool.to_vec()
    };

    let effective = if pair_count > candidates.len() {
        warn!(
            requested = pair_count,
            available = candidates.len(),
            "requested more pairs than available card definitions; capping"
        );
        candidates.len()
    } else {
        pair_count
    };

    candidates.shuffle(rng);
    candidates.truncate(effective);

    let mut cards = Vec::with_capacity(effective * layout.group_size());
    let mut next_instance_id = 1u32;
    for definition in candidates {
        for _ in 0..layout.group_size() {
            cards.push(CardInstance {
                instance_id: next_instance_id,
                definition: definition.clone(),
            });
            next_instance_id += 1;
        }
    }

    cards.shuffle(rng);

    Deck { cards }
}

/// Ordered sequence of placed cards, fixed after the generation shuffle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Deck {
    cards: Vec<CardInstance>,
}

impl Deck {
    /// Build a deck from an already-ordered card sequence.
    pub fn from_cards(cards: Vec<CardInstance>) -> Self {
        Self { cards }
    }

    /// Placed cards in board order.
    pub fn cards(&self) -> &[CardInstance] {
        &self.cards
    }

    /// Number of cards on the board.
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    /// Whether the deck holds no cards.
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Content identifier of the card at `index`.
    ///
    /// # Panics
    /// Panics when `index` is out of range; callers supply board indices for
    /// an existing deck.
    pub fn content_id(&self, index: usize) -> u32 {
        self.cards[index].content_id()
    }

    /// Number of distinct content identifiers present in the deck.
    pub fn distinct_content_count(&self) -> usize {
        let mut seen: Vec<u32> = self.cards.iter().map(CardInstance::content_id).collect();
        seen.sort_unstable();
        seen.dedup();
        seen.len()
    }
}
