//! Symbol catalog.
//!
//! A `SymbolPool` is an ordered, read-only list of display glyphs. Boards draw
//! the first `group_count` entries in catalog order, so pool usage stays
//! predictable across games; the pool's size bounds how many distinct groups a
//! configuration may request.

use serde::{Deserialize, Serialize};
use tracing::warn;

/// Default catalog: the fruit glyphs the original chat game shipped with,
/// extended to sixteen entries.
pub const DEFAULT_GLYPHS: [&str; 16] = [
    "🍓", "🍌", "🍉", "🍇", "🍒", "🍍", "🥝", "🍑", "🍋", "🍎", "🥥", "🍈", "🫐", "🍐", "🍊",
    "🥭",
];

/// Index of a symbol within its pool.
///
/// Cells and the matched-set registry store `Symbol` values; the glyph is only
/// looked up at render time.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Symbol(pub u16);

impl Symbol {
    /// Create a new symbol index.
    #[must_use]
    pub const fn new(index: u16) -> Self {
        Self(index)
    }

    /// Get the raw catalog index.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl std::fmt::Display for Symbol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Symbol({})", self.0)
    }
}

/// Ordered catalog of unique display glyphs.
///
/// ```
/// use tilematch::core::{Symbol, SymbolPool};
///
/// let pool = SymbolPool::default();
/// assert_eq!(pool.glyph(Symbol::new(0)), Some("🍓"));
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SymbolPool {
    glyphs: Vec<String>,
}

impl Default for SymbolPool {
    fn default() -> Self {
        Self::new(DEFAULT_GLYPHS)
    }
}

impl SymbolPool {
    /// Build a pool from glyphs, keeping the first occurrence of any duplicate.
    pub fn new<I, S>(glyphs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut seen = Vec::new();
        for glyph in glyphs {
            let glyph = glyph.into();
            if seen.contains(&glyph) {
                warn!(%glyph, "duplicate glyph dropped from symbol pool");
                continue;
            }
            seen.push(glyph);
        }
        Self { glyphs: seen }
    }

    /// Number of symbols in the catalog.
    #[must_use]
    pub fn len(&self) -> usize {
        self.glyphs.len()
    }

    /// Check if the catalog is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.glyphs.is_empty()
    }

    /// Look up a symbol's glyph.
    #[must_use]
    pub fn glyph(&self, symbol: Symbol) -> Option<&str> {
        self.glyphs.get(symbol.index()).map(String::as_str)
    }

    /// The first `count` symbols in catalog order.
    pub fn first(&self, count: usize) -> impl Iterator<Item = Symbol> + '_ {
        (0..count.min(self.glyphs.len()) as u16).map(Symbol)
    }

    /// Iterate over all `(symbol, glyph)` pairs in catalog order.
    pub fn iter(&self) -> impl Iterator<Item = (Symbol, &str)> {
        self.glyphs
            .iter()
            .enumerate()
            .map(|(i, g)| (Symbol(i as u16), g.as_str()))
    }
}
