//! Board generation and cell state.
//!
//! ## Generation
//!
//! Symbol choice is deterministic (the first `group_count` catalog entries,
//! so pool usage stays predictable across games) while placement is a uniform
//! random permutation of the whole deck. Cells are assigned row-major: `y`
//! outer, `x` inner, both 1-based.
//!
//! ## Cell lifecycle
//!
//! `locked` is monotonic: once a cell's group has been matched it never covers
//! up again. `revealed` is transient and only true while the cell sits in the
//! unresolved selection (or together with `locked`).

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::core::{BoardConfig, CellCoord, ConfigError, GameRng, Symbol, SymbolPool};

/// One cell of the board.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    /// Hidden symbol under this cell.
    pub symbol: Symbol,
    /// Face-up right now (in the current selection, or matched).
    pub revealed: bool,
    /// Permanently uncovered as part of a completed match.
    pub locked: bool,
}

/// A dealt board: dimensions plus per-coordinate cell state.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    width: u32,
    height: u32,
    cells: FxHashMap<CellCoord, Cell>,
}

impl Board {
    /// Deal a board for a validated configuration.
    ///
    /// Fails only if the configuration and pool disagree; the negotiator
    /// rejects such combinations before they reach generation.
    pub fn generate(
        config: &BoardConfig,
        pool: &SymbolPool,
        rng: &mut GameRng,
    ) -> Result<Self, ConfigError> {
        let groups = config.group_count();
        if groups <= 1 {
            return Err(ConfigError::TooFewGroups);
        }
        if groups as usize > pool.len() {
            return Err(ConfigError::PoolExhausted {
                groups,
                pool_size: pool.len() as u32,
            });
        }

        let mut deck: Vec<Symbol> = pool
            .first(groups as usize)
            .flat_map(|symbol| std::iter::repeat(symbol).take(config.group_size() as usize))
            .collect();
        rng.shuffle(&mut deck);

        let mut cells = FxHashMap::default();
        let mut deck = deck.into_iter();
        for y in 1..=config.height() {
            for x in 1..=config.width() {
                let symbol = deck.next().expect("deck holds one symbol per cell");
                cells.insert(
                    CellCoord::new(x, y),
                    Cell {
                        symbol,
                        revealed: false,
                        locked: false,
                    },
                );
            }
        }

        Ok(Self {
            width: config.width(),
            height: config.height(),
            cells,
        })
    }

    /// Board width in cells.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Board height in cells.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Total number of cells.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Check if the board has no cells.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Whether a coordinate lies on this board.
    #[must_use]
    pub fn contains(&self, coord: CellCoord) -> bool {
        self.cells.contains_key(&coord)
    }

    /// Get a cell.
    #[must_use]
    pub fn cell(&self, coord: CellCoord) -> Option<&Cell> {
        self.cells.get(&coord)
    }

    pub(crate) fn cell_mut(&mut self, coord: CellCoord) -> Option<&mut Cell> {
        self.cells.get_mut(&coord)
    }

    /// All coordinates in row-major order (`y` outer, `x` inner).
    pub fn coords_row_major(&self) -> impl Iterator<Item = CellCoord> + '_ {
        (1..=self.height).flat_map(move |y| (1..=self.width).map(move |x| CellCoord::new(x, y)))
    }

    /// All cells in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = (CellCoord, &Cell)> {
        self.coords_row_major().filter_map(move |coord| {
            self.cells.get(&coord).map(|cell| (coord, cell))
        })
    }

    /// Number of permanently uncovered cells.
    #[must_use]
    pub fn locked_count(&self) -> usize {
        self.cells.values().filter(|c| c.locked).count()
    }
}
