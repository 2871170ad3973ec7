//! Board configuration and validation.
//!
//! A `BoardConfig` is negotiated once per session and immutable thereafter.
//! Every constructor path funnels through [`BoardConfig::new`], which enforces
//! the full invariant set against the symbol pool in use:
//!
//! - both dimensions positive and within the transport's rendering limits
//! - total cells divisible by the group size
//! - at least two distinguishable groups
//! - no more groups than the catalog has symbols

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Widest board the transport renders (inline keyboards cap out at 8 buttons
/// per row).
pub const MAX_WIDTH: u32 = 8;

/// Tallest board the transport renders comfortably.
pub const MAX_HEIGHT: u32 = 10;

/// Largest group size a configuration may request; bounds the cell-count
/// ceiling together with the pool size.
pub const MAX_GROUP_SIZE: u32 = 8;

/// Setup validation failures.
///
/// All recoverable: the negotiator stays in its current state and the
/// `Display` text doubles as the re-prompt shown to the player.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// Input did not look like `<width>x<height>`.
    #[error("that doesn't look like board dimensions; send something like \"4x4\"")]
    DimensionFormat,
    /// Width or height was zero.
    #[error("both dimensions must be at least 1")]
    ZeroDimension,
    /// Width exceeds [`MAX_WIDTH`].
    #[error("the board can be at most {MAX_WIDTH} cells wide")]
    TooWide,
    /// Height exceeds [`MAX_HEIGHT`].
    #[error("the board can be at most {MAX_HEIGHT} cells tall")]
    TooTall,
    /// Fewer than two cells in total.
    #[error("a board needs at least 2 cells")]
    TooFewCells,
    /// More cells than the catalog could ever fill.
    #[error("that board is too big; the most this catalog supports is {max} cells")]
    TooManyCells {
        /// Pool-derived cell ceiling.
        max: u32,
    },
    /// Group-size input did not parse as an integer.
    #[error("send a single number for the group size, like \"3\"")]
    GroupSizeFormat,
    /// Group size outside `2..=cells`.
    #[error("group size must be between 2 and {cells}")]
    GroupSizeRange {
        /// Total cells on the requested board.
        cells: u32,
    },
    /// Cells do not divide evenly into groups.
    #[error("{cells} cells can't be split into groups of {group_size}")]
    IndivisibleCells {
        /// Total cells on the requested board.
        cells: u32,
        /// Requested group size.
        group_size: u32,
    },
    /// The whole board would be one group.
    #[error("that setup leaves only one group; matching needs at least two")]
    TooFewGroups,
    /// More groups requested than the catalog has symbols.
    #[error("{groups} symbol groups requested but the catalog only has {pool_size}")]
    PoolExhausted {
        /// Requested group count.
        groups: u32,
        /// Symbols available in the pool.
        pool_size: u32,
    },
    /// A finished negotiation was advanced again.
    #[error("setup is already finished; start a new game to change it")]
    SetupComplete,
}

/// A validated board configuration.
///
/// Fields are private so an invalid combination can never be constructed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BoardConfig {
    width: u32,
    height: u32,
    group_size: u32,
}

impl BoardConfig {
    /// Validate and build a configuration against a pool of `pool_size`
    /// symbols.
    ///
    /// Checks run in the order the negotiator reports them: dimensions first,
    /// then group-size rules.
    pub fn new(
        width: u32,
        height: u32,
        group_size: u32,
        pool_size: usize,
    ) -> Result<Self, ConfigError> {
        Self::validate_dimensions(width, height, pool_size)?;

        let cells = width * height;
        if group_size <= 1 || group_size > cells {
            return Err(ConfigError::GroupSizeRange { cells });
        }
        if cells % group_size != 0 {
            return Err(ConfigError::IndivisibleCells { cells, group_size });
        }

        let groups = cells / group_size;
        if groups <= 1 {
            return Err(ConfigError::TooFewGroups);
        }
        if groups > pool_size as u32 {
            return Err(ConfigError::PoolExhausted {
                groups,
                pool_size: pool_size as u32,
            });
        }

        Ok(Self {
            width,
            height,
            group_size,
        })
    }

    /// Validate dimensions alone, before a group size has been chosen.
    pub fn validate_dimensions(width: u32, height: u32, pool_size: usize) -> Result<(), ConfigError> {
        if width == 0 || height == 0 {
            return Err(ConfigError::ZeroDimension);
        }
        if width > MAX_WIDTH {
            return Err(ConfigError::TooWide);
        }
        if height > MAX_HEIGHT {
            return Err(ConfigError::TooTall);
        }

        let cells = width * height;
        if cells < 2 {
            return Err(ConfigError::TooFewCells);
        }
        let max = pool_size as u32 * MAX_GROUP_SIZE;
        if cells > max {
            return Err(ConfigError::TooManyCells { max });
        }

        Ok(())
    }

    /// Board width in cells.
    #[must_use]
    pub const fn width(self) -> u32 {
        self.width
    }

    /// Board height in cells.
    #[must_use]
    pub const fn height(self) -> u32 {
        self.height
    }

    /// Number of identical cells that make a match.
    #[must_use]
    pub const fn group_size(self) -> u32 {
        self.group_size
    }

    /// Total number of cells.
    #[must_use]
    pub const fn cells(self) -> u32 {
        self.width * self.height
    }

    /// Number of distinct symbol groups on the board.
    #[must_use]
    pub const fn group_count(self) -> u32 {
        self.cells() / self.group_size
    }

    /// The scoreboard bucket this configuration records into.
    #[must_use]
    pub const fn key(self) -> ConfigKey {
        ConfigKey {
            width: self.width,
            height: self.height,
            group_size: self.group_size,
        }
    }
}

/// Scoreboard bucket identifier derived from a configuration.
///
/// ```
/// use tilematch::core::{BoardConfig, SymbolPool};
///
/// let pool = SymbolPool::default();
/// let config = BoardConfig::new(3, 3, 3, pool.len()).unwrap();
/// assert_eq!(config.key().to_string(), "3x3/3");
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ConfigKey {
    /// Board width.
    pub width: u32,
    /// Board height.
    pub height: u32,
    /// Group size.
    pub group_size: u32,
}

impl ConfigKey {
    /// Re-validate this key against a pool, recovering the configuration.
    ///
    /// Used when loading persisted state that may not match the running
    /// catalog.
    pub fn validate(self, pool_size: usize) -> Result<BoardConfig, ConfigError> {
        BoardConfig::new(self.width, self.height, self.group_size, pool_size)
    }
}

impl std::fmt::Display for ConfigKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}/{}", self.width, self.height, self.group_size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const POOL: usize = 16;

    #[test]
    fn test_valid_config() {
        let config = BoardConfig::new(3, 3, 3, POOL).unwrap();
        assert_eq!(config.cells(), 9);
        assert_eq!(config.group_count(), 3);
        assert_eq!(config.key().to_string(), "3x3/3");
    }

    #[test]
    fn test_dimension_bounds() {
        assert_eq!(
            BoardConfig::new(0, 3, 3, POOL),
            Err(ConfigError::ZeroDimension)
        );
        assert_eq!(BoardConfig::new(9, 3, 3, POOL), Err(ConfigError::TooWide));
        assert_eq!(BoardConfig::new(3, 11, 3, POOL), Err(ConfigError::TooTall));
    }

    #[test]
    fn test_cell_ceiling_tracks_pool() {
        // A 3-glyph catalog caps boards at 3 * MAX_GROUP_SIZE = 24 cells.
        assert_eq!(
            BoardConfig::validate_dimensions(5, 5, 3),
            Err(ConfigError::TooManyCells { max: 24 })
        );
        assert!(BoardConfig::validate_dimensions(4, 6, 3).is_ok());
    }

    #[test]
    fn test_group_size_rules() {
        assert_eq!(
            BoardConfig::new(3, 3, 1, POOL),
            Err(ConfigError::GroupSizeRange { cells: 9 })
        );
        assert_eq!(
            BoardConfig::new(3, 3, 10, POOL),
            Err(ConfigError::GroupSizeRange { cells: 9 })
        );
        assert_eq!(
            BoardConfig::new(3, 3, 2, POOL),
            Err(ConfigError::IndivisibleCells {
                cells: 9,
                group_size: 2
            })
        );
        // group_size == cells passes divisibility but leaves a single group.
        assert_eq!(
            BoardConfig::new(2, 2, 4, POOL),
            Err(ConfigError::TooFewGroups)
        );
    }

    #[test]
    fn test_pool_capacity() {
        // 8x10 with pairs would need 40 symbols.
        assert_eq!(
            BoardConfig::new(8, 10, 2, POOL),
            Err(ConfigError::PoolExhausted {
                groups: 40,
                pool_size: 16
            })
        );
        // Groups of five fit exactly: 80 / 5 = 16.
        assert!(BoardConfig::new(8, 10, 5, POOL).is_ok());
    }

    #[test]
    fn test_key_ordering_is_deterministic() {
        let mut keys = vec![
            BoardConfig::new(4, 4, 2, POOL).unwrap().key(),
            BoardConfig::new(3, 3, 3, POOL).unwrap().key(),
            BoardConfig::new(3, 4, 2, POOL).unwrap().key(),
        ];
        keys.sort();
        let shown: Vec<_> = keys.iter().map(ConfigKey::to_string).collect();
        assert_eq!(shown, vec!["3x3/3", "3x4/2", "4x4/2"]);
    }

    #[test]
    fn test_key_validate_round_trip() {
        let config = BoardConfig::new(4, 4, 4, POOL).unwrap();
        assert_eq!(config.key().validate(POOL), Ok(config));
        // The same key fails against a pool too small for four groups.
        assert!(config.key().validate(3).is_err());
    }

    #[test]
    fn test_serialization() {
        let config = BoardConfig::new(3, 3, 3, POOL).unwrap();
        let json = serde_json::to_string(&config).unwrap();
        let back: BoardConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back, config);
    }
}
