//! Cell coordinates and their wire format.
//!
//! Coordinates are 1-based: the top-left cell is `(1, 1)`. The transport
//! addresses cells with the compact `"x_y"` string it carries in button
//! callback data, so `CellCoord` round-trips through that format.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// A 1-based cell coordinate on the board.
///
/// ```
/// use tilematch::core::CellCoord;
///
/// let coord: CellCoord = "3_2".parse().unwrap();
/// assert_eq!(coord, CellCoord::new(3, 2));
/// assert_eq!(coord.to_string(), "3_2");
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCoord {
    /// Column, starting at 1.
    pub x: u32,
    /// Row, starting at 1.
    pub y: u32,
}

impl CellCoord {
    /// Create a new coordinate.
    #[must_use]
    pub const fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }
}

impl std::fmt::Display for CellCoord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}_{}", self.x, self.y)
    }
}

/// Callback data that does not look like `"x_y"`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
#[error("coordinate must look like \"3_2\"")]
pub struct ParseCoordError;

impl FromStr for CellCoord {
    type Err = ParseCoordError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (x, y) = s.split_once('_').ok_or(ParseCoordError)?;
        let x = x.parse().map_err(|_| ParseCoordError)?;
        let y = y.parse().map_err(|_| ParseCoordError)?;
        Ok(Self { x, y })
    }
}
