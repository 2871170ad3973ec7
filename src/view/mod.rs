//! Display projection of a session.
//!
//! A pure function of session state: the transport turns each [`CellView`]
//! into a button, using the glyph as the label and the coordinate's `"x_y"`
//! form as the callback data. The engine never renders anything itself.

use serde::{Deserialize, Serialize};

use crate::core::CellCoord;
use crate::session::GameSession;

/// Placeholder shown for cells that are still face-down.
pub const HIDDEN_GLYPH: &str = "❓";

/// One renderable cell.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellView {
    /// Coordinate to embed in the button's callback data.
    pub coord: CellCoord,
    /// Glyph to show: the symbol when face-up, [`HIDDEN_GLYPH`] otherwise.
    pub glyph: String,
}

/// A full board, row by row, ready for the transport to lay out.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardView {
    /// Board width in cells.
    pub width: u32,
    /// Board height in cells.
    pub height: u32,
    /// Rows top to bottom, each left to right.
    pub rows: Vec<Vec<CellView>>,
}

impl BoardView {
    /// Project a session's current board state.
    #[must_use]
    pub fn project(session: &GameSession) -> Self {
        let board = session.board();
        let mut rows = Vec::with_capacity(board.height() as usize);

        for y in 1..=board.height() {
            let mut row = Vec::with_capacity(board.width() as usize);
            for x in 1..=board.width() {
                let coord = CellCoord::new(x, y);
                let glyph = match board.cell(coord) {
                    Some(cell) if cell.revealed || cell.locked => session
                        .pool()
                        .glyph(cell.symbol)
                        .expect("board symbols come from the session pool")
                        .to_string(),
                    _ => HIDDEN_GLYPH.to_string(),
                };
                row.push(CellView { coord, glyph });
            }
            rows.push(row);
        }

        Self {
            width: board.width(),
            height: board.height(),
            rows,
        }
    }

    /// Count of cells currently showing their symbol.
    #[must_use]
    pub fn face_up_count(&self) -> usize {
        self.rows
            .iter()
            .flatten()
            .filter(|cell| cell.glyph != HIDDEN_GLYPH)
            .count()
    }
}
