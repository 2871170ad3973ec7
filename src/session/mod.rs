//! Game sessions and the selection state machine.
//!
//! A `GameSession` owns one board's play state. The transport delivers taps
//! one at a time; the session validates each, accumulates the selection, and
//! resolves it the moment it reaches the configured group size. The returned
//! [`TapOutcome`] is the only channel back to the caller; the session
//! performs no I/O of its own.
//!
//! ## Tap resolution
//!
//! 1. Taps on unknown coordinates, locked cells, or cells already selected are
//!    absorbed as [`TapOutcome::Ignored`] without touching any state.
//! 2. Otherwise the cell flips face-up and joins the selection; short
//!    selections report [`TapOutcome::Pending`].
//! 3. A full selection resolves atomically: all-identical locks the group and
//!    reports progress (or the win), anything else flips the cells back.

use std::time::Instant;

use im::{HashSet as ImHashSet, Vector};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use tracing::{debug, info};

use crate::board::Board;
use crate::core::{BoardConfig, CellCoord, ConfigError, ConfigKey, GameRng, Symbol, SymbolPool};

/// One entry of the in-progress selection.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selected {
    /// Where the player tapped.
    pub coord: CellCoord,
    /// The symbol that was uncovered.
    pub symbol: Symbol,
}

/// An accepted tap, kept in the session history for replay and debugging.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TapRecord {
    /// Where the player tapped.
    pub coord: CellCoord,
    /// The symbol under the cell.
    pub symbol: Symbol,
    /// Position in the session's accepted-tap sequence.
    pub sequence: u32,
}

/// What a tap did to the session.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum TapOutcome {
    /// Absorbed without any state change: off-board coordinate, locked cell,
    /// or duplicate tap within the current selection.
    Ignored,
    /// The selection is still short of the group size.
    Pending,
    /// The completed selection held differing symbols; its cells flipped back.
    Mismatch,
    /// A full group was uncovered and locked; the board is not finished yet.
    MatchProgress {
        /// The symbol that was matched.
        symbol: Symbol,
    },
    /// The last group was uncovered.
    Win {
        /// Wall-clock seconds from session start to the winning tap.
        elapsed_seconds: f64,
        /// Scoreboard bucket for this board shape.
        config_key: ConfigKey,
    },
}

/// Mutable play state for one board.
#[derive(Clone, Debug, PartialEq)]
pub struct GameSession {
    config: BoardConfig,
    pool: SymbolPool,
    board: Board,
    selection: SmallVec<[Selected; 4]>,
    matched: ImHashSet<Symbol>,
    history: Vector<TapRecord>,
    started: Instant,
    sequence: u32,
}

impl GameSession {
    /// Deal a fresh board and start the clock.
    pub fn start(
        config: BoardConfig,
        pool: SymbolPool,
        rng: &mut GameRng,
    ) -> Result<Self, ConfigError> {
        let board = Board::generate(&config, &pool, rng)?;
        info!(key = %config.key(), "session started");
        Ok(Self {
            config,
            pool,
            board,
            selection: SmallVec::new(),
            matched: ImHashSet::new(),
            history: Vector::new(),
            started: Instant::now(),
            sequence: 0,
        })
    }

    /// Resolve one tap against the session.
    pub fn tap(&mut self, coord: CellCoord) -> TapOutcome {
        let symbol = match self.board.cell(coord) {
            None => return TapOutcome::Ignored,
            Some(cell) if cell.locked => return TapOutcome::Ignored,
            Some(cell) => cell.symbol,
        };
        if self.selection.iter().any(|s| s.coord == coord) {
            return TapOutcome::Ignored;
        }

        if let Some(cell) = self.board.cell_mut(coord) {
            cell.revealed = true;
        }
        self.selection.push(Selected { coord, symbol });

        let sequence = self.sequence;
        self.sequence += 1;
        self.history.push_back(TapRecord {
            coord,
            symbol,
            sequence,
        });

        if (self.selection.len() as u32) < self.config.group_size() {
            return TapOutcome::Pending;
        }
        self.resolve()
    }

    /// Resolve a full selection; clears the buffer atomically on both paths.
    fn resolve(&mut self) -> TapOutcome {
        let first = self.selection[0].symbol;
        let is_match = self.selection.iter().all(|s| s.symbol == first);

        if !is_match {
            for selected in self.selection.drain(..) {
                if let Some(cell) = self.board.cell_mut(selected.coord) {
                    cell.revealed = false;
                }
            }
            debug!("selection mismatched");
            return TapOutcome::Mismatch;
        }

        for selected in self.selection.drain(..) {
            if let Some(cell) = self.board.cell_mut(selected.coord) {
                cell.locked = true;
                cell.revealed = true;
            }
        }
        // Idempotent; the buffer discipline above means a repeat cannot occur.
        self.matched.insert(first);

        if self.matched.len() as u32 == self.config.group_count() {
            let elapsed_seconds = self.elapsed_seconds();
            info!(key = %self.config.key(), elapsed_seconds, "board cleared");
            TapOutcome::Win {
                elapsed_seconds,
                config_key: self.config.key(),
            }
        } else {
            debug!(symbol = %first, "group matched");
            TapOutcome::MatchProgress { symbol: first }
        }
    }

    /// The configuration this session was dealt with.
    #[must_use]
    pub const fn config(&self) -> BoardConfig {
        self.config
    }

    /// The symbol catalog backing this session.
    #[must_use]
    pub fn pool(&self) -> &SymbolPool {
        &self.pool
    }

    /// Current board state.
    #[must_use]
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// The unresolved selection, in tap order.
    #[must_use]
    pub fn selection(&self) -> &[Selected] {
        &self.selection
    }

    /// Symbols matched so far.
    #[must_use]
    pub fn matched_count(&self) -> usize {
        self.matched.len()
    }

    /// Whether a symbol's group has been completed.
    #[must_use]
    pub fn is_matched(&self, symbol: Symbol) -> bool {
        self.matched.contains(&symbol)
    }

    /// Whether every group has been matched.
    #[must_use]
    pub fn is_won(&self) -> bool {
        self.matched.len() as u32 == self.config.group_count()
    }

    /// Accepted taps so far, oldest first.
    pub fn history(&self) -> impl Iterator<Item = TapRecord> + '_ {
        self.history.iter().copied()
    }

    /// Wall-clock seconds since the board was dealt.
    #[must_use]
    pub fn elapsed_seconds(&self) -> f64 {
        self.started.elapsed().as_secs_f64()
    }

    /// Reassemble a session from persisted parts. The start instant is
    /// back-dated so the clock keeps running from the recorded elapsed time.
    pub(crate) fn from_parts(
        config: BoardConfig,
        pool: SymbolPool,
        board: Board,
        selection: SmallVec<[Selected; 4]>,
        matched: ImHashSet<Symbol>,
        history: Vector<TapRecord>,
        sequence: u32,
        elapsed_seconds: f64,
    ) -> Self {
        let elapsed = if elapsed_seconds.is_finite() && elapsed_seconds > 0.0 {
            elapsed_seconds
        } else {
            0.0
        };
        let started = Instant::now()
            .checked_sub(std::time::Duration::from_secs_f64(elapsed))
            .unwrap_or_else(Instant::now);
        Self {
            config,
            pool,
            board,
            selection,
            matched,
            history,
            started,
            sequence,
        }
    }

    pub(crate) fn matched(&self) -> &ImHashSet<Symbol> {
        &self.matched
    }

    pub(crate) fn sequence(&self) -> u32 {
        self.sequence
    }

    pub(crate) fn history_vector(&self) -> &Vector<TapRecord> {
        &self.history
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rustc_hash::FxHashMap;

    fn session(width: u32, height: u32, group_size: u32, seed: u64) -> GameSession {
        let pool = SymbolPool::default();
        let config = BoardConfig::new(width, height, group_size, pool.len()).unwrap();
        GameSession::start(config, pool, &mut GameRng::new(seed)).unwrap()
    }

    /// Coordinates of every cell, grouped by hidden symbol.
    fn groups(session: &GameSession) -> FxHashMap<Symbol, Vec<CellCoord>> {
        let mut map: FxHashMap<Symbol, Vec<CellCoord>> = FxHashMap::default();
        for (coord, cell) in session.board().iter() {
            map.entry(cell.symbol).or_default().push(coord);
        }
        map
    }

    #[test]
    fn test_pending_until_group_complete() {
        let mut session = session(3, 3, 3, 42);
        let groups = groups(&session);
        let coords = groups.values().next().unwrap();

        assert_eq!(session.tap(coords[0]), TapOutcome::Pending);
        assert_eq!(session.tap(coords[1]), TapOutcome::Pending);
        assert_eq!(session.selection().len(), 2);

        let outcome = session.tap(coords[2]);
        assert!(matches!(outcome, TapOutcome::MatchProgress { .. }));
        assert!(session.selection().is_empty());
    }

    #[test]
    fn test_match_locks_cells() {
        let mut session = session(3, 3, 3, 42);
        let groups = groups(&session);
        let (&symbol, coords) = groups.iter().next().unwrap();

        for &coord in coords {
            session.tap(coord);
        }

        for &coord in coords {
            let cell = session.board().cell(coord).unwrap();
            assert!(cell.locked);
            assert!(cell.revealed);
        }
        assert!(session.is_matched(symbol));
        assert_eq!(session.matched_count(), 1);
    }

    #[test]
    fn test_mismatch_flips_cells_back() {
        let mut session = session(3, 3, 3, 42);
        let groups = groups(&session);
        let mut iter = groups.values();
        let first = iter.next().unwrap();
        let second = iter.next().unwrap();

        session.tap(first[0]);
        session.tap(first[1]);
        assert_eq!(session.tap(second[0]), TapOutcome::Mismatch);

        assert!(session.selection().is_empty());
        for coord in [first[0], first[1], second[0]] {
            let cell = session.board().cell(coord).unwrap();
            assert!(!cell.revealed);
            assert!(!cell.locked);
        }
        assert_eq!(session.matched_count(), 0);
    }

    #[test]
    fn test_full_game_ends_in_win() {
        let mut session = session(3, 3, 3, 42);
        let groups = groups(&session);
        let mut outcomes = Vec::new();

        for coords in groups.values() {
            for &coord in coords {
                outcomes.push(session.tap(coord));
            }
        }

        assert!(session.is_won());
        let win = outcomes.last().unwrap();
        match win {
            TapOutcome::Win {
                elapsed_seconds,
                config_key,
            } => {
                assert!(*elapsed_seconds >= 0.0);
                assert_eq!(config_key.to_string(), "3x3/3");
            }
            other => panic!("expected win, got {other:?}"),
        }
        assert_eq!(
            outcomes
                .iter()
                .filter(|o| matches!(o, TapOutcome::MatchProgress { .. }))
                .count(),
            2
        );
    }

    #[test]
    fn test_locked_tap_ignored_repeatedly() {
        let mut session = session(3, 3, 3, 42);
        let groups = groups(&session);
        let coords = groups.values().next().unwrap();

        for &coord in coords {
            session.tap(coord);
        }
        let before = session.matched_count();

        for _ in 0..3 {
            assert_eq!(session.tap(coords[0]), TapOutcome::Ignored);
        }
        assert_eq!(session.matched_count(), before);
        assert!(session.selection().is_empty());
    }

    #[test]
    fn test_duplicate_selection_tap_ignored() {
        let mut session = session(3, 3, 3, 42);
        let coord = CellCoord::new(1, 1);

        assert_eq!(session.tap(coord), TapOutcome::Pending);
        assert_eq!(session.tap(coord), TapOutcome::Ignored);
        assert_eq!(session.selection().len(), 1);
    }

    #[test]
    fn test_off_board_tap_ignored() {
        let mut session = session(3, 3, 3, 42);
        assert_eq!(session.tap(CellCoord::new(0, 0)), TapOutcome::Ignored);
        assert_eq!(session.tap(CellCoord::new(4, 1)), TapOutcome::Ignored);
        assert!(session.selection().is_empty());
        assert!(session.history().next().is_none());
    }

    #[test]
    fn test_selection_never_exceeds_group_size() {
        let mut session = session(4, 4, 4, 9);
        let group_size = session.config().group_size() as usize;

        for coord in session.board().coords_row_major().collect::<Vec<_>>() {
            session.tap(coord);
            assert!(session.selection().len() < group_size);
        }
    }

    #[test]
    fn test_win_is_terminal_for_registry() {
        let mut session = session(2, 2, 2, 3);
        let groups = groups(&session);

        for coords in groups.values() {
            for &coord in coords {
                session.tap(coord);
            }
        }
        assert!(session.is_won());
        let matched = session.matched_count();

        // Every cell is locked now, so no tap can move the registry.
        for coord in session.board().coords_row_major().collect::<Vec<_>>() {
            assert_eq!(session.tap(coord), TapOutcome::Ignored);
        }
        assert_eq!(session.matched_count(), matched);
    }

    #[test]
    fn test_history_records_accepted_taps_only() {
        let mut session = session(3, 3, 3, 42);
        let coord = CellCoord::new(2, 2);

        session.tap(coord);
        session.tap(coord); // duplicate, ignored
        session.tap(CellCoord::new(9, 9)); // off-board, ignored

        let history: Vec<_> = session.history().collect();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].coord, coord);
        assert_eq!(history[0].sequence, 0);
    }
}
