//! Structural persistence of sessions and the score ledger.
//!
//! The engine owns the *shape* of persisted state; where the bytes live is the
//! embedder's concern. Encoding is bincode over serde. Decoding is defensive:
//! a saved ledger that decodes structurally is then sanitized entry by entry,
//! so one corrupt bucket never poisons the rest.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

use crate::board::Board;
use crate::core::{BoardConfig, ConfigKey, Symbol, SymbolPool};
use crate::scores::{ScoreEntry, ScoreLedger};
use crate::session::{GameSession, Selected, TapRecord};

/// Encode/decode failures around persisted state.
#[derive(Debug, Error)]
pub enum PersistError {
    /// Serialization failed.
    #[error("failed to encode state: {0}")]
    Encode(#[source] bincode::Error),
    /// The byte blob did not decode structurally.
    #[error("failed to decode state: {0}")]
    Decode(#[source] bincode::Error),
}

/// Frozen session state.
///
/// The live start instant is replaced by the elapsed seconds at capture time;
/// restoring back-dates the clock so play resumes seamlessly.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SessionSnapshot {
    /// The negotiated configuration.
    pub config: BoardConfig,
    /// The catalog the board was dealt from.
    pub pool: SymbolPool,
    /// Full board state, locks and reveals included.
    pub board: Board,
    /// The unresolved selection, in tap order.
    pub selection: Vec<Selected>,
    /// Symbols matched so far.
    pub matched: Vec<Symbol>,
    /// Accepted taps, oldest first.
    pub history: Vec<TapRecord>,
    /// Next accepted-tap sequence number.
    pub sequence: u32,
    /// Seconds the session had been running at capture time.
    pub elapsed_seconds: f64,
}

impl SessionSnapshot {
    /// Freeze a session.
    #[must_use]
    pub fn capture(session: &GameSession) -> Self {
        Self {
            config: session.config(),
            pool: session.pool().clone(),
            board: session.board().clone(),
            selection: session.selection().to_vec(),
            matched: session.matched().iter().copied().collect(),
            history: session.history_vector().iter().copied().collect(),
            sequence: session.sequence(),
            elapsed_seconds: session.elapsed_seconds(),
        }
    }

    /// Thaw back into a live session.
    #[must_use]
    pub fn restore(self) -> GameSession {
        GameSession::from_parts(
            self.config,
            self.pool,
            self.board,
            self.selection.into_iter().collect(),
            self.matched.into_iter().collect(),
            self.history.into_iter().collect(),
            self.sequence,
            self.elapsed_seconds,
        )
    }

    /// Encode to bytes.
    pub fn to_bytes(&self) -> Result<Vec<u8>, PersistError> {
        bincode::serialize(self).map_err(PersistError::Encode)
    }

    /// Decode from bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, PersistError> {
        bincode::deserialize(bytes).map_err(PersistError::Decode)
    }
}

/// One persisted scoreboard bucket.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SavedBucket {
    /// The configuration this bucket belongs to.
    pub key: ConfigKey,
    /// Recorded completions, fastest first.
    pub entries: Vec<ScoreEntry>,
}

/// The persisted form of the whole ledger.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct SavedLedger {
    /// All buckets, in snapshot order.
    pub buckets: Vec<SavedBucket>,
}

impl SavedLedger {
    /// Capture a ledger for storage.
    #[must_use]
    pub fn capture(ledger: &ScoreLedger) -> Self {
        Self {
            buckets: ledger
                .snapshot()
                .into_iter()
                .map(|(key, entries)| SavedBucket { key, entries })
                .collect(),
        }
    }

    /// Rebuild a live ledger, skipping entries that fail validation.
    ///
    /// A bucket whose key no longer names a playable configuration for a
    /// `pool_size`-symbol catalog is dropped whole; within surviving buckets,
    /// entries with empty names or unusable times are dropped one at a time.
    /// Recording re-sorts and re-trims, so damaged ordering heals on load.
    #[must_use]
    pub fn into_ledger(self, pool_size: usize) -> ScoreLedger {
        let mut ledger = ScoreLedger::new();
        for bucket in self.buckets {
            if let Err(error) = bucket.key.validate(pool_size) {
                warn!(key = %bucket.key, %error, "skipping unplayable scoreboard bucket");
                continue;
            }
            for entry in bucket.entries {
                if entry.player_name.is_empty() {
                    warn!(key = %bucket.key, "skipping score entry with empty player name");
                    continue;
                }
                ledger.record(bucket.key, entry.player_name, entry.elapsed_seconds);
            }
        }
        ledger
    }

    /// Encode to bytes.
    pub fn to_bytes(&self) -> Result<Vec<u8>, PersistError> {
        bincode::serialize(self).map_err(PersistError::Encode)
    }

    /// Decode from bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, PersistError> {
        bincode::deserialize(bytes).map_err(PersistError::Decode)
    }
}

/// Convenience: ledger straight to bytes.
pub fn save_ledger(ledger: &ScoreLedger) -> Result<Vec<u8>, PersistError> {
    SavedLedger::capture(ledger).to_bytes()
}

/// Convenience: bytes straight to a sanitized ledger.
pub fn load_ledger(bytes: &[u8], pool_size: usize) -> Result<ScoreLedger, PersistError> {
    Ok(SavedLedger::from_bytes(bytes)?.into_ledger(pool_size))
}
