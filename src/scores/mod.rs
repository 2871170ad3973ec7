//! Completion-time ledger.
//!
//! One bucket per board configuration, fastest times first, capped at
//! [`MAX_ENTRIES`]. The ledger is shared across every session in the process;
//! callers serialize access with a single lock (see `service`).

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::core::ConfigKey;

/// Most entries kept per configuration.
pub const MAX_ENTRIES: usize = 10;

/// One recorded completion.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScoreEntry {
    /// Display name of the player who cleared the board.
    pub player_name: String,
    /// Wall-clock seconds from deal to final match.
    pub elapsed_seconds: f64,
}

/// Ranked completion times, keyed by board configuration.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ScoreLedger {
    buckets: FxHashMap<ConfigKey, Vec<ScoreEntry>>,
}

impl ScoreLedger {
    /// Create an empty ledger.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a completion time.
    ///
    /// The bucket is re-sorted ascending (stable, so earlier entries win ties)
    /// and trimmed to [`MAX_ENTRIES`]. Non-finite or negative times are
    /// dropped.
    pub fn record(
        &mut self,
        key: ConfigKey,
        player_name: impl Into<String>,
        elapsed_seconds: f64,
    ) {
        if !elapsed_seconds.is_finite() || elapsed_seconds < 0.0 {
            warn!(%key, elapsed_seconds, "dropping unusable completion time");
            return;
        }

        let bucket = self.buckets.entry(key).or_default();
        bucket.push(ScoreEntry {
            player_name: player_name.into(),
            elapsed_seconds,
        });
        bucket.sort_by(|a, b| a.elapsed_seconds.total_cmp(&b.elapsed_seconds));
        bucket.truncate(MAX_ENTRIES);
    }

    /// Entries for one configuration, fastest first. Empty if none recorded.
    #[must_use]
    pub fn query(&self, key: ConfigKey) -> &[ScoreEntry] {
        self.buckets.get(&key).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Every configuration with recorded history, in no particular order.
    ///
    /// Callers sort the keys themselves for deterministic display.
    pub fn list_configs(&self) -> impl Iterator<Item = ConfigKey> + '_ {
        self.buckets
            .iter()
            .filter(|(_, entries)| !entries.is_empty())
            .map(|(key, _)| *key)
    }

    /// All buckets, sorted by key for a stable scoreboard view.
    #[must_use]
    pub fn snapshot(&self) -> Vec<(ConfigKey, Vec<ScoreEntry>)> {
        let mut buckets: Vec<_> = self
            .buckets
            .iter()
            .filter(|(_, entries)| !entries.is_empty())
            .map(|(key, entries)| (*key, entries.clone()))
            .collect();
        buckets.sort_by_key(|(key, _)| *key);
        buckets
    }

    /// Number of configurations with history.
    #[must_use]
    pub fn len(&self) -> usize {
        self.buckets
            .values()
            .filter(|entries| !entries.is_empty())
            .count()
    }

    /// Check whether anything has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
