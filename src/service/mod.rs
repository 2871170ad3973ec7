//! Process-wide game facade.
//!
//! One `GameService` serves every chat. It keeps per-chat negotiation state,
//! one mutex per live session (taps against different boards never contend),
//! and a single lock around the shared score ledger. The transport calls in
//! with raw message text and raw callback data; everything it needs to render
//! comes back as values.
//!
//! Lock order is fixed (negotiations, then sessions, then the session mutex,
//! then scores) and no lock is held across calls back into the transport.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock};

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

use crate::core::{CellCoord, ConfigKey, GameRng, SymbolPool};
use crate::negotiate::{NegotiationReply, Negotiator};
use crate::persist::{self, PersistError};
use crate::scores::{ScoreEntry, ScoreLedger};
use crate::session::{GameSession, TapOutcome};
use crate::view::BoardView;

/// Identifier of the chat (or player) a session belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChatId(pub i64);

impl ChatId {
    /// Create a new chat ID.
    #[must_use]
    pub const fn new(id: i64) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for ChatId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Chat({})", self.0)
    }
}

/// A tap or board request arrived for a chat with no live session.
///
/// Surfaced to the player as "this game has expired"; never a crash.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
#[error("no game is running here; finish setup or start a new one")]
pub struct MissingSession;

/// Reply to one setup message.
#[derive(Clone, Debug, PartialEq)]
pub enum SetupReply {
    /// Show this text and wait for the player's next message.
    Prompt(String),
    /// The board is dealt; render it.
    Ready(BoardView),
}

/// Result of one resolved tap.
#[derive(Clone, Debug, PartialEq)]
pub struct TapReport {
    /// What the tap did.
    pub outcome: TapOutcome,
    /// The board as it should now be drawn.
    pub view: BoardView,
}

/// The engine facade a transport drives.
pub struct GameService {
    pool: SymbolPool,
    rng: Mutex<GameRng>,
    negotiations: Mutex<FxHashMap<ChatId, Negotiator>>,
    sessions: RwLock<FxHashMap<ChatId, Arc<Mutex<GameSession>>>>,
    scores: Mutex<ScoreLedger>,
}

/// Recover the guard from a poisoned lock; engine state is mutated only
/// behind complete operations, so the value inside is always usable.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl GameService {
    /// Create a service with an OS-seeded generator.
    #[must_use]
    pub fn new(pool: SymbolPool) -> Self {
        Self::with_rng(pool, GameRng::from_entropy())
    }

    /// Create a service with a fixed seed, for reproducible boards.
    #[must_use]
    pub fn with_seed(pool: SymbolPool, seed: u64) -> Self {
        Self::with_rng(pool, GameRng::new(seed))
    }

    fn with_rng(pool: SymbolPool, rng: GameRng) -> Self {
        Self {
            pool,
            rng: Mutex::new(rng),
            negotiations: Mutex::new(FxHashMap::default()),
            sessions: RwLock::new(FxHashMap::default()),
            scores: Mutex::new(ScoreLedger::new()),
        }
    }

    /// Start (or restart) setup for a chat, dropping any game in progress.
    ///
    /// Returns the first prompt to show.
    pub fn begin(&self, chat: ChatId) -> String {
        self.sessions
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&chat);

        let mut negotiations = lock(&self.negotiations);
        let negotiator = Negotiator::new(self.pool.clone());
        let prompt = negotiator.prompt().to_string();
        negotiations.insert(chat, negotiator);
        info!(%chat, "setup started");
        prompt
    }

    /// Feed one setup message from a chat.
    ///
    /// Validation failures come back as the next prompt; the player just sees
    /// the diagnostic and answers again. A chat with no negotiation in
    /// progress gets one started implicitly.
    pub fn negotiate(&self, chat: ChatId, input: &str) -> SetupReply {
        let mut negotiations = lock(&self.negotiations);
        let negotiator = negotiations
            .entry(chat)
            .or_insert_with(|| Negotiator::new(self.pool.clone()));

        let result = negotiator.advance(input, &mut lock(&self.rng));
        match result {
            Ok(NegotiationReply::GroupSizePrompt { .. }) => {
                SetupReply::Prompt(negotiator.prompt().to_string())
            }
            Ok(NegotiationReply::Ready(session)) => {
                let view = BoardView::project(&session);
                negotiations.remove(&chat);
                self.sessions
                    .write()
                    .unwrap_or_else(PoisonError::into_inner)
                    .insert(chat, Arc::new(Mutex::new(*session)));
                SetupReply::Ready(view)
            }
            Err(error) => {
                debug!(%chat, %error, "setup input rejected");
                SetupReply::Prompt(error.to_string())
            }
        }
    }

    /// Resolve one tapped button for a chat.
    ///
    /// `data` is the raw callback payload; anything that does not name a live
    /// cell resolves to [`TapOutcome::Ignored`] rather than an error, so
    /// double-clicks and taps on stale boards cost nothing. A winning tap
    /// records `player_name` on the scoreboard before returning.
    pub fn tap(
        &self,
        chat: ChatId,
        data: &str,
        player_name: &str,
    ) -> Result<TapReport, MissingSession> {
        let session = self
            .sessions
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&chat)
            .cloned()
            .ok_or(MissingSession)?;
        let mut session = lock(&session);

        let outcome = match data.parse::<CellCoord>() {
            Ok(coord) => session.tap(coord),
            Err(_) => {
                debug!(%chat, data, "unparseable callback data ignored");
                TapOutcome::Ignored
            }
        };

        if let TapOutcome::Win {
            elapsed_seconds,
            config_key,
        } = outcome
        {
            lock(&self.scores).record(config_key, player_name, elapsed_seconds);
        }

        Ok(TapReport {
            outcome,
            view: BoardView::project(&session),
        })
    }

    /// Current board for a chat, if a game is running.
    pub fn board(&self, chat: ChatId) -> Result<BoardView, MissingSession> {
        let session = self
            .sessions
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&chat)
            .cloned()
            .ok_or(MissingSession)?;
        let session = lock(&session);
        Ok(BoardView::project(&session))
    }

    /// Whether a chat has a live session.
    #[must_use]
    pub fn has_session(&self, chat: ChatId) -> bool {
        self.sessions
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(&chat)
    }

    /// Drop a chat's session and any setup in progress.
    ///
    /// Returns true if there was anything to drop.
    pub fn abandon(&self, chat: ChatId) -> bool {
        let dropped_session = self
            .sessions
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&chat)
            .is_some();
        let dropped_negotiation = lock(&self.negotiations).remove(&chat).is_some();
        dropped_session || dropped_negotiation
    }

    /// All scoreboard buckets, sorted by configuration key.
    #[must_use]
    pub fn scoreboard(&self) -> Vec<(ConfigKey, Vec<ScoreEntry>)> {
        lock(&self.scores).snapshot()
    }

    /// Encode the ledger for the embedder's store.
    pub fn save_scores(&self) -> Result<Vec<u8>, PersistError> {
        persist::save_ledger(&lock(&self.scores))
    }

    /// Replace the ledger from the embedder's store, sanitizing entry by
    /// entry.
    pub fn load_scores(&self, bytes: &[u8]) -> Result<(), PersistError> {
        let ledger = persist::load_ledger(bytes, self.pool.len())?;
        *lock(&self.scores) = ledger;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ready_service() -> (GameService, ChatId) {
        let service = GameService::with_seed(SymbolPool::default(), 42);
        let chat = ChatId::new(1);
        service.begin(chat);
        assert!(matches!(
            service.negotiate(chat, "3x3"),
            SetupReply::Prompt(_)
        ));
        assert!(matches!(
            service.negotiate(chat, "3"),
            SetupReply::Ready(_)
        ));
        (service, chat)
    }

    #[test]
    fn test_setup_flow_produces_session() {
        let (service, chat) = ready_service();
        assert!(service.has_session(chat));

        let view = service.board(chat).unwrap();
        assert_eq!(view.rows.len(), 3);
        assert_eq!(view.face_up_count(), 0);
    }

    #[test]
    fn test_rejected_input_reprompts() {
        let service = GameService::with_seed(SymbolPool::default(), 0);
        let chat = ChatId::new(2);
        service.begin(chat);

        let SetupReply::Prompt(text) = service.negotiate(chat, "banana") else {
            panic!("expected a prompt");
        };
        assert!(text.contains("4x4"), "diagnostic was {text:?}");
        assert!(!service.has_session(chat));
    }

    #[test]
    fn test_tap_without_session_is_missing() {
        let service = GameService::with_seed(SymbolPool::default(), 0);
        assert_eq!(
            service.tap(ChatId::new(9), "1_1", "ada"),
            Err(MissingSession)
        );
        assert_eq!(service.board(ChatId::new(9)), Err(MissingSession));
    }

    #[test]
    fn test_garbage_callback_data_ignored() {
        let (service, chat) = ready_service();
        let report = service.tap(chat, "not-a-coordinate", "ada").unwrap();
        assert_eq!(report.outcome, TapOutcome::Ignored);
        assert_eq!(report.view.face_up_count(), 0);
    }

    #[test]
    fn test_begin_discards_running_game() {
        let (service, chat) = ready_service();
        service.begin(chat);
        assert!(!service.has_session(chat));
    }

    #[test]
    fn test_abandon() {
        let (service, chat) = ready_service();
        assert!(service.abandon(chat));
        assert!(!service.abandon(chat));
        assert!(!service.has_session(chat));
    }
}
