//! # tilematch
//!
//! A turn-based tile-matching puzzle engine: players reveal cells on a grid
//! trying to uncover groups of N identical hidden symbols. The crate is the
//! session engine only: board generation, the selection state machine, win
//! detection, and score recording. The chat transport that renders buttons
//! and delivers taps is an external collaborator.
//!
//! ## Design Principles
//!
//! 1. **No I/O in the engine**: every interaction returns a value
//!    ([`TapOutcome`], [`SetupReply`], [`BoardView`]); the transport decides
//!    what to draw or send.
//!
//! 2. **Errors are values**: setup problems re-prompt, stale taps are
//!    absorbed, and a missing session is a message. Nothing is fatal to the
//!    process.
//!
//! 3. **Deterministic where it matters**: symbol choice follows catalog
//!    order and boards are reproducible from a seed, while placement is a
//!    uniform random permutation.
//!
//! ## Modules
//!
//! - `core`: coordinates, configuration, symbol catalog, RNG
//! - `board`: board generation and cell state
//! - `session`: one board's play state and the tap state machine
//! - `negotiate`: the two-step setup dialogue
//! - `scores`: ranked completion times per configuration
//! - `view`: pure display projection for the transport
//! - `service`: process-wide facade (sessions by chat, shared ledger)
//! - `persist`: structural snapshots of sessions and the ledger
//!
//! ## Example
//!
//! ```
//! use tilematch::{ChatId, GameService, SetupReply, SymbolPool};
//!
//! let service = GameService::with_seed(SymbolPool::default(), 42);
//! let chat = ChatId::new(7);
//!
//! service.begin(chat);
//! service.negotiate(chat, "3x3");
//! let SetupReply::Ready(view) = service.negotiate(chat, "3") else {
//!     panic!("setup should have completed");
//! };
//! assert_eq!(view.rows.len(), 3);
//!
//! let report = service.tap(chat, "1_1", "ada").unwrap();
//! println!("{:?}", report.outcome);
//! ```

pub mod board;
pub mod core;
pub mod negotiate;
pub mod persist;
pub mod scores;
pub mod service;
pub mod session;
pub mod view;

// Re-export commonly used types
pub use crate::core::{
    BoardConfig, CellCoord, ConfigError, ConfigKey, GameRng, ParseCoordError, Symbol, SymbolPool,
    DEFAULT_GLYPHS, MAX_GROUP_SIZE, MAX_HEIGHT, MAX_WIDTH,
};

pub use crate::board::{Board, Cell};

pub use crate::session::{GameSession, Selected, TapOutcome, TapRecord};

pub use crate::negotiate::{NegotiationReply, NegotiationState, Negotiator};

pub use crate::scores::{ScoreEntry, ScoreLedger, MAX_ENTRIES};

pub use crate::view::{BoardView, CellView, HIDDEN_GLYPH};

pub use crate::service::{ChatId, GameService, MissingSession, SetupReply, TapReport};

pub use crate::persist::{PersistError, SavedBucket, SavedLedger, SessionSnapshot};
