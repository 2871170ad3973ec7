//! Two-step setup dialogue.
//!
//! ## States
//!
//! `AwaitingDimensions → AwaitingGroupSize → Complete`
//!
//! The negotiator consumes free-text replies. Rejected input leaves the state
//! untouched and produces a [`ConfigError`] whose `Display` text is the
//! diagnostic to show before re-prompting. `Complete` is terminal: a fresh
//! negotiation requires an external restart.
//!
//! The negotiator owns no game-play state; its only side effect is producing
//! the ready [`GameSession`].

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::{BoardConfig, ConfigError, GameRng, SymbolPool};
use crate::session::GameSession;

/// Characters accepted between the two dimension numbers.
const DIMENSION_SEPARATORS: [char; 4] = ['x', 'X', '×', '*'];

/// Where the dialogue currently stands.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum NegotiationState {
    /// Waiting for `<width>x<height>`.
    AwaitingDimensions,
    /// Dimensions accepted; waiting for the group size.
    AwaitingGroupSize {
        /// Accepted board width.
        width: u32,
        /// Accepted board height.
        height: u32,
    },
    /// A session has been produced; this negotiator is spent.
    Complete,
}

/// What a successful [`Negotiator::advance`] produced.
#[derive(Debug, PartialEq)]
pub enum NegotiationReply {
    /// Dimensions accepted; prompt for the group size next.
    GroupSizePrompt {
        /// Accepted board width.
        width: u32,
        /// Accepted board height.
        height: u32,
    },
    /// Setup finished; the session is dealt and the clock is running.
    Ready(Box<GameSession>),
}

/// The two-step configuration dialogue.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Negotiator {
    pool: SymbolPool,
    state: NegotiationState,
}

impl Negotiator {
    /// Start a fresh dialogue against the given catalog.
    #[must_use]
    pub fn new(pool: SymbolPool) -> Self {
        Self {
            pool,
            state: NegotiationState::AwaitingDimensions,
        }
    }

    /// Current dialogue state.
    #[must_use]
    pub const fn state(&self) -> NegotiationState {
        self.state
    }

    /// The question to ask for the current state.
    #[must_use]
    pub const fn prompt(&self) -> &'static str {
        match self.state {
            NegotiationState::AwaitingDimensions => {
                "What board size? Send dimensions like \"4x4\"."
            }
            NegotiationState::AwaitingGroupSize { .. } => {
                "How many identical tiles make a match? Send a number like \"3\"."
            }
            NegotiationState::Complete => "Setup is done; the game is running.",
        }
    }

    /// Feed one player reply into the dialogue.
    ///
    /// On error the state is unchanged; the caller shows the error text and
    /// waits for another reply.
    pub fn advance(
        &mut self,
        input: &str,
        rng: &mut GameRng,
    ) -> Result<NegotiationReply, ConfigError> {
        match self.state {
            NegotiationState::AwaitingDimensions => {
                let (width, height) = parse_dimensions(input)?;
                BoardConfig::validate_dimensions(width, height, self.pool.len())?;
                self.state = NegotiationState::AwaitingGroupSize { width, height };
                debug!(width, height, "dimensions accepted");
                Ok(NegotiationReply::GroupSizePrompt { width, height })
            }
            NegotiationState::AwaitingGroupSize { width, height } => {
                let group_size: u32 = input
                    .trim()
                    .parse()
                    .map_err(|_| ConfigError::GroupSizeFormat)?;
                let config = BoardConfig::new(width, height, group_size, self.pool.len())?;
                let session = GameSession::start(config, self.pool.clone(), rng)?;
                self.state = NegotiationState::Complete;
                Ok(NegotiationReply::Ready(Box::new(session)))
            }
            NegotiationState::Complete => Err(ConfigError::SetupComplete),
        }
    }
}

/// Parse `<int><separator><int>` with any of the `x`-like separators.
fn parse_dimensions(input: &str) -> Result<(u32, u32), ConfigError> {
    let (left, right) = input
        .trim()
        .split_once(&DIMENSION_SEPARATORS[..])
        .ok_or(ConfigError::DimensionFormat)?;
    let width = left
        .trim()
        .parse()
        .map_err(|_| ConfigError::DimensionFormat)?;
    let height = right
        .trim()
        .parse()
        .map_err(|_| ConfigError::DimensionFormat)?;
    Ok((width, height))
}
