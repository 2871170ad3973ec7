//! Core engine types: coordinates, configuration, symbols, RNG.
//!
//! Everything here is board-game-agnostic plumbing; the play rules live in
//! `session` and the setup dialogue in `negotiate`.

pub mod config;
pub mod coord;
pub mod rng;
pub mod symbol;

pub use config::{BoardConfig, ConfigError, ConfigKey, MAX_GROUP_SIZE, MAX_HEIGHT, MAX_WIDTH};
pub use coord::{CellCoord, ParseCoordError};
pub use rng::GameRng;
pub use symbol::{Symbol, SymbolPool, DEFAULT_GLYPHS};
