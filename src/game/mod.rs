//! Chess game logic module - 6x6 variant rules and game snapshots
//!
//! Pure game logic with no I/O. The session layer in [`crate::service`]
//! stores the snapshots built here and decides which transitions are allowed.
//!
//! # Module Organization
//!
//! - `types` - Squares, colors, kinds and pieces
//! - `components` - Move records, game status and mode
//! - `resources` - The [`Game`](resources::Game) aggregate, castling rights, annotations
//! - `rules` - Move generation, validation, check and mate detection
//! - `error` - Errors raised while building domain values

pub mod components;
pub mod error;
pub mod resources;
pub mod rules;
pub mod types;

pub use error::{GameError, GameResult};
