//! Chess game components module
//!
//! Components are pure data structures with no logic.
//! Organized by domain: moves and game state.

pub mod game_state;
pub mod move_record;

// Re-export all components for convenience
pub use game_state::*;
pub use move_record::*;
