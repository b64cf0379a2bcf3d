//! Game state components

use serde::{Deserialize, Serialize};

/// Outcome of evaluating a position for the side to move
///
/// `Draw` exists for the wire format and is treated as game over, but no
/// rule in [`crate::game::rules::check`] derives it yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GameStatus {
    #[default]
    Active,
    Check,
    Checkmate,
    Stalemate,
    Draw,
}

impl GameStatus {
    /// No further moves are accepted in this status
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            GameStatus::Checkmate | GameStatus::Stalemate | GameStatus::Draw
        )
    }
}

/// How the game is currently being driven
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GameMode {
    /// Normal play from the standard setup
    #[default]
    Standard,
    /// Free board editing; no legality checks, no history
    Editing,
    /// Play from a position saved when editing stopped
    Custom,
}
