//! Chess rules module - pure game logic for the 6x6 variant
//!
//! Everything here is a pure function over a [`Board`] or a game snapshot,
//! so every rule can be unit tested without a registry or server.
//!
//! # Module Structure
//!
//! - `board_state` - 6x6 mailbox board and piece lookups
//! - `piece_moves` - Movement rules for each piece type plus en passant and
//!   promotion predicates
//! - `check` - Attack detection, check, checkmate and stalemate
//! - `validator` - Full move validation, legal move listing and castling
//!
//! # Variant notes
//!
//! Back rank is `R N B Q K R` on files a-f. Pawns may double step from their
//! start row, promote on the far row to Q/R/B/N, and may capture en passant.
//! Castling is only possible queenside: the kingside rook stands directly
//! beside the king, leaving no room for the king's two-file hop.

pub mod board_state;
pub mod check;
pub mod piece_moves;
pub mod validator;


// Re-export commonly used items
pub use board_state::Board;
pub use check::{game_status, is_checkmate, is_king_in_check, is_stalemate};
pub use piece_moves::{can_move, pseudo_legal_moves};
pub use validator::{can_castle, is_valid_move, legal_moves};
