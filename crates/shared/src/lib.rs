//! Wire types for the sixchess HTTP API and WebSocket channel
//!
//! Engine values ([`sixchess::Position`], [`sixchess::Piece`], ...) already
//! serialise in their wire shape and are reused as-is; this crate adds the
//! snapshot DTOs, request bodies and socket messages around them.

pub mod protocol;

pub use protocol::*;
