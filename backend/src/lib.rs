//! sixchess backend: axum routes over the game service
//!
//! - `api` - HTTP routes and the shared [`api::AppState`]
//! - `ws` - per-game WebSocket event stream
//! - `config` - server configuration loading

pub mod api;
pub mod config;
pub mod ws;
