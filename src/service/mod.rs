//! Game session service
//!
//! The boundary the transport layer talks to: create and look up games,
//! play moves, drive the board editor, undo in custom games and keep
//! per-game annotations. Every outcome is a value ([`MoveResult`],
//! [`EditResult`], `bool` or a list); nothing here returns an error.
//!
//! Committed changes can be observed as [`GameEvent`]s.
//!
//! State is memory-resident and lives as long as the [`GameService`] value.

pub mod annotations;
pub mod events;
pub mod game_service;
pub mod registry;
pub mod results;


pub use annotations::AnnotationStore;
pub use events::{GameEvent, GameListener};
pub use game_service::GameService;
pub use registry::GameRegistry;
pub use results::{EditResult, MoveResult};
