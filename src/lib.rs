//! sixchess - rules engine and session service for 6x6 chess
//!
//! - [`game`] - pure rules: board, piece movement, check detection,
//!   move validation and immutable game snapshots
//! - [`service`] - in-memory game sessions, editor mode, undo and
//!   annotations, safe for concurrent callers

pub mod game;
pub mod service;

pub use game::components::{GameMode, GameStatus, Move};
pub use game::resources::{Annotation, AnnotationColor, AnnotationKey, AnnotationKind, Game};
pub use game::types::{Piece, PieceColor, PieceKind, Position};
pub use service::{EditResult, GameEvent, GameService, MoveResult};
