//! Chess game resources - game snapshots and their side data
//!
//! - [`Game`] - the immutable game aggregate and its transitions
//! - [`CastlingRights`] - monotonic king/rook moved flags
//! - [`Annotation`] - arrows and circles drawn over a game's board

pub mod annotation;
pub mod castling;
pub mod game;


pub use annotation::{Annotation, AnnotationColor, AnnotationKey, AnnotationKind};
pub use castling::CastlingRights;
pub use game::Game;
