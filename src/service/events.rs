//! Change notifications from [`super::GameService`]
//!
//! A listener sees every committed change together with the game snapshot
//! it produced. It is called while the game's registry entry is still
//! locked, so events for one game arrive in commit order.

use crate::game::components::Move;
use crate::game::resources::{Annotation, AnnotationKey, Game};
use crate::game::types::{Piece, Position};

#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    MoveMade { mv: Move },
    EditModeStarted,
    EditModeEnded,
    PieceAdded { piece: Piece, position: Position },
    PieceRemoved { position: Position },
    PieceMoved { from: Position, to: Position },
    BoardCleared,
    /// Standard or custom start restored
    BoardReset,
    MoveUndone,
    AnnotationAdded { annotation: Annotation },
    AnnotationRemoved { key: AnnotationKey },
    AnnotationsCleared,
}

/// Must not block: it runs under the game's entry lock
pub type GameListener = Box<dyn Fn(&Game, &GameEvent) + Send + Sync>;
