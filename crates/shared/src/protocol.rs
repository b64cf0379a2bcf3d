use serde::{Deserialize, Serialize};
use sixchess::{
    Annotation, AnnotationColor, AnnotationKey, AnnotationKind, Game, GameEvent, GameMode,
    GameStatus, Move, Piece, PieceColor, PieceKind, Position,
};

/// Board rows as sent to clients, row 0 (rank 1) first
pub type BoardRows = [[Option<Piece>; 6]; 6];

// ============================================================================
// Snapshots
// ============================================================================

/// Client view of a game
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GameStateDto {
    pub game_id: String,
    pub board: BoardRows,
    pub current_player: PieceColor,
    pub status: GameStatus,
    pub mode: GameMode,
    pub creator_id: Option<String>,
    pub last_move: Option<MoveDto>,
    pub move_count: usize,
    pub move_history: Vec<MoveDto>,
}

impl From<&Game> for GameStateDto {
    fn from(game: &Game) -> Self {
        GameStateDto {
            game_id: game.id.clone(),
            board: game.board.to_rows(),
            current_player: game.current_player,
            status: game.status,
            mode: game.mode,
            creator_id: game.creator_id.clone(),
            last_move: game.last_move().map(MoveDto::from),
            move_count: game.move_count(),
            move_history: game.move_history.iter().map(MoveDto::from).collect(),
        }
    }
}

/// A played move with its rendered notation
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MoveDto {
    pub from: Position,
    pub to: Position,
    pub piece: Piece,
    pub captured_piece: Option<Piece>,
    pub promotion: Option<PieceKind>,
    pub is_castling: bool,
    pub is_en_passant: bool,
    pub notation: String,
}

impl From<&Move> for MoveDto {
    fn from(mv: &Move) -> Self {
        MoveDto {
            from: mv.from,
            to: mv.to,
            piece: mv.piece,
            captured_piece: mv.captured_piece,
            promotion: mv.promotion,
            is_castling: mv.is_castling,
            is_en_passant: mv.is_en_passant,
            notation: mv.to_algebraic(),
        }
    }
}

// ============================================================================
// HTTP request and response bodies
// ============================================================================

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CreateGameRequest {
    #[serde(default)]
    pub creator_id: Option<String>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct MoveRequest {
    pub from: Position,
    pub to: Position,
    #[serde(default)]
    pub promotion: Option<PieceKind>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MoveResponse {
    #[serde(rename = "move")]
    pub mv: MoveDto,
    pub game_state: GameStateDto,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StartEditingRequest {
    #[serde(default)]
    pub creator_id: Option<String>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StopEditingRequest {
    #[serde(default)]
    pub creator_id: Option<String>,
    #[serde(default = "white_to_move")]
    pub current_player: PieceColor,
}

fn white_to_move() -> PieceColor {
    PieceColor::White
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct AddPieceRequest {
    pub piece: Piece,
    pub position: Position,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct RemovePieceRequest {
    pub position: Position,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct MovePieceRequest {
    pub from: Position,
    pub to: Position,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct AddAnnotationRequest {
    #[serde(rename = "type")]
    pub kind: AnnotationKind,
    #[serde(default)]
    pub from: Option<Position>,
    pub to: Position,
    pub color: AnnotationColor,
}

impl AddAnnotationRequest {
    /// Build the annotation; arrows need a `from` square, circles ignore it
    pub fn into_annotation(self) -> Result<Annotation, String> {
        match self.kind {
            AnnotationKind::Circle => Ok(Annotation::circle(self.to, self.color)),
            AnnotationKind::Arrow => self
                .from
                .map(|from| Annotation::arrow(from, self.to, self.color))
                .ok_or_else(|| "Arrow annotation requires a from square".to_string()),
        }
    }
}

/// Circles are addressed by `position`, arrows by `from` and `to`
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct RemoveAnnotationRequest {
    #[serde(default)]
    pub position: Option<Position>,
    #[serde(default)]
    pub from: Option<Position>,
    #[serde(default)]
    pub to: Option<Position>,
}

impl RemoveAnnotationRequest {
    pub fn key(&self) -> Option<AnnotationKey> {
        match (self.position, self.from, self.to) {
            (Some(position), _, _) => Some(AnnotationKey::Circle { position }),
            (None, Some(from), Some(to)) => Some(AnnotationKey::Arrow { from, to }),
            _ => None,
        }
    }
}

/// `?row=&col=` of the legal-moves query
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
pub struct SquareQuery {
    pub row: i32,
    pub col: i32,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct CreatorQuery {
    #[serde(rename = "creatorId", default)]
    pub creator_id: Option<String>,
}

/// Error payload for every non-2xx response
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ErrorBody {
    pub error: String,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub promotion_required: bool,
}

impl ErrorBody {
    pub fn new(error: impl Into<String>) -> Self {
        ErrorBody {
            error: error.into(),
            promotion_required: false,
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct SuccessBody {
    pub success: bool,
}

// ============================================================================
// WebSocket messages
// ============================================================================

/// Messages a client sends over a game socket
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all_fields = "camelCase")]
pub enum ClientMessage {
    MakeMove {
        from: Position,
        to: Position,
        promotion: Option<PieceKind>,
    },
    GetLegalMoves {
        position: Position,
    },
}

/// Events pushed to clients watching a game
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all_fields = "camelCase")]
pub enum ServerMessage {
    MoveMade {
        game_id: String,
        #[serde(rename = "move")]
        mv: MoveDto,
        game_state: GameStateDto,
    },
    InvalidMove {
        game_id: String,
        reason: String,
        from: Option<Position>,
        to: Option<Position>,
    },
    LegalMoves {
        game_id: String,
        position: Position,
        legal_moves: Vec<Position>,
    },
    EditModeStarted {
        game_id: String,
    },
    EditModeEnded {
        game_id: String,
        game_state: GameStateDto,
    },
    PieceAdded {
        game_id: String,
        piece: Piece,
        position: Position,
    },
    PieceRemoved {
        game_id: String,
        position: Position,
    },
    PieceMoved {
        game_id: String,
        from: Position,
        to: Position,
    },
    BoardCleared {
        game_id: String,
    },
    BoardReset {
        game_id: String,
        game_state: GameStateDto,
    },
    MoveUndone {
        game_id: String,
        game_state: GameStateDto,
    },
    AnnotationAdded {
        game_id: String,
        annotation: Annotation,
    },
    AnnotationRemoved {
        game_id: String,
        position: Option<Position>,
        from: Option<Position>,
        to: Option<Position>,
    },
    AnnotationsCleared {
        game_id: String,
    },
    Error {
        message: String,
    },
}

impl ServerMessage {
    /// Socket message for a change committed to `game`
    pub fn from_event(game: &Game, event: &GameEvent) -> Self {
        let game_id = game.id.clone();
        match event {
            GameEvent::MoveMade { mv } => ServerMessage::MoveMade {
                game_id,
                mv: mv.into(),
                game_state: game.into(),
            },
            GameEvent::EditModeStarted => ServerMessage::EditModeStarted { game_id },
            GameEvent::EditModeEnded => ServerMessage::EditModeEnded {
                game_id,
                game_state: game.into(),
            },
            GameEvent::PieceAdded { piece, position } => ServerMessage::PieceAdded {
                game_id,
                piece: *piece,
                position: *position,
            },
            GameEvent::PieceRemoved { position } => ServerMessage::PieceRemoved {
                game_id,
                position: *position,
            },
            GameEvent::PieceMoved { from, to } => ServerMessage::PieceMoved {
                game_id,
                from: *from,
                to: *to,
            },
            GameEvent::BoardCleared => ServerMessage::BoardCleared { game_id },
            GameEvent::BoardReset => ServerMessage::BoardReset {
                game_id,
                game_state: game.into(),
            },
            GameEvent::MoveUndone => ServerMessage::MoveUndone {
                game_id,
                game_state: game.into(),
            },
            GameEvent::AnnotationAdded { annotation } => ServerMessage::AnnotationAdded {
                game_id,
                annotation: *annotation,
            },
            GameEvent::AnnotationRemoved { key } => match *key {
                AnnotationKey::Circle { position } => ServerMessage::AnnotationRemoved {
                    game_id,
                    position: Some(position),
                    from: None,
                    to: None,
                },
                AnnotationKey::Arrow { from, to } => ServerMessage::AnnotationRemoved {
                    game_id,
                    position: None,
                    from: Some(from),
                    to: Some(to),
                },
            },
            GameEvent::AnnotationsCleared => ServerMessage::AnnotationsCleared { game_id },
        }
    }

    /// Game the event belongs to; `None` for connection-level errors
    pub fn game_id(&self) -> Option<&str> {
        match self {
            ServerMessage::MoveMade { game_id, .. }
            | ServerMessage::InvalidMove { game_id, .. }
            | ServerMessage::LegalMoves { game_id, .. }
            | ServerMessage::EditModeStarted { game_id }
            | ServerMessage::EditModeEnded { game_id, .. }
            | ServerMessage::PieceAdded { game_id, .. }
            | ServerMessage::PieceRemoved { game_id, .. }
            | ServerMessage::PieceMoved { game_id, .. }
            | ServerMessage::BoardCleared { game_id }
            | ServerMessage::BoardReset { game_id, .. }
            | ServerMessage::MoveUndone { game_id, .. }
            | ServerMessage::AnnotationAdded { game_id, .. }
            | ServerMessage::AnnotationRemoved { game_id, .. }
            | ServerMessage::AnnotationsCleared { game_id } => Some(game_id),
            ServerMessage::Error { .. } => None,
        }
    }
}
