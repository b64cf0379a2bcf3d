use crate::ws;
use axum::{
    body::Bytes,
    extract::{Json, Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get, post},
    Router,
};
use serde_json::json;
use shared::{
    AddAnnotationRequest, AddPieceRequest, CreateGameRequest, CreatorQuery, ErrorBody,
    GameStateDto, MovePieceRequest, MoveRequest, MoveResponse, RemoveAnnotationRequest,
    RemovePieceRequest, ServerMessage, SquareQuery, StartEditingRequest, StopEditingRequest,
    SuccessBody,
};
use sixchess::{Annotation, EditResult, Game, GameService, MoveResult, Position};
use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::debug;

/// Handler error: status plus `{"error": ...}` body
pub type ApiError = (StatusCode, Json<ErrorBody>);

type ApiResult<T> = Result<Json<T>, ApiError>;

#[derive(Clone)]
pub struct AppState {
    pub service: Arc<GameService>,
    /// Every successful mutation, for WebSocket subscribers
    pub events: broadcast::Sender<ServerMessage>,
}

impl AppState {
    /// Service whose committed changes feed the event channel
    ///
    /// Events are sent from inside the service's per-game lock, so
    /// subscribers see each game's changes in commit order.
    pub fn new(event_buffer: usize) -> Self {
        let (events, _) = broadcast::channel(event_buffer);
        let sender = events.clone();
        let service = GameService::with_listener(move |game, event| {
            if sender.send(ServerMessage::from_event(game, event)).is_err() {
                debug!("[BACKEND] No subscribers for {}", game.id);
            }
        });
        AppState {
            service: Arc::new(service),
            events,
        }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/health", get(health))
        .route("/api/games", post(create_game).get(list_games))
        .route("/api/games/{id}", get(get_game).delete(delete_game))
        .route("/api/games/{id}/moves", post(make_move))
        .route("/api/games/{id}/legal-moves", get(legal_moves))
        .route("/api/games/{id}/edit/start", post(start_editing))
        .route("/api/games/{id}/edit/stop", post(stop_editing))
        .route(
            "/api/games/{id}/edit/pieces",
            post(add_piece).delete(remove_piece).put(move_piece),
        )
        .route("/api/games/{id}/edit/clear", post(clear_board))
        .route("/api/games/{id}/edit/reset-standard", post(reset_standard))
        .route("/api/games/{id}/edit/reset-custom", post(reset_custom))
        .route("/api/games/{id}/undo", post(undo_move))
        .route(
            "/api/games/{id}/annotations",
            get(list_annotations)
                .post(add_annotation)
                .delete(remove_annotation),
        )
        .route("/api/games/{id}/annotations/all", delete(clear_annotations))
        .route("/ws/games/{id}", get(ws::game_socket))
        .with_state(state)
}

fn error(status: StatusCode, message: impl Into<String>) -> ApiError {
    (status, Json(ErrorBody::new(message)))
}

fn not_found() -> ApiError {
    error(StatusCode::NOT_FOUND, "Game not found")
}

fn state_of(game: &Game) -> Json<GameStateDto> {
    Json(GameStateDto::from(game))
}

/// Game from a successful edit, or the matching HTTP error
fn edited(result: EditResult) -> Result<Game, ApiError> {
    match result {
        EditResult::Success { game } => Ok(game),
        EditResult::InvalidOperation { reason } => Err(error(StatusCode::BAD_REQUEST, reason)),
        EditResult::GameNotFound => Err(not_found()),
        EditResult::NotAuthorized => Err(error(StatusCode::FORBIDDEN, "Not authorized")),
    }
}

async fn health() -> impl IntoResponse {
    Json(json!({"status": "ok", "service": "sixchess-backend"}))
}

// ============================================================================
// Games
// ============================================================================

/// Body is optional; an empty body creates an anonymous game
async fn create_game(State(state): State<AppState>, body: Bytes) -> ApiResult<GameStateDto> {
    let request: CreateGameRequest = if body.is_empty() {
        CreateGameRequest::default()
    } else {
        serde_json::from_slice(&body)
            .map_err(|err| error(StatusCode::BAD_REQUEST, format!("Invalid request body: {err}")))?
    };

    let game = state.service.create_game(request.creator_id);
    Ok(state_of(&game))
}

async fn list_games(State(state): State<AppState>) -> Json<Vec<GameStateDto>> {
    Json(
        state
            .service
            .list_games()
            .iter()
            .map(GameStateDto::from)
            .collect(),
    )
}

async fn get_game(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<GameStateDto> {
    state
        .service
        .get_game(&id)
        .map(|game| state_of(&game))
        .ok_or_else(not_found)
}

async fn delete_game(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    if state.service.delete_game(&id) {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(not_found())
    }
}

// ============================================================================
// Play
// ============================================================================

async fn make_move(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<MoveRequest>,
) -> ApiResult<MoveResponse> {
    match state
        .service
        .make_move(&id, request.from, request.to, request.promotion)
    {
        MoveResult::Success { game, mv } => Ok(Json(MoveResponse {
            mv: (&mv).into(),
            game_state: (&game).into(),
        })),
        MoveResult::InvalidMove { reason } => Err(error(StatusCode::BAD_REQUEST, reason)),
        MoveResult::PromotionRequired => Err((
            StatusCode::CONFLICT,
            Json(ErrorBody {
                error: "Promotion piece required".to_string(),
                promotion_required: true,
            }),
        )),
        MoveResult::GameOver => Err(error(StatusCode::CONFLICT, "Game is over")),
        MoveResult::GameNotFound => Err(not_found()),
    }
}

async fn legal_moves(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<SquareQuery>,
) -> ApiResult<Vec<Position>> {
    let from = Position::new(query.row, query.col)
        .map_err(|err| error(StatusCode::BAD_REQUEST, err.to_string()))?;
    if state.service.get_game(&id).is_none() {
        return Err(not_found());
    }
    Ok(Json(state.service.legal_moves(&id, from)))
}

// ============================================================================
// Editor
// ============================================================================

async fn start_editing(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<StartEditingRequest>,
) -> ApiResult<GameStateDto> {
    let game = edited(state.service.start_editing(&id, request.creator_id.as_deref()))?;
    Ok(state_of(&game))
}

async fn stop_editing(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<StopEditingRequest>,
) -> ApiResult<GameStateDto> {
    let game = edited(state.service.stop_editing(
        &id,
        request.creator_id.as_deref(),
        request.current_player,
    ))?;
    Ok(state_of(&game))
}

async fn add_piece(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<AddPieceRequest>,
) -> ApiResult<GameStateDto> {
    let game = edited(state.service.add_piece(&id, request.piece, request.position))?;
    Ok(state_of(&game))
}

async fn remove_piece(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<RemovePieceRequest>,
) -> ApiResult<GameStateDto> {
    let game = edited(state.service.remove_piece(&id, request.position))?;
    Ok(state_of(&game))
}

async fn move_piece(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<MovePieceRequest>,
) -> ApiResult<GameStateDto> {
    let game = edited(state.service.move_piece_editor(&id, request.from, request.to))?;
    Ok(state_of(&game))
}

async fn clear_board(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<GameStateDto> {
    let game = edited(state.service.clear_board(&id))?;
    Ok(state_of(&game))
}

async fn reset_standard(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<GameStateDto> {
    let game = edited(state.service.reset_to_standard(&id))?;
    Ok(state_of(&game))
}

async fn reset_custom(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<GameStateDto> {
    let game = edited(state.service.reset_to_custom(&id))?;
    Ok(state_of(&game))
}

async fn undo_move(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<CreatorQuery>,
) -> ApiResult<GameStateDto> {
    let game = edited(state.service.undo_move(&id, query.creator_id.as_deref()))?;
    Ok(state_of(&game))
}

// ============================================================================
// Annotations
// ============================================================================

async fn list_annotations(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Vec<Annotation>> {
    state.service.annotations(&id).map(Json).ok_or_else(not_found)
}

async fn add_annotation(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<AddAnnotationRequest>,
) -> ApiResult<SuccessBody> {
    let annotation = request
        .into_annotation()
        .map_err(|reason| error(StatusCode::BAD_REQUEST, reason))?;
    if !state.service.add_annotation(&id, annotation) {
        return Err(not_found());
    }
    Ok(Json(SuccessBody { success: true }))
}

async fn remove_annotation(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<RemoveAnnotationRequest>,
) -> ApiResult<SuccessBody> {
    let key = request.key().ok_or_else(|| {
        error(
            StatusCode::BAD_REQUEST,
            "Specify a position, or from and to",
        )
    })?;
    if !state.service.remove_annotation(&id, &key) {
        return Err(not_found());
    }
    Ok(Json(SuccessBody { success: true }))
}

async fn clear_annotations(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<SuccessBody> {
    if !state.service.clear_annotations(&id) {
        return Err(not_found());
    }
    Ok(Json(SuccessBody { success: true }))
}
