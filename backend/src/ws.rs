//! Per-game WebSocket channel
//!
//! A socket on `/ws/games/{id}` receives every event published for that
//! game and may send [`ClientMessage`]s. Moves made over the socket reach
//! all subscribers through the service's event broadcast, like HTTP moves;
//! only failures and legal-move answers are sent back to the caller alone.

use crate::api::AppState;
use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        Path, State,
    },
    http::StatusCode,
    response::{IntoResponse, Response},
};
use futures::{SinkExt, StreamExt};
use shared::{ClientMessage, ServerMessage};
use sixchess::MoveResult;
use tokio::sync::broadcast::error::RecvError;
use tracing::{debug, info, warn};

pub async fn game_socket(
    ws: WebSocketUpgrade,
    State(state): State<AppState>,
    Path(game_id): Path<String>,
) -> Response {
    if state.service.get_game(&game_id).is_none() {
        return (StatusCode::NOT_FOUND, "Game not found").into_response();
    }
    ws.on_upgrade(move |socket| handle_socket(socket, state, game_id))
}

async fn handle_socket(socket: WebSocket, state: AppState, game_id: String) {
    info!("[WS] Client connected to {}", game_id);
    let (mut sender, mut receiver) = socket.split();
    let mut events = state.events.subscribe();

    loop {
        tokio::select! {
            incoming = receiver.next() => {
                let text = match incoming {
                    Some(Ok(Message::Text(text))) => text,
                    Some(Ok(Message::Close(_))) | None => break,
                    Some(Ok(_)) => continue,
                    Some(Err(err)) => {
                        warn!("[WS] Receive error on {}: {}", game_id, err);
                        break;
                    }
                };
                if let Some(reply) = handle_client_message(&state, &game_id, text.as_str()) {
                    if send(&mut sender, &reply).await.is_err() {
                        break;
                    }
                }
            }
            event = events.recv() => {
                match event {
                    Ok(event) if event.game_id() == Some(game_id.as_str()) => {
                        if send(&mut sender, &event).await.is_err() {
                            break;
                        }
                    }
                    Ok(_) => {}
                    Err(RecvError::Lagged(skipped)) => {
                        warn!("[WS] {} lagged, skipped {} events", game_id, skipped);
                    }
                    Err(RecvError::Closed) => break,
                }
            }
        }
    }

    info!("[WS] Client disconnected from {}", game_id);
}

async fn send(
    sender: &mut futures::stream::SplitSink<WebSocket, Message>,
    msg: &ServerMessage,
) -> Result<(), axum::Error> {
    match serde_json::to_string(msg) {
        Ok(text) => sender.send(Message::Text(text.into())).await,
        Err(err) => {
            warn!("[WS] Failed to encode event: {}", err);
            Ok(())
        }
    }
}

/// Answer one client frame
///
/// Returns the reply for the sending client, or `None` when the outcome
/// reaches it through the broadcast instead.
pub fn handle_client_message(state: &AppState, game_id: &str, text: &str) -> Option<ServerMessage> {
    let msg: ClientMessage = match serde_json::from_str(text) {
        Ok(msg) => msg,
        Err(err) => {
            debug!("[WS] Bad frame on {}: {}", game_id, err);
            return Some(ServerMessage::Error {
                message: format!("Invalid message: {err}"),
            });
        }
    };

    match msg {
        ClientMessage::MakeMove {
            from,
            to,
            promotion,
        } => match state.service.make_move(game_id, from, to, promotion) {
            MoveResult::Success { .. } => None,
            MoveResult::InvalidMove { reason } => Some(ServerMessage::InvalidMove {
                game_id: game_id.to_string(),
                reason,
                from: Some(from),
                to: Some(to),
            }),
            MoveResult::PromotionRequired => Some(ServerMessage::Error {
                message: "Promotion piece required".to_string(),
            }),
            MoveResult::GameOver => Some(ServerMessage::Error {
                message: "Game is over".to_string(),
            }),
            MoveResult::GameNotFound => Some(ServerMessage::Error {
                message: "Game not found".to_string(),
            }),
        },
        ClientMessage::GetLegalMoves { position } => Some(ServerMessage::LegalMoves {
            game_id: game_id.to_string(),
            legal_moves: state.service.legal_moves(game_id, position),
            position,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sixchess::Position;

    fn sq(notation: &str) -> Position {
        Position::from_algebraic(notation).unwrap()
    }

    fn setup() -> (AppState, String) {
        let state = AppState::new(16);
        let id = state.service.create_game(None).id;
        (state, id)
    }

    #[test]
    fn test_bad_frame_returns_error() {
        let (state, id) = setup();
        let reply = handle_client_message(&state, &id, "not json");
        assert!(matches!(reply, Some(ServerMessage::Error { .. })));
    }

    #[test]
    fn test_move_success_is_broadcast_not_replied() {
        let (state, id) = setup();
        let mut events = state.events.subscribe();

        let frame = r#"{"MakeMove":{"from":{"row":1,"col":4},"to":{"row":3,"col":4},"promotion":null}}"#;
        let reply = handle_client_message(&state, &id, frame);
        assert_eq!(reply, None, "Successful moves reach the caller via the broadcast");

        match events.try_recv() {
            Ok(ServerMessage::MoveMade { game_id, mv, .. }) => {
                assert_eq!(game_id, id);
                assert_eq!(mv.notation, "e4");
            }
            other => panic!("Expected MoveMade, got {:?}", other),
        }
    }

    #[test]
    fn test_invalid_move_echoes_squares() {
        let (state, id) = setup();
        let msg = ClientMessage::MakeMove {
            from: sq("e2"),
            to: sq("e5"),
            promotion: None,
        };
        let frame = serde_json::to_string(&msg).unwrap();

        match handle_client_message(&state, &id, &frame) {
            Some(ServerMessage::InvalidMove { from, to, reason, .. }) => {
                assert_eq!(from, Some(sq("e2")));
                assert_eq!(to, Some(sq("e5")));
                assert!(!reason.is_empty());
            }
            other => panic!("Expected InvalidMove, got {:?}", other),
        }
        assert_eq!(state.service.get_game(&id).unwrap().move_count(), 0);
    }

    #[test]
    fn test_legal_moves_reply() {
        let (state, id) = setup();
        let frame = serde_json::to_string(&ClientMessage::GetLegalMoves { position: sq("e2") }).unwrap();

        match handle_client_message(&state, &id, &frame) {
            Some(ServerMessage::LegalMoves {
                position,
                legal_moves,
                ..
            }) => {
                assert_eq!(position, sq("e2"));
                assert_eq!(legal_moves.len(), 2, "Pawn on its start row: one or two steps");
                assert!(legal_moves.contains(&sq("e3")));
                assert!(legal_moves.contains(&sq("e4")));
            }
            other => panic!("Expected LegalMoves, got {:?}", other),
        }
    }

    #[test]
    fn test_deleted_game_reports_error() {
        let (state, id) = setup();
        state.service.delete_game(&id);
        let frame = serde_json::to_string(&ClientMessage::MakeMove {
            from: sq("e2"),
            to: sq("e4"),
            promotion: None,
        })
        .unwrap();

        match handle_client_message(&state, &id, &frame) {
            Some(ServerMessage::Error { message }) => assert_eq!(message, "Game not found"),
            other => panic!("Expected Error, got {:?}", other),
        }
    }
}
