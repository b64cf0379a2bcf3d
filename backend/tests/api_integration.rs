//! Backend API Integration Tests
//!
//! Tests for the Axum HTTP endpoints using Router::oneshot pattern.

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use backend::api::{self, AppState};
use serde_json::{json, Value};
use shared::ServerMessage;
use tower::ServiceExt;

fn test_app() -> (AppState, Router) {
    let state = AppState::new(64);
    let app = api::router(state.clone());
    (state, app)
}

/// Send a request and decode the JSON body (`Null` when empty)
async fn call(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, body)
}

fn sq(row: u8, col: u8) -> Value {
    json!({"row": row, "col": col})
}

async fn create_game(app: &Router, creator: Option<&str>) -> String {
    let body = creator.map(|c| json!({"creatorId": c}));
    let (status, game) = call(app, "POST", "/api/games", body).await;
    assert_eq!(status, StatusCode::OK);
    game["gameId"].as_str().unwrap().to_string()
}

/// Build a custom position: editing, clear, place pieces, stop
async fn custom_position(app: &Router, id: &str, pieces: &[(&str, &str, u8, u8)], to_move: &str) -> Value {
    let (status, _) = call(app, "POST", &format!("/api/games/{id}/edit/start"), Some(json!({}))).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = call(app, "POST", &format!("/api/games/{id}/edit/clear"), None).await;
    assert_eq!(status, StatusCode::OK);

    for (color, kind, row, col) in pieces {
        let (status, _) = call(
            app,
            "POST",
            &format!("/api/games/{id}/edit/pieces"),
            Some(json!({"piece": {"color": color, "type": kind}, "position": sq(*row, *col)})),
        )
        .await;
        assert_eq!(status, StatusCode::OK, "Placing {color} {kind}");
    }

    let (status, game) = call(
        app,
        "POST",
        &format!("/api/games/{id}/edit/stop"),
        Some(json!({"currentPlayer": to_move})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    game
}

// ============================================================================
// Games
// ============================================================================

#[tokio::test]
async fn test_health() {
    let (_, app) = test_app();
    let (status, body) = call(&app, "GET", "/api/health", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn test_create_game_without_body() {
    let (_, app) = test_app();
    let (status, game) = call(&app, "POST", "/api/games", None).await;

    assert_eq!(status, StatusCode::OK);
    assert!(game["gameId"].as_str().is_some_and(|id| !id.is_empty()));
    assert_eq!(game["currentPlayer"], "WHITE");
    assert_eq!(game["status"], "ACTIVE");
    assert_eq!(game["mode"], "STANDARD");
    assert!(game["creatorId"].is_null());
    assert_eq!(game["board"][0][4]["type"], "KING");
    assert_eq!(game["board"].as_array().unwrap().len(), 6);
}

#[tokio::test]
async fn test_create_game_with_creator() {
    let (_, app) = test_app();
    let (status, game) = call(&app, "POST", "/api/games", Some(json!({"creatorId": "alice"}))).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(game["creatorId"], "alice");
}

#[tokio::test]
async fn test_create_game_malformed_body() {
    let (_, app) = test_app();
    let request = Request::builder()
        .method("POST")
        .uri("/api/games")
        .header("content-type", "application/json")
        .body(Body::from("{not json"))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_get_list_and_delete_game() {
    let (_, app) = test_app();
    let first = create_game(&app, None).await;
    let second = create_game(&app, None).await;

    let (status, game) = call(&app, "GET", &format!("/api/games/{first}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(game["gameId"], first.as_str());

    let (status, games) = call(&app, "GET", "/api/games", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(games.as_array().unwrap().len(), 2);

    let (status, _) = call(&app, "DELETE", &format!("/api/games/{first}"), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, body) = call(&app, "GET", &format!("/api/games/{first}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Game not found");

    let (status, _) = call(&app, "DELETE", &format!("/api/games/{first}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND, "Second delete finds nothing");

    let (_, games) = call(&app, "GET", "/api/games", None).await;
    assert_eq!(games[0]["gameId"], second.as_str());
}

// ============================================================================
// Moves
// ============================================================================

#[tokio::test]
async fn test_make_move_success() {
    let (_, app) = test_app();
    let id = create_game(&app, None).await;

    let (status, body) = call(
        &app,
        "POST",
        &format!("/api/games/{id}/moves"),
        Some(json!({"from": sq(1, 4), "to": sq(3, 4)})),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["move"]["notation"], "e4");
    assert_eq!(body["move"]["piece"]["type"], "PAWN");
    assert_eq!(body["gameState"]["currentPlayer"], "BLACK");
    assert_eq!(body["gameState"]["board"][3][4]["color"], "WHITE");
    assert!(body["gameState"]["board"][1][4].is_null());
    assert_eq!(body["gameState"]["moveHistory"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_make_move_rejections() {
    let (_, app) = test_app();
    let id = create_game(&app, None).await;
    let uri = format!("/api/games/{id}/moves");

    let (status, body) = call(&app, "POST", &uri, Some(json!({"from": sq(2, 2), "to": sq(3, 2)}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().starts_with("No piece at position"));

    let (status, body) = call(&app, "POST", &uri, Some(json!({"from": sq(4, 4), "to": sq(3, 4)}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Not your turn");

    let (status, _) = call(
        &app,
        "POST",
        "/api/games/missing/moves",
        Some(json!({"from": sq(1, 4), "to": sq(3, 4)})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, game) = call(&app, "GET", &format!("/api/games/{id}"), None).await;
    assert_eq!(game["moveHistory"].as_array().unwrap().len(), 0, "Rejected moves change nothing");
}

#[tokio::test]
async fn test_make_move_off_board_square() {
    let (_, app) = test_app();
    let id = create_game(&app, None).await;

    let (status, _) = call(
        &app,
        "POST",
        &format!("/api/games/{id}/moves"),
        Some(json!({"from": sq(1, 4), "to": sq(6, 4)})),
    )
    .await;
    assert!(status.is_client_error(), "Got {status}");
}

#[tokio::test]
async fn test_promotion_required_then_played() {
    let (_, app) = test_app();
    let id = create_game(&app, None).await;
    custom_position(
        &app,
        &id,
        &[
            ("WHITE", "KING", 0, 0),
            ("BLACK", "KING", 5, 5),
            ("WHITE", "PAWN", 4, 2),
        ],
        "WHITE",
    )
    .await;
    let uri = format!("/api/games/{id}/moves");

    let (status, body) = call(&app, "POST", &uri, Some(json!({"from": sq(4, 2), "to": sq(5, 2)}))).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["promotionRequired"], true);

    let (status, body) = call(
        &app,
        "POST",
        &uri,
        Some(json!({"from": sq(4, 2), "to": sq(5, 2), "promotion": "KING"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Invalid promotion piece: KING");

    let (status, body) = call(
        &app,
        "POST",
        &uri,
        Some(json!({"from": sq(4, 2), "to": sq(5, 2), "promotion": "QUEEN"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["move"]["promotion"], "QUEEN");
    assert_eq!(body["gameState"]["board"][5][2]["type"], "QUEEN");
}

#[tokio::test]
async fn test_move_after_checkmate_conflicts() {
    let (_, app) = test_app();
    let id = create_game(&app, None).await;
    let game = custom_position(
        &app,
        &id,
        &[
            ("WHITE", "KING", 0, 0),
            ("BLACK", "QUEEN", 1, 1),
            ("BLACK", "KING", 2, 2),
        ],
        "WHITE",
    )
    .await;
    assert_eq!(game["status"], "CHECKMATE");

    let (status, body) = call(
        &app,
        "POST",
        &format!("/api/games/{id}/moves"),
        Some(json!({"from": sq(0, 0), "to": sq(1, 0)})),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "Game is over");
}

#[tokio::test]
async fn test_legal_moves() {
    let (_, app) = test_app();
    let id = create_game(&app, None).await;

    let (status, moves) = call(&app, "GET", &format!("/api/games/{id}/legal-moves?row=0&col=1"), None).await;
    assert_eq!(status, StatusCode::OK);
    let moves = moves.as_array().unwrap();
    assert_eq!(moves.len(), 2, "Knight on b1 reaches a3 and c3");
    assert!(moves.contains(&sq(2, 0)));
    assert!(moves.contains(&sq(2, 2)));

    let (status, _) = call(&app, "GET", &format!("/api/games/{id}/legal-moves?row=9&col=0"), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = call(&app, "GET", "/api/games/missing/legal-moves?row=0&col=1", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

// ============================================================================
// Editor
// ============================================================================

#[tokio::test]
async fn test_editor_flow() {
    let (_, app) = test_app();
    let id = create_game(&app, Some("alice")).await;

    let (status, game) = call(
        &app,
        "POST",
        &format!("/api/games/{id}/edit/start"),
        Some(json!({"creatorId": "alice"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(game["mode"], "EDITING");

    let (status, body) = call(
        &app,
        "POST",
        &format!("/api/games/{id}/moves"),
        Some(json!({"from": sq(1, 4), "to": sq(3, 4)})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Game is in editing mode");

    let (status, game) = call(
        &app,
        "PUT",
        &format!("/api/games/{id}/edit/pieces"),
        Some(json!({"from": sq(0, 3), "to": sq(2, 3)})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(game["board"][2][3]["type"], "QUEEN");
    assert!(game["board"][0][3].is_null());

    let (status, game) = call(
        &app,
        "DELETE",
        &format!("/api/games/{id}/edit/pieces"),
        Some(json!({"position": sq(1, 0)})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(game["board"][1][0].is_null());

    let (status, game) = call(
        &app,
        "POST",
        &format!("/api/games/{id}/edit/stop"),
        Some(json!({"creatorId": "alice", "currentPlayer": "BLACK"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(game["mode"], "CUSTOM");
    assert_eq!(game["currentPlayer"], "BLACK");

    let (status, body) = call(&app, "POST", &format!("/api/games/{id}/edit/clear"), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Not in editing mode");
}

#[tokio::test]
async fn test_editor_requires_creator() {
    let (_, app) = test_app();
    let id = create_game(&app, Some("alice")).await;

    let (status, body) = call(
        &app,
        "POST",
        &format!("/api/games/{id}/edit/start"),
        Some(json!({"creatorId": "mallory"})),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "Not authorized");

    let (status, _) = call(&app, "POST", &format!("/api/games/{id}/edit/start"), Some(json!({}))).await;
    assert_eq!(status, StatusCode::FORBIDDEN, "Anonymous callers are not the creator");

    let (status, _) = call(
        &app,
        "POST",
        "/api/games/missing/edit/start",
        Some(json!({"creatorId": "alice"})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_reset_to_custom_and_standard() {
    let (_, app) = test_app();
    let id = create_game(&app, None).await;

    let (status, body) = call(&app, "POST", &format!("/api/games/{id}/edit/reset-custom"), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "No custom position saved");

    custom_position(
        &app,
        &id,
        &[("WHITE", "KING", 0, 0), ("BLACK", "KING", 5, 5), ("WHITE", "ROOK", 0, 5)],
        "WHITE",
    )
    .await;
    let (status, _) = call(
        &app,
        "POST",
        &format!("/api/games/{id}/moves"),
        Some(json!({"from": sq(0, 5), "to": sq(3, 5)})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, game) = call(&app, "POST", &format!("/api/games/{id}/edit/reset-custom"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(game["board"][0][5]["type"], "ROOK");
    assert_eq!(game["moveHistory"].as_array().unwrap().len(), 0);
    assert_eq!(game["mode"], "CUSTOM");

    call(&app, "POST", &format!("/api/games/{id}/edit/start"), Some(json!({}))).await;
    let (status, game) = call(&app, "POST", &format!("/api/games/{id}/edit/reset-standard"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(game["mode"], "EDITING");
    assert_eq!(game["board"][5][4]["type"], "KING");
}

#[tokio::test]
async fn test_undo_in_custom_game() {
    let (_, app) = test_app();
    let id = create_game(&app, Some("alice")).await;

    let (status, body) = call(&app, "POST", &format!("/api/games/{id}/undo?creatorId=alice"), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Undo is only available in custom mode");

    call(
        &app,
        "POST",
        &format!("/api/games/{id}/edit/start"),
        Some(json!({"creatorId": "alice"})),
    )
    .await;
    call(
        &app,
        "POST",
        &format!("/api/games/{id}/edit/stop"),
        Some(json!({"creatorId": "alice"})),
    )
    .await;

    let (status, body) = call(&app, "POST", &format!("/api/games/{id}/undo?creatorId=alice"), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "No moves to undo");

    let (status, _) = call(
        &app,
        "POST",
        &format!("/api/games/{id}/moves"),
        Some(json!({"from": sq(1, 4), "to": sq(3, 4)})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = call(&app, "POST", &format!("/api/games/{id}/undo?creatorId=bob"), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, game) = call(&app, "POST", &format!("/api/games/{id}/undo?creatorId=alice"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(game["currentPlayer"], "WHITE");
    assert_eq!(game["board"][1][4]["type"], "PAWN");
    assert!(game["board"][3][4].is_null());
    assert_eq!(game["moveHistory"].as_array().unwrap().len(), 0);
}

// ============================================================================
// Annotations
// ============================================================================

#[tokio::test]
async fn test_annotations_lifecycle() {
    let (_, app) = test_app();
    let id = create_game(&app, None).await;
    let uri = format!("/api/games/{id}/annotations");

    let (status, body) = call(
        &app,
        "POST",
        &uri,
        Some(json!({"type": "ARROW", "from": sq(1, 4), "to": sq(3, 4), "color": "GREEN"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);

    let (status, _) = call(
        &app,
        "POST",
        &uri,
        Some(json!({"type": "CIRCLE", "to": sq(2, 2), "color": "RED"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = call(
        &app,
        "POST",
        &uri,
        Some(json!({"type": "ARROW", "to": sq(2, 2), "color": "RED"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST, "Arrow without a tail");

    let (_, list) = call(&app, "GET", &uri, None).await;
    assert_eq!(list.as_array().unwrap().len(), 2);

    let (status, _) = call(&app, "DELETE", &uri, Some(json!({"position": sq(2, 2)}))).await;
    assert_eq!(status, StatusCode::OK);
    let (_, list) = call(&app, "GET", &uri, None).await;
    assert_eq!(list.as_array().unwrap().len(), 1);
    assert_eq!(list[0]["type"], "ARROW");

    let (status, _) = call(&app, "DELETE", &uri, Some(json!({}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST, "Removal needs a key");

    let (status, _) = call(&app, "DELETE", &format!("{uri}/all"), None).await;
    assert_eq!(status, StatusCode::OK);
    let (_, list) = call(&app, "GET", &uri, None).await;
    assert_eq!(list, json!([]));

    let (status, _) = call(&app, "GET", "/api/games/missing/annotations", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

// ============================================================================
// Broadcast
// ============================================================================

#[tokio::test]
async fn test_mutations_are_broadcast() {
    let (state, app) = test_app();
    let id = create_game(&app, None).await;
    let mut events = state.events.subscribe();

    call(
        &app,
        "POST",
        &format!("/api/games/{id}/moves"),
        Some(json!({"from": sq(0, 1), "to": sq(2, 2)})),
    )
    .await;
    match events.recv().await {
        Ok(ServerMessage::MoveMade { game_id, mv, .. }) => {
            assert_eq!(game_id, id);
            assert_eq!(mv.notation, "Nc3");
        }
        other => panic!("Expected MoveMade, got {:?}", other),
    }

    call(
        &app,
        "POST",
        &format!("/api/games/{id}/annotations"),
        Some(json!({"type": "CIRCLE", "to": sq(2, 2), "color": "BLUE"})),
    )
    .await;
    assert!(matches!(
        events.recv().await,
        Ok(ServerMessage::AnnotationAdded { .. })
    ));

    let (status, _) = call(&app, "POST", &format!("/api/games/{id}/edit/clear"), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(events.try_recv().is_err(), "Failed operations publish nothing");
}
