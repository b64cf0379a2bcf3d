//! Session service: the single entry point for callers
//!
//! Owns the game registry and the annotation store. Every mutating
//! operation runs as one atomic transition on the affected game, so
//! concurrent requests for the same game are applied one after another.
//!
//! # Move execution
//!
//! 1. Unknown game, editing mode or a finished game is rejected up front.
//! 2. Castling attempts (king hopping two files) and en passant attempts
//!    (pawn stepping diagonally onto an empty square) are checked by their
//!    own predicates; every other move goes through
//!    [`validator::is_valid_move`].
//! 3. A pawn reaching the last row needs a promotion kind, otherwise the
//!    caller gets [`MoveResult::PromotionRequired`] and nothing changes.
//! 4. The move is applied and the new snapshot stored with its status.
//!
//! # Events
//!
//! A service built with [`GameService::with_listener`] reports each
//! committed change as a [`GameEvent`] before the game's entry lock is
//! released. Rejected operations report nothing.

use super::annotations::AnnotationStore;
use super::events::{GameEvent, GameListener};
use super::registry::GameRegistry;
use super::results::{EditResult, MoveResult};
use crate::game::components::{GameMode, Move};
use crate::game::resources::{Annotation, AnnotationKey, Game};
use crate::game::rules::check::is_move_safe;
use crate::game::rules::piece_moves::{self, en_passant_victim};
use crate::game::rules::validator;
use crate::game::types::{Piece, PieceColor, PieceKind, Position};
use tracing::{debug, info, warn};

const EDITING_MODE: &str = "Game is in editing mode";
const NOT_EDITING: &str = "Not in editing mode";

/// Game sessions held in memory for the life of the process
#[derive(Default)]
pub struct GameService {
    games: GameRegistry,
    pub(super) annotations: AnnotationStore,
    listener: Option<GameListener>,
}

impl GameService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Service that reports every committed change to `listener`
    pub fn with_listener(listener: impl Fn(&Game, &GameEvent) + Send + Sync + 'static) -> Self {
        GameService {
            listener: Some(Box::new(listener)),
            ..Self::default()
        }
    }

    // ------------------------------------------------------------------
    // Games
    // ------------------------------------------------------------------

    /// Create a game on the standard board and register it
    pub fn create_game(&self, creator_id: Option<String>) -> Game {
        let game = Game::new(creator_id);
        self.games.insert(game.clone());
        info!(
            "[GAME] Created game {} (creator: {})",
            game.id,
            game.creator_id.as_deref().unwrap_or("none")
        );
        game
    }

    pub fn get_game(&self, game_id: &str) -> Option<Game> {
        self.games.get(game_id)
    }

    pub fn list_games(&self) -> Vec<Game> {
        self.games.list()
    }

    /// Remove a game and its annotations; `false` if it did not exist
    pub fn delete_game(&self, game_id: &str) -> bool {
        let removed = self.games.remove(game_id).is_some();
        if removed {
            self.annotations.clear(game_id);
            info!("[GAME] Deleted game {}", game_id);
        }
        removed
    }

    // ------------------------------------------------------------------
    // Play
    // ------------------------------------------------------------------

    /// Validate and apply a move
    ///
    /// `promotion` is only consulted when the move is a promotion; it is
    /// ignored (and not recorded) otherwise.
    pub fn make_move(
        &self,
        game_id: &str,
        from: Position,
        to: Position,
        promotion: Option<PieceKind>,
    ) -> MoveResult {
        self.games
            .transition(game_id, |game| {
                let result = evaluate_move(game, from, to, promotion);
                match &result {
                    MoveResult::Success { game: next, mv } => {
                        debug!("[GAME] {}: {} played {}", game_id, mv.piece, mv.to_algebraic());
                        if next.is_game_over() {
                            info!("[GAME] {} ended: {:?}", game_id, next.status);
                        }
                        self.emit(next, &GameEvent::MoveMade { mv: *mv });
                    }
                    MoveResult::InvalidMove { reason } => {
                        debug!("[GAME] {}: rejected {}-{}: {}", game_id, from, to, reason);
                    }
                    _ => {}
                }
                (result.game().cloned(), result)
            })
            .unwrap_or(MoveResult::GameNotFound)
    }

    /// Legal destinations for the piece on `from`
    ///
    /// Empty for unknown games, games being edited, empty squares and pieces
    /// of the side not to move.
    pub fn legal_moves(&self, game_id: &str, from: Position) -> Vec<Position> {
        self.games
            .get(game_id)
            .filter(|game| game.mode != GameMode::Editing)
            .map(|game| validator::legal_moves(from, &game))
            .unwrap_or_default()
    }

    // ------------------------------------------------------------------
    // Editor
    // ------------------------------------------------------------------

    /// Enter editing mode
    ///
    /// A game without a creator is claimed by `creator_id`.
    pub fn start_editing(&self, game_id: &str, creator_id: Option<&str>) -> EditResult {
        self.edit(game_id, GameEvent::EditModeStarted, |game| {
            if game.mode == GameMode::Editing {
                return EditResult::invalid("Already in editing mode");
            }
            if !game.is_creator(creator_id) {
                warn!("[EDITOR] {}: start editing refused for {:?}", game_id, creator_id);
                return EditResult::NotAuthorized;
            }
            info!("[EDITOR] {} entered editing mode", game_id);
            EditResult::Success {
                game: game.start_editing(creator_id),
            }
        })
    }

    /// Leave editing mode and play the edited board as a custom game
    pub fn stop_editing(
        &self,
        game_id: &str,
        creator_id: Option<&str>,
        current_player: PieceColor,
    ) -> EditResult {
        self.edit(game_id, GameEvent::EditModeEnded, |game| {
            if game.mode != GameMode::Editing {
                return EditResult::invalid(NOT_EDITING);
            }
            if !game.is_creator(creator_id) {
                warn!("[EDITOR] {}: stop editing refused for {:?}", game_id, creator_id);
                return EditResult::NotAuthorized;
            }
            let game = game.stop_editing(current_player);
            info!(
                "[EDITOR] {} left editing mode, {} to move ({:?})",
                game_id, current_player, game.status
            );
            EditResult::Success { game }
        })
    }

    /// Put `piece` on `position`, replacing any occupant
    pub fn add_piece(&self, game_id: &str, piece: Piece, position: Position) -> EditResult {
        self.edit_board(game_id, GameEvent::PieceAdded { piece, position }, |game| {
            debug!("[EDITOR] {}: add {} on {}", game_id, piece, position);
            game.with_piece(position, Some(piece))
        })
    }

    pub fn remove_piece(&self, game_id: &str, position: Position) -> EditResult {
        self.edit_board(game_id, GameEvent::PieceRemoved { position }, |game| {
            debug!("[EDITOR] {}: clear {}", game_id, position);
            game.with_piece(position, None)
        })
    }

    /// Relocate a piece; an occupied target swaps with the source
    pub fn move_piece_editor(&self, game_id: &str, from: Position, to: Position) -> EditResult {
        self.edit_board(game_id, GameEvent::PieceMoved { from, to }, |game| {
            debug!("[EDITOR] {}: move {} to {}", game_id, from, to);
            game.with_pieces_swapped(from, to)
        })
    }

    pub fn clear_board(&self, game_id: &str) -> EditResult {
        self.edit_board(game_id, GameEvent::BoardCleared, |game| {
            info!("[EDITOR] {}: board cleared", game_id);
            game.with_board_cleared()
        })
    }

    pub fn reset_to_standard(&self, game_id: &str) -> EditResult {
        self.edit_board(game_id, GameEvent::BoardReset, |game| {
            info!("[EDITOR] {}: board reset to standard", game_id);
            game.with_standard_board()
        })
    }

    /// Restart from the saved custom position
    pub fn reset_to_custom(&self, game_id: &str) -> EditResult {
        self.edit(game_id, GameEvent::BoardReset, |game| match game.reset_to_custom() {
            Some(game) => {
                info!("[EDITOR] {}: reset to custom position", game_id);
                EditResult::Success { game }
            }
            None => EditResult::invalid("No custom position saved"),
        })
    }

    /// Take back the last move of a custom game by replaying the rest
    pub fn undo_move(&self, game_id: &str, creator_id: Option<&str>) -> EditResult {
        self.edit(game_id, GameEvent::MoveUndone, |game| {
            if game.mode != GameMode::Custom {
                return EditResult::invalid("Undo is only available in custom mode");
            }
            if !game.is_creator(creator_id) {
                warn!("[EDITOR] {}: undo refused for {:?}", game_id, creator_id);
                return EditResult::NotAuthorized;
            }
            if game.move_history.is_empty() {
                return EditResult::invalid("No moves to undo");
            }
            match game.undo_last_move() {
                Some(game) => {
                    info!("[EDITOR] {}: undo, {} moves remain", game_id, game.move_history.len());
                    EditResult::Success { game }
                }
                None => EditResult::invalid("No custom position saved"),
            }
        })
    }

    // ------------------------------------------------------------------
    // Annotations
    // ------------------------------------------------------------------

    // Annotation writes hold the game's entry lock, so they cannot land
    // between `delete_game` removing the game and clearing its list.

    /// `None` if the game does not exist
    pub fn annotations(&self, game_id: &str) -> Option<Vec<Annotation>> {
        self.games
            .contains(game_id)
            .then(|| self.annotations.list(game_id))
    }

    /// `false` if the game does not exist
    pub fn add_annotation(&self, game_id: &str, annotation: Annotation) -> bool {
        self.annotate(game_id, GameEvent::AnnotationAdded { annotation }, || {
            self.annotations.add(game_id, annotation);
            debug!("[ANNOTATIONS] {}: added {:?}", game_id, annotation.kind);
        })
    }

    /// Remove annotations matching `key`
    ///
    /// Succeeds for any existing game, even when nothing matched.
    pub fn remove_annotation(&self, game_id: &str, key: &AnnotationKey) -> bool {
        self.annotate(game_id, GameEvent::AnnotationRemoved { key: *key }, || {
            let removed = self.annotations.remove(game_id, key);
            debug!("[ANNOTATIONS] {}: removed {} for {:?}", game_id, removed, key);
        })
    }

    pub fn clear_annotations(&self, game_id: &str) -> bool {
        self.annotate(game_id, GameEvent::AnnotationsCleared, || {
            self.annotations.clear(game_id);
            debug!("[ANNOTATIONS] {}: cleared", game_id);
        })
    }

    // ------------------------------------------------------------------

    fn emit(&self, game: &Game, event: &GameEvent) {
        if let Some(listener) = &self.listener {
            listener(game, event);
        }
    }

    /// Run `f` as an atomic transition, storing the game and reporting
    /// `event` on success
    fn edit(
        &self,
        game_id: &str,
        event: GameEvent,
        f: impl FnOnce(&Game) -> EditResult,
    ) -> EditResult {
        self.games
            .transition(game_id, |game| {
                let result = f(game);
                if let Some(next) = result.game() {
                    self.emit(next, &event);
                }
                (result.game().cloned(), result)
            })
            .unwrap_or(EditResult::GameNotFound)
    }

    /// Editing-mode-only board transform
    fn edit_board(
        &self,
        game_id: &str,
        event: GameEvent,
        f: impl FnOnce(&Game) -> Game,
    ) -> EditResult {
        self.edit(game_id, event, |game| {
            if game.mode != GameMode::Editing {
                return EditResult::invalid(NOT_EDITING);
            }
            EditResult::Success { game: f(game) }
        })
    }

    /// Annotation change under the game's entry lock; `false` if the game
    /// does not exist
    fn annotate(&self, game_id: &str, event: GameEvent, f: impl FnOnce()) -> bool {
        self.games
            .transition(game_id, |game| {
                f();
                self.emit(game, &event);
                (None, ())
            })
            .is_some()
    }
}

/// Decide a move against one snapshot without touching the registry
fn evaluate_move(
    game: &Game,
    from: Position,
    to: Position,
    promotion: Option<PieceKind>,
) -> MoveResult {
    if game.mode == GameMode::Editing {
        return MoveResult::invalid(EDITING_MODE);
    }
    if game.is_game_over() {
        return MoveResult::GameOver;
    }

    let board = &game.board;
    let Some(piece) = board.get_piece(from) else {
        return MoveResult::invalid(format!("No piece at position {from}"));
    };

    let mut is_castling = false;
    let mut is_en_passant = false;

    if validator::is_castling_attempt(from, to, board) {
        if piece.color != game.current_player {
            return MoveResult::invalid("Not your turn");
        }
        let kingside = to.col() > from.col();
        if !validator::can_castle(piece.color, kingside, game) {
            return MoveResult::invalid("Cannot castle");
        }
        is_castling = true;
    } else if validator::is_en_passant_attempt(from, to, board) {
        if piece.color != game.current_player {
            return MoveResult::invalid("Not your turn");
        }
        let safe = is_move_safe(board, piece.color, from, to, en_passant_victim(from, to));
        if !validator::can_en_passant(from, to, game) || !safe {
            return MoveResult::invalid("Invalid en passant");
        }
        is_en_passant = true;
    } else if let Err(reason) = validator::is_valid_move(from, to, game) {
        return MoveResult::InvalidMove { reason };
    }

    let promotion = if piece_moves::should_promote(piece, to) {
        match promotion.map(PieceKind::as_promotion) {
            None => return MoveResult::PromotionRequired,
            Some(Err(err)) => return MoveResult::invalid(err.to_string()),
            Some(Ok(kind)) => Some(kind),
        }
    } else {
        None
    };

    let mv = Move {
        from,
        to,
        piece,
        captured_piece: board.get_piece(to),
        promotion,
        is_castling,
        is_en_passant,
    };

    MoveResult::Success {
        game: game.play(&mv),
        mv,
    }
}
