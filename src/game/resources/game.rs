//! The game aggregate
//!
//! A [`Game`] is a snapshot. Nothing here mutates a game in place: playing a
//! move or editing the board returns a new `Game` and leaves the receiver
//! untouched, so the registry can swap whole snapshots and undo can rebuild
//! one by replay.
//!
//! # Lifecycle
//!
//! ```text
//! STANDARD --start_editing--> EDITING --stop_editing--> CUSTOM
//!    ^                           ^                         |
//!    |                           +------start_editing------+
//! ```
//!
//! Legality is not checked here. [`Game::after_move`] trusts that its move
//! was validated by [`crate::game::rules::validator`], and the editor
//! transforms bypass the rules entirely; the session service decides when
//! each is allowed.

use super::castling::CastlingRights;
use crate::game::components::{GameMode, GameStatus, Move};
use crate::game::rules::board_state::Board;
use crate::game::rules::check::game_status;
use crate::game::rules::piece_moves::en_passant_victim;
use crate::game::rules::validator::{KINGSIDE_ROOK_COL, QUEENSIDE_ROOK_COL};
use crate::game::types::{Piece, PieceColor, Position};
use chrono::{DateTime, Utc};
use uuid::Uuid;

/// A chess game state
#[derive(Debug, Clone, PartialEq)]
pub struct Game {
    pub id: String,
    pub board: Board,
    pub current_player: PieceColor,
    pub status: GameStatus,
    pub move_history: Vec<Move>,
    pub castling: CastlingRights,
    pub mode: GameMode,
    pub creator_id: Option<String>,
    /// Board saved when editing stopped; the replay base for undo
    pub custom_start_position: Option<Board>,
    /// Side to move at `custom_start_position`
    pub custom_start_player: PieceColor,
    pub created_at: DateTime<Utc>,
    pub last_move_at: Option<DateTime<Utc>>,
}

impl Default for Game {
    fn default() -> Self {
        Game::new(None)
    }
}

impl Game {
    /// New game with a fresh id and the standard start position
    pub fn new(creator_id: Option<String>) -> Self {
        Game {
            id: Uuid::new_v4().to_string(),
            board: Board::standard(),
            current_player: PieceColor::White,
            status: GameStatus::Active,
            move_history: Vec::new(),
            castling: CastlingRights::default(),
            mode: GameMode::Standard,
            creator_id,
            custom_start_position: None,
            custom_start_player: PieceColor::White,
            created_at: Utc::now(),
            last_move_at: None,
        }
    }

    /// Game on an arbitrary board with `current_player` to move
    ///
    /// Castling rights start untouched and the status is evaluated for the
    /// position.
    pub fn from_position(board: Board, current_player: PieceColor) -> Self {
        let mut game = Game {
            board,
            current_player,
            ..Game::new(None)
        };
        game.status = game_status(&game);
        game
    }

    pub fn last_move(&self) -> Option<&Move> {
        self.move_history.last()
    }

    pub fn has_king_moved(&self, color: PieceColor) -> bool {
        self.castling.king_moved(color)
    }

    pub fn has_rook_moved(&self, color: PieceColor, kingside: bool) -> bool {
        self.castling.rook_moved(color, kingside)
    }

    /// Full moves played, counting an unanswered white move
    pub fn move_count(&self) -> usize {
        (self.move_history.len() + 1) / 2
    }

    pub fn is_game_over(&self) -> bool {
        self.status.is_terminal()
    }

    /// Whether `caller` may run creator-only operations
    ///
    /// A game without a recorded creator accepts anyone.
    pub fn is_creator(&self, caller: Option<&str>) -> bool {
        match self.creator_id.as_deref() {
            None => true,
            Some(creator) => caller == Some(creator),
        }
    }

    /// New game state after `mv`, with `new_status` recorded as given
    ///
    /// Board update order: relocate the piece, replace it with the promoted
    /// piece, remove an en passant victim, hop the castling rook.
    pub fn after_move(&self, mv: &Move, new_status: GameStatus) -> Game {
        let mut board = self.board.clone();
        board.move_piece(mv.from, mv.to);

        if let Some(kind) = mv.promotion {
            board.set_piece(mv.to, Some(Piece::new(mv.piece.color, kind)));
        }

        if mv.is_en_passant {
            if let Some(victim) = en_passant_victim(mv.from, mv.to) {
                board.set_piece(victim, None);
            }
        }

        if mv.is_castling {
            let row = mv.from.row() as i32;
            let (rook_from, rook_to) = if mv.to.col() > mv.from.col() {
                (KINGSIDE_ROOK_COL as i32, mv.to.col() as i32 - 1)
            } else {
                (QUEENSIDE_ROOK_COL as i32, mv.to.col() as i32 + 1)
            };
            if let (Ok(from), Ok(to)) = (Position::new(row, rook_from), Position::new(row, rook_to)) {
                board.move_piece(from, to);
            }
        }

        let mut move_history = self.move_history.clone();
        move_history.push(*mv);

        Game {
            board,
            current_player: self.current_player.opposite(),
            status: new_status,
            move_history,
            castling: self.castling.after_move(mv),
            last_move_at: Some(Utc::now()),
            ..self.clone()
        }
    }

    /// Apply `mv` and evaluate the resulting position's status
    pub fn play(&self, mv: &Move) -> Game {
        let mut next = self.after_move(mv, GameStatus::Active);
        next.status = game_status(&next);
        next
    }

    /// Enter editing mode, suspending move history
    pub fn start_editing(&self, creator_id: Option<&str>) -> Game {
        Game {
            mode: GameMode::Editing,
            status: GameStatus::Active,
            move_history: Vec::new(),
            creator_id: self
                .creator_id
                .clone()
                .or_else(|| creator_id.map(str::to_string)),
            ..self.clone()
        }
    }

    /// Leave editing mode and start playing the edited board
    ///
    /// The current board becomes the custom start position, castling rights
    /// start fresh and the status is evaluated for `current_player`.
    pub fn stop_editing(&self, current_player: PieceColor) -> Game {
        let mut game = Game {
            mode: GameMode::Custom,
            current_player,
            move_history: Vec::new(),
            castling: CastlingRights::default(),
            custom_start_position: Some(self.board.clone()),
            custom_start_player: current_player,
            ..self.clone()
        };
        game.status = game_status(&game);
        game
    }

    /// Put `piece` on `pos` (or empty it with `None`), replacing any occupant
    pub fn with_piece(&self, pos: Position, piece: Option<Piece>) -> Game {
        let mut board = self.board.clone();
        board.set_piece(pos, piece);
        Game {
            board,
            ..self.clone()
        }
    }

    /// Editor relocation: whatever is on `to` goes to `from` (a swap)
    pub fn with_pieces_swapped(&self, from: Position, to: Position) -> Game {
        let mut board = self.board.clone();
        let moving = board.get_piece(from);
        let displaced = board.get_piece(to);
        board.set_piece(to, moving);
        board.set_piece(from, displaced);
        Game {
            board,
            ..self.clone()
        }
    }

    /// Same game on an empty board
    pub fn with_board_cleared(&self) -> Game {
        Game {
            board: Board::empty(),
            ..self.clone()
        }
    }

    /// Same game on the standard start board, white to move
    pub fn with_standard_board(&self) -> Game {
        Game {
            board: Board::standard(),
            current_player: PieceColor::White,
            status: GameStatus::Active,
            castling: CastlingRights::default(),
            ..self.clone()
        }
    }

    /// Restart from the saved custom position, white to move
    ///
    /// Returns `None` when no custom position was ever saved.
    pub fn reset_to_custom(&self) -> Option<Game> {
        let start = self.custom_start_position.clone()?;
        Some(Game {
            board: start,
            mode: GameMode::Custom,
            current_player: PieceColor::White,
            custom_start_player: PieceColor::White,
            status: GameStatus::Active,
            move_history: Vec::new(),
            castling: CastlingRights::default(),
            last_move_at: None,
            ..self.clone()
        })
    }

    /// Rebuild the game without its last move by replaying the rest
    ///
    /// Replays from the custom start position, so castling rights and status
    /// are re-derived ply by ply exactly as they were when first played.
    /// Returns `None` without a custom start or without moves.
    pub fn undo_last_move(&self) -> Option<Game> {
        let start = self.custom_start_position.clone()?;
        let (_, kept) = self.move_history.split_last()?;

        let mut base = Game {
            board: start,
            current_player: self.custom_start_player,
            move_history: Vec::new(),
            castling: CastlingRights::default(),
            last_move_at: None,
            ..self.clone()
        };
        base.status = game_status(&base);

        Some(kept.iter().fold(base, |game, mv| game.play(mv)))
    }
}
