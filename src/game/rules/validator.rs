//! Move validation against a full game snapshot
//!
//! [`is_valid_move`] is the authoritative gate for ordinary moves: piece
//! present, right side to move, structurally reachable, and not leaving the
//! mover's own king attacked. Castling and en passant cannot be expressed by
//! a per-square movement test, so they have their own predicates
//! ([`can_castle`], [`can_en_passant`]) and the session service routes those
//! attempts to them (see [`is_castling_attempt`], [`is_en_passant_attempt`]).

use super::board_state::Board;
use super::check::{is_king_in_check, is_move_safe};
use super::piece_moves::{self, can_move, en_passant_target, en_passant_victim, pseudo_legal_moves};
use crate::game::resources::Game;
use crate::game::types::{PieceColor, PieceKind, Position};

/// File the king starts on
pub const KING_START_COL: u8 = 4;
/// File of the queenside rook
pub const QUEENSIDE_ROOK_COL: u8 = 0;
/// File of the kingside rook
pub const KINGSIDE_ROOK_COL: u8 = 5;

/// Validate an ordinary move; `Err` carries a reason for display
pub fn is_valid_move(from: Position, to: Position, game: &Game) -> Result<(), String> {
    let piece = game
        .board
        .get_piece(from)
        .ok_or_else(|| format!("No piece at position {from}"))?;

    if piece.color != game.current_player {
        return Err("Not your turn".to_string());
    }

    if !can_move(piece, from, to, &game.board) {
        return Err(format!("Invalid move for {}", piece.kind));
    }

    if !is_move_safe(&game.board, piece.color, from, to, None) {
        return Err("Move would leave king in check".to_string());
    }

    Ok(())
}

/// Legal destinations for the piece on `from`, for move highlighting
///
/// Empty when the square is empty or holds a piece of the side not to move.
/// Includes en passant captures and castling destinations alongside the
/// filtered pseudo-legal moves.
pub fn legal_moves(from: Position, game: &Game) -> Vec<Position> {
    let Some(piece) = game.board.get_piece(from) else {
        return Vec::new();
    };
    if piece.color != game.current_player {
        return Vec::new();
    }

    let board = &game.board;
    let mut moves: Vec<Position> = pseudo_legal_moves(piece, from, board)
        .into_iter()
        .filter(|&to| is_move_safe(board, piece.color, from, to, None))
        .collect();

    if let Some(to) = en_passant_target(piece, from, game.last_move()) {
        if is_move_safe(board, piece.color, from, to, en_passant_victim(from, to)) {
            moves.push(to);
        }
    }

    if piece.kind == PieceKind::King {
        for kingside in [false, true] {
            if can_castle(piece.color, kingside, game) {
                if let Some(to) = castling_destination(piece.color, kingside) {
                    moves.push(to);
                }
            }
        }
    }

    moves
}

/// Square the king lands on when castling, if the board has room for it
///
/// On a 6x6 board the kingside rook sits directly beside the king, so a
/// two-file kingside hop would leave the board and there is no such square.
pub fn castling_destination(color: PieceColor, kingside: bool) -> Option<Position> {
    let col = if kingside {
        KING_START_COL as i32 + 2
    } else {
        KING_START_COL as i32 - 2
    };
    Position::new(color.back_row() as i32, col).ok()
}

/// Check if `color` may castle on the given side right now
///
/// Requires untouched king and rook (by the game's monotonic flags) still on
/// their home squares, empty squares between them, and a king that is not
/// in check and does not pass through or land on an attacked square. The
/// rook's own path may be attacked.
pub fn can_castle(color: PieceColor, kingside: bool, game: &Game) -> bool {
    if game.has_king_moved(color) || game.has_rook_moved(color, kingside) {
        return false;
    }

    let row = color.back_row() as i32;
    let rook_col = if kingside {
        KINGSIDE_ROOK_COL
    } else {
        QUEENSIDE_ROOK_COL
    };
    let (Ok(king_home), Ok(rook_home)) = (
        Position::new(row, KING_START_COL as i32),
        Position::new(row, rook_col as i32),
    ) else {
        return false;
    };

    let board = &game.board;
    let home_pieces_in_place = board
        .get_piece(king_home)
        .is_some_and(|p| p.is(color, PieceKind::King))
        && board
            .get_piece(rook_home)
            .is_some_and(|p| p.is(color, PieceKind::Rook));
    if !home_pieces_in_place {
        return false;
    }

    let (low, high) = if kingside {
        (KING_START_COL, rook_col)
    } else {
        (rook_col, KING_START_COL)
    };
    let path_clear = (low + 1..high).all(|col| {
        Position::new(row, col as i32).is_ok_and(|pos| board.is_empty(pos))
    });
    if !path_clear {
        return false;
    }

    if is_king_in_check(color, board) {
        return false;
    }

    let Some(landing) = castling_destination(color, kingside) else {
        return false;
    };
    let step = if kingside { 1 } else { -1 };
    let Some(transit) = king_home.offset(0, step) else {
        return false;
    };

    king_only_safe(board, color, king_home, transit) && king_only_safe(board, color, king_home, landing)
}

/// King alone relocated to `to` (rook left in place) is not in check
fn king_only_safe(board: &Board, color: PieceColor, king_home: Position, to: Position) -> bool {
    is_move_safe(board, color, king_home, to, None)
}

/// Check if the pawn on `from` may capture en passant onto `to`
pub fn can_en_passant(from: Position, to: Position, game: &Game) -> bool {
    match game.board.get_piece(from) {
        Some(piece) => piece_moves::can_en_passant(piece, from, to, game.last_move()),
        None => false,
    }
}

/// Check if moving the piece on `from` to `to` is a promotion
pub fn should_promote(from: Position, to: Position, game: &Game) -> bool {
    game.board
        .get_piece(from)
        .is_some_and(|piece| piece_moves::should_promote(piece, to))
}

/// A king moving two files along its row
pub fn is_castling_attempt(from: Position, to: Position, board: &Board) -> bool {
    board
        .get_piece(from)
        .is_some_and(|piece| piece.kind == PieceKind::King)
        && from.row() == to.row()
        && from.col().abs_diff(to.col()) == 2
}

/// A pawn stepping diagonally forward onto an empty square
pub fn is_en_passant_attempt(from: Position, to: Position, board: &Board) -> bool {
    let Some(piece) = board.get_piece(from) else {
        return false;
    };
    piece.kind == PieceKind::Pawn
        && board.is_empty(to)
        && from.col().abs_diff(to.col()) == 1
        && to.row() as i32 - from.row() as i32 == piece.color.pawn_direction() as i32
}
