//! Check, checkmate and stalemate detection
//!
//! Attack detection reuses [`can_move`] for every opposing piece rather than
//! a separate attack table: a square is attacked when some enemy piece could
//! structurally move onto it. A pawn only "attacks" diagonally forward onto
//! an occupied enemy square, which is exactly the case that matters for
//! kings.
//!
//! A side with no king (possible after free editing) is never in check.

use super::board_state::Board;
use super::piece_moves::{can_move, en_passant_target, en_passant_victim, pseudo_legal_moves};
use crate::game::components::GameStatus;
use crate::game::resources::Game;
use crate::game::types::{PieceColor, Position};

/// Check if `color`'s king is attacked by any opposing piece
pub fn is_king_in_check(color: PieceColor, board: &Board) -> bool {
    match board.find_king(color) {
        Some(king) => is_square_under_attack(king, color.opposite(), board),
        None => false,
    }
}

/// Check if any piece of `by_color` can move onto `pos`
pub fn is_square_under_attack(pos: Position, by_color: PieceColor, board: &Board) -> bool {
    board
        .occupied()
        .filter(|(_, piece)| piece.color == by_color)
        .any(|(from, piece)| can_move(piece, from, pos, board))
}

/// Squares of the pieces currently giving check to `color`'s king
pub fn attacking_pieces(color: PieceColor, board: &Board) -> Vec<Position> {
    let Some(king) = board.find_king(color) else {
        return Vec::new();
    };

    board
        .get_pieces(color.opposite())
        .into_iter()
        .filter(|&(from, piece)| can_move(piece, from, king, board))
        .map(|(from, _)| from)
        .collect()
}

/// Play `from -> to` on a copy of `board` and report whether the mover's
/// king is safe afterwards
///
/// `en_passant_victim` names the square of a pawn removed by an en passant
/// capture, which is not the destination square.
pub fn is_move_safe(
    board: &Board,
    color: PieceColor,
    from: Position,
    to: Position,
    en_passant_victim: Option<Position>,
) -> bool {
    let mut test_board = board.clone();
    test_board.move_piece(from, to);
    if let Some(victim) = en_passant_victim {
        test_board.set_piece(victim, None);
    }
    !is_king_in_check(color, &test_board)
}

/// Check if the side to move has at least one legal move
///
/// Candidates are every pseudo-legal destination plus the en passant
/// capture offered by the last move. Castling is not considered: whenever
/// castling is legal, the king's one-step move to the transit square is too.
pub fn has_any_legal_moves(game: &Game) -> bool {
    let color = game.current_player;
    let board = &game.board;
    let last_move = game.last_move();

    board.get_pieces(color).into_iter().any(|(from, piece)| {
        let quiet = pseudo_legal_moves(piece, from, board)
            .into_iter()
            .any(|to| is_move_safe(board, color, from, to, None));

        quiet
            || en_passant_target(piece, from, last_move)
                .is_some_and(|to| is_move_safe(board, color, from, to, en_passant_victim(from, to)))
    })
}

/// King in check and no legal move
pub fn is_checkmate(game: &Game) -> bool {
    is_king_in_check(game.current_player, &game.board) && !has_any_legal_moves(game)
}

/// King not in check and no legal move
pub fn is_stalemate(game: &Game) -> bool {
    !is_king_in_check(game.current_player, &game.board) && !has_any_legal_moves(game)
}

/// Status of the position for the side to move
///
/// Priority: checkmate, stalemate, check, active. Never yields `Draw`.
pub fn game_status(game: &Game) -> GameStatus {
    let in_check = is_king_in_check(game.current_player, &game.board);
    let has_moves = has_any_legal_moves(game);

    match (in_check, has_moves) {
        (true, false) => GameStatus::Checkmate,
        (false, false) => GameStatus::Stalemate,
        (true, true) => GameStatus::Check,
        (false, true) => GameStatus::Active,
    }
}
