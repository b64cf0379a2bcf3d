//! Chess piece movement rules
//!
//! Contains the rules for how each chess piece can move.
//! Pure functions with no side effects - easy to test.
//!
//! Every kind answers two questions, dispatched through a single `match` on
//! [`PieceKind`]:
//!
//! - [`pseudo_legal_moves`] lists every destination reachable from a square
//! - [`can_move`] tests one `from -> to` transition directly
//!
//! Neither considers check. The two are written independently (generation
//! walks rays outward, the test walks one ray and exits on the first blocker)
//! and must agree on every input; the test suite checks this exhaustively on
//! a set of boards.
//!
//! Castling and en passant are not movement shapes here. A king's two-file
//! hop and a pawn's diagonal step onto an empty square are validated by
//! [`super::validator`] using the game's castling flags and last move.

use super::board_state::Board;
use crate::game::components::Move;
use crate::game::types::{Piece, PieceColor, PieceKind, Position};

const ORTHOGONAL: [(i8, i8); 4] = [(-1, 0), (1, 0), (0, -1), (0, 1)];
const DIAGONAL: [(i8, i8); 4] = [(-1, -1), (-1, 1), (1, -1), (1, 1)];
const ALL_DIRECTIONS: [(i8, i8); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];
const KNIGHT_JUMPS: [(i8, i8); 8] = [
    (-2, -1),
    (-2, 1),
    (-1, -2),
    (-1, 2),
    (1, -2),
    (1, 2),
    (2, -1),
    (2, 1),
];

/// Get all pseudo-legal destinations for `piece` standing on `from`
pub fn pseudo_legal_moves(piece: Piece, from: Position, board: &Board) -> Vec<Position> {
    match piece.kind {
        PieceKind::Pawn => pawn_moves(piece.color, from, board),
        PieceKind::Knight => step_moves(piece.color, from, &KNIGHT_JUMPS, board),
        PieceKind::Bishop => sliding_moves(piece.color, from, &DIAGONAL, board),
        PieceKind::Rook => sliding_moves(piece.color, from, &ORTHOGONAL, board),
        PieceKind::Queen => sliding_moves(piece.color, from, &ALL_DIRECTIONS, board),
        PieceKind::King => step_moves(piece.color, from, &ALL_DIRECTIONS, board),
    }
}

/// Check if `piece` on `from` can structurally reach `to`, ignoring check
pub fn can_move(piece: Piece, from: Position, to: Position, board: &Board) -> bool {
    if from == to || board.get_piece_color(to) == Some(piece.color) {
        return false;
    }

    match piece.kind {
        PieceKind::Pawn => is_valid_pawn_move(piece.color, from, to, board),
        PieceKind::Knight => is_valid_knight_move(from, to),
        PieceKind::Bishop => is_valid_bishop_move(from, to, board),
        PieceKind::Rook => is_valid_rook_move(from, to, board),
        PieceKind::Queen => {
            is_valid_rook_move(from, to, board) || is_valid_bishop_move(from, to, board)
        }
        PieceKind::King => is_valid_king_move(from, to),
    }
}

/// Check if a pawn on `from` may capture en passant onto `to`
///
/// Only the immediately preceding move matters: it must be an enemy pawn's
/// double step that landed beside this pawn on the same row, and `to` must be
/// the square that pawn skipped over.
pub fn can_en_passant(piece: Piece, from: Position, to: Position, last_move: Option<&Move>) -> bool {
    en_passant_target(piece, from, last_move) == Some(to)
}

/// The en passant destination available to `piece` on `from`, if any
pub fn en_passant_target(piece: Piece, from: Position, last_move: Option<&Move>) -> Option<Position> {
    if piece.kind != PieceKind::Pawn {
        return None;
    }
    let last = last_move?;
    if last.piece.color == piece.color || !last.is_pawn_double_move() {
        return None;
    }
    if last.to.row() != from.row() || last.to.col().abs_diff(from.col()) != 1 {
        return None;
    }

    let skipped_row = (last.from.row() + last.to.row()) / 2;
    Position::new(skipped_row as i32, last.to.col() as i32).ok()
}

/// Square of the pawn removed by an en passant capture `from -> to`
pub fn en_passant_victim(from: Position, to: Position) -> Option<Position> {
    Position::new(from.row() as i32, to.col() as i32).ok()
}

/// Check if a pawn of `piece`'s color landing on `to` must promote
pub fn should_promote(piece: Piece, to: Position) -> bool {
    piece.kind == PieceKind::Pawn && to.row() == piece.color.promotion_row()
}

fn pawn_moves(color: PieceColor, from: Position, board: &Board) -> Vec<Position> {
    let mut moves = Vec::new();
    let direction = color.pawn_direction();

    if let Some(one_ahead) = from.offset(direction, 0) {
        if board.is_empty(one_ahead) {
            moves.push(one_ahead);

            if from.row() == color.pawn_start_row() {
                if let Some(two_ahead) = from.offset(2 * direction, 0) {
                    if board.is_empty(two_ahead) {
                        moves.push(two_ahead);
                    }
                }
            }
        }
    }

    for col_delta in [-1, 1] {
        if let Some(capture) = from.offset(direction, col_delta) {
            if board.get_piece_color(capture) == Some(color.opposite()) {
                moves.push(capture);
            }
        }
    }

    moves
}

fn step_moves(
    color: PieceColor,
    from: Position,
    deltas: &[(i8, i8)],
    board: &Board,
) -> Vec<Position> {
    deltas
        .iter()
        .filter_map(|&(dr, dc)| from.offset(dr, dc))
        .filter(|&to| board.get_piece_color(to) != Some(color))
        .collect()
}

fn sliding_moves(
    color: PieceColor,
    from: Position,
    directions: &[(i8, i8)],
    board: &Board,
) -> Vec<Position> {
    let mut moves = Vec::new();

    for &(dr, dc) in directions {
        let mut current = from.offset(dr, dc);
        while let Some(pos) = current {
            match board.get_piece_color(pos) {
                None => moves.push(pos),
                Some(other) => {
                    if other != color {
                        moves.push(pos);
                    }
                    break;
                }
            }
            current = pos.offset(dr, dc);
        }
    }

    moves
}

fn is_valid_pawn_move(color: PieceColor, from: Position, to: Position, board: &Board) -> bool {
    let direction = color.pawn_direction() as i32;
    let row_diff = to.row() as i32 - from.row() as i32;
    let col_diff = to.col().abs_diff(from.col());

    // Forward move
    if col_diff == 0 && row_diff == direction {
        return board.is_empty(to);
    }

    // Double move from starting row
    if col_diff == 0 && row_diff == 2 * direction && from.row() == color.pawn_start_row() {
        return from
            .offset(direction as i8, 0)
            .is_some_and(|between| board.is_empty(between))
            && board.is_empty(to);
    }

    // Capture diagonally
    if col_diff == 1 && row_diff == direction {
        return board.get_piece_color(to) == Some(color.opposite());
    }

    false
}

fn is_valid_knight_move(from: Position, to: Position) -> bool {
    let dx = from.col().abs_diff(to.col());
    let dy = from.row().abs_diff(to.row());
    (dx == 2 && dy == 1) || (dx == 1 && dy == 2)
}

fn is_valid_bishop_move(from: Position, to: Position, board: &Board) -> bool {
    let dx = from.col().abs_diff(to.col());
    let dy = from.row().abs_diff(to.row());

    // Must move diagonally
    if dx != dy || dx == 0 {
        return false;
    }

    is_path_clear(from, to, board)
}

fn is_valid_rook_move(from: Position, to: Position, board: &Board) -> bool {
    // Must move horizontally or vertically
    if from.row() != to.row() && from.col() != to.col() {
        return false;
    }

    is_path_clear(from, to, board)
}

fn is_valid_king_move(from: Position, to: Position) -> bool {
    from.col().abs_diff(to.col()) <= 1 && from.row().abs_diff(to.row()) <= 1
}

/// Every square strictly between `from` and `to` on a straight line is empty
fn is_path_clear(from: Position, to: Position, board: &Board) -> bool {
    let dr = (to.row() as i8 - from.row() as i8).signum();
    let dc = (to.col() as i8 - from.col() as i8).signum();

    let mut current = from.offset(dr, dc);
    while let Some(pos) = current {
        if pos == to {
            return true;
        }
        if !board.is_empty(pos) {
            return false;
        }
        current = pos.offset(dr, dc);
    }

    false
}
