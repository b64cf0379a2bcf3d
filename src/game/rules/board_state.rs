//! Board state representation for move validation
//!
//! A fixed 6x6 mailbox of optional pieces. The board is plain data: it knows
//! nothing about turns, castling rights or move history, and `move_piece`
//! only relocates whatever sits on the source square. Capture bookkeeping,
//! castling rook hops, en passant removal and promotion are applied by
//! [`crate::game::resources::Game::after_move`].
//!
//! `Board` is `Clone`; a clone is a fully independent copy (pieces are
//! `Copy` values), which is what every snapshot and every "simulate this
//! move" check relies on.

use crate::game::types::{Piece, PieceColor, PieceKind, Position, BOARD_SIZE};
use std::fmt;

const SIZE: usize = BOARD_SIZE as usize;

/// Back rank layout shared by both colors, file a to file f
const BACK_RANK: [PieceKind; SIZE] = [
    PieceKind::Rook,
    PieceKind::Knight,
    PieceKind::Bishop,
    PieceKind::Queen,
    PieceKind::King,
    PieceKind::Rook,
];

/// Represents the state of the board
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Board {
    grid: [[Option<Piece>; SIZE]; SIZE],
}

impl Default for Board {
    fn default() -> Self {
        Board::standard()
    }
}

impl Board {
    /// Board with no pieces on it
    pub fn empty() -> Self {
        Board {
            grid: [[None; SIZE]; SIZE],
        }
    }

    /// Standard 6x6 starting position
    ///
    /// White: R N B Q K R on row 0, pawns on row 1.
    /// Black mirrors it on rows 5 and 4.
    pub fn standard() -> Self {
        let mut board = Board::empty();
        for (col, kind) in BACK_RANK.iter().enumerate() {
            for color in [PieceColor::White, PieceColor::Black] {
                board.grid[color.back_row() as usize][col] = Some(Piece::new(color, *kind));
                board.grid[color.pawn_start_row() as usize][col] =
                    Some(Piece::new(color, PieceKind::Pawn));
            }
        }
        board
    }

    pub fn get_piece(&self, pos: Position) -> Option<Piece> {
        self.grid[pos.row() as usize][pos.col() as usize]
    }

    pub fn set_piece(&mut self, pos: Position, piece: Option<Piece>) {
        self.grid[pos.row() as usize][pos.col() as usize] = piece;
    }

    /// Relocate whatever is on `from` to `to`, leaving `from` empty
    pub fn move_piece(&mut self, from: Position, to: Position) {
        let piece = self.get_piece(from);
        self.set_piece(to, piece);
        self.set_piece(from, None);
    }

    pub fn is_empty(&self, pos: Position) -> bool {
        self.get_piece(pos).is_none()
    }

    pub fn get_piece_color(&self, pos: Position) -> Option<PieceColor> {
        self.get_piece(pos).map(|piece| piece.color)
    }

    /// All pieces of `color`, row-major from a1
    pub fn get_pieces(&self, color: PieceColor) -> Vec<(Position, Piece)> {
        self.occupied()
            .filter(|(_, piece)| piece.color == color)
            .collect()
    }

    /// Every occupied square, row-major from a1
    pub fn occupied(&self) -> impl Iterator<Item = (Position, Piece)> + '_ {
        Position::all().filter_map(move |pos| self.get_piece(pos).map(|piece| (pos, piece)))
    }

    /// First king of `color` in row-major order
    ///
    /// Editor positions may hold zero or several kings; callers treat `None`
    /// as "no king to attack".
    pub fn find_king(&self, color: PieceColor) -> Option<Position> {
        self.occupied()
            .find(|(_, piece)| piece.is(color, PieceKind::King))
            .map(|(pos, _)| pos)
    }

    /// Rows as nested arrays, row 0 first
    pub fn to_rows(&self) -> [[Option<Piece>; SIZE]; SIZE] {
        self.grid
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in (0..SIZE).rev() {
            write!(f, "{} ", row + 1)?;
            for col in 0..SIZE {
                match self.grid[row][col] {
                    None => write!(f, " . ")?,
                    Some(piece) => {
                        let letter = match piece.color {
                            PieceColor::White => piece.kind.letter(),
                            PieceColor::Black => piece.kind.letter().to_ascii_lowercase(),
                        };
                        write!(f, " {letter} ")?
                    }
                }
            }
            writeln!(f)?;
        }
        write!(f, "  ")?;
        for col in 0..SIZE as u8 {
            write!(f, " {} ", (b'a' + col) as char)?;
        }
        Ok(())
    }
}
