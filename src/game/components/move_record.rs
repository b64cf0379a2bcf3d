//! Move record
//!
//! A [`Move`] is a self-contained description of one ply. Replaying the
//! recorded moves of a game in order from its start board reproduces the
//! game exactly; undo in custom mode depends on this.

use crate::game::types::{Piece, PieceKind, Position};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A single ply
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Move {
    pub from: Position,
    pub to: Position,
    /// Piece as it stood on `from` (a pawn for promotions)
    pub piece: Piece,
    /// Piece standing on `to` before the move; `None` for en passant
    pub captured_piece: Option<Piece>,
    pub promotion: Option<PieceKind>,
    pub is_castling: bool,
    pub is_en_passant: bool,
}

impl Move {
    /// Plain relocation with no special flags
    pub fn new(from: Position, to: Position, piece: Piece, captured_piece: Option<Piece>) -> Self {
        Move {
            from,
            to,
            piece,
            captured_piece,
            promotion: None,
            is_castling: false,
            is_en_passant: false,
        }
    }

    /// Pawn advanced two rows
    pub fn is_pawn_double_move(&self) -> bool {
        self.piece.kind == PieceKind::Pawn && self.from.row().abs_diff(self.to.row()) == 2
    }

    pub fn is_capture(&self) -> bool {
        self.captured_piece.is_some() || self.is_en_passant
    }

    /// Short algebraic rendering: `O-O`, `exd5`, `e6=Q`, `Nxc3`
    pub fn to_algebraic(&self) -> String {
        if self.is_castling {
            return if self.to.col() > self.from.col() {
                "O-O".to_string()
            } else {
                "O-O-O".to_string()
            };
        }

        let mut notation = String::new();
        if self.piece.kind == PieceKind::Pawn {
            if self.is_capture() {
                notation.push(self.from.file_char());
                notation.push('x');
            }
            notation.push_str(&self.to.to_algebraic());
            if let Some(kind) = self.promotion {
                notation.push('=');
                notation.push(kind.letter());
            }
        } else {
            notation.push(self.piece.kind.letter());
            if self.is_capture() {
                notation.push('x');
            }
            notation.push_str(&self.to.to_algebraic());
        }
        notation
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.from, self.to)
    }
}
