//! Castling rights tracking
//!
//! Six monotonic flags: one per king, one per rook split by side. A flag is
//! set the first time that piece leaves its home square and is never
//! cleared, even if a king or rook later stands on the home square again.

use crate::game::components::Move;
use crate::game::rules::validator::{KINGSIDE_ROOK_COL, QUEENSIDE_ROOK_COL};
use crate::game::types::{PieceColor, PieceKind};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CastlingRights {
    pub white_king_moved: bool,
    pub black_king_moved: bool,
    pub white_kingside_rook_moved: bool,
    pub white_queenside_rook_moved: bool,
    pub black_kingside_rook_moved: bool,
    pub black_queenside_rook_moved: bool,
}

impl CastlingRights {
    pub fn king_moved(&self, color: PieceColor) -> bool {
        match color {
            PieceColor::White => self.white_king_moved,
            PieceColor::Black => self.black_king_moved,
        }
    }

    pub fn rook_moved(&self, color: PieceColor, kingside: bool) -> bool {
        match (color, kingside) {
            (PieceColor::White, true) => self.white_kingside_rook_moved,
            (PieceColor::White, false) => self.white_queenside_rook_moved,
            (PieceColor::Black, true) => self.black_kingside_rook_moved,
            (PieceColor::Black, false) => self.black_queenside_rook_moved,
        }
    }

    /// Rights after `mv` has been played
    pub fn after_move(mut self, mv: &Move) -> Self {
        let color = mv.piece.color;
        match mv.piece.kind {
            PieceKind::King => match color {
                PieceColor::White => self.white_king_moved = true,
                PieceColor::Black => self.black_king_moved = true,
            },
            PieceKind::Rook if mv.from.row() == color.back_row() => {
                let flag = match (color, mv.from.col()) {
                    (PieceColor::White, KINGSIDE_ROOK_COL) => &mut self.white_kingside_rook_moved,
                    (PieceColor::White, QUEENSIDE_ROOK_COL) => &mut self.white_queenside_rook_moved,
                    (PieceColor::Black, KINGSIDE_ROOK_COL) => &mut self.black_kingside_rook_moved,
                    (PieceColor::Black, QUEENSIDE_ROOK_COL) => &mut self.black_queenside_rook_moved,
                    _ => return self,
                };
                *flag = true;
            }
            _ => {}
        }
        self
    }
}
