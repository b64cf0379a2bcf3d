//! Type definitions for chess game logic
//!
//! Provides the value types every other module speaks in: board squares,
//! piece colors and kinds, and the `(color, kind)` piece value.
//!
//! All of these are small `Copy` values compared by value. A [`Position`]
//! can only be built through a checked constructor, so any `Position` that
//! exists is guaranteed to lie on the 6x6 board.

use super::error::{GameError, GameResult};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of ranks and files on the board
pub const BOARD_SIZE: u8 = 6;

/// Board square position (row, col)
///
/// Row 0 is rank 1 (white's back rank), row 5 is rank 6 (black's back rank).
/// Col 0 is file 'a', col 5 is file 'f'.
///
/// Serialises as `{"row": r, "col": c}`; deserialising an out-of-range pair
/// fails the same way [`Position::new`] does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "RawPosition", into = "RawPosition")]
pub struct Position {
    row: u8,
    col: u8,
}

/// Wire form of a [`Position`], wide enough to carry out-of-range input
#[derive(Clone, Copy, Serialize, Deserialize)]
struct RawPosition {
    row: i32,
    col: i32,
}

impl From<Position> for RawPosition {
    fn from(pos: Position) -> Self {
        RawPosition {
            row: pos.row as i32,
            col: pos.col as i32,
        }
    }
}

impl TryFrom<RawPosition> for Position {
    type Error = GameError;

    fn try_from(raw: RawPosition) -> GameResult<Self> {
        Position::new(raw.row, raw.col)
    }
}

impl Position {
    /// Create a square from row and column indices
    ///
    /// # Errors
    ///
    /// Returns [`GameError::InvalidPosition`] unless both indices are in `0..=5`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use sixchess::game::types::Position;
    ///
    /// let e2 = Position::new(1, 4).unwrap();
    /// assert_eq!(e2.to_algebraic(), "e2");
    /// assert!(Position::new(6, 0).is_err());
    /// ```
    pub fn new(row: i32, col: i32) -> GameResult<Self> {
        let size = BOARD_SIZE as i32;
        if (0..size).contains(&row) && (0..size).contains(&col) {
            Ok(Position {
                row: row as u8,
                col: col as u8,
            })
        } else {
            Err(GameError::InvalidPosition { row, col })
        }
    }

    pub fn row(self) -> u8 {
        self.row
    }

    pub fn col(self) -> u8 {
        self.col
    }

    /// Square reached by stepping `(row_delta, col_delta)`, or `None` off the board
    pub fn offset(self, row_delta: i8, col_delta: i8) -> Option<Self> {
        Position::new(
            self.row as i32 + row_delta as i32,
            self.col as i32 + col_delta as i32,
        )
        .ok()
    }

    /// Iterate all 36 squares in row-major order (a1, b1, ..., f6)
    pub fn all() -> impl Iterator<Item = Position> {
        (0..BOARD_SIZE).flat_map(|row| (0..BOARD_SIZE).map(move |col| Position { row, col }))
    }

    /// Algebraic notation, e.g. `"e1"` or `"a6"`
    pub fn to_algebraic(self) -> String {
        format!("{}{}", self.file_char(), self.row + 1)
    }

    /// File letter `'a'..='f'`
    pub fn file_char(self) -> char {
        (b'a' + self.col) as char
    }

    /// Parse algebraic notation (`"a1"`..`"f6"`)
    ///
    /// # Errors
    ///
    /// Returns [`GameError::InvalidNotation`] for anything that is not exactly
    /// a file letter followed by a rank digit on this board.
    pub fn from_algebraic(notation: &str) -> GameResult<Self> {
        let invalid = || GameError::InvalidNotation {
            notation: notation.to_string(),
        };

        let mut chars = notation.chars();
        let (Some(file), Some(rank), None) = (chars.next(), chars.next(), chars.next()) else {
            return Err(invalid());
        };
        if !file.is_ascii_lowercase() {
            return Err(invalid());
        }
        let rank = rank.to_digit(10).ok_or_else(invalid)? as i32;
        let col = file as i32 - 'a' as i32;

        Position::new(rank - 1, col).map_err(|_| invalid())
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_algebraic())
    }
}

/// Side a piece belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PieceColor {
    White,
    Black,
}

impl PieceColor {
    pub fn opposite(self) -> PieceColor {
        match self {
            PieceColor::White => PieceColor::Black,
            PieceColor::Black => PieceColor::White,
        }
    }

    /// Row delta a pawn of this color advances by
    pub fn pawn_direction(self) -> i8 {
        match self {
            PieceColor::White => 1,
            PieceColor::Black => -1,
        }
    }

    /// Row this color's pawns start on
    pub fn pawn_start_row(self) -> u8 {
        match self {
            PieceColor::White => 1,
            PieceColor::Black => BOARD_SIZE - 2,
        }
    }

    /// Row this color's pawns promote on
    pub fn promotion_row(self) -> u8 {
        match self {
            PieceColor::White => BOARD_SIZE - 1,
            PieceColor::Black => 0,
        }
    }

    /// Row holding this color's king and rooks at the start
    pub fn back_row(self) -> u8 {
        match self {
            PieceColor::White => 0,
            PieceColor::Black => BOARD_SIZE - 1,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            PieceColor::White => "WHITE",
            PieceColor::Black => "BLACK",
        }
    }
}

impl fmt::Display for PieceColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Kind of chess piece
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PieceKind {
    King,
    Queen,
    Rook,
    Bishop,
    Knight,
    Pawn,
}

impl PieceKind {
    /// Kinds a pawn may promote to
    pub const PROMOTION_TARGETS: [PieceKind; 4] = [
        PieceKind::Queen,
        PieceKind::Rook,
        PieceKind::Bishop,
        PieceKind::Knight,
    ];

    pub fn is_promotion_target(self) -> bool {
        Self::PROMOTION_TARGETS.contains(&self)
    }

    /// `self` as a pawn promotion target
    ///
    /// # Errors
    ///
    /// Returns [`GameError::InvalidPromotion`] for kings and pawns.
    pub fn as_promotion(self) -> GameResult<Self> {
        if self.is_promotion_target() {
            Ok(self)
        } else {
            Err(GameError::InvalidPromotion { kind: self })
        }
    }

    /// Letter used in move notation
    pub fn letter(self) -> char {
        match self {
            PieceKind::King => 'K',
            PieceKind::Queen => 'Q',
            PieceKind::Rook => 'R',
            PieceKind::Bishop => 'B',
            PieceKind::Knight => 'N',
            PieceKind::Pawn => 'P',
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            PieceKind::King => "KING",
            PieceKind::Queen => "QUEEN",
            PieceKind::Rook => "ROOK",
            PieceKind::Bishop => "BISHOP",
            PieceKind::Knight => "KNIGHT",
            PieceKind::Pawn => "PAWN",
        }
    }
}

impl fmt::Display for PieceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A piece on the board
///
/// Two pieces are equal when color and kind match; there is no identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Piece {
    pub color: PieceColor,
    #[serde(rename = "type")]
    pub kind: PieceKind,
}

impl Piece {
    pub const fn new(color: PieceColor, kind: PieceKind) -> Self {
        Piece { color, kind }
    }

    pub fn is(self, color: PieceColor, kind: PieceKind) -> bool {
        self.color == color && self.kind == kind
    }
}

impl fmt::Display for Piece {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}", self.color, self.kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_rejects_out_of_range() {
        assert!(Position::new(-1, 0).is_err(), "Negative row must fail");
        assert!(Position::new(6, 0).is_err(), "Row 6 is off the board");
        assert!(Position::new(0, -1).is_err(), "Negative col must fail");
        assert!(Position::new(0, 6).is_err(), "Col 6 is off the board");
        assert_eq!(
            Position::new(7, 2),
            Err(GameError::InvalidPosition { row: 7, col: 2 })
        );
    }

    #[test]
    fn test_algebraic_round_trip_all_squares() {
        for pos in Position::all() {
            let notation = pos.to_algebraic();
            assert_eq!(
                Position::from_algebraic(&notation),
                Ok(pos),
                "{notation} should parse back to the same square"
            );
        }
        assert_eq!(Position::all().count(), 36);
    }

    #[test]
    fn test_algebraic_known_squares() {
        assert_eq!(Position::new(0, 0).unwrap().to_algebraic(), "a1");
        assert_eq!(Position::new(5, 5).unwrap().to_algebraic(), "f6");
        assert_eq!(
            Position::from_algebraic("e2").unwrap(),
            Position::new(1, 4).unwrap()
        );
    }

    #[test]
    fn test_algebraic_rejects_garbage() {
        for bad in ["", "e", "g1", "a7", "a0", "e22", "E2", "11"] {
            assert!(
                Position::from_algebraic(bad).is_err(),
                "{bad:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_position_offset_stays_on_board() {
        let corner = Position::new(0, 0).unwrap();
        assert_eq!(corner.offset(-1, 0), None);
        assert_eq!(corner.offset(1, 1), Position::new(1, 1).ok());
    }

    #[test]
    fn test_position_deserialize_validates() {
        let ok: Position = serde_json::from_str(r#"{"row":2,"col":3}"#).unwrap();
        assert_eq!(ok, Position::new(2, 3).unwrap());
        assert!(serde_json::from_str::<Position>(r#"{"row":6,"col":3}"#).is_err());
    }

    #[test]
    fn test_color_opposite_is_involution() {
        assert_eq!(PieceColor::White.opposite(), PieceColor::Black);
        assert_eq!(PieceColor::Black.opposite().opposite(), PieceColor::Black);
    }

    #[test]
    fn test_piece_serializes_with_type_field() {
        let json = serde_json::to_string(&Piece::new(PieceColor::White, PieceKind::Knight)).unwrap();
        assert_eq!(json, r#"{"color":"WHITE","type":"KNIGHT"}"#);
    }
}
