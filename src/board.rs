//! # Board Coordinates and Piece Glyphs
//!
//! Grid coordinates for the 8x8 board as the renderer sees it (row 0 is the
//! top of the screen, i.e. rank 8), conversions to and from algebraic
//! notation and `shakmaty::Square`, and the fixed piece-to-glyph table used
//! for display.

use shakmaty::{Color, File, Piece, Rank, Role, Square};

/// A cell on the displayed board.
///
/// Row 0 / column 0 is the top-left corner (square a8); row 7 / column 7 is
/// the bottom-right corner (square h1). Both components are always in 0..=7.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Coord {
    pub row: u8,
    pub col: u8,
}

impl Coord {
    /// Creates a coordinate. Panics if either component is outside 0..=7.
    pub fn new(row: u8, col: u8) -> Self {
        assert!(row < 8 && col < 8, "coordinate ({row}, {col}) out of range");
        Self { row, col }
    }

    /// Parses algebraic notation ("a8" is (0, 0), "h1" is (7, 7)).
    pub fn from_algebraic(s: &str) -> Option<Self> {
        let mut chars = s.chars();
        let file = chars.next()?;
        let rank = chars.next()?;
        if chars.next().is_some() {
            return None;
        }
        if !('a'..='h').contains(&file) || !('1'..='8').contains(&rank) {
            return None;
        }
        let col = file as u8 - b'a';
        let row = 8 - (rank as u8 - b'0');
        Some(Self { row, col })
    }

    /// Renders this coordinate in algebraic notation.
    pub fn algebraic(&self) -> String {
        format!("{}{}", (b'a' + self.col) as char, 8 - self.row)
    }

    pub fn square(&self) -> Square {
        Square::from_coords(
            File::new(u32::from(self.col)),
            Rank::new(u32::from(7 - self.row)),
        )
    }

    pub fn from_square(square: Square) -> Self {
        Self {
            row: (7 - u32::from(square.rank())) as u8,
            col: u32::from(square.file()) as u8,
        }
    }
}

/// Unicode glyph for a piece (12 entries: 6 roles x 2 colors).
pub fn piece_glyph(piece: Piece) -> char {
    match (piece.color, piece.role) {
        (Color::White, Role::Pawn) => '♙',
        (Color::White, Role::Knight) => '♘',
        (Color::White, Role::Bishop) => '♗',
        (Color::White, Role::Rook) => '♖',
        (Color::White, Role::Queen) => '♕',
        (Color::White, Role::King) => '♔',
        (Color::Black, Role::Pawn) => '♟',
        (Color::Black, Role::Knight) => '♞',
        (Color::Black, Role::Bishop) => '♝',
        (Color::Black, Role::Rook) => '♜',
        (Color::Black, Role::Queen) => '♛',
        (Color::Black, Role::King) => '♚',
    }
}

/// Display name for a side ("White" / "Black").
pub fn color_name(color: Color) -> &'static str {
    match color {
        Color::White => "White",
        Color::Black => "Black",
    }
}
