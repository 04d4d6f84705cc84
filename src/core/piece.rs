//! Pieces on the board.

use serde::{Deserialize, Serialize};

use super::color::Color;
use super::coord::Coord;
use crate::error::GameError;

/// A single man or king.
///
/// Serialized flat as `{x, y, color, king}`. The king flag only ever goes
/// from `false` to `true`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawPiece")]
pub struct Piece {
    pub x: u8,
    pub y: u8,
    pub color: Color,
    pub king: bool,
}

impl Piece {
    /// Create an uncrowned piece, rejecting off-board coordinates.
    pub fn new(x: i64, y: i64, color: Color) -> Result<Self, GameError> {
        Ok(Self::at(Coord::new(x, y)?, color))
    }

    /// Create an uncrowned piece on a known-good square.
    #[must_use]
    pub const fn at(pos: Coord, color: Color) -> Self {
        Self {
            x: pos.x,
            y: pos.y,
            color,
            king: false,
        }
    }

    /// Builder-style crowning, mostly for setting up positions.
    #[must_use]
    pub const fn crowned(mut self) -> Self {
        self.king = true;
        self
    }

    #[must_use]
    pub const fn pos(&self) -> Coord {
        Coord { x: self.x, y: self.y }
    }

    pub fn move_to(&mut self, pos: Coord) {
        self.x = pos.x;
        self.y = pos.y;
    }

    pub fn crown(&mut self) {
        self.king = true;
    }
}

#[derive(Deserialize)]
struct RawPiece {
    x: i64,
    y: i64,
    color: Color,
    #[serde(default)]
    king: bool,
}

impl TryFrom<RawPiece> for Piece {
    type Error = GameError;

    fn try_from(raw: RawPiece) -> Result<Self, Self::Error> {
        let mut piece = Piece::new(raw.x, raw.y, raw.color)?;
        piece.king = raw.king;
        Ok(piece)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_validates() {
        let p = Piece::new(2, 3, Color::Light).unwrap();
        assert_eq!(p.pos(), Coord { x: 2, y: 3 });
        assert!(!p.king);

        assert!(Piece::new(-1, 3, Color::Light).is_err());
        assert!(Piece::new(2, 8, Color::Dark).is_err());
    }

    #[test]
    fn test_move_and_crown() {
        let mut p = Piece::new(2, 6, Color::Light).unwrap();
        p.move_to(Coord { x: 3, y: 7 });
        p.crown();
        assert_eq!(p.pos(), Coord { x: 3, y: 7 });
        assert!(p.king);
    }

    #[test]
    fn test_serialization() {
        let p = Piece::new(1, 2, Color::Dark).unwrap().crowned();
        let json = serde_json::to_string(&p).unwrap();
        assert_eq!(json, r#"{"x":1,"y":2,"color":"dark","king":true}"#);
        let back: Piece = serde_json::from_str(&json).unwrap();
        assert_eq!(back, p);

        let bad = r#"{"x":9,"y":2,"color":"dark","king":false}"#;
        assert!(serde_json::from_str::<Piece>(bad).is_err());
    }
}
