//! Board coordinates.
//!
//! Squares are addressed as `(x, y)` with both axes in `0..8`. On the wire a
//! coordinate is the two-element array `[x, y]`; out-of-range values are
//! rejected when deserializing, so a `Coord` is always on the board.

use serde::{Deserialize, Serialize};

use crate::error::GameError;

/// Side length of the board.
pub const BOARD_SIZE: u8 = 8;

/// File letters used in narration (`x` index to letter).
const FILES: &[u8; 8] = b"abcdefgh";

/// An on-board square.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "[i64; 2]", into = "[u8; 2]")]
pub struct Coord {
    pub x: u8,
    pub y: u8,
}

impl Coord {
    /// Create a coordinate, rejecting anything off the board.
    pub fn new(x: i64, y: i64) -> Result<Self, GameError> {
        if Self::in_bounds(x, y) {
            Ok(Self { x: x as u8, y: y as u8 })
        } else {
            Err(GameError::InvalidCoordinate { x, y })
        }
    }

    /// Check whether `(x, y)` lies on the board.
    #[must_use]
    pub fn in_bounds(x: i64, y: i64) -> bool {
        (0..BOARD_SIZE as i64).contains(&x) && (0..BOARD_SIZE as i64).contains(&y)
    }

    /// The square `(dx, dy)` away, if it is on the board.
    #[must_use]
    pub fn offset(self, dx: i8, dy: i8) -> Option<Self> {
        Self::new(self.x as i64 + dx as i64, self.y as i64 + dy as i64).ok()
    }

    /// Algebraic label such as `a1` or `h8`.
    #[must_use]
    pub fn label(self) -> String {
        format!("{}{}", FILES[self.x as usize] as char, self.y + 1)
    }
}

impl TryFrom<[i64; 2]> for Coord {
    type Error = GameError;

    fn try_from([x, y]: [i64; 2]) -> Result<Self, Self::Error> {
        Coord::new(x, y)
    }
}

impl From<Coord> for [u8; 2] {
    fn from(c: Coord) -> Self {
        [c.x, c.y]
    }
}

impl std::fmt::Display for Coord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.label())
    }
}
