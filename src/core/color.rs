//! Side colors and the per-color geometry: forward direction, far rank and
//! starting layout.
//!
//! ```text
//!   ┌───┬───┬───┬───┬───┬───┬───┬───┐
//! 7 │   │ d │   │ d │   │ d │   │ d │
//!   ├───┼───┼───┼───┼───┼───┼───┼───┤
//! 6 │ d │   │ d │   │ d │   │ d │   │
//!   ├───┼───┼───┼───┼───┼───┼───┼───┤
//! 5 │   │ d │   │ d │   │ d │   │ d │
//!   ├───┼───┼───┼───┼───┼───┼───┼───┤
//! 4 │   │   │   │   │   │   │   │   │
//!   ├───┼───┼───┼───┼───┼───┼───┼───┤
//! 3 │   │   │   │   │   │   │   │   │
//!   ├───┼───┼───┼───┼───┼───┼───┼───┤
//! 2 │ l │   │ l │   │ l │   │ l │   │
//!   ├───┼───┼───┼───┼───┼───┼───┼───┤
//! 1 │   │ l │   │ l │   │ l │   │ l │
//!   ├───┼───┼───┼───┼───┼───┼───┼───┤
//! 0 │ l │   │ l │   │ l │   │ l │   │
//!   └───┴───┴───┴───┴───┴───┴───┴───┘
//!     0   1   2   3   4   5   6   7
//! ```

use serde::{Deserialize, Serialize};

use super::coord::{Coord, BOARD_SIZE};

/// Pieces each side starts with.
pub const PIECES_PER_SIDE: usize = 12;

/// One of the two sides.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Color {
    /// Starts on rows 0-2, moves toward increasing `y`, moves first.
    Light,
    /// Starts on rows 5-7, moves toward decreasing `y`.
    Dark,
}

impl Color {
    /// The side that makes the first move of a game.
    pub const FIRST_MOVER: Color = Color::Light;

    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Color::Light => Color::Dark,
            Color::Dark => Color::Light,
        }
    }

    /// Row direction a man of this color moves in.
    #[must_use]
    pub const fn forward(self) -> i8 {
        match self {
            Color::Light => 1,
            Color::Dark => -1,
        }
    }

    /// Row on which a man of this color is crowned.
    #[must_use]
    pub const fn far_rank(self) -> u8 {
        match self {
            Color::Light => BOARD_SIZE - 1,
            Color::Dark => 0,
        }
    }

    /// The twelve starting squares for this color. Dark mirrors light
    /// through the board center.
    #[must_use]
    pub fn starting_layout(self) -> [Coord; PIECES_PER_SIDE] {
        std::array::from_fn(|i| {
            let x = (i * 2 / 3) as u8;
            let y = ((i * 2) % 3) as u8;
            match self {
                Color::Light => Coord { x, y },
                Color::Dark => Coord { x: 7 - x, y: 7 - y },
            }
        })
    }
}

impl std::fmt::Display for Color {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Color::Light => "light",
            Color::Dark => "dark",
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_opposite() {
        assert_eq!(Color::Light.opposite(), Color::Dark);
        assert_eq!(Color::Dark.opposite(), Color::Light);
    }

    #[test]
    fn test_light_layout() {
        let layout = Color::Light.starting_layout();
        assert_eq!(layout[0], Coord { x: 0, y: 0 });
        assert_eq!(layout[1], Coord { x: 0, y: 2 });
        assert_eq!(layout[2], Coord { x: 1, y: 1 });
        assert_eq!(layout[11], Coord { x: 7, y: 1 });
        // All on dark squares, rows 0-2, distinct
        for c in layout {
            assert!(c.y <= 2);
            assert_eq!((c.x + c.y) % 2, 0);
        }
        let mut sorted = layout.to_vec();
        sorted.sort();
        sorted.dedup();
        assert_eq!(sorted.len(), PIECES_PER_SIDE);
    }

    #[test]
    fn test_dark_layout_mirrors_light() {
        let light = Color::Light.starting_layout();
        let dark = Color::Dark.starting_layout();
        for (l, d) in light.iter().zip(dark.iter()) {
            assert_eq!(d.x, 7 - l.x);
            assert_eq!(d.y, 7 - l.y);
            assert!(d.y >= 5);
        }
    }

    #[test]
    fn test_geometry() {
        assert_eq!(Color::Light.forward(), 1);
        assert_eq!(Color::Dark.forward(), -1);
        assert_eq!(Color::Light.far_rank(), 7);
        assert_eq!(Color::Dark.far_rank(), 0);
    }

    #[test]
    fn test_serialization() {
        assert_eq!(serde_json::to_string(&Color::Light).unwrap(), "\"light\"");
        let c: Color = serde_json::from_str("\"dark\"").unwrap();
        assert_eq!(c, Color::Dark);
        assert_eq!(Color::Dark.to_string(), "dark");
    }
}
