//! Board model: an 8x8 occupancy grid derived from a session.
//!
//! The board is never stored. It is rebuilt from the participants' piece
//! lists whenever the rules need spatial lookups, so there is exactly one
//! source of truth for piece positions.

use crate::core::{Color, Coord, Piece, Session, BOARD_SIZE};

const N: usize = BOARD_SIZE as usize;

/// Grid of optional pieces, indexed by `(x, y)`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Board {
    cells: [[Option<Piece>; N]; N],
}

impl Default for Board {
    fn default() -> Self {
        Self::empty()
    }
}

impl Board {
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            cells: [[None; N]; N],
        }
    }

    /// Place every participant's pieces. Positions are trusted to be unique.
    #[must_use]
    pub fn from_session(session: &Session) -> Self {
        Self::from_pieces(session.players.iter().flat_map(|p| p.pieces.iter()))
    }

    #[must_use]
    pub fn from_pieces<'a>(pieces: impl IntoIterator<Item = &'a Piece>) -> Self {
        let mut board = Self::empty();
        for piece in pieces {
            board.place(*piece);
        }
        board
    }

    #[must_use]
    pub fn get(&self, pos: Coord) -> Option<&Piece> {
        self.cells[pos.y as usize][pos.x as usize].as_ref()
    }

    #[must_use]
    pub fn is_empty_at(&self, pos: Coord) -> bool {
        self.get(pos).is_none()
    }

    /// Replace the contents of `pos`, returning what was there.
    pub fn set(&mut self, pos: Coord, piece: Option<Piece>) -> Option<Piece> {
        std::mem::replace(&mut self.cells[pos.y as usize][pos.x as usize], piece)
    }

    /// Put `piece` on its own square.
    pub fn place(&mut self, piece: Piece) -> Option<Piece> {
        self.set(piece.pos(), Some(piece))
    }

    /// Empty `pos`, returning what was there.
    pub fn take(&mut self, pos: Coord) -> Option<Piece> {
        self.set(pos, None)
    }

    /// Iterate over all occupied squares.
    pub fn pieces(&self) -> impl Iterator<Item = &Piece> {
        self.cells.iter().flat_map(|row| row.iter().flatten())
    }
}

/// Derive the board for a session.
#[must_use]
pub fn derive_board(session: &Session) -> Board {
    Board::from_session(session)
}

impl std::fmt::Display for Board {
    /// Row 7 on top; `l`/`d` for men, `L`/`D` for kings.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "┌───┬───┬───┬───┬───┬───┬───┬───┐")?;
        for y in (0..N).rev() {
            write!(f, "│")?;
            for x in 0..N {
                let symbol = match self.cells[y][x] {
                    None => ' ',
                    Some(Piece { color: Color::Light, king: false, .. }) => 'l',
                    Some(Piece { color: Color::Light, king: true, .. }) => 'L',
                    Some(Piece { color: Color::Dark, king: false, .. }) => 'd',
                    Some(Piece { color: Color::Dark, king: true, .. }) => 'D',
                };
                write!(f, " {symbol} │")?;
            }
            writeln!(f)?;
            if y > 0 {
                writeln!(f, "├───┼───┼───┼───┼───┼───┼───┼───┤")?;
            }
        }
        write!(f, "└───┴───┴───┴───┴───┴───┴───┴───┘")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Participant, RoomCode};

    fn c(x: u8, y: u8) -> Coord {
        Coord { x, y }
    }

    #[test]
    fn test_from_session_places_all_pieces() {
        let mut session = Session::new(RoomCode::new("t"));
        let mut light = Participant::human("a".into(), Color::Light, "A");
        let mut dark = Participant::human("b".into(), Color::Dark, "B");
        light.deal();
        dark.deal();
        session.players = vec![light, dark];

        let board = derive_board(&session);
        assert_eq!(board.pieces().count(), 24);
        assert_eq!(board.get(c(0, 0)).map(|p| p.color), Some(Color::Light));
        assert_eq!(board.get(c(7, 7)).map(|p| p.color), Some(Color::Dark));
        assert!(board.is_empty_at(c(3, 3)));
    }

    #[test]
    fn test_set_and_take() {
        let mut board = Board::empty();
        let piece = Piece::at(c(2, 2), Color::Dark);
        assert_eq!(board.place(piece), None);
        assert_eq!(board.get(c(2, 2)), Some(&piece));
        assert_eq!(board.take(c(2, 2)), Some(piece));
        assert!(board.is_empty_at(c(2, 2)));
    }

    #[test]
    fn test_display() {
        let board = Board::from_pieces(&[
            Piece::at(c(0, 0), Color::Light),
            Piece::at(c(7, 7), Color::Dark).crowned(),
        ]);
        let text = board.to_string();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 17);
        assert_eq!(lines[1], "│   │   │   │   │   │   │   │ D │");
        assert_eq!(lines[15], "│ l │   │   │   │   │   │   │   │");
    }
}
