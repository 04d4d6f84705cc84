//! Move generation under mandatory-capture rules.
//!
//! ## Algorithm
//!
//! 1. Captures are searched first with a backtracking walk over a scratch
//!    board: each jump is made in place (origin and jumped square cleared,
//!    mover relocated), explored recursively, then unmade so sibling
//!    branches see the original position. A branch ends when no further
//!    jump exists or when the jump crowned the piece.
//! 2. If any capture exists, only captures are legal for that piece.
//! 3. Otherwise each open diagonal neighbor is a simple move.
//!
//! Men move along their color's forward row direction; kings move both
//! ways. Enumeration order follows the direction order (row direction
//! first, then column direction) and carries no meaning.

use serde::{Deserialize, Serialize};
use smallvec::{smallvec, SmallVec};

use super::board::Board;
use crate::core::{Color, Coord, Participant, Piece, Session};

/// A candidate move for one piece.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Move {
    /// Squares visited, origin first, destination last.
    pub path: SmallVec<[Coord; 4]>,

    /// Squares of the pieces jumped, one per step of `path`.
    #[serde(default, skip_serializing_if = "SmallVec::is_empty")]
    pub captures: SmallVec<[Coord; 3]>,

    /// The move crowns the piece.
    pub king: bool,

    /// Mover's color.
    pub color: Color,
}

impl Move {
    #[must_use]
    pub fn origin(&self) -> Coord {
        self.path[0]
    }

    #[must_use]
    pub fn destination(&self) -> Coord {
        self.path[self.path.len() - 1]
    }

    #[must_use]
    pub fn capture_count(&self) -> usize {
        self.captures.len()
    }

    #[must_use]
    pub fn is_capture(&self) -> bool {
        !self.captures.is_empty()
    }

    /// Whether this move goes from `origin` to `destination`.
    #[must_use]
    pub fn connects(&self, origin: Coord, destination: Coord) -> bool {
        self.origin() == origin && self.destination() == destination
    }
}

/// Diagonal steps a piece may take, row direction outermost.
fn directions(piece: &Piece) -> SmallVec<[(i8, i8); 4]> {
    let forward = piece.color.forward();
    let rows: SmallVec<[i8; 2]> = if piece.king {
        smallvec![-forward, forward]
    } else {
        smallvec![forward]
    };

    let mut dirs = SmallVec::new();
    for &dy in &rows {
        for dx in [-forward, forward] {
            dirs.push((dx, dy));
        }
    }
    dirs
}

fn crowns(piece: &Piece, pos: Coord) -> bool {
    !piece.king && pos.y == piece.color.far_rank()
}

/// Legal moves for `piece` in `session`.
#[must_use]
pub fn legal_moves(session: &Session, piece: &Piece) -> Vec<Move> {
    let mut board = Board::from_session(session);
    legal_moves_on_board(&mut board, piece)
}

/// Legal moves for `piece` on `board`.
///
/// The board is used as scratch space during the capture search and is
/// returned to its exact prior state.
pub fn legal_moves_on_board(board: &mut Board, piece: &Piece) -> Vec<Move> {
    let captures = capture_moves(board, piece);
    if !captures.is_empty() {
        return captures;
    }
    simple_moves(board, piece)
}

/// Legal moves for every piece `participant` owns, in piece order.
#[must_use]
pub fn all_legal_moves(session: &Session, participant: &Participant) -> Vec<Move> {
    let mut board = Board::from_session(session);
    participant
        .pieces
        .iter()
        .flat_map(|piece| legal_moves_on_board(&mut board, piece))
        .collect()
}

fn simple_moves(board: &Board, piece: &Piece) -> Vec<Move> {
    let origin = piece.pos();
    directions(piece)
        .into_iter()
        .filter_map(|(dx, dy)| origin.offset(dx, dy))
        .filter(|&to| board.is_empty_at(to))
        .map(|to| Move {
            path: smallvec![origin, to],
            captures: SmallVec::new(),
            king: crowns(piece, to),
            color: piece.color,
        })
        .collect()
}

fn capture_moves(board: &mut Board, piece: &Piece) -> Vec<Move> {
    let mut search = CaptureSearch {
        board,
        piece,
        dirs: directions(piece),
        path: smallvec![piece.pos()],
        captures: SmallVec::new(),
        moves: Vec::new(),
    };
    search.extend();
    search.moves
}

/// Depth-first jump search with make/unmake on a borrowed board.
struct CaptureSearch<'a> {
    board: &'a mut Board,
    piece: &'a Piece,
    dirs: SmallVec<[(i8, i8); 4]>,
    path: SmallVec<[Coord; 8]>,
    captures: SmallVec<[Coord; 8]>,
    moves: Vec<Move>,
}

impl CaptureSearch<'_> {
    /// Explore every jump from the end of the current path. Returns whether
    /// at least one jump was available.
    fn extend(&mut self) -> bool {
        let from = self.path[self.path.len() - 1];
        let mut found = false;

        for i in 0..self.dirs.len() {
            let (dx, dy) = self.dirs[i];
            let Some(over) = from.offset(dx, dy) else { continue };
            let Some(land) = over.offset(dx, dy) else { continue };

            let jumped = match self.board.get(over) {
                Some(p) if p.color != self.piece.color => *p,
                _ => continue,
            };
            if !self.board.is_empty_at(land) {
                continue;
            }

            found = true;
            let crowned = crowns(self.piece, land);

            // make
            let mover = self.board.take(from);
            self.board.take(over);
            let mut landed = Piece::at(land, self.piece.color);
            landed.king = self.piece.king || crowned;
            self.board.place(landed);
            self.path.push(land);
            self.captures.push(over);

            // A crowning jump ends the turn.
            if crowned || !self.extend() {
                self.moves.push(Move {
                    path: self.path.iter().copied().collect(),
                    captures: self.captures.iter().copied().collect(),
                    king: crowned,
                    color: self.piece.color,
                });
            }

            // unmake
            self.path.pop();
            self.captures.pop();
            self.board.take(land);
            self.board.set(over, Some(jumped));
            self.board.set(from, mover);
        }

        found
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn c(x: u8, y: u8) -> Coord {
        Coord { x, y }
    }

    fn light(x: u8, y: u8) -> Piece {
        Piece::at(c(x, y), Color::Light)
    }

    fn dark(x: u8, y: u8) -> Piece {
        Piece::at(c(x, y), Color::Dark)
    }

    #[test]
    fn test_opening_man_has_two_moves() {
        let piece = light(2, 2);
        let mut board = Board::from_pieces(&[piece]);
        let moves = legal_moves_on_board(&mut board, &piece);

        assert_eq!(moves.len(), 2);
        assert!(moves.iter().all(|m| !m.is_capture() && !m.king));
        let dests: Vec<_> = moves.iter().map(Move::destination).collect();
        assert!(dests.contains(&c(1, 3)));
        assert!(dests.contains(&c(3, 3)));
    }

    #[test]
    fn test_dark_moves_down() {
        let piece = dark(3, 5);
        let mut board = Board::from_pieces(&[piece]);
        let moves = legal_moves_on_board(&mut board, &piece);

        assert_eq!(moves.len(), 2);
        assert!(moves.iter().all(|m| m.destination().y == 4));
    }

    #[test]
    fn test_edge_and_blocked() {
        let piece = light(0, 2);
        let mut board = Board::from_pieces(&[piece, light(1, 3)]);
        assert!(legal_moves_on_board(&mut board, &piece).is_empty());
    }

    #[test]
    fn test_simple_move_crowns_on_far_rank() {
        let piece = light(4, 6);
        let mut board = Board::from_pieces(&[piece]);
        let moves = legal_moves_on_board(&mut board, &piece);
        assert_eq!(moves.len(), 2);
        assert!(moves.iter().all(|m| m.king));

        let king = light(4, 6).crowned();
        let mut board = Board::from_pieces(&[king]);
        let moves = legal_moves_on_board(&mut board, &king);
        assert_eq!(moves.len(), 4);
        assert!(moves.iter().all(|m| !m.king));
    }

    #[test]
    fn test_single_capture() {
        let attacker = light(2, 2);
        let mut board = Board::from_pieces(&[attacker, dark(3, 3)]);
        let moves = legal_moves_on_board(&mut board, &attacker);

        assert_eq!(moves.len(), 1);
        assert_eq!(moves[0].path.as_slice(), &[c(2, 2), c(4, 4)]);
        assert_eq!(moves[0].captures.as_slice(), &[c(3, 3)]);
        assert!(!moves[0].king);
    }

    #[test]
    fn test_capture_blocked_by_occupied_landing() {
        let attacker = light(2, 2);
        let mut board = Board::from_pieces(&[attacker, dark(3, 3), dark(4, 4)]);
        let moves = legal_moves_on_board(&mut board, &attacker);
        assert!(moves.iter().all(|m| !m.is_capture()));
        assert_eq!(moves.len(), 1);
        assert_eq!(moves[0].destination(), c(1, 3));
    }

    #[test]
    fn test_no_capture_of_own_piece() {
        let attacker = light(2, 2);
        let mut board = Board::from_pieces(&[attacker, light(3, 3)]);
        let moves = legal_moves_on_board(&mut board, &attacker);
        assert!(moves.iter().all(|m| !m.is_capture()));
    }

    #[test]
    fn test_double_jump_chains() {
        let attacker = light(0, 0);
        let mut board = Board::from_pieces(&[attacker, dark(1, 1), dark(3, 3)]);
        let moves = legal_moves_on_board(&mut board, &attacker);

        assert_eq!(moves.len(), 1);
        assert_eq!(moves[0].path.as_slice(), &[c(0, 0), c(2, 2), c(4, 4)]);
        assert_eq!(moves[0].captures.as_slice(), &[c(1, 1), c(3, 3)]);
    }

    #[test]
    fn test_branching_jumps() {
        // From (2,2) over (3,3) to (4,4), then either (5,5)->(6,6) or (3,5)->(2,6)
        let attacker = light(2, 2);
        let mut board =
            Board::from_pieces(&[attacker, dark(3, 3), dark(5, 5), dark(3, 5)]);
        let moves = legal_moves_on_board(&mut board, &attacker);

        assert_eq!(moves.len(), 2);
        let dests: Vec<_> = moves.iter().map(Move::destination).collect();
        assert!(dests.contains(&c(6, 6)));
        assert!(dests.contains(&c(2, 6)));
        assert!(moves.iter().all(|m| m.capture_count() == 2));
    }

    #[test]
    fn test_crowning_stops_chain() {
        // Jump to row 7 crowns; a further (backward, king-only) jump is not taken.
        let attacker = light(2, 5);
        let mut board = Board::from_pieces(&[attacker, dark(3, 6), dark(5, 6)]);
        let moves = legal_moves_on_board(&mut board, &attacker);

        assert_eq!(moves.len(), 1);
        assert_eq!(moves[0].path.as_slice(), &[c(2, 5), c(4, 7)]);
        assert!(moves[0].king);
        assert_eq!(moves[0].capture_count(), 1);
    }

    #[test]
    fn test_king_captures_both_ways() {
        let king = light(3, 3).crowned();
        let mut board = Board::from_pieces(&[king, dark(4, 4), dark(2, 2)]);
        let moves = legal_moves_on_board(&mut board, &king);

        let dests: Vec<_> = moves.iter().map(Move::destination).collect();
        assert!(dests.contains(&c(5, 5)));
        assert!(dests.contains(&c(1, 1)));
        assert!(moves.iter().all(|m| m.is_capture() && !m.king));
    }

    #[test]
    fn test_man_cannot_capture_backwards() {
        let man = light(3, 3);
        let mut board = Board::from_pieces(&[man, dark(2, 2)]);
        let moves = legal_moves_on_board(&mut board, &man);
        assert!(moves.iter().all(|m| !m.is_capture()));
    }

    #[test]
    fn test_board_restored_after_search() {
        let attacker = light(2, 2);
        let mut board =
            Board::from_pieces(&[attacker, dark(3, 3), dark(5, 5), dark(3, 5), dark(1, 3)]);
        let before = board.clone();
        let _ = legal_moves_on_board(&mut board, &attacker);
        assert_eq!(board, before);
    }

    #[test]
    fn test_move_serialization() {
        let attacker = light(2, 2);
        let mut board = Board::from_pieces(&[attacker, dark(3, 3)]);
        let moves = legal_moves_on_board(&mut board, &attacker);
        let json = serde_json::to_string(&moves[0]).unwrap();
        assert_eq!(json, r#"{"path":[[2,2],[4,4]],"captures":[[3,3]],"king":false,"color":"light"}"#);

        let piece = light(0, 0);
        let simple = legal_moves_on_board(&mut Board::from_pieces(&[piece]), &piece);
        let json = serde_json::to_string(&simple[0]).unwrap();
        assert!(!json.contains("captures"));
    }
}
