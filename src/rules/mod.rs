//! Checkers rules: the derived board and move generation.
//!
//! Both are pure functions of session data. Nothing here mutates a
//! session; applying a move is the controller's job.

mod board;
mod movegen;

pub use board::{derive_board, Board};
pub use movegen::{all_legal_moves, legal_moves, legal_moves_on_board, Move};
