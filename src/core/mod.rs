//! Core game types: coordinates, colors, pieces, participants, sessions,
//! RNG, configuration.
//!
//! Everything here is plain data. Rules live in `rules`, lifecycle in
//! `controller`.

pub mod coord;
pub mod color;
pub mod piece;
pub mod participant;
pub mod session;
pub mod rng;
pub mod config;

pub use coord::{Coord, BOARD_SIZE};
pub use color::{Color, PIECES_PER_SIDE};
pub use piece::Piece;
pub use participant::{Participant, ParticipantId, ParticipantKind, BOT_ID_PREFIX};
pub use session::{RoomCode, Session, Stage, MAX_PARTICIPANTS};
pub use rng::GameRng;
pub use config::GameConfig;
