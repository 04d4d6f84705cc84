//! Errors surfaced to clients.
//!
//! Every rejection a client can trigger is a `GameError` variant whose
//! `Display` text is exactly the message carried by the `error` response.
//! Rejected requests never mutate session state.

use thiserror::Error;

/// The request a rejection belongs to. Used as the message prefix.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Operation {
    Connect,
    Start,
    State,
    Move,
    Leave,
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Operation::Connect => "Room connect",
            Operation::Start => "Room start",
            Operation::State => "Get state",
            Operation::Move => "Move",
            Operation::Leave => "Room leave",
        };
        f.write_str(label)
    }
}

/// Coarse classification of a `GameError`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    /// The request was well-formed but not allowed in the current state.
    Validation,
    /// A room or participant lookup came up empty.
    NotFound,
}

/// A rejected request.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum GameError {
    #[error("{0}: invalid room code")]
    InvalidRoomCode(Operation),

    #[error("Room connect: room full")]
    RoomFull,

    #[error("Room connect: already joined")]
    AlreadyJoined,

    #[error("Room start: room empty")]
    RoomEmpty,

    #[error("Room leave: not in room")]
    NotInRoom,

    #[error("Move: not in a valid game")]
    NotInGame,

    #[error("Move: not your turn")]
    NotYourTurn,

    #[error("Move: invalid piece")]
    InvalidPiece,

    #[error("Move: invalid move")]
    InvalidMove,

    #[error("Invalid position ({x}, {y}) for piece")]
    InvalidCoordinate { x: i64, y: i64 },
}

impl GameError {
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            GameError::InvalidRoomCode(_) | GameError::NotInGame | GameError::NotInRoom => {
                ErrorKind::NotFound
            }
            _ => ErrorKind::Validation,
        }
    }
}
