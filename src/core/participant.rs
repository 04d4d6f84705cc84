//! Participant identification and per-participant data.
//!
//! ## ParticipantId
//!
//! Opaque identifier. Humans carry their connection id; bots carry a
//! synthetic `bot-` prefixed id.
//!
//! ## Participant
//!
//! A player slot in a session. Humans and bots share the same fields and
//! differ only in `kind`, which the controller dispatches on.

use serde::{Deserialize, Serialize};

use super::color::Color;
use super::coord::Coord;
use super::piece::Piece;

/// Prefix of every bot participant id.
pub const BOT_ID_PREFIX: &str = "bot-";

/// Opaque participant identifier.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParticipantId(pub String);

impl ParticipantId {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ParticipantId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ParticipantId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Who drives a participant.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParticipantKind {
    Human,
    Bot,
}

/// A player slot.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant {
    pub id: ParticipantId,
    pub name: String,
    pub color: Color,
    pub kind: ParticipantKind,
    pub pieces: Vec<Piece>,

    /// The connection dropped mid-game. The seat is kept but no longer
    /// counts as a human present in the room.
    #[serde(skip)]
    pub disconnected: bool,
}

impl Participant {
    /// A human participant with no pieces yet.
    #[must_use]
    pub fn human(id: ParticipantId, color: Color, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            color,
            kind: ParticipantKind::Human,
            pieces: Vec::new(),
            disconnected: false,
        }
    }

    /// A bot participant. `suffix` is the random part of its id.
    #[must_use]
    pub fn bot(suffix: &str, color: Color, name: impl Into<String>) -> Self {
        Self {
            id: ParticipantId(format!("{BOT_ID_PREFIX}{suffix}")),
            name: name.into(),
            color,
            kind: ParticipantKind::Bot,
            pieces: Vec::new(),
            disconnected: false,
        }
    }

    /// True for participants whose moves the server makes.
    #[must_use]
    pub fn is_automated(&self) -> bool {
        self.kind == ParticipantKind::Bot
    }

    /// Place this participant's pieces on its color's starting squares.
    pub fn deal(&mut self) {
        let color = self.color;
        self.pieces = color
            .starting_layout()
            .into_iter()
            .map(|pos| Piece::at(pos, color))
            .collect();
    }

    /// The piece at `pos`, if this participant owns one there.
    #[must_use]
    pub fn piece_at(&self, pos: Coord) -> Option<&Piece> {
        self.pieces.iter().find(|p| p.pos() == pos)
    }

    pub fn piece_at_mut(&mut self, pos: Coord) -> Option<&mut Piece> {
        self.pieces.iter_mut().find(|p| p.pos() == pos)
    }

    /// Remove and return the piece at `pos`.
    pub fn remove_piece_at(&mut self, pos: Coord) -> Option<Piece> {
        let index = self.pieces.iter().position(|p| p.pos() == pos)?;
        Some(self.pieces.remove(index))
    }
}
