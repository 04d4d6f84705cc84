//! Session (room) state.
//!
//! A session is one game instance. It is created empty in the lobby, gains
//! up to two participants, and is mutated only by the turn controller.
//!
//! `ended` and `advance_pending` are server-side bookkeeping and are not
//! part of the wire snapshot.

use serde::{Deserialize, Serialize};

use super::participant::{Participant, ParticipantId};

/// Maximum participants per session.
pub const MAX_PARTICIPANTS: usize = 2;

/// Short room code identifying a session.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoomCode(pub String);

impl RoomCode {
    #[must_use]
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for RoomCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RoomCode {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Lifecycle stage, derived from the session fields.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Stage {
    /// Zero or one participant, not started.
    Lobby,
    /// Two participants, not started.
    AwaitingStart,
    /// Started, turn loop running.
    Active,
    /// A result has been announced; the session is inert.
    Ended,
}

/// One game instance.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub id: RoomCode,

    /// Join order is preserved.
    pub players: Vec<Participant>,

    /// Index into `players` of whose turn it is.
    pub turn_index: usize,

    /// Completed turn advancements.
    pub turn_count: u32,

    pub started: bool,

    #[serde(skip)]
    pub ended: bool,

    /// A move was applied and turn advancement has not run yet.
    #[serde(skip)]
    pub advance_pending: bool,

    /// Bumped on every (re)start. Deferred game tasks carry the value they
    /// were scheduled under.
    #[serde(skip)]
    pub generation: u32,
}

impl Session {
    #[must_use]
    pub fn new(id: RoomCode) -> Self {
        Self {
            id,
            players: Vec::new(),
            turn_index: 0,
            turn_count: 0,
            started: false,
            ended: false,
            advance_pending: false,
            generation: 0,
        }
    }

    #[must_use]
    pub fn stage(&self) -> Stage {
        if self.ended {
            Stage::Ended
        } else if self.started {
            Stage::Active
        } else if self.players.len() >= MAX_PARTICIPANTS {
            Stage::AwaitingStart
        } else {
            Stage::Lobby
        }
    }

    #[must_use]
    pub fn is_full(&self) -> bool {
        self.players.len() >= MAX_PARTICIPANTS
    }

    /// Whether moves may be made: started, not ended, two participants.
    #[must_use]
    pub fn is_playable(&self) -> bool {
        self.stage() == Stage::Active && self.players.len() == MAX_PARTICIPANTS
    }

    #[must_use]
    pub fn index_of(&self, id: &ParticipantId) -> Option<usize> {
        self.players.iter().position(|p| &p.id == id)
    }

    #[must_use]
    pub fn participant(&self, id: &ParticipantId) -> Option<&Participant> {
        self.players.iter().find(|p| &p.id == id)
    }

    #[must_use]
    pub fn contains(&self, id: &ParticipantId) -> bool {
        self.index_of(id).is_some()
    }

    /// Any human participant whose connection is still up, optionally
    /// ignoring one id.
    #[must_use]
    pub fn has_connected_human(&self, excluded: Option<&ParticipantId>) -> bool {
        self.players
            .iter()
            .any(|p| !p.is_automated() && !p.disconnected && Some(&p.id) != excluded)
    }

    /// The participant whose turn it is.
    #[must_use]
    pub fn current(&self) -> Option<&Participant> {
        self.players.get(self.turn_index)
    }

    /// Index of the participant after `index`, wrapping.
    #[must_use]
    pub fn next_index(&self, index: usize) -> usize {
        (index + 1) % self.players.len().max(1)
    }

    /// Remove a participant, returning it.
    pub fn remove(&mut self, id: &ParticipantId) -> Option<Participant> {
        let index = self.index_of(id)?;
        Some(self.players.remove(index))
    }
}
