//! Wire events.
//!
//! Frames are JSON objects tagged with the event name, payload under
//! `data`:
//!
//! ```
//! use rust_checkers::controller::Request;
//!
//! let req: Request = serde_json::from_str(
//!     r#"{"event":"move","data":{"origin":[2,2],"destination":[3,3]}}"#,
//! ).unwrap();
//! assert!(matches!(req, Request::Move { .. }));
//!
//! let create: Request = serde_json::from_str(r#"{"event":"create","data":{}}"#).unwrap();
//! assert_eq!(create, Request::Create);
//! ```

use serde::de::IgnoredAny;
use serde::{Deserialize, Deserializer, Serialize};

use crate::core::{Coord, Participant, ParticipantId, Piece, RoomCode, Session};
use crate::error::GameError;

/// Client to server.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "lowercase")]
pub enum Request {
    /// Carries no data; `data` may be absent, `null` or `{}`.
    #[serde(deserialize_with = "ignore_data")]
    Create,
    Enter {
        id: RoomCode,
        #[serde(default)]
        name: Option<String>,
    },
    Start {
        id: RoomCode,
    },
    State {
        id: RoomCode,
    },
    Move {
        origin: Coord,
        destination: Coord,
    },
    Leave {
        id: RoomCode,
    },
}

fn ignore_data<'de, D: Deserializer<'de>>(deserializer: D) -> Result<(), D::Error> {
    IgnoredAny::deserialize(deserializer).map(|_| ())
}

impl Request {
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Request::Create => "create",
            Request::Enter { .. } => "enter",
            Request::Start { .. } => "start",
            Request::State { .. } => "state",
            Request::Move { .. } => "move",
            Request::Leave { .. } => "leave",
        }
    }
}

/// How a game ended.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "endType", rename_all = "lowercase", rename_all_fields = "camelCase")]
pub enum EndPayload {
    Win { winner_id: ParticipantId, message: String },
    Tie { message: String },
}

/// Server to client (one connection or a whole room).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    tag = "event",
    content = "data",
    rename_all = "lowercase",
    rename_all_fields = "camelCase"
)]
pub enum Response {
    Create {
        id: RoomCode,
    },
    Enter {
        id: RoomCode,
        session: Session,
    },
    Join {
        id: RoomCode,
        participant: Participant,
    },
    Start {
        session: Session,
        message: String,
        first_turn_id: ParticipantId,
    },
    State {
        session: Session,
    },
    Move {
        message: String,
        participant_id: ParticipantId,
        origin: Coord,
        destination: Coord,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        captures: Option<Vec<Piece>>,
        king: bool,
    },
    Message {
        message: String,
    },
    End(EndPayload),
    Leave {
        participant_id: ParticipantId,
    },
    Error {
        message: String,
    },
}

impl Response {
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Response::Create { .. } => "create",
            Response::Enter { .. } => "enter",
            Response::Join { .. } => "join",
            Response::Start { .. } => "start",
            Response::State { .. } => "state",
            Response::Move { .. } => "move",
            Response::Message { .. } => "message",
            Response::End(_) => "end",
            Response::Leave { .. } => "leave",
            Response::Error { .. } => "error",
        }
    }

    pub fn message(text: impl Into<String>) -> Self {
        Response::Message {
            message: text.into(),
        }
    }

    pub fn win(winner_id: ParticipantId, message: impl Into<String>) -> Self {
        Response::End(EndPayload::Win {
            winner_id,
            message: message.into(),
        })
    }

    pub fn tie(message: impl Into<String>) -> Self {
        Response::End(EndPayload::Tie {
            message: message.into(),
        })
    }
}

impl From<&GameError> for Response {
    fn from(err: &GameError) -> Self {
        Response::Error {
            message: err.to_string(),
        }
    }
}
