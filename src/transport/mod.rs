//! The transport contract.
//!
//! The controller only needs four primitives from whatever carries frames:
//! send to one connection, send to every connection in a room, and add or
//! remove a connection's room membership. Connection handshakes and framing
//! are the adapter's business.
//!
//! - `ws`: websocket adapter used by the server binary.
//! - `RecordingTransport`: in-memory adapter that records every outbound
//!   event, for tests.

use std::sync::Arc;

use crate::controller::Response;
use crate::core::{ParticipantId, RoomCode};

mod recording;
pub mod ws;

pub use recording::{Outbound, RecordingTransport, Target};

/// Outbound side of a connection-oriented transport.
pub trait Transport: Send + Sync {
    /// Deliver to one connection. Unknown ids (bots, closed connections)
    /// are ignored.
    fn send(&self, to: &ParticipantId, response: Response);

    /// Deliver to every connection in `room`.
    fn broadcast(&self, room: &RoomCode, response: Response);

    fn join_room(&self, who: &ParticipantId, room: &RoomCode);

    fn leave_room(&self, who: &ParticipantId, room: &RoomCode);
}

impl<T: Transport + ?Sized> Transport for Arc<T> {
    fn send(&self, to: &ParticipantId, response: Response) {
        (**self).send(to, response);
    }

    fn broadcast(&self, room: &RoomCode, response: Response) {
        (**self).broadcast(room, response);
    }

    fn join_room(&self, who: &ParticipantId, room: &RoomCode) {
        (**self).join_room(who, room);
    }

    fn leave_room(&self, who: &ParticipantId, room: &RoomCode) {
        (**self).leave_room(who, room);
    }
}
