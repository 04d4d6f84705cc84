//! In-memory transport that records outbound traffic.

use std::sync::{Mutex, MutexGuard, PoisonError};

use rustc_hash::{FxHashMap, FxHashSet};

use super::Transport;
use crate::controller::Response;
use crate::core::{ParticipantId, RoomCode};

/// Where an outbound event was addressed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Target {
    Connection(ParticipantId),
    Room(RoomCode),
}

/// One recorded outbound event.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Outbound {
    pub target: Target,
    pub response: Response,
}

#[derive(Debug, Default)]
struct Recorded {
    outbound: Vec<Outbound>,
    rooms: FxHashMap<RoomCode, FxHashSet<ParticipantId>>,
}

/// Records every event instead of delivering it. Also tracks room
/// membership so tests can check who would have received a broadcast.
#[derive(Debug, Default)]
pub struct RecordingTransport {
    recorded: Mutex<Recorded>,
}

impl RecordingTransport {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything recorded so far.
    #[must_use]
    pub fn events(&self) -> Vec<Outbound> {
        self.lock().outbound.clone()
    }

    /// Drain the recording.
    pub fn take(&self) -> Vec<Outbound> {
        std::mem::take(&mut self.lock().outbound)
    }

    /// Responses broadcast to `room`, in order.
    #[must_use]
    pub fn broadcasts(&self, room: &RoomCode) -> Vec<Response> {
        self.filtered(|t| matches!(t, Target::Room(r) if r == room))
    }

    /// Responses sent directly to `who`, in order.
    #[must_use]
    pub fn sent_to(&self, who: &ParticipantId) -> Vec<Response> {
        self.filtered(|t| matches!(t, Target::Connection(c) if c == who))
    }

    #[must_use]
    pub fn members(&self, room: &RoomCode) -> Vec<ParticipantId> {
        let mut members: Vec<_> = self
            .lock()
            .rooms
            .get(room)
            .map(|m| m.iter().cloned().collect())
            .unwrap_or_default();
        members.sort();
        members
    }

    fn filtered(&self, keep: impl Fn(&Target) -> bool) -> Vec<Response> {
        self.lock()
            .outbound
            .iter()
            .filter(|o| keep(&o.target))
            .map(|o| o.response.clone())
            .collect()
    }

    fn lock(&self) -> MutexGuard<'_, Recorded> {
        self.recorded.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Transport for RecordingTransport {
    fn send(&self, to: &ParticipantId, response: Response) {
        self.lock().outbound.push(Outbound {
            target: Target::Connection(to.clone()),
            response,
        });
    }

    fn broadcast(&self, room: &RoomCode, response: Response) {
        self.lock().outbound.push(Outbound {
            target: Target::Room(room.clone()),
            response,
        });
    }

    fn join_room(&self, who: &ParticipantId, room: &RoomCode) {
        self.lock()
            .rooms
            .entry(room.clone())
            .or_default()
            .insert(who.clone());
    }

    fn leave_room(&self, who: &ParticipantId, room: &RoomCode) {
        let mut recorded = self.lock();
        if let Some(members) = recorded.rooms.get_mut(room) {
            members.remove(who);
            if members.is_empty() {
                recorded.rooms.remove(room);
            }
        }
    }
}
