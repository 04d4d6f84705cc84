//! Session registry: room code to session.
//!
//! The registry is an explicit service constructed once and shared by the
//! controller. The map itself sits behind an `RwLock`; each session has its
//! own `Mutex`, which is what serializes requests against one room while
//! other rooms proceed independently.
//!
//! ## Lock order
//!
//! Never call into the registry while holding a session lock for a
//! *different* room. Lookups clone the handle and release the map lock
//! before any session lock is taken.
//!
//! ## Example
//!
//! ```
//! use rust_checkers::core::GameRng;
//! use rust_checkers::registry::SessionRegistry;
//!
//! let registry = SessionRegistry::new();
//! let mut rng = GameRng::new(1);
//! let code = registry.create(&mut rng, 4);
//!
//! assert!(registry.get(&code).is_some());
//! assert!(registry.delete(&code));
//! assert!(registry.get(&code).is_none());
//! ```

use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock};

use rustc_hash::FxHashMap;

use crate::core::{GameRng, ParticipantId, RoomCode, Session};

/// Shared handle to one session.
pub type SessionHandle = Arc<Mutex<Session>>;

/// Lock a session, recovering the data if a previous holder panicked.
pub fn lock_session(handle: &SessionHandle) -> MutexGuard<'_, Session> {
    handle.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Process-wide table of live sessions.
#[derive(Debug, Default)]
pub struct SessionRegistry {
    sessions: RwLock<FxHashMap<RoomCode, SessionHandle>>,
}

impl SessionRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Reserve a fresh room code and store an empty session under it.
    ///
    /// Codes are regenerated until one is not in use.
    pub fn create(&self, rng: &mut GameRng, code_len: usize) -> RoomCode {
        let mut sessions = self.sessions.write().unwrap_or_else(PoisonError::into_inner);
        let code = loop {
            let candidate = RoomCode(rng.alphanumeric(code_len.max(1)));
            if !sessions.contains_key(&candidate) {
                break candidate;
            }
        };
        sessions.insert(code.clone(), Arc::new(Mutex::new(Session::new(code.clone()))));
        code
    }

    #[must_use]
    pub fn get(&self, code: &RoomCode) -> Option<SessionHandle> {
        self.read().get(code).cloned()
    }

    /// Remove a session. Returns whether it existed.
    pub fn delete(&self, code: &RoomCode) -> bool {
        self.sessions
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(code)
            .is_some()
    }

    /// Find the room a participant belongs to. Linear in the number of
    /// sessions.
    #[must_use]
    pub fn find_by_participant(&self, id: &ParticipantId) -> Option<RoomCode> {
        let handles: Vec<(RoomCode, SessionHandle)> = self
            .read()
            .iter()
            .map(|(code, handle)| (code.clone(), Arc::clone(handle)))
            .collect();

        handles
            .into_iter()
            .find(|(_, handle)| lock_session(handle).contains(id))
            .map(|(code, _)| code)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.read().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    /// Snapshot of the live room codes.
    #[must_use]
    pub fn codes(&self) -> Vec<RoomCode> {
        self.read().keys().cloned().collect()
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, FxHashMap<RoomCode, SessionHandle>> {
        self.sessions.read().unwrap_or_else(PoisonError::into_inner)
    }
}
