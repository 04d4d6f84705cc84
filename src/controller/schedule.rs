//! Deferred work.
//!
//! The controller never sleeps. Anything that must happen later is
//! described by a `Deferred` value and handed to a `Scheduler`; when the
//! delay elapses the task is fed back through
//! `TurnController::run_deferred`, which re-checks that the room still
//! exists before acting. Stale tasks are dropped, not retracted.
//!
//! Game tasks are stamped with the session's `generation`; a restart bumps
//! it, so tasks left over from the previous game are dropped too.
//!
//! - `TokioScheduler`: real timers, tasks delivered over a channel.
//! - `ManualScheduler`: a virtual clock for deterministic tests.

use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use tokio::sync::mpsc;
use tracing::{debug, warn};

use super::events::Response;
use crate::core::{ParticipantId, RoomCode};

/// A callback the controller has scheduled.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Deferred {
    /// Broadcast a new participant's `join`, then add its connection to the
    /// room.
    AnnounceJoin { room: RoomCode, participant: ParticipantId },
    /// Announce who moves first and kick off a bot that does.
    StartNarration { room: RoomCode, generation: u32 },
    /// Advance the turn after a move.
    AdvanceTurn { room: RoomCode, generation: u32 },
    /// Let a bot move.
    BotMove {
        room: RoomCode,
        generation: u32,
        bot: ParticipantId,
    },
    /// Broadcast a prepared response.
    Broadcast {
        room: RoomCode,
        generation: u32,
        response: Response,
    },
}

impl Deferred {
    #[must_use]
    pub fn room(&self) -> &RoomCode {
        match self {
            Deferred::AnnounceJoin { room, .. }
            | Deferred::StartNarration { room, .. }
            | Deferred::AdvanceTurn { room, .. }
            | Deferred::BotMove { room, .. }
            | Deferred::Broadcast { room, .. } => room,
        }
    }

    /// The game generation a task belongs to. Join announcements are not
    /// tied to a game.
    #[must_use]
    pub fn generation(&self) -> Option<u32> {
        match self {
            Deferred::AnnounceJoin { .. } => None,
            Deferred::StartNarration { generation, .. }
            | Deferred::AdvanceTurn { generation, .. }
            | Deferred::BotMove { generation, .. }
            | Deferred::Broadcast { generation, .. } => Some(*generation),
        }
    }
}

/// Runs `Deferred` tasks after a delay.
pub trait Scheduler: Send + Sync {
    fn schedule(&self, delay: Duration, task: Deferred);
}

/// Timer-backed scheduler. Due tasks arrive on the receiver returned by
/// `new`; the server's driver loop hands them to the controller.
#[derive(Clone, Debug)]
pub struct TokioScheduler {
    tx: mpsc::UnboundedSender<Deferred>,
}

impl TokioScheduler {
    #[must_use]
    pub fn new() -> (Self, mpsc::UnboundedReceiver<Deferred>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl Scheduler for TokioScheduler {
    fn schedule(&self, delay: Duration, task: Deferred) {
        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            warn!(?task, "no async runtime, dropping deferred task");
            return;
        };
        let tx = self.tx.clone();
        runtime.spawn(async move {
            tokio::time::sleep(delay).await;
            if tx.send(task).is_err() {
                debug!("deferred task receiver closed");
            }
        });
    }
}

#[derive(Debug, Default)]
struct ManualQueue {
    now: Duration,
    seq: u64,
    tasks: Vec<(Duration, u64, Deferred)>,
}

/// Virtual-clock scheduler. Nothing runs until the clock is advanced.
#[derive(Debug, Default)]
pub struct ManualScheduler {
    queue: Mutex<ManualQueue>,
}

impl ManualScheduler {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current virtual time.
    #[must_use]
    pub fn now(&self) -> Duration {
        self.lock().now
    }

    /// Number of tasks waiting.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.lock().tasks.len()
    }

    /// When the earliest waiting task is due.
    #[must_use]
    pub fn next_due(&self) -> Option<Duration> {
        self.lock().tasks.iter().map(|(due, _, _)| *due).min()
    }

    /// Pop the earliest task due at or before `until`, moving the clock to
    /// its due time. Ties run in scheduling order.
    pub fn pop_due(&self, until: Duration) -> Option<Deferred> {
        let mut queue = self.lock();
        let index = queue
            .tasks
            .iter()
            .enumerate()
            .filter(|(_, (due, _, _))| *due <= until)
            .min_by_key(|(_, (due, seq, _))| (*due, *seq))
            .map(|(i, _)| i)?;
        let (due, _, task) = queue.tasks.remove(index);
        queue.now = queue.now.max(due);
        Some(task)
    }

    /// Move the clock to `until` without running anything.
    pub fn set_now(&self, until: Duration) {
        let mut queue = self.lock();
        queue.now = queue.now.max(until);
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, ManualQueue> {
        self.queue.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Scheduler for ManualScheduler {
    fn schedule(&self, delay: Duration, task: Deferred) {
        let mut queue = self.lock();
        let due = queue.now + delay;
        let seq = queue.seq;
        queue.seq += 1;
        queue.tasks.push((due, seq, task));
    }
}
