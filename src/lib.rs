//! # rust-checkers
//!
//! Rules engine and room orchestration for real-time, two-player checkers.
//!
//! ## Design Principles
//!
//! 1. **Derived board**: piece lists on participants are the only source of
//!    truth. The 8x8 grid is rebuilt on demand.
//!
//! 2. **Mandatory capture**: a piece that can jump must jump; multi-jumps
//!    chain until no jump remains or the piece is crowned.
//!
//! 3. **Explicit scheduling**: pacing delays are `Deferred` tasks handed to
//!    a `Scheduler`, so tests fast-forward a virtual clock instead of
//!    sleeping.
//!
//! ## Modules
//!
//! - `core`: coordinates, colors, pieces, participants, sessions, RNG,
//!   configuration
//! - `rules`: board model and move generation
//! - `registry`: room code to session table
//! - `bot`: greedy single-ply bot
//! - `controller`: turn state machine, wire events, scheduling
//! - `transport`: transport contract, recording and websocket adapters
//! - `error`: client-facing errors

pub mod core;
pub mod rules;
pub mod registry;
pub mod bot;
pub mod controller;
pub mod transport;
pub mod error;

// Re-export commonly used types
pub use crate::core::{
    Color, Coord, GameConfig, GameRng, Participant, ParticipantId, ParticipantKind, Piece,
    RoomCode, Session, Stage,
};

pub use crate::rules::{all_legal_moves, derive_board, legal_moves, Board, Move};

pub use crate::registry::SessionRegistry;

pub use crate::controller::{
    Deferred, EndPayload, ManualScheduler, Request, Response, Scheduler, TokioScheduler,
    TurnController,
};

pub use crate::transport::{RecordingTransport, Transport};

pub use crate::error::{ErrorKind, GameError, Operation};
