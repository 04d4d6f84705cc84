//! Session orchestration: the turn controller, its wire events, narration
//! and deferred-task scheduling.
//!
//! ## Example
//!
//! ```
//! use std::time::Duration;
//! use rust_checkers::controller::{ManualScheduler, Request, Response, TurnController};
//! use rust_checkers::core::{GameConfig, ParticipantId};
//! use rust_checkers::transport::RecordingTransport;
//!
//! let ctl = TurnController::new(
//!     GameConfig::default().with_seed(1),
//!     RecordingTransport::new(),
//!     ManualScheduler::new(),
//! );
//! let me = ParticipantId::new("conn-1");
//!
//! let room = ctl.create(&me);
//! ctl.handle(&me, Request::Enter { id: room.clone(), name: Some("Ann".into()) });
//! ctl.handle(&me, Request::Start { id: room.clone() });
//!
//! // A bot was seated opposite the lone human.
//! let session = ctl.snapshot(&room).unwrap();
//! assert_eq!(session.players.len(), 2);
//! assert!(session.players[1].is_automated());
//!
//! ctl.advance_clock(Duration::from_secs(2));
//! assert!(ctl.transport().broadcasts(&room).iter().any(|r| matches!(r, Response::Message { .. })));
//! ```

mod events;
pub mod narration;
mod schedule;
mod turn;

pub use events::{EndPayload, Request, Response};
pub use schedule::{Deferred, ManualScheduler, Scheduler, TokioScheduler};
pub use turn::TurnController;
