//! The turn controller: room lifecycle and the turn loop.
//!
//! ## States
//!
//! `Lobby` (0-1 participants) → `AwaitingStart` (2 participants) →
//! `Active` (turn loop) → `Ended` (result announced, session inert or
//! deleted). See [`Stage`](crate::core::Stage).
//!
//! ## Serialization
//!
//! Every operation locks the one session it touches for its whole
//! duration, so two requests against the same room never interleave while
//! different rooms proceed in parallel. Deferred callbacks re-resolve the
//! room through the registry and become no-ops if it is gone.
//!
//! ## Pacing
//!
//! A move is broadcast immediately; turn advancement runs `move_delay`
//! later. Bot moves run `bot_delay` after the bot's turn begins.
//! End-of-game narration cascades in `end_delay` steps.

use std::sync::{Mutex, MutexGuard, PoisonError};

use tracing::{debug, error, info, warn};

use super::events::{Request, Response};
use super::narration;
use super::schedule::{Deferred, ManualScheduler, Scheduler};
use crate::bot;
use crate::core::{Color, Coord, GameConfig, GameRng, Participant, ParticipantId, RoomCode, Session};
use crate::error::{GameError, Operation};
use crate::registry::{lock_session, SessionRegistry};
use crate::rules::{all_legal_moves, derive_board, legal_moves};
use crate::transport::Transport;

/// Length of the random part of a bot id.
const BOT_ID_LEN: usize = 10;

/// Drives every session through its lifecycle.
pub struct TurnController<T, S> {
    registry: SessionRegistry,
    transport: T,
    scheduler: S,
    config: GameConfig,
    rng: Mutex<GameRng>,
}

impl<T: Transport, S: Scheduler> TurnController<T, S> {
    pub fn new(config: GameConfig, transport: T, scheduler: S) -> Self {
        let rng = GameRng::from_optional_seed(config.seed);
        Self {
            registry: SessionRegistry::new(),
            transport,
            scheduler,
            config,
            rng: Mutex::new(rng),
        }
    }

    #[must_use]
    pub fn registry(&self) -> &SessionRegistry {
        &self.registry
    }

    #[must_use]
    pub fn transport(&self) -> &T {
        &self.transport
    }

    #[must_use]
    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    #[must_use]
    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Copy of a session's current state.
    #[must_use]
    pub fn snapshot(&self, room: &RoomCode) -> Option<Session> {
        self.registry.get(room).map(|h| lock_session(&h).clone())
    }

    /// Dispatch one inbound request. Rejections go back to the requester
    /// as an `error` event.
    pub fn handle(&self, requester: &ParticipantId, request: Request) {
        debug!(connection = %requester, event = request.name(), "<--");
        let result = match request {
            Request::Create => {
                self.create(requester);
                Ok(())
            }
            Request::Enter { id, name } => self.enter(requester, &id, name),
            Request::Start { id } => self.start(requester, &id),
            Request::State { id } => self.state(requester, &id),
            Request::Move {
                origin,
                destination,
            } => self.make_move(requester, origin, destination),
            Request::Leave { id } => self.leave(requester, &id),
        };

        if let Err(err) = result {
            debug!(connection = %requester, kind = ?err.kind(), %err, "request rejected");
            self.transport.send(requester, Response::from(&err));
        }
    }

    /// Open a new room and tell the requester its code.
    pub fn create(&self, requester: &ParticipantId) -> RoomCode {
        let code = {
            let mut rng = self.rng();
            self.registry.create(&mut rng, self.config.room_code_len)
        };
        info!(room = %code, "room created");
        self.transport.send(requester, Response::Create { id: code.clone() });
        code
    }

    /// Add the requester to a room as a human participant.
    ///
    /// A connection holds at most one seat across all rooms: a requester
    /// already seated anywhere, not just in `room`, is refused with
    /// `AlreadyJoined`.
    pub fn enter(
        &self,
        requester: &ParticipantId,
        room: &RoomCode,
        name: Option<String>,
    ) -> Result<(), GameError> {
        let handle = self
            .registry
            .get(room)
            .ok_or(GameError::InvalidRoomCode(Operation::Connect))?;

        let seated = self.registry.find_by_participant(requester).is_some();

        let mut session = lock_session(&handle);
        if session.is_full() {
            return Err(GameError::RoomFull);
        }
        if seated {
            return Err(GameError::AlreadyJoined);
        }

        let color = match session.players.first() {
            Some(existing) => existing.color.opposite(),
            None if self.rng().gen_bool(0.5) => Color::Dark,
            None => Color::Light,
        };
        let name = name
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| self.config.default_human_name.clone());

        info!(room = %room, connection = %requester, %color, "adding human");
        session
            .players
            .push(Participant::human(requester.clone(), color, name));

        self.transport.send(
            requester,
            Response::Enter {
                id: room.clone(),
                session: session.clone(),
            },
        );
        self.scheduler.schedule(
            self.config.join_delay(),
            Deferred::AnnounceJoin {
                room: room.clone(),
                participant: requester.clone(),
            },
        );
        Ok(())
    }

    /// Start (or restart) the game, seating a bot opposite a lone human.
    pub fn start(&self, requester: &ParticipantId, room: &RoomCode) -> Result<(), GameError> {
        let handle = self
            .registry
            .get(room)
            .ok_or(GameError::InvalidRoomCode(Operation::Start))?;
        let mut session = lock_session(&handle);

        if session.players.is_empty() {
            return Err(GameError::RoomEmpty);
        }
        if session.players.len() == 1 {
            let color = session.players[0].color.opposite();
            let suffix = self.rng().alphanumeric(BOT_ID_LEN);
            info!(room = %room, %color, "adding bot");
            session
                .players
                .push(Participant::bot(&suffix, color, self.config.bot_name.clone()));
        }

        session.generation = session.generation.wrapping_add(1);
        session.started = true;
        session.ended = false;
        session.advance_pending = false;
        session.turn_count = 0;
        session.turn_index = session
            .players
            .iter()
            .position(|p| p.color == Color::FIRST_MOVER)
            .unwrap_or(0);
        for participant in &mut session.players {
            participant.deal();
        }

        let first_turn_id = session.players[session.turn_index].id.clone();
        info!(room = %room, requester = %requester, first = %first_turn_id, "game started");
        debug!("\n{}", derive_board(&session));

        self.transport.broadcast(
            room,
            Response::Start {
                session: session.clone(),
                message: narration::GAME_STARTED.to_string(),
                first_turn_id,
            },
        );
        self.scheduler.schedule(
            self.config.move_delay(),
            Deferred::StartNarration {
                room: room.clone(),
                generation: session.generation,
            },
        );
        Ok(())
    }

    /// Reply with the full session snapshot.
    pub fn state(&self, requester: &ParticipantId, room: &RoomCode) -> Result<(), GameError> {
        let session = self
            .snapshot(room)
            .ok_or(GameError::InvalidRoomCode(Operation::State))?;
        self.transport.send(requester, Response::State { session });
        Ok(())
    }

    /// Move one of the requester's pieces.
    pub fn make_move(
        &self,
        requester: &ParticipantId,
        origin: Coord,
        destination: Coord,
    ) -> Result<(), GameError> {
        let room = self
            .registry
            .find_by_participant(requester)
            .ok_or(GameError::NotInGame)?;
        let handle = self.registry.get(&room).ok_or(GameError::NotInGame)?;
        let mut session = lock_session(&handle);
        let index = session.index_of(requester).ok_or(GameError::NotInGame)?;

        self.apply_move(&mut session, index, origin, destination)
    }

    /// Leave a room. The remaining participant wins by forfeit; a room with
    /// no human left is deleted.
    pub fn leave(&self, requester: &ParticipantId, room: &RoomCode) -> Result<(), GameError> {
        let handle = self
            .registry
            .get(room)
            .ok_or(GameError::InvalidRoomCode(Operation::Leave))?;
        let mut session = lock_session(&handle);

        session.remove(requester).ok_or(GameError::NotInRoom)?;
        self.transport.leave_room(requester, room);
        info!(room = %room, connection = %requester, "participant left");

        if !session.has_connected_human(None) {
            drop(session);
            self.delete_room(room);
            return Ok(());
        }

        match session.players.first().map(|p| p.id.clone()) {
            Some(winner_id) => {
                session.ended = true;
                session.advance_pending = false;
                self.transport
                    .broadcast(room, Response::win(winner_id, narration::OPPONENT_LEFT_WIN));
            }
            None => {
                error!(room = %room, "no opponent left to award");
                drop(session);
                self.delete_room(room);
            }
        }
        Ok(())
    }

    /// A connection went away. Never fails.
    ///
    /// Before the game starts the participant is removed. Mid-game the seat
    /// is kept (marked disconnected) and the opponent is told, but nobody is
    /// awarded the win. Either way the room is deleted once no connected
    /// human remains.
    pub fn disconnect(&self, requester: &ParticipantId) {
        debug!(connection = %requester, "<-- disconnect");
        let Some(room) = self.registry.find_by_participant(requester) else {
            return;
        };
        self.transport.leave_room(requester, &room);
        let Some(handle) = self.registry.get(&room) else {
            return;
        };
        let mut session = lock_session(&handle);

        if session.started {
            if let Some(index) = session.index_of(requester) {
                session.players[index].disconnected = true;
            }
        } else {
            session.remove(requester);
        }

        if !session.has_connected_human(None) {
            drop(session);
            self.delete_room(&room);
        } else if session.started {
            self.transport
                .broadcast(&room, Response::message(narration::OPPONENT_LEFT));
        } else {
            self.transport.broadcast(
                &room,
                Response::Leave {
                    participant_id: requester.clone(),
                },
            );
        }
    }

    /// Run a task the scheduler has released.
    pub fn run_deferred(&self, task: Deferred) {
        let Some(handle) = self.registry.get(task.room()) else {
            debug!(?task, "room gone, dropping deferred task");
            return;
        };
        let mut session = lock_session(&handle);
        if task.generation().is_some_and(|g| g != session.generation) {
            debug!(?task, current = session.generation, "task from a previous game, dropping");
            return;
        }

        match task {
            Deferred::AnnounceJoin { room, participant } => {
                let Some(joined) = session.participant(&participant).cloned() else {
                    warn!(room = %room, %participant, "participant gone before join announcement");
                    return;
                };
                self.transport.broadcast(
                    &room,
                    Response::Join {
                        id: room.clone(),
                        participant: joined,
                    },
                );
                self.transport.join_room(&participant, &room);
            }
            Deferred::StartNarration { room, .. } => {
                if !session.is_playable() {
                    warn!(room = %room, "stale start narration");
                    return;
                }
                let Some(first) = session.current().cloned() else {
                    return;
                };
                self.transport
                    .broadcast(&room, Response::message(narration::first_turn(&first)));
                if first.is_automated() {
                    self.schedule_bot(&session, &first.id);
                }
            }
            Deferred::AdvanceTurn { room, .. } => {
                if !session.advance_pending || session.ended {
                    warn!(room = %room, "stale turn advancement");
                    return;
                }
                session.advance_pending = false;
                if session.players.len() != 2 {
                    error!(room = %room, players = session.players.len(), "no opponent to advance to");
                    drop(session);
                    self.delete_room(&room);
                    return;
                }
                self.advance_turn(&mut session);
            }
            Deferred::BotMove { room, bot, .. } => self.bot_move(&mut session, &room, &bot),
            Deferred::Broadcast { room, response, .. } => self.transport.broadcast(&room, response),
        }
    }

    /// Validate and apply a move for the participant at `index`.
    fn apply_move(
        &self,
        session: &mut Session,
        index: usize,
        origin: Coord,
        destination: Coord,
    ) -> Result<(), GameError> {
        if !session.is_playable() {
            return Err(GameError::NotInGame);
        }
        if session.turn_index != index || session.advance_pending {
            return Err(GameError::NotYourTurn);
        }

        let piece = *session.players[index]
            .piece_at(origin)
            .ok_or(GameError::InvalidPiece)?;
        let chosen = legal_moves(session, &piece)
            .into_iter()
            .find(|m| m.connects(origin, destination))
            .ok_or(GameError::InvalidMove)?;

        let opponent = session.next_index(index);
        let captured: Vec<_> = chosen
            .captures
            .iter()
            .filter_map(|&c| session.players[opponent].remove_piece_at(c))
            .collect();

        let mover = &mut session.players[index];
        if let Some(moved) = mover.piece_at_mut(origin) {
            moved.move_to(destination);
            if chosen.king {
                moved.crown();
            }
        }
        let message = narration::moved(mover, &chosen);
        let participant_id = mover.id.clone();

        debug!(room = %session.id, mover = %participant_id, %origin, %destination, captures = captured.len(), "move applied");
        self.transport.broadcast(
            &session.id,
            Response::Move {
                message,
                participant_id,
                origin,
                destination,
                captures: (!captured.is_empty()).then_some(captured),
                king: chosen.king,
            },
        );

        session.advance_pending = true;
        self.scheduler.schedule(
            self.config.move_delay(),
            Deferred::AdvanceTurn {
                room: session.id.clone(),
                generation: session.generation,
            },
        );
        Ok(())
    }

    /// Hand the turn to the other participant, or end the game.
    fn advance_turn(&self, session: &mut Session) {
        let room = session.id.clone();
        let mover_index = session.turn_index;
        let next_index = session.next_index(mover_index);
        let mover = session.players[mover_index].clone();
        let next = session.players[next_index].clone();

        if next.pieces.is_empty() {
            session.ended = true;
            info!(room = %room, winner = %mover.id, "game won, opponent out of pieces");
            self.transport.broadcast(
                &room,
                Response::win(mover.id.clone(), narration::out_of_pieces(&next, &mover)),
            );
            return;
        }

        let next_moves = all_legal_moves(session, &next);
        debug!(room = %room, "next participant can make {} moves", next_moves.len());

        if !next_moves.is_empty() {
            session.turn_index = next_index;
            session.turn_count += 1;
            if next.is_automated() {
                self.schedule_bot(session, &next.id);
            }
            return;
        }

        session.ended = true;
        self.transport
            .broadcast(&room, Response::message(narration::cannot_move(&next)));

        let mover_moves = all_legal_moves(session, &mover);
        debug!(room = %room, "current participant can make {} moves", mover_moves.len());

        let step = self.config.end_delay();
        let generation = session.generation;
        if mover_moves.is_empty() {
            info!(room = %room, "game tied, neither side can move");
            self.scheduler.schedule(
                step,
                Deferred::Broadcast {
                    room: room.clone(),
                    generation,
                    response: Response::message(narration::cannot_move(&mover)),
                },
            );
            self.scheduler.schedule(
                step * 2,
                Deferred::Broadcast {
                    room,
                    generation,
                    response: Response::tie(narration::TIE),
                },
            );
        } else {
            info!(room = %room, winner = %mover.id, "game won, opponent cannot move");
            self.scheduler.schedule(
                step,
                Deferred::Broadcast {
                    room,
                    generation,
                    response: Response::win(mover.id.clone(), narration::stalemate_win(&next, &mover)),
                },
            );
        }
    }

    fn schedule_bot(&self, session: &Session, bot: &ParticipantId) {
        self.scheduler.schedule(
            self.config.bot_delay(),
            Deferred::BotMove {
                room: session.id.clone(),
                generation: session.generation,
                bot: bot.clone(),
            },
        );
    }

    fn bot_move(&self, session: &mut Session, room: &RoomCode, bot: &ParticipantId) {
        let Some(index) = session.index_of(bot) else {
            warn!(room = %room, %bot, "bot no longer seated");
            return;
        };
        if !session.is_playable() || session.turn_index != index || session.advance_pending {
            warn!(room = %room, %bot, "stale bot move");
            return;
        }

        let participant = session.players[index].clone();
        let choice = {
            let mut rng = self.rng();
            bot::choose_move(session, &participant, &mut rng)
        };
        let Some(chosen) = choice else {
            warn!(room = %room, %bot, "bot has no legal move");
            return;
        };
        if let Err(err) = self.apply_move(session, index, chosen.origin(), chosen.destination()) {
            error!(room = %room, %bot, %err, "bot produced an illegal move");
        }
    }

    fn delete_room(&self, room: &RoomCode) {
        if self.registry.delete(room) {
            info!(room = %room, "deleting room");
        }
    }

    fn rng(&self) -> MutexGuard<'_, GameRng> {
        self.rng.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<T: Transport> TurnController<T, ManualScheduler> {
    /// Run every task due within `by` of the virtual clock, including tasks
    /// those tasks schedule. Returns how many ran.
    pub fn advance_clock(&self, by: std::time::Duration) -> usize {
        let until = self.scheduler.now() + by;
        let mut ran = 0;
        while let Some(task) = self.scheduler.pop_due(until) {
            self.run_deferred(task);
            ran += 1;
        }
        self.scheduler.set_now(until);
        ran
    }

    /// Run tasks until none are waiting. `limit` bounds runaway bot games.
    pub fn run_until_idle(&self, limit: usize) -> usize {
        let mut ran = 0;
        while ran < limit {
            let Some(due) = self.scheduler.next_due() else {
                break;
            };
            let Some(task) = self.scheduler.pop_due(due) else {
                break;
            };
            self.run_deferred(task);
            ran += 1;
        }
        ran
    }
}
