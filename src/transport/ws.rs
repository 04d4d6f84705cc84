//! Websocket adapter.
//!
//! Each socket gets a connection id and an unbounded outbound queue. Text
//! frames carry one JSON `Request` each; everything the controller emits
//! is serialized back as one JSON `Response` per frame.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::State;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::Router;
use futures::{SinkExt, StreamExt};
use rustc_hash::{FxHashMap, FxHashSet};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use super::Transport;
use crate::controller::{Deferred, Request, Response, TokioScheduler, TurnController};
use crate::core::{ParticipantId, RoomCode};

/// Live connections and room membership.
#[derive(Debug, Default)]
pub struct WsHub {
    connections: RwLock<FxHashMap<ParticipantId, mpsc::UnboundedSender<Response>>>,
    rooms: RwLock<FxHashMap<RoomCode, FxHashSet<ParticipantId>>>,
    next_id: AtomicU64,
}

impl WsHub {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new connection and return its id and outbound queue.
    pub fn connect(&self) -> (ParticipantId, mpsc::UnboundedReceiver<Response>) {
        let n = self.next_id.fetch_add(1, Ordering::Relaxed);
        let id = ParticipantId(format!("conn-{n:x}"));
        let (tx, rx) = mpsc::unbounded_channel();
        self.connections
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(id.clone(), tx);
        (id, rx)
    }

    /// Forget a connection and drop it from every room.
    pub fn disconnect(&self, id: &ParticipantId) {
        self.connections
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(id);
        let mut rooms = self.rooms.write().unwrap_or_else(PoisonError::into_inner);
        rooms.retain(|_, members| {
            members.remove(id);
            !members.is_empty()
        });
    }

    #[must_use]
    pub fn members(&self, room: &RoomCode) -> Vec<ParticipantId> {
        self.rooms
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(room)
            .map(|m| m.iter().cloned().collect())
            .unwrap_or_default()
    }
}

impl Transport for WsHub {
    fn send(&self, to: &ParticipantId, response: Response) {
        debug!(connection = %to, event = response.name(), "-->");
        let connections = self.connections.read().unwrap_or_else(PoisonError::into_inner);
        if let Some(tx) = connections.get(to) {
            // A closed receiver means the socket is already going away.
            let _ = tx.send(response);
        }
    }

    fn broadcast(&self, room: &RoomCode, response: Response) {
        debug!(room = %room, event = response.name(), "-->");
        let members = self.members(room);
        let connections = self.connections.read().unwrap_or_else(PoisonError::into_inner);
        for member in members {
            if let Some(tx) = connections.get(&member) {
                let _ = tx.send(response.clone());
            }
        }
    }

    fn join_room(&self, who: &ParticipantId, room: &RoomCode) {
        self.rooms
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(room.clone())
            .or_default()
            .insert(who.clone());
    }

    fn leave_room(&self, who: &ParticipantId, room: &RoomCode) {
        let mut rooms = self.rooms.write().unwrap_or_else(PoisonError::into_inner);
        if let Some(members) = rooms.get_mut(room) {
            members.remove(who);
            if members.is_empty() {
                rooms.remove(room);
            }
        }
    }
}

/// Controller wired to the websocket hub and real timers.
pub type ServerController = TurnController<Arc<WsHub>, TokioScheduler>;

/// Shared state for the axum router.
#[derive(Clone)]
pub struct AppState {
    pub controller: Arc<ServerController>,
    pub hub: Arc<WsHub>,
}

/// Routes: the websocket endpoint lives at `/ws`.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/ws", get(ws_handler))
        .with_state(state)
}

/// Feed released deferred tasks into the controller until the scheduler
/// is dropped.
pub async fn drive_deferred(
    controller: Arc<ServerController>,
    mut tasks: mpsc::UnboundedReceiver<Deferred>,
) {
    while let Some(task) = tasks.recv().await {
        controller.run_deferred(task);
    }
}

async fn ws_handler(ws: WebSocketUpgrade, State(state): State<AppState>) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

async fn handle_socket(socket: WebSocket, state: AppState) {
    let (id, mut outbound) = state.hub.connect();
    info!(connection = %id, "connection");

    let (mut sink, mut stream) = socket.split();
    let writer = tokio::spawn(async move {
        while let Some(response) = outbound.recv().await {
            let text = match serde_json::to_string(&response) {
                Ok(text) => text,
                Err(err) => {
                    warn!(%err, "failed to encode response");
                    continue;
                }
            };
            if sink.send(Message::Text(text)).await.is_err() {
                break;
            }
        }
    });

    while let Some(frame) = stream.next().await {
        let text = match frame {
            Ok(Message::Text(text)) => text,
            Ok(Message::Close(_)) | Err(_) => break,
            Ok(_) => continue,
        };
        match serde_json::from_str::<Request>(&text) {
            Ok(request) => state.controller.handle(&id, request),
            Err(err) => {
                warn!(connection = %id, %err, "malformed frame");
                state.hub.send(
                    &id,
                    Response::Error {
                        message: format!("Malformed request: {err}"),
                    },
                );
            }
        }
    }

    state.controller.disconnect(&id);
    state.hub.disconnect(&id);
    writer.abort();
    info!(connection = %id, "disconnect");
}
