//! WebSocket endpoint and per-connection message loop
//!
//! Each accepted socket is routed to one of the two player slots by the
//! `player` query parameter. The handler attaches the slot, then consumes
//! client intents until the socket closes or errors, taking the shared match
//! lock only for the duration of each mutation. Malformed frames are dropped
//! silently; unknown message kinds are accepted no-ops.

use crate::broadcast::{self, broadcast};
use crate::game::SharedMatch;
use crate::physics::{self, Serve};
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::{Query, State};
use axum::response::Response;
use axum::routing::get;
use axum::Router;
use futures::{SinkExt, StreamExt};
use log::{info, warn};
use serde::Deserialize;
use shared::{ClientMessage, PlayerSide, ServerEvent};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::sleep;

/// Countdown value shown to clients before a rally starts.
const COUNTDOWN_FROM: u32 = 3;
/// Pause between the countdown notice and the serve, long enough for the
/// countdown to render client-side.
pub const COUNTDOWN_DELAY: Duration = Duration::from_millis(3200);

/// Shared context handed to every connection handler.
#[derive(Clone)]
pub struct AppState {
    pub state: SharedMatch,
    /// Countdown pause; tests shorten this to keep runs fast.
    pub countdown: Duration,
}

impl AppState {
    pub fn new(state: SharedMatch) -> Self {
        Self {
            state,
            countdown: COUNTDOWN_DELAY,
        }
    }
}

/// Builds the server's router: one websocket endpoint, with the player label
/// carried as a query parameter.
pub fn router(app: AppState) -> Router {
    Router::new().route("/ws", get(ws_handler)).with_state(app)
}

#[derive(Debug, Deserialize)]
struct WsQuery {
    player: Option<String>,
}

async fn ws_handler(
    State(app): State<AppState>,
    Query(query): Query<WsQuery>,
    ws: WebSocketUpgrade,
) -> Response {
    ws.on_upgrade(move |socket| handle_socket(socket, app, query.player))
}

/// Runs one client session from accept to disconnect.
async fn handle_socket(socket: WebSocket, app: AppState, label: Option<String>) {
    let side = match label.as_deref().and_then(|s| s.parse::<PlayerSide>().ok()) {
        Some(side) => side,
        None => {
            reject(socket, label).await;
            return;
        }
    };

    let (mut sink, mut stream) = socket.split();

    // Writer task: drains the slot's outbound channel into the socket. The
    // handler and registry only ever hold the cheap sender side.
    let (tx, mut rx) = mpsc::unbounded_channel::<String>();
    let writer = tokio::spawn(async move {
        while let Some(text) = rx.recv().await {
            if sink.send(Message::Text(text)).await.is_err() {
                break;
            }
        }
    });

    {
        let mut state = app.state.lock().await;
        state.players.attach(side, tx.clone());
    }
    broadcast(&app.state, &ServerEvent::Info { msg: format!("{} joined", side) }).await;

    while let Some(frame) = stream.next().await {
        let frame = match frame {
            Ok(frame) => frame,
            Err(_) => break,
        };
        let text = match frame {
            Message::Text(text) => text,
            Message::Close(_) => break,
            // Binary, ping and pong frames carry no game intent.
            _ => continue,
        };

        // Malformed payloads are dropped; the connection stays open.
        let message = match serde_json::from_str::<ClientMessage>(&text) {
            Ok(message) => message,
            Err(_) => continue,
        };

        match message {
            ClientMessage::Move { y } => {
                let mut state = app.state.lock().await;
                state.players.set_paddle_y(side, y);
            }
            ClientMessage::Start => handle_start(&app, side, &tx).await,
            ClientMessage::Ping => broadcast::notify_one(&tx, &ServerEvent::Pong),
            ClientMessage::Unknown => {}
        }
    }

    {
        let mut state = app.state.lock().await;
        state.players.detach(side);
    }
    broadcast(&app.state, &ServerEvent::Info { msg: format!("{} left", side) }).await;

    // Dropping our sender (the slot's clone is gone after detach) ends the
    // writer task once its queue drains.
    drop(tx);
    let _ = writer.await;
}

/// Marks the sender ready and, when both sides are connected and ready,
/// drives the countdown-then-serve transition. The lock is deliberately not
/// held across the countdown pause, so paddle moves keep flowing meanwhile.
async fn handle_start(app: &AppState, side: PlayerSide, tx: &mpsc::UnboundedSender<String>) {
    let begin = {
        let mut state = app.state.lock().await;
        state.players.slot_mut(side).ready = true;
        state.players.both_ready() && state.players.both_connected()
    };

    if !begin {
        broadcast::notify_one(
            tx,
            &ServerEvent::Waiting {
                msg: "Waiting for other player...".to_string(),
            },
        );
        return;
    }

    broadcast(&app.state, &ServerEvent::Countdown { n: COUNTDOWN_FROM }).await;
    sleep(app.countdown).await;

    {
        let mut state = app.state.lock().await;
        physics::reset_ball(&mut state.ball, Serve::from_clock());
        state.running = true;
    }
    info!("Rally started");
    broadcast(&app.state, &ServerEvent::Started).await;
}

/// Sends a single error notice to a connection with no valid player label,
/// then lets the socket close.
async fn reject(mut socket: WebSocket, label: Option<String>) {
    warn!("Rejected connection with player label {:?}", label);
    if let Ok(text) = serde_json::to_string(&ServerEvent::Error {
        msg: "invalid player".to_string(),
    }) {
        let _ = socket.send(Message::Text(text)).await;
    }
    let _ = socket.close().await;
}
