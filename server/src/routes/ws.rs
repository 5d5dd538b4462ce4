//! WebSocket handler: bridges one chat client to one upstream link.
//!
//! DESIGN
//! ======
//! On upgrade, generates a client ID and a session cipher, then enters a
//! `select!` loop:
//! - Incoming client events → decode + dispatch to the relay service
//! - Upstream messages → translate into `message_received` payloads
//!
//! Relay handlers are pure protocol logic and return an `Outcome`. This
//! layer owns the sockets: it opens and writes the upstream link and replies
//! to the client.
//!
//! LIFECYCLE
//! =========
//! 1. Upgrade → register client
//! 2. `join` → connect upstream, send `JOIN_ROOM`
//! 3. Client events → Outcome → upstream writes; upstream messages → client
//! 4. `disconnect`, client close, or upstream close → close both → unregister

#[cfg(test)]
#[path = "ws_test.rs"]
mod tests;

use std::sync::Arc;

use axum::extract::State;
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::response::Response;
use frames::{ClientEvent, MessagePayload, ServerEvent};
use tokio::sync::mpsc;
use tracing::{info, warn};
use uuid::Uuid;

use crate::error::RelayError;
use crate::services::crypto::SessionCipher;
use crate::services::relay::{self, Outcome};
use crate::services::upstream::{UpstreamEvent, UpstreamLink};
use crate::state::{AppState, SessionInfo};

type Upstream = Option<(UpstreamLink, mpsc::Receiver<UpstreamEvent>)>;

enum Flow {
    Continue,
    Close,
}

// =============================================================================
// UPGRADE
// =============================================================================

pub async fn handle_ws(State(state): State<AppState>, ws: WebSocketUpgrade) -> Response {
    ws.on_upgrade(move |socket| run_ws(socket, state))
}

// =============================================================================
// CONNECTION
// =============================================================================

async fn run_ws(mut socket: WebSocket, state: AppState) {
    let client_id = Uuid::new_v4();
    state.register(client_id).await;
    info!(%client_id, "ws: client connected");

    let mut session: Option<SessionInfo> = None;
    let mut cipher = SessionCipher::new(Arc::clone(&state.keys));
    let mut upstream: Upstream = None;

    loop {
        tokio::select! {
            msg = socket.recv() => {
                let Some(Ok(msg)) = msg else { break };
                match msg {
                    Message::Text(text) => {
                        let flow = dispatch_event(&state, &mut socket, &mut session, &mut cipher, &mut upstream, client_id, text.as_str()).await;
                        if matches!(flow, Flow::Close) {
                            break;
                        }
                    }
                    Message::Close(_) => break,
                    _ => {}
                }
            }
            event = next_upstream(&mut upstream) => {
                match event {
                    UpstreamEvent::Message(msg) => match relay::handle_upstream(msg, &mut cipher, &state.config.media_dir).await {
                        Ok(Some(payload)) => {
                            if send_payload(&mut socket, payload).await.is_err() {
                                break;
                            }
                        }
                        Ok(None) => {}
                        Err(e) => {
                            warn!(%client_id, error = %e, "ws: upstream message dropped");
                            let _ = send_error(&mut socket, &e).await;
                        }
                    },
                    UpstreamEvent::Closed => {
                        info!(%client_id, "ws: upstream closed");
                        upstream = None;
                        break;
                    }
                }
            }
        }
    }

    if let Some((link, _)) = upstream.take() {
        link.close().await;
    }
    let _ = socket.send(Message::Close(None)).await;
    state.unregister(client_id).await;
    info!(%client_id, "ws: client disconnected");
}

// =============================================================================
// EVENT DISPATCH
// =============================================================================

/// Decode one client event, run it through the relay, and apply the outcome.
async fn dispatch_event(
    state: &AppState,
    socket: &mut WebSocket,
    session: &mut Option<SessionInfo>,
    cipher: &mut SessionCipher,
    upstream: &mut Upstream,
    client_id: Uuid,
    text: &str,
) -> Flow {
    let event: ClientEvent = match frames::decode(text) {
        Ok(event) => event,
        Err(e) => {
            warn!(%client_id, error = %e, "ws: invalid inbound event");
            let _ = send_error(socket, &RelayError::from(e)).await;
            return Flow::Continue;
        }
    };
    info!(%client_id, event = event.name(), "ws: recv event");

    let result = match relay::handle_client_event(event, session, cipher).await {
        Ok(outcome) => {
            let joining = matches!(outcome, Outcome::Join(_));
            apply_outcome(state, upstream, outcome).await.map_err(|e| (e, joining))
        }
        Err(e) => Err((e, false)),
    };
    state.set_session(client_id, session.clone()).await;

    match result {
        Ok(flow) => flow,
        Err((e, joining)) => {
            warn!(%client_id, error = %e, "ws: event failed");
            let _ = send_error(socket, &e).await;
            // A session without an upstream link has nothing left to relay.
            if joining { Flow::Close } else { Flow::Continue }
        }
    }
}

async fn apply_outcome(state: &AppState, upstream: &mut Upstream, outcome: Outcome) -> Result<Flow, RelayError> {
    match outcome {
        Outcome::Join(join) => {
            if let Some((link, _)) = upstream.take() {
                link.close().await;
            }
            let (mut link, rx) = UpstreamLink::connect(&state.config.upstream_url).await?;
            link.send(&join).await?;
            *upstream = Some((link, rx));
            Ok(Flow::Continue)
        }
        Outcome::Forward(msg) => {
            let Some((link, _)) = upstream.as_mut() else {
                return Err(RelayError::NotJoined);
            };
            link.send(&msg).await?;
            Ok(Flow::Continue)
        }
        Outcome::Disconnect => {
            if let Some((link, _)) = upstream.take() {
                link.close().await;
            }
            Ok(Flow::Close)
        }
    }
}

/// Next upstream event, or never when no link is open.
async fn next_upstream(upstream: &mut Upstream) -> UpstreamEvent {
    match upstream.as_mut() {
        Some((_, rx)) => rx.recv().await.unwrap_or(UpstreamEvent::Closed),
        None => std::future::pending().await,
    }
}

// =============================================================================
// OUTBOUND
// =============================================================================

async fn send_payload(socket: &mut WebSocket, payload: MessagePayload) -> Result<(), axum::Error> {
    let text = match frames::encode(&ServerEvent::MessageReceived(payload)) {
        Ok(text) => text,
        Err(e) => {
            warn!(error = %e, "ws: failed to encode payload");
            return Ok(());
        }
    };
    socket.send(Message::Text(text.into())).await
}

async fn send_error(socket: &mut WebSocket, err: &RelayError) -> Result<(), axum::Error> {
    send_payload(socket, MessagePayload::system(err.to_string(), Some(err.status_code()))).await
}
