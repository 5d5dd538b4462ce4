//! Websocket transport for the terminal client.
//!
//! DESIGN
//! ======
//! The controller only queues [`Command`]s on an unbounded channel. A single
//! tokio task owns the socket: it opens it on `Connect`, writes queued events
//! as JSON text frames, and forwards inbound `message_received` payloads to
//! the app loop as [`AppEvent`]s.

#[cfg(test)]
#[path = "transport_test.rs"]
mod tests;

use client::net::{Transport, TransportError};
use frames::{ClientEvent, ServerEvent};
use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};
use tracing::{debug, info, warn};

use crate::app::AppEvent;

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Work queued for the connection task.
#[derive(Debug, PartialEq, Eq)]
pub enum Command {
    Connect,
    Send(ClientEvent),
    Close,
}

/// [`Transport`] that forwards to the connection task.
pub struct ChannelTransport {
    tx: mpsc::UnboundedSender<Command>,
    open: bool,
}

impl ChannelTransport {
    pub fn new(tx: mpsc::UnboundedSender<Command>) -> Self {
        Self { tx, open: false }
    }
}

impl Transport for ChannelTransport {
    fn connect(&mut self) -> Result<(), TransportError> {
        if self.open {
            return Ok(());
        }
        self.tx.send(Command::Connect).map_err(|_| TransportError::Closed)?;
        self.open = true;
        Ok(())
    }

    fn emit(&mut self, event: ClientEvent) -> Result<(), TransportError> {
        if !self.open {
            return Err(TransportError::Closed);
        }
        let name = event.name();
        self.tx.send(Command::Send(event)).map_err(|_| TransportError::Send {
            event: name,
            message: "connection task stopped".to_owned(),
        })
    }

    fn close(&mut self) {
        if self.open {
            let _ = self.tx.send(Command::Close);
            self.open = false;
        }
    }

    fn is_open(&self) -> bool {
        self.open
    }
}

/// Own the websocket until the command channel closes.
pub async fn run_connection(
    url: String,
    mut commands: mpsc::UnboundedReceiver<Command>,
    events: mpsc::UnboundedSender<AppEvent>,
) {
    let mut stream: Option<WsStream> = None;

    loop {
        tokio::select! {
            cmd = commands.recv() => {
                let Some(cmd) = cmd else { break };
                match cmd {
                    Command::Connect => {
                        if stream.is_some() {
                            continue;
                        }
                        match connect_async(url.as_str()).await {
                            Ok((ws, _)) => {
                                info!(%url, "transport: connected");
                                stream = Some(ws);
                            }
                            Err(e) => {
                                warn!(%url, error = %e, "transport: connect failed");
                                let _ = events.send(AppEvent::ConnectionFailed(e.to_string()));
                            }
                        }
                    }
                    Command::Send(event) => {
                        let Some(ws) = stream.as_mut() else {
                            debug!(event = event.name(), "transport: dropped event, not connected");
                            continue;
                        };
                        if let Err(e) = send_event(ws, &event).await {
                            warn!(event = event.name(), error = %e, "transport: send failed");
                        }
                    }
                    Command::Close => {
                        if let Some(mut ws) = stream.take() {
                            let _ = ws.close(None).await;
                            info!("transport: closed");
                        }
                    }
                }
            }
            msg = next_message(&mut stream) => {
                match msg {
                    Some(Ok(Message::Text(text))) => match frames::decode::<ServerEvent>(text.as_str()) {
                        Ok(ServerEvent::MessageReceived(payload)) => {
                            let _ = events.send(AppEvent::Inbound(payload));
                        }
                        Err(e) => warn!(error = %e, "transport: invalid inbound event"),
                    },
                    Some(Ok(Message::Close(_))) | None => {
                        stream = None;
                        let _ = events.send(AppEvent::ConnectionClosed);
                    }
                    Some(Ok(_)) => {}
                    Some(Err(e)) => {
                        warn!(error = %e, "transport: recv failed");
                        stream = None;
                        let _ = events.send(AppEvent::ConnectionClosed);
                    }
                }
            }
        }
    }
}

async fn send_event(ws: &mut WsStream, event: &ClientEvent) -> Result<(), TransportError> {
    let text = frames::encode(event)
        .map_err(|e| TransportError::Send { event: event.name(), message: e.to_string() })?;
    ws.send(Message::Text(text.into()))
        .await
        .map_err(|e| TransportError::Send { event: event.name(), message: e.to_string() })
}

/// Next frame from the socket, or never when disconnected.
async fn next_message(
    stream: &mut Option<WsStream>,
) -> Option<Result<Message, tokio_tungstenite::tungstenite::Error>> {
    match stream.as_mut() {
        Some(ws) => ws.next().await,
        None => std::future::pending().await,
    }
}
