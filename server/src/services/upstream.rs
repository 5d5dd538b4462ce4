//! Upstream chat server connection.
//!
//! DESIGN
//! ======
//! Each joined client gets its own upstream websocket. The write half stays
//! with the route handler; a reader task decodes inbound text frames and
//! hands them over an mpsc channel, finishing with [`UpstreamEvent::Closed`].
//! Dropping the link aborts the reader.

#[cfg(test)]
#[path = "upstream_test.rs"]
mod tests;

use frames::upstream::UpstreamMessage;
use futures::stream::{SplitSink, SplitStream};
use futures::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};
use tracing::{debug, warn};

use crate::error::RelayError;

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

const UPSTREAM_BUFFER: usize = 256;

/// Something the upstream reader observed.
#[derive(Debug, PartialEq, Eq)]
pub enum UpstreamEvent {
    Message(UpstreamMessage),
    Closed,
}

pub struct UpstreamLink {
    sink: SplitSink<WsStream, Message>,
    reader: JoinHandle<()>,
}

impl UpstreamLink {
    /// Open a websocket to `url` and start the reader task.
    ///
    /// # Errors
    ///
    /// Returns [`RelayError::UpstreamConnect`] if the handshake fails.
    pub async fn connect(url: &str) -> Result<(Self, mpsc::Receiver<UpstreamEvent>), RelayError> {
        let (ws, _) = connect_async(url)
            .await
            .map_err(|e| RelayError::UpstreamConnect(Box::new(e)))?;
        let (sink, stream) = ws.split();
        let (tx, rx) = mpsc::channel(UPSTREAM_BUFFER);
        let reader = tokio::spawn(read_upstream(stream, tx));
        Ok((Self { sink, reader }, rx))
    }

    /// Encode and write one message.
    ///
    /// # Errors
    ///
    /// Returns [`RelayError::UpstreamSend`] if the socket rejects the write.
    pub async fn send(&mut self, msg: &UpstreamMessage) -> Result<(), RelayError> {
        let text = frames::encode(msg)?;
        self.sink
            .send(Message::Text(text.into()))
            .await
            .map_err(|e| RelayError::UpstreamSend(Box::new(e)))
    }

    /// Send a close frame. The reader is aborted when the link drops.
    pub async fn close(mut self) {
        if let Err(e) = self.sink.close().await {
            debug!(error = %e, "upstream: close failed");
        }
    }
}

impl Drop for UpstreamLink {
    fn drop(&mut self) {
        self.reader.abort();
    }
}

async fn read_upstream(mut stream: SplitStream<WsStream>, tx: mpsc::Sender<UpstreamEvent>) {
    while let Some(msg) = stream.next().await {
        match msg {
            Ok(Message::Text(text)) => match frames::decode::<UpstreamMessage>(text.as_str()) {
                Ok(decoded) => {
                    if tx.send(UpstreamEvent::Message(decoded)).await.is_err() {
                        return;
                    }
                }
                Err(e) => warn!(error = %e, "upstream: invalid message"),
            },
            Ok(Message::Close(_)) => break,
            Ok(_) => {}
            Err(e) => {
                warn!(error = %e, "upstream: recv failed");
                break;
            }
        }
    }
    let _ = tx.send(UpstreamEvent::Closed).await;
}
