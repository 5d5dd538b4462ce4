//! Translation between client events and the upstream wire.
//!
//! DESIGN
//! ======
//! Handlers here are pure protocol logic. They validate, update the session
//! identity and cipher, and return an [`Outcome`] or a client-facing payload.
//! The websocket route owns the sockets and applies the result.

#[cfg(test)]
#[path = "relay_test.rs"]
mod tests;

use std::path::Path;

use frames::upstream::{UpstreamKind, UpstreamMessage};
use frames::{CONFLICT_CODE, ClientEvent, MessagePayload};
use tracing::debug;

use crate::error::RelayError;
use crate::services::crypto::SessionCipher;
use crate::services::media;
use crate::state::SessionInfo;

/// What the route should do with one client event.
#[derive(Debug, PartialEq, Eq)]
pub enum Outcome {
    /// Open a fresh upstream link, replacing any previous one, then send this `JOIN_ROOM`.
    Join(UpstreamMessage),
    /// Send over the existing upstream link.
    Forward(UpstreamMessage),
    /// Close the upstream link and the client socket.
    Disconnect,
}

/// Map a client event to an [`Outcome`], updating `session` on join and rename.
///
/// Room messages always carry the joined identity, not the names in the event.
/// Every `JOIN_ROOM` announces the relay public key; a join resets `cipher`
/// because the fresh link runs its own handshake.
///
/// # Errors
///
/// Returns [`RelayError::NotJoined`] for room traffic before a join,
/// [`RelayError::Media`] when a `/media` file cannot be read, and
/// [`RelayError::Crypto`] when chat text cannot be encrypted.
pub async fn handle_client_event(
    event: ClientEvent,
    session: &mut Option<SessionInfo>,
    cipher: &mut SessionCipher,
) -> Result<Outcome, RelayError> {
    match event {
        ClientEvent::Join { room, username } => {
            cipher.reset();
            let join = UpstreamMessage::join(&username, &room).with_public_key(cipher.public_pem());
            *session = Some(SessionInfo { username, room });
            Ok(Outcome::Join(join))
        }
        ClientEvent::SendMessage { message, .. } => {
            let current = session.as_ref().ok_or(RelayError::NotJoined)?;
            if let Some(path) = media::parse_media_command(&message) {
                let (filename, bytes) = media::read_media(path).await?;
                debug!(%filename, size = bytes.len(), "relay: forwarding media");
                return Ok(Outcome::Forward(UpstreamMessage::media(&current.username, &current.room, &filename, &bytes)));
            }
            let body = cipher.seal(&message)?;
            Ok(Outcome::Forward(UpstreamMessage::chat(&current.username, &current.room, &body)))
        }
        ClientEvent::UpdateUsername { username } => {
            let current = session.as_mut().ok_or(RelayError::NotJoined)?;
            current.username = username;
            let join = UpstreamMessage::join(&current.username, &current.room).with_public_key(cipher.public_pem());
            Ok(Outcome::Forward(join))
        }
        ClientEvent::Disconnect => Ok(Outcome::Disconnect),
    }
}

/// Map one upstream message to the payload the client should see, if any.
///
/// The first non-conflict system message carrying keys completes the
/// handshake. User messages are decrypted once it has. Media bodies are
/// written under `media_dir` and announced as a chat line.
///
/// # Errors
///
/// Returns codec, crypto or key format errors for malformed bodies and
/// handshakes, and [`RelayError::Media`] when a received file cannot be saved.
pub async fn handle_upstream(
    msg: UpstreamMessage,
    cipher: &mut SessionCipher,
    media_dir: &Path,
) -> Result<Option<MessagePayload>, RelayError> {
    match msg.kind {
        UpstreamKind::SystemMessage => {
            if msg.code != CONFLICT_CODE && cipher.accept_handshake(&msg)? {
                debug!(room = ?msg.room, "relay: room keys installed");
            }
            Ok(Some(msg.system_payload()))
        }
        UpstreamKind::UserMessage => {
            if msg.message.is_empty() {
                return Ok(None);
            }
            let text = cipher.open(msg.decode_body()?)?;
            Ok(Some(msg.chat_payload(text)))
        }
        UpstreamKind::MediaMessage => {
            let filename = msg.filename.clone().unwrap_or_else(|| "media.bin".to_owned());
            let bytes = msg.decode_body()?;
            let saved = media::save_media(media_dir, &filename, &bytes).await?;
            Ok(Some(msg.chat_payload(format!("[media] {filename} saved to {}", saved.display()))))
        }
        UpstreamKind::JoinRoom | UpstreamKind::ChatMessage => {
            debug!(kind = ?msg.kind, "relay: ignoring request-type message from upstream");
            Ok(None)
        }
    }
}
