//! Envelope spoken between the relay and the upstream chat server.
//!
//! Every message is a flat JSON object tagged by an upper-case `type`.
//! Chat text and media bytes are hex-encoded into `message`; system notices
//! carry plain text. Once the room hands over its key pair, chat bodies are
//! RSA ciphertext before hex encoding; that layer lives in the relay.

use serde::{Deserialize, Serialize};

use crate::{CodecError, MessagePayload, OK_CODE};

/// Upper-case spelling of a system message, accepted on both wires.
pub const SYSTEM_MESSAGE: &str = "SYSTEM_MESSAGE";

/// Message discriminator on the upstream wire.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UpstreamKind {
    JoinRoom,
    ChatMessage,
    MediaMessage,
    SystemMessage,
    UserMessage,
}

/// One message on the upstream wire.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpstreamMessage {
    #[serde(rename = "type")]
    pub kind: UpstreamKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub room: Option<String>,
    #[serde(default)]
    pub message: String,
    #[serde(default = "ok_code")]
    pub code: u16,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
    /// PEM key. Plain on `JOIN_ROOM`; hex of the encrypted PEM on the
    /// handshake `SYSTEM_MESSAGE`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub public_key: Option<String>,
    /// Hex of the encrypted room private key, handshake only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub private_key: Option<String>,
}

fn ok_code() -> u16 {
    OK_CODE
}

impl UpstreamMessage {
    fn new(kind: UpstreamKind, username: &str, room: &str, message: String) -> Self {
        Self {
            kind,
            username: Some(username.to_owned()),
            room: Some(room.to_owned()),
            message,
            code: OK_CODE,
            color: None,
            filename: None,
            public_key: None,
            private_key: None,
        }
    }

    /// `JOIN_ROOM` request. Also used to rename an existing session.
    #[must_use]
    pub fn join(username: &str, room: &str) -> Self {
        Self::new(UpstreamKind::JoinRoom, username, room, String::new())
    }

    /// Attach the sender's PEM public key to a `JOIN_ROOM`.
    #[must_use]
    pub fn with_public_key(mut self, pem: impl Into<String>) -> Self {
        self.public_key = Some(pem.into());
        self
    }

    /// `CHAT_MESSAGE` request. `body` is the (possibly encrypted) text, hex-encoded here.
    #[must_use]
    pub fn chat(username: &str, room: &str, body: &[u8]) -> Self {
        Self::new(UpstreamKind::ChatMessage, username, room, hex::encode(body))
    }

    /// `MEDIA_MESSAGE` request with hex-encoded file bytes.
    #[must_use]
    pub fn media(username: &str, room: &str, filename: &str, bytes: &[u8]) -> Self {
        let mut msg = Self::new(UpstreamKind::MediaMessage, username, room, hex::encode(bytes));
        msg.filename = Some(filename.to_owned());
        msg
    }

    /// Hex-decode `message` into raw bytes.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::Hex`] for a malformed body.
    pub fn decode_body(&self) -> Result<Vec<u8>, CodecError> {
        Ok(hex::decode(&self.message)?)
    }

    /// Hex-encoded `(public_key, private_key)` pair carried by a handshake
    /// `SYSTEM_MESSAGE`, if both are present.
    #[must_use]
    pub fn handshake_keys(&self) -> Option<(&str, &str)> {
        Some((self.public_key.as_deref()?, self.private_key.as_deref()?))
    }

    /// Client-facing payload for a `SYSTEM_MESSAGE`. Plain text, code and color kept.
    #[must_use]
    pub fn system_payload(&self) -> MessagePayload {
        MessagePayload::system(self.message.clone(), Some(self.code))
            .with_username(self.username.clone())
            .with_room(self.room.clone())
            .with_color(self.color.clone())
    }

    /// Client-facing chat payload attributed to this message's sender.
    #[must_use]
    pub fn chat_payload(&self, text: impl Into<String>) -> MessagePayload {
        MessagePayload::chat(self.username.clone().unwrap_or_default(), text)
            .with_room(self.room.clone())
            .with_color(self.color.clone())
    }
}

#[cfg(test)]
#[path = "upstream_test.rs"]
mod tests;
