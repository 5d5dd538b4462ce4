//! Shared event model and JSON codec for the realtime chat transport.
//!
//! This crate owns every wire shape used by `client`, `cli`, and `server`.
//! Client-facing events travel as `{"event": <name>, "data": <payload>}` text
//! frames; the relay's upstream protocol lives in [`upstream`].

pub mod upstream;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

// =============================================================================
// CONSTANTS
// =============================================================================

/// Status code attached to a system message when the room already has a
/// participant with the requested username.
pub const CONFLICT_CODE: u16 = 409;

/// Status code carried by ordinary upstream requests.
pub const OK_CODE: u16 = 200;

/// Status code the relay attaches to locally generated errors (bad input).
pub const BAD_REQUEST_CODE: u16 = 400;

/// Status code the relay attaches when the upstream server is unreachable.
pub const BAD_GATEWAY_CODE: u16 = 502;

/// `type` value of a system message on the client-facing wire.
pub const SYSTEM_TYPE: &str = "system";

/// `type` value of an ordinary chat message on the client-facing wire.
pub const CHAT_TYPE: &str = "chat";

// =============================================================================
// ERRORS
// =============================================================================

/// Error returned by the decode helpers in this crate.
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    /// The text could not be parsed as the expected JSON event.
    #[error("failed to decode event json: {0}")]
    Json(#[from] serde_json::Error),
    /// A hex-encoded upstream payload was malformed.
    #[error("invalid hex payload: {0}")]
    Hex(#[from] hex::FromHexError),
    /// A decoded chat payload was not valid UTF-8.
    #[error("payload is not valid utf-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

// =============================================================================
// CLIENT → RELAY
// =============================================================================

/// Events emitted by a chat client.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
pub enum ClientEvent {
    /// Join `room` as `username`.
    Join { room: String, username: String },
    /// Publish a chat line to the room.
    SendMessage {
        room: String,
        username: String,
        message: String,
    },
    /// Re-announce the session under a new name.
    UpdateUsername { username: String },
    /// Client-initiated teardown. Best effort, no reply expected.
    Disconnect,
}

impl ClientEvent {
    /// Wire name of the event, used for logging.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Join { .. } => "join",
            Self::SendMessage { .. } => "send_message",
            Self::UpdateUsername { .. } => "update_username",
            Self::Disconnect => "disconnect",
        }
    }
}

// =============================================================================
// RELAY → CLIENT
// =============================================================================

/// Events pushed to a chat client.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
pub enum ServerEvent {
    MessageReceived(MessagePayload),
}

/// Untyped body of a `message_received` event, exactly as it appears on the wire.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessagePayload {
    /// `"system"` for session notices; anything else is a chat line.
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub room: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<u16>,
    /// Display hint forwarded from the upstream server.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

impl MessagePayload {
    /// Build a system payload.
    #[must_use]
    pub fn system(message: impl Into<String>, code: Option<u16>) -> Self {
        Self { kind: SYSTEM_TYPE.to_owned(), message: message.into(), code, ..Self::default() }
    }

    /// Build a chat payload attributed to `username`.
    #[must_use]
    pub fn chat(username: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind: CHAT_TYPE.to_owned(),
            message: message.into(),
            username: Some(username.into()),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_room(mut self, room: Option<String>) -> Self {
        self.room = room;
        self
    }

    #[must_use]
    pub fn with_username(mut self, username: Option<String>) -> Self {
        self.username = username;
        self
    }

    #[must_use]
    pub fn with_color(mut self, color: Option<String>) -> Self {
        self.color = color;
        self
    }

    /// True when `kind` names a system message in either wire spelling.
    #[must_use]
    pub fn is_system(&self) -> bool {
        self.kind == SYSTEM_TYPE || self.kind == upstream::SYSTEM_MESSAGE
    }

    /// Convert into the typed event the controller dispatches on.
    #[must_use]
    pub fn into_event(self) -> InboundEvent {
        if self.is_system() {
            InboundEvent::System {
                message: self.message,
                username: self.username,
                room: self.room,
                code: self.code,
            }
        } else {
            InboundEvent::Chat { username: self.username.unwrap_or_default(), message: self.message }
        }
    }
}

/// Typed inbound event.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum InboundEvent {
    /// Session notice: join, leave, info, or error.
    System {
        message: String,
        username: Option<String>,
        room: Option<String>,
        code: Option<u16>,
    },
    /// Chat line from another participant (or the server echo of our own).
    Chat { username: String, message: String },
}

impl InboundEvent {
    /// True for a system message reporting a room/username conflict.
    #[must_use]
    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::System { code: Some(CONFLICT_CODE), .. })
    }

    /// True for a system message carrying a 4xx or 5xx status. These report a
    /// failure and never confirm a join.
    #[must_use]
    pub fn is_error(&self) -> bool {
        matches!(self, Self::System { code: Some(code), .. } if *code >= BAD_REQUEST_CODE)
    }
}

// =============================================================================
// CODEC
// =============================================================================

/// Serialize any wire event to a JSON text frame.
///
/// # Errors
///
/// Returns [`CodecError::Json`] if serialization fails. The event types in
/// this crate contain only strings and integers, so this does not happen in
/// practice.
pub fn encode<T: Serialize>(event: &T) -> Result<String, CodecError> {
    Ok(serde_json::to_string(event)?)
}

/// Parse a JSON text frame into a wire event.
///
/// # Errors
///
/// Returns [`CodecError::Json`] for malformed JSON or an unknown event name.
pub fn decode<T: DeserializeOwned>(text: &str) -> Result<T, CodecError> {
    Ok(serde_json::from_str(text)?)
}

#[cfg(test)]
#[path = "lib_test.rs"]
mod tests;
