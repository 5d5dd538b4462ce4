//! Controller errors.

use crate::net::TransportError;

/// Errors surfaced by [`crate::ChatController`] operations.
///
/// None of these are fatal: the controller stays usable after every one.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// Username or room was empty after trimming. No network call was made.
    #[error("{field} is required")]
    Validation { field: &'static str },

    /// Login was submitted after the session had already joined.
    #[error("already joined room {room}")]
    AlreadyJoined { room: String },

    /// Input arrived before the login → chat transition.
    #[error("not in a room yet")]
    NotJoined,

    /// The transport rejected an outbound event.
    #[error(transparent)]
    Transport(#[from] TransportError),
}

impl ClientError {
    /// Grepable code for logs and status lines.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Validation { .. } => "E_VALIDATION",
            Self::AlreadyJoined { .. } => "E_ALREADY_JOINED",
            Self::NotJoined => "E_NOT_JOINED",
            Self::Transport(_) => "E_TRANSPORT",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_message_names_the_field() {
        let err = ClientError::Validation { field: "room" };
        assert_eq!(err.to_string(), "room is required");
        assert_eq!(err.error_code(), "E_VALIDATION");
    }

    #[test]
    fn transport_error_is_transparent() {
        let err = ClientError::from(TransportError::Closed);
        assert_eq!(err.to_string(), TransportError::Closed.to_string());
        assert_eq!(err.error_code(), "E_TRANSPORT");
    }
}
