#[cfg(test)]
#[path = "session_test.rs"]
mod session_test;

use super::ui::UiMode;

/// Identity of the current chat session.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Session {
    pub username: String,
    pub room: String,
    /// Set by the first system message without an error status.
    pub joined: bool,
}

impl Session {
    #[must_use]
    pub fn new(username: impl Into<String>, room: impl Into<String>) -> Self {
        Self { username: username.into(), room: room.into(), joined: false }
    }
}

/// Position in the per-session state machine.
///
/// `LoggedOut → AwaitingJoin → Chatting`. `Chatting` is terminal until teardown.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Phase {
    #[default]
    LoggedOut,
    /// Join request sent, no successful system message yet.
    AwaitingJoin,
    Chatting,
}

impl Phase {
    /// Screen shown while in this phase.
    #[must_use]
    pub fn ui_mode(self) -> UiMode {
        match self {
            Self::LoggedOut | Self::AwaitingJoin => UiMode::Login,
            Self::Chatting => UiMode::Chat,
        }
    }

    /// Whether message input is accepted.
    #[must_use]
    pub fn accepts_input(self) -> bool {
        self == Self::Chatting
    }
}

/// Trim both login fields and reject empties.
///
/// # Errors
///
/// Returns the name of the first empty field.
pub fn validate_login<'a>(username: &'a str, room: &'a str) -> Result<(&'a str, &'a str), &'static str> {
    let username = username.trim();
    let room = room.trim();
    if username.is_empty() {
        return Err("username");
    }
    if room.is_empty() {
        return Err("room");
    }
    Ok((username, room))
}
