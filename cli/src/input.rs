//! Line-oriented input: the login form and chat-line commands.

#[cfg(test)]
#[path = "input_test.rs"]
mod tests;

/// Which login field the next line fills.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoginStep {
    Username,
    Room,
}

/// Two-field login form filled one line at a time.
///
/// A room given up front stays filled across attempts, so only the username
/// is asked for.
#[derive(Debug, Default)]
pub struct LoginForm {
    username: Option<String>,
    room: Option<String>,
}

impl LoginForm {
    #[must_use]
    pub fn with_room(room: impl Into<String>) -> Self {
        Self { username: None, room: Some(room.into()) }
    }

    #[must_use]
    pub fn step(&self) -> LoginStep {
        if self.username.is_some() { LoginStep::Room } else { LoginStep::Username }
    }

    #[must_use]
    pub fn prompt(&self) -> &'static str {
        match self.step() {
            LoginStep::Username => "username: ",
            LoginStep::Room => "room: ",
        }
    }

    /// Record one line. Returns `(username, room)` once both are known and
    /// clears the typed fields for the next attempt.
    ///
    /// Lines are passed through untrimmed; validation belongs to the controller.
    pub fn feed(&mut self, line: &str) -> Option<(String, String)> {
        match (self.username.take(), &self.room) {
            (Some(username), _) => Some((username, line.to_owned())),
            (None, Some(room)) => Some((line.to_owned(), room.clone())),
            (None, None) => {
                self.username = Some(line.to_owned());
                None
            }
        }
    }
}

/// A line typed on the chat screen.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChatLine<'a> {
    /// Ordinary message text, including `/media <path>`.
    Say(&'a str),
    /// `/name <new>`.
    Rename(&'a str),
    /// `/quit`.
    Quit,
}

#[must_use]
pub fn parse_chat_line(line: &str) -> ChatLine<'_> {
    let trimmed = line.trim();
    if trimmed == "/quit" {
        return ChatLine::Quit;
    }
    if trimmed == "/name" {
        return ChatLine::Rename("");
    }
    if let Some(rest) = trimmed.strip_prefix("/name ") {
        return ChatLine::Rename(rest.trim());
    }
    ChatLine::Say(line)
}
