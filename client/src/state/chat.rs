#[cfg(test)]
#[path = "chat_test.rs"]
mod chat_test;

/// Styling class of a rendered message. Does not affect content.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MessageKind {
    /// Sent from this client (local echo).
    Own,
    /// Received from another participant.
    Other,
    /// Session notice from the server.
    System,
}

/// A single rendered chat line. Not retained after rendering.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChatMessage {
    pub sender: String,
    pub text: String,
    pub kind: MessageKind,
}

impl ChatMessage {
    #[must_use]
    pub fn own(sender: impl Into<String>, text: impl Into<String>) -> Self {
        Self { sender: sender.into(), text: text.into(), kind: MessageKind::Own }
    }

    #[must_use]
    pub fn other(sender: impl Into<String>, text: impl Into<String>) -> Self {
        Self { sender: sender.into(), text: text.into(), kind: MessageKind::Other }
    }

    #[must_use]
    pub fn system(text: impl Into<String>) -> Self {
        Self { sender: String::new(), text: text.into(), kind: MessageKind::System }
    }

    /// Text as it appears in the message list.
    ///
    /// Messages from others are prefixed `"{sender}: "`; own and system
    /// messages show the bare text.
    #[must_use]
    pub fn display_text(&self) -> String {
        match self.kind {
            MessageKind::Other => format!("{}: {}", self.sender, self.text),
            MessageKind::Own | MessageKind::System => self.text.clone(),
        }
    }
}
