//! UI and timer seams driven by the controller.

use std::time::Duration;

use crate::error::ClientError;
use crate::state::chat::ChatMessage;
use crate::state::notification::NotificationHandle;
use crate::state::ui::UiMode;

/// Rendering surface: login form, message list, input field, notification banner.
///
/// Implementations render text verbatim. Message bodies are not escaped.
pub trait ChatView {
    /// Show exactly one of the two screens.
    fn set_mode(&mut self, mode: UiMode);

    /// Append one node to the message list.
    fn append_message(&mut self, message: &ChatMessage);

    /// Scroll the message list so the newest node is visible.
    fn scroll_to_latest(&mut self);

    fn show_notification(&mut self, text: &str);

    fn hide_notification(&mut self);

    /// Clear the message input field.
    fn clear_input(&mut self);

    /// Surface a local error (validation, send failure) to the user.
    fn report_error(&mut self, error: &ClientError);
}

/// One-shot timer service for notification expiry.
///
/// When `after` elapses the host must call
/// [`crate::ChatController::expire_notification`] with the same handle.
pub trait Scheduler {
    fn schedule(&mut self, handle: NotificationHandle, after: Duration);
}

/// What caused an input submission.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InputTrigger {
    /// Key press in the input field. Only plain Enter sends.
    Enter { shift: bool },
    /// Send button activation.
    SendButton,
}

impl InputTrigger {
    #[must_use]
    pub fn sends(self) -> bool {
        match self {
            Self::Enter { shift } => !shift,
            Self::SendButton => true,
        }
    }
}
