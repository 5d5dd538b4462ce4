#[cfg(test)]
#[path = "notification_test.rs"]
mod notification_test;

use std::time::Duration;

/// How long a notification stays visible.
pub const NOTIFICATION_TTL: Duration = Duration::from_millis(5000);

/// Identifies one `show` call. Only the latest handle can hide the banner.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct NotificationHandle(u64);

impl NotificationHandle {
    #[must_use]
    pub fn id(self) -> u64 {
        self.0
    }
}

/// The single notification banner.
#[derive(Clone, Debug, Default)]
pub struct Notification {
    visible: bool,
    text: String,
    generation: u64,
}

impl Notification {
    /// Show `text`, replacing any current notification.
    ///
    /// Handles returned by earlier calls become stale.
    pub fn show(&mut self, text: impl Into<String>) -> NotificationHandle {
        self.generation = self.generation.wrapping_add(1);
        self.visible = true;
        self.text = text.into();
        NotificationHandle(self.generation)
    }

    /// Hide the notification if `handle` is still current.
    ///
    /// Returns `true` if the banner was hidden by this call.
    pub fn expire(&mut self, handle: NotificationHandle) -> bool {
        if handle.0 != self.generation || !self.visible {
            return false;
        }
        self.visible = false;
        self.text.clear();
        true
    }

    #[must_use]
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }
}
