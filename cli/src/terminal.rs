//! Line-based terminal rendering of the chat screens.

#[cfg(test)]
#[path = "terminal_test.rs"]
mod tests;

use std::fmt;
use std::io::Write;

use client::ClientError;
use client::state::chat::{ChatMessage, MessageKind};
use client::state::ui::UiMode;
use client::view::ChatView;
use tracing::debug;

/// Renders the controller's view calls as text lines on any writer.
///
/// Message bodies are written verbatim, including control sequences.
pub struct TerminalView<W: Write> {
    out: W,
    mode: UiMode,
    banner: Option<String>,
}

impl<W: Write> TerminalView<W> {
    pub fn new(out: W) -> Self {
        Self { out, mode: UiMode::Login, banner: None }
    }

    #[must_use]
    pub fn mode(&self) -> UiMode {
        self.mode
    }

    /// Currently visible notification text.
    #[must_use]
    pub fn banner(&self) -> Option<&str> {
        self.banner.as_deref()
    }

    #[cfg(test)]
    pub fn writer(&self) -> &W {
        &self.out
    }

    /// Print a login form prompt without a trailing newline.
    pub fn prompt(&mut self, text: &str) {
        self.write(format_args!("{text}"));
        self.flush();
    }

    /// Print an informational line outside the message list.
    pub fn status(&mut self, text: &str) {
        self.line(format_args!("-- {text}"));
    }

    fn line(&mut self, args: fmt::Arguments<'_>) {
        if let Err(e) = writeln!(self.out, "{args}") {
            debug!(error = %e, "terminal: write failed");
        }
    }

    fn write(&mut self, args: fmt::Arguments<'_>) {
        if let Err(e) = write!(self.out, "{args}") {
            debug!(error = %e, "terminal: write failed");
        }
    }

    fn flush(&mut self) {
        if let Err(e) = self.out.flush() {
            debug!(error = %e, "terminal: flush failed");
        }
    }
}

impl<W: Write> ChatView for TerminalView<W> {
    fn set_mode(&mut self, mode: UiMode) {
        self.mode = mode;
        match mode {
            UiMode::Login => self.line(format_args!("== roomchat: log in ==")),
            UiMode::Chat => self.line(format_args!("== joined; /name <new> to rename, /quit to leave ==")),
        }
    }

    fn append_message(&mut self, message: &ChatMessage) {
        let text = message.display_text();
        match message.kind {
            MessageKind::Own => self.line(format_args!("you> {text}")),
            MessageKind::Other => self.line(format_args!("{text}")),
            MessageKind::System => self.line(format_args!("* {text}")),
        }
    }

    fn scroll_to_latest(&mut self) {
        self.flush();
    }

    fn show_notification(&mut self, text: &str) {
        self.banner = Some(text.to_owned());
        self.line(format_args!("[!] {text}"));
        self.flush();
    }

    fn hide_notification(&mut self) {
        self.banner = None;
    }

    fn clear_input(&mut self) {
        // stdin lines are consumed as they are read
    }

    fn report_error(&mut self, error: &ClientError) {
        self.line(format_args!("error: {error}"));
        self.flush();
    }
}
