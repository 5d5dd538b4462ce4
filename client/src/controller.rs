//! Chat client controller.
//!
//! DESIGN
//! ======
//! One controller instance owns the whole session: identity, phase, and the
//! notification banner. Hosts call it from a single task for every user
//! action, inbound payload, and timer expiry, so no state is shared.
//!
//! LIFECYCLE
//! =========
//! 1. `submit_login` validates the form, opens the transport, sends `join`
//! 2. First successful system message → chat screen, input enabled, and the
//!    identity it names adopted
//! 3. A 409 system message shows a 5 s notification and keeps the form up
//! 4. Any other 4xx/5xx system message is rendered and keeps the form up
//! 5. `handle_input` sends chat lines with an optimistic local echo
//! 6. `teardown` sends `disconnect`, closes the transport, and shows the form

#[cfg(test)]
#[path = "controller_test.rs"]
mod controller_test;

use frames::{ClientEvent, InboundEvent, MessagePayload};
use tracing::{debug, info, warn};

use crate::error::ClientError;
use crate::net::Transport;
use crate::state::chat::ChatMessage;
use crate::state::notification::{NOTIFICATION_TTL, Notification, NotificationHandle};
use crate::state::session::{Phase, Session, validate_login};
use crate::state::ui::UiMode;
use crate::view::{ChatView, InputTrigger, Scheduler};

/// Drives one chat session against a transport, a view, and a timer service.
pub struct ChatController<T, V, S> {
    transport: T,
    view: V,
    scheduler: S,
    session: Option<Session>,
    phase: Phase,
    notification: Notification,
}

impl<T: Transport, V: ChatView, S: Scheduler> ChatController<T, V, S> {
    /// Create a controller and show the login screen.
    pub fn new(transport: T, mut view: V, scheduler: S) -> Self {
        view.set_mode(UiMode::Login);
        Self { transport, view, scheduler, session: None, phase: Phase::LoggedOut, notification: Notification::default() }
    }

    // =========================================================================
    // ACCESSORS
    // =========================================================================

    #[must_use]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    #[must_use]
    pub fn mode(&self) -> UiMode {
        self.phase.ui_mode()
    }

    #[must_use]
    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    #[must_use]
    pub fn notification(&self) -> &Notification {
        &self.notification
    }

    #[must_use]
    pub fn transport(&self) -> &T {
        &self.transport
    }

    #[must_use]
    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut V {
        &mut self.view
    }

    // =========================================================================
    // OUTBOUND
    // =========================================================================

    /// Handle a login form submission.
    ///
    /// Both fields are trimmed. If either is empty the transport is closed and
    /// nothing is sent. Otherwise the transport is opened and a `join` request
    /// is emitted. Resubmitting while awaiting the join (for example after a
    /// 409) sends a fresh `join`.
    ///
    /// # Errors
    ///
    /// - [`ClientError::Validation`] for an empty field
    /// - [`ClientError::AlreadyJoined`] once the chat screen is showing
    /// - [`ClientError::Transport`] if the connection cannot be used
    pub fn submit_login(&mut self, username: &str, room: &str) -> Result<(), ClientError> {
        if self.phase == Phase::Chatting {
            let room = self.session.as_ref().map(|s| s.room.clone()).unwrap_or_default();
            return Err(self.fail(ClientError::AlreadyJoined { room }));
        }

        let (username, room) = match validate_login(username, room) {
            Ok(fields) => fields,
            Err(field) => {
                self.transport.close();
                warn!(field, "client: login rejected, field empty");
                return Err(self.fail(ClientError::Validation { field }));
            }
        };

        if let Err(e) = self.transport.connect() {
            return Err(self.fail(e.into()));
        }
        let join = ClientEvent::Join { room: room.to_owned(), username: username.to_owned() };
        if let Err(e) = self.transport.emit(join) {
            return Err(self.fail(e.into()));
        }

        info!(%username, %room, "client: join requested");
        self.session = Some(Session::new(username, room));
        self.phase = Phase::AwaitingJoin;
        Ok(())
    }

    /// Send `text` to the room and render it locally as an own message.
    ///
    /// The local echo happens whether or not the transport accepts the event.
    ///
    /// # Errors
    ///
    /// - [`ClientError::NotJoined`] before the chat screen is showing
    /// - [`ClientError::Transport`] if the event could not be queued
    pub fn send_message(&mut self, text: &str) -> Result<(), ClientError> {
        let identity = self.session.as_ref().map(|s| (s.username.clone(), s.room.clone()));
        let Some((username, room)) = identity.filter(|_| self.phase.accepts_input()) else {
            return Err(self.fail(ClientError::NotJoined));
        };

        let event = ClientEvent::SendMessage { room, username: username.clone(), message: text.to_owned() };
        let sent = self.transport.emit(event);
        self.render(ChatMessage::own(username, text));

        sent.map_err(|e| {
            warn!(error = %e, "client: send_message not delivered");
            self.fail(e.into())
        })
    }

    /// Handle an input submission from the message field or send button.
    ///
    /// Returns `Ok(true)` when a message was sent. Input before the chat
    /// screen, Shift+Enter, and whitespace-only content are ignored.
    ///
    /// # Errors
    ///
    /// Propagates [`ChatController::send_message`] errors. The input field is
    /// cleared either way.
    pub fn handle_input(&mut self, trigger: InputTrigger, content: &str) -> Result<bool, ClientError> {
        if !self.phase.accepts_input() {
            debug!(phase = ?self.phase, "client: input ignored before join");
            return Ok(false);
        }
        if !trigger.sends() || content.trim().is_empty() {
            return Ok(false);
        }

        let text = match trigger {
            InputTrigger::Enter { .. } => content,
            InputTrigger::SendButton => content.trim(),
        };
        let result = self.send_message(text);
        self.view.clear_input();
        result.map(|()| true)
    }

    /// Rename the joined session.
    ///
    /// # Errors
    ///
    /// - [`ClientError::NotJoined`] before the chat screen is showing
    /// - [`ClientError::Validation`] for an empty name
    /// - [`ClientError::Transport`] if the event could not be queued
    pub fn update_username(&mut self, username: &str) -> Result<(), ClientError> {
        if !self.phase.accepts_input() {
            return Err(self.fail(ClientError::NotJoined));
        }
        let username = username.trim();
        if username.is_empty() {
            return Err(self.fail(ClientError::Validation { field: "username" }));
        }

        if let Err(e) = self.transport.emit(ClientEvent::UpdateUsername { username: username.to_owned() }) {
            return Err(self.fail(e.into()));
        }
        if let Some(session) = self.session.as_mut() {
            info!(from = %session.username, to = %username, "client: username updated");
            session.username = username.to_owned();
        }
        Ok(())
    }

    /// Notify the server of a client-initiated disconnect and close the transport.
    ///
    /// Best effort: a failed `disconnect` is logged and ignored.
    pub fn teardown(&mut self) {
        if self.transport.is_open() {
            if let Err(e) = self.transport.emit(ClientEvent::Disconnect) {
                debug!(error = %e, "client: disconnect not delivered");
            }
            self.transport.close();
        }
        self.session = None;
        if self.phase == Phase::Chatting {
            self.view.set_mode(UiMode::Login);
        }
        self.phase = Phase::LoggedOut;
        info!("client: session torn down");
    }

    // =========================================================================
    // INBOUND
    // =========================================================================

    /// Dispatch a raw `message_received` payload.
    pub fn handle_payload(&mut self, payload: MessagePayload) {
        self.handle_event(payload.into_event());
    }

    /// Dispatch a typed inbound event.
    ///
    /// Only a system message without an error status confirms a pending join.
    pub fn handle_event(&mut self, event: InboundEvent) {
        let conflict = event.is_conflict();
        let error = event.is_error();
        match event {
            InboundEvent::System { message, .. } if conflict => {
                let handle = self.notification.show(message.as_str());
                self.view.show_notification(&message);
                self.scheduler.schedule(handle, NOTIFICATION_TTL);
                info!(handle = handle.id(), "client: conflict notification shown");
            }
            InboundEvent::System { message, code, .. } if error => {
                warn!(?code, phase = ?self.phase, %message, "client: server reported an error");
                self.render(ChatMessage::system(message));
            }
            InboundEvent::System { message, username, room, .. } => {
                self.render(ChatMessage::system(message));
                if self.phase == Phase::AwaitingJoin {
                    self.enter_chat(username, room);
                }
            }
            InboundEvent::Chat { username, message } => {
                self.render(ChatMessage::other(username, message));
            }
        }
    }

    /// Hide the notification if `handle` is still the current one.
    pub fn expire_notification(&mut self, handle: NotificationHandle) {
        if self.notification.expire(handle) {
            self.view.hide_notification();
        } else {
            debug!(handle = handle.id(), "client: stale notification timer ignored");
        }
    }

    // =========================================================================
    // INTERNALS
    // =========================================================================

    /// Switch to the chat screen, taking any non-empty identity the server
    /// confirmed over the one submitted.
    fn enter_chat(&mut self, username: Option<String>, room: Option<String>) {
        if let Some(session) = self.session.as_mut() {
            if let Some(username) = username.filter(|u| !u.is_empty()) {
                session.username = username;
            }
            if let Some(room) = room.filter(|r| !r.is_empty()) {
                session.room = room;
            }
            session.joined = true;
            info!(username = %session.username, room = %session.room, "client: joined");
        }
        self.phase = Phase::Chatting;
        self.view.set_mode(UiMode::Chat);
    }

    fn render(&mut self, message: ChatMessage) {
        self.view.append_message(&message);
        self.view.scroll_to_latest();
    }

    fn fail(&mut self, err: ClientError) -> ClientError {
        self.view.report_error(&err);
        err
    }
}
