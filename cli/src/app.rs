//! Terminal app loop.
//!
//! SYSTEM CONTEXT
//! ==============
//! Three producers feed one unbounded `AppEvent` channel: a stdin reader
//! thread, the websocket connection task, and notification timers. The loop
//! hands each event to the single `ChatController`, so controller state is
//! never touched concurrently.

#[cfg(test)]
#[path = "app_test.rs"]
mod tests;

use std::io::{self, BufRead, Write};
use std::time::Duration;

use client::ChatController;
use client::state::notification::NotificationHandle;
use client::state::session::Phase;
use client::state::ui::UiMode;
use client::view::{InputTrigger, Scheduler};
use frames::MessagePayload;
use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::CliError;
use crate::input::{ChatLine, LoginForm, parse_chat_line};
use crate::terminal::TerminalView;
use crate::transport::{ChannelTransport, run_connection};

/// Everything the app loop reacts to.
#[derive(Debug)]
pub enum AppEvent {
    /// One line typed on stdin.
    Line(String),
    /// stdin reached EOF.
    InputClosed,
    /// Ctrl-C.
    Interrupt,
    Inbound(MessagePayload),
    NotificationExpired(NotificationHandle),
    ConnectionClosed,
    ConnectionFailed(String),
}

/// Whether the loop keeps running after an event.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// [`Scheduler`] backed by `tokio::time::sleep`.
pub struct TokioScheduler {
    events: mpsc::UnboundedSender<AppEvent>,
}

impl TokioScheduler {
    pub fn new(events: mpsc::UnboundedSender<AppEvent>) -> Self {
        Self { events }
    }
}

impl Scheduler for TokioScheduler {
    fn schedule(&mut self, handle: NotificationHandle, after: Duration) {
        let events = self.events.clone();
        tokio::spawn(async move {
            tokio::time::sleep(after).await;
            let _ = events.send(AppEvent::NotificationExpired(handle));
        });
    }
}

/// Controller plus the terminal-only login form.
pub struct App<W: Write> {
    controller: ChatController<ChannelTransport, TerminalView<W>, TokioScheduler>,
    login: LoginForm,
}

impl<W: Write> App<W> {
    pub fn new(transport: ChannelTransport, view: TerminalView<W>, scheduler: TokioScheduler) -> Self {
        Self { controller: ChatController::new(transport, view, scheduler), login: LoginForm::default() }
    }

    /// Submit pre-filled credentials, or prompt for the first login field.
    pub fn start(&mut self, username: Option<String>, room: Option<String>) {
        match (username, room) {
            (Some(username), Some(room)) => {
                if self.controller.submit_login(&username, &room).is_err() {
                    self.prompt_login();
                }
            }
            (Some(username), None) => {
                self.login.feed(&username);
                self.prompt_login();
            }
            (None, Some(room)) => {
                self.login = LoginForm::with_room(room);
                self.prompt_login();
            }
            (None, None) => self.prompt_login(),
        }
    }

    pub fn handle(&mut self, event: AppEvent) -> Flow {
        match event {
            AppEvent::Line(line) => return self.handle_line(&line),
            AppEvent::Inbound(payload) => {
                let awaiting = self.controller.phase() == Phase::AwaitingJoin;
                self.controller.handle_payload(payload);
                // A conflict or error left the join pending; ask again.
                if awaiting && self.controller.mode() == UiMode::Login {
                    self.prompt_login();
                }
            }
            AppEvent::NotificationExpired(handle) => self.controller.expire_notification(handle),
            AppEvent::ConnectionClosed => {
                self.controller.view_mut().status("connection closed by server");
                return self.quit();
            }
            AppEvent::ConnectionFailed(reason) => {
                self.controller.view_mut().status(&format!("could not connect: {reason}"));
                return self.quit();
            }
            AppEvent::InputClosed | AppEvent::Interrupt => return self.quit(),
        }
        Flow::Continue
    }

    #[cfg(test)]
    pub fn controller(&self) -> &ChatController<ChannelTransport, TerminalView<W>, TokioScheduler> {
        &self.controller
    }

    fn handle_line(&mut self, line: &str) -> Flow {
        if self.controller.mode() == UiMode::Login {
            if let Some((username, room)) = self.login.feed(line) {
                if self.controller.submit_login(&username, &room).is_err() {
                    self.prompt_login();
                }
            } else {
                self.prompt_login();
            }
            return Flow::Continue;
        }

        // Errors are already reported through the view.
        match parse_chat_line(line) {
            ChatLine::Quit => return self.quit(),
            ChatLine::Rename(username) => {
                let _ = self.controller.update_username(username);
            }
            ChatLine::Say(text) => {
                let _ = self.controller.handle_input(InputTrigger::Enter { shift: false }, text);
            }
        }
        Flow::Continue
    }

    fn prompt_login(&mut self) {
        let prompt = self.login.prompt();
        self.controller.view_mut().prompt(prompt);
    }

    fn quit(&mut self) -> Flow {
        self.controller.teardown();
        Flow::Quit
    }
}

/// Run the terminal client until the user quits or the connection ends.
///
/// # Errors
///
/// Returns [`CliError::Task`] if the connection task panicked.
pub async fn run(url: String, username: Option<String>, room: Option<String>) -> Result<(), CliError> {
    let (event_tx, mut event_rx) = mpsc::unbounded_channel::<AppEvent>();
    let (cmd_tx, cmd_rx) = mpsc::unbounded_channel();

    let connection = tokio::spawn(run_connection(url, cmd_rx, event_tx.clone()));
    spawn_stdin_reader(event_tx.clone());
    spawn_interrupt_listener(event_tx.clone());

    let mut app = App::new(
        ChannelTransport::new(cmd_tx),
        TerminalView::new(io::stdout()),
        TokioScheduler::new(event_tx),
    );
    app.start(username, room);

    while let Some(event) = event_rx.recv().await {
        debug!(?event, "app: event");
        if app.handle(event) == Flow::Quit {
            break;
        }
    }

    // Dropping the app drops the command sender; the connection task drains
    // the queued disconnect and exits.
    drop(app);
    connection.await?;
    info!("app: exited");
    Ok(())
}

/// Blocking stdin reads live on a plain thread so runtime shutdown never
/// waits on them.
fn spawn_stdin_reader(events: mpsc::UnboundedSender<AppEvent>) {
    std::thread::spawn(move || {
        let stdin = io::stdin();
        for line in stdin.lock().lines() {
            let Ok(line) = line else { break };
            if events.send(AppEvent::Line(line)).is_err() {
                return;
            }
        }
        let _ = events.send(AppEvent::InputClosed);
    });
}

fn spawn_interrupt_listener(events: mpsc::UnboundedSender<AppEvent>) {
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            let _ = events.send(AppEvent::Interrupt);
        }
    });
}
