//! Transport seam between the controller and the network.
//!
//! DESIGN
//! ======
//! The controller is synchronous and single-threaded, so a transport only
//! queues work: `connect` and `emit` return as soon as the request is
//! accepted. Delivery, reconnection, and the socket itself belong to the host.

use frames::ClientEvent;

/// Errors reported by a [`Transport`].
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// The connection is closed (or was never opened).
    #[error("transport is closed")]
    Closed,
    /// The event could not be serialized or queued.
    #[error("failed to send {event}: {message}")]
    Send { event: &'static str, message: String },
}

/// Full-duplex event connection to the chat server.
pub trait Transport {
    /// Open the connection if it is not already open.
    ///
    /// # Errors
    ///
    /// Returns an error when the host cannot start a connection.
    fn connect(&mut self) -> Result<(), TransportError>;

    /// Queue one outbound event.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::Closed`] when no connection is open.
    fn emit(&mut self, event: ClientEvent) -> Result<(), TransportError>;

    /// Close the connection. Idempotent.
    fn close(&mut self);

    fn is_open(&self) -> bool;
}
