//! # client
//!
//! Chat client controller: connection lifecycle, outbound dispatch, inbound
//! rendering, and the login → chat screen transition.
//!
//! The crate performs no I/O. Hosts plug in a [`net::Transport`], a
//! [`view::ChatView`], and a [`view::Scheduler`] and feed the controller
//! user input, inbound payloads, and timer expiries from a single task.

pub mod controller;
pub mod error;
pub mod net;
pub mod state;
pub mod view;

pub use controller::ChatController;
pub use error::ClientError;
