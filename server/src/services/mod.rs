//! Relay services used by the websocket route.
//!
//! ARCHITECTURE
//! ============
//! Service modules own protocol translation and upstream I/O so the route
//! handler can stay focused on socket plumbing.

pub mod crypto;
pub mod media;
pub mod relay;
pub mod upstream;
