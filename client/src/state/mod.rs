//! Controller-owned state.
//!
//! DESIGN
//! ======
//! State is split by concern (`session`, `chat`, `notification`, `ui`) so the
//! controller composes small models instead of keeping loose flags.

pub mod chat;
pub mod notification;
pub mod session;
pub mod ui;
