//! Router assembly.
//!
//! SYSTEM CONTEXT
//! ==============
//! Chat clients connect to `/ws` and speak the JSON event protocol; each
//! connection is bridged to its own upstream chat server link. `/healthz`
//! reports how many clients are connected and joined.

pub mod ws;

use axum::Router;
use axum::extract::State;
use axum::response::Json;
use axum::routing::get;
use serde_json::{Value, json};
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Relay routes with request tracing.
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/ws", get(ws::handle_ws))
        .route("/healthz", get(healthz))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn healthz(State(state): State<AppState>) -> Json<Value> {
    let (clients, joined) = state.counts().await;
    Json(json!({ "status": "ok", "clients": clients, "joined": joined }))
}
