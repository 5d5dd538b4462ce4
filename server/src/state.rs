//! Shared application state.
//!
//! DESIGN
//! ======
//! `AppState` is injected into Axum handlers via the `State` extractor.
//! It holds the relay config, the relay RSA key pair, and a registry of
//! connected clients. A client is registered on upgrade and gains a
//! [`SessionInfo`] once it joins.

#[cfg(test)]
#[path = "state_test.rs"]
mod tests;

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;
use uuid::Uuid;

use crate::config::RelayConfig;
use crate::services::crypto::RelayKeys;

/// Identity a client joined with. Used for every upstream message it sends.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionInfo {
    pub username: String,
    pub room: String,
}

/// Shared application state. Clone is required by Axum; inner fields are Arc-wrapped.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<RelayConfig>,
    pub keys: Arc<RelayKeys>,
    pub clients: Arc<RwLock<HashMap<Uuid, Option<SessionInfo>>>>,
}

impl AppState {
    #[must_use]
    pub fn new(config: RelayConfig, keys: Arc<RelayKeys>) -> Self {
        Self { config: Arc::new(config), keys, clients: Arc::new(RwLock::new(HashMap::new())) }
    }

    pub async fn register(&self, client_id: Uuid) {
        self.clients.write().await.insert(client_id, None);
    }

    /// Record or replace the identity of a registered client.
    pub async fn set_session(&self, client_id: Uuid, session: Option<SessionInfo>) {
        if let Some(slot) = self.clients.write().await.get_mut(&client_id) {
            *slot = session;
        }
    }

    pub async fn unregister(&self, client_id: Uuid) {
        self.clients.write().await.remove(&client_id);
    }

    /// Connected clients and how many of them have joined a room.
    pub async fn counts(&self) -> (usize, usize) {
        let clients = self.clients.read().await;
        let joined = clients.values().filter(|s| s.is_some()).count();
        (clients.len(), joined)
    }
}

// =============================================================================
// TEST HELPERS
// =============================================================================

#[cfg(test)]
pub mod test_helpers {
    use super::*;
    use std::path::PathBuf;
    use std::sync::LazyLock;

    use frames::upstream::{UpstreamKind, UpstreamMessage};
    use rsa::pkcs1::{DecodeRsaPublicKey, EncodeRsaPrivateKey, EncodeRsaPublicKey, LineEnding};
    use rsa::{RsaPrivateKey, RsaPublicKey};

    use crate::services::crypto::{RELAY_KEY_BITS, encrypt_chunks};

    static RELAY_KEYS: LazyLock<Arc<RelayKeys>> =
        LazyLock::new(|| Arc::new(RelayKeys::generate(RELAY_KEY_BITS).expect("relay key generation")));

    /// Relay key pair shared across tests; generation is slow.
    #[must_use]
    pub fn relay_keys() -> Arc<RelayKeys> {
        Arc::clone(&RELAY_KEYS)
    }

    /// `AppState` pointed at `upstream_url` with a throwaway media dir.
    #[must_use]
    pub fn test_app_state(upstream_url: &str) -> AppState {
        let config = RelayConfig {
            port: 0,
            upstream_url: upstream_url.to_owned(),
            media_dir: std::env::temp_dir().join(format!("roomchat-media-{}", Uuid::new_v4())),
        };
        AppState::new(config, relay_keys())
    }

    static ROOM_KEY: LazyLock<RsaPrivateKey> =
        LazyLock::new(|| RsaPrivateKey::new(&mut rand::thread_rng(), RELAY_KEY_BITS).expect("room key generation"));

    /// Private key of the room key pair an upstream server hands out.
    #[must_use]
    pub fn room_key() -> &'static RsaPrivateKey {
        &ROOM_KEY
    }

    /// Handshake `SYSTEM_MESSAGE` as an upstream room sends it: both halves of
    /// the room key pair as PEM, encrypted to `member_pem` and hex-encoded.
    #[must_use]
    pub fn handshake_message(member_pem: &str, text: &str) -> UpstreamMessage {
        let member = RsaPublicKey::from_pkcs1_pem(member_pem).expect("member pem");
        let public_pem = RsaPublicKey::from(room_key()).to_pkcs1_pem(LineEnding::LF).expect("room public pem");
        let private_pem = room_key().to_pkcs1_pem(LineEnding::LF).expect("room private pem");

        let mut msg = UpstreamMessage::join("alice", "r1");
        msg.kind = UpstreamKind::SystemMessage;
        msg.message = text.to_owned();
        msg.public_key = Some(hex::encode(encrypt_chunks(&member, public_pem.as_bytes()).expect("encrypt public")));
        msg.private_key = Some(hex::encode(encrypt_chunks(&member, private_pem.as_bytes()).expect("encrypt private")));
        msg
    }

    #[must_use]
    pub fn scratch_dir() -> PathBuf {
        std::env::temp_dir().join(format!("roomchat-scratch-{}", Uuid::new_v4()))
    }
}
