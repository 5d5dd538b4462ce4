//! RSA layer for upstream chat bodies.
//!
//! DESIGN
//! ======
//! The relay owns one key pair for its lifetime and announces the public half
//! as PKCS#1 PEM in every `JOIN_ROOM`. The room answers with its own key pair
//! on the first non-conflict system message, each PEM encrypted to the relay
//! key and hex-encoded. From then on chat text is encrypted to the room public
//! key and user messages are decrypted with the room private key.
//!
//! PKCS#1 v1.5 caps a block at `modulus - 11` bytes, so plaintext is split
//! into blocks of that size and ciphertext into modulus-sized blocks. Until a
//! room hands over keys, bodies pass through as plain UTF-8.

#[cfg(test)]
#[path = "crypto_test.rs"]
mod tests;

use std::sync::Arc;

use frames::CodecError;
use frames::upstream::UpstreamMessage;
use rsa::pkcs1::{DecodeRsaPrivateKey, DecodeRsaPublicKey, EncodeRsaPublicKey, LineEnding};
use rsa::traits::PublicKeyParts;
use rsa::{Pkcs1v15Encrypt, RsaPrivateKey, RsaPublicKey};

use crate::error::RelayError;

/// Modulus size of the relay key pair.
pub const RELAY_KEY_BITS: usize = 1024;

const PKCS1_V15_OVERHEAD: usize = 11;

// =============================================================================
// KEYS
// =============================================================================

/// The relay's own key pair, shared by every session.
pub struct RelayKeys {
    private: RsaPrivateKey,
    public_pem: String,
}

impl RelayKeys {
    /// Generate a fresh key pair.
    ///
    /// # Errors
    ///
    /// Returns [`RelayError::Crypto`] or [`RelayError::KeyFormat`] if
    /// generation or PEM encoding fails.
    pub fn generate(bits: usize) -> Result<Self, RelayError> {
        let private = RsaPrivateKey::new(&mut rand::thread_rng(), bits)?;
        let public_pem = RsaPublicKey::from(&private).to_pkcs1_pem(LineEnding::LF)?;
        Ok(Self { private, public_pem })
    }

    /// PKCS#1 PEM of the public half, as sent in `JOIN_ROOM`.
    #[must_use]
    pub fn public_pem(&self) -> &str {
        &self.public_pem
    }

    /// Decrypt a hex-encoded, chunk-encrypted PEM addressed to this relay.
    fn open_pem(&self, hex_body: &str) -> Result<String, RelayError> {
        let cipher = hex::decode(hex_body).map_err(CodecError::from)?;
        let plain = decrypt_chunks(&self.private, &cipher)?;
        Ok(String::from_utf8(plain).map_err(CodecError::from)?)
    }
}

/// Key pair a room hands to each member during the handshake.
struct RoomKeys {
    public: RsaPublicKey,
    private: RsaPrivateKey,
}

impl RoomKeys {
    fn from_handshake(relay: &RelayKeys, public_hex: &str, private_hex: &str) -> Result<Self, RelayError> {
        let public = RsaPublicKey::from_pkcs1_pem(&relay.open_pem(public_hex)?)?;
        let private = RsaPrivateKey::from_pkcs1_pem(&relay.open_pem(private_hex)?)?;
        Ok(Self { public, private })
    }
}

// =============================================================================
// SESSION CIPHER
// =============================================================================

/// Per-connection encryption state.
pub struct SessionCipher {
    relay: Arc<RelayKeys>,
    room: Option<RoomKeys>,
}

impl SessionCipher {
    #[must_use]
    pub fn new(relay: Arc<RelayKeys>) -> Self {
        Self { relay, room: None }
    }

    #[must_use]
    pub fn public_pem(&self) -> &str {
        self.relay.public_pem()
    }

    /// Forget the room keys. A new upstream link runs a new handshake.
    pub fn reset(&mut self) {
        self.room = None;
    }

    /// Install the room key pair carried by `msg`, once per link.
    ///
    /// Returns `Ok(true)` when keys were installed by this call.
    ///
    /// # Errors
    ///
    /// Returns codec, crypto or key format errors for a malformed handshake.
    pub fn accept_handshake(&mut self, msg: &UpstreamMessage) -> Result<bool, RelayError> {
        if self.room.is_some() {
            return Ok(false);
        }
        let Some((public_hex, private_hex)) = msg.handshake_keys() else {
            return Ok(false);
        };
        self.room = Some(RoomKeys::from_handshake(&self.relay, public_hex, private_hex)?);
        Ok(true)
    }

    /// Body bytes for an outgoing chat line.
    ///
    /// # Errors
    ///
    /// Returns [`RelayError::Crypto`] if encryption fails.
    pub fn seal(&self, text: &str) -> Result<Vec<u8>, RelayError> {
        match &self.room {
            Some(room) => encrypt_chunks(&room.public, text.as_bytes()),
            None => Ok(text.as_bytes().to_vec()),
        }
    }

    /// Text of an incoming user message body.
    ///
    /// # Errors
    ///
    /// Returns [`RelayError::Crypto`] for undecryptable blocks and
    /// [`RelayError::Codec`] for non-UTF-8 text.
    pub fn open(&self, body: Vec<u8>) -> Result<String, RelayError> {
        let plain = match &self.room {
            Some(room) => decrypt_chunks(&room.private, &body)?,
            None => body,
        };
        Ok(String::from_utf8(plain).map_err(CodecError::from)?)
    }
}

// =============================================================================
// CHUNKED PKCS#1 v1.5
// =============================================================================

/// Encrypt `plain` in `modulus - 11` byte blocks and concatenate the results.
///
/// # Errors
///
/// Returns [`RelayError::Crypto`] if any block fails to encrypt.
pub fn encrypt_chunks(key: &RsaPublicKey, plain: &[u8]) -> Result<Vec<u8>, RelayError> {
    let block = key.size() - PKCS1_V15_OVERHEAD;
    let mut rng = rand::thread_rng();
    let mut out = Vec::with_capacity(plain.len().div_ceil(block) * key.size());
    for chunk in plain.chunks(block) {
        out.extend(key.encrypt(&mut rng, Pkcs1v15Encrypt, chunk)?);
    }
    Ok(out)
}

/// Decrypt modulus-sized blocks and concatenate the plaintext.
///
/// # Errors
///
/// Returns [`RelayError::Crypto`] if any block fails to decrypt.
pub fn decrypt_chunks(key: &RsaPrivateKey, cipher: &[u8]) -> Result<Vec<u8>, RelayError> {
    let mut out = Vec::with_capacity(cipher.len());
    for chunk in cipher.chunks(key.size()) {
        out.extend(key.decrypt(Pkcs1v15Encrypt, chunk)?);
    }
    Ok(out)
}
