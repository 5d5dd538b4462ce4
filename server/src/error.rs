//! Relay errors.

use frames::{BAD_GATEWAY_CODE, BAD_REQUEST_CODE};
use tokio_tungstenite::tungstenite;

/// Errors produced while relaying one client session.
#[derive(Debug, thiserror::Error)]
pub enum RelayError {
    /// An environment value could not be parsed.
    #[error("config parse failed: {0}")]
    Config(String),

    /// Socket bind or serve failure.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// The upstream chat server could not be reached.
    #[error("upstream connect failed: {0}")]
    UpstreamConnect(Box<tungstenite::Error>),

    /// The upstream connection rejected a write.
    #[error("upstream send failed: {0}")]
    UpstreamSend(Box<tungstenite::Error>),

    /// A client or upstream message was malformed.
    #[error("invalid message: {0}")]
    Codec(#[from] frames::CodecError),

    /// RSA key generation, encryption or decryption failed.
    #[error("crypto failed: {0}")]
    Crypto(#[from] rsa::Error),

    /// A handshake key was not valid PKCS#1 PEM.
    #[error("invalid room key: {0}")]
    KeyFormat(#[from] rsa::pkcs1::Error),

    /// The client sent a room message before joining.
    #[error("join a room first")]
    NotJoined,

    /// A `/media` file could not be read or a received file could not be saved.
    #[error("media file {path}: {source}")]
    Media {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

impl RelayError {
    /// Status code attached to the system message reporting this error.
    #[must_use]
    pub fn status_code(&self) -> u16 {
        match self {
            Self::UpstreamConnect(_) | Self::UpstreamSend(_) | Self::Crypto(_) | Self::KeyFormat(_) => BAD_GATEWAY_CODE,
            _ => BAD_REQUEST_CODE,
        }
    }
}
