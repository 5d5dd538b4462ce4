//! Relay configuration parsed from environment variables.

use std::path::PathBuf;

use crate::error::RelayError;

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_UPSTREAM_URL: &str = "ws://127.0.0.1:6922";
pub const DEFAULT_MEDIA_DIR: &str = "received_media";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelayConfig {
    pub port: u16,
    pub upstream_url: String,
    /// Where received media files are written.
    pub media_dir: PathBuf,
}

impl RelayConfig {
    /// Build typed relay config from environment variables.
    ///
    /// Optional:
    /// - `PORT`: default 3000
    /// - `UPSTREAM_URL`: chat server websocket, default `ws://127.0.0.1:6922`
    /// - `MEDIA_DIR`: default `received_media`
    pub fn from_env() -> Result<Self, RelayError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build config from an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, RelayError> {
        let port = match lookup("PORT") {
            Some(raw) => raw.parse::<u16>().map_err(|_| RelayError::Config(format!("invalid PORT: {raw}")))?,
            None => DEFAULT_PORT,
        };

        let upstream_url = lookup("UPSTREAM_URL").unwrap_or_else(|| DEFAULT_UPSTREAM_URL.to_string());
        if !(upstream_url.starts_with("ws://") || upstream_url.starts_with("wss://")) {
            return Err(RelayError::Config(format!("UPSTREAM_URL must be ws:// or wss://, got {upstream_url}")));
        }

        let media_dir = lookup("MEDIA_DIR")
            .filter(|dir| !dir.trim().is_empty())
            .map_or_else(|| PathBuf::from(DEFAULT_MEDIA_DIR), PathBuf::from);

        Ok(Self { port, upstream_url, media_dir })
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
