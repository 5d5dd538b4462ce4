//! Media file handling for `/media <path>` sends and received media.

#[cfg(test)]
#[path = "media_test.rs"]
mod tests;

use std::path::{Path, PathBuf};

use crate::error::RelayError;

const MEDIA_COMMAND: &str = "/media ";

/// Path argument of a `/media <path>` chat line, if the line is one.
#[must_use]
pub fn parse_media_command(text: &str) -> Option<&str> {
    let path = text.strip_prefix(MEDIA_COMMAND)?.trim();
    (!path.is_empty()).then_some(path)
}

/// Read a local file for upload. Returns its basename and contents.
///
/// # Errors
///
/// Returns [`RelayError::Media`] if the file has no name or cannot be read.
pub async fn read_media(path: &str) -> Result<(String, Vec<u8>), RelayError> {
    let filename = basename(path)?;
    let bytes = tokio::fs::read(path)
        .await
        .map_err(|source| RelayError::Media { path: path.to_owned(), source })?;
    Ok((filename, bytes))
}

/// Write received media under `dir`, keeping only the basename of `filename`.
///
/// # Errors
///
/// Returns [`RelayError::Media`] if the name is unusable or the write fails.
pub async fn save_media(dir: &Path, filename: &str, bytes: &[u8]) -> Result<PathBuf, RelayError> {
    let name = basename(filename)?;
    let media_err = |source| RelayError::Media { path: filename.to_owned(), source };

    tokio::fs::create_dir_all(dir).await.map_err(media_err)?;
    let target = dir.join(name);
    tokio::fs::write(&target, bytes).await.map_err(media_err)?;
    Ok(target)
}

fn basename(path: &str) -> Result<String, RelayError> {
    Path::new(path)
        .file_name()
        .and_then(|name| name.to_str())
        .map(str::to_owned)
        .ok_or_else(|| RelayError::Media {
            path: path.to_owned(),
            source: std::io::Error::new(std::io::ErrorKind::InvalidInput, "no file name"),
        })
}
