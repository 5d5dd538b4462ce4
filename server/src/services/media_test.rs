use super::*;
use uuid::Uuid;

fn scratch_dir() -> PathBuf {
    std::env::temp_dir().join(format!("roomchat-media-{}", Uuid::new_v4()))
}

#[test]
fn media_command_extracts_trimmed_path() {
    assert_eq!(parse_media_command("/media  ./cat.png "), Some("./cat.png"));
    assert_eq!(parse_media_command("/media "), None);
    assert_eq!(parse_media_command("/mediafile.png"), None);
    assert_eq!(parse_media_command("look at /media cat.png"), None);
}

#[tokio::test]
async fn save_keeps_only_the_basename() {
    let dir = scratch_dir();
    let saved = save_media(&dir, "../../etc/cat.png", b"meow").await.expect("save");

    assert_eq!(saved, dir.join("cat.png"));
    assert_eq!(tokio::fs::read(&saved).await.expect("read back"), b"meow");
    let _ = tokio::fs::remove_dir_all(&dir).await;
}

#[tokio::test]
async fn read_returns_basename_and_bytes() {
    let dir = scratch_dir();
    tokio::fs::create_dir_all(&dir).await.expect("mkdir");
    let path = dir.join("note.txt");
    tokio::fs::write(&path, b"hi").await.expect("write");

    let (name, bytes) = read_media(path.to_str().expect("utf8 path")).await.expect("read");
    assert_eq!(name, "note.txt");
    assert_eq!(bytes, b"hi");
    let _ = tokio::fs::remove_dir_all(&dir).await;
}

#[tokio::test]
async fn missing_file_is_a_media_error() {
    let dir = scratch_dir();
    let path = dir.join("absent.bin");
    let err = read_media(path.to_str().expect("utf8 path")).await.expect_err("missing");
    assert!(matches!(err, RelayError::Media { ref source, .. } if source.kind() == std::io::ErrorKind::NotFound));
}

#[tokio::test]
async fn nameless_target_is_rejected() {
    let err = save_media(&scratch_dir(), "..", b"x").await.expect_err("no name");
    assert!(matches!(err, RelayError::Media { .. }));
}
