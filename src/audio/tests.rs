use std::path::Path;
use std::time::Duration;

use super::resolve;
use super::sink::{OpenError, open_source};

#[test]
fn resolve_accepts_plain_names_only() {
    let root = Path::new("/music");
    assert_eq!(
        resolve(root, "Song A.mp3").as_deref(),
        Some(Path::new("/music/Song A.mp3"))
    );
    assert!(resolve(root, "../etc/passwd").is_none());
    assert!(resolve(root, "sub/a.mp3").is_none());
    assert!(resolve(root, "/abs.mp3").is_none());
    assert!(resolve(root, "").is_none());
}

#[test]
fn missing_file_is_an_open_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = open_source(&dir.path().join("gone.mp3"), Duration::ZERO)
        .err()
        .unwrap();
    assert!(matches!(err, OpenError::Open { .. }));
}

#[test]
fn garbage_file_is_a_decode_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("noise.mp3");
    std::fs::write(&path, vec![0u8; 64]).unwrap();
    let err = open_source(&path, Duration::ZERO).err().unwrap();
    assert!(matches!(err, OpenError::Decode { .. }));
}
