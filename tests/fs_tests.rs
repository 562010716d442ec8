//! Integration tests for local file access

use std::fs;
use std::path::Path;

use tempfile::TempDir;

use mdedit::fs::{FsError, LocalFs};

#[tokio::test]
async fn test_write_then_read() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("doc.md");
    let local = LocalFs::new();

    local.write_file(&path, b"# hi\n").await.unwrap();

    assert_eq!(local.read_file(&path).await.unwrap(), b"# hi\n");
}

#[tokio::test]
async fn test_missing_file_is_not_found() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("absent.md");

    let err = LocalFs::new().read_file(&path).await.unwrap_err();

    assert!(err.is_not_found());
    assert!(matches!(err, FsError::NotFound(p) if p == path));
}

#[test]
fn test_empty_path_is_rejected() {
    let local = LocalFs::new();

    let err = tokio_test::block_on(local.read_file(Path::new(""))).unwrap_err();
    assert!(matches!(err, FsError::EmptyPath));

    let err = tokio_test::block_on(local.write_file(Path::new(""), b"x")).unwrap_err();
    assert!(matches!(err, FsError::EmptyPath));
}

#[tokio::test]
async fn test_write_into_missing_dir_fails() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("no").join("such.md");

    let err = LocalFs::new().write_file(&path, b"x").await.unwrap_err();

    assert!(matches!(err, FsError::Write { .. }));
    assert!(err.to_string().contains("such.md"));
}

#[tokio::test]
async fn test_read_dir_lists_directories_first() {
    let temp_dir = TempDir::new().unwrap();
    fs::write(temp_dir.path().join("b.md"), "").unwrap();
    fs::write(temp_dir.path().join("a.md"), "").unwrap();
    fs::create_dir(temp_dir.path().join("zeta")).unwrap();
    fs::create_dir(temp_dir.path().join("alpha")).unwrap();

    let entries = LocalFs::new().read_dir(temp_dir.path()).await.unwrap();
    let names: Vec<_> = entries
        .iter()
        .map(|e| (e.name.as_str(), e.is_dir))
        .collect();

    assert_eq!(
        names,
        vec![
            ("alpha", true),
            ("zeta", true),
            ("a.md", false),
            ("b.md", false),
        ]
    );
    assert!(entries.iter().all(|e| e.mod_time.is_some()));
}

#[tokio::test]
async fn test_read_dir_on_missing_path() {
    let temp_dir = TempDir::new().unwrap();

    let err = LocalFs::new()
        .read_dir(&temp_dir.path().join("gone"))
        .await
        .unwrap_err();

    assert!(matches!(err, FsError::ReadDir { .. }));
}
