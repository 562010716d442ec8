//! Local file-system access for the host: reading and writing documents and
//! listing directories.

use std::cmp::Ordering;
use std::io;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum FsError {
    #[error("empty path")]
    EmptyPath,

    #[error("file not found: {0}")]
    NotFound(PathBuf),

    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to list {path}: {source}")]
    ReadDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl FsError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, FsError::NotFound(_))
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DirEntry {
    pub name: String,
    pub is_dir: bool,
    pub mod_time: Option<SystemTime>,
}

/// Directories before files, then by name.
fn dir_order(a: &DirEntry, b: &DirEntry) -> Ordering {
    b.is_dir.cmp(&a.is_dir).then_with(|| a.name.cmp(&b.name))
}

#[derive(Clone, Copy, Debug, Default)]
pub struct LocalFs;

impl LocalFs {
    pub fn new() -> Self {
        Self
    }

    pub fn working_dir(&self) -> io::Result<PathBuf> {
        std::env::current_dir()
    }

    pub async fn read_file(&self, path: &Path) -> Result<Vec<u8>, FsError> {
        if path.as_os_str().is_empty() {
            return Err(FsError::EmptyPath);
        }
        tokio::fs::read(path).await.map_err(|source| {
            if source.kind() == io::ErrorKind::NotFound {
                FsError::NotFound(path.to_path_buf())
            } else {
                FsError::Read {
                    path: path.to_path_buf(),
                    source,
                }
            }
        })
    }

    pub async fn write_file(&self, path: &Path, data: &[u8]) -> Result<(), FsError> {
        if path.as_os_str().is_empty() {
            return Err(FsError::EmptyPath);
        }
        tokio::fs::write(path, data)
            .await
            .map_err(|source| FsError::Write {
                path: path.to_path_buf(),
                source,
            })
    }

    pub async fn read_dir(&self, path: &Path) -> Result<Vec<DirEntry>, FsError> {
        let err = |source| FsError::ReadDir {
            path: path.to_path_buf(),
            source,
        };
        let mut reader = tokio::fs::read_dir(path).await.map_err(err)?;
        let mut entries = Vec::new();
        while let Some(entry) = reader.next_entry().await.map_err(err)? {
            let meta = entry.metadata().await.map_err(err)?;
            entries.push(DirEntry {
                name: entry.file_name().to_string_lossy().into_owned(),
                is_dir: meta.is_dir(),
                mod_time: meta.modified().ok(),
            });
        }
        entries.sort_by(dir_order);
        Ok(entries)
    }
}
