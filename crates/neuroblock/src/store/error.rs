//! Option storage errors.

use std::path::{Path, PathBuf};

use thiserror::Error;

pub type StoreResult<T> = Result<T, StoreError>;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("file io error at {path}: {source}")]
    FileIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse option file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to serialize options: {0}")]
    Serialize(#[source] serde_json::Error),
}

impl StoreError {
    pub fn file_io(path: &Path, source: std::io::Error) -> Self {
        StoreError::FileIo {
            path: path.to_path_buf(),
            source,
        }
    }
}
