//! File-backed option store.
//!
//! All options live in one JSON object on disk. Every write replaces the
//! file atomically (temp file + fsync + rename) while holding the store
//! lock, so concurrent writers never interleave.

use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;
use tracing::debug;

use super::{OptionStore, StoreError, StoreResult};

#[derive(Debug)]
pub struct FileOptionStore {
    path: PathBuf,
    options: Mutex<BTreeMap<String, String>>,
}

impl FileOptionStore {
    /// Open the store at `path`, creating parent directories.
    ///
    /// A missing file is an empty store; it is created on first write.
    pub async fn open(path: impl Into<PathBuf>) -> StoreResult<Self> {
        let path = path.into();
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| StoreError::file_io(parent, e))?;
        }

        let options = match fs::read(&path).await {
            Ok(bytes) => {
                serde_json::from_slice(&bytes).map_err(|source| StoreError::Parse {
                    path: path.clone(),
                    source,
                })?
            }
            Err(e) if e.kind() == ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => return Err(StoreError::file_io(&path, e)),
        };
        debug!(path = %path.display(), count = options.len(), "Opened option store");

        Ok(Self {
            path,
            options: Mutex::new(options),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Apply `change` to a copy, persist it, then commit it in memory.
    async fn update(&self, change: impl FnOnce(&mut BTreeMap<String, String>)) -> StoreResult<()> {
        let mut options = self.options.lock().await;
        let mut next = options.clone();
        change(&mut next);
        if next == *options {
            return Ok(());
        }

        let data = serde_json::to_vec_pretty(&next).map_err(StoreError::Serialize)?;
        atomic_write_file(&self.path, &data).await?;
        *options = next;
        Ok(())
    }
}

#[async_trait]
impl OptionStore for FileOptionStore {
    async fn get(&self, key: &str) -> StoreResult<Option<String>> {
        Ok(self.options.lock().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> StoreResult<()> {
        self.update(|options| {
            options.insert(key.to_string(), value.to_string());
        })
        .await
    }

    async fn delete(&self, key: &str) -> StoreResult<()> {
        self.update(|options| {
            options.remove(key);
        })
        .await
    }
}

/// Write data to a temp file, fsync it, then atomically rename to the final path.
///
/// The temp file name carries a ULID so stray temp files never collide.
async fn atomic_write_file(final_path: &Path, data: &[u8]) -> StoreResult<()> {
    let file_name = final_path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("options");
    let temp_path = final_path.with_file_name(format!("{}.{}.tmp", file_name, ulid::Ulid::new()));

    let mut file = fs::File::create(&temp_path)
        .await
        .map_err(|e| StoreError::file_io(&temp_path, e))?;
    file.write_all(data)
        .await
        .map_err(|e| StoreError::file_io(&temp_path, e))?;
    file.sync_all()
        .await
        .map_err(|e| StoreError::file_io(&temp_path, e))?;
    fs::rename(&temp_path, final_path)
        .await
        .map_err(|e| StoreError::file_io(final_path, e))?;
    Ok(())
}
