use std::collections::HashSet;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::error::{StoreError, StoreResult};
use crate::kv::{KeyValueStore, WatchToken, WriteOp};
use crate::memory::{MemoryStore, Snapshot};

/// [`MemoryStore`] saved to a JSON file after every write
///
/// The file is rewritten whole, through a sibling `.tmp` file and a rename, so a
/// crash leaves either the previous or the new contents. One process owns the
/// file at a time; watches only see writes made through this instance.
pub struct FileStore {
    path: PathBuf,
    memory: MemoryStore,
    saving: Mutex<()>,
}

impl FileStore {
    /// Open the store at `path`, starting empty when the file does not exist yet
    pub fn open(path: impl Into<PathBuf>) -> StoreResult<Self> {
        let path = path.into();

        let memory = match std::fs::read(&path) {
            Ok(bytes) => {
                let snapshot: Snapshot = serde_json::from_slice(&bytes)
                    .map_err(|e| persistence(&path, format!("not a store file: {e}")))?;
                MemoryStore::from_snapshot(snapshot)
            }
            Err(e) if e.kind() == ErrorKind::NotFound => MemoryStore::new(),
            Err(e) => return Err(persistence(&path, e.to_string())),
        };

        info!(
            path = %path.display(),
            keys = memory.key_count()?,
            "store opened"
        );

        Ok(Self {
            path,
            memory,
            saving: Mutex::new(()),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn save(&self) -> StoreResult<()> {
        // The snapshot is taken under the lock so the last save always carries
        // the latest state
        let _guard = self.saving.lock().await;
        let snapshot = self.memory.snapshot()?;
        let bytes = serde_json::to_vec(&snapshot)
            .map_err(|e| persistence(&self.path, e.to_string()))?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| persistence(&self.path, e.to_string()))?;
        }

        let staging = self.path.with_extension("tmp");
        tokio::fs::write(&staging, &bytes)
            .await
            .map_err(|e| persistence(&staging, e.to_string()))?;
        tokio::fs::rename(&staging, &self.path)
            .await
            .map_err(|e| persistence(&self.path, e.to_string()))?;

        debug!(path = %self.path.display(), bytes = bytes.len(), "store saved");
        Ok(())
    }

    async fn saved<T>(&self, result: StoreResult<T>) -> StoreResult<T> {
        let value = result?;
        self.save().await?;
        Ok(value)
    }
}

fn persistence(path: &Path, message: String) -> StoreError {
    StoreError::Persistence {
        path: path.to_path_buf(),
        message,
    }
}

#[async_trait]
impl KeyValueStore for FileStore {
    async fn exists(&self, key: &str) -> StoreResult<bool> {
        self.memory.exists(key).await
    }

    async fn keys(&self, pattern: &str) -> StoreResult<Vec<String>> {
        self.memory.keys(pattern).await
    }

    async fn get(&self, key: &str) -> StoreResult<Option<String>> {
        self.memory.get(key).await
    }

    async fn set(&self, key: &str, value: &str) -> StoreResult<()> {
        self.saved(self.memory.set(key, value).await).await
    }

    async fn delete(&self, key: &str) -> StoreResult<bool> {
        self.saved(self.memory.delete(key).await).await
    }

    async fn incr(&self, key: &str) -> StoreResult<i64> {
        self.saved(self.memory.incr(key).await).await
    }

    async fn decr(&self, key: &str) -> StoreResult<i64> {
        self.saved(self.memory.decr(key).await).await
    }

    async fn sadd(&self, key: &str, member: &str) -> StoreResult<bool> {
        self.saved(self.memory.sadd(key, member).await).await
    }

    async fn srem(&self, key: &str, member: &str) -> StoreResult<bool> {
        self.saved(self.memory.srem(key, member).await).await
    }

    async fn sismember(&self, key: &str, member: &str) -> StoreResult<bool> {
        self.memory.sismember(key, member).await
    }

    async fn smembers(&self, key: &str) -> StoreResult<HashSet<String>> {
        self.memory.smembers(key).await
    }

    async fn rpush(&self, key: &str, value: &str) -> StoreResult<usize> {
        self.saved(self.memory.rpush(key, value).await).await
    }

    async fn lrange(&self, key: &str, start: i64, stop: i64) -> StoreResult<Vec<String>> {
        self.memory.lrange(key, start, stop).await
    }

    async fn lrem(&self, key: &str, count: i64, value: &str) -> StoreResult<usize> {
        self.saved(self.memory.lrem(key, count, value).await).await
    }

    async fn watch(&self, keys: &[String]) -> StoreResult<WatchToken> {
        self.memory.watch(keys).await
    }

    async fn exec(&self, token: WatchToken, ops: Vec<WriteOp>) -> StoreResult<bool> {
        if !self.memory.exec(token, ops).await? {
            return Ok(false);
        }
        self.save().await?;
        Ok(true)
    }
}
