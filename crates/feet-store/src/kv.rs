use std::collections::HashSet;

use async_trait::async_trait;

use crate::error::StoreResult;

/// Primitive operations of the key-value store
///
/// Sets and lists that become empty stop existing, so `exists` reports whether a
/// key currently holds any data.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn exists(&self, key: &str) -> StoreResult<bool>;

    /// Keys matching a glob pattern (`*`, `?`, `\` escapes)
    async fn keys(&self, pattern: &str) -> StoreResult<Vec<String>>;

    async fn get(&self, key: &str) -> StoreResult<Option<String>>;

    async fn set(&self, key: &str, value: &str) -> StoreResult<()>;

    /// Returns whether the key existed
    async fn delete(&self, key: &str) -> StoreResult<bool>;

    async fn incr(&self, key: &str) -> StoreResult<i64>;

    async fn decr(&self, key: &str) -> StoreResult<i64>;

    /// Returns whether the member was newly added
    async fn sadd(&self, key: &str, member: &str) -> StoreResult<bool>;

    /// Returns whether the member was present
    async fn srem(&self, key: &str, member: &str) -> StoreResult<bool>;

    async fn sismember(&self, key: &str, member: &str) -> StoreResult<bool>;

    async fn smembers(&self, key: &str) -> StoreResult<HashSet<String>>;

    /// Returns the list length after the push
    async fn rpush(&self, key: &str, value: &str) -> StoreResult<usize>;

    /// Inclusive range, negative indices count from the tail
    async fn lrange(&self, key: &str, start: i64, stop: i64) -> StoreResult<Vec<String>>;

    /// Remove occurrences of `value`: all when `count` is 0, from the head when
    /// positive, from the tail when negative. Returns the number removed.
    async fn lrem(&self, key: &str, count: i64, value: &str) -> StoreResult<usize>;

    /// Snapshot the versions of `keys` for a later [`KeyValueStore::exec`]
    async fn watch(&self, keys: &[String]) -> StoreResult<WatchToken>;

    /// Apply `ops` atomically unless a watched key changed since the token was
    /// taken. Returns `false` on conflict, in which case nothing was written.
    async fn exec(&self, token: WatchToken, ops: Vec<WriteOp>) -> StoreResult<bool>;
}

/// Versions of watched keys at watch time
#[derive(Debug, Clone, Default)]
pub struct WatchToken {
    pub(crate) versions: Vec<(String, u64)>,
}

impl WatchToken {
    pub fn new(versions: Vec<(String, u64)>) -> Self {
        Self { versions }
    }

    pub fn versions(&self) -> &[(String, u64)] {
        &self.versions
    }
}

/// A buffered write, applied when a transaction commits
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriteOp {
    Set { key: String, value: String },
    Delete { key: String },
    IncrBy { key: String, delta: i64 },
    SAdd { key: String, member: String },
    SRem { key: String, member: String },
    RPush { key: String, value: String },
    LRem { key: String, count: i64, value: String },
}

impl WriteOp {
    pub fn key(&self) -> &str {
        match self {
            WriteOp::Set { key, .. }
            | WriteOp::Delete { key }
            | WriteOp::IncrBy { key, .. }
            | WriteOp::SAdd { key, .. }
            | WriteOp::SRem { key, .. }
            | WriteOp::RPush { key, .. }
            | WriteOp::LRem { key, .. } => key,
        }
    }
}
