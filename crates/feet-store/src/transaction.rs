use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;

use crate::error::{StoreError, StoreResult};
use crate::kv::{KeyValueStore, WriteOp};
use crate::memory::MemoryStore;

const DEFAULT_MAX_ATTEMPTS: usize = 16;

/// Body of an optimistic transaction
///
/// `run` may be called several times: once per attempt, until the watched keys
/// stay untouched between the reads it issues and the commit of its writes.
#[async_trait]
pub trait Transaction: Send + Sync {
    type Output: Send;

    async fn run(&self, tx: &mut TxContext<'_>) -> StoreResult<Self::Output>;
}

/// Mutation context handed to a [`Transaction`]
///
/// Reads go straight to the store; writes are buffered and only become visible
/// when the transaction commits.
pub struct TxContext<'a> {
    kv: &'a dyn KeyValueStore,
    ops: Vec<WriteOp>,
}

impl<'a> TxContext<'a> {
    fn new(kv: &'a dyn KeyValueStore) -> Self {
        Self {
            kv,
            ops: Vec::new(),
        }
    }

    pub async fn exists(&self, key: &str) -> StoreResult<bool> {
        self.kv.exists(key).await
    }

    pub async fn keys(&self, pattern: &str) -> StoreResult<Vec<String>> {
        self.kv.keys(pattern).await
    }

    pub async fn get(&self, key: &str) -> StoreResult<Option<String>> {
        self.kv.get(key).await
    }

    pub async fn sismember(&self, key: &str, member: &str) -> StoreResult<bool> {
        self.kv.sismember(key, member).await
    }

    pub async fn smembers(&self, key: &str) -> StoreResult<HashSet<String>> {
        self.kv.smembers(key).await
    }

    pub async fn lrange(&self, key: &str, start: i64, stop: i64) -> StoreResult<Vec<String>> {
        self.kv.lrange(key, start, stop).await
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.ops.push(WriteOp::Set {
            key: key.into(),
            value: value.into(),
        });
    }

    pub fn delete(&mut self, key: impl Into<String>) {
        self.ops.push(WriteOp::Delete { key: key.into() });
    }

    pub fn incr(&mut self, key: impl Into<String>) {
        self.ops.push(WriteOp::IncrBy {
            key: key.into(),
            delta: 1,
        });
    }

    pub fn decr(&mut self, key: impl Into<String>) {
        self.ops.push(WriteOp::IncrBy {
            key: key.into(),
            delta: -1,
        });
    }

    pub fn sadd(&mut self, key: impl Into<String>, member: impl Into<String>) {
        self.ops.push(WriteOp::SAdd {
            key: key.into(),
            member: member.into(),
        });
    }

    pub fn srem(&mut self, key: impl Into<String>, member: impl Into<String>) {
        self.ops.push(WriteOp::SRem {
            key: key.into(),
            member: member.into(),
        });
    }

    pub fn rpush(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.ops.push(WriteOp::RPush {
            key: key.into(),
            value: value.into(),
        });
    }

    pub fn lrem(&mut self, key: impl Into<String>, count: i64, value: impl Into<String>) {
        self.ops.push(WriteOp::LRem {
            key: key.into(),
            count,
            value: value.into(),
        });
    }

    /// Drop every write queued so far
    pub fn discard(&mut self) {
        self.ops.clear();
    }

    pub fn queued(&self) -> &[WriteOp] {
        &self.ops
    }
}

/// Shared handle to a key-value backend
///
/// Cloning is cheap; every clone talks to the same backend.
#[derive(Clone)]
pub struct Store {
    kv: Arc<dyn KeyValueStore>,
    max_attempts: usize,
}

impl Store {
    pub fn new(kv: Arc<dyn KeyValueStore>) -> Self {
        Self {
            kv,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }

    /// Handle over a fresh in-process [`MemoryStore`]
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStore::new()))
    }

    pub fn with_max_attempts(mut self, max_attempts: usize) -> Self {
        self.max_attempts = max_attempts.max(1);
        self
    }

    pub fn kv(&self) -> &dyn KeyValueStore {
        self.kv.as_ref()
    }

    /// Run `body` under optimistic concurrency control
    ///
    /// The watched keys are snapshotted, the body runs and its buffered writes are
    /// committed only if none of the watched keys changed meanwhile. On conflict
    /// the body runs again, up to the configured number of attempts.
    pub async fn transaction<T: Transaction>(
        &self,
        watch: &[String],
        body: &T,
    ) -> StoreResult<T::Output> {
        for attempt in 1..=self.max_attempts {
            let token = self.kv.watch(watch).await?;

            let mut tx = TxContext::new(self.kv.as_ref());
            let output = body.run(&mut tx).await?;

            if self.kv.exec(token, tx.ops).await? {
                return Ok(output);
            }

            tracing::debug!(attempt, ?watch, "watched key changed, retrying transaction");
        }

        tracing::warn!(?watch, attempts = self.max_attempts, "transaction retries exhausted");
        Err(StoreError::Conflict {
            attempts: self.max_attempts,
        })
    }
}
