use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::{StoreError, StoreResult};
use crate::glob::glob_match;
use crate::kv::{KeyValueStore, WatchToken, WriteOp};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub(crate) enum Value {
    Str(String),
    Set(HashSet<String>),
    List(Vec<String>),
}

/// Reply of a single applied write
enum Reply {
    Done,
    Int(i64),
    Flag(bool),
    Len(usize),
}

#[derive(Default)]
struct State {
    data: HashMap<String, Value>,
    /// Bumped on every write to a key, kept after deletion so a watch notices
    /// delete-then-recreate
    versions: HashMap<String, u64>,
    clock: u64,
}

impl State {
    fn version(&self, key: &str) -> u64 {
        self.versions.get(key).copied().unwrap_or(0)
    }

    fn touch(&mut self, key: &str) {
        self.clock += 1;
        self.versions.insert(key.to_string(), self.clock);
    }

    /// Apply one op directly to the live data
    fn apply(&mut self, op: &WriteOp) -> StoreResult<Reply> {
        let key = op.key().to_string();
        let mut slot = self.data.remove(&key);
        let result = apply_to_slot(&mut slot, op);
        let changed = matches!(result, Ok(ref reply) if reply_changed(op, reply));

        if let Some(value) = slot {
            self.data.insert(key.clone(), value);
        }
        if changed {
            self.touch(&key);
        }
        result
    }
}

/// Every live key with its value, the part of a [`MemoryStore`] worth saving
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct Snapshot {
    pub(crate) entries: BTreeMap<String, Value>,
}

/// In-process key-value engine
///
/// Everything lives behind one lock, which makes `exec` trivially atomic. Writes
/// are staged on copies of the touched entries and only published when every op
/// of the batch succeeded.
#[derive(Default)]
pub struct MemoryStore {
    state: RwLock<State>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn from_snapshot(snapshot: Snapshot) -> Self {
        let state = State {
            data: snapshot.entries.into_iter().collect(),
            ..State::default()
        };
        Self {
            state: RwLock::new(state),
        }
    }

    pub(crate) fn snapshot(&self) -> StoreResult<Snapshot> {
        let state = self.read()?;
        Ok(Snapshot {
            entries: state
                .data
                .iter()
                .map(|(key, value)| (key.clone(), value.clone()))
                .collect(),
        })
    }

    pub(crate) fn key_count(&self) -> StoreResult<usize> {
        Ok(self.read()?.data.len())
    }

    fn read(&self) -> StoreResult<RwLockReadGuard<'_, State>> {
        self.state
            .read()
            .map_err(|_| StoreError::Unavailable("memory store lock poisoned".into()))
    }

    fn write(&self) -> StoreResult<RwLockWriteGuard<'_, State>> {
        self.state
            .write()
            .map_err(|_| StoreError::Unavailable("memory store lock poisoned".into()))
    }

    fn apply(&self, op: WriteOp) -> StoreResult<Reply> {
        self.write()?.apply(&op)
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn exists(&self, key: &str) -> StoreResult<bool> {
        Ok(self.read()?.data.contains_key(key))
    }

    async fn keys(&self, pattern: &str) -> StoreResult<Vec<String>> {
        let state = self.read()?;
        let mut keys: Vec<String> = state
            .data
            .keys()
            .filter(|key| glob_match(pattern, key))
            .cloned()
            .collect();
        keys.sort();
        Ok(keys)
    }

    async fn get(&self, key: &str) -> StoreResult<Option<String>> {
        match self.read()?.data.get(key) {
            None => Ok(None),
            Some(Value::Str(value)) => Ok(Some(value.clone())),
            Some(_) => Err(wrong_type(key)),
        }
    }

    async fn set(&self, key: &str, value: &str) -> StoreResult<()> {
        self.apply(WriteOp::Set {
            key: key.into(),
            value: value.into(),
        })?;
        Ok(())
    }

    async fn delete(&self, key: &str) -> StoreResult<bool> {
        flag(self.apply(WriteOp::Delete { key: key.into() })?)
    }

    async fn incr(&self, key: &str) -> StoreResult<i64> {
        int(self.apply(WriteOp::IncrBy {
            key: key.into(),
            delta: 1,
        })?)
    }

    async fn decr(&self, key: &str) -> StoreResult<i64> {
        int(self.apply(WriteOp::IncrBy {
            key: key.into(),
            delta: -1,
        })?)
    }

    async fn sadd(&self, key: &str, member: &str) -> StoreResult<bool> {
        flag(self.apply(WriteOp::SAdd {
            key: key.into(),
            member: member.into(),
        })?)
    }

    async fn srem(&self, key: &str, member: &str) -> StoreResult<bool> {
        flag(self.apply(WriteOp::SRem {
            key: key.into(),
            member: member.into(),
        })?)
    }

    async fn sismember(&self, key: &str, member: &str) -> StoreResult<bool> {
        match self.read()?.data.get(key) {
            None => Ok(false),
            Some(Value::Set(set)) => Ok(set.contains(member)),
            Some(_) => Err(wrong_type(key)),
        }
    }

    async fn smembers(&self, key: &str) -> StoreResult<HashSet<String>> {
        match self.read()?.data.get(key) {
            None => Ok(HashSet::new()),
            Some(Value::Set(set)) => Ok(set.clone()),
            Some(_) => Err(wrong_type(key)),
        }
    }

    async fn rpush(&self, key: &str, value: &str) -> StoreResult<usize> {
        len(self.apply(WriteOp::RPush {
            key: key.into(),
            value: value.into(),
        })?)
    }

    async fn lrange(&self, key: &str, start: i64, stop: i64) -> StoreResult<Vec<String>> {
        let state = self.read()?;
        let list = match state.data.get(key) {
            None => return Ok(Vec::new()),
            Some(Value::List(list)) => list,
            Some(_) => return Err(wrong_type(key)),
        };

        let len = list.len() as i64;
        let resolve = |index: i64| if index < 0 { len + index } else { index };
        let start = resolve(start).max(0);
        let stop = resolve(stop).min(len - 1);

        if start > stop || start >= len {
            return Ok(Vec::new());
        }
        Ok(list[start as usize..=stop as usize].to_vec())
    }

    async fn lrem(&self, key: &str, count: i64, value: &str) -> StoreResult<usize> {
        len(self.apply(WriteOp::LRem {
            key: key.into(),
            count,
            value: value.into(),
        })?)
    }

    async fn watch(&self, keys: &[String]) -> StoreResult<WatchToken> {
        let state = self.read()?;
        let versions = keys
            .iter()
            .map(|key| (key.clone(), state.version(key)))
            .collect();
        Ok(WatchToken::new(versions))
    }

    async fn exec(&self, token: WatchToken, ops: Vec<WriteOp>) -> StoreResult<bool> {
        let mut state = self.write()?;

        if token
            .versions
            .iter()
            .any(|(key, version)| state.version(key) != *version)
        {
            return Ok(false);
        }

        // Stage on copies so a failing op leaves the live data untouched
        let mut staged: HashMap<String, Option<Value>> = HashMap::new();
        let mut changed: Vec<String> = Vec::new();
        for op in &ops {
            let key = op.key();
            let slot = staged
                .entry(key.to_string())
                .or_insert_with(|| state.data.get(key).cloned());
            let reply = apply_to_slot(slot, op)?;
            if reply_changed(op, &reply) {
                changed.push(key.to_string());
            }
        }

        for (key, slot) in staged {
            match slot {
                Some(value) => state.data.insert(key, value),
                None => state.data.remove(&key),
            };
        }
        for key in changed {
            state.touch(&key);
        }
        Ok(true)
    }
}

fn apply_to_slot(slot: &mut Option<Value>, op: &WriteOp) -> StoreResult<Reply> {
    let reply = match op {
        WriteOp::Set { value, .. } => {
            *slot = Some(Value::Str(value.clone()));
            Reply::Done
        }
        WriteOp::Delete { .. } => Reply::Flag(slot.take().is_some()),
        WriteOp::IncrBy { key, delta } => {
            let current = match slot {
                None => 0,
                Some(Value::Str(value)) => value
                    .trim()
                    .parse::<i64>()
                    .map_err(|_| wrong_type(key))?,
                Some(_) => return Err(wrong_type(key)),
            };
            let next = current + delta;
            *slot = Some(Value::Str(next.to_string()));
            Reply::Int(next)
        }
        WriteOp::SAdd { key, member } => match slot.get_or_insert_with(|| Value::Set(HashSet::new())) {
            Value::Set(set) => Reply::Flag(set.insert(member.clone())),
            _ => return Err(wrong_type(key)),
        },
        WriteOp::SRem { key, member } => match slot {
            None => Reply::Flag(false),
            Some(Value::Set(set)) => Reply::Flag(set.remove(member)),
            Some(_) => return Err(wrong_type(key)),
        },
        WriteOp::RPush { key, value } => match slot.get_or_insert_with(|| Value::List(Vec::new())) {
            Value::List(list) => {
                list.push(value.clone());
                Reply::Len(list.len())
            }
            _ => return Err(wrong_type(key)),
        },
        WriteOp::LRem { key, count, value } => match slot {
            None => Reply::Len(0),
            Some(Value::List(list)) => Reply::Len(remove_from_list(list, *count, value)),
            Some(_) => return Err(wrong_type(key)),
        },
    };

    // Empty collections cease to exist
    if matches!(slot, Some(Value::Set(set)) if set.is_empty())
        || matches!(slot, Some(Value::List(list)) if list.is_empty())
    {
        *slot = None;
    }

    Ok(reply)
}

fn remove_from_list(list: &mut Vec<String>, count: i64, value: &str) -> usize {
    let limit = if count == 0 {
        usize::MAX
    } else {
        count.unsigned_abs() as usize
    };

    let mut removed = 0;
    if count >= 0 {
        list.retain(|item| {
            if removed < limit && item == value {
                removed += 1;
                false
            } else {
                true
            }
        });
    } else {
        let mut index = list.len();
        while index > 0 && removed < limit {
            index -= 1;
            if list[index] == value {
                list.remove(index);
                removed += 1;
            }
        }
    }
    removed
}

fn reply_changed(op: &WriteOp, reply: &Reply) -> bool {
    match (op, reply) {
        (_, Reply::Flag(changed)) => *changed,
        (WriteOp::LRem { .. }, Reply::Len(removed)) => *removed > 0,
        _ => true,
    }
}

fn wrong_type(key: &str) -> StoreError {
    StoreError::WrongType {
        key: key.to_string(),
    }
}

fn flag(reply: Reply) -> StoreResult<bool> {
    match reply {
        Reply::Flag(value) => Ok(value),
        _ => Ok(true),
    }
}

fn int(reply: Reply) -> StoreResult<i64> {
    match reply {
        Reply::Int(value) => Ok(value),
        _ => Ok(0),
    }
}

fn len(reply: Reply) -> StoreResult<usize> {
    match reply {
        Reply::Len(value) => Ok(value),
        _ => Ok(0),
    }
}
