use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use feet_store::{KeyValueStore, MemoryStore, Store, StoreError, StoreResult, WatchToken, WriteOp};

use crate::dictionary::Dictionary;
use crate::language::{LanguageError, LanguageProcessor, TaggedToken, Token};
use crate::nlp::Parser;


/// Whitespace tokenizer with a tiny closed-class lexicon; capitalized words
/// are proper nouns, everything else a common noun
pub(crate) struct PlainProcessor {
    code: String,
    delay: Option<Duration>,
}

impl PlainProcessor {
    pub(crate) fn new(code: &str) -> Self {
        Self {
            code: code.to_string(),
            delay: None,
        }
    }

    pub(crate) fn slow(code: &str, delay: Duration) -> Self {
        Self {
            code: code.to_string(),
            delay: Some(delay),
        }
    }
}

impl LanguageProcessor for PlainProcessor {
    fn language_code(&self) -> &str {
        &self.code
    }

    fn normalize(&self, text: &str) -> String {
        text.trim().to_lowercase()
    }

    fn sentences(&self, text: &str) -> Vec<String> {
        text.split(['.', '!', '?'])
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect()
    }

    fn tokenize(&self, text: &str) -> Result<Vec<Token>, LanguageError> {
        if let Some(delay) = self.delay {
            std::thread::sleep(delay);
        }

        Ok(text
            .split(|c: char| c.is_whitespace() || (c.is_ascii_punctuation() && c != '-'))
            .filter(|w| !w.is_empty())
            .enumerate()
            .map(|(i, w)| Token::new(w, self.normalize(w), i))
            .collect())
    }

    fn tag(&self, tokens: &[Token]) -> Vec<TaggedToken> {
        tokens
            .iter()
            .map(|t| {
                let tag = match t.normalized.as_str() {
                    "i" | "we" | "you" => "PRP",
                    "want" | "buy" | "is" | "love" => "VB",
                    "to" => "TO",
                    "for" | "in" | "of" => "IN",
                    "the" | "a" => "DT",
                    _ if t.surface.starts_with(char::is_uppercase) => "NNP",
                    _ => "NN",
                };
                TaggedToken::new(t.clone(), tag)
            })
            .collect()
    }
}

pub(crate) fn parser() -> Arc<Parser> {
    Arc::new(
        Parser::new("en")
            .with_processor(Arc::new(PlainProcessor::new("en")))
            .with_processor(Arc::new(PlainProcessor::new("fr"))),
    )
}

pub(crate) fn dictionary(name: &str) -> Dictionary {
    Dictionary::new(name, "test", Store::in_memory(), parser())
}

/// Processor whose tokenizer fails on every call
pub(crate) struct BrokenProcessor {
    code: String,
}

impl BrokenProcessor {
    pub(crate) fn new(code: &str) -> Self {
        Self {
            code: code.to_string(),
        }
    }
}

impl LanguageProcessor for BrokenProcessor {
    fn language_code(&self) -> &str {
        &self.code
    }

    fn normalize(&self, text: &str) -> String {
        text.to_string()
    }

    fn sentences(&self, text: &str) -> Vec<String> {
        vec![text.to_string()]
    }

    fn tokenize(&self, _text: &str) -> Result<Vec<Token>, LanguageError> {
        Err(LanguageError::Failed(format!("{} tokenizer crashed", self.code)))
    }

    fn tag(&self, _tokens: &[Token]) -> Vec<TaggedToken> {
        Vec::new()
    }
}

/// Memory backend that can be switched off, can refuse every commit, and can
/// apply foreign writes right before the next commit
#[derive(Default)]
pub(crate) struct FaultyStore {
    inner: MemoryStore,
    down: AtomicBool,
    reject_commits: AtomicBool,
    before_commit: Mutex<Vec<WriteOp>>,
}

impl FaultyStore {
    pub(crate) fn set_down(&self, down: bool) {
        self.down.store(down, Ordering::SeqCst);
    }

    pub(crate) fn set_reject_commits(&self, reject: bool) {
        self.reject_commits.store(reject, Ordering::SeqCst);
    }

    /// Writes committed by "someone else" just before our next commit
    pub(crate) fn interleave(&self, ops: Vec<WriteOp>) {
        *self.before_commit.lock().unwrap() = ops;
    }

    fn check(&self) -> StoreResult<()> {
        if self.down.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("connection refused".into()));
        }
        Ok(())
    }
}

#[async_trait]
impl KeyValueStore for FaultyStore {
    async fn exists(&self, key: &str) -> StoreResult<bool> {
        self.check()?;
        self.inner.exists(key).await
    }

    async fn keys(&self, pattern: &str) -> StoreResult<Vec<String>> {
        self.check()?;
        self.inner.keys(pattern).await
    }

    async fn get(&self, key: &str) -> StoreResult<Option<String>> {
        self.check()?;
        self.inner.get(key).await
    }

    async fn set(&self, key: &str, value: &str) -> StoreResult<()> {
        self.check()?;
        self.inner.set(key, value).await
    }

    async fn delete(&self, key: &str) -> StoreResult<bool> {
        self.check()?;
        self.inner.delete(key).await
    }

    async fn incr(&self, key: &str) -> StoreResult<i64> {
        self.check()?;
        self.inner.incr(key).await
    }

    async fn decr(&self, key: &str) -> StoreResult<i64> {
        self.check()?;
        self.inner.decr(key).await
    }

    async fn sadd(&self, key: &str, member: &str) -> StoreResult<bool> {
        self.check()?;
        self.inner.sadd(key, member).await
    }

    async fn srem(&self, key: &str, member: &str) -> StoreResult<bool> {
        self.check()?;
        self.inner.srem(key, member).await
    }

    async fn sismember(&self, key: &str, member: &str) -> StoreResult<bool> {
        self.check()?;
        self.inner.sismember(key, member).await
    }

    async fn smembers(&self, key: &str) -> StoreResult<HashSet<String>> {
        self.check()?;
        self.inner.smembers(key).await
    }

    async fn rpush(&self, key: &str, value: &str) -> StoreResult<usize> {
        self.check()?;
        self.inner.rpush(key, value).await
    }

    async fn lrange(&self, key: &str, start: i64, stop: i64) -> StoreResult<Vec<String>> {
        self.check()?;
        self.inner.lrange(key, start, stop).await
    }

    async fn lrem(&self, key: &str, count: i64, value: &str) -> StoreResult<usize> {
        self.check()?;
        self.inner.lrem(key, count, value).await
    }

    async fn watch(&self, keys: &[String]) -> StoreResult<WatchToken> {
        self.check()?;
        self.inner.watch(keys).await
    }

    async fn exec(&self, token: WatchToken, ops: Vec<WriteOp>) -> StoreResult<bool> {
        self.check()?;
        if self.reject_commits.load(Ordering::SeqCst) {
            return Ok(false);
        }

        let foreign = std::mem::take(&mut *self.before_commit.lock().unwrap());
        if !foreign.is_empty() {
            assert!(self.inner.exec(WatchToken::default(), foreign).await?);
        }
        self.inner.exec(token, ops).await
    }
}

/// A dictionary over a [`FaultyStore`] the test keeps a handle to
pub(crate) fn faulty_dictionary(name: &str, max_attempts: usize) -> (Dictionary, Arc<FaultyStore>) {
    let backend = Arc::new(FaultyStore::default());
    let store = Store::new(backend.clone()).with_max_attempts(max_attempts);
    (Dictionary::new(name, "test", store, parser()), backend)
}
