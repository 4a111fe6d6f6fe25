//! Term index: one named dictionary, partitioned by language.
//!
//! Per language `L` the store holds, under `<prefix>:entity:<name>:lang:<L>`:
//!
//! - `:terms` the terms in insertion order (list)
//! - `:term:<term>` the tokens of a term, the forward index (set)
//! - `:dictionary:<token>` the terms containing a token, the inverted index (set)
//! - `:cardinality` the number of terms (counter)
//!
//! and `<prefix>:entity:<name>:languages` lists the languages in use.
//! Term and token keys are lower-cased.

use std::collections::{BTreeSet, HashSet};
use std::io::Read;
use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use feet_store::{Store, StoreResult, Transaction, TxContext, glob_escape};
use feet_types::LoadReport;
use tracing::{debug, info, warn};

use crate::error::CoreError;
use crate::loader::{self, TermFormat};
use crate::nlp::Parser;

#[derive(Clone)]
pub struct Dictionary {
    name: String,
    key: String,
    store: Store,
    parser: Arc<Parser>,
}

/// Keys of one language partition
#[derive(Debug, Clone)]
struct LangKeys {
    base: String,
}

impl LangKeys {
    fn terms(&self) -> String {
        format!("{}:terms", self.base)
    }

    fn term(&self, term: &str) -> String {
        format!("{}:term:{}", self.base, term.to_lowercase())
    }

    fn token(&self, token: &str) -> String {
        format!("{}:dictionary:{}", self.base, token.to_lowercase())
    }

    fn cardinality(&self) -> String {
        format!("{}:cardinality", self.base)
    }

    fn pattern(&self) -> String {
        format!("{}:*", glob_escape(&self.base))
    }
}

impl Dictionary {
    pub fn new(name: &str, key_prefix: &str, store: Store, parser: Arc<Parser>) -> Self {
        Self {
            name: name.to_string(),
            key: Self::dict_key(key_prefix, name),
            store,
            parser,
        }
    }

    pub fn dict_key(key_prefix: &str, name: &str) -> String {
        format!("{key_prefix}:entity:{name}")
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn parser(&self) -> &Arc<Parser> {
        &self.parser
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    fn lang(&self, lang: &str) -> LangKeys {
        LangKeys {
            base: format!("{}:lang:{}", self.key, lang),
        }
    }

    pub fn terms_list_key(&self, lang: &str) -> String {
        self.lang(lang).terms()
    }

    pub fn term_key(&self, lang: &str, term: &str) -> String {
        self.lang(lang).term(term)
    }

    pub fn token_key(&self, lang: &str, token: &str) -> String {
        self.lang(lang).token(token)
    }

    pub fn cardinality_key(&self, lang: &str) -> String {
        self.lang(lang).cardinality()
    }

    pub fn languages_key(&self) -> String {
        format!("{}:languages", self.key)
    }

    pub async fn languages(&self) -> Result<BTreeSet<String>, CoreError> {
        let members = self.store.kv().smembers(&self.languages_key()).await?;
        Ok(members.into_iter().collect())
    }

    /// Returns whether the language was newly registered
    pub async fn add_language(&self, lang: &str) -> Result<bool, CoreError> {
        Ok(self.store.kv().sadd(&self.languages_key(), lang).await?)
    }

    /// Registers `new_lang`; terms stay under `lang`
    pub async fn change_language(&self, lang: &str, new_lang: &str) -> Result<bool, CoreError> {
        debug!(dictionary = %self.name, from = lang, to = new_lang, "change language");
        self.add_language(new_lang).await
    }

    /// Removes every key of the language. Returns whether it was registered.
    pub async fn delete_language(&self, lang: &str) -> Result<bool, CoreError> {
        let keys = self.lang(lang);
        let body = DeleteLanguage {
            pattern: keys.pattern(),
            languages_key: self.languages_key(),
            lang: lang.to_string(),
        };

        let deleted = self
            .store
            .transaction(&[self.languages_key(), keys.cardinality()], &body)
            .await?;

        if deleted {
            info!(dictionary = %self.name, lang, "language deleted");
        }
        Ok(deleted)
    }

    pub async fn cardinality(&self, lang: &str) -> Result<u64, CoreError> {
        let key = self.cardinality_key(lang);
        let Some(value) = self.store.kv().get(&key).await? else {
            return Ok(0);
        };

        match value.trim().parse::<i64>() {
            Ok(count) => Ok(count.max(0) as u64),
            Err(_) => {
                warn!(key, value, "cardinality is not a number");
                Ok(0)
            }
        }
    }

    /// Adds a term. Returns `false` when it is already present or has no tokens.
    pub async fn add_term(&self, term: &str, lang: &str) -> Result<bool, CoreError> {
        let term = term.trim();
        if term.is_empty() {
            return Ok(false);
        }

        let tokens: BTreeSet<String> = self
            .parser
            .word_tokenize(term, Some(lang))?
            .into_iter()
            .collect();
        if tokens.is_empty() {
            debug!(dictionary = %self.name, term, lang, "term has no tokens");
            return Ok(false);
        }

        let keys = self.lang(lang);
        let term_key = keys.term(term);
        let body = AddTerm {
            keys,
            languages_key: self.languages_key(),
            lang: lang.to_string(),
            term: term.to_string(),
            tokens,
        };

        Ok(self.store.transaction(&[term_key], &body).await?)
    }

    /// Removes a term and its index entries. Returns `false` when it is absent.
    pub async fn delete_term(&self, term: &str, lang: &str) -> Result<bool, CoreError> {
        let term = term.trim();
        if term.is_empty() {
            return Ok(false);
        }

        let keys = self.lang(lang);
        let term_key = keys.term(term);
        let body = DeleteTerm {
            keys,
            lowered: term.to_lowercase(),
        };

        Ok(self.store.transaction(&[term_key], &body).await?)
    }

    pub async fn exact_match(&self, candidate: &str, lang: &str) -> Result<bool, CoreError> {
        Ok(self
            .store
            .kv()
            .exists(&self.term_key(lang, candidate.trim()))
            .await?)
    }

    /// Terms (lower-cased) containing `token`
    pub async fn candidates(&self, token: &str, lang: &str) -> Result<HashSet<String>, CoreError> {
        Ok(self
            .store
            .kv()
            .smembers(&self.token_key(lang, token))
            .await?)
    }

    pub async fn tokens(&self, term: &str, lang: &str) -> Result<HashSet<String>, CoreError> {
        Ok(self
            .store
            .kv()
            .smembers(&self.term_key(lang, term.trim()))
            .await?)
    }

    /// One page of terms in insertion order
    pub async fn terms(&self, lang: &str, page: usize, count: usize) -> Result<Vec<String>, CoreError> {
        let Some((start, stop)) = page_range(page, count) else {
            return Ok(Vec::new());
        };

        Ok(self
            .store
            .kv()
            .lrange(&self.terms_list_key(lang), start, stop)
            .await?)
    }

    pub async fn load_list<I, S>(&self, terms: I, lang: &str) -> Result<LoadReport, CoreError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut report = LoadReport::default();
        for term in terms {
            report.seen += 1;
            if self.add_term(term.as_ref(), lang).await? {
                report.added += 1;
            }
        }
        Ok(report)
    }

    pub async fn load_reader<R: Read>(
        &self,
        reader: R,
        format: TermFormat,
        lang: &str,
    ) -> Result<LoadReport, CoreError> {
        let terms = loader::read_terms(reader, format)?;
        self.load_list(terms, lang).await
    }

    pub async fn load_file(
        &self,
        path: &Path,
        format: TermFormat,
        lang: &str,
    ) -> Result<LoadReport, CoreError> {
        info!(dictionary = %self.name, path = %path.display(), lang, "loading terms");

        let terms = loader::read_terms_file(path, format)?;
        let report = self.load_list(terms, lang).await?;

        info!(
            dictionary = %self.name,
            seen = report.seen,
            added = report.added,
            "terms loaded"
        );
        Ok(report)
    }

    /// Removes every key of the dictionary
    pub async fn delete(&self) -> Result<bool, CoreError> {
        info!(dictionary = %self.name, "deleting dictionary");

        let kv = self.store.kv();
        let keys = kv.keys(&format!("{}:*", glob_escape(&self.key))).await?;
        for key in &keys {
            kv.delete(key).await?;
        }

        info!(dictionary = %self.name, keys = keys.len(), "dictionary deleted");
        Ok(true)
    }
}

/// Inclusive list range of a page, `None` when empty or out of addressable range
fn page_range(page: usize, count: usize) -> Option<(i64, i64)> {
    if count == 0 {
        return None;
    }
    let start = i64::try_from(page.checked_mul(count)?).ok()?;
    let stop = start.checked_add(i64::try_from(count).ok()? - 1)?;
    Some((start, stop))
}

struct AddTerm {
    keys: LangKeys,
    languages_key: String,
    lang: String,
    term: String,
    tokens: BTreeSet<String>,
}

#[async_trait]
impl Transaction for AddTerm {
    type Output = bool;

    async fn run(&self, tx: &mut TxContext<'_>) -> StoreResult<bool> {
        let term_key = self.keys.term(&self.term);
        if tx.exists(&term_key).await? {
            return Ok(false);
        }

        // Same batch as the term: a language deletion racing with us must not
        // leave the term under an unlisted language
        tx.sadd(self.languages_key.as_str(), self.lang.as_str());

        let lowered = self.term.to_lowercase();
        tx.rpush(self.keys.terms(), self.term.as_str());
        tx.incr(self.keys.cardinality());
        for token in &self.tokens {
            tx.sadd(self.keys.token(token), lowered.as_str());
            tx.sadd(term_key.as_str(), token.as_str());
        }

        Ok(true)
    }
}

struct DeleteTerm {
    keys: LangKeys,
    lowered: String,
}

#[async_trait]
impl Transaction for DeleteTerm {
    type Output = bool;

    async fn run(&self, tx: &mut TxContext<'_>) -> StoreResult<bool> {
        let term_key = self.keys.term(&self.lowered);
        let tokens = tx.smembers(&term_key).await?;
        if tokens.is_empty() {
            return Ok(false);
        }

        for token in &tokens {
            if !tx.sismember(&self.keys.token(token), &self.lowered).await? {
                warn!(term = %self.lowered, token, "inverted index is missing term");
                tx.discard();
                return Ok(false);
            }
        }

        let listed: BTreeSet<String> = tx
            .lrange(&self.keys.terms(), 0, -1)
            .await?
            .into_iter()
            .filter(|t| t.to_lowercase() == self.lowered)
            .collect();
        if listed.is_empty() {
            warn!(term = %self.lowered, "term list is missing term");
            tx.discard();
            return Ok(false);
        }

        tx.delete(term_key);
        for token in &tokens {
            tx.srem(self.keys.token(token), self.lowered.as_str());
        }
        for entry in listed {
            tx.lrem(self.keys.terms(), 0, entry);
        }
        tx.decr(self.keys.cardinality());

        Ok(true)
    }
}

struct DeleteLanguage {
    pattern: String,
    languages_key: String,
    lang: String,
}

#[async_trait]
impl Transaction for DeleteLanguage {
    type Output = bool;

    async fn run(&self, tx: &mut TxContext<'_>) -> StoreResult<bool> {
        for key in tx.keys(&self.pattern).await? {
            tx.delete(key);
        }

        let registered = tx.sismember(&self.languages_key, &self.lang).await?;
        tx.srem(self.languages_key.as_str(), self.lang.as_str());

        Ok(registered)
    }
}
