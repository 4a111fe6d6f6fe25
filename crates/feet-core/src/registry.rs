use std::collections::BTreeSet;
use std::sync::Arc;

use feet_store::{Store, glob_escape};
use tracing::info;

use crate::dictionary::Dictionary;
use crate::error::CoreError;
use crate::nlp::Parser;

/// Named group of dictionaries sharing the key prefix `<prefix>:registry:<name>`
#[derive(Clone)]
pub struct Registry {
    name: String,
    key_prefix: String,
    store: Store,
    parser: Arc<Parser>,
}

impl Registry {
    pub fn registry_list_key(key_prefix: &str) -> String {
        format!("{key_prefix}:registries")
    }

    pub fn registry_key(key_prefix: &str, name: &str) -> String {
        format!("{key_prefix}:registry:{name}")
    }

    /// Names of the registries under a prefix
    pub async fn list(store: &Store, key_prefix: &str) -> Result<BTreeSet<String>, CoreError> {
        let names = store
            .kv()
            .smembers(&Self::registry_list_key(key_prefix))
            .await?;
        Ok(names.into_iter().collect())
    }

    /// Deletes every registry, dictionary and term under a prefix
    pub async fn flush(store: &Store, key_prefix: &str) -> Result<bool, CoreError> {
        let kv = store.kv();
        let keys = kv.keys(&format!("{}:*", glob_escape(key_prefix))).await?;
        for key in &keys {
            kv.delete(key).await?;
        }

        info!(prefix = key_prefix, keys = keys.len(), "flushed");
        Ok(true)
    }

    pub async fn find_or_create(
        name: &str,
        key_prefix: &str,
        store: Store,
        parser: Arc<Parser>,
    ) -> Result<Self, CoreError> {
        store
            .kv()
            .sadd(&Self::registry_list_key(key_prefix), name)
            .await?;
        Ok(Self::new(name, key_prefix, store, parser))
    }

    pub fn new(name: &str, key_prefix: &str, store: Store, parser: Arc<Parser>) -> Self {
        Self {
            name: name.to_string(),
            key_prefix: key_prefix.to_string(),
            store,
            parser,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn key(&self) -> String {
        Self::registry_key(&self.key_prefix, &self.name)
    }

    pub fn dict_key(&self) -> String {
        format!("{}:dictionaries", self.key())
    }

    pub async fn dictionaries(&self) -> Result<BTreeSet<String>, CoreError> {
        let names = self.store.kv().smembers(&self.dict_key()).await?;
        Ok(names.into_iter().collect())
    }

    fn dictionary(&self, name: &str) -> Dictionary {
        Dictionary::new(name, &self.key(), self.store.clone(), self.parser.clone())
    }

    /// Registers the dictionary if needed and returns it
    pub async fn get_dict(&self, name: &str) -> Result<Dictionary, CoreError> {
        self.store.kv().sadd(&self.dict_key(), name).await?;
        Ok(self.dictionary(name))
    }

    /// Deletes a dictionary and its data. Returns `false` when it is unknown.
    pub async fn del_dict(&self, name: &str) -> Result<bool, CoreError> {
        if !self.store.kv().sismember(&self.dict_key(), name).await? {
            return Ok(false);
        }

        self.dictionary(name).delete().await?;
        Ok(self.store.kv().srem(&self.dict_key(), name).await?)
    }

    /// Unlists the registry and removes everything under it
    pub async fn delete(&self) -> Result<bool, CoreError> {
        info!(registry = %self.name, "deleting registry");

        let removed = self
            .store
            .kv()
            .srem(&Self::registry_list_key(&self.key_prefix), &self.name)
            .await?;
        if !removed {
            return Ok(false);
        }

        self.reset().await?;
        Ok(true)
    }

    /// Deletes every dictionary of the registry. Returns `false` when it had none.
    pub async fn reset(&self) -> Result<bool, CoreError> {
        let kv = self.store.kv();
        if !kv.delete(&self.dict_key()).await? {
            return Ok(false);
        }

        let keys = kv.keys(&format!("{}:*", glob_escape(&self.key()))).await?;
        for key in &keys {
            kv.delete(key).await?;
        }

        info!(registry = %self.name, keys = keys.len(), "registry reset");
        Ok(true)
    }
}
