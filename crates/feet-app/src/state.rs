use std::sync::Arc;

use anyhow::Context;
use feet_config::Config;
use feet_core::{Dictionary, Extractor, Parser, Registry};
use feet_lang_european::EuropeanProcessor;
use feet_lang_japanese::JapaneseProcessor;
use feet_store::{FileStore, KeyValueStore, MemoryStore, Store};
use tracing::info;

pub struct AppState {
    pub config: Config,
    pub store: Store,
    pub parser: Arc<Parser>,
}

impl AppState {
    pub fn new(config: Config) -> anyhow::Result<Self> {
        let parser = Parser::new(&config.default_language)
            .with_processor(Arc::new(EuropeanProcessor::english()))
            .with_processor(Arc::new(EuropeanProcessor::french()))
            .with_processor(Arc::new(JapaneseProcessor::new()));

        let backend: Arc<dyn KeyValueStore> = match &config.store.path {
            Some(path) => Arc::new(
                FileStore::open(path)
                    .with_context(|| format!("Failed to open store {}", path.display()))?,
            ),
            None => {
                info!("No store path configured, dictionaries last for this run only");
                Arc::new(MemoryStore::new())
            }
        };
        let store = Store::new(backend).with_max_attempts(config.store.max_attempts);

        Ok(Self {
            config,
            store,
            parser: Arc::new(parser),
        })
    }

    /// The configured registry, created on first use
    pub async fn registry(&self) -> anyhow::Result<Registry> {
        Ok(Registry::find_or_create(
            &self.config.registry,
            &self.config.store.prefix,
            self.store.clone(),
            self.parser.clone(),
        )
        .await?)
    }

    /// Dictionary `name` of the configured registry
    pub async fn dictionary(&self, name: &str) -> anyhow::Result<Dictionary> {
        Ok(self.registry().await?.get_dict(name).await?)
    }

    pub fn extractor(&self, dictionary: Dictionary) -> anyhow::Result<Extractor> {
        Ok(Extractor::from_config(dictionary, &self.config.extractor)?)
    }

    /// Language for terms when the command line names none
    pub fn language(&self, lang: Option<&str>) -> String {
        lang.map(str::to_string)
            .unwrap_or_else(|| self.config.default_language.clone())
    }

    /// Language of `text`: the given one, else detected, else the default
    pub fn text_language(&self, text: &str, lang: Option<&str>) -> String {
        match lang {
            Some(lang) => lang.to_string(),
            None => self
                .parser
                .detect_language(Some(text))
                .unwrap_or_else(|| self.config.default_language.clone()),
        }
    }
}
