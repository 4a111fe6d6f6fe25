use std::env;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};

use self::extractor::ExtractorConfig;
use self::logging::LoggingConfig;
use self::store::StoreConfig;

pub mod extractor;
pub mod logging;
pub mod store;

fn default_language() -> String {
    "en".to_string()
}

fn default_registry() -> String {
    "feet".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub store: StoreConfig,
    pub extractor: ExtractorConfig,
    pub logging: LoggingConfig,

    /// Language used when none is given and detection is inconclusive
    #[serde(default = "default_language")]
    pub default_language: String,
    /// Registry dictionaries are grouped under by default
    #[serde(default = "default_registry")]
    pub registry: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            store: StoreConfig::default(),
            extractor: ExtractorConfig::default(),
            logging: LoggingConfig::default(),
            default_language: default_language(),
            registry: default_registry(),
        }
    }
}

impl Config {
    /// Build the configuration from environment variables
    pub fn new() -> Self {
        let default_language = env::var("FEET_DEFAULT_LANG").unwrap_or_else(|_| default_language());
        let registry = env::var("FEET_REGISTRY").unwrap_or_else(|_| default_registry());

        Config {
            store: StoreConfig::new(),
            extractor: ExtractorConfig::new(),
            logging: LoggingConfig::new(),

            default_language,
            registry,
        }
    }

    /// Load a JSON profile, falling back to the environment when no path is given
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let Some(path) = path else {
            return Ok(Self::new());
        };

        tracing::info!("Loading config from {}", path.display());
        let file = File::open(path)
            .with_context(|| format!("Failed to open config file {}", path.display()))?;
        let config = serde_json::from_reader(BufReader::new(file))
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;
        Ok(config)
    }
}

/// Parse an environment variable, `None` when unset or unparsable
pub(crate) fn env_parse<T: std::str::FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|v| v.parse().ok())
}
