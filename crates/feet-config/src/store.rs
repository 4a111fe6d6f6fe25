use std::env;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::env_parse;

fn default_prefix() -> String {
    "feet".to_string()
}

fn default_max_attempts() -> usize {
    16
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Namespace every key starts with
    #[serde(default = "default_prefix")]
    pub prefix: String,
    /// Optimistic transaction attempts before giving up
    #[serde(default = "default_max_attempts")]
    pub max_attempts: usize,
    /// JSON file the store is kept in, nothing outlives the process when unset
    pub path: Option<PathBuf>,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            prefix: default_prefix(),
            max_attempts: default_max_attempts(),
            path: None,
        }
    }
}

impl StoreConfig {
    pub fn new() -> Self {
        let prefix = env::var("FEET_KEY_PREFIX").unwrap_or_else(|_| default_prefix());
        let max_attempts = env_parse("FEET_TX_ATTEMPTS").unwrap_or_else(default_max_attempts);
        let path = env::var_os("FEET_STORE_PATH")
            .filter(|p| !p.is_empty())
            .map(PathBuf::from);

        Self {
            prefix,
            max_attempts,
            path,
        }
    }
}
