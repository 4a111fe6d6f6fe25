use std::env;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::env_parse;

fn default_timeout_seconds() -> u64 {
    180
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractorConfig {
    /// Budget for a whole extraction call
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
    /// Chunk grammar, the built-in noun phrase grammar when unset
    pub grammar: Option<String>,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: default_timeout_seconds(),
            grammar: None,
        }
    }
}

impl ExtractorConfig {
    pub fn new() -> Self {
        let timeout_seconds = env_parse("TIMEOUT").unwrap_or_else(default_timeout_seconds);
        let grammar = env::var("FEET_GRAMMAR").ok().filter(|g| !g.trim().is_empty());

        Self {
            timeout_seconds,
            grammar,
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}
