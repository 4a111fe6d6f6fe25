use std::collections::{BTreeSet, HashSet};
use std::sync::Arc;
use std::time::{Duration, Instant};

use feet_config::extractor::ExtractorConfig;
use feet_types::{Extraction, ExtractionResult};
use tracing::{debug, warn};

use crate::dictionary::Dictionary;
use crate::error::CoreError;
use crate::grammar::Grammar;
use crate::language::LanguageError;

/// A candidate survives only when strictly more than this share of its tokens
/// appear in the chunk
pub const SELECTION_RATIO: f64 = 2.0 / 3.0;

/// Matches chunks of free text against one dictionary
#[derive(Clone)]
pub struct Extractor {
    dictionary: Dictionary,
    grammar: Arc<Grammar>,
    timeout: Duration,
}

impl Extractor {
    pub fn new(dictionary: Dictionary) -> Self {
        Self {
            dictionary,
            grammar: Arc::new(Grammar::default()),
            timeout: ExtractorConfig::default().timeout(),
        }
    }

    pub fn from_config(dictionary: Dictionary, config: &ExtractorConfig) -> Result<Self, CoreError> {
        let mut extractor = Self::new(dictionary).with_timeout(config.timeout());
        if let Some(source) = &config.grammar {
            extractor = extractor.with_grammar(Grammar::parse(source)?);
        }
        Ok(extractor)
    }

    pub fn with_grammar(mut self, grammar: Grammar) -> Self {
        self.grammar = Arc::new(grammar);
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn dictionary(&self) -> &Dictionary {
        &self.dictionary
    }

    pub fn grammar(&self) -> &Grammar {
        &self.grammar
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Classifies every chunk of `text`. The whole call fails with
    /// [`CoreError::TimeoutExceeded`] once the configured budget is spent.
    pub async fn extract(&self, text: &str, lang: Option<&str>) -> Result<Extraction, CoreError> {
        match tokio::time::timeout(self.timeout, self.run(text, lang)).await {
            Ok(extraction) => extraction,
            Err(_) => {
                warn!(
                    dictionary = %self.dictionary.name(),
                    timeout = ?self.timeout,
                    "extraction timed out"
                );
                Err(CoreError::TimeoutExceeded(self.timeout))
            }
        }
    }

    async fn run(&self, text: &str, lang: Option<&str>) -> Result<Extraction, CoreError> {
        let started = Instant::now();

        let parser = self.dictionary.parser().clone();
        let grammar = self.grammar.clone();
        let owned = text.to_string();
        let requested = lang.map(str::to_string);

        let (chunks, language) = tokio::task::spawn_blocking(move || {
            parser.extract_chunks(&owned, &grammar, requested.as_deref())
        })
        .await
        .map_err(|e| LanguageError::Failed(format!("chunking task failed: {e}")))??;

        let mut results = Vec::new();
        for (position, chunk) in chunks.into_iter().enumerate() {
            let (entities, not_entity) = self.lookup(&chunk, &language).await?;
            match ExtractionResult::new(position, chunk, entities, not_entity) {
                Some(result) => results.push(result),
                None => debug!(position, "chunk has no signal, dropped"),
            }
        }

        Ok(Extraction {
            language,
            results,
            elapsed: started.elapsed(),
        })
    }

    /// Entity candidates of a chunk, plus the tokens that had candidates but
    /// none similar enough
    pub async fn lookup(
        &self,
        chunk: &str,
        lang: &str,
    ) -> Result<(BTreeSet<String>, Vec<String>), CoreError> {
        if self.dictionary.exact_match(chunk, lang).await? {
            debug!(chunk, "exact match");
            return Ok((BTreeSet::from([chunk.to_string()]), Vec::new()));
        }

        let tokens = self
            .dictionary
            .parser()
            .word_tokenize(chunk, Some(lang))?;
        let chunk_tokens: HashSet<String> = tokens.iter().map(|t| t.to_lowercase()).collect();

        let mut options = Vec::new();
        let mut not_entity = Vec::new();

        for token in tokens {
            let choices = self.dictionary.candidates(&token, lang).await?;
            if choices.is_empty() {
                continue;
            }

            let selected = self.select_best_choice(&chunk_tokens, choices, lang).await?;
            if selected.is_empty() {
                debug!(chunk, token, "no candidate passed the selection ratio");
                not_entity.push(token);
            } else {
                options.push(selected);
            }
        }

        Ok((intersection(options), not_entity))
    }

    async fn select_best_choice(
        &self,
        chunk_tokens: &HashSet<String>,
        choices: HashSet<String>,
        lang: &str,
    ) -> Result<BTreeSet<String>, CoreError> {
        let mut selected = BTreeSet::new();
        for choice in choices {
            let choice_tokens = self.dictionary.tokens(&choice, lang).await?;
            let ratio = selection_ratio(&choice_tokens, chunk_tokens);
            if ratio > SELECTION_RATIO {
                selected.insert(choice);
            }
        }
        Ok(selected)
    }
}

/// Share of a candidate's tokens present in the chunk, 0 for a tokenless candidate
pub fn selection_ratio(candidate_tokens: &HashSet<String>, chunk_tokens: &HashSet<String>) -> f64 {
    if candidate_tokens.is_empty() {
        return 0.0;
    }
    let shared = candidate_tokens.intersection(chunk_tokens).count();
    shared as f64 / candidate_tokens.len() as f64
}

fn intersection(options: Vec<BTreeSet<String>>) -> BTreeSet<String> {
    let mut options = options.into_iter();
    let Some(first) = options.next() else {
        return BTreeSet::new();
    };
    options.fold(first, |acc, set| acc.intersection(&set).cloned().collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(items: &[&str]) -> HashSet<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_ratio_boundary_is_exclusive() {
        let chunk = set(&["new", "york"]);

        let two_of_three = selection_ratio(&set(&["new", "york", "pizza"]), &chunk);
        assert!(two_of_three <= SELECTION_RATIO);

        let two_of_two = selection_ratio(&set(&["new", "york"]), &chunk);
        assert!(two_of_two > SELECTION_RATIO);

        assert_eq!(selection_ratio(&HashSet::new(), &chunk), 0.0);
    }

    #[test]
    fn test_intersection() {
        let a: BTreeSet<String> = ["x", "y"].iter().map(|s| s.to_string()).collect();
        let b: BTreeSet<String> = ["y", "z"].iter().map(|s| s.to_string()).collect();

        assert_eq!(intersection(vec![]), BTreeSet::new());
        assert_eq!(intersection(vec![a.clone()]), a);
        assert_eq!(
            intersection(vec![a, b]),
            BTreeSet::from(["y".to_string()])
        );
    }
}
