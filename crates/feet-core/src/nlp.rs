use std::collections::HashMap;
use std::sync::Arc;

use tracing::{debug, warn};

use crate::detect::ScriptDetector;
use crate::grammar::Grammar;
use crate::language::{LanguageDetector, LanguageError, LanguageProcessor};

/// Names accepted alongside the ISO codes
const ALIASES: &[(&str, &str)] = &[
    ("english", "en"),
    ("french", "fr"),
    ("japanese", "ja"),
];

/// Routes text to the processor of its language.
///
/// Requests for a language without a registered processor fall back to the
/// default language's processor.
pub struct Parser {
    processors: HashMap<String, Arc<dyn LanguageProcessor>>,
    detector: Arc<dyn LanguageDetector>,
    default_language: String,
}

impl Parser {
    pub fn new(default_language: &str) -> Self {
        let default_language = Self::canonical(default_language);
        Self {
            processors: HashMap::new(),
            detector: Arc::new(ScriptDetector::new().with_fallback(default_language.clone())),
            default_language,
        }
    }

    pub fn with_processor(mut self, processor: Arc<dyn LanguageProcessor>) -> Self {
        let code = Self::canonical(processor.language_code());
        self.processors.insert(code, processor);
        self
    }

    pub fn with_detector(mut self, detector: Arc<dyn LanguageDetector>) -> Self {
        self.detector = detector;
        self
    }

    pub fn default_language(&self) -> &str {
        &self.default_language
    }

    /// Registered language codes, sorted
    pub fn languages(&self) -> Vec<String> {
        let mut codes: Vec<String> = self.processors.keys().cloned().collect();
        codes.sort();
        codes
    }

    /// Lower-cased code with aliases resolved: "English" -> "en"
    pub fn canonical(language: &str) -> String {
        let language = language.trim().to_lowercase();
        ALIASES
            .iter()
            .find(|(alias, _)| *alias == language)
            .map(|(_, code)| code.to_string())
            .unwrap_or(language)
    }

    pub fn processor(&self, language: &str) -> Result<Arc<dyn LanguageProcessor>, LanguageError> {
        let code = Self::canonical(language);
        if let Some(processor) = self.processors.get(&code) {
            return Ok(processor.clone());
        }

        debug!(
            "No processor for '{}', using default '{}'",
            code, self.default_language
        );
        self.processors
            .get(&self.default_language)
            .cloned()
            .ok_or(LanguageError::UnsupportedLanguage(code))
    }

    fn processor_or_default(
        &self,
        language: Option<&str>,
    ) -> Result<Arc<dyn LanguageProcessor>, LanguageError> {
        self.processor(language.unwrap_or(&self.default_language))
    }

    /// `None` only for absent or blank text
    pub fn detect_language(&self, text: Option<&str>) -> Option<String> {
        let text = text?;
        if text.trim().is_empty() {
            return None;
        }

        match self.detector.detect(text) {
            Some(language) => Some(language),
            None => {
                warn!("Language detection failed, using '{}'", self.default_language);
                Some(self.default_language.clone())
            }
        }
    }

    /// Normalized word tokens of a sentence
    pub fn word_tokenize(
        &self,
        text: &str,
        language: Option<&str>,
    ) -> Result<Vec<String>, LanguageError> {
        let processor = self.processor_or_default(language)?;
        Ok(processor
            .tokenize(text)?
            .into_iter()
            .map(|t| t.normalized)
            .collect())
    }

    pub fn sent_tokenize(
        &self,
        text: &str,
        language: Option<&str>,
    ) -> Result<Vec<String>, LanguageError> {
        let processor = self.processor_or_default(language)?;
        Ok(processor.sentences(text))
    }

    /// Word tokens grouped by sentence
    pub fn tokenize(
        &self,
        text: Option<&str>,
        language: Option<&str>,
    ) -> Result<Vec<Vec<String>>, LanguageError> {
        let Some(text) = text else {
            return Ok(Vec::new());
        };

        let processor = self.processor_or_default(language)?;
        let mut sentences = Vec::new();
        for sentence in processor.sentences(text) {
            let tokens = processor.tokenize(&sentence)?;
            sentences.push(tokens.into_iter().map(|t| t.normalized).collect());
        }
        Ok(sentences)
    }

    /// Candidate phrases of `text` and the language they belong to.
    ///
    /// Without an explicit language the text is run through the detector.
    pub fn extract_chunks(
        &self,
        text: &str,
        grammar: &Grammar,
        language: Option<&str>,
    ) -> Result<(Vec<String>, String), LanguageError> {
        let language = match language {
            Some(language) => language.to_string(),
            None => self
                .detect_language(Some(text))
                .unwrap_or_else(|| self.default_language.clone()),
        };

        let processor = self.processor(&language)?;
        let chunks = processor.chunk(text, grammar)?;
        debug!(
            "Extracted {} chunks using '{}' processor",
            chunks.len(),
            processor.language_code()
        );

        Ok((chunks, language))
    }
}
