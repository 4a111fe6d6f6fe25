use crate::grammar::Grammar;

/// Text processing interface for language implementations
///
/// A processor owns everything that depends on how a language is written:
/// normalization, sentence and word segmentation, part-of-speech tagging and
/// turning tagged text into candidate phrases.
pub trait LanguageProcessor: Send + Sync {
    /// Language identifier (ISO 639-1 code: "en", "fr", "ja", ...)
    fn language_code(&self) -> &str;

    /// Normalize text (Unicode normalization, whitespace, etc.)
    fn normalize(&self, text: &str) -> String;

    /// Split text into sentences
    fn sentences(&self, text: &str) -> Vec<String>;

    /// Break a sentence into tokens. `Token::normalized` is what the term index
    /// stores and compares, so it must be stable for identical input.
    fn tokenize(&self, text: &str) -> Result<Vec<Token>, LanguageError>;

    /// Assign a part-of-speech tag to every token
    fn tag(&self, tokens: &[Token]) -> Vec<TaggedToken>;

    /// Candidate phrases of `text`, in reading order
    fn chunk(&self, text: &str, grammar: &Grammar) -> Result<Vec<String>, LanguageError> {
        let mut chunks = Vec::new();
        for sentence in self.sentences(text) {
            let tokens = self.tokenize(&sentence)?;
            let tagged = self.tag(&tokens);
            chunks.extend(grammar.chunk(&tagged));
        }
        Ok(chunks)
    }
}

/// Guesses the dominant language of a text
pub trait LanguageDetector: Send + Sync {
    fn detect(&self, text: &str) -> Option<String>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub surface: String,
    pub normalized: String,
    /// Character offset in the sentence
    pub position: usize,
}

impl Token {
    pub fn new(surface: impl Into<String>, normalized: impl Into<String>, position: usize) -> Self {
        Self {
            surface: surface.into(),
            normalized: normalized.into(),
            position,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaggedToken {
    pub token: Token,
    pub tag: String,
}

impl TaggedToken {
    pub fn new(token: Token, tag: impl Into<String>) -> Self {
        Self {
            token,
            tag: tag.into(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum LanguageError {
    #[error("No processor available for language: {0}")]
    UnsupportedLanguage(String),

    #[error("{0}")]
    Failed(String),
}
