use feet_core::language::{LanguageError, LanguageProcessor, TaggedToken, Token};
use feet_core::preprocess::{DefaultPreprocessor, Preprocessor};
use tracing::debug;

use crate::lexicon::{ENGLISH, FRENCH, Lexicon};
use crate::tagger;

/// Processor for whitespace-delimited Latin-script languages
pub struct EuropeanProcessor {
    code: &'static str,
    lexicon: &'static Lexicon,
}

impl EuropeanProcessor {
    pub fn english() -> Self {
        Self {
            code: "en",
            lexicon: &ENGLISH,
        }
    }

    pub fn french() -> Self {
        Self {
            code: "fr",
            lexicon: &FRENCH,
        }
    }

    fn push_word(&self, tokens: &mut Vec<Token>, word: &mut String, start: usize) {
        if word.is_empty() {
            return;
        }
        let surface = std::mem::take(word);
        let normalized = surface.to_lowercase();
        tokens.push(Token::new(surface, normalized, start));
    }
}

impl LanguageProcessor for EuropeanProcessor {
    fn language_code(&self) -> &str {
        self.code
    }

    fn normalize(&self, text: &str) -> String {
        DefaultPreprocessor.process(text).to_lowercase()
    }

    /// Splits after `.`, `!` or `?` followed by whitespace, and at line breaks
    fn sentences(&self, text: &str) -> Vec<String> {
        let mut sentences = Vec::new();
        let mut current = String::new();
        let mut chars = text.chars().peekable();

        while let Some(c) = chars.next() {
            if c == '\n' {
                flush(&mut sentences, &mut current);
                continue;
            }

            current.push(c);
            if matches!(c, '.' | '!' | '?') {
                while let Some(&next) = chars.peek() {
                    if !matches!(next, '.' | '!' | '?') {
                        break;
                    }
                    current.push(next);
                    chars.next();
                }
                if chars.peek().is_none_or(|c| c.is_whitespace()) {
                    flush(&mut sentences, &mut current);
                }
            }
        }
        flush(&mut sentences, &mut current);

        sentences
    }

    fn tokenize(&self, text: &str) -> Result<Vec<Token>, LanguageError> {
        let text = DefaultPreprocessor.process(text);
        let chars: Vec<char> = text.chars().collect();

        let mut tokens = Vec::new();
        let mut word = String::new();
        let mut start = 0;

        for (i, &c) in chars.iter().enumerate() {
            let next_alnum = chars.get(i + 1).is_some_and(|n| n.is_alphanumeric());

            if c.is_alphanumeric() {
                if word.is_empty() {
                    start = i;
                }
                word.push(c);
                continue;
            }

            if c.is_whitespace() {
                self.push_word(&mut tokens, &mut word, start);
                continue;
            }

            match c {
                '\'' if !word.is_empty() && next_alnum => {
                    let elided = format!("{}'", word.to_lowercase());
                    let tail: String = chars[i..]
                        .iter()
                        .take_while(|c| **c == '\'' || c.is_alphanumeric())
                        .collect::<String>()
                        .to_lowercase();

                    if self.lexicon.elisions.contains(&elided.as_str()) {
                        word.push(c);
                        self.push_word(&mut tokens, &mut word, start);
                    } else if self.lexicon.clitics.contains(&tail.as_str()) {
                        self.push_word(&mut tokens, &mut word, start);
                        start = i;
                        word.push(c);
                    } else {
                        word.push(c);
                    }
                }
                '-' if !word.is_empty() && next_alnum => word.push(c),
                '.' | ',' if !word.is_empty()
                    && word.chars().all(|w| w.is_ascii_digit())
                    && chars.get(i + 1).is_some_and(|n| n.is_ascii_digit()) =>
                {
                    word.push(c)
                }
                _ => {
                    self.push_word(&mut tokens, &mut word, start);
                    tokens.push(Token::new(c.to_string(), c.to_string(), i));
                }
            }
        }
        self.push_word(&mut tokens, &mut word, start);

        debug!(language = self.code, tokens = tokens.len(), "tokenized");
        Ok(tokens)
    }

    fn tag(&self, tokens: &[Token]) -> Vec<TaggedToken> {
        tagger::tag(self.lexicon, tokens)
    }
}

fn flush(sentences: &mut Vec<String>, current: &mut String) {
    let sentence = current.trim();
    if !sentence.is_empty() {
        sentences.push(sentence.to_string());
    }
    current.clear();
}
