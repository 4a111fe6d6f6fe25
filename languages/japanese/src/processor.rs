use feet_core::grammar::Grammar;
use feet_core::language::{LanguageError, LanguageProcessor, TaggedToken, Token};
use unicode_normalization::UnicodeNormalization;

use crate::lexicon::{self, STOPLIST};
use crate::script::Script;

const SENTENCE_END: &[char] = &['。', '!', '?', '！', '？'];

/// Japanese language processor
///
/// Text is segmented by writing system; hiragana runs are further split on
/// known function words. Candidate phrases are runs of content nouns, so the
/// chunk grammar does not apply.
#[derive(Debug, Default)]
pub struct JapaneseProcessor;

impl JapaneseProcessor {
    pub fn new() -> Self {
        Self
    }

    fn push(tokens: &mut Vec<Token>, chars: &[char], start: usize, end: usize) {
        let surface: String = chars[start..end].iter().collect();
        let normalized = surface.to_lowercase();
        tokens.push(Token::new(surface, normalized, start));
    }

    /// Function words by longest match, anything in between as one token
    fn split_hiragana(tokens: &mut Vec<Token>, chars: &[char], start: usize, end: usize) {
        let mut unknown = None;
        let mut i = start;

        while i < end {
            match lexicon::longest_prefix(&chars[i..end]) {
                Some(len) => {
                    if let Some(from) = unknown.take() {
                        Self::push(tokens, chars, from, i);
                    }
                    Self::push(tokens, chars, i, i + len);
                    i += len;
                }
                None => {
                    unknown.get_or_insert(i);
                    i += 1;
                }
            }
        }

        if let Some(from) = unknown {
            Self::push(tokens, chars, from, end);
        }
    }
}

impl LanguageProcessor for JapaneseProcessor {
    fn language_code(&self) -> &str {
        "ja"
    }

    fn normalize(&self, text: &str) -> String {
        text.nfkc()
            .collect::<String>()
            .chars()
            .filter(|c| !c.is_whitespace() || *c == ' ')
            .collect::<String>()
            .to_lowercase()
    }

    fn sentences(&self, text: &str) -> Vec<String> {
        text.split(|c: char| SENTENCE_END.contains(&c) || c == '\n')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect()
    }

    fn tokenize(&self, text: &str) -> Result<Vec<Token>, LanguageError> {
        let chars: Vec<char> = text.nfkc().collect();
        let mut tokens = Vec::new();
        let mut i = 0;

        while i < chars.len() {
            let script = Script::of(chars[i]);
            let mut end = i + 1;
            if script != Script::Symbol {
                while end < chars.len() && Script::of(chars[end]) == script {
                    end += 1;
                }
            }

            match script {
                Script::Space => {}
                Script::Hiragana => Self::split_hiragana(&mut tokens, &chars, i, end),
                _ => Self::push(&mut tokens, &chars, i, end),
            }
            i = end;
        }

        Ok(tokens)
    }

    /// `NN` content noun, `CD` number or counter, `PRT` function word, `VB`
    /// inflected word, `FW` stop-listed latin word, `.` and `SYM` punctuation
    fn tag(&self, tokens: &[Token]) -> Vec<TaggedToken> {
        let mut tags: Vec<&str> = tokens
            .iter()
            .map(|t| match Script::of_str(&t.surface) {
                Script::Kanji | Script::Katakana => "NN",
                Script::Latin if STOPLIST.contains(&t.normalized.as_str()) => "FW",
                Script::Latin => "NN",
                Script::Digit => "CD",
                Script::Hiragana if lexicon::is_function_word(&t.surface) => "PRT",
                Script::Hiragana => "VB",
                Script::Space => "SYM",
                Script::Symbol if t.surface.starts_with(SENTENCE_END) => ".",
                Script::Symbol => "SYM",
            })
            .collect();

        for i in 0..tokens.len() {
            let script = Script::of_str(&tokens[i].surface);
            if script != Script::Kanji {
                continue;
            }
            // 1945年, 3人
            if i > 0 && tags[i - 1] == "CD" && adjacent(&tokens[i - 1], &tokens[i]) {
                tags[i] = "CD";
            }
            // Kanji stem with okurigana: 買った, 高い
            if tags.get(i + 1) == Some(&"VB") && adjacent(&tokens[i], &tokens[i + 1]) {
                tags[i] = "VB";
            }
        }

        tokens
            .iter()
            .zip(tags)
            .map(|(token, tag)| TaggedToken::new(token.clone(), tag))
            .collect()
    }

    /// Runs of adjacent content nouns, lower-cased and joined without spaces
    fn chunk(&self, text: &str, _grammar: &Grammar) -> Result<Vec<String>, LanguageError> {
        let mut chunks = Vec::new();

        for sentence in self.sentences(text) {
            let tagged = self.tag(&self.tokenize(&sentence)?);
            let mut current = String::new();
            let mut previous: Option<&Token> = None;

            for t in &tagged {
                if t.tag != "NN" {
                    flush(&mut chunks, &mut current);
                    previous = None;
                    continue;
                }
                if previous.is_some_and(|p| !adjacent(p, &t.token)) {
                    flush(&mut chunks, &mut current);
                }
                current.push_str(&t.token.normalized);
                previous = Some(&t.token);
            }
            flush(&mut chunks, &mut current);
        }

        tracing::debug!("{} noun chunks", chunks.len());
        Ok(chunks)
    }
}

fn adjacent(left: &Token, right: &Token) -> bool {
    left.position + left.surface.chars().count() == right.position
}

fn flush(chunks: &mut Vec<String>, current: &mut String) {
    if !current.is_empty() {
        chunks.push(std::mem::take(current));
    }
}
