//! Tag-pattern chunk grammars.
//!
//! A grammar is a list of rules, each written as `LABEL: {<TAG>...}`. Inside
//! the angle brackets a tag pattern is a regular expression over the tag name
//! (`.` never crosses a token boundary); outside them the usual quantifiers and
//! groups apply to whole tokens. Rules run in order and a token chunked by an
//! earlier rule is invisible to later ones.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

use crate::language::TaggedToken;

/// Noun phrases with an optional determiner in the middle, e.g.
/// "Bank of the West" style constructions collapse to `NNP .. DT .. NNP`.
pub const DEFAULT_GRAMMAR: &str = "NE : {<NNP|NNPS|NN>*<DT>?<NNP|NNPS|JJ|NNS|NN>+}";

/// Unchunked tokens carrying one of these tags are still emitted as single-word chunks
const NOUN_LEAVES: &[&str] = &["NN", "NNS", "NNP", "NNPS"];

static BUILTIN: LazyLock<Grammar> = LazyLock::new(|| {
    Grammar::parse(DEFAULT_GRAMMAR).unwrap_or_else(|err| {
        tracing::error!(%err, "built-in grammar rejected, chunking noun leaves only");
        Grammar::noun_leaves()
    })
});

#[derive(Debug, thiserror::Error)]
pub enum GrammarError {
    #[error("line {line}: {message}")]
    Syntax { line: usize, message: String },

    #[error("line {line}: {source}")]
    Regex {
        line: usize,
        #[source]
        source: regex::Error,
    },

    #[error("grammar defines no chunk rules")]
    Empty,
}

#[derive(Debug, Clone)]
struct ChunkRule {
    label: String,
    pattern: Regex,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChunkSpan {
    pub label: String,
    pub start: usize,
    pub end: usize,
}

#[derive(Debug, Clone)]
pub struct Grammar {
    source: String,
    rules: Vec<ChunkRule>,
}

impl Default for Grammar {
    fn default() -> Self {
        BUILTIN.clone()
    }
}

impl fmt::Display for Grammar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

impl Grammar {
    pub fn parse(source: &str) -> Result<Self, GrammarError> {
        let mut rules = Vec::new();
        let mut label = String::from("NP");

        for (index, raw) in source.lines().enumerate() {
            let line_no = index + 1;
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let body = match line.split_once(':') {
                Some((name, rest)) if !name.contains(['{', '<']) => {
                    let name = name.trim();
                    let valid = !name.is_empty()
                        && name
                            .chars()
                            .all(|c| c.is_alphanumeric() || c == '_' || c == '-');
                    if !valid {
                        return Err(GrammarError::Syntax {
                            line: line_no,
                            message: format!("invalid chunk label {name:?}"),
                        });
                    }
                    label = name.to_string();
                    rest.trim()
                }
                _ => line,
            };

            // A bare "LABEL:" line names the rules that follow it
            if body.is_empty() {
                continue;
            }

            let inner = body
                .strip_prefix('{')
                .and_then(|b| b.strip_suffix('}'))
                .ok_or_else(|| GrammarError::Syntax {
                    line: line_no,
                    message: "expected a chunk rule of the form {<TAG>...}".to_string(),
                })?;

            let translated = translate(inner).map_err(|message| GrammarError::Syntax {
                line: line_no,
                message,
            })?;
            let pattern = Regex::new(&translated).map_err(|source| GrammarError::Regex {
                line: line_no,
                source,
            })?;

            rules.push(ChunkRule {
                label: label.clone(),
                pattern,
            });
        }

        if rules.is_empty() {
            return Err(GrammarError::Empty);
        }

        Ok(Self {
            source: source.to_string(),
            rules,
        })
    }

    /// No rules at all: every noun is its own chunk
    fn noun_leaves() -> Self {
        Self {
            source: String::new(),
            rules: Vec::new(),
        }
    }

    pub fn labels(&self) -> Vec<&str> {
        self.rules.iter().map(|r| r.label.as_str()).collect()
    }

    /// Token ranges matched by the rules, sorted by position
    pub fn spans(&self, tagged: &[TaggedToken]) -> Vec<ChunkSpan> {
        let mut chunked = vec![false; tagged.len()];
        let mut spans = Vec::new();

        for rule in &self.rules {
            let (encoded, starts) = encode(tagged, &chunked);

            for found in rule.pattern.find_iter(&encoded) {
                if found.start() == found.end() {
                    continue;
                }
                let Ok(start) = starts.binary_search(&found.start()) else {
                    continue;
                };
                let end = if found.end() == encoded.len() {
                    tagged.len()
                } else {
                    match starts.binary_search(&found.end()) {
                        Ok(end) => end,
                        Err(_) => continue,
                    }
                };

                chunked[start..end].iter_mut().for_each(|c| *c = true);
                spans.push(ChunkSpan {
                    label: rule.label.clone(),
                    start,
                    end,
                });
            }
        }

        spans.sort_by_key(|s| s.start);
        spans
    }

    /// Chunk surfaces joined by a single space, plus leftover nouns, in
    /// positional order
    pub fn chunk(&self, tagged: &[TaggedToken]) -> Vec<String> {
        let spans = self.spans(tagged);
        let mut pending = spans.iter().peekable();
        let mut chunks = Vec::new();
        let mut i = 0;

        while i < tagged.len() {
            if let Some(span) = pending.next_if(|s| s.start == i) {
                let words: Vec<&str> = tagged[span.start..span.end]
                    .iter()
                    .map(|t| t.token.surface.as_str())
                    .collect();
                chunks.push(words.join(" "));
                i = span.end;
                continue;
            }

            if NOUN_LEAVES.contains(&tagged[i].tag.as_str()) {
                chunks.push(tagged[i].token.surface.clone());
            }
            i += 1;
        }

        chunks
    }
}

/// `<TAG>` per token; tokens already inside a chunk become `#`, which no
/// rule can match
fn encode(tagged: &[TaggedToken], chunked: &[bool]) -> (String, Vec<usize>) {
    let mut encoded = String::new();
    let mut starts = Vec::with_capacity(tagged.len());

    for (token, done) in tagged.iter().zip(chunked) {
        starts.push(encoded.len());
        if *done {
            encoded.push('#');
        } else {
            encoded.push('<');
            encoded.push_str(&token.tag.replace(['<', '>'], "_"));
            encoded.push('>');
        }
    }

    (encoded, starts)
}

fn translate(pattern: &str) -> Result<String, String> {
    let mut out = String::new();
    let mut atoms = 0;
    let mut chars = pattern.chars();

    while let Some(c) = chars.next() {
        match c {
            '<' => {
                let mut tag = String::new();
                loop {
                    match chars.next() {
                        Some('>') => break,
                        Some('<') => return Err("nested '<' in tag pattern".to_string()),
                        Some(c) => tag.push(c),
                        None => return Err("unterminated tag pattern".to_string()),
                    }
                }
                if tag.trim().is_empty() {
                    return Err("empty tag pattern".to_string());
                }

                out.push_str("(?:<(?:");
                for t in tag.chars().filter(|c| !c.is_whitespace()) {
                    match t {
                        '.' => out.push_str("[^<>]"),
                        '|' | '*' | '+' | '?' | '(' | ')' => out.push(t),
                        _ => out.push_str(&regex::escape(t.encode_utf8(&mut [0; 4]))),
                    }
                }
                out.push_str(")>)");
                atoms += 1;
            }
            c if c.is_whitespace() => {}
            '*' | '+' | '?' | '(' | ')' | '|' | '{' | '}' | ',' => out.push(c),
            c if c.is_ascii_digit() => out.push(c),
            other => {
                return Err(format!(
                    "unexpected character {other:?} outside a tag pattern"
                ));
            }
        }
    }

    if atoms == 0 {
        return Err("rule contains no tag pattern".to_string());
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::language::Token;

    fn tagged(pairs: &[(&str, &str)]) -> Vec<TaggedToken> {
        pairs
            .iter()
            .enumerate()
            .map(|(i, (word, tag))| {
                TaggedToken::new(Token::new(*word, word.to_lowercase(), i), *tag)
            })
            .collect()
    }

    #[test]
    fn test_default_grammar_flight_tickets() {
        let tokens = tagged(&[
            ("I", "PRP"),
            ("want", "VBP"),
            ("to", "TO"),
            ("buy", "VB"),
            ("flight", "NN"),
            ("tickets", "NNS"),
            ("for", "IN"),
            ("Japan", "NNP"),
        ]);

        let chunks = Grammar::default().chunk(&tokens);
        assert_eq!(chunks, vec!["flight tickets", "Japan"]);
    }

    #[test]
    fn test_builtin_grammar_has_its_rule() {
        let grammar = Grammar::default();
        assert_eq!(grammar.labels(), vec!["NE"]);
        assert_eq!(grammar.to_string(), DEFAULT_GRAMMAR);
    }

    #[test]
    fn test_ruleless_grammar_keeps_nouns() {
        let tokens = tagged(&[
            ("flight", "NN"),
            ("tickets", "NNS"),
            ("for", "IN"),
            ("Japan", "NNP"),
        ]);

        let chunks = Grammar::noun_leaves().chunk(&tokens);
        assert_eq!(chunks, vec!["flight", "tickets", "Japan"]);
    }

    #[test]
    fn test_determiner_inside_chunk() {
        let tokens = tagged(&[
            ("Bank", "NNP"),
            ("the", "DT"),
            ("West", "NNP"),
            ("opened", "VBD"),
        ]);

        let spans = Grammar::default().spans(&tokens);
        assert_eq!(
            spans,
            vec![ChunkSpan {
                label: "NE".to_string(),
                start: 0,
                end: 3
            }]
        );
    }

    #[test]
    fn test_tag_patterns_do_not_match_prefixes() {
        // <NN> must not accept NNS through a prefix match
        let grammar = Grammar::parse("X: {<NN>+}").unwrap();
        let tokens = tagged(&[("cats", "NNS"), ("dog", "NN")]);

        assert_eq!(grammar.spans(&tokens).len(), 1);
        assert_eq!(grammar.chunk(&tokens), vec!["cats", "dog"]);
    }

    #[test]
    fn test_dot_wildcard_and_dollar_tags() {
        let grammar = Grammar::parse("P: {<PRP$><NN.*>}").unwrap();
        let tokens = tagged(&[("my", "PRP$"), ("cats", "NNS")]);

        assert_eq!(grammar.chunk(&tokens), vec!["my cats"]);
    }

    #[test]
    fn test_earlier_rules_hide_tokens() {
        let grammar = Grammar::parse("A: {<NN>}\nB: {<NN><NN>}").unwrap();
        let tokens = tagged(&[("a", "NN"), ("b", "NN")]);

        let spans = grammar.spans(&tokens);
        assert_eq!(spans.len(), 2);
        assert!(spans.iter().all(|s| s.label == "A"));
    }

    #[test]
    fn test_empty_matches_are_skipped() {
        let grammar = Grammar::parse("X: {<NN>*}").unwrap();
        let tokens = tagged(&[("run", "VB")]);

        assert!(grammar.spans(&tokens).is_empty());
        assert!(grammar.chunk(&tokens).is_empty());
    }

    #[test]
    fn test_label_on_its_own_line() {
        let grammar = Grammar::parse("# people\nPERSON:\n  {<NNP>+}\n  {<NN>}\n").unwrap();
        assert_eq!(grammar.labels(), vec!["PERSON", "PERSON"]);
    }

    #[test]
    fn test_syntax_errors() {
        assert!(matches!(
            Grammar::parse("NE : <NN>"),
            Err(GrammarError::Syntax { line: 1, .. })
        ));
        assert!(matches!(
            Grammar::parse("NE : {<NN}"),
            Err(GrammarError::Syntax { .. })
        ));
        assert!(matches!(
            Grammar::parse("NE : {NN}"),
            Err(GrammarError::Syntax { .. })
        ));
        assert!(matches!(Grammar::parse("\n# nothing\n"), Err(GrammarError::Empty)));
    }

    #[test]
    fn test_display_keeps_source() {
        assert_eq!(Grammar::default().to_string(), DEFAULT_GRAMMAR);
    }
}
