use std::collections::HashSet;

use crate::language::LanguageDetector;

const STOPWORDS: &[(&str, &[&str])] = &[
    (
        "en",
        &[
            "the", "is", "are", "was", "and", "of", "to", "in", "this", "that", "my", "it",
            "for", "with", "i", "you", "be", "have", "not", "on",
        ],
    ),
    (
        "fr",
        &[
            "le", "la", "les", "est", "et", "un", "une", "des", "ceci", "cela", "mon", "ma",
            "je", "il", "elle", "pas", "pour", "dans", "du", "sont",
        ],
    ),
    (
        "es",
        &[
            "el", "los", "las", "es", "este", "esta", "mi", "y", "en", "que", "del", "por",
            "con", "una", "yo", "son", "pero", "muy", "lo", "su",
        ],
    ),
    (
        "de",
        &[
            "der", "die", "das", "ist", "und", "ein", "eine", "mein", "meine", "nicht", "ich",
            "mit", "von", "zu", "sind", "auf", "den", "dem", "auch", "wir",
        ],
    ),
    (
        "it",
        &[
            "il", "lo", "gli", "è", "e", "questo", "questa", "mio", "mia", "di", "che", "non",
            "sono", "per", "una", "della", "io", "con", "anche", "nel",
        ],
    ),
];

/// Writing-system first, stopwords second.
///
/// Kana means Japanese and Hangul means Korean. Han without either is taken as
/// simplified Chinese. Latin text is scored against small stopword lists and
/// the best scoring language wins; ties go to the earlier list.
#[derive(Debug, Clone)]
pub struct ScriptDetector {
    fallback: Option<String>,
}

impl ScriptDetector {
    pub fn new() -> Self {
        Self { fallback: None }
    }

    /// Language reported when nothing in the text gives a clue
    pub fn with_fallback(mut self, language: impl Into<String>) -> Self {
        self.fallback = Some(language.into());
        self
    }
}

impl Default for ScriptDetector {
    fn default() -> Self {
        Self::new()
    }
}

impl LanguageDetector for ScriptDetector {
    fn detect(&self, text: &str) -> Option<String> {
        if text.trim().is_empty() {
            return None;
        }

        let (mut kana, mut hangul, mut han) = (0usize, 0usize, 0usize);
        for c in text.chars() {
            match c {
                '\u{3040}'..='\u{30FF}' | '\u{31F0}'..='\u{31FF}' | '\u{FF66}'..='\u{FF9D}' => {
                    kana += 1
                }
                '\u{AC00}'..='\u{D7AF}' | '\u{1100}'..='\u{11FF}' | '\u{3130}'..='\u{318F}' => {
                    hangul += 1
                }
                '\u{4E00}'..='\u{9FFF}' | '\u{3400}'..='\u{4DBF}' => han += 1,
                _ => {}
            }
        }

        if kana > 0 {
            return Some("ja".to_string());
        }
        if hangul > 0 {
            return Some("ko".to_string());
        }
        if han > 0 {
            return Some("zh-cn".to_string());
        }

        let words: HashSet<String> = text
            .split(|c: char| !c.is_alphabetic())
            .filter(|w| !w.is_empty())
            .map(str::to_lowercase)
            .collect();

        let mut best: Option<(&str, usize)> = None;
        for &(language, stopwords) in STOPWORDS {
            let score = stopwords.iter().filter(|w| words.contains(**w)).count();
            if score > 0 && best.is_none_or(|(_, top)| score > top) {
                best = Some((language, score));
            }
        }

        best.map(|(language, _)| language.to_string())
            .or_else(|| self.fallback.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_latin_languages() {
        let detector = ScriptDetector::new();
        let cases = [
            ("This is my best example", "en"),
            ("Ceci est mon meilleur exemple", "fr"),
            ("Este es mi mejor ejemplo", "es"),
            ("Das ist mein bestes Beispiel", "de"),
            ("Questo è il mio miglior esempio", "it"),
        ];
        for (text, expected) in cases {
            assert_eq!(detector.detect(text).as_deref(), Some(expected), "{text}");
        }
    }

    #[test]
    fn test_cjk_scripts() {
        let detector = ScriptDetector::new();
        assert_eq!(detector.detect("これは日本語です").as_deref(), Some("ja"));
        assert_eq!(detector.detect("这是我最好的例子").as_deref(), Some("zh-cn"));
        assert_eq!(detector.detect("이것은 나의 최고의 예입니다").as_deref(), Some("ko"));
    }

    #[test]
    fn test_no_clue() {
        let detector = ScriptDetector::new();
        assert_eq!(detector.detect("   "), None);
        assert_eq!(detector.detect("Xyzzy 42"), None);

        let detector = ScriptDetector::new().with_fallback("en");
        assert_eq!(detector.detect("Xyzzy 42").as_deref(), Some("en"));
    }
}
