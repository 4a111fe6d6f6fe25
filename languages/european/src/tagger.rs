use feet_core::language::{TaggedToken, Token};

use crate::lexicon::Lexicon;

const SENTENCE_END: &[&str] = &[".", "!", "?"];

/// Penn Treebank tags from the closed-class lexicon, capitalization and
/// suffixes, in that order
pub fn tag(lexicon: &Lexicon, tokens: &[Token]) -> Vec<TaggedToken> {
    let mut tagged = Vec::with_capacity(tokens.len());
    let mut sentence_start = true;

    for token in tokens {
        let tag = tag_word(lexicon, token, sentence_start);
        sentence_start = SENTENCE_END.contains(&token.surface.as_str());
        tagged.push(TaggedToken::new(token.clone(), tag));
    }

    tagged
}

fn tag_word(lexicon: &Lexicon, token: &Token, sentence_start: bool) -> &'static str {
    let surface = token.surface.as_str();
    let lowered = token.normalized.as_str();

    let Some(first) = surface.chars().next() else {
        return "SYM";
    };

    if !first.is_alphanumeric() && !surface.starts_with('\'') {
        return match surface {
            "." | "!" | "?" => ".",
            "," => ",",
            ";" | ":" | "-" | "--" | "..." => ":",
            "(" | "[" | "{" => "(",
            ")" | "]" | "}" => ")",
            "\"" | "«" | "»" => "``",
            "$" | "€" | "£" => "$",
            _ => "SYM",
        };
    }

    if surface.chars().all(|c| c.is_numeric() || c == '.' || c == ',') {
        return "CD";
    }

    let capitalized = first.is_uppercase();
    if capitalized && !sentence_start && lowered != "i" {
        return "NNP";
    }

    if let Some(tag) = lexicon.tag(lowered) {
        return tag;
    }

    if capitalized {
        return "NNP";
    }

    lexicon.suffix_tag(lowered).unwrap_or("NN")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexicon::{ENGLISH, FRENCH};

    fn tags(lexicon: &Lexicon, words: &[&str]) -> Vec<String> {
        let tokens: Vec<Token> = words
            .iter()
            .enumerate()
            .map(|(i, w)| Token::new(*w, w.to_lowercase(), i))
            .collect();
        tag(lexicon, &tokens).into_iter().map(|t| t.tag).collect()
    }

    #[test]
    fn test_english_sentence() {
        let words = ["I", "want", "to", "buy", "flight", "tickets", "for", "Japan"];
        assert_eq!(
            tags(&ENGLISH, &words),
            vec!["PRP", "VBP", "TO", "VB", "NN", "NNS", "IN", "NNP"]
        );
    }

    #[test]
    fn test_capitalized_lexicon_words() {
        // Sentence-initial "The" is a determiner, "New" mid-sentence a name
        assert_eq!(
            tags(&ENGLISH, &["The", "flight", "to", "New", "York", "."]),
            vec!["DT", "NN", "TO", "NNP", "NNP", "."]
        );
    }

    #[test]
    fn test_suffixes_and_numbers() {
        assert_eq!(
            tags(&ENGLISH, &["booking", "quickly", "famous", "business", "1945", "3.5"]),
            vec!["VBG", "RB", "JJ", "NN", "CD", "CD"]
        );
    }

    #[test]
    fn test_french_sentence() {
        let words = ["Je", "veux", "acheter", "des", "billets", "d'", "avion", "pour", "le", "Japon"];
        assert_eq!(
            tags(&FRENCH, &words),
            vec!["PRP", "VBP", "VB", "DT", "NNS", "IN", "NN", "IN", "DT", "NNP"]
        );
    }
}
