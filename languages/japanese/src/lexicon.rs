//! Hiragana function words: particles, copulas, auxiliaries and the most
//! common pronouns and light verbs.

pub const FUNCTION_WORDS: &[&str] = &[
    // particles
    "は", "が", "を", "に", "へ", "と", "で", "も", "の", "や", "か", "ね", "よ", "な", "ば",
    "から", "まで", "より", "など", "だけ", "しか", "ばかり", "ほど", "くらい", "ぐらい",
    "について", "によって", "による", "として", "にて", "って", "けど", "けれど", "けれども",
    "ので", "のに", "ながら", "たり",
    // copulas and auxiliaries
    "です", "でした", "でしょう", "ます", "ました", "ません", "ませんでした", "だ", "だった",
    "である", "であり", "でない", "ではない", "じゃない", "た", "て", "ない", "なかった",
    "れる", "られる", "される", "された", "され", "せる", "させる", "たい", "よう", "らしい",
    "そう",
    // demonstratives and pronouns
    "これ", "それ", "あれ", "どれ", "この", "その", "あの", "どの", "ここ", "そこ", "あそこ",
    "どこ", "こちら", "そちら", "わたし", "あなた",
    // light verbs and formal nouns
    "する", "した", "して", "し", "いる", "いた", "いて", "ある", "あった", "あり", "なる",
    "なった", "なり", "おり", "おる", "いう", "こと", "もの", "とき", "ため",
];

/// Latin words never taken as nouns
pub const STOPLIST: &[&str] = &[
    "http", "https", "for", "a", "of", "the", "and", "to", "in", "co", "com", "jp",
];

pub fn is_function_word(word: &str) -> bool {
    FUNCTION_WORDS.contains(&word)
}

/// Longest function word starting at the beginning of `chars`, in characters
pub fn longest_prefix(chars: &[char]) -> Option<usize> {
    FUNCTION_WORDS
        .iter()
        .map(|w| w.chars().collect::<Vec<_>>())
        .filter(|w| chars.starts_with(w))
        .map(|w| w.len())
        .max()
}
