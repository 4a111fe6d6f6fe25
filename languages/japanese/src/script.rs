/// Writing system of a single character
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Script {
    Kanji,
    Hiragana,
    Katakana,
    Latin,
    Digit,
    Space,
    Symbol,
}

impl Script {
    pub fn of(c: char) -> Self {
        match c {
            '\u{3041}'..='\u{309F}' => Script::Hiragana,
            // Includes the prolonged sound mark and the middle dot
            '\u{30A1}'..='\u{30FF}' | '\u{31F0}'..='\u{31FF}' => Script::Katakana,
            '\u{4E00}'..='\u{9FFF}' | '\u{3400}'..='\u{4DBF}' | '々' | '〆' => Script::Kanji,
            c if c.is_whitespace() => Script::Space,
            c if c.is_numeric() => Script::Digit,
            c if c.is_alphabetic() => Script::Latin,
            _ => Script::Symbol,
        }
    }

    /// Script of the first character of a token
    pub fn of_str(text: &str) -> Self {
        text.chars().next().map(Self::of).unwrap_or(Script::Symbol)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classification() {
        assert_eq!(Script::of('日'), Script::Kanji);
        assert_eq!(Script::of('々'), Script::Kanji);
        assert_eq!(Script::of('は'), Script::Hiragana);
        assert_eq!(Script::of('ー'), Script::Katakana);
        assert_eq!(Script::of('タ'), Script::Katakana);
        assert_eq!(Script::of('7'), Script::Digit);
        assert_eq!(Script::of('é'), Script::Latin);
        assert_eq!(Script::of('　'), Script::Space);
        assert_eq!(Script::of('。'), Script::Symbol);
    }
}
