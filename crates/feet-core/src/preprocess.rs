use unicode_normalization::UnicodeNormalization;

/// Text cleanup applied before segmentation
pub trait Preprocessor {
    /// NFKC, typographic apostrophes as `'`, whitespace runs collapsed to one space
    fn process(&self, text: &str) -> String {
        let folded: String = text
            .nfkc()
            .map(|c| match c {
                '\u{2018}' | '\u{2019}' | '\u{02BC}' => '\'',
                c => c,
            })
            .collect();

        folded.split_whitespace().collect::<Vec<_>>().join(" ")
    }
}

pub struct DefaultPreprocessor;
impl Preprocessor for DefaultPreprocessor {}
