//! Closed-class words per language with their Penn Treebank tags.

pub struct Lexicon {
    pub words: &'static [(&'static str, &'static str)],
    /// Elided prefixes split off the following word ("l'", "d'")
    pub elisions: &'static [&'static str],
    /// Clitic suffixes split off the preceding word ("'s")
    pub clitics: &'static [&'static str],
    pub suffixes: &'static [(&'static str, &'static str)],
}

impl Lexicon {
    pub fn tag(&self, word: &str) -> Option<&'static str> {
        self.words.iter().find(|(w, _)| *w == word).map(|(_, t)| *t)
    }

    /// Tag implied by the longest matching suffix
    pub fn suffix_tag(&self, word: &str) -> Option<&'static str> {
        self.suffixes
            .iter()
            .filter(|(suffix, _)| word.len() > suffix.len() + 2 && word.ends_with(suffix))
            .max_by_key(|(suffix, _)| suffix.len())
            .map(|(_, tag)| *tag)
    }
}

pub static ENGLISH: Lexicon = Lexicon {
    words: &[
        ("the", "DT"),
        ("a", "DT"),
        ("an", "DT"),
        ("this", "DT"),
        ("that", "DT"),
        ("these", "DT"),
        ("those", "DT"),
        ("some", "DT"),
        ("any", "DT"),
        ("every", "DT"),
        ("no", "DT"),
        ("of", "IN"),
        ("in", "IN"),
        ("on", "IN"),
        ("at", "IN"),
        ("for", "IN"),
        ("from", "IN"),
        ("with", "IN"),
        ("by", "IN"),
        ("about", "IN"),
        ("into", "IN"),
        ("over", "IN"),
        ("after", "IN"),
        ("before", "IN"),
        ("between", "IN"),
        ("through", "IN"),
        ("during", "IN"),
        ("if", "IN"),
        ("because", "IN"),
        ("to", "TO"),
        ("and", "CC"),
        ("or", "CC"),
        ("but", "CC"),
        ("nor", "CC"),
        ("i", "PRP"),
        ("you", "PRP"),
        ("he", "PRP"),
        ("she", "PRP"),
        ("it", "PRP"),
        ("we", "PRP"),
        ("they", "PRP"),
        ("me", "PRP"),
        ("him", "PRP"),
        ("her", "PRP$"),
        ("us", "PRP"),
        ("them", "PRP"),
        ("my", "PRP$"),
        ("your", "PRP$"),
        ("his", "PRP$"),
        ("its", "PRP$"),
        ("our", "PRP$"),
        ("their", "PRP$"),
        ("who", "WP"),
        ("what", "WP"),
        ("which", "WDT"),
        ("where", "WRB"),
        ("when", "WRB"),
        ("how", "WRB"),
        ("why", "WRB"),
        ("is", "VBZ"),
        ("are", "VBP"),
        ("was", "VBD"),
        ("were", "VBD"),
        ("be", "VB"),
        ("been", "VBN"),
        ("being", "VBG"),
        ("am", "VBP"),
        ("have", "VBP"),
        ("has", "VBZ"),
        ("had", "VBD"),
        ("do", "VBP"),
        ("does", "VBZ"),
        ("did", "VBD"),
        ("want", "VBP"),
        ("wants", "VBZ"),
        ("need", "VBP"),
        ("buy", "VB"),
        ("get", "VB"),
        ("go", "VB"),
        ("make", "VB"),
        ("like", "IN"),
        ("can", "MD"),
        ("could", "MD"),
        ("will", "MD"),
        ("would", "MD"),
        ("should", "MD"),
        ("may", "MD"),
        ("might", "MD"),
        ("must", "MD"),
        ("not", "RB"),
        ("very", "RB"),
        ("also", "RB"),
        ("too", "RB"),
        ("there", "EX"),
        ("here", "RB"),
        ("now", "RB"),
        ("then", "RB"),
        ("new", "JJ"),
        ("old", "JJ"),
        ("good", "JJ"),
        ("best", "JJS"),
        ("big", "JJ"),
        ("small", "JJ"),
        ("last", "JJ"),
        ("next", "JJ"),
        ("'s", "POS"),
    ],
    elisions: &[],
    clitics: &["'s", "'re", "'ve", "'ll", "'d", "'m"],
    suffixes: &[
        ("ing", "VBG"),
        ("ed", "VBD"),
        ("ly", "RB"),
        ("ous", "JJ"),
        ("ful", "JJ"),
        ("ive", "JJ"),
        ("able", "JJ"),
        ("ible", "JJ"),
        ("ical", "JJ"),
        ("less", "JJ"),
        ("est", "JJS"),
        ("tion", "NN"),
        ("ment", "NN"),
        ("ness", "NN"),
        ("ity", "NN"),
        ("ship", "NN"),
        ("ss", "NN"),
        ("us", "NN"),
        ("s", "NNS"),
    ],
};

pub static FRENCH: Lexicon = Lexicon {
    words: &[
        ("le", "DT"),
        ("la", "DT"),
        ("les", "DT"),
        ("l'", "DT"),
        ("un", "DT"),
        ("une", "DT"),
        ("des", "DT"),
        ("du", "DT"),
        ("ce", "DT"),
        ("cet", "DT"),
        ("cette", "DT"),
        ("ces", "DT"),
        ("de", "IN"),
        ("d'", "IN"),
        ("à", "IN"),
        ("au", "IN"),
        ("aux", "IN"),
        ("en", "IN"),
        ("pour", "IN"),
        ("avec", "IN"),
        ("dans", "IN"),
        ("sur", "IN"),
        ("par", "IN"),
        ("sans", "IN"),
        ("chez", "IN"),
        ("vers", "IN"),
        ("et", "CC"),
        ("ou", "CC"),
        ("mais", "CC"),
        ("je", "PRP"),
        ("j'", "PRP"),
        ("tu", "PRP"),
        ("il", "PRP"),
        ("elle", "PRP"),
        ("nous", "PRP"),
        ("vous", "PRP"),
        ("ils", "PRP"),
        ("elles", "PRP"),
        ("on", "PRP"),
        ("ceci", "PRP"),
        ("cela", "PRP"),
        ("mon", "PRP$"),
        ("ma", "PRP$"),
        ("mes", "PRP$"),
        ("ton", "PRP$"),
        ("ta", "PRP$"),
        ("son", "PRP$"),
        ("sa", "PRP$"),
        ("ses", "PRP$"),
        ("notre", "PRP$"),
        ("votre", "PRP$"),
        ("leur", "PRP$"),
        ("qui", "WP"),
        ("que", "WP"),
        ("qu'", "WP"),
        ("est", "VBZ"),
        ("sont", "VBP"),
        ("suis", "VBP"),
        ("être", "VB"),
        ("ai", "VBP"),
        ("a", "VBZ"),
        ("ont", "VBP"),
        ("avoir", "VB"),
        ("veux", "VBP"),
        ("veut", "VBZ"),
        ("voudrais", "MD"),
        ("peux", "MD"),
        ("peut", "MD"),
        ("ne", "RB"),
        ("n'", "RB"),
        ("pas", "RB"),
        ("très", "RB"),
        ("aussi", "RB"),
        ("se", "PRP"),
        ("s'", "PRP"),
        ("c'", "PRP"),
        ("m'", "PRP"),
        ("t'", "PRP"),
        ("meilleur", "JJ"),
        ("meilleure", "JJ"),
        ("grand", "JJ"),
        ("grande", "JJ"),
        ("petit", "JJ"),
        ("petite", "JJ"),
        ("nouveau", "JJ"),
        ("nouvelle", "JJ"),
    ],
    elisions: &["l'", "d'", "j'", "qu'", "n'", "s'", "c'", "m'", "t'"],
    clitics: &[],
    suffixes: &[
        ("ment", "RB"),
        ("er", "VB"),
        ("ir", "VB"),
        ("ée", "VBN"),
        ("és", "VBN"),
        ("é", "VBN"),
        ("eux", "JJ"),
        ("euse", "JJ"),
        ("ique", "JJ"),
        ("able", "JJ"),
        ("tion", "NN"),
        ("age", "NN"),
        ("s", "NNS"),
        ("x", "NNS"),
    ],
};
