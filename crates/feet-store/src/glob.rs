/// Escape glob metacharacters so `text` only matches itself
pub fn glob_escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        if matches!(c, '*' | '?' | '[' | ']' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// Match `text` against a key pattern supporting `*`, `?` and `\` escapes
pub fn glob_match(pattern: &str, text: &str) -> bool {
    let pattern: Vec<char> = pattern.chars().collect();
    let text: Vec<char> = text.chars().collect();

    let (mut p, mut t) = (0, 0);
    // Last `*` seen and the text position it is currently absorbing up to
    let mut backtrack: Option<(usize, usize)> = None;

    while t < text.len() {
        match pattern.get(p) {
            Some('*') => {
                backtrack = Some((p, t));
                p += 1;
                continue;
            }
            Some('?') => {
                p += 1;
                t += 1;
                continue;
            }
            Some('\\') if p + 1 < pattern.len() => {
                if pattern[p + 1] == text[t] {
                    p += 2;
                    t += 1;
                    continue;
                }
            }
            Some(&c) if c == text[t] => {
                p += 1;
                t += 1;
                continue;
            }
            _ => {}
        }

        match backtrack {
            Some((star, absorbed)) => {
                p = star + 1;
                t = absorbed + 1;
                backtrack = Some((star, absorbed + 1));
            }
            None => return false,
        }
    }

    pattern[p..].iter().all(|c| *c == '*')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prefix_patterns() {
        assert!(glob_match("feet:entity:cities:*", "feet:entity:cities:languages"));
        assert!(glob_match("feet:entity:cities:*", "feet:entity:cities:lang:en:terms"));
        assert!(!glob_match("feet:entity:cities:*", "feet:entity:cities2:languages"));
        assert!(!glob_match("feet:entity:cities:*", "feet:entity:cities"));
    }

    #[test]
    fn test_question_mark_and_infix_star() {
        assert!(glob_match("a?c", "abc"));
        assert!(!glob_match("a?c", "ac"));
        assert!(glob_match("a*:lang:*:terms", "a:x:lang:en:terms"));
        assert!(!glob_match("a*:lang:*:terms", "a:x:lang:en:term"));
    }

    #[test]
    fn test_escaped_names_match_literally() {
        let pattern = format!("{}:*", glob_escape("odd*name?"));
        assert!(glob_match(&pattern, "odd*name?:languages"));
        assert!(!glob_match(&pattern, "oddXXname!:languages"));
    }
}
