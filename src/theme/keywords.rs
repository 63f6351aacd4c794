/// Strict keyword extraction and domain-family expansion.
///
/// Both operate on already-cleaned text (see `clean_text`). Expansion is a
/// deliberately loose, mixed-language union: a French query about a father also
/// searches for "dad" and "padre".

/// Multilingual (fr/en/es) stop words dropped from strict keywords.
const STOP_WORDS: &[&str] = &[
    "un", "une", "le", "la", "les", "à", "au", "aux", "de", "du", "des", "et", "en", "d", "a",
    "the", "to", "of", "y", "el", "los", "las", "del",
];

/// A keyword family: when any trigger appears in the theme, every term joins
/// the expanded set.
struct KeywordFamily {
    triggers: &'static [&'static str],
    terms: &'static [&'static str],
}

const FAMILIES: &[KeywordFamily] = &[
    // father
    KeywordFamily {
        triggers: &["père", "pere", "father", "dad", "padre"],
        terms: &["père", "father", "dad", "padre", "parent", "family"],
    },
    // mother
    KeywordFamily {
        triggers: &["mère", "mere", "mother", "madre"],
        terms: &["mère", "mother", "madre", "parent", "family"],
    },
    // daughter
    KeywordFamily {
        triggers: &["fille", "daughter", "hija"],
        terms: &["fille", "daughter", "hija", "child", "enfant"],
    },
    // son
    KeywordFamily {
        triggers: &["fils", "son", "hijo"],
        terms: &["fils", "son", "hijo", "child", "enfant"],
    },
    // speak / tell
    KeywordFamily {
        triggers: &["parle", "parler", "talk", "say", "dime", "habla"],
        terms: &["message", "letter", "tell", "say", "talk", "dime", "carta"],
    },
];

fn is_stop_word(token: &str) -> bool {
    STOP_WORDS.contains(&token)
}

/// Whitespace tokens minus stop words, deduplicated in first-occurrence order.
pub fn extract_strict_keywords(text: &str) -> Vec<String> {
    let mut keywords: Vec<String> = Vec::new();
    for token in text.split_whitespace() {
        if is_stop_word(token) || keywords.iter().any(|k| k == token) {
            continue;
        }
        keywords.push(token.to_string());
    }
    keywords
}

/// `text` itself plus the terms of every family whose trigger it contains.
///
/// Triggers match as substrings ("son" fires inside "chanson"), consistent with
/// lyric matching. The result has no duplicates; `text` is always first,
/// family terms follow in declaration order.
pub fn expand_keywords(text: &str) -> Vec<String> {
    let mut expanded = vec![text.to_string()];
    for family in FAMILIES {
        if !family.triggers.iter().any(|t| text.contains(t)) {
            continue;
        }
        for term in family.terms {
            if !expanded.iter().any(|e| e == term) {
                expanded.push(term.to_string());
            }
        }
    }
    expanded
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strict_keywords_drop_stop_words_and_duplicates() {
        let strict = extract_strict_keywords("la lettre de mon père la lettre");
        assert_eq!(strict, vec!["lettre", "mon", "père"]);
    }

    #[test]
    fn test_strict_keywords_empty_input() {
        assert!(extract_strict_keywords("").is_empty());
        assert!(extract_strict_keywords("the of a").is_empty());
    }

    #[test]
    fn test_expand_always_contains_text_first() {
        let expanded = expand_keywords("summer rain");
        assert_eq!(expanded, vec!["summer rain"]);
    }

    #[test]
    fn test_expand_father_and_speak_families() {
        let expanded = expand_keywords("mon père me parle");
        assert_eq!(expanded[0], "mon père me parle");
        for term in ["père", "father", "dad", "padre", "parent", "family"] {
            assert!(expanded.iter().any(|e| e == term), "missing {term}");
        }
        for term in ["message", "letter", "tell", "say", "talk", "dime", "carta"] {
            assert!(expanded.iter().any(|e| e == term), "missing {term}");
        }
        assert!(!expanded.iter().any(|e| e == "mother"));
    }

    #[test]
    fn test_expand_families_are_additive_without_duplicates() {
        let expanded = expand_keywords("father and mother");
        let parents = expanded.iter().filter(|e| e.as_str() == "parent").count();
        assert_eq!(parents, 1);
        assert!(expanded.iter().any(|e| e == "mère"));
        assert!(expanded.iter().any(|e| e == "dad"));
    }

    #[test]
    fn test_expand_triggers_match_inside_words() {
        let expanded = expand_keywords("une chanson");
        assert!(expanded.iter().any(|e| e == "enfant"));
    }
}
