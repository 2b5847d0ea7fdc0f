use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref NON_WORD: Regex = Regex::new(r"[^\w\s]").expect("valid regex");
    static ref WHITESPACE: Regex = Regex::new(r"\s+").expect("valid regex");
    static ref WORD: Regex = Regex::new(r"\w+").expect("valid regex");
}

/// Normalize text the same way for documents and queries: lowercase, newlines to spaces,
/// drop everything that is not a word character or whitespace, collapse whitespace, trim.
pub fn normalize(text: &str) -> String {
    let lowered = text.to_lowercase().replace('\n', " ");
    let stripped = NON_WORD.replace_all(&lowered, "");
    WHITESPACE.replace_all(&stripped, " ").trim().to_string()
}

/// Split normalized text into maximal runs of word characters, in order, duplicates kept.
pub fn tokenize(normalized: &str) -> Vec<String> {
    WORD.find_iter(normalized).map(|m| m.as_str().to_string()).collect()
}

pub fn normalized_tokens(text: &str) -> Vec<String> {
    tokenize(&normalize(text))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_strips_punctuation_and_newlines() {
        assert_eq!(normalize("  Hello,\nWorld!!  It's   FINE.\n"), "hello world its fine");
    }

    #[test]
    fn tokenize_keeps_underscores_digits_and_repeats() {
        let t = tokenize(&normalize("snake_case 42 snake_case"));
        assert_eq!(t, vec!["snake_case", "42", "snake_case"]);
    }

    #[test]
    fn empty_input_has_no_tokens() {
        assert!(normalized_tokens("  ?!  \n").is_empty());
    }
}
