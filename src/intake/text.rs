//! Lexical normalisation shared by the classifiers.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;

static NON_WORD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^\w\s]").expect("static regex is valid"));

/// Lowercase, trim, and drop every character that is neither a word
/// character nor whitespace.
pub fn normalize(text: &str) -> String {
    NON_WORD
        .replace_all(text.trim().to_lowercase().as_str(), "")
        .into_owned()
}

/// Tokens of the normalised text longer than two characters, in order.
pub fn meaningful_words(text: &str) -> Vec<String> {
    normalize(text)
        .split_whitespace()
        .filter(|w| w.chars().count() > 2)
        .map(str::to_string)
        .collect()
}

/// Distinct meaningful words.
pub fn meaningful_word_set(text: &str) -> HashSet<String> {
    meaningful_words(text).into_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_strips_punctuation() {
        assert_eq!(normalize("  Hi, I have a COUGH!! "), "hi i have a cough");
        assert_eq!(normalize("don't"), "dont");
    }

    #[test]
    fn meaningful_words_drop_short_tokens() {
        assert_eq!(
            meaningful_words("Do you have a fever?"),
            vec!["you", "have", "fever"]
        );
        assert!(meaningful_words("no, ok").is_empty());
    }

    #[test]
    fn word_set_deduplicates() {
        assert_eq!(meaningful_word_set("blah blah").len(), 1);
    }
}
