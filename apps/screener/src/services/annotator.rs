//! Default linguistic annotator: tokenizer plus an English stopword filter.

use std::collections::{BTreeSet, HashSet};
use std::sync::LazyLock;

use crate::screening::signals::tokenize;
use crate::services::LinguisticAnnotator;

const STOPWORDS: &[&str] = &[
    "a", "about", "above", "after", "again", "against", "all", "also", "am", "an", "and", "any",
    "are", "as", "at", "be", "because", "been", "before", "being", "below", "between", "both",
    "but", "by", "can", "could", "did", "do", "does", "doing", "down", "during", "each", "etc",
    "few", "for", "from", "further", "had", "has", "have", "having", "he", "her", "here", "hers",
    "him", "his", "how", "i", "if", "in", "into", "is", "it", "its", "just", "may", "me", "more",
    "most", "must", "my", "no", "nor", "not", "of", "off", "on", "once", "only", "or", "other",
    "our", "ours", "out", "over", "own", "per", "same", "she", "should", "so", "some", "such",
    "than", "that", "the", "their", "them", "then", "there", "these", "they", "this", "those",
    "through", "to", "too", "under", "until", "up", "us", "very", "via", "was", "we", "were",
    "what", "when", "where", "which", "while", "who", "whom", "why", "will", "with", "would",
    "you", "your", "yours",
];

static STOPWORD_SET: LazyLock<HashSet<&'static str>> =
    LazyLock::new(|| STOPWORDS.iter().copied().collect());

/// Pure-Rust annotator. Keeps every non-stopword, non-numeric token.
#[derive(Debug, Clone, Copy, Default)]
pub struct StopwordAnnotator;

impl LinguisticAnnotator for StopwordAnnotator {
    fn candidate_terms(&self, text: &str) -> BTreeSet<String> {
        tokenize(text)
            .into_iter()
            .filter(|token| !STOPWORD_SET.contains(token.as_str()))
            .filter(|token| !token.chars().all(|c| c.is_ascii_digit() || c == '.'))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stopwords_and_numbers_removed() {
        let terms = StopwordAnnotator.candidate_terms("We need 5 engineers with the AWS and Docker skills");
        assert!(terms.contains("aws"));
        assert!(terms.contains("docker"));
        assert!(terms.contains("engineers"));
        assert!(!terms.contains("the"));
        assert!(!terms.contains("with"));
        assert!(!terms.contains("5"));
    }

    #[test]
    fn test_terms_are_lowercase_and_unique() {
        let terms = StopwordAnnotator.candidate_terms("Python python PYTHON");
        assert_eq!(terms.len(), 1);
        assert!(terms.contains("python"));
    }

    #[test]
    fn test_empty_text_yields_no_terms() {
        assert!(StopwordAnnotator.candidate_terms("").is_empty());
    }
}
