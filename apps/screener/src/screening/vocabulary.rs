use std::collections::HashSet;

/// Default controlled vocabulary of technical terms.
pub const DEFAULT_SKILLS: &[&str] = &[
    "python",
    "java",
    "react",
    "aws",
    "docker",
    "sql",
    "fastapi",
    "c++",
    "javascript",
];

/// The controlled vocabulary that skill-gap output is restricted to.
///
/// Order is preserved for display (matched-skill citations in summaries).
/// Terms may span several words ("machine learning").
#[derive(Debug, Clone)]
pub struct SkillVocabulary {
    terms: Vec<String>,
}

impl SkillVocabulary {
    /// Builds a vocabulary from arbitrary terms: lowercased, trimmed, blanks
    /// dropped, first occurrence kept.
    pub fn new<I, S>(terms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut seen = HashSet::new();
        let mut ordered = Vec::new();
        for term in terms {
            let term = term.as_ref().trim().to_lowercase();
            if !term.is_empty() && seen.insert(term.clone()) {
                ordered.push(term);
            }
        }
        Self { terms: ordered }
    }

    /// Parses a comma-separated override such as `SKILL_VOCABULARY=rust,go,kafka`.
    /// Falls back to the defaults when the list is blank.
    pub fn from_csv(csv: &str) -> Self {
        let vocabulary = Self::new(csv.split(','));
        if vocabulary.terms.is_empty() {
            Self::default()
        } else {
            vocabulary
        }
    }

    pub fn terms(&self) -> &[String] {
        &self.terms
    }
}

impl Default for SkillVocabulary {
    fn default() -> Self {
        Self::new(DEFAULT_SKILLS.iter().copied())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn has(vocab: &SkillVocabulary, term: &str) -> bool {
        vocab.terms().iter().any(|t| t == term)
    }

    #[test]
    fn test_default_vocabulary_contents() {
        let vocab = SkillVocabulary::default();
        assert_eq!(vocab.terms().len(), DEFAULT_SKILLS.len());
        assert!(has(&vocab, "c++"));
        assert!(has(&vocab, "fastapi"));
        assert!(!has(&vocab, "kubernetes"));
    }

    #[test]
    fn test_csv_override_normalizes_and_dedups() {
        let vocab = SkillVocabulary::from_csv(" Rust, go ,KAFKA,rust,, ");
        assert_eq!(vocab.terms(), ["rust", "go", "kafka"]);
        assert!(!has(&vocab, "python"));
    }

    #[test]
    fn test_blank_csv_falls_back_to_defaults() {
        let vocab = SkillVocabulary::from_csv(" , ,");
        assert!(has(&vocab, "python"));
    }

    #[test]
    fn test_multi_word_terms_kept_whole() {
        let vocab = SkillVocabulary::from_csv("Machine Learning, ci/cd");
        assert_eq!(vocab.terms(), ["machine learning", "ci/cd"]);
    }
}
