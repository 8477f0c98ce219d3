//! Skill-gap analysis — JD terms the résumé never mentions, limited to the
//! controlled vocabulary so generic nouns do not show up as "missing skills".

use std::collections::BTreeSet;

use serde::Serialize;

use crate::screening::signals::{tokenize, CandidateTokens};
use crate::screening::vocabulary::SkillVocabulary;
use crate::services::LinguisticAnnotator;

/// Vocabulary terms present in the JD and absent from the résumé.
///
/// Backed by a `BTreeSet`, so iteration is already lexicographic and the
/// rendered list is deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct SkillGap(BTreeSet<String>);

impl SkillGap {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn to_sorted_vec(&self) -> Vec<String> {
        self.0.iter().cloned().collect()
    }
}

impl<S: Into<String>> FromIterator<S> for SkillGap {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        SkillGap(iter.into_iter().map(Into::into).collect())
    }
}

/// Computes `vocabulary ∩ (terms(jd) − terms(resume))`.
///
/// Single-word vocabulary terms are looked up in the annotator's term sets;
/// multi-word terms ("machine learning", "ci/cd") match as a contiguous token
/// phrase, the same rule the summary uses for matched skills.
pub fn analyze_skill_gap(
    resume_text: &str,
    jd_text: &str,
    annotator: &dyn LinguisticAnnotator,
    vocabulary: &SkillVocabulary,
) -> SkillGap {
    let jd = TermIndex::new(jd_text, annotator);
    let resume = TermIndex::new(resume_text, annotator);

    vocabulary
        .terms()
        .iter()
        .filter(|term| jd.mentions(term) && !resume.mentions(term))
        .cloned()
        .collect()
}

/// Annotated terms plus the raw token sequence of one text.
struct TermIndex {
    terms: BTreeSet<String>,
    tokens: CandidateTokens,
}

impl TermIndex {
    fn new(text: &str, annotator: &dyn LinguisticAnnotator) -> Self {
        Self {
            terms: annotator.candidate_terms(text),
            tokens: CandidateTokens::from_text(text),
        }
    }

    fn mentions(&self, term: &str) -> bool {
        match tokenize(term).as_slice() {
            [] => false,
            [single] => self.terms.contains(single),
            _ => self.tokens.contains_term(term),
        }
    }
}
