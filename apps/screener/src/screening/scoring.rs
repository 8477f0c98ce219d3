//! Scoring engine — combines skill gap, experience, semantic similarity, the
//! enrichment bonus and mandatory-skill penalties into one bounded score.
//!
//! final = clamp(skill·0.4 + experience·0.2 + semantic·0.2 + bonus − penalty, 0, 100)
//!
//! The bonus and penalty sit outside the weighted fraction and the clamp runs
//! last, so either can push the raw sum past a bound before it is clamped.

use std::sync::Arc;

use serde::Serialize;
use tracing::debug;

use crate::screening::explanation::{generate_summary, interview_questions, matched_skills};
use crate::screening::signals::CandidateTokens;
use crate::screening::skill_gap::SkillGap;
use crate::screening::vocabulary::SkillVocabulary;

pub const SKILL_WEIGHT: f64 = 0.4;
pub const EXPERIENCE_WEIGHT: f64 = 0.2;
pub const SEMANTIC_WEIGHT: f64 = 0.2;

/// Points lost per missing vocabulary skill.
pub const SKILL_GAP_COST: f64 = 5.0;
/// Points earned per year of experience, capped at `MAX_SUB_SCORE`.
pub const POINTS_PER_YEAR: f64 = 10.0;
/// Flat deduction per missing mandatory skill.
pub const MANDATORY_PENALTY: f64 = 25.0;

pub const MAX_SUB_SCORE: f64 = 100.0;

/// Per-candidate sub-scores and the final clamped score.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CandidateScore {
    pub skill_score: f64,
    pub experience_score: f64,
    /// Similarity in [0, 1], rounded to 4 decimals.
    pub semantic_raw: f64,
    pub semantic_score: f64,
    pub enrichment_bonus: f64,
    pub mandatory_penalty: f64,
    pub final_score: f64,
}

/// Raw signals for one candidate.
#[derive(Debug, Clone, Copy)]
pub struct ScoreInputs<'a> {
    pub skill_gap: &'a SkillGap,
    pub years_exp: u32,
    pub semantic_raw: f64,
    pub enrichment_bonus: f64,
    pub mandatory_missing: usize,
}

/// A fully explained evaluation of one candidate.
#[derive(Debug, Clone)]
pub struct Evaluation {
    pub score: CandidateScore,
    pub missing_mandatory: Vec<String>,
    pub skill_gap: Vec<String>,
    pub interview_prep: Vec<String>,
    pub summary: String,
}

pub fn skill_score(gap_size: usize) -> f64 {
    (MAX_SUB_SCORE - gap_size as f64 * SKILL_GAP_COST).max(0.0)
}

pub fn experience_score(years_exp: u32) -> f64 {
    (f64::from(years_exp) * POINTS_PER_YEAR).min(MAX_SUB_SCORE)
}

pub fn semantic_score(semantic_raw: f64) -> f64 {
    semantic_raw * 100.0
}

pub fn mandatory_penalty(missing: usize) -> f64 {
    missing as f64 * MANDATORY_PENALTY
}

/// Mandatory skills the candidate's tokens do not contain, in input order.
pub fn missing_mandatory(mandatory: &[String], tokens: &CandidateTokens) -> Vec<String> {
    mandatory
        .iter()
        .filter(|skill| !tokens.contains_term(skill))
        .cloned()
        .collect()
}

/// Rounds `value` half away from zero to `places` decimals.
pub fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}

/// Clamps a similarity reported by a collaborator into [0, 1] and rounds it to 4 decimals.
pub fn normalize_similarity(raw: f64) -> f64 {
    if raw.is_finite() {
        round_to(raw.clamp(0.0, 1.0), 4)
    } else {
        0.0
    }
}

pub fn compute_score(inputs: &ScoreInputs<'_>) -> CandidateScore {
    let skill = skill_score(inputs.skill_gap.len());
    let experience = experience_score(inputs.years_exp);
    let semantic = semantic_score(inputs.semantic_raw);
    let penalty = mandatory_penalty(inputs.mandatory_missing);

    let weighted = skill * SKILL_WEIGHT + experience * EXPERIENCE_WEIGHT + semantic * SEMANTIC_WEIGHT;
    let raw_total = weighted + inputs.enrichment_bonus - penalty;
    let final_score = round_to(raw_total.clamp(0.0, MAX_SUB_SCORE), 2);

    CandidateScore {
        skill_score: skill,
        experience_score: experience,
        semantic_raw: inputs.semantic_raw,
        semantic_score: semantic,
        enrichment_bonus: inputs.enrichment_bonus,
        mandatory_penalty: penalty,
        final_score,
    }
}

/// Aggregation core. Read-only for the duration of a request.
#[derive(Debug, Clone)]
pub struct ScoringEngine {
    vocabulary: Arc<SkillVocabulary>,
}

impl ScoringEngine {
    pub fn new(vocabulary: Arc<SkillVocabulary>) -> Self {
        Self { vocabulary }
    }

    pub fn vocabulary(&self) -> &SkillVocabulary {
        &self.vocabulary
    }

    /// Scores a candidate and builds its explanation.
    pub fn evaluate(
        &self,
        tokens: &CandidateTokens,
        mandatory_skills: &[String],
        skill_gap: &SkillGap,
        years_exp: u32,
        semantic_raw: f64,
        enrichment_bonus: f64,
    ) -> Evaluation {
        let missing = missing_mandatory(mandatory_skills, tokens);
        let semantic_raw = normalize_similarity(semantic_raw);

        let score = compute_score(&ScoreInputs {
            skill_gap,
            years_exp,
            semantic_raw,
            enrichment_bonus,
            mandatory_missing: missing.len(),
        });

        debug!(
            skill = score.skill_score,
            experience = score.experience_score,
            semantic = score.semantic_score,
            bonus = score.enrichment_bonus,
            penalty = score.mandatory_penalty,
            final_score = score.final_score,
            "candidate scored"
        );

        let gaps = skill_gap.to_sorted_vec();
        let skills = matched_skills(&self.vocabulary, tokens);

        Evaluation {
            summary: generate_summary(semantic_raw, &skills, &gaps),
            interview_prep: interview_questions(&gaps),
            skill_gap: gaps,
            missing_mandatory: missing,
            score,
        }
    }
}
