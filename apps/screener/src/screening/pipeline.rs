//! Screening pipeline — runs every submitted résumé through extraction, signal
//! analysis, enrichment and scoring, then ranks the results.
//!
//! Candidates are scored concurrently. Each task reports its submission index
//! and results are put back in that order before the stable ranking sort, so
//! ties resolve the same way regardless of completion order.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::task::JoinSet;
use tracing::{debug, error, info, info_span, warn, Instrument};
use uuid::Uuid;

use crate::models::candidate::{CandidateDocument, CandidateSource, CandidateSubmission};
use crate::models::job::JobDescription;
use crate::screening::enrichment::EnrichmentAdapter;
use crate::screening::explanation::interview_questions;
use crate::screening::inclusion::InclusionAudit;
use crate::screening::leaderboard::{Leaderboard, LeaderboardEntry};
use crate::screening::scoring::ScoringEngine;
use crate::screening::signals::extract_signals;
use crate::screening::skill_gap::analyze_skill_gap;
use crate::services::{
    DocumentTextExtractor, ExtractionError, LinguisticAnnotator, PiiRedactor, SimilarityOracle,
};

/// Result payload of one analysis request.
#[derive(Debug, Serialize)]
pub struct AnalysisReport {
    pub analysis_id: Uuid,
    pub analyzed_at: DateTime<Utc>,
    pub audit: InclusionAudit,
    pub candidates: Vec<LeaderboardEntry>,
}

/// Skill gap of a single résumé with matching interview questions.
#[derive(Debug, Serialize)]
pub struct SkillGapReport {
    pub skill_gap: Vec<String>,
    pub interview_prep: Vec<String>,
}

/// External collaborators the pipeline depends on.
#[derive(Clone)]
pub struct Collaborators {
    pub documents: Arc<dyn DocumentTextExtractor>,
    pub annotator: Arc<dyn LinguisticAnnotator>,
    pub redactor: Arc<dyn PiiRedactor>,
    pub similarity: Arc<dyn SimilarityOracle>,
    pub enrichment: EnrichmentAdapter,
}

/// Cheap to clone; every field is shared and read-only.
#[derive(Clone)]
pub struct ScreeningPipeline {
    collaborators: Collaborators,
    engine: ScoringEngine,
}

impl ScreeningPipeline {
    pub fn new(collaborators: Collaborators, engine: ScoringEngine) -> Self {
        Self {
            collaborators,
            engine,
        }
    }

    pub fn similarity_backend(&self) -> &'static str {
        self.collaborators.similarity.name()
    }

    /// Scores and ranks every submission against `job`.
    ///
    /// Candidates that cannot be read are skipped; an empty submission list
    /// yields an empty leaderboard.
    pub async fn analyze(
        &self,
        job: JobDescription,
        submissions: Vec<CandidateSubmission>,
    ) -> AnalysisReport {
        let analysis_id = Uuid::new_v4();
        let span = info_span!("analysis", %analysis_id);

        async move {
            info!(candidates = submissions.len(), "analysis started");
            let job = Arc::new(job);

            let mut tasks = JoinSet::new();
            for (index, submission) in submissions.into_iter().enumerate() {
                let pipeline = self.clone();
                let job = Arc::clone(&job);
                tasks.spawn(
                    async move { (index, pipeline.screen_candidate(&job, submission).await) }
                        .in_current_span(),
                );
            }

            let mut scored: Vec<(usize, LeaderboardEntry)> = Vec::new();
            while let Some(joined) = tasks.join_next().await {
                match joined {
                    Ok((index, Some(entry))) => scored.push((index, entry)),
                    Ok((_, None)) => {}
                    Err(e) => error!(error = %e, "candidate task aborted; skipping"),
                }
            }
            scored.sort_by_key(|(index, _)| *index);

            let leaderboard: Leaderboard = scored.into_iter().map(|(_, entry)| entry).collect();
            let candidates = leaderboard.into_ranked();
            info!(ranked = candidates.len(), "analysis finished");

            AnalysisReport {
                analysis_id,
                analyzed_at: Utc::now(),
                audit: job.audit().clone(),
                candidates,
            }
        }
        .instrument(span)
        .await
    }

    /// Skill gap and interview prep for a single résumé, without scoring.
    pub fn skill_gap_report(&self, resume_text: &str, jd_text: &str) -> SkillGapReport {
        let gap = analyze_skill_gap(
            resume_text,
            jd_text,
            self.collaborators.annotator.as_ref(),
            self.engine.vocabulary(),
        )
        .to_sorted_vec();

        SkillGapReport {
            interview_prep: interview_questions(&gap),
            skill_gap: gap,
        }
    }

    pub fn redact(&self, text: &str) -> String {
        self.collaborators.redactor.redact(text)
    }

    async fn screen_candidate(
        &self,
        job: &JobDescription,
        submission: CandidateSubmission,
    ) -> Option<LeaderboardEntry> {
        let name = submission.name.clone();
        match self.load_document(submission).await {
            Ok(document) => Some(self.score_document(job, document).await),
            Err(e) => {
                warn!(candidate = %name, error = %e, "skipping unreadable candidate");
                None
            }
        }
    }

    async fn load_document(
        &self,
        submission: CandidateSubmission,
    ) -> Result<CandidateDocument, ExtractionError> {
        let text = match submission.source {
            CandidateSource::Text(text) if text.trim().is_empty() => {
                return Err(ExtractionError::Empty)
            }
            CandidateSource::Text(text) => text,
            CandidateSource::Document { file_name, bytes } => {
                let extractor = Arc::clone(&self.collaborators.documents);
                tokio::task::spawn_blocking(move || extractor.extract(&file_name, &bytes))
                    .await
                    .map_err(|e| ExtractionError::Aborted(e.to_string()))??
            }
        };

        Ok(CandidateDocument {
            name: submission.name,
            text,
        })
    }

    async fn score_document(&self, job: &JobDescription, document: CandidateDocument) -> LeaderboardEntry {
        let signals = extract_signals(&document.text);
        let skill_gap = analyze_skill_gap(
            &document.text,
            job.text(),
            self.collaborators.annotator.as_ref(),
            self.engine.vocabulary(),
        );

        let blinded = self.collaborators.redactor.redact(&document.text);
        let (semantic_raw, enrichment) = tokio::join!(
            self.collaborators.similarity.similarity(&blinded, job.text()),
            self.collaborators.enrichment.enrich(&signals.handles),
        );

        let evaluation = self.engine.evaluate(
            &signals.tokens,
            job.mandatory_skills(),
            &skill_gap,
            signals.years_exp,
            semantic_raw,
            enrichment.bonus,
        );
        debug!(candidate = %document.name, score = evaluation.score.final_score, "candidate evaluated");

        LeaderboardEntry {
            name: document.name,
            score: evaluation.score.final_score,
            years_exp: signals.years_exp,
            skill_gap: evaluation.skill_gap,
            missing_mandatory: evaluation.missing_mandatory,
            interview_prep: evaluation.interview_prep,
            summary: evaluation.summary,
            breakdown: evaluation.score,
            github: enrichment.activity,
            credential_verified: enrichment.credential_verified,
            profiles: signals.handles,
        }
    }
}
