use axum::{
    extract::{rejection::JsonRejection, Multipart, State},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::errors::AppError;
use crate::models::candidate::CandidateSubmission;
use crate::models::job::{parse_skill_list, JobDescription};
use crate::screening::inclusion::{audit_job_description, InclusionAudit};
use crate::screening::pipeline::{AnalysisReport, SkillGapReport};
use crate::state::AppState;

const RESUMES_FIELD: &str = "resumes";
const JD_FIELD: &str = "jd";
const MANDATORY_FIELD: &str = "mandatory_skills";

#[derive(Debug, Deserialize)]
pub struct CandidateText {
    pub name: String,
    pub text: String,
}

#[derive(Debug, Deserialize)]
pub struct AnalyzeTextRequest {
    pub jd_text: String,
    #[serde(default)]
    pub mandatory_skills: Vec<String>,
    #[serde(default)]
    pub candidates: Vec<CandidateText>,
}

#[derive(Debug, Deserialize)]
pub struct JdAuditRequest {
    pub jd_text: String,
}

#[derive(Debug, Deserialize)]
pub struct SkillGapRequest {
    pub jd_text: String,
    pub resume_text: String,
}

#[derive(Debug, Deserialize)]
pub struct RedactRequest {
    pub text: String,
}

#[derive(Debug, Serialize)]
pub struct RedactResponse {
    pub redacted: String,
}

/// POST /api/v1/analyze
///
/// Multipart form: repeated `resumes` file fields, a `jd` text field and an
/// optional comma-separated `mandatory_skills` field. Unknown fields are ignored.
pub async fn handle_analyze(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<AnalysisReport>, AppError> {
    let mut jd_text = String::new();
    let mut mandatory_skills = Vec::new();
    let mut submissions = Vec::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(e.body_text()))?
    {
        let field_name = field.name().unwrap_or_default().to_string();
        match field_name.as_str() {
            RESUMES_FIELD => {
                let file_name = field.file_name().unwrap_or_default().trim().to_string();
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::Validation(e.body_text()))?;
                // browsers send an empty part when no file was picked
                if file_name.is_empty() {
                    continue;
                }
                submissions.push(CandidateSubmission::document(file_name, bytes));
            }
            JD_FIELD => {
                jd_text = field
                    .text()
                    .await
                    .map_err(|e| AppError::Validation(e.body_text()))?;
            }
            MANDATORY_FIELD => {
                let csv = field
                    .text()
                    .await
                    .map_err(|e| AppError::Validation(e.body_text()))?;
                mandatory_skills = parse_skill_list(&csv);
            }
            other => debug!(field = other, "ignoring unknown multipart field"),
        }
    }

    let job = JobDescription::new(jd_text, mandatory_skills);
    Ok(Json(state.pipeline.analyze(job, submissions).await))
}

/// POST /api/v1/analyze/text
pub async fn handle_analyze_text(
    State(state): State<AppState>,
    payload: Result<Json<AnalyzeTextRequest>, JsonRejection>,
) -> Result<Json<AnalysisReport>, AppError> {
    let Json(req) = payload?;
    let job = JobDescription::new(req.jd_text, req.mandatory_skills);
    let submissions = req
        .candidates
        .into_iter()
        .map(|c| CandidateSubmission::text(c.name, c.text))
        .collect();

    Ok(Json(state.pipeline.analyze(job, submissions).await))
}

/// POST /api/v1/jd/audit
pub async fn handle_jd_audit(
    payload: Result<Json<JdAuditRequest>, JsonRejection>,
) -> Result<Json<InclusionAudit>, AppError> {
    let Json(req) = payload?;
    Ok(Json(audit_job_description(&req.jd_text)))
}

/// POST /api/v1/skill-gap
pub async fn handle_skill_gap(
    State(state): State<AppState>,
    payload: Result<Json<SkillGapRequest>, JsonRejection>,
) -> Result<Json<SkillGapReport>, AppError> {
    let Json(req) = payload?;
    if req.resume_text.trim().is_empty() {
        return Err(AppError::Validation("resume_text must not be empty".to_string()));
    }
    Ok(Json(state.pipeline.skill_gap_report(&req.resume_text, &req.jd_text)))
}

/// POST /api/v1/redact
pub async fn handle_redact(
    State(state): State<AppState>,
    payload: Result<Json<RedactRequest>, JsonRejection>,
) -> Result<Json<RedactResponse>, AppError> {
    let Json(req) = payload?;
    Ok(Json(RedactResponse {
        redacted: state.pipeline.redact(&req.text),
    }))
}
