use serde::Serialize;

/// Terms that read as exclusionary in a job posting. Flags are reported in this order.
pub const FLAGGED_TERMS: &[&str] = &["rockstar", "ninja", "dominant", "competitive"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InclusionAudit {
    pub inclusive: bool,
    pub flags: Vec<String>,
}

/// Audits a job description for non-inclusive language.
///
/// Matching is a case-insensitive substring test, so "Ninjas" is flagged too.
pub fn audit_job_description(jd_text: &str) -> InclusionAudit {
    let text_lower = jd_text.to_lowercase();
    let flags: Vec<String> = FLAGGED_TERMS
        .iter()
        .filter(|&&term| text_lower.contains(term))
        .map(|&term| term.to_string())
        .collect();

    InclusionAudit {
        inclusive: flags.is_empty(),
        flags,
    }
}
