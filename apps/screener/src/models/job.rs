use serde::Serialize;

use crate::screening::inclusion::{audit_job_description, InclusionAudit};

/// A job description with its request-scoped derived data.
///
/// The inclusion audit is computed once at construction and never changes.
#[derive(Debug, Clone, Serialize)]
pub struct JobDescription {
    text: String,
    mandatory_skills: Vec<String>,
    audit: InclusionAudit,
}

impl JobDescription {
    pub fn new<I, S>(text: impl Into<String>, mandatory_skills: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let text = text.into();
        let audit = audit_job_description(&text);
        Self {
            mandatory_skills: normalize_skills(mandatory_skills),
            text,
            audit,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn mandatory_skills(&self) -> &[String] {
        &self.mandatory_skills
    }

    pub fn audit(&self) -> &InclusionAudit {
        &self.audit
    }
}

/// Splits a comma-separated form value such as `"Docker, AWS"`.
pub fn parse_skill_list(csv: &str) -> Vec<String> {
    normalize_skills(csv.split(','))
}

/// Lowercased, trimmed, blanks dropped, duplicates removed (first occurrence wins).
fn normalize_skills<I, S>(skills: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut normalized: Vec<String> = Vec::new();
    for skill in skills {
        let skill = skill.as_ref().trim().to_lowercase();
        if !skill.is_empty() && !normalized.contains(&skill) {
            normalized.push(skill);
        }
    }
    normalized
}
