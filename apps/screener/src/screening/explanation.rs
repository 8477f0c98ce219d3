//! Human-readable explanation of a score: a one-sentence summary and a list of
//! interview questions targeting the candidate's skill gaps.

use crate::screening::signals::CandidateTokens;
use crate::screening::vocabulary::SkillVocabulary;

const STRONG_MATCH_THRESHOLD: f64 = 0.8;
const SOLID_MATCH_THRESHOLD: f64 = 0.5;
const MAX_CITED: usize = 2;

/// Canned, expert-level questions keyed by lowercase skill.
const QUESTION_BANK: &[(&str, &str)] = &[
    (
        "python",
        "Explain the difference between a list and a tuple. In what scenario is a tuple more efficient?",
    ),
    (
        "aws",
        "How would you ensure high availability and disaster recovery for a web application on AWS?",
    ),
    (
        "docker",
        "What is the difference between an Entrypoint and a Command in a Dockerfile?",
    ),
    (
        "react",
        "Explain the virtual DOM and how React handles reconciliation during state changes.",
    ),
    (
        "fastapi",
        "How does FastAPI leverage Python type hints for data validation and documentation?",
    ),
    (
        "sql",
        "What is an index in a database, and how does it improve query performance? Are there downsides?",
    ),
    (
        "java",
        "Explain the difference between a Checked Exception and an Unchecked Exception in Java.",
    ),
];

/// Vocabulary terms the candidate demonstrably has, in vocabulary order.
pub fn matched_skills(vocabulary: &SkillVocabulary, tokens: &CandidateTokens) -> Vec<String> {
    vocabulary
        .terms()
        .iter()
        .filter(|term| tokens.contains_term(term))
        .cloned()
        .collect()
}

/// One-sentence fit summary driven by the rounded semantic similarity.
pub fn generate_summary(semantic_raw: f64, skills: &[String], gaps: &[String]) -> String {
    if semantic_raw > STRONG_MATCH_THRESHOLD {
        format!("Strong match with expert proficiency in {}.", cite(skills))
    } else if semantic_raw > SOLID_MATCH_THRESHOLD {
        let gap_text = if gaps.is_empty() {
            String::new()
        } else {
            format!(" but lacks {}", join_top(gaps))
        };
        format!("Solid technical background in {}{gap_text}.", cite(skills))
    } else {
        "Profile does not closely align with the core technical requirements of this role."
            .to_string()
    }
}

/// One question per gap, in gap order. Unknown skills get a templated question.
pub fn interview_questions(gaps: &[String]) -> Vec<String> {
    gaps.iter().map(|skill| question_for(skill)).collect()
}

fn question_for(skill: &str) -> String {
    let key = skill.to_lowercase();
    QUESTION_BANK
        .iter()
        .find(|(bank_skill, _)| *bank_skill == key)
        .map(|(_, question)| question.to_string())
        .unwrap_or_else(|| {
            format!("Can you describe a challenging project where you successfully implemented {skill}?")
        })
}

fn cite(skills: &[String]) -> String {
    if skills.is_empty() {
        "the role's core stack".to_string()
    } else {
        join_top(skills)
    }
}

fn join_top(items: &[String]) -> String {
    items
        .iter()
        .take(MAX_CITED)
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_strong_summary_cites_top_two_skills() {
        let summary = generate_summary(0.91, &strings(&["python", "aws", "docker"]), &[]);
        assert_eq!(summary, "Strong match with expert proficiency in python, aws.");
    }

    #[test]
    fn test_solid_summary_lists_gaps() {
        let summary = generate_summary(
            0.65,
            &strings(&["python", "sql"]),
            &strings(&["aws", "docker", "react"]),
        );
        assert_eq!(summary, "Solid technical background in python, sql but lacks aws, docker.");
    }

    #[test]
    fn test_solid_summary_without_gaps() {
        let summary = generate_summary(0.6, &strings(&["java"]), &[]);
        assert_eq!(summary, "Solid technical background in java.");
    }

    #[test]
    fn test_thresholds_are_strict() {
        let low = generate_summary(0.5, &strings(&["python"]), &[]);
        assert!(low.starts_with("Profile does not closely align"));
        let solid = generate_summary(0.8, &strings(&["python"]), &[]);
        assert!(solid.starts_with("Solid technical background"));
    }

    #[test]
    fn test_summary_without_matched_skills_is_well_formed() {
        let summary = generate_summary(0.95, &[], &[]);
        assert_eq!(summary, "Strong match with expert proficiency in the role's core stack.");
    }

    #[test]
    fn test_interview_questions_follow_gap_order() {
        let questions = interview_questions(&strings(&["sql", "kubernetes", "docker"]));
        assert_eq!(questions.len(), 3);
        assert!(questions[0].starts_with("What is an index in a database"));
        assert_eq!(
            questions[1],
            "Can you describe a challenging project where you successfully implemented kubernetes?"
        );
        assert!(questions[2].contains("Dockerfile"));
    }

    #[test]
    fn test_question_lookup_is_case_insensitive() {
        let questions = interview_questions(&strings(&["AWS"]));
        assert!(questions[0].contains("high availability"));
    }

    #[test]
    fn test_no_gaps_no_questions() {
        assert!(interview_questions(&[]).is_empty());
    }

    #[test]
    fn test_matched_skills_in_vocabulary_order() {
        let tokens = CandidateTokens::from_text("Docker, SQL and Python daily");
        let skills = matched_skills(&SkillVocabulary::default(), &tokens);
        assert_eq!(skills, vec!["python", "docker", "sql"]);
    }
}
