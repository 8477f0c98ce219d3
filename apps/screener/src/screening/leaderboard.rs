use std::cmp::Ordering;

use serde::Serialize;

use crate::screening::scoring::CandidateScore;
use crate::screening::signals::ProfileHandles;
use crate::services::ActivityRecord;

/// One ranked candidate. Built once per request and never mutated afterwards.
#[derive(Debug, Clone, Serialize)]
pub struct LeaderboardEntry {
    pub name: String,
    pub score: f64,
    pub years_exp: u32,
    pub skill_gap: Vec<String>,
    pub missing_mandatory: Vec<String>,
    pub interview_prep: Vec<String>,
    pub summary: String,
    pub breakdown: CandidateScore,
    pub github: ActivityRecord,
    pub credential_verified: Option<bool>,
    pub profiles: ProfileHandles,
}

/// Request-scoped collection of scored candidates.
///
/// Entries must be collected in submission order for ties to resolve correctly.
#[derive(Debug, Default)]
pub struct Leaderboard {
    entries: Vec<LeaderboardEntry>,
}

impl Leaderboard {
    /// Highest score first. `sort_by` is stable, so equal scores keep submission order.
    pub fn into_ranked(mut self) -> Vec<LeaderboardEntry> {
        self.entries
            .sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));
        self.entries
    }
}

impl FromIterator<LeaderboardEntry> for Leaderboard {
    fn from_iter<I: IntoIterator<Item = LeaderboardEntry>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}
