//! GitHub activity lookups — repository count and most-used languages.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};

use crate::services::{ActivityOracle, EnrichmentError};

const TOP_LANGUAGES: usize = 3;

/// Public activity summary for one profile. `Default` is the neutral record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ActivityRecord {
    pub repo_count: u32,
    pub top_languages: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct RepoSummary {
    language: Option<String>,
}

#[derive(Clone)]
pub struct GithubActivityClient {
    client: Client,
    api_base: String,
    token: Option<String>,
}

impl GithubActivityClient {
    pub fn new(client: Client, api_base: &str, token: Option<String>) -> Self {
        Self {
            client,
            api_base: api_base.trim_end_matches('/').to_string(),
            token,
        }
    }

    fn repos_url(&self, handle: &str) -> String {
        format!("{}/users/{handle}/repos", self.api_base)
    }
}

#[async_trait]
impl ActivityOracle for GithubActivityClient {
    async fn lookup(&self, handle: &str) -> Result<ActivityRecord, EnrichmentError> {
        let mut request = self
            .client
            .get(self.repos_url(handle))
            .header("accept", "application/vnd.github+json");
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        match response.status() {
            StatusCode::NOT_FOUND | StatusCode::FORBIDDEN => return Err(EnrichmentError::NotFound),
            status if !status.is_success() => return Err(EnrichmentError::Status(status.as_u16())),
            _ => {}
        }

        let body = response.text().await?;
        let repos: Vec<RepoSummary> =
            serde_json::from_str(&body).map_err(|e| EnrichmentError::Malformed(e.to_string()))?;

        Ok(summarize_repos(&repos))
    }
}

fn summarize_repos(repos: &[RepoSummary]) -> ActivityRecord {
    // (language, count) in first-seen order; the stable sort keeps it for ties
    let mut counts: Vec<(&str, u32)> = Vec::new();
    for language in repos.iter().filter_map(|r| r.language.as_deref()) {
        match counts.iter_mut().find(|(seen, _)| *seen == language) {
            Some((_, count)) => *count += 1,
            None => counts.push((language, 1)),
        }
    }
    counts.sort_by(|a, b| b.1.cmp(&a.1));

    ActivityRecord {
        repo_count: u32::try_from(repos.len()).unwrap_or(u32::MAX),
        top_languages: counts
            .into_iter()
            .take(TOP_LANGUAGES)
            .map(|(language, _)| language.to_string())
            .collect(),
    }
}
