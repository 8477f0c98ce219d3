use anyhow::{Context, Result};

use crate::services::credentials::VERIFY_SELECTOR;

pub const DEFAULT_GITHUB_API_URL: &str = "https://api.github.com";
pub const DEFAULT_EMBEDDING_MODEL: &str = "all-MiniLM-L6-v2";

/// Application configuration loaded from environment variables.
/// Every value has a default; startup fails only on malformed values.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    /// Comma-separated override of the built-in skill vocabulary.
    pub skill_vocabulary: Option<String>,
    pub http_timeout_secs: u64,
    pub max_upload_bytes: usize,
    pub github_api_url: String,
    pub github_token: Option<String>,
    /// Enables `EmbeddingApiSimilarity`; lexical similarity is used when unset.
    pub embedding_api_url: Option<String>,
    pub embedding_api_key: Option<String>,
    pub embedding_model: String,
    pub credentials: Option<CredentialConfig>,
}

/// On-chain credential registry. Present only when `CREDENTIAL_RPC_URL` is set.
#[derive(Debug, Clone)]
pub struct CredentialConfig {
    pub rpc_url: String,
    pub contract_address: String,
    pub verify_selector: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            port: 8080,
            rust_log: "info".to_string(),
            skill_vocabulary: None,
            http_timeout_secs: 10,
            max_upload_bytes: 20 * 1024 * 1024,
            github_api_url: DEFAULT_GITHUB_API_URL.to_string(),
            github_token: None,
            embedding_api_url: None,
            embedding_api_key: None,
            embedding_model: DEFAULT_EMBEDDING_MODEL.to_string(),
            credentials: None,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let defaults = Config::default();

        let credentials = match optional_env("CREDENTIAL_RPC_URL") {
            Some(rpc_url) => Some(CredentialConfig {
                rpc_url,
                contract_address: require_env("CREDENTIAL_CONTRACT_ADDRESS")?,
                verify_selector: optional_env("CREDENTIAL_VERIFY_SELECTOR")
                    .unwrap_or_else(|| VERIFY_SELECTOR.to_string()),
            }),
            None => None,
        };

        Ok(Config {
            port: parse_env("PORT", defaults.port)?,
            rust_log: optional_env("RUST_LOG").unwrap_or(defaults.rust_log),
            skill_vocabulary: optional_env("SKILL_VOCABULARY"),
            http_timeout_secs: parse_env("HTTP_TIMEOUT_SECS", defaults.http_timeout_secs)?,
            max_upload_bytes: parse_env("MAX_UPLOAD_BYTES", defaults.max_upload_bytes)?,
            github_api_url: optional_env("GITHUB_API_URL").unwrap_or(defaults.github_api_url),
            github_token: optional_env("GITHUB_TOKEN"),
            embedding_api_url: optional_env("EMBEDDING_API_URL"),
            embedding_api_key: optional_env("EMBEDDING_API_KEY"),
            embedding_model: optional_env("EMBEDDING_MODEL").unwrap_or(defaults.embedding_model),
            credentials,
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    optional_env(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

/// Unset and blank values are treated the same.
fn optional_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match optional_env(key) {
        Some(raw) => raw
            .parse::<T>()
            .with_context(|| format!("{key} must be a valid number, got '{raw}'")),
        None => Ok(default),
    }
}
