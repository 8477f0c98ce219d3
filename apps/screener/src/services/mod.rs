//! External collaborators consumed by the screening core.
//!
//! ARCHITECTURAL RULE: the scoring core only sees the traits below. Concrete
//! backends (PDF parsing, HTTP lookups, embedding APIs) live in the submodules
//! and are wired into `AppState` at startup.

use std::collections::BTreeSet;
use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

pub mod annotator;
pub mod credentials;
pub mod documents;
pub mod github;
pub mod redaction;
pub mod similarity;

pub use github::ActivityRecord;

/// User agent sent on every outbound HTTP call. GitHub rejects requests without one.
pub const USER_AGENT: &str = concat!("screener/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("unsupported document type: {0}")]
    Unsupported(String),

    #[error("PDF extraction failed: {0}")]
    Pdf(String),

    #[error("DOCX extraction failed: {0}")]
    Docx(String),

    #[error("document is not valid UTF-8")]
    Encoding,

    #[error("document contains no extractable text")]
    Empty,

    #[error("extraction task aborted: {0}")]
    Aborted(String),
}

#[derive(Debug, Error)]
pub enum EnrichmentError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("profile not found or private")]
    NotFound,

    #[error("upstream returned status {0}")]
    Status(u16),

    #[error("malformed upstream response: {0}")]
    Malformed(String),
}

/// Turns an uploaded document into plain text.
pub trait DocumentTextExtractor: Send + Sync {
    fn extract(&self, file_name: &str, bytes: &[u8]) -> Result<String, ExtractionError>;
}

/// Returns the lowercase candidate terms of a text, stopwords excluded.
pub trait LinguisticAnnotator: Send + Sync {
    fn candidate_terms(&self, text: &str) -> BTreeSet<String>;
}

/// Removes identity features from a text before it is compared against a JD.
pub trait PiiRedactor: Send + Sync {
    fn redact(&self, text: &str) -> String;
}

/// Symmetric text similarity. Implementations must return a value in [0, 1]
/// and be deterministic for identical inputs.
#[async_trait]
pub trait SimilarityOracle: Send + Sync {
    async fn similarity(&self, text_a: &str, text_b: &str) -> f64;

    fn name(&self) -> &'static str;
}

/// Looks up public code-hosting activity for a profile handle.
#[async_trait]
pub trait ActivityOracle: Send + Sync {
    async fn lookup(&self, handle: &str) -> Result<ActivityRecord, EnrichmentError>;
}

/// Checks whether a credential (e.g. a degree) is registered for a wallet.
#[async_trait]
pub trait CredentialVerifier: Send + Sync {
    async fn verify(&self, wallet: &str) -> Result<bool, EnrichmentError>;
}

/// Shared HTTP client for all outbound collaborator calls.
pub fn build_http_client(timeout: Duration) -> reqwest::Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(timeout)
        .user_agent(USER_AGENT)
        .build()
}
