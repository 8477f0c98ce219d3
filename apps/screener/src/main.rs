mod config;
mod errors;
mod models;
mod routes;
mod screening;
mod services;
mod state;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::routes::build_router;
use crate::screening::enrichment::EnrichmentAdapter;
use crate::screening::pipeline::{Collaborators, ScreeningPipeline};
use crate::screening::scoring::ScoringEngine;
use crate::screening::vocabulary::SkillVocabulary;
use crate::services::annotator::StopwordAnnotator;
use crate::services::credentials::EthCredentialVerifier;
use crate::services::documents::FileTextExtractor;
use crate::services::github::GithubActivityClient;
use crate::services::redaction::RegexPiiRedactor;
use crate::services::similarity::{EmbeddingApiSimilarity, LexicalSimilarity};
use crate::services::{build_http_client, CredentialVerifier, SimilarityOracle};
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on malformed env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting screener v{}", env!("CARGO_PKG_VERSION"));

    let pipeline = build_pipeline(&config)?;
    info!(
        "Screening pipeline ready (similarity: {})",
        pipeline.similarity_backend()
    );

    // Build app state
    let state = AppState {
        config: config.clone(),
        pipeline,
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Wires the concrete collaborators selected by `config` into the pipeline.
fn build_pipeline(config: &Config) -> Result<ScreeningPipeline> {
    let http = build_http_client(Duration::from_secs(config.http_timeout_secs))?;

    let vocabulary = match &config.skill_vocabulary {
        Some(csv) => SkillVocabulary::from_csv(csv),
        None => SkillVocabulary::default(),
    };
    info!("Skill vocabulary: {} terms", vocabulary.terms().len());

    // Embedding API when configured, otherwise the offline lexical matcher
    let similarity: Arc<dyn SimilarityOracle> = match &config.embedding_api_url {
        Some(url) => Arc::new(EmbeddingApiSimilarity::new(
            http.clone(),
            url,
            config.embedding_api_key.clone(),
            config.embedding_model.clone(),
        )),
        None => Arc::new(LexicalSimilarity),
    };

    let activity = Arc::new(GithubActivityClient::new(
        http.clone(),
        &config.github_api_url,
        config.github_token.clone(),
    ));

    let credentials: Option<Arc<dyn CredentialVerifier>> = config.credentials.as_ref().map(|c| {
        info!("Credential verification enabled (contract: {})", c.contract_address);
        Arc::new(EthCredentialVerifier::new(
            http.clone(),
            c.rpc_url.clone(),
            c.contract_address.clone(),
            c.verify_selector.clone(),
        )) as Arc<dyn CredentialVerifier>
    });

    let collaborators = Collaborators {
        documents: Arc::new(FileTextExtractor),
        annotator: Arc::new(StopwordAnnotator),
        redactor: Arc::new(RegexPiiRedactor),
        similarity,
        enrichment: EnrichmentAdapter::new(activity, credentials),
    };

    Ok(ScreeningPipeline::new(
        collaborators,
        ScoringEngine::new(Arc::new(vocabulary)),
    ))
}
