use crate::config::Config;
use crate::screening::pipeline::ScreeningPipeline;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Scoring pipeline with its collaborators already wired. Read-only after startup.
    pub pipeline: ScreeningPipeline,
}
