use std::sync::Arc;

use crate::config::Config;
use crate::screening::analyzer::ResumeAnalyzer;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Language-model collaborator. `DisabledAnalyzer` when no credential is configured.
    pub analyzer: Arc<dyn ResumeAnalyzer>,
}
