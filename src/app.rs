//! Application state and service initialization
//!
//! Builds the scoring client once at startup and shares it with every
//! handler. Form state is never stored here; each request owns its session.

use std::sync::Arc;

use crate::model::Config;
use crate::service::{ScoringBackend, ScoringClient};

/// Application state shared by Actix-web handlers
pub struct AppState {
    pub config: Config,
    /// Scoring service used for every submission
    pub backend: Arc<dyn ScoringBackend>,
}

impl AppState {
    /// Build state with an HTTP client for the configured scoring service
    pub fn new(config: Config) -> Result<Self, AppError> {
        let client = ScoringClient::from_config(&config.scoring)
            .map_err(|e| AppError::HttpClient(e.to_string()))?;

        tracing::info!(
            scoring_url = %client.base_url(),
            timeout_secs = config.scoring.timeout_secs,
            "Scoring client initialized"
        );

        Ok(Self::with_backend(config, Arc::new(client)))
    }

    pub fn with_backend(config: Config, backend: Arc<dyn ScoringBackend>) -> Self {
        Self { config, backend }
    }
}

/// Application-level errors
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum AppError {
    /// HTTP client could not be constructed
    #[error("Failed to build scoring client: {0}")]
    HttpClient(String),
}
