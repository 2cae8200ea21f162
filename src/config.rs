//! Engine configuration.
//!
//! Classifier connection settings come from the environment (a `.env` file
//! is honored); engine tunables have defaults and are only overridden by
//! embedding code or tests.

use chrono::Duration;

use crate::circles::cache::default_ttl;
use crate::classify::{ClassifierSettings, Provider};

/// Tunables owned by the engine itself.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// How long a cached clustering result stays valid.
    pub cache_ttl: Duration,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            cache_ttl: default_ttl(),
        }
    }
}

/// Load classifier settings from the environment.
///
/// Required: `CLASSIFIER_BASE_URL`, `CLASSIFIER_MODEL`. Optional:
/// `CLASSIFIER_API_KEY`. The provider is auto-detected from the base URL.
pub fn load_classifier_settings() -> Result<ClassifierSettings, String> {
    let _ = dotenvy::dotenv();

    let base_url = std::env::var("CLASSIFIER_BASE_URL")
        .map_err(|_| "Missing required env var: CLASSIFIER_BASE_URL".to_string())?;
    if base_url.trim().is_empty() {
        return Err("CLASSIFIER_BASE_URL cannot be empty".to_string());
    }

    let model = std::env::var("CLASSIFIER_MODEL")
        .map_err(|_| "Missing required env var: CLASSIFIER_MODEL".to_string())?;
    if model.trim().is_empty() {
        return Err("CLASSIFIER_MODEL cannot be empty".to_string());
    }

    let api_key = std::env::var("CLASSIFIER_API_KEY")
        .ok()
        .filter(|s| !s.trim().is_empty());

    let provider = Provider::detect_from_url(&base_url);

    Ok(ClassifierSettings {
        base_url,
        api_key,
        model,
        provider,
    })
}
