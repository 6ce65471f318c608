//! One-time model loading.
//!
//! The model is loaded once at startup and the resulting handle is passed
//! explicitly to whoever serves requests. A failed load is not fatal: it is
//! logged and represented as `None`, and callers degrade to a fixed
//! "unavailable" reply.

use std::sync::Arc;
use std::time::Duration;

use super::providers::tgi::{TgiCompletion, DEFAULT_MAX_RETRIES, DEFAULT_TIMEOUT};
use super::text_generator::TextGenerator;

/// Model expected behind the configured endpoint.
pub const DEFAULT_MODEL_NAME: &str = "TinyLlama/TinyLlama-1.1B-Chat-v1.0";

/// A loaded model shared for the process lifetime.
pub type SharedGenerator = Arc<dyn TextGenerator>;

/// Where and how to reach the model.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelConfig {
    /// Base URL of the model server. `None` means no model is configured.
    pub url: Option<String>,
    /// Expected model id.
    pub model_name: String,
    /// Per-request timeout.
    pub timeout: Duration,
    /// Retries after the first attempt on transient failures.
    pub max_retries: u32,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            url: None,
            model_name: DEFAULT_MODEL_NAME.to_string(),
            timeout: DEFAULT_TIMEOUT,
            max_retries: DEFAULT_MAX_RETRIES,
        }
    }
}

/// Load the model described by `config`.
///
/// Returns `None` when no endpoint is configured or the probe fails.
pub async fn load_model(config: &ModelConfig) -> Option<SharedGenerator> {
    let Some(url) = config.url.as_deref() else {
        log::warn!("No model endpoint configured; narrative rewriting is unavailable");
        return None;
    };

    log::info!("Loading model {} from {}", config.model_name, url);

    let provider = match TgiCompletion::with_timeout(url, &config.model_name, config.timeout) {
        Ok(mut provider) => {
            provider.max_retries = config.max_retries;
            provider
        }
        Err(e) => {
            log::error!("Failed to build model client: {}", e);
            return None;
        }
    };

    match provider.connect().await {
        Ok(provider) => {
            log::info!("Model {} loaded", provider.model());
            let model: SharedGenerator = Arc::new(provider);
            Some(model)
        }
        Err(e) => {
            log::error!(
                "Failed to load model {} from {}: {}. Check that the model server is running",
                config.model_name,
                url,
                e
            );
            None
        }
    }
}
