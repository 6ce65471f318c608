//! Text-generation-inference provider.
//!
//! Talks to a locally hosted model server that speaks the Hugging Face
//! text-generation-inference wire format:
//!
//! - `GET  {base}/info`     — `{"model_id": "...", ...}`
//! - `POST {base}/generate` — `{"inputs": prompt, "parameters": {...}}`
//!   answered with `{"generated_text": "..."}`
//!
//! # Features
//!
//! - One-time connection probe via `/info` (model id discovery)
//! - Full-text decoding (prompt + continuation), like a local tokenizer decode
//! - Retry with exponential backoff on transport errors, 429 and 5xx
//! - 4xx responses fail immediately

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;

use crate::llms::text_generator::{GenerationError, GenerationParams, TextGenerator};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Default request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);

/// Default number of retries after the first attempt.
pub const DEFAULT_MAX_RETRIES: u32 = 2;

/// First retry delay; doubled on each further retry.
pub const DEFAULT_RETRY_BACKOFF: Duration = Duration::from_secs(1);

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

/// Subset of the `/info` response we care about.
#[derive(Debug, Clone, Deserialize)]
pub struct ModelInfo {
    pub model_id: String,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    generated_text: String,
}

// ---------------------------------------------------------------------------
// TgiCompletion provider
// ---------------------------------------------------------------------------

/// Client for a text-generation-inference server.
///
/// # Example
///
/// ```ignore
/// let provider = TgiCompletion::new("http://127.0.0.1:8081", "TinyLlama/TinyLlama-1.1B-Chat-v1.0")?;
/// let provider = provider.connect().await?;
/// let text = provider.generate("Hello", &GenerationParams::default()).await?;
/// ```
#[derive(Debug, Clone)]
pub struct TgiCompletion {
    /// Server base URL without trailing slash.
    base_url: String,
    /// Model id, replaced by the server-reported id after [`connect`](Self::connect).
    model_id: String,
    /// Maximum number of retries.
    pub max_retries: u32,
    /// Delay before the first retry.
    pub retry_backoff: Duration,
    client: reqwest::Client,
}

impl TgiCompletion {
    /// Create a provider with the default timeout.
    pub fn new(base_url: &str, model_id: &str) -> Result<Self, GenerationError> {
        Self::with_timeout(base_url, model_id, DEFAULT_TIMEOUT)
    }

    /// Create a provider with an explicit per-request timeout.
    pub fn with_timeout(
        base_url: &str,
        model_id: &str,
        timeout: Duration,
    ) -> Result<Self, GenerationError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            model_id: model_id.to_string(),
            max_retries: DEFAULT_MAX_RETRIES,
            retry_backoff: DEFAULT_RETRY_BACKOFF,
            client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Probe the server and adopt the model id it reports.
    pub async fn connect(mut self) -> Result<Self, GenerationError> {
        let info = self.info().await?;
        if info.model_id != self.model_id {
            log::warn!(
                "Model server at {} serves '{}' (configured '{}')",
                self.base_url,
                info.model_id,
                self.model_id
            );
        }
        self.model_id = info.model_id;
        Ok(self)
    }

    /// Fetch `/info` from the server.
    pub async fn info(&self) -> Result<ModelInfo, GenerationError> {
        let response = self
            .client
            .get(format!("{}/info", self.base_url))
            .send()
            .await?;
        let status = response.status();
        let text = response.text().await?;
        if !status.is_success() {
            return Err(GenerationError::Status {
                status: status.as_u16(),
                body: text,
            });
        }
        serde_json::from_str(&text).map_err(|e| GenerationError::Decode(e.to_string()))
    }

    /// Build the `/generate` request body.
    pub fn build_request_body(&self, prompt: &str, params: &GenerationParams) -> Value {
        serde_json::json!({
            "inputs": prompt,
            "parameters": {
                "max_new_tokens": params.max_new_tokens,
                "do_sample": params.do_sample,
                "top_k": params.top_k,
                "top_p": params.top_p,
                "temperature": params.temperature,
                "return_full_text": params.return_full_text,
            }
        })
    }

    /// Extract the generated text from a `/generate` response body.
    ///
    /// Accepts both the object form and the single-element array form some
    /// servers return.
    pub fn parse_response(&self, body: &str) -> Result<String, GenerationError> {
        let value: Value =
            serde_json::from_str(body).map_err(|e| GenerationError::Decode(e.to_string()))?;
        let first = match value {
            Value::Array(mut items) if !items.is_empty() => items.swap_remove(0),
            other => other,
        };
        let parsed: GenerateResponse = serde_json::from_value(first).map_err(|e| {
            let preview: String = body.chars().take(500).collect();
            GenerationError::Decode(format!("{} - Body: {}", e, preview))
        })?;
        Ok(parsed.generated_text)
    }
}

#[async_trait]
impl TextGenerator for TgiCompletion {
    fn model(&self) -> &str {
        &self.model_id
    }

    async fn generate(
        &self,
        prompt: &str,
        params: &GenerationParams,
    ) -> Result<String, GenerationError> {
        log::debug!(
            "TgiCompletion.generate: model={}, prompt_chars={}",
            self.model_id,
            prompt.len()
        );

        let endpoint = format!("{}/generate", self.base_url);
        let body = self.build_request_body(prompt, params);

        let mut last_error: Option<GenerationError> = None;
        let mut retry_delay = self.retry_backoff;

        for attempt in 0..=self.max_retries {
            if attempt > 0 {
                log::warn!(
                    "Model server retry attempt {} after {:?}",
                    attempt,
                    retry_delay
                );
                tokio::time::sleep(retry_delay).await;
                retry_delay *= 2;
            }

            let response = match self.client.post(&endpoint).json(&body).send().await {
                Ok(resp) => resp,
                Err(e) => {
                    last_error = Some(e.into());
                    continue;
                }
            };

            let status = response.status();
            let response_text = match response.text().await {
                Ok(text) => text,
                Err(e) => {
                    last_error = Some(e.into());
                    continue;
                }
            };

            if status == reqwest::StatusCode::TOO_MANY_REQUESTS || status.is_server_error() {
                last_error = Some(GenerationError::Status {
                    status: status.as_u16(),
                    body: response_text,
                });
                continue;
            }

            if !status.is_success() {
                return Err(GenerationError::Status {
                    status: status.as_u16(),
                    body: response_text,
                });
            }

            return self.parse_response(&response_text);
        }

        Err(last_error.unwrap_or_else(|| {
            GenerationError::Backend("Generation failed after all retries".into())
        }))
    }
}
