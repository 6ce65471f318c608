//! Text generation trait and decoding parameters.
//!
//! A [`TextGenerator`] behaves like a causal language model paired with its
//! tokenizer: it takes a prompt and returns the decoded output sequence,
//! which normally starts with the prompt itself followed by the sampled
//! continuation. Callers are expected to strip the echoed prompt.

use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Upper bound on generated tokens per call.
pub const DEFAULT_MAX_NEW_TOKENS: u32 = 400;

/// Top-k truncation.
pub const DEFAULT_TOP_K: u32 = 50;

/// Nucleus (top-p) truncation.
pub const DEFAULT_TOP_P: f64 = 0.95;

/// Sampling temperature.
pub const DEFAULT_TEMPERATURE: f64 = 0.7;

// ---------------------------------------------------------------------------
// Generation parameters
// ---------------------------------------------------------------------------

/// Decoding parameters sent with every generation request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationParams {
    /// Maximum number of new tokens to sample.
    pub max_new_tokens: u32,
    /// Sample instead of greedy decoding.
    pub do_sample: bool,
    /// Keep only the `top_k` most likely tokens at each step.
    pub top_k: u32,
    /// Keep the smallest token set whose probability mass reaches `top_p`.
    pub top_p: f64,
    pub temperature: f64,
    /// Return prompt plus continuation rather than the continuation alone.
    pub return_full_text: bool,
}

impl Default for GenerationParams {
    fn default() -> Self {
        Self {
            max_new_tokens: DEFAULT_MAX_NEW_TOKENS,
            do_sample: true,
            top_k: DEFAULT_TOP_K,
            top_p: DEFAULT_TOP_P,
            temperature: DEFAULT_TEMPERATURE,
            return_full_text: true,
        }
    }
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Failures while loading or invoking a model.
#[derive(Debug, Error)]
pub enum GenerationError {
    /// Transport-level failure (connect, timeout, body read).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The backend answered with a non-success status.
    #[error("Model server returned {status}: {body}")]
    Status { status: u16, body: String },

    /// The backend answered but the payload was not understood.
    #[error("Failed to decode model response: {0}")]
    Decode(String),

    /// Any other backend failure.
    #[error("Model backend error: {0}")]
    Backend(String),
}

// ---------------------------------------------------------------------------
// TextGenerator trait
// ---------------------------------------------------------------------------

/// A loaded language model.
///
/// Implementations are loaded once and shared read-only for the process
/// lifetime, so they must be `Send + Sync`.
#[async_trait]
pub trait TextGenerator: Send + Sync + fmt::Debug {
    /// Identifier of the loaded model.
    fn model(&self) -> &str;

    /// Run one generation and return the decoded output sequence.
    async fn generate(
        &self,
        prompt: &str,
        params: &GenerationParams,
    ) -> Result<String, GenerationError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_params() {
        let params = GenerationParams::default();
        assert_eq!(params.max_new_tokens, 400);
        assert!(params.do_sample);
        assert_eq!(params.top_k, 50);
        assert_eq!(params.top_p, 0.95);
        assert_eq!(params.temperature, 0.7);
        assert!(params.return_full_text);
    }

    #[test]
    fn test_status_error_message() {
        let err = GenerationError::Status {
            status: 503,
            body: "loading".into(),
        };
        assert_eq!(err.to_string(), "Model server returned 503: loading");
    }
}
