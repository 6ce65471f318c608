//! Narrative rewriter.
//!
//! Hands the matched predictions (and, for follow-ups, the conversation so
//! far) to the loaded language model and returns the retold text. Every
//! failure is absorbed here: callers always get a displayable string.

pub mod prompt;

use crate::llms::{GenerationParams, SharedGenerator};
use crate::session::ConversationTurn;

pub use prompt::{build_prompt, extract_interpretation, CLOSING_CUE, PERSONA_INSTRUCTION};

/// Reply when no model was loaded.
pub const UNAVAILABLE_MESSAGE: &str =
    "AI Astrologer is currently unavailable. Please check the deployment logs.";

/// Reply when generation fails or produces nothing usable.
pub const APOLOGY_MESSAGE: &str = "I apologize, a temporary cosmic disruption prevents me from offering deeper insights right now. Please rephrase your question or try again after a moment.";

/// Rewrites predictions in the persona's voice using the loaded model.
#[derive(Debug, Clone)]
pub struct NarrativeRewriter {
    /// `None` when the model failed to load.
    model: Option<SharedGenerator>,
    params: GenerationParams,
}

impl NarrativeRewriter {
    /// Create a rewriter over an optional model with the default decoding parameters.
    pub fn new(model: Option<SharedGenerator>) -> Self {
        Self {
            model,
            params: GenerationParams::default(),
        }
    }

    /// Override the decoding parameters.
    pub fn with_params(mut self, params: GenerationParams) -> Self {
        self.params = params;
        self
    }

    pub fn is_available(&self) -> bool {
        self.model.is_some()
    }

    /// Id of the loaded model, if any.
    pub fn model_name(&self) -> Option<&str> {
        self.model.as_deref().map(|m| m.model())
    }

    /// Retell `predictions` given prior `history` and an optional new `question`.
    ///
    /// Returns [`UNAVAILABLE_MESSAGE`] without touching anything when no model
    /// is loaded, and [`APOLOGY_MESSAGE`] when generation fails or the
    /// extracted text is empty.
    pub async fn rewrite(
        &self,
        predictions: &[String],
        history: &[ConversationTurn],
        question: Option<&str>,
    ) -> String {
        let Some(model) = self.model.as_ref() else {
            return UNAVAILABLE_MESSAGE.to_string();
        };

        let prompt = build_prompt(predictions, history, question);

        match model.generate(&prompt, &self.params).await {
            Ok(raw) => {
                let text = extract_interpretation(&raw, &prompt);
                if text.is_empty() {
                    log::warn!("Model {} produced no usable text", model.model());
                    APOLOGY_MESSAGE.to_string()
                } else {
                    text
                }
            }
            Err(e) => {
                log::error!("Error during AI response generation: {}", e);
                APOLOGY_MESSAGE.to_string()
            }
        }
    }
}
