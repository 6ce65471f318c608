//! Scripted [`TextGenerator`] for tests.

use std::sync::Mutex;

use async_trait::async_trait;

use super::text_generator::{GenerationError, GenerationParams, TextGenerator};

#[derive(Debug, Clone)]
enum Script {
    /// Echo the prompt, then append this continuation.
    Continue(String),
    /// Return this text verbatim.
    Raw(String),
    /// Fail every call.
    Fail,
}

/// Test double that records every prompt it receives.
#[derive(Debug)]
pub struct ScriptedGenerator {
    script: Script,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedGenerator {
    /// Behave like a causal model: prompt followed by `continuation`.
    pub fn continuing(continuation: &str) -> Self {
        Self::with_script(Script::Continue(continuation.to_string()))
    }

    /// Return `text` regardless of the prompt.
    pub fn raw(text: &str) -> Self {
        Self::with_script(Script::Raw(text.to_string()))
    }

    pub fn failing() -> Self {
        Self::with_script(Script::Fail)
    }

    fn with_script(script: Script) -> Self {
        Self {
            script,
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> usize {
        self.prompts.lock().unwrap().len()
    }

    pub fn last_prompt(&self) -> Option<String> {
        self.prompts.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl TextGenerator for ScriptedGenerator {
    fn model(&self) -> &str {
        "scripted"
    }

    async fn generate(
        &self,
        prompt: &str,
        _params: &GenerationParams,
    ) -> Result<String, GenerationError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        match &self.script {
            Script::Continue(text) => Ok(format!("{}{}", prompt, text)),
            Script::Raw(text) => Ok(text.clone()),
            Script::Fail => Err(GenerationError::Backend("scripted failure".into())),
        }
    }
}
