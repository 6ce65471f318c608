//! Language model access.
//!
//! - [`text_generator`] - The [`TextGenerator`] trait every model backend implements
//! - [`providers`] - Concrete backends (text-generation-inference over HTTP)
//! - [`loader`] - One-time loading into a [`SharedGenerator`]

pub mod loader;
pub mod providers;
pub mod text_generator;

#[cfg(test)]
pub mod testing;

pub use loader::{load_model, ModelConfig, SharedGenerator, DEFAULT_MODEL_NAME};
pub use text_generator::{GenerationError, GenerationParams, TextGenerator};
