//! # Jyotish
//!
//! A small Vedic-astrology reading service. Birth details are turned into a
//! mock chart, matched against JSON rule documents to produce template
//! predictions, and those predictions are rewritten into a warm narrative by
//! a locally served text-generation model. Readings open a session that
//! answers follow-up questions against the conversation so far.
//!
//! The pipeline is usable as a library ([`Astrologer`]), over HTTP
//! ([`server::app_router`]), or from the `jyotish` terminal client.

pub mod chart;
pub mod config;
pub mod llms;
pub mod narrative;
pub mod pipeline;
pub mod rules;
pub mod server;
pub mod session;

pub use chart::{calculate_chart, BirthDetails, BirthDetailsForm, ChartRecord};
pub use config::AppConfig;
pub use llms::{load_model, TextGenerator};
pub use narrative::NarrativeRewriter;
pub use pipeline::{Astrologer, PipelineError, Reading};
pub use rules::{load_rules, match_rules, RuleSet};
pub use session::{ConversationTurn, Session, SessionStore};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
