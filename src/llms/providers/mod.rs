//! Model backend implementations.
//!
//! Each provider implements the
//! [`TextGenerator`](crate::llms::text_generator::TextGenerator) trait and
//! handles request formatting, retries and response decoding for its server.
//!
//! # Available Providers
//!
//! | Provider | Module | Server |
//! |----------|--------|--------|
//! | TGI | [`tgi`] | Hugging Face text-generation-inference (`/generate`) |

pub mod tgi;

pub use tgi::TgiCompletion;
