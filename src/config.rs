//! Application configuration from environment variables.
//!
//! # Environment Variables
//!
//! - `PORT` — HTTP port (default: 5000)
//! - `JYOTISH_BIND` — Bind host (default: 0.0.0.0)
//! - `JYOTISH_RULES_DIR` — Rule document directory (default: `rules`)
//! - `JYOTISH_MODEL_URL` — Text-generation server base URL (unset: no model)
//! - `JYOTISH_MODEL_NAME` — Expected model id (default: TinyLlama chat)
//! - `JYOTISH_MODEL_TIMEOUT_SECS` — Per-request timeout (default: 120)
//! - `JYOTISH_MODEL_MAX_RETRIES` — Retries on transient failures (default: 2)
//! - `RUST_LOG` — Tracing filter, read by the binaries

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::llms::ModelConfig;

/// Default HTTP port.
pub const DEFAULT_PORT: u16 = 5000;

/// Default bind host.
pub const DEFAULT_BIND: &str = "0.0.0.0";

/// Default rule directory, relative to the working directory.
pub const DEFAULT_RULES_DIR: &str = "rules";

/// Runtime configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub bind: String,
    pub port: u16,
    pub rules_dir: PathBuf,
    pub model: ModelConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind: DEFAULT_BIND.to_string(),
            port: DEFAULT_PORT,
            rules_dir: PathBuf::from(DEFAULT_RULES_DIR),
            model: ModelConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load from the process environment.
    pub fn from_env() -> Self {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Load from an arbitrary variable source.
    pub fn from_vars(get: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let non_empty = |key: &str| get(key).filter(|v| !v.trim().is_empty());

        let timeout_secs = parse_or(
            "JYOTISH_MODEL_TIMEOUT_SECS",
            non_empty("JYOTISH_MODEL_TIMEOUT_SECS"),
            defaults.model.timeout.as_secs(),
        );

        Self {
            bind: non_empty("JYOTISH_BIND").unwrap_or(defaults.bind),
            port: parse_or("PORT", non_empty("PORT"), defaults.port),
            rules_dir: non_empty("JYOTISH_RULES_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.rules_dir),
            model: ModelConfig {
                url: non_empty("JYOTISH_MODEL_URL"),
                model_name: non_empty("JYOTISH_MODEL_NAME")
                    .unwrap_or(defaults.model.model_name),
                timeout: Duration::from_secs(timeout_secs),
                max_retries: parse_or(
                    "JYOTISH_MODEL_MAX_RETRIES",
                    non_empty("JYOTISH_MODEL_MAX_RETRIES"),
                    defaults.model.max_retries,
                ),
            },
        }
    }

    /// `host:port` to bind the HTTP listener to.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.bind, self.port)
    }
}

fn parse_or<T: FromStr>(key: &str, raw: Option<String>, default: T) -> T {
    match raw {
        Some(value) => value.trim().parse().unwrap_or_else(|_| {
            log::warn!("Ignoring unparseable {}={:?}; using default", key, value);
            default
        }),
        None => default,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn from_map(pairs: &[(&str, &str)]) -> AppConfig {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_vars(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = from_map(&[]);
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.bind_addr(), "0.0.0.0:5000");
        assert!(config.model.url.is_none());
        assert_eq!(config.model.timeout, Duration::from_secs(120));
    }

    #[test]
    fn test_overrides() {
        let config = from_map(&[
            ("PORT", "8080"),
            ("JYOTISH_BIND", "127.0.0.1"),
            ("JYOTISH_RULES_DIR", "/srv/rules"),
            ("JYOTISH_MODEL_URL", "http://127.0.0.1:8081"),
            ("JYOTISH_MODEL_NAME", "tiny"),
            ("JYOTISH_MODEL_TIMEOUT_SECS", "30"),
            ("JYOTISH_MODEL_MAX_RETRIES", "0"),
        ]);
        assert_eq!(config.bind_addr(), "127.0.0.1:8080");
        assert_eq!(config.rules_dir, PathBuf::from("/srv/rules"));
        assert_eq!(config.model.url.as_deref(), Some("http://127.0.0.1:8081"));
        assert_eq!(config.model.model_name, "tiny");
        assert_eq!(config.model.timeout, Duration::from_secs(30));
        assert_eq!(config.model.max_retries, 0);
    }

    #[test]
    fn test_bad_numbers_fall_back() {
        let config = from_map(&[("PORT", "eighty"), ("JYOTISH_MODEL_MAX_RETRIES", "-1")]);
        assert_eq!(config.port, DEFAULT_PORT);
        assert_eq!(config.model.max_retries, 2);
    }

    #[test]
    fn test_blank_model_url_means_unavailable() {
        let config = from_map(&[("JYOTISH_MODEL_URL", "  ")]);
        assert!(config.model.url.is_none());
    }
}
