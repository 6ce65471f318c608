//! Interpretation rules loaded from JSON documents.
//!
//! A rule directory holds one JSON file per category; the file stem is the
//! category key and the document body is kept as an untyped
//! [`serde_json::Value`]. The matcher reaches into it by key path and treats
//! any missing key as "rule not present".
//!
//! - [`loader`] - Builds a [`RuleSet`] from a directory
//! - [`matcher`] - Turns a chart plus rules into a [`Prediction`]

pub mod loader;
pub mod matcher;

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

pub use loader::load_rules;
pub use matcher::{match_rules, Prediction};

/// Why a single rule file was skipped.
///
/// Never escapes [`load_rules`]; the loader logs it and moves on.
#[derive(Debug, Error)]
pub enum RuleLoadError {
    /// The file could not be read.
    #[error("Failed to read rule file {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file was read but is not valid JSON.
    #[error("Error decoding JSON from {path:?}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Rule documents keyed by category name. Read-only once loaded.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RuleSet {
    categories: BTreeMap<String, Value>,
}

impl RuleSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a category document.
    pub fn insert(&mut self, category: impl Into<String>, document: Value) {
        self.categories.insert(category.into(), document);
    }

    /// The document for a category.
    pub fn get(&self, category: &str) -> Option<&Value> {
        self.categories.get(category)
    }

    pub fn contains(&self, category: &str) -> bool {
        self.categories.contains_key(category)
    }

    /// Category names in sorted order.
    pub fn categories(&self) -> impl Iterator<Item = &str> {
        self.categories.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.categories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    /// Walk `category` then each key in `path` through nested objects.
    pub fn lookup(&self, category: &str, path: &[&str]) -> Option<&Value> {
        path.iter()
            .try_fold(self.get(category)?, |node, key| node.get(*key))
    }

    /// Like [`lookup`](Self::lookup), but only yields string leaves.
    pub fn lookup_str(&self, category: &str, path: &[&str]) -> Option<&str> {
        self.lookup(category, path).and_then(Value::as_str)
    }
}

impl FromIterator<(String, Value)> for RuleSet {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self {
            categories: iter.into_iter().collect(),
        }
    }
}
