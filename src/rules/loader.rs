//! Rule directory loader.

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::Value;

use super::{RuleLoadError, RuleSet};

/// Load every `*.json` file in `dir` into a [`RuleSet`].
///
/// Unreadable or malformed files are logged and skipped; the remaining
/// categories still load. A missing directory yields an empty set.
pub fn load_rules(dir: impl AsRef<Path>) -> RuleSet {
    let dir = dir.as_ref();

    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            log::error!("Rules directory not found at {:?}: {}", dir, e);
            return RuleSet::new();
        }
    };

    let mut paths: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.is_file() && path.extension().map_or(false, |ext| ext == "json"))
        .collect();
    paths.sort();

    let rules = paths.iter().fold(RuleSet::new(), |mut rules, path| {
        match read_rule_file(path) {
            Ok((category, document)) => {
                log::debug!("Loaded rule file for category {}", category);
                rules.insert(category, document);
            }
            Err(e) => log::error!("Skipping rule file: {}", e),
        }
        rules
    });

    log::info!("Loaded {} rule categories from {:?}", rules.len(), dir);
    rules
}

/// Read one rule file, returning its category key and parsed document.
fn read_rule_file(path: &Path) -> Result<(String, Value), RuleLoadError> {
    let content = fs::read_to_string(path).map_err(|source| RuleLoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let document = serde_json::from_str(&content).map_err(|source| RuleLoadError::Json {
        path: path.to_path_buf(),
        source,
    })?;
    let category = path
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default();
    Ok((category, document))
}
