//! Rule Set Files - Registry Extension at Start-up
//!
//! A rule set adds aliases and composites on top of whatever predicates the
//! host has registered:
//!
//! ```json
//! {
//!   "aliases": { "id": "validInteger" },
//!   "composites": { "validPort": ["validInteger", "!isZero"] }
//! }
//! ```

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

use crate::registry::Registry;
use crate::rules::RuleExpr;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read rule set {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid rule set {}: {source}", .path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuleSet {
    pub aliases: IndexMap<String, String>,
    pub composites: IndexMap<String, RuleExpr>,
}

impl RuleSet {
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&content).map_err(|source| ConfigError::Json {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.aliases.is_empty() && self.composites.is_empty()
    }
}

impl Registry {
    /// Adds every alias and composite in `rule_set`, replacing same-named
    /// entries.
    pub fn apply(&mut self, rule_set: RuleSet) {
        for (alias, target) in rule_set.aliases {
            self.register_alias(alias, target);
        }
        for (name, rules) in rule_set.composites {
            self.register_composite(name, rules);
        }
    }

    pub fn extend_from_file(&mut self, path: &Path) -> Result<(), ConfigError> {
        let rule_set = RuleSet::from_file(path)?;
        info!(
            path = %path.display(),
            aliases = rule_set.aliases.len(),
            composites = rule_set.composites.len(),
            "rule set loaded"
        );
        self.apply(rule_set);
        Ok(())
    }

    /// Built-ins extended by every `*.json` rule set in `dir`, applied in
    /// file-name order. A missing directory leaves just the built-ins.
    pub fn load_from_dir(dir: &Path) -> Result<Self, ConfigError> {
        let mut registry = Self::with_builtins();
        if !dir.exists() {
            return Ok(registry);
        }

        let io_error = |source| ConfigError::Io { path: dir.to_path_buf(), source };
        let mut paths = vec![];
        for entry in fs::read_dir(dir).map_err(io_error)? {
            let path = entry.map_err(io_error)?.path();
            if path.extension().map_or(false, |e| e == "json") {
                paths.push(path);
            }
        }
        paths.sort();

        for path in &paths {
            registry.extend_from_file(path)?;
        }
        Ok(registry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rule_set_accepts_strings_and_lists() {
        let rule_set: RuleSet = serde_json::from_str(
            r#"{"aliases": {"id": "validInteger"}, "composites": {"a": "number, !isZero", "b": ["a"]}}"#,
        )
        .unwrap();
        assert_eq!(rule_set.aliases["id"], "validInteger");
        assert_eq!(rule_set.composites["a"], RuleExpr::from("number, !isZero"));
        assert_eq!(rule_set.composites["b"], RuleExpr::from(["a"]));
    }

    #[test]
    fn test_partial_rule_set() {
        let rule_set: RuleSet = serde_json::from_str(r#"{"aliases": {"n": "number"}}"#).unwrap();
        assert!(rule_set.composites.is_empty());
        assert!(!rule_set.is_empty());
    }
}
