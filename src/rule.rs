//! Rewrite rules and the per-operation rule table.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::{ConfigError, RewriteConfig};

/// How the backend path is derived from the original request path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RewriteMode {
    /// Replace the path entirely with the configured value, carrying over
    /// only query parameters.
    ConstantAddress,
    /// Prepend the configured prefix to the whole original path.
    AppendPathToAddress,
}

impl RewriteMode {
    /// Stable name used in logs and metrics labels.
    pub fn as_str(&self) -> &'static str {
        match self {
            RewriteMode::ConstantAddress => "constant_address",
            RewriteMode::AppendPathToAddress => "append_path_to_address",
        }
    }
}

/// A compiled rewrite rule for one operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RewriteRule {
    /// Rewrite mode
    pub mode: RewriteMode,
    /// Replacement path or prepended prefix, depending on mode
    pub path_prefix: String,
}

impl RewriteRule {
    pub fn new(mode: RewriteMode, path_prefix: impl Into<String>) -> Self {
        Self {
            mode,
            path_prefix: path_prefix.into(),
        }
    }
}

/// Immutable operation -> rule mapping, built once at startup and shared
/// read-only across request tasks.
#[derive(Debug, Clone, Default)]
pub struct RuleTable {
    rules: HashMap<String, RewriteRule>,
}

impl RuleTable {
    /// Build a table from an ordered sequence of (operation, rule) pairs.
    ///
    /// A later entry for the same operation overwrites the earlier one.
    /// Empty operation identifiers are rejected here, at configuration time;
    /// `lookup` assumes pre-validated keys.
    pub fn build(
        pairs: impl IntoIterator<Item = (String, RewriteRule)>,
    ) -> Result<Self, ConfigError> {
        let mut rules = HashMap::new();
        for (operation, rule) in pairs {
            if operation.is_empty() {
                return Err(ConfigError::EmptyOperation);
            }
            if let Some(previous) = rules.insert(operation.clone(), rule) {
                debug!(
                    operation = %operation,
                    previous_prefix = %previous.path_prefix,
                    "Duplicate rewrite rule, keeping the later entry"
                );
            }
        }
        Ok(Self { rules })
    }

    /// Build a table from parsed configuration, preserving rule order.
    pub fn from_config(config: &RewriteConfig) -> Result<Self, ConfigError> {
        Self::build(config.rules.iter().map(|r| {
            (
                r.operation.clone(),
                RewriteRule::new(r.mode, r.path_prefix.clone()),
            )
        }))
    }

    /// Look up the rule for an operation. Pure read, no side effects.
    pub fn lookup(&self, operation: &str) -> Option<&RewriteRule> {
        self.rules.get(operation)
    }

    /// Number of configured operations.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}
