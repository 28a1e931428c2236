//! Configuration types for the rewrite engine.

use serde::{Deserialize, Serialize};

use crate::rule::RewriteMode;

/// Main configuration for the rewrite engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RewriteConfig {
    /// Configuration version
    pub version: String,
    /// Rewrite rules, one per operation (later entries win on duplicates)
    pub rules: Vec<RuleConfig>,
}

impl Default for RewriteConfig {
    fn default() -> Self {
        Self {
            version: "1".to_string(),
            rules: vec![],
        }
    }
}

/// A single per-operation rewrite rule.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuleConfig {
    /// Operation identifier this rule applies to (case-sensitive, non-empty)
    pub operation: String,
    /// Optional description
    #[serde(default)]
    pub description: String,
    /// Rewrite mode
    pub mode: RewriteMode,
    /// Replacement path (constant_address) or prepended prefix
    /// (append_path_to_address)
    pub path_prefix: String,
}

/// Errors raised while turning configuration into a rule table.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("rewrite rule has an empty operation identifier")]
    EmptyOperation,
}
