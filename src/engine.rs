//! Process-level rewrite engine: rule table plus request counters.

use std::sync::atomic::{AtomicU64, Ordering};

use tracing::{info, trace};

use crate::config::{ConfigError, RewriteConfig};
use crate::context::RewriteContext;
use crate::rewriter::{rewrite, RewriteOutcome};
use crate::rule::{RewriteMode, RuleTable};

/// The engine the pipeline embeds: one immutable rule table shared by all
/// request tasks, plus counters for the metrics exporter.
///
/// `apply` takes `&self` and touches only atomics, so a single engine can be
/// shared across arbitrarily many concurrent requests without locking.
pub struct RewriteEngine {
    table: RuleTable,
    stats: RewriteStats,
}

/// Counters kept by the engine.
#[derive(Debug, Default)]
pub struct RewriteStats {
    /// Requests seen by `apply`, rewritten or not.
    requests_total: AtomicU64,
    /// Requests a constant-address rule fired for.
    constant_address_requests: AtomicU64,
    /// Requests an append-path rule fired for.
    append_path_requests: AtomicU64,
}

/// Point-in-time copy of the counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatsSnapshot {
    pub requests_total: u64,
    pub constant_address_requests: u64,
    pub append_path_requests: u64,
}

impl RewriteEngine {
    /// Create an engine from parsed configuration.
    pub fn new(config: &RewriteConfig) -> Result<Self, ConfigError> {
        let table = RuleTable::from_config(config)?;
        info!(
            version = %config.version,
            rules = table.len(),
            "Rewrite engine initialized"
        );
        Ok(Self {
            table,
            stats: RewriteStats::default(),
        })
    }

    /// Create an engine from a YAML configuration string.
    pub fn from_yaml(yaml: &str) -> Result<Self, EngineError> {
        let config: RewriteConfig = serde_yaml::from_str(yaml)?;
        Self::new(&config).map_err(EngineError::from)
    }

    /// Create an engine from a JSON configuration string.
    pub fn from_json(json: &str) -> Result<Self, EngineError> {
        let config: RewriteConfig = serde_json::from_str(json)?;
        Self::new(&config).map_err(EngineError::from)
    }

    /// Decide the rewrite for one request and count the outcome.
    ///
    /// Exactly one mode counter is bumped per fired rule, none when the
    /// request passes through unchanged.
    pub fn apply(&self, ctx: &RewriteContext) -> RewriteOutcome {
        self.stats.requests_total.fetch_add(1, Ordering::Relaxed);

        let outcome = rewrite(ctx, &self.table);
        match &outcome {
            RewriteOutcome::Unchanged => {
                trace!(path = %ctx.original_path, "Request path left unchanged");
            }
            RewriteOutcome::Rewritten { mode, .. } => {
                let counter = match mode {
                    RewriteMode::ConstantAddress => &self.stats.constant_address_requests,
                    RewriteMode::AppendPathToAddress => &self.stats.append_path_requests,
                };
                counter.fetch_add(1, Ordering::Relaxed);
            }
        }
        outcome
    }

    /// The underlying rule table.
    pub fn table(&self) -> &RuleTable {
        &self.table
    }

    /// Copy out the current counter values.
    pub fn stats(&self) -> StatsSnapshot {
        StatsSnapshot {
            requests_total: self.stats.requests_total.load(Ordering::Relaxed),
            constant_address_requests: self
                .stats
                .constant_address_requests
                .load(Ordering::Relaxed),
            append_path_requests: self.stats.append_path_requests.load(Ordering::Relaxed),
        }
    }
}

/// Engine construction errors.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine() -> RewriteEngine {
        RewriteEngine::from_yaml(
            r#"
version: "1"
rules:
  - operation: "ListShelves"
    mode: constant_address
    path_prefix: "/v1/shelves"
  - operation: "CreateBook"
    mode: append_path_to_address
    path_prefix: "/books-backend"
"#,
        )
        .unwrap()
    }

    #[test]
    fn test_engine_from_yaml() {
        let engine = engine();
        assert_eq!(engine.table().len(), 2);
    }

    #[test]
    fn test_engine_from_json() {
        let engine = RewriteEngine::from_json(
            r#"{"version": "1", "rules": [
                {"operation": "GetShelf", "mode": "constant_address", "path_prefix": "/v1/shelf"}
            ]}"#,
        )
        .unwrap();
        assert_eq!(engine.table().len(), 1);
    }

    #[test]
    fn test_engine_rejects_empty_operation() {
        let result = RewriteEngine::from_yaml(
            r#"
version: "1"
rules:
  - operation: ""
    mode: constant_address
    path_prefix: "/v1"
"#,
        );
        assert!(matches!(result, Err(EngineError::Config(_))));
    }

    #[test]
    fn test_engine_rejects_malformed_yaml() {
        assert!(matches!(
            RewriteEngine::from_yaml("rules: {not: [valid"),
            Err(EngineError::Yaml(_))
        ));
    }

    #[test]
    fn test_apply_counts_fired_modes() {
        let engine = engine();

        let outcome = engine.apply(
            &RewriteContext::new("/shelves?page=2").with_operation("ListShelves"),
        );
        assert_eq!(outcome.new_path(), Some("/v1/shelves?page=2"));

        engine.apply(&RewriteContext::new("/books").with_operation("CreateBook"));
        engine.apply(&RewriteContext::new("/books").with_operation("CreateBook"));

        let stats = engine.stats();
        assert_eq!(stats.requests_total, 3);
        assert_eq!(stats.constant_address_requests, 1);
        assert_eq!(stats.append_path_requests, 2);
    }

    #[test]
    fn test_apply_unchanged_bumps_no_mode_counter() {
        let engine = engine();

        engine.apply(&RewriteContext::new("/orig"));
        engine.apply(&RewriteContext::new("/orig").with_operation("Unknown"));

        let stats = engine.stats();
        assert_eq!(stats.requests_total, 2);
        assert_eq!(stats.constant_address_requests, 0);
        assert_eq!(stats.append_path_requests, 0);
    }

    #[test]
    fn test_engine_is_shareable_across_threads() {
        let engine = std::sync::Arc::new(engine());
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let engine = engine.clone();
                std::thread::spawn(move || {
                    for _ in 0..100 {
                        engine.apply(
                            &RewriteContext::new("/books").with_operation("CreateBook"),
                        );
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(engine.stats().append_path_requests, 400);
    }
}
