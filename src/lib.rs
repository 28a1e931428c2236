//! Backend path rewriting for HTTP gateways.
//!
//! For each inbound request that an upstream stage has classified into a named
//! operation, this crate looks up a per-operation rewrite rule and computes
//! the path the request is forwarded with:
//!
//! - **constant_address** replaces the path with a fixed value, carrying over
//!   query parameters from the original request and from path-template
//!   extraction.
//! - **append_path_to_address** prepends a fixed prefix to the whole original
//!   path.
//!
//! Requests without an operation or without a matching rule pass through
//! unchanged; the rewrite never rejects a request.
//!
//! ## Configuration Example
//!
//! ```yaml
//! version: "1"
//! rules:
//!   - operation: "ListShelves"
//!     mode: constant_address
//!     path_prefix: "/v1/shelves"
//!   - operation: "CreateBook"
//!     mode: append_path_to_address
//!     path_prefix: "/books-backend"
//! ```

pub mod config;
pub mod context;
pub mod engine;
pub mod rewriter;
pub mod rule;

pub use config::{ConfigError, RewriteConfig};
pub use context::RewriteContext;
pub use engine::{EngineError, RewriteEngine, StatsSnapshot};
pub use rewriter::{rewrite, RewriteOutcome};
pub use rule::{RewriteMode, RewriteRule, RuleTable};
