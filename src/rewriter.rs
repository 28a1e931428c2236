//! The per-request path rewrite decision.

use tracing::debug;

use crate::context::RewriteContext;
use crate::rule::{RewriteMode, RuleTable};

/// Result of one rewrite decision.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RewriteOutcome {
    /// No rule applied; forward the request path untouched.
    Unchanged,
    /// A rule fired; the caller replaces the outgoing path with `new_path`.
    Rewritten {
        new_path: String,
        mode: RewriteMode,
    },
}

impl RewriteOutcome {
    /// New path if a rule fired.
    pub fn new_path(&self) -> Option<&str> {
        match self {
            RewriteOutcome::Unchanged => None,
            RewriteOutcome::Rewritten { new_path, .. } => Some(new_path),
        }
    }
}

/// Compute the outgoing path for one request.
///
/// Pure and synchronous: the only inputs are the per-request context and the
/// shared immutable rule table, and nothing here can fail. A request with no
/// operation or no matching rule passes through unchanged; an earlier
/// pipeline stage is expected to have rejected anything unroutable.
pub fn rewrite(ctx: &RewriteContext, table: &RuleTable) -> RewriteOutcome {
    let Some(operation) = ctx.operation() else {
        debug!("No operation attached to request, skipping rewrite");
        return RewriteOutcome::Unchanged;
    };

    let Some(rule) = table.lookup(operation) else {
        debug!(operation, "No rewrite rule for operation");
        return RewriteOutcome::Unchanged;
    };

    debug!(operation, old_path = %ctx.original_path, "Rewriting backend path");
    let new_path = match rule.mode {
        RewriteMode::ConstantAddress => constant_address_path(ctx, &rule.path_prefix),
        RewriteMode::AppendPathToAddress => {
            // Whole original path, embedded query string and all.
            format!("{}{}", rule.path_prefix, ctx.original_path)
        }
    };

    debug!(operation, mode = rule.mode.as_str(), new_path = %new_path, "Rewrote backend path");
    RewriteOutcome::Rewritten {
        new_path,
        mode: rule.mode,
    }
}

/// Build the constant-address path: the configured replacement plus query
/// parameters merged from the original request and the extracted fragment.
///
/// The `?`/`&` choice looks only at whether the original request path carried
/// a query string. A `?` already embedded in the configured replacement is
/// deliberately not inspected, so such a prefix yields a second `?` in the
/// output.
fn constant_address_path(ctx: &RewriteContext, path_prefix: &str) -> String {
    let original_query_pos = ctx.original_path.find('?');
    let mut new_path = match original_query_pos {
        // Original query string carried over verbatim, `?` included.
        Some(pos) => format!("{}{}", path_prefix, &ctx.original_path[pos..]),
        None => path_prefix.to_string(),
    };
    if let Some(extra) = ctx.extra_query_params() {
        let separator = if original_query_pos.is_some() { '&' } else { '?' };
        new_path.push(separator);
        new_path.push_str(extra);
    }
    new_path
}
