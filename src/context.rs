//! Per-request context consumed by the path rewriter.

/// Inputs for one rewrite decision, gathered from earlier pipeline stages.
///
/// Built fresh per request and discarded once the outcome is produced. The
/// operation comes from the classification stage; `extra_query_params` comes
/// from the path-template extraction stage as a pre-serialized
/// `k1=v1&k2=v2` fragment with no leading separator.
#[derive(Debug, Clone)]
pub struct RewriteContext {
    /// Operation identifier, if classification produced one
    pub operation: Option<String>,
    /// Request path as received, possibly with an embedded query string
    pub original_path: String,
    /// Extracted query-parameter fragment, if any
    pub extra_query_params: Option<String>,
}

impl RewriteContext {
    /// Create a context for a request path with no operation and no extracted
    /// parameters.
    pub fn new(original_path: impl Into<String>) -> Self {
        Self {
            operation: None,
            original_path: original_path.into(),
            extra_query_params: None,
        }
    }

    /// Attach the operation identifier from the classification stage.
    pub fn with_operation(mut self, operation: impl Into<String>) -> Self {
        self.operation = Some(operation.into());
        self
    }

    /// Attach the extracted query-parameter fragment.
    pub fn with_extra_query_params(mut self, params: impl Into<String>) -> Self {
        self.extra_query_params = Some(params.into());
        self
    }

    /// Operation identifier, with absence and emptiness folded together.
    ///
    /// An empty identifier means the classification stage ran but produced
    /// nothing useful; both cases make the rewrite a no-op.
    pub fn operation(&self) -> Option<&str> {
        self.operation.as_deref().filter(|op| !op.is_empty())
    }

    /// Extracted query fragment, empty string folded to `None`.
    pub fn extra_query_params(&self) -> Option<&str> {
        self.extra_query_params.as_deref().filter(|q| !q.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder() {
        let ctx = RewriteContext::new("/shelves/1")
            .with_operation("GetShelf")
            .with_extra_query_params("shelf=1");

        assert_eq!(ctx.operation(), Some("GetShelf"));
        assert_eq!(ctx.original_path, "/shelves/1");
        assert_eq!(ctx.extra_query_params(), Some("shelf=1"));
    }

    #[test]
    fn test_empty_operation_folded_to_none() {
        let ctx = RewriteContext::new("/shelves").with_operation("");
        assert_eq!(ctx.operation(), None);
    }

    #[test]
    fn test_empty_extra_params_folded_to_none() {
        let ctx = RewriteContext::new("/shelves").with_extra_query_params("");
        assert_eq!(ctx.extra_query_params(), None);
    }

    #[test]
    fn test_defaults_absent() {
        let ctx = RewriteContext::new("/shelves");
        assert_eq!(ctx.operation(), None);
        assert_eq!(ctx.extra_query_params(), None);
    }
}
