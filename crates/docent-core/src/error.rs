use thiserror::Error;

/// Unified error type for the docent crates.
#[derive(Debug, Error)]
pub enum DocentError {
    /// Malformed or incomplete graph specification. Fatal at build time;
    /// no partially-usable graph is ever produced.
    #[error("config error: {0}")]
    Config(String),

    /// Completion backend transport or response failure. Recoverable:
    /// the classifier absorbs it via fallback routing and answer
    /// synthesis degrades to a formatted context extract.
    #[error("model error: {0}")]
    Model(String),

    /// Classifier returned a label with no matching declared destination
    /// and the conditional group declares no fallback destination.
    #[error("routing error: {0}")]
    Routing(String),

    /// Executor-internal inconsistency, e.g. a transition to an
    /// undeclared node id.
    #[error("graph error: {0}")]
    Graph(String),

    /// Step or wall-clock budget exceeded during graph execution.
    #[error("execution timed out: {0}")]
    Timeout(String),
}

impl DocentError {
    /// Whether the caller may reasonably retry the query.
    pub fn is_retryable(&self) -> bool {
        matches!(self, DocentError::Timeout(_))
    }
}
