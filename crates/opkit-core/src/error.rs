//! Error types for the execution pipeline.

use opkit_model::ModelError;

/// Failure of one pipeline invocation.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// A precondition failed before any network activity: a required
    /// parameter is unbound, a select expression does not resolve against
    /// the response shape, or mutually exclusive options were combined.
    #[error("validation error: {0}")]
    Validation(String),

    /// The remote call could not complete.
    #[error("transport failure calling {endpoint}: {message}")]
    Transport {
        /// Description of the resolved endpoint configuration.
        endpoint: String,
        /// The underlying transport diagnostic.
        message: String,
    },

    /// The remote call completed but the service reported a failure.
    #[error("service error {code}: {message}")]
    Service {
        /// Service error code.
        code: String,
        /// Service error message.
        message: String,
    },

    /// The invocation's cancellation token fired.
    #[error("operation cancelled")]
    Cancelled,

    /// Internal error with context.
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl From<ModelError> for PipelineError {
    fn from(e: ModelError) -> Self {
        Self::Validation(e.to_string())
    }
}

/// Convenience result type for pipeline operations.
pub type PipelineResult<T> = Result<T, PipelineError>;
