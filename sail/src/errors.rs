//! Error types for sail.
//!
//! Every failure is attributed to what failed and on which identifier.
//! Nothing here is retried; callers decide how to present the error.

use std::time::Duration;

use thiserror::Error;

/// Result type for sail operations.
pub type SailResult<T> = Result<T, SailError>;

/// Result type for raw engine calls, before attribution.
pub type EngineResult<T> = Result<T, EngineError>;

#[derive(Debug, Error)]
pub enum SailError {
    /// A `share.*` image label that is not exactly one `source:target` pair.
    #[error("invalid share {value:?}")]
    MalformedShare { value: String },

    /// An engine call failed.
    #[error("failed to {operation} {target}: {source}")]
    Engine {
        operation: &'static str,
        target: String,
        #[source]
        source: EngineError,
    },

    /// The create deadline elapsed before the engine answered.
    #[error("timed out after {after:?} while trying to {operation} {target}")]
    Timeout {
        operation: &'static str,
        target: String,
        after: Duration,
    },

    /// The host environment is missing something there is no safe default for.
    #[error("environment error: {0}")]
    Environment(String),

    #[error("storage error: {0}")]
    Storage(String),

    #[error("invalid state: {0}")]
    InvalidState(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl SailError {
    /// Wrap a raw engine error with the operation and target it failed on.
    pub fn engine(operation: &'static str, target: impl Into<String>, source: EngineError) -> Self {
        SailError::Engine {
            operation,
            target: target.into(),
            source,
        }
    }

    /// True when the error is an engine `NotFound`.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            SailError::Engine {
                source: EngineError::NotFound(_),
                ..
            }
        )
    }
}

/// Errors returned by an [`Engine`](crate::engine::Engine) implementation.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("no such object: {0}")]
    NotFound(String),

    #[error(transparent)]
    Docker(#[from] bollard::errors::Error),

    #[error("{0}")]
    Other(String),
}
