//! Cloud provider error types

use thiserror::Error;

/// Errors surfaced by a [`NetworkGateway`](crate::gateway::NetworkGateway)
///
/// `DependencyConflict` is kept distinct from the generic `Provider` variant
/// so callers can tell "the VPC still has live dependents, clean them up and
/// retry" apart from an arbitrary API failure.
#[derive(Error, Debug, Clone)]
pub enum CloudError {
    #[error("provider error {code}: {message}")]
    Provider { code: String, message: String },

    #[error("network not found: {0}")]
    NotFound(String),

    #[error("resource has dependent resources: {0}")]
    DependencyConflict(String),
}

impl CloudError {
    pub fn provider(code: impl Into<String>, message: impl Into<String>) -> Self {
        CloudError::Provider {
            code: code.into(),
            message: message.into(),
        }
    }

    /// Provider error code, when one was reported.
    pub fn code(&self) -> Option<&str> {
        match self {
            CloudError::Provider { code, .. } => Some(code),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, CloudError>;
