//! Service layer error types
//!
//! The four outcomes a transport façade needs to tell apart: bad input,
//! missing record, a deletion blocked by live dependents, and everything
//! else from the provider or the store.

use thiserror::Error;
use vpcflow_cloud::CloudError;
use vpcflow_core::ValidationError;
use vpcflow_store::StoreError;

#[derive(Error, Debug)]
pub enum ControlError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("network '{0}' not found")]
    NotFound(String),

    #[error(
        "network '{0}' has dependent resources not created by this service; \
         clean up the remaining dependencies manually, then retry"
    )]
    DependencyConflict(String),

    #[error(transparent)]
    Cloud(#[from] CloudError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

pub type Result<T> = std::result::Result<T, ControlError>;
